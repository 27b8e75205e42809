//! wsbind command-line tool.
//!
//! # Usage
//!
//! ```bash
//! # Generate the root target from ./vim.wsdl (overlay: ./sdk/vim.yaml)
//! wsbind ./vim25 vim
//!
//! # Generate another target with explicit directories
//! wsbind ./pbm pbm --schema-dir wsdl --overlay-dir sdk
//! ```

use anyhow::Result;
use clap::Parser;
use wsbind::cli::{Args, run};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    run(&args, &mut std::io::stdout().lock())?;
    Ok(())
}
