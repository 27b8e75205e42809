//! Go identifier rules.

/// Converts a wire name into an exported Go identifier.
///
/// Leading underscores are dropped and the first character is upper-cased;
/// the rest of the name is kept as is.
#[must_use]
pub fn exported(name: &str) -> String {
    let trimmed = name.trim_start_matches('_');
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => {
            let mut result = String::with_capacity(trimmed.len());
            result.push(first.to_ascii_uppercase());
            result.push_str(chars.as_str());
            result
        }
        None => String::new(),
    }
}

/// Converts a string into PascalCase, treating every non-alphanumeric
/// character as a word boundary.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if !c.is_ascii_alphanumeric() {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Name of the constant declared for one enum value.
#[must_use]
pub fn enum_constant(type_name: &str, value: &str) -> String {
    let suffix = to_pascal_case(value);
    if suffix.is_empty() {
        format!("{type_name}Empty")
    } else {
        format!("{type_name}{suffix}")
    }
}

/// Name of the interface synthesized for a polymorphic base.
#[must_use]
pub fn interface_name(base: &str) -> String {
    format!("Base{base}")
}

/// Accessor a concrete base exposes through its interface.
#[must_use]
pub fn getter_name(base: &str) -> String {
    format!("Get{base}")
}

/// Discriminator method of an abstract base's interface.
#[must_use]
pub fn kind_method_name(base: &str) -> String {
    format!("{base}Kind")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exported() {
        assert_eq!(exported("mode"), "Mode");
        assert_eq!(exported("_this"), "This");
        assert_eq!(exported("Key"), "Key");
        assert_eq!(exported("vmName"), "VmName");
        assert_eq!(exported(""), "");
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("vmx-07"), "Vmx07");
        assert_eq!(to_pascal_case("powered_on"), "PoweredOn");
        assert_eq!(to_pascal_case("poweredOn"), "PoweredOn");
        assert_eq!(to_pascal_case("A"), "A");
    }

    #[test]
    fn test_enum_constant() {
        assert_eq!(enum_constant("Alpha", "A"), "AlphaA");
        assert_eq!(
            enum_constant("VirtualMachinePowerState", "poweredOn"),
            "VirtualMachinePowerStatePoweredOn"
        );
        assert_eq!(enum_constant("Alpha", ""), "AlphaEmpty");
    }

    #[test]
    fn test_interface_names() {
        assert_eq!(interface_name("Gamma"), "BaseGamma");
        assert_eq!(getter_name("Gamma"), "GetGamma");
        assert_eq!(kind_method_name("Gamma"), "GammaKind");
    }
}
