//! Ordering and deduplication of emitted entities.

use wsbind_schema::{OperationDescriptor, TypeDescriptor};

/// Anything emitted under a name.
pub trait Named {
    /// Name the entity is declared under.
    fn name(&self) -> &str;
}

impl Named for TypeDescriptor {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for OperationDescriptor {
    fn name(&self) -> &str {
        &self.name
    }
}

impl<T: Named + ?Sized> Named for &T {
    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Sorts `items` by name and keeps one entity per name.
///
/// The sort is stable and compares names byte-wise, so among equal names the
/// one seen first in the input survives.
pub fn sorted_unique<T, I>(items: I) -> Vec<T>
where
    T: Named,
    I: IntoIterator<Item = T>,
{
    let mut items: Vec<T> = items.into_iter().collect();
    items.sort_by(|a, b| a.name().as_bytes().cmp(b.name().as_bytes()));
    items.dedup_by(|later, kept| later.name() == kept.name());
    items
}

/// Splits an ordered type sequence into enums and everything else.
///
/// Both halves keep the input order.
#[must_use]
pub fn partition_enums<'a, I>(types: I) -> (Vec<&'a TypeDescriptor>, Vec<&'a TypeDescriptor>)
where
    I: IntoIterator<Item = &'a TypeDescriptor>,
{
    types.into_iter().partition(|t| t.is_enum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wsbind_schema::{FieldDef, TypeRef};

    #[test]
    fn test_sorted_unique_orders_by_bytes() {
        let types = vec![
            TypeDescriptor::new_composite("beta", None, vec![]),
            TypeDescriptor::new_composite("Beta", None, vec![]),
            TypeDescriptor::new_composite("Alpha", None, vec![]),
            TypeDescriptor::new_composite("_Zeta", None, vec![]),
        ];

        let ordered = sorted_unique(&types);
        let names: Vec<_> = ordered.iter().map(|t| t.name.as_str()).collect();

        // Upper case sorts before '_', which sorts before lower case.
        assert_eq!(names, ["Alpha", "Beta", "_Zeta", "beta"]);
    }

    #[test]
    fn test_sorted_unique_keeps_first_duplicate() {
        let types = vec![
            TypeDescriptor::new_composite(
                "Epsilon",
                None,
                vec![FieldDef::new("first", TypeRef::builtin("string"))],
            ),
            TypeDescriptor::new_enum("Alpha", vec!["A".into()]),
            TypeDescriptor::new_composite(
                "Epsilon",
                None,
                vec![FieldDef::new("second", TypeRef::builtin("string"))],
            ),
        ];

        let ordered = sorted_unique(&types);

        assert_eq!(ordered.len(), 2);
        assert_eq!(ordered[1].name, "Epsilon");
        assert!(ordered[1].field("first").is_some());
    }

    #[test]
    fn test_sorted_unique_operations() {
        let ops = vec![
            OperationDescriptor::new("Stop", "urn:vim25", TypeRef::local("StopRequest"), None),
            OperationDescriptor::new("Start", "urn:vim25", TypeRef::local("StartRequest"), None),
            OperationDescriptor::new("Stop", "urn:vim25", TypeRef::local("StopRequest"), None),
        ];

        let ordered = sorted_unique(ops);
        let names: Vec<_> = ordered.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["Start", "Stop"]);
    }

    #[test]
    fn test_partition_enums_preserves_order() {
        let types = vec![
            TypeDescriptor::new_enum("Alpha", vec!["A".into()]),
            TypeDescriptor::new_composite("Beta", None, vec![]),
            TypeDescriptor::new_enum("Delta", vec!["D".into()]),
            TypeDescriptor::new_composite("Gamma", None, vec![]),
        ];

        let (enums, composites) = partition_enums(&types);

        let enum_names: Vec<_> = enums.iter().map(|t| t.name.as_str()).collect();
        let composite_names: Vec<_> = composites.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(enum_names, ["Alpha", "Delta"]);
        assert_eq!(composite_names, ["Beta", "Gamma"]);
    }
}
