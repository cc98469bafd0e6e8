//! Qualified element names

use std::fmt;

/// Element name: local part plus namespace URI
///
/// An element without a namespace stores the empty string, matching how
/// unqualified legacy documents are read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QName {
    local: String,
    namespace: String,
}

impl QName {
    /// Create name from local part and optional namespace
    #[must_use]
    pub fn new(local: impl Into<String>, namespace: Option<&str>) -> Self {
        Self {
            local: local.into(),
            namespace: namespace.unwrap_or_default().to_string(),
        }
    }

    /// Local part
    #[inline]
    #[must_use]
    pub fn local(&self) -> &str {
        &self.local
    }

    /// Namespace URI, empty when unqualified
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Whether this name is the expected local name in the expected namespace
    #[must_use]
    pub fn matches(&self, local: &str, namespace: Option<&str>) -> bool {
        self.local == local && namespace_matches(&self.namespace, namespace)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local)
        }
    }
}

/// Compare a node namespace against an expected namespace
///
/// An empty node namespace equals an absent expected namespace.
#[must_use]
pub fn namespace_matches(node_namespace: &str, expected: Option<&str>) -> bool {
    match expected {
        Some(expected) => node_namespace == expected,
        None => node_namespace.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unqualified_matches_absent_namespace() {
        let name = QName::new("Child", None);
        assert!(name.matches("Child", None));
        assert!(name.matches("Child", Some("")));
        assert!(!name.matches("Child", Some("urn:x")));
    }

    #[test]
    fn qualified_requires_equal_namespace() {
        let name = QName::new("Child", Some("urn:apml"));
        assert!(name.matches("Child", Some("urn:apml")));
        assert!(!name.matches("Child", None));
        assert!(!name.matches("Other", Some("urn:apml")));
    }

    #[test]
    fn display_includes_namespace() {
        assert_eq!(QName::new("a", None).to_string(), "a");
        assert_eq!(QName::new("a", Some("urn:x")).to_string(), "{urn:x}a");
    }

    proptest! {
        #[test]
        fn prop_namespace_matches_itself(ns in "[a-z:]{1,12}") {
            prop_assert!(namespace_matches(&ns, Some(&ns)));
            prop_assert!(!namespace_matches(&ns, None));
        }
    }
}
