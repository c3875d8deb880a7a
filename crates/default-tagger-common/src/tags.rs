//! The tag applied to every default resource
//!
//! default-tagger only ever writes one tag:
//!
//! | Tag Key | Tag Value |
//! |---------|-----------|
//! | `isDefault` | `true` |

/// Tag key marking a resource as provider-created default
pub const TAG_KEY: &str = "isDefault";

/// Tag value for [`TAG_KEY`]
pub const TAG_VALUE: &str = "true";

/// A key/value tag, independent of any SDK's tag type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{key}={value}")]
pub struct ResourceTag {
    pub key: String,
    pub value: String,
}

impl ResourceTag {
    /// The `isDefault=true` tag.
    pub fn is_default() -> Self {
        Self {
            key: TAG_KEY.to_string(),
            value: TAG_VALUE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_default_tag() {
        let tag = ResourceTag::is_default();
        assert_eq!(tag.key, "isDefault");
        assert_eq!(tag.value, "true");
        assert_eq!(tag.to_string(), "isDefault=true");
    }
}
