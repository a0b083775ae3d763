use crate::domain::errors::ValidationError;

/// An opaque, non-empty object key within a bucket.
///
/// Keys form a flat namespace; `/` is a naming convention, not a container
/// boundary. The only local invariants are non-emptiness and the absence of
/// null bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::EmptyObjectKey);
        }
        if value.contains('\0') {
            return Err(ValidationError::InvalidObjectKeyCharacter('\0'));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key sits under the given prefix string.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_object_keys() {
        assert!(ObjectKey::new("file.txt").is_ok());
        assert!(ObjectKey::new("folder/sub/file.txt").is_ok());
        assert!(ObjectKey::new("weird name (1).bin").is_ok());
    }

    #[test]
    fn test_invalid_object_keys() {
        assert_eq!(ObjectKey::new(""), Err(ValidationError::EmptyObjectKey));
        assert_eq!(
            ObjectKey::new("bad\0key"),
            Err(ValidationError::InvalidObjectKeyCharacter('\0'))
        );
    }

    #[test]
    fn test_has_prefix() {
        let key = ObjectKey::new("folder/a.txt").unwrap();
        assert!(key.has_prefix("folder/"));
        assert!(!key.has_prefix("folder2/"));
    }
}
