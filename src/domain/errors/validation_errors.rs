/// Validation errors for configuration fields and domain value objects
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    // BucketName / ObjectKey validation errors
    EmptyBucketName,
    EmptyObjectKey,
    InvalidObjectKeyCharacter(char),

    // StoreConfiguration validation errors
    EmptyHost,
    InvalidPort { port: u16 },
    EmptyAccessKey,
    EmptySecretKey,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyBucketName => write!(f, "Bucket name cannot be empty"),
            ValidationError::EmptyObjectKey => write!(f, "Object key cannot be empty"),
            ValidationError::InvalidObjectKeyCharacter(c) => {
                write!(f, "Invalid character in object key: '{}'", c.escape_default())
            }
            ValidationError::EmptyHost => write!(f, "Host cannot be empty"),
            ValidationError::InvalidPort { port } => {
                write!(f, "Port must be between 1 and 65535, got {}", port)
            }
            ValidationError::EmptyAccessKey => write!(f, "Access key cannot be empty"),
            ValidationError::EmptySecretKey => write!(f, "Secret key cannot be empty"),
        }
    }
}

impl std::error::Error for ValidationError {}
