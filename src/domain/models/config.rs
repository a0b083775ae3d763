use crate::domain::errors::ValidationError;

/// Connection settings for the backing object store.
///
/// Validated once at construction and immutable afterwards; an invalid
/// configuration fails fast instead of surfacing later as a network error.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfiguration {
    host: String,
    port: u16,
    use_tls: bool,
    access_key: String,
    secret_key: String,
    region: Option<String>,
}

impl StoreConfiguration {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        use_tls: bool,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        region: Option<String>,
    ) -> Result<Self, ValidationError> {
        let host = host.into();
        let access_key = access_key.into();
        let secret_key = secret_key.into();

        if host.trim().is_empty() {
            return Err(ValidationError::EmptyHost);
        }
        if port == 0 {
            return Err(ValidationError::InvalidPort { port });
        }
        if access_key.trim().is_empty() {
            return Err(ValidationError::EmptyAccessKey);
        }
        if secret_key.trim().is_empty() {
            return Err(ValidationError::EmptySecretKey);
        }

        Ok(Self {
            host,
            port,
            use_tls,
            access_key,
            secret_key,
            region,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn use_tls(&self) -> bool {
        self.use_tls
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Full endpoint URL, e.g. `http://localhost:9000`.
    pub fn endpoint(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}
