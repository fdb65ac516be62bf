//! Deals configuration

/// Default admin identity; override via service configuration
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@terrace.example";

/// Deals service configuration
#[derive(Debug, Clone)]
pub struct DealsConfig {
    /// The one identity allowed to read and mutate every deal
    pub admin_email: String,
}

impl DealsConfig {
    /// Create a configuration with the given admin identity
    pub fn new(admin_email: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
        }
    }
}

impl Default for DealsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_EMAIL)
    }
}
