//! Membership server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Membership server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT secret for member session tokens
    pub jwt_secret: String,
    /// SES sender email address
    pub ses_from_email: String,
    /// Club prefix for member codes issued at registration (e.g. BTC -> BTC0042)
    pub member_code_prefix: String,
    /// Base URL the emailed verification link points at
    pub verify_base_url: String,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: environment.clone(),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            ses_from_email: std::env::var("SES_FROM_EMAIL")
                .unwrap_or_else(|_| "membership@paddockclub.app".into()),
            member_code_prefix: std::env::var("MEMBER_CODE_PREFIX")
                .unwrap_or_else(|_| "BTC".into()),
            verify_base_url: std::env::var("VERIFY_BASE_URL")
                .unwrap_or_else(|_| "https://paddockclub.app/verify-email".into()),
        })
    }
}
