//! Application state for paddock-server

use aws_sdk_sesv2::Client as SesClient;
use sqlx::PgPool;

use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// AWS SES client for sending emails
    pub ses: SesClient,
    /// SES sender email address
    pub ses_from_email: String,
    /// JWT secret for member session tokens
    pub jwt_secret: String,
    /// Club prefix for member codes issued at registration
    pub member_code_prefix: String,
    /// Base URL the emailed verification link points at
    pub verify_base_url: String,
    /// Rate limiter for registration/login routes
    pub rate_limiter: crate::auth::rate_limit::RateLimiter,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        let ses = if let Ok(ses_region) = std::env::var("SES_REGION") {
            let ses_config = aws_config
                .to_builder()
                .region(aws_config::Region::new(ses_region))
                .build();
            SesClient::new(&ses_config)
        } else {
            SesClient::new(&aws_config)
        };

        Ok(Self {
            pool,
            ses,
            ses_from_email: config.ses_from_email.clone(),
            jwt_secret: config.jwt_secret.clone(),
            member_code_prefix: config.member_code_prefix.clone(),
            verify_base_url: config.verify_base_url.clone(),
            rate_limiter: crate::auth::rate_limit::RateLimiter::new(),
        })
    }
}
