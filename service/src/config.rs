use std::{sync::Arc, time::Duration};

use crate::ServiceError;
use async_trait::async_trait;
use mockall::automock;

/// Retry and deadline policy for booking creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingConfig {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Attempt `n` waits `n * retry_base_delay` before attempt `n + 1`.
    pub retry_base_delay: Duration,
    /// Upper bound for the whole booking request, retries included.
    pub timeout: Duration,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_base_delay: Duration::from_millis(50),
            timeout: Duration::from_millis(5000),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Connection string from `DATABASE_URL`, if set.
    pub database_url: Option<Arc<str>>,
    pub server_address: Arc<str>,
    pub booking: BookingConfig,
}

#[automock]
#[async_trait]
pub trait ConfigService {
    async fn get_config(&self) -> Result<Config, ServiceError>;
}
