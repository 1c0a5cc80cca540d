use std::{env, str::FromStr, sync::Arc, time::Duration};

use async_trait::async_trait;
use service::{
    config::{BookingConfig, Config, ConfigService},
    ServiceError,
};
use tracing::error;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";

pub struct ConfigServiceImpl;

/// Reads a numeric variable, falling back to `default` if it is unset.
fn env_number<T: FromStr>(name: &str, default: T) -> Result<T, ServiceError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| {
            error!(variable = name, value, "Invalid configuration value");
            ServiceError::InternalError
        }),
        Err(_) => Ok(default),
    }
}

#[async_trait]
impl ConfigService for ConfigServiceImpl {
    async fn get_config(&self) -> Result<Config, ServiceError> {
        let defaults = BookingConfig::default();
        let server_address =
            env::var("SERVER_ADDRESS").unwrap_or(DEFAULT_SERVER_ADDRESS.to_string());
        let max_attempts = env_number("BOOKING_MAX_ATTEMPTS", defaults.max_attempts)?;
        let retry_base_delay_ms = env_number(
            "BOOKING_RETRY_BASE_DELAY_MS",
            defaults.retry_base_delay.as_millis() as u64,
        )?;
        let timeout_ms = env_number("BOOKING_TIMEOUT_MS", defaults.timeout.as_millis() as u64)?;

        Ok(Config {
            database_url: env::var("DATABASE_URL").ok().map(Arc::from),
            server_address: Arc::from(server_address),
            booking: BookingConfig {
                max_attempts: max_attempts.max(1),
                retry_base_delay: Duration::from_millis(retry_base_delay_ms),
                timeout: Duration::from_millis(timeout_ms),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_number_default() {
        assert_eq!(
            env_number("KIDBOOK_TEST_SURELY_UNSET_VARIABLE", 7u32).unwrap(),
            7
        );
    }
}
