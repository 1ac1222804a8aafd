use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse};

/// Startup connection policy: bounded attempts with a fixed pause between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Attempts after the first failure
    pub max_retries: u32,

    /// Pause before each retry in milliseconds
    pub delay_ms: u64,
}

impl RetryConfig {
    pub fn fixed(max_retries: u32, delay_ms: u64) -> Self {
        Self {
            max_retries,
            delay_ms,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetryConfig {
    /// 5 retries, 2s apart
    fn default() -> Self {
        Self::fixed(5, 2000)
    }
}

/// Startup retry policy from the environment
///
/// - `DB_CONNECT_RETRIES` (optional, default: 5)
/// - `DB_CONNECT_RETRY_DELAY_MS` (optional, default: 2000)
#[cfg(feature = "config")]
impl FromEnv for RetryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let max_retries = env_parse("DB_CONNECT_RETRIES", defaults.max_retries)?;
        let delay_ms = env_parse("DB_CONNECT_RETRY_DELAY_MS", defaults.delay_ms)?;
        Ok(Self::fixed(max_retries, delay_ms))
    }
}

/// Run `operation` until it succeeds or `config.max_retries` retries are spent
///
/// The last error is returned unchanged.
///
/// # Example
/// ```ignore
/// use database::common::{retry_with_backoff, RetryConfig};
///
/// let db = retry_with_backoff(
///     || async { database::postgres::connect(&db_url).await },
///     RetryConfig::fixed(5, 2000),
/// )
/// .await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!(attempt, "Connected after retries");
                }
                return Ok(result);
            }
            Err(e) if attempt >= config.max_retries => {
                warn!(attempts = attempt + 1, error = %e, "Giving up");
                return Err(e);
            }
            Err(e) => {
                attempt += 1;
                warn!(
                    attempt,
                    max_retries = config.max_retries,
                    delay_ms = config.delay_ms,
                    error = %e,
                    "Connection attempt failed, retrying"
                );
                tokio::time::sleep(config.delay()).await;
            }
        }
    }
}

/// [`retry_with_backoff`] with [`RetryConfig::default`]
pub async fn retry<F, Fut, T, E>(operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    retry_with_backoff(operation, RetryConfig::default()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn flaky(failures: u32) -> (Arc<AtomicU32>, impl FnMut() -> std::future::Ready<Result<u32, String>>) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let op = move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(if n < failures {
                Err(format!("refused #{}", n + 1))
            } else {
                Ok(n)
            })
        };
        (calls, op)
    }

    #[tokio::test]
    async fn test_first_attempt_does_not_sleep() {
        let (calls, op) = flaky(0);
        let result = retry_with_backoff(op, RetryConfig::fixed(3, 60_000)).await;

        assert_eq!(result.unwrap(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_succeeds_after_failures() {
        let (calls, op) = flaky(2);
        let result = retry_with_backoff(op, RetryConfig::fixed(5, 1)).await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_with_last_error() {
        let (calls, op) = flaky(u32::MAX);
        let result = retry_with_backoff(op, RetryConfig::fixed(2, 1)).await;

        assert_eq!(result.unwrap_err(), "refused #3");
        assert_eq!(calls.load(Ordering::SeqCst), 3); // 1 initial + 2 retries
    }

    #[tokio::test]
    async fn test_zero_retries_means_single_attempt() {
        let (calls, op) = flaky(u32::MAX);
        assert!(retry_with_backoff(op, RetryConfig::fixed(0, 1)).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_retry_config_from_env() {
        temp_env::with_vars(
            [
                ("DB_CONNECT_RETRIES", Some("7")),
                ("DB_CONNECT_RETRY_DELAY_MS", Some("250")),
            ],
            || {
                let config = RetryConfig::from_env().unwrap();
                assert_eq!(config, RetryConfig::fixed(7, 250));
            },
        );

        temp_env::with_vars(
            [
                ("DB_CONNECT_RETRIES", None::<&str>),
                ("DB_CONNECT_RETRY_DELAY_MS", None::<&str>),
            ],
            || {
                assert_eq!(RetryConfig::from_env().unwrap(), RetryConfig::default());
            },
        );

        temp_env::with_var("DB_CONNECT_RETRIES", Some("many"), || {
            assert!(RetryConfig::from_env().is_err());
        });
    }
}
