use std::future::Future;
use std::time::Duration;

use crate::error::{EngineError, Result};

/// Race `future` against `limit`.
///
/// On expiry the future is dropped, which cancels whatever it was awaiting,
/// and `EngineError::Timeout` names the `operation`.
pub async fn with_timeout<T, F>(operation: &str, limit: Duration, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("{} exceeded {}ms", operation, limit.as_millis());
            Err(EngineError::Timeout {
                operation: operation.to_string(),
                millis: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_in_time() {
        let value = with_timeout("quick", Duration::from_secs(1), async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result: Result<()> = with_timeout("failing", Duration::from_secs(1), async {
            Err(EngineError::PrivateLibrary(3))
        })
        .await;
        assert!(matches!(result, Err(EngineError::PrivateLibrary(3))));
    }

    #[tokio::test]
    async fn test_expires() {
        let result: Result<()> = with_timeout("library fetch", Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await;

        match result {
            Err(EngineError::Timeout { operation, millis }) => {
                assert_eq!(operation, "library fetch");
                assert_eq!(millis, 50);
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
