use anyhow::{Context, Result};

/// Runs synchronous work (SQLite, PDF rendering) off the UI thread.
pub async fn run_blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .context("blocking task did not complete")?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_the_closure_result() {
        let value = run_blocking(|| Ok(21 * 2)).await.expect("task should succeed");

        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn propagates_closure_errors() {
        let result: Result<()> = run_blocking(|| Err(anyhow::anyhow!("sqlite busy"))).await;

        assert_eq!(result.expect_err("should fail").to_string(), "sqlite busy");
    }
}
