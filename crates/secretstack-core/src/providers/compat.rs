//! Blocking compatibility shim for async-only adapters
//!
//! An adapter whose backend only offers an async client still has to provide
//! the synchronous [`SecretProvider::get_secret`](super::SecretProvider::get_secret).
//! [`block_on`] lets it do so by blocking the calling thread. It is a
//! fallback: callers that are already async should use the store's async
//! entry points, which never block.

use std::future::Future;

use crate::error::{SecretStoreError, SecretStoreResult};

/// Run `future` to completion on the calling thread
///
/// Outside a tokio runtime a current-thread runtime is built for the call.
/// Inside one (where blocking the runtime's own thread would deadlock) the
/// future runs on a scoped helper thread with its own runtime while the
/// caller waits.
pub fn block_on<F>(future: F) -> SecretStoreResult<F::Output>
where
    F: Future + Send,
    F::Output: Send,
{
    if tokio::runtime::Handle::try_current().is_err() {
        return run_to_completion(future);
    }

    std::thread::scope(|scope| {
        scope
            .spawn(|| run_to_completion(future))
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    })
}

fn run_to_completion<F: Future>(future: F) -> SecretStoreResult<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| SecretStoreError::Runtime(format!("failed to start runtime: {}", e)))?;
    Ok(runtime.block_on(future))
}
