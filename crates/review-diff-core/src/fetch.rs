//! Bounded, FIFO-ordered full file content fetching.
//!
//! Requests from every file view of a session funnel through one
//! [`FetchQueue`]. A dispatcher task takes requests in submission order and
//! waits for a semaphore permit before starting each fetch, so at most
//! `concurrency` fetches are in flight and queued requests start in the
//! order they were submitted.

use crate::traits::{ContextError, FileContentProvider};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// Default number of concurrent file content fetches per session.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 3;

/// Identity of one load of a file view.
///
/// A result is only applied when its token matches the view's current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadToken(pub u64);

/// A request for the full text of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContentRequest {
    pub path: String,
    pub token: LoadToken,
}

/// The outcome of a [`FileContentRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContentResult {
    pub request: FileContentRequest,
    pub result: Result<String, ContextError>,
}

/// Handle for submitting fetches. Cheap to clone.
#[derive(Clone, Debug)]
pub struct FetchQueue {
    tx: mpsc::UnboundedSender<FileContentRequest>,
    concurrency: usize,
}

impl FetchQueue {
    /// Start the dispatcher on the current tokio runtime.
    ///
    /// Returns the queue handle and the receiver results are delivered on.
    /// The dispatcher stops once every handle has been dropped and the
    /// queued requests have been started.
    pub fn spawn(
        provider: Arc<dyn FileContentProvider>,
        concurrency: usize,
    ) -> (Self, mpsc::UnboundedReceiver<FileContentResult>) {
        let concurrency = concurrency.max(1);
        let (tx, mut rx) = mpsc::unbounded_channel::<FileContentRequest>();
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let semaphore = Arc::new(Semaphore::new(concurrency));

        tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                let Ok(permit) = semaphore.clone().acquire_owned().await else {
                    break;
                };
                let provider = provider.clone();
                let results_tx = results_tx.clone();
                tokio::spawn(async move {
                    log::debug!("Fetching file content for {}", request.path);
                    let result = provider.fetch_file(&request.path).await;
                    drop(permit);
                    match &result {
                        Ok(text) => log::debug!(
                            "Fetched {} ({} bytes)",
                            request.path,
                            text.len()
                        ),
                        Err(e) => log::warn!("Fetching {} failed: {}", request.path, e),
                    }
                    if results_tx.send(FileContentResult { request, result }).is_err() {
                        log::debug!("Fetch result dropped, receiver is gone");
                    }
                });
            }
            log::debug!("Fetch queue dispatcher stopped");
        });

        (Self { tx, concurrency }, results_rx)
    }

    /// Queue a request. Requests start in submission order.
    pub fn submit(&self, request: FileContentRequest) {
        if let Err(e) = self.tx.send(request) {
            log::error!("Failed to queue file content request: {}", e.0.path);
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingProvider {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        started: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FileContentProvider for CountingProvider {
        async fn fetch_file(&self, path: &str) -> Result<String, ContextError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.started.lock().unwrap().push(path.to_string());
            for _ in 0..5 {
                tokio::task::yield_now().await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if path.starts_with("missing") {
                Err(ContextError::FileNotFound(path.to_string()))
            } else {
                Ok(format!("content of {}", path))
            }
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    fn request(path: &str, token: u64) -> FileContentRequest {
        FileContentRequest {
            path: path.to_string(),
            token: LoadToken(token),
        }
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let provider = Arc::new(CountingProvider::default());
        let (queue, mut results) = FetchQueue::spawn(provider.clone(), DEFAULT_FETCH_CONCURRENCY);

        for i in 0..10 {
            queue.submit(request(&format!("file{}.rs", i), i));
        }

        let mut received = 0;
        while received < 10 {
            let result = results.recv().await.unwrap();
            assert!(result.result.is_ok());
            received += 1;
        }

        let max = provider.max_in_flight.load(Ordering::SeqCst);
        assert!(max <= DEFAULT_FETCH_CONCURRENCY, "max in flight was {}", max);
        assert!(max >= 1);
    }

    #[tokio::test]
    async fn test_requests_start_in_submission_order() {
        let provider = Arc::new(CountingProvider::default());
        let (queue, mut results) = FetchQueue::spawn(provider.clone(), 1);

        let paths = ["c.rs", "a.rs", "b.rs", "d.rs"];
        for (i, path) in paths.iter().enumerate() {
            queue.submit(request(path, i as u64));
        }

        let mut finished = Vec::new();
        for _ in 0..paths.len() {
            finished.push(results.recv().await.unwrap().request.path);
        }

        assert_eq!(finished, paths);
        assert_eq!(*provider.started.lock().unwrap(), paths);
    }

    #[tokio::test]
    async fn test_failures_are_delivered_with_their_token() {
        let provider = Arc::new(CountingProvider::default());
        let (queue, mut results) = FetchQueue::spawn(provider, 3);

        queue.submit(request("missing.rs", 7));
        let result = results.recv().await.unwrap();

        assert_eq!(result.request.token, LoadToken(7));
        assert_eq!(
            result.result,
            Err(ContextError::FileNotFound("missing.rs".to_string()))
        );
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_raised_to_one() {
        let provider = Arc::new(CountingProvider::default());
        let (queue, _results) = FetchQueue::spawn(provider, 0);
        assert_eq!(queue.concurrency(), 1);
    }
}
