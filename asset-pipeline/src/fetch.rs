use asset_core::{AssetError, AssetResult};
use asset_sink::{Sink, SinkError};
use bytes::Bytes;
use futures::future::try_join_all;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{FeedId, FeedIdList, RetryPolicy};

/// Why a single feed could not be read.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Permanent: the sink has no such object. No retries were spent.
    #[error("Feed not found: {id}")]
    NotFound { id: FeedId },

    /// Transient failures outlasted the retry budget.
    #[error("Feed {id} could not be read after {attempts} attempts")]
    Exhausted {
        id: FeedId,
        attempts: u32,
        #[source]
        source: SinkError,
    },

    /// Permanent: the sink refused the id as a key. No retries were spent.
    #[error("Feed id {id} is not a valid sink key")]
    Rejected {
        id: FeedId,
        #[source]
        source: SinkError,
    },
}

impl FetchError {
    pub fn id(&self) -> &FeedId {
        match self {
            FetchError::NotFound { id }
            | FetchError::Exhausted { id, .. }
            | FetchError::Rejected { id, .. } => id,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

/// Read one feed, retrying transient failures and giving up at once on a miss.
pub async fn fetch_feed(sink: &dyn Sink, id: &FeedId, policy: &RetryPolicy) -> Result<Bytes, FetchError> {
    let mut retry = 0;
    loop {
        debug!(feed = %id, attempt = retry + 1, "fetching feed");
        match sink.get(id.as_str()).await {
            Ok(bytes) => return Ok(bytes),
            Err(e) if e.is_not_found() => {
                debug!(feed = %id, "feed absent from {} sink, not retrying", sink.kind());
                return Err(FetchError::NotFound { id: id.clone() });
            }
            Err(e @ SinkError::InvalidKey { .. }) => {
                debug!(feed = %id, "sink refused feed id, not retrying");
                return Err(FetchError::Rejected { id: id.clone(), source: e });
            }
            Err(e) => {
                if retry >= policy.max_retries {
                    return Err(FetchError::Exhausted {
                        id: id.clone(),
                        attempts: retry + 1,
                        source: e,
                    });
                }
                retry += 1;
                warn!(feed = %id, retry, max_retries = policy.max_retries, error = %e, "fetch failed, retrying");
                policy.wait(retry).await;
            }
        }
    }
}

/// Fetch every feed concurrently, returning their bytes in `ids` order.
///
/// The first failure cancels the outstanding reads and fails the whole batch.
pub async fn fetch_feeds(sink: &dyn Sink, ids: &FeedIdList, policy: &RetryPolicy) -> AssetResult<Vec<Bytes>> {
    try_join_all(ids.iter().map(|id| fetch_feed(sink, id, policy)))
        .await
        .map_err(classify)
}

fn classify(err: FetchError) -> AssetError {
    const MESSAGE: &str = "Unable to fetch one or more feeds";

    if let FetchError::Rejected { .. } = err {
        return AssetError::bad_request(format!("Invalid feed id '{}'", err.id())).with_source(err);
    }
    if err.is_not_found() && err.id().is_json_reference() {
        AssetError::not_found(MESSAGE).with_source(err)
    } else {
        AssetError::general_error(MESSAGE).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_sink::{MemorySink, SinkResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tracing_test::traced_test;

    /// Times out until `failures` calls have been made.
    struct Flaky {
        inner: MemorySink,
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl Sink for Flaky {
        async fn get(&self, key: &str) -> SinkResult<Bytes> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
                return Err(std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out").into());
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, bytes: Bytes) -> SinkResult<()> {
            self.inner.set(key, bytes).await
        }

        fn kind(&self) -> &'static str {
            "flaky"
        }
    }

    fn flaky(failures: u32) -> Flaky {
        Flaky {
            inner: MemorySink::with_objects([("a.json", Bytes::from_static(b"[]"))]),
            failures,
            calls: AtomicU32::new(0),
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn retries_are_logged() {
        let sink = flaky(1);
        let ids = FeedIdList::new(["a.json"]).unwrap();

        let out = fetch_feeds(&sink, &ids, &RetryPolicy::immediate(1)).await.unwrap();

        assert_eq!(out, vec![Bytes::from_static(b"[]")]);
        assert!(logs_contain("fetch failed, retrying"));
    }

    #[tokio::test]
    async fn zero_retries_means_one_attempt() {
        let sink = flaky(1);
        let id = FeedIdList::new(["a.json"]).unwrap();

        let err = fetch_feed(&sink, &id.as_slice()[0], &RetryPolicy::immediate(0))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Exhausted { attempts: 1, .. }));
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
    }

    /// Refuses every key, counting attempts.
    #[derive(Default)]
    struct Refusing {
        calls: AtomicU32,
    }

    #[async_trait]
    impl Sink for Refusing {
        async fn get(&self, key: &str) -> SinkResult<Bytes> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(SinkError::invalid_key(key))
        }

        async fn set(&self, key: &str, _bytes: Bytes) -> SinkResult<()> {
            Err(SinkError::invalid_key(key))
        }

        fn kind(&self) -> &'static str {
            "refusing"
        }
    }

    #[tokio::test]
    async fn refused_keys_are_client_errors_without_retries() {
        let sink = Refusing::default();
        let ids = FeedIdList::new(["a.json"]).unwrap();

        let err = fetch_feeds(&sink, &ids, &RetryPolicy::immediate(4)).await.unwrap_err();

        assert_eq!(err.code(), 400);
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
    }
}
