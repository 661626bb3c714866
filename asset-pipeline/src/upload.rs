use asset_core::{AssetError, AssetResult};
use asset_sink::Sink;
use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::{RetryPolicy, StoredObjectName};

/// Write `bytes` under `name`, retrying any failure within the budget.
pub async fn upload(
    sink: &dyn Sink,
    name: &StoredObjectName,
    bytes: Bytes,
    policy: &RetryPolicy,
) -> AssetResult<()> {
    let mut retry = 0;
    loop {
        debug!(file = %name, attempt = retry + 1, "uploading object");
        match sink.set(name.as_str(), bytes.clone()).await {
            Ok(()) => {
                info!(file = %name, bytes = bytes.len(), sink = sink.kind(), "uploaded object");
                return Ok(());
            }
            Err(e) => {
                if retry >= policy.max_retries {
                    return Err(AssetError::general_error(format!(
                        "Unable to upload file with filename: {name}"
                    ))
                    .with_source(e));
                }
                retry += 1;
                warn!(file = %name, retry, max_retries = policy.max_retries, error = %e, "upload failed, retrying");
                policy.wait(retry).await;
            }
        }
    }
}
