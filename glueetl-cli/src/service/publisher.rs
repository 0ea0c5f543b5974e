//! Script publisher

use glueetl_client::{ClientError, ScriptStore};
use glueetl_core::ScriptLocation;
use std::path::Path;
use tracing::info;

use crate::error::GlueEtlError;

/// Upload the current bytes of `local_path` to `location`.
///
/// Overwrites whatever is stored there; no hashing, no conditional write.
pub async fn publish_script(
    store: &dyn ScriptStore,
    location: &ScriptLocation,
    local_path: &Path,
) -> Result<(), GlueEtlError> {
    let to_error = |source: ClientError| GlueEtlError::ObjectStore {
        location: location.to_string(),
        source,
    };

    let body = tokio::fs::read(local_path).await.map_err(|source| {
        to_error(ClientError::LocalFile {
            path: local_path.to_path_buf(),
            source,
        })
    })?;

    let size = body.len();
    store.upload(location, body).await.map_err(to_error)?;

    info!(
        "Published {} ({} bytes) to {}",
        local_path.display(),
        size,
        location
    );

    Ok(())
}
