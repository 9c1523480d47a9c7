//! Local staging of inbound files before they are pushed to object storage.

use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// Write `reader` to `{dir}/{storage_name}` and return the path and the bytes written.
///
/// The directory must already exist. A partially written file is removed before the
/// error is returned.
pub(crate) async fn stage_file(
    dir: &Path,
    storage_name: &str,
    mut reader: Pin<Box<dyn AsyncRead + Send>>,
) -> io::Result<(PathBuf, u64)> {
    let path = dir.join(storage_name);

    let result = async {
        let mut file = fs::File::create(&path).await?;
        let written = tokio::io::copy(&mut reader, &mut file).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok::<_, io::Error>(written)
    }
    .await;

    match result {
        Ok(written) => Ok((path, written)),
        Err(e) => {
            remove_if_exists(&path).await;
            Err(e)
        }
    }
}

/// Best-effort delete; failures are logged and swallowed.
pub(crate) async fn remove_if_exists(path: &Path) {
    if !fs::try_exists(path).await.unwrap_or(false) {
        return;
    }

    if let Err(e) = fs::remove_file(path).await {
        tracing::warn!(
            error = %e,
            path = %path.display(),
            "Failed to delete staged file"
        );
    }
}
