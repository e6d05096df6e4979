use std::path::{Path, PathBuf};

use super::{ScannedObject, Scanner};
use crate::{error::ProcessError, storage::ObjectStore, utils::S3Object};

/// Decodes an object key as it appears in an S3 event notification, where keys are
/// form-url-encoded (`+` for spaces, `%XX` for everything else).
pub fn decode_key(raw_key: &str) -> String {
    let plus_decoded = raw_key.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(plus_decoded.as_bytes())).into_owned()
}

/// Local path an object is downloaded to: the key's base name inside `scratch_dir`.
pub fn scratch_path(scratch_dir: &Path, key: &str) -> Result<PathBuf, ProcessError> {
    let file_name = key.rsplit('/').next().unwrap_or(key);
    if file_name.is_empty() || file_name == "." || file_name == ".." {
        return Err(ProcessError::ScratchPath {
            key: key.to_owned(),
        });
    }
    Ok(scratch_dir.join(file_name))
}

/// Downloads an object, scans it, and replaces its tag set with the verdict.
///
/// The scratch file is removed once the object is tagged. If scanning or tagging fails the file is
/// removed on a best-effort basis and the stage error is returned. A failed download leaves the
/// scratch directory to the store, which removes whatever it partially wrote.
pub async fn scan_object(
    store: &dyn ObjectStore,
    scanner: &dyn Scanner,
    scratch_dir: &Path,
    bucket: &str,
    raw_key: &str,
) -> Result<ScannedObject, ProcessError> {
    let object = S3Object::new(bucket.to_owned(), decode_key(raw_key));
    log::info!("Processing S3 object: {object}");
    let path = scratch_path(scratch_dir, object.get_key())?;

    log::info!("Downloading {object} to {}.", path.display());
    let size = store
        .download(object.get_bucket(), object.get_key(), &path)
        .await
        .map_err(ProcessError::Download)?;

    match scan_and_tag(store, scanner, &object, &path, size).await {
        Ok(scanned) => {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|source| ProcessError::Cleanup {
                    path: path.clone(),
                    source,
                })?;
            Ok(scanned)
        }
        Err(e) => {
            if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                log::warn!(
                    "Failed to remove scratch file {}: {remove_err}",
                    path.display()
                );
            }
            Err(e)
        }
    }
}

async fn scan_and_tag(
    store: &dyn ObjectStore,
    scanner: &dyn Scanner,
    object: &S3Object,
    path: &Path,
    size: u64,
) -> Result<ScannedObject, ProcessError> {
    log::info!("Scanning file: {} ({size} bytes)", path.display());
    let report = scanner.scan(path).await.map_err(ProcessError::Scan)?;
    let verdict = report.get_verdict();
    log::info!(
        "Scan result for {object}: {verdict:?} (scanner exit code {:?}).",
        report.get_exit_code()
    );

    let tag = verdict.to_tag();
    store
        .put_tags(object.get_bucket(), object.get_key(), std::slice::from_ref(&tag))
        .await
        .map_err(ProcessError::Tag)?;
    log::info!("Updated tags of {object}: {tag}");

    Ok(ScannedObject::new(object.clone(), size, verdict))
}
