//! Batch analysis of image files.
//!
//! Each image is decoded on Tokio's blocking pool; results are put back in
//! input order so the comparison report lines up with the caller's list.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use qrstamp_business::Record;
use tokio::task::JoinSet;

use crate::decode::{QrDecoder, decode_file};

/// Message attached to records whose image holds no QR symbol.
pub const NO_QR_FOUND: &str = "No QR code found";

/// Display name for a path: its file name, or the whole path if it has none.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Decodes one image into a [`Record`]. Failures become failed records.
pub fn analyze_path<D: QrDecoder + ?Sized>(decoder: &D, path: &Path) -> Record {
    let source = source_name(path);
    match decode_file(decoder, path) {
        Ok(Some(text)) => Record::decoded(source, text),
        Ok(None) => Record::failed(source, NO_QR_FOUND),
        Err(e) => {
            log::debug!(
                target: "qrstamp_input::batch",
                "decode_failed path={path:?} error={e}",
            );
            Record::failed(source, e.to_string())
        }
    }
}

/// Decodes every path concurrently and returns the records in input order.
///
/// A task that panics yields a failed record for its path; the rest of the
/// batch is unaffected.
pub async fn analyze_paths<D>(decoder: Arc<D>, paths: Vec<PathBuf>) -> Vec<Record>
where
    D: QrDecoder + Send + Sync + 'static,
{
    let mut slots: Vec<Option<Record>> = vec![None; paths.len()];
    let mut tasks = JoinSet::new();

    for (index, path) in paths.iter().cloned().enumerate() {
        let decoder = Arc::clone(&decoder);
        tasks.spawn_blocking(move || (index, analyze_path(decoder.as_ref(), &path)));
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, record)) => slots[index] = Some(record),
            Err(e) => log::warn!(target: "qrstamp_input::batch", "decode_task_failed error={e}"),
        }
    }

    slots
        .into_iter()
        .zip(&paths)
        .map(|(slot, path)| {
            slot.unwrap_or_else(|| Record::failed(source_name(path), "Decode task failed"))
        })
        .collect()
}
