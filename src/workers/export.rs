//! Export of region data to a local file.

use super::core::EventSender;
use crate::api::ElectionApi;
use crate::api::error::ApiError;
use crate::api::types::ExportFormat;
use crate::events::{Event, EventType, Source};
use crate::logging::LogLevel;
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Download failed: {0}")]
    Api(#[from] ApiError),

    #[error("Could not write file: {0}")]
    Io(#[from] std::io::Error),
}

/// `volby_<region>_<YYYYmmdd_HHMMSS>.<ext>`
pub fn default_file_name(region: &str, format: ExportFormat) -> String {
    format!(
        "volby_{}_{}.{}",
        region,
        Local::now().format("%Y%m%d_%H%M%S"),
        format.file_extension()
    )
}

/// Downloads the export for `region` and writes it to `path`. Returns the
/// number of bytes written.
pub async fn export_to_file(
    api: &dyn ElectionApi,
    region: &str,
    format: ExportFormat,
    path: &Path,
) -> Result<usize, ExportError> {
    let body = api.export(region, format).await?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, &body).await?;
    Ok(body.len())
}

/// Runs an export in the background, reporting the outcome in the activity log.
pub fn spawn_export(
    api: Arc<dyn ElectionApi>,
    event_sender: EventSender,
    region: String,
    format: ExportFormat,
    directory: PathBuf,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let path = directory.join(default_file_name(&region, format));
        let event = match export_to_file(api.as_ref(), &region, format, &path).await {
            Ok(bytes) => Event::new(
                Source::Export,
                format!("Exported {} ({} bytes) to {}", format, bytes, path.display()),
                EventType::Success,
                LogLevel::Info,
            ),
            Err(e) => Event::new(
                Source::Export,
                format!("Export of {} failed: {}", region, e),
                EventType::Error,
                LogLevel::Error,
            ),
        };
        event_sender.send_event(event).await;
    })
}
