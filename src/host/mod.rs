pub mod rfd_host;
#[cfg(test)]
pub mod scripted;

pub use rfd_host::RfdHost;

use std::path::{Path, PathBuf};

/// Extensions offered by the video open dialog.
pub const VIDEO_EXTENSIONS: &[&str] = &["mov", "mp4", "avi", "webm", "mkv"];

/// Dialogs the session needs from the surrounding desktop.
///
/// Every method blocks until the user answers. `None`/`false` means the
/// user backed out, which callers treat as a normal outcome.
pub trait Host {
    fn pick_video_file(&self, default_dir: Option<&Path>) -> Option<PathBuf>;

    fn pick_directory(&self, default_dir: Option<&Path>) -> Option<PathBuf>;

    /// `default_path` is either a bare file name or a full suggested path.
    fn pick_save_path(&self, default_path: &Path) -> Option<PathBuf>;

    /// Asks Cancel/Delete for the named file; true only for Delete.
    fn confirm_delete(&self, file_name: &str) -> bool;
}
