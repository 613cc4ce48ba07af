use crate::host::{Host, VIDEO_EXTENSIONS};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::path::{Path, PathBuf};

const DELETE_LABEL: &str = "Delete";
const CANCEL_LABEL: &str = "Cancel";

/// Native dialogs through `rfd`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RfdHost;

impl Host for RfdHost {
    fn pick_video_file(&self, default_dir: Option<&Path>) -> Option<PathBuf> {
        let mut dialog = FileDialog::new()
            .set_title("Open video")
            .add_filter("Videos", VIDEO_EXTENSIONS)
            .add_filter("All Files", &["*"]);
        if let Some(dir) = default_dir {
            dialog = dialog.set_directory(dir);
        }
        dialog.pick_file()
    }

    fn pick_directory(&self, default_dir: Option<&Path>) -> Option<PathBuf> {
        let mut dialog = FileDialog::new().set_title("Select gallery folder");
        if let Some(dir) = default_dir {
            dialog = dialog.set_directory(dir);
        }
        dialog.pick_folder()
    }

    fn pick_save_path(&self, default_path: &Path) -> Option<PathBuf> {
        let mut dialog = FileDialog::new().add_filter("JPEG Image", &["jpg", "jpeg"]);
        if let Some(dir) = default_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            dialog = dialog.set_directory(dir);
        }
        if let Some(name) = default_path.file_name() {
            dialog = dialog.set_file_name(name.to_string_lossy());
        }
        dialog.save_file()
    }

    fn confirm_delete(&self, file_name: &str) -> bool {
        let result = MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title("Delete original video")
            .set_description(format!("Are you sure you want to delete the file:\n{}?", file_name))
            .set_buttons(MessageButtons::OkCancelCustom(
                DELETE_LABEL.to_string(),
                CANCEL_LABEL.to_string(),
            ))
            .show();

        match result {
            MessageDialogResult::Custom(label) => label == DELETE_LABEL,
            MessageDialogResult::Ok | MessageDialogResult::Yes => true,
            _ => false,
        }
    }
}
