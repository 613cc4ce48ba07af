//! Request/response boundary for a shell that talks to the session through
//! JSON messages instead of calling it directly.
//!
//! Each request is tagged with its command name (`"quick-save"`,
//! `"open-gallery"`, ...). Failures come back as
//! `{ "success": false, "error": "..." }`, never as a panic.

use crate::core::gallery::read_image_as_data_uri;
use crate::core::session::Session;
use crate::host::Host;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum Command {
    OpenFileDialog,
    SaveFileDialog {
        #[serde(rename = "defaultName")]
        default_name: String,
    },
    SaveFile {
        path: PathBuf,
        buffer: Vec<u8>,
    },
    QuickSave {
        buffer: Vec<u8>,
        #[serde(default)]
        notes: String,
    },
    DeleteOriginalVideo,
    OpenGallery {
        #[serde(default)]
        path: Option<PathBuf>,
    },
    SelectGalleryDirectory,
    ReadImageAsBase64 {
        path: PathBuf,
    },
    SaveCropArea {
        #[serde(rename = "cropArea")]
        crop_area: Value,
    },
    LoadCropArea,
}

/// `{ success, ...payload }` or `{ success: false, error? }`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub payload: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(payload: T) -> Self {
        Self { success: true, payload: Some(payload), error: None }
    }

    pub fn done() -> Self {
        Self { success: true, payload: None, error: None }
    }

    pub fn failed(error: impl Display) -> Self {
        Self { success: false, payload: None, error: Some(error.to_string()) }
    }

    /// Failure without a message, e.g. a dismissed directory picker.
    pub fn declined() -> Self {
        Self { success: false, payload: None, error: None }
    }

    pub fn from_result<E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(payload) => Self::ok(payload),
            Err(e) => Self::failed(e),
        }
    }
}

#[derive(Debug, Serialize)]
struct PathPayload {
    path: PathBuf,
}

#[derive(Debug, Serialize)]
struct DataPayload<T: Serialize> {
    data: T,
}

fn to_value<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| json!({ "success": false, "error": e.to_string() }))
}

/// Answers one JSON request per input line until the input ends.
pub fn serve_lines<H: Host>(
    session: &mut Session<H>,
    reader: impl BufRead,
    mut writer: impl Write,
) -> anyhow::Result<()> {
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = dispatch_json(session, &line);
        writeln!(writer, "{}", response)?;
        writer.flush()?;
    }
    log::info!("Bridge input closed");
    Ok(())
}

/// Parses one JSON request and runs it.
pub fn dispatch_json<H: Host>(session: &mut Session<H>, request: &str) -> Value {
    match serde_json::from_str::<Command>(request) {
        Ok(command) => dispatch(session, command),
        Err(e) => {
            log::warn!("Rejected request: {}", e);
            to_value(Envelope::<()>::failed(format!("Invalid request: {}", e)))
        }
    }
}

pub fn dispatch<H: Host>(session: &mut Session<H>, command: Command) -> Value {
    log::debug!("Dispatching {:?}", CommandName(&command));
    match command {
        Command::OpenFileDialog => match session.load_video() {
            Ok(Some(video)) => to_value(video),
            Ok(None) => Value::Null,
            Err(e) => to_value(Envelope::<()>::failed(e)),
        },
        Command::SaveFileDialog { default_name } => to_value(session.save_file_dialog(&default_name)),
        Command::SaveFile { path, buffer } => Value::Bool(session.save_file(&path, &buffer)),
        Command::QuickSave { buffer, notes } => {
            to_value(Envelope::from_result(session.quick_save(&buffer, &notes)))
        }
        Command::DeleteOriginalVideo => match session.delete_original_video() {
            Ok(()) => to_value(Envelope::<()>::done()),
            Err(e) => to_value(Envelope::<()>::failed(e)),
        },
        Command::OpenGallery { path } => {
            to_value(Envelope::from_result(session.list_gallery(path.as_deref())))
        }
        Command::SelectGalleryDirectory => match session.select_gallery_directory() {
            Some(path) => to_value(Envelope::ok(PathPayload { path })),
            None => to_value(Envelope::<()>::declined()),
        },
        Command::ReadImageAsBase64 { path } => to_value(Envelope::from_result(
            read_image_as_data_uri(&path).map(|data| DataPayload { data }),
        )),
        Command::SaveCropArea { crop_area } => match session.save_crop_area(&crop_area) {
            Ok(()) => to_value(Envelope::<()>::done()),
            Err(e) => to_value(Envelope::<()>::failed(e)),
        },
        Command::LoadCropArea => match session.load_crop_area() {
            Some(data) => to_value(Envelope::ok(DataPayload { data })),
            None => to_value(Envelope::<()>::failed("No crop area saved")),
        },
    }
}

/// Logs the command without dumping image buffers.
struct CommandName<'a>(&'a Command);

impl std::fmt::Debug for CommandName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self.0 {
            Command::OpenFileDialog => "open-file-dialog",
            Command::SaveFileDialog { .. } => "save-file-dialog",
            Command::SaveFile { .. } => "save-file",
            Command::QuickSave { .. } => "quick-save",
            Command::DeleteOriginalVideo => "delete-original-video",
            Command::OpenGallery { .. } => "open-gallery",
            Command::SelectGalleryDirectory => "select-gallery-directory",
            Command::ReadImageAsBase64 { .. } => "read-image-as-base64",
            Command::SaveCropArea { .. } => "save-crop-area",
            Command::LoadCropArea => "load-crop-area",
        };
        f.write_str(name)
    }
}
