use crate::core::config::{AppConfig, ConfigStore};
use crate::core::counter::FrameCounter;
use crate::core::date_key::{date_key, Clock, LocalClock};
use crate::core::error::{GalleryError, GalleryResult};
use crate::core::gallery::{
    highest_frame_number, list_gallery, resolve_root, DirectoryListing, FsListing, GalleryListing,
    NOTES_FILE_NAME,
};
use crate::host::Host;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Paths the session tracks. The two `current_video_*` fields are set
/// together on load and cleared together on delete.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub last_used_path: Option<PathBuf>,
    pub gallery_path: Option<PathBuf>,
    /// Folder containing the loaded video; date folders are created here.
    pub current_video_path: Option<PathBuf>,
    pub current_video_file_path: Option<PathBuf>,
}

impl SessionState {
    fn from_config(config: AppConfig) -> Self {
        Self {
            last_used_path: config.last_used_path,
            gallery_path: config.gallery_path,
            ..Self::default()
        }
    }

    fn to_config(&self) -> AppConfig {
        AppConfig {
            last_used_path: self.last_used_path.clone(),
            gallery_path: self.gallery_path.clone(),
        }
    }

    pub fn has_video(&self) -> bool {
        self.current_video_file_path.is_some() && self.current_video_path.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedVideo {
    pub buffer: Vec<u8>,
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickSaveOutcome {
    pub path: PathBuf,
    pub number: u32,
    pub folder: String,
}

/// Owns the session paths and the frame counter, and talks to the host for
/// every dialog. Operations run one at a time from the UI.
pub struct Session<H: Host> {
    state: SessionState,
    counter: FrameCounter,
    store: ConfigStore,
    host: H,
    clock: Box<dyn Clock>,
}

impl<H: Host> Session<H> {
    pub fn new(host: H, store: ConfigStore) -> Self {
        Self::with_clock(host, store, Box::new(LocalClock))
    }

    pub fn with_clock(host: H, store: ConfigStore, clock: Box<dyn Clock>) -> Self {
        let state = store
            .load_config()
            .map(SessionState::from_config)
            .unwrap_or_default();
        Self {
            state,
            counter: FrameCounter::new(),
            store,
            host,
            clock,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn counter(&self) -> &FrameCounter {
        &self.counter
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn today_key(&self) -> String {
        date_key(self.clock.today())
    }

    /// Today's date folder under the loaded video's folder.
    pub fn today_folder(&self) -> Option<PathBuf> {
        self.state
            .current_video_path
            .as_ref()
            .map(|dir| dir.join(self.today_key()))
    }

    fn persist(&self) {
        if let Err(e) = self.store.save_config(&self.state.to_config()) {
            log::error!("Error saving config: {}", e);
        }
    }

    /// Opens a video and makes its folder the session's working folder.
    ///
    /// Resets today's counter to 0 even if frames were already saved today.
    pub fn load_video(&mut self) -> GalleryResult<Option<LoadedVideo>> {
        let Some(file_path) = self.host.pick_video_file(self.state.last_used_path.as_deref()) else {
            return Ok(None);
        };
        self.open_video(file_path).map(Some)
    }

    /// `load_video` without the dialog.
    pub fn open_video(&mut self, file_path: PathBuf) -> GalleryResult<LoadedVideo> {
        let buffer = std::fs::read(&file_path)?;
        let folder = file_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        self.state.current_video_path = Some(folder.clone());
        self.state.current_video_file_path = Some(file_path.clone());
        self.state.last_used_path = Some(folder.clone());

        let key = self.today_key();
        self.counter.reset(&key);

        if self.state.gallery_path.is_none() {
            self.state.gallery_path = Some(folder);
        }
        self.persist();

        log::info!(
            "Video loaded: {} (gallery: {:?})",
            file_path.display(),
            self.state.gallery_path
        );

        let name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(LoadedVideo {
            buffer,
            name,
            path: file_path,
        })
    }

    /// Writes `<video folder>/<DD-MM-YYYY>/<n>.jpg` with the next number.
    ///
    /// Non-blank notes overwrite the day's shared `notas.txt`.
    pub fn quick_save(&mut self, image: &[u8], notes: &str) -> GalleryResult<QuickSaveOutcome> {
        if !self.state.has_video() {
            return Err(GalleryError::NoVideoLoaded);
        }
        let Some(output_dir) = self.today_folder() else {
            return Err(GalleryError::NoVideoLoaded);
        };
        let folder = self.today_key();

        std::fs::create_dir_all(&output_dir)?;

        let number = self
            .counter
            .peek_next(&folder)
            .ok_or_else(|| GalleryError::FrameNumbersExhausted(folder.clone()))?;
        let output_path = output_dir.join(format!("{}.jpg", number));
        std::fs::write(&output_path, image)?;
        self.counter.advance(&folder);

        let notes = notes.trim();
        if !notes.is_empty() {
            std::fs::write(output_dir.join(NOTES_FILE_NAME), notes)?;
        }

        log::info!("Quick saved frame {} to {}", number, output_path.display());
        Ok(QuickSaveOutcome {
            path: output_path,
            number,
            folder,
        })
    }

    /// Deletes the loaded video file after the user confirms.
    pub fn delete_original_video(&mut self) -> GalleryResult<()> {
        let Some(file_path) = self.state.current_video_file_path.clone() else {
            return Err(GalleryError::NoVideoLoaded);
        };

        let name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.display().to_string());
        if !self.host.confirm_delete(&name) {
            log::info!("Deletion of {} cancelled", file_path.display());
            return Err(GalleryError::Cancelled);
        }

        if let Err(e) = std::fs::remove_file(&file_path) {
            log::error!("Error deleting {}: {}", file_path.display(), e);
            return Err(e.into());
        }

        self.state.current_video_file_path = None;
        self.state.current_video_path = None;
        log::info!("Deleted original video {}", file_path.display());
        Ok(())
    }

    /// Lets the user choose the gallery root. Leaves `last_used_path` alone.
    pub fn select_gallery_directory(&mut self) -> Option<PathBuf> {
        let selected = self.host.pick_directory(self.state.last_used_path.as_deref())?;
        self.state.gallery_path = Some(selected.clone());
        self.persist();
        log::info!("Gallery folder set to {}", selected.display());
        Some(selected)
    }

    pub fn list_gallery(&self, root: Option<&Path>) -> GalleryResult<GalleryListing> {
        self.list_gallery_with(root, &FsListing)
    }

    pub fn list_gallery_with(
        &self,
        root: Option<&Path>,
        fs: &impl DirectoryListing,
    ) -> GalleryResult<GalleryListing> {
        let base_path = resolve_root(
            root,
            self.state.gallery_path.as_deref(),
            self.state.current_video_path.as_deref(),
        )
        .ok_or(GalleryError::NoGalleryConfigured)?;
        log::debug!(
            "Opening gallery at {} (gallery: {:?}, video folder: {:?})",
            base_path.display(),
            self.state.gallery_path,
            self.state.current_video_path
        );
        list_gallery(&base_path, fs)
    }

    /// Suggests `<video folder or last used folder>/<default_name>`.
    pub fn save_file_dialog(&self, default_name: &str) -> Option<PathBuf> {
        let default_path = self
            .state
            .current_video_path
            .as_ref()
            .or(self.state.last_used_path.as_ref())
            .map(|dir| dir.join(default_name))
            .unwrap_or_else(|| PathBuf::from(default_name));
        self.host.pick_save_path(&default_path)
    }

    pub fn save_file(&self, path: &Path, bytes: &[u8]) -> bool {
        match std::fs::write(path, bytes) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error saving file {}: {}", path.display(), e);
                false
            }
        }
    }

    pub fn save_crop_area(&self, crop_area: &serde_json::Value) -> anyhow::Result<()> {
        self.store.save_crop_area(crop_area).map_err(|e| {
            log::error!("Error saving crop area: {}", e);
            e
        })
    }

    pub fn load_crop_area(&self) -> Option<serde_json::Value> {
        self.store.load_crop_area()
    }

    /// Highest frame number already on disk in today's folder.
    pub fn existing_frames_today(&self) -> Option<u64> {
        let folder = self.today_folder()?;
        let entries = FsListing.list(&folder).ok()?;
        highest_frame_number(&entries)
    }

    /// Continues today's numbering after the highest file on disk instead
    /// of starting over at 1. Returns the number the next save will get.
    pub fn reconcile_frame_counter(&mut self) -> GalleryResult<u32> {
        if !self.state.has_video() {
            return Err(GalleryError::NoVideoLoaded);
        }
        let key = self.today_key();
        // The next number has to fit as well, so the highest file may be at
        // most u32::MAX - 1.
        let on_disk = match self.existing_frames_today() {
            Some(n) => u32::try_from(n)
                .ok()
                .filter(|n| *n < u32::MAX)
                .ok_or_else(|| {
                    log::warn!("Frame {} in {} is past the last usable number", n, key);
                    GalleryError::FrameNumbersExhausted(key.clone())
                })?,
            None => 0,
        };
        let current = self.counter.get(&key);
        if on_disk > current {
            log::info!("Frame counter for {} moved from {} to {}", key, current, on_disk);
            self.counter.set(&key, on_disk);
        }
        self.counter
            .peek_next(&key)
            .ok_or(GalleryError::FrameNumbersExhausted(key))
    }
}
