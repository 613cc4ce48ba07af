use crate::host::Host;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Host that replays canned answers and records what it was asked.
#[derive(Default)]
pub struct ScriptedHost {
    pub videos: RefCell<VecDeque<Option<PathBuf>>>,
    pub directories: RefCell<VecDeque<Option<PathBuf>>>,
    pub save_paths: RefCell<VecDeque<Option<PathBuf>>>,
    pub confirmations: RefCell<VecDeque<bool>>,
    pub default_dirs: RefCell<Vec<Option<PathBuf>>>,
    pub save_defaults: RefCell<Vec<PathBuf>>,
    pub confirm_prompts: RefCell<Vec<String>>,
}

impl ScriptedHost {
    pub fn answer_video(&self, path: Option<PathBuf>) {
        self.videos.borrow_mut().push_back(path);
    }

    pub fn answer_directory(&self, path: Option<PathBuf>) {
        self.directories.borrow_mut().push_back(path);
    }

    pub fn answer_save_path(&self, path: Option<PathBuf>) {
        self.save_paths.borrow_mut().push_back(path);
    }

    pub fn answer_confirm(&self, confirmed: bool) {
        self.confirmations.borrow_mut().push_back(confirmed);
    }
}

impl Host for ScriptedHost {
    fn pick_video_file(&self, default_dir: Option<&Path>) -> Option<PathBuf> {
        self.default_dirs.borrow_mut().push(default_dir.map(Path::to_path_buf));
        self.videos.borrow_mut().pop_front().flatten()
    }

    fn pick_directory(&self, default_dir: Option<&Path>) -> Option<PathBuf> {
        self.default_dirs.borrow_mut().push(default_dir.map(Path::to_path_buf));
        self.directories.borrow_mut().pop_front().flatten()
    }

    fn pick_save_path(&self, default_path: &Path) -> Option<PathBuf> {
        self.save_defaults.borrow_mut().push(default_path.to_path_buf());
        self.save_paths.borrow_mut().pop_front().flatten()
    }

    fn confirm_delete(&self, file_name: &str) -> bool {
        self.confirm_prompts.borrow_mut().push(file_name.to_string());
        self.confirmations.borrow_mut().pop_front().unwrap_or(false)
    }
}
