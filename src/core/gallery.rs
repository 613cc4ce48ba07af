use crate::core::date_key::{folder_sort_key, is_date_folder};
use crate::core::error::{GalleryError, GalleryResult};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;
use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};

pub const NOTES_FILE_NAME: &str = "notas.txt";
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    pub name: String,
    pub is_dir: bool,
}

impl ListedEntry {
    pub fn dir(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_dir: true }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_dir: false }
    }
}

/// The filesystem capabilities the enumerator needs.
pub trait DirectoryListing {
    fn exists(&self, path: &Path) -> bool;
    fn list(&self, dir: &Path) -> io::Result<Vec<ListedEntry>>;
    fn read_text(&self, path: &Path) -> io::Result<String>;
}

/// `DirectoryListing` over the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsListing;

impl DirectoryListing for FsListing {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<ListedEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            entries.push(ListedEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: path.is_dir(),
            });
        }
        Ok(entries)
    }

    fn read_text(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// A date folder with at least one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryEntry {
    pub folder: String,
    pub folder_path: PathBuf,
    pub images: Vec<PathBuf>,
    pub count: usize,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryListing {
    pub data: Vec<GalleryEntry>,
    pub base_path: PathBuf,
}

/// Picks the first non-empty root: explicit, then gallery, then video folder.
pub fn resolve_root(
    explicit: Option<&Path>,
    gallery_path: Option<&Path>,
    video_path: Option<&Path>,
) -> Option<PathBuf> {
    [explicit, gallery_path, video_path]
        .into_iter()
        .flatten()
        .find(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

pub fn is_gallery_image(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Leading integer of the part before the first `.`, e.g. `12` for `12.jpg`.
pub fn frame_number(name: &str) -> Option<u64> {
    let stem = name.split('.').next().unwrap_or("");
    let digits: String = stem.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Numbered frames ascending, then unnumbered ones by name.
pub fn compare_frames(a: &str, b: &str) -> Ordering {
    match (frame_number(a), frame_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Date-named directories, newest first.
pub fn select_date_folders(entries: &[ListedEntry]) -> Vec<String> {
    let mut folders: Vec<String> = entries
        .iter()
        .filter(|e| e.is_dir && is_date_folder(&e.name))
        .map(|e| e.name.clone())
        .collect();
    folders.sort_by(|a, b| folder_sort_key(b).cmp(&folder_sort_key(a)));
    folders
}

/// Image files in frame order.
pub fn select_images(entries: &[ListedEntry]) -> Vec<String> {
    let mut images: Vec<String> = entries
        .iter()
        .filter(|e| !e.is_dir && is_gallery_image(&e.name))
        .map(|e| e.name.clone())
        .collect();
    images.sort_by(|a, b| compare_frames(a, b));
    images
}

pub fn highest_frame_number(entries: &[ListedEntry]) -> Option<u64> {
    entries
        .iter()
        .filter(|e| !e.is_dir && is_gallery_image(&e.name))
        .filter_map(|e| frame_number(&e.name))
        .max()
}

/// Scans `root` for date folders and loads each one's images and notes.
pub fn list_gallery(root: &Path, fs: &impl DirectoryListing) -> GalleryResult<GalleryListing> {
    if root.as_os_str().is_empty() || !fs.exists(root) {
        return Err(GalleryError::NoGalleryConfigured);
    }

    let folders = select_date_folders(&fs.list(root)?);
    let mut data = Vec::new();

    for folder in folders {
        let folder_path = root.join(&folder);
        let files = fs.list(&folder_path)?;
        let images = select_images(&files);
        if images.is_empty() {
            log::debug!("Skipping {} (no images)", folder_path.display());
            continue;
        }

        let notes = read_notes(fs, &folder_path, &files);
        data.push(GalleryEntry {
            count: images.len(),
            images: images.iter().map(|img| folder_path.join(img)).collect(),
            folder,
            folder_path,
            notes,
        });
    }

    log::info!("Gallery at {} has {} date folders", root.display(), data.len());
    Ok(GalleryListing {
        data,
        base_path: root.to_path_buf(),
    })
}

/// Reads an image as a `data:` URI for the gallery viewer.
pub fn read_image_as_data_uri(path: &Path) -> GalleryResult<String> {
    let bytes = std::fs::read(path).map_err(|e| {
        log::error!("Error reading image {}: {}", path.display(), e);
        e
    })?;
    let is_png = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    let mime = if is_png { "image/png" } else { "image/jpeg" };
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

fn read_notes(fs: &impl DirectoryListing, folder_path: &Path, files: &[ListedEntry]) -> String {
    if !files.iter().any(|e| !e.is_dir && e.name == NOTES_FILE_NAME) {
        return String::new();
    }
    let notes_path = folder_path.join(NOTES_FILE_NAME);
    fs.read_text(&notes_path).unwrap_or_else(|e| {
        log::warn!("Failed to read notes {}: {}", notes_path.display(), e);
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory tree: directory path -> children, file path -> text.
    #[derive(Default)]
    struct MemoryListing {
        dirs: HashMap<PathBuf, Vec<ListedEntry>>,
        texts: HashMap<PathBuf, String>,
    }

    impl MemoryListing {
        fn with_dir(mut self, path: &str, entries: Vec<ListedEntry>) -> Self {
            self.dirs.insert(PathBuf::from(path), entries);
            self
        }

        fn with_text(mut self, path: &str, text: &str) -> Self {
            self.texts.insert(PathBuf::from(path), text.to_string());
            self
        }
    }

    impl DirectoryListing for MemoryListing {
        fn exists(&self, path: &Path) -> bool {
            self.dirs.contains_key(path) || self.texts.contains_key(path)
        }

        fn list(&self, dir: &Path) -> io::Result<Vec<ListedEntry>> {
            self.dirs
                .get(dir)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such directory"))
        }

        fn read_text(&self, path: &Path) -> io::Result<String> {
            self.texts
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::PermissionDenied, "unreadable"))
        }
    }

    #[test]
    fn test_resolve_root_order() {
        let explicit = PathBuf::from("/explicit");
        let gallery = PathBuf::from("/gallery");
        let video = PathBuf::from("/video");
        let empty = PathBuf::new();

        assert_eq!(resolve_root(Some(&explicit), Some(&gallery), Some(&video)), Some(explicit.clone()));
        assert_eq!(resolve_root(None, Some(&gallery), Some(&video)), Some(gallery.clone()));
        assert_eq!(resolve_root(Some(&empty), None, Some(&video)), Some(video.clone()));
        assert_eq!(resolve_root(None, None, None), None);
    }

    #[test]
    fn test_image_extension_is_case_insensitive() {
        assert!(is_gallery_image("1.jpg"));
        assert!(is_gallery_image("2.JPEG"));
        assert!(is_gallery_image("shot.Png"));
        assert!(!is_gallery_image("notas.txt"));
        assert!(!is_gallery_image("clip.mp4"));
        assert!(!is_gallery_image("jpg"));
    }

    #[test]
    fn test_frame_number_prefix() {
        assert_eq!(frame_number("10.jpg"), Some(10));
        assert_eq!(frame_number("3.edited.png"), Some(3));
        assert_eq!(frame_number("7a.jpg"), Some(7));
        assert_eq!(frame_number("cover.jpg"), None);
    }

    #[test]
    fn test_images_sort_numerically() {
        let entries = vec![
            ListedEntry::file("2.jpg"),
            ListedEntry::file("10.jpg"),
            ListedEntry::file("1.jpg"),
        ];
        assert_eq!(select_images(&entries), vec!["1.jpg", "2.jpg", "10.jpg"]);
    }

    #[test]
    fn test_unnumbered_images_sort_last() {
        let entries = vec![
            ListedEntry::file("cover.png"),
            ListedEntry::file("3.jpg"),
            ListedEntry::file("notas.txt"),
            ListedEntry::dir("9.jpg"),
            ListedEntry::file("1.jpg"),
        ];
        assert_eq!(select_images(&entries), vec!["1.jpg", "3.jpg", "cover.png"]);
    }

    #[test]
    fn test_folders_filtered_and_newest_first() {
        let entries = vec![
            ListedEntry::dir("15-06-2023"),
            ListedEntry::dir("foo"),
            ListedEntry::dir("1-1-2024"),
            ListedEntry::dir("01-01-2024"),
            ListedEntry::file("02-01-2024"),
            ListedEntry::dir("31-13-2024"),
        ];
        assert_eq!(
            select_date_folders(&entries),
            vec!["31-13-2024", "01-01-2024", "15-06-2023"]
        );
    }

    #[test]
    fn test_highest_frame_number() {
        let entries = vec![
            ListedEntry::file("2.jpg"),
            ListedEntry::file("12.png"),
            ListedEntry::file("40.txt"),
            ListedEntry::file("cover.jpg"),
        ];
        assert_eq!(highest_frame_number(&entries), Some(12));
        assert_eq!(highest_frame_number(&[ListedEntry::file("notas.txt")]), None);
    }

    #[test]
    fn test_list_gallery_builds_entries() {
        let fs = MemoryListing::default()
            .with_dir(
                "/g",
                vec![
                    ListedEntry::dir("15-06-2023"),
                    ListedEntry::dir("01-01-2024"),
                    ListedEntry::dir("random"),
                ],
            )
            .with_dir(
                "/g/01-01-2024",
                vec![
                    ListedEntry::file("10.jpg"),
                    ListedEntry::file("2.jpg"),
                    ListedEntry::file("notas.txt"),
                ],
            )
            .with_dir("/g/15-06-2023", vec![ListedEntry::file("1.png")])
            .with_text("/g/01-01-2024/notas.txt", "new year");

        let listing = list_gallery(Path::new("/g"), &fs).unwrap();
        assert_eq!(listing.base_path, PathBuf::from("/g"));
        assert_eq!(listing.data.len(), 2);

        let first = &listing.data[0];
        assert_eq!(first.folder, "01-01-2024");
        assert_eq!(first.folder_path, PathBuf::from("/g/01-01-2024"));
        assert_eq!(
            first.images,
            vec![PathBuf::from("/g/01-01-2024/2.jpg"), PathBuf::from("/g/01-01-2024/10.jpg")]
        );
        assert_eq!(first.count, 2);
        assert_eq!(first.notes, "new year");

        let second = &listing.data[1];
        assert_eq!(second.folder, "15-06-2023");
        assert_eq!(second.notes, "");
    }

    #[test]
    fn test_folder_with_only_notes_is_omitted() {
        let fs = MemoryListing::default()
            .with_dir("/g", vec![ListedEntry::dir("01-01-2024")])
            .with_dir("/g/01-01-2024", vec![ListedEntry::file("notas.txt")])
            .with_text("/g/01-01-2024/notas.txt", "orphaned");

        let listing = list_gallery(Path::new("/g"), &fs).unwrap();
        assert!(listing.data.is_empty());
    }

    #[test]
    fn test_unreadable_notes_default_to_empty() {
        let fs = MemoryListing::default()
            .with_dir("/g", vec![ListedEntry::dir("01-01-2024")])
            .with_dir(
                "/g/01-01-2024",
                vec![ListedEntry::file("1.jpg"), ListedEntry::file("notas.txt")],
            );

        let listing = list_gallery(Path::new("/g"), &fs).unwrap();
        assert_eq!(listing.data[0].notes, "");
    }

    #[test]
    fn test_missing_root_is_not_configured() {
        let fs = MemoryListing::default();
        let err = list_gallery(Path::new("/nowhere"), &fs).unwrap_err();
        assert!(matches!(err, GalleryError::NoGalleryConfigured));

        let err = list_gallery(Path::new(""), &fs).unwrap_err();
        assert!(matches!(err, GalleryError::NoGalleryConfigured));
    }

    #[test]
    fn test_data_uri_mime_follows_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let png = dir.path().join("1.PNG");
        let jpg = dir.path().join("2.jpg");
        std::fs::write(&png, b"abc").unwrap();
        std::fs::write(&jpg, b"abc").unwrap();

        assert_eq!(read_image_as_data_uri(&png).unwrap(), "data:image/png;base64,YWJj");
        assert_eq!(read_image_as_data_uri(&jpg).unwrap(), "data:image/jpeg;base64,YWJj");
        assert!(matches!(
            read_image_as_data_uri(&dir.path().join("missing.jpg")),
            Err(GalleryError::Filesystem(_))
        ));
    }

    #[test]
    fn test_list_gallery_on_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let day = dir.path().join("17-08-2025");
        std::fs::create_dir_all(&day).unwrap();
        std::fs::write(day.join("1.jpg"), b"a").unwrap();
        std::fs::write(day.join("2.JPG"), b"b").unwrap();
        std::fs::write(day.join(NOTES_FILE_NAME), "trip").unwrap();
        std::fs::create_dir_all(dir.path().join("18-08-2025")).unwrap();
        std::fs::write(dir.path().join("18-08-2025").join(NOTES_FILE_NAME), "empty day").unwrap();
        std::fs::write(dir.path().join("19-08-2025"), b"not a folder").unwrap();

        let listing = list_gallery(dir.path(), &FsListing).unwrap();
        assert_eq!(listing.data.len(), 1);
        assert_eq!(listing.data[0].folder, "17-08-2025");
        assert_eq!(listing.data[0].count, 2);
        assert_eq!(listing.data[0].notes, "trip");
    }
}
