use egui::{ColorImage, Context, TextureHandle};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

const THUMBNAIL_SIZE: u32 = 96;

/// Gallery thumbnails as egui textures, least recently used evicted first.
///
/// Files that fail to decode are cached as `None` so they are not retried
/// every frame.
pub struct ThumbnailCache {
    textures: LruCache<PathBuf, Option<TextureHandle>>,
}

impl ThumbnailCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            textures: LruCache::new(capacity),
        }
    }

    pub fn get(&mut self, ctx: &Context, path: &Path) -> Option<TextureHandle> {
        if let Some(cached) = self.textures.get(path) {
            return cached.clone();
        }

        let texture = match load_thumbnail(path) {
            Ok(image) => Some(ctx.load_texture(
                path.to_string_lossy(),
                image,
                egui::TextureOptions::LINEAR,
            )),
            Err(e) => {
                log::warn!("Failed to load thumbnail for {}: {}", path.display(), e);
                None
            }
        };
        self.textures.put(path.to_path_buf(), texture.clone());
        texture
    }

    /// Drops everything, e.g. after the gallery is re-read from disk.
    pub fn clear(&mut self) {
        self.textures.clear();
    }
}

pub fn load_thumbnail(path: &Path) -> anyhow::Result<ColorImage> {
    let img = image::open(path)?.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE);
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        rgba.as_raw(),
    ))
}
