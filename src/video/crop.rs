use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

const JPEG_QUALITY: u8 = 92;

/// Crop rectangle in source pixels.
///
/// The persisted crop document is opaque JSON; this is just the shape the
/// shell knows how to apply. Extra keys in the document are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value::<Self>(value.clone())
            .ok()
            .filter(|r| r.width > 0.0 && r.height > 0.0)
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "x": self.x,
            "y": self.y,
            "width": self.width,
            "height": self.height,
        })
    }

    /// `(x, y, width, height)` clipped to an image of the given size.
    pub fn clamp_to(&self, image_width: u32, image_height: u32) -> Option<(u32, u32, u32, u32)> {
        let left = self.x.max(0.0).round() as u32;
        let top = self.y.max(0.0).round() as u32;
        let right = ((self.x + self.width).round().max(0.0) as u32).min(image_width);
        let bottom = ((self.y + self.height).round().max(0.0) as u32).min(image_height);
        if right <= left || bottom <= top {
            return None;
        }
        Some((left, top, right - left, bottom - top))
    }

    /// Crops an encoded frame and re-encodes it as JPEG.
    pub fn apply(&self, encoded: &[u8]) -> anyhow::Result<Vec<u8>> {
        let img = image::load_from_memory(encoded)?;
        let (x, y, width, height) = self
            .clamp_to(img.width(), img.height())
            .ok_or_else(|| anyhow::anyhow!("Crop area lies outside the {}x{} frame", img.width(), img.height()))?;
        encode_jpeg(&img.crop_imm(x, y, width, height))
    }
}

pub fn encode_jpeg(img: &DynamicImage) -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY))?;
    Ok(buf)
}
