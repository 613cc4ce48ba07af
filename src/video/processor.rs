use std::path::Path;
use std::process::Command;

/// Pulls single frames out of a video with the ffmpeg tools on `PATH`.
pub struct FrameGrabber;

impl FrameGrabber {
    pub fn probe_duration(file_path: &Path) -> anyhow::Result<f64> {
        let output = Command::new("ffprobe")
            .arg("-v").arg("quiet")
            .arg("-print_format").arg("json")
            .arg("-show_format")
            .arg(file_path)
            .output()?;

        if !output.status.success() {
            return Err(anyhow::anyhow!("ffprobe failed for {}", file_path.display()));
        }

        let json_str = String::from_utf8(output.stdout)?;
        Self::parse_duration(&json_str)
            .ok_or_else(|| anyhow::anyhow!("No duration reported for {}", file_path.display()))
    }

    pub fn parse_duration(ffprobe_json: &str) -> Option<f64> {
        let info: serde_json::Value = serde_json::from_str(ffprobe_json).ok()?;
        info["format"]["duration"]
            .as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d >= 0.0)
    }

    /// One frame at `seconds`, JPEG encoded on ffmpeg's stdout.
    pub fn grab_jpeg(file_path: &Path, seconds: f64) -> anyhow::Result<Vec<u8>> {
        let output = Command::new("ffmpeg")
            .arg("-ss").arg(format!("{:.3}", seconds.max(0.0)))
            .arg("-i").arg(file_path)
            .arg("-frames:v").arg("1")
            .arg("-f").arg("image2pipe")
            .arg("-vcodec").arg("mjpeg")
            .arg("-q:v").arg("2")
            .arg("-")
            .output()?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow::anyhow!("Frame extraction failed: {}", error));
        }
        if output.stdout.is_empty() {
            return Err(anyhow::anyhow!(
                "No frame at {:.3}s in {}",
                seconds,
                file_path.display()
            ));
        }

        log::debug!(
            "Grabbed {} bytes at {:.3}s from {}",
            output.stdout.len(),
            seconds,
            file_path.display()
        );
        Ok(output.stdout)
    }

    /// Suggested name for "save frame as", e.g. `holiday_12.5s.jpg`.
    pub fn frame_file_name(video_path: &Path, seconds: f64) -> String {
        let stem = video_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("frame");
        format!("{}_{:.1}s.jpg", stem, seconds)
    }
}
