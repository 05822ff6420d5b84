//! Still-frame loading for form analysis.
//!
//! Images are read as-is. For video files one JPEG frame is grabbed with
//! `ffmpeg` at the requested offset; nothing else about the video is used.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use fs_err as fs;
use std::io;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::errors::{CoachError, CoachResult};
use crate::wire::InlineImage;

const VIDEO_EXTS: &[&str] = &["mp4", "mov", "m4v", "webm", "mkv", "avi"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Jpeg,
    Png,
    Webp,
    Video,
}

pub fn classify(path: &Path) -> CoachResult<SourceKind> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => Ok(SourceKind::Jpeg),
        "png" => Ok(SourceKind::Png),
        "webp" => Ok(SourceKind::Webp),
        e if VIDEO_EXTS.contains(&e) => Ok(SourceKind::Video),
        _ => Err(CoachError::Frame(format!("unsupported file type: {}", path.display()))),
    }
}

/// Load one frame from `path` and encode it for the gateway.
pub async fn load_frame(path: &Path, at_secs: f64) -> CoachResult<InlineImage> {
    let kind = classify(path)?;
    let (mime, bytes) = match kind {
        SourceKind::Jpeg => ("image/jpeg", read_image(path)?),
        SourceKind::Png => ("image/png", read_image(path)?),
        SourceKind::Webp => ("image/webp", read_image(path)?),
        SourceKind::Video => ("image/jpeg", grab_video_frame(path, at_secs).await?),
    };
    if bytes.is_empty() {
        return Err(CoachError::Frame(format!("no image data in {}", path.display())));
    }
    debug!(path = %path.display(), bytes = bytes.len(), mime, "frame loaded");
    Ok(InlineImage { mime_type: mime.into(), data: STANDARD.encode(bytes) })
}

fn read_image(path: &Path) -> CoachResult<Vec<u8>> {
    fs::read(path).map_err(|e| CoachError::Frame(e.to_string()))
}

async fn grab_video_frame(path: &Path, at_secs: f64) -> CoachResult<Vec<u8>> {
    if !path.is_file() {
        return Err(CoachError::Frame(format!("no such file: {}", path.display())));
    }
    let mut c = Command::new("ffmpeg");
    c.args(["-v", "error", "-ss"])
        .arg(format!("{:.3}", at_secs.max(0.0)))
        .arg("-i")
        .arg(path)
        .args(["-frames:v", "1", "-f", "image2", "-c:v", "mjpeg", "pipe:1"]);
    c.stdout(Stdio::piped()).stderr(Stdio::piped()).kill_on_drop(true);

    let out = c.output().await.map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CoachError::Frame("ffmpeg is required to read video files".into()),
        _ => CoachError::Frame(format!("failed to spawn ffmpeg: {e}")),
    })?;
    if !out.status.success() {
        return Err(CoachError::Frame(format!(
            "ffmpeg exited with {}: {}",
            out.status.code().unwrap_or_default(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    Ok(out.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_extension() {
        assert_eq!(classify(Path::new("a/b.JPG")).unwrap(), SourceKind::Jpeg);
        assert_eq!(classify(Path::new("clip.mp4")).unwrap(), SourceKind::Video);
        assert_eq!(classify(Path::new("x.png")).unwrap(), SourceKind::Png);
        assert!(classify(Path::new("notes.txt")).is_err());
        assert!(classify(Path::new("noext")).is_err());
    }

    #[tokio::test]
    async fn jpeg_file_is_base64_encoded() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("frame.jpg");
        std::fs::write(&p, [0xFFu8, 0xD8, 0xFF, 0xE0]).unwrap();
        let img = load_frame(&p, 0.0).await.unwrap();
        assert_eq!(img.mime_type, "image/jpeg");
        assert_eq!(img.data, "/9j/4A==");
    }

    #[tokio::test]
    async fn empty_image_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("blank.png");
        std::fs::write(&p, b"").unwrap();
        assert!(matches!(load_frame(&p, 0.0).await, Err(CoachError::Frame(_))));
    }

    #[tokio::test]
    async fn missing_video_fails_before_spawning() {
        let err = load_frame(Path::new("/definitely/not/here.mp4"), 1.0).await.unwrap_err();
        assert!(matches!(err, CoachError::Frame(ref m) if m.contains("no such file")));
    }
}
