// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading (images and videos).
//!
//! This module reads files picked or dropped by the user, derives their
//! MIME type, decodes images for display, and encodes/splits the JPEG
//! frames used by camera captures and recordings.

use crate::capture::Frame;
use crate::error::MediaError;
use crate::models::media::{MediaFile, MOTION_JPEG_MIME};
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use std::ops::Range;
use std::path::Path;

/// Extensions offered by the file picker.
pub const MEDIA_EXTENSIONS: [&str; 14] = [
    "jpg", "jpeg", "png", "bmp", "gif", "webp", "tif", "tiff", "mp4", "avi", "mov", "webm", "mkv",
    "mjpeg",
];

/// Derive a MIME type from the file extension.
pub fn mime_from_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("bmp") => "image/bmp",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("mp4") | Some("m4v") => "video/mp4",
        Some("avi") => "video/x-msvideo",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("mjpeg") | Some("mjpg") => MOTION_JPEG_MIME,
        _ => "application/octet-stream",
    }
}

/// Read a file from disk into a [`MediaFile`].
pub fn read_media_file(path: &Path) -> Result<MediaFile, MediaError> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    Ok(MediaFile::new(name, mime_from_path(path), bytes))
}

/// Convert a file dropped on the window. The platform MIME type wins when
/// present; otherwise it is derived from the path.
pub fn media_file_from_dropped(file: &egui::DroppedFile) -> Result<MediaFile, MediaError> {
    let path = file.path.as_deref();
    let name = if !file.name.is_empty() {
        file.name.clone()
    } else {
        path.and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    };
    let mime = if !file.mime.is_empty() {
        file.mime.clone()
    } else {
        path.map(mime_from_path).unwrap_or("application/octet-stream").to_string()
    };
    let bytes = match (&file.bytes, path) {
        (Some(bytes), _) => bytes.clone(),
        (None, Some(path)) => std::fs::read(path)?.into(),
        (None, None) => return Err(MediaError::UnsupportedFile(name)),
    };
    Ok(MediaFile { name, mime, bytes })
}

/// Decoded RGBA image ready to upload as a texture.
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decode an encoded image (any format the `image` crate reads).
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, MediaError> {
    let img = image::load_from_memory(bytes).map_err(|e| MediaError::Decode(e.to_string()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Encode an RGB frame as JPEG.
pub fn encode_jpeg(frame: &Frame, quality: u8) -> Result<Vec<u8>, MediaError> {
    let expected = frame.width as usize * frame.height as usize * 3;
    if frame.rgb.len() != expected {
        return Err(MediaError::Decode(format!(
            "frame buffer is {} bytes, expected {}",
            frame.rgb.len(),
            expected
        )));
    }
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality)
        .encode(&frame.rgb, frame.width, frame.height, ExtendedColorType::Rgb8)
        .map_err(|e| MediaError::Decode(e.to_string()))?;
    Ok(jpeg)
}

/// Byte ranges of the JPEG frames (SOI ... EOI) in a Motion-JPEG stream.
pub fn motion_jpeg_frames(bytes: &[u8]) -> Vec<Range<usize>> {
    const SOI: [u8; 2] = [0xFF, 0xD8];
    const EOI: [u8; 2] = [0xFF, 0xD9];

    let mut frames = Vec::new();
    let mut pos = 0;
    while let Some(start) = find(&bytes[pos..], &SOI).map(|i| pos + i) {
        match find(&bytes[start + 2..], &EOI) {
            Some(end) => {
                let end = start + 2 + end + 2;
                frames.push(start..end);
                pos = end;
            }
            None => break,
        }
    }
    frames
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn frame(width: u32, height: u32, value: u8) -> Frame {
        Frame {
            width,
            height,
            rgb: vec![value; (width * height * 3) as usize],
        }
    }

    #[test]
    fn test_mime_from_path() {
        assert_eq!(mime_from_path(&PathBuf::from("a/b/sample.JPG")), "image/jpeg");
        assert_eq!(mime_from_path(&PathBuf::from("clip.mp4")), "video/mp4");
        assert_eq!(mime_from_path(&PathBuf::from("rec.mjpeg")), MOTION_JPEG_MIME);
        assert_eq!(mime_from_path(&PathBuf::from("notes.txt")), "application/octet-stream");
        assert_eq!(mime_from_path(&PathBuf::from("no_extension")), "application/octet-stream");
    }

    #[test]
    fn test_read_media_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.webm");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let file = read_media_file(&path).unwrap();
        assert_eq!(file.name, "clip.webm");
        assert_eq!(file.mime, "video/webm");
        assert_eq!(&*file.bytes, &[1u8, 2, 3]);
    }

    #[test]
    fn test_jpeg_encode_decode() {
        let jpeg = encode_jpeg(&frame(8, 6, 128), 90).unwrap();
        let decoded = decode_image(&jpeg).unwrap();
        assert_eq!((decoded.width, decoded.height), (8, 6));
        assert_eq!(decoded.pixels.len(), 8 * 6 * 4);
    }

    #[test]
    fn test_encode_rejects_short_buffer() {
        let mut bad = frame(4, 4, 0);
        bad.rgb.truncate(10);
        assert!(encode_jpeg(&bad, 90).is_err());
    }

    #[test]
    fn test_motion_jpeg_frames() {
        let a = encode_jpeg(&frame(4, 4, 10), 90).unwrap();
        let b = encode_jpeg(&frame(4, 4, 200), 90).unwrap();
        let mut stream = a.clone();
        stream.extend_from_slice(&b);
        // Trailing garbage without an end marker is ignored
        stream.extend_from_slice(&[0xFF, 0xD8, 0x00]);

        let frames = motion_jpeg_frames(&stream);
        assert_eq!(frames.len(), 2);
        assert_eq!(&stream[frames[0].clone()], a.as_slice());
        assert_eq!(&stream[frames[1].clone()], b.as_slice());
        assert!(motion_jpeg_frames(&[]).is_empty());
    }
}
