// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The selected-media slot of the home screen.
//!
//! Browse, drag-and-drop and camera captures all end up here. At most one
//! asset is selected; selecting another replaces it.

use crate::models::media::{MediaAsset, MediaFile};

#[derive(Debug, Default)]
pub struct MediaSelection {
    selected: Option<MediaAsset>,
}

impl MediaSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `file` if it is an image or video. Other files are ignored
    /// without error. Returns whether the file was accepted.
    pub fn select(&mut self, file: MediaFile) -> bool {
        let name = file.name.clone();
        let mime = file.mime.clone();
        match MediaAsset::from_file(file) {
            Some(asset) => {
                self.select_asset(asset);
                true
            }
            None => {
                log::debug!("Ignoring unsupported file {} ({})", name, mime);
                false
            }
        }
    }

    /// Select the first image or video among `files`; the rest are dropped.
    pub fn select_first(&mut self, files: impl IntoIterator<Item = MediaFile>) -> bool {
        match files.into_iter().find(|f| f.kind().is_some()) {
            Some(file) => self.select(file),
            None => {
                log::debug!("No supported file in drop");
                false
            }
        }
    }

    /// Select an asset produced elsewhere (camera capture).
    pub fn select_asset(&mut self, asset: MediaAsset) {
        log::info!(
            "Selected {} ({}, {:.2} MB)",
            asset.name(),
            asset.kind(),
            asset.size_mb()
        );
        self.selected = Some(asset);
    }

    pub fn clear(&mut self) -> Option<MediaAsset> {
        self.selected.take()
    }

    pub fn selected(&self) -> Option<&MediaAsset> {
        self.selected.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, mime: &str) -> MediaFile {
        MediaFile::new(name, mime, vec![0u8; 16])
    }

    #[test]
    fn test_select_and_clear() {
        let mut selection = MediaSelection::new();
        assert!(selection.select(file("a.mp4", "video/mp4")));
        assert_eq!(selection.selected().unwrap().name(), "a.mp4");

        let cleared = selection.clear();
        assert!(cleared.is_some());
        assert!(selection.is_empty());
        assert!(selection.clear().is_none());
    }

    #[test]
    fn test_unsupported_file_is_ignored() {
        let mut selection = MediaSelection::new();
        assert!(selection.select(file("a.png", "image/png")));
        assert!(!selection.select(file("doc.pdf", "application/pdf")));
        // Previous selection survives a rejected file
        assert_eq!(selection.selected().unwrap().name(), "a.png");
    }

    #[test]
    fn test_new_selection_replaces_previous() {
        let mut selection = MediaSelection::new();
        selection.select(file("a.png", "image/png"));
        let first = selection.selected().unwrap().id();
        selection.select(file("b.png", "image/png"));
        assert_ne!(selection.selected().unwrap().id(), first);
    }

    #[test]
    fn test_multi_file_drop_takes_first_valid() {
        let mut selection = MediaSelection::new();
        let accepted = selection.select_first(vec![
            file("readme.txt", "text/plain"),
            file("clip.webm", "video/webm"),
            file("photo.jpg", "image/jpeg"),
        ]);
        assert!(accepted);
        assert_eq!(selection.selected().unwrap().name(), "clip.webm");

        let mut empty = MediaSelection::new();
        assert!(!empty.select_first(vec![file("a.zip", "application/zip")]));
        assert!(empty.is_empty());
    }
}
