// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Preview display handles and video playback state.
//!
//! A display handle is acquired from a [`PreviewBackend`] when the shown
//! asset changes and released when it changes again, when the preview is
//! cleared, or when the renderer is dropped. Each handle is released
//! exactly once.

use crate::models::media::{AssetId, MediaAsset};
use std::time::Duration;

/// Source of display handles (textures in the GUI, counters in tests).
pub trait PreviewBackend {
    type Handle;

    fn acquire(&mut self, asset: &MediaAsset) -> Self::Handle;
    fn release(&mut self, handle: Self::Handle);

    /// Length of a playable handle; `None` for stills and unknown lengths.
    fn playback_length(&self, _handle: &Self::Handle) -> Option<Duration> {
        None
    }
}

/// Play/pause clock of a video preview.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playback {
    playing: bool,
    position: Duration,
    length: Option<Duration>,
}

impl Playback {
    fn new(length: Option<Duration>) -> Self {
        Self {
            playing: false,
            position: Duration::ZERO,
            length,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn length(&self) -> Option<Duration> {
        self.length
    }

    pub fn play(&mut self) {
        if self.length.is_some_and(|len| self.position >= len) {
            self.position = Duration::ZERO;
        }
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Seek to zero and resume.
    pub fn restart(&mut self) {
        self.position = Duration::ZERO;
        self.playing = true;
    }

    /// Advance the clock; playback stops at the end.
    pub fn advance(&mut self, dt: Duration) {
        if !self.playing {
            return;
        }
        self.position += dt;
        if let Some(length) = self.length {
            if self.position >= length {
                self.position = length;
                self.playing = false;
            }
        }
    }
}

pub struct PreviewRenderer<B: PreviewBackend> {
    backend: B,
    current: Option<(AssetId, B::Handle)>,
    playback: Playback,
}

impl<B: PreviewBackend> PreviewRenderer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            current: None,
            playback: Playback::default(),
        }
    }

    /// Show `asset`. A new handle is acquired only when the asset identity
    /// changes; the previous handle is released first.
    pub fn sync(&mut self, asset: Option<&MediaAsset>) {
        let wanted = asset.map(MediaAsset::id);
        if self.current.as_ref().map(|(id, _)| *id) == wanted {
            return;
        }
        self.release();
        if let Some(asset) = asset {
            let handle = self.backend.acquire(asset);
            self.playback = Playback::new(self.backend.playback_length(&handle));
            self.current = Some((asset.id(), handle));
        }
    }

    /// Release the current handle, if any.
    pub fn release(&mut self) {
        if let Some((_, handle)) = self.current.take() {
            self.backend.release(handle);
        }
        self.playback = Playback::default();
    }

    pub fn handle(&self) -> Option<&B::Handle> {
        self.current.as_ref().map(|(_, handle)| handle)
    }

    pub fn handle_mut(&mut self) -> Option<&mut B::Handle> {
        self.current.as_mut().map(|(_, handle)| handle)
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut Playback {
        &mut self.playback
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: PreviewBackend> Drop for PreviewRenderer<B> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::MediaFile;
    use crate::selection::MediaSelection;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    /// Issues numbered handles and counts releases per handle.
    #[derive(Default)]
    struct CountingBackend {
        next: u32,
        releases: Rc<RefCell<HashMap<u32, u32>>>,
    }

    impl PreviewBackend for CountingBackend {
        type Handle = u32;

        fn acquire(&mut self, _asset: &MediaAsset) -> u32 {
            self.next += 1;
            self.next
        }

        fn release(&mut self, handle: u32) {
            *self.releases.borrow_mut().entry(handle).or_insert(0) += 1;
        }
    }

    fn media(name: &str, mime: &str) -> MediaFile {
        MediaFile::new(name, mime, vec![1u8; 8])
    }

    #[test]
    fn test_select_then_clear_releases_handle_once() {
        for (name, mime) in [("a.png", "image/png"), ("b.mp4", "video/mp4"), ("c.jpg", "image/jpeg")] {
            let releases = Rc::new(RefCell::new(HashMap::new()));
            let backend = CountingBackend {
                next: 0,
                releases: releases.clone(),
            };
            let mut preview = PreviewRenderer::new(backend);
            let mut selection = MediaSelection::new();

            assert!(selection.select(media(name, mime)));
            preview.sync(selection.selected());
            preview.sync(selection.selected());
            assert_eq!(preview.handle(), Some(&1));

            selection.clear();
            preview.sync(selection.selected());
            assert!(selection.is_empty());
            assert!(preview.handle().is_none());

            drop(preview);
            assert_eq!(*releases.borrow(), HashMap::from([(1, 1)]));
        }
    }

    #[test]
    fn test_replacing_asset_releases_previous() {
        let releases = Rc::new(RefCell::new(HashMap::new()));
        let mut preview = PreviewRenderer::new(CountingBackend {
            next: 0,
            releases: releases.clone(),
        });
        let mut selection = MediaSelection::new();

        selection.select(media("a.png", "image/png"));
        preview.sync(selection.selected());
        selection.select(media("b.png", "image/png"));
        preview.sync(selection.selected());

        assert_eq!(preview.handle(), Some(&2));
        assert_eq!(*releases.borrow(), HashMap::from([(1, 1)]));

        // Teardown releases the live handle
        drop(preview);
        assert_eq!(*releases.borrow(), HashMap::from([(1, 1), (2, 1)]));
    }

    #[test]
    fn test_playback_controls() {
        let mut playback = Playback::new(Some(Duration::from_secs(2)));
        playback.toggle();
        assert!(playback.is_playing());
        playback.advance(Duration::from_millis(1500));
        playback.pause();
        playback.advance(Duration::from_secs(5));
        assert_eq!(playback.position(), Duration::from_millis(1500));

        playback.restart();
        assert!(playback.is_playing());
        assert_eq!(playback.position(), Duration::ZERO);

        playback.advance(Duration::from_secs(3));
        assert!(!playback.is_playing());
        assert_eq!(playback.position(), Duration::from_secs(2));

        // Playing after the end starts over
        playback.play();
        assert_eq!(playback.position(), Duration::ZERO);
    }

    #[test]
    fn test_playback_without_length_runs_on() {
        let mut playback = Playback::new(None);
        playback.play();
        playback.advance(Duration::from_secs(100));
        assert!(playback.is_playing());
        assert_eq!(playback.position(), Duration::from_secs(100));
    }
}
