//! Numbered frame sequences with a JSON manifest.

use std::path::{Path, PathBuf};

use serde::Serialize;
use showroom_core::ExportError;
use tracing::info;

use crate::png::write_png;

/// File name of the manifest written next to the frames.
pub const MANIFEST_FILE: &str = "manifest.json";

/// File name of frame `index`.
pub fn frame_file_name(index: usize) -> String {
    format!("frame_{index:04}.png")
}

/// One written frame and the state it was rendered from.
#[derive(Debug, Clone, Serialize)]
pub struct FrameEntry<T> {
    pub index: usize,
    pub time: f32,
    pub file: String,
    #[serde(flatten)]
    pub info: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct Manifest<T> {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub frame_count: usize,
    pub frames: Vec<FrameEntry<T>>,
}

/// Writes `frame_NNNN.png` files into a directory and records them.
///
/// Call [`finish`](Self::finish) to write the manifest.
#[derive(Debug)]
pub struct FrameSequence<T> {
    dir: PathBuf,
    width: u32,
    height: u32,
    fps: u32,
    frames: Vec<FrameEntry<T>>,
}

impl<T: Serialize> FrameSequence<T> {
    /// Create the output directory if needed.
    pub fn create(dir: impl Into<PathBuf>, width: u32, height: u32, fps: u32) -> Result<Self, ExportError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, width, height, fps: fps.max(1), frames: Vec::new() })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Write the next frame. Returns its path.
    pub fn push(&mut self, pixels: &[u8], info: T) -> Result<PathBuf, ExportError> {
        let index = self.frames.len();
        let file = frame_file_name(index);
        let path = self.dir.join(&file);
        write_png(&path, pixels, self.width, self.height)?;

        self.frames.push(FrameEntry { index, time: index as f32 / self.fps as f32, file, info });
        Ok(path)
    }

    /// Write the manifest and return it with its path.
    pub fn finish(self) -> Result<(PathBuf, Manifest<T>), ExportError> {
        let manifest = Manifest {
            width: self.width,
            height: self.height,
            fps: self.fps,
            frame_count: self.frames.len(),
            frames: self.frames,
        };
        let json = serde_json::to_string_pretty(&manifest)
            .map_err(|e| ExportError::Manifest { reason: e.to_string() })?;

        let path = self.dir.join(MANIFEST_FILE);
        std::fs::write(&path, json)?;
        info!(path = %path.display(), frames = manifest.frame_count, "Wrote manifest");
        Ok((path, manifest))
    }
}
