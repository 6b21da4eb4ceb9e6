//! PNG output of a [`Raster`], as single images or numbered sequences.
//!
//! Feature-gated behind `png` so the browser host can depend on this crate
//! without pulling in `image`.

use drift_core::color::Srgb;
use drift_core::error::DriftError;
use drift_core::raster::Raster;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use crate::pixel::raster_to_rgba;

/// Writes a raster as an opaque PNG, flattened onto `background`.
///
/// Returns `DriftError::InvalidDimensions` if the raster dimensions overflow
/// `u32`, or `DriftError::Io` on write failure.
pub fn write_png(raster: &Raster, background: Srgb, path: &Path) -> Result<(), DriftError> {
    let rgba = raster_to_rgba(raster, background);
    let w = u32::try_from(raster.pixel_width()).map_err(|_| DriftError::InvalidDimensions)?;
    let h = u32::try_from(raster.pixel_height()).map_err(|_| DriftError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| DriftError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path)
        .map_err(|e| DriftError::Io(format!("{}: {e}", path.display())))
}

/// Writes every `every`-th frame into a directory as `frame_NNNNN.png`.
#[derive(Debug)]
pub struct FrameSequence {
    dir: PathBuf,
    every: u64,
    background: Srgb,
    written: Vec<PathBuf>,
}

impl FrameSequence {
    /// Creates `dir` if needed. An `every` of 0 is treated as 1.
    pub fn new(dir: impl Into<PathBuf>, every: u64, background: Srgb) -> Result<Self, DriftError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| DriftError::Io(format!("{}: {e}", dir.display())))?;
        Ok(Self {
            dir,
            every: every.max(1),
            background,
            written: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn frame_path(&self, frame: u64) -> PathBuf {
        self.dir.join(format!("frame_{frame:05}.png"))
    }

    /// Writes `raster` if `frame` falls on the sampling interval.
    pub fn observe(&mut self, frame: u64, raster: &Raster) -> Result<Option<&Path>, DriftError> {
        if frame % self.every != 0 {
            return Ok(None);
        }
        let path = self.frame_path(frame);
        write_png(raster, self.background, &path)?;
        log::debug!("wrote {}", path.display());
        self.written.push(path);
        Ok(self.written.last().map(PathBuf::as_path))
    }

    /// Writes `manifest.json` listing the frames written and the final
    /// animation state.
    pub fn write_manifest(&self, params: &Value) -> Result<PathBuf, DriftError> {
        let path = self.dir.join("manifest.json");
        let frames: Vec<String> = self
            .written
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        let manifest = json!({
            "every": self.every,
            "background": self.background.to_hex(),
            "frames": frames,
            "params": params,
        });
        let text = serde_json::to_string_pretty(&manifest)
            .map_err(|e| DriftError::Io(e.to_string()))?;
        std::fs::write(&path, text)
            .map_err(|e| DriftError::Io(format!("{}: {e}", path.display())))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_png_round_trip() {
        let raster = Raster::new(16, 12).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.png");
        let bg = Srgb::from_hex("#204060").unwrap();

        write_png(&raster, bg, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 16);
        assert_eq!(img.height(), 12);
        assert_eq!(img.get_pixel(3, 3).0, [0x20, 0x40, 0x60, 255]);
    }

    #[test]
    fn write_png_to_missing_dir_is_io_error() {
        let raster = Raster::new(2, 2).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("x.png");
        assert!(matches!(
            write_png(&raster, Srgb::BLACK, &path),
            Err(DriftError::Io(_))
        ));
    }

    #[test]
    fn sequence_writes_every_nth_frame() {
        let raster = Raster::new(4, 4).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut seq = FrameSequence::new(dir.path().join("frames"), 3, Srgb::BLACK).unwrap();
        for frame in 1..=10 {
            seq.observe(frame, &raster).unwrap();
        }
        let names: Vec<String> = seq
            .written()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["frame_00003.png", "frame_00006.png", "frame_00009.png"]);
        assert!(seq.written().iter().all(|p| p.exists()));
    }

    #[test]
    fn every_zero_means_every_frame() {
        let raster = Raster::new(2, 2).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut seq = FrameSequence::new(dir.path(), 0, Srgb::BLACK).unwrap();
        assert!(seq.observe(1, &raster).unwrap().is_some());
        assert!(seq.observe(2, &raster).unwrap().is_some());
    }

    #[test]
    fn manifest_lists_frames_and_params() {
        let raster = Raster::new(2, 2).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut seq = FrameSequence::new(dir.path(), 2, Srgb::BLACK).unwrap();
        for frame in 1..=4 {
            seq.observe(frame, &raster).unwrap();
        }
        let path = seq.write_manifest(&json!({ "frame": 4 })).unwrap();
        let manifest: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(manifest["every"], 2);
        assert_eq!(manifest["background"], "#000000");
        assert_eq!(manifest["frames"], json!(["frame_00002.png", "frame_00004.png"]));
        assert_eq!(manifest["params"]["frame"], 4);
    }
}
