//! Shallow dataset handle backed by a `transforms.json`.

use candela_engine::{Dataset, EngineError};
use glam::Vec3;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One camera frame entry of a transforms file.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameMeta {
    pub file_path: String,
    pub transform_matrix: [[f32; 4]; 4],
}

#[derive(Debug, Deserialize)]
struct TransformsFile {
    #[serde(default)]
    camera_angle_x: Option<f64>,
    frames: Vec<FrameMeta>,
}

/// The sim engine's dataset handle.
///
/// A real engine decodes images and intrinsics here. The sim only reads the
/// frame list, which is enough to exercise readiness and the error paths.
#[derive(Debug)]
pub struct SimDataset {
    path: PathBuf,
    frames: Vec<FrameMeta>,
    camera_angle_x: Option<f64>,
}

impl SimDataset {
    pub(crate) fn open(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            frames: Vec::new(),
            camera_angle_x: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Horizontal field of view from the transforms file, if it carried one.
    pub fn camera_angle_x(&self) -> Option<f64> {
        self.camera_angle_x
    }

    /// The transforms file behind this dataset: the path itself when it is a
    /// file, `transforms.json` inside it when it is a directory.
    fn transforms_path(&self) -> PathBuf {
        if self.path.is_dir() {
            self.path.join("transforms.json")
        } else {
            self.path.clone()
        }
    }

    /// Spread of the camera rig: the largest distance from any camera origin
    /// to the rig centroid. Zero until transforms are loaded.
    pub fn camera_extent(&self) -> f32 {
        if self.frames.is_empty() {
            return 0.0;
        }
        let origins: Vec<Vec3> = self
            .frames
            .iter()
            .map(|frame| {
                Vec3::new(
                    frame.transform_matrix[0][3],
                    frame.transform_matrix[1][3],
                    frame.transform_matrix[2][3],
                )
            })
            .collect();
        let centroid = origins.iter().copied().sum::<Vec3>() / origins.len() as f32;
        origins
            .iter()
            .map(|origin| origin.distance(centroid))
            .fold(0.0, f32::max)
    }
}

impl Dataset for SimDataset {
    fn load_transforms(&mut self) -> Result<(), EngineError> {
        let file_path = self.transforms_path();
        let file = File::open(&file_path).map_err(|e| EngineError::DatasetLoad {
            path: file_path.clone(),
            reason: e.to_string(),
        })?;
        let parsed: TransformsFile =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| EngineError::DatasetLoad {
                path: file_path.clone(),
                reason: e.to_string(),
            })?;
        debug!(frames = parsed.frames.len(), "loaded camera transforms");
        self.frames = parsed.frames;
        self.camera_angle_x = parsed.camera_angle_x;
        Ok(())
    }

    fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_transforms(path: &Path, origins: &[[f32; 3]]) {
        let frames: Vec<_> = origins
            .iter()
            .enumerate()
            .map(|(i, o)| {
                serde_json::json!({
                    "file_path": format!("images/{i:04}.png"),
                    "transform_matrix": [
                        [1.0, 0.0, 0.0, o[0]],
                        [0.0, 1.0, 0.0, o[1]],
                        [0.0, 0.0, 1.0, o[2]],
                        [0.0, 0.0, 0.0, 1.0],
                    ],
                })
            })
            .collect();
        let doc = serde_json::json!({ "camera_angle_x": 0.6911, "frames": frames });
        fs::write(path, doc.to_string()).unwrap();
    }

    #[test]
    fn test_load_transforms_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_transforms(
            &dir.path().join("transforms.json"),
            &[[2.0, 0.0, 0.0], [-2.0, 0.0, 0.0]],
        );

        let mut dataset = SimDataset::open(dir.path());
        dataset.load_transforms().unwrap();

        assert_eq!(dataset.frame_count(), 2);
        assert_eq!(dataset.camera_angle_x(), Some(0.6911));
        assert!((dataset.camera_extent() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_load_transforms_from_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("transforms.json");
        write_transforms(&file, &[[0.0, 1.0, 0.0]]);

        let mut dataset = SimDataset::open(&file);
        dataset.load_transforms().unwrap();
        assert_eq!(dataset.frame_count(), 1);
    }

    #[test]
    fn test_missing_transforms_is_dataset_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut dataset = SimDataset::open(dir.path());
        let err = dataset.load_transforms().unwrap_err();
        assert!(matches!(err, EngineError::DatasetLoad { .. }));
    }

    #[test]
    fn test_malformed_transforms_is_dataset_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("transforms.json");
        fs::write(&file, "{ not json").unwrap();

        let mut dataset = SimDataset::open(&file);
        let err = dataset.load_transforms().unwrap_err();
        match err {
            EngineError::DatasetLoad { path, .. } => assert_eq!(path, file),
            other => panic!("expected DatasetLoad, got {other:?}"),
        }
    }

    #[test]
    fn test_extent_is_zero_before_load() {
        let dataset = SimDataset::open(Path::new("nowhere"));
        assert_eq!(dataset.camera_extent(), 0.0);
        assert_eq!(dataset.frame_count(), 0);
    }
}
