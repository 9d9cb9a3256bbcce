use cv::perception::{FrameInputs, FrameKey, PerceptionError};
use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("unable to open recording: {0}")]
    Io(#[from] std::io::Error),
    #[error("recording is malformed: {0}")]
    Decode(#[from] bincode::Error),
    #[error(transparent)]
    Frame(#[from] PerceptionError),
}

/// Everything a simulation handed out for one perception pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub key: FrameKey,
    /// Row-major.
    pub projection_matrix: [f64; 16],
    /// Row-major camera-from-world.
    pub view_matrix: [f64; 16],
    pub rgb: Array3<u8>,
    pub depth: Array2<f32>,
    pub segmentation: Array2<i32>,
}

impl RecordedFrame {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecordingError> {
        let file = BufReader::new(File::open(path)?);
        Ok(bincode::deserialize_from(file)?)
    }

    /// Frames are recorded by the simulator, the sandbox only reads them.
    #[cfg(test)]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RecordingError> {
        let file = std::io::BufWriter::new(File::create(path)?);
        bincode::serialize_into(file, self)?;
        Ok(())
    }

    /// Checks the renders agree in size and hands them over to the pipeline.
    pub fn into_inputs(self) -> Result<(FrameKey, [f64; 16], FrameInputs), RecordingError> {
        let inputs = FrameInputs::new(self.rgb, self.depth, self.segmentation)?;
        Ok((self.key, self.view_matrix, inputs))
    }
}
