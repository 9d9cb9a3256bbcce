use crate::ObjectPoseRecord;
use log::*;
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize, Serializer};

/// Identifies one perception pass within a run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct FrameKey {
    pub scene: String,
    pub trial: usize,
    pub step: usize,
}

impl FrameKey {
    pub fn new(scene: impl Into<String>, trial: usize, step: usize) -> Self {
        Self {
            scene: scene.into(),
            trial,
            step,
        }
    }
}

impl fmt::Display for FrameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.scene, self.trial, self.step)
    }
}

/// The records of every object that made it through one frame, keyed by object id.
pub type FrameResult = BTreeMap<i32, ObjectPoseRecord>;

/// Every frame result of a run. Frames are only ever added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunResult {
    frames: BTreeMap<FrameKey, FrameResult>,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the result of a frame.
    ///
    /// Keys are not deduplicated: processing the same key twice replaces the earlier result.
    pub fn insert(&mut self, key: FrameKey, result: FrameResult) {
        if let Some(previous) = self.frames.insert(key.clone(), result) {
            warn!(
                "frame {} was recorded twice, dropping the earlier {} poses",
                key,
                previous.len()
            );
        }
    }

    pub fn get(&self, key: &FrameKey) -> Option<&FrameResult> {
        self.frames.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FrameKey, &FrameResult)> {
        self.frames.iter()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Serializes as a map from `{scene}_{trial}_{step}` to the frame result.
#[cfg(feature = "serde-serialize")]
impl Serialize for RunResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.frames.iter().map(|(key, frame)| (key.to_string(), frame)))
    }
}
