//! Local tourism data files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the tourism text and the image index live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Base directory; relative file names below resolve against it.
    pub dir: PathBuf,
    pub tourism_file: String,
    pub images_file: String,
    /// Images shown per answer (valid range: 0-12).
    pub max_images: u32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            tourism_file: "data_tayninh.txt".into(),
            images_file: "images.json".into(),
            max_images: 3,
        }
    }
}

impl DataConfig {
    pub fn tourism_path(&self) -> PathBuf {
        self.dir.join(&self.tourism_file)
    }

    pub fn images_path(&self) -> PathBuf {
        self.dir.join(&self.images_file)
    }
}
