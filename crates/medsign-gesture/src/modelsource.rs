use std::path::PathBuf;

use crate::GestureError;

/// Where a serialized model artifact comes from.
pub enum ModelSource {
    File(PathBuf),
    Memory(Vec<u8>),
}

impl ModelSource {
    /// Read the artifact bytes.
    pub fn load(self) -> Result<Vec<u8>, GestureError> {
        match self {
            ModelSource::File(path) => std::fs::read(&path).map_err(|e| {
                GestureError::ModelLoad(format!("failed to read {}: {e}", path.display()))
            }),
            ModelSource::Memory(bytes) => Ok(bytes),
        }
    }
}
