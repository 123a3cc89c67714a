use std::path::PathBuf;

/// Where the VFS finds its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VfsConfig {
    /// Directory holding the base archive set
    pub base_path: PathBuf,
    /// Extra archives or loose-file directories, lowest priority first
    pub data_paths: Vec<PathBuf>,
}

impl VfsConfig {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            data_paths: Vec::new(),
        }
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_paths.push(path.into());
        self
    }
}

impl Default for VfsConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
