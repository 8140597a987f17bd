use serde::{Deserialize, Serialize};

/// A single listed library item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: String,
    pub url: String,
}

/// Document written to the output file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDocument {
    pub files: Vec<FileRecord>,
}

impl OutputDocument {
    pub fn new(files: Vec<FileRecord>) -> Self {
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
