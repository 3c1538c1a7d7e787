use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::{Result, SampleError};

/// Counts for one group of one input directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupReport {
    pub key: Vec<String>,
    pub files: usize,
    pub sentences: usize,
    /// Sentences whose length is one of the allowed lengths.
    pub length_matches: usize,
    /// Length matches left after the period stride.
    pub qualifying: usize,
    pub selected: usize,
    /// `None` when the group had nothing to write.
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryReport {
    pub input: PathBuf,
    pub files: usize,
    pub skipped_files: usize,
    pub groups: Vec<GroupReport>,
}

impl DirectoryReport {
    pub fn selected(&self) -> usize {
        self.groups.iter().map(|g| g.selected).sum()
    }

    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.groups.iter().filter_map(|g| g.output.as_deref())
    }
}

pub fn save_reports<P: AsRef<Path>>(reports: &[DirectoryReport], path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| SampleError::io(path, e))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, reports)?;
    Ok(())
}
