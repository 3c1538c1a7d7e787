use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{Result, SampleError};
use crate::group::GroupPattern;

pub const DEFAULT_GROUP_PATTERN: &str = r".*/text_(?P<a_prefix>[^_]+)_(?P<b_date>\d{4}).*";
pub const DEFAULT_LENGTHS: [usize; 9] = [5, 10, 15, 20, 30, 40, 50, 60, 70];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    /// Maximum number of sentences written per group.
    pub k: usize,
    /// Seed for the per-group shuffle.
    pub seed: u64,
    /// Allowed sentence token lengths.
    pub lengths: BTreeSet<usize>,
    /// Stride over the length-qualifying sentences of a group.
    pub period: usize,
    /// Pattern whose named captures form the group key.
    pub group_by_regex: String,
    /// Fail when a file does not match `group_by_regex` instead of skipping it.
    pub group_all_match: bool,
    /// Extension of the files read from each input directory.
    pub extension: String,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            k: 450,
            seed: 42,
            lengths: DEFAULT_LENGTHS.into_iter().collect(),
            period: 3,
            group_by_regex: DEFAULT_GROUP_PATTERN.to_string(),
            group_all_match: false,
            extension: "conllu".to_string(),
        }
    }
}

impl SampleConfig {
    /// Loads a YAML config; fields missing from the file keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SampleError::io(path, e))?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Checks the numeric bounds and compiles the grouping pattern.
    pub fn validate(&self) -> Result<GroupPattern> {
        if self.k == 0 {
            return Err(SampleError::InvalidConfig("k must be at least 1".to_string()));
        }
        if self.period == 0 {
            return Err(SampleError::InvalidConfig("period must be at least 1".to_string()));
        }
        if self.lengths.is_empty() {
            return Err(SampleError::InvalidConfig(
                "at least one sentence length is required".to_string(),
            ));
        }
        if self.extension.is_empty() {
            return Err(SampleError::InvalidConfig("extension must not be empty".to_string()));
        }
        GroupPattern::new(&self.group_by_regex)
    }
}
