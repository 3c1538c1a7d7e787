pub mod config;
pub mod error;
pub mod group;
pub mod report;
pub mod sampler;
pub mod sentence;

pub use config::SampleConfig;
pub use error::{Result, SampleError};
pub use group::{GroupKey, GroupMatch, GroupPattern};
pub use report::{save_reports, DirectoryReport, GroupReport};
pub use sampler::{prepare_paths, sample_from_conllu, select, Sampler};
pub use sentence::{read_sentences, Sentence};
