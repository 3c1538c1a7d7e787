use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::SampleConfig;
use crate::error::{Result, SampleError};
use crate::group::{GroupKey, GroupMatch, GroupPattern};
use crate::report::{DirectoryReport, GroupReport};
use crate::sentence::{read_sentences, write_sentences, Sentence};

/// Splits CLI paths into input directories and the output directory.
///
/// Every input must be an existing directory. The output is created when
/// missing and must be a directory when present.
pub fn prepare_paths(paths: &[PathBuf]) -> Result<(Vec<PathBuf>, PathBuf)> {
    let (out, inputs) = paths.split_last().ok_or_else(|| {
        SampleError::InvalidConfig("expected input directories and an output directory".to_string())
    })?;

    for input in inputs {
        if !input.is_dir() {
            return Err(SampleError::NotADirectory {
                path: input.clone(),
                role: "input",
            });
        }
    }
    ensure_output_dir(out)?;

    Ok((inputs.to_vec(), out.clone()))
}

fn ensure_output_dir(out: &Path) -> Result<()> {
    if !out.exists() {
        fs::create_dir_all(out).map_err(|e| SampleError::io(out, e))?;
    } else if !out.is_dir() {
        return Err(SampleError::NotADirectory {
            path: out.to_path_buf(),
            role: "output",
        });
    }
    Ok(())
}

/// Files under `folder` with the given extension, sorted by path.
///
/// A directory whose canonical path equals `exclude` is not descended into, so
/// an output directory nested in an input directory is never read back.
pub fn collect_files(folder: &Path, extension: &str, exclude: Option<&Path>) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(folder).follow_links(true).into_iter().filter_entry(|entry| {
        match exclude {
            Some(excluded) if entry.file_type().is_dir() => fs::canonicalize(entry.path())
                .map(|path| path != excluded)
                .unwrap_or(true),
            _ => true,
        }
    });

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) == Some(extension) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Keeps sentences with an allowed length, then every `period`-th of those.
pub fn stride_filter<'a>(
    sentences: &'a [Sentence],
    lengths: &BTreeSet<usize>,
    period: usize,
) -> Vec<&'a Sentence> {
    let period = period.max(1);
    sentences
        .iter()
        .filter(|s| lengths.contains(&s.len()))
        .step_by(period)
        .collect()
}

/// Filters, shuffles and truncates one group's sentences.
///
/// `sentences` must be in canonical order (files sorted by path, sentences in
/// file order) for the result to be reproducible.
pub fn select<R: Rng + ?Sized>(
    sentences: &[Sentence],
    config: &SampleConfig,
    rng: &mut R,
) -> Vec<Sentence> {
    let mut pool = stride_filter(sentences, &config.lengths, config.period);
    pool.shuffle(rng);
    pool.truncate(config.k);
    pool.into_iter().cloned().collect()
}

pub struct Sampler {
    config: SampleConfig,
    pattern: GroupPattern,
}

impl Sampler {
    pub fn new(config: SampleConfig) -> Result<Self> {
        let pattern = config.validate()?;
        Ok(Self { config, pattern })
    }

    pub fn config(&self) -> &SampleConfig {
        &self.config
    }

    /// Fresh generator for one group; every group starts from the same seed.
    fn group_rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.config.seed)
    }

    fn group_files(&self, files: Vec<PathBuf>) -> Result<(BTreeMap<GroupKey, Vec<PathBuf>>, usize)> {
        let mut groups: BTreeMap<GroupKey, Vec<PathBuf>> = BTreeMap::new();
        let mut skipped = 0;

        for file in files {
            match self.pattern.key_for(&file) {
                GroupMatch::Matched(key) => {
                    debug!("{} -> group {}", file.display(), key);
                    groups.entry(key).or_default().push(file);
                }
                GroupMatch::NoMatch if self.config.group_all_match => {
                    return Err(SampleError::GroupMatch {
                        path: file,
                        pattern: self.pattern.as_str().to_string(),
                    });
                }
                GroupMatch::NoMatch => {
                    warn!("Skipping {}: no match for group pattern", file.display());
                    skipped += 1;
                }
            }
        }

        Ok((groups, skipped))
    }

    fn output_path(&self, key: &GroupKey, folder: &Path, out: &Path) -> PathBuf {
        let stem = key.file_stem().unwrap_or_else(|| {
            folder
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "sample".to_string())
        });
        out.join(format!("{}.{}", stem, self.config.extension))
    }

    /// Output file of every group, failing when two keys map to one file.
    fn plan_outputs(
        &self,
        groups: &BTreeMap<GroupKey, Vec<PathBuf>>,
        folder: &Path,
        out: &Path,
    ) -> Result<Vec<PathBuf>> {
        let mut owners: HashMap<PathBuf, &GroupKey> = HashMap::new();
        let mut outputs = Vec::with_capacity(groups.len());
        for key in groups.keys() {
            let path = self.output_path(key, folder, out);
            if let Some(first) = owners.insert(path.clone(), key) {
                return Err(SampleError::OutputCollision {
                    path,
                    first: format!("{:?}", first.values()),
                    second: format!("{:?}", key.values()),
                });
            }
            outputs.push(path);
        }
        Ok(outputs)
    }

    /// Samples every group of `folder` into `out`.
    pub fn sample_dir(&self, folder: &Path, out: &Path) -> Result<DirectoryReport> {
        ensure_output_dir(out)?;
        let canonical_out = fs::canonicalize(out).map_err(|e| SampleError::io(out, e))?;

        let files = collect_files(folder, &self.config.extension, Some(&canonical_out))?;
        let file_count = files.len();
        let (groups, skipped_files) = self.group_files(files)?;
        let outputs = self.plan_outputs(&groups, folder, out)?;

        let mut reports = Vec::with_capacity(groups.len());
        for ((key, paths), output_path) in groups.iter().zip(outputs) {
            let mut sentences = Vec::new();
            for path in paths {
                let parsed = read_sentences(path)?;
                debug!("{}: {} sentences", path.display(), parsed.len());
                sentences.extend(parsed);
            }

            let length_matches = sentences
                .iter()
                .filter(|s| self.config.lengths.contains(&s.len()))
                .count();
            let qualifying = stride_filter(&sentences, &self.config.lengths, self.config.period).len();

            let mut rng = self.group_rng();
            let selected = select(&sentences, &self.config, &mut rng);

            let output = if selected.is_empty() {
                warn!("Group {} in {} has no qualifying sentences", key, folder.display());
                None
            } else {
                write_group(&output_path, &selected)?;
                info!(
                    "Wrote {} sentences for group {} to {}",
                    selected.len(),
                    key,
                    output_path.display()
                );
                Some(output_path)
            };

            reports.push(GroupReport {
                key: key.values().to_vec(),
                files: paths.len(),
                sentences: sentences.len(),
                length_matches,
                qualifying,
                selected: selected.len(),
                output,
            });
        }

        Ok(DirectoryReport {
            input: folder.to_path_buf(),
            files: file_count,
            skipped_files,
            groups: reports,
        })
    }
}

fn write_group(path: &Path, sentences: &[Sentence]) -> Result<()> {
    let file = File::create(path).map_err(|e| SampleError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_sentences(&mut writer, sentences)
        .and_then(|_| writer.flush())
        .map_err(|e| SampleError::io(path, e))
}

/// Samples one input directory with `config`, writing one file per group to `out`.
pub fn sample_from_conllu(folder: &Path, out: &Path, config: &SampleConfig) -> Result<DirectoryReport> {
    Sampler::new(config.clone())?.sample_dir(folder, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::parse_str;

    fn corpus(lengths: &[usize]) -> Vec<Sentence> {
        let mut text = String::new();
        for (i, &n) in lengths.iter().enumerate() {
            text.push_str(&format!("# sent_id = {}\n", i));
            for t in 1..=n {
                text.push_str(&format!("{t}\tw\tw\tX\t_\t_\t0\tdep\t_\t_\n"));
            }
            text.push('\n');
        }
        parse_str(&text, Path::new("t.conllu")).unwrap()
    }

    fn ids(sentences: &[&Sentence]) -> Vec<String> {
        sentences.iter().map(|s| s.lines()[0].clone()).collect()
    }

    #[test]
    fn stride_applies_after_length_filter() {
        let sentences = corpus(&[5, 3, 5, 5, 7, 5, 5]);
        let lengths = BTreeSet::from([5]);

        let every = stride_filter(&sentences, &lengths, 1);
        assert_eq!(every.len(), 5);

        let strided = stride_filter(&sentences, &lengths, 2);
        assert_eq!(
            ids(&strided),
            ["# sent_id = 0", "# sent_id = 3", "# sent_id = 6"]
        );
    }

    #[test]
    fn select_is_bounded_and_reproducible() {
        let sentences = corpus(&[5; 40]);
        let config = SampleConfig {
            k: 7,
            period: 1,
            lengths: BTreeSet::from([5]),
            ..SampleConfig::default()
        };

        let a = select(&sentences, &config, &mut StdRng::seed_from_u64(3));
        let b = select(&sentences, &config, &mut StdRng::seed_from_u64(3));
        assert_eq!(a.len(), 7);
        assert_eq!(a, b);
    }

    #[test]
    fn select_returns_everything_when_short() {
        let sentences = corpus(&[5, 10, 11]);
        let config = SampleConfig {
            k: 450,
            period: 1,
            lengths: BTreeSet::from([5, 10]),
            ..SampleConfig::default()
        };
        let picked = select(&sentences, &config, &mut StdRng::seed_from_u64(42));
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn prepare_paths_requires_output() {
        assert!(matches!(prepare_paths(&[]), Err(SampleError::InvalidConfig(_))));
    }
}
