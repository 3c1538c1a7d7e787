//! Property-based tests for sentence selection.
//!
//! - Bound: never more than `k` sentences
//! - Length: every selected sentence has an allowed length
//! - Determinism: the same seed picks the same sentences in the same order
//! - Subset: selection only draws from the strided pool, without repeats

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use conllu_sampler::sampler::{select, stride_filter};
use conllu_sampler::sentence::parse_str;
use conllu_sampler::{SampleConfig, Sentence};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn build_sentences(lengths: &[usize]) -> Vec<Sentence> {
    let mut text = String::new();
    for (i, &n) in lengths.iter().enumerate() {
        text.push_str(&format!("# sent_id = {i}\n"));
        for t in 1..=n {
            text.push_str(&format!("{t}\tw\t_\t_\t_\t_\t_\t_\t_\t_\n"));
        }
        text.push('\n');
    }
    parse_str(&text, Path::new("prop.conllu")).unwrap()
}

fn arbitrary_config() -> impl Strategy<Value = SampleConfig> {
    (
        1usize..40,
        any::<u64>(),
        prop::collection::btree_set(1usize..12, 1..5),
        1usize..5,
    )
        .prop_map(|(k, seed, lengths, period)| SampleConfig {
            k,
            seed,
            lengths,
            period,
            ..SampleConfig::default()
        })
}

proptest! {
    #[test]
    fn selection_respects_bound_and_lengths(
        lengths in prop::collection::vec(1usize..12, 0..120),
        config in arbitrary_config(),
    ) {
        let sentences = build_sentences(&lengths);
        let picked = select(&sentences, &config, &mut StdRng::seed_from_u64(config.seed));

        prop_assert!(picked.len() <= config.k);
        for sentence in &picked {
            prop_assert!(config.lengths.contains(&sentence.len()));
        }

        let pool = stride_filter(&sentences, &config.lengths, config.period);
        prop_assert_eq!(picked.len(), pool.len().min(config.k));
    }

    #[test]
    fn selection_is_deterministic_and_draws_from_pool(
        lengths in prop::collection::vec(1usize..12, 0..120),
        config in arbitrary_config(),
    ) {
        let sentences = build_sentences(&lengths);
        let first = select(&sentences, &config, &mut StdRng::seed_from_u64(config.seed));
        let second = select(&sentences, &config, &mut StdRng::seed_from_u64(config.seed));
        prop_assert_eq!(&first, &second);

        let pool: HashSet<usize> = stride_filter(&sentences, &config.lengths, config.period)
            .iter()
            .map(|s| s.line())
            .collect();
        let picked: Vec<usize> = first.iter().map(|s| s.line()).collect();
        let unique: BTreeSet<usize> = picked.iter().copied().collect();

        prop_assert_eq!(unique.len(), picked.len());
        prop_assert!(picked.iter().all(|line| pool.contains(line)));
    }
}
