// Invariants over the builtin question pools.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

use logic_runner::bank;
use logic_runner::config::GameConfig;
use logic_runner::question::{BLANK, Exercise};
use logic_runner::{Difficulty, Kind};

#[test]
fn every_builtin_question_is_well_formed() {
    for d in Difficulty::ALL {
        for q in bank::pool(d) {
            if let Err(err) = q.validate() {
                panic!("{} in {d} pool is malformed: {err}", q.id);
            }
        }
    }
}

#[test]
fn ids_are_unique_across_all_tiers_and_name_their_tier() {
    let mut seen = HashSet::new();
    for d in Difficulty::ALL {
        for q in bank::pool(d) {
            assert!(seen.insert(q.id.clone()), "duplicate id '{}'", q.id);
            assert!(
                q.id.starts_with(d.as_str()),
                "id '{}' does not start with '{d}'",
                q.id
            );
        }
    }
}

#[test]
fn each_tier_covers_its_configured_kind_mix() {
    let config = GameConfig::default();
    for d in Difficulty::ALL {
        let tier = config.tier(d);
        let pool = bank::pool(d);
        assert!(pool.len() >= tier.question_count, "{d} pool too small");
        for kind in Kind::ALL {
            let have = pool.iter().filter(|q| q.kind() == kind).count();
            assert!(
                have >= tier.mix.quota(kind),
                "{d} has {have} {kind} questions, mix wants {}",
                tier.mix.quota(kind)
            );
        }
    }
}

#[test]
fn sentence_prompts_have_exactly_one_blank() {
    for d in Difficulty::ALL {
        for q in bank::pool(d) {
            if let Exercise::Sentence { prompt, .. } = &q.exercise {
                assert_eq!(prompt.matches(BLANK).count(), 1, "{}", q.id);
            }
        }
    }
}

#[test]
fn harder_tiers_ask_for_more_questions() {
    let config = GameConfig::default();
    let counts: Vec<usize> = Difficulty::ALL
        .iter()
        .map(|d| config.tier(*d).question_count)
        .collect();
    assert!(counts.windows(2).all(|w| w[0] < w[1]), "{counts:?}");
}
