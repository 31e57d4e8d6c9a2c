//! Question bank: per-difficulty pools and run-sized selections from them.
//!
//! Pools live in one file per tier (`tier_easy.rs`, ...), built once on first
//! use. A run draws each kind's quota without replacement, tops up from the
//! leftovers when a kind is short, shuffles and truncates.

use std::collections::HashSet;

use crate::config::{Difficulty, KindMix};
use crate::question::{Kind, Question};
use crate::rng::Rng;

mod tier_easy;
mod tier_hard;
mod tier_medium;

/// Anything that can hand out question pools per difficulty.
pub trait QuestionSource {
    fn pool(&self, difficulty: Difficulty) -> &[Question];
}

/// The pools shipped with the game.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinBank;

impl QuestionSource for BuiltinBank {
    fn pool(&self, difficulty: Difficulty) -> &[Question] {
        pool(difficulty)
    }
}

/// One pool used for every difficulty. Handy for tests and custom decks.
impl QuestionSource for Vec<Question> {
    fn pool(&self, _difficulty: Difficulty) -> &[Question] {
        self
    }
}

pub fn pool(difficulty: Difficulty) -> &'static [Question] {
    match difficulty {
        Difficulty::Easy => tier_easy::easy(),
        Difficulty::Medium => tier_medium::medium(),
        Difficulty::Hard => tier_hard::hard(),
    }
}

/// Select up to `desired` questions for `difficulty` from the builtin pools.
pub fn build_question_set(
    difficulty: Difficulty,
    desired: usize,
    mix: &KindMix,
    rng: &mut Rng,
) -> Vec<Question> {
    select(pool(difficulty), desired, mix, rng)
}

/// Core selection over an arbitrary pool. Never returns the same question id
/// twice; returns fewer than `desired` only when the pool runs dry.
pub fn select(pool: &[Question], desired: usize, mix: &KindMix, rng: &mut Rng) -> Vec<Question> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut picked: Vec<&Question> = Vec::with_capacity(desired);
    let mut leftovers: Vec<&Question> = Vec::new();

    for kind in Kind::ALL {
        let mut of_kind: Vec<&Question> = pool
            .iter()
            .filter(|q| q.kind() == kind && !seen.contains(q.id.as_str()))
            .collect();
        // Drop repeated ids inside the pool itself.
        let mut local: HashSet<&str> = HashSet::new();
        of_kind.retain(|q| local.insert(q.id.as_str()));
        rng.shuffle(&mut of_kind);

        let quota = mix.quota(kind).min(of_kind.len());
        for q in of_kind.drain(..quota) {
            seen.insert(q.id.as_str());
            picked.push(q);
        }
        leftovers.extend(of_kind);
    }

    if picked.len() < desired {
        rng.shuffle(&mut leftovers);
        for q in leftovers {
            if picked.len() >= desired {
                break;
            }
            if seen.insert(q.id.as_str()) {
                picked.push(q);
            }
        }
    }

    rng.shuffle(&mut picked);
    picked.truncate(desired);
    tracing::debug!(requested = desired, selected = picked.len(), "question set built");
    picked.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::OperatorName::{And, Implies, Not, Or, Xor};

    fn mix(matching: usize, sentence: usize, truth_table: usize, fault: usize) -> KindMix {
        KindMix {
            matching,
            sentence,
            truth_table,
            fault,
        }
    }

    #[test]
    fn builtin_pools_are_valid() {
        for d in Difficulty::ALL {
            let p = pool(d);
            assert!(!p.is_empty(), "{d} pool empty");
            for q in p {
                assert_eq!(q.validate(), Ok(()), "{d}/{}", q.id);
            }
        }
    }

    #[test]
    fn builtin_ids_unique_across_tiers() {
        let mut ids = HashSet::new();
        for d in Difficulty::ALL {
            for q in pool(d) {
                assert!(ids.insert(q.id.clone()), "duplicate id {}", q.id);
            }
        }
    }

    #[test]
    fn honours_quota_per_kind_when_available() {
        let mut rng = Rng::seeded(3);
        let set = build_question_set(Difficulty::Easy, 5, &mix(1, 2, 1, 1), &mut rng);
        assert_eq!(set.len(), 5);
        let count = |k| set.iter().filter(|q| q.kind() == k).count();
        assert_eq!(count(Kind::Match), 1);
        assert_eq!(count(Kind::Sentence), 2);
        assert_eq!(count(Kind::TruthTable), 1);
        assert_eq!(count(Kind::Fault), 1);
    }

    #[test]
    fn pads_from_other_kinds_when_a_kind_is_short() {
        let pool = vec![
            Question::truth_table("t-and", And),
            Question::truth_table("t-or", Or),
            Question::truth_table("t-xor", Xor),
            Question::matching("m-1", &[And, Or, Not]),
        ];
        let mut rng = Rng::seeded(11);
        // asks for 3 faults, none exist
        let set = select(&pool, 3, &mix(0, 0, 1, 3), &mut rng);
        assert_eq!(set.len(), 3);
        let ids: HashSet<_> = set.iter().map(|q| q.id.clone()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn small_pool_returns_everything_once() {
        let pool = vec![
            Question::truth_table("t-and", And),
            Question::fault("f-1", &[And, Implies], 1, "∨"),
        ];
        let mut rng = Rng::seeded(5);
        let set = select(&pool, 10, &KindMix::default(), &mut rng);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn empty_pool_yields_empty_set() {
        let mut rng = Rng::seeded(5);
        assert!(select(&[], 5, &KindMix::default(), &mut rng).is_empty());
    }

    #[test]
    fn duplicate_ids_in_pool_are_not_repeated() {
        let pool = vec![
            Question::truth_table("same", And),
            Question::truth_table("same", And),
            Question::truth_table("same", And),
        ];
        let mut rng = Rng::seeded(9);
        let set = select(&pool, 3, &mix(0, 0, 3, 0), &mut rng);
        assert_eq!(set.len(), 1);
    }
}
