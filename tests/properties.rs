// Property tests for the invariants that must hold whatever the inputs:
// leaderboard ordering and size, question-set size and uniqueness.

use std::collections::HashSet;

use logic_runner::bank::{self, QuestionSource};
use logic_runner::config::{KindMix, StorageKeys};
use logic_runner::leaderboard::{Leaderboard, LeaderboardEntry};
use logic_runner::rng::Rng;
use logic_runner::storage::MemoryStorage;
use logic_runner::{Difficulty, OperatorName, Question};
use proptest::prelude::*;

fn difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Medium),
        Just(Difficulty::Hard)
    ]
}

proptest! {
    #[test]
    fn leaderboard_stays_sorted_and_bounded(
        scores in prop::collection::vec(0u32..500, 0..60),
        capacity in 1usize..25,
    ) {
        let mut lb = Leaderboard::load(MemoryStorage::new(), StorageKeys::default(), capacity);
        for (i, score) in scores.iter().enumerate() {
            lb.append(LeaderboardEntry::new("p", *score, i as i64)).unwrap();
            let list = lb.list();
            prop_assert!(list.len() <= capacity);
            prop_assert!(list.windows(2).all(|w| w[0].score >= w[1].score));
        }
        prop_assert_eq!(lb.list().len(), scores.len().min(capacity));
    }

    #[test]
    fn equal_scores_keep_insertion_order(n in 1usize..15) {
        let mut lb = Leaderboard::load(MemoryStorage::new(), StorageKeys::default(), 20);
        for i in 0..n {
            lb.append(LeaderboardEntry::new(&format!("p{i}"), 7, i as i64)).unwrap();
        }
        let stamps: Vec<i64> = lb.list().iter().map(|e| e.ts).collect();
        prop_assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn builtin_selection_is_bounded_and_unique(
        d in difficulty(),
        desired in 0usize..30,
        seed in any::<u64>(),
    ) {
        let mut rng = Rng::seeded(seed);
        let set = bank::build_question_set(d, desired, &KindMix::default(), &mut rng);
        prop_assert!(set.len() <= desired);
        prop_assert_eq!(set.len(), desired.min(bank::pool(d).len()));
        let ids: HashSet<&str> = set.iter().map(|q| q.id.as_str()).collect();
        prop_assert_eq!(ids.len(), set.len());
    }

    #[test]
    fn selection_from_pool_with_repeated_ids_never_repeats(
        copies in 1usize..4,
        desired in 0usize..12,
        seed in any::<u64>(),
    ) {
        let base = [
            Question::truth_table("a", OperatorName::And),
            Question::truth_table("b", OperatorName::Or),
            Question::matching("c", &[OperatorName::And, OperatorName::Xor]),
        ];
        let pool: Vec<Question> = base.iter().cycle().take(base.len() * copies).cloned().collect();
        let mut rng = Rng::seeded(seed);
        let set = bank::select(pool.pool(Difficulty::Easy), desired, &KindMix::default(), &mut rng);
        let ids: HashSet<&str> = set.iter().map(|q| q.id.as_str()).collect();
        prop_assert_eq!(ids.len(), set.len());
        prop_assert_eq!(set.len(), desired.min(base.len()));
    }

    #[test]
    fn names_are_never_blank_or_overlong(raw in ".{0,60}") {
        let entry = LeaderboardEntry::new(&raw, 1, 0);
        prop_assert!(!entry.name.trim().is_empty());
        prop_assert!(entry.name.chars().count() <= logic_runner::leaderboard::MAX_NAME_CHARS);
    }
}
