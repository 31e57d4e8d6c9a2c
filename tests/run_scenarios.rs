// Integration tests (native) for whole runs against the builtin question bank.
// They drive `RunController` the way the browser shell does, minus the DOM.

use logic_runner::config::GameConfig;
use logic_runner::leaderboard::Leaderboard;
use logic_runner::puzzle::Token;
use logic_runner::question::Exercise;
use logic_runner::rng::Rng;
use logic_runner::run::{Outcome, PhaseKind, QuestionResult, SaveOutcome};
use logic_runner::storage::{MemoryStorage, Storage};
use logic_runner::{Difficulty, Input, Mode, Question, RunController, Step};

fn controller(seed: u64) -> RunController {
    RunController::with_source(GameConfig::default(), Default::default(), Rng::seeded(seed))
}

// Inputs that answer `q` correctly.
fn solve(q: &Question) -> Vec<Input> {
    let mut inputs = match &q.exercise {
        Exercise::Match { operands } => operands
            .iter()
            .map(|op| Input::Associate {
                operator: *op,
                symbol: op.symbol().to_string(),
            })
            .collect(),
        Exercise::Sentence { correct, .. } => vec![Input::Place {
            choice: correct.clone(),
        }],
        Exercise::TruthTable { rows, .. } => rows
            .iter()
            .enumerate()
            .map(|(row, r)| Input::Fill {
                row,
                token: Token::from_bool(r.expected),
            })
            .collect(),
        Exercise::Fault { faulty_index, .. } => vec![Input::Pick {
            index: *faulty_index,
        }],
    };
    inputs.push(Input::Confirm);
    inputs
}

// Answer the live question correctly; returns the last step.
fn answer_correctly(c: &mut RunController) -> Step {
    let q = c.state().and_then(|s| s.current_question()).cloned().unwrap();
    let mut last = Step::Ignored;
    for input in solve(&q) {
        last = c.input(input);
    }
    last
}

fn expected_reward(config: &GameConfig, q: &Question) -> u32 {
    config.rewards.reward(q.kind(), q.reward_units())
}

#[test]
fn easy_classic_all_correct_wins_with_full_lives() {
    let mut c = controller(11);
    assert!(matches!(
        c.start(Difficulty::Easy, Mode::Classic).unwrap(),
        Step::Live { index: 0, .. }
    ));
    let questions = c.state().unwrap().questions().to_vec();
    assert_eq!(questions.len(), 5);
    let expected: u32 = questions
        .iter()
        .map(|q| expected_reward(c.config(), q))
        .sum();

    let mut ended = None;
    for _ in 0..questions.len() {
        match answer_correctly(&mut c) {
            Step::Closed { ticket, .. } => {
                assert!(matches!(c.advance(ticket), Step::Live { .. }));
            }
            Step::Ended(summary) => ended = Some(summary),
            other => panic!("unexpected step {other:?}"),
        }
    }

    let summary = ended.expect("run should have ended");
    assert_eq!(summary.outcome, Outcome::Won);
    assert_eq!(summary.lives, 3);
    assert_eq!(summary.score, expected);
    assert_eq!(summary.solved(), 5);
    assert_eq!(c.phase(), PhaseKind::Finished);
}

#[test]
fn every_tier_draws_the_configured_number_of_distinct_questions() {
    for (seed, d) in Difficulty::ALL.into_iter().enumerate() {
        let mut c = controller(seed as u64);
        c.start(d, Mode::Classic).unwrap();
        let qs = c.state().unwrap().questions();
        assert_eq!(qs.len(), c.config().tier(d).question_count);
        let mut ids: Vec<_> = qs.iter().map(|q| q.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), qs.len());
        c.quit();
    }
}

#[test]
fn timed_question_expires_after_its_seconds() {
    let mut c = controller(5);
    let Step::Live { run, .. } = c.start(Difficulty::Easy, Mode::Timed).unwrap() else {
        panic!("expected a live question");
    };
    let secs = c.config().easy.timer_seconds;
    assert_eq!(c.state().unwrap().time_remaining(), Some(secs));

    for expected in (1..secs).rev() {
        assert_eq!(c.tick(run), Step::Tick { remaining: expected });
    }
    match c.tick(run) {
        Step::Closed { result, lives, .. } => {
            assert_eq!(result, QuestionResult::TimedOut);
            assert_eq!(lives, 2);
        }
        other => panic!("unexpected step {other:?}"),
    }
    // The countdown is stopped once the question closes.
    assert_eq!(c.tick(run), Step::Ignored);
}

#[test]
fn timer_running_out_on_the_last_life_ends_the_run() {
    let mut c = controller(13);
    let Step::Live { run, .. } = c.start(Difficulty::Easy, Mode::Timed).unwrap() else {
        panic!("expected a live question");
    };
    for _ in 0..2 {
        match c.submit_answer(false) {
            Step::Closed { ticket, .. } => {
                assert!(matches!(c.advance(ticket), Step::Live { .. }));
            }
            other => panic!("unexpected step {other:?}"),
        }
    }
    assert_eq!(c.state().unwrap().lives(), 1);

    let mut last = Step::Ignored;
    for _ in 0..c.config().easy.timer_seconds {
        last = c.tick(run);
    }
    match last {
        Step::Ended(summary) => {
            assert_eq!(summary.outcome, Outcome::Lost);
            assert_eq!(summary.lives, 0);
            assert_eq!(summary.results.len(), 3);
            assert_eq!(summary.results[2].1, QuestionResult::TimedOut);
        }
        other => panic!("unexpected step {other:?}"),
    }
    assert_eq!(c.phase(), PhaseKind::Finished);
    assert_eq!(c.tick(run), Step::Ignored);
}

#[test]
fn out_of_band_expiry_counts_as_a_miss() {
    let mut c = controller(21);
    let Step::Live { run, .. } = c.start(Difficulty::Medium, Mode::Timed).unwrap() else {
        panic!("expected a live question");
    };
    match c.expire(run) {
        Step::Closed { result, lives, score, .. } => {
            assert_eq!(result, QuestionResult::TimedOut);
            assert_eq!(lives, 2);
            assert_eq!(score, 0);
        }
        other => panic!("unexpected step {other:?}"),
    }
    assert_eq!(c.expire(run), Step::Ignored);
}

#[test]
fn quit_then_start_begins_a_fresh_run() {
    let mut c = controller(9);
    c.start(Difficulty::Medium, Mode::Timed).unwrap();
    c.submit_answer(false);
    assert_eq!(c.state().unwrap().lives(), 2);
    let first = c.state().unwrap().id();

    assert!(c.quit());
    assert_eq!(c.phase(), PhaseKind::Idle);
    c.start(Difficulty::Medium, Mode::Timed).unwrap();

    let state = c.state().unwrap();
    assert_ne!(state.id(), first);
    assert_eq!(state.lives(), 3);
    assert_eq!(state.score(), 0);
    assert_eq!(state.current_index(), 0);
    assert_eq!(state.time_remaining(), Some(c.config().medium.timer_seconds));
}

#[test]
fn three_misses_end_the_run_lost() {
    let mut c = controller(2);
    c.start(Difficulty::Hard, Mode::Classic).unwrap();
    let mut last = Step::Ignored;
    for _ in 0..3 {
        last = c.submit_answer(false);
        if let Step::Closed { ticket, .. } = last {
            c.advance(ticket);
        }
    }
    match last {
        Step::Ended(summary) => {
            assert_eq!(summary.outcome, Outcome::Lost);
            assert_eq!(summary.lives, 0);
            assert_eq!(summary.results.len(), 3);
        }
        other => panic!("unexpected step {other:?}"),
    }
}

#[test]
fn finished_run_saves_to_leaderboard_under_trimmed_name() {
    let mut c = controller(3);
    c.start(Difficulty::Easy, Mode::Classic).unwrap();
    loop {
        match answer_correctly(&mut c) {
            Step::Closed { ticket, .. } => {
                c.advance(ticket);
            }
            Step::Ended(_) => break,
            other => panic!("unexpected step {other:?}"),
        }
    }
    let score = c.summary().unwrap().score;

    let keys = c.config().storage.clone();
    let mut board = Leaderboard::load(MemoryStorage::new(), keys.clone(), 20);
    let saved = c
        .acknowledge(Some("  Ada  "), &mut board, 1_700_000_000_000)
        .unwrap();
    assert_eq!(saved, SaveOutcome::Ranked(0));
    assert_eq!(c.phase(), PhaseKind::Idle);
    assert_eq!(board.list()[0].name, "Ada");
    assert_eq!(board.list()[0].score, score);
    assert_eq!(board.player_name().as_deref(), Some("Ada"));

    // A fresh load sees the same board.
    let raw = board.storage().get(&keys.leaderboard).unwrap();
    let reloaded = Leaderboard::load(
        MemoryStorage::new().with_value(&keys.leaderboard, &raw),
        keys,
        20,
    );
    assert_eq!(reloaded.list(), board.list());
}
