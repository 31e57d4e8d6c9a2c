//! Run controller: the `Idle -> InProgress -> Finished -> Idle` state machine.
//!
//! The controller is the only thing that mutates a run. Inputs arrive as
//! discrete [`Input`]s (or as raw `submit_answer`/`expire`/`tick` calls) and
//! each returns a [`Step`] describing what changed, so the shell can render
//! feedback without peeking at internals.
//!
//! After a question closes no question is live until [`RunController::advance`]
//! is called with the [`AdvanceTicket`] handed out on close. The shell calls it
//! after a short delay. Tickets, ticks and expiries carry the [`RunId`] they
//! were issued for; anything from an older run, or for an index the run has
//! moved past, is ignored.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::bank::{self, BuiltinBank, QuestionSource};
use crate::config::{Difficulty, GameConfig, Mode, RewardTable};
use crate::error::{GameError, Result};
use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::operator::OperatorName;
use crate::puzzle::{Association, Puzzle, Submission, Token};
use crate::question::Question;
use crate::rng::Rng;
use crate::storage::Storage;
use crate::timer::{Countdown, Tick};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(u64);

// Process-wide so a rebuilt controller never reuses an id a pending callback
// still holds.
static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

impl RunId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

/// Permission to make question `index` of run `run` live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdvanceTicket {
    pub run: RunId,
    pub index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionResult {
    Solved { reward: u32 },
    Missed,
    TimedOut,
}

impl QuestionResult {
    pub fn is_solved(self) -> bool {
        matches!(self, QuestionResult::Solved { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub run: RunId,
    pub difficulty: Difficulty,
    pub mode: Mode,
    pub score: u32,
    pub lives: u32,
    pub total: usize,
    pub outcome: Outcome,
    /// One entry per closed question, in play order.
    pub results: Vec<(String, QuestionResult)>,
}

impl RunSummary {
    pub fn solved(&self) -> usize {
        self.results.iter().filter(|(_, r)| r.is_solved()).count()
    }

    /// A run that had nothing to ask.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Player input aimed at the live question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    /// Match: put `operator` on `symbol`.
    Associate {
        operator: OperatorName,
        symbol: String,
    },
    /// Sentence: drop a choice into the blank.
    Place { choice: String },
    /// Truth table: put a chip in a row's output cell.
    Fill { row: usize, token: Token },
    Clear { row: usize },
    /// Fault: drop pair `index` into the target.
    Pick { index: usize },
    Confirm,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Stale, misdirected or no-op input.
    Ignored,
    /// A question became live.
    Live { run: RunId, index: usize },
    /// Puzzle state changed without a verdict.
    Updated,
    Locked(OperatorName),
    /// Confirm pressed with something still empty. No penalty.
    Incomplete,
    /// Wrong match pairing: one life gone, question still open.
    Penalty { lives: u32 },
    Tick { remaining: u32 },
    /// Question closed and the run continues once the ticket is redeemed.
    Closed {
        result: QuestionResult,
        score: u32,
        lives: u32,
        ticket: AdvanceTicket,
    },
    Ended(RunSummary),
}

/// What [`RunController::acknowledge`] did with the leaderboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Skipped,
    Ranked(usize),
    BelowCutoff,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseKind {
    Idle,
    InProgress,
    Finished,
}

impl PhaseKind {
    fn label(self) -> &'static str {
        match self {
            PhaseKind::Idle => "idle",
            PhaseKind::InProgress => "a run is in progress",
            PhaseKind::Finished => "a finished run awaits acknowledgement",
        }
    }
}

/// Everything one run owns. Dropped wholesale on quit or acknowledge.
#[derive(Clone, Debug)]
pub struct RunState {
    id: RunId,
    difficulty: Difficulty,
    mode: Mode,
    questions: Vec<Question>,
    current_index: usize,
    score: u32,
    lives: u32,
    timer_seconds: Option<u32>,
    timer: Countdown,
    live: Option<Puzzle>,
    results: Vec<(String, QuestionResult)>,
}

impl RunState {
    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Seconds left on the live question; `None` in classic mode.
    pub fn time_remaining(&self) -> Option<u32> {
        self.timer_seconds.map(|_| self.timer.remaining())
    }

    pub fn live(&self) -> Option<&Puzzle> {
        self.live.as_ref()
    }

    /// The ticket the shell should redeem, while between questions.
    pub fn pending_advance(&self) -> Option<AdvanceTicket> {
        (self.live.is_none() && self.current_index < self.questions.len()).then_some(
            AdvanceTicket {
                run: self.id,
                index: self.current_index,
            },
        )
    }

    fn summary(self, outcome: Outcome) -> RunSummary {
        RunSummary {
            run: self.id,
            difficulty: self.difficulty,
            mode: self.mode,
            score: self.score,
            lives: self.lives,
            total: self.questions.len(),
            outcome,
            results: self.results,
        }
    }
}

enum Phase {
    Idle,
    InProgress(Box<RunState>),
    Finished(RunSummary),
}

/// Result of closing a question, decided while the state is borrowed.
enum AfterClose {
    Continue(Step),
    End(Outcome),
}

pub struct RunController<Q: QuestionSource = BuiltinBank> {
    config: GameConfig,
    source: Q,
    rng: Rng,
    phase: Phase,
}

impl RunController<BuiltinBank> {
    /// Controller over the builtin question pools, seeded from entropy.
    pub fn new(config: GameConfig) -> Self {
        Self::with_source(config, BuiltinBank, Rng::from_entropy())
    }
}

impl<Q: QuestionSource> RunController<Q> {
    pub fn with_source(config: GameConfig, source: Q, rng: Rng) -> Self {
        Self {
            config,
            source,
            rng,
            phase: Phase::Idle,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> PhaseKind {
        match self.phase {
            Phase::Idle => PhaseKind::Idle,
            Phase::InProgress(_) => PhaseKind::InProgress,
            Phase::Finished(_) => PhaseKind::Finished,
        }
    }

    pub fn state(&self) -> Option<&RunState> {
        match &self.phase {
            Phase::InProgress(state) => Some(state.as_ref()),
            _ => None,
        }
    }

    pub fn summary(&self) -> Option<&RunSummary> {
        match &self.phase {
            Phase::Finished(summary) => Some(summary),
            _ => None,
        }
    }

    /// Begin a run. A finished run that was never acknowledged is discarded
    /// without saving. A malformed question aborts the start and leaves the
    /// controller idle.
    pub fn start(&mut self, difficulty: Difficulty, mode: Mode) -> Result<Step> {
        if let Phase::InProgress(_) = self.phase {
            return Err(self.refuse("start"));
        }
        self.phase = Phase::Idle;

        let tier = *self.config.tier(difficulty);
        let questions = bank::select(
            self.source.pool(difficulty),
            tier.question_count,
            &tier.mix,
            &mut self.rng,
        );
        for q in &questions {
            if let Err(err) = q.validate() {
                tracing::warn!(%err, "refusing to start run with malformed question");
                return Err(err.into());
            }
        }

        let id = RunId(NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed));
        tracing::info!(%id, %difficulty, %mode, questions = questions.len(), "run started");

        let mut state = RunState {
            id,
            difficulty,
            mode,
            questions,
            current_index: 0,
            score: 0,
            lives: self.config.starting_lives,
            timer_seconds: (mode == Mode::Timed).then_some(tier.timer_seconds),
            timer: Countdown::new(),
            live: None,
            results: Vec::new(),
        };

        if state.questions.is_empty() {
            tracing::warn!(%id, %difficulty, "no questions available; run ends immediately");
            let summary = state.summary(Outcome::Won);
            self.phase = Phase::Finished(summary.clone());
            return Ok(Step::Ended(summary));
        }

        make_live(&mut state, &mut self.rng);
        self.phase = Phase::InProgress(Box::new(state));
        Ok(Step::Live { run: id, index: 0 })
    }

    /// Quit and start again with the same difficulty and mode.
    pub fn retry(&mut self) -> Result<Step> {
        let (difficulty, mode) = match &self.phase {
            Phase::InProgress(state) => (state.difficulty, state.mode),
            Phase::Finished(summary) => (summary.difficulty, summary.mode),
            Phase::Idle => return Err(self.refuse("retry")),
        };
        self.quit();
        self.start(difficulty, mode)
    }

    /// Abort from any phase. Returns whether anything was discarded.
    pub fn quit(&mut self) -> bool {
        let discarded = !matches!(self.phase, Phase::Idle);
        if let Phase::InProgress(state) = &self.phase {
            tracing::info!(id = %state.id, score = state.score, "run abandoned");
        }
        self.phase = Phase::Idle;
        discarded
    }

    /// Route a player input to the live question.
    pub fn input(&mut self, input: Input) -> Step {
        let rewards = self.config.rewards;
        let Phase::InProgress(state) = &mut self.phase else {
            return Step::Ignored;
        };
        let Some(puzzle) = state.live.as_mut() else {
            return Step::Ignored;
        };

        let after = match (puzzle, input) {
            (Puzzle::Match(board), Input::Associate { operator, symbol }) => {
                match board.associate(operator, &symbol) {
                    Association::Locked => return Step::Locked(operator),
                    Association::Ignored => return Step::Ignored,
                    Association::Rejected => {
                        state.lives = state.lives.saturating_sub(1);
                        tracing::debug!(id = %state.id, lives = state.lives, "wrong pairing");
                        if state.lives == 0 {
                            state.timer.stop();
                            state.live = None;
                            AfterClose::End(Outcome::Lost)
                        } else {
                            return Step::Penalty { lives: state.lives };
                        }
                    }
                }
            }
            (Puzzle::Sentence(slot), Input::Place { choice }) => return updated(slot.place(&choice)),
            (Puzzle::TruthTable(grid), Input::Fill { row, token }) => {
                return updated(grid.fill(row, token));
            }
            (Puzzle::TruthTable(grid), Input::Clear { row }) => return updated(grid.clear(row)),
            (Puzzle::Fault(pick), Input::Pick { index }) => return updated(pick.pick(index)),
            (puzzle, Input::Confirm) => match puzzle.confirm() {
                Submission::Incomplete => return Step::Incomplete,
                Submission::Closed => return Step::Ignored,
                Submission::Correct => {
                    let reward = rewards_for(&rewards, state);
                    close(state, reward, true)
                }
                Submission::Wrong => close(state, 0, false),
            },
            _ => return Step::Ignored,
        };
        self.settle(after)
    }

    /// Raw verdict for the live question, bypassing the puzzle.
    pub fn submit_answer(&mut self, correct: bool) -> Step {
        let rewards = self.config.rewards;
        let Phase::InProgress(state) = &mut self.phase else {
            return Step::Ignored;
        };
        if state.live.is_none() {
            return Step::Ignored;
        }
        let reward = if correct { rewards_for(&rewards, state) } else { 0 };
        let after = close(state, reward, correct);
        self.settle(after)
    }

    /// One-second heartbeat for timed mode.
    pub fn tick(&mut self, run: RunId) -> Step {
        let Phase::InProgress(state) = &mut self.phase else {
            return Step::Ignored;
        };
        if state.id != run || state.live.is_none() {
            return Step::Ignored;
        }
        let after = match state.timer.tick() {
            Tick::Idle => return Step::Ignored,
            Tick::Running(remaining) => return Step::Tick { remaining },
            Tick::Expired => time_out(state),
        };
        self.settle(after)
    }

    /// Out-of-band expiry for the live question of `run`.
    pub fn expire(&mut self, run: RunId) -> Step {
        let Phase::InProgress(state) = &mut self.phase else {
            return Step::Ignored;
        };
        if state.id != run || state.live.is_none() {
            return Step::Ignored;
        }
        let after = time_out(state);
        self.settle(after)
    }

    /// Make the next question live once the post-answer pause is over.
    pub fn advance(&mut self, ticket: AdvanceTicket) -> Step {
        let Phase::InProgress(state) = &mut self.phase else {
            return Step::Ignored;
        };
        if state.pending_advance() != Some(ticket) {
            return Step::Ignored;
        }
        make_live(state, &mut self.rng);
        Step::Live {
            run: state.id,
            index: state.current_index,
        }
    }

    /// Leave `Finished`, optionally saving the score under `save_as`.
    ///
    /// The controller is idle afterwards even if saving fails; the storage
    /// error is returned so the shell can show a notice.
    pub fn acknowledge<S: Storage>(
        &mut self,
        save_as: Option<&str>,
        board: &mut Leaderboard<S>,
        now_ms: i64,
    ) -> Result<SaveOutcome> {
        if !matches!(self.phase, Phase::Finished(_)) {
            return Err(self.refuse("acknowledge"));
        }
        let Phase::Finished(summary) = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return Err(self.refuse("acknowledge"));
        };
        let Some(name) = save_as else {
            return Ok(SaveOutcome::Skipped);
        };

        if let Err(err) = board.remember_name(name) {
            tracing::warn!(%err, "could not remember player name");
        }
        let entry = LeaderboardEntry::new(name, summary.score, now_ms);
        match board.append(entry) {
            Ok(Some(rank)) => Ok(SaveOutcome::Ranked(rank)),
            Ok(None) => Ok(SaveOutcome::BelowCutoff),
            Err(err) => {
                tracing::warn!(%err, "leaderboard save failed");
                Err(err.into())
            }
        }
    }

    fn settle(&mut self, after: AfterClose) -> Step {
        match after {
            AfterClose::Continue(step) => step,
            AfterClose::End(outcome) => {
                let Phase::InProgress(state) = std::mem::replace(&mut self.phase, Phase::Idle)
                else {
                    return Step::Ignored;
                };
                let summary = state.summary(outcome);
                tracing::info!(
                    id = %summary.run,
                    score = summary.score,
                    solved = summary.solved(),
                    total = summary.total,
                    ?outcome,
                    "run finished"
                );
                self.phase = Phase::Finished(summary.clone());
                Step::Ended(summary)
            }
        }
    }

    fn refuse(&self, action: &'static str) -> GameError {
        GameError::InvalidTransition {
            from: self.phase().label(),
            action,
        }
    }
}

fn updated(changed: bool) -> Step {
    if changed { Step::Updated } else { Step::Ignored }
}

fn rewards_for(rewards: &RewardTable, state: &RunState) -> u32 {
    state
        .current_question()
        .map(|q| rewards.reward(q.kind(), q.reward_units()))
        .unwrap_or(0)
}

fn make_live(state: &mut RunState, rng: &mut Rng) {
    let Some(question) = state.questions.get(state.current_index) else {
        return;
    };
    state.live = Some(Puzzle::from_question(question, rng));
    if let Some(seconds) = state.timer_seconds {
        state.timer.start(seconds);
    }
}

fn time_out(state: &mut RunState) -> AfterClose {
    tracing::debug!(id = %state.id, index = state.current_index, "question timed out");
    record(state, QuestionResult::TimedOut)
}

fn close(state: &mut RunState, reward: u32, correct: bool) -> AfterClose {
    let result = if correct {
        QuestionResult::Solved { reward }
    } else {
        QuestionResult::Missed
    };
    record(state, result)
}

/// Apply a verdict to the live question and move past it.
fn record(state: &mut RunState, result: QuestionResult) -> AfterClose {
    state.timer.stop();
    state.live = None;
    match result {
        QuestionResult::Solved { reward } => state.score = state.score.saturating_add(reward),
        QuestionResult::Missed | QuestionResult::TimedOut => {
            state.lives = state.lives.saturating_sub(1)
        }
    }
    let id = state
        .current_question()
        .map(|q| q.id.clone())
        .unwrap_or_default();
    tracing::debug!(id = %state.id, question = %id, ?result, "question closed");
    state.results.push((id, result));
    state.current_index += 1;

    if state.lives == 0 {
        AfterClose::End(Outcome::Lost)
    } else if state.current_index >= state.questions.len() {
        AfterClose::End(Outcome::Won)
    } else {
        AfterClose::Continue(Step::Closed {
            result,
            score: state.score,
            lives: state.lives,
            ticket: AdvanceTicket {
                run: state.id,
                index: state.current_index,
            },
        })
    }
}
