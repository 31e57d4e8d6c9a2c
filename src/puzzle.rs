//! Live, per-question interaction state.
//!
//! A [`Puzzle`] is derived from one immutable [`Question`] when it becomes the
//! live question. It records what the player has placed so far and decides
//! the verdict on confirm. Once resolved it ignores every further input.

use serde::{Deserialize, Serialize};

use crate::operator::OperatorName;
use crate::question::{Exercise, Kind, Question, TruthRow};
use crate::rng::Rng;

/// Reusable truth-table chip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    T,
    F,
}

impl Token {
    pub fn from_bool(b: bool) -> Self {
        if b { Token::T } else { Token::F }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Token::T => "T",
            Token::F => "F",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "T" => Some(Token::T),
            "F" => Some(Token::F),
            _ => None,
        }
    }
}

/// Verdict of a confirm press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Something is still empty. No penalty.
    Incomplete,
    Correct,
    Wrong,
    /// Already resolved; the press is a no-op.
    Closed,
}

/// Outcome of one name-to-symbol attempt in a match puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Association {
    Locked,
    /// Wrong pairing; costs a life, the puzzle stays open.
    Rejected,
    /// Unknown name/symbol, already-locked pair or resolved puzzle.
    Ignored,
}

fn same_text(a: &str, b: &str) -> bool {
    a.trim() == b.trim()
}

// --- Match -------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct MatchBoard {
    names: Vec<OperatorName>,
    symbols: Vec<&'static str>,
    locked: Vec<OperatorName>,
    resolved: bool,
}

impl MatchBoard {
    pub fn new(operands: &[OperatorName], rng: &mut Rng) -> Self {
        let names = rng.shuffled(operands);
        let symbols: Vec<&'static str> = operands.iter().map(|op| op.symbol()).collect();
        let symbols = rng.shuffled(&symbols);
        Self {
            names,
            symbols,
            locked: Vec::new(),
            resolved: false,
        }
    }

    pub fn names(&self) -> &[OperatorName] {
        &self.names
    }

    pub fn symbols(&self) -> &[&'static str] {
        &self.symbols
    }

    pub fn is_locked(&self, name: OperatorName) -> bool {
        self.locked.contains(&name)
    }

    /// The name locked onto `symbol`, if any.
    pub fn locked_on(&self, symbol: &str) -> Option<OperatorName> {
        self.locked
            .iter()
            .copied()
            .find(|op| same_text(op.symbol(), symbol))
    }

    pub fn is_complete(&self) -> bool {
        self.locked.len() == self.names.len()
    }

    pub fn associate(&mut self, name: OperatorName, symbol: &str) -> Association {
        if self.resolved
            || !self.names.contains(&name)
            || !self.symbols.iter().any(|s| same_text(s, symbol))
            || self.is_locked(name)
            || self.locked_on(symbol).is_some()
        {
            return Association::Ignored;
        }
        if same_text(name.symbol(), symbol) {
            self.locked.push(name);
            Association::Locked
        } else {
            Association::Rejected
        }
    }

    /// Wrong pairings were already paid for, so the board only ever resolves
    /// as correct.
    pub fn confirm(&mut self) -> Submission {
        if self.resolved {
            Submission::Closed
        } else if self.is_complete() {
            self.resolved = true;
            Submission::Correct
        } else {
            Submission::Incomplete
        }
    }
}

// --- Sentence ----------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct SentenceSlot {
    prompt: String,
    choices: Vec<String>,
    correct: String,
    placed: Option<String>,
    resolved: bool,
}

impl SentenceSlot {
    pub fn new(prompt: &str, choices: &[String], correct: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            choices: choices.to_vec(),
            correct: correct.to_string(),
            placed: None,
            resolved: false,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn placed(&self) -> Option<&str> {
        self.placed.as_deref()
    }

    /// Drop `choice` into the blank, replacing whatever was there.
    pub fn place(&mut self, choice: &str) -> bool {
        if self.resolved {
            return false;
        }
        match self.choices.iter().find(|c| same_text(c, choice)) {
            Some(c) => {
                self.placed = Some(c.clone());
                true
            }
            None => false,
        }
    }

    pub fn confirm(&mut self) -> Submission {
        if self.resolved {
            return Submission::Closed;
        }
        let Some(placed) = self.placed.as_deref() else {
            return Submission::Incomplete;
        };
        if placed.trim().is_empty() {
            return Submission::Incomplete;
        }
        self.resolved = true;
        if same_text(placed, &self.correct) {
            Submission::Correct
        } else {
            Submission::Wrong
        }
    }
}

// --- Truth table -------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct TruthGrid {
    operator: OperatorName,
    columns: Vec<String>,
    rows: Vec<TruthRow>,
    cells: Vec<Option<Token>>,
    resolved: bool,
}

impl TruthGrid {
    pub fn new(operator: OperatorName, columns: &[String], rows: &[TruthRow]) -> Self {
        Self {
            operator,
            columns: columns.to_vec(),
            rows: rows.to_vec(),
            cells: vec![None; rows.len()],
            resolved: false,
        }
    }

    pub fn operator(&self) -> OperatorName {
        self.operator
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[TruthRow] {
        &self.rows
    }

    pub fn cell(&self, row: usize) -> Option<Token> {
        self.cells.get(row).copied().flatten()
    }

    pub fn fill(&mut self, row: usize, token: Token) -> bool {
        if self.resolved {
            return false;
        }
        match self.cells.get_mut(row) {
            Some(cell) => {
                *cell = Some(token);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self, row: usize) -> bool {
        if self.resolved {
            return false;
        }
        match self.cells.get_mut(row) {
            Some(cell) => cell.take().is_some(),
            None => false,
        }
    }

    pub fn confirm(&mut self) -> Submission {
        if self.resolved {
            return Submission::Closed;
        }
        if self.cells.iter().any(Option::is_none) {
            return Submission::Incomplete;
        }
        self.resolved = true;
        let all_right = self
            .rows
            .iter()
            .zip(&self.cells)
            .all(|(row, cell)| *cell == Some(Token::from_bool(row.expected)));
        if all_right {
            Submission::Correct
        } else {
            Submission::Wrong
        }
    }
}

// --- Fault -------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct FaultPick {
    pairs: Vec<(OperatorName, String)>,
    faulty_index: usize,
    picked: Option<usize>,
    resolved: bool,
}

impl FaultPick {
    pub fn new(pairs: &[(OperatorName, String)], faulty_index: usize) -> Self {
        Self {
            pairs: pairs.to_vec(),
            faulty_index,
            picked: None,
            resolved: false,
        }
    }

    pub fn pairs(&self) -> &[(OperatorName, String)] {
        &self.pairs
    }

    pub fn picked(&self) -> Option<usize> {
        self.picked
    }

    /// Drag pair `index` into the target, replacing any earlier pick.
    pub fn pick(&mut self, index: usize) -> bool {
        if self.resolved || index >= self.pairs.len() {
            return false;
        }
        self.picked = Some(index);
        true
    }

    pub fn confirm(&mut self) -> Submission {
        if self.resolved {
            return Submission::Closed;
        }
        let Some(picked) = self.picked else {
            return Submission::Incomplete;
        };
        self.resolved = true;
        if picked == self.faulty_index {
            Submission::Correct
        } else {
            Submission::Wrong
        }
    }
}

// --- Dispatch ----------------------------------------------------------------

#[derive(Clone, Debug)]
pub enum Puzzle {
    Match(MatchBoard),
    Sentence(SentenceSlot),
    TruthTable(TruthGrid),
    Fault(FaultPick),
}

impl Puzzle {
    pub fn from_question(question: &Question, rng: &mut Rng) -> Self {
        match &question.exercise {
            Exercise::Match { operands } => Puzzle::Match(MatchBoard::new(operands, rng)),
            Exercise::Sentence {
                prompt,
                choices,
                correct,
            } => Puzzle::Sentence(SentenceSlot::new(prompt, choices, correct)),
            Exercise::TruthTable {
                operator,
                columns,
                rows,
            } => Puzzle::TruthTable(TruthGrid::new(*operator, columns, rows)),
            Exercise::Fault {
                pairs,
                faulty_index,
            } => Puzzle::Fault(FaultPick::new(pairs, *faulty_index)),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Puzzle::Match(_) => Kind::Match,
            Puzzle::Sentence(_) => Kind::Sentence,
            Puzzle::TruthTable(_) => Kind::TruthTable,
            Puzzle::Fault(_) => Kind::Fault,
        }
    }

    pub fn confirm(&mut self) -> Submission {
        match self {
            Puzzle::Match(p) => p.confirm(),
            Puzzle::Sentence(p) => p.confirm(),
            Puzzle::TruthTable(p) => p.confirm(),
            Puzzle::Fault(p) => p.confirm(),
        }
    }
}
