//! Markup for the browser shell.
//!
//! Everything here is a pure function from game state to an HTML string, so
//! it can be checked natively. Interactive elements carry a `data-action`
//! attribute (plus whatever payload the action needs); the shell has one
//! delegated click handler that reads them back.
//!
//! Dragging is modelled as "hold then drop": clicking a source item makes it
//! the [`Held`] item, clicking a target turns the pair into an [`Input`].

use std::fmt::Write as _;

use crate::config::{Difficulty, Mode};
use crate::leaderboard::LeaderboardEntry;
use crate::operator::{OPERATORS, OperatorName};
use crate::puzzle::{FaultPick, MatchBoard, Puzzle, SentenceSlot, Token, TruthGrid};
use crate::question::BLANK;
use crate::run::{Input, Outcome, RunState, RunSummary};

/// The item currently "in hand".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Held {
    Name(OperatorName),
    Choice(String),
    Token(Token),
    Pair(usize),
}

/// Something the held item can be dropped onto.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Symbol(String),
    Blank,
    Cell(usize),
    FaultSlot,
}

impl Held {
    /// The engine input for dropping this item on `target`, if the pairing
    /// makes sense.
    pub fn drop_onto(&self, target: &Target) -> Option<Input> {
        match (self, target) {
            (Held::Name(op), Target::Symbol(sym)) => Some(Input::Associate {
                operator: *op,
                symbol: sym.clone(),
            }),
            (Held::Choice(choice), Target::Blank) => Some(Input::Place {
                choice: choice.clone(),
            }),
            (Held::Token(token), Target::Cell(row)) => Some(Input::Fill {
                row: *row,
                token: *token,
            }),
            (Held::Pair(index), Target::FaultSlot) => Some(Input::Pick { index: *index }),
            _ => None,
        }
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn held_class(is_held: bool) -> &'static str {
    if is_held { " held" } else { "" }
}

// --- HUD ---------------------------------------------------------------------

pub fn hud(state: &RunState, max_lives: u32) -> String {
    let total = state.questions().len();
    let shown = (state.current_index() + 1).min(total);
    let mut html = String::new();
    let _ = write!(
        html,
        "<div class='hud'><span class='hud-level'>{shown}/{total}</span>\
         <span class='hud-score'>Score: {}</span><span class='hud-lives'>",
        state.score()
    );
    // Hearts: filled for remaining lives, hollow for lost ones.
    for i in 0..max_lives.max(state.lives()) {
        html.push_str(if i < state.lives() {
            "<span class='heart'>♥</span>"
        } else {
            "<span class='heart lost'>♡</span>"
        });
    }
    html.push_str("</span>");
    if let Some(secs) = state.time_remaining() {
        let _ = write!(html, "<span class='hud-timer'>⏱ {secs}s</span>");
    }
    html.push_str(
        "<button class='btn' data-action='retry'>Retry</button>\
         <button class='btn' data-action='quit'>Quit</button></div>",
    );
    html
}

// --- Questions ---------------------------------------------------------------

pub fn question(puzzle: &Puzzle, held: Option<&Held>) -> String {
    let (subtitle, body) = match puzzle {
        Puzzle::Match(board) => (
            "Match the operators to their symbols.",
            match_body(board, held),
        ),
        Puzzle::Sentence(slot) => (
            "Drop the word that completes the statement.",
            sentence_body(slot, held),
        ),
        Puzzle::TruthTable(grid) => (
            "Fill in the output column with T or F.",
            truth_table_body(grid, held),
        ),
        Puzzle::Fault(pick) => (
            "One operator is shown with the wrong symbol. Drop it in the bin.",
            fault_body(pick, held),
        ),
    };
    let title = puzzle.kind().title();
    format!(
        "<div class='card'><div class='game-section-title'>{title}</div>\
         <p class='subtitle'>{subtitle}</p>{body}\
         <button class='btn btn-primary' data-action='confirm'>Check</button></div>"
    )
}

fn match_body(board: &MatchBoard, held: Option<&Held>) -> String {
    let mut html = String::from(
        "<div class='matching-container'><div class='game-column'>\
         <div class='column-title'>Operators</div>",
    );
    for op in board.names() {
        if board.is_locked(*op) {
            continue;
        }
        let is_held = held == Some(&Held::Name(*op));
        let _ = write!(
            html,
            "<div class='draggable-item{}' data-action='hold-name' data-op='{op}'>{op}</div>",
            held_class(is_held)
        );
    }
    html.push_str("</div><div class='game-column'><div class='column-title'>Symbols</div>");
    for sym in board.symbols() {
        let sym_attr = escape(sym);
        match board.locked_on(sym) {
            Some(op) => {
                let _ = write!(
                    html,
                    "<div class='drop-zone locked'><span>{sym_attr}</span>\
                     <div class='match-content'>{op}</div></div>"
                );
            }
            None => {
                let _ = write!(
                    html,
                    "<div class='drop-zone' data-action='drop-symbol' data-sym='{sym_attr}'>\
                     <span>{sym_attr}</span></div>"
                );
            }
        }
    }
    html.push_str("</div></div>");
    html
}

fn sentence_body(slot: &SentenceSlot, held: Option<&Held>) -> String {
    let filled = match slot.placed() {
        Some(choice) => escape(choice),
        None => "_____".to_string(),
    };
    let (before, after) = slot.prompt().split_once(BLANK).unwrap_or((slot.prompt(), ""));
    let mut html = format!(
        "<p class='sentence'>{}<span class='drop-zone blank' data-action='drop-blank'>{filled}</span>{}</p>\
         <div class='choices'>",
        escape(before),
        escape(after)
    );
    for choice in slot.choices() {
        let is_held = held == Some(&Held::Choice(choice.clone()));
        let c = escape(choice);
        let _ = write!(
            html,
            "<div class='draggable-item{}' data-action='hold-choice' data-choice='{c}'>{c}</div>",
            held_class(is_held)
        );
    }
    html.push_str("</div>");
    html
}

fn truth_table_body(grid: &TruthGrid, held: Option<&Held>) -> String {
    let mut html = String::from("<table class='tt-table'><tr>");
    for col in grid.columns() {
        let _ = write!(html, "<th>{}</th>", escape(col));
    }
    html.push_str("</tr>");
    for (i, row) in grid.rows().iter().enumerate() {
        html.push_str("<tr>");
        for input in &row.inputs {
            let _ = write!(html, "<td>{}</td>", Token::from_bool(*input).as_str());
        }
        let cell = grid.cell(i).map(Token::as_str).unwrap_or("");
        let _ = write!(
            html,
            "<td><div class='drop-zone tt-drop' data-action='drop-cell' data-row='{i}'>{cell}</div></td></tr>"
        );
    }
    html.push_str("</table><div class='chips'>");
    for token in [Token::T, Token::F] {
        let is_held = held == Some(&Held::Token(token));
        let t = token.as_str();
        let _ = write!(
            html,
            "<div class='draggable-item tt-chip{}' data-action='hold-token' data-token='{t}'>{t}</div>",
            held_class(is_held)
        );
    }
    html.push_str("</div>");
    html
}

fn fault_body(pick: &FaultPick, held: Option<&Held>) -> String {
    let mut html = String::from("<div class='fault-pairs'>");
    for (i, (op, shown)) in pick.pairs().iter().enumerate() {
        let is_held = held == Some(&Held::Pair(i));
        let picked = if pick.picked() == Some(i) { " picked" } else { "" };
        let _ = write!(
            html,
            "<div class='draggable-item{}{picked}' data-action='hold-pair' data-index='{i}'>{op} = {}</div>",
            held_class(is_held),
            escape(shown)
        );
    }
    let target = match pick.picked().and_then(|i| pick.pairs().get(i)) {
        Some((op, shown)) => format!("{op} = {}", escape(shown)),
        None => "Drop the faulty pair here".to_string(),
    };
    let _ = write!(
        html,
        "</div><div class='drop-zone fault-bin' data-action='drop-fault'>{target}</div>"
    );
    html
}

// --- Settings / end of run / leaderboard --------------------------------------

pub fn settings(difficulty: Difficulty, mode: Mode) -> String {
    let mut html = String::from(
        "<div class='card settings'><div class='game-section-title'>Logic Runner</div>\
         <div id='difficulty-select'>",
    );
    for d in Difficulty::ALL {
        let active = if d == difficulty { " active" } else { "" };
        let _ = write!(
            html,
            "<div class='settings-card{active}' data-action='difficulty' data-value='{d}'>{d}</div>"
        );
    }
    html.push_str("</div><div id='mode-select'>");
    for m in [Mode::Classic, Mode::Timed] {
        let active = if m == mode { " active" } else { "" };
        let _ = write!(
            html,
            "<div class='settings-card{active}' data-action='mode' data-value='{m}'>{m}</div>"
        );
    }
    html.push_str(
        "</div><button class='btn btn-primary' data-action='start'>Start</button>",
    );
    html.push_str(&operator_guide());
    html.push_str("</div>");
    html
}

/// Name, symbol and one-line meaning of every operator.
pub fn operator_guide() -> String {
    let mut html = String::from("<ul class='operator-guide'>");
    for op in OPERATORS {
        let _ = write!(
            html,
            "<li><span class='op-symbol'>{}</span> <b>{}</b> {}</li>",
            escape(op.symbol),
            op.name,
            escape(op.description)
        );
    }
    html.push_str("</ul>");
    html
}

pub fn finished(summary: &RunSummary, prefill: &str, qualifies: bool) -> String {
    let heading = if summary.is_empty() {
        "No questions available"
    } else {
        match summary.outcome {
            Outcome::Won => "Run complete!",
            Outcome::Lost => "Game over",
        }
    };
    let mut html = format!(
        "<div class='card end'><div class='game-section-title'>{heading}</div>\
         <p>Score: {} · Solved {}/{}</p>",
        summary.score,
        summary.solved(),
        summary.total
    );
    if qualifies && !summary.is_empty() {
        let _ = write!(
            html,
            "<input id='lr-name' maxlength='24' value='{}' placeholder='Your name'>\
             <button class='btn btn-primary' data-action='save'>Save score</button>",
            escape(prefill)
        );
    }
    html.push_str(
        "<button class='btn' data-action='skip'>Continue</button>\
         <button class='btn' data-action='retry'>Play again</button></div>",
    );
    html
}

pub fn leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "<div class='card leaderboard'><p>No scores yet.</p></div>".to_string();
    }
    let mut html = String::from(
        "<div class='card leaderboard'><table><tr><th>#</th><th>Name</th><th>Score</th></tr>",
    );
    for (i, e) in entries.iter().enumerate() {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            i + 1,
            escape(&e.name),
            e.score
        );
    }
    html.push_str(
        "</table><button class='btn' data-action='clear-board'>Clear</button></div>",
    );
    html
}
