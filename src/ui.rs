//! Browser shell: mounts into `#logic-runner`, owns the countdown interval
//! and advance timeouts, and turns clicks into controller calls.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlInputElement, window};

use crate::config::{Difficulty, GameConfig, Mode};
use crate::error::GameError;
use crate::leaderboard::Leaderboard;
use crate::operator::OperatorName;
use crate::puzzle::Token;
use crate::render::{self, Held, Target};
use crate::run::{
    AdvanceTicket, Input, Outcome, PhaseKind, QuestionResult, RunController, RunId, SaveOutcome,
    Step,
};
use crate::storage::LocalStorage;

const ROOT_ID: &str = "logic-runner";
const TOAST_ID: &str = "lr-toast";
const NAME_INPUT_ID: &str = "lr-name";
const TOAST_MS: i32 = 1800;
const TOAST_STYLE: &str = "position:fixed; top:14px; left:50%; transform:translateX(-50%); font-family:'Fira Code', monospace; font-size:15px; padding:6px 14px; background:rgba(0,0,0,0.72); border:1px solid #333; border-radius:6px; color:#ffd166; z-index:50;";

/// What a click asked for, decoded from the element's `data-*` attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Difficulty(Difficulty),
    Mode(Mode),
    Start,
    Retry,
    Quit,
    Hold(Held),
    Drop(Target),
    Confirm,
    Save,
    Skip,
    ClearBoard,
}

impl Action {
    pub fn decode(name: &str, attr: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let action = match name {
            "difficulty" => Action::Difficulty(Difficulty::parse(&attr("data-value")?)?),
            "mode" => Action::Mode(Mode::parse(&attr("data-value")?)?),
            "start" => Action::Start,
            "retry" => Action::Retry,
            "quit" => Action::Quit,
            "hold-name" => Action::Hold(Held::Name(OperatorName::parse(&attr("data-op")?)?)),
            "hold-choice" => Action::Hold(Held::Choice(attr("data-choice")?)),
            "hold-token" => Action::Hold(Held::Token(Token::parse(&attr("data-token")?)?)),
            "hold-pair" => Action::Hold(Held::Pair(attr("data-index")?.parse().ok()?)),
            "drop-symbol" => Action::Drop(Target::Symbol(attr("data-sym")?)),
            "drop-blank" => Action::Drop(Target::Blank),
            "drop-cell" => Action::Drop(Target::Cell(attr("data-row")?.parse().ok()?)),
            "drop-fault" => Action::Drop(Target::FaultSlot),
            "confirm" => Action::Confirm,
            "save" => Action::Save,
            "skip" => Action::Skip,
            "clear-board" => Action::ClearBoard,
            _ => return None,
        };
        Some(action)
    }
}

/// The live countdown interval and its callback.
///
/// A stopped callback is kept until the next stop because the interval may
/// be stopped from inside that very callback.
struct IntervalSlot<K, C> {
    active: Option<(K, i32, C)>,
    retired: Option<C>,
}

impl<K: PartialEq + Copy, C> IntervalSlot<K, C> {
    fn new() -> Self {
        Self {
            active: None,
            retired: None,
        }
    }

    fn is_for(&self, key: K) -> bool {
        matches!(&self.active, Some((k, _, _)) if *k == key)
    }

    fn set(&mut self, key: K, handle: i32, callback: C) {
        self.active = Some((key, handle, callback));
    }

    /// Detach the active interval and return its handle for clearing.
    fn stop(&mut self) -> Option<i32> {
        let (_, handle, callback) = self.active.take()?;
        // Drops the one retired by the previous stop.
        self.retired.replace(callback);
        Some(handle)
    }
}

struct App {
    doc: Document,
    root: Element,
    controller: RunController,
    board: Leaderboard<LocalStorage>,
    difficulty: Difficulty,
    mode: Mode,
    held: Option<Held>,
    interval: IntervalSlot<RunId, Closure<dyn FnMut()>>,
    toast_seq: u32,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn with_app(f: impl FnOnce(&mut App)) {
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            f(app);
        }
    });
}

/// Build (or rebuild) the game inside `#logic-runner`, creating the element
/// when the page does not provide one.
pub fn mount(config: GameConfig) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let root = ensure_root(&doc)?;
    ensure_toast(&doc)?;

    let board = Leaderboard::load(
        LocalStorage::open(),
        config.storage.clone(),
        config.leaderboard_capacity,
    );
    let app = App {
        doc,
        root: root.clone(),
        controller: RunController::new(config),
        board,
        difficulty: Difficulty::default(),
        mode: Mode::default(),
        held: None,
        interval: IntervalSlot::new(),
        toast_seq: 0,
    };

    APP.with(|cell| {
        let mut app = app;
        if let Some(old) = cell.borrow_mut().as_mut() {
            old.stop_interval();
            // Pending toast timeouts from the old app compare against this.
            app.toast_seq = old.toast_seq;
        }
        cell.replace(Some(app));
    });

    // One delegated listener per root element, even across remounts.
    if root.get_attribute("data-bound").is_none() {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            on_click(evt);
        }) as Box<dyn FnMut(_)>);
        root.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        root.set_attribute("data-bound", "1")?;
    }

    with_app(|app| app.render());
    tracing::info!("logic runner mounted");
    Ok(())
}

fn ensure_root(doc: &Document) -> Result<Element, JsValue> {
    if let Some(el) = doc.get_element_by_id(ROOT_ID) {
        return Ok(el);
    }
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
    let div = doc.create_element("div")?;
    div.set_id(ROOT_ID);
    div.set_attribute(
        "style",
        "max-width:760px; margin:32px auto; font-family:'Fira Code', monospace; color:#eee;",
    )?;
    body.append_child(&div)?;
    Ok(div)
}

fn ensure_toast(doc: &Document) -> Result<(), JsValue> {
    if doc.get_element_by_id(TOAST_ID).is_some() {
        return Ok(());
    }
    if let Some(body) = doc.body() {
        let div = doc.create_element("div")?;
        div.set_id(TOAST_ID);
        div.set_attribute("style", &format!("{TOAST_STYLE} display:none;"))?;
        body.append_child(&div)?;
    }
    Ok(())
}

fn on_click(evt: web_sys::MouseEvent) {
    let Some(el) = evt.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return;
    };
    let Ok(Some(el)) = el.closest("[data-action]") else {
        return;
    };
    let Some(name) = el.get_attribute("data-action") else {
        return;
    };
    match Action::decode(&name, |attr| el.get_attribute(attr)) {
        Some(action) => with_app(|app| app.dispatch(action)),
        None => tracing::debug!(%name, "unrecognised action"),
    }
}

/// Epoch milliseconds.
fn now_ms() -> i64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.time_origin() + p.now())
        .unwrap_or(0.0) as i64
}

impl App {
    fn dispatch(&mut self, action: Action) {
        match action {
            Action::Difficulty(d) => self.difficulty = d,
            Action::Mode(m) => self.mode = m,
            Action::Start => {
                let started = self.controller.start(self.difficulty, self.mode);
                self.after_start(started);
            }
            Action::Retry => {
                self.stop_interval();
                self.held = None;
                let started = self.controller.retry();
                self.after_start(started);
            }
            Action::Quit => {
                self.stop_interval();
                self.held = None;
                self.controller.quit();
            }
            Action::Hold(item) => {
                // Clicking the held item again puts it down.
                self.held = if self.held.as_ref() == Some(&item) {
                    None
                } else {
                    Some(item)
                };
            }
            Action::Drop(target) => {
                let input = match (self.held.take(), &target) {
                    (Some(held), _) => held.drop_onto(&target),
                    (None, Target::Cell(row)) => Some(Input::Clear { row: *row }),
                    (None, _) => None,
                };
                if let Some(input) = input {
                    let step = self.controller.input(input);
                    self.handle(step);
                }
            }
            Action::Confirm => {
                self.held = None;
                let step = self.controller.input(Input::Confirm);
                self.handle(step);
            }
            Action::Save => {
                let name = self.name_field();
                self.acknowledge(Some(&name));
            }
            Action::Skip => self.acknowledge(None),
            Action::ClearBoard => {
                if let Err(err) = self.board.clear() {
                    tracing::warn!(%err, "could not clear leaderboard");
                    self.toast("Could not clear the leaderboard");
                }
            }
        }
        self.render();
    }

    fn after_start(&mut self, started: Result<Step, GameError>) {
        match started {
            Ok(step) => self.handle(step),
            Err(err) => {
                tracing::warn!(%err, "run did not start");
                self.toast(&format!("Could not start: {err}"));
            }
        }
    }

    /// React to a controller step. Callers render afterwards.
    fn handle(&mut self, step: Step) {
        match step {
            Step::Live { run, .. } => self.ensure_interval(run),
            Step::Locked(op) => self.toast(&format!("{op} matched")),
            Step::Penalty { lives } => self.toast(&format!("Wrong pairing! Lives left: {lives}")),
            Step::Incomplete => self.toast("Finish the question first"),
            Step::Closed { result, ticket, .. } => {
                let message = match result {
                    QuestionResult::Solved { reward } => format!("Correct! +{reward}"),
                    QuestionResult::Missed => "Not quite".to_string(),
                    QuestionResult::TimedOut => "Time's up".to_string(),
                };
                self.toast(&message);
                self.schedule_advance(ticket);
            }
            Step::Ended(summary) => {
                self.stop_interval();
                self.held = None;
                if !summary.is_empty() {
                    self.toast(match summary.outcome {
                        Outcome::Won => "Run complete!",
                        Outcome::Lost => "Game over",
                    });
                }
            }
            Step::Ignored | Step::Updated | Step::Tick { .. } => {}
        }
    }

    fn ensure_interval(&mut self, run: RunId) {
        let timed = self
            .controller
            .state()
            .is_some_and(|s| s.mode() == Mode::Timed);
        if !timed || self.interval.is_for(run) {
            return;
        }
        self.stop_interval();
        let Some(win) = window() else {
            return;
        };
        let closure = Closure::wrap(Box::new(move || {
            with_app(|app| {
                let step = app.controller.tick(run);
                if !matches!(step, Step::Ignored) {
                    app.handle(step);
                    app.render();
                }
            });
        }) as Box<dyn FnMut()>);
        match win.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            1000,
        ) {
            Ok(handle) => self.interval.set(run, handle, closure),
            Err(err) => tracing::warn!(?err, "could not start countdown"),
        }
    }

    fn stop_interval(&mut self) {
        if let Some(handle) = self.interval.stop() {
            if let Some(win) = window() {
                win.clear_interval_with_handle(handle);
            }
        }
    }

    fn schedule_advance(&self, ticket: AdvanceTicket) {
        let Some(win) = window() else {
            return;
        };
        let delay = i32::try_from(self.controller.config().advance_delay_ms).unwrap_or(i32::MAX);
        let callback = Closure::once_into_js(move || {
            with_app(|app| {
                let step = app.controller.advance(ticket);
                if !matches!(step, Step::Ignored) {
                    app.handle(step);
                    app.render();
                }
            });
        });
        if let Err(err) =
            win.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
        {
            tracing::warn!(?err, "could not schedule next question");
        }
    }

    fn acknowledge(&mut self, name: Option<&str>) {
        match self.controller.acknowledge(name, &mut self.board, now_ms()) {
            Ok(SaveOutcome::Ranked(rank)) => self.toast(&format!("Saved at #{}", rank + 1)),
            Ok(SaveOutcome::BelowCutoff) => self.toast("Score did not make the leaderboard"),
            Ok(SaveOutcome::Skipped) => {}
            Err(err) => self.toast(&format!("Could not save: {err}")),
        }
    }

    fn name_field(&self) -> String {
        self.doc
            .get_element_by_id(NAME_INPUT_ID)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default()
    }

    fn toast(&mut self, message: &str) {
        let Some(el) = self.doc.get_element_by_id(TOAST_ID) else {
            return;
        };
        el.set_text_content(Some(message));
        el.set_attribute("style", &format!("{TOAST_STYLE} display:block;"))
            .ok();
        self.toast_seq = self.toast_seq.wrapping_add(1);
        let seq = self.toast_seq;
        let Some(win) = window() else {
            return;
        };
        // Only the newest toast hides itself.
        let hide = Closure::once_into_js(move || {
            with_app(|app| {
                if app.toast_seq != seq {
                    return;
                }
                if let Some(el) = app.doc.get_element_by_id(TOAST_ID) {
                    el.set_attribute("style", &format!("{TOAST_STYLE} display:none;"))
                        .ok();
                }
            });
        });
        win.set_timeout_with_callback_and_timeout_and_arguments_0(hide.unchecked_ref(), TOAST_MS)
            .ok();
    }

    fn render(&self) {
        let html = match self.controller.phase() {
            PhaseKind::Idle => format!(
                "{}{}",
                render::settings(self.difficulty, self.mode),
                render::leaderboard(self.board.list())
            ),
            PhaseKind::InProgress => match self.controller.state() {
                Some(state) => {
                    let body = match state.live() {
                        Some(puzzle) => render::question(puzzle, self.held.as_ref()),
                        None => "<div class='card pending'>Next question…</div>".to_string(),
                    };
                    format!(
                        "{}{body}",
                        render::hud(state, self.controller.config().starting_lives)
                    )
                }
                None => String::new(),
            },
            PhaseKind::Finished => match self.controller.summary() {
                Some(summary) => {
                    let prefill = self.board.player_name().unwrap_or_default();
                    format!(
                        "{}{}",
                        render::finished(summary, &prefill, self.board.qualifies(summary.score)),
                        render::leaderboard(self.board.list())
                    )
                }
                None => String::new(),
            },
        };
        self.root.set_inner_html(&html);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::rc::Rc;

    fn decode(name: &str, attrs: &[(&str, &str)]) -> Option<Action> {
        let attrs: HashMap<_, _> = attrs.iter().copied().collect();
        Action::decode(name, |key| attrs.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn decodes_settings_actions() {
        assert_eq!(
            decode("difficulty", &[("data-value", "hard")]),
            Some(Action::Difficulty(Difficulty::Hard))
        );
        assert_eq!(decode("mode", &[("data-value", "timed")]), Some(Action::Mode(Mode::Timed)));
        assert_eq!(decode("difficulty", &[("data-value", "brutal")]), None);
        assert_eq!(decode("start", &[]), Some(Action::Start));
    }

    #[test]
    fn decodes_hold_and_drop_payloads() {
        assert_eq!(
            decode("hold-name", &[("data-op", "XOR")]),
            Some(Action::Hold(Held::Name(OperatorName::Xor)))
        );
        assert_eq!(
            decode("hold-token", &[("data-token", "F")]),
            Some(Action::Hold(Held::Token(Token::F)))
        );
        assert_eq!(
            decode("drop-cell", &[("data-row", "3")]),
            Some(Action::Drop(Target::Cell(3)))
        );
        assert_eq!(
            decode("drop-symbol", &[("data-sym", "→")]),
            Some(Action::Drop(Target::Symbol("→".into())))
        );
        assert_eq!(decode("hold-pair", &[("data-index", "x")]), None);
        assert_eq!(decode("drop-cell", &[]), None);
    }

    #[test]
    fn unknown_actions_are_ignored() {
        assert_eq!(decode("explode", &[]), None);
    }

    #[test]
    fn interval_slot_keeps_one_stopped_callback() {
        let callback = Rc::new(());
        let mut slot: IntervalSlot<u64, Rc<()>> = IntervalSlot::new();
        assert_eq!(slot.stop(), None);

        slot.set(1, 10, Rc::clone(&callback));
        assert!(slot.is_for(1));
        assert!(!slot.is_for(2));
        assert_eq!(slot.stop(), Some(10));
        assert!(!slot.is_for(1));
        // still alive: it may be the callback that asked to stop
        assert_eq!(Rc::strong_count(&callback), 2);

        let next = Rc::new(());
        slot.set(2, 11, Rc::clone(&next));
        assert_eq!(slot.stop(), Some(11));
        assert_eq!(Rc::strong_count(&callback), 1);
        assert_eq!(Rc::strong_count(&next), 2);
    }
}
