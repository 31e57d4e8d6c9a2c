//! Logic Runner core crate.
//!
//! A short quiz run over the five propositional-logic operators (AND, OR,
//! NOT, IMPLIES, XOR). Each run draws questions of four kinds from a
//! difficulty-tiered bank: symbol matching, sentence completion, truth tables
//! and fault spotting. Lives, an optional per-question countdown and a
//! persisted leaderboard round it off.
//!
//! The engine (`run`, `puzzle`, `bank`, `leaderboard`) is plain Rust and is
//! tested natively; `ui` is the wasm shell exposed through `start_game()`.

use wasm_bindgen::prelude::*;

pub mod bank;
pub mod config;
pub mod error;
pub mod leaderboard;
pub mod logging;
pub mod operator;
pub mod puzzle;
pub mod question;
pub mod render;
pub mod rng;
pub mod run;
pub mod storage;
pub mod timer;
mod ui;

pub use config::{Difficulty, GameConfig, Mode};
pub use error::{GameError, Result};
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use operator::{OPERATORS, Operator, OperatorName};
pub use question::{Kind, Question};
pub use run::{Input, RunController, RunSummary, Step};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init();
}

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    ui::mount(GameConfig::default())
}

/// Same as [`start_game`] with a JSON config overlay; missing fields keep
/// their defaults.
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json).map_err(|err| {
        tracing::error!(%err, "rejected game config");
        JsValue::from_str(&err.to_string())
    })?;
    ui::mount(config)
}
