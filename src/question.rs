//! Immutable question definitions.
//!
//! A [`Question`] is pure data: once built it never changes during a run. The
//! mutable "which cells are filled" state lives in [`crate::puzzle`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::QuestionError;
use crate::operator::OperatorName;

/// Marker standing in for the missing word of a sentence prompt.
pub const BLANK: &str = "___";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Match,
    Sentence,
    TruthTable,
    Fault,
}

impl Kind {
    pub const ALL: [Kind; 4] = [Kind::Match, Kind::Sentence, Kind::TruthTable, Kind::Fault];

    pub fn title(self) -> &'static str {
        match self {
            Kind::Match => "Symbol Match",
            Kind::Sentence => "Statement Builder",
            Kind::TruthTable => "Truth Table",
            Kind::Fault => "Spot the Fault",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruthRow {
    pub inputs: Vec<bool>,
    pub expected: bool,
}

/// Kind-specific payload of a question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Exercise {
    Match {
        operands: Vec<OperatorName>,
    },
    Sentence {
        prompt: String,
        choices: Vec<String>,
        correct: String,
    },
    TruthTable {
        operator: OperatorName,
        columns: Vec<String>,
        rows: Vec<TruthRow>,
    },
    Fault {
        pairs: Vec<(OperatorName, String)>,
        faulty_index: usize,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub exercise: Exercise,
}

impl Question {
    pub fn matching(id: &str, operands: &[OperatorName]) -> Self {
        Self {
            id: id.to_string(),
            exercise: Exercise::Match {
                operands: operands.to_vec(),
            },
        }
    }

    pub fn sentence(id: &str, prompt: &str, choices: &[&str], correct: &str) -> Self {
        Self {
            id: id.to_string(),
            exercise: Exercise::Sentence {
                prompt: prompt.to_string(),
                choices: choices.iter().map(|c| c.to_string()).collect(),
                correct: correct.to_string(),
            },
        }
    }

    /// Full truth table for `operator`, rows ordered TT, TF, FT, FF
    /// (T, F for NOT).
    pub fn truth_table(id: &str, operator: OperatorName) -> Self {
        let sym = operator.symbol();
        let (columns, rows) = if operator.arity() == 1 {
            let columns = vec!["P".to_string(), format!("{sym}P")];
            let rows = [true, false]
                .into_iter()
                .map(|p| TruthRow {
                    inputs: vec![p],
                    expected: operator.apply(p, false),
                })
                .collect();
            (columns, rows)
        } else {
            let columns = vec!["P".to_string(), "Q".to_string(), format!("P {sym} Q")];
            let rows = [(true, true), (true, false), (false, true), (false, false)]
                .into_iter()
                .map(|(p, q)| TruthRow {
                    inputs: vec![p, q],
                    expected: operator.apply(p, q),
                })
                .collect();
            (columns, rows)
        };
        Self {
            id: id.to_string(),
            exercise: Exercise::TruthTable {
                operator,
                columns,
                rows,
            },
        }
    }

    /// Show every operator in `operators` with its real symbol except the one
    /// at `faulty_index`, which gets `wrong_symbol`.
    pub fn fault(
        id: &str,
        operators: &[OperatorName],
        faulty_index: usize,
        wrong_symbol: &str,
    ) -> Self {
        let pairs = operators
            .iter()
            .enumerate()
            .map(|(i, op)| {
                let shown = if i == faulty_index {
                    wrong_symbol.to_string()
                } else {
                    op.symbol().to_string()
                };
                (*op, shown)
            })
            .collect();
        Self {
            id: id.to_string(),
            exercise: Exercise::Fault {
                pairs,
                faulty_index,
            },
        }
    }

    pub fn kind(&self) -> Kind {
        match &self.exercise {
            Exercise::Match { .. } => Kind::Match,
            Exercise::Sentence { .. } => Kind::Sentence,
            Exercise::TruthTable { .. } => Kind::TruthTable,
            Exercise::Fault { .. } => Kind::Fault,
        }
    }

    /// Number of pairs a match question awards on success; 1 for other kinds.
    pub fn reward_units(&self) -> u32 {
        match &self.exercise {
            Exercise::Match { operands } => operands.len() as u32,
            _ => 1,
        }
    }

    /// Reject anything the puzzles cannot play fairly.
    pub fn validate(&self) -> Result<(), QuestionError> {
        let id = || self.id.clone();
        match &self.exercise {
            Exercise::Match { operands } => {
                if !(3..=5).contains(&operands.len()) {
                    return Err(QuestionError::OperandCount {
                        id: id(),
                        count: operands.len(),
                    });
                }
                let mut seen = HashSet::new();
                for op in operands {
                    if !seen.insert(*op) {
                        return Err(QuestionError::DuplicateOperand {
                            id: id(),
                            operator: op.to_string(),
                        });
                    }
                }
            }
            Exercise::Sentence {
                prompt,
                choices,
                correct,
            } => {
                if prompt.matches(BLANK).count() != 1 {
                    return Err(QuestionError::BlankMarker { id: id() });
                }
                if choices.is_empty() {
                    return Err(QuestionError::NoChoices { id: id() });
                }
                if !choices.iter().any(|c| c.trim() == correct.trim()) {
                    return Err(QuestionError::CorrectChoiceMissing {
                        id: id(),
                        choice: correct.clone(),
                    });
                }
            }
            Exercise::TruthTable {
                operator,
                columns,
                rows,
            } => {
                if rows.is_empty() {
                    return Err(QuestionError::EmptyTable { id: id() });
                }
                let expected = operator.arity();
                for (i, row) in rows.iter().enumerate() {
                    if row.inputs.len() != expected || columns.len() != expected + 1 {
                        return Err(QuestionError::RowArity {
                            id: id(),
                            row: i,
                            expected,
                            found: row.inputs.len(),
                        });
                    }
                    let b = row.inputs.get(1).copied().unwrap_or(false);
                    if operator.apply(row.inputs[0], b) != row.expected {
                        return Err(QuestionError::ExpectedOutput { id: id(), row: i });
                    }
                }
            }
            Exercise::Fault {
                pairs,
                faulty_index,
            } => {
                if pairs.len() < 2 {
                    return Err(QuestionError::TooFewPairs { id: id() });
                }
                if *faulty_index >= pairs.len() {
                    return Err(QuestionError::FaultyIndexOutOfRange {
                        id: id(),
                        index: *faulty_index,
                        len: pairs.len(),
                    });
                }
                // Exactly one pair is wrong, and it is the one we point at.
                for (i, (op, shown)) in pairs.iter().enumerate() {
                    let wrong = shown.trim() != op.symbol();
                    if wrong != (i == *faulty_index) {
                        return Err(QuestionError::FaultMismatch { id: id(), index: i });
                    }
                }
            }
        }
        Ok(())
    }
}
