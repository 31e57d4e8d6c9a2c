//! The five connectives the game teaches.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperatorName {
    And,
    Or,
    Not,
    Implies,
    Xor,
}

/// Static operator metadata (name, glyph, short explanation).
#[derive(Clone, Copy, Debug)]
pub struct Operator {
    pub name: OperatorName,
    pub symbol: &'static str,
    pub description: &'static str,
}

pub const OPERATORS: &[Operator] = &[
    Operator {
        name: OperatorName::And,
        symbol: "∧",
        description: "True only when both sides are true.",
    },
    Operator {
        name: OperatorName::Or,
        symbol: "∨",
        description: "True when at least one side is true.",
    },
    Operator {
        name: OperatorName::Not,
        symbol: "¬",
        description: "Flips the truth value of a single statement.",
    },
    Operator {
        name: OperatorName::Implies,
        symbol: "→",
        description: "False only when the left side is true and the right side is false.",
    },
    Operator {
        name: OperatorName::Xor,
        symbol: "⊕",
        description: "True when exactly one side is true.",
    },
];

impl OperatorName {
    pub const ALL: [OperatorName; 5] = [
        OperatorName::And,
        OperatorName::Or,
        OperatorName::Not,
        OperatorName::Implies,
        OperatorName::Xor,
    ];

    pub fn info(self) -> &'static Operator {
        // OPERATORS is declared in the same order as the enum.
        &OPERATORS[self as usize]
    }

    pub fn symbol(self) -> &'static str {
        self.info().symbol
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperatorName::And => "AND",
            OperatorName::Or => "OR",
            OperatorName::Not => "NOT",
            OperatorName::Implies => "IMPLIES",
            OperatorName::Xor => "XOR",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|op| op.as_str().eq_ignore_ascii_case(s))
    }

    /// Number of inputs the connective takes.
    pub fn arity(self) -> usize {
        match self {
            OperatorName::Not => 1,
            _ => 2,
        }
    }

    /// Evaluate the connective. `NOT` ignores `b`.
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            OperatorName::And => a && b,
            OperatorName::Or => a || b,
            OperatorName::Not => !a,
            OperatorName::Implies => !a || b,
            OperatorName::Xor => a ^ b,
        }
    }
}

impl fmt::Display for OperatorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_lookup_matches_enum_order() {
        for op in OperatorName::ALL {
            assert_eq!(op.info().name, op);
        }
    }

    #[test]
    fn implies_is_false_only_for_true_then_false() {
        let op = OperatorName::Implies;
        assert!(op.apply(false, false));
        assert!(op.apply(false, true));
        assert!(!op.apply(true, false));
        assert!(op.apply(true, true));
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(OperatorName::parse(" xor "), Some(OperatorName::Xor));
        assert_eq!(OperatorName::parse("nand"), None);
    }

    #[test]
    fn serde_uses_uppercase_names() {
        let json = serde_json::to_string(&OperatorName::Implies).unwrap();
        assert_eq!(json, "\"IMPLIES\"");
    }
}
