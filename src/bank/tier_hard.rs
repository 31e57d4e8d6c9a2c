// Hard tier: every operator on the board, subtler sentences and look-alike faults.
use std::sync::OnceLock;

use crate::operator::OperatorName::{And, Implies, Not, Or, Xor};
use crate::question::Question;

fn build_hard() -> Vec<Question> {
    vec![
        Question::matching("hard-match-1", &[And, Or, Not, Implies, Xor]),
        Question::matching("hard-match-2", &[Xor, Implies, Not, Or, And]),
        Question::sentence(
            "hard-sentence-1",
            "P → Q is equivalent to (___ P) ∨ Q.",
            &["NOT", "AND", "XOR", "IMPLIES"],
            "NOT",
        ),
        Question::sentence(
            "hard-sentence-2",
            "P ⊕ Q is equivalent to (P ∨ Q) ___ ¬(P ∧ Q).",
            &["AND", "OR", "IMPLIES", "XOR"],
            "AND",
        ),
        Question::sentence(
            "hard-sentence-3",
            "¬(P ∧ Q) is equivalent to ¬P ___ ¬Q.",
            &["AND", "OR", "XOR", "IMPLIES"],
            "OR",
        ),
        Question::sentence(
            "hard-sentence-4",
            "¬(P ∨ Q) is equivalent to ¬P ___ ¬Q.",
            &["OR", "AND", "IMPLIES", "XOR"],
            "AND",
        ),
        Question::sentence(
            "hard-sentence-5",
            "A false premise makes P ___ Q true no matter what Q is.",
            &["AND", "XOR", "IMPLIES", "OR"],
            "IMPLIES",
        ),
        Question::sentence(
            "hard-sentence-6",
            "P ⊕ P is always ___.",
            &["true", "false", "P"],
            "false",
        ),
        Question::truth_table("hard-tt-implies", Implies),
        Question::truth_table("hard-tt-xor", Xor),
        Question::truth_table("hard-tt-not", Not),
        Question::truth_table("hard-tt-or", Or),
        Question::fault("hard-fault-1", &[And, Or, Not, Implies, Xor], 4, "∨"),
        Question::fault("hard-fault-2", &[Implies, Xor, And, Or, Not], 0, "⇔"),
        Question::fault("hard-fault-3", &[Not, And, Xor, Implies, Or], 2, "⊗"),
    ]
}

pub fn hard() -> &'static [Question] {
    static POOL: OnceLock<Vec<Question>> = OnceLock::new();
    POOL.get_or_init(build_hard)
}
