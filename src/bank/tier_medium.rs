// Medium tier: four-operator matches, IMPLIES and XOR enter the tables.
use std::sync::OnceLock;

use crate::operator::OperatorName::{And, Implies, Not, Or, Xor};
use crate::question::Question;

fn build_medium() -> Vec<Question> {
    vec![
        Question::matching("medium-match-1", &[And, Or, Not, Implies]),
        Question::matching("medium-match-2", &[And, Or, Xor, Implies]),
        Question::matching("medium-match-3", &[Not, Or, Xor, And]),
        Question::sentence(
            "medium-sentence-1",
            "\"If it rains, ___ the ground is wet\" is only false when it rains and the ground stays dry.",
            &["then", "and", "or"],
            "then",
        ),
        Question::sentence(
            "medium-sentence-2",
            "\"Either the door is open ___ it is closed, but not both\" uses exclusive or.",
            &["XOR", "OR", "AND"],
            "XOR",
        ),
        Question::sentence(
            "medium-sentence-3",
            "P ___ Q is false only when P is true and Q is false.",
            &["IMPLIES", "AND", "XOR", "OR"],
            "IMPLIES",
        ),
        Question::sentence(
            "medium-sentence-4",
            "P ___ Q is true when exactly one of P and Q is true.",
            &["OR", "XOR", "AND", "IMPLIES"],
            "XOR",
        ),
        Question::sentence(
            "medium-sentence-5",
            "The symbol → stands for ___.",
            &["IMPLIES", "XOR", "NOT", "OR"],
            "IMPLIES",
        ),
        Question::sentence(
            "medium-sentence-6",
            "The symbol ⊕ stands for ___.",
            &["OR", "AND", "XOR", "IMPLIES"],
            "XOR",
        ),
        Question::truth_table("medium-tt-implies", Implies),
        Question::truth_table("medium-tt-xor", Xor),
        Question::truth_table("medium-tt-and", And),
        Question::truth_table("medium-tt-or", Or),
        Question::fault("medium-fault-1", &[And, Implies, Xor, Or], 1, "↔"),
        Question::fault("medium-fault-2", &[Xor, Not, Or, And], 0, "∨"),
        Question::fault("medium-fault-3", &[Implies, Or, Not, Xor], 3, "∧"),
    ]
}

pub fn medium() -> &'static [Question] {
    static POOL: OnceLock<Vec<Question>> = OnceLock::new();
    POOL.get_or_init(build_medium)
}
