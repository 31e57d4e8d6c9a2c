// Easy tier: three-operator matches, the everyday connectives, obvious faults.
use std::sync::OnceLock;

use crate::operator::OperatorName::{And, Implies, Not, Or, Xor};
use crate::question::Question;

fn build_easy() -> Vec<Question> {
    vec![
        Question::matching("easy-match-1", &[And, Or, Not]),
        Question::matching("easy-match-2", &[And, Not, Implies]),
        Question::matching("easy-match-3", &[Or, Not, Xor]),
        Question::sentence(
            "easy-sentence-1",
            "\"It is raining ___ it is cold\" is true only when both parts are true.",
            &["AND", "OR", "NOT"],
            "AND",
        ),
        Question::sentence(
            "easy-sentence-2",
            "\"You can have tea ___ coffee\" is true when at least one option holds.",
            &["AND", "OR", "NOT"],
            "OR",
        ),
        Question::sentence(
            "easy-sentence-3",
            "___ P is true exactly when P is false.",
            &["AND", "OR", "NOT"],
            "NOT",
        ),
        Question::sentence(
            "easy-sentence-4",
            "The symbol ∧ stands for ___.",
            &["AND", "OR", "XOR"],
            "AND",
        ),
        Question::sentence(
            "easy-sentence-5",
            "The symbol ∨ stands for ___.",
            &["AND", "OR", "IMPLIES"],
            "OR",
        ),
        Question::sentence(
            "easy-sentence-6",
            "The symbol ¬ stands for ___.",
            &["NOT", "XOR", "AND"],
            "NOT",
        ),
        Question::truth_table("easy-tt-and", And),
        Question::truth_table("easy-tt-or", Or),
        Question::truth_table("easy-tt-not", Not),
        Question::fault("easy-fault-1", &[And, Or, Not], 0, "∨"),
        Question::fault("easy-fault-2", &[And, Or, Not], 2, "→"),
        Question::fault("easy-fault-3", &[Or, Not, And], 1, "⊕"),
    ]
}

pub fn easy() -> &'static [Question] {
    static POOL: OnceLock<Vec<Question>> = OnceLock::new();
    POOL.get_or_init(build_easy)
}
