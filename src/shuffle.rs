//! Answer shuffling
//!
//! Builds the presentation order for a question's answers. Entries are
//! permuted by position, so duplicate answer texts are kept as-is.

use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle answers using the thread-local RNG
pub fn shuffle_answers(correct_answer: &str, incorrect_answers: &[String]) -> Vec<String> {
    shuffle_answers_with(&mut rand::rng(), correct_answer, incorrect_answers)
}

/// Shuffle answers into a uniformly random order (Fisher-Yates via `SliceRandom`)
pub fn shuffle_answers_with<R: Rng + ?Sized>(
    rng: &mut R,
    correct_answer: &str,
    incorrect_answers: &[String],
) -> Vec<String> {
    let mut choices = Vec::with_capacity(incorrect_answers.len() + 1);
    choices.extend(incorrect_answers.iter().cloned());
    choices.push(correct_answer.to_string());
    choices.shuffle(rng);
    choices
}
