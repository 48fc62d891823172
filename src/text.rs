//! Decoding of HTML entities in question source text
//!
//! Question and answer strings arrive entity-encoded (`&quot;`, `&#039;`, ...).
//! They are decoded once when a batch is received, so the text the player sees
//! and the text compared in `submit_answer` are the same.

use crate::types::QuestionRecord;

/// Decode HTML entities into plain text
pub fn decode_entities(raw: &str) -> String {
    html_escape::decode_html_entities(raw).into_owned()
}

/// Decode every text field of a question record
pub fn decode_record(record: QuestionRecord) -> QuestionRecord {
    QuestionRecord {
        question: decode_entities(&record.question),
        correct_answer: decode_entities(&record.correct_answer),
        incorrect_answers: record
            .incorrect_answers
            .iter()
            .map(|a| decode_entities(a))
            .collect(),
    }
}
