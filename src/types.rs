use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type SessionId = String;
pub type CategoryId = u32;

/// Difficulty sent with every question request
pub const DIFFICULTY: &str = "medium";

/// Answer type sent with every question request
pub const ANSWER_TYPE: &str = "multiple";

/// A quiz category. The catalogue is fixed at build time.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: &'static str,
}

pub const CATEGORIES: &[Category] = &[
    Category { id: 9, name: "General Knowledge" },
    Category { id: 18, name: "Science: Computers" },
    Category { id: 11, name: "Entertainment: Film" },
    Category { id: 21, name: "Sports" },
    Category { id: 22, name: "Geography" },
    Category { id: 23, name: "History" },
    Category { id: 24, name: "Art" },
    Category { id: 25, name: "Animals" },
    Category { id: 17, name: "Science: Nature" },
    Category { id: 12, name: "Music" },
    Category { id: 14, name: "Entertainment: Video Games" },
];

impl Category {
    /// Look up a category in the catalogue
    pub fn by_id(id: CategoryId) -> Option<Category> {
        CATEGORIES.iter().find(|c| c.id == id).copied()
    }
}

/// Question counts the player may pick from
pub const ALLOWED_COUNTS: [u32; 4] = [5, 10, 15, 20];

/// Number of questions requested for a session, restricted to [`ALLOWED_COUNTS`]
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(into = "u32")]
pub struct QuestionCount(u32);

impl QuestionCount {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for QuestionCount {
    fn default() -> Self {
        Self(ALLOWED_COUNTS[0])
    }
}

impl TryFrom<u32> for QuestionCount {
    type Error = SelectionError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if ALLOWED_COUNTS.contains(&value) {
            Ok(Self(value))
        } else {
            Err(SelectionError::UnsupportedCount(value))
        }
    }
}

impl From<QuestionCount> for u32 {
    fn from(count: QuestionCount) -> Self {
        count.0
    }
}

/// Rejected category/count input from the host
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Unknown category id: {0}")]
    UnknownCategory(CategoryId),

    #[error("Unsupported question count {0} (allowed: 5, 10, 15, 20)")]
    UnsupportedCount(u32),
}

impl SelectionError {
    /// Protocol error code for this rejection
    pub fn code(&self) -> &'static str {
        match self {
            SelectionError::UnknownCategory(_) => "UNKNOWN_CATEGORY",
            SelectionError::UnsupportedCount(_) => "UNSUPPORTED_COUNT",
        }
    }
}

/// A single multiple-choice question as received from the question source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionRecord {
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

/// A question as shown to the player, with answers in presentation order
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PresentedQuestion {
    pub question: String,
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Idle,
    AwaitingQuestions,
    InProgress,
    ShowingFeedback,
    Finished,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Correct,
    Incorrect,
}

/// Transient result of the last answer, shown until the session advances
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    /// Only populated for incorrect answers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

impl Feedback {
    pub fn message(&self) -> String {
        match (&self.kind, &self.correct_answer) {
            (FeedbackKind::Correct, _) => "Correct Answer!".to_string(),
            (FeedbackKind::Incorrect, Some(answer)) => {
                format!("Wrong Answer! The correct answer was: {}", answer)
            }
            (FeedbackKind::Incorrect, None) => "Wrong Answer!".to_string(),
        }
    }
}
