mod opentdb;

use async_trait::async_trait;
use std::time::Duration;

pub use opentdb::OpenTdbSource;

use crate::types::{CategoryId, QuestionCount, QuestionRecord, ANSWER_TYPE, DIFFICULTY};

/// Result type for question source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors that can occur while fetching questions
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Question service returned status: {0}")]
    Http(u16),

    #[error("Response parsing failed: {0}")]
    Parse(String),

    #[error("Question service rejected the request parameters")]
    InvalidParameter,

    #[error("Session token error (code {0})")]
    Token(i64),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Question service returned unknown response code {0}")]
    Api(i64),
}

/// Parameters of one question batch request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub category_id: CategoryId,
    pub count: QuestionCount,
    pub difficulty: &'static str,
    pub answer_type: &'static str,
}

impl FetchRequest {
    pub fn new(category_id: CategoryId, count: QuestionCount) -> Self {
        Self {
            category_id,
            count,
            difficulty: DIFFICULTY,
            answer_type: ANSWER_TYPE,
        }
    }
}

/// Trait that all question sources must implement
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch an ordered batch of at most `request.count` questions.
    /// An empty batch means the pool had nothing for this request.
    async fn fetch(&self, request: FetchRequest) -> SourceResult<Vec<QuestionRecord>>;

    /// Get the name of this source
    fn name(&self) -> &str;
}
