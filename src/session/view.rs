use serde::Serialize;

use super::QuizSession;
use crate::types::{Category, FeedbackKind, Phase, PresentedQuestion, SessionId};

/// Read-only snapshot of a session for the presentation layer
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionView {
    pub session_id: SessionId,
    pub phase: Phase,
    pub category: Option<Category>,
    pub requested_count: u32,
    /// 1-based number of the question on screen
    pub question_number: Option<usize>,
    pub total_questions: usize,
    pub question: Option<PresentedQuestion>,
    pub feedback: Option<FeedbackView>,
    pub score: u32,
    pub finished_summary: Option<SessionSummary>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeedbackView {
    pub kind: FeedbackKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    pub message: String,
}

/// Final score, present once the session is finished
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionSummary {
    pub score: u32,
    pub total: usize,
    /// None when no questions were available
    pub percentage: Option<u32>,
    pub message: String,
    pub elapsed_secs: Option<i64>,
}

impl SessionSummary {
    fn new(score: u32, total: usize, elapsed_secs: Option<i64>) -> Self {
        let percentage = (total > 0).then(|| (score as usize * 100 / total) as u32);
        let message = if total == 0 {
            "No questions were available for this category.".to_string()
        } else {
            format!("Your final score is {} / {}", score, total)
        };
        Self {
            score,
            total,
            percentage,
            message,
            elapsed_secs,
        }
    }
}

impl SessionView {
    pub(super) fn from_session(session: &QuizSession) -> Self {
        let question = session.current_question().cloned();
        let question_number = question.as_ref().map(|_| session.current_index + 1);

        let feedback = session.feedback.as_ref().map(|f| FeedbackView {
            kind: f.kind,
            correct_answer: f.correct_answer.clone(),
            message: f.message(),
        });

        // Elapsed time is fixed at the moment the session finished
        let finished_summary = (session.phase == Phase::Finished).then(|| {
            let elapsed = session
                .started_at
                .zip(session.finished_at)
                .map(|(started, finished)| (finished - started).num_seconds());
            SessionSummary::new(session.score, session.questions.len(), elapsed)
        });

        Self {
            session_id: session.id.clone(),
            phase: session.phase,
            category: session.category,
            requested_count: session.requested_count.get(),
            question_number,
            total_questions: session.questions.len(),
            question,
            feedback,
            score: session.score,
            finished_summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_without_questions() {
        let summary = SessionSummary::new(0, 0, None);
        assert_eq!(summary.percentage, None);
        assert_eq!(
            summary.message,
            "No questions were available for this category."
        );
    }

    #[test]
    fn test_summary_percentage() {
        let summary = SessionSummary::new(3, 5, Some(12));
        assert_eq!(summary.percentage, Some(60));
        assert_eq!(summary.message, "Your final score is 3 / 5");
    }

    #[test]
    fn test_idle_view() {
        let session = QuizSession::with_seed(1);
        let view = session.view();
        assert_eq!(view.phase, Phase::Idle);
        assert!(view.category.is_none());
        assert!(view.question.is_none());
        assert!(view.finished_summary.is_none());
        assert_eq!(view.requested_count, 5);
    }
}
