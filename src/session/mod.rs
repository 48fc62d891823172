//! Quiz session state machine
//!
//! One `QuizSession` covers a single play-through:
//!
//! ```text
//! Idle --select_category--> AwaitingQuestions
//! AwaitingQuestions --on_questions_received(non-empty)--> InProgress
//! AwaitingQuestions --on_questions_received(empty)--> Finished
//! AwaitingQuestions --on_fetch_failed--> Idle
//! InProgress --submit_answer--> ShowingFeedback
//! ShowingFeedback --advance--> InProgress | Finished
//! (any) --restart--> Idle
//! ```
//!
//! Operations called in the wrong phase are ignored. Asynchronous work (the
//! question fetch and the feedback timer) is handed to the host together with
//! a ticket stamped with the session generation; callbacks carrying a ticket
//! from an older generation are dropped.

mod view;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub use view::{FeedbackView, SessionSummary, SessionView};

use crate::shuffle::shuffle_answers_with;
use crate::source::{FetchRequest, SourceError};
use crate::text::decode_record;
use crate::types::*;

/// Proof that a fetch was issued by a specific session generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Proof that a feedback timer was armed by a specific session generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTicket(u64);

/// A fetch the host must perform on behalf of the session
#[derive(Debug, Clone)]
pub struct PendingFetch {
    pub ticket: FetchTicket,
    pub request: FetchRequest,
}

pub struct QuizSession {
    id: SessionId,
    generation: u64,
    phase: Phase,
    category: Option<Category>,
    requested_count: QuestionCount,
    questions: Vec<QuestionRecord>,
    current_index: usize,
    score: u32,
    feedback: Option<Feedback>,
    /// Shuffled presentation of the current question, stable until the index changes
    presented: Option<PresentedQuestion>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    rng: StdRng,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Create a session with a deterministic answer order (tests, replays)
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            generation: 0,
            phase: Phase::Idle,
            category: None,
            requested_count: QuestionCount::default(),
            questions: Vec::new(),
            current_index: 0,
            score: 0,
            feedback: None,
            presented: None,
            started_at: None,
            finished_at: None,
            rng,
        }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn requested_count(&self) -> QuestionCount {
        self.requested_count
    }

    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Number of questions answered so far, including one awaiting advance
    pub fn answered(&self) -> usize {
        match self.phase {
            Phase::ShowingFeedback => self.current_index + 1,
            _ => self.current_index,
        }
    }

    /// The current question in presentation order, while one is on screen
    pub fn current_question(&self) -> Option<&PresentedQuestion> {
        match self.phase {
            Phase::InProgress | Phase::ShowingFeedback => self.presented.as_ref(),
            _ => None,
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Open the session without choosing a category yet.
    /// Returns false when the session is already past Idle or already started.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Idle || self.started_at.is_some() {
            return false;
        }
        self.started_at = Some(Utc::now());
        tracing::info!("Session {} started", self.id);
        true
    }

    /// Choose a category and question count, moving to AwaitingQuestions.
    /// Returns the fetch the host must issue, or None outside Idle.
    pub fn select_category(
        &mut self,
        category: Category,
        count: QuestionCount,
    ) -> Option<PendingFetch> {
        if self.phase != Phase::Idle {
            tracing::debug!(
                "Session {}: select_category ignored in {:?}",
                self.id,
                self.phase
            );
            return None;
        }

        self.generation += 1;
        self.category = Some(category);
        self.requested_count = count;
        self.questions.clear();
        self.current_index = 0;
        self.score = 0;
        self.feedback = None;
        self.presented = None;
        self.finished_at = None;
        self.started_at.get_or_insert_with(Utc::now);
        self.phase = Phase::AwaitingQuestions;

        tracing::info!(
            "Session {}: selected category {} ({}), {} questions",
            self.id,
            category.id,
            category.name,
            count.get()
        );

        Some(PendingFetch {
            ticket: FetchTicket(self.generation),
            request: FetchRequest::new(category.id, count),
        })
    }

    /// Deliver a fetched batch. Returns false if the result is stale.
    pub fn on_questions_received(
        &mut self,
        ticket: FetchTicket,
        questions: Vec<QuestionRecord>,
    ) -> bool {
        if !self.accepts_fetch(ticket) {
            return false;
        }

        self.questions = questions.into_iter().map(decode_record).collect();
        self.current_index = 0;
        self.score = 0;
        self.feedback = None;

        if self.questions.is_empty() {
            self.presented = None;
            self.finished_at = Some(Utc::now());
            self.phase = Phase::Finished;
            tracing::info!("Session {}: no questions available", self.id);
        } else {
            self.present_current();
            self.phase = Phase::InProgress;
            tracing::info!(
                "Session {}: received {} questions",
                self.id,
                self.questions.len()
            );
        }
        true
    }

    /// Report a failed fetch, returning to Idle. Returns false if stale.
    pub fn on_fetch_failed(&mut self, ticket: FetchTicket, error: &SourceError) -> bool {
        if !self.accepts_fetch(ticket) {
            return false;
        }

        tracing::warn!("Session {}: question fetch failed: {}", self.id, error);
        self.category = None;
        self.questions.clear();
        self.phase = Phase::Idle;
        true
    }

    /// Answer the current question. Returns the ticket for the feedback
    /// timer, or None if no question is awaiting an answer.
    pub fn submit_answer(&mut self, answer: &str) -> Option<AdvanceTicket> {
        if self.phase != Phase::InProgress {
            tracing::debug!(
                "Session {}: submit_answer ignored in {:?}",
                self.id,
                self.phase
            );
            return None;
        }

        let correct_answer = &self.questions[self.current_index].correct_answer;
        let feedback = if answer == correct_answer {
            self.score += 1;
            Feedback {
                kind: FeedbackKind::Correct,
                correct_answer: None,
            }
        } else {
            Feedback {
                kind: FeedbackKind::Incorrect,
                correct_answer: Some(correct_answer.clone()),
            }
        };

        tracing::info!(
            "Session {}: question {} answered {:?} (score {})",
            self.id,
            self.current_index + 1,
            feedback.kind,
            self.score
        );

        self.feedback = Some(feedback);
        self.phase = Phase::ShowingFeedback;
        self.generation += 1;
        Some(AdvanceTicket(self.generation))
    }

    /// Leave the feedback display. Clears feedback and moves the index in
    /// one step. Returns false for stale or out-of-phase calls.
    pub fn advance(&mut self, ticket: AdvanceTicket) -> bool {
        if self.phase != Phase::ShowingFeedback || ticket.0 != self.generation {
            tracing::debug!(
                "Session {}: stale advance ignored (phase {:?})",
                self.id,
                self.phase
            );
            return false;
        }

        self.feedback = None;
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.present_current();
            self.phase = Phase::InProgress;
        } else {
            self.current_index = self.questions.len();
            self.presented = None;
            self.finished_at = Some(Utc::now());
            self.phase = Phase::Finished;
            tracing::info!(
                "Session {}: finished with {}/{}",
                self.id,
                self.score,
                self.questions.len()
            );
        }
        true
    }

    /// Return to Idle from any phase, discarding questions and score.
    /// The requested count is kept as the player's preference.
    pub fn restart(&mut self) {
        self.generation += 1;
        self.phase = Phase::Idle;
        self.category = None;
        self.questions.clear();
        self.current_index = 0;
        self.score = 0;
        self.feedback = None;
        self.presented = None;
        self.started_at = None;
        self.finished_at = None;
        tracing::info!("Session {} restarted", self.id);
    }

    /// Snapshot for rendering
    pub fn view(&self) -> SessionView {
        SessionView::from_session(self)
    }

    fn accepts_fetch(&self, ticket: FetchTicket) -> bool {
        if self.phase != Phase::AwaitingQuestions || ticket.0 != self.generation {
            tracing::warn!(
                "Session {}: ignoring stale fetch result (phase {:?})",
                self.id,
                self.phase
            );
            return false;
        }
        true
    }

    fn present_current(&mut self) {
        let record = &self.questions[self.current_index];
        let choices = shuffle_answers_with(
            &mut self.rng,
            &record.correct_answer,
            &record.incorrect_answers,
        );
        self.presented = Some(PresentedQuestion {
            question: record.question.clone(),
            choices,
        });
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}
