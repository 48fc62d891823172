//! WebSocket message dispatch
//!
//! Maps client messages and completed background work onto session
//! operations. Handlers never block: anything asynchronous is returned to the
//! connection loop as an [`Effect`] to run.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::{AdvanceTicket, FetchTicket, PendingFetch, QuizSession};
use crate::source::SourceResult;
use crate::types::{Category, QuestionCount, QuestionRecord, SelectionError};

/// Background work requested by a handler
#[derive(Debug)]
pub enum Effect {
    /// Fetch questions and report back with the ticket
    Fetch(PendingFetch),
    /// Arm the feedback timer; it fires `advance` with the ticket
    ScheduleAdvance(AdvanceTicket),
    /// Drop any pending feedback timer
    CancelTimer,
}

/// Reply to send and work to start after a message was handled
#[derive(Debug, Default)]
pub struct HandlerOutcome {
    pub reply: Option<ServerMessage>,
    pub effect: Option<Effect>,
}

impl HandlerOutcome {
    fn reply(msg: ServerMessage) -> Self {
        Self {
            reply: Some(msg),
            effect: None,
        }
    }

    fn state(session: &QuizSession) -> Self {
        Self::reply(ServerMessage::state(session.view()))
    }

    fn with_effect(mut self, effect: Option<Effect>) -> Self {
        self.effect = effect;
        self
    }
}

/// Handle a client message against the connection's session
pub fn handle_message(msg: ClientMessage, session: &mut QuizSession) -> HandlerOutcome {
    match msg {
        ClientMessage::Start => {
            session.start();
            HandlerOutcome::state(session)
        }

        ClientMessage::SelectCategory { category_id, count } => {
            let selection = Category::by_id(category_id)
                .ok_or(SelectionError::UnknownCategory(category_id))
                .and_then(|category| {
                    let count = match count {
                        Some(n) => QuestionCount::try_from(n)?,
                        None => session.requested_count(),
                    };
                    Ok((category, count))
                });

            match selection {
                Ok((category, count)) => {
                    let effect = session.select_category(category, count).map(Effect::Fetch);
                    HandlerOutcome::state(session).with_effect(effect)
                }
                Err(e) => {
                    tracing::warn!("Session {}: rejected selection: {}", session.id(), e);
                    HandlerOutcome::reply(ServerMessage::error(e.code(), e.to_string()))
                }
            }
        }

        ClientMessage::SubmitAnswer { answer } => {
            let effect = session
                .submit_answer(&answer)
                .map(Effect::ScheduleAdvance);
            HandlerOutcome::state(session).with_effect(effect)
        }

        ClientMessage::Restart => {
            session.restart();
            HandlerOutcome::state(session).with_effect(Some(Effect::CancelTimer))
        }

        ClientMessage::GetState => HandlerOutcome::state(session),
    }
}

/// Apply a finished question fetch. Stale results produce no messages.
pub fn handle_fetch_result(
    session: &mut QuizSession,
    ticket: FetchTicket,
    result: SourceResult<Vec<QuestionRecord>>,
) -> Vec<ServerMessage> {
    match result {
        Ok(questions) => {
            if session.on_questions_received(ticket, questions) {
                vec![ServerMessage::state(session.view())]
            } else {
                Vec::new()
            }
        }
        Err(e) => {
            if session.on_fetch_failed(ticket, &e) {
                vec![
                    ServerMessage::error("FETCH_FAILED", format!("Could not load questions: {}", e)),
                    ServerMessage::state(session.view()),
                ]
            } else {
                Vec::new()
            }
        }
    }
}

/// Apply an expired feedback timer. Stale timers produce no message.
pub fn handle_advance_due(session: &mut QuizSession, ticket: AdvanceTicket) -> Option<ServerMessage> {
    session
        .advance(ticket)
        .then(|| ServerMessage::state(session.view()))
}
