use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

use trivia_quiz::config::QuizConfig;
use trivia_quiz::protocol::{ClientMessage, ServerMessage};
use trivia_quiz::session::QuizSession;
use trivia_quiz::source::{FetchRequest, QuestionSource, SourceError, SourceResult};
use trivia_quiz::state::AppState;
use trivia_quiz::types::{FeedbackKind, Phase, QuestionRecord};
use trivia_quiz::ws::handlers::{handle_advance_due, handle_fetch_result, handle_message, Effect};

/// Question source that replays scripted responses and records requests
struct ScriptedSource {
    responses: Mutex<Vec<SourceResult<Vec<QuestionRecord>>>>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl ScriptedSource {
    fn new(responses: Vec<SourceResult<Vec<QuestionRecord>>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl QuestionSource for ScriptedSource {
    async fn fetch(&self, request: FetchRequest) -> SourceResult<Vec<QuestionRecord>> {
        self.requests.lock().unwrap().push(request);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(SourceError::Request("no scripted response".to_string()))
        } else {
            responses.remove(0)
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn trivia(n: usize) -> Vec<QuestionRecord> {
    (1..=n)
        .map(|i| QuestionRecord {
            question: format!("Question {} &amp; more?", i),
            correct_answer: format!("Correct {}", i),
            incorrect_answers: vec![
                format!("Wrong {}-1", i),
                format!("Wrong {}-2", i),
                format!("Wrong {}-3", i),
            ],
        })
        .collect()
}

/// Drive the select -> fetch round-trip through the handlers
async fn select_and_fetch(
    session: &mut QuizSession,
    source: &ScriptedSource,
    category_id: u32,
    count: u32,
) -> Vec<ServerMessage> {
    let outcome = handle_message(
        ClientMessage::SelectCategory {
            category_id,
            count: Some(count),
        },
        session,
    );
    assert_eq!(session.phase(), Phase::AwaitingQuestions);

    let pending = match outcome.effect {
        Some(Effect::Fetch(pending)) => pending,
        other => panic!("Expected fetch effect, got {:?}", other),
    };
    let result = source.fetch(pending.request).await;
    handle_fetch_result(session, pending.ticket, result)
}

fn answer(session: &mut QuizSession, text: &str) {
    let outcome = handle_message(
        ClientMessage::SubmitAnswer {
            answer: text.to_string(),
        },
        session,
    );
    let ticket = match outcome.effect {
        Some(Effect::ScheduleAdvance(ticket)) => ticket,
        other => panic!("Expected advance effect, got {:?}", other),
    };
    assert!(handle_advance_due(session, ticket).is_some());
}

/// End-to-end play-through: 5 questions, 3 right, 2 wrong
#[tokio::test]
async fn test_full_quiz_flow() {
    let source = ScriptedSource::new(vec![Ok(trivia(5))]);
    let mut session = QuizSession::with_seed(99);

    let messages = select_and_fetch(&mut session, &source, 9, 5).await;
    assert_eq!(messages.len(), 1);
    assert_eq!(session.phase(), Phase::InProgress);
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.score(), 0);

    let request = source.requests.lock().unwrap()[0].clone();
    assert_eq!(request.category_id, 9);
    assert_eq!(request.count.get(), 5);
    assert_eq!(request.answer_type, "multiple");

    // Question text is decoded for display
    let view = session.view();
    assert_eq!(
        view.question.as_ref().unwrap().question,
        "Question 1 & more?"
    );
    assert_eq!(view.question_number, Some(1));
    assert_eq!(view.total_questions, 5);

    // Q1 right, feedback stays up until the timer fires
    let outcome = handle_message(
        ClientMessage::SubmitAnswer {
            answer: "Correct 1".to_string(),
        },
        &mut session,
    );
    let ticket = match outcome.effect {
        Some(Effect::ScheduleAdvance(ticket)) => ticket,
        other => panic!("Expected advance effect, got {:?}", other),
    };
    let feedback = session.view().feedback.unwrap();
    assert_eq!(feedback.kind, FeedbackKind::Correct);
    assert_eq!(feedback.message, "Correct Answer!");
    assert!(handle_message(ClientMessage::GetState, &mut session)
        .effect
        .is_none());

    assert!(handle_advance_due(&mut session, ticket).is_some());
    assert!(session.view().feedback.is_none());
    assert_eq!(session.view().question_number, Some(2));

    answer(&mut session, "Wrong 2-1");
    answer(&mut session, "Correct 3");
    answer(&mut session, "Wrong 4-3");
    answer(&mut session, "Correct 5");

    assert_eq!(session.phase(), Phase::Finished);
    assert_eq!(session.score(), 3);
    assert_eq!(session.questions().len(), 5);

    let summary = session.view().finished_summary.unwrap();
    assert_eq!(summary.message, "Your final score is 3 / 5");

    // Back to category selection
    handle_message(ClientMessage::Restart, &mut session);
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.questions().is_empty());
    assert_eq!(session.score(), 0);
}

#[tokio::test]
async fn test_wrong_answer_feedback_message() {
    let source = ScriptedSource::new(vec![Ok(trivia(2))]);
    let mut session = QuizSession::with_seed(1);
    select_and_fetch(&mut session, &source, 23, 10).await;

    handle_message(
        ClientMessage::SubmitAnswer {
            answer: "Wrong 1-2".to_string(),
        },
        &mut session,
    );
    let feedback = session.view().feedback.unwrap();
    assert_eq!(feedback.kind, FeedbackKind::Incorrect);
    assert_eq!(feedback.correct_answer.as_deref(), Some("Correct 1"));
    assert_eq!(
        feedback.message,
        "Wrong Answer! The correct answer was: Correct 1"
    );
}

#[tokio::test]
async fn test_fetch_failure_allows_retry() {
    let source = ScriptedSource::new(vec![
        Err(SourceError::Timeout(Duration::from_secs(10))),
        Ok(trivia(10)),
    ]);
    let mut session = QuizSession::with_seed(5);

    let messages = select_and_fetch(&mut session, &source, 18, 10).await;
    assert!(matches!(
        &messages[0],
        ServerMessage::Error { code, .. } if code == "FETCH_FAILED"
    ));
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.category().is_none());

    select_and_fetch(&mut session, &source, 18, 10).await;
    assert_eq!(session.phase(), Phase::InProgress);
    assert_eq!(session.questions().len(), 10);
}

#[tokio::test]
async fn test_empty_batch_renders_zero_of_zero() {
    let source = ScriptedSource::new(vec![Ok(Vec::new())]);
    let mut session = QuizSession::with_seed(5);

    select_and_fetch(&mut session, &source, 14, 20).await;
    assert_eq!(session.phase(), Phase::Finished);
    assert_eq!(session.score(), 0);
    assert!(session.questions().is_empty());

    let summary = session.view().finished_summary.unwrap();
    assert_eq!(summary.total, 0);
    assert_eq!(summary.percentage, None);
}

#[tokio::test]
async fn test_restart_during_fetch_discards_result() {
    let source = ScriptedSource::new(vec![Ok(trivia(5)), Ok(trivia(2))]);
    let mut session = QuizSession::with_seed(5);

    let first = match handle_message(
        ClientMessage::SelectCategory {
            category_id: 9,
            count: Some(5),
        },
        &mut session,
    )
    .effect
    {
        Some(Effect::Fetch(pending)) => pending,
        other => panic!("Expected fetch effect, got {:?}", other),
    };

    handle_message(ClientMessage::Restart, &mut session);
    let messages = select_and_fetch(&mut session, &source, 11, 5).await;
    assert_eq!(messages.len(), 1);

    // The first fetch resolves late and must not replace the new batch
    let late = source.fetch(first.request).await;
    assert!(handle_fetch_result(&mut session, first.ticket, late).is_empty());
    assert_eq!(session.questions().len(), 5);
    assert_eq!(session.category().unwrap().id, 11);
}

async fn get_json(app: axum::Router, uri: &str) -> serde_json::Value {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_http_api() {
    let state = Arc::new(AppState::new(
        QuizConfig::default(),
        Arc::new(ScriptedSource::new(Vec::new())),
    ));
    let app = trivia_quiz::router(state);

    let categories = get_json(app.clone(), "/api/categories").await;
    assert_eq!(categories["categories"].as_array().unwrap().len(), 11);
    assert_eq!(categories["categories"][1]["id"], 18);
    assert_eq!(categories["default_count"], 5);

    let health = get_json(app, "/api/health").await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["source"], "scripted");
    assert_eq!(health["active_sessions"], 0);
}
