pub mod handlers;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{
    sink::{Sink, SinkExt},
    stream::StreamExt,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::protocol::{ClientMessage, ServerMessage, PROTOCOL_VERSION};
use crate::session::{AdvanceTicket, FetchTicket, QuizSession};
use crate::source::SourceResult;
use crate::state::AppState;
use crate::types::{QuestionRecord, ALLOWED_COUNTS, CATEGORIES};

use handlers::Effect;

/// Completed background work, delivered back to the connection loop
#[derive(Debug)]
pub enum SessionEvent {
    QuestionsFetched {
        ticket: FetchTicket,
        result: SourceResult<Vec<QuestionRecord>>,
    },
    AdvanceDue(AdvanceTicket),
}

/// Runs the fetch and feedback timer tasks for one session
pub struct SessionTasks {
    state: Arc<AppState>,
    events: mpsc::UnboundedSender<SessionEvent>,
    timer: Option<JoinHandle<()>>,
}

impl SessionTasks {
    pub fn new(state: Arc<AppState>, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            state,
            events,
            timer: None,
        }
    }

    pub fn run(&mut self, effect: Effect) {
        match effect {
            Effect::Fetch(pending) => {
                self.cancel_timer();
                let source = self.state.source.clone();
                let events = self.events.clone();
                tokio::spawn(async move {
                    let result = source.fetch(pending.request).await;
                    // Receiver is gone once the connection closed
                    let _ = events.send(SessionEvent::QuestionsFetched {
                        ticket: pending.ticket,
                        result,
                    });
                });
            }
            Effect::ScheduleAdvance(ticket) => {
                self.cancel_timer();
                let delay = self.state.config.feedback_delay;
                let events = self.events.clone();
                self.timer = Some(tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = events.send(SessionEvent::AdvanceDue(ticket));
                }));
            }
            Effect::CancelTimer => self.cancel_timer(),
        }
    }

    pub fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for SessionTasks {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::info!("WebSocket connection request");
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn send_message<S>(sender: &mut S, msg: &ServerMessage) -> bool
where
    S: Sink<Message> + Unpin,
{
    match serde_json::to_string(msg) {
        Ok(json) => sender.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            tracing::error!("Failed to serialize message: {}", e);
            true
        }
    }
}

/// Apply one text frame from the client. Returns false once the socket is
/// no longer writable.
async fn handle_text<S>(
    text: &str,
    session: &mut QuizSession,
    tasks: &mut SessionTasks,
    sender: &mut S,
) -> bool
where
    S: Sink<Message> + Unpin,
{
    tracing::debug!("Received message: {}", text);

    match serde_json::from_str::<ClientMessage>(text) {
        Ok(client_msg) => {
            let outcome = handlers::handle_message(client_msg, session);
            if let Some(effect) = outcome.effect {
                tasks.run(effect);
            }
            if let Some(reply) = outcome.reply {
                if !send_message(sender, &reply).await {
                    tracing::error!("Failed to send response");
                    return false;
                }
            }
            true
        }
        Err(e) => {
            tracing::error!("Failed to parse client message: {}", e);
            let error =
                ServerMessage::error("PARSE_ERROR", format!("Invalid message format: {}", e));
            if !send_message(sender, &error).await {
                tracing::error!("Failed to send parse error");
                return false;
            }
            true
        }
    }
}

/// Handle individual WebSocket connection. The connection owns its session;
/// every mutation happens on this task.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut session = QuizSession::new();
    let session_id = session.id().clone();

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut tasks = SessionTasks::new(state.clone(), events_tx);

    state.register_session(&session_id).await;

    let welcome = ServerMessage::Welcome {
        protocol: PROTOCOL_VERSION.to_string(),
        session_id: session_id.clone(),
        categories: CATEGORIES.to_vec(),
        allowed_counts: ALLOWED_COUNTS.to_vec(),
        feedback_delay_ms: state.config.feedback_delay.as_millis() as u64,
    };

    if !send_message(&mut sender, &welcome).await
        || !send_message(&mut sender, &ServerMessage::state(session.view())).await
    {
        tracing::error!("Failed to send welcome message");
        state.unregister_session(&session_id).await;
        return;
    }

    loop {
        tokio::select! {
            // Completed fetches and expired timers
            Some(event) = events_rx.recv() => {
                let messages = match event {
                    SessionEvent::QuestionsFetched { ticket, result } => {
                        handlers::handle_fetch_result(&mut session, ticket, result)
                    }
                    SessionEvent::AdvanceDue(ticket) => {
                        handlers::handle_advance_due(&mut session, ticket)
                            .into_iter()
                            .collect()
                    }
                };

                let mut closed = false;
                for msg in &messages {
                    if !send_message(&mut sender, msg).await {
                        closed = true;
                        break;
                    }
                }
                if closed {
                    break;
                }
            }

            // Handle client messages
            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        if !handle_text(&text, &mut session, &mut tasks, &mut sender).await {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("WebSocket closed");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    tasks.cancel_timer();
    state.unregister_session(&session_id).await;
}
