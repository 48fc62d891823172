use crate::config::QuizConfig;
use crate::source::QuestionSource;
use crate::types::SessionId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Bookkeeping for a connected quiz session
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub connected_at: String,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<QuizConfig>,
    pub source: Arc<dyn QuestionSource>,
    pub sessions: Arc<RwLock<HashMap<SessionId, SessionInfo>>>,
}

impl AppState {
    pub fn new(config: QuizConfig, source: Arc<dyn QuestionSource>) -> Self {
        Self {
            config: Arc::new(config),
            source,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Record a newly connected session
    pub async fn register_session(&self, id: &SessionId) {
        let info = SessionInfo {
            connected_at: chrono::Utc::now().to_rfc3339(),
        };
        self.sessions.write().await.insert(id.clone(), info);
        tracing::info!("Session {} connected", id);
    }

    /// Forget a session after its connection closed
    pub async fn unregister_session(&self, id: &SessionId) {
        if self.sessions.write().await.remove(id).is_some() {
            tracing::info!("Session {} disconnected", id);
        }
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}
