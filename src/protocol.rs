use crate::session::SessionView;
use crate::types::*;
use serde::{Deserialize, Serialize};

pub const PROTOCOL_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Open the session before a category is chosen
    Start,
    SelectCategory {
        category_id: CategoryId,
        /// Defaults to the session's current count
        #[serde(default)]
        count: Option<u32>,
    },
    SubmitAnswer {
        answer: String,
    },
    Restart,
    GetState,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        session_id: SessionId,
        categories: Vec<Category>,
        allowed_counts: Vec<u32>,
        feedback_delay_ms: u64,
    },
    State {
        state: SessionView,
        server_now: String,
    },
    Error {
        code: String,
        msg: String,
    },
}

impl ServerMessage {
    pub fn state(view: SessionView) -> Self {
        ServerMessage::State {
            state: view,
            server_now: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(code: &str, msg: impl Into<String>) -> Self {
        ServerMessage::Error {
            code: code.to_string(),
            msg: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_client_messages() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"t":"select_category","category_id":9,"count":10}"#)
                .unwrap();
        assert_eq!(
            msg,
            ClientMessage::SelectCategory {
                category_id: 9,
                count: Some(10)
            }
        );

        let msg: ClientMessage =
            serde_json::from_str(r#"{"t":"select_category","category_id":21}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::SelectCategory {
                category_id: 21,
                count: None
            }
        );

        let msg: ClientMessage =
            serde_json::from_str(r#"{"t":"submit_answer","answer":"Paris"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::SubmitAnswer {
                answer: "Paris".to_string()
            }
        );

        let msg: ClientMessage = serde_json::from_str(r#"{"t":"restart"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Restart);
    }

    #[test]
    fn test_unknown_message_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"t":"cheat"}"#).is_err());
    }

    #[test]
    fn test_error_serialization() {
        let json = serde_json::to_value(ServerMessage::error("PARSE_ERROR", "bad")).unwrap();
        assert_eq!(json["t"], "error");
        assert_eq!(json["code"], "PARSE_ERROR");
        assert_eq!(json["msg"], "bad");
    }
}
