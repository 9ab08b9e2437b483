use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use super::state::StateCell;
use super::transport::ChefTransport;
use crate::chef_presets::{resolve_preset_config, DEFAULT_PRESET_ID};
use crate::models::ChatRequest;

pub const CHAT_PATH: &str = "/api/chat";
pub const NO_REPLY_MESSAGE: &str = "응답을 받지 못했습니다.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    /// Unix milliseconds
    pub timestamp: i64,
}

impl ChatMessage {
    fn new(role: ChatRole, content: String) -> Self {
        let prefix = match role {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        };
        Self {
            id: format!("{}-{}", prefix, Uuid::new_v4()),
            role,
            content,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub selected_preset_id: String,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            selected_preset_id: DEFAULT_PRESET_ID.to_string(),
            is_loading: false,
            error: None,
        }
    }
}

/// Transcript of one chat session.
pub struct ChatStore {
    state: StateCell<ChatState>,
    transport: Arc<dyn ChefTransport>,
}

impl ChatStore {
    pub fn new(transport: Arc<dyn ChefTransport>) -> Self {
        Self {
            state: StateCell::new(ChatState::default()),
            transport,
        }
    }

    pub fn state(&self) -> &StateCell<ChatState> {
        &self.state
    }

    pub fn snapshot(&self) -> ChatState {
        self.state.snapshot()
    }

    /// Appends the user's message, asks the server for a reply and appends
    /// it. Failures land in `error`; the transcript then holds only the
    /// user's message.
    pub async fn send_message(&self, message: &str) {
        let preset_id = self.state.read(|s| s.selected_preset_id.clone());
        let user_message = ChatMessage::new(ChatRole::User, message.to_string());

        self.state.update(|s| {
            s.messages.push(user_message);
            s.is_loading = true;
            s.error = None;
        });

        match self.request_reply(message, &preset_id).await {
            Ok(reply) => {
                let assistant_message = ChatMessage::new(ChatRole::Assistant, reply);
                self.state.update(|s| {
                    s.messages.push(assistant_message);
                    s.is_loading = false;
                });
            }
            Err(e) => {
                warn!("Chat request failed: {}", e);
                self.state.update(|s| {
                    s.is_loading = false;
                    s.error = Some(e);
                });
            }
        }
    }

    async fn request_reply(&self, message: &str, preset_id: &str) -> Result<String, String> {
        let request = ChatRequest {
            message: message.to_string(),
            chef_config: resolve_preset_config(preset_id).clone(),
            context: None,
        };
        let body = serde_json::to_value(&request).map_err(|e| e.to_string())?;

        let response = self
            .transport
            .post_json(CHAT_PATH, &body)
            .await
            .map_err(|e| e.to_string())?;

        if !response.is_success() {
            return Err(format!("API 오류: {}", response.status));
        }

        Ok(extract_reply(&response.body))
    }

    /// Stored verbatim; unknown ids resolve to the first preset when a
    /// message is sent.
    pub fn set_preset(&self, preset_id: &str) {
        self.state.update(|s| s.selected_preset_id = preset_id.to_string());
    }

    pub fn clear_messages(&self) {
        self.state.update(|s| {
            s.messages.clear();
            s.error = None;
        });
    }
}

fn extract_reply(body: &Value) -> String {
    body.get("response")
        .and_then(Value::as_str)
        .or_else(|| body.get("reply").and_then(Value::as_str))
        .or_else(|| body.pointer("/data/reply").and_then(Value::as_str))
        .unwrap_or(NO_REPLY_MESSAGE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chef_presets::chef_presets;
    use crate::client::transport::testing::{serve_once, GatedTransport, ScriptedTransport};
    use crate::client::transport::{HttpTransport, TransportResponse};
    use serde_json::json;

    fn store_with(transport: Arc<ScriptedTransport>) -> ChatStore {
        ChatStore::new(transport)
    }

    #[tokio::test]
    async fn test_send_message_success() {
        let transport = Arc::new(ScriptedTransport::ok(200, json!({ "response": "안녕하세요!" })));
        let store = store_with(transport.clone());

        store.send_message("hello").await;

        let state = store.snapshot();
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[0].role, ChatRole::User);
        assert_eq!(state.messages[0].content, "hello");
        assert!(state.messages[0].id.starts_with("user-"));
        assert_eq!(state.messages[1].role, ChatRole::Assistant);
        assert_eq!(state.messages[1].content, "안녕하세요!");
        assert!(state.messages[1].id.starts_with("assistant-"));
        assert!(!state.is_loading);
        assert_eq!(state.error, None);

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls[0].0, CHAT_PATH);
        assert_eq!(calls[0].1["message"], "hello");
        assert_eq!(calls[0].1["chefConfig"]["name"], "김미식 할머니");
    }

    #[tokio::test]
    async fn test_send_message_http_error() {
        let transport = Arc::new(ScriptedTransport::ok(500, json!({ "error": "boom" })));
        let store = store_with(transport);

        store.send_message("hello").await;

        let state = store.snapshot();
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].role, ChatRole::User);
        assert!(state.error.as_deref().unwrap().contains("500"));
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_send_message_network_error() {
        let transport = Arc::new(ScriptedTransport::network_error("Network error"));
        let store = store_with(transport);

        store.send_message("hello").await;

        let state = store.snapshot();
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.error.as_deref(), Some("Network error"));
        assert!(!state.is_loading);
    }

    #[test]
    fn test_reply_fallbacks() {
        assert_eq!(extract_reply(&json!({ "reply": "legacy" })), "legacy");
        assert_eq!(extract_reply(&json!({ "data": { "reply": "nested" } })), "nested");
        assert_eq!(extract_reply(&json!({})), NO_REPLY_MESSAGE);
        assert_eq!(extract_reply(&json!({ "response": null, "reply": "x" })), "x");
        assert_eq!(extract_reply(&json!({ "response": 7, "data": { "reply": "y" } })), "y");
    }

    #[tokio::test]
    async fn test_unknown_preset_is_kept_and_falls_back() {
        let transport = Arc::new(ScriptedTransport::ok(200, json!({ "response": "ok" })));
        let store = store_with(transport.clone());

        store.set_preset("no_such_chef");
        assert_eq!(store.snapshot().selected_preset_id, "no_such_chef");

        store.send_message("hi").await;
        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls[0].1["chefConfig"]["name"], chef_presets()[0].config.name.as_str());
    }

    #[tokio::test]
    async fn test_selected_preset_is_sent() {
        let transport = Arc::new(ScriptedTransport::ok(200, json!({ "response": "ok" })));
        let store = store_with(transport.clone());

        store.set_preset("michelin_chef");
        store.send_message("hi").await;

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls[0].1["chefConfig"]["personality"], "professional");
    }

    #[tokio::test]
    async fn test_clear_messages() {
        let transport = Arc::new(ScriptedTransport::ok(500, Value::Null));
        let store = store_with(transport);

        store.send_message("hello").await;
        store.clear_messages();

        let state = store.snapshot();
        assert!(state.messages.is_empty());
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_subscribers_are_notified() {
        let transport = Arc::new(ScriptedTransport::ok(200, json!({ "response": "ok" })));
        let store = store_with(transport);
        let rx = store.state().subscribe();

        store.send_message("hello").await;

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow().messages.len(), 2);
    }

    #[tokio::test]
    async fn test_user_message_visible_while_request_pending() {
        let transport = Arc::new(GatedTransport::new(Ok(TransportResponse {
            status: 200,
            body: json!({ "response": "곧 알려줄게요" }),
        })));
        let store = Arc::new(ChatStore::new(transport.clone()));
        let mut rx = store.state().subscribe();

        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.send_message("hello").await }
        });

        rx.wait_for(|s| s.is_loading).await.unwrap();
        let in_flight = store.snapshot();
        assert!(in_flight.is_loading);
        assert_eq!(in_flight.error, None);
        assert_eq!(in_flight.messages.len(), 1);
        assert_eq!(in_flight.messages[0].role, ChatRole::User);
        assert_eq!(in_flight.messages[0].content, "hello");

        transport.release();
        pending.await.unwrap();

        let done = store.snapshot();
        assert!(!done.is_loading);
        assert_eq!(done.messages.len(), 2);
        assert_eq!(done.messages[1].content, "곧 알려줄게요");
    }

    #[tokio::test]
    async fn test_undecodable_success_body_sets_error() {
        let base = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 25\r\nConnection: close\r\n\r\n<html>proxy error</html>\n",
        )
        .await;
        let store = ChatStore::new(Arc::new(HttpTransport::new(base)));

        store.send_message("hello").await;

        let state = store.snapshot();
        assert_eq!(state.messages.len(), 1);
        assert!(state.error.is_some());
        assert!(!state.is_loading);
    }
}
