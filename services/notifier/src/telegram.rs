//! Minimal Telegram Bot API client
//!
//! Long-polls `getUpdates` for commands and answers with `sendMessage`. The
//! bot token is part of every URL and is never logged.

use crate::config::TelegramConfig;
use crate::error::{NotifierError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Bot API hard limit is 4096 UTF-16 units; stay below it
pub const MAX_MESSAGE_CHARS: usize = 4000;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

/// Where replies and pushes go, and where commands come from
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()>;

    /// Wait for updates after `offset`
    async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>>;
}

pub struct TelegramClient {
    http: reqwest::Client,
    api_base: Url,
    poll_timeout_secs: u64,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let base = config.base_url.trim_end_matches('/');
        let api_base = Url::parse(&format!("{}/bot{}/", base, config.bot_token))?;

        // Long polls must outlive the server-side wait
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs + 10))
            .build()?;

        Ok(Self {
            http,
            api_base,
            poll_timeout_secs: config.poll_timeout_secs,
        })
    }

    /// Drop any webhook so that long polling receives updates
    pub async fn delete_webhook(&self) -> Result<()> {
        let _: bool = self.call("deleteWebhook", &json!({})).await?;
        Ok(())
    }

    async fn call<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.api_base.join(method)?;
        debug!(method, "Telegram request");

        let response: ApiResponse<T> = self
            .http
            .post(url)
            .json(body)
            .send()
            .await?
            .json()
            .await?;

        match (response.ok, response.result) {
            (true, Some(result)) => Ok(result),
            (_, _) => Err(NotifierError::Telegram(
                response
                    .description
                    .unwrap_or_else(|| format!("{} failed", method)),
            )),
        }
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        for chunk in split_message(text, MAX_MESSAGE_CHARS) {
            let _: serde_json::Value = self
                .call("sendMessage", &SendMessage { chat_id, text: &chunk })
                .await?;
        }
        Ok(())
    }

    async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        let body = json!({
            "offset": offset,
            "timeout": self.poll_timeout_secs,
            "allowed_updates": ["message"],
        });
        self.call("getUpdates", &body).await
    }
}

/// Split on line boundaries so that no chunk exceeds `max_chars`
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.lines() {
        let line_len = line.chars().count();
        let needed = if current.is_empty() { line_len } else { line_len + 1 };

        if current_len + needed > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > max_chars {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client(server: &Server) -> TelegramClient {
        TelegramClient::new(&TelegramConfig {
            bot_token: "123:abc".to_string(),
            base_url: server.url(),
            poll_timeout_secs: 1,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_send_message() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .match_body(Matcher::Json(json!({"chat_id": 42, "text": "hello"})))
            .with_status(200)
            .with_body(r#"{"ok":true,"result":{"message_id":1}}"#)
            .expect(1)
            .create_async()
            .await;

        client(&server).send_message(42, "hello").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_message_api_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/bot123:abc/sendMessage")
            .with_status(403)
            .with_body(r#"{"ok":false,"error_code":403,"description":"Forbidden: bot was blocked by the user"}"#)
            .create_async()
            .await;

        let err = client(&server).send_message(7, "hi").await.unwrap_err();
        match err {
            NotifierError::Telegram(description) => assert!(description.contains("blocked")),
            other => panic!("expected Telegram error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_updates() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/bot123:abc/getUpdates")
            .match_body(Matcher::PartialJson(json!({"offset": 10, "timeout": 1})))
            .with_status(200)
            .with_body(
                r#"{"ok":true,"result":[
                    {"update_id":10,"message":{"message_id":5,"chat":{"id":-100,"type":"group"},"text":"/signal@obscan_bot"}},
                    {"update_id":11,"edited_message":{"chat":{"id":1}}}
                ]}"#,
            )
            .create_async()
            .await;

        let updates = client(&server).get_updates(Some(10)).await.unwrap();

        assert_eq!(updates.len(), 2);
        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.chat.id, -100);
        assert_eq!(message.text.as_deref(), Some("/signal@obscan_bot"));
        assert_eq!(updates[1].message, None);
    }

    #[tokio::test]
    async fn test_delete_webhook() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:abc/deleteWebhook")
            .with_status(200)
            .with_body(r#"{"ok":true,"result":true}"#)
            .create_async()
            .await;

        client(&server).delete_webhook().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_transport_error_hides_token() {
        let client = TelegramClient::new(&TelegramConfig {
            bot_token: "123:SECRET-TOKEN".to_string(),
            base_url: "http://127.0.0.1:1".to_string(),
            poll_timeout_secs: 1,
        })
        .unwrap();

        let err = client.get_updates(None).await.unwrap_err();
        assert!(matches!(err, NotifierError::Http(_)));

        let logged = format!("Polling failed: {}", err);
        assert!(!logged.contains("SECRET-TOKEN"), "{}", logged);
        assert!(!format!("{:?}", err).contains("SECRET-TOKEN"));
    }

    #[test]
    fn test_split_message_on_lines() {
        let text = "aaaa\nbbbb\ncccc";
        assert_eq!(split_message(text, 100), vec![text.to_string()]);
        assert_eq!(split_message(text, 9), vec!["aaaa\nbbbb", "cccc"]);
        assert_eq!(split_message("abcdefg", 3), vec!["abc", "def", "g"]);
        assert!(split_message("", 10).is_empty());
    }
}
