//! Request builder and response parser for the Telegram bot `sendMessage`
//! method.

use serde::Deserialize;
use serde_json::json;

use crate::error::{Error, ErrorKind};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Envelope every bot API method answers with.
#[derive(Debug, Deserialize)]
struct BotReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Stateless client for the bot API.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    api_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    pub fn build_send_message(&self, chat_id: &str, text: &str) -> HttpRequest {
        let body = json!({ "chat_id": chat_id, "text": text });
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/bot{}/sendMessage", self.api_url, self.token),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body.to_string()),
        }
    }

    pub fn parse_send_message(&self, response: HttpResponse) -> Result<(), Error> {
        let reply = serde_json::from_str::<BotReply>(&response.body);

        if response.status != 200 {
            let description = reply
                .ok()
                .and_then(|r| r.description)
                .unwrap_or_else(|| response.body.trim().to_string());
            return Err(Error::new(
                ErrorKind::UnexpectedStatusCode,
                format!("bot API returned HTTP {}: {description}", response.status),
            ));
        }

        let reply = reply.map_err(|e| Error::new(ErrorKind::InvalidJson, format!("bot API reply: {e}")))?;
        if !reply.ok {
            return Err(Error::new(
                ErrorKind::ServiceDenied,
                reply.description.unwrap_or_else(|| "bot API reported ok=false".to_string()),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TelegramClient {
        TelegramClient::new("http://localhost:3000/", "123:abc")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_send_message_produces_correct_request() {
        let req = client().build_send_message("42", "hello \"there\"");
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/bot123:abc/sendMessage");
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["chat_id"], "42");
        assert_eq!(body["text"], "hello \"there\"");
    }

    #[test]
    fn parse_ok_reply() {
        let reply = r#"{"ok":true,"result":{"message_id":1,"chat":{"id":42},"text":"hi"}}"#;
        assert!(client().parse_send_message(response(200, reply)).is_ok());
    }

    #[test]
    fn parse_unauthorized_uses_description() {
        let reply = r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#;
        let err = client().parse_send_message(response(401, reply)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedStatusCode);
        assert_eq!(err.detail(), "bot API returned HTTP 401: Unauthorized");
    }

    #[test]
    fn parse_non_json_error_page() {
        let err = client().parse_send_message(response(502, "Bad Gateway\n")).unwrap_err();
        assert_eq!(err.detail(), "bot API returned HTTP 502: Bad Gateway");
    }

    #[test]
    fn parse_ok_false_is_denied() {
        let reply = r#"{"ok":false,"description":"Bad Request: chat not found"}"#;
        let err = client().parse_send_message(response(200, reply)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceDenied);
        assert_eq!(err.detail(), "Bad Request: chat not found");
    }

    #[test]
    fn parse_bad_json() {
        let err = client().parse_send_message(response(200, "<html>")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidJson);
    }
}
