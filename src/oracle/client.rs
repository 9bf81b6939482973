use super::{Oracle, OracleError, OracleRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

const ERROR_BODY_LIMIT: usize = 400;

#[derive(Debug, Clone)]
pub struct OracleEndpoint {
    pub url: String,
    pub api_key: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

/// Blocking client for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionsOracle {
    endpoint: OracleEndpoint,
    agent: ureq::Agent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsOracle {
    pub fn new(endpoint: OracleEndpoint) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(endpoint.connect_timeout)
            .timeout_read(endpoint.read_timeout)
            .build();
        Self { endpoint, agent }
    }

    fn read_timeout_ms(&self) -> u64 {
        self.endpoint.read_timeout.as_millis() as u64
    }

    fn map_call_error(&self, err: ureq::Error) -> OracleError {
        match err {
            ureq::Error::Status(status, response) => OracleError::Status {
                status,
                body: truncate_chars(&response.into_string().unwrap_or_default()),
            },
            ureq::Error::Transport(transport) => {
                if transport_timed_out(&transport) {
                    OracleError::Timeout {
                        timeout_ms: self.read_timeout_ms(),
                    }
                } else {
                    OracleError::Transport(transport.to_string())
                }
            }
        }
    }

    fn map_read_error(&self, err: std::io::Error) -> OracleError {
        if io_timed_out(&err) {
            OracleError::Timeout {
                timeout_ms: self.read_timeout_ms(),
            }
        } else {
            OracleError::Transport(format!("invalid chat completion body: {err}"))
        }
    }
}

impl Oracle for ChatCompletionsOracle {
    fn complete(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let body = ChatRequest {
            model: &request.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
        };
        let payload =
            serde_json::to_value(&body).map_err(|e| OracleError::Transport(e.to_string()))?;

        let response = self
            .agent
            .post(&self.endpoint.url)
            .set("Authorization", &format!("Bearer {}", self.endpoint.api_key))
            .send_json(payload)
            .map_err(|err| self.map_call_error(err))?;

        let parsed: ChatResponse = response
            .into_json()
            .map_err(|err| self.map_read_error(err))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(OracleError::EmptyReply)
    }
}

fn transport_timed_out(transport: &ureq::Transport) -> bool {
    let by_source = std::error::Error::source(transport)
        .and_then(|source| source.downcast_ref::<std::io::Error>())
        .is_some_and(io_timed_out);
    by_source || transport.to_string().contains("timed out")
}

fn io_timed_out(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
    )
}

fn truncate_chars(raw: &str) -> String {
    raw.chars().take(ERROR_BODY_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_carries_system_and_user_roles() {
        let body = ChatRequest {
            model: "gpt-4o",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "rules",
                },
                ChatMessage {
                    role: "user",
                    content: "text",
                },
            ],
        };
        let value = serde_json::to_value(&body).expect("serialize");
        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "text");
    }

    #[test]
    fn error_bodies_are_truncated_on_char_boundaries() {
        let long = "ü".repeat(ERROR_BODY_LIMIT + 10);
        assert_eq!(truncate_chars(&long).chars().count(), ERROR_BODY_LIMIT);
    }
}
