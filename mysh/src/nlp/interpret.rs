//! Translation of an instruction into a candidate command by a chat-completion model.

use mysh_openai::{ChatGptClient, OpenAiConfig};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const SYSTEM_PROMPT: &str = "Convert the natural-language instruction into a shell command. \
Return STRICT JSON only, in the form \
{\"command\": \"...\", \"explanation\": \"...\", \"confidence\": 92} \
where confidence is an integer from 0 to 100. \
Separate multiple commands with ';'. Avoid dangerous commands.";

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("{0}")]
    Unavailable(String),

    #[error("{0:#}")]
    Service(#[from] anyhow::Error),

    #[error("reply contains no JSON object")]
    MissingPayload,

    #[error("malformed reply: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid confidence value: {0}")]
    Confidence(Value),

    #[error("reply has an empty command")]
    EmptyCommand,
}

/// A translated command with the model's rationale and self-reported confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub command: String,
    pub explanation: String,
    pub confidence: u8,
}

pub trait Interpreter: Send + Sync {
    fn translate(&self, instruction: &str) -> Result<Interpretation, TranslateError>;
}

/// Interpreter backed by an OpenAI-compatible endpoint.
pub struct LiveInterpreter {
    client: ChatGptClient,
}

impl LiveInterpreter {
    pub fn new(client: ChatGptClient) -> Self {
        Self { client }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let config = OpenAiConfig::from_getter(|key| std::env::var(key).ok());
        Ok(Self::new(ChatGptClient::try_from_config(&config)?))
    }
}

impl Interpreter for LiveInterpreter {
    fn translate(&self, instruction: &str) -> Result<Interpretation, TranslateError> {
        debug!("translating with model {}", self.client.model());
        let content =
            self.client
                .send_message(instruction, Some(SYSTEM_PROMPT.to_string()), Some(0.0))?;
        parse_interpretation(&content)
    }
}

/// Stands in when no client could be configured. Every translation fails with the reason.
pub struct UnavailableInterpreter {
    reason: String,
}

impl UnavailableInterpreter {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Interpreter for UnavailableInterpreter {
    fn translate(&self, _instruction: &str) -> Result<Interpretation, TranslateError> {
        Err(TranslateError::Unavailable(self.reason.clone()))
    }
}

#[derive(Debug, Deserialize)]
struct RawInterpretation {
    command: String,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    confidence: Value,
}

/// Parses a model reply. Text around the outermost `{...}` span is ignored.
pub fn parse_interpretation(content: &str) -> Result<Interpretation, TranslateError> {
    let start = content.find('{').ok_or(TranslateError::MissingPayload)?;
    let end = content.rfind('}').ok_or(TranslateError::MissingPayload)?;
    if end < start {
        return Err(TranslateError::MissingPayload);
    }

    let raw: RawInterpretation = serde_json::from_str(&content[start..=end])?;
    let command = raw.command.trim().to_string();
    if command.is_empty() {
        return Err(TranslateError::EmptyCommand);
    }

    Ok(Interpretation {
        command,
        explanation: raw.explanation,
        confidence: coerce_confidence(raw.confidence)?,
    })
}

/// Accepts integers, floats (truncated) and numeric strings, clamped to 0..=100.
/// A missing value counts as 0.
fn coerce_confidence(value: Value) -> Result<u8, TranslateError> {
    let number = match &value {
        Value::Null => return Ok(0),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match number {
        Some(n) => Ok(n.clamp(0, 100) as u8),
        None => Err(TranslateError::Confidence(value)),
    }
}
