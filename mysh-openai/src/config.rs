/// Primary key for the chat endpoint path segment.
const CHAT_COMPLETIONS_PATH: &str = "chat/completions";

/// Default base URL; Groq exposes an OpenAI-compatible API.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1/";

/// Default model used when none is provided.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiConfig {
    api_key: Option<String>,
    base_url: String,
    default_model: String,
}

impl OpenAiConfig {
    pub fn new(
        api_key: Option<String>,
        base_url: Option<String>,
        default_model: Option<String>,
    ) -> Self {
        let api_key = api_key.filter(|key| !key.trim().is_empty());
        let base_url = sanitize_base_url(base_url);
        let default_model = default_model
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Self {
            api_key,
            base_url,
            default_model,
        }
    }

    pub fn from_getter(mut getter: impl FnMut(&str) -> Option<String>) -> Self {
        let mut non_empty = |key: &str| getter(key).filter(|value| !value.trim().is_empty());

        let api_key = non_empty("MYSH_AI_API_KEY")
            .or_else(|| non_empty("GROQ_API_KEY"))
            .or_else(|| non_empty("OPENAI_API_KEY"));

        let base_url = non_empty("MYSH_AI_BASE_URL");

        let default_model = non_empty("MYSH_AI_MODEL");

        OpenAiConfig::new(api_key, base_url, default_model)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn chat_endpoint(&self) -> String {
        build_chat_endpoint(&self.base_url)
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }
}

fn sanitize_base_url(base_url: Option<String>) -> String {
    base_url
        .and_then(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.trim_end_matches('/').to_string())
            }
        })
        .unwrap_or_else(|| DEFAULT_BASE_URL.trim_end_matches('/').to_string())
}

fn build_chat_endpoint(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with(CHAT_COMPLETIONS_PATH) {
        trimmed.to_string()
    } else {
        format!("{trimmed}/{CHAT_COMPLETIONS_PATH}")
    }
}
