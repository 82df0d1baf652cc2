use anyhow::{Result, anyhow};
use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

use crate::config::OpenAiConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct ChatGptClient {
    api_key: String,
    default_model: String,
    chat_endpoint: String,
}

impl ChatGptClient {
    pub fn try_from_config(config: &OpenAiConfig) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| anyhow!("OpenAI-compatible API key is not configured"))?;

        let client = Self {
            api_key: api_key.to_string(),
            default_model: config.default_model().to_string(),
            chat_endpoint: config.chat_endpoint(),
        };

        let _ = client.build_client()?;
        Ok(client)
    }

    pub fn model(&self) -> &str {
        &self.default_model
    }

    /// Sends one user message (optionally preceded by a system prompt) and returns
    /// the content of the first choice.
    pub fn send_message(
        &self,
        input: &str,
        prompt: Option<String>,
        temperature: Option<f64>,
    ) -> Result<String> {
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let prompt_clone = prompt.clone();
            tokio::task::block_in_place(move || {
                handle.block_on(self.send_message_inner(input, prompt_clone, temperature))
            })
        } else {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(self.send_message_inner(input, prompt, temperature))
        }
    }

    async fn send_message_inner(
        &self,
        content: &str,
        prompt: Option<String>,
        temperature: Option<f64>,
    ) -> Result<String> {
        let messages = Self::build_messages(content, prompt);
        let builder = self.request_builder_from_messages(messages, temperature)?;

        let res = builder.send().await?.error_for_status()?;
        let data: Value = res.json().await?;
        extract_content(&data)
    }

    fn build_client(&self) -> Result<Client> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(client)
    }

    fn request_builder_from_messages(
        &self,
        messages: Vec<Value>,
        temperature: Option<f64>,
    ) -> Result<RequestBuilder> {
        let body = build_body(&self.default_model, messages, temperature);

        debug!("req: {:?}", body);

        let header_value = format!("Bearer {}", &self.api_key);
        let builder = self
            .build_client()?
            .post(&self.chat_endpoint)
            .header("Authorization", header_value)
            .json(&body);

        Ok(builder)
    }

    fn build_messages(content: &str, prompt: Option<String>) -> Vec<Value> {
        let mut messages = Vec::new();
        if let Some(prompt) = prompt
            && !prompt.trim().is_empty()
        {
            messages.push(json!({ "role": "system", "content": prompt.trim() }));
        }
        messages.push(json!({ "role": "user", "content": content }));
        messages
    }
}

fn build_body(model: &str, messages: Vec<Value>, temperature: Option<f64>) -> Value {
    let mut body = json!({
        "model": model,
        "messages": messages,
    });

    if let Some(v) = temperature
        && let Some(map) = body.as_object_mut()
    {
        map.insert("temperature".into(), json!(v));
    }
    body
}

fn extract_content(data: &Value) -> Result<String> {
    let output = data["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| anyhow!("Unexpected response {data}"))?;
    Ok(output.to_string())
}
