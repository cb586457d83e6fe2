use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse,
    },
    Client,
};

use crate::{
    config::SummarizerConfig,
    error::{NewsdeskError, Result},
};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat-completion client for the summarization service. One attempt per
/// call, no retries; a failed summary drops the answer flow to its listing
/// fallback.
#[derive(Clone)]
pub struct LlmApiClient {
    client: Client<OpenAIConfig>,
    config: SummarizerConfig,
}

impl LlmApiClient {
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            NewsdeskError::SummarizerUnavailable("Summarizer API key not configured".to_string())
        })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| OPENAI_BASE_URL.to_string());

        let openai_config = OpenAIConfig::new()
            .with_api_base(base_url)
            .with_api_key(api_key);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| {
                NewsdeskError::Summarizer(format!("Failed to create summarizer HTTP client: {error}"))
            })?;

        // async-openai retries server errors with exponential backoff for up
        // to 15 minutes by default. Zero out the window so every call is a
        // single attempt within the configured timeout.
        let backoff = backoff::ExponentialBackoff {
            max_elapsed_time: Some(Duration::ZERO),
            ..Default::default()
        };

        let client = Client::with_config(openai_config)
            .with_http_client(http_client)
            .with_backoff(backoff);

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub async fn complete(&self, prompt: &str, system_prompt: Option<&str>) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(NewsdeskError::Validation("Prompt cannot be empty".to_string()));
        }

        let request = self.build_request(prompt, system_prompt)?;

        match self.client.chat().create(request).await {
            Ok(response) => Self::extract_content(response),
            Err(error) => Err(Self::map_openai_error(error)),
        }
    }

    fn build_request(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<CreateChatCompletionRequest> {
        let mut messages = Vec::new();

        if let Some(system_prompt) = system_prompt.filter(|value| !value.trim().is_empty()) {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|error| {
                        NewsdeskError::Validation(format!("Invalid system prompt: {error}"))
                    })?
                    .into(),
            );
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|error| NewsdeskError::Validation(format!("Invalid user prompt: {error}")))?
                .into(),
        );

        CreateChatCompletionRequestArgs::default()
            .model(self.config.model.clone())
            .messages(messages)
            .max_tokens(self.config.max_tokens)
            .temperature(self.config.temperature)
            .build()
            .map_err(|error| {
                NewsdeskError::Validation(format!("Invalid summarizer request: {error}"))
            })
    }

    fn extract_content(response: CreateChatCompletionResponse) -> Result<String> {
        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| {
                NewsdeskError::MalformedResponse(
                    "Summarizer response contained no choices".to_string(),
                )
            })?
            .message
            .content
            .unwrap_or_default();

        if message.trim().is_empty() {
            return Err(NewsdeskError::MalformedResponse(
                "Summarizer response contained empty content".to_string(),
            ));
        }

        Ok(message)
    }

    fn map_openai_error(error: OpenAIError) -> NewsdeskError {
        match error {
            OpenAIError::Reqwest(reqwest_error) => {
                NewsdeskError::Summarizer(format!("Summarizer request failed: {reqwest_error}"))
            }
            OpenAIError::ApiError(api_error) => {
                NewsdeskError::Summarizer(format!("Summarizer API error: {api_error}"))
            }
            OpenAIError::JSONDeserialize(err) => NewsdeskError::MalformedResponse(format!(
                "Failed to parse summarizer response: {err}"
            )),
            OpenAIError::InvalidArgument(message) => NewsdeskError::Validation(message),
            other => NewsdeskError::Summarizer(other.to_string()),
        }
    }
}
