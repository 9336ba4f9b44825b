//! LLM client integration using siumai
//!
//! Implements the `TextGenerator` collaborator for the README step. Together
//! AI is reached through its OpenAI-compatible endpoint.

use async_trait::async_trait;
use containerizer_core::{
    ContainerizerError, ContainerizerResult, ErrorContext, LlmConfig, TextGenerator,
};
use siumai::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

pub const TOGETHER_BASE_URL: &str = "https://api.together.xyz/v1";
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Environment variable holding the API key of a provider
pub fn api_key_env_var(provider: &str) -> Option<&'static str> {
    match provider {
        "openai" => Some("OPENAI_API_KEY"),
        "together" => Some("TOGETHER_API_KEY"),
        "anthropic" => Some("ANTHROPIC_API_KEY"),
        "groq" => Some("GROQ_API_KEY"),
        _ => None,
    }
}

/// Configured key, or the provider's environment variable through `lookup`
fn resolve_api_key(
    config: &LlmConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ContainerizerResult<String> {
    if let Some(key) = config.api_key.as_ref().filter(|k| !k.is_empty()) {
        return Ok(key.clone());
    }

    let var = api_key_env_var(&config.provider);
    var.and_then(&lookup).ok_or_else(|| {
        Box::new(ContainerizerError::Config {
            message: format!("{} API key not found", config.provider),
            source: None,
            context: ErrorContext::new("llm_client")
                .with_operation("build_client")
                .with_suggestion(&format!(
                    "Set llm.api_key or the {} environment variable",
                    var.unwrap_or("provider's API key")
                )),
        })
    })
}

/// Siumai-backed text generator
pub struct ContainerizerLlmClient {
    client: Box<dyn LlmClient>,
    config: LlmConfig,
}

impl ContainerizerLlmClient {
    pub async fn new(config: LlmConfig) -> ContainerizerResult<Self> {
        let client = Self::build_client(&config).await?;

        info!(
            provider = %config.provider,
            model = %config.model,
            "Created LLM client"
        );

        Ok(Self { client, config })
    }

    async fn build_client(config: &LlmConfig) -> ContainerizerResult<Box<dyn LlmClient>> {
        let env = |name: &str| std::env::var(name).ok();

        match config.provider.as_str() {
            "openai" | "together" => {
                let api_key = resolve_api_key(config, env)?;
                let base_url = match (&config.base_url, config.provider.as_str()) {
                    (Some(url), _) => Some(url.clone()),
                    (None, "together") => Some(TOGETHER_BASE_URL.to_string()),
                    (None, _) => None,
                };

                let mut builder = LlmBuilder::new()
                    .openai()
                    .api_key(&api_key)
                    .model(&config.model)
                    .temperature(config.temperature);

                if let Some(max_tokens) = config.max_tokens {
                    builder = builder.max_tokens(max_tokens);
                }

                if let Some(base_url) = &base_url {
                    builder = builder.base_url(base_url);
                }

                let client = builder
                    .build()
                    .await
                    .map_err(|e| build_error(config, e))?;

                Ok(Box::new(client))
            }
            "anthropic" => {
                let api_key = resolve_api_key(config, env)?;

                let mut builder = LlmBuilder::new()
                    .anthropic()
                    .api_key(&api_key)
                    .model(&config.model)
                    .temperature(config.temperature);

                if let Some(max_tokens) = config.max_tokens {
                    builder = builder.max_tokens(max_tokens);
                }

                let client = builder
                    .build()
                    .await
                    .map_err(|e| build_error(config, e))?;

                Ok(Box::new(client))
            }
            "groq" => {
                let api_key = resolve_api_key(config, env)?;

                let mut builder = LlmBuilder::new()
                    .groq()
                    .api_key(&api_key)
                    .model(&config.model)
                    .temperature(config.temperature);

                if let Some(max_tokens) = config.max_tokens {
                    builder = builder.max_tokens(max_tokens);
                }

                let client = builder
                    .build()
                    .await
                    .map_err(|e| build_error(config, e))?;

                Ok(Box::new(client))
            }
            "ollama" => {
                let base_url = config
                    .base_url
                    .clone()
                    .unwrap_or_else(|| OLLAMA_BASE_URL.to_string());

                let mut builder = LlmBuilder::new()
                    .ollama()
                    .model(&config.model)
                    .base_url(&base_url)
                    .temperature(config.temperature);

                if let Some(max_tokens) = config.max_tokens {
                    builder = builder.max_tokens(max_tokens);
                }

                let client = builder
                    .build()
                    .await
                    .map_err(|e| build_error(config, e))?;

                Ok(Box::new(client))
            }
            provider => Err(Box::new(ContainerizerError::Config {
                message: format!("Unsupported LLM provider: {}", provider),
                source: None,
                context: ErrorContext::new("llm_client")
                    .with_operation("build_client")
                    .with_suggestion("Use one of: openai, together, anthropic, groq, ollama"),
            })),
        }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn generation_error(&self, message: String) -> Box<ContainerizerError> {
        Box::new(ContainerizerError::GenerationFailed {
            message,
            provider: Some(self.config.provider.clone()),
            model: Some(self.config.model.clone()),
            context: ErrorContext::new("llm_client").with_operation("generate"),
        })
    }
}

#[async_trait]
impl TextGenerator for ContainerizerLlmClient {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> ContainerizerResult<String> {
        let start_time = Instant::now();
        let messages = vec![system!(system_prompt), user!(user_prompt)];

        debug!(
            provider = %self.config.provider,
            prompt_chars = user_prompt.len(),
            "Requesting completion"
        );

        let response = self
            .client
            .chat(messages)
            .await
            .map_err(|e| self.generation_error(format!("LLM request failed: {}", e)))?;

        match response.content_text() {
            Some(content) if !content.trim().is_empty() => {
                info!(
                    provider = %self.config.provider,
                    duration_ms = start_time.elapsed().as_millis() as u64,
                    chars = content.len(),
                    "Completion received"
                );
                Ok(content.to_string())
            }
            _ => Err(self.generation_error("No text content in LLM response".to_string())),
        }
    }
}

fn build_error(config: &LlmConfig, e: impl std::fmt::Display) -> Box<ContainerizerError> {
    Box::new(ContainerizerError::GenerationFailed {
        message: format!("Failed to build {} client: {}", config.provider, e),
        provider: Some(config.provider.clone()),
        model: Some(config.model.clone()),
        context: ErrorContext::new("llm_client").with_operation("build_client"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            api_key: api_key.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn configured_key_wins_over_environment() {
        let key = resolve_api_key(&config("together", Some("from-config")), |_| {
            Some("from-env".to_string())
        })
        .unwrap();
        assert_eq!(key, "from-config");
    }

    #[test]
    fn falls_back_to_provider_variable() {
        let key = resolve_api_key(&config("together", None), |name| {
            (name == "TOGETHER_API_KEY").then(|| "from-env".to_string())
        })
        .unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn missing_key_is_a_configuration_error() {
        let err = resolve_api_key(&config("groq", None), |_| None).unwrap_err();
        assert_eq!(err.stage(), "configuration");
        assert!(err.to_string().contains("groq API key not found"));
    }

    #[tokio::test]
    async fn unsupported_provider_is_rejected() {
        let result = ContainerizerLlmClient::new(config("carrier-pigeon", Some("k"))).await;
        match result {
            Err(err) => assert!(err.to_string().contains("Unsupported LLM provider")),
            Ok(_) => panic!("expected an error"),
        }
    }
}
