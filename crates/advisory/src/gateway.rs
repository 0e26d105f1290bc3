//! Outbound calls to the completion and postal lookup providers.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::api_types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ViaCepResponse};
use crate::config::AdvisoryConfig;
use crate::error::AdvisoryError;

/// System prompt sent ahead of every user prompt.
pub const ADVISOR_SYSTEM_PROMPT: &str = "Você é um assistente especializado em prevenção de vício em apostas e jogos. Forneça conselhos úteis e motivacionais.";

/// Answer when no usable API key is configured.
pub const KEY_NOT_CONFIGURED: &str =
    "API Key não configurada. Configure a chave da OpenAI no appsettings.json";

/// Answer when the provider responds with a non-success status.
pub const PROVIDER_UNREACHABLE: &str = "Erro ao conectar com a API da OpenAI";

/// Answer when the provider returns no usable choice.
pub const NO_RESPONSE: &str = "Resposta não disponível";

/// Answer on transport or decoding failures.
pub const INTERNAL_FAILURE: &str = "Erro interno ao processar solicitação";

/// Postal lookup error payloads.
pub const CEP_NOT_FOUND: &str = "CEP não encontrado";
pub const CEP_PROVIDER_ERROR: &str = "Erro ao consultar CEP";
pub const CEP_INTERNAL_ERROR: &str = "Erro interno ao consultar CEP";

/// Address fields returned for a postal code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostalAddress {
    pub cep: Option<String>,
    pub logradouro: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub localidade: Option<String>,
    pub uf: Option<String>,
    pub ibge: Option<String>,
    pub gia: Option<String>,
    pub ddd: Option<String>,
    pub siafi: Option<String>,
}

/// Outcome of a postal lookup, serialized as the response body as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PostalLookup {
    Found(PostalAddress),
    Failed { error: &'static str },
}

impl PostalLookup {
    fn failed(error: &'static str) -> Self {
        Self::Failed { error }
    }
}

/// Stateless client for the external advisory providers.
///
/// Public operations never fail. Provider problems are logged and replaced by
/// the fixed messages above.
pub struct AdvisoryGateway {
    client: Client,
    config: AdvisoryConfig,
}

impl AdvisoryGateway {
    /// Create a new gateway with the given configuration.
    pub fn new(config: AdvisoryConfig) -> Result<Self, AdvisoryError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                AdvisoryError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!(
            "Advisory gateway initialized with model: {}, completions configured: {}",
            config.openai_model,
            config.is_configured()
        );

        Ok(Self { client, config })
    }

    /// Create a gateway from environment variables.
    ///
    /// See [`AdvisoryConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, AdvisoryError> {
        Self::new(AdvisoryConfig::from_env())
    }

    /// Get the active configuration.
    pub fn config(&self) -> &AdvisoryConfig {
        &self.config
    }

    /// Ask the completion provider for advice on `prompt`.
    pub async fn advise(&self, prompt: &str) -> String {
        if !self.config.is_configured() {
            return KEY_NOT_CONFIGURED.to_string();
        }

        match self.chat_completion(prompt).await {
            Ok(completion) => completion
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .unwrap_or_else(|| {
                    warn!("No content in completion response");
                    NO_RESPONSE.to_string()
                }),
            Err(AdvisoryError::Provider { status, body }) => {
                warn!(status, "Completion provider rejected request: {}", body);
                PROVIDER_UNREACHABLE.to_string()
            }
            Err(e) => {
                error!("Completion request failed: {}", e);
                INTERNAL_FAILURE.to_string()
            }
        }
    }

    /// Look up the address for an 8-digit postal code.
    pub async fn lookup_postal_code(&self, cep: &str) -> PostalLookup {
        match self.fetch_postal_code(cep).await {
            Ok(payload) if payload.erro => PostalLookup::failed(CEP_NOT_FOUND),
            Ok(payload) => PostalLookup::Found(payload.address),
            Err(AdvisoryError::Provider { status, .. }) => {
                warn!(cep, status, "Postal lookup provider returned an error");
                PostalLookup::failed(CEP_PROVIDER_ERROR)
            }
            Err(e) => {
                error!(cep, "Postal lookup failed: {}", e);
                PostalLookup::failed(CEP_INTERNAL_ERROR)
            }
        }
    }

    async fn chat_completion(&self, prompt: &str) -> Result<ChatCompletionResponse, AdvisoryError> {
        let url = format!("{}/chat/completions", self.config.openai_base_url);
        let api_key = self.config.openai_api_key.as_deref().unwrap_or_default();

        let request = ChatCompletionRequest {
            model: self.config.openai_model.clone(),
            messages: vec![
                ChatMessage::system(ADVISOR_SYSTEM_PROMPT),
                ChatMessage::user(prompt),
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Sending completion request: {:?}", request);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AdvisoryError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisoryError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AdvisoryError::Parse(e.to_string()))?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        Ok(completion)
    }

    async fn fetch_postal_code(&self, cep: &str) -> Result<ViaCepResponse, AdvisoryError> {
        let url = format!("{}/{}/json/", self.config.viacep_base_url, cep);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AdvisoryError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdvisoryError::Provider {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AdvisoryError::Parse(e.to_string()))
    }
}
