//! HTTP collaborators of the generation pipeline.
//!
//! - [`TurnstileVerifier`] checks CAPTCHA tokens against Cloudflare's
//!   `siteverify` endpoint.
//! - [`ChatSchemeGenerator`] sends the image to an OpenAI-compatible
//!   `/chat/completions` endpoint and returns the model's JSON answer.
//!
//! Both implement the synchronous service traits. They drive their async
//! requests on the current Tokio runtime and must be called from a blocking
//! thread (`spawn_blocking`), never from an async task.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::config::AiConfig;
use crate::services::scheme::{SYSTEM_PROMPT, USER_PROMPT};
use crate::services::{CaptchaVerifier, GenerateColorRequest, SchemeGenerator, VerifyResult};

/// Error code reported when the verification endpoint could not be reached
/// or answered with something unreadable.
pub const VERIFICATION_FAILED: &str = "verification-failed";

const CAPTCHA_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f64 = 0.7;

fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// Runs `future` on the current runtime from a blocking thread.
fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let handle = Handle::try_current().context("No Tokio runtime available for HTTP call")?;
    Ok(handle.block_on(future))
}

// ============================================================================
// Turnstile
// ============================================================================

/// Verifies tokens with Cloudflare Turnstile.
#[derive(Clone)]
pub struct TurnstileVerifier {
    client: reqwest::Client,
    secret_key: String,
    verify_url: String,
}

impl TurnstileVerifier {
    /// Creates a verifier posting to `verify_url` with `secret_key`.
    pub fn new(secret_key: impl Into<String>, verify_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http_client(CAPTCHA_TIMEOUT)?,
            secret_key: secret_key.into(),
            verify_url: verify_url.into(),
        })
    }

    async fn siteverify(&self, token: &str, remote_ip: Option<&str>) -> Result<VerifyResult> {
        let mut form = vec![("secret", self.secret_key.as_str()), ("response", token)];
        if let Some(ip) = remote_ip {
            form.push(("remoteip", ip));
        }

        let response = self
            .client
            .post(&self.verify_url)
            .form(&form)
            .send()
            .await
            .context("Turnstile request failed")?;

        response
            .json::<VerifyResult>()
            .await
            .context("Failed to read Turnstile response")
    }
}

impl CaptchaVerifier for TurnstileVerifier {
    fn verify(&self, token: &str, remote_ip: Option<&str>) -> VerifyResult {
        match block_on(self.siteverify(token, remote_ip)).and_then(|result| result) {
            Ok(result) => {
                debug!(success = result.success, "Turnstile answered");
                result
            }
            Err(e) => {
                warn!("Turnstile verification failed: {e:#}");
                VerifyResult::rejected([VERIFICATION_FAILED])
            }
        }
    }
}

// ============================================================================
// Chat completions model
// ============================================================================

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Image-to-palette model behind an OpenAI-compatible chat API.
#[derive(Clone)]
pub struct ChatSchemeGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl ChatSchemeGenerator {
    /// Creates a generator from the `[ai]` config section.
    pub fn new(config: &AiConfig) -> Result<Self> {
        let api_key = config
            .api_key()
            .context("ai.api_key is required for scheme generation")?;

        Ok(Self {
            client: http_client(config.timeout())?,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: config.model.clone(),
        })
    }

    /// Model name sent with each request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &GenerateColorRequest) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": USER_PROMPT },
                        { "type": "image_url", "image_url": { "url": request.data_url() } }
                    ]
                }
            ],
            "response_format": { "type": "json_object" },
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context(format!("Model request to {} failed", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("Model request failed with status {status}: {}", detail.trim());
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .context("Failed to read model response")?;

        // A missing message is reported by the answer parser as "no content"
        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

impl SchemeGenerator for ChatSchemeGenerator {
    fn generate(&self, request: &GenerateColorRequest) -> Result<String> {
        block_on(self.complete(request))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> GenerateColorRequest {
        GenerateColorRequest {
            image_base64: "iVBORw0KGgo=".to_string(),
            mime_type: "image/png".to_string(),
            turnstile_token: Some("token".to_string()),
        }
    }

    fn ai_config(server: &MockServer) -> AiConfig {
        AiConfig {
            base_url: format!("{}/v1/", server.uri()),
            model: "test/vision-model".to_string(),
            api_key: Some("sk-test".to_string()),
            ..AiConfig::default()
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_turnstile_posts_secret_token_and_ip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/siteverify"))
            .and(body_string_contains("secret=shh"))
            .and(body_string_contains("response=tok"))
            .and(body_string_contains("remoteip=203.0.113.7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "challenge_ts": "2025-06-01T09:00:00.000Z",
                "hostname": "example.com"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let verifier =
            TurnstileVerifier::new("shh", format!("{}/siteverify", server.uri())).unwrap();
        let result = tokio::task::spawn_blocking(move || verifier.verify("tok", Some("203.0.113.7")))
            .await
            .unwrap();

        assert!(result.success);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_turnstile_rejection_codes_pass_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error-codes": ["timeout-or-duplicate"]
            })))
            .mount(&server)
            .await;

        let verifier = TurnstileVerifier::new("shh", server.uri()).unwrap();
        let result = tokio::task::spawn_blocking(move || verifier.verify("tok", None))
            .await
            .unwrap();

        assert_eq!(result, VerifyResult::rejected(["timeout-or-duplicate"]));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_turnstile_unreadable_answer_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let verifier = TurnstileVerifier::new("shh", server.uri()).unwrap();
        let result = tokio::task::spawn_blocking(move || verifier.verify("tok", None))
            .await
            .unwrap();

        assert_eq!(result, VerifyResult::rejected([VERIFICATION_FAILED]));
    }

    #[test]
    fn test_verify_outside_runtime_is_rejected() {
        let verifier = TurnstileVerifier::new("shh", "http://127.0.0.1:9/siteverify").unwrap();
        let result = verifier.verify("tok", None);
        assert_eq!(result, VerifyResult::rejected([VERIFICATION_FAILED]));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_generator_sends_prompts_and_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "test/vision-model",
                "response_format": { "type": "json_object" },
                "max_tokens": 1000
            })))
            .and(body_string_contains("data:image/png;base64,iVBORw0KGgo="))
            .and(body_string_contains("Analyze this image"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "{\"mood\": \"Calm\"}" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generator = ChatSchemeGenerator::new(&ai_config(&server)).unwrap();
        assert_eq!(generator.model(), "test/vision-model");
        let content = tokio::task::spawn_blocking(move || generator.generate(&request()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(content, r#"{"mood": "Calm"}"#);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_generator_error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let generator = ChatSchemeGenerator::new(&ai_config(&server)).unwrap();
        let err = tokio::task::spawn_blocking(move || generator.generate(&request()))
            .await
            .unwrap()
            .unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("429"));
        assert!(message.contains("rate limited"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_generator_without_choices_returns_empty_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let generator = ChatSchemeGenerator::new(&ai_config(&server)).unwrap();
        let content = tokio::task::spawn_blocking(move || generator.generate(&request()))
            .await
            .unwrap()
            .unwrap();

        assert!(content.is_empty());
    }

    #[test]
    fn test_generator_requires_api_key() {
        assert!(ChatSchemeGenerator::new(&AiConfig::default()).is_err());
    }
}
