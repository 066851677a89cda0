//! Palette generation: quota, CAPTCHA, model call, post-processing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use super::captcha::{require_valid_captcha, CaptchaVerifier};
use super::scheme::{build_generation_result, GenerateColorRequest, SchemeGenerator, SchemeResponse};
use super::usage::UsageTracker;
use crate::models::ColorToken;

/// Why a generation request did not produce a palette.
#[derive(Debug)]
pub enum GenerationError {
    /// Missing image or mime type
    InvalidInput(String),
    /// No quota left today
    QuotaExhausted,
    /// CAPTCHA missing or rejected
    Captcha(anyhow::Error),
    /// The model failed or answered with something unusable
    Generator(anyhow::Error),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "Invalid input: {message}"),
            Self::QuotaExhausted => write!(f, "Daily generation limit reached"),
            Self::Captcha(e) => write!(f, "{e}"),
            Self::Generator(e) => write!(f, "{e:#}"),
        }
    }
}

impl std::error::Error for GenerationError {}

/// A generated palette and the quota left after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedPalette {
    /// Mood from the model
    pub mood: String,
    /// Six role tokens
    pub colors: Vec<ColorToken>,
    /// Uses left today
    pub remaining: u32,
}

/// Runs generation requests end to end.
#[derive(Clone)]
pub struct GenerationService {
    tracker: UsageTracker,
    verifier: Arc<dyn CaptchaVerifier>,
    generator: Arc<dyn SchemeGenerator>,
}

impl GenerationService {
    /// Creates a service from its collaborators.
    #[must_use]
    pub fn new(
        tracker: UsageTracker,
        verifier: Arc<dyn CaptchaVerifier>,
        generator: Arc<dyn SchemeGenerator>,
    ) -> Self {
        Self {
            tracker,
            verifier,
            generator,
        }
    }

    /// Generates a palette for `identifier`.
    ///
    /// Quota is checked first and only spent once a valid palette exists, so
    /// failed attempts are free.
    ///
    /// # Errors
    ///
    /// See [`GenerationError`].
    pub fn generate(
        &self,
        identifier: &str,
        request: &GenerateColorRequest,
        now: DateTime<Utc>,
    ) -> Result<GeneratedPalette, GenerationError> {
        if request.image_base64.is_empty() || request.mime_type.is_empty() {
            return Err(GenerationError::InvalidInput(
                "imageBase64 and mimeType are required".to_string(),
            ));
        }

        if self.tracker.check(identifier, now).remaining == 0 {
            info!(identifier, "Generation refused, quota exhausted");
            return Err(GenerationError::QuotaExhausted);
        }

        require_valid_captcha(
            self.verifier.as_ref(),
            request.turnstile_token.as_deref(),
            Some(identifier),
        )
        .map_err(GenerationError::Captcha)?;

        let raw = self.generator.generate(request).map_err(|e| {
            warn!("Scheme generator failed: {e:#}");
            GenerationError::Generator(e)
        })?;
        let response = SchemeResponse::parse(&raw).map_err(|e| {
            warn!("Scheme generator returned an unusable answer: {e:#}");
            GenerationError::Generator(e)
        })?;
        let result = build_generation_result(response);

        let consumed = self.tracker.consume(identifier, now);
        if !consumed.success {
            // Another request spent the last use in the meantime
            return Err(GenerationError::QuotaExhausted);
        }

        info!(identifier, mood = %result.mood, remaining = consumed.remaining, "Palette generated");
        Ok(GeneratedPalette {
            mood: result.mood,
            colors: result.colors,
            remaining: consumed.remaining,
        })
    }
}
