//! CAPTCHA gate in front of generation.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Error code reported when no CAPTCHA secret is configured.
pub const MISSING_SECRET_KEY: &str = "missing-secret-key";

/// Answer from a CAPTCHA verification service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResult {
    /// Whether the token was accepted
    pub success: bool,
    /// Reasons for rejection
    #[serde(rename = "error-codes", default)]
    pub error_codes: Vec<String>,
}

impl VerifyResult {
    /// An accepted result.
    #[must_use]
    pub const fn accepted() -> Self {
        Self {
            success: true,
            error_codes: Vec::new(),
        }
    }

    /// A rejected result with the given codes.
    #[must_use]
    pub fn rejected<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            success: false,
            error_codes: codes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Verifies a client CAPTCHA token.
pub trait CaptchaVerifier: Send + Sync {
    /// Checks `token`, optionally bound to the caller's IP.
    fn verify(&self, token: &str, remote_ip: Option<&str>) -> VerifyResult;
}

/// Verifier with a fixed answer, for development and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticVerifier {
    result: VerifyResult,
}

impl StaticVerifier {
    /// Accepts every token.
    #[must_use]
    pub const fn accept_all() -> Self {
        Self {
            result: VerifyResult::accepted(),
        }
    }

    /// Rejects every token with `codes`.
    #[must_use]
    pub fn reject_all<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            result: VerifyResult::rejected(codes),
        }
    }

    /// What to use when no secret is configured: accept in development,
    /// reject with `missing-secret-key` anywhere else.
    #[must_use]
    pub fn unconfigured(development: bool) -> Self {
        if development {
            warn!("CAPTCHA secret not configured, skipping validation in development mode");
            Self::accept_all()
        } else {
            warn!("CAPTCHA secret not configured, all generation requests will be rejected");
            Self::reject_all([MISSING_SECRET_KEY])
        }
    }
}

impl CaptchaVerifier for StaticVerifier {
    fn verify(&self, _token: &str, _remote_ip: Option<&str>) -> VerifyResult {
        self.result.clone()
    }
}

/// Fails unless `token` is present and the verifier accepts it.
///
/// # Errors
///
/// "Turnstile token is required" for a missing or empty token, otherwise
/// "Turnstile validation failed: <codes>" listing the rejection codes.
pub fn require_valid_captcha(
    verifier: &dyn CaptchaVerifier,
    token: Option<&str>,
    remote_ip: Option<&str>,
) -> Result<()> {
    let token = match token {
        Some(token) if !token.is_empty() => token,
        _ => anyhow::bail!("Turnstile token is required"),
    };

    let result = verifier.verify(token, remote_ip);
    if !result.success {
        let codes = if result.error_codes.is_empty() {
            "unknown".to_string()
        } else {
            result.error_codes.join(", ")
        };
        anyhow::bail!("Turnstile validation failed: {codes}");
    }
    Ok(())
}
