//! Web API module for Chroma Palette.
//!
//! This module provides a REST API for the palette front-end: color math,
//! palette export, the per-IP usage quota and image-based generation.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /api/usage/check` - Remaining quota for the caller
//! - `POST /api/usage/consume` - Spend one use
//! - `POST /api/usage/claim-bonus` - Claim the daily share bonus
//! - `POST /api/colors/shades` - Shade ramp of a color
//! - `POST /api/colors/contrast` - WCAG contrast of two colors
//! - `POST /api/colors/dark-variant` - Dark-mode value for a role
//! - `POST /api/palette/export` - Tailwind, CSS or JSON code for a palette
//! - `POST /api/scheme/generate` - Palette from an image

pub mod clients;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{Config, StoreKind};
use crate::export::{export_palette, ExportFormat};
use crate::models::{
    best_text_color, calculate_dark_variant, generate_shades, BonusOutcome, ColorToken,
    ConsumeOutcome, ContrastReport, RgbColor, RoleCategory, ShadeRamp, UsageStatus,
};
use crate::services::{
    CaptchaVerifier, GenerateColorRequest, GeneratedPalette, GenerationError, GenerationService,
    SchemeGenerator, StaticVerifier, UsageTracker,
};
use clients::{ChatSchemeGenerator, TurnstileVerifier};

/// Identifier used when no client address header is present.
pub const FALLBACK_IDENTIFIER: &str = "127.0.0.1";

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the web API.
#[derive(Clone)]
pub struct AppState {
    /// Per-identifier quota
    tracker: UsageTracker,
    /// CAPTCHA gate for generation
    verifier: Arc<dyn CaptchaVerifier>,
    /// Image-to-palette model, if one is attached
    generator: Option<Arc<dyn SchemeGenerator>>,
}

impl AppState {
    /// Creates a new application state from configuration.
    ///
    /// A configured CAPTCHA secret enables Turnstile verification and a
    /// configured AI key enables generation.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let tracker = config.usage.tracker()?;
        if config.usage.store == StoreKind::Disabled {
            warn!("Usage store disabled: quota checks fail open and nothing is persisted");
        }

        let verifier: Arc<dyn CaptchaVerifier> = match config.captcha.secret() {
            Some(secret) => Arc::new(TurnstileVerifier::new(
                secret,
                config.captcha.verify_url.clone(),
            )?),
            None => Arc::new(StaticVerifier::unconfigured(
                config.server.environment.is_development(),
            )),
        };

        let generator: Option<Arc<dyn SchemeGenerator>> = if config.ai.is_configured() {
            info!(model = %config.ai.model, "Scheme generation enabled");
            Some(Arc::new(ChatSchemeGenerator::new(&config.ai)?))
        } else {
            warn!("ai.api_key not set, /api/scheme/generate will answer 503");
            None
        };

        Ok(Self {
            tracker,
            verifier,
            generator,
        })
    }

    /// Attaches the image-to-palette model.
    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn SchemeGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Replaces the CAPTCHA verifier.
    #[must_use]
    pub fn with_verifier(mut self, verifier: Arc<dyn CaptchaVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    fn generation_service(&self) -> Option<GenerationService> {
        self.generator.as_ref().map(|generator| {
            GenerationService::new(
                self.tracker.clone(),
                Arc::clone(&self.verifier),
                Arc::clone(generator),
            )
        })
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current health status (e.g., "healthy").
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Single color request.
#[derive(Debug, Deserialize)]
pub struct ShadesRequest {
    /// Base color.
    pub hex: String,
}

/// Shade ramp response.
#[derive(Debug, Serialize)]
pub struct ShadesResponse {
    /// Normalized base color.
    pub hex: String,
    /// Stop name to color.
    pub shades: ShadeRamp,
}

/// Contrast request.
#[derive(Debug, Deserialize)]
pub struct ContrastRequest {
    /// Color being rated.
    pub foreground: String,
    /// Color it sits on; the better of white or black when omitted.
    #[serde(default)]
    pub background: Option<String>,
}

/// Dark variant request.
#[derive(Debug, Deserialize)]
pub struct DarkVariantRequest {
    /// Light mode color.
    pub hex: String,
    /// Semantic role.
    #[serde(default)]
    pub role: Option<String>,
}

/// Dark variant response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DarkVariantResponse {
    /// Normalized light color.
    pub hex: String,
    /// Role as given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Role category the role fell into.
    pub category: RoleCategory,
    /// Derived dark mode color.
    pub dark_hex: String,
}

/// Export request.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    /// Tokens to export.
    pub colors: Vec<ColorToken>,
    /// Output format.
    #[serde(default)]
    pub format: ExportFormat,
}

/// Export response.
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    /// Generated code.
    pub code: String,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

// ============================================================================
// Helpers
// ============================================================================

/// Identifies the caller: `cf-connecting-ip`, then the first
/// `x-forwarded-for` entry, then [`FALLBACK_IDENTIFIER`].
#[must_use]
pub fn client_identifier(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    if let Some(ip) = header("cf-connecting-ip") {
        return ip.to_string();
    }

    header("x-forwarded-for")
        .and_then(|list| list.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(FALLBACK_IDENTIFIER)
        .to_string()
}

/// Strictly parses a color from a request body.
fn parse_color(hex: &str) -> Result<RgbColor, (StatusCode, Json<ApiError>)> {
    RgbColor::from_hex(hex).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::with_details("Invalid color", format!("{e:#}"))),
        )
    })
}

/// Runs blocking work (store I/O, HTTP collaborators) off the async workers.
async fn run_blocking<T, F>(task: F) -> Result<T, (StatusCode, Json<ApiError>)>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::with_details("Background task failed", e.to_string())),
        )
    })
}

fn generation_error_response(error: &GenerationError) -> (StatusCode, Json<ApiError>) {
    let status = match error {
        GenerationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        GenerationError::Captcha(_) => StatusCode::FORBIDDEN,
        GenerationError::QuotaExhausted => StatusCode::TOO_MANY_REQUESTS,
        GenerationError::Generator(_) => StatusCode::BAD_GATEWAY,
    };

    let body = match error {
        GenerationError::Generator(_) => {
            ApiError::with_details("Failed to generate color scheme", error.to_string())
        }
        _ => ApiError::new(error.to_string()),
    };

    (status, Json(body))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health - Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /api/usage/check - Remaining quota for the caller.
async fn check_usage(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<UsageStatus> {
    let identifier = client_identifier(&headers);
    run_blocking(move || state.tracker.check(&identifier, Utc::now()))
        .await
        .map(Json)
}

/// POST /api/usage/consume - Spend one use.
async fn consume_usage(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<ConsumeOutcome> {
    let identifier = client_identifier(&headers);
    run_blocking(move || state.tracker.consume(&identifier, Utc::now()))
        .await
        .map(Json)
}

/// POST /api/usage/claim-bonus - Claim the share bonus.
async fn claim_bonus(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<BonusOutcome> {
    let identifier = client_identifier(&headers);
    run_blocking(move || state.tracker.claim_bonus(&identifier, Utc::now()))
        .await
        .map(Json)
}

/// POST /api/colors/shades - Shade ramp of a color.
async fn color_shades(Json(request): Json<ShadesRequest>) -> ApiResult<ShadesResponse> {
    let hex = parse_color(&request.hex)?.to_hex();
    Ok(Json(ShadesResponse {
        shades: generate_shades(&hex),
        hex,
    }))
}

/// POST /api/colors/contrast - Contrast ratio and WCAG rating.
async fn color_contrast(Json(request): Json<ContrastRequest>) -> ApiResult<ContrastReport> {
    let foreground = parse_color(&request.foreground)?.to_hex();
    let background = match request.background.as_deref() {
        Some(background) => parse_color(background)?.to_hex(),
        None => best_text_color(&foreground).to_string(),
    };
    Ok(Json(ContrastReport::new(&foreground, &background)))
}

/// POST /api/colors/dark-variant - Dark-mode value for a role.
async fn color_dark_variant(
    Json(request): Json<DarkVariantRequest>,
) -> ApiResult<DarkVariantResponse> {
    let hex = parse_color(&request.hex)?.to_hex();
    let role = request.role.as_deref();
    Ok(Json(DarkVariantResponse {
        dark_hex: calculate_dark_variant(&hex, role),
        category: RoleCategory::classify(role),
        role: request.role,
        hex,
    }))
}

/// POST /api/palette/export - Export code for a palette.
async fn export_palette_code(Json(request): Json<ExportRequest>) -> ApiResult<ExportResponse> {
    let code = export_palette(&request.colors, request.format).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::with_details("Failed to export palette", format!("{e:#}"))),
        )
    })?;
    Ok(Json(ExportResponse { code }))
}

/// POST /api/scheme/generate - Generate a palette from an image.
async fn generate_scheme(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<GenerateColorRequest>,
) -> ApiResult<GeneratedPalette> {
    let Some(service) = state.generation_service() else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new("Color scheme generation is not configured")),
        ));
    };

    let identifier = client_identifier(&headers);

    run_blocking(move || service.generate(&identifier, &request, Utc::now()))
        .await?
        .map(Json)
        .map_err(|e| generation_error_response(&e))
}

// ============================================================================
// Router
// ============================================================================

/// Creates the API router.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - allow all origins; the front-end is served from
    // a different origin during development.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Usage endpoints
        .route("/api/usage/check", post(check_usage))
        .route("/api/usage/consume", post(consume_usage))
        .route("/api/usage/claim-bonus", post(claim_bonus))
        // Color engine endpoints
        .route("/api/colors/shades", post(color_shades))
        .route("/api/colors/contrast", post(color_contrast))
        .route("/api/colors/dark-variant", post(color_dark_variant))
        // Palette endpoints
        .route("/api/palette/export", post(export_palette_code))
        .route("/api/scheme/generate", post(generate_scheme))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the web server.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(state);

    info!("Starting Chroma Palette web server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
