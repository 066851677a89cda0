//! Service layer for business logic.
//!
//! Services coordinate models with storage and with the external
//! collaborators (the palette model and the CAPTCHA verifier).

pub mod captcha;
pub mod generation;
pub mod kv;
pub mod scheme;
pub mod usage;

// Re-export commonly used types and functions
pub use captcha::{require_valid_captcha, CaptchaVerifier, StaticVerifier, VerifyResult};
pub use generation::{GeneratedPalette, GenerationError, GenerationService};
pub use kv::{FileKvStore, KvStore, MemoryKvStore};
pub use scheme::{
    build_generation_result, GenerateColorRequest, GenerationResult, SchemeGenerator,
    SchemeResponse,
};
pub use usage::UsageTracker;
