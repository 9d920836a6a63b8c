//! URL handling
//!
//! Canonical URL normalization for deduplication, and the host key used by
//! the per-host rate limiter.

mod host;
mod normalize;

pub use host::host_key;
pub use normalize::normalize_url;
