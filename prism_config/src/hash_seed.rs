//! `PYTHONHASHSEED` parsing.

use prism_core::{Status, StatusResult};

/// Error message for a malformed seed.
pub const HASH_SEED_ERROR: &str =
    "PYTHONHASHSEED must be \"random\" or an integer in range [0; 4294967295]";

/// Resolved hash seed setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashSeed {
    /// Hash with a random seed.
    Random,
    /// Hash with this fixed seed.
    Fixed(u32),
}

impl HashSeed {
    /// The `(use_hash_seed, hash_seed)` pair stored in a configuration.
    #[must_use]
    pub const fn as_config(self) -> (bool, u32) {
        match self {
            Self::Random => (false, 0),
            Self::Fixed(seed) => (true, seed),
        }
    }
}

/// Parse a seed: `"random"` or a decimal integer in `[0, 4294967295]`.
pub fn parse_hash_seed(text: &str) -> StatusResult<HashSeed> {
    if text == "random" {
        return Ok(HashSeed::Random);
    }
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Status::validation("config_init_hash_seed", HASH_SEED_ERROR));
    }
    text.parse::<u32>()
        .map(HashSeed::Fixed)
        .map_err(|_| Status::validation("config_init_hash_seed", HASH_SEED_ERROR))
}
