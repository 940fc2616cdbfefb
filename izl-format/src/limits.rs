//! Decode limits

/// Bounds applied while decoding untrusted payloads
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum inflated body length (default: 8 MiB)
    pub max_inflated_len: usize,
    /// Maximum placements per level (default: 4,096)
    pub max_placements: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_inflated_len: 8 * 1024 * 1024,
            max_placements: 4_096,
        }
    }
}
