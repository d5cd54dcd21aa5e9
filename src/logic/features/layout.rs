//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the engineered feature schema**
//!
//! ## Rules:
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! The order here is the canonical order the transformer emits. The model
//! itself may expect a different column order; that order comes from the
//! loaded feature-name list, never from this file.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE NAMES
// ============================================================================

pub const TV: &str = "TV";
pub const RADIO: &str = "Radio";
pub const TV_RADIO_INTERACTION: &str = "TV_Radio_Interaction";
pub const TV_SQ: &str = "TV_sq";
pub const RADIO_SQ: &str = "Radio_sq";
pub const TV_SHARE: &str = "TV_Share";
pub const RADIO_SHARE: &str = "Radio_Share";

/// Feature names in canonical order
pub const FEATURE_LAYOUT: &[&str] = &[
    TV,                   // 0: raw TV budget
    RADIO,                // 1: raw Radio budget
    TV_RADIO_INTERACTION, // 2: TV * Radio
    TV_SQ,                // 3: TV^2
    RADIO_SQ,             // 4: Radio^2
    TV_SHARE,             // 5: TV / total spend
    RADIO_SHARE,          // 6: Radio / total spend
];

/// Total number of engineered features
pub const FEATURE_COUNT: usize = 7;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over version + names, used to spot layout drift in logs
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Names from `expected` that the transformer does not produce
pub fn unknown_features<'a>(expected: &'a [String]) -> Vec<&'a str> {
    expected
        .iter()
        .map(String::as_str)
        .filter(|name| feature_index(name).is_none())
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
