//! Free-text vote parsing.
//!
//! Viewers type whatever they like into the redemption box ("5", "#5",
//! "idea 5", or a full 13-digit id copied from the site). Only the first run
//! of digits counts, and only its last six characters.

use domains::ID_SUFFIX_LEN;
use once_cell::sync::Lazy;
use regex::Regex;

// ASCII only; `\d` would also accept other Unicode digit classes.
static DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("digit-run pattern is valid"));

/// Extracts a candidate idea id from redemption text.
///
/// Returns the leftmost run of digits, truncated to its trailing
/// [`ID_SUFFIX_LEN`] characters. The result stays a string so leading zeros
/// survive. `None` when there is no input or no digit in it.
pub fn parse_idea_id(input: Option<&str>) -> Option<String> {
    let normalized = input?.trim().to_lowercase();
    let digits = DIGIT_RUN.find(&normalized)?.as_str();

    let candidate = if digits.len() > ID_SUFFIX_LEN {
        &digits[digits.len() - ID_SUFFIX_LEN..]
    } else {
        digits
    };

    Some(candidate.to_string())
}
