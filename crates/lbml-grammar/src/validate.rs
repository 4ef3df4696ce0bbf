use crate::Result;
use regex::Regex;

/// Anchored whole-string pattern for a well-formed command. ASCII digits
/// only; letters are case-sensitive uppercase.
const LBML_PATTERN: &str = "^(?:D[0-9]+[FBLR];|R[0-9]+[LR];)+$";

/// Strip all whitespace from a candidate before matching.
pub fn clean(input: &str) -> String {
    input.split_whitespace().collect()
}

/// Whole-string LBML validator.
///
/// The downstream controller parser is strict, so anything that does not
/// match end-to-end is rejected before it can reach the wire.
pub struct LbmlValidator {
    pattern: Regex,
}

impl LbmlValidator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(LBML_PATTERN)?,
        })
    }

    /// Returns true iff the cleaned candidate fully matches the grammar.
    /// Empty or whitespace-only input is invalid. No case normalization is
    /// performed.
    pub fn validate(&self, candidate: &str) -> bool {
        let cleaned = clean(candidate);
        if cleaned.is_empty() {
            return false;
        }
        let valid = self.pattern.is_match(&cleaned);
        if !valid {
            tracing::debug!(candidate = %cleaned, "candidate rejected by LBML grammar");
        }
        valid
    }
}
