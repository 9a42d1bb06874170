//! Score extraction from free-form review text.
//!
//! The review prompt asks for a closing score line, but models phrase it
//! in many ways. We apply an ordered list of patterns and take the first
//! match; the most specific notations win:
//!
//! 1. fraction notation, "7/10"
//! 2. labeled total score, "总分: 7" (synonym "总评分")
//! 3. generic "score: 7" label (case-insensitive)
//! 4. bare "7 分" suffix notation
//!
//! No match is a normal outcome, not an error. First-match precedence is
//! kept even when the match comes from quoted diff content inside the
//! review; that ambiguity is accepted.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SCORE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(\d+(?:\.\d+)?)\s*/\s*10").unwrap(),
        Regex::new(r"(?:总分|总评分)\s*[:：]\s*(\d+(?:\.\d+)?)").unwrap(),
        Regex::new(r"(?i)score\s*[:：]\s*(\d+(?:\.\d+)?)").unwrap(),
        Regex::new(r"(\d+(?:\.\d+)?)\s*分").unwrap(),
    ];
}

/// Extracts a numeric quality score from review text, or `None` when no
/// pattern matches. Integer and decimal values are accepted.
pub fn extract_score(report: &str) -> Option<f64> {
    for pattern in SCORE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(report) {
            if let Ok(value) = caps[1].parse::<f64>() {
                return Some(value);
            }
        }
    }
    None
}
