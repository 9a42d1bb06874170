//! Token-budgeted truncation of diff text.
//!
//! The budget is enforced with the same tokenizer family the chat
//! backends use (cl100k). Oversized input keeps its first `budget`
//! tokens; cutting mid-construct is accepted. When the tokenizer cannot
//! be built, or the token prefix does not decode back to valid text, we
//! degrade to a fixed 4-characters-per-token bound on the character
//! length. This function never fails.

use std::borrow::Cow;

use lazy_static::lazy_static;
use tiktoken_rs::CoreBPE;
use tracing::warn;

/// Fallback ratio applied to the character length when tokenization is
/// unavailable.
const CHARS_PER_TOKEN: usize = 4;

lazy_static! {
    static ref CL100K: Option<CoreBPE> = tiktoken_rs::cl100k_base().ok();
}

/// Bounds `text` to at most `max_tokens` tokens (or `4 * max_tokens`
/// characters on the degraded path). Returns the input unchanged when it
/// already fits.
pub fn truncate_to_budget(text: &str, max_tokens: usize) -> Cow<'_, str> {
    let Some(bpe) = CL100K.as_ref() else {
        warn!("tokenizer unavailable, using character-based truncation");
        return truncate_by_chars(text, max_tokens);
    };

    let tokens = bpe.encode_ordinary(text);
    if tokens.len() <= max_tokens {
        return Cow::Borrowed(text);
    }

    match bpe.decode(tokens[..max_tokens].to_vec()) {
        Ok(decoded) => {
            warn!(
                from_tokens = tokens.len(),
                to_tokens = max_tokens,
                "content exceeded token budget, truncated"
            );
            Cow::Owned(decoded)
        }
        Err(_) => {
            warn!("token prefix did not decode cleanly, using character-based truncation");
            truncate_by_chars(text, max_tokens)
        }
    }
}

fn truncate_by_chars(text: &str, max_tokens: usize) -> Cow<'_, str> {
    let max_chars = max_tokens.saturating_mul(CHARS_PER_TOKEN);
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => Cow::Borrowed(&text[..idx]),
        None => Cow::Borrowed(text),
    }
}
