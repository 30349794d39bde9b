//! Vocabulary import validation.
//!
//! # Format
//! ```json
//! [
//!   {"ja": "を食べる；たべる", "en": "eat"},
//!   {"ja": "走る", "en": "run"}
//! ]
//! ```

use crate::error::ImportError;
use crate::types::Word;

/// Parse a vocabulary file: a JSON array of objects each carrying
/// string `ja` and `en` fields. Unknown extra fields are ignored. Any
/// malformed element rejects the entire import; there is no partial
/// import. An empty array is a valid empty vocabulary.
pub fn parse_vocab_json(content: &str) -> Result<Vec<Word>, ImportError> {
    let words: Vec<Word> = serde_json::from_str(content)?;
    Ok(words)
}
