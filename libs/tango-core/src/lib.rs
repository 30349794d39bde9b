//! Core library for tango, a command-driven vocabulary drill tool.
//!
//! Provides:
//! - Mode state machine dispatching one input line at a time
//! - Quiz session engine (range selection, shuffling, scoring)
//! - Answer matcher with synonym and particle flexibility
//! - Persistence capability trait with merge/replace reconciliation
//! - Vocabulary JSON import validation

pub mod dispatcher;
pub mod error;
pub mod matching;
pub mod parser;
pub mod session;
pub mod shuffle;
pub mod store;
pub mod types;

pub use dispatcher::{Dispatcher, Mode, ModeKind, Turn};
pub use error::{ImportError, StoreError};
pub use matching::check_answer;
pub use parser::parse_vocab_json;
pub use session::{parse_range, Graded, Reconciliation, ReviewSession, Session};
pub use store::{MemoryStore, WordStore};
pub use types::{word_key, Direction, LineKind, OutputLine, Word};
