//! Shared fixtures for dispatcher integration tests.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;

use tango_core::{
    Dispatcher, LineKind, MemoryStore, StoreError, Turn, Word, WordStore,
};

/// Fixture vocabulary. The first entry exercises particle flexibility
/// and synonym splitting; the rest are single-token pairs.
pub const VOCAB: &[(&str, &str)] = &[
    ("を食べる；たべる", "eat"),
    ("走る", "run"),
    ("飲む", "drink"),
    ("読む", "read"),
    ("書く", "write"),
];

pub fn sample_vocab() -> Vec<Word> {
    VOCAB.iter().map(|(ja, en)| Word::new(*ja, *en)).collect()
}

pub fn word(ja: &str, en: &str) -> Word {
    Word::new(ja, en)
}

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

/// A dispatcher still in `Loading`, with a seeded RNG so session
/// shuffles are reproducible.
pub fn dispatcher<S: WordStore>(store: Option<S>) -> Dispatcher<S> {
    Dispatcher::with_rng(store, seeded_rng())
}

/// A dispatcher sitting at the menu with the fixture vocabulary.
pub fn booted(store: Option<MemoryStore>) -> Dispatcher<MemoryStore> {
    let mut d = dispatcher(store);
    d.vocabulary_loaded(sample_vocab());
    d
}

/// The text of the question asked in this turn, without the "Q: "
/// prefix. Panics if the turn asked no question.
pub fn question(turn: &Turn) -> String {
    turn.lines
        .iter()
        .rev()
        .find(|l| l.kind == LineKind::Question)
        .and_then(|l| l.text.strip_prefix("Q: "))
        .expect("turn asked no question")
        .to_string()
}

/// The correct answer for a fixture question, whichever direction it
/// was asked in.
pub fn correct_answer(question: &str) -> String {
    match question {
        "eat" => "たべる".to_string(),
        "を食べる；たべる" => "eat".to_string(),
        q => VOCAB
            .iter()
            .find_map(|(ja, en)| {
                if *en == q {
                    Some((*ja).to_string())
                } else if *ja == q {
                    Some((*en).to_string())
                } else {
                    None
                }
            })
            .expect("question not in fixture vocabulary"),
    }
}

pub fn has_line(turn: &Turn, needle: &str) -> bool {
    turn.lines.iter().any(|l| l.text.contains(needle))
}

pub fn has_line_of_kind(turn: &Turn, kind: LineKind, needle: &str) -> bool {
    turn.lines
        .iter()
        .any(|l| l.kind == kind && l.text.contains(needle))
}

/// Drive the menu through range and direction selection; returns the
/// turn that asked the first question.
pub fn start_learning(
    d: &mut Dispatcher<MemoryStore>,
    range: &str,
    direction: &str,
) -> Turn {
    d.handle("1");
    d.handle(range);
    d.handle(direction)
}

/// A store whose reads and/or writes fail with a fixed backend
/// message, wrapping a working in-memory store.
pub struct FailingStore {
    pub inner: MemoryStore,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl FailingStore {
    pub fn writes(inner: MemoryStore) -> Self {
        Self {
            inner,
            fail_reads: false,
            fail_writes: true,
        }
    }

    pub fn reads(inner: MemoryStore) -> Self {
        Self {
            inner,
            fail_reads: true,
            fail_writes: false,
        }
    }

    fn read_guard(&self) -> Result<(), StoreError> {
        if self.fail_reads {
            Err(StoreError::backend("simulated backend failure"))
        } else {
            Ok(())
        }
    }

    fn write_guard(&self) -> Result<(), StoreError> {
        if self.fail_writes {
            Err(StoreError::backend("simulated backend failure"))
        } else {
            Ok(())
        }
    }
}

impl WordStore for FailingStore {
    fn load_test(&self, name: &str) -> Result<Option<Vec<Word>>, StoreError> {
        self.read_guard()?;
        self.inner.load_test(name)
    }

    fn replace_test(&mut self, name: &str, words: &[Word]) -> Result<(), StoreError> {
        self.write_guard()?;
        self.inner.replace_test(name, words)
    }

    fn delete_test(&mut self, name: &str) -> Result<(), StoreError> {
        self.write_guard()?;
        self.inner.delete_test(name)
    }

    fn list_tests(&self) -> Result<Vec<String>, StoreError> {
        self.read_guard()?;
        self.inner.list_tests()
    }

    fn load_vocabulary(&self) -> Result<Option<Vec<Word>>, StoreError> {
        self.read_guard()?;
        self.inner.load_vocabulary()
    }

    fn save_vocabulary(&mut self, words: &[Word]) -> Result<(), StoreError> {
        self.write_guard()?;
        self.inner.save_vocabulary(words)
    }
}
