//! Persistence capability for the drill tool.
//!
//! Two logical collections: named test records (lists of previously
//! missed words) and a singleton vocabulary snapshot. The session
//! engine and dispatcher are storage-agnostic; anything implementing
//! [`WordStore`] works, including the in-memory store used by tests.

use std::collections::BTreeMap;

use crate::error::StoreError;
use crate::types::{word_key, Word};

/// Storage capability. An absent record is `None`, never an error;
/// deleting an absent key succeeds. Each operation is atomic with
/// respect to other callers of this core.
pub trait WordStore {
    fn load_test(&self, name: &str) -> Result<Option<Vec<Word>>, StoreError>;

    /// Unconditional overwrite of a test record.
    fn replace_test(&mut self, name: &str, words: &[Word]) -> Result<(), StoreError>;

    fn delete_test(&mut self, name: &str) -> Result<(), StoreError>;

    /// All test names, sorted, empty if none.
    fn list_tests(&self) -> Result<Vec<String>, StoreError>;

    fn load_vocabulary(&self) -> Result<Option<Vec<Word>>, StoreError>;

    /// Wholesale replace of the vocabulary snapshot.
    fn save_vocabulary(&mut self, words: &[Word]) -> Result<(), StoreError>;

    /// Union the incoming words into an existing record (empty if
    /// absent), keyed case-insensitively by `en`. An incoming entry
    /// wins a conflict but keeps the existing entry's slot; genuinely
    /// new entries append in incoming order.
    fn merge_test(&mut self, name: &str, incoming: &[Word]) -> Result<(), StoreError> {
        let mut merged = self.load_test(name)?.unwrap_or_default();
        for word in incoming {
            let key = word_key(&word.en);
            match merged.iter_mut().find(|w| word_key(&w.en) == key) {
                Some(slot) => *slot = word.clone(),
                None => merged.push(word.clone()),
            }
        }
        self.replace_test(name, &merged)
    }
}

/// In-memory store: the reference implementation, also used by tests
/// and storeless operation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tests: BTreeMap<String, Vec<Word>>,
    vocabulary: Option<Vec<Word>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WordStore for MemoryStore {
    fn load_test(&self, name: &str) -> Result<Option<Vec<Word>>, StoreError> {
        Ok(self.tests.get(name).cloned())
    }

    fn replace_test(&mut self, name: &str, words: &[Word]) -> Result<(), StoreError> {
        self.tests.insert(name.to_string(), words.to_vec());
        Ok(())
    }

    fn delete_test(&mut self, name: &str) -> Result<(), StoreError> {
        self.tests.remove(name);
        Ok(())
    }

    fn list_tests(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.tests.keys().cloned().collect())
    }

    fn load_vocabulary(&self) -> Result<Option<Vec<Word>>, StoreError> {
        Ok(self.vocabulary.clone())
    }

    fn save_vocabulary(&mut self, words: &[Word]) -> Result<(), StoreError> {
        self.vocabulary = Some(words.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn word(ja: &str, en: &str) -> Word {
        Word::new(ja, en)
    }

    #[test]
    fn load_absent_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.load_test("nope").unwrap(), None);
        assert_eq!(store.load_vocabulary().unwrap(), None);
    }

    #[test]
    fn replace_then_load_preserves_order() {
        let mut store = MemoryStore::new();
        let words = vec![word("う", "c"), word("あ", "a"), word("い", "b")];
        store.replace_test("t", &words).unwrap();
        assert_eq!(store.load_test("t").unwrap(), Some(words));
    }

    #[test]
    fn vocabulary_round_trip_preserves_order() {
        let mut store = MemoryStore::new();
        let words = vec![word("い", "b"), word("あ", "a")];
        store.save_vocabulary(&words).unwrap();
        assert_eq!(store.load_vocabulary().unwrap(), Some(words));
    }

    #[test]
    fn delete_absent_is_ok() {
        let mut store = MemoryStore::new();
        assert!(store.delete_test("missing").is_ok());
    }

    #[test]
    fn list_tests_is_sorted() {
        let mut store = MemoryStore::new();
        store.replace_test("zeta", &[]).unwrap();
        store.replace_test("alpha", &[]).unwrap();
        assert_eq!(store.list_tests().unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn merge_into_absent_creates_record() {
        let mut store = MemoryStore::new();
        let incoming = vec![word("あ", "a"), word("い", "b")];
        store.merge_test("t", &incoming).unwrap();
        assert_eq!(store.load_test("t").unwrap(), Some(incoming));
    }

    #[test]
    fn merge_incoming_wins_and_keeps_slot() {
        let mut store = MemoryStore::new();
        store
            .replace_test("t", &[word("古い", "a"), word("い", "b")])
            .unwrap();
        store
            .merge_test("t", &[word("う", "c"), word("新しい", "A")])
            .unwrap();
        assert_eq!(
            store.load_test("t").unwrap(),
            // "A" overwrote "a" in place; "c" appended.
            Some(vec![word("新しい", "A"), word("い", "b"), word("う", "c")])
        );
    }
}
