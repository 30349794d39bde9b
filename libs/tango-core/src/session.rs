//! Quiz session engine: range selection, scoring, and finalize-time
//! reconciliation of review tests.

use rand::Rng;

use crate::matching::check_answer;
use crate::shuffle::shuffle;
use crate::types::{word_key, Direction, Word};

/// Parse a user-supplied index range against a vocabulary of `max`
/// words. `"all"` (case-insensitive) selects everything; `"start-end"`
/// uses 1-indexed inclusive bounds. Returns the 0-indexed inclusive
/// pair, or `None` for anything invalid.
pub fn parse_range(input: &str, max: usize) -> Option<(usize, usize)> {
    if max == 0 {
        return None;
    }
    if input.eq_ignore_ascii_case("all") {
        return Some((0, max - 1));
    }

    let parts: Vec<&str> = input.split('-').collect();
    if parts.len() != 2 {
        return None;
    }
    let start: usize = parts[0].trim().parse().ok()?;
    let end: usize = parts[1].trim().parse().ok()?;

    if start < 1 || end > max || start > end {
        return None;
    }
    Some((start - 1, end - 1))
}

/// Result of grading one answer.
#[derive(Debug, Clone)]
pub struct Graded {
    pub word: Word,
    pub correct: bool,
}

/// State for one quiz run over a shuffled word subset. Lives exactly
/// one question loop and is discarded after finalize, never resumed.
#[derive(Debug, Clone)]
pub struct Session {
    words: Vec<Word>,
    current_index: usize,
    correct_answers: usize,
    total_questions: usize,
    questions_asked: usize,
    missed: Vec<Word>,
    direction: Direction,
}

impl Session {
    /// Create a session over `words`, shuffled once at creation.
    pub fn new<R: Rng>(mut words: Vec<Word>, direction: Direction, rng: &mut R) -> Self {
        shuffle(&mut words, rng);
        let total_questions = words.len();
        Self {
            words,
            current_index: 0,
            correct_answers: 0,
            total_questions,
            questions_asked: 0,
            missed: Vec::new(),
            direction,
        }
    }

    /// The word currently being asked, if the session is not finished.
    pub fn current_word(&self) -> Option<&Word> {
        self.words.get(self.current_index)
    }

    pub fn is_finished(&self) -> bool {
        self.current_index >= self.words.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn correct_answers(&self) -> usize {
        self.correct_answers
    }

    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    /// Questions actually answered; equals `total_questions` on
    /// natural completion, less after an abort.
    pub fn questions_asked(&self) -> usize {
        self.questions_asked
    }

    pub fn missed(&self) -> &[Word] {
        &self.missed
    }

    pub fn into_missed(self) -> Vec<Word> {
        self.missed
    }

    /// Grade one answer against the current word: on success increment
    /// the correct count, on failure record the word as missed (at most
    /// once per distinct `en`), then advance.
    ///
    /// # Panics
    /// Panics if the session is already finished; the dispatcher only
    /// routes answers to unfinished sessions.
    pub fn answer(&mut self, input: &str) -> Graded {
        let word = self.words[self.current_index].clone();
        let correct = check_answer(input, &word, self.direction);

        if correct {
            self.correct_answers += 1;
        } else {
            let key = word_key(&word.en);
            if !self.missed.iter().any(|w| word_key(&w.en) == key) {
                self.missed.push(word.clone());
            }
        }
        self.current_index += 1;
        self.questions_asked += 1;

        Graded { word, correct }
    }

    /// Jump past the remaining questions. Finalize afterwards runs the
    /// same path as natural completion, over the partial score.
    pub fn abort(&mut self) {
        self.current_index = self.words.len();
    }

    /// "Session finished" summary over the questions actually asked.
    pub fn summary(&self) -> String {
        let asked = self.questions_asked;
        let percent = if asked == 0 {
            0.0
        } else {
            self.correct_answers as f64 / asked as f64 * 100.0
        };
        format!(
            "Session finished. Correct: {}/{} ({:.1}%).",
            self.correct_answers, asked, percent
        )
    }
}

/// Finalize-time decision for a review test record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// Every question answered correctly: delete the record.
    AllCorrect,
    /// Some words still missed: replace the record with exactly these.
    StillMissed(Vec<Word>),
    /// Nothing left to keep from a non-empty test: delete the record.
    Cleared,
    /// The test was empty to begin with; leave the store alone.
    Untouched,
}

/// A session replaying a saved test, plus the snapshot needed to
/// reconcile the record when the session ends.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    session: Session,
    test_name: String,
    initial_words: Vec<Word>,
}

impl ReviewSession {
    /// Reviews always quiz en -> ja.
    pub fn new<R: Rng>(test_name: impl Into<String>, words: Vec<Word>, rng: &mut R) -> Self {
        let initial_words = words.clone();
        Self {
            session: Session::new(words, Direction::EnToJa, rng),
            test_name: test_name.into(),
            initial_words,
        }
    }

    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Decide what happens to the test record. Words kept are the
    /// subset of the initial snapshot still present in the missed set;
    /// this is a full replace, not a merge, so initial words answered
    /// correctly are dropped from the record.
    pub fn reconcile(&self) -> Reconciliation {
        let s = &self.session;
        let words_to_keep: Vec<Word> = self
            .initial_words
            .iter()
            .filter(|initial| {
                s.missed()
                    .iter()
                    .any(|m| word_key(&m.en) == word_key(&initial.en))
            })
            .cloned()
            .collect();

        if s.correct_answers() == s.total_questions() && s.total_questions() > 0 {
            Reconciliation::AllCorrect
        } else if !words_to_keep.is_empty() {
            Reconciliation::StillMissed(words_to_keep)
        } else if !self.initial_words.is_empty() {
            Reconciliation::Cleared
        } else {
            Reconciliation::Untouched
        }
    }
}
