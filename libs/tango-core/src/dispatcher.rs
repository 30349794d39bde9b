//! The mode state machine. Routes each input line to the handler for
//! the current mode, owns mode transitions, and orchestrates the
//! session engine and the store.
//!
//! Every `handle` call runs one line to full completion, including any
//! store operation, before the next line is accepted; there is no
//! overlap between commands and at most one outstanding store
//! operation.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::parser::parse_vocab_json;
use crate::session::{parse_range, Graded, Reconciliation, ReviewSession, Session};
use crate::store::WordStore;
use crate::types::{Direction, OutputLine, Word};

const CHOOSE_OPTION: &str = "Choose an option:";
const CHOOSE_DIRECTION: &str =
    "Choose learning direction (1: English -> Japanese, 2: Japanese -> English):";
const QUIZ_PROMPT: &str = "Your answer ('q' to quit):";
const ENTER_TEST_NAME: &str =
    "Enter a name for this missed words list (or press Enter to skip saving):";
const CHOOSE_REVIEW_TEST: &str =
    "Enter the name of the test to review (or 'ls' to list tests, 'menu' to return):";
const ENTER_SEARCH_TERM: &str = "Enter search term:";
const PRESS_ENTER_CONTINUE: &str = "Press Enter to continue...";
const NO_BACKEND: &str = "No storage backend available.";

/// Current state of the dispatcher. A closed union: mode-specific data
/// (the active session, the selected word subset, the pending missed
/// list) only exists as payload of the mode that uses it, so there is
/// no way to be in `Menu` with a leftover session.
#[derive(Debug)]
pub enum Mode {
    Loading,
    Menu,
    LearnRange,
    LearnDirection { words: Vec<Word> },
    Learning { session: Session },
    LearnSaveTestName { missed: Vec<Word> },
    ReviewChooseTest,
    Reviewing { session: ReviewSession },
    SearchTerm,
    SearchResults,
    LoadVocabFile,
    Exited,
    Error,
}

/// Payload-free view of [`Mode`], reported to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Loading,
    Menu,
    LearnRange,
    LearnDirection,
    Learning,
    LearnSaveTestName,
    ReviewChooseTest,
    Reviewing,
    SearchTerm,
    SearchResults,
    LoadVocabFile,
    Exited,
    Error,
}

impl Mode {
    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Loading => ModeKind::Loading,
            Mode::Menu => ModeKind::Menu,
            Mode::LearnRange => ModeKind::LearnRange,
            Mode::LearnDirection { .. } => ModeKind::LearnDirection,
            Mode::Learning { .. } => ModeKind::Learning,
            Mode::LearnSaveTestName { .. } => ModeKind::LearnSaveTestName,
            Mode::ReviewChooseTest => ModeKind::ReviewChooseTest,
            Mode::Reviewing { .. } => ModeKind::Reviewing,
            Mode::SearchTerm => ModeKind::SearchTerm,
            Mode::SearchResults => ModeKind::SearchResults,
            Mode::LoadVocabFile => ModeKind::LoadVocabFile,
            Mode::Exited => ModeKind::Exited,
            Mode::Error => ModeKind::Error,
        }
    }
}

/// Result of processing one input line: the lines to display and the
/// mode that is now current.
#[derive(Debug, Clone)]
pub struct Turn {
    pub lines: Vec<OutputLine>,
    pub mode: ModeKind,
}

/// The dispatcher. Owns the mode, the active vocabulary, the command
/// history, the optional store, and the session RNG.
pub struct Dispatcher<S: WordStore> {
    mode: Mode,
    vocab: Vec<Word>,
    history: Vec<String>,
    store: Option<S>,
    rng: StdRng,
}

impl<S: WordStore> Dispatcher<S> {
    /// Start in `Loading`; one of the bootstrap entry points moves the
    /// dispatcher to `Menu` (or `Error`).
    pub fn new(store: Option<S>) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    /// Like [`Dispatcher::new`] with a caller-supplied RNG, so tests
    /// can seed session shuffles.
    pub fn with_rng(store: Option<S>, rng: StdRng) -> Self {
        Self {
            mode: Mode::Loading,
            vocab: Vec::new(),
            history: Vec::new(),
            store,
            rng,
        }
    }

    pub fn mode_kind(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn vocab(&self) -> &[Word] {
        &self.vocab
    }

    pub fn store(&self) -> Option<&S> {
        self.store.as_ref()
    }

    /// Submitted commands, deduplicated only against the immediately
    /// preceding entry. Never persisted.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Process one input line to completion.
    pub fn handle(&mut self, line: &str) -> Turn {
        let mut out = vec![OutputLine::user(format!("> {line}"))];
        let trimmed = line.trim();
        if !trimmed.is_empty() && self.history.last().map(String::as_str) != Some(line) {
            self.history.push(line.to_string());
        }

        let mode = std::mem::replace(&mut self.mode, Mode::Loading);
        let came_from_menu = matches!(mode, Mode::Menu);

        let next = if matches!(mode, Mode::Learning { .. } | Mode::Reviewing { .. })
            && trimmed.eq_ignore_ascii_case("q")
        {
            // Abort: never reaches the mode handler. Runs the same
            // finalize path as natural completion, over the partial
            // score and missed set.
            self.abort_session(mode, &mut out)
        } else {
            self.dispatch(mode, line, trimmed, &mut out)
        };

        self.finish(out, next, came_from_menu)
    }

    fn dispatch(
        &mut self,
        mode: Mode,
        line: &str,
        trimmed: &str,
        out: &mut Vec<OutputLine>,
    ) -> Mode {
        match mode {
            Mode::Menu => self.handle_menu(trimmed, out),
            Mode::LearnRange => self.handle_learn_range(trimmed, out),
            Mode::LearnDirection { words } => self.handle_learn_direction(words, trimmed, out),
            Mode::Learning { session } => self.handle_learning_answer(session, line, out),
            Mode::LearnSaveTestName { missed } => self.handle_save_test_name(missed, trimmed, out),
            Mode::ReviewChooseTest => self.handle_review_choose(trimmed, out),
            Mode::Reviewing { session } => self.handle_review_answer(session, line, out),
            Mode::SearchTerm => self.handle_search_term(trimmed, out),
            // Any keypress returns to the menu.
            Mode::SearchResults => Mode::Menu,
            // File content arrives out-of-band; typed input just
            // cancels back to the menu.
            Mode::LoadVocabFile => Mode::Menu,
            Mode::Exited => Mode::Exited,
            Mode::Error => Mode::Error,
            // Safety net, not a designed transition.
            Mode::Loading => {
                out.push(OutputLine::error(format!(
                    "Unknown mode or command: {trimmed}"
                )));
                Mode::Menu
            }
        }
    }

    /// Install the next mode and append the menu block when entering
    /// `Menu` from somewhere else.
    fn finish(&mut self, mut out: Vec<OutputLine>, next: Mode, came_from_menu: bool) -> Turn {
        if matches!(next, Mode::Menu) && !came_from_menu {
            push_menu(&mut out);
        }
        self.mode = next;
        Turn {
            lines: out,
            mode: self.mode.kind(),
        }
    }

    // ---- bootstrap and import entry points (called by the shell) ----

    /// Hand over the bootstrap vocabulary.
    pub fn vocabulary_loaded(&mut self, words: Vec<Word>) -> Turn {
        let came_from_menu = matches!(self.mode, Mode::Menu);
        let mut out = Vec::new();
        out.push(OutputLine::success(format!(
            "{} words loaded successfully.",
            words.len()
        )));
        self.vocab = words;
        self.finish(out, Mode::Menu, came_from_menu)
    }

    /// Bootstrap found no vocabulary anywhere, but the file-import path
    /// can still supply one: wait in the menu rather than failing.
    pub fn vocabulary_unavailable(&mut self, detail: &str) -> Turn {
        let came_from_menu = matches!(self.mode, Mode::Menu);
        let mut out = Vec::new();
        out.push(OutputLine::error(format!(
            "Failed to load default vocabulary. ({detail})"
        )));
        out.push(OutputLine::info(
            "You can load a vocabulary file from the menu (option 4).",
        ));
        self.finish(out, Mode::Menu, came_from_menu)
    }

    /// Total bootstrap failure with no fallback path. Terminal.
    pub fn bootstrap_failed(&mut self, detail: &str) -> Turn {
        let came_from_menu = matches!(self.mode, Mode::Menu);
        let out = vec![OutputLine::error(format!(
            "Error loading vocabulary. The application cannot start. ({detail})"
        ))];
        self.finish(out, Mode::Error, came_from_menu)
    }

    /// Import a vocabulary file. On success the new list replaces the
    /// active vocabulary wholesale and is snapshotted to the store; on
    /// failure the previous vocabulary is retained unchanged.
    pub fn supply_vocab_file(&mut self, file_name: &str, content: &str) -> Turn {
        let came_from_menu = matches!(self.mode, Mode::Menu);
        let mut out = Vec::new();
        out.push(OutputLine::system(format!(
            "Selected file: {file_name}. Processing..."
        )));

        match parse_vocab_json(content) {
            Err(e) => {
                out.push(OutputLine::error(format!(
                    "Invalid file format. The file must be a JSON array of \
                     {{\"ja\": string, \"en\": string}} objects. ({e})"
                )));
            }
            Ok(words) => {
                self.vocab = words.clone();
                match &mut self.store {
                    Some(store) => {
                        // The import stands even if the snapshot write
                        // fails; only the save is abandoned.
                        if let Err(e) = store.save_vocabulary(&words) {
                            out.push(OutputLine::error(format!(
                                "Could not save vocabulary. ({e})"
                            )));
                        }
                    }
                    None => out.push(OutputLine::info(format!(
                        "{NO_BACKEND} Proceeding without saving."
                    ))),
                }
                out.push(OutputLine::success(format!(
                    "Successfully loaded {} words from file.",
                    words.len()
                )));
            }
        }
        self.finish(out, Mode::Menu, came_from_menu)
    }

    /// The user dismissed the file selection.
    pub fn cancel_vocab_load(&mut self) -> Turn {
        let came_from_menu = matches!(self.mode, Mode::Menu);
        let out = vec![OutputLine::info("No file selected. Returning to menu.")];
        self.finish(out, Mode::Menu, came_from_menu)
    }

    /// The selected file could not be read at all.
    pub fn vocab_file_unreadable(&mut self, detail: &str) -> Turn {
        let came_from_menu = matches!(self.mode, Mode::Menu);
        let out = vec![OutputLine::error(format!(
            "Error loading vocabulary file: {detail}"
        ))];
        self.finish(out, Mode::Menu, came_from_menu)
    }

    // ---- per-mode handlers ----

    fn handle_menu(&mut self, choice: &str, out: &mut Vec<OutputLine>) -> Mode {
        match choice {
            "1" => {
                out.push(OutputLine::prompt(self.range_prompt()));
                Mode::LearnRange
            }
            "2" => {
                out.push(OutputLine::prompt(CHOOSE_REVIEW_TEST));
                Mode::ReviewChooseTest
            }
            "3" => {
                out.push(OutputLine::prompt(ENTER_SEARCH_TERM));
                Mode::SearchTerm
            }
            "4" => {
                out.push(OutputLine::prompt("Please select a '.json' vocabulary file."));
                Mode::LoadVocabFile
            }
            "5" => {
                out.push(OutputLine::info("Thank you for using tango! Closing session."));
                Mode::Exited
            }
            _ => {
                out.push(OutputLine::error("Invalid option. Please try again."));
                out.push(OutputLine::prompt(CHOOSE_OPTION));
                Mode::Menu
            }
        }
    }

    fn range_prompt(&self) -> String {
        format!(
            "Enter index range (e.g., 1-100, or 'all') (1-{}):",
            self.vocab.len()
        )
    }

    fn handle_learn_range(&mut self, input: &str, out: &mut Vec<OutputLine>) -> Mode {
        if self.vocab.is_empty() {
            out.push(OutputLine::error(
                "Vocabulary is empty. Load a vocabulary file first (menu option 4).",
            ));
            return Mode::Menu;
        }
        match parse_range(input, self.vocab.len()) {
            None => {
                out.push(OutputLine::error(format!(
                    "Invalid range. Use 'start-end' (e.g. 1-50) or 'all'. Max range is {}.",
                    self.vocab.len()
                )));
                out.push(OutputLine::prompt(self.range_prompt()));
                Mode::LearnRange
            }
            Some((start, end)) => {
                let words = self.vocab[start..=end].to_vec();
                out.push(OutputLine::prompt(CHOOSE_DIRECTION));
                Mode::LearnDirection { words }
            }
        }
    }

    fn handle_learn_direction(
        &mut self,
        words: Vec<Word>,
        input: &str,
        out: &mut Vec<OutputLine>,
    ) -> Mode {
        let direction = match input {
            "1" => Direction::EnToJa,
            "2" => Direction::JaToEn,
            _ => {
                out.push(OutputLine::error("Invalid direction. Please enter 1 or 2."));
                out.push(OutputLine::prompt(CHOOSE_DIRECTION));
                return Mode::LearnDirection { words };
            }
        };
        let session = Session::new(words, direction, &mut self.rng);
        ask_question(&session, out);
        Mode::Learning { session }
    }

    fn handle_learning_answer(
        &mut self,
        mut session: Session,
        line: &str,
        out: &mut Vec<OutputLine>,
    ) -> Mode {
        let graded = session.answer(line);
        report_grading(&graded, session.direction(), out);

        if session.is_finished() {
            self.finalize_learning(session, out)
        } else {
            ask_question(&session, out);
            Mode::Learning { session }
        }
    }

    fn finalize_learning(&mut self, session: Session, out: &mut Vec<OutputLine>) -> Mode {
        out.push(OutputLine::info(session.summary()));
        if session.missed().is_empty() {
            out.push(OutputLine::success("No words missed in this session!"));
            Mode::Menu
        } else {
            out.push(OutputLine::prompt(ENTER_TEST_NAME));
            Mode::LearnSaveTestName {
                missed: session.into_missed(),
            }
        }
    }

    fn handle_save_test_name(
        &mut self,
        missed: Vec<Word>,
        name: &str,
        out: &mut Vec<OutputLine>,
    ) -> Mode {
        if name.is_empty() {
            out.push(OutputLine::info("Skipped saving missed words."));
            return Mode::Menu;
        }
        match &mut self.store {
            None => {
                out.push(OutputLine::info(format!(
                    "{NO_BACKEND} Skipped saving missed words."
                )));
            }
            Some(store) => {
                out.push(OutputLine::info("Saving missed words..."));
                match store.merge_test(name, &missed) {
                    Ok(()) => out.push(OutputLine::success(format!(
                        "Missed words saved as '{name}'."
                    ))),
                    Err(e) => out.push(OutputLine::error(format!(
                        "Error saving missed words. ({e})"
                    ))),
                }
            }
        }
        Mode::Menu
    }

    fn handle_review_choose(&mut self, input: &str, out: &mut Vec<OutputLine>) -> Mode {
        let lowered = input.to_lowercase();
        if lowered == "menu" {
            return Mode::Menu;
        }
        if lowered == "ls" {
            match &self.store {
                None => out.push(OutputLine::info(format!("{NO_BACKEND} No saved tests."))),
                Some(store) => match store.list_tests() {
                    Err(e) => out.push(OutputLine::error(format!(
                        "Could not retrieve test list. ({e})"
                    ))),
                    Ok(names) if names.is_empty() => {
                        out.push(OutputLine::info("No saved tests found."))
                    }
                    Ok(names) => {
                        out.push(OutputLine::header("Available tests:"));
                        for name in names {
                            out.push(OutputLine::system(format!("- {name}")));
                        }
                    }
                },
            }
            out.push(OutputLine::prompt(CHOOSE_REVIEW_TEST));
            return Mode::ReviewChooseTest;
        }
        if input.is_empty() {
            out.push(OutputLine::prompt(CHOOSE_REVIEW_TEST));
            return Mode::ReviewChooseTest;
        }

        let Some(store) = &self.store else {
            out.push(OutputLine::info(format!("{NO_BACKEND} Nothing to review.")));
            return Mode::Menu;
        };
        out.push(OutputLine::info(format!("Loading test '{input}'...")));
        match store.load_test(input) {
            Err(e) => {
                out.push(OutputLine::error(format!("Error loading test. ({e})")));
                out.push(OutputLine::prompt(CHOOSE_REVIEW_TEST));
                Mode::ReviewChooseTest
            }
            Ok(words) => match words.filter(|w| !w.is_empty()) {
                None => {
                    out.push(OutputLine::error(format!(
                        "Test '{input}' not found or is empty."
                    )));
                    out.push(OutputLine::prompt(CHOOSE_REVIEW_TEST));
                    Mode::ReviewChooseTest
                }
                Some(words) => {
                    let session = ReviewSession::new(input, words, &mut self.rng);
                    ask_question(session.session(), out);
                    Mode::Reviewing { session }
                }
            },
        }
    }

    fn handle_review_answer(
        &mut self,
        mut session: ReviewSession,
        line: &str,
        out: &mut Vec<OutputLine>,
    ) -> Mode {
        let graded = session.session_mut().answer(line);
        report_grading(&graded, session.session().direction(), out);

        if session.session().is_finished() {
            self.finalize_review(session, out)
        } else {
            ask_question(session.session(), out);
            Mode::Reviewing { session }
        }
    }

    fn finalize_review(&mut self, session: ReviewSession, out: &mut Vec<OutputLine>) -> Mode {
        out.push(OutputLine::info(session.session().summary()));
        let name = session.test_name().to_string();

        let outcome = session.reconcile();
        if matches!(outcome, Reconciliation::Untouched) {
            return Mode::Menu;
        }
        let Some(store) = &mut self.store else {
            out.push(OutputLine::info(format!(
                "{NO_BACKEND} Test '{name}' left unchanged."
            )));
            return Mode::Menu;
        };

        match outcome {
            Reconciliation::AllCorrect => match store.delete_test(&name) {
                Ok(()) => {
                    out.push(OutputLine::success(
                        "All words in this review test were answered correctly!",
                    ));
                    out.push(OutputLine::info(format!("Test '{name}' has been removed.")));
                }
                Err(e) => out.push(OutputLine::error(format!(
                    "Error updating review test. ({e})"
                ))),
            },
            Reconciliation::StillMissed(words_to_keep) => {
                match store.replace_test(&name, &words_to_keep) {
                    Ok(()) => out.push(OutputLine::success(format!(
                        "Test '{name}' updated. Correctly answered words removed."
                    ))),
                    Err(e) => out.push(OutputLine::error(format!(
                        "Error updating review test. ({e})"
                    ))),
                }
            }
            Reconciliation::Cleared => match store.delete_test(&name) {
                Ok(()) => out.push(OutputLine::success(format!(
                    "All words in '{name}' answered or removed. Test deleted."
                ))),
                Err(e) => out.push(OutputLine::error(format!(
                    "Error updating review test. ({e})"
                ))),
            },
            Reconciliation::Untouched => {}
        }
        Mode::Menu
    }

    fn handle_search_term(&mut self, input: &str, out: &mut Vec<OutputLine>) -> Mode {
        let term = input.to_lowercase();
        if term.is_empty() {
            out.push(OutputLine::prompt(ENTER_SEARCH_TERM));
            return Mode::SearchTerm;
        }
        out.push(OutputLine::info("Searching..."));
        if self.vocab.is_empty() {
            out.push(OutputLine::info("Vocabulary is empty. Cannot perform search."));
        } else {
            let results: Vec<&Word> = self
                .vocab
                .iter()
                .filter(|w| {
                    w.en.to_lowercase().contains(&term) || w.ja.to_lowercase().contains(&term)
                })
                .collect();
            if results.is_empty() {
                out.push(OutputLine::info("No words found matching your search."));
            } else {
                out.push(OutputLine::header("Search Results:"));
                for word in results {
                    out.push(OutputLine::system(word.display()));
                }
            }
        }
        out.push(OutputLine::prompt(PRESS_ENTER_CONTINUE));
        Mode::SearchResults
    }

    fn abort_session(&mut self, mode: Mode, out: &mut Vec<OutputLine>) -> Mode {
        out.push(OutputLine::info("Session interrupted."));
        match mode {
            Mode::Learning { mut session } => {
                session.abort();
                self.finalize_learning(session, out)
            }
            Mode::Reviewing { mut session } => {
                session.session_mut().abort();
                self.finalize_review(session, out)
            }
            other => other,
        }
    }
}

fn ask_question(session: &Session, out: &mut Vec<OutputLine>) {
    if let Some(word) = session.current_word() {
        let text = match session.direction() {
            Direction::EnToJa => &word.en,
            Direction::JaToEn => &word.ja,
        };
        out.push(OutputLine::question(format!("Q: {text}")));
        out.push(OutputLine::prompt(QUIZ_PROMPT));
    }
}

fn report_grading(graded: &Graded, direction: Direction, out: &mut Vec<OutputLine>) {
    if graded.correct {
        out.push(OutputLine::success("Correct!"));
    } else {
        let expected = match direction {
            Direction::EnToJa => &graded.word.ja,
            Direction::JaToEn => &graded.word.en,
        };
        out.push(OutputLine::error(format!(
            "Incorrect. Correct answer: {expected}"
        )));
    }
}

fn push_menu(out: &mut Vec<OutputLine>) {
    out.push(OutputLine::header("Main Menu:"));
    out.push(OutputLine::system("1. Learn new words"));
    out.push(OutputLine::system("2. Review missed words"));
    out.push(OutputLine::system("3. Search words"));
    out.push(OutputLine::system("4. Load vocabulary file"));
    out.push(OutputLine::system("5. Exit"));
    out.push(OutputLine::prompt(CHOOSE_OPTION));
}
