//! Answer matching for quiz sessions.
//!
//! `ja -> en` is a plain case-insensitive comparison. `en -> ja` is more
//! forgiving: the stored `ja` field may list several accepted answers
//! separated by commas or semicolons (either width), with parenthetical
//! annotations that are never part of an answer, and the first listed
//! answer tolerates an optional leading object/target particle.

use crate::types::{Direction, Word};

/// Particles that may optionally prefix the first accepted answer.
const FLEXIBLE_PARTICLES: [char; 2] = ['を', 'に'];

/// Separators between accepted answers, full-width and standard.
const ANSWER_SEPARATORS: [char; 4] = ['；', '，', ';', ','];

/// Check a typed answer against the expected word for the given
/// direction. Empty input never matches.
pub fn check_answer(input: &str, word: &Word, direction: Direction) -> bool {
    let normalized = input.trim().to_lowercase();

    match direction {
        Direction::JaToEn => {
            !normalized.is_empty() && normalized == word.en.trim().to_lowercase()
        }
        Direction::EnToJa => {
            let candidates = split_answers(&word.ja);
            let Some(first) = candidates.first() else {
                return false;
            };

            if matches_first_candidate(&normalized, first) {
                return true;
            }
            candidates[1..].iter().any(|c| normalized == *c)
        }
    }
}

/// The first candidate tolerates one leading particle: input may equal
/// the full candidate or the candidate minus that particle. Later
/// candidates get no such flexibility.
fn matches_first_candidate(input: &str, first: &str) -> bool {
    if input.is_empty() {
        return false;
    }
    if input == first {
        return true;
    }
    match first.chars().next() {
        Some(p) if FLEXIBLE_PARTICLES.contains(&p) => input == &first[p.len_utf8()..],
        _ => false,
    }
}

/// Split a `ja` field into its accepted answers: strip parenthetical
/// annotations, split on the separator set, trim and lowercase, drop
/// empties.
fn split_answers(ja: &str) -> Vec<String> {
    strip_parentheticals(ja)
        .split(ANSWER_SEPARATORS)
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Remove `（...）` and `(...)` spans. Each opener pairs only with the
/// closer of the same width; an opener with no matching closer is kept
/// literally.
fn strip_parentheticals(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(open) = rest.find(['（', '(']) {
        let open_ch = rest[open..].chars().next().unwrap();
        let close_ch = if open_ch == '（' { '）' } else { ')' };
        out.push_str(&rest[..open]);
        let after_open = open + open_ch.len_utf8();
        match rest[after_open..].find(close_ch) {
            Some(close) => rest = &rest[after_open + close + close_ch.len_utf8()..],
            None => {
                out.push(open_ch);
                rest = &rest[after_open..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(ja: &str, en: &str) -> Word {
        Word::new(ja, en)
    }

    #[test]
    fn ja_to_en_exact_case_insensitive() {
        let w = word("食べる", "Eat");
        assert!(check_answer("eat", &w, Direction::JaToEn));
        assert!(check_answer("  EAT  ", &w, Direction::JaToEn));
        assert!(!check_answer("eats", &w, Direction::JaToEn));
    }

    #[test]
    fn ja_to_en_no_synonyms() {
        let w = word("食べる；たべる", "eat");
        assert!(!check_answer("食べる", &w, Direction::JaToEn));
    }

    #[test]
    fn en_to_ja_particle_flexibility_on_first_candidate() {
        let w = word("を食べる；たべる", "eat");
        assert!(check_answer("食べる", &w, Direction::EnToJa));
        assert!(check_answer("を食べる", &w, Direction::EnToJa));
        assert!(check_answer("たべる", &w, Direction::EnToJa));
        assert!(!check_answer("食べ", &w, Direction::EnToJa));
    }

    #[test]
    fn en_to_ja_ni_particle() {
        let w = word("に乗る", "ride");
        assert!(check_answer("乗る", &w, Direction::EnToJa));
        assert!(check_answer("に乗る", &w, Direction::EnToJa));
    }

    #[test]
    fn no_particle_flexibility_on_later_candidates() {
        let w = word("乗る；を使う", "ride");
        assert!(check_answer("を使う", &w, Direction::EnToJa));
        assert!(!check_answer("使う", &w, Direction::EnToJa));
    }

    #[test]
    fn parentheticals_are_stripped_both_widths() {
        let w = word("食べる（他動詞）", "eat");
        assert!(check_answer("食べる", &w, Direction::EnToJa));
        let w = word("食べる(transitive)", "eat");
        assert!(check_answer("食べる", &w, Direction::EnToJa));
        assert!(!check_answer("食べる（他動詞）", &w, Direction::EnToJa));
    }

    #[test]
    fn full_width_separators() {
        let w = word("走る，駆ける", "run");
        assert!(check_answer("駆ける", &w, Direction::EnToJa));
        let w = word("走る；駆ける", "run");
        assert!(check_answer("駆ける", &w, Direction::EnToJa));
    }

    #[test]
    fn ideographic_comma_is_not_a_separator() {
        let w = word("走る、駆ける", "run");
        assert!(!check_answer("駆ける", &w, Direction::EnToJa));
        assert!(check_answer("走る、駆ける", &w, Direction::EnToJa));
    }

    #[test]
    fn all_parenthetical_means_no_candidates() {
        let w = word("（注）", "note");
        assert!(!check_answer("注", &w, Direction::EnToJa));
        assert!(!check_answer("", &w, Direction::EnToJa));
    }

    #[test]
    fn empty_input_never_matches() {
        let w = word("を食べる", "eat");
        assert!(!check_answer("", &w, Direction::EnToJa));
        assert!(!check_answer("   ", &w, Direction::EnToJa));
        assert!(!check_answer("", &w, Direction::JaToEn));
    }

    #[test]
    fn unclosed_opener_kept_literally() {
        let w = word("食べる（他動詞", "eat");
        assert!(check_answer("食べる（他動詞", &w, Direction::EnToJa));
        assert!(!check_answer("食べる", &w, Direction::EnToJa));
    }

    #[test]
    fn empty_candidates_are_dropped() {
        let w = word("；；食べる", "eat");
        assert!(check_answer("食べる", &w, Direction::EnToJa));
    }
}
