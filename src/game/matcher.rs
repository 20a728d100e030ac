//! Answer verification.
//!
//! Matching is a plain case-insensitive substring search: recognizers pad the
//! answer with filler ("i think that is a benz"), so anything containing the
//! answer counts.

use log::debug;

/// Fire-and-forget confirmation sound. Failures are the implementor's to swallow.
pub trait ConfirmationCue {
    fn play_confirmation(&self);
}

/// Cue that plays nothing.
pub struct SilentCue;

impl ConfirmationCue for SilentCue {
    fn play_confirmation(&self) {}
}

/// True when `expected` occurs anywhere in `transcript`, ignoring case.
pub fn matches(transcript: &str, expected: &str) -> bool {
    transcript.to_lowercase().contains(&expected.to_lowercase())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AnswerMatcher;

impl AnswerMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Check a transcript; on success play the cue and report the match.
    pub fn confirm(&self, transcript: &str, expected: &str, cue: &dyn ConfirmationCue) -> bool {
        if !matches(transcript, expected) {
            return false;
        }
        debug!("[AnswerMatcher] '{}' matched '{}'", transcript, expected);
        cue.play_confirmation();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingCue(Cell<u32>);

    impl ConfirmationCue for CountingCue {
        fn play_confirmation(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn matches_anywhere_ignoring_case() {
        assert!(matches("I think it's a Toyota", "toyota"));
        assert!(matches("i think that is a benz", "benz"));
        assert!(matches("BENZ", "benz"));
        assert!(matches("mercedes-benzzz", "benz"));
    }

    #[test]
    fn near_misses_do_not_match() {
        assert!(!matches("royota", "toyota"));
        assert!(!matches("ben z", "benz"));
        assert!(!matches("", "audi"));
    }

    #[test]
    fn expected_answer_case_is_folded_too() {
        assert!(matches("volkswagen golf", "VolksWagen"));
    }

    #[test]
    fn cue_plays_only_on_match() {
        let cue = CountingCue(Cell::new(0));
        let matcher = AnswerMatcher::new();
        assert!(!matcher.confirm("honda?", "ford", &cue));
        assert_eq!(cue.0.get(), 0);
        assert!(matcher.confirm("that's a ford", "ford", &cue));
        assert_eq!(cue.0.get(), 1);
    }
}
