//! Ordered walk over the prompt deck.

use crate::config::prompts::PromptDeck;
use crate::game::types::Prompt;

/// Result of moving to the next round.
#[derive(Debug, PartialEq, Eq)]
pub enum Advance<'a> {
    Next(&'a Prompt),
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct RoundSequencer {
    deck: PromptDeck,
    index: usize,
}

impl RoundSequencer {
    pub fn new(deck: PromptDeck) -> Self {
        Self { deck, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.deck.len()
    }

    /// The prompt for the current round. The deck is never empty.
    pub fn current(&self) -> &Prompt {
        &self.deck.prompts()[self.index]
    }

    /// Move to the next prompt. Past the last one the index stays put and
    /// `Exhausted` is returned.
    pub fn advance(&mut self) -> Advance<'_> {
        if self.index + 1 >= self.deck.len() {
            return Advance::Exhausted;
        }
        self.index += 1;
        Advance::Next(&self.deck.prompts()[self.index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(answers: &[&str]) -> PromptDeck {
        PromptDeck::new(
            answers
                .iter()
                .map(|a| Prompt::new(*a, format!("/{a}.jpg"), ""))
                .collect(),
        )
        .expect("valid deck")
    }

    #[test]
    fn walks_prompts_in_order() {
        let mut seq = RoundSequencer::new(deck(&["benz", "toyota", "audi"]));
        assert_eq!(seq.current().expected_answer, "benz");
        match seq.advance() {
            Advance::Next(p) => assert_eq!(p.expected_answer, "toyota"),
            Advance::Exhausted => panic!("deck ended early"),
        }
        assert_eq!(seq.index(), 1);
        assert!(matches!(seq.advance(), Advance::Next(_)));
        assert_eq!(seq.current().expected_answer, "audi");
    }

    #[test]
    fn advancing_past_the_end_is_exhausted_and_keeps_a_valid_index() {
        let mut seq = RoundSequencer::new(deck(&["benz", "toyota"]));
        assert!(matches!(seq.advance(), Advance::Next(_)));
        assert_eq!(seq.advance(), Advance::Exhausted);
        assert_eq!(seq.advance(), Advance::Exhausted);
        assert_eq!(seq.index(), 1);
        assert_eq!(seq.current().expected_answer, "toyota");
    }

    #[test]
    fn single_prompt_deck_is_exhausted_immediately() {
        let mut seq = RoundSequencer::new(deck(&["ford"]));
        assert_eq!(seq.advance(), Advance::Exhausted);
        assert_eq!(seq.index(), 0);
    }
}
