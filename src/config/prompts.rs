//! Prompt deck configuration.
//!
//! The deck is loaded once at startup, either from the JSON file named by
//! `SPEAK_DUEL_PROMPTS` or from the built-in car logo deck, and validated
//! before any game can use it.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::sync::Arc;

use log::info;
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::game::types::Prompt;

/// Environment variable naming an alternative prompt file.
pub const PROMPTS_ENV: &str = "SPEAK_DUEL_PROMPTS";

/// Built-in deck: (answer, image, label).
const DEFAULT_PROMPTS: [(&str, &str, &str); 10] = [
    ("benz", "/benz.jpg", "Benz Logo"),
    ("bentley", "/bentley.jpg", "Bentley Logo"),
    ("audi", "/audi.jpg", "Audi Logo"),
    ("toyota", "/toyota.jpg", "Toyota Logo"),
    ("honda", "/honda.jpg", "Honda Logo"),
    ("ford", "/ford.jpg", "Ford Logo"),
    ("chevrolet", "/chevrolet.jpg", "Chevrolet Logo"),
    ("nissan", "/nissan.jpg", "Nissan Logo"),
    ("volkswagen", "/volkswagen.jpg", "Volkswagen Logo"),
    ("hyundai", "/hyundai.jpg", "Hyundai Logo"),
];

/// One record of the prompt file.
#[derive(Debug, Deserialize)]
struct PromptRecord {
    #[serde(alias = "answer")]
    expected_answer: String,
    #[serde(alias = "src")]
    image_reference: String,
    #[serde(default, alias = "alt")]
    image_label: String,
}

/// A validated, immutable, non-empty list of prompts.
#[derive(Debug, Clone)]
pub struct PromptDeck {
    prompts: Arc<[Prompt]>,
}

impl PromptDeck {
    /// Validate and normalize a list of prompts.
    ///
    /// Answers are trimmed and lowercased. Fails on an empty list, an empty
    /// answer or the same answer appearing twice.
    pub fn new(prompts: Vec<Prompt>) -> Result<Self, ConfigError> {
        if prompts.is_empty() {
            return Err(ConfigError::EmptyDeck);
        }
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(prompts.len());
        for (index, mut prompt) in prompts.into_iter().enumerate() {
            prompt.expected_answer = prompt.expected_answer.trim().to_lowercase();
            if prompt.expected_answer.is_empty() {
                return Err(ConfigError::EmptyAnswer { index });
            }
            if !seen.insert(prompt.expected_answer.clone()) {
                return Err(ConfigError::DuplicateAnswer {
                    answer: prompt.expected_answer,
                });
            }
            normalized.push(prompt);
        }
        Ok(Self {
            prompts: normalized.into(),
        })
    }

    /// The built-in deck of car logos.
    pub fn builtin() -> Self {
        // Already lowercase and unique.
        let prompts: Vec<Prompt> = DEFAULT_PROMPTS
            .iter()
            .map(|(answer, image, label)| Prompt::new(*answer, *image, *label))
            .collect();
        Self {
            prompts: prompts.into(),
        }
    }

    /// Parse a deck from JSON text: an array of
    /// `{ "expected_answer", "image_reference", "image_label" }` records.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let records: Vec<PromptRecord> = serde_json::from_str(text)?;
        let prompts = records
            .into_iter()
            .map(|r| Prompt::new(r.expected_answer, r.image_reference, r.image_label))
            .collect();
        Self::new(prompts)
    }

    /// Load the deck named by `SPEAK_DUEL_PROMPTS`, or the built-in one when unset.
    pub fn load() -> Result<Self, ConfigError> {
        match env::var(PROMPTS_ENV) {
            Ok(path) => {
                let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                let deck = Self::from_json(&text)?;
                info!("[Config] Loaded {} prompts from {}", deck.len(), path);
                Ok(deck)
            }
            Err(_) => {
                let deck = Self::builtin();
                info!("[Config] Using built-in deck of {} prompts", deck.len());
                Ok(deck)
            }
        }
    }

    /// A copy of this deck in random order.
    pub fn shuffled(&self) -> Self {
        let mut prompts = self.prompts.to_vec();
        prompts.shuffle(&mut rand::rng());
        Self {
            prompts: prompts.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }
}
