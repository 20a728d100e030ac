//! Deterministic speech capability: replays canned transcripts on a schedule.
//!
//! Each subscription consumes the next `Script` in order. A script is a list
//! of cumulative transcripts, each delivered a fixed delay after the previous
//! one, the way a recognizer streams interim results.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix::prelude::*;
use log::trace;

use super::{SpeechCapability, SpeechSubscription, TranscriptUpdate};
use crate::config::prompts::PromptDeck;
use crate::error::SpeechError;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScriptStep {
    delay: Duration,
    text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    steps: Vec<ScriptStep>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `text` `delay` after the previous step (or after subscribing).
    pub fn say_after(mut self, delay: Duration, text: impl Into<String>) -> Self {
        self.steps.push(ScriptStep {
            delay,
            text: text.into(),
        });
        self
    }

    /// Speak `sentence` word by word, one interim result per `pace`.
    pub fn utterance(pace: Duration, sentence: &str) -> Self {
        let mut script = Self::new();
        let mut heard = String::new();
        for word in sentence.split_whitespace() {
            if !heard.is_empty() {
                heard.push(' ');
            }
            heard.push_str(word);
            script = script.say_after(pace, heard.clone());
        }
        script
    }
}

/// Subscription lifecycle as seen by the scripted capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechLogEntry {
    Started(u64),
    Stopped(u64),
}

/// Shared record of every start and stop, for inspection.
#[derive(Debug, Clone, Default)]
pub struct SpeechLog(Arc<Mutex<Vec<SpeechLogEntry>>>);

impl SpeechLog {
    fn push(&self, entry: SpeechLogEntry) {
        if let Ok(mut entries) = self.0.lock() {
            entries.push(entry);
        }
    }

    pub fn entries(&self) -> Vec<SpeechLogEntry> {
        self.0.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

pub struct ScriptedSpeech {
    available: bool,
    scripts: VecDeque<Script>,
    log: SpeechLog,
}

impl ScriptedSpeech {
    pub fn new(scripts: impl IntoIterator<Item = Script>) -> Self {
        Self {
            available: true,
            scripts: scripts.into_iter().collect(),
            log: SpeechLog::default(),
        }
    }

    /// A host without speech recognition.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            scripts: VecDeque::new(),
            log: SpeechLog::default(),
        }
    }

    /// Answer every prompt of `deck` in order, one word per `pace`.
    pub fn autoplay(deck: &PromptDeck, pace: Duration) -> Self {
        Self::new(
            deck.prompts()
                .iter()
                .map(|p| Script::utterance(pace, &format!("i think that is {}", p.expected_answer))),
        )
    }

    pub fn log(&self) -> SpeechLog {
        self.log.clone()
    }
}

impl SpeechCapability for ScriptedSpeech {
    fn is_available(&self) -> bool {
        self.available
    }

    fn subscribe(
        &mut self,
        epoch: u64,
        sink: Recipient<TranscriptUpdate>,
    ) -> Result<SpeechSubscription, SpeechError> {
        if !self.available {
            return Err(SpeechError::CapabilityUnavailable);
        }
        // Out of scripts: the speaker stays silent.
        let script = self.scripts.pop_front().unwrap_or_default();
        self.log.push(SpeechLogEntry::Started(epoch));

        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        let handle = actix::spawn(async move {
            for step in script.steps {
                tokio::time::sleep(step.delay).await;
                if flag.load(Ordering::SeqCst) {
                    return;
                }
                trace!("[Speech] Scripted transcript (epoch {}): {}", epoch, step.text);
                sink.do_send(TranscriptUpdate {
                    epoch,
                    text: step.text,
                });
            }
        });

        let log = self.log.clone();
        Ok(SpeechSubscription::new(epoch, move || {
            cancelled.store(true, Ordering::SeqCst);
            handle.abort();
            log.push(SpeechLogEntry::Stopped(epoch));
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Collector(Arc<Mutex<Vec<TranscriptUpdate>>>);

    impl Actor for Collector {
        type Context = Context<Self>;
    }

    impl Handler<TranscriptUpdate> for Collector {
        type Result = ();
        fn handle(&mut self, msg: TranscriptUpdate, _: &mut Context<Self>) {
            self.0.lock().expect("lock").push(msg);
        }
    }

    #[test]
    fn utterance_builds_cumulative_interim_results() {
        let script = Script::utterance(Duration::from_millis(5), "that's a  benz");
        let texts: Vec<_> = script.steps.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["that's", "that's a", "that's a benz"]);
    }

    #[actix::test]
    async fn replays_script_then_stops_on_cancel() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Collector(received.clone()).start().recipient();
        let mut speech = ScriptedSpeech::new([Script::new()
            .say_after(Duration::from_millis(5), "hello")
            .say_after(Duration::from_millis(300), "hello there")]);
        let log = speech.log();

        let mut subscription = speech.subscribe(4, sink).expect("available");
        tokio::time::sleep(Duration::from_millis(80)).await;
        subscription.cancel();
        tokio::time::sleep(Duration::from_millis(400)).await;

        let received = received.lock().expect("lock").clone();
        assert_eq!(
            received,
            vec![TranscriptUpdate {
                epoch: 4,
                text: "hello".to_string()
            }]
        );
        assert_eq!(
            log.entries(),
            vec![SpeechLogEntry::Started(4), SpeechLogEntry::Stopped(4)]
        );
    }

    #[actix::test]
    async fn unavailable_host_reports_capability_error() {
        let sink = Collector::default().start().recipient();
        let mut speech = ScriptedSpeech::unavailable();
        assert!(speech.subscribe(1, sink).is_err());
    }
}
