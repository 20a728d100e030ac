//! Continuous speech input.
//!
//! A `SpeechCapability` opens recognition sessions; each one is a
//! `SpeechSubscription` tagged with the epoch of the prompt it listens for.
//! `SpeechInputStream` owns at most one subscription at a time and always
//! cancels the previous one before opening the next.

pub mod client;
pub mod scripted;

use actix::prelude::*;
use log::{debug, info};

use crate::error::SpeechError;

pub use client::{ClientSpeech, ListenCommand};
pub use scripted::{Script, ScriptedSpeech};

/// Cumulative transcript of the current utterance session, interim results included.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
#[rtype(result = "()")]
pub struct TranscriptUpdate {
    pub epoch: u64,
    pub text: String,
}

/// A host speech-recognition capability.
pub trait SpeechCapability {
    /// Whether recognition can be started right now.
    fn is_available(&self) -> bool;

    /// Begin capture for `epoch`; updates go to `sink` until the returned
    /// subscription is cancelled or dropped.
    fn subscribe(
        &mut self,
        epoch: u64,
        sink: Recipient<TranscriptUpdate>,
    ) -> Result<SpeechSubscription, SpeechError>;
}

/// Handle to one recognition session. Cancelling is idempotent and also
/// happens on drop.
pub struct SpeechSubscription {
    epoch: u64,
    cancel: Option<Box<dyn FnOnce()>>,
}

impl SpeechSubscription {
    pub fn new(epoch: u64, cancel: impl FnOnce() + 'static) -> Self {
        Self {
            epoch,
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for SpeechSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub struct SpeechInputStream {
    capability: Box<dyn SpeechCapability>,
    active: Option<SpeechSubscription>,
}

impl SpeechInputStream {
    pub fn new(capability: Box<dyn SpeechCapability>) -> Self {
        Self {
            capability,
            active: None,
        }
    }

    /// Swap the underlying capability; any open session is stopped first.
    pub fn replace_capability(&mut self, capability: Box<dyn SpeechCapability>) {
        self.stop();
        self.capability = capability;
    }

    pub fn is_available(&self) -> bool {
        self.capability.is_available()
    }

    /// Epoch of the open session, if any.
    pub fn listening_epoch(&self) -> Option<u64> {
        self.active.as_ref().map(SpeechSubscription::epoch)
    }

    /// Restart capture for `epoch`, discarding the previous session.
    pub fn start(
        &mut self,
        epoch: u64,
        sink: Recipient<TranscriptUpdate>,
    ) -> Result<(), SpeechError> {
        self.stop();
        let subscription = self.capability.subscribe(epoch, sink)?;
        info!("[Speech] Listening (epoch {})", epoch);
        self.active = Some(subscription);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(mut subscription) = self.active.take() {
            debug!("[Speech] Stopped (epoch {})", subscription.epoch());
            subscription.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Sink;

    impl Actor for Sink {
        type Context = Context<Self>;
    }

    impl Handler<TranscriptUpdate> for Sink {
        type Result = ();
        fn handle(&mut self, _: TranscriptUpdate, _: &mut Context<Self>) {}
    }

    /// Counts open sessions; fails when more than one is open.
    struct Exclusive {
        open: Rc<Cell<u32>>,
    }

    impl SpeechCapability for Exclusive {
        fn is_available(&self) -> bool {
            true
        }

        fn subscribe(
            &mut self,
            epoch: u64,
            _sink: Recipient<TranscriptUpdate>,
        ) -> Result<SpeechSubscription, SpeechError> {
            assert_eq!(self.open.get(), 0, "previous session still open");
            self.open.set(1);
            let open = self.open.clone();
            Ok(SpeechSubscription::new(epoch, move || open.set(open.get() - 1)))
        }
    }

    #[actix::test]
    async fn restart_cancels_previous_session_first() {
        let open = Rc::new(Cell::new(0));
        let sink = Sink.start().recipient();
        let mut stream = SpeechInputStream::new(Box::new(Exclusive { open: open.clone() }));
        stream.start(1, sink.clone()).expect("start");
        stream.start(2, sink).expect("restart");
        assert_eq!(open.get(), 1);
        assert_eq!(stream.listening_epoch(), Some(2));
        stream.stop();
        stream.stop();
        assert_eq!(open.get(), 0);
        assert_eq!(stream.listening_epoch(), None);
    }

    #[actix::test]
    async fn unavailable_capability_refuses_to_start() {
        let sink = Sink.start().recipient();
        let mut stream = SpeechInputStream::new(Box::new(ScriptedSpeech::unavailable()));
        assert!(!stream.is_available());
        assert_eq!(stream.start(1, sink), Err(SpeechError::CapabilityUnavailable));
        assert_eq!(stream.listening_epoch(), None);
    }

    #[test]
    fn dropping_a_subscription_cancels_it_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut subscription = SpeechSubscription::new(3, move || counter.set(counter.get() + 1));
        subscription.cancel();
        drop(subscription);
        assert_eq!(calls.get(), 1);
    }
}
