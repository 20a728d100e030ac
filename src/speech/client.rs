//! Speech capability backed by a connected browser.
//!
//! Recognition runs in the client. The session asks it to start or stop
//! listening for an epoch, and the client streams transcripts back to the
//! sink it was given.

use actix::prelude::*;
use log::warn;

use super::{SpeechCapability, SpeechSubscription, TranscriptUpdate};
use crate::error::SpeechError;

/// Sent to the client connection that performs recognition.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub enum ListenCommand {
    Start {
        epoch: u64,
        sink: Recipient<TranscriptUpdate>,
    },
    Stop {
        epoch: u64,
    },
}

#[derive(Default)]
pub struct ClientSpeech {
    client: Option<Recipient<ListenCommand>>,
}

impl ClientSpeech {
    pub fn new(client: Recipient<ListenCommand>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// No client attached yet: unavailable until one reports speech support.
    pub fn detached() -> Self {
        Self::default()
    }
}

impl SpeechCapability for ClientSpeech {
    fn is_available(&self) -> bool {
        self.client.as_ref().is_some_and(Recipient::connected)
    }

    fn subscribe(
        &mut self,
        epoch: u64,
        sink: Recipient<TranscriptUpdate>,
    ) -> Result<SpeechSubscription, SpeechError> {
        let client = self
            .client
            .clone()
            .ok_or(SpeechError::CapabilityUnavailable)?;
        client
            .try_send(ListenCommand::Start { epoch, sink })
            .map_err(|_| {
                warn!("[Speech] Client cannot start listening (epoch {})", epoch);
                SpeechError::CapabilityUnavailable
            })?;
        Ok(SpeechSubscription::new(epoch, move || {
            // Client gone: nothing left to stop.
            let _ = client.try_send(ListenCommand::Stop { epoch });
        }))
    }
}
