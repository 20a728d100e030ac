//! Session state machine.
//!
//! `GameState` is a plain value: every transition mutates it and returns the
//! side effects the session actor has to carry out. Nothing here schedules,
//! sleeps or talks to the network.

use log::{debug, info};

use crate::config::game::GameConfig;
use crate::config::prompts::PromptDeck;
use crate::error::{GameError, GameResult};
use crate::game::matcher::{AnswerMatcher, ConfirmationCue};
use crate::game::name_edit::NameEdit;
use crate::game::sequencer::{Advance, RoundSequencer};
use crate::game::timer::{Arm, Tick, TurnTimer};
use crate::game::types::{GameSnapshot, Outcome, Phase, PlayerView, Prompt, Turn, Urgency};

/// Work requested from the session actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Schedule one-second ticks for `turn`, tagged with `epoch`.
    ArmTimer { turn: Turn, epoch: u64 },
    /// Cancel the scheduled ticks of `turn`, if any.
    DisarmTimer { turn: Turn },
    /// Open a speech subscription for `epoch`, replacing any previous one.
    StartSpeech { epoch: u64 },
    StopSpeech,
    /// Call `settle(epoch)` after the settle delay.
    ScheduleSettle { epoch: u64 },
    /// The session ended.
    Finished(Outcome),
    /// Observable state changed; push a snapshot to clients.
    Publish,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub display_name: String,
    pub timer: TurnTimer,
}

#[derive(Debug, Clone)]
pub struct GameState {
    players: [Player; 2],
    sequencer: RoundSequencer,
    started: bool,
    game_over: bool,
    turn: Turn,
    transcript: String,
    last_match_confirmed: bool,
    epoch: u64,
    editing: Option<Turn>,
    outcome: Option<Outcome>,
}

impl GameState {
    pub fn new(config: &GameConfig, deck: PromptDeck) -> Self {
        let [name_one, name_two] = config.player_names.clone();
        let [secs_one, secs_two] = config.start_secs;
        GameState {
            players: [
                Player { display_name: name_one, timer: TurnTimer::new(secs_one) },
                Player { display_name: name_two, timer: TurnTimer::new(secs_two) },
            ],
            sequencer: RoundSequencer::new(deck),
            started: false,
            game_over: false,
            turn: Turn::PlayerOne,
            transcript: String::new(),
            last_match_confirmed: false,
            epoch: 0,
            editing: None,
            outcome: None,
        }
    }

    pub fn phase(&self) -> Phase {
        match (self.started, self.game_over) {
            (_, true) => Phase::GameOver,
            (true, false) => Phase::Running,
            (false, false) => Phase::Idle,
        }
    }

    fn is_running(&self) -> bool {
        self.started && !self.game_over
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn round_index(&self) -> usize {
        self.sequencer.index()
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn last_match_confirmed(&self) -> bool {
        self.last_match_confirmed
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn current_prompt(&self) -> &Prompt {
        self.sequencer.current()
    }

    pub fn player(&self, turn: Turn) -> &Player {
        &self.players[turn.index()]
    }

    pub fn seconds_remaining(&self, turn: Turn) -> u32 {
        self.players[turn.index()].timer.seconds_remaining()
    }

    /// Idle -> Running. Player one goes first.
    pub fn start(&mut self) -> GameResult<Vec<Effect>> {
        if self.started {
            return Err(GameError::AlreadyStarted);
        }
        self.started = true;
        self.editing = None;
        self.turn = Turn::PlayerOne;
        self.epoch += 1;
        info!(
            "[GameState] Started: {} ({}s) vs {} ({}s), {} prompts",
            self.players[0].display_name,
            self.players[0].timer.seconds_remaining(),
            self.players[1].display_name,
            self.players[1].timer.seconds_remaining(),
            self.sequencer.len()
        );

        let mut effects = self.arm_active();
        if !self.game_over {
            effects.push(Effect::StartSpeech { epoch: self.epoch });
            effects.push(Effect::Publish);
        }
        Ok(effects)
    }

    /// One elapsed second on `turn`'s clock, scheduled for `epoch`.
    pub fn tick(&mut self, turn: Turn, epoch: u64) -> Vec<Effect> {
        if !self.is_running() || turn != self.turn {
            debug!("[GameState] Ignoring tick for {:?} (epoch {})", turn, epoch);
            return Vec::new();
        }
        match self.players[turn.index()].timer.tick(epoch) {
            Tick::Ignored => Vec::new(),
            Tick::Counted(_) => vec![Effect::Publish],
            Tick::Expired => {
                info!("[GameState] {:?} ran out of time", turn);
                self.finish(self.winner(turn.other()))
            }
        }
    }

    /// A new cumulative transcript for the speech session of `epoch`.
    pub fn record_transcript(
        &mut self,
        epoch: u64,
        text: &str,
        matcher: &AnswerMatcher,
        cue: &dyn ConfirmationCue,
    ) -> Vec<Effect> {
        if !self.is_running() || epoch != self.epoch || self.last_match_confirmed {
            debug!("[GameState] Dropping transcript for epoch {} (current {})", epoch, self.epoch);
            return Vec::new();
        }
        self.transcript = text.to_string();

        let expected = &self.sequencer.current().expected_answer;
        if !matcher.confirm(&self.transcript, expected, cue) {
            return vec![Effect::Publish];
        }
        info!(
            "[GameState] {:?} answered '{}' in round {}",
            self.turn,
            expected,
            self.sequencer.index()
        );
        self.last_match_confirmed = true;
        vec![
            Effect::StopSpeech,
            Effect::ScheduleSettle { epoch: self.epoch },
            Effect::Publish,
        ]
    }

    /// End of the settle delay after a confirmed answer: next round, other player.
    pub fn settle(&mut self, epoch: u64) -> Vec<Effect> {
        if !self.is_running() || epoch != self.epoch || !self.last_match_confirmed {
            return Vec::new();
        }
        self.transcript.clear();
        self.last_match_confirmed = false;

        if self.sequencer.advance() == Advance::Exhausted {
            info!("[GameState] All {} prompts answered", self.sequencer.len());
            return self.finish(Outcome::Completed);
        }

        let mut effects = Vec::new();
        self.players[self.turn.index()].timer.disarm();
        effects.push(Effect::DisarmTimer { turn: self.turn });
        self.turn = self.turn.other();
        self.epoch += 1;
        debug!(
            "[GameState] Round {} for {:?} (epoch {})",
            self.sequencer.index(),
            self.turn,
            self.epoch
        );

        effects.extend(self.arm_active());
        if !self.game_over {
            effects.push(Effect::StartSpeech { epoch: self.epoch });
            effects.push(Effect::Publish);
        }
        effects
    }

    /// Stop a running game because input can no longer be taken.
    pub fn abort(&mut self, reason: impl Into<String>) -> Vec<Effect> {
        if !self.is_running() {
            return Vec::new();
        }
        self.finish(Outcome::Aborted { reason: reason.into() })
    }

    /// Clear `turn`'s name and start editing it.
    pub fn begin_name_edit(&mut self, turn: Turn) -> GameResult<()> {
        if self.started {
            return Err(GameError::NotIdle);
        }
        self.players[turn.index()].display_name.clear();
        self.editing = Some(turn);
        Ok(())
    }

    /// Apply a key to the name being edited. Returns whether anything changed.
    pub fn apply_name_edit(&mut self, edit: NameEdit) -> GameResult<bool> {
        if self.started {
            return Err(GameError::NotIdle);
        }
        let Some(turn) = self.editing else {
            return Ok(false);
        };
        if edit.apply(&mut self.players[turn.index()].display_name) {
            self.editing = None;
        }
        Ok(true)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let prompt = self.current_prompt();
        let view = |turn: Turn| {
            let player = &self.players[turn.index()];
            let seconds = player.timer.seconds_remaining();
            PlayerView {
                display_name: player.display_name.clone(),
                seconds_remaining: seconds,
                urgency: Urgency::for_seconds(seconds),
                editing: self.editing == Some(turn),
            }
        };
        GameSnapshot {
            phase: self.phase(),
            turn: self.turn,
            round_index: self.sequencer.index(),
            players: [view(Turn::PlayerOne), view(Turn::PlayerTwo)],
            image_reference: prompt.image_reference.clone(),
            image_label: prompt.image_label.clone(),
            transcript: self.transcript.clone(),
            revealed_answer: self
                .last_match_confirmed
                .then(|| prompt.expected_answer.to_uppercase()),
            epoch: self.epoch,
            outcome: self.outcome.clone(),
        }
    }

    /// Arm the clock of the player whose turn it is.
    fn arm_active(&mut self) -> Vec<Effect> {
        let turn = self.turn;
        match self.players[turn.index()].timer.arm(self.epoch) {
            Arm::Scheduled => vec![Effect::ArmTimer { turn, epoch: self.epoch }],
            Arm::AlreadyArmed | Arm::Spent => Vec::new(),
            Arm::Expired => {
                info!("[GameState] {:?} has no time left", turn);
                self.finish(self.winner(turn.other()))
            }
        }
    }

    fn winner(&self, turn: Turn) -> Outcome {
        Outcome::Winner {
            turn,
            name: self.players[turn.index()].display_name.clone(),
        }
    }

    fn finish(&mut self, outcome: Outcome) -> Vec<Effect> {
        self.game_over = true;
        self.last_match_confirmed = false;
        for player in &mut self.players {
            player.timer.disarm();
        }
        info!("[GameState] Game over: {:?}", outcome);
        self.outcome = Some(outcome.clone());
        vec![
            Effect::DisarmTimer { turn: Turn::PlayerOne },
            Effect::DisarmTimer { turn: Turn::PlayerTwo },
            Effect::StopSpeech,
            Effect::Finished(outcome),
            Effect::Publish,
        ]
    }
}
