use actix::prelude::*;
use std::collections::HashMap;
use actix::MessageResult;
use uuid::Uuid;
use log::{debug, info, warn};

use crate::config::game::GameConfig;
use crate::config::prompts::PromptDeck;
use crate::error::{GameError, SpeechError};
use crate::game::matcher::{AnswerMatcher, ConfirmationCue};
use crate::game::name_edit::NameEdit;
use crate::game::state::GameState;
use crate::game::types::Phase;
use crate::server::game_session::messages::{
    BeginNameEdit, GetSnapshot, KeyPressed, RegisterClient, ServerMessage, StartGame,
    UnregisterClient,
};
use crate::server::game_session::turn_resolution::{run_effects, start_speech, teardown};
use crate::speech::{
    ClientSpeech, ListenCommand, ScriptedSpeech, SpeechCapability, SpeechInputStream,
    TranscriptUpdate,
};

/// Where a session gets its speech input from.
pub enum SpeechSource {
    /// The first connected client that reports speech support.
    Client,
    /// A capability owned by the session (scripted demo, tests).
    Local(Box<dyn SpeechCapability>),
}

struct ConnectedClient {
    events: Recipient<ServerMessage>,
    listener: Option<Recipient<ListenCommand>>,
}

/// Connected clients of one session.
#[derive(Default)]
pub struct ClientRegistry {
    clients: HashMap<Uuid, ConnectedClient>,
}

impl ClientRegistry {
    pub fn broadcast(&self, msg: ServerMessage) {
        for client in self.clients.values() {
            client.events.do_send(msg.clone());
        }
    }

    pub fn notify(&self, err: &GameError) {
        self.broadcast(ServerMessage::error(err));
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl ConfirmationCue for ClientRegistry {
    fn play_confirmation(&self) {
        self.broadcast(ServerMessage::PlayCue);
    }
}

/// Actor running one game: owns the state machine, its timers and the
/// speech stream.
pub struct GameSession {
    pub game_id: Uuid,
    pub(crate) config: GameConfig,
    pub(crate) state: GameState,
    pub(crate) matcher: AnswerMatcher,
    pub(crate) speech: SpeechInputStream,
    pub(crate) clients: ClientRegistry,
    pub(crate) timer_handles: [Option<SpawnHandle>; 2],
    pub(crate) settle_handle: Option<SpawnHandle>,
    follows_clients: bool,
    speech_client: Option<Uuid>,
    manager: Option<Recipient<SessionClosed>>,
}

impl GameSession {
    pub fn new(game_id: Uuid, config: GameConfig, deck: PromptDeck, source: SpeechSource) -> Self {
        let state = GameState::new(&config, deck);
        let (capability, follows_clients): (Box<dyn SpeechCapability>, bool) = match source {
            SpeechSource::Client => (Box::new(ClientSpeech::detached()), true),
            SpeechSource::Local(capability) => (capability, false),
        };
        Self {
            game_id,
            config,
            state,
            matcher: AnswerMatcher::new(),
            speech: SpeechInputStream::new(capability),
            clients: ClientRegistry::default(),
            timer_handles: [None, None],
            settle_handle: None,
            follows_clients,
            speech_client: None,
            manager: None,
        }
    }

    /// Report the end of this session to `manager`.
    pub fn with_manager(mut self, manager: Recipient<SessionClosed>) -> Self {
        self.manager = Some(manager);
        self
    }

    /// Stop the session once nobody is connected and no game is in progress.
    pub(crate) fn close_if_abandoned(&self, ctx: &mut Context<Self>) {
        if self.clients.is_empty() && self.state.phase() != Phase::Running {
            info!("[GameSession] No clients left, closing game_id={}", self.game_id);
            ctx.stop();
        }
    }

    pub fn send_state(&self) {
        debug!(
            "[GameSession] Broadcast state: game_id={} turn={:?} round={} epoch={}",
            self.game_id,
            self.state.turn(),
            self.state.round_index(),
            self.state.epoch()
        );
        self.clients.broadcast(ServerMessage::State(self.state.snapshot()));
    }

    /// Point the speech stream at a connected client able to listen, if any.
    fn attach_speech_client(&mut self) {
        let found = self
            .clients
            .clients
            .iter()
            .find_map(|(id, c)| c.listener.clone().filter(Recipient::connected).map(|r| (*id, r)));
        match found {
            Some((id, listener)) => {
                info!("[GameSession] Speech input from client {} (game_id={})", id, self.game_id);
                self.speech.replace_capability(Box::new(ClientSpeech::new(listener)));
                self.speech_client = Some(id);
            }
            None => {
                self.speech.replace_capability(Box::new(ClientSpeech::detached()));
                self.speech_client = None;
            }
        }
    }
}

impl Actor for GameSession {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!("[GameSession] Created game_id={}", self.game_id);
        ctx.run_later(self.config.unjoined_timeout, |act, ctx| act.close_if_abandoned(ctx));
    }

    fn stopped(&mut self, ctx: &mut Self::Context) {
        teardown(self, ctx);
        if let Some(manager) = self.manager.take() {
            manager.do_send(SessionClosed { game_id: self.game_id });
        }
        info!("[GameSession] Closed game_id={}", self.game_id);
    }
}

impl Handler<StartGame> for GameSession {
    type Result = Result<(), GameError>;

    fn handle(&mut self, _msg: StartGame, ctx: &mut Context<Self>) -> Self::Result {
        if !self.speech.is_available() {
            let err = GameError::from(SpeechError::CapabilityUnavailable);
            warn!("[GameSession] Start refused, no speech input (game_id={})", self.game_id);
            self.clients.notify(&err);
            return Err(err);
        }
        let effects = match self.state.start() {
            Ok(effects) => effects,
            Err(err) => {
                self.clients.notify(&err);
                return Err(err);
            }
        };
        run_effects(self, effects, ctx);
        Ok(())
    }
}

impl Handler<TranscriptUpdate> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: TranscriptUpdate, ctx: &mut Context<Self>) -> Self::Result {
        let effects = self
            .state
            .record_transcript(msg.epoch, &msg.text, &self.matcher, &self.clients);
        run_effects(self, effects, ctx);
    }
}

impl Handler<BeginNameEdit> for GameSession {
    type Result = Result<(), GameError>;

    fn handle(&mut self, msg: BeginNameEdit, _: &mut Context<Self>) -> Self::Result {
        self.state
            .begin_name_edit(msg.turn)
            .inspect_err(|err| self.clients.notify(err))?;
        self.send_state();
        Ok(())
    }
}

impl Handler<KeyPressed> for GameSession {
    type Result = Result<(), GameError>;

    fn handle(&mut self, msg: KeyPressed, _: &mut Context<Self>) -> Self::Result {
        let Some(edit) = NameEdit::from_key(&msg.key) else {
            return Ok(());
        };
        let changed = self
            .state
            .apply_name_edit(edit)
            .inspect_err(|err| self.clients.notify(err))?;
        if changed {
            self.send_state();
        }
        Ok(())
    }
}

impl Handler<GetSnapshot> for GameSession {
    type Result = MessageResult<GetSnapshot>;

    fn handle(&mut self, _: GetSnapshot, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.state.snapshot())
    }
}

impl Handler<RegisterClient> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: RegisterClient, _: &mut Context<Self>) -> Self::Result {
        info!(
            "[GameSession] Client {} joined game_id={} (speech: {})",
            msg.client_id,
            self.game_id,
            msg.listener.is_some()
        );
        msg.events.do_send(ServerMessage::State(self.state.snapshot()));
        self.clients.clients.insert(
            msg.client_id,
            ConnectedClient {
                events: msg.events,
                listener: msg.listener,
            },
        );
        if self.follows_clients && self.speech_client.is_none() {
            self.attach_speech_client();
        }
    }
}

impl Handler<UnregisterClient> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: UnregisterClient, ctx: &mut Context<Self>) -> Self::Result {
        if self.clients.clients.remove(&msg.client_id).is_none() {
            return;
        }
        info!("[GameSession] Client {} left game_id={}", msg.client_id, self.game_id);

        if self.follows_clients && self.speech_client == Some(msg.client_id) {
            // Recognition moves to another client, or the game cannot go on.
            let listening = self.speech.listening_epoch();
            self.attach_speech_client();
            if let Some(epoch) = listening {
                start_speech(self, epoch, ctx);
            }
        }

        self.close_if_abandoned(ctx);
    }
}

/// Owns every running session.
pub struct GameSessionManager {
    deck: PromptDeck,
    sessions: HashMap<Uuid, Addr<GameSession>>,
}

#[derive(Message)]
#[rtype(result = "Uuid")]
pub struct CreateGame {
    pub config: GameConfig,
    /// Play the game with scripted answers instead of client speech.
    pub autoplay: bool,
}

impl GameSessionManager {
    pub fn new(deck: PromptDeck) -> Self {
        Self {
            deck,
            sessions: HashMap::new(),
        }
    }

    pub fn create_game(
        &mut self,
        config: GameConfig,
        autoplay: bool,
        ctx: &mut Context<Self>,
    ) -> Uuid {
        let game_id = Uuid::new_v4();
        let deck = if config.shuffle_prompts {
            self.deck.shuffled()
        } else {
            self.deck.clone()
        };
        let source = if autoplay {
            SpeechSource::Local(Box::new(ScriptedSpeech::autoplay(&deck, config.tick_interval / 2)))
        } else {
            SpeechSource::Client
        };

        let session = GameSession::new(game_id, config, deck, source)
            .with_manager(ctx.address().recipient())
            .start();
        self.sessions.retain(|_, addr| addr.connected());
        self.sessions.insert(game_id, session);
        game_id
    }
}

impl Actor for GameSessionManager {
    type Context = Context<Self>;
}

impl Handler<CreateGame> for GameSessionManager {
    type Result = MessageResult<CreateGame>;

    fn handle(&mut self, msg: CreateGame, ctx: &mut Context<Self>) -> Self::Result {
        MessageResult(self.create_game(msg.config, msg.autoplay, ctx))
    }
}

/// Sent by a session when it stops.
#[derive(Message)]
#[rtype(result = "()")]
pub struct SessionClosed {
    pub game_id: Uuid,
}

impl Handler<SessionClosed> for GameSessionManager {
    type Result = ();

    fn handle(&mut self, msg: SessionClosed, _: &mut Context<Self>) -> Self::Result {
        if self.sessions.remove(&msg.game_id).is_some() {
            debug!("[GameSessionManager] Removed game_id={} ({} open)", msg.game_id, self.sessions.len());
        }
    }
}

#[derive(Message)]
#[rtype(result = "Result<Addr<GameSession>, String>")]
pub struct GetGameSession {
    pub game_id: Uuid,
}

impl Handler<GetGameSession> for GameSessionManager {
    type Result = Result<Addr<GameSession>, String>;

    fn handle(&mut self, msg: GetGameSession, _: &mut Context<Self>) -> Self::Result {
        self.sessions.get(&msg.game_id)
            .filter(|addr| addr.connected())
            .cloned()
            .ok_or_else(|| "Game session not found".to_string())
    }
}
