//! WebSocket connection of one client (browser) to a game session.
//!
//! Relays client actions to the session, forwards state updates and cues back,
//! and, when the browser supports it, runs speech recognition on request.

use actix::{Actor, ActorContext, Addr, AsyncContext, Handler, Recipient, StreamHandler};
use actix_web::{HttpRequest, HttpResponse, web, Error, error};
use actix_web_actors::ws;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::server::game_session::messages::{
    BeginNameEdit, ClientAction, KeyPressed, RegisterClient, ServerMessage, StartGame,
    UnregisterClient,
};
use crate::server::game_session::server::{GameSession, GetGameSession};
use crate::server::query::query_param;
use crate::server::ws_error::ws_error_message;
use crate::speech::{ListenCommand, TranscriptUpdate};

pub struct GameClient {
    pub game_id: Uuid,
    pub client_id: Uuid,
    pub supports_speech: bool,
    pub session_addr: Addr<GameSession>,
    /// Epoch and sink of the recognition session the server asked for.
    listening: Option<(u64, Recipient<TranscriptUpdate>)>,
}

impl GameClient {
    pub fn new(game_id: Uuid, supports_speech: bool, session_addr: Addr<GameSession>) -> Self {
        Self {
            game_id,
            client_id: Uuid::new_v4(),
            supports_speech,
            session_addr,
            listening: None,
        }
    }

    fn send_json(&self, msg: &ServerMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match serde_json::to_string(msg) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                warn!("[GameClient] Failed to serialize server message: {}", e);
                ctx.text(ws_error_message("INTERNAL", "Failed to serialize game state", None));
            }
        }
    }

    fn forward_transcript(&self, epoch: u64, text: String) {
        match &self.listening {
            Some((current, sink)) if *current == epoch => {
                sink.do_send(TranscriptUpdate { epoch, text });
            }
            _ => debug!("[GameClient] Dropping transcript for epoch {}", epoch),
        }
    }
}

impl Actor for GameClient {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let addr = ctx.address();
        self.session_addr.do_send(RegisterClient {
            client_id: self.client_id,
            events: addr.clone().recipient(),
            listener: self.supports_speech.then(|| addr.recipient()),
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        debug!("[GameClient] Client {} disconnected from game_id={}", self.client_id, self.game_id);
        self.session_addr.do_send(UnregisterClient {
            client_id: self.client_id,
        });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for GameClient {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => {
                let action: ClientAction = match serde_json::from_str(&text) {
                    Ok(a) => a,
                    Err(_) => {
                        ctx.text(ws_error_message("INVALID_ACTION", "Invalid client message", None));
                        return;
                    }
                };
                match action {
                    // Refusals are reported to clients by the session itself.
                    ClientAction::Start => self.session_addr.do_send(StartGame),
                    ClientAction::Transcript { epoch, text } => self.forward_transcript(epoch, text),
                    ClientAction::BeginNameEdit { player } => {
                        self.session_addr.do_send(BeginNameEdit { turn: player })
                    }
                    ClientAction::Key { key } => self.session_addr.do_send(KeyPressed { key }),
                    ClientAction::Ping => (),
                }
            }
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(_)) => ctx.stop(),
            _ => (),
        }
    }
}

// State updates, cues and errors pushed by the session.
impl Handler<ServerMessage> for GameClient {
    type Result = ();

    fn handle(&mut self, msg: ServerMessage, ctx: &mut Self::Context) -> Self::Result {
        self.send_json(&msg, ctx);
    }
}

impl Handler<ListenCommand> for GameClient {
    type Result = ();

    fn handle(&mut self, msg: ListenCommand, ctx: &mut Self::Context) -> Self::Result {
        match msg {
            ListenCommand::Start { epoch, sink } => {
                self.listening = Some((epoch, sink));
                self.send_json(&ServerMessage::StartListening { epoch }, ctx);
            }
            ListenCommand::Stop { epoch } => {
                if matches!(self.listening, Some((current, _)) if current == epoch) {
                    self.listening = None;
                }
                self.send_json(&ServerMessage::StopListening { epoch }, ctx);
            }
        }
    }
}

/// WebSocket endpoint for a game.
///
/// Query parameter `speech=supported` marks a client able to run recognition.
pub async fn ws_game(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    let game_id = req.match_info().get("game_id").unwrap_or("");
    let game_id = Uuid::parse_str(game_id).map_err(error::ErrorBadRequest)?;
    let supports_speech = query_param(req.query_string(), "speech").as_deref() == Some("supported");

    let session_addr = data.game_session_manager
        .send(GetGameSession { game_id })
        .await
        .map_err(error::ErrorInternalServerError)?
        .map_err(error::ErrorNotFound)?;

    info!("[GameClient] Connecting to game_id={} (speech: {})", game_id, supports_speech);
    ws::start(
        GameClient::new(game_id, supports_speech, session_addr),
        &req,
        stream,
    )
}
