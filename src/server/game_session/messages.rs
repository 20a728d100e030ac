use actix::prelude::*;
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::error::GameError;
use crate::game::types::{GameSnapshot, Outcome, Turn};
use crate::speech::ListenCommand;

/// Client -> server, over the game WebSocket.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "action", content = "data")]
pub enum ClientAction {
    Start,
    Transcript { epoch: u64, text: String },
    BeginNameEdit { player: Turn },
    Key { key: String },
    Ping,
}

/// Server -> client.
#[derive(Message, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[rtype(result = "()")]
#[serde(tag = "action", content = "data")]
pub enum ServerMessage {
    State(GameSnapshot),
    StartListening { epoch: u64 },
    StopListening { epoch: u64 },
    PlayCue,
    GameOver { outcome: Outcome },
    Error { code: String, message: String, context: String },
}

impl ServerMessage {
    pub fn error(err: &GameError) -> Self {
        Self::Error {
            code: err.code().to_string(),
            message: err.to_string(),
            context: String::new(),
        }
    }
}

#[derive(Message)]
#[rtype(result = "Result<(), GameError>")]
pub struct StartGame;

#[derive(Message)]
#[rtype(result = "Result<(), GameError>")]
pub struct BeginNameEdit {
    pub turn: Turn,
}

/// Raw key from the client's keyboard capture.
#[derive(Message)]
#[rtype(result = "Result<(), GameError>")]
pub struct KeyPressed {
    pub key: String,
}

#[derive(Message)]
#[rtype(result = "GameSnapshot")]
pub struct GetSnapshot;

/// A client connection joins the session. `listener` is set when the
/// client can run speech recognition.
#[derive(Message)]
#[rtype(result = "()")]
pub struct RegisterClient {
    pub client_id: Uuid,
    pub events: Recipient<ServerMessage>,
    pub listener: Option<Recipient<ListenCommand>>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct UnregisterClient {
    pub client_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_actions_use_action_data_envelope() {
        let action: ClientAction =
            serde_json::from_str(r#"{"action":"Transcript","data":{"epoch":3,"text":"a benz"}}"#)
                .expect("valid");
        assert_eq!(
            action,
            ClientAction::Transcript { epoch: 3, text: "a benz".to_string() }
        );
        let start: ClientAction = serde_json::from_str(r#"{"action":"Start"}"#).expect("valid");
        assert_eq!(start, ClientAction::Start);
        let edit: ClientAction =
            serde_json::from_str(r#"{"action":"BeginNameEdit","data":{"player":"PlayerTwo"}}"#)
                .expect("valid");
        assert_eq!(edit, ClientAction::BeginNameEdit { player: Turn::PlayerTwo });
    }

    #[test]
    fn errors_carry_a_stable_code() {
        let msg = ServerMessage::error(&GameError::AlreadyStarted);
        let json = serde_json::to_value(&msg).expect("serializable");
        assert_eq!(json["action"], "Error");
        assert_eq!(json["data"]["code"], "ALREADY_STARTED");
    }
}
