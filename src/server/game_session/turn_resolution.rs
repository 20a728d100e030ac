//! Carries out the effects requested by the game state machine for a GameSession.
//! Encapsulates timer scheduling, speech restarts, the settle delay and teardown.

use actix::prelude::*;
use log::{debug, info, warn};

use crate::error::GameError;
use crate::game::state::Effect;
use crate::game::types::Turn;
use crate::server::game_session::messages::ServerMessage;
use crate::server::game_session::server::GameSession;

/// Apply effects in order. Effects produced while applying (a failed speech
/// restart aborting the game) are applied recursively.
pub fn run_effects(this: &mut GameSession, effects: Vec<Effect>, ctx: &mut Context<GameSession>) {
    for effect in effects {
        match effect {
            Effect::ArmTimer { turn, epoch } => arm_timer(this, turn, epoch, ctx),
            Effect::DisarmTimer { turn } => disarm_timer(this, turn, ctx),
            Effect::StartSpeech { epoch } => start_speech(this, epoch, ctx),
            Effect::StopSpeech => this.speech.stop(),
            Effect::ScheduleSettle { epoch } => schedule_settle(this, epoch, ctx),
            Effect::Finished(outcome) => {
                cancel_settle(this, ctx);
                info!("[GameSession] Game over game_id={}: {:?}", this.game_id, outcome);
                this.clients.broadcast(ServerMessage::GameOver { outcome });
                this.close_if_abandoned(ctx);
            }
            Effect::Publish => this.send_state(),
        }
    }
}

/// Tick `turn`'s clock every interval for `epoch`. Re-arming replaces the
/// previous interval so toggling never leaves two tick sources.
fn arm_timer(this: &mut GameSession, turn: Turn, epoch: u64, ctx: &mut Context<GameSession>) {
    disarm_timer(this, turn, ctx);
    let handle = ctx.run_interval(this.config.tick_interval, move |act, ctx| {
        let effects = act.state.tick(turn, epoch);
        run_effects(act, effects, ctx);
    });
    this.timer_handles[turn.index()] = Some(handle);
    debug!("[GameSession] Timer armed for {:?} (epoch {})", turn, epoch);
}

fn disarm_timer(this: &mut GameSession, turn: Turn, ctx: &mut Context<GameSession>) {
    if let Some(handle) = this.timer_handles[turn.index()].take() {
        ctx.cancel_future(handle);
    }
}

/// (Re)start speech capture for `epoch`. Losing the capability mid-game aborts it.
pub fn start_speech(this: &mut GameSession, epoch: u64, ctx: &mut Context<GameSession>) {
    let sink = ctx.address().recipient();
    if let Err(err) = this.speech.start(epoch, sink) {
        warn!("[GameSession] Speech restart failed game_id={}: {}", this.game_id, err);
        this.clients.notify(&GameError::from(err.clone()));
        let effects = this.state.abort(err.to_string());
        run_effects(this, effects, ctx);
    }
}

fn schedule_settle(this: &mut GameSession, epoch: u64, ctx: &mut Context<GameSession>) {
    cancel_settle(this, ctx);
    let handle = ctx.run_later(this.config.settle_delay, move |act, ctx| {
        act.settle_handle = None;
        let effects = act.state.settle(epoch);
        run_effects(act, effects, ctx);
    });
    this.settle_handle = Some(handle);
}

fn cancel_settle(this: &mut GameSession, ctx: &mut Context<GameSession>) {
    if let Some(handle) = this.settle_handle.take() {
        ctx.cancel_future(handle);
    }
}

/// Cancel everything scheduled by the session.
pub fn teardown(this: &mut GameSession, ctx: &mut Context<GameSession>) {
    disarm_timer(this, Turn::PlayerOne, ctx);
    disarm_timer(this, Turn::PlayerTwo, ctx);
    cancel_settle(this, ctx);
    this.speech.stop();
}
