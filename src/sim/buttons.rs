/// Buttons: running a button's chain against the gates and the exit door.
///
/// ## Raise buttons (`A`..`R`)
///
///   ┌──────────────┬────────────────────────────────────────────────┐
///   │ Target       │ Effect                                         │
///   ├──────────────┼────────────────────────────────────────────────┤
///   │ closed gate  │ opens, timer set, gate-open cue                │
///   │ open gate    │ timer refreshed                                │
///   │ closed door  │ opens with its partner if every coin is taken, │
///   │              │ otherwise (short press) a one-off coin notice  │
///   └──────────────┴────────────────────────────────────────────────┘
///
/// ## Drop buttons (`a`..`r`)
///
/// Every open gate in the chain closes at once.

use tracing::debug;

use crate::domain::neighbor::Direction;
use crate::domain::room::Loc;
use crate::domain::tile::{Button, ButtonKind, DoorSide, GateState, Tile};
use super::event::{Cue, GameEvent, Notice};
use super::script;
use super::world::{GameState, MESSAGE_TICKS};

/// Run `button`'s chain. `forever` uses the long gate timer (crushed or
/// scripted presses); otherwise the short one.
pub fn push_button(state: &mut GameState, button: Button, forever: bool, events: &mut Vec<GameEvent>) {
    let ticks = if forever { state.speed.gate_forever_ticks } else { state.speed.gate_open_ticks };
    let targets = state.events.targets(button).to_vec();
    match button.kind {
        ButtonKind::Raise => {
            for loc in targets {
                raise(state, loc, ticks, !forever, events);
            }
        }
        ButtonKind::Drop => {
            for loc in targets {
                if state.tile(loc) == Tile::Gate(GateState::Open) {
                    state.set_tile(loc, Tile::Gate(GateState::Closed));
                    state.gate_timers.set(loc, 0);
                    events.push(Cue::GateClose.into());
                }
            }
        }
    }
}

/// Press whatever button sits at `loc`, if any.
pub fn push_button_at(state: &mut GameState, loc: Loc, forever: bool, events: &mut Vec<GameEvent>) {
    if let Some(button) = state.tile(loc).button() {
        push_button(state, button, forever, events);
    }
}

fn raise(state: &mut GameState, loc: Loc, ticks: u32, notify: bool, events: &mut Vec<GameEvent>) {
    match state.tile(loc) {
        Tile::Gate(GateState::Closed) => {
            state.set_tile(loc, Tile::Gate(GateState::Open));
            state.gate_timers.set(loc, ticks);
            events.push(Cue::GateOpen.into());
            script::on_gate_opened(state, loc, events);
        }
        Tile::Gate(GateState::Open) => state.gate_timers.set(loc, ticks),
        Tile::Door { side, open: false } => {
            if state.player.coins >= state.coins_required {
                open_exit(state, loc, side, events);
            } else if notify && state.coin_notice_armed {
                let notice = Notice::CoinsCollected {
                    have: state.player.coins,
                    need: state.coins_required,
                };
                state.set_message(&notice.to_string(), MESSAGE_TICKS);
                state.coin_notice_armed = false;
                events.push(GameEvent::Notice(notice));
            }
        }
        _ => {}
    }
}

fn open_exit(state: &mut GameState, loc: Loc, side: DoorSide, events: &mut Vec<GameEvent>) {
    state.set_tile(loc, Tile::Door { side, open: true });
    let (toward, partner_side) = match side {
        DoorSide::Left => (Direction::Right, DoorSide::Right),
        DoorSide::Right => (Direction::Left, DoorSide::Left),
    };
    if let Some(partner) = state.neighbor(loc, toward) {
        if state.tile(partner) == (Tile::Door { side: partner_side, open: false }) {
            state.set_tile(partner, Tile::Door { side: partner_side, open: true });
        }
    }
    debug!(at = %loc, "exit door opened");
    events.push(Cue::LevelDoorOpen.into());
    script::on_exit_opened(state);
}
