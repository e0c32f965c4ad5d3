/// World physics run once per tick: timers, spikes, chompers, loose
/// floors, and the player's fall.
///
/// Cadences are derived from `GameState::elapsed_ms()`, never from the
/// wall clock, so a replay of the same commands gives the same world.

use tracing::debug;

use crate::domain::entity::{LooseDrop, Motion};
use crate::domain::neighbor::Direction;
use crate::domain::room::{Loc, TileId};
use crate::domain::rules::{self, Landing};
use crate::domain::tile::{GateState, Jaws, Spikes, Tile};
use super::buttons;
use super::event::{Cue, GameEvent};
use super::level;
use super::script;
use super::world::GameState;

// ══════════════════════════════════════════════════════════════
// Timers
// ══════════════════════════════════════════════════════════════

pub fn resolve_timers(state: &mut GameState) {
    if let Some(flash) = state.flash.as_mut() {
        flash.ticks = flash.ticks.saturating_sub(1);
        if flash.ticks == 0 {
            state.flash = None;
        }
    }
    state.player.float_ticks = state.player.float_ticks.saturating_sub(1);
}

/// Counts every armed gate down by one; an open gate closes at zero.
pub fn resolve_gate_timers(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let running: Vec<(Loc, u32)> = state.gate_timers.iter().filter(|(_, t)| *t > 0).collect();
    for (loc, ticks) in running {
        state.gate_timers.set(loc, ticks - 1);
        if ticks == 1 && state.tile(loc) == Tile::Gate(GateState::Open) {
            state.set_tile(loc, Tile::Gate(GateState::Closed));
            if loc.room == state.current_room() {
                events.push(Cue::GateClose.into());
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Spikes and chompers (current room only)
// ══════════════════════════════════════════════════════════════

pub fn resolve_spikes(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let player = state.player.loc;
    let beside = [
        state.neighbor(player, Direction::Left),
        state.neighbor(player, Direction::Right),
    ];
    for tile in TileId::all() {
        let loc = Loc { room: player.room, tile };
        let Tile::Spikes(current) = state.tile(loc) else { continue };
        let armed = if rules::spike_sees_from_above(tile, player.tile) || beside.contains(&Some(loc)) {
            Spikes::Extended
        } else {
            Spikes::Retracted
        };
        if armed != current {
            state.set_tile(loc, Tile::Spikes(armed));
            if armed == Spikes::Extended {
                events.push(Cue::SpikesOut.into());
            }
        }
    }
}

pub fn resolve_chompers(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let player = state.player.loc;
    let phase = (state.elapsed_ms() / state.speed.chomper_period_ms) % 2;
    let mut snapped = false;
    for tile in TileId::all() {
        let loc = Loc { room: player.room, tile };
        let Tile::Chomper(jaws) = state.tile(loc) else { continue };
        let in_band = tile.row() == player.tile.row();
        let next = match (in_band, phase) {
            (true, 1) => Jaws::Closed,
            _ => Jaws::Open,
        };
        if next != jaws {
            state.set_tile(loc, Tile::Chomper(next));
            if next == Jaws::Closed && !snapped {
                events.push(Cue::Chomper.into());
                snapped = true;
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Loose floors
// ══════════════════════════════════════════════════════════════

/// Start a loose floor wobbling. A floor already on its way is left alone.
pub fn drop_loose(state: &mut GameState, loc: Loc, events: &mut Vec<GameEvent>) {
    if !state.tile(loc).is_loose() || state.drops.iter().any(|d| d.loc == loc) {
        return;
    }
    state.drops.push(LooseDrop::new(loc, state.speed.loose_wobble_ticks));
    events.push(Cue::LooseWobble.into());
}

pub fn resolve_drops(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let mut drops = std::mem::take(&mut state.drops);
    drops.retain_mut(|drop| {
        if !drop.tick() {
            return true;
        }
        // First falling tick: the origin opens up.
        if state.tile(drop.loc).is_loose() {
            state.set_tile(drop.loc, Tile::Empty);
        }
        let Some(below) = state.neighbor(drop.loc, Direction::Down) else {
            debug!(at = %drop.loc, "loose floor fell out of the level");
            return false;
        };
        match state.tile(below) {
            t if t.is_empty() => {
                drop.loc = below;
                true
            }
            t => {
                events.push(Cue::LooseCrash.into());
                if t.button().is_some() {
                    buttons::push_button_at(state, below, true, events);
                    state.set_tile(below, Tile::Debris);
                } else if t == Tile::Floor {
                    state.set_tile(below, Tile::Debris);
                }
                false
            }
        }
    });
    state.drops = drops;
}

// ══════════════════════════════════════════════════════════════
// Falling
// ══════════════════════════════════════════════════════════════

/// One row of fall per tick. The ledge grab is tried on every new row;
/// landing is resolved in the same tick as the last row.
pub fn resolve_fall(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let rows = match state.player.motion {
        Motion::Hanging => return,
        Motion::Falling { rows } => rows,
        Motion::Standing => 0,
    };
    if !state.tile(state.player.loc).is_empty() {
        land(state, rows, false, events);
        return;
    }

    let Some(below) = state.neighbor(state.player.loc, Direction::Down) else {
        if script::falls_to_next_level(state, state.current_room()) {
            events.extend(level::advance_level(state));
        } else {
            debug!(at = %state.player.loc, "fell out of the level");
            state.player.lives = 0;
            events.push(Cue::LandingDead.into());
        }
        return;
    };

    let rows = rows + 1;
    state.player.loc = below;
    state.player.motion = Motion::Falling { rows };
    if rows == 3 && !state.player.is_floating() {
        events.push(Cue::Scream.into());
    }

    let s = state.surroundings();
    if let Some(facing) = rules::ledge_grab(&s, state.player.facing, state.player.can_grab) {
        state.player.facing = facing;
        state.player.can_grab = false;
        events.push(Cue::Grab.into());
        land(state, rows, true, events);
        state.player.motion = Motion::Hanging;
    } else if !s.here.is_empty() {
        land(state, rows, false, events);
    }
}

fn land(state: &mut GameState, rows: u32, grabbed: bool, events: &mut Vec<GameEvent>) {
    state.player.motion = Motion::Standing;
    match rules::landing(rows, state.player.is_floating(), grabbed) {
        Landing::None => {}
        Landing::Soft => events.push(Cue::LandingSoft.into()),
        Landing::Hurt => {
            state.player.hurt(1);
            let cue = if state.player.lives == 0 { Cue::LandingDead } else { Cue::LandingHurt };
            events.push(cue.into());
        }
        Landing::Fatal => {
            state.player.lives = 0;
            events.push(Cue::LandingDead.into());
        }
    }
}
