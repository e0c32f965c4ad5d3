/// Player movement: one command moves the player up to six tiles.
///
/// Horizontal moves cover `Stride::turns()` tiles, each tested by
/// `rules::horizontal_step`. A run-jump's two run-up tiles are played out
/// as full world ticks (spikes, chompers, buttons, guards) so the approach
/// is as dangerous as walking it.
///
/// Up and down try the special tiles under the player first (exit doors,
/// teleports, pickups) and fall back to climbing.
///
/// Falling is not handled here: a move that ends over open space leaves
/// the player standing on it, and `physics::resolve_fall` takes over on
/// the next tick.

use tracing::{debug, info, warn};

use crate::domain::entity::{Facing, MoveDir, Motion, Stride, SwordState};
use crate::domain::neighbor::Direction;
use crate::domain::room::Loc;
use crate::domain::rules::{self, CarefulStep, StepCheck};
use crate::domain::tile::{Potion, Spikes, Jaws, Tile};
use super::buttons;
use super::event::{Cue, GameEvent};
use super::level;
use super::physics;
use super::script::{self, Exit};
use super::step;
use super::world::{FlashColor, GameState, Phase};

// ══════════════════════════════════════════════════════════════
// Entry point
// ══════════════════════════════════════════════════════════════

pub fn handle_move(state: &mut GameState, dir: MoveDir, stride: Stride, events: &mut Vec<GameEvent>) {
    if matches!(state.player.motion, Motion::Falling { .. }) {
        return;
    }
    match dir {
        MoveDir::Left | MoveDir::Right => {
            if state.player.is_hanging() {
                return;
            }
            let facing = if dir == MoveDir::Left { Facing::Left } else { Facing::Right };
            moving_starts(state);
            state.player.facing = facing;
            if stride == Stride::Careful {
                careful(state, facing, events);
            } else {
                horizontal(state, facing, stride, events);
            }
            moving_ends(state, stride == Stride::Careful);
        }
        MoveDir::Up => {
            moving_starts(state);
            up(state, events);
            moving_ends(state, false);
        }
        MoveDir::Down => {
            moving_starts(state);
            down(state, events);
            moving_ends(state, false);
        }
    }
}

fn moving_starts(state: &mut GameState) {
    let p = &mut state.player;
    p.steps += 1;
    if p.sword == SwordState::Drawn {
        p.sword = SwordState::Sheathed;
    }
    // Letting go of a ledge leaves a grab ready for the drop that follows.
    p.can_grab = p.motion == Motion::Hanging;
    if p.motion == Motion::Hanging {
        p.motion = Motion::Standing;
    }
    state.show_stats = false;
    state.coin_notice_armed = true;
}

fn moving_ends(state: &mut GameState, careful: bool) {
    if !careful {
        state.player.safe = false;
    }
}

// ══════════════════════════════════════════════════════════════
// Left / right
// ══════════════════════════════════════════════════════════════

fn toward(facing: Facing) -> Direction {
    match facing {
        Facing::Left => Direction::Left,
        Facing::Right => Direction::Right,
    }
}

fn horizontal(state: &mut GameState, facing: Facing, stride: Stride, events: &mut Vec<GameEvent>) {
    let dir = toward(facing);
    for turn in 1..=stride.turns() {
        let from = state.player.loc;
        let next = state.neighbor(from, dir);
        let dest = next.map_or(Tile::Wall, |l| state.tile(l));
        match rules::horizontal_step(stride, turn, dest) {
            StepCheck::Go => {}
            StepCheck::Bump => {
                events.push(Cue::Bump.into());
                return;
            }
            StepCheck::Stop => return,
        }
        let Some(to) = next else { break };

        if dest == Tile::Mirror {
            state.player.lives = 1;
            events.push(Cue::Mirror.into());
            script::on_mirror_crossed(state, from);
        }
        if facing == Facing::Left {
            match script::left_exit(state, from, to) {
                Some(Exit::NextLevel) => {
                    events.extend(level::advance_level(state));
                    return;
                }
                Some(Exit::Victory) => {
                    events.extend(level::complete_campaign(state));
                    return;
                }
                None => {}
            }
        }

        state.player.loc = to;
        if stride == Stride::RunJump {
            script::on_run_jump_step(state, to, events);
            if turn <= 2 {
                step::world_actions(state, events);
                if state.player.lives == 0 || state.phase != Phase::Playing {
                    return;
                }
            }
        }
    }
    if matches!(stride, Stride::Jump | Stride::RunJump) {
        state.player.can_grab = true;
    }
}

fn careful(state: &mut GameState, facing: Facing, events: &mut Vec<GameEvent>) {
    let Some(to) = state.neighbor(state.player.loc, toward(facing)) else { return };
    match rules::careful_step(state.tile(to)) {
        CarefulStep::DropLoose => physics::drop_loose(state, to, events),
        CarefulStep::Walk { hang } => {
            if hang {
                state.player.can_grab = true;
            }
            state.player.safe = true;
            horizontal(state, facing, Stride::Walk, events);
        }
        CarefulStep::Nothing => {}
    }
}

// ══════════════════════════════════════════════════════════════
// Up
// ══════════════════════════════════════════════════════════════

fn up(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let here = state.player.loc;
    match state.tile(here) {
        t if t.is_open_door() => {
            events.extend(level::advance_level(state));
            return;
        }
        t @ Tile::Teleport(_) => {
            teleport(state, t, events);
            return;
        }
        Tile::TeleportExit => {
            match state.neighbor(here, Direction::Left).map(|l| state.tile(l)) {
                Some(t @ Tile::Teleport(_)) => teleport(state, t, events),
                _ => warn!(at = %here, "teleport exit without a pad to its left"),
            }
            return;
        }
        _ => {}
    }

    let s = state.surroundings();
    let facing = state.player.facing;
    let climb = rules::climb(&s, facing).and_then(|d| state.neighbor(here, d));
    if let Some(loose) = rules::loose_overhead(&s, facing).and_then(|d| state.neighbor(here, d)) {
        physics::drop_loose(state, loose, events);
    }
    if let Some(to) = climb {
        state.player.loc = to;
        state.player.motion = Motion::Standing;
    }
}

/// Jump to the first other tile bearing `pad`, scanning room by room. The
/// pad the player stands on (or, from an exit, the pad to its left) is
/// skipped.
fn teleport(state: &mut GameState, pad: Tile, events: &mut Vec<GameEvent>) {
    let from = state.player.loc;
    let left = state.neighbor(from, Direction::Left);
    let target = state
        .board
        .iter()
        .find(|&(loc, t)| t == pad && loc != from && Some(loc) != left)
        .map(|(loc, _)| loc);
    match target {
        Some(to) => {
            debug!(%from, %to, "teleport");
            state.player.loc = to;
            events.push(Cue::Mirror.into());
        }
        None => warn!(at = %from, pad = %pad.symbol(), "teleport has no partner"),
    }
}

// ══════════════════════════════════════════════════════════════
// Down
// ══════════════════════════════════════════════════════════════

fn down(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let here = state.player.loc;
    match state.tile(here) {
        Tile::Sword => {
            state.player.sword = SwordState::Sheathed;
            state.set_flash(FlashColor::Sword);
            state.set_tile(here, Tile::Floor);
            script::on_sword_taken(state, here);
        }
        Tile::Potion(p) => {
            if !drink(state, here, p, events) {
                return;
            }
        }
        Tile::Coin | Tile::FakeWall | Tile::FakeEmpty => collect(state, here, events),
        _ => {}
    }

    if rules::can_descend(&state.surroundings()) {
        if let Some(to) = state.neighbor(here, Direction::Down) {
            state.player.loc = to;
        }
    }
}

/// Returns false if the potion killed the player.
fn drink(state: &mut GameState, at: Loc, potion: Potion, events: &mut Vec<GameEvent>) -> bool {
    let p = &mut state.player;
    let flash = match potion {
        Potion::Empty => None,
        Potion::Heal => {
            p.heal();
            Some(FlashColor::Heal)
        }
        Potion::Life => {
            p.max_lives += 1;
            p.lives = p.max_lives;
            p.lives_gained += 1;
            Some(FlashColor::Heal)
        }
        Potion::Float => {
            p.float_ticks += state.speed.float_ticks;
            Some(FlashColor::Float)
        }
        Potion::Hurt => {
            p.hurt(1);
            events.push(Cue::Drinking.into());
            events.push(Cue::HitPrince.into());
            if p.lives == 0 {
                return false;
            }
            state.set_flash(FlashColor::Hurt);
            state.set_tile(at, Tile::Floor);
            return true;
        }
        Potion::Flip | Potion::SpecialBlue => {
            info!(potion = ?potion, "this potion has no effect");
            return true;
        }
    };
    if let Some(color) = flash {
        events.push(Cue::Drinking.into());
        state.set_flash(color);
    }
    state.set_tile(at, Tile::Floor);
    true
}

fn collect(state: &mut GameState, at: Loc, events: &mut Vec<GameEvent>) {
    if state.tile(at) == Tile::Coin {
        state.player.coins += 1;
        state.show_stats = true;
        events.push(Cue::Coin.into());
    }
    state.set_tile(at, Tile::Floor);
}

// ══════════════════════════════════════════════════════════════
// Arrival (every tick)
// ══════════════════════════════════════════════════════════════

/// Effects of the tile the player occupies.
pub fn resolve_arrival(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let here = state.player.loc;
    match state.tile(here) {
        Tile::Spikes(Spikes::Extended) if !state.player.safe => {
            state.player.lives = 0;
            events.push(Cue::SpikesDeath.into());
        }
        Tile::LooseFloor => physics::drop_loose(state, here, events),
        Tile::Button(b) => buttons::push_button(state, b, false, events),
        Tile::Chomper(Jaws::Closed) => {
            state.player.lives = 0;
            events.push(Cue::ChomperDeath.into());
        }
        Tile::Coin | Tile::FakeWall | Tile::FakeEmpty => collect(state, here, events),
        _ => {}
    }
}
