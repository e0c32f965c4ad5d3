/// Guard contact, guard attacks, and sword strikes.
///
/// Attack cadence: a guard beside the player carries a square wave with a
/// kind-dependent period. Damage lands only on the low→high edge, so
/// standing next to a guard costs one life per period, not one per tick.

use tracing::debug;

use crate::domain::entity::{Facing, GuardKind, SwordState};
use crate::domain::neighbor::Direction;
use super::event::{Cue, GameEvent};
use super::script;
use super::world::GameState;

// ══════════════════════════════════════════════════════════════
// Per-tick
// ══════════════════════════════════════════════════════════════

/// A living melee guard on the player's own tile kills outright.
pub fn resolve_contact(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let on_guard = state.guard_at(state.player.loc).is_some_and(|g| g.is_threat());
    if on_guard && state.player.lives > 0 {
        state.player.lives = 0;
        events.push(Cue::HitPrince.into());
    }
}

pub fn resolve_attacks(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let ms = state.elapsed_ms();
    for dir in [Direction::Right, Direction::Left] {
        let Some(at) = state.neighbor(state.player.loc, dir) else { continue };
        let period = match state.guard_at(at) {
            Some(g) if g.is_threat() => attack_period(state, g.kind),
            _ => continue,
        };
        let high = (ms / period) % 2 == 1;
        let Some(guard) = state.guard_mut(at.room) else { continue };
        let rising = high && !guard.striking;
        guard.striking = high;
        if rising && state.player.lives > 0 {
            state.player.hurt(1);
            events.push(Cue::HitPrince.into());
            debug!(lives = state.player.lives, "guard hit the player");
        }
    }
}

fn attack_period(state: &GameState, kind: GuardKind) -> u64 {
    match kind {
        GuardKind::Easy => state.speed.easy_attack_ms,
        GuardKind::Hard => state.speed.hard_attack_ms,
        GuardKind::Boss => state.speed.boss_attack_ms,
        // Never reached: only melee guards attack.
        GuardKind::Shadow | GuardKind::Mouse => u64::MAX,
    }
}

// ══════════════════════════════════════════════════════════════
// Commands
// ══════════════════════════════════════════════════════════════

/// Draw the sword and hit whatever living guard stands in front.
/// A hit sheathes the sword again.
pub fn strike(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.player.sword == SwordState::None {
        return;
    }
    state.player.sword = SwordState::Drawn;

    let dir = match state.player.facing {
        Facing::Left => Direction::Left,
        Facing::Right => Direction::Right,
    };
    let Some(front) = state.neighbor(state.player.loc, dir) else { return };
    let Some(guard) = state.guard_mut(front.room).filter(|g| g.tile == front.tile && g.is_alive()) else {
        return;
    };
    guard.hp -= 1;
    let (kind, hp) = (guard.kind, guard.hp);
    state.player.sword = SwordState::Sheathed;
    events.push(Cue::HitGuard.into());
    debug!(?kind, hp, "guard hit");
    if hp == 0 {
        script::on_guard_killed(state, kind, events);
    }
}

/// Cheat: the guard in the current room drops dead.
pub fn kill_room_guard(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let room = state.current_room();
    let Some(guard) = state.guard_mut(room).filter(|g| g.is_alive()) else { return };
    guard.hp = 0;
    let kind = guard.kind;
    events.push(Cue::HitGuard.into());
    script::on_guard_killed(state, kind, events);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::room::test_support::loc;
    use crate::domain::tile::{Button, GateState, Tile};
    use crate::sim::world::test_support::{game, level};
    use crate::sim::world::FlashColor;

    fn arena() -> GameState {
        let data = level(&[["..........", "..........", "__________"]], &[], loc(1, 24));
        game(3, data)
    }

    #[test]
    fn stepping_onto_a_guard_is_fatal() {
        let mut state = arena();
        state.spawn_guard(loc(1, 24), GuardKind::Easy);
        let mut events = vec![];
        resolve_contact(&mut state, &mut events);
        assert_eq!(state.player.lives, 0);
        assert_eq!(events, vec![GameEvent::Cue(Cue::HitPrince)]);
    }

    #[test]
    fn scripted_guards_are_harmless() {
        let mut state = arena();
        state.spawn_guard(loc(1, 24), GuardKind::Shadow);
        let mut events = vec![];
        resolve_contact(&mut state, &mut events);
        state.player.loc = loc(1, 23);
        for t in 0..40 {
            state.tick = t;
            resolve_attacks(&mut state, &mut events);
        }
        assert_eq!(state.player.lives, 3);
        assert!(events.is_empty());
    }

    #[test]
    fn adjacent_guard_hits_once_per_period() {
        let mut state = arena();
        state.spawn_guard(loc(1, 25), GuardKind::Easy);
        let mut events = vec![];
        // 500 ms period at 80 ms ticks: high from 500..1000, 1500..2000.
        for t in 0..=20 {
            state.tick = t;
            resolve_attacks(&mut state, &mut events);
        }
        assert_eq!(state.player.lives, 1);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn boss_attacks_from_the_left_too() {
        let mut state = arena();
        state.spawn_guard(loc(1, 23), GuardKind::Boss);
        let mut events = vec![];
        for t in 0..=8 {
            state.tick = t;
            resolve_attacks(&mut state, &mut events);
        }
        // 200 ms period: rising edges at 240 and 640 ms.
        assert_eq!(state.player.lives, 1);
    }

    #[test]
    fn strike_hits_the_guard_in_front_and_sheathes() {
        let mut state = arena();
        state.player.sword = SwordState::Sheathed;
        state.spawn_guard(loc(1, 25), GuardKind::Hard);
        let mut events = vec![];
        strike(&mut state, &mut events);
        assert_eq!(state.guard_at(loc(1, 25)).map(|g| g.hp), Some(4));
        assert_eq!(state.player.sword, SwordState::Sheathed);
        assert_eq!(events, vec![GameEvent::Cue(Cue::HitGuard)]);
    }

    #[test]
    fn strike_at_nothing_leaves_the_sword_drawn() {
        let mut state = arena();
        state.player.sword = SwordState::Sheathed;
        state.player.facing = Facing::Left;
        state.spawn_guard(loc(1, 25), GuardKind::Hard);
        let mut events = vec![];
        strike(&mut state, &mut events);
        assert_eq!(state.player.sword, SwordState::Drawn);
        assert!(events.is_empty());
    }

    #[test]
    fn no_sword_no_strike() {
        let mut state = arena();
        state.player.sword = SwordState::None;
        state.spawn_guard(loc(1, 25), GuardKind::Easy);
        let mut events = vec![];
        strike(&mut state, &mut events);
        assert_eq!(state.guard_at(loc(1, 25)).map(|g| g.hp), Some(3));
    }

    #[test]
    fn killing_the_boss_opens_the_final_gate() {
        let mut data = level(&[["..........", "..........", "__________"]], &[], loc(24, 24));
        data.board.set(loc(24, 1), Tile::Button(Button::from_letter('C').unwrap()));
        data.board.set(loc(24, 11), Tile::Gate(GateState::Closed));
        data.events.bind(Button::from_letter('C').unwrap(), vec![loc(24, 11)]);
        let mut state = game(13, data);
        state.spawn_guard(loc(24, 25), GuardKind::Boss);
        state.guard_mut(loc(24, 25).room).unwrap().hp = 1;
        let mut events = vec![];
        strike(&mut state, &mut events);
        assert_eq!(state.tile(loc(24, 11)), Tile::Gate(GateState::Open));
        assert_eq!(state.flash.map(|f| f.color), Some(FlashColor::Boss));
    }

    #[test]
    fn kill_cheat_clears_the_room() {
        let mut state = arena();
        state.spawn_guard(loc(1, 28), GuardKind::Hard);
        let mut events = vec![];
        kill_room_guard(&mut state, &mut events);
        assert_eq!(state.guard_at(loc(1, 28)).map(|g| g.is_alive()), Some(false));
        events.clear();
        kill_room_guard(&mut state, &mut events);
        assert!(events.is_empty());
    }
}
