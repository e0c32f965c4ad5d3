/// Level scripts: the hard-wired story beats of the shipped campaign.
///
/// | Level | Trigger                               | Effect                                  |
/// |-------|---------------------------------------|-----------------------------------------|
/// | 1     | load                                  | button 0503 pressed                     |
/// | 4     | exit opened, then room 11 reached     | mirror appears at 0405                  |
/// | 4     | run-jump through the mirror from 0406 | shadow appears at 0406                  |
/// | 5     | gate 2402 opens                       | shadow at 2404 drinks the potion there  |
/// | 6     | load                                  | shadow at 0111                          |
/// | 6     | run-jump landing in 0101-0105         | shadow steps onto 0112, crushing button |
/// | 6     | falling out of room 3                 | next level                              |
/// | 7     | load                                  | player faces left, ledge grab armed     |
/// | 8     | exit opened, then time in room 16     | mouse at 1608 presses its button        |
/// | 12    | sword taken at 1502                   | hidden floors in rooms 2 and 13         |
/// | 12    | walking left out of room 13           | next level                              |
/// | 13    | boss killed                           | button 2401 pressed, white flash        |
/// | 14    | walking left into room 5              | campaign complete                       |

use tracing::info;

use crate::domain::entity::{Facing, GuardKind};
use crate::domain::room::{Loc, RoomId};
use crate::domain::tile::Tile;
use super::buttons::push_button_at;
use super::event::{Cue, GameEvent};
use super::world::{FlashColor, GameState, MirrorStage, MouseStage};

const FIRST_BUTTON: Loc = Loc::fixed(5, 3);
const MIRROR: Loc = Loc::fixed(4, 5);
const MIRROR_TRIGGER_ROOM: u8 = 11;
const MIRROR_RUN_FROM: Loc = Loc::fixed(4, 6);
const POTION_GATE: Loc = Loc::fixed(24, 2);
const POTION_SHADOW: Loc = Loc::fixed(24, 4);
const SHADOW_START: Loc = Loc::fixed(1, 11);
const SHADOW_BUTTON: Loc = Loc::fixed(1, 12);
const SHADOW_FALL_ROOM: u8 = 3;
const MOUSE: Loc = Loc::fixed(16, 8);
const SWORD_TRIGGER: Loc = Loc::fixed(15, 2);
const HIDDEN_FLOORS: [(u8, std::ops::RangeInclusive<u8>); 2] = [(2, 1..=8), (13, 7..=10)];
const LEFT_EXIT_ROOM: u8 = 13;
const BOSS_BUTTON: Loc = Loc::fixed(24, 1);
const FINAL_ROOM: u8 = 5;

/// How a scripted room exit ends the level.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Exit {
    NextLevel,
    Victory,
}

pub fn on_level_loaded(state: &mut GameState, events: &mut Vec<GameEvent>) {
    match state.level {
        1 => push_button_at(state, FIRST_BUTTON, false, events),
        6 => state.spawn_guard(SHADOW_START, GuardKind::Shadow),
        7 => {
            state.player.facing = Facing::Left;
            state.player.can_grab = true;
        }
        _ => {}
    }
}

/// Per-tick scripts.
pub fn on_tick(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let room = state.current_room().get();

    if state.level == 4 && state.scripts.mirror == MirrorStage::Armed && room == MIRROR_TRIGGER_ROOM {
        state.set_tile(MIRROR, Tile::Mirror);
        state.scripts.mirror = MirrorStage::Shown;
        info!("mirror revealed");
    }

    if state.level == 8 && room == MOUSE.room.get() {
        if let MouseStage::Counting(n) = state.scripts.mouse {
            if n + 1 > state.speed.mouse_delay_ticks {
                state.spawn_guard(MOUSE, GuardKind::Mouse);
                push_button_at(state, MOUSE, false, events);
                state.scripts.mouse = MouseStage::Done;
                info!("mouse arrived");
            } else {
                state.scripts.mouse = MouseStage::Counting(n + 1);
            }
        }
    }
}

pub fn on_exit_opened(state: &mut GameState) {
    match state.level {
        4 if state.scripts.mirror == MirrorStage::Hidden => state.scripts.mirror = MirrorStage::Armed,
        8 if state.scripts.mouse == MouseStage::Waiting => state.scripts.mouse = MouseStage::Counting(0),
        _ => {}
    }
}

pub fn on_gate_opened(state: &mut GameState, gate: Loc, events: &mut Vec<GameEvent>) {
    if state.level != 5 || gate != POTION_GATE {
        return;
    }
    state.spawn_guard(POTION_SHADOW, GuardKind::Shadow);
    if matches!(state.tile(POTION_SHADOW), Tile::Potion(_)) {
        state.set_tile(POTION_SHADOW, Tile::Floor);
        events.push(Cue::Drinking.into());
    }
}

pub fn on_sword_taken(state: &mut GameState, at: Loc) {
    if state.level != 12 || at != SWORD_TRIGGER {
        return;
    }
    for (room, tiles) in HIDDEN_FLOORS {
        for tile in tiles {
            if let Some(loc) = Loc::new(room, tile) {
                state.set_tile(loc, Tile::FakeEmpty);
            }
        }
    }
}

/// Called when a melee guard's HP reaches zero.
pub fn on_guard_killed(state: &mut GameState, kind: GuardKind, events: &mut Vec<GameEvent>) {
    if state.level == 13 && kind == GuardKind::Boss {
        push_button_at(state, BOSS_BUTTON, false, events);
        state.set_flash(FlashColor::Boss);
        info!("boss defeated");
    }
}

/// A run-jump passing through the mirror. `from` is where the jump
/// crossed it.
pub fn on_mirror_crossed(state: &mut GameState, from: Loc) {
    if state.level == 4 && from == MIRROR_RUN_FROM {
        state.spawn_guard(MIRROR_RUN_FROM, GuardKind::Shadow);
    }
}

/// Every tile a run-jump enters.
pub fn on_run_jump_step(state: &mut GameState, dest: Loc, events: &mut Vec<GameEvent>) {
    if state.level != 6 || dest.room != SHADOW_BUTTON.room || dest.tile.col() > 5 {
        return;
    }
    if let Some(guard) = state.guard_mut(SHADOW_BUTTON.room) {
        guard.tile = SHADOW_BUTTON.tile;
    }
    if state.tile(SHADOW_BUTTON).button().is_some() {
        push_button_at(state, SHADOW_BUTTON, true, events);
        state.set_tile(SHADOW_BUTTON, Tile::Debris);
    }
}

/// Scripted exits on a leftward move from `from` to `to`.
pub fn left_exit(state: &GameState, from: Loc, to: Loc) -> Option<Exit> {
    match state.level {
        12 if from.room.get() == LEFT_EXIT_ROOM && to.room != from.room => Some(Exit::NextLevel),
        14 if to.room.get() == FINAL_ROOM => Some(Exit::Victory),
        _ => None,
    }
}

/// Falling out of the bottom of this room advances instead of killing.
pub fn falls_to_next_level(state: &GameState, room: RoomId) -> bool {
    state.level == 6 && room.get() == SHADOW_FALL_ROOM
}
