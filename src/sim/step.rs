/// The step functions: `tick` advances the world by one fixed quantum,
/// `command` applies one player command between ticks.
///
/// Tick processing order:
///   1. Dying countdown (and reload) or nothing if no level is loaded
///   2. Message, flash, and float timers
///   3. Loose floors in flight
///   4. Hazards: spikes → chompers
///   5. Gate timers
///   6. Level scripts
///   7. Player actions: fall → tile arrival → guard contact and attacks
///   8. Death check
///
/// Hazards and player actions together are the world actions, which are
/// also replayed for each run-up tile of a run-jump. Gate timers and
/// scripts only run on real ticks.

use tracing::{debug, info};

use crate::domain::entity::Command;
use super::combat;
use super::event::GameEvent;
use super::level;
use super::movement;
use super::physics;
use super::script;
use super::world::{FlashColor, GameState, Phase, LAST_LEVEL, LIVES_CAP};

// ══════════════════════════════════════════════════════════════
// Main entry points
// ══════════════════════════════════════════════════════════════

pub fn tick(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = vec![];
    match state.phase {
        Phase::NoLevel => return events,
        Phase::Dying => {
            state.dying_timer = state.dying_timer.saturating_sub(1);
            if state.dying_timer == 0 {
                events.extend(level::restart_level(state));
            }
            return events;
        }
        Phase::Playing => {}
    }

    state.tick += 1;
    if state.message_timer > 0 {
        state.message_timer -= 1;
        if state.message_timer == 0 {
            state.message.clear();
        }
    }

    physics::resolve_timers(state);
    physics::resolve_drops(state, &mut events);
    resolve_hazards(state, &mut events);
    physics::resolve_gate_timers(state, &mut events);
    script::on_tick(state, &mut events);
    resolve_player(state, &mut events);
    resolve_death(state, &mut events);
    events
}

pub fn command(state: &mut GameState, cmd: Command) -> Vec<GameEvent> {
    let mut events = vec![];
    match cmd {
        Command::RestartLevel => {
            info!(level = state.level, "level restarted");
            events.extend(level::restart_level(state));
            return events;
        }
        Command::RestartCampaign => {
            info!("campaign restarted");
            events.extend(level::restart_campaign(state));
            return events;
        }
        _ if state.phase != Phase::Playing => return events,
        _ => {}
    }

    match cmd {
        Command::Move { dir, stride } => movement::handle_move(state, dir, stride, &mut events),
        Command::Strike => combat::strike(state, &mut events),
        Command::ShowStats => state.show_stats = true,
        Command::RestartLevel | Command::RestartCampaign => {}
        cheat if !state.cheats => debug!(?cheat, "cheats are disabled"),
        Command::CheatNextLevel => {
            if state.level < LAST_LEVEL {
                let lives = state.player.max_lives;
                events.extend(level::load_level(state, state.level + 1, lives));
            }
        }
        Command::CheatExtraLife => {
            let p = &mut state.player;
            if p.max_lives < LIVES_CAP {
                p.max_lives += 1;
            }
            p.lives = p.max_lives;
        }
        Command::CheatFloat => {
            state.player.float_ticks += state.speed.float_ticks;
            state.set_flash(FlashColor::Float);
        }
        Command::CheatKillGuard => combat::kill_room_guard(state, &mut events),
    }
    resolve_death(state, &mut events);
    events
}

// ══════════════════════════════════════════════════════════════
// Shared pieces
// ══════════════════════════════════════════════════════════════

/// Everything that reacts to where the player is right now.
pub fn world_actions(state: &mut GameState, events: &mut Vec<GameEvent>) {
    resolve_hazards(state, events);
    resolve_player(state, events);
}

fn resolve_hazards(state: &mut GameState, events: &mut Vec<GameEvent>) {
    physics::resolve_spikes(state, events);
    physics::resolve_chompers(state, events);
}

fn resolve_player(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let level = state.level;
    physics::resolve_fall(state, events);
    if state.level != level || state.phase != Phase::Playing {
        return;
    }
    movement::resolve_arrival(state, events);
    combat::resolve_contact(state, events);
    combat::resolve_attacks(state, events);
}

fn resolve_death(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.phase != Phase::Playing || state.player.lives > 0 {
        return;
    }
    info!(level = state.level, at = %state.player.loc, "player died");
    state.phase = Phase::Dying;
    state.dying_timer = state.speed.dying_ticks.max(1);
    events.push(GameEvent::PlayerDied);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{GuardKind, MoveDir, Motion, Stride};
    use crate::domain::room::test_support::loc;
    use crate::domain::room::Side;
    use crate::domain::tile::{Button, GateState, Spikes, Tile};
    use crate::sim::event::Cue;
    use crate::sim::world::test_support::{game, level};

    fn walk(dir: MoveDir) -> Command {
        Command::Move { dir, stride: Stride::Walk }
    }

    fn run_ticks(state: &mut GameState, n: usize) -> Vec<GameEvent> {
        (0..n).flat_map(|_| tick(state)).collect()
    }

    #[test]
    fn walking_off_a_ledge_falls_over_the_next_ticks() {
        let data = level(&[["..........", "___.......", "__________"]], &[], loc(1, 13));
        let mut state = game(3, data);
        command(&mut state, walk(MoveDir::Right));
        assert_eq!(state.player.loc, loc(1, 14));
        let events = tick(&mut state);
        assert_eq!(state.player.loc, loc(1, 24));
        assert_eq!(state.player.motion, Motion::Standing);
        assert_eq!(events, vec![GameEvent::Cue(Cue::LandingSoft)]);
    }

    #[test]
    fn death_reloads_the_level_with_the_gained_lives_forfeited() {
        let data = level(&[["..........", "..........", "__^_______"]], &[], loc(1, 22));
        let mut state = game(3, data);
        state.player.max_lives = 4;
        state.player.lives_gained = 1;
        state.set_tile(loc(1, 23), Tile::Spikes(Spikes::Retracted));
        command(&mut state, walk(MoveDir::Right));
        let events = tick(&mut state);
        assert!(events.contains(&GameEvent::Cue(Cue::SpikesDeath)));
        assert!(events.contains(&GameEvent::PlayerDied));
        assert_eq!(state.phase, Phase::Dying);

        // Commands other than restarts are ignored while dying.
        command(&mut state, walk(MoveDir::Left));
        assert_eq!(state.player.loc, loc(1, 23));

        let dying = state.speed.dying_ticks as usize;
        let events = run_ticks(&mut state, dying);
        assert!(events.contains(&GameEvent::LevelEntered { level: 3 }));
        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.player.loc, loc(1, 22));
        assert_eq!((state.player.lives, state.player.max_lives), (3, 3));
        assert_eq!(state.tile(loc(1, 23)), Tile::Spikes(Spikes::Extended), "board reloaded");
    }

    #[test]
    fn steps_survive_death() {
        let data = level(&[["..........", "..........", "__________"]], &[], loc(1, 22));
        let mut state = game(3, data);
        command(&mut state, walk(MoveDir::Right));
        command(&mut state, walk(MoveDir::Right));
        state.player.lives = 0;
        tick(&mut state);
        let dying = state.speed.dying_ticks as usize;
        run_ticks(&mut state, dying);
        assert_eq!(state.player.steps, 2);
    }

    #[test]
    fn cheats_need_to_be_enabled() {
        let data = level(&[["..........", "..........", "__________"]], &[], loc(1, 22));
        let mut state = game(3, data);
        state.cheats = false;
        command(&mut state, Command::CheatExtraLife);
        assert_eq!(state.player.max_lives, 3);
        state.cheats = true;
        for _ in 0..10 {
            command(&mut state, Command::CheatExtraLife);
        }
        assert_eq!((state.player.lives, state.player.max_lives), (LIVES_CAP, LIVES_CAP));
        command(&mut state, Command::CheatFloat);
        assert_eq!(state.player.float_ticks, state.speed.float_ticks);
    }

    #[test]
    fn kill_cheat_then_walk_through() {
        let data = level(&[["..........", "..........", "__________"]], &[], loc(1, 22));
        let mut state = game(3, data);
        state.spawn_guard(loc(1, 23), GuardKind::Easy);
        command(&mut state, Command::CheatKillGuard);
        command(&mut state, walk(MoveDir::Right));
        run_ticks(&mut state, 20);
        assert_eq!(state.player.lives, 3);
        assert_eq!(state.phase, Phase::Playing);
    }

    #[test]
    fn guard_wears_the_player_down() {
        let data = level(&[["..........", "..........", "__________"]], &[], loc(1, 22));
        let mut state = game(3, data);
        state.spawn_guard(loc(1, 23), GuardKind::Hard);
        // 250 ms period: one hit every 500 ms, i.e. roughly every 6 ticks.
        let events = run_ticks(&mut state, 20);
        assert!(events.contains(&GameEvent::PlayerDied));
        assert_eq!(state.phase, Phase::Dying);
    }

    #[test]
    fn message_expires() {
        let data = level(&[["..........", "..........", "_$________"]], &[], loc(1, 21));
        let mut state = game(3, data);
        assert!(!state.message.is_empty());
        run_ticks(&mut state, crate::sim::world::MESSAGE_TICKS as usize);
        assert!(state.message.is_empty());
    }

    #[test]
    fn falling_out_of_level_six_room_three_advances() {
        let data = level(
            &[["..........", "..........", "__________"], [".........."; 3], [".........."; 3]],
            &[(2, Side::Down, 3)],
            loc(1, 21),
        );
        let mut state = game(6, data.clone());
        if let crate::sim::world::LevelSource::Memory(levels) = &mut state.source {
            levels.insert(7, data);
        }
        state.player.loc = loc(3, 25);
        let events = tick(&mut state);
        assert!(events.contains(&GameEvent::LevelEntered { level: 7 }));
        assert_eq!(state.level, 7);
    }

    #[test]
    fn raised_gate_closes_on_the_last_tick_of_its_timer() {
        let mut data = level(&[["..........", "...)......", "__________"]], &[], loc(1, 21));
        let button = Button::from_letter('A').unwrap();
        data.events.bind(button, vec![loc(1, 14)]);
        let mut state = game(3, data);
        let mut events = vec![];
        crate::sim::buttons::push_button(&mut state, button, false, &mut events);
        assert_eq!(state.tile(loc(1, 14)), Tile::Gate(GateState::Open));

        let open_for = state.speed.gate_open_ticks;
        for n in 1..open_for {
            let events = tick(&mut state);
            assert_eq!(state.tile(loc(1, 14)), Tile::Gate(GateState::Open), "tick {n}");
            assert!(!events.contains(&GameEvent::Cue(Cue::GateClose)));
        }
        let events = tick(&mut state);
        assert_eq!(state.tile(loc(1, 14)), Tile::Gate(GateState::Closed));
        assert!(events.contains(&GameEvent::Cue(Cue::GateClose)));
    }

    #[test]
    fn restart_works_with_nothing_loaded() {
        let data = level(&[["..........", "..........", "__________"]], &[], loc(1, 22));
        let mut state = game(1, data);
        state.phase = Phase::NoLevel;
        assert!(tick(&mut state).is_empty());
        command(&mut state, Command::RestartCampaign);
        assert_eq!(state.phase, Phase::Playing);
    }
}
