/// Level flow: loading, restarting, advancing, and finishing the campaign.
///
/// Every (re)start goes through `load_level`, which rebuilds the board
/// from the level source. Steps survive loads; everything else about the
/// player is fresh.

use tracing::{error, info};

use crate::domain::entity::{Player, SwordState};
use crate::domain::tile::Tile;
use super::event::{GameEvent, Notice};
use super::script;
use super::world::{GameState, Phase, Scripts, LAST_LEVEL, MESSAGE_TICKS};

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Load level `level` with `lives` as both current and max lives.
/// A level that cannot be read sends the player back to level 1; if
/// level 1 itself is missing the game stops in `Phase::NoLevel`.
pub fn load_level(state: &mut GameState, level: u8, lives: u32) -> Vec<GameEvent> {
    let mut events = vec![];
    let data = match state.source.fetch(level) {
        Ok(data) => data,
        Err(e) => {
            error!(level, "cannot load level: {e}");
            if level != 1 {
                return restart_campaign(state);
            }
            state.phase = Phase::NoLevel;
            state.set_message(&format!("Cannot load level {level}: {e}"), u32::MAX);
            return events;
        }
    };

    state.level = level;
    state.board = data.board;
    state.graph = data.graph;
    state.events = data.events;
    state.gate_timers.fill(0);
    state.drops.clear();
    state.guards = std::array::from_fn(|_| None);

    let steps = state.player.steps;
    let lives = lives.max(1);
    state.player = Player::new(data.start, lives);
    state.player.steps = steps;
    state.player.sword = if level == 1 { SwordState::None } else { SwordState::Sheathed };

    for seed in &data.guards {
        state.spawn_guard(seed.loc, seed.kind);
    }

    state.coins_required = state.board.count(|t| t == Tile::Coin) as u32;
    state.phase = Phase::Playing;
    state.dying_timer = 0;
    state.flash = None;
    state.show_stats = false;
    state.coin_notice_armed = true;
    state.scripts = Scripts::default();
    state.message.clear();
    state.message_timer = 0;

    info!(level, lives, coins = state.coins_required, start = %state.player.loc, "level loaded");
    events.push(GameEvent::LevelEntered { level });

    if state.coins_required > 0 {
        let notice = Notice::CoinsRequired(state.coins_required);
        state.set_message(&notice.to_string(), MESSAGE_TICKS);
        events.push(GameEvent::Notice(notice));
    }

    script::on_level_loaded(state, &mut events);
    events
}

/// Reload the current level after a death or a restart request. Lives
/// picked up on this level are forfeited.
pub fn restart_level(state: &mut GameState) -> Vec<GameEvent> {
    let lives = state.player.max_lives.saturating_sub(state.player.lives_gained);
    load_level(state, state.level, lives)
}

/// Back to level 1 with the configured lives and a fresh step count.
pub fn restart_campaign(state: &mut GameState) -> Vec<GameEvent> {
    state.player.steps = 0;
    load_level(state, 1, state.start_lives)
}

/// Go through the exit: next level at full health, or the ending.
pub fn advance_level(state: &mut GameState) -> Vec<GameEvent> {
    if state.level >= LAST_LEVEL {
        return complete_campaign(state);
    }
    let lives = state.player.max_lives;
    load_level(state, state.level + 1, lives)
}

/// Report the step count and start over.
pub fn complete_campaign(state: &mut GameState) -> Vec<GameEvent> {
    let steps = state.player.steps;
    info!(steps, "campaign complete");
    let mut events = vec![
        GameEvent::CampaignComplete { steps },
        GameEvent::Notice(Notice::Victory { steps }),
    ];
    events.extend(restart_campaign(state));
    // Shown over the fresh level 1.
    state.set_message(&Notice::Victory { steps }.to_string(), MESSAGE_TICKS * 2);
    events
}
