/// GameState: the complete snapshot of a running game.
///
/// ## Board ownership
///
/// `board` is the live tile board. It is replaced wholesale by
/// `level::load_level` and mutated only through `set_tile()`; the level
/// source keeps the pristine copy, so restarts simply reload.
///
/// Guards live in a fixed per-room array: a room holds at most one.
/// Everything else the renderer needs (flash, message, stats) is plain
/// data here; the simulation never touches the terminal.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::codec::text::{self, LevelError};
use crate::config::SpeedConfig;
use crate::domain::entity::{Guard, GuardKind, LooseDrop, Player};
use crate::domain::events::EventGraph;
use crate::domain::level::LevelData;
use crate::domain::neighbor::{self, Direction};
use crate::domain::room::{Loc, RoomBoard, RoomGraph, RoomId, TileGrid, ROOMS};
use crate::domain::rules::Surroundings;
use crate::domain::tile::Tile;

/// Levels in the campaign. Level 14 ends it.
pub const LAST_LEVEL: u8 = 14;

/// Extra-life cheat stops here.
pub const LIVES_CAP: u32 = 10;

/// Status messages stay up this many ticks.
pub const MESSAGE_TICKS: u32 = 40;

/// Where level data comes from.
#[derive(Clone, Debug)]
pub enum LevelSource {
    /// A game directory of text level files, re-read on every load.
    Dir(PathBuf),
    /// Levels held in memory.
    Memory(BTreeMap<u8, LevelData>),
}

impl LevelSource {
    pub fn fetch(&self, level: u8) -> Result<LevelData, LevelError> {
        match self {
            LevelSource::Dir(dir) => text::read_level(dir, level),
            LevelSource::Memory(levels) => {
                levels.get(&level).cloned().ok_or(LevelError::Missing(level))
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    /// Death shown; the level reloads when `dying_timer` runs out.
    Dying,
    /// Nothing could be loaded.
    NoLevel,
}

/// Screen flash colours, one per kind of effect.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FlashColor {
    /// Sword picked up (grey).
    Sword,
    /// Healing and extra-life potions (red).
    Heal,
    /// Float potion (green).
    Float,
    /// Hurt potion survived (blue).
    Hurt,
    /// Boss defeated (white).
    Boss,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Flash {
    pub color: FlashColor,
    pub ticks: u32,
}

/// Level-specific scripted sequences that span several ticks.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum MirrorStage {
    #[default]
    Hidden,
    /// Exit opened; the mirror appears when the player reaches its trigger room.
    Armed,
    Shown,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum MouseStage {
    #[default]
    Waiting,
    /// Ticks spent in the mouse room since the exit opened.
    Counting(u32),
    Done,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Scripts {
    pub mirror: MirrorStage,
    pub mouse: MouseStage,
}

pub struct GameState {
    // ── Level ──
    pub source: LevelSource,
    pub level: u8,
    pub board: RoomBoard,
    pub graph: RoomGraph,
    pub events: EventGraph,
    /// Ticks until an open gate closes again; 0 = no timer running.
    pub gate_timers: TileGrid<u32>,
    pub coins_required: u32,

    // ── Entities ──
    pub player: Player,
    pub guards: [Option<Guard>; ROOMS as usize],
    pub drops: Vec<LooseDrop>,

    // ── Settings ──
    pub speed: SpeedConfig,
    pub cheats: bool,
    pub start_lives: u32,

    // ── Meta ──
    pub phase: Phase,
    pub tick: u64,
    pub dying_timer: u32,
    pub scripts: Scripts,

    // ── UI ──
    pub flash: Option<Flash>,
    pub message: String,
    pub message_timer: u32,
    pub show_stats: bool,
    /// The "coins collected" notice may be shown; cleared once shown,
    /// re-armed by movement.
    pub coin_notice_armed: bool,
}

// ── Construction ──

impl GameState {
    /// An empty game. Call `level::load_level` to start playing.
    pub fn new(source: LevelSource, speed: SpeedConfig, cheats: bool, start_lives: u32) -> Self {
        GameState {
            source,
            level: 0,
            board: RoomBoard::new(),
            graph: RoomGraph::new(),
            events: EventGraph::new(),
            gate_timers: TileGrid::new(),
            coins_required: 0,
            player: Player::new(Loc::ORIGIN, start_lives),
            guards: std::array::from_fn(|_| None),
            drops: vec![],
            speed,
            cheats,
            start_lives,
            phase: Phase::NoLevel,
            tick: 0,
            dying_timer: 0,
            scripts: Scripts::default(),
            flash: None,
            message: String::new(),
            message_timer: 0,
            show_stats: false,
            coin_notice_armed: true,
        }
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    pub fn set_flash(&mut self, color: FlashColor) {
        self.flash = Some(Flash { color, ticks: self.speed.flash_ticks });
    }

    /// Simulation clock in milliseconds; drives the chomper and attack cadences.
    pub fn elapsed_ms(&self) -> u64 {
        self.tick * self.speed.tick_rate_ms
    }
}

// ── Tile queries ──

impl GameState {
    #[inline]
    pub fn tile(&self, loc: Loc) -> Tile {
        self.board.get(loc)
    }

    #[inline]
    pub fn set_tile(&mut self, loc: Loc, tile: Tile) {
        self.board.set(loc, tile);
    }

    pub fn neighbor(&self, loc: Loc, dir: Direction) -> Option<Loc> {
        neighbor::neighbor(&self.graph, loc, dir)
    }

    pub fn surroundings(&self) -> Surroundings {
        Surroundings::at(&self.board, &self.graph, self.player.loc)
    }

    pub fn current_room(&self) -> RoomId {
        self.player.loc.room
    }
}

// ── Guards ──

impl GameState {
    pub fn guard(&self, room: RoomId) -> Option<&Guard> {
        self.guards[room.get() as usize - 1].as_ref()
    }

    pub fn guard_mut(&mut self, room: RoomId) -> Option<&mut Guard> {
        self.guards[room.get() as usize - 1].as_mut()
    }

    /// The guard standing exactly at `loc`, dead or alive.
    pub fn guard_at(&self, loc: Loc) -> Option<&Guard> {
        self.guard(loc.room).filter(|g| g.tile == loc.tile)
    }

    /// Place a guard, replacing whatever the room held. Scripted kinds get
    /// the player's max lives as HP.
    pub fn spawn_guard(&mut self, loc: Loc, kind: GuardKind) {
        let guard = Guard::new(loc.tile, kind, self.player.max_lives);
        self.guards[loc.room.get() as usize - 1] = Some(guard);
    }
}
