/// Entities: Player, Guard, LooseDrop (a falling floor tile), and the
/// command vocabulary the front-end feeds the simulation.

use super::room::{Loc, TileId};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Left,
    Right,
}

/// Player movement state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Motion {
    Standing,
    /// Holding a ledge; left/right are ignored until released.
    Hanging,
    /// Falling; `rows` counts rows dropped so far.
    Falling { rows: u32 },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SwordState {
    None,
    Sheathed,
    Drawn,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Left,
    Right,
    Up,
    Down,
}

/// How a horizontal move is made.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Stride {
    #[default]
    Walk,
    Jump,
    Careful,
    RunJump,
}

impl Stride {
    /// Tiles covered by a horizontal move.
    pub fn turns(self) -> u32 {
        match self {
            Stride::Walk | Stride::Careful => 1,
            Stride::Jump => 3,
            Stride::RunJump => 6,
        }
    }
}

/// Discrete commands. Cheat commands are ignored unless cheats are enabled.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move { dir: MoveDir, stride: Stride },
    Strike,
    ShowStats,
    RestartLevel,
    RestartCampaign,
    CheatNextLevel,
    CheatExtraLife,
    CheatFloat,
    CheatKillGuard,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub loc: Loc,
    pub facing: Facing,
    pub motion: Motion,
    /// A ledge may be grabbed on the next fall.
    pub can_grab: bool,
    pub sword: SwordState,
    pub float_ticks: u32,
    /// Spike immunity, set by careful steps.
    pub safe: bool,
    pub lives: u32,
    pub max_lives: u32,
    /// Extra max lives picked up on the current level; revoked on death.
    pub lives_gained: u32,
    pub steps: u32,
    pub coins: u32,
}

impl Player {
    pub fn new(loc: Loc, lives: u32) -> Self {
        Player {
            loc,
            facing: Facing::Right,
            motion: Motion::Standing,
            can_grab: false,
            sword: SwordState::None,
            float_ticks: 0,
            safe: false,
            lives,
            max_lives: lives,
            lives_gained: 0,
            steps: 0,
            coins: 0,
        }
    }

    pub fn is_floating(&self) -> bool {
        self.float_ticks > 0
    }

    pub fn is_hanging(&self) -> bool {
        self.motion == Motion::Hanging
    }

    pub fn hurt(&mut self, amount: u32) {
        self.lives = self.lives.saturating_sub(amount);
    }

    pub fn heal(&mut self) {
        if self.lives < self.max_lives {
            self.lives += 1;
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GuardKind {
    Easy,
    Hard,
    Boss,
    /// Scripted mirror double. Harmless.
    Shadow,
    /// Scripted companion. Harmless.
    Mouse,
}

impl GuardKind {
    pub fn base_hp(self) -> Option<u32> {
        match self {
            GuardKind::Easy => Some(3),
            GuardKind::Hard => Some(5),
            GuardKind::Boss => Some(7),
            GuardKind::Shadow | GuardKind::Mouse => None,
        }
    }

    /// Melee guards kill on contact and attack neighbours.
    pub fn is_melee(self) -> bool {
        matches!(self, GuardKind::Easy | GuardKind::Hard | GuardKind::Boss)
    }

    pub fn letter(self) -> char {
        match self {
            GuardKind::Easy => 'E',
            GuardKind::Hard => 'H',
            GuardKind::Boss => 'J',
            GuardKind::Shadow => 'S',
            GuardKind::Mouse => 'M',
        }
    }
}

/// One guard; at most one per room.
#[derive(Clone, Debug)]
pub struct Guard {
    pub tile: TileId,
    pub kind: GuardKind,
    pub hp: u32,
    /// High while the attack cadence is in its striking half; a hit only
    /// lands on the low→high edge.
    pub striking: bool,
}

impl Guard {
    /// `scripted_hp` is used for kinds without a base HP (shadow, mouse).
    pub fn new(tile: TileId, kind: GuardKind, scripted_hp: u32) -> Self {
        Guard {
            tile,
            kind,
            hp: kind.base_hp().unwrap_or(scripted_hp),
            striking: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_threat(&self) -> bool {
        self.is_alive() && self.kind.is_melee()
    }
}

/// A loose floor tile on its way down.
///
/// Two phases:
///   1. **Wobble**: still at its origin for `wobble` ticks.
///   2. **Fall**: moves one row per tick until something stops it.
#[derive(Clone, Debug)]
pub struct LooseDrop {
    pub loc: Loc,
    pub wobble: u32,
}

impl LooseDrop {
    pub fn new(loc: Loc, wobble: u32) -> Self {
        LooseDrop { loc, wobble }
    }

    /// Advance the wobble phase. Returns true once the tile is falling.
    pub fn tick(&mut self) -> bool {
        if self.wobble > 0 {
            self.wobble -= 1;
            false
        } else {
            true
        }
    }
}
