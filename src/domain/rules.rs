/// Movement rules: truth-table driven.
///
/// Pure functions over the tiles around the player. They encode "what is
/// legal" without performing the action; `sim::movement` applies them.
///
/// Two tile classes drive everything (see `Tile::is_empty` / `is_floor`):
///   Empty = open air, window, lattice, pillar top, unknown
///   Floor = anything standable: not Empty, wall, mirror, gate top, closed gate
///
/// ### Horizontal (Left / Right), per tile of travel
/// ┌──────────────────────┬──────────────────────────┬──────────────┐
/// │ Stride               │ Destination must be      │ Otherwise    │
/// ├──────────────────────┼──────────────────────────┼──────────────┤
/// │ Walk / Jump          │ Empty or Floor           │ bump, stop   │
/// │ RunJump, tiles 1–2   │ Floor (running approach) │ stop, silent │
/// │ RunJump, tiles 3–6   │ Empty, Floor or Mirror   │ bump, stop   │
/// └──────────────────────┴──────────────────────────┴──────────────┘
///
/// ### Careful step (destination tile decides)
/// ┌──────────────┬─────────────────────────────────────┐
/// │ Loose floor  │ drop it, stay                       │
/// │ Empty        │ hang-capable + safe, walk            │
/// │ Spikes       │ safe, walk                          │
/// │ Otherwise    │ nothing                             │
/// └──────────────┴─────────────────────────────────────┘
///
/// ### Up (climb)
/// ┌──────────────────────────────────────────────┬────────────────────┐
/// │ Condition                                    │ Result             │
/// ├──────────────────────────────────────────────┼────────────────────┤
/// │ up Empty, diagonal on facing side Floor      │ onto that diagonal │
/// │ up Floor, (upL Empty, L passable) or         │ straight up        │
/// │           (upR Empty, R passable)            │                    │
/// │ Otherwise                                    │ stay               │
/// └──────────────────────────────────────────────┴────────────────────┘
///
/// ### Down
///   Destination Empty or Floor, and at least one side Empty.
///
/// ### Ledge grab (tested on every fall tick)
///   hang-capable, current tile not Floor, and either upper diagonal Floor.
///   The player turns toward a Floor diagonal if the facing one is not.
///
/// ### Landing (rows fallen)
/// ┌──────┬──────────────┬──────────────┐
/// │ Rows │ No float     │ Floating     │
/// ├──────┼──────────────┼──────────────┤
/// │ 0    │ -            │ -            │
/// │ 1    │ soft         │ soft         │
/// │ 2    │ lose 1 life  │ soft         │
/// │ ≥ 3  │ death        │ soft         │
/// └──────┴──────────────┴──────────────┘
///   Grabbing a ledge cancels the 1- and 2-row outcomes.

use super::entity::{Facing, Stride};
use super::neighbor::{tile_toward, Direction};
use super::room::{Loc, RoomBoard, RoomGraph, TileId, COLS};
use super::tile::{Spikes, Tile};

/// The tiles around the player, resolved across room edges.
/// A missing neighbor reads as a wall.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Surroundings {
    pub here: Tile,
    pub left: Tile,
    pub right: Tile,
    pub up: Tile,
    pub down: Tile,
    pub up_left: Tile,
    pub up_right: Tile,
}

impl Surroundings {
    pub fn at(board: &RoomBoard, graph: &RoomGraph, loc: Loc) -> Self {
        let t = |dir| tile_toward(board, graph, loc, dir);
        Surroundings {
            here: board.get(loc),
            left: t(Direction::Left),
            right: t(Direction::Right),
            up: t(Direction::Up),
            down: t(Direction::Down),
            up_left: t(Direction::UpLeft),
            up_right: t(Direction::UpRight),
        }
    }

    pub fn ahead(&self, facing: Facing) -> Tile {
        match facing {
            Facing::Left => self.left,
            Facing::Right => self.right,
        }
    }

    pub fn up_ahead(&self, facing: Facing) -> Tile {
        match facing {
            Facing::Left => self.up_left,
            Facing::Right => self.up_right,
        }
    }
}

fn passable(t: Tile) -> bool {
    t.is_empty() || t.is_floor()
}

// ── Horizontal ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepCheck {
    Go,
    /// Blocked with an audible bump.
    Bump,
    /// Blocked silently (a run-up that never got going).
    Stop,
}

/// Can tile number `turn` (1-based) of a horizontal move enter `dest`?
pub fn horizontal_step(stride: Stride, turn: u32, dest: Tile) -> StepCheck {
    let ok = match stride {
        Stride::RunJump if turn <= 2 => {
            return if dest.is_floor() { StepCheck::Go } else { StepCheck::Stop };
        }
        Stride::RunJump => passable(dest) || dest == Tile::Mirror,
        Stride::Walk | Stride::Jump | Stride::Careful => passable(dest),
    };
    if ok { StepCheck::Go } else { StepCheck::Bump }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CarefulStep {
    DropLoose,
    /// Walk with spike immunity; `hang` also arms a ledge grab.
    Walk { hang: bool },
    Nothing,
}

pub fn careful_step(dest: Tile) -> CarefulStep {
    match dest {
        Tile::LooseFloor => CarefulStep::DropLoose,
        Tile::Empty => CarefulStep::Walk { hang: true },
        Tile::Spikes(Spikes::Extended) => CarefulStep::Walk { hang: false },
        _ => CarefulStep::Nothing,
    }
}

// ── Vertical ──

/// Where an up command climbs to, if anywhere.
pub fn climb(s: &Surroundings, facing: Facing) -> Option<Direction> {
    if s.up.is_empty() && s.up_ahead(facing).is_floor() {
        return Some(match facing {
            Facing::Left => Direction::UpLeft,
            Facing::Right => Direction::UpRight,
        });
    }
    let side_open = (s.up_left.is_empty() && passable(s.left))
        || (s.up_right.is_empty() && passable(s.right));
    if s.up.is_floor() && side_open {
        return Some(Direction::Up);
    }
    None
}

/// The loose floor an up command shakes loose: straight up first, then the
/// facing diagonal, then the other one.
pub fn loose_overhead(s: &Surroundings, facing: Facing) -> Option<Direction> {
    let (ahead, behind) = match facing {
        Facing::Left => ((s.up_left, Direction::UpLeft), (s.up_right, Direction::UpRight)),
        Facing::Right => ((s.up_right, Direction::UpRight), (s.up_left, Direction::UpLeft)),
    };
    [(s.up, Direction::Up), ahead, behind]
        .into_iter()
        .find(|(t, _)| t.is_loose())
        .map(|(_, d)| d)
}

pub fn can_descend(s: &Surroundings) -> bool {
    passable(s.down) && (s.left.is_empty() || s.right.is_empty())
}

/// Ledge grab during a fall. Returns the facing to hang with.
pub fn ledge_grab(s: &Surroundings, facing: Facing, can_grab: bool) -> Option<Facing> {
    if !can_grab || s.here.is_floor() {
        return None;
    }
    match (s.up_left.is_floor(), s.up_right.is_floor()) {
        (false, false) => None,
        (true, false) => Some(Facing::Left),
        (false, true) => Some(Facing::Right),
        (true, true) => Some(facing),
    }
}

// ── Landing ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Landing {
    None,
    Soft,
    /// One life lost.
    Hurt,
    Fatal,
}

pub fn landing(rows: u32, floating: bool, grabbed: bool) -> Landing {
    match rows {
        0 => Landing::None,
        1 | 2 if grabbed => Landing::None,
        1 => Landing::Soft,
        _ if floating => Landing::Soft,
        2 => Landing::Hurt,
        _ => Landing::Fatal,
    }
}

// ── Spikes ──

/// Is a spike at `spike` triggered by a player at `player` in the same
/// room, looking only at the rows above it? The horizontal neighbours are
/// resolved by the caller through the room graph.
pub fn spike_sees_from_above(spike: TileId, player: TileId) -> bool {
    let s = spike.get() as i16;
    let p = player.get() as i16;
    let col = spike.col();
    if s == p {
        return true;
    }
    if spike.row() == 0 {
        return false;
    }
    let straight = s - 10 == p || s - 20 == p;
    let up_left = col != 1 && (s - 11 == p || s - 21 == p);
    let up_right = col != COLS && (s - 9 == p || s - 19 == p);
    straight || up_left || up_right
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::room::test_support::{board_from, loc};
    use crate::domain::room::{RoomId, Side};

    fn around(here: char, left: char, right: char, up: char, down: char, ul: char, ur: char) -> Surroundings {
        let t = |c| Tile::from_symbol(c).unwrap();
        Surroundings {
            here: t(here),
            left: t(left),
            right: t(right),
            up: t(up),
            down: t(down),
            up_left: t(ul),
            up_right: t(ur),
        }
    }

    #[test]
    fn surroundings_read_walls_past_missing_links() {
        let board = board_from(&[["..........", "__________", "__________"]]);
        let graph = RoomGraph::new();
        let s = Surroundings::at(&board, &graph, loc(1, 1));
        assert_eq!(s.here, Tile::Empty);
        assert_eq!(s.left, Tile::Wall);
        assert_eq!(s.up, Tile::Wall);
        assert_eq!(s.up_left, Tile::Wall);
        assert_eq!(s.right, Tile::Empty);
        assert_eq!(s.down, Tile::Floor);

        let mut linked = RoomGraph::new();
        linked.set_link(RoomId::new(1).unwrap(), Side::Left, RoomId::new(1));
        let s = Surroundings::at(&board, &linked, loc(1, 1));
        assert_eq!(s.left, Tile::Empty, "room linked to itself wraps to tile 10");
    }

    #[test]
    fn horizontal_truth_table() {
        use StepCheck::*;
        let cases: &[(Stride, u32, char, StepCheck)] = &[
            (Stride::Walk, 1, '_', Go),
            (Stride::Walk, 1, '.', Go),
            (Stride::Walk, 1, '#', Bump),
            (Stride::Walk, 1, ')', Bump),
            (Stride::Walk, 1, '"', Go),
            (Stride::Walk, 1, '%', Bump),
            (Stride::Jump, 2, '.', Go),
            (Stride::Jump, 3, '(', Bump),
            (Stride::RunJump, 1, '_', Go),
            (Stride::RunJump, 1, '.', Stop),
            (Stride::RunJump, 2, '#', Stop),
            (Stride::RunJump, 3, '.', Go),
            (Stride::RunJump, 4, '%', Go),
            (Stride::RunJump, 5, '#', Bump),
        ];
        for &(stride, turn, c, want) in cases {
            let got = horizontal_step(stride, turn, Tile::from_symbol(c).unwrap());
            assert_eq!(got, want, "{stride:?} turn {turn} onto {c:?}");
        }
    }

    #[test]
    fn careful_step_table() {
        assert_eq!(careful_step(Tile::LooseFloor), CarefulStep::DropLoose);
        assert_eq!(careful_step(Tile::Empty), CarefulStep::Walk { hang: true });
        assert_eq!(careful_step(Tile::Spikes(Spikes::Extended)), CarefulStep::Walk { hang: false });
        assert_eq!(careful_step(Tile::Spikes(Spikes::Retracted)), CarefulStep::Nothing);
        assert_eq!(careful_step(Tile::Window), CarefulStep::Nothing);
        assert_eq!(careful_step(Tile::Floor), CarefulStep::Nothing);
    }

    #[test]
    fn climb_onto_facing_ledge() {
        // here, left, right, up, down, up-left, up-right
        let s = around('_', '_', '_', '.', '_', '_', '#');
        assert_eq!(climb(&s, Facing::Left), Some(Direction::UpLeft));
        assert_eq!(climb(&s, Facing::Right), None, "wall is not floor");

        let s = around('_', '_', '_', '_', '_', '.', '#');
        assert_eq!(climb(&s, Facing::Right), Some(Direction::Up));
        let s = around('_', '#', '#', '_', '_', '.', '.');
        assert_eq!(climb(&s, Facing::Right), None, "no room beside to swing up");
        let s = around('_', '_', '_', '#', '_', '.', '.');
        assert_eq!(climb(&s, Facing::Right), None);
    }

    #[test]
    fn loose_overhead_prefers_up_then_facing_side() {
        let s = around('_', '_', '_', '~', '_', '~', '~');
        assert_eq!(loose_overhead(&s, Facing::Left), Some(Direction::Up));
        let s = around('_', '_', '_', '.', '_', '~', '~');
        assert_eq!(loose_overhead(&s, Facing::Right), Some(Direction::UpRight));
        let s = around('_', '_', '_', '.', '_', '~', '_');
        assert_eq!(loose_overhead(&s, Facing::Right), Some(Direction::UpLeft));
        let s = around('_', '_', '_', '.', '_', '_', '_');
        assert_eq!(loose_overhead(&s, Facing::Right), None);
    }

    #[test]
    fn descend_needs_an_open_side() {
        assert!(can_descend(&around('_', '.', '#', '_', '_', '_', '_')));
        assert!(can_descend(&around('_', '#', '`', '_', '.', '_', '_')));
        assert!(!can_descend(&around('_', '_', '_', '_', '.', '_', '_')));
        assert!(!can_descend(&around('_', '.', '.', '_', '#', '_', '_')));
    }

    #[test]
    fn ledge_grab_turns_toward_floor() {
        let s = around('.', '.', '.', '.', '.', '_', '.');
        assert_eq!(ledge_grab(&s, Facing::Right, true), Some(Facing::Left));
        assert_eq!(ledge_grab(&s, Facing::Right, false), None);
        let s = around('.', '.', '.', '.', '.', '_', '_');
        assert_eq!(ledge_grab(&s, Facing::Right, true), Some(Facing::Right));
        let s = around('_', '.', '.', '.', '.', '_', '_');
        assert_eq!(ledge_grab(&s, Facing::Left, true), None, "already on floor");
    }

    #[test]
    fn landing_table() {
        assert_eq!(landing(0, false, false), Landing::None);
        assert_eq!(landing(1, false, false), Landing::Soft);
        assert_eq!(landing(2, false, false), Landing::Hurt);
        assert_eq!(landing(2, true, false), Landing::Soft);
        assert_eq!(landing(2, false, true), Landing::None);
        assert_eq!(landing(3, false, false), Landing::Fatal);
        assert_eq!(landing(3, false, true), Landing::Fatal);
        assert_eq!(landing(7, true, false), Landing::Soft);
    }

    #[test]
    fn spikes_see_straight_and_diagonally_up() {
        let t = |n| TileId::new(n).unwrap();
        assert!(spike_sees_from_above(t(25), t(25)));
        assert!(spike_sees_from_above(t(25), t(15)));
        assert!(spike_sees_from_above(t(25), t(5)));
        assert!(spike_sees_from_above(t(25), t(14)));
        assert!(spike_sees_from_above(t(25), t(4)));
        assert!(spike_sees_from_above(t(25), t(16)));
        assert!(spike_sees_from_above(t(25), t(6)));
        assert!(!spike_sees_from_above(t(25), t(24)), "sideways is resolved elsewhere");
        assert!(!spike_sees_from_above(t(25), t(3)));
        // Column edges do not wrap into the previous row.
        assert!(!spike_sees_from_above(t(21), t(10)));
        assert!(!spike_sees_from_above(t(30), t(21)));
        assert!(!spike_sees_from_above(t(5), t(4)));
    }
}
