/// Neighbor resolution across room boundaries.
///
/// Pure function of a `RoomGraph`: maps a cell and a direction to the
/// adjacent cell, following room links at board edges. `None` means there
/// is no room that way; callers treat it as solid wall.
///
/// ## Edge table
///
/// ┌──────────┬──────────────────────────┬───────────────────────────────┐
/// │ Dir      │ In-room                  │ At edge                       │
/// ├──────────┼──────────────────────────┼───────────────────────────────┤
/// │ Left     │ t-1 (col > 1)            │ link L, t+9                   │
/// │ Right    │ t+1 (col < 10)           │ link R, t-9                   │
/// │ Up       │ t-10 (row > 0)           │ link U, t+20                  │
/// │ Down     │ t+10 (row < 2)           │ link D, t-20                  │
/// │ UpLeft   │ t-11 (col > 1, row > 0)  │ col 1: link L, t-1            │
/// │          │                          │ row 0: link U, t+19           │
/// │          │                          │ t = 1: link L then U, tile 30 │
/// │ UpRight  │ t-9 (col < 10, row > 0)  │ col 10: link R, t-19          │
/// │          │                          │ row 0: link U, t+21           │
/// │          │                          │ t = 10: link R then U, tile 21│
/// └──────────┴──────────────────────────┴───────────────────────────────┘

use super::room::{Loc, RoomGraph, RoomBoard, RoomId, Side, COLS};
use super::tile::Tile;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    UpLeft,
    UpRight,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Left, Direction::Right, Direction::Up,
        Direction::Down, Direction::UpLeft, Direction::UpRight,
    ];
}

pub fn neighbor(graph: &RoomGraph, loc: Loc, dir: Direction) -> Option<Loc> {
    let t = loc.tile.get();
    let col = loc.tile.col();
    let top = loc.tile.row() == 0;
    let bottom = loc.tile.row() == 2;

    let hop = |room: RoomId, side: Side, tile: u8| -> Option<Loc> {
        let to = graph.link(room, side)?;
        Loc { room: to, tile: loc.tile }.with_tile(tile)
    };

    match dir {
        Direction::Left if col == 1 => hop(loc.room, Side::Left, t + 9),
        Direction::Left => loc.with_tile(t - 1),
        Direction::Right if col == COLS => hop(loc.room, Side::Right, t - 9),
        Direction::Right => loc.with_tile(t + 1),
        Direction::Up if top => hop(loc.room, Side::Up, t + 20),
        Direction::Up => loc.with_tile(t - 10),
        Direction::Down if bottom => hop(loc.room, Side::Down, t - 20),
        Direction::Down => loc.with_tile(t + 10),
        Direction::UpLeft => match (col == 1, top) {
            (true, true) => {
                let side_room = graph.link(loc.room, Side::Left)?;
                hop(side_room, Side::Up, 30)
            }
            (true, false) => hop(loc.room, Side::Left, t - 1),
            (false, true) => hop(loc.room, Side::Up, t + 19),
            (false, false) => loc.with_tile(t - 11),
        },
        Direction::UpRight => match (col == COLS, top) {
            (true, true) => {
                let side_room = graph.link(loc.room, Side::Right)?;
                hop(side_room, Side::Up, 21)
            }
            (true, false) => hop(loc.room, Side::Right, t - 19),
            (false, true) => hop(loc.room, Side::Up, t + 21),
            (false, false) => loc.with_tile(t - 9),
        },
    }
}

/// The tile one step away, or a wall if there is no room in that direction.
pub fn tile_toward(board: &RoomBoard, graph: &RoomGraph, loc: Loc, dir: Direction) -> Tile {
    neighbor(graph, loc, dir).map_or(Tile::Wall, |n| board.get(n))
}
