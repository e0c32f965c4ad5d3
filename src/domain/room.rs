/// Room/tile addressing and the two per-level grids.
///
/// A level is 24 rooms of 30 tiles (3 rows × 10 columns, row-major,
/// numbered from 1). `RoomId`/`TileId` can only hold valid numbers, so
/// every `Loc` addresses a real cell.

use super::tile::Tile;

pub const ROOMS: u8 = 24;
pub const TILES: u8 = 30;
pub const COLS: u8 = 10;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RoomId(u8);

impl RoomId {
    pub fn new(n: u8) -> Option<Self> {
        (1..=ROOMS).contains(&n).then_some(RoomId(n))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = RoomId> {
        (1..=ROOMS).map(RoomId)
    }

    fn index(self) -> usize {
        self.0 as usize - 1
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TileId(u8);

impl TileId {
    pub fn new(n: u8) -> Option<Self> {
        (1..=TILES).contains(&n).then_some(TileId(n))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = TileId> {
        (1..=TILES).map(TileId)
    }

    /// Row band 0..=2.
    pub fn row(self) -> u8 {
        (self.0 - 1) / COLS
    }

    /// Column 1..=10.
    pub fn col(self) -> u8 {
        (self.0 - 1) % COLS + 1
    }

    fn index(self) -> usize {
        self.0 as usize - 1
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Loc {
    pub room: RoomId,
    pub tile: TileId,
}

impl Loc {
    /// Room 1, tile 1: the fallback start position.
    pub const ORIGIN: Loc = Loc::fixed(1, 1);

    /// A location known at compile time. Out-of-range values fail the build
    /// when used in a const.
    pub const fn fixed(room: u8, tile: u8) -> Loc {
        assert!(room >= 1 && room <= ROOMS && tile >= 1 && tile <= TILES);
        Loc { room: RoomId(room), tile: TileId(tile) }
    }

    pub fn new(room: u8, tile: u8) -> Option<Self> {
        Some(Loc { room: RoomId::new(room)?, tile: TileId::new(tile)? })
    }

    /// Same room, different tile number (None if out of 1..=30).
    pub fn with_tile(self, tile: u8) -> Option<Self> {
        Some(Loc { room: self.room, tile: TileId::new(tile)? })
    }
}

impl std::fmt::Display for Loc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}{:02}", self.room.0, self.tile.0)
    }
}

// ── Room graph ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    Left,
    Right,
    Up,
    Down,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Up, Side::Down];
}

/// Per-room left/right/up/down links. Immutable once a level is loaded.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct RoomGraph {
    links: [[Option<RoomId>; 4]; ROOMS as usize],
}

impl RoomGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link(&self, room: RoomId, side: Side) -> Option<RoomId> {
        self.links[room.index()][side as usize]
    }

    pub fn set_link(&mut self, room: RoomId, side: Side, to: Option<RoomId>) {
        self.links[room.index()][side as usize] = to;
    }
}

// ── Per-tile grids ──

/// One value per (room, tile). Used for the tile board and gate timers.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TileGrid<T> {
    cells: Vec<T>,
}

impl<T: Copy + Default> TileGrid<T> {
    pub fn new() -> Self {
        TileGrid { cells: vec![T::default(); ROOMS as usize * TILES as usize] }
    }

    #[inline]
    pub fn get(&self, loc: Loc) -> T {
        self.cells[Self::offset(loc)]
    }

    #[inline]
    pub fn set(&mut self, loc: Loc, value: T) {
        self.cells[Self::offset(loc)] = value;
    }

    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    /// All cells in room-then-tile order.
    pub fn iter(&self) -> impl Iterator<Item = (Loc, T)> + '_ {
        RoomId::all()
            .flat_map(|room| TileId::all().map(move |tile| Loc { room, tile }))
            .map(|loc| (loc, self.get(loc)))
    }

    /// The 30 cells of one room, tile 1 first.
    pub fn room(&self, room: RoomId) -> &[T] {
        let start = room.index() * TILES as usize;
        &self.cells[start..start + TILES as usize]
    }

    #[inline]
    fn offset(loc: Loc) -> usize {
        loc.room.index() * TILES as usize + loc.tile.index()
    }
}

impl<T: Copy + Default> Default for TileGrid<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub type RoomBoard = TileGrid<Tile>;

impl RoomBoard {
    pub fn count(&self, pred: impl Fn(Tile) -> bool) -> usize {
        self.cells.iter().filter(|t| pred(**t)).count()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn ids_reject_out_of_range() {
        assert!(RoomId::new(0).is_none());
        assert!(RoomId::new(25).is_none());
        assert!(TileId::new(0).is_none());
        assert!(TileId::new(31).is_none());
        assert!(Loc::new(24, 30).is_some());
    }

    #[test]
    fn rows_and_columns() {
        let t = |n| TileId::new(n).unwrap();
        assert_eq!((t(1).row(), t(1).col()), (0, 1));
        assert_eq!((t(10).row(), t(10).col()), (0, 10));
        assert_eq!((t(11).row(), t(11).col()), (1, 1));
        assert_eq!((t(30).row(), t(30).col()), (2, 10));
    }

    #[test]
    fn grid_iterates_room_then_tile() {
        let board = board_from(&[
            ["$.........", "..........", "_________$"],
            ["..........", "....$.....", ".........."],
        ]);
        let coins: Vec<Loc> = board
            .iter()
            .filter(|(_, t)| *t == Tile::Coin)
            .map(|(l, _)| l)
            .collect();
        assert_eq!(coins, vec![loc(1, 1), loc(1, 30), loc(2, 15)]);
        assert_eq!(board.count(|t| t == Tile::Coin), 3);
        assert_eq!(board.room(RoomId::new(2).unwrap())[14], Tile::Coin);
    }

    #[test]
    fn loc_displays_as_room_tile_pair() {
        assert_eq!(loc(3, 7).to_string(), "0307");
    }
}
