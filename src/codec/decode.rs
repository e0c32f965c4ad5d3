/// Level decoder: packed archive record → `LevelData`.
///
/// Tile symbols come from a fixed (group, variant) table. Group bytes are
/// reduced into 0..=32 by repeated subtraction, except the "stuck loose
/// floor" sentinel 43. Unknown pairs decode to `Tile::Unknown` and are
/// reported; group 31 is a deliberate blank and is not.
///
/// Buttons get letters in room-then-tile scan order: raise buttons take
/// `A`.., drop buttons take `a`.., 18 of each. A button's variant is the
/// index of the first event slot of its chain.
///
/// All recoverable problems are returned as `FormatWarning`s (and logged);
/// only a truncated record is fatal.

use thiserror::Error;
use tracing::warn;

use super::bits::EventRecord;
use super::record::{archive_record, parse_record, FormatError, LevelRecord};
use crate::domain::entity::GuardKind;
use crate::domain::events::EventGraph;
use crate::domain::level::{GuardSeed, LevelData};
use crate::domain::room::{Loc, RoomBoard, RoomGraph, RoomId, Side, TileId, ROOMS, TILES};
use crate::domain::tile::{
    Button, ButtonKind, DoorSide, GateState, Jaws, Pad, Potion, Spikes, Tile, BUTTON_LETTERS,
};

const STUCK_LOOSE: u8 = 43;
const SILENT_BLANK: u8 = 31;
const NO_GUARD: u8 = 31;
const BOSS_LEVEL: u8 = 13;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatWarning {
    #[error("level {level}: unknown tile in room {room}, tile {tile} (group {group}, variant {variant})")]
    UnknownTile { level: u8, room: u8, tile: u8, group: u8, variant: u8 },
    #[error("level {level}: converted loose floor into floor at {loc}")]
    LooseFloorAsFloor { level: u8, loc: Loc },
    #[error("level {level}: converted chomper into pillar at {loc}")]
    ChomperAsPillar { level: u8, loc: Loc },
    #[error("level {level}: fixed {side:?} link {value} in room {room}")]
    FixedLink { level: u8, room: u8, side: Side, value: u8 },
    #[error("level {level}: too many {kind:?} buttons, {loc} left unknown")]
    ButtonOverflow { level: u8, kind: ButtonKind, loc: Loc },
    #[error("level {level}: button {letter} targets room {room}, tile {tile}, which is off the board")]
    TargetOffBoard { level: u8, letter: char, room: u8, tile: u8 },
    #[error("level {level}: guard in room {room} has unknown skill {skill}, treated as easy")]
    UnknownSkill { level: u8, room: u8, skill: u8 },
    #[error("level {level}: guard in room {room} stands on tile {tile}, which is off the board")]
    GuardOffBoard { level: u8, room: u8, tile: u16 },
    #[error("level {level}: start at room {room}, tile {tile} is off the board, using 0101")]
    StartOffBoard { level: u8, room: u8, tile: u16 },
}

#[derive(Debug, Clone)]
pub struct DecodedLevel {
    pub level: u8,
    pub data: LevelData,
    pub warnings: Vec<FormatWarning>,
}

/// Decode record `level` from a whole archive.
pub fn decode_archive_level(archive: &[u8], level: u8) -> Result<DecodedLevel, FormatError> {
    let rec = archive_record(archive, level)?;
    Ok(LevelDecoder::new(level).decode(&rec))
}

/// Decode raw record bytes (starting at the checksum).
pub fn decode_level(bytes: &[u8], level: u8) -> Result<DecodedLevel, FormatError> {
    let rec = parse_record(bytes, level)?;
    Ok(LevelDecoder::new(level).decode(&rec))
}

/// What a (group, variant) pair stands for before coordinates are known.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Glyph {
    Tile(Tile),
    Button(ButtonKind),
    Unknown,
}

/// Collapse a raw group byte into the table's range.
pub fn reduce_group(raw: u8) -> u8 {
    if raw == STUCK_LOOSE {
        return raw;
    }
    let mut g = raw;
    while g > 32 {
        g -= 32;
    }
    g
}

/// The fixed symbol table. `group` must already be reduced.
pub fn glyph(group: u8, variant: u8) -> Glyph {
    let tile = match (group, variant) {
        (0 | 32, 0..=2 | 255) => Tile::Empty,
        (0 | 32, 3) => Tile::Window,
        (1, 0..=3 | 255) => Tile::Floor,
        (1, 4) => Tile::Coin,
        (1, 5 | 13) => Tile::FakeWall,
        (1, 6 | 14) => Tile::FakeEmpty,
        (2, 0) => Tile::Spikes(Spikes::Retracted),
        (2, 1..=4) => Tile::Spikes(Spikes::Extended),
        (2, 5..=9) => Tile::Floor,
        (3, 0) => Tile::Pillar,
        (4, 0 | 2) => Tile::Gate(GateState::Closed),
        (4, 1) => Tile::Gate(GateState::Open),
        (5, 0) => Tile::Floor,
        (6, _) => return Glyph::Button(ButtonKind::Drop),
        (7, 0..=3) => Tile::Wall,
        (8, 0) => Tile::PillarBottom,
        (9, 0) => Tile::PillarTop,
        (10, 0..=6) => match Potion::from_index(variant) {
            Some(p) => Tile::Potion(p),
            None => return Glyph::Unknown,
        },
        (11, 0) => Tile::LooseFloor,
        (12, 0..=7) => Tile::GateTop,
        (13, 0) => Tile::Mirror,
        (14, 0) => Tile::Debris,
        (15, _) => return Glyph::Button(ButtonKind::Raise),
        (16, 0) => Tile::Door { side: DoorSide::Left, open: false },
        (17, 0) => Tile::Door { side: DoorSide::Right, open: false },
        (18, 0) => Tile::Chomper(Jaws::Open),
        (18, 1 | 3..=5) => Tile::Floor,
        (18, 2) => Tile::Wall,
        (19, 0) => Tile::Torch,
        (20, 0 | 1) => Tile::Wall,
        (21, 0) => Tile::Skeleton,
        (22, 0) => Tile::Sword,
        (23, 0) => Tile::Floor,
        (23, 1..=16) => match Pad::new(variant - 1) {
            Some(pad) => Tile::Teleport(pad),
            None => return Glyph::Unknown,
        },
        (24, 0) => Tile::Floor,
        (24, 1) => Tile::TeleportExit,
        (25, 0) => Tile::Pillar,
        (26, 0) => Tile::LatticeTop,
        (27..=29, 0) => Tile::Lattice,
        (30, 0) => Tile::Torch,
        (STUCK_LOOSE, 0) => Tile::LooseFloor,
        _ => return Glyph::Unknown,
    };
    Glyph::Tile(tile)
}

/// Per-record decoding state: letter allocation and collected warnings.
pub struct LevelDecoder {
    level: u8,
    next_raise: u8,
    next_drop: u8,
    warnings: Vec<FormatWarning>,
}

impl LevelDecoder {
    pub fn new(level: u8) -> Self {
        LevelDecoder { level, next_raise: 0, next_drop: 0, warnings: Vec::new() }
    }

    pub fn decode(mut self, rec: &LevelRecord<'_>) -> DecodedLevel {
        let events: Vec<EventRecord> = rec
            .first_events
            .iter()
            .zip(rec.second_events)
            .map(|(&f, &s)| EventRecord::from_bytes(f, s))
            .collect();

        let (board, event_graph) = self.decode_tiles(rec, &events);
        let graph = self.decode_links(rec.links);
        let start = self.decode_start(rec.start);
        let guards = self.decode_guards(rec);

        DecodedLevel {
            level: self.level,
            data: LevelData { board, graph, events: event_graph, start, guards },
            warnings: self.warnings,
        }
    }

    fn warn(&mut self, w: FormatWarning) {
        warn!(level = self.level, "{w}");
        self.warnings.push(w);
    }

    // ── Tiles and buttons ──

    fn decode_tiles(&mut self, rec: &LevelRecord<'_>, events: &[EventRecord]) -> (RoomBoard, EventGraph) {
        let mut board = RoomBoard::new();
        let mut graph = EventGraph::new();

        for room in RoomId::all() {
            for tile in TileId::all() {
                let loc = Loc { room, tile };
                let i = (room.get() as usize - 1) * TILES as usize + (tile.get() as usize - 1);
                let group = reduce_group(rec.groups[i]);
                let variant = rec.variants[i];

                let decoded = match glyph(group, variant) {
                    Glyph::Tile(Tile::LooseFloor)
                        if group != STUCK_LOOSE && self.level == 12 && loc == FIXED_LOOSE =>
                    {
                        self.warn(FormatWarning::LooseFloorAsFloor { level: self.level, loc });
                        Tile::Floor
                    }
                    Glyph::Tile(Tile::Chomper(_)) if tile.col() == 1 => {
                        self.warn(FormatWarning::ChomperAsPillar { level: self.level, loc });
                        Tile::Pillar
                    }
                    Glyph::Tile(t) => t,
                    Glyph::Button(kind) => match self.next_button(kind) {
                        Some(button) => {
                            let chain = self.chain(events, variant as usize, button);
                            graph.bind(button, chain);
                            Tile::Button(button)
                        }
                        None => {
                            self.warn(FormatWarning::ButtonOverflow { level: self.level, kind, loc });
                            Tile::Unknown
                        }
                    },
                    Glyph::Unknown => {
                        if group != SILENT_BLANK {
                            self.warn(FormatWarning::UnknownTile {
                                level: self.level,
                                room: room.get(),
                                tile: tile.get(),
                                group,
                                variant,
                            });
                        }
                        Tile::Unknown
                    }
                };
                board.set(loc, decoded);
            }
        }
        (board, graph)
    }

    fn next_button(&mut self, kind: ButtonKind) -> Option<Button> {
        let next = match kind {
            ButtonKind::Raise => &mut self.next_raise,
            ButtonKind::Drop => &mut self.next_drop,
        };
        if *next >= BUTTON_LETTERS {
            return None;
        }
        let b = Button::new(kind, *next);
        *next += 1;
        b
    }

    /// Follow the continuation bits from `slot`, never past the last slot.
    fn chain(&mut self, events: &[EventRecord], slot: usize, button: Button) -> Vec<Loc> {
        let mut targets = Vec::new();
        let mut i = slot;
        while let Some(ev) = events.get(i) {
            match Loc::new(ev.room, ev.tile) {
                Some(loc) => targets.push(loc),
                None => self.warn(FormatWarning::TargetOffBoard {
                    level: self.level,
                    letter: button.letter(),
                    room: ev.room,
                    tile: ev.tile,
                }),
            }
            if !ev.continues {
                break;
            }
            i += 1;
        }
        targets
    }

    // ── Room links ──

    fn decode_links(&mut self, links: &[u8]) -> RoomGraph {
        let mut graph = RoomGraph::new();
        for room in RoomId::all() {
            let base = (room.get() as usize - 1) * 4;
            for (k, side) in Side::ALL.into_iter().enumerate() {
                let value = links[base + k];
                let to = if value > ROOMS {
                    self.warn(FormatWarning::FixedLink { level: self.level, room: room.get(), side, value });
                    None
                } else {
                    RoomId::new(value)
                };
                graph.set_link(room, side, to);
            }
        }
        graph
    }

    // ── Start and guards ──

    fn decode_start(&mut self, start: &[u8]) -> Loc {
        let room = start[0];
        let tile = start[1] as u16 + 1;
        match u8::try_from(tile).ok().and_then(|t| Loc::new(room, t)) {
            Some(loc) => loc,
            None => {
                self.warn(FormatWarning::StartOffBoard { level: self.level, room, tile });
                Loc::ORIGIN
            }
        }
    }

    fn decode_guards(&mut self, rec: &LevelRecord<'_>) -> Vec<GuardSeed> {
        let mut guards = Vec::new();
        for room in RoomId::all() {
            let idx = room.get() as usize - 1;
            let tile = rec.guard_locations[idx] as u16 + 1;
            if tile == NO_GUARD as u16 {
                continue;
            }
            let Some(tile_id) = u8::try_from(tile).ok().and_then(TileId::new) else {
                self.warn(FormatWarning::GuardOffBoard { level: self.level, room: room.get(), tile });
                continue;
            };
            let kind = if self.level == BOSS_LEVEL {
                GuardKind::Boss
            } else {
                match rec.guard_skills[idx] {
                    0..=4 | 8 => GuardKind::Easy,
                    5..=7 | 9..=11 => GuardKind::Hard,
                    skill => {
                        self.warn(FormatWarning::UnknownSkill { level: self.level, room: room.get(), skill });
                        GuardKind::Easy
                    }
                }
            };
            guards.push(GuardSeed { loc: Loc { room, tile: tile_id }, kind });
        }
        guards
    }
}

/// The one shipped loose floor that must not fall (level 12).
const FIXED_LOOSE: Loc = Loc::fixed(8, 13);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::record::record_len;
    use crate::domain::room::test_support::loc;

    const GROUPS: usize = 1;
    const VARIANTS: usize = 1 + 720;
    const FIRST: usize = 1 + 1440;
    const SECOND: usize = FIRST + 256;
    const LINKS: usize = SECOND + 256;
    const START: usize = LINKS + 96 + 64;
    const GUARD_LOC: usize = START + 3 + 4;
    const GUARD_SKILL: usize = GUARD_LOC + 24 + 24 + 48;

    /// A blank record: every tile empty floor space, no links, no guards.
    fn blank_record(level: u8) -> Vec<u8> {
        let mut bytes = vec![0u8; record_len(level)];
        for b in &mut bytes[FIRST..SECOND] {
            *b = 0x80;
        }
        for b in &mut bytes[GUARD_LOC..GUARD_LOC + 24] {
            *b = 30;
        }
        bytes[START] = 1;
        bytes
    }

    fn cell(room: u8, tile: u8) -> usize {
        (room as usize - 1) * 30 + (tile as usize - 1)
    }

    fn put(bytes: &mut [u8], room: u8, tile: u8, group: u8, variant: u8) {
        bytes[GROUPS + cell(room, tile)] = group;
        bytes[VARIANTS + cell(room, tile)] = variant;
    }

    fn event(bytes: &mut [u8], slot: usize, room: u8, tile: u8, continues: bool) {
        let t = tile - 1;
        let first = ((!continues as u8) << 7) | ((room & 0b11) << 5) | (t & 0x1f);
        let second = (room >> 2) << 5;
        bytes[FIRST + slot] = first;
        bytes[SECOND + slot] = second;
    }

    #[test]
    fn symbol_table_fidelity() {
        let table: &[(u8, &[u8], char)] = &[
            (0, &[0, 1, 2, 255], '.'),
            (0, &[3], '`'),
            (32, &[0, 255], '.'),
            (32, &[3], '`'),
            (1, &[0, 1, 2, 3, 255], '_'),
            (1, &[4], '$'),
            (1, &[5, 13], '8'),
            (1, &[6, 14], '9'),
            (2, &[0], '*'),
            (2, &[1, 2, 3, 4], '^'),
            (2, &[5, 6, 7, 8, 9], '_'),
            (3, &[0], '|'),
            (4, &[0, 2], ')'),
            (4, &[1], '"'),
            (5, &[0], '_'),
            (7, &[0, 1, 2, 3], '#'),
            (8, &[0], ';'),
            (9, &[0], ':'),
            (10, &[0], '0'),
            (10, &[1], '1'),
            (10, &[2], '2'),
            (10, &[3], '3'),
            (10, &[4], '4'),
            (10, &[5], '5'),
            (10, &[6], '6'),
            (11, &[0], '~'),
            (12, &[0, 1, 2, 3, 4, 5, 6, 7], '('),
            (13, &[0], '%'),
            (14, &[0], '-'),
            (16, &[0], '['),
            (17, &[0], ']'),
            (18, &[0], '@'),
            (18, &[1, 3, 4, 5], '_'),
            (18, &[2], '#'),
            (19, &[0], '\''),
            (20, &[0, 1], '#'),
            (21, &[0], '+'),
            (22, &[0], '!'),
            (23, &[0], '_'),
            (23, &[1], 'S'),
            (23, &[8], 'Z'),
            (23, &[9], 's'),
            (23, &[16], 'z'),
            (24, &[0], '_'),
            (24, &[1], ','),
            (25, &[0], '|'),
            (26, &[0], '/'),
            (27, &[0], '\\'),
            (28, &[0], '\\'),
            (29, &[0], '\\'),
            (30, &[0], '\''),
            (43, &[0], '~'),
        ];
        for &(group, variants, symbol) in table {
            for &variant in variants {
                match glyph(group, variant) {
                    Glyph::Tile(t) => assert_eq!(
                        t.symbol(), symbol,
                        "group {group} variant {variant}"
                    ),
                    other => panic!("group {group} variant {variant} gave {other:?}"),
                }
            }
        }
        assert_eq!(glyph(6, 200), Glyph::Button(ButtonKind::Drop));
        assert_eq!(glyph(15, 0), Glyph::Button(ButtonKind::Raise));
        for (group, variant) in [(0, 4), (1, 7), (10, 7), (23, 17), (31, 0), (33, 0), (43, 1)] {
            assert_eq!(glyph(group, variant), Glyph::Unknown, "({group}, {variant})");
        }
    }

    #[test]
    fn group_reduction_keeps_stuck_loose() {
        assert_eq!(reduce_group(33), 1);
        assert_eq!(reduce_group(32), 32);
        assert_eq!(reduce_group(64), 32);
        assert_eq!(reduce_group(65), 1);
        assert_eq!(reduce_group(43), 43);
        assert_eq!(reduce_group(75), 11);
    }

    #[test]
    fn blank_record_decodes_cleanly() {
        let d = decode_level(&blank_record(1), 1).unwrap();
        assert!(d.warnings.is_empty(), "{:?}", d.warnings);
        assert_eq!(d.data.start, loc(1, 1));
        assert!(d.data.guards.is_empty());
        assert_eq!(d.data.events.len(), 0);
        assert_eq!(d.data.board.get(loc(24, 30)), Tile::Empty);
    }

    #[test]
    fn unknown_tiles_warn_except_group_31() {
        let mut bytes = blank_record(2);
        put(&mut bytes, 3, 4, 9, 9);
        put(&mut bytes, 3, 5, 31, 0);
        put(&mut bytes, 3, 6, 31 + 64, 0);
        let d = decode_level(&bytes, 2).unwrap();
        assert_eq!(d.data.board.get(loc(3, 4)), Tile::Unknown);
        assert_eq!(d.data.board.get(loc(3, 5)), Tile::Unknown);
        assert_eq!(d.data.board.get(loc(3, 6)), Tile::Unknown);
        assert_eq!(
            d.warnings,
            vec![FormatWarning::UnknownTile { level: 2, room: 3, tile: 4, group: 9, variant: 9 }]
        );
    }

    #[test]
    fn documented_corrections_are_reported() {
        let mut bytes = blank_record(12);
        put(&mut bytes, 8, 13, 11, 0);
        put(&mut bytes, 8, 14, 11, 0);
        put(&mut bytes, 2, 11, 18, 0);
        put(&mut bytes, 2, 12, 18, 0);
        let d = decode_level(&bytes, 12).unwrap();
        assert_eq!(d.data.board.get(loc(8, 13)), Tile::Floor);
        assert_eq!(d.data.board.get(loc(8, 14)), Tile::LooseFloor);
        assert_eq!(d.data.board.get(loc(2, 11)), Tile::Pillar);
        assert_eq!(d.data.board.get(loc(2, 12)), Tile::Chomper(Jaws::Open));
        assert!(d.warnings.contains(&FormatWarning::LooseFloorAsFloor { level: 12, loc: loc(8, 13) }));
        assert!(d.warnings.contains(&FormatWarning::ChomperAsPillar { level: 12, loc: loc(2, 11) }));
        assert_eq!(d.warnings.len(), 2);

        // Same coordinates on another level are left alone.
        let mut other = blank_record(5);
        put(&mut other, 8, 13, 11, 0);
        let d = decode_level(&other, 5).unwrap();
        assert_eq!(d.data.board.get(loc(8, 13)), Tile::LooseFloor);
    }

    #[test]
    fn out_of_range_links_are_clamped_and_reported() {
        let mut bytes = blank_record(1);
        bytes[LINKS] = 2; // room 1 left
        bytes[LINKS + 3] = 24; // room 1 down
        bytes[LINKS + 4 + 2] = 25; // room 2 up
        bytes[LINKS + 4 + 1] = 200; // room 2 right
        let d = decode_level(&bytes, 1).unwrap();
        let g = &d.data.graph;
        let r = |n| RoomId::new(n).unwrap();
        assert_eq!(g.link(r(1), Side::Left), Some(r(2)));
        assert_eq!(g.link(r(1), Side::Down), Some(r(24)));
        assert_eq!(g.link(r(2), Side::Up), None);
        assert_eq!(g.link(r(2), Side::Right), None);
        assert_eq!(
            d.warnings,
            vec![
                FormatWarning::FixedLink { level: 1, room: 2, side: Side::Right, value: 200 },
                FormatWarning::FixedLink { level: 1, room: 2, side: Side::Up, value: 25 },
            ]
        );
    }

    #[test]
    fn buttons_take_letters_in_scan_order_and_follow_chains() {
        let mut bytes = blank_record(3);
        put(&mut bytes, 1, 5, 15, 10); // raise, chain from slot 10
        put(&mut bytes, 2, 1, 6, 20); // drop, chain from slot 20
        put(&mut bytes, 1, 9, 15 + 32, 20); // second raise shares slot 20
        event(&mut bytes, 10, 4, 7, true);
        event(&mut bytes, 11, 23, 30, true);
        event(&mut bytes, 12, 1, 1, false);
        event(&mut bytes, 13, 9, 9, false);
        event(&mut bytes, 20, 17, 2, false);

        let d = decode_level(&bytes, 3).unwrap();
        let b = |c| Button::from_letter(c).unwrap();
        assert_eq!(d.data.board.get(loc(1, 5)), Tile::Button(b('A')));
        assert_eq!(d.data.board.get(loc(1, 9)), Tile::Button(b('B')));
        assert_eq!(d.data.board.get(loc(2, 1)), Tile::Button(b('a')));
        assert_eq!(d.data.events.targets(b('A')), &[loc(4, 7), loc(23, 30), loc(1, 1)]);
        assert_eq!(d.data.events.targets(b('B')), &[loc(17, 2)]);
        assert_eq!(d.data.events.targets(b('a')), &[loc(17, 2)]);
        assert!(d.warnings.is_empty());
    }

    #[test]
    fn chain_stops_at_last_slot() {
        let mut bytes = blank_record(3);
        put(&mut bytes, 1, 1, 15, 254);
        event(&mut bytes, 254, 2, 2, true);
        event(&mut bytes, 255, 3, 3, true);
        let d = decode_level(&bytes, 3).unwrap();
        let a = Button::from_letter('A').unwrap();
        assert_eq!(d.data.events.targets(a), &[loc(2, 2), loc(3, 3)]);
    }

    #[test]
    fn off_board_targets_are_dropped_with_warning() {
        let mut bytes = blank_record(3);
        put(&mut bytes, 1, 1, 15, 0);
        event(&mut bytes, 0, 0, 5, true); // room 0
        event(&mut bytes, 1, 25, 5, true); // room 25
        event(&mut bytes, 2, 3, 32, true); // tile 32
        event(&mut bytes, 3, 3, 30, false);
        let d = decode_level(&bytes, 3).unwrap();
        let a = Button::from_letter('A').unwrap();
        assert_eq!(d.data.events.targets(a), &[loc(3, 30)]);
        assert_eq!(d.warnings.len(), 3);
        assert!(matches!(d.warnings[0], FormatWarning::TargetOffBoard { letter: 'A', room: 0, tile: 5, .. }));
    }

    #[test]
    fn nineteenth_button_of_a_class_overflows() {
        let mut bytes = blank_record(4);
        event(&mut bytes, 0, 5, 5, false);
        for t in 1..=19 {
            put(&mut bytes, 1, t, 6, 0);
        }
        for t in 1..=18 {
            put(&mut bytes, 2, t, 15, 0);
        }
        let d = decode_level(&bytes, 4).unwrap();
        assert_eq!(d.data.board.get(loc(1, 18)).symbol(), 'r');
        assert_eq!(d.data.board.get(loc(1, 19)), Tile::Unknown);
        assert_eq!(d.data.board.get(loc(2, 18)).symbol(), 'R');
        assert_eq!(
            d.warnings,
            vec![FormatWarning::ButtonOverflow { level: 4, kind: ButtonKind::Drop, loc: loc(1, 19) }]
        );
        assert_eq!(d.data.events.len(), 36);
    }

    #[test]
    fn guards_by_skill_and_boss_level() {
        let mut bytes = blank_record(5);
        bytes[GUARD_LOC] = 4; // room 1, tile 5
        bytes[GUARD_SKILL] = 8;
        bytes[GUARD_LOC + 1] = 0; // room 2, tile 1
        bytes[GUARD_SKILL + 1] = 9;
        bytes[GUARD_LOC + 2] = 12; // room 3, tile 13
        bytes[GUARD_SKILL + 2] = 40;
        bytes[GUARD_LOC + 3] = 200; // room 4, off the board
        let d = decode_level(&bytes, 5).unwrap();
        assert_eq!(
            d.data.guards,
            vec![
                GuardSeed { loc: loc(1, 5), kind: GuardKind::Easy },
                GuardSeed { loc: loc(2, 1), kind: GuardKind::Hard },
                GuardSeed { loc: loc(3, 13), kind: GuardKind::Easy },
            ]
        );
        assert_eq!(d.warnings.len(), 2);

        let mut boss = blank_record(13);
        boss[GUARD_LOC + 23] = 0;
        boss[GUARD_SKILL + 23] = 2;
        let d = decode_level(&boss, 13).unwrap();
        assert_eq!(d.data.guards, vec![GuardSeed { loc: loc(24, 1), kind: GuardKind::Boss }]);
    }

    #[test]
    fn start_position_is_one_based() {
        let mut bytes = blank_record(1);
        bytes[START] = 7;
        bytes[START + 1] = 21;
        let d = decode_level(&bytes, 1).unwrap();
        assert_eq!(d.data.start, loc(7, 22));
    }

    #[test]
    fn truncated_record_fails() {
        let bytes = blank_record(1);
        let err = decode_level(&bytes[..bytes.len() - 1], 1).unwrap_err();
        assert!(matches!(err, FormatError::Truncated { needed: 0x0902, .. }));
    }

    #[test]
    fn potions_record_is_one_byte_shorter() {
        let bytes = blank_record(15);
        assert!(decode_level(&bytes, 15).is_ok());
        assert!(decode_level(&bytes, 14).is_err());
    }
}
