/// Text level files: the human-inspectable form of a decoded level.
///
/// ## Files per level NN (in one game directory):
///   `levelNNt.txt`  tiles: per room three 10-char rows, then a blank line
///   `levelNNr.txt`  links: 24 lines of `LL RR UU DD` (00 = no link)
///   `levelNNs.txt`  starts: `P RRTT`, then `E|H|J RRTT` per guard
///   `levelNNe.txt`  events: `X RRTT RRTT ...` per button letter
///
/// Locations are always four digits: two for the room, two for the tile.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::record::FormatError;
use crate::domain::entity::GuardKind;
use crate::domain::events::EventGraph;
use crate::domain::level::{GuardSeed, LevelData};
use crate::domain::room::{Loc, RoomBoard, RoomGraph, RoomId, Side, TileId, COLS, ROOMS};
use crate::domain::tile::{Button, Tile};

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("cannot access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("{file} file, line {line}: {reason}")]
    Parse { file: LevelFile, line: usize, reason: String },
    #[error("level {0} is not available")]
    Missing(u8),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LevelFile {
    Tiles,
    Links,
    Starts,
    Events,
}

impl LevelFile {
    pub const ALL: [LevelFile; 4] =
        [LevelFile::Tiles, LevelFile::Links, LevelFile::Starts, LevelFile::Events];

    fn suffix(self) -> char {
        match self {
            LevelFile::Tiles => 't',
            LevelFile::Links => 'r',
            LevelFile::Starts => 's',
            LevelFile::Events => 'e',
        }
    }

    pub fn file_name(self, level: u8) -> String {
        format!("level{:02}{}.txt", level, self.suffix())
    }

    pub fn path(self, dir: &Path, level: u8) -> PathBuf {
        dir.join(self.file_name(level))
    }
}

impl std::fmt::Display for LevelFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LevelFile::Tiles => "tiles",
            LevelFile::Links => "links",
            LevelFile::Starts => "starts",
            LevelFile::Events => "events",
        };
        f.write_str(name)
    }
}

// ══════════════════════════════════════════════════════════════
// Writing
// ══════════════════════════════════════════════════════════════

pub fn write_level(dir: &Path, level: u8, data: &LevelData) -> Result<(), LevelError> {
    fs::create_dir_all(dir).map_err(|source| LevelError::Io { path: dir.to_path_buf(), source })?;
    for kind in LevelFile::ALL {
        let body = match kind {
            LevelFile::Tiles => render_tiles(&data.board),
            LevelFile::Links => render_links(&data.graph),
            LevelFile::Starts => render_starts(data.start, &data.guards),
            LevelFile::Events => render_events(&data.events),
        };
        let path = kind.path(dir, level);
        fs::write(&path, body).map_err(|source| LevelError::Io { path, source })?;
    }
    Ok(())
}

pub fn render_tiles(board: &RoomBoard) -> String {
    let mut out = String::with_capacity(ROOMS as usize * 34);
    for room in RoomId::all() {
        for row in board.room(room).chunks(COLS as usize) {
            out.extend(row.iter().map(|t| t.symbol()));
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

pub fn render_links(graph: &RoomGraph) -> String {
    let mut out = String::new();
    for room in RoomId::all() {
        let ids: Vec<String> = Side::ALL
            .iter()
            .map(|&side| format!("{:02}", graph.link(room, side).map_or(0, RoomId::get)))
            .collect();
        out.push_str(&ids.join(" "));
        out.push('\n');
    }
    out
}

pub fn render_starts(start: Loc, guards: &[GuardSeed]) -> String {
    let mut out = format!("P {start}\n");
    for g in guards {
        out.push_str(&format!("{} {}\n", g.kind.letter(), g.loc));
    }
    out
}

pub fn render_events(events: &EventGraph) -> String {
    let mut out = String::new();
    for (button, targets) in events.iter() {
        out.push(button.letter());
        for t in targets {
            out.push_str(&format!(" {t}"));
        }
        out.push('\n');
    }
    out
}

// ══════════════════════════════════════════════════════════════
// Reading
// ══════════════════════════════════════════════════════════════

pub fn read_level(dir: &Path, level: u8) -> Result<LevelData, LevelError> {
    let read = |kind: LevelFile| {
        let path = kind.path(dir, level);
        fs::read_to_string(&path).map_err(|source| LevelError::Io { path, source })
    };
    let tiles = read(LevelFile::Tiles)?;
    let links = read(LevelFile::Links)?;
    let starts = read(LevelFile::Starts)?;
    let events = read(LevelFile::Events)?;
    parse_level(&tiles, &links, &starts, &events)
}

pub fn parse_level(tiles: &str, links: &str, starts: &str, events: &str) -> Result<LevelData, LevelError> {
    let board = parse_tiles(tiles)?;
    let graph = parse_links(links)?;
    let (start, guards) = parse_starts(starts)?;
    let events = parse_events(events)?;
    Ok(LevelData { board, graph, events, start, guards })
}

fn parse_error(file: LevelFile, line: usize, reason: impl Into<String>) -> LevelError {
    LevelError::Parse { file, line, reason: reason.into() }
}

fn parse_tiles(text: &str) -> Result<RoomBoard, LevelError> {
    let mut board = RoomBoard::new();
    let mut lines = text.lines().enumerate();
    for room in RoomId::all() {
        for row in 0..3u8 {
            let Some((n, line)) = lines.next() else {
                return Err(parse_error(LevelFile::Tiles, text.lines().count() + 1, "unexpected end of file"));
            };
            if line.chars().count() != COLS as usize {
                return Err(parse_error(LevelFile::Tiles, n + 1, format!("expected {COLS} tiles, got {line:?}")));
            }
            for (col, ch) in line.chars().enumerate() {
                let tile = Tile::from_symbol(ch)
                    .ok_or_else(|| parse_error(LevelFile::Tiles, n + 1, format!("unknown tile {ch:?}")))?;
                let id = TileId::new(row * COLS + col as u8 + 1)
                    .ok_or_else(|| parse_error(LevelFile::Tiles, n + 1, "tile out of range"))?;
                board.set(Loc { room, tile: id }, tile);
            }
        }
        if let Some((n, line)) = lines.next() {
            if !line.is_empty() {
                return Err(parse_error(LevelFile::Tiles, n + 1, "expected a blank line between rooms"));
            }
        }
    }
    Ok(board)
}

fn parse_links(text: &str) -> Result<RoomGraph, LevelError> {
    let mut graph = RoomGraph::new();
    let mut lines = text.lines().enumerate();
    for room in RoomId::all() {
        let Some((n, line)) = lines.next() else {
            return Err(parse_error(LevelFile::Links, room.get() as usize, "missing room links"));
        };
        let values: Vec<&str> = line.split_whitespace().collect();
        if values.len() != Side::ALL.len() {
            return Err(parse_error(LevelFile::Links, n + 1, format!("expected 4 links, got {line:?}")));
        }
        for (side, value) in Side::ALL.into_iter().zip(values) {
            let id: u8 = value
                .parse()
                .ok()
                .filter(|&v| v <= ROOMS)
                .ok_or_else(|| parse_error(LevelFile::Links, n + 1, format!("bad room {value:?}")))?;
            graph.set_link(room, side, RoomId::new(id));
        }
    }
    Ok(graph)
}

/// Parse a four-digit `RRTT` location.
pub fn parse_loc(s: &str) -> Option<Loc> {
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Loc::new(s[..2].parse().ok()?, s[2..].parse().ok()?)
}

fn parse_starts(text: &str) -> Result<(Loc, Vec<GuardSeed>), LevelError> {
    let mut start = None;
    let mut guards: Vec<GuardSeed> = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let mut parts = line.split_whitespace();
        let Some(kind) = parts.next() else { continue };
        let loc = parts
            .next()
            .and_then(parse_loc)
            .ok_or_else(|| parse_error(LevelFile::Starts, n + 1, format!("bad location in {line:?}")))?;
        let kind = match kind {
            "P" => {
                start = Some(loc);
                continue;
            }
            "E" => GuardKind::Easy,
            "H" => GuardKind::Hard,
            "J" => GuardKind::Boss,
            other => {
                return Err(parse_error(LevelFile::Starts, n + 1, format!("unknown entry {other:?}")));
            }
        };
        // One guard per room: a later line replaces an earlier one.
        guards.retain(|g| g.loc.room != loc.room);
        guards.push(GuardSeed { loc, kind });
    }
    let start = start.ok_or_else(|| parse_error(LevelFile::Starts, 1, "no start position"))?;
    Ok((start, guards))
}

fn parse_events(text: &str) -> Result<EventGraph, LevelError> {
    let mut graph = EventGraph::new();
    for (n, line) in text.lines().enumerate() {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else { continue };
        let button = head
            .chars()
            .next()
            .filter(|_| head.chars().count() == 1)
            .and_then(Button::from_letter)
            .ok_or_else(|| parse_error(LevelFile::Events, n + 1, format!("bad button {head:?}")))?;
        let targets = parts
            .map(|p| parse_loc(p).ok_or_else(|| parse_error(LevelFile::Events, n + 1, format!("bad target {p:?}"))))
            .collect::<Result<Vec<_>, _>>()?;
        graph.bind(button, targets);
    }
    Ok(graph)
}
