/// Raw level record layout inside the archive.
///
/// A record is a strict concatenation of fixed-size fields. This module
/// only slices bytes; interpretation lives in `decode`.

use thiserror::Error;

use crate::domain::room::{ROOMS, TILES};

/// Number of records in the archive (0 = demo, 15 = potions level).
pub const RECORD_COUNT: u8 = 16;

const FIRST_RECORD: usize = 0x0006;
const RECORD_STRIDE: usize = 0x0902;

const CELLS: usize = ROOMS as usize * TILES as usize;
const EVENTS: usize = 256;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("level {level}: record needs {needed} bytes at offset {offset:#06x}, only {available} available")]
    Truncated { level: u8, offset: usize, needed: usize, available: usize },
    #[error("no level record {0} in the archive (valid: 0-15)")]
    NoSuchRecord(u8),
}

/// Borrowed view of one record's fields.
#[derive(Debug)]
pub struct LevelRecord<'a> {
    pub level: u8,
    pub checksum: u8,
    pub groups: &'a [u8],
    pub variants: &'a [u8],
    pub first_events: &'a [u8],
    pub second_events: &'a [u8],
    pub links: &'a [u8],
    pub start: &'a [u8],
    pub guard_locations: &'a [u8],
    pub guard_directions: &'a [u8],
    pub guard_skills: &'a [u8],
    pub guard_colors: &'a [u8],
    pub end_marker: &'a [u8],
}

/// Field sizes in file order. `None` marks reserved blocks that are skipped.
fn layout(level: u8) -> [(Option<Field>, usize); 17] {
    // The potions level carries one byte less in its second reserved block.
    let reserved_2 = if level == 15 { 3 } else { 4 };
    [
        (Some(Field::Checksum), 1),
        (Some(Field::Groups), CELLS),
        (Some(Field::Variants), CELLS),
        (Some(Field::FirstEvents), EVENTS),
        (Some(Field::SecondEvents), EVENTS),
        (Some(Field::Links), ROOMS as usize * 4),
        (None, 64),
        (Some(Field::Start), 3),
        (None, reserved_2),
        (Some(Field::GuardLocations), ROOMS as usize),
        (Some(Field::GuardDirections), ROOMS as usize),
        (None, 48),
        (Some(Field::GuardSkills), ROOMS as usize),
        (None, 24),
        (Some(Field::GuardColors), ROOMS as usize),
        (None, 16),
        (Some(Field::EndMarker), 2),
    ]
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Field {
    Checksum,
    Groups,
    Variants,
    FirstEvents,
    SecondEvents,
    Links,
    Start,
    GuardLocations,
    GuardDirections,
    GuardSkills,
    GuardColors,
    EndMarker,
}

pub fn record_len(level: u8) -> usize {
    layout(level).iter().map(|(_, n)| n).sum()
}

pub fn record_offset(level: u8) -> usize {
    FIRST_RECORD + level as usize * RECORD_STRIDE
}

/// Slice one record out of a whole archive.
pub fn archive_record(archive: &[u8], level: u8) -> Result<LevelRecord<'_>, FormatError> {
    if level >= RECORD_COUNT {
        return Err(FormatError::NoSuchRecord(level));
    }
    let offset = record_offset(level);
    let tail = archive.get(offset..).unwrap_or(&[]);
    parse_record(tail, level).map_err(|e| match e {
        FormatError::Truncated { level, needed, available, .. } => {
            FormatError::Truncated { level, offset, needed, available }
        }
        other => other,
    })
}

/// Split raw record bytes (starting at the checksum) into fields.
/// Extra trailing bytes are ignored.
pub fn parse_record(bytes: &[u8], level: u8) -> Result<LevelRecord<'_>, FormatError> {
    let needed = record_len(level);
    if bytes.len() < needed {
        return Err(FormatError::Truncated { level, offset: 0, needed, available: bytes.len() });
    }

    let mut rec = LevelRecord {
        level,
        checksum: bytes[0],
        groups: &[],
        variants: &[],
        first_events: &[],
        second_events: &[],
        links: &[],
        start: &[],
        guard_locations: &[],
        guard_directions: &[],
        guard_skills: &[],
        guard_colors: &[],
        end_marker: &[],
    };

    let mut pos = 0;
    for (field, len) in layout(level) {
        let slice = &bytes[pos..pos + len];
        pos += len;
        match field {
            Some(Field::Checksum) | None => {}
            Some(Field::Groups) => rec.groups = slice,
            Some(Field::Variants) => rec.variants = slice,
            Some(Field::FirstEvents) => rec.first_events = slice,
            Some(Field::SecondEvents) => rec.second_events = slice,
            Some(Field::Links) => rec.links = slice,
            Some(Field::Start) => rec.start = slice,
            Some(Field::GuardLocations) => rec.guard_locations = slice,
            Some(Field::GuardDirections) => rec.guard_directions = slice,
            Some(Field::GuardSkills) => rec.guard_skills = slice,
            Some(Field::GuardColors) => rec.guard_colors = slice,
            Some(Field::EndMarker) => rec.end_marker = slice,
        }
    }
    Ok(rec)
}
