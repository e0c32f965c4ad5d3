/// A playable level: everything the simulation needs to (re)start it.

use super::entity::GuardKind;
use super::events::EventGraph;
use super::room::{Loc, RoomBoard, RoomGraph};

/// Guard placement as stored in level data.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GuardSeed {
    pub loc: Loc,
    pub kind: GuardKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelData {
    pub board: RoomBoard,
    pub graph: RoomGraph,
    pub events: EventGraph,
    pub start: Loc,
    pub guards: Vec<GuardSeed>,
}
