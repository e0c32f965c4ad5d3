/// Tile types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.
///
/// Every tile has a one-character symbol, used by the text level files
/// and by the terminal renderer.

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ButtonKind {
    /// Opens gates (and the level door). Letters `A`..`R`.
    Raise,
    /// Closes gates. Letters `a`..`r`.
    Drop,
}

/// Letters available per button class.
pub const BUTTON_LETTERS: u8 = 18;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Button {
    pub kind: ButtonKind,
    index: u8,
}

impl Button {
    pub fn new(kind: ButtonKind, index: u8) -> Option<Self> {
        (index < BUTTON_LETTERS).then_some(Button { kind, index })
    }

    pub fn letter(self) -> char {
        let base = match self.kind {
            ButtonKind::Raise => b'A',
            ButtonKind::Drop => b'a',
        };
        (base + self.index) as char
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'A'..='R' => Button::new(ButtonKind::Raise, c as u8 - b'A'),
            'a'..='r' => Button::new(ButtonKind::Drop, c as u8 - b'a'),
            _ => None,
        }
    }
}

/// Teleport pad: `S`..`Z` then `s`..`z`. Pads with equal ids are linked.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Pad(u8);

pub const PAD_COUNT: u8 = 16;

impl Pad {
    pub fn new(id: u8) -> Option<Self> {
        (id < PAD_COUNT).then_some(Pad(id))
    }

    pub fn letter(self) -> char {
        if self.0 < 8 {
            (b'S' + self.0) as char
        } else {
            (b's' + self.0 - 8) as char
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'S'..='Z' => Some(Pad(c as u8 - b'S')),
            's'..='z' => Some(Pad(c as u8 - b's' + 8)),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Spikes {
    Retracted,
    Extended,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GateState {
    Closed,
    Open,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Jaws {
    Open,
    Closed,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DoorSide {
    Left,
    Right,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Potion {
    Empty,
    Heal,
    Life,
    Float,
    Flip,
    Hurt,
    SpecialBlue,
}

impl Potion {
    const ALL: [Potion; 7] = [
        Potion::Empty, Potion::Heal, Potion::Life, Potion::Float,
        Potion::Flip, Potion::Hurt, Potion::SpecialBlue,
    ];

    pub fn from_index(i: u8) -> Option<Self> {
        Self::ALL.get(i as usize).copied()
    }

    fn index(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    #[default]
    Empty,
    Window,
    Floor,
    Coin,
    /// Walkable floor drawn as a wall.
    FakeWall,
    /// Walkable floor drawn as empty space.
    FakeEmpty,
    Spikes(Spikes),
    Pillar,
    PillarBottom,
    PillarTop,
    Gate(GateState),
    GateTop,
    Wall,
    Potion(Potion),
    LooseFloor,
    Mirror,
    Debris,
    Button(Button),
    Door { side: DoorSide, open: bool },
    Chomper(Jaws),
    Torch,
    Skeleton,
    Sword,
    Teleport(Pad),
    /// Right half of a teleport; leads wherever the pad to its left leads.
    TeleportExit,
    LatticeTop,
    Lattice,
    Unknown,
}

impl Tile {
    /// Open space: the player falls through it, but can walk or climb into it.
    pub fn is_empty(self) -> bool {
        matches!(
            self,
            Tile::Empty | Tile::Window | Tile::LatticeTop | Tile::PillarTop
                | Tile::Lattice | Tile::Unknown
        )
    }

    /// Something the player can stand on or walk onto.
    pub fn is_floor(self) -> bool {
        !self.is_empty()
            && !matches!(
                self,
                Tile::Wall | Tile::Mirror | Tile::GateTop | Tile::Gate(GateState::Closed)
            )
    }

    pub fn is_loose(self) -> bool {
        matches!(self, Tile::LooseFloor)
    }

    pub fn button(self) -> Option<Button> {
        match self {
            Tile::Button(b) => Some(b),
            _ => None,
        }
    }

    pub fn is_open_door(self) -> bool {
        matches!(self, Tile::Door { open: true, .. })
    }

    pub fn symbol(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Window => '`',
            Tile::Floor => '_',
            Tile::Coin => '$',
            Tile::FakeWall => '8',
            Tile::FakeEmpty => '9',
            Tile::Spikes(Spikes::Retracted) => '*',
            Tile::Spikes(Spikes::Extended) => '^',
            Tile::Pillar => '|',
            Tile::PillarBottom => ';',
            Tile::PillarTop => ':',
            Tile::Gate(GateState::Closed) => ')',
            Tile::Gate(GateState::Open) => '"',
            Tile::GateTop => '(',
            Tile::Wall => '#',
            Tile::Potion(p) => (b'0' + p.index()) as char,
            Tile::LooseFloor => '~',
            Tile::Mirror => '%',
            Tile::Debris => '-',
            Tile::Button(b) => b.letter(),
            Tile::Door { side: DoorSide::Left, open: false } => '[',
            Tile::Door { side: DoorSide::Right, open: false } => ']',
            Tile::Door { side: DoorSide::Left, open: true } => '{',
            Tile::Door { side: DoorSide::Right, open: true } => '}',
            Tile::Chomper(Jaws::Open) => '@',
            Tile::Chomper(Jaws::Closed) => '=',
            Tile::Torch => '\'',
            Tile::Skeleton => '+',
            Tile::Sword => '!',
            Tile::Teleport(pad) => pad.letter(),
            Tile::TeleportExit => ',',
            Tile::LatticeTop => '/',
            Tile::Lattice => '\\',
            Tile::Unknown => '?',
        }
    }

    pub fn from_symbol(c: char) -> Option<Tile> {
        let tile = match c {
            '.' => Tile::Empty,
            '`' => Tile::Window,
            '_' => Tile::Floor,
            '$' => Tile::Coin,
            '8' => Tile::FakeWall,
            '9' => Tile::FakeEmpty,
            '*' => Tile::Spikes(Spikes::Retracted),
            '^' => Tile::Spikes(Spikes::Extended),
            '|' => Tile::Pillar,
            ';' => Tile::PillarBottom,
            ':' => Tile::PillarTop,
            ')' => Tile::Gate(GateState::Closed),
            '"' => Tile::Gate(GateState::Open),
            '(' => Tile::GateTop,
            '#' => Tile::Wall,
            '0'..='6' => Tile::Potion(Potion::from_index(c as u8 - b'0')?),
            '~' => Tile::LooseFloor,
            '%' => Tile::Mirror,
            '-' => Tile::Debris,
            '[' => Tile::Door { side: DoorSide::Left, open: false },
            ']' => Tile::Door { side: DoorSide::Right, open: false },
            '{' => Tile::Door { side: DoorSide::Left, open: true },
            '}' => Tile::Door { side: DoorSide::Right, open: true },
            '@' => Tile::Chomper(Jaws::Open),
            '=' => Tile::Chomper(Jaws::Closed),
            '\'' => Tile::Torch,
            '+' => Tile::Skeleton,
            '!' => Tile::Sword,
            ',' => Tile::TeleportExit,
            '/' => Tile::LatticeTop,
            '\\' => Tile::Lattice,
            '?' => Tile::Unknown,
            _ => {
                if let Some(b) = Button::from_letter(c) {
                    Tile::Button(b)
                } else {
                    Tile::Teleport(Pad::from_letter(c)?)
                }
            }
        };
        Some(tile)
    }
}
