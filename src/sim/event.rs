/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and status text.

/// A sound cue. One variant per effect the sound engine can play.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Cue {
    Bump,
    GateOpen,
    GateClose,
    LevelDoorOpen,
    Coin,
    LandingSoft,
    LandingHurt,
    LandingDead,
    Scream,
    Grab,
    SpikesOut,
    SpikesDeath,
    Chomper,
    ChomperDeath,
    HitPrince,
    HitGuard,
    Drinking,
    Mirror,
    LooseWobble,
    LooseCrash,
}

/// Status-line notices.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Notice {
    CoinsRequired(u32),
    CoinsCollected { have: u32, need: u32 },
    Victory { steps: u32 },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::CoinsRequired(n) => write!(f, "Coins required to raise the exit door: {n}"),
            Notice::CoinsCollected { have, need } => write!(f, "Coins collected: {have} / {need}"),
            Notice::Victory { steps } => write!(f, "You used {steps} steps"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    Cue(Cue),
    Notice(Notice),
    PlayerDied,
    LevelEntered { level: u8 },
    CampaignComplete { steps: u32 },
}

impl From<Cue> for GameEvent {
    fn from(cue: Cue) -> Self {
        GameEvent::Cue(cue)
    }
}
