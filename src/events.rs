// TiltSense — Readings & Command Messages

use crate::config::DEFAULT_SPEED;

// ---------------------------------------------------------------------------
// Raw Reading (one converted sample from the analog front-end)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct RawReading(u16);

impl RawReading {
    /// Largest value a 14-bit conversion can produce.
    pub const MAX: u16 = (1 << 14) - 1;

    /// Out-of-range values are clamped to [`RawReading::MAX`].
    pub const fn new(value: u16) -> Self {
        if value > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(value)
        }
    }

    pub const fn value(self) -> u16 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Directional Command — sent to the player task via the command queue
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Center,
    Right,
}

impl Direction {
    /// Human-readable label for logging.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Left   => "tilting left",
            Self::Center => "level",
            Self::Right  => "tilting right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionalCommand {
    pub direction: Direction,
    pub speed: u8,
}

impl DirectionalCommand {
    /// Command at the fixed reference speed.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            speed: DEFAULT_SPEED,
        }
    }
}
