use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction letter of a translation segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

impl MoveDirection {
    pub fn as_char(self) -> char {
        match self {
            MoveDirection::Forward => 'F',
            MoveDirection::Backward => 'B',
            MoveDirection::Left => 'L',
            MoveDirection::Right => 'R',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'F' => Some(MoveDirection::Forward),
            'B' => Some(MoveDirection::Backward),
            'L' => Some(MoveDirection::Left),
            'R' => Some(MoveDirection::Right),
            _ => None,
        }
    }
}

/// Direction letter of a rotation segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnDirection {
    Left,
    Right,
}

impl TurnDirection {
    pub fn as_char(self) -> char {
        match self {
            TurnDirection::Left => 'L',
            TurnDirection::Right => 'R',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'L' => Some(TurnDirection::Left),
            'R' => Some(TurnDirection::Right),
            _ => None,
        }
    }
}

/// One LBML segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    /// `D<distance><F|B|L|R>;`
    Move {
        distance: u32,
        direction: MoveDirection,
    },
    /// `R<angle><L|R>;`
    Rotate {
        angle: u32,
        direction: TurnDirection,
    },
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Move {
                distance,
                direction,
            } => write!(f, "D{}{};", distance, direction.as_char()),
            Segment::Rotate { angle, direction } => {
                write!(f, "R{}{};", angle, direction.as_char())
            }
        }
    }
}

/// Render a sequence of segments back into one wire command.
pub fn render(segments: &[Segment]) -> String {
    segments.iter().map(Segment::to_string).collect()
}
