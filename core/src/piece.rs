use serde::{Deserialize, Serialize};

/// Edge state of one side of a piece. Interior edges are always a
/// `TabOut`/`SocketIn` pair across the two pieces that share them; edges on
/// the puzzle boundary are `Straight`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NubState {
    #[serde(rename = "straight")]
    Straight,
    #[serde(rename = "tabOut")]
    TabOut,
    #[serde(rename = "socketIn")]
    SocketIn,
}

impl NubState {
    pub fn complement(self) -> Self {
        match self {
            NubState::Straight => NubState::Straight,
            NubState::TabOut => NubState::SocketIn,
            NubState::SocketIn => NubState::TabOut,
        }
    }

    pub fn is_tab(self) -> bool {
        self == NubState::TabOut
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PuzzlePiece {
    pub row: u32,
    pub col: u32,
    pub top: NubState,
    pub right: NubState,
    pub bottom: NubState,
    pub left: NubState,
}

impl PuzzlePiece {
    /// Edge states in traversal order: top, right, bottom, left.
    pub fn edges(&self) -> [NubState; 4] {
        [self.top, self.right, self.bottom, self.left]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complement_pairs_tab_and_socket() {
        assert_eq!(NubState::TabOut.complement(), NubState::SocketIn);
        assert_eq!(NubState::SocketIn.complement(), NubState::TabOut);
        assert_eq!(NubState::Straight.complement(), NubState::Straight);
    }

    #[test]
    fn complement_is_involutive() {
        for state in [NubState::Straight, NubState::TabOut, NubState::SocketIn] {
            assert_eq!(state.complement().complement(), state);
        }
    }
}
