use serde::{Deserialize, Serialize};

/// What the player is allowed to see of a single cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Hidden,
    /// Opened safe cell with its adjacent mine count.
    Count(u8),
    /// Mine shown after the game ended.
    Mine,
    /// The mine the player stepped on.
    ExplodedMine,
}

const COUNT_CODES: [&str; 9] = ["0", "1", "2", "3", "4", "5", "6", "7", "8"];

impl Cell {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    /// Cells only ever move away from `Hidden`, and never change once shown.
    pub fn can_become(self, next: Cell) -> bool {
        self == next || self.is_hidden()
    }

    /// Wire code: `" "`, `"0"`..`"8"`, `"M"` or `"X"`.
    pub fn code(self) -> &'static str {
        match self {
            Self::Hidden => " ",
            Self::Count(n) => COUNT_CODES.get(usize::from(n)).copied().unwrap_or("?"),
            Self::Mine => "M",
            Self::ExplodedMine => "X",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            " " => Some(Self::Hidden),
            "M" => Some(Self::Mine),
            "X" => Some(Self::ExplodedMine),
            _ => COUNT_CODES
                .iter()
                .position(|&c| c == code)
                .map(|n| Self::Count(n as u8)),
        }
    }
}
