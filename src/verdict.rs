use std::fmt;

/// Outcome of every sector check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectorVerdict {
    /// Stored parity and checksums match the recomputed values.
    Valid,
    /// A stored parity or checksum disagrees with the sector contents.
    Invalid,
    /// The sector could not be classified (no sync, unknown mode, wrong length).
    Indeterminate,
}

impl SectorVerdict {
    pub fn from_check(passed: bool) -> Self {
        if passed {
            Self::Valid
        } else {
            Self::Invalid
        }
    }

    /// Merges the channel and subchannel verdicts of a 2448-byte sector.
    ///
    /// Any `Invalid` wins, then any `Valid`; only two `Indeterminate`
    /// verdicts stay indeterminate.
    pub fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Self::Invalid, _) | (_, Self::Invalid) => Self::Invalid,
            (Self::Valid, _) | (_, Self::Valid) => Self::Valid,
            (Self::Indeterminate, Self::Indeterminate) => Self::Indeterminate,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Indeterminate => "indeterminate",
        }
    }
}

impl fmt::Display for SectorVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
