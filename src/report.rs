use std::collections::BTreeMap;
use std::fmt;

use crate::sector::SectorKind;
use crate::verdict::SectorVerdict;

/// Tally of a whole-image verification run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationSummary {
    pub valid: usize,
    pub invalid: usize,
    pub indeterminate: usize,
    /// Sector counts keyed by kind name.
    pub kinds: BTreeMap<&'static str, usize>,
    /// Indices of invalid sectors, ascending.
    pub invalid_sectors: Vec<usize>,
}

impl VerificationSummary {
    pub fn record(&mut self, index: usize, kind: Option<SectorKind>, verdict: SectorVerdict) {
        match verdict {
            SectorVerdict::Valid => self.valid += 1,
            SectorVerdict::Invalid => {
                self.invalid += 1;
                self.invalid_sectors.push(index);
            }
            SectorVerdict::Indeterminate => self.indeterminate += 1,
        }

        if let Some(kind) = kind {
            *self.kinds.entry(kind.name()).or_default() += 1;
        }
    }

    /// Folds another partial summary into this one.
    pub fn merge(mut self, other: Self) -> Self {
        self.valid += other.valid;
        self.invalid += other.invalid;
        self.indeterminate += other.indeterminate;

        for (kind, count) in other.kinds {
            *self.kinds.entry(kind).or_default() += count;
        }

        self.invalid_sectors.extend(other.invalid_sectors);
        self.invalid_sectors.sort_unstable();
        self
    }

    pub fn total(&self) -> usize {
        self.valid + self.invalid + self.indeterminate
    }
}

impl fmt::Display for VerificationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sectors checked: {}", self.total())?;
        writeln!(f, "  valid:         {}", self.valid)?;
        writeln!(f, "  invalid:       {}", self.invalid)?;
        write!(f, "  indeterminate: {}", self.indeterminate)?;

        for (kind, count) in &self.kinds {
            write!(f, "\n  {:<14} {}", format!("{kind}:"), count)?;
        }

        Ok(())
    }
}
