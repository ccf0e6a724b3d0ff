//! Integrity checks for raw CD sectors.
//!
//! A 2352-byte sector is verified against its EDC and P/Q parity according
//! to its mode; a 2448-byte sector additionally has the CRCs of its Q
//! subchannel and CD-Text packs checked. The result is always a
//! [`SectorVerdict`]; nothing is corrected.
//!
//! ```
//! use rawcheck::{check_sector, SectorVerdict};
//!
//! let audio = vec![0x55u8; 2352];
//! assert_eq!(check_sector(&audio), SectorVerdict::Indeterminate);
//! ```

mod check;
pub mod edc_ecc;
pub mod io;
pub mod observer;
pub mod parallel;
pub mod report;
pub mod sector;
pub mod subchannel;
mod verdict;

pub use check::{check_sector, check_sector_with};
pub use observer::{LogObserver, NoopObserver, SectorEvent, SectorObserver};
pub use sector::{SectorAddress, SectorKind};
pub use verdict::SectorVerdict;
