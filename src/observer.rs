//! Diagnostics emitted while a sector is checked.
//!
//! Verification never depends on an observer; events only describe what the
//! checker saw. Pass [`NoopObserver`] when nothing needs to be recorded.

use std::fmt;

use crate::sector::{SectorAddress, SectorKind};
use crate::subchannel::SubchannelContent;

/// Which parity pass of the product code disagreed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    P,
    Q,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectorEvent {
    /// Buffer is neither 2352 nor 2448 bytes long.
    UnsupportedLength { len: usize },
    /// No data sync pattern; usually an audio sector.
    SyncMissing,
    /// Sync found and the mode byte decoded.
    Classified {
        address: [u8; 3],
        kind: SectorKind,
    },
    /// First non-zero byte of a Mode 0 payload.
    Mode0PayloadNotZero { offset: usize },
    /// Mode 1 reserved bytes 0x814..0x81B are not zero.
    ReservedNotZero,
    EccMismatch { parity: Parity },
    EdcMismatch { stored: u32, computed: u32 },
    /// Mode 2 Form 2 sector with a zero EDC field; the check was skipped.
    Form2EdcAbsent,
    /// The two Mode 2 subheader copies differ.
    SubheaderMismatch { first: [u8; 4], second: [u8; 4] },
    SubchannelContent(SubchannelContent),
    QCrcMismatch { stored: u16, computed: u16 },
    /// Active CD-Text pack with a zero CRC field; the check was skipped.
    CdTextCrcAbsent { pack: usize },
    CdTextCrcMismatch {
        pack: usize,
        stored: u16,
        computed: u16,
    },
}

impl SectorEvent {
    /// True for events that explain a failed check.
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self,
            Self::Mode0PayloadNotZero { .. }
                | Self::ReservedNotZero
                | Self::EccMismatch { .. }
                | Self::EdcMismatch { .. }
                | Self::SubheaderMismatch { .. }
                | Self::QCrcMismatch { .. }
                | Self::CdTextCrcMismatch { .. }
        )
    }
}

impl fmt::Display for SectorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedLength { len } => write!(f, "unsupported buffer length {len}"),
            Self::SyncMissing => f.write_str("no sync pattern"),
            Self::Classified { address, kind } => match SectorAddress::from_bcd(*address) {
                Some(msf) => write!(f, "{msf} {}", kind.name()),
                None => write!(
                    f,
                    "{:02X}:{:02X}:{:02X} (not BCD) {}",
                    address[0],
                    address[1],
                    address[2],
                    kind.name()
                ),
            },
            Self::Mode0PayloadNotZero { offset } => {
                write!(f, "mode 0 payload not zero at 0x{offset:03X}")
            }
            Self::ReservedNotZero => f.write_str("mode 1 reserved bytes not zero"),
            Self::EccMismatch { parity } => write!(f, "{parity:?} parity mismatch"),
            Self::EdcMismatch { stored, computed } => write!(
                f,
                "EDC mismatch: stored 0x{stored:08X}, computed 0x{computed:08X}"
            ),
            Self::Form2EdcAbsent => f.write_str("form 2 EDC not present"),
            Self::SubheaderMismatch { first, second } => {
                write!(f, "subheader copies differ: {first:02X?} vs {second:02X?}")
            }
            Self::SubchannelContent(content) => write!(f, "subchannel content: {}", content.name()),
            Self::QCrcMismatch { stored, computed } => write!(
                f,
                "Q subchannel CRC mismatch: stored 0x{stored:04X}, computed 0x{computed:04X}"
            ),
            Self::CdTextCrcAbsent { pack } => write!(f, "CD-Text pack {pack} has no CRC"),
            Self::CdTextCrcMismatch {
                pack,
                stored,
                computed,
            } => write!(
                f,
                "CD-Text pack {pack} CRC mismatch: stored 0x{stored:04X}, computed 0x{computed:04X}"
            ),
        }
    }
}

/// Receives diagnostic events during verification.
pub trait SectorObserver {
    fn observe(&self, event: &SectorEvent);
}

impl<F> SectorObserver for F
where
    F: Fn(&SectorEvent),
{
    fn observe(&self, event: &SectorEvent) {
        self(event)
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SectorObserver for NoopObserver {
    #[inline]
    fn observe(&self, _event: &SectorEvent) {}
}

/// Forwards events to the `log` facade: mismatches at debug, the rest at trace.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SectorObserver for LogObserver {
    fn observe(&self, event: &SectorEvent) {
        if event.is_mismatch() {
            log::debug!("{event}");
        } else {
            log::trace!("{event}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_closure_observer_receives_events() {
        let seen = RefCell::new(Vec::new());
        let observer = |event: &SectorEvent| seen.borrow_mut().push(event.clone());

        observer.observe(&SectorEvent::SyncMissing);
        observer.observe(&SectorEvent::ReservedNotZero);

        assert_eq!(
            *seen.borrow(),
            vec![SectorEvent::SyncMissing, SectorEvent::ReservedNotZero]
        );
    }

    #[test]
    fn test_display_formats_address() {
        let event = SectorEvent::Classified {
            address: [0x00, 0x02, 0x16],
            kind: SectorKind::Mode1,
        };
        assert_eq!(event.to_string(), "00:02:16 Mode 1");

        let event = SectorEvent::EdcMismatch {
            stored: 0,
            computed: 0x2b6813c5,
        };
        assert_eq!(
            event.to_string(),
            "EDC mismatch: stored 0x00000000, computed 0x2B6813C5"
        );
    }

    #[test]
    fn test_mismatch_classification() {
        assert!(SectorEvent::EccMismatch { parity: Parity::Q }.is_mismatch());
        assert!(!SectorEvent::Form2EdcAbsent.is_mismatch());
        assert!(!SectorEvent::CdTextCrcAbsent { pack: 2 }.is_mismatch());
    }
}
