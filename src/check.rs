use crate::observer::{NoopObserver, SectorEvent, SectorObserver};
use crate::sector::{check_channel, FULL_SECTOR_SIZE, RAW_SECTOR_SIZE};
use crate::subchannel::check_subchannel;
use crate::verdict::SectorVerdict;

/// Verifies a raw sector of 2352 bytes, or 2448 bytes with subchannel.
/// Any other length is `Indeterminate`.
pub fn check_sector(buffer: &[u8]) -> SectorVerdict {
    check_sector_with(buffer, &NoopObserver)
}

/// Same as [`check_sector`], reporting diagnostics to `observer`.
pub fn check_sector_with<O>(buffer: &[u8], observer: &O) -> SectorVerdict
where
    O: SectorObserver + ?Sized,
{
    match buffer.len() {
        RAW_SECTOR_SIZE => check_channel(buffer, observer),
        FULL_SECTOR_SIZE => {
            let (channel, subchannel) = buffer.split_at(RAW_SECTOR_SIZE);
            let channel_verdict = check_channel(channel, observer);
            let subchannel_verdict = check_subchannel(subchannel, observer);
            channel_verdict.combine(subchannel_verdict)
        }
        len => {
            observer.observe(&SectorEvent::UnsupportedLength { len });
            SectorVerdict::Indeterminate
        }
    }
}
