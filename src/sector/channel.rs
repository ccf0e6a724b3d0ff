// Classification and verification of the 2352-byte main channel.

use super::*;
use crate::edc_ecc::{ecc, Crc32Edc, EccParameters};
use crate::observer::{Parity, SectorEvent, SectorObserver};
use crate::verdict::SectorVerdict;

type Channel = [u8; RAW_SECTOR_SIZE];

fn read_quad(channel: &Channel, offset: usize) -> [u8; 4] {
    [
        channel[offset],
        channel[offset + 1],
        channel[offset + 2],
        channel[offset + 3],
    ]
}

fn kind_of(channel: &Channel) -> SectorKind {
    if channel[..SYNC_PATTERN.len()] != SYNC_PATTERN {
        return SectorKind::Audio;
    }

    match channel[MODE_OFFSET] {
        0 => SectorKind::Mode0,
        1 => SectorKind::Mode1,
        2 if channel[SUBMODE_OFFSET] & SUBMODE_FORM2 != 0 => SectorKind::Mode2Form2,
        2 => SectorKind::Mode2Form1,
        mode => SectorKind::Unknown(mode),
    }
}

/// Reads the sector kind of a raw channel buffer.
///
/// Returns `None` when the buffer is not exactly 2352 bytes.
pub fn classify(channel: &[u8]) -> Option<SectorKind> {
    let channel: &Channel = channel.try_into().ok()?;
    Some(kind_of(channel))
}

/// Verifies a 2352-byte channel buffer against its own EDC and ECC.
pub fn check_channel<O>(channel: &[u8], observer: &O) -> SectorVerdict
where
    O: SectorObserver + ?Sized,
{
    let channel: &Channel = match channel.try_into() {
        Ok(channel) => channel,
        Err(_) => {
            observer.observe(&SectorEvent::UnsupportedLength { len: channel.len() });
            return SectorVerdict::Indeterminate;
        }
    };

    let kind = kind_of(channel);
    if kind == SectorKind::Audio {
        observer.observe(&SectorEvent::SyncMissing);
        return SectorVerdict::Indeterminate;
    }

    observer.observe(&SectorEvent::Classified {
        address: [
            channel[ADDRESS_OFFSET],
            channel[ADDRESS_OFFSET + 1],
            channel[ADDRESS_OFFSET + 2],
        ],
        kind,
    });

    match kind {
        SectorKind::Audio | SectorKind::Unknown(_) => SectorVerdict::Indeterminate,
        SectorKind::Mode0 => check_mode0(channel, observer),
        SectorKind::Mode1 => check_mode1(channel, observer),
        SectorKind::Mode2Form1 => check_mode2_form1(channel, observer),
        SectorKind::Mode2Form2 => check_mode2_form2(channel, observer),
    }
}

fn check_mode0<O: SectorObserver + ?Sized>(channel: &Channel, observer: &O) -> SectorVerdict {
    match channel[MODE0_PAYLOAD].iter().position(|&b| b != 0) {
        Some(position) => {
            observer.observe(&SectorEvent::Mode0PayloadNotZero {
                offset: MODE0_PAYLOAD.start + position,
            });
            SectorVerdict::Invalid
        }
        None => SectorVerdict::Valid,
    }
}

fn check_mode1<O: SectorObserver + ?Sized>(channel: &Channel, observer: &O) -> SectorVerdict {
    if channel[MODE1_RESERVED].iter().any(|&b| b != 0) {
        observer.observe(&SectorEvent::ReservedNotZero);
        return SectorVerdict::Invalid;
    }

    let address = read_quad(channel, ADDRESS_OFFSET);
    if !check_ecc(&address, channel, observer) {
        return SectorVerdict::Invalid;
    }

    let edc_ok = check_edc(
        &channel[..MODE1_EDC_OFFSET],
        &read_quad(channel, MODE1_EDC_OFFSET),
        observer,
    );
    SectorVerdict::from_check(edc_ok)
}

fn check_mode2_form1<O: SectorObserver + ?Sized>(
    channel: &Channel,
    observer: &O,
) -> SectorVerdict {
    check_subheader_copies(channel, observer);

    // Form 1 parity is computed with the header zeroed.
    if !check_ecc(&[0; 4], channel, observer) {
        return SectorVerdict::Invalid;
    }

    let edc_ok = check_edc(
        &channel[SUBHEADER_OFFSET..FORM1_EDC_OFFSET],
        &read_quad(channel, FORM1_EDC_OFFSET),
        observer,
    );
    SectorVerdict::from_check(edc_ok)
}

fn check_mode2_form2<O: SectorObserver + ?Sized>(
    channel: &Channel,
    observer: &O,
) -> SectorVerdict {
    check_subheader_copies(channel, observer);

    let stored = read_quad(channel, FORM2_EDC_OFFSET);
    if stored == [0; 4] {
        // Some mastering tools leave the Form 2 EDC empty.
        observer.observe(&SectorEvent::Form2EdcAbsent);
        return SectorVerdict::Valid;
    }

    let edc_ok = check_edc(
        &channel[SUBHEADER_OFFSET..FORM2_EDC_OFFSET],
        &stored,
        observer,
    );
    SectorVerdict::from_check(edc_ok)
}

/// Reports differing subheader copies. Never fails the sector.
fn check_subheader_copies<O: SectorObserver + ?Sized>(channel: &Channel, observer: &O) {
    let first = read_quad(channel, SUBHEADER_OFFSET);
    let second = read_quad(channel, SUBHEADER_COPY_OFFSET);

    if first != second {
        observer.observe(&SectorEvent::SubheaderMismatch { first, second });
    }
}

fn check_ecc<O: SectorObserver + ?Sized>(
    address: &[u8; 4],
    channel: &Channel,
    observer: &O,
) -> bool {
    let data = &channel[ECC_DATA_OFFSET..];

    let passes = [
        (Parity::P, EccParameters::P, P_PARITY_OFFSET),
        (Parity::Q, EccParameters::Q, Q_PARITY_OFFSET),
    ];

    for (parity, params, offset) in passes {
        let stored = &channel[offset..offset + params.parity_len()];
        if !ecc::verify(address, data, &params, stored) {
            observer.observe(&SectorEvent::EccMismatch { parity });
            return false;
        }
    }

    true
}

fn check_edc<O: SectorObserver + ?Sized>(data: &[u8], stored: &[u8; 4], observer: &O) -> bool {
    let computed = Crc32Edc::compute(data);
    let stored = u32::from_le_bytes(*stored);

    if computed != stored {
        observer.observe(&SectorEvent::EdcMismatch { stored, computed });
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use std::cell::RefCell;

    fn synced(mode: u8) -> Vec<u8> {
        let mut channel = vec![0u8; RAW_SECTOR_SIZE];
        channel[..12].copy_from_slice(&SYNC_PATTERN);
        channel[ADDRESS_OFFSET..ADDRESS_OFFSET + 3].copy_from_slice(&[0x00, 0x02, 0x00]);
        channel[MODE_OFFSET] = mode;
        channel
    }

    #[test]
    fn test_classify_modes() {
        assert_eq!(classify(&vec![0u8; RAW_SECTOR_SIZE]), Some(SectorKind::Audio));
        assert_eq!(classify(&synced(0)), Some(SectorKind::Mode0));
        assert_eq!(classify(&synced(1)), Some(SectorKind::Mode1));
        assert_eq!(classify(&synced(2)), Some(SectorKind::Mode2Form1));
        assert_eq!(classify(&synced(7)), Some(SectorKind::Unknown(7)));

        let mut form2 = synced(2);
        form2[SUBMODE_OFFSET] = 0x20;
        assert_eq!(classify(&form2), Some(SectorKind::Mode2Form2));

        assert_eq!(classify(&[0u8; 16]), None);
    }

    #[test]
    fn test_mode0_reports_first_non_zero_byte() {
        let mut channel = synced(0);
        channel[0x123] = 0x80;

        let seen = RefCell::new(Vec::new());
        let observer = |event: &SectorEvent| seen.borrow_mut().push(event.clone());

        assert_eq!(check_channel(&channel, &observer), SectorVerdict::Invalid);
        assert!(seen
            .borrow()
            .contains(&SectorEvent::Mode0PayloadNotZero { offset: 0x123 }));
    }

    #[test]
    fn test_mode1_reserved_bytes_checked_first() {
        let mut channel = synced(1);
        channel[MODE1_RESERVED.start] = 1;

        let seen = RefCell::new(Vec::new());
        let observer = |event: &SectorEvent| seen.borrow_mut().push(event.clone());

        assert_eq!(check_channel(&channel, &observer), SectorVerdict::Invalid);
        assert_eq!(seen.borrow().last(), Some(&SectorEvent::ReservedNotZero));
    }

    #[test]
    fn test_unknown_mode_is_indeterminate() {
        assert_eq!(
            check_channel(&synced(3), &NoopObserver),
            SectorVerdict::Indeterminate
        );
    }

    #[test]
    fn test_wrong_length_is_indeterminate() {
        assert_eq!(
            check_channel(&[0u8; 2351], &NoopObserver),
            SectorVerdict::Indeterminate
        );
    }

    #[test]
    fn test_form2_without_edc_is_valid() {
        let mut channel = synced(2);
        channel[SUBMODE_OFFSET] = 0x20;
        channel[SUBHEADER_COPY_OFFSET + 2] = 0x20;
        channel[0x100] = 0xAB;

        assert_eq!(check_channel(&channel, &NoopObserver), SectorVerdict::Valid);
    }

    #[test]
    fn test_subheader_mismatch_is_reported_not_fatal() {
        let mut channel = synced(2);
        channel[SUBHEADER_COPY_OFFSET] = 0x01;
        let channel: &mut Channel = channel.as_mut_slice().try_into().unwrap();
        encode::write_mode2_form1_edc_ecc(channel);

        let seen = RefCell::new(Vec::new());
        let observer = |event: &SectorEvent| seen.borrow_mut().push(event.clone());

        assert_eq!(check_channel(channel, &observer), SectorVerdict::Valid);
        assert!(seen.borrow().iter().any(|event| matches!(
            event,
            SectorEvent::SubheaderMismatch { .. }
        )));
    }
}
