//! Raw P-W subchannel: de-interleaving and CRC checks.
//!
//! Each of the 96 subchannel bytes carries one bit of every channel P..W,
//! P in bit 7 down to W in bit 0. Q is rebuilt from bit 6; the low six bits
//! form the R-W symbol stream that carries CD+G and CD-Text packs.

use crate::edc_ecc::Crc16Ccitt;
use crate::observer::{SectorEvent, SectorObserver};
use crate::sector::SUBCHANNEL_SIZE;
use crate::verdict::SectorVerdict;

pub const Q_SIZE: usize = 12;
pub const CD_TEXT_PACK_SIZE: usize = 18;
pub const RW_PACK_SIZE: usize = 24;
pub const PACKS_PER_SECTOR: usize = 4;

const Q_BIT: u8 = 0x40;
const RW_MASK: u8 = 0x3F;
const CD_TEXT_ACTIVE: u8 = 0x80;

/// Type of data carried by an R-W pack, from the mode/item bits of its
/// first symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubchannelContent {
    Zero,
    LineGraphics,
    CdGraphics,
    CdExtendedGraphics,
    CdText,
    CdMidi,
    User,
    Unknown(u8),
}

impl SubchannelContent {
    pub fn from_pack_byte(byte: u8) -> Self {
        match byte {
            0x00 => Self::Zero,
            0x08 => Self::LineGraphics,
            0x09 => Self::CdGraphics,
            0x0A => Self::CdExtendedGraphics,
            0x14 => Self::CdText,
            0x24 => Self::CdMidi,
            0x38 => Self::User,
            other => Self::Unknown(other),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::LineGraphics => "line graphics",
            Self::CdGraphics => "CD+G",
            Self::CdExtendedGraphics => "CD+EG",
            Self::CdText => "CD-Text",
            Self::CdMidi => "CD+MIDI",
            Self::User => "user",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// The sub-structures carried by one 96-byte subchannel block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subchannel {
    pub q: [u8; Q_SIZE],
    pub cd_text: [[u8; CD_TEXT_PACK_SIZE]; PACKS_PER_SECTOR],
    pub rw: [[u8; RW_PACK_SIZE]; PACKS_PER_SECTOR],
}

impl Subchannel {
    pub fn deinterleave(raw: &[u8; SUBCHANNEL_SIZE]) -> Self {
        Self {
            q: Self::extract_q(raw),
            cd_text: Self::extract_cd_text(raw),
            rw: Self::extract_rw(raw),
        }
    }

    fn extract_q(raw: &[u8; SUBCHANNEL_SIZE]) -> [u8; Q_SIZE] {
        let mut q = [0u8; Q_SIZE];

        for (byte, bits) in q.iter_mut().zip(raw.chunks_exact(8)) {
            *byte = bits
                .iter()
                .fold(0u8, |acc, &b| (acc << 1) | ((b & Q_BIT) >> 6));
        }

        q
    }

    /// Packs the 6-bit R-W symbols into 8-bit bytes: every 4 symbols give 3
    /// bytes, 24 symbols give one 18-byte pack.
    fn extract_cd_text(
        raw: &[u8; SUBCHANNEL_SIZE],
    ) -> [[u8; CD_TEXT_PACK_SIZE]; PACKS_PER_SECTOR] {
        let mut packs = [[0u8; CD_TEXT_PACK_SIZE]; PACKS_PER_SECTOR];

        for (pack, symbols) in packs.iter_mut().zip(raw.chunks_exact(RW_PACK_SIZE)) {
            for (bytes, group) in pack.chunks_exact_mut(3).zip(symbols.chunks_exact(4)) {
                let s0 = group[0] & RW_MASK;
                let s1 = group[1] & RW_MASK;
                let s2 = group[2] & RW_MASK;
                let s3 = group[3] & RW_MASK;

                bytes[0] = (s0 << 2) | (s1 >> 4);
                bytes[1] = ((s1 & 0x0F) << 4) | (s2 >> 2);
                bytes[2] = ((s2 & 0x03) << 6) | s3;
            }
        }

        packs
    }

    fn extract_rw(raw: &[u8; SUBCHANNEL_SIZE]) -> [[u8; RW_PACK_SIZE]; PACKS_PER_SECTOR] {
        let mut packs = [[0u8; RW_PACK_SIZE]; PACKS_PER_SECTOR];

        for (pack, symbols) in packs.iter_mut().zip(raw.chunks_exact(RW_PACK_SIZE)) {
            for (out, &symbol) in pack.iter_mut().zip(symbols) {
                *out = symbol & RW_MASK;
            }
        }

        packs
    }

    pub fn content(&self) -> SubchannelContent {
        SubchannelContent::from_pack_byte(self.rw[0][0])
    }

    pub fn q_crc_ok(&self) -> bool {
        Crc16Ccitt::matches(&self.q[..10], [self.q[10], self.q[11]])
    }
}

/// Checks the Q CRC and the CRC of every active CD-Text pack.
///
/// Never returns `Indeterminate`; wrong-length input is `Invalid`.
pub fn check_subchannel<O>(raw: &[u8], observer: &O) -> SectorVerdict
where
    O: SectorObserver + ?Sized,
{
    let raw: &[u8; SUBCHANNEL_SIZE] = match raw.try_into() {
        Ok(raw) => raw,
        Err(_) => {
            observer.observe(&SectorEvent::UnsupportedLength { len: raw.len() });
            return SectorVerdict::Invalid;
        }
    };

    let subchannel = Subchannel::deinterleave(raw);
    observer.observe(&SectorEvent::SubchannelContent(subchannel.content()));

    let mut passed = true;

    if !subchannel.q_crc_ok() {
        observer.observe(&SectorEvent::QCrcMismatch {
            stored: u16::from_be_bytes([subchannel.q[10], subchannel.q[11]]),
            computed: Crc16Ccitt::compute(&subchannel.q[..10]),
        });
        passed = false;
    }

    for (index, pack) in subchannel.cd_text.iter().enumerate() {
        if pack[0] & CD_TEXT_ACTIVE == 0 {
            continue;
        }

        let stored = u16::from_be_bytes([pack[16], pack[17]]);
        if stored == 0 {
            observer.observe(&SectorEvent::CdTextCrcAbsent { pack: index + 1 });
            continue;
        }

        let computed = Crc16Ccitt::compute(&pack[..16]);
        if computed != stored {
            observer.observe(&SectorEvent::CdTextCrcMismatch {
                pack: index + 1,
                stored,
                computed,
            });
            passed = false;
        }
    }

    SectorVerdict::from_check(passed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;

    #[test]
    fn test_q_bit_plane_msb_first() {
        let mut raw = [0u8; SUBCHANNEL_SIZE];
        // 0b1010_0001 in the first Q byte
        raw[0] = Q_BIT;
        raw[2] = Q_BIT | 0x80;
        raw[7] = Q_BIT | 0x3F;
        // Q byte 11 = 0x01
        raw[95] = Q_BIT;

        let subchannel = Subchannel::deinterleave(&raw);
        assert_eq!(subchannel.q[0], 0xA1);
        assert_eq!(subchannel.q[11], 0x01);
        assert!(subchannel.q[1..11].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_rw_packs_keep_low_six_bits() {
        let mut raw = [0u8; SUBCHANNEL_SIZE];
        for (i, byte) in raw.iter_mut().enumerate() {
            *byte = 0xC0 | (i as u8);
        }

        let subchannel = Subchannel::deinterleave(&raw);
        assert_eq!(subchannel.rw[0][0], 0x00);
        assert_eq!(subchannel.rw[0][23], 23);
        assert_eq!(subchannel.rw[1][0], 24);
        assert_eq!(subchannel.rw[3][23], 95 & 0x3F);
    }

    #[test]
    fn test_cd_text_packs_six_bit_symbols() {
        let mut raw = [0u8; SUBCHANNEL_SIZE];
        // 0x3F 0x00 0x3F 0x00 -> 1111_1100 0000_1111 1100_0000
        raw[24] = 0x3F;
        raw[26] = 0x3F;

        let subchannel = Subchannel::deinterleave(&raw);
        assert_eq!(subchannel.cd_text[0], [0u8; CD_TEXT_PACK_SIZE]);
        assert_eq!(subchannel.cd_text[1][..3], [0xFC, 0x0F, 0xC0]);
    }

    #[test]
    fn test_content_from_first_rw_symbol() {
        let mut raw = [0u8; SUBCHANNEL_SIZE];
        raw[0] = 0x09;
        assert_eq!(
            Subchannel::deinterleave(&raw).content(),
            SubchannelContent::CdGraphics
        );

        assert_eq!(SubchannelContent::from_pack_byte(0x14), SubchannelContent::CdText);
        assert_eq!(
            SubchannelContent::from_pack_byte(0x3F),
            SubchannelContent::Unknown(0x3F)
        );
    }

    #[test]
    fn test_all_zero_subchannel_fails_q_crc() {
        let raw = [0u8; SUBCHANNEL_SIZE];
        assert_eq!(check_subchannel(&raw, &NoopObserver), SectorVerdict::Invalid);
    }

    #[test]
    fn test_wrong_length_is_invalid() {
        assert_eq!(check_subchannel(&[0u8; 95], &NoopObserver), SectorVerdict::Invalid);
    }
}
