//! Raw 2352-byte sector layout (ECMA-130 / Yellow Book, CD-ROM XA).

mod channel;
pub mod encode;

use std::fmt;

pub use channel::{check_channel, classify};

pub const RAW_SECTOR_SIZE: usize = 2352;
pub const SUBCHANNEL_SIZE: usize = 96;
pub const FULL_SECTOR_SIZE: usize = RAW_SECTOR_SIZE + SUBCHANNEL_SIZE;

pub const SYNC_PATTERN: [u8; 12] = [
    0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00,
];

pub(crate) const ADDRESS_OFFSET: usize = 0x00C;
pub(crate) const MODE_OFFSET: usize = 0x00F;
/// First byte after the header; logical ECC index 4 maps here.
pub(crate) const ECC_DATA_OFFSET: usize = 0x010;

pub(crate) const MODE0_PAYLOAD: std::ops::Range<usize> = 0x010..0x930;

pub(crate) const MODE1_EDC_OFFSET: usize = 0x810;
pub(crate) const MODE1_RESERVED: std::ops::Range<usize> = 0x814..0x81C;

pub(crate) const SUBHEADER_OFFSET: usize = 0x010;
pub(crate) const SUBHEADER_COPY_OFFSET: usize = 0x014;
pub(crate) const SUBMODE_OFFSET: usize = 0x012;
pub(crate) const SUBMODE_FORM2: u8 = 0x20;

pub(crate) const FORM1_EDC_OFFSET: usize = 0x818;
pub(crate) const FORM2_EDC_OFFSET: usize = 0x92C;

/// P and Q parity share their position in Mode 1 and Mode 2 Form 1.
pub(crate) const P_PARITY_OFFSET: usize = 0x81C;
pub(crate) const Q_PARITY_OFFSET: usize = 0x8C8;

/// Frames before LBA 0 (the 2 second pregap).
const LBA_START_OFFSET: u32 = 150;
const FRAMES_PER_SECOND: u32 = 75;

/// Minute/second/frame address of a sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorAddress {
    pub minute: u8,
    pub second: u8,
    pub frame: u8,
}

impl SectorAddress {
    pub fn from_lba(lba: u32) -> Self {
        let lba_offset = lba + LBA_START_OFFSET;

        let frame = (lba_offset % FRAMES_PER_SECOND) as u8;
        let second = ((lba_offset / FRAMES_PER_SECOND) % 60) as u8;
        let minute = ((lba_offset / FRAMES_PER_SECOND) / 60) as u8;

        Self {
            minute,
            second,
            frame,
        }
    }

    /// Decodes the 3 header bytes. Returns `None` if any byte is not BCD or
    /// a field is out of range.
    pub fn from_bcd(bcd: [u8; 3]) -> Option<Self> {
        let minute = Self::from_bcd_byte(bcd[0])?;
        let second = Self::from_bcd_byte(bcd[1])?;
        let frame = Self::from_bcd_byte(bcd[2])?;

        if second >= 60 || frame as u32 >= FRAMES_PER_SECOND {
            return None;
        }

        Some(Self {
            minute,
            second,
            frame,
        })
    }

    /// Logical block address; `None` inside the pregap before LBA 0.
    pub fn to_lba(&self) -> Option<u32> {
        let frames = (self.minute as u32 * 60 + self.second as u32) * FRAMES_PER_SECOND
            + self.frame as u32;
        frames.checked_sub(LBA_START_OFFSET)
    }

    pub fn to_bcd(&self) -> [u8; 3] {
        [
            Self::to_bcd_byte(self.minute),
            Self::to_bcd_byte(self.second),
            Self::to_bcd_byte(self.frame),
        ]
    }

    fn to_bcd_byte(value: u8) -> u8 {
        ((value / 10) << 4) | (value % 10)
    }

    fn from_bcd_byte(value: u8) -> Option<u8> {
        let high = value >> 4;
        let low = value & 0x0F;
        if high > 9 || low > 9 {
            return None;
        }
        Some(high * 10 + low)
    }
}

impl fmt::Display for SectorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.minute, self.second, self.frame)
    }
}

/// Sector format as read from the sync pattern, mode byte and submode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectorKind {
    /// No data sync; audio or garbage.
    Audio,
    Mode0,
    Mode1,
    Mode2Form1,
    Mode2Form2,
    /// Sync present but the mode byte is not 0, 1 or 2.
    Unknown(u8),
}

impl SectorKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Audio => "Audio",
            Self::Mode0 => "Mode 0",
            Self::Mode1 => "Mode 1",
            Self::Mode2Form1 => "Mode 2 Form 1",
            Self::Mode2Form2 => "Mode 2 Form 2",
            Self::Unknown(_) => "Unknown mode",
        }
    }
}
