// CRC-16/CCITT as used by the Q subchannel and CD-Text packs: polynomial
// 0x1021, MSB first, zero seed, result inverted.

use std::sync::OnceLock;

const CCITT_POLY: u16 = 0x1021;

static CCITT_TABLE: OnceLock<[u16; 256]> = OnceLock::new();

fn init_ccitt_table() -> [u16; 256] {
    let mut table = [0u16; 256];

    for (i, entry) in table.iter_mut().enumerate() {
        let mut r = (i as u16) << 8;

        for _ in 0..8 {
            if (r & 0x8000) != 0 {
                r = (r << 1) ^ CCITT_POLY;
            } else {
                r <<= 1;
            }
        }

        *entry = r;
    }

    table
}

pub struct Crc16Ccitt;

impl Crc16Ccitt {
    pub fn compute(data: &[u8]) -> u16 {
        let table = CCITT_TABLE.get_or_init(init_ccitt_table);

        let crc = data.iter().fold(0u16, |crc, &byte| {
            (crc << 8) ^ table[((crc >> 8) as u8 ^ byte) as usize]
        });

        !crc
    }

    /// Compares the CRC of `data` with the big-endian value in `stored`.
    pub fn matches(data: &[u8], stored: [u8; 2]) -> bool {
        Self::compute(data) == u16::from_be_bytes(stored)
    }
}
