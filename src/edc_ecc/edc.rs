// Sector EDC: the CRC-32 stored in the trailer of Mode 1 and Mode 2 sectors.
//
// Polynomial (x^16 + x^15 + x^2 + 1) * (x^16 + x^2 + x + 1), processed LSB
// first with a zero seed and no final XOR. This is not the zip/PNG CRC-32.

use std::sync::OnceLock;

const EDC_POLY: u32 = 0x8001801b;

static EDC_TABLE: OnceLock<[u32; 256]> = OnceLock::new();

fn mirror_bits(d: u32, bits: usize) -> u32 {
    let mut r = 0u32;
    let mut d = d;

    for _ in 0..bits {
        r = (r << 1) | (d & 0x1);
        d >>= 1;
    }

    r
}

fn init_edc_table() -> [u32; 256] {
    let mut table = [0u32; 256];

    for (i, entry) in table.iter_mut().enumerate() {
        let mut r = mirror_bits(i as u32, 8) << 24;

        for _ in 0..8 {
            if (r & 0x80000000) != 0 {
                r = (r << 1) ^ EDC_POLY;
            } else {
                r <<= 1;
            }
        }

        *entry = mirror_bits(r, 32);
    }

    table
}

/// Table-driven sector EDC.
pub struct Crc32Edc;

impl Crc32Edc {
    /// Reflected form of the generator, as it appears in the table.
    pub const POLYNOMIAL: u32 = 0xd8018001;

    fn table() -> &'static [u32; 256] {
        EDC_TABLE.get_or_init(init_edc_table)
    }

    pub fn compute(data: &[u8]) -> u32 {
        let table = Self::table();

        data.iter().fold(0u32, |crc, &byte| {
            table[((crc ^ byte as u32) & 0xff) as usize] ^ (crc >> 8)
        })
    }
}
