// GF(2^8) lookup tables for the CD-ROM product code.
//
// The forward table multiplies by the field generator (x * 2 mod 0x11d); the
// backward table undoes the `i ^ F[i]` step that closes each parity column.

use std::sync::OnceLock;

const GF8_PRIM_POLY: u16 = 0x11d; // x^8 + x^4 + x^3 + x^2 + 1

static TABLES: OnceLock<Gf256Tables> = OnceLock::new();

/// The two 256-entry tables used by the P/Q parity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gf256Tables {
    forward: [u8; 256],
    backward: [u8; 256],
}

impl Gf256Tables {
    /// Builds both tables. Prefer [`Gf256Tables::get`], which builds them once
    /// per process.
    pub fn build() -> Self {
        let mut forward = [0u8; 256];
        let mut backward = [0u8; 256];

        for i in 0..256u16 {
            let mut j = i << 1;
            if (i & 0x80) != 0 {
                j ^= GF8_PRIM_POLY;
            }
            let j = (j & 0xff) as u8;

            forward[i as usize] = j;
            backward[(i as u8 ^ j) as usize] = i as u8;
        }

        Self { forward, backward }
    }

    /// Shared tables, built on first use.
    pub fn get() -> &'static Self {
        TABLES.get_or_init(Self::build)
    }

    #[inline]
    pub fn forward(&self, value: u8) -> u8 {
        self.forward[value as usize]
    }

    #[inline]
    pub fn backward(&self, value: u8) -> u8 {
        self.backward[value as usize]
    }
}
