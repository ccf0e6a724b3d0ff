// P/Q parity of the CD-ROM product code (ECMA-130 Annex A).
//
// Both passes walk the same logical stream: the 4-byte header followed by
// the sector bytes from 0x010 onwards. P runs over 86 columns of 24 bytes,
// Q over 52 diagonals of 43 bytes.

use super::gf256::Gf256Tables;

/// Constants describing one parity pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EccParameters {
    pub major_count: usize,
    pub minor_count: usize,
    pub major_mult: usize,
    pub minor_inc: usize,
}

impl EccParameters {
    /// P parity: 86 columns of 24 bytes, 172 parity bytes.
    pub const P: Self = Self {
        major_count: 86,
        minor_count: 24,
        major_mult: 2,
        minor_inc: 86,
    };

    /// Q parity: 52 diagonals of 43 bytes, 104 parity bytes.
    pub const Q: Self = Self {
        major_count: 52,
        minor_count: 43,
        major_mult: 86,
        minor_inc: 88,
    };

    /// Length of the logical stream (address + data) covered by this pass.
    pub const fn size(&self) -> usize {
        self.major_count * self.minor_count
    }

    /// Bytes of `data` read after the 4 address bytes.
    pub const fn data_len(&self) -> usize {
        self.size() - 4
    }

    /// Number of stored parity bytes.
    pub const fn parity_len(&self) -> usize {
        self.major_count * 2
    }
}

/// Computes the two parity bytes of column `major`.
fn column_parity(
    tables: &Gf256Tables,
    address: &[u8; 4],
    data: &[u8],
    params: &EccParameters,
    major: usize,
) -> (u8, u8) {
    let size = params.size();
    let mut index = (major >> 1) * params.major_mult + (major & 1);
    let mut ecc_a = 0u8;
    let mut ecc_b = 0u8;

    for _ in 0..params.minor_count {
        let byte = if index < 4 {
            address[index]
        } else {
            data[index - 4]
        };

        index += params.minor_inc;
        if index >= size {
            index -= size;
        }

        ecc_a ^= byte;
        ecc_b ^= byte;
        ecc_a = tables.forward(ecc_a);
    }

    ecc_a = tables.backward(tables.forward(ecc_a) ^ ecc_b);
    (ecc_a, ecc_a ^ ecc_b)
}

/// Writes the parity bytes of one pass into `parity`.
///
/// `data` must hold at least [`EccParameters::data_len`] bytes and `parity`
/// at least [`EccParameters::parity_len`] bytes.
pub fn compute_parity(address: &[u8; 4], data: &[u8], params: &EccParameters, parity: &mut [u8]) {
    let tables = Gf256Tables::get();

    for major in 0..params.major_count {
        let (first, second) = column_parity(tables, address, data, params, major);
        parity[major] = first;
        parity[major + params.major_count] = second;
    }
}

/// Recomputes one parity pass and compares it against `stored_parity`.
///
/// Returns false as soon as a column disagrees, or when either slice is
/// too short for the pass.
pub fn verify(
    address: &[u8; 4],
    data: &[u8],
    params: &EccParameters,
    stored_parity: &[u8],
) -> bool {
    if data.len() < params.data_len() || stored_parity.len() < params.parity_len() {
        return false;
    }

    let tables = Gf256Tables::get();

    (0..params.major_count).all(|major| {
        let (first, second) = column_parity(tables, address, data, params, major);
        stored_parity[major] == first && stored_parity[major + params.major_count] == second
    })
}
