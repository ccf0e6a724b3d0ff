// Regenerates sync, EDC and P/Q parity of raw sectors.
//
// Only fills in the redundancy fields from the data already present; damaged
// data is never repaired.

use super::*;
use crate::edc_ecc::{ecc, Crc32Edc, EccParameters};

pub const USER_DATA_SIZE: usize = 2048;

const MODE1_DATA_OFFSET: usize = 0x010;

type Sector = [u8; RAW_SECTOR_SIZE];

/// Writes the sync pattern and the header (BCD address + mode byte).
pub fn write_header(sector: &mut Sector, address: SectorAddress, mode: u8) {
    sector[..SYNC_PATTERN.len()].copy_from_slice(&SYNC_PATTERN);
    sector[ADDRESS_OFFSET..ADDRESS_OFFSET + 3].copy_from_slice(&address.to_bcd());
    sector[MODE_OFFSET] = mode;
}

/// Computes P then Q parity over the sector. Q covers the P parity bytes, so
/// the order matters.
fn write_parity(sector: &mut Sector, address: &[u8; 4]) {
    let mut p_parity = [0u8; EccParameters::P.parity_len()];
    ecc::compute_parity(
        address,
        &sector[ECC_DATA_OFFSET..],
        &EccParameters::P,
        &mut p_parity,
    );
    sector[P_PARITY_OFFSET..P_PARITY_OFFSET + p_parity.len()].copy_from_slice(&p_parity);

    let mut q_parity = [0u8; EccParameters::Q.parity_len()];
    ecc::compute_parity(
        address,
        &sector[ECC_DATA_OFFSET..],
        &EccParameters::Q,
        &mut q_parity,
    );
    sector[Q_PARITY_OFFSET..Q_PARITY_OFFSET + q_parity.len()].copy_from_slice(&q_parity);
}

fn write_edc(sector: &mut Sector, covered: std::ops::Range<usize>) {
    let edc = Crc32Edc::compute(&sector[covered.clone()]);
    sector[covered.end..covered.end + 4].copy_from_slice(&edc.to_le_bytes());
}

/// Fills EDC, the reserved bytes and P/Q parity of a Mode 1 sector whose
/// sync, header and user data are already in place.
pub fn write_mode1_edc_ecc(sector: &mut Sector) {
    write_edc(sector, 0..MODE1_EDC_OFFSET);
    sector[MODE1_RESERVED].fill(0);

    let address = [
        sector[ADDRESS_OFFSET],
        sector[ADDRESS_OFFSET + 1],
        sector[ADDRESS_OFFSET + 2],
        sector[MODE_OFFSET],
    ];
    write_parity(sector, &address);
}

/// Fills EDC and P/Q parity of a Mode 2 Form 1 sector. The header is
/// treated as zero for parity, as the XA format requires.
pub fn write_mode2_form1_edc_ecc(sector: &mut Sector) {
    write_edc(sector, SUBHEADER_OFFSET..FORM1_EDC_OFFSET);
    write_parity(sector, &[0; 4]);
}

/// Fills the optional EDC of a Mode 2 Form 2 sector.
pub fn write_mode2_form2_edc(sector: &mut Sector) {
    write_edc(sector, SUBHEADER_OFFSET..FORM2_EDC_OFFSET);
}

/// Builds a complete Mode 1 sector for `lba` around 2048 bytes of user data.
pub fn mode1_from_user_data(lba: u32, user_data: &[u8; USER_DATA_SIZE]) -> Sector {
    let mut sector = [0u8; RAW_SECTOR_SIZE];

    write_header(&mut sector, SectorAddress::from_lba(lba), 1);
    sector[MODE1_DATA_OFFSET..MODE1_DATA_OFFSET + USER_DATA_SIZE].copy_from_slice(user_data);
    write_mode1_edc_ecc(&mut sector);

    sector
}
