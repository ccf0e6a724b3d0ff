#![allow(dead_code)]

use rawcheck::edc_ecc::Crc16Ccitt;
use rawcheck::sector::encode::{self, USER_DATA_SIZE};
use rawcheck::sector::{SectorAddress, RAW_SECTOR_SIZE, SUBCHANNEL_SIZE};

pub fn patterned_user_data(seed: u8) -> [u8; USER_DATA_SIZE] {
    let mut data = [0u8; USER_DATA_SIZE];
    for (i, byte) in data.iter_mut().enumerate() {
        *byte = (i as u8).wrapping_mul(13).wrapping_add(seed);
    }
    data
}

pub fn mode1_sector(lba: u32) -> [u8; RAW_SECTOR_SIZE] {
    encode::mode1_from_user_data(lba, &patterned_user_data(lba as u8))
}

/// Mode 2 XA sector with both subheader copies set to `submode`.
pub fn mode2_sector(lba: u32, submode: u8) -> [u8; RAW_SECTOR_SIZE] {
    let mut sector = [0u8; RAW_SECTOR_SIZE];
    encode::write_header(&mut sector, SectorAddress::from_lba(lba), 2);

    for copy in [0x10, 0x14] {
        sector[copy..copy + 4].copy_from_slice(&[0x01, 0x00, submode, 0x00]);
    }
    for (i, byte) in sector[0x18..0x92C].iter_mut().enumerate() {
        *byte = (i as u8) ^ 0x5A;
    }

    sector
}

pub fn mode2_form1_sector(lba: u32) -> [u8; RAW_SECTOR_SIZE] {
    let mut sector = mode2_sector(lba, 0x08);
    sector[0x818..].fill(0);
    encode::write_mode2_form1_edc_ecc(&mut sector);
    sector
}

pub fn mode2_form2_sector(lba: u32) -> [u8; RAW_SECTOR_SIZE] {
    let mut sector = mode2_sector(lba, 0x28);
    encode::write_mode2_form2_edc(&mut sector);
    sector
}

/// Q channel for a data track at `lba`, with a correct CRC.
pub fn q_channel(lba: u32) -> [u8; 12] {
    let address = SectorAddress::from_lba(lba).to_bcd();

    let mut q = [0u8; 12];
    q[0] = 0x41;
    q[1] = 0x01;
    q[2] = 0x01;
    q[3..6].copy_from_slice(&address);
    q[7..10].copy_from_slice(&address);

    let crc = Crc16Ccitt::compute(&q[..10]);
    q[10..].copy_from_slice(&crc.to_be_bytes());
    q
}

/// Splits four 18-byte CD-Text packs into 96 six-bit R-W symbols.
pub fn cd_text_symbols(packs: &[[u8; 18]; 4]) -> [u8; SUBCHANNEL_SIZE] {
    let mut symbols = [0u8; SUBCHANNEL_SIZE];

    for (pack, out) in packs.iter().zip(symbols.chunks_exact_mut(24)) {
        for (bytes, group) in pack.chunks_exact(3).zip(out.chunks_exact_mut(4)) {
            group[0] = bytes[0] >> 2;
            group[1] = ((bytes[0] & 0x03) << 4) | (bytes[1] >> 4);
            group[2] = ((bytes[1] & 0x0F) << 2) | (bytes[2] >> 6);
            group[3] = bytes[2] & 0x3F;
        }
    }

    symbols
}

/// Interleaves a Q channel and an R-W symbol stream into raw subchannel bytes.
pub fn interleave(q: &[u8; 12], rw_symbols: &[u8; SUBCHANNEL_SIZE]) -> [u8; SUBCHANNEL_SIZE] {
    let mut raw = [0u8; SUBCHANNEL_SIZE];

    for (i, byte) in raw.iter_mut().enumerate() {
        let q_bit = (q[i / 8] >> (7 - i % 8)) & 0x01;
        *byte = (q_bit << 6) | (rw_symbols[i] & 0x3F);
    }

    raw
}

/// A CD-Text pack with its CRC filled in.
pub fn cd_text_pack(pack_type: u8, text: &[u8]) -> [u8; 18] {
    let mut pack = [0u8; 18];
    pack[0] = pack_type;
    pack[4..4 + text.len()].copy_from_slice(text);

    let crc = Crc16Ccitt::compute(&pack[..16]);
    pack[16..].copy_from_slice(&crc.to_be_bytes());
    pack
}

pub fn full_sector(channel: &[u8; RAW_SECTOR_SIZE], subchannel: &[u8; SUBCHANNEL_SIZE]) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(RAW_SECTOR_SIZE + SUBCHANNEL_SIZE);
    buffer.extend_from_slice(channel);
    buffer.extend_from_slice(subchannel);
    buffer
}
