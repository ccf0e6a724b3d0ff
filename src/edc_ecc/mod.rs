//! Checksums and parity embedded in raw CD sectors.

mod crc16;
pub mod ecc;
mod edc;
mod gf256;

pub use crc16::Crc16Ccitt;
pub use ecc::EccParameters;
pub use edc::Crc32Edc;
pub use gf256::Gf256Tables;
