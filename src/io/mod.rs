use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::path::Path;

use crate::sector::{
    SectorAddress, ADDRESS_OFFSET, FULL_SECTOR_SIZE, RAW_SECTOR_SIZE, SYNC_PATTERN,
};

/// Picks the sector size of a raw image from its length: 2448 when only
/// that size divides it, otherwise 2352 when it does.
pub fn detect_sector_size(file_size: usize) -> Option<usize> {
    let fits_raw = file_size % RAW_SECTOR_SIZE == 0;
    let fits_full = file_size % FULL_SECTOR_SIZE == 0;

    match (fits_raw, fits_full) {
        (false, true) => Some(FULL_SECTOR_SIZE),
        (true, _) => Some(RAW_SECTOR_SIZE),
        (false, false) => None,
    }
}

/// Read-only, memory-mapped raw image of 2352 or 2448 byte sectors.
pub struct RawImageReader {
    mmap: Mmap,
    sector_size: usize,
    total_sectors: usize,
}

impl RawImageReader {
    /// Opens `path`, detecting the sector size when `sector_size` is `None`.
    pub fn new<P: AsRef<Path>>(path: P, sector_size: Option<usize>) -> Result<Self> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open image file: {}", path.as_ref().display()))?;

        let metadata = file.metadata()?;
        let file_size = metadata.len() as usize;

        if file_size == 0 {
            anyhow::bail!("Image file is empty: {}", path.as_ref().display());
        }

        let sector_size = match sector_size {
            Some(size @ (RAW_SECTOR_SIZE | FULL_SECTOR_SIZE)) => size,
            Some(size) => anyhow::bail!(
                "Unsupported sector size {}: expected {} or {}",
                size,
                RAW_SECTOR_SIZE,
                FULL_SECTOR_SIZE
            ),
            None => detect_sector_size(file_size).with_context(|| {
                format!(
                    "Image size {} is not a multiple of {} or {}",
                    file_size, RAW_SECTOR_SIZE, FULL_SECTOR_SIZE
                )
            })?,
        };

        if file_size % sector_size != 0 {
            anyhow::bail!(
                "Invalid image size: {} is not a multiple of {}",
                file_size,
                sector_size
            );
        }

        // Safety: the map is read-only and the file is not modified while it is held.
        let mmap = unsafe {
            MmapOptions::new()
                .map(&file)
                .with_context(|| "Failed to memory-map image file")?
        };

        Ok(Self {
            mmap,
            sector_size,
            total_sectors: file_size / sector_size,
        })
    }

    pub fn sector_size(&self) -> usize {
        self.sector_size
    }

    pub fn total_sectors(&self) -> usize {
        self.total_sectors
    }

    pub fn read_sector(&self, sector_index: usize) -> Option<&[u8]> {
        if sector_index >= self.total_sectors {
            return None;
        }

        let offset = sector_index * self.sector_size;
        Some(&self.mmap[offset..offset + self.sector_size])
    }

    /// Address of a sector, taken from its own header when it carries sync
    /// and a BCD address, otherwise derived from its position in the image.
    pub fn sector_address(&self, sector_index: usize) -> Option<SectorAddress> {
        let sector = self.read_sector(sector_index)?;

        let header = if sector[..SYNC_PATTERN.len()] == SYNC_PATTERN {
            SectorAddress::from_bcd([
                sector[ADDRESS_OFFSET],
                sector[ADDRESS_OFFSET + 1],
                sector[ADDRESS_OFFSET + 2],
            ])
        } else {
            None
        };

        Some(header.unwrap_or_else(|| SectorAddress::from_lba(sector_index as u32)))
    }
}

pub fn create_progress_bar(total_sectors: usize) -> ProgressBar {
    let pb = ProgressBar::new(total_sectors as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} sectors ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}
