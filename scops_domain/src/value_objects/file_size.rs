// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # File size
//!
//! Mirrors the original's `progress_detail_updater` size reporting: bytes
//! measured on disk are converted to megabytes and promoted to gigabytes
//! once they exceed 500.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Mb,
    Gb,
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SizeUnit::Mb => "MB",
            SizeUnit::Gb => "GB",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileSize {
    pub value: f64,
    pub unit: SizeUnit,
}

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const PROMOTION_THRESHOLD_MB: f64 = 500.0;

impl FileSize {
    /// Converts a raw byte count, promoting MB to GB above 500, rounded to
    /// two decimal places.
    pub fn from_bytes(bytes: u64) -> Self {
        let mb = bytes as f64 / BYTES_PER_MB;
        if mb > PROMOTION_THRESHOLD_MB {
            FileSize { value: round2(mb / 1024.0), unit: SizeUnit::Gb }
        } else {
            FileSize { value: round2(mb), unit: SizeUnit::Mb }
        }
    }

    pub fn zero() -> Self {
        FileSize { value: 0.0, unit: SizeUnit::Mb }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_file_stays_in_megabytes() {
        let size = FileSize::from_bytes(10 * 1024 * 1024);
        assert_eq!(size.unit, SizeUnit::Mb);
        assert_eq!(size.value, 10.0);
    }

    #[test]
    fn large_file_promotes_to_gigabytes() {
        let size = FileSize::from_bytes(600 * 1024 * 1024);
        assert_eq!(size.unit, SizeUnit::Gb);
        assert!((size.value - (600.0 / 1024.0)).abs() < 0.01);
    }

    #[test]
    fn boundary_at_exactly_500_mb_stays_megabytes() {
        let size = FileSize::from_bytes(500 * 1024 * 1024);
        assert_eq!(size.unit, SizeUnit::Mb);
    }
}
