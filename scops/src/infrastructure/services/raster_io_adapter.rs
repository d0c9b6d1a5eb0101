// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # ENVI raster I/O adapter
//!
//! Implements [`RasterIo`] over the band-interleaved-by-line (BIL) `.bil`/
//! `.hdr` pair the APL toolchain reads and writes at every stage. No
//! GDAL binding appears anywhere in the retrieved pack, so this parses
//! the handful of ENVI header fields `band_math` actually needs
//! (`samples`, `lines`, `bands`, `data type`, `byte order`) by hand and
//! reads/writes the raw band data with `byteorder`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use ndarray::Array2;

use scops_domain::error::ScopsError;
use scops_domain::services::RasterIo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnviDataType {
    Uint16,
    Int16,
    Float32,
}

impl EnviDataType {
    fn from_code(code: u32) -> Result<Self, ScopsError> {
        match code {
            2 => Ok(Self::Int16),
            4 => Ok(Self::Float32),
            12 => Ok(Self::Uint16),
            other => Err(ScopsError::IoError(format!("unsupported ENVI data type code {other}"))),
        }
    }

    fn code(self) -> u32 {
        match self {
            Self::Int16 => 2,
            Self::Float32 => 4,
            Self::Uint16 => 12,
        }
    }

    fn byte_width(self) -> usize {
        match self {
            Self::Int16 | Self::Uint16 => 2,
            Self::Float32 => 4,
        }
    }
}

struct EnviHeader {
    samples: usize,
    lines: usize,
    bands: usize,
    data_type: EnviDataType,
    big_endian: bool,
    /// Everything but `samples`/`lines`/`bands`/`data type`/`byte order`,
    /// preserved verbatim so a written header keeps the template's map
    /// projection and coordinate system fields.
    other_lines: Vec<String>,
}

fn hdr_path(bil_path: &Path) -> PathBuf {
    bil_path.with_extension("hdr")
}

fn parse_header(text: &str) -> Result<EnviHeader, ScopsError> {
    let mut samples = None;
    let mut lines = None;
    let mut bands = None;
    let mut data_type = None;
    let mut big_endian = false;
    let mut other_lines = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("ENVI") || trimmed.is_empty() {
            continue;
        }
        let Some((key, value)) = trimmed.split_once('=') else {
            other_lines.push(line.to_string());
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();
        match key.as_str() {
            "samples" => samples = value.parse::<usize>().ok(),
            "lines" => lines = value.parse::<usize>().ok(),
            "bands" => bands = value.parse::<usize>().ok(),
            "data type" => data_type = value.parse::<u32>().ok().and_then(|c| EnviDataType::from_code(c).ok()),
            "byte order" => big_endian = value.trim() == "1",
            _ => other_lines.push(line.to_string()),
        }
    }

    Ok(EnviHeader {
        samples: samples.ok_or_else(|| ScopsError::IoError("header missing samples".to_string()))?,
        lines: lines.ok_or_else(|| ScopsError::IoError("header missing lines".to_string()))?,
        bands: bands.ok_or_else(|| ScopsError::IoError("header missing bands".to_string()))?,
        data_type: data_type.ok_or_else(|| ScopsError::IoError("header missing or unsupported data type".to_string()))?,
        big_endian,
        other_lines,
    })
}

fn read_sample(buf: &[u8], offset: usize, data_type: EnviDataType, big_endian: bool) -> f32 {
    match data_type {
        EnviDataType::Uint16 => {
            let raw = if big_endian { BigEndian::read_u16(&buf[offset..]) } else { LittleEndian::read_u16(&buf[offset..]) };
            raw as f32
        }
        EnviDataType::Int16 => {
            let raw = if big_endian { BigEndian::read_i16(&buf[offset..]) } else { LittleEndian::read_i16(&buf[offset..]) };
            raw as f32
        }
        EnviDataType::Float32 => {
            if big_endian { BigEndian::read_f32(&buf[offset..]) } else { LittleEndian::read_f32(&buf[offset..]) }
        }
    }
}

fn write_sample(out: &mut Vec<u8>, value: f32, data_type: EnviDataType, big_endian: bool) {
    let mut tmp = [0u8; 4];
    match data_type {
        EnviDataType::Uint16 => {
            if big_endian { BigEndian::write_u16(&mut tmp, value as u16) } else { LittleEndian::write_u16(&mut tmp, value as u16) }
            out.extend_from_slice(&tmp[..2]);
        }
        EnviDataType::Int16 => {
            if big_endian { BigEndian::write_i16(&mut tmp, value as i16) } else { LittleEndian::write_i16(&mut tmp, value as i16) }
            out.extend_from_slice(&tmp[..2]);
        }
        EnviDataType::Float32 => {
            if big_endian { BigEndian::write_f32(&mut tmp, value) } else { LittleEndian::write_f32(&mut tmp, value) }
            out.extend_from_slice(&tmp);
        }
    }
}

pub struct EnviRasterIo;

impl EnviRasterIo {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnviRasterIo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RasterIo for EnviRasterIo {
    async fn read_bands(&self, bil_path: &Path, bands: &[u32]) -> Result<HashMap<u32, Array2<f32>>, ScopsError> {
        let header_text = tokio::fs::read_to_string(hdr_path(bil_path)).await.map_err(|e| ScopsError::IoError(e.to_string()))?;
        let header = parse_header(&header_text)?;
        let raw = tokio::fs::read(bil_path).await.map_err(|e| ScopsError::IoError(e.to_string()))?;

        let sample_width = header.data_type.byte_width();
        let row_width = header.samples * header.bands * sample_width;

        let mut result = HashMap::with_capacity(bands.len());
        for &band in bands {
            if band == 0 || band as usize > header.bands {
                return Err(ScopsError::IoError(format!("band {band} out of range (file has {} bands)", header.bands)));
            }
            let band_index = (band - 1) as usize;
            let mut array = Array2::<f32>::zeros((header.lines, header.samples));
            for row in 0..header.lines {
                let row_start = row * row_width + band_index * header.samples * sample_width;
                for sample in 0..header.samples {
                    let offset = row_start + sample * sample_width;
                    array[[row, sample]] = read_sample(&raw, offset, header.data_type, header.big_endian);
                }
            }
            result.insert(band, array);
        }
        Ok(result)
    }

    async fn write_band(&self, output_path: &Path, data: &Array2<f32>, header_template: &Path) -> Result<(), ScopsError> {
        let header_text =
            tokio::fs::read_to_string(hdr_path(header_template)).await.map_err(|e| ScopsError::IoError(e.to_string()))?;
        let mut header = parse_header(&header_text)?;
        let (lines, samples) = data.dim();
        header.lines = lines;
        header.samples = samples;
        header.bands = 1;

        let mut raw = Vec::with_capacity(lines * samples * header.data_type.byte_width());
        for row in 0..lines {
            for sample in 0..samples {
                write_sample(&mut raw, data[[row, sample]], header.data_type, header.big_endian);
            }
        }
        tokio::fs::write(output_path, raw).await.map_err(|e| ScopsError::IoError(e.to_string()))?;

        let mut out_header = String::from("ENVI\n");
        out_header.push_str(&format!("samples = {}\n", header.samples));
        out_header.push_str(&format!("lines = {}\n", header.lines));
        out_header.push_str(&format!("bands = {}\n", header.bands));
        out_header.push_str(&format!("data type = {}\n", header.data_type.code()));
        out_header.push_str(&format!("byte order = {}\n", if header.big_endian { 1 } else { 0 }));
        for line in &header.other_lines {
            out_header.push_str(line);
            out_header.push('\n');
        }
        tokio::fs::write(hdr_path(output_path), out_header).await.map_err(|e| ScopsError::IoError(e.to_string()))?;
        Ok(())
    }

    async fn copy_companion(&self, source: &Path, dest: &Path, header_template: &Path) -> Result<(), ScopsError> {
        let bands = self.read_bands(source, &[1]).await?;
        let data = bands.get(&1).expect("band 1 just read");
        self.write_band(dest, data, header_template).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use tempfile::tempdir;

    async fn write_bil(dir: &Path, stem: &str, samples: usize, lines: usize, bands: usize, data: &[u16]) -> PathBuf {
        let bil_path = dir.join(format!("{stem}.bil"));
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        tokio::fs::write(&bil_path, &bytes).await.unwrap();
        let header = format!(
            "ENVI\nsamples = {samples}\nlines = {lines}\nbands = {bands}\ndata type = 12\nbyte order = 0\nmap info = {{UTM, 1, 1, 500000, 6000000, 2.0, 2.0, 30, North}}\n"
        );
        tokio::fs::write(hdr_path(&bil_path), header).await.unwrap();
        bil_path
    }

    #[test]
    fn parse_header_reads_core_fields_and_preserves_extras() {
        let text = "ENVI\nsamples = 4\nlines = 3\nbands = 2\ndata type = 4\nbyte order = 1\nmap info = {UTM, 1, 1, 0, 0}\n";
        let header = parse_header(text).unwrap();
        assert_eq!((header.samples, header.lines, header.bands), (4, 3, 2));
        assert_eq!(header.data_type, EnviDataType::Float32);
        assert!(header.big_endian);
        assert_eq!(header.other_lines, vec!["map info = {UTM, 1, 1, 0, 0}"]);
    }

    #[test]
    fn parse_header_rejects_missing_required_field() {
        let text = "ENVI\nsamples = 4\nlines = 3\n";
        assert!(parse_header(text).is_err());
    }

    #[tokio::test]
    async fn read_bands_decodes_two_band_uint16_bil() {
        let dir = tempdir().unwrap();
        // 2 samples x 2 lines x 2 bands, band-interleaved-by-line: each
        // row holds band 1's full row, then band 2's full row.
        // row0 = [b1s1, b1s2, b2s1, b2s2], row1 = [b1s1, b1s2, b2s1, b2s2]
        let bil = write_bil(dir.path(), "f123", 2, 2, 2, &[10, 20, 100, 200, 30, 40, 300, 400]).await;

        let raster_io = EnviRasterIo::default();
        let bands = raster_io.read_bands(&bil, &[1, 2]).await.unwrap();

        assert_eq!(bands[&1], array![[10.0, 20.0], [30.0, 40.0]]);
        assert_eq!(bands[&2], array![[100.0, 200.0], [300.0, 400.0]]);
    }

    #[tokio::test]
    async fn read_bands_rejects_out_of_range_band() {
        let dir = tempdir().unwrap();
        let bil = write_bil(dir.path(), "f123", 2, 2, 1, &[1, 2, 3, 4]).await;

        let raster_io = EnviRasterIo::default();
        assert!(raster_io.read_bands(&bil, &[2]).await.is_err());
    }

    #[tokio::test]
    async fn write_band_then_read_band_round_trips_and_keeps_template_header_extras() {
        let dir = tempdir().unwrap();
        let template = write_bil(dir.path(), "template", 2, 2, 1, &[1, 2, 3, 4]).await;

        let raster_io = EnviRasterIo::default();
        let data = array![[5.0_f32, 6.0], [7.0, 8.0]];
        let output = dir.path().join("result.bil");
        raster_io.write_band(&output, &data, &template).await.unwrap();

        let header_text = tokio::fs::read_to_string(hdr_path(&output)).await.unwrap();
        assert!(header_text.contains("bands = 1"));
        assert!(header_text.contains("map info = {UTM, 1, 1, 500000, 6000000, 2.0, 2.0, 30, North}"));

        let read_back = raster_io.read_bands(&output, &[1]).await.unwrap();
        assert_eq!(read_back[&1], data);
    }

    #[tokio::test]
    async fn copy_companion_duplicates_band_one_under_a_new_name() {
        let dir = tempdir().unwrap();
        let source = write_bil(dir.path(), "f123", 2, 1, 1, &[7, 9]).await;
        let dest = dir.path().join("f123_copy.bil");

        let raster_io = EnviRasterIo::default();
        raster_io.copy_companion(&source, &dest, &source).await.unwrap();

        let copied = raster_io.read_bands(&dest, &[1]).await.unwrap();
        assert_eq!(copied[&1], array![[7.0, 9.0]]);
    }
}
