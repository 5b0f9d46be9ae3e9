//! Rendering of per-tracker GeoTIFF crops.
//!
//! Tracker rasters come straight out of the photogrammetry pipeline and may
//! be 8-bit, 16-bit or floating point, with one, two, three or more bands.
//! They are normalized per band to 8 bits, capped in size and encoded as PNG.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use base64::Engine;
use image::imageops::FilterType;
use image::{DynamicImage, GrayAlphaImage, ImageFormat, RgbImage};
use tiff::decoder::{Decoder, DecodingResult, Limits};

use super::web::fit_within;
use crate::error::{SiteError, SiteResult};

/// Decoded raster split into bands.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterBands {
    pub width: u32,
    pub height: u32,
    /// One `width * height` plane per band.
    pub bands: Vec<Vec<f64>>,
    /// True when samples are already 8-bit and need no normalization.
    pub is_u8: bool,
}

impl RasterBands {
    /// Decode every band of a TIFF.
    pub fn read(path: &Path) -> SiteResult<Self> {
        let file = File::open(path)?;
        let mut decoder = Decoder::new(BufReader::new(file))?.with_limits(Limits::unlimited());
        let (width, height) = decoder.dimensions()?;
        let (samples, is_u8) = samples_as_f64(decoder.read_image()?);

        let pixels = width as usize * height as usize;
        if pixels == 0 || samples.len() % pixels != 0 {
            return Err(SiteError::format(
                "tracker raster",
                path,
                format!("{} samples for {}x{} pixels", samples.len(), width, height),
            ));
        }
        let band_count = samples.len() / pixels;

        Ok(Self {
            width,
            height,
            bands: deinterleave(&samples, band_count),
            is_u8,
        })
    }

    /// Bands to display: the first three, a single band replicated to grey
    /// RGB, or a grey+alpha pair as-is.
    pub fn display_bands(&self) -> Vec<&[f64]> {
        match self.bands.len() {
            1 => vec![self.bands[0].as_slice(); 3],
            2 => self.bands.iter().map(Vec::as_slice).collect(),
            _ => self.bands.iter().take(3).map(Vec::as_slice).collect(),
        }
    }
}

fn samples_as_f64(result: DecodingResult) -> (Vec<f64>, bool) {
    match result {
        DecodingResult::U8(v) => (v.into_iter().map(f64::from).collect(), true),
        DecodingResult::U16(v) => (v.into_iter().map(f64::from).collect(), false),
        DecodingResult::U32(v) => (v.into_iter().map(f64::from).collect(), false),
        DecodingResult::U64(v) => (v.into_iter().map(|x| x as f64).collect(), false),
        DecodingResult::I8(v) => (v.into_iter().map(f64::from).collect(), false),
        DecodingResult::I16(v) => (v.into_iter().map(f64::from).collect(), false),
        DecodingResult::I32(v) => (v.into_iter().map(f64::from).collect(), false),
        DecodingResult::I64(v) => (v.into_iter().map(|x| x as f64).collect(), false),
        DecodingResult::F32(v) => (v.into_iter().map(f64::from).collect(), false),
        DecodingResult::F64(v) => (v, false),
    }
}

fn deinterleave(samples: &[f64], band_count: usize) -> Vec<Vec<f64>> {
    (0..band_count)
        .map(|band| samples.iter().skip(band).step_by(band_count).copied().collect())
        .collect()
}

/// Stretch each band independently to 0..=255.
///
/// `min` maps to 0 and `max` to 255, truncating. NaN is ignored when finding
/// the range and renders as 0. A band with no spread renders as all zeros.
pub fn normalize_bands(bands: &[&[f64]]) -> Vec<Vec<u8>> {
    bands.iter().map(|band| normalize_band(band)).collect()
}

fn normalize_band(band: &[f64]) -> Vec<u8> {
    let (min, max) = band
        .iter()
        .filter(|v| !v.is_nan())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if max <= min {
        return vec![0; band.len()];
    }
    let span = max - min;
    band.iter()
        .map(|&v| {
            if v.is_nan() {
                0
            } else {
                ((v - min) / span * 255.0) as u8
            }
        })
        .collect()
}

fn to_u8_bands(bands: &[&[f64]]) -> Vec<Vec<u8>> {
    bands
        .iter()
        .map(|band| band.iter().map(|&v| v as u8).collect())
        .collect()
}

fn interleave(bands: &[Vec<u8>]) -> Vec<u8> {
    let len = bands.first().map_or(0, Vec::len);
    let mut out = Vec::with_capacity(len * bands.len());
    for i in 0..len {
        for band in bands {
            out.push(band[i]);
        }
    }
    out
}

/// Compose display bands into an 8-bit image.
///
/// `None` when the band planes do not match the raster dimensions.
pub fn compose_image(raster: &RasterBands) -> Option<DynamicImage> {
    let selected = raster.display_bands();
    let bands = if raster.is_u8 {
        to_u8_bands(&selected)
    } else {
        normalize_bands(&selected)
    };
    let data = interleave(&bands);

    match bands.len() {
        2 => GrayAlphaImage::from_raw(raster.width, raster.height, data).map(DynamicImage::ImageLumaA8),
        _ => RgbImage::from_raw(raster.width, raster.height, data).map(DynamicImage::ImageRgb8),
    }
}

/// Render a tracker TIFF to PNG bytes, longest side capped at `max_dimension`.
pub fn render_tracker_png(path: &Path, max_dimension: u32) -> SiteResult<Vec<u8>> {
    let raster = RasterBands::read(path)?;
    let mut image = compose_image(&raster).ok_or_else(|| {
        SiteError::format("tracker raster", path, "band data does not match raster size")
    })?;

    if let Some((width, height)) = fit_within(image.width(), image.height(), max_dimension) {
        image = image.resize_exact(width, height, FilterType::Lanczos3);
    }

    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

/// `data:image/png;base64,...` URL for PNG bytes.
pub fn png_data_url(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}
