//! Affine georeferencing for site rasters.
//!
//! A [`GeoRaster`] is read from the GeoTIFF tags embedded in a capture's
//! `.tif` file. Only the tags are decoded; pixel data is never touched, so
//! opening a multi-gigabyte orthomosaic stays cheap.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::ser::{Serialize, SerializeSeq, Serializer};
use tiff::decoder::{Decoder, Limits};
use tiff::tags::Tag;
use tracing::debug;

use crate::error::{SiteError, SiteResult};

const GEOTIFF_MODELPIXELSCALE: u16 = 33550;
const GEOTIFF_MODELTIEPOINT: u16 = 33922;
const GEOTIFF_MODELTRANSFORMATION: u16 = 34264;
const GEOTIFF_GEOKEYDIRECTORY: u16 = 34735;

const GT_RASTER_TYPE_GEO_KEY: u32 = 1025;
const RASTER_PIXEL_IS_POINT: u32 = 2;

/// Six-coefficient pixel to geographic mapping.
///
/// ```text
/// lon = a * col + b * row + c
/// lat = d * col + e * row + f
/// ```
///
/// Serializes as the 9-element row-major augmented matrix
/// `[a, b, c, d, e, f, 0, 0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl AffineTransform {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// North-up transform from an origin (upper-left corner) and pixel size.
    pub fn north_up(origin_lon: f64, origin_lat: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self::new(pixel_width, 0.0, origin_lon, 0.0, -pixel_height, origin_lat)
    }

    /// Map a pixel grid coordinate to `(lon, lat)`.
    ///
    /// Integer coordinates address pixel corners. Inputs outside the raster
    /// extent are valid and extrapolate linearly.
    pub fn pixel_to_geo(&self, col: f64, row: f64) -> (f64, f64) {
        let lon = self.a * col + self.b * row + self.c;
        let lat = self.d * col + self.e * row + self.f;
        (lon, lat)
    }

    /// Geographic position of the center of pixel `(col, row)`.
    pub fn pixel_center_to_geo(&self, col: f64, row: f64) -> (f64, f64) {
        self.pixel_to_geo(col + 0.5, row + 0.5)
    }

    /// Inverse mapping, `None` when the transform is singular.
    pub fn geo_to_pixel(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let det = self.a * self.e - self.b * self.d;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let dx = lon - self.c;
        let dy = lat - self.f;
        let col = (self.e * dx - self.b * dy) / det;
        let row = (self.a * dy - self.d * dx) / det;
        Some((col, row))
    }

    pub fn to_matrix(&self) -> [f64; 9] {
        [self.a, self.b, self.c, self.d, self.e, self.f, 0.0, 0.0, 1.0]
    }

    /// Build a transform from raw GeoTIFF tag values.
    ///
    /// `ModelTransformationTag` takes precedence; otherwise the first tiepoint
    /// is combined with the pixel scale. Returns `None` when neither form is
    /// complete.
    pub fn from_geotiff_tags(
        model_transformation: Option<&[f64]>,
        tiepoint: Option<&[f64]>,
        pixel_scale: Option<&[f64]>,
    ) -> Option<Self> {
        if let Some(m) = model_transformation.filter(|m| m.len() >= 16) {
            return Some(Self::new(m[0], m[1], m[3], m[4], m[5], m[7]));
        }

        match (tiepoint, pixel_scale) {
            (Some(tp), Some(scale)) if tp.len() >= 6 && scale.len() >= 2 => {
                // Tiepoint: [I, J, K, X, Y, Z] ties raster (I, J) to model (X, Y)
                let (i, j, x, y) = (tp[0], tp[1], tp[3], tp[4]);
                let (sx, sy) = (scale[0], scale[1]);
                Some(Self::new(sx, 0.0, x - i * sx, 0.0, -sy, y + j * sy))
            }
            _ => None,
        }
    }
}

impl AffineTransform {
    /// Move the origin from the center of pixel (0, 0) to its top-left corner.
    ///
    /// `PixelIsPoint` rasters tie model coordinates to pixel centers; GDAL
    /// shifts them by half a pixel so every transform is corner-based.
    pub fn to_pixel_corner(self) -> Self {
        Self {
            c: self.c - 0.5 * self.a - 0.5 * self.b,
            f: self.f - 0.5 * self.d - 0.5 * self.e,
            ..self
        }
    }
}

/// True when a GeoKeyDirectory declares `GTRasterTypeGeoKey = RasterPixelIsPoint`.
///
/// Directory layout: a 4-value header whose last entry is the key count,
/// then `[key id, tag location, count, value]` per key. Only keys stored
/// inline (location 0) carry their value directly.
pub fn is_pixel_is_point(geokeys: &[u32]) -> bool {
    let Some(&count) = geokeys.get(3) else {
        return false;
    };
    geokeys[4..]
        .chunks_exact(4)
        .take(count as usize)
        .any(|key| {
            key[0] == GT_RASTER_TYPE_GEO_KEY && key[1] == 0 && key[3] == RASTER_PIXEL_IS_POINT
        })
}

impl Serialize for AffineTransform {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let matrix = self.to_matrix();
        let mut seq = serializer.serialize_seq(Some(matrix.len()))?;
        for value in &matrix {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

/// Georeferencing metadata of a raster file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoRaster {
    pub transform: AffineTransform,
    pub width: u32,
    pub height: u32,
}

impl GeoRaster {
    /// Read dimensions and the affine transform from a GeoTIFF.
    ///
    /// Fails with [`SiteError::NotFound`] when the file is absent and
    /// [`SiteError::Format`] when it is not a georeferenced TIFF.
    pub fn open<P: AsRef<Path>>(path: P) -> SiteResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SiteError::not_found(format!(
                "TIFF file not found: {}",
                path.display()
            )));
        }

        let file = File::open(path)?;
        let mut decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| SiteError::format("GeoTIFF", path, e.to_string()))?
            .with_limits(Limits::unlimited());

        let (width, height) = decoder
            .dimensions()
            .map_err(|e| SiteError::format("GeoTIFF", path, e.to_string()))?;

        let model_transformation = read_f64_tag(&mut decoder, GEOTIFF_MODELTRANSFORMATION)?;
        let tiepoint = read_f64_tag(&mut decoder, GEOTIFF_MODELTIEPOINT)?;
        let pixel_scale = read_f64_tag(&mut decoder, GEOTIFF_MODELPIXELSCALE)?;

        let transform = AffineTransform::from_geotiff_tags(
            model_transformation.as_deref(),
            tiepoint.as_deref(),
            pixel_scale.as_deref(),
        )
        .ok_or_else(|| SiteError::format("GeoTIFF", path, "no georeferencing tags"))?;

        let geokeys = decoder.find_tag(Tag::from_u16_exhaustive(GEOTIFF_GEOKEYDIRECTORY))?;
        let pixel_is_point = match geokeys {
            Some(value) => is_pixel_is_point(&value.into_u32_vec()?),
            None => false,
        };
        let transform = if pixel_is_point {
            transform.to_pixel_corner()
        } else {
            transform
        };

        debug!(
            path = %path.display(),
            width,
            height,
            pixel_is_point,
            ?transform,
            "Loaded raster georeferencing"
        );

        Ok(Self {
            transform,
            width,
            height,
        })
    }
}

fn read_f64_tag<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
    code: u16,
) -> SiteResult<Option<Vec<f64>>> {
    match decoder.find_tag(Tag::from_u16_exhaustive(code))? {
        Some(value) => Ok(Some(value.into_f64_vec()?)),
        None => Ok(None),
    }
}
