//! On-disk site fixtures: date folders, georeferenced rasters, boundary JSON
//! and status CSV laid out the way the server expects them.

use std::fs::File;
use std::path::{Path, PathBuf};

use image::RgbImage;
use serde_json::json;
use tempfile::TempDir;
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

use tracker_site::config::DEFAULT_BOUNDARY_JSON;
use tracker_site::SiteConfig;

pub const DATE: &str = "20240115";
pub const DATE_MATCH: &str = "site_20240115";

pub const ORIGIN_LON: f64 = -75.0;
pub const ORIGIN_LAT: f64 = 43.0;
pub const PIXEL_SIZE: f64 = 0.0001;
pub const RASTER_WIDTH: u32 = 100;
pub const RASTER_HEIGHT: u32 = 50;

/// Tracker covering pixel columns 10..20 and rows 10..20.
pub const TRACKER_A: &str = "A01T01R01";
/// Tracker covering pixel columns 30..40 and rows 10..20.
pub const TRACKER_B: &str = "A01T01R02";

const GEOTIFF_MODELPIXELSCALE: u16 = 33550;
const GEOTIFF_MODELTIEPOINT: u16 = 33922;

/// A temporary site tree with its matching configuration.
pub struct SiteFixture {
    _root: TempDir,
    pub config: SiteConfig,
}

impl SiteFixture {
    /// Empty layout, output and TIFF directories plus the boundary JSON.
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let layout_dir = root.path().join("layout_data");
        let output_dir = root.path().join("Output_Lewis");
        let tifs_dir = root.path().join("Lewistifs");
        for dir in [&layout_dir, &output_dir, &tifs_dir] {
            std::fs::create_dir_all(dir).unwrap();
        }

        let config = SiteConfig::new(&layout_dir, &output_dir, &tifs_dir);
        write_boundaries(&layout_dir.join(DEFAULT_BOUNDARY_JSON));

        Self {
            _root: root,
            config,
        }
    }

    /// Fixture with one fully populated capture date.
    pub fn with_date() -> Self {
        let fixture = Self::new();
        fixture.add_date(DATE, DATE_MATCH);
        fixture
    }

    pub fn date_folder(&self, date: &str) -> PathBuf {
        self.config.date_folder_path(date)
    }

    /// Create a date folder holding a base JPEG, its GeoTIFF and a status CSV.
    pub fn add_date(&self, date: &str, date_match: &str) -> PathBuf {
        let folder = self.date_folder(date);
        std::fs::create_dir_all(&folder).unwrap();

        write_jpeg(
            &folder.join(format!("{}.jpg", date_match)),
            RASTER_WIDTH,
            RASTER_HEIGHT,
        );
        write_geotiff(
            &folder.join(format!("{}.tif", date_match)),
            RASTER_WIDTH,
            RASTER_HEIGHT,
        );
        std::fs::write(
            folder.join(format!("{}_tracker_stages.csv", date_match)),
            format!(
                "Tracker ID,Current_stage,Status,Notes\n\
                 {},Piles,Complete,\n\
                 {},Torque tube, In progress ,late\n",
                TRACKER_A, TRACKER_B
            ),
        )
        .unwrap();
        folder
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }
}

fn write_boundaries(path: &Path) {
    let tracker = |name: &str, first_col: f64| {
        let last_col = first_col + 10.0;
        json!({
            "tableName": name,
            "TopRightLatitude": ORIGIN_LAT - 10.0 * PIXEL_SIZE,
            "TopRightLongitude": ORIGIN_LON + last_col * PIXEL_SIZE,
            "BottomLeftLatitude": ORIGIN_LAT - 20.0 * PIXEL_SIZE,
            "BottomLeftLongitude": ORIGIN_LON + first_col * PIXEL_SIZE,
        })
    };
    let body = json!({
        "tableDetails": [
            tracker(TRACKER_A, 10.0),
            tracker(TRACKER_B, 30.0),
            { "tableName": "INCOMPLETE", "TopRightLatitude": 43.0 },
        ]
    });
    std::fs::write(path, serde_json::to_vec_pretty(&body).unwrap()).unwrap();
}

/// Gradient JPEG of the given size.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save(path).unwrap();
}

/// Single-band GeoTIFF anchored at the site origin with north-up pixels.
pub fn write_geotiff(path: &Path, width: u32, height: u32) {
    let file = File::create(path).unwrap();
    let mut tiff = TiffEncoder::new(file).unwrap();
    let mut image = tiff.new_image::<colortype::Gray8>(width, height).unwrap();

    let pixel_scale = [PIXEL_SIZE, PIXEL_SIZE, 0.0];
    let tiepoint = [0.0, 0.0, 0.0, ORIGIN_LON, ORIGIN_LAT, 0.0];
    image
        .encoder()
        .write_tag(Tag::Unknown(GEOTIFF_MODELPIXELSCALE), pixel_scale.as_slice())
        .unwrap();
    image
        .encoder()
        .write_tag(Tag::Unknown(GEOTIFF_MODELTIEPOINT), tiepoint.as_slice())
        .unwrap();

    let data = vec![0u8; (width * height) as usize];
    image.write_data(&data).unwrap();
}

/// Three-band tracker crop; `width` distinguishes one candidate from another.
pub fn write_tracker_tiff(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let data: Vec<u8> = (0..width * height * 3).map(|i| (i % 251) as u8).collect();
    let file = File::create(path).unwrap();
    TiffEncoder::new(file)
        .unwrap()
        .write_image::<colortype::RGB8>(width, height, &data)
        .unwrap();
}

/// Decode a `data:image/png;base64,` URL and return the PNG's dimensions.
pub fn data_url_dimensions(url: &str) -> (u32, u32) {
    use base64::Engine;

    let encoded = url
        .strip_prefix("data:image/png;base64,")
        .expect("PNG data URL prefix");
    let png = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .unwrap();
    let decoded = image::load_from_memory_with_format(&png, image::ImageFormat::Png).unwrap();
    (decoded.width(), decoded.height())
}
