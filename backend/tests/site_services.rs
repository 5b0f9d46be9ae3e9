mod support;

use std::path::PathBuf;

use support::fixtures::*;
use support::with_scoped_env;
use tracker_site::config::ImagePolicy;
use tracker_site::imaging::{web_variant_path, CacheOutcome};
use tracker_site::services;
use tracker_site::{SiteConfig, SiteError};

// =============================================================================
// Dates
// =============================================================================

#[test]
fn test_dates_sorted_and_filtered() {
    let site = SiteFixture::new();
    for name in ["Lewis20240301", "Lewis20231120", "Lewis2024", "Other20240101"] {
        std::fs::create_dir_all(site.config.layout_dir.join(name)).unwrap();
    }
    std::fs::write(site.config.layout_dir.join("Lewis20240401"), b"not a dir").unwrap();

    let dates = services::available_dates(&site.config).unwrap();
    let listed: Vec<_> = dates.iter().map(|d| d.display.as_str()).collect();
    assert_eq!(listed, vec!["2023-11-20", "2024-03-01"]);
    assert_eq!(dates[0].folder, "Lewis20231120");
}

#[test]
fn test_dates_empty_root() {
    let site = SiteFixture::new();
    assert!(services::available_dates(&site.config).unwrap().is_empty());
}

#[test]
fn test_dates_missing_root() {
    let config = SiteConfig::new("/nonexistent/layout", "/nonexistent/out", "/nonexistent/tifs");
    let err = services::available_dates(&config).unwrap_err();
    assert!(err.is_not_found());
}

// =============================================================================
// Layout
// =============================================================================

#[test]
fn test_layout_payload() {
    let site = SiteFixture::with_date();
    let layout = services::site_layout(&site.config, DATE).unwrap();

    assert_eq!(layout.date, DATE);
    assert_eq!(
        layout.base_image,
        format!("/api/image/layout/{}/{}.jpg", DATE, DATE_MATCH)
    );
    assert_eq!(layout.overlay_image, None);
    assert_eq!((layout.tif_width, layout.tif_height), (RASTER_WIDTH, RASTER_HEIGHT));
    assert_eq!(layout.transform.c, ORIGIN_LON);
    assert_eq!(layout.transform.f, ORIGIN_LAT);

    assert_eq!(layout.boundaries.len(), 2);
    assert!(layout.boundaries.get("INCOMPLETE").is_none());

    let status = &layout.tracker_info[TRACKER_B];
    assert_eq!(status.stage, "Torque tube");
    assert_eq!(status.status, "In progress");

    assert_eq!(layout.original_image_width, RASTER_WIDTH);
    assert_eq!(layout.display_image_width, RASTER_WIDTH);
    assert_eq!(layout.image_scale_factor, 1.0);
}

#[test]
fn test_layout_json_shape() {
    let site = SiteFixture::with_date();
    let layout = services::site_layout(&site.config, DATE).unwrap();
    let json = serde_json::to_value(&layout).unwrap();

    let transform = json["transform"].as_array().unwrap();
    assert_eq!(transform.len(), 9);
    assert_eq!(transform[8], 1.0);

    let boundary = &json["boundaries"][TRACKER_A];
    assert!(boundary["min_lon"].as_f64().unwrap() < boundary["max_lon"].as_f64().unwrap());
    assert_eq!(json["tracker_info"][TRACKER_A]["stage"], "Piles");
    assert!(json.get("overlay_image").is_none());
}

#[test]
fn test_layout_prefers_stage_status_overlay() {
    let site = SiteFixture::with_date();
    let folder = site.date_folder(DATE);
    write_jpeg(&folder.join(format!("{}_stage_overlay.jpg", DATE_MATCH)), 10, 5);
    write_jpeg(
        &folder.join(format!("{}_stage_status_overlay.jpg", DATE_MATCH)),
        10,
        5,
    );

    let layout = services::site_layout(&site.config, DATE).unwrap();
    assert_eq!(
        layout.overlay_image.as_deref(),
        Some(format!("/api/image/layout/{}/{}_stage_status_overlay.jpg", DATE, DATE_MATCH).as_str())
    );
    assert!(layout.base_image.ends_with(&format!("{}.jpg", DATE_MATCH)));
}

#[test]
fn test_layout_uses_web_copy_for_display_size() {
    let site = SiteFixture::with_date();
    let folder = site.date_folder(DATE);
    write_jpeg(&folder.join(format!("{}_web.jpg", DATE_MATCH)), 50, 25);

    let layout = services::site_layout(&site.config, DATE).unwrap();
    assert_eq!(layout.original_image_width, 100);
    assert_eq!(layout.display_image_width, 50);
    assert_eq!(layout.display_image_height, 25);
    assert_eq!(layout.image_scale_factor, 2.0);
}

#[test]
fn test_layout_falls_back_to_tifs_dir() {
    let site = SiteFixture::with_date();
    let folder = site.date_folder(DATE);
    let tif_name = format!("{}.tif", DATE_MATCH);
    std::fs::rename(folder.join(&tif_name), site.config.tifs_dir.join(&tif_name)).unwrap();

    let layout = services::site_layout(&site.config, DATE).unwrap();
    assert_eq!(layout.tif_width, RASTER_WIDTH);
}

#[test]
fn test_layout_missing_pieces() {
    let site = SiteFixture::new();
    let err = services::site_layout(&site.config, DATE).unwrap_err();
    assert!(err.to_string().contains("Date folder not found: Lewis20240115"));

    std::fs::create_dir_all(site.date_folder(DATE)).unwrap();
    let err = services::site_layout(&site.config, DATE).unwrap_err();
    assert!(err.to_string().contains("Base image not found"));

    let site = SiteFixture::with_date();
    std::fs::remove_file(site.date_folder(DATE).join(format!("{}.tif", DATE_MATCH))).unwrap();
    let err = services::site_layout(&site.config, DATE).unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("TIFF file not found"));
}

#[test]
fn test_layout_without_status_csv() {
    let site = SiteFixture::with_date();
    std::fs::remove_file(
        site.date_folder(DATE)
            .join(format!("{}_tracker_stages.csv", DATE_MATCH)),
    )
    .unwrap();

    let layout = services::site_layout(&site.config, DATE).unwrap();
    assert!(layout.tracker_info.is_empty());
    assert_eq!(layout.boundaries.len(), 2);
}

#[test]
fn test_layout_missing_boundary_json() {
    let site = SiteFixture::with_date();
    std::fs::remove_file(&site.config.boundary_json).unwrap();
    let err = services::site_layout(&site.config, DATE).unwrap_err();
    assert!(err.is_not_found());
}

// =============================================================================
// Click
// =============================================================================

#[test]
fn test_click_hits_trackers() {
    let site = SiteFixture::with_date();
    let hit = |x, y| services::tracker_at_pixel(&site.config, DATE, x, y).unwrap();

    assert_eq!(hit(15.0, 15.0).as_deref(), Some(TRACKER_A));
    assert_eq!(hit(35.0, 12.0).as_deref(), Some(TRACKER_B));
    assert_eq!(hit(25.0, 15.0), None);
    assert_eq!(hit(80.0, 40.0), None);
}

#[test]
fn test_click_outside_raster_is_not_an_error() {
    let site = SiteFixture::with_date();
    let result = services::tracker_at_pixel(&site.config, DATE, -500.0, 10_000.0).unwrap();
    assert_eq!(result, None);
}

#[test]
fn test_click_unknown_date() {
    let site = SiteFixture::with_date();
    let err = services::tracker_at_pixel(&site.config, "19990101", 1.0, 1.0).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_click_with_only_overlay_images() {
    let site = SiteFixture::with_date();
    let folder = site.date_folder(DATE);
    std::fs::rename(
        folder.join(format!("{}.jpg", DATE_MATCH)),
        folder.join(format!("{}_stage_overlay.jpg", DATE_MATCH)),
    )
    .unwrap();

    let result = services::tracker_at_pixel(&site.config, DATE, 15.0, 15.0).unwrap();
    assert_eq!(result.as_deref(), Some(TRACKER_A));
}

// =============================================================================
// Layout images
// =============================================================================

#[test]
fn test_layout_image_small_served_directly() {
    let site = SiteFixture::with_date();
    let name = format!("{}.jpg", DATE_MATCH);
    let served = services::layout_image(&site.config, DATE, &name).unwrap();

    assert_eq!(served.outcome, CacheOutcome::Direct);
    assert_eq!(
        served.read().unwrap(),
        std::fs::read(site.date_folder(DATE).join(&name)).unwrap()
    );
}

#[test]
fn test_layout_image_downscale_is_cached() {
    let site = SiteFixture::with_date();
    let config = site.config.clone().with_images(ImagePolicy {
        direct_serve_limit: 0,
        web_max_dimension: 40,
        ..ImagePolicy::default()
    });
    let name = format!("{}.jpg", DATE_MATCH);

    let first = services::layout_image(&config, DATE, &name).unwrap();
    assert_eq!(first.outcome, CacheOutcome::Created);
    assert_eq!(
        first.path,
        web_variant_path(&site.date_folder(DATE).join(&name))
    );
    let first_bytes = first.read().unwrap();
    let decoded = image::load_from_memory(&first_bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (40, 20));

    let second = services::layout_image(&config, DATE, &name).unwrap();
    assert_eq!(second.outcome, CacheOutcome::Hit);
    assert_eq!(second.read().unwrap(), first_bytes);

    // The web copy now drives the display size.
    let layout = services::site_layout(&config, DATE).unwrap();
    assert_eq!(layout.display_image_width, 40);
    assert_eq!(layout.image_scale_factor, 2.5);
}

#[test]
fn test_layout_image_rejects_traversal() {
    let site = SiteFixture::with_date();
    for name in ["../secret.jpg", "/etc/passwd", "a/../../b.jpg"] {
        let err = services::layout_image(&site.config, DATE, name).unwrap_err();
        assert!(matches!(err, SiteError::BadRequest(_)), "{}", name);
    }
}

#[test]
fn test_layout_image_missing_file() {
    let site = SiteFixture::with_date();
    let err = services::layout_image(&site.config, DATE, "nope.jpg").unwrap_err();
    assert!(err.is_not_found());
}

// =============================================================================
// Tracker images
// =============================================================================

#[test]
fn test_tracker_image_from_output_group_folder() {
    let site = SiteFixture::with_date();
    let file = format!("{}_boundary.tif", TRACKER_A);
    write_tracker_tiff(
        &site.output_dir().join(DATE_MATCH).join("A01T01").join(&file),
        12,
        6,
    );

    let url = services::tracker_image(&site.config, DATE, TRACKER_A).unwrap();
    assert_eq!(data_url_dimensions(&url), (12, 6));
}

#[test]
fn test_tracker_image_candidate_precedence() {
    let site = SiteFixture::with_date();
    let file = format!("{}_boundary.tif", TRACKER_A);
    let output = site.output_dir().join(DATE_MATCH);
    write_tracker_tiff(&output.join("A01T0").join(&file), 5, 5);
    write_tracker_tiff(&output.join(&file), 6, 6);

    let url = services::tracker_image(&site.config, DATE, TRACKER_A).unwrap();
    assert_eq!(data_url_dimensions(&url), (6, 6));

    write_tracker_tiff(&site.date_folder(DATE).join(DATE_MATCH).join(&file), 7, 7);
    let url = services::tracker_image(&site.config, DATE, TRACKER_A).unwrap();
    assert_eq!(data_url_dimensions(&url), (7, 7));
}

#[test]
fn test_tracker_image_skips_undecodable_candidate() {
    let site = SiteFixture::with_date();
    let file = format!("{}_boundary.tif", TRACKER_A);
    let output = site.output_dir().join(DATE_MATCH);
    std::fs::create_dir_all(&output).unwrap();
    std::fs::write(output.join(&file), b"not a tiff").unwrap();
    write_tracker_tiff(&output.join("A01T0").join(&file), 4, 3);

    let url = services::tracker_image(&site.config, DATE, TRACKER_A).unwrap();
    assert_eq!(data_url_dimensions(&url), (4, 3));
}

#[test]
fn test_tracker_image_is_capped() {
    let site = SiteFixture::with_date();
    let config = site.config.clone().with_images(ImagePolicy {
        tracker_max_dimension: 10,
        ..ImagePolicy::default()
    });
    let file = format!("{}_boundary.tif", TRACKER_B);
    write_tracker_tiff(&site.output_dir().join(DATE_MATCH).join(&file), 40, 20);

    let url = services::tracker_image(&config, DATE, TRACKER_B).unwrap();
    assert_eq!(data_url_dimensions(&url), (10, 5));
}

#[test]
fn test_tracker_image_rejects_path_like_ids() {
    let site = SiteFixture::with_date();
    // Reachable from the layout subfolder as `../<id>_boundary.tif`.
    write_tracker_tiff(&site.date_folder(DATE).join("X_boundary.tif"), 3, 3);

    for id in ["../X", "A01T01/../../X", ".."] {
        let err = services::tracker_image(&site.config, DATE, id).unwrap_err();
        assert!(matches!(err, SiteError::BadRequest(_)), "{}", id);
    }
}

#[test]
fn test_services_reject_malformed_dates() {
    let site = SiteFixture::with_date();
    let escaping = format!("{}/../..", DATE);

    let err = services::site_layout(&site.config, &escaping).unwrap_err();
    assert!(matches!(err, SiteError::BadRequest(_)));
    let err = services::tracker_at_pixel(&site.config, &escaping, 1.0, 1.0).unwrap_err();
    assert!(matches!(err, SiteError::BadRequest(_)));
    let err = services::layout_image(&site.config, &escaping, "secret.txt").unwrap_err();
    assert!(matches!(err, SiteError::BadRequest(_)));
}

#[test]
fn test_tracker_image_not_found_reports_expected_path() {
    let site = SiteFixture::with_date();
    let err = services::tracker_image(&site.config, DATE, "ZZZ").unwrap_err();

    match err {
        SiteError::TrackerImageNotFound {
            message,
            expected_path,
        } => {
            assert_eq!(message, format!("Tracker image not found: ZZZ for date {}", DATE));
            let expected: PathBuf = site
                .date_folder(DATE)
                .join(DATE_MATCH)
                .join("ZZZ_boundary.tif");
            assert_eq!(expected_path, expected);
        }
        other => panic!("unexpected error: {other}"),
    }
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_config_from_env() {
    let config = with_scoped_env(
        &[
            ("BASE_DIR", Some("/srv/site")),
            ("LAYOUT_DIR", Some("/srv/site/layout")),
            ("OUTPUT_DIR", None),
            ("LEWISTIFS_DIR", Some("")),
            ("BOUNDARY_JSON", Some("bounds.json")),
            ("HOST", None),
            ("PORT", Some("8080")),
        ],
        SiteConfig::from_env,
    )
    .unwrap();

    assert_eq!(config.layout_dir, PathBuf::from("/srv/site/layout"));
    assert_eq!(config.output_dir, PathBuf::from("/srv/site/Output_Lewis"));
    assert_eq!(config.tifs_dir, PathBuf::from("/srv/site/Lewistifs"));
    assert_eq!(config.boundary_json, PathBuf::from("/srv/site/layout/bounds.json"));
    assert_eq!(config.port, 8080);
}

#[test]
fn test_config_rejects_bad_port() {
    let result = with_scoped_env(&[("PORT", Some("http"))], SiteConfig::from_env);
    assert!(result.is_err());
}
