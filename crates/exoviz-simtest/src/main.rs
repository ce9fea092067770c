//! Exoviz Headless Sky Harness
//!
//! Validates the sky-map logic and the bundled catalog without a server or
//! window. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p exoviz-simtest
//!   cargo run -p exoviz-simtest -- --verbose
//!   cargo run -p exoviz-simtest -- path/to/spacedata.csv

use std::f64::consts::{PI, TAU};

use exoviz_logic::camera::{CameraPose, CameraSource};
use exoviz_logic::catalog::{load_planets_from_reader, load_planets_with_rng, PlanetRecord};
use exoviz_logic::constants::{defaults, DETAIL_PLACEHOLDER};
use exoviz_logic::coordinates::{generate_positions, travel_time_years, Vec3};
use exoviz_logic::{CameraInputs, SkyConfig, SkyContext};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

// ── Bundled catalog (same CSV the dashboard serves by default) ──────────
const CATALOG_CSV: &str = include_str!("../../../data/spacedata.csv");

/// Ticks sampled when sweeping the animation.
const TICK_SWEEP: [u64; 6] = [0, 1, 2, 100, 629, 100_000];

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let catalog_path = args.iter().find(|a| !a.starts_with("--")).cloned();
    println!("=== Exoviz Sky Harness ===\n");

    let mut results = Vec::new();

    let planets = match load_catalog(catalog_path.as_deref()) {
        Ok(planets) => planets,
        Err(detail) => {
            println!("  ✗ catalog_load: {}", detail);
            std::process::exit(1);
        }
    };
    let config = SkyConfig {
        star_seed: Some(7),
        ..SkyConfig::default()
    };
    let sky = SkyContext::from_planets(config, planets);

    // 1. Catalog shape
    results.extend(validate_catalog(&sky, verbose));

    // 2. Coordinate transform
    results.extend(validate_coordinates(&sky, verbose));

    // 3. Animation sweep
    results.extend(validate_animation(&sky, verbose));

    // 4. Scene composition
    results.extend(validate_scene(&sky, verbose));

    // 5. Camera precedence
    results.extend(validate_camera(&sky, verbose));

    // 6. Click details
    results.extend(validate_clicks(&sky, verbose));

    // 7. Randomness streams
    results.extend(validate_randomness(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn load_catalog(path: Option<&str>) -> Result<Vec<PlanetRecord>, String> {
    let mut rng = StdRng::seed_from_u64(7);
    let loaded = match path {
        Some(path) => load_planets_with_rng(path, defaults::PLANET_LIMIT, &mut rng),
        None => load_planets_from_reader(CATALOG_CSV.as_bytes(), defaults::PLANET_LIMIT, &mut rng),
    };
    loaded.map_err(|e| e.to_string())
}

// ── 1. Catalog ──────────────────────────────────────────────────────────

fn validate_catalog(sky: &SkyContext, verbose: bool) -> Vec<TestResult> {
    println!("--- Catalog ---");
    let mut results = Vec::new();
    let planets = sky.planets();

    results.push(TestResult::new(
        "catalog_not_empty",
        !planets.is_empty(),
        format!("{} planets loaded", planets.len()),
    ));

    results.push(TestResult::new(
        "catalog_within_limit",
        planets.len() <= defaults::PLANET_LIMIT,
        format!("limit {}", defaults::PLANET_LIMIT),
    ));

    let unnamed: Vec<_> = planets.iter().filter(|p| p.name.is_empty()).collect();
    results.push(TestResult::new(
        "catalog_names_present",
        unnamed.is_empty(),
        if unnamed.is_empty() {
            "all planets named".to_string()
        } else {
            format!("{} unnamed planets", unnamed.len())
        },
    ));

    // NaN distances are legal input; report them rather than fail.
    let nan_distances = planets.iter().filter(|p| p.distance_parsecs.is_nan()).count();
    results.push(TestResult::new(
        "catalog_distances",
        true,
        format!("{} rows with unparsable distance", nan_distances),
    ));

    let out_of_range: Vec<&str> = planets
        .iter()
        .filter(|p| {
            !(0.0..=100.0).contains(&p.habitability_percent)
                || !(0.0..=10.0).contains(&p.life_sign_score)
                || !(-150.0..=50.0).contains(&p.temperature_celsius)
        })
        .map(|p| p.name.as_str())
        .collect();
    results.push(TestResult::new(
        "catalog_derived_ranges",
        out_of_range.is_empty(),
        if out_of_range.is_empty() {
            "derived columns within documented ranges".to_string()
        } else {
            format!("out of range: {}", out_of_range.join(", "))
        },
    ));

    if verbose {
        for p in planets.iter().take(5) {
            println!(
                "  {:<20} {:>9.3} pc  hab {:>6.2}%  water {}",
                p.name,
                p.distance_parsecs,
                p.habitability_percent,
                if p.has_water { "yes" } else { "no" }
            );
        }
    }

    results
}

// ── 2. Coordinates ──────────────────────────────────────────────────────

fn validate_coordinates(sky: &SkyContext, verbose: bool) -> Vec<TestResult> {
    println!("--- Coordinates ---");
    let mut results = Vec::new();
    let valid = || {
        sky.planets()
            .iter()
            .zip(sky.placements())
            .filter(|(p, _)| p.distance_parsecs.is_finite())
    };

    let bad_conversion = valid()
        .filter(|(p, pl)| (pl.distance_ly - p.distance_parsecs * 3.262).abs() > 1e-9)
        .count();
    results.push(TestResult::new(
        "coords_parsec_conversion",
        bad_conversion == 0,
        format!("{} mismatched conversions", bad_conversion),
    ));

    let off_sphere = valid()
        .filter(|(_, pl)| {
            let r2 = pl.initial_position().length_squared();
            let d2 = pl.distance_ly * pl.distance_ly;
            (r2 - d2).abs() > 1e-6 * d2.max(1.0)
        })
        .count();
    results.push(TestResult::new(
        "coords_on_sphere",
        off_sphere == 0,
        format!("{} planets off their distance sphere", off_sphere),
    ));

    let bad_travel = valid()
        .filter(|(_, pl)| travel_time_years(pl.distance_ly) != pl.distance_ly)
        .count();
    results.push(TestResult::new(
        "coords_travel_time",
        bad_travel == 0,
        "travel time equals light-year distance",
    ));

    let bad_angles = sky
        .placements()
        .iter()
        .filter(|pl| !(0.0..TAU).contains(&pl.theta) || !(0.0..PI).contains(&pl.phi))
        .count();
    results.push(TestResult::new(
        "coords_angle_ranges",
        bad_angles == 0,
        format!("{} placements with out-of-range angles", bad_angles),
    ));

    if verbose {
        if let Some(pl) = sky.placements().first() {
            let p = pl.initial_position();
            println!(
                "  first planet at ({:.3}, {:.3}, {:.3}) ly, θ={:.4} φ={:.4}",
                p.x, p.y, p.z, pl.theta, pl.phi
            );
        }
    }

    results
}

// ── 3. Animation ────────────────────────────────────────────────────────

fn validate_animation(sky: &SkyContext, _verbose: bool) -> Vec<TestResult> {
    println!("--- Animation ---");
    let mut results = Vec::new();
    let speed = sky.config().orbital_speed;

    let mut bad_theta = 0;
    let mut moved_z = 0;
    for pl in sky.placements() {
        let z0 = pl.initial_position().z;
        for &n in &TICK_SWEEP {
            let k = 37;
            let delta = pl.theta_at(n + k, speed) - pl.theta_at(n, speed);
            if (delta - speed * k as f64).abs() > 1e-9 {
                bad_theta += 1;
            }
            let z = pl.position_at(n, speed).z;
            if z != z0 && !(z.is_nan() && z0.is_nan()) {
                moved_z += 1;
            }
        }
    }

    results.push(TestResult::new(
        "anim_theta_linear",
        bad_theta == 0,
        format!("{} non-linear azimuth steps", bad_theta),
    ));
    results.push(TestResult::new(
        "anim_z_frozen",
        moved_z == 0,
        format!("{} samples where z moved", moved_z),
    ));

    results
}

// ── 4. Scene ────────────────────────────────────────────────────────────

fn validate_scene(sky: &SkyContext, verbose: bool) -> Vec<TestResult> {
    println!("--- Scene ---");
    let mut results = Vec::new();
    let n = sky.planets().len();

    for &tick in &TICK_SWEEP {
        let scene = sky.on_tick(tick, &CameraInputs::default()).scene;
        let earth = scene.earth().map(|t| t.point_count()).unwrap_or(0);
        let planets = scene.planets().map(|t| t.point_count()).unwrap_or(0);
        let routes = scene.routes().count();
        let stars = scene.stars().map(|t| t.point_count()).unwrap_or(0);
        let ok = earth == 1 && planets == n && routes == n && stars == sky.config().star_count;
        results.push(TestResult::new(
            &format!("scene_counts_tick_{}", tick),
            ok,
            format!(
                "earth={} planets={} routes={} stars={}",
                earth, planets, routes, stars
            ),
        ));
    }

    let scene = sky.on_tick(0, &CameraInputs::default()).scene;
    let routes_anchored = scene
        .routes()
        .all(|r| r.point(0) == Some(Vec3::ZERO) && r.point_count() == 2);
    results.push(TestResult::new(
        "scene_routes_from_earth",
        routes_anchored,
        "every route starts at the origin",
    ));

    let labelled = scene
        .routes()
        .zip(sky.planets())
        .all(|(r, p)| {
            r.hovertext_at(0)
                .map(|t| t.starts_with(&format!("Time to {}: ", p.name)) && t.ends_with(" years"))
                .unwrap_or(false)
        });
    results.push(TestResult::new(
        "scene_route_labels",
        labelled,
        "route tooltips carry travel time",
    ));

    match serde_json::to_string(&scene) {
        Ok(json) => {
            if verbose {
                println!("  scene JSON: {} bytes", json.len());
            }
            results.push(TestResult::new("scene_serializes", true, format!("{} bytes", json.len())));
        }
        Err(e) => results.push(TestResult::new("scene_serializes", false, e.to_string())),
    }

    results
}

// ── 5. Camera ───────────────────────────────────────────────────────────

fn validate_camera(sky: &SkyContext, _verbose: bool) -> Vec<TestResult> {
    println!("--- Camera ---");
    let mut results = Vec::new();
    let live = CameraPose {
        eye: Vec3::new(1.5, 1.5, 0.8),
        ..CameraPose::default()
    };
    let stored = CameraPose {
        eye: Vec3::new(-2.0, 0.5, 0.1),
        ..CameraPose::default()
    };

    let cases = [
        ("camera_live_wins", Some(live), Some(stored), live, CameraSource::Live),
        ("camera_stored_fallback", None, Some(stored), stored, CameraSource::Stored),
        ("camera_default", None, None, CameraPose::default(), CameraSource::Default),
    ];
    for (name, live, stored, expected, source) in cases {
        let frame = sky.on_tick(5, &CameraInputs { live, stored });
        let ok = frame.camera == expected
            && frame.camera_source == source
            && *frame.scene.camera() == expected;
        results.push(TestResult::new(name, ok, format!("resolved from {:?}", frame.camera_source)));
    }

    let relayout = json!({"scene.camera": serde_json::to_value(live).unwrap_or_default()});
    let inputs = CameraInputs::from_relayout(Some(&relayout), Some(stored));
    let frame = sky.on_camera_change(6, &inputs);
    results.push(TestResult::new(
        "camera_relayout_payload",
        frame.camera == live,
        "relayout scene.camera parsed as live pose",
    ));

    results
}

// ── 6. Clicks ───────────────────────────────────────────────────────────

fn validate_clicks(sky: &SkyContext, _verbose: bool) -> Vec<TestResult> {
    println!("--- Clicks ---");
    let mut results = Vec::new();

    results.push(TestResult::new(
        "click_placeholder",
        sky.detail_text(None) == DETAIL_PLACEHOLDER,
        "placeholder before any click",
    ));

    let scene = sky.on_tick(0, &CameraInputs::default()).scene;
    if let Some(text) = scene.routes().next().and_then(|r| r.hovertext_at(0)) {
        let stored = sky.on_click(&json!({"points": [{"hovertext": text}]}));
        let shown = sky.detail_text(stored.as_deref());
        results.push(TestResult::new(
            "click_route_detail",
            shown == format!("Details: {}", text),
            shown,
        ));
    }

    let star_click = sky.on_click(&json!({"points": [{"curveNumber": 2, "pointNumber": 10}]}));
    results.push(TestResult::new(
        "click_star_ignored",
        star_click.is_none(),
        "stars carry no hover text",
    ));

    results
}

// ── 7. Randomness ───────────────────────────────────────────────────────

fn validate_randomness(_verbose: bool) -> Vec<TestResult> {
    println!("--- Randomness ---");
    let mut results = Vec::new();
    let distances = [1.3, 4.2, 10.0, 50.0];

    let a = generate_positions(&distances, Some(defaults::PLANET_SEED), 100);
    let b = generate_positions(&distances, Some(defaults::PLANET_SEED), 100);
    results.push(TestResult::new(
        "random_planet_seed_stable",
        a.placements == b.placements,
        "fixed seed reproduces planet layout",
    ));
    results.push(TestResult::new(
        "random_star_stream_independent",
        a.stars != b.stars,
        "unseeded star field differs between runs",
    ));

    results
}
