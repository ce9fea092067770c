//! Sky-map constants.
//!
//! Plain values with no runtime dependency. The server, the viewer and the
//! simtest harness all read these.

/// Unit conversions and physical constants.
pub mod units {
    /// Light years per parsec.
    pub const LY_PER_PARSEC: f64 = 3.262;
    /// Travel speed used for route labels, in light years per year.
    pub const SPEED_OF_LIGHT_LY_PER_YEAR: f64 = 1.0;
}

/// Defaults for catalog loading and generation.
pub mod defaults {
    pub const PLANET_LIMIT: usize = 30;
    pub const PLANET_SEED: u64 = 42;
    pub const STAR_COUNT: usize = 1000;
    /// Radians added to every planet's azimuth per tick.
    pub const ORBITAL_SPEED: f64 = 0.01;
    pub const TICK_INTERVAL_MS: u64 = 1000;
    pub const DATA_PATH: &str = "data/spacedata.csv";
}

/// Sampling ranges for generated values.
pub mod ranges {
    pub const HABITABILITY: (f64, f64) = (0.0, 100.0);
    pub const LIFE_SIGN: (f64, f64) = (0.0, 10.0);
    pub const WATER_PROBABILITY: f64 = 0.5;
    pub const TEMPERATURE_C: (f64, f64) = (-150.0, 50.0);
    /// Star distances, in the same units the planets are plotted in.
    pub const STAR_DISTANCE: (f64, f64) = (50.0, 1000.0);
}

/// Source column names.
pub mod columns {
    pub const NAME: &str = "pl_name";
    pub const DISTANCE: &str = "sy_dist";
    pub const HABITABILITY: &str = "habitability_percent";
    pub const LIFE_SIGN: &str = "sign_of_life";
    pub const WATER: &str = "water_presence";
    pub const TEMPERATURE: &str = "temperature";
}

/// Colors, sizes and labels of the rendered scene.
pub mod style {
    pub const BACKGROUND: &str = "black";
    pub const FOREGROUND: &str = "white";
    pub const EARTH_COLOR: &str = "blue";
    pub const PLANET_COLOR: &str = "red";
    pub const STAR_COLOR: &str = "white";
    pub const ROUTE_COLOR: &str = "white";

    pub const EARTH_SIZE: f64 = 10.0;
    pub const PLANET_SIZE: f64 = 5.0;
    pub const STAR_SIZE: f64 = 1.0;
    pub const STAR_OPACITY: f64 = 0.8;
    pub const ROUTE_WIDTH: f64 = 2.0;

    pub const TITLE: &str = "Interactive Space Simulation: Earth and Nearby Exoplanets";
    pub const X_TITLE: &str = "X (Light Years)";
    pub const Y_TITLE: &str = "Y (Light Years)";
    pub const Z_TITLE: &str = "Z (Light Years)";

    pub const EARTH_NAME: &str = "Earth";
    pub const PLANETS_NAME: &str = "Exoplanets";
    pub const STARS_NAME: &str = "Stars";
}

/// Text shown in the detail panel before anything is clicked.
pub const DETAIL_PLACEHOLDER: &str = "Click on a line to see details...";
