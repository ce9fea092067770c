//! Pure sky-map logic for Exoviz.
//!
//! This crate holds everything that is independent of any web server,
//! window or runtime: loading the exoplanet catalog, placing planets and
//! stars in 3D, and building the declarative scene a renderer displays.
//! Functions take plain data and return results, so the dashboard server,
//! the native viewer and the headless simtest all share one implementation.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`camera`] | Camera pose, live/stored/default resolution, relayout parsing |
//! | [`catalog`] | CSV catalog loading and synthetic derived columns |
//! | [`config`] | Sky configuration (limits, seeds, star count, tick rate) |
//! | [`constants`] | Unit conversions, defaults, column names, styling |
//! | [`context`] | Immutable sky tables plus the tick/camera/click handlers |
//! | [`coordinates`] | Spherical placement, star field, per-tick re-projection |
//! | [`detail`] | Click payload parsing and detail panel text |
//! | [`error`] | Catalog and config errors |
//! | [`scene`] | Plotly-compatible scene description and tooltips |

pub mod camera;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod context;
pub mod coordinates;
pub mod detail;
pub mod error;
pub mod scene;

pub use camera::CameraPose;
pub use catalog::PlanetRecord;
pub use config::SkyConfig;
pub use context::{CameraInputs, Frame, SkyContext};
pub use error::DataSourceError;
pub use scene::Scene;
