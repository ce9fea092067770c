//! Sky context: the fixed tables plus the three event handlers.
//!
//! [`SkyContext::initialize`] does all the one-time work (catalog load,
//! planet placement, star field). After that the context is immutable and
//! every handler is a pure function of its arguments, so a collaborator can
//! share one context across threads and call the handlers in any order.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::camera::{camera_from_relayout, resolve_camera, CameraPose, CameraSource};
use crate::catalog::{load_planets_with_rng, PlanetRecord};
use crate::config::SkyConfig;
use crate::coordinates::{
    generate_positions_with, seeded_or_entropy, PlanetPlacement, Vec3,
};
use crate::detail::{clicked_hovertext, detail_text};
use crate::error::DataSourceError;
use crate::scene::{build_scene, Scene};

/// Output of a tick or camera event.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub scene: Scene,
    /// Pose the scene was built with; the collaborator stores it.
    pub camera: CameraPose,
    #[serde(skip)]
    pub camera_source: CameraSource,
}

/// Camera inputs for one event, as reported by the collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CameraInputs {
    /// Live pose from the current interaction, if any.
    pub live: Option<CameraPose>,
    /// Last persisted pose, if any.
    pub stored: Option<CameraPose>,
}

impl CameraInputs {
    /// Build inputs from a raw relayout payload and a stored pose.
    pub fn from_relayout(relayout: Option<&Value>, stored: Option<CameraPose>) -> Self {
        Self {
            live: relayout.and_then(camera_from_relayout),
            stored,
        }
    }
}

/// Immutable tables shared by every handler call.
#[derive(Debug, Clone)]
pub struct SkyContext {
    config: SkyConfig,
    planets: Vec<PlanetRecord>,
    placements: Vec<PlanetPlacement>,
    stars: Vec<Vec3>,
}

impl SkyContext {
    /// Load the catalog named by `config` and generate all positions.
    pub fn initialize(config: SkyConfig) -> Result<Self, DataSourceError> {
        let mut star_rng = seeded_or_entropy(config.star_seed);
        let planets = load_planets_with_rng(&config.data_path, config.planet_limit, &mut star_rng)?;
        Ok(Self::build(config, planets, &mut star_rng))
    }

    /// Build a context from planets that are already in memory.
    pub fn from_planets(config: SkyConfig, planets: Vec<PlanetRecord>) -> Self {
        let mut star_rng = seeded_or_entropy(config.star_seed);
        Self::build(config, planets, &mut star_rng)
    }

    fn build(config: SkyConfig, mut planets: Vec<PlanetRecord>, star_rng: &mut StdRng) -> Self {
        planets.truncate(config.planet_limit);
        let distances: Vec<f64> = planets.iter().map(|p| p.distance_parsecs).collect();
        let mut planet_rng = seeded_or_entropy(config.planet_seed);
        let generated =
            generate_positions_with(&distances, &mut planet_rng, star_rng, config.star_count);

        log::info!(
            "Sky ready: {} planets, {} stars (planet seed {:?})",
            planets.len(),
            generated.stars.len(),
            config.planet_seed
        );

        Self {
            config,
            planets,
            placements: generated.placements,
            stars: generated.stars,
        }
    }

    pub fn config(&self) -> &SkyConfig {
        &self.config
    }

    pub fn planets(&self) -> &[PlanetRecord] {
        &self.planets
    }

    pub fn placements(&self) -> &[PlanetPlacement] {
        &self.placements
    }

    pub fn stars(&self) -> &[Vec3] {
        &self.stars
    }

    /// Timer handler: the figure for `tick`.
    pub fn on_tick(&self, tick: u64, camera: &CameraInputs) -> Frame {
        let (pose, source) = resolve_camera(camera.live.as_ref(), camera.stored.as_ref());
        Frame {
            scene: self.scene_at(tick, pose),
            camera: pose,
            camera_source: source,
        }
    }

    /// Camera handler. Resolution is identical to a tick; collaborators call
    /// it to redraw immediately after a drag instead of waiting for the timer.
    pub fn on_camera_change(&self, tick: u64, camera: &CameraInputs) -> Frame {
        self.on_tick(tick, camera)
    }

    /// Click handler: the text to store for a Plotly click payload.
    pub fn on_click(&self, click: &Value) -> Option<String> {
        clicked_hovertext(click)
    }

    /// Detail panel text for the stored click.
    pub fn detail_text(&self, stored: Option<&str>) -> String {
        detail_text(stored)
    }

    /// Build the scene for `tick` with an already-resolved camera.
    pub fn scene_at(&self, tick: u64, camera: CameraPose) -> Scene {
        build_scene(
            tick,
            &self.planets,
            &self.placements,
            &self.stars,
            camera,
            self.config.orbital_speed,
        )
    }
}
