//! Planet and star placement in 3D.
//!
//! Planets sit at their catalog distance (in light years) along a random
//! direction drawn once from a seeded stream. Stars are scattered through a
//! larger shell from a second, independent stream. Animation rotates each
//! planet about the Z axis by a fixed angle per tick; the Z coordinate keeps
//! its tick-0 value, so motion is confined to the XY plane.

use std::f64::consts::{PI, TAU};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::constants::{ranges, units};

/// Cartesian point, serialized as `{x, y, z}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }
}

/// Fixed angular placement of one planet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetPlacement {
    pub distance_ly: f64,
    /// Azimuth around +Z, in `[0, 2π)`.
    pub theta: f64,
    /// Polar angle from +Z, in `[0, π)`.
    pub phi: f64,
}

impl PlanetPlacement {
    /// Azimuth after `tick` animation steps.
    pub fn theta_at(&self, tick: u64, orbital_speed: f64) -> f64 {
        self.theta + orbital_speed * tick as f64
    }

    /// Position at tick 0.
    pub fn initial_position(&self) -> Vec3 {
        spherical_to_cartesian(self.distance_ly, self.theta, self.phi)
    }

    /// Position after `tick` steps. Only x and y follow the advanced angle.
    pub fn position_at(&self, tick: u64, orbital_speed: f64) -> Vec3 {
        let theta = self.theta_at(tick, orbital_speed);
        let radial = self.distance_ly * self.phi.sin();
        Vec3 {
            x: radial * theta.cos(),
            y: radial * theta.sin(),
            z: self.distance_ly * self.phi.cos(),
        }
    }

    /// Years to reach the planet at the route speed.
    pub fn travel_time_years(&self) -> f64 {
        travel_time_years(self.distance_ly)
    }
}

/// Everything the generator produces at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPositions {
    pub placements: Vec<PlanetPlacement>,
    /// Planet positions at tick 0, parallel to `placements`.
    pub planets: Vec<Vec3>,
    pub stars: Vec<Vec3>,
}

pub fn parsecs_to_light_years(parsecs: f64) -> f64 {
    parsecs * units::LY_PER_PARSEC
}

pub fn travel_time_years(distance_ly: f64) -> f64 {
    distance_ly / units::SPEED_OF_LIGHT_LY_PER_YEAR
}

/// `theta` is the azimuth around +Z, `phi` the polar angle from +Z.
pub fn spherical_to_cartesian(distance: f64, theta: f64, phi: f64) -> Vec3 {
    Vec3 {
        x: distance * phi.sin() * theta.cos(),
        y: distance * phi.sin() * theta.sin(),
        z: distance * phi.cos(),
    }
}

/// Place planets and stars.
///
/// `seed` pins the planet directions; `None` draws them from entropy. The
/// star field always uses an entropy-seeded stream.
pub fn generate_positions(
    distances_parsecs: &[f64],
    seed: Option<u64>,
    n_extra_points: usize,
) -> GeneratedPositions {
    let mut planet_rng = seeded_or_entropy(seed);
    let mut star_rng = StdRng::from_entropy();
    generate_positions_with(distances_parsecs, &mut planet_rng, &mut star_rng, n_extra_points)
}

/// Place planets and stars from caller-supplied streams.
pub fn generate_positions_with<P, S>(
    distances_parsecs: &[f64],
    planet_rng: &mut P,
    star_rng: &mut S,
    n_extra_points: usize,
) -> GeneratedPositions
where
    P: Rng + ?Sized,
    S: Rng + ?Sized,
{
    let placements = place_planets(distances_parsecs, planet_rng);
    let planets = placements.iter().map(PlanetPlacement::initial_position).collect();
    let stars = generate_star_field(n_extra_points, star_rng);
    GeneratedPositions {
        placements,
        planets,
        stars,
    }
}

/// All azimuths are drawn before any polar angle.
pub fn place_planets<R: Rng + ?Sized>(
    distances_parsecs: &[f64],
    rng: &mut R,
) -> Vec<PlanetPlacement> {
    let thetas: Vec<f64> = distances_parsecs
        .iter()
        .map(|_| rng.gen_range(0.0..TAU))
        .collect();
    let phis: Vec<f64> = distances_parsecs
        .iter()
        .map(|_| rng.gen_range(0.0..PI))
        .collect();

    distances_parsecs
        .iter()
        .zip(thetas.into_iter().zip(phis))
        .map(|(&parsecs, (theta, phi))| PlanetPlacement {
            distance_ly: parsecs_to_light_years(parsecs),
            theta,
            phi,
        })
        .collect()
}

/// Distances first, then azimuths, then polar angles.
pub fn generate_star_field<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Vec3> {
    let (near, far) = ranges::STAR_DISTANCE;
    let distances: Vec<f64> = (0..count).map(|_| rng.gen_range(near..far)).collect();
    let thetas: Vec<f64> = (0..count).map(|_| rng.gen_range(0.0..TAU)).collect();
    let phis: Vec<f64> = (0..count).map(|_| rng.gen_range(0.0..PI)).collect();

    distances
        .iter()
        .zip(thetas.iter().zip(phis.iter()))
        .map(|(&d, (&theta, &phi))| spherical_to_cartesian(d, theta, phi))
        .collect()
}

/// Planet positions after `tick` steps.
pub fn positions_at_tick(
    placements: &[PlanetPlacement],
    tick: u64,
    orbital_speed: f64,
) -> Vec<Vec3> {
    placements
        .iter()
        .map(|p| p.position_at(tick, orbital_speed))
        .collect()
}

pub(crate) fn seeded_or_entropy(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
