//! Declarative scene description.
//!
//! A [`Scene`] is a list of `scatter3d` traces plus layout, serialized in the
//! shape Plotly's `react` call expects. Earth, planets and stars are marker
//! traces; each Earth-to-planet route is its own line trace so it can be
//! hovered and clicked individually.

use serde::Serialize;

use crate::camera::CameraPose;
use crate::catalog::PlanetRecord;
use crate::constants::style;
use crate::coordinates::{positions_at_tick, PlanetPlacement, Vec3};

const SCATTER_3D: &str = "scatter3d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TraceMode {
    #[serde(rename = "markers")]
    Markers,
    #[serde(rename = "markers+text")]
    MarkersText,
    #[serde(rename = "lines")]
    Lines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HoverInfo {
    Text,
    None,
}

/// Hover text for a whole trace or for each of its points.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HoverText {
    Shared(String),
    PerPoint(Vec<String>),
}

/// What a trace depicts. Not sent to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceRole {
    Earth,
    Planets,
    Stars,
    /// Line from Earth to the planet at this catalog index.
    Route(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub size: f64,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    #[serde(skip)]
    pub role: TraceRole,
    pub mode: TraceMode,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<MarkerStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertext: Option<HoverText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<HoverInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
}

impl Trace {
    fn new(name: impl Into<String>, role: TraceRole, mode: TraceMode, points: &[Vec3]) -> Self {
        Self {
            kind: SCATTER_3D,
            name: name.into(),
            role,
            mode,
            x: points.iter().map(|p| p.x).collect(),
            y: points.iter().map(|p| p.y).collect(),
            z: points.iter().map(|p| p.z).collect(),
            marker: None,
            line: None,
            text: None,
            hovertext: None,
            hoverinfo: None,
            textposition: None,
            showlegend: None,
        }
    }

    pub fn point_count(&self) -> usize {
        self.x.len()
    }

    pub fn point(&self, index: usize) -> Option<Vec3> {
        Some(Vec3::new(
            *self.x.get(index)?,
            *self.y.get(index)?,
            *self.z.get(index)?,
        ))
    }

    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        (0..self.point_count()).filter_map(|i| self.point(i))
    }

    /// Hover text a click on point `index` would report.
    pub fn hovertext_at(&self, index: usize) -> Option<&str> {
        match self.hovertext.as_ref()? {
            HoverText::Shared(text) => Some(text),
            HoverText::PerPoint(texts) => texts.get(index).map(String::as_str),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: AxisTitle,
    pub backgroundcolor: String,
    pub showgrid: bool,
    pub zeroline: bool,
}

impl Axis {
    fn dark(title: &str) -> Self {
        Self {
            title: AxisTitle { text: title.to_string() },
            backgroundcolor: style::BACKGROUND.to_string(),
            showgrid: false,
            zeroline: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneAxes {
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub zaxis: Axis,
    pub camera: CameraPose,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    pub x: f64,
    pub xanchor: &'static str,
    pub yanchor: &'static str,
    pub font: Font,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub scene: SceneAxes,
    pub paper_bgcolor: String,
    pub title: Title,
    pub font: Font,
    pub showlegend: bool,
}

impl Layout {
    fn space(camera: CameraPose) -> Self {
        let white = || Font {
            color: style::FOREGROUND.to_string(),
        };
        Self {
            scene: SceneAxes {
                xaxis: Axis::dark(style::X_TITLE),
                yaxis: Axis::dark(style::Y_TITLE),
                zaxis: Axis::dark(style::Z_TITLE),
                camera,
            },
            paper_bgcolor: style::BACKGROUND.to_string(),
            title: Title {
                text: style::TITLE.to_string(),
                x: 0.5,
                xanchor: "center",
                yanchor: "top",
                font: white(),
            },
            font: white(),
            showlegend: true,
        }
    }
}

/// A complete figure: traces plus layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Scene {
    pub fn traces_with(&self, keep: impl Fn(TraceRole) -> bool) -> impl Iterator<Item = &Trace> {
        self.data.iter().filter(move |t| keep(t.role))
    }

    pub fn earth(&self) -> Option<&Trace> {
        self.traces_with(|r| r == TraceRole::Earth).next()
    }

    pub fn planets(&self) -> Option<&Trace> {
        self.traces_with(|r| r == TraceRole::Planets).next()
    }

    pub fn stars(&self) -> Option<&Trace> {
        self.traces_with(|r| r == TraceRole::Stars).next()
    }

    pub fn routes(&self) -> impl Iterator<Item = &Trace> {
        self.traces_with(|r| matches!(r, TraceRole::Route(_)))
    }

    pub fn camera(&self) -> &CameraPose {
        &self.layout.scene.camera
    }
}

/// Tooltip for a planet marker.
pub fn planet_hovertext(planet: &PlanetRecord, distance_ly: f64) -> String {
    format!(
        "<b>{}</b><br>Distance: {:.2} light years<br>Habitability: {:.2}%<br>\
         Signs of Life: {:.2}%<br>Water: {}<br>Temperature: {:.2}°C",
        planet.name,
        distance_ly,
        planet.habitability_percent,
        planet.life_sign_score,
        if planet.has_water { "Yes" } else { "No" },
        planet.temperature_celsius,
    )
}

/// Tooltip for an Earth-to-planet route.
pub fn route_hovertext(name: &str, travel_time_years: f64) -> String {
    format!("Time to {}: {:.2} years", name, travel_time_years)
}

/// Build the figure for `tick`.
///
/// `planets` and `placements` are parallel; `camera` is already resolved.
pub fn build_scene(
    tick: u64,
    planets: &[PlanetRecord],
    placements: &[PlanetPlacement],
    stars: &[Vec3],
    camera: CameraPose,
    orbital_speed: f64,
) -> Scene {
    debug_assert_eq!(
        planets.len(),
        placements.len(),
        "every planet needs exactly one placement"
    );
    let positions = positions_at_tick(placements, tick, orbital_speed);

    let mut data = Vec::with_capacity(3 + planets.len());

    let mut earth = Trace::new(
        style::EARTH_NAME,
        TraceRole::Earth,
        TraceMode::Markers,
        &[Vec3::ZERO],
    );
    earth.marker = Some(MarkerStyle {
        size: style::EARTH_SIZE,
        color: style::EARTH_COLOR.to_string(),
        opacity: None,
    });
    data.push(earth);

    let mut exoplanets = Trace::new(
        style::PLANETS_NAME,
        TraceRole::Planets,
        TraceMode::MarkersText,
        &positions,
    );
    exoplanets.marker = Some(MarkerStyle {
        size: style::PLANET_SIZE,
        color: style::PLANET_COLOR.to_string(),
        opacity: None,
    });
    exoplanets.text = Some(planets.iter().map(|p| p.name.clone()).collect());
    exoplanets.hovertext = Some(HoverText::PerPoint(
        planets
            .iter()
            .zip(placements)
            .map(|(planet, placement)| planet_hovertext(planet, placement.distance_ly))
            .collect(),
    ));
    exoplanets.hoverinfo = Some(HoverInfo::Text);
    exoplanets.textposition = Some("top center");
    data.push(exoplanets);

    let mut star_field = Trace::new(style::STARS_NAME, TraceRole::Stars, TraceMode::Markers, stars);
    star_field.marker = Some(MarkerStyle {
        size: style::STAR_SIZE,
        color: style::STAR_COLOR.to_string(),
        opacity: Some(style::STAR_OPACITY),
    });
    star_field.hoverinfo = Some(HoverInfo::None);
    data.push(star_field);

    for (i, ((planet, placement), position)) in
        planets.iter().zip(placements).zip(&positions).enumerate()
    {
        let mut route = Trace::new(
            format!("To {}", planet.name),
            TraceRole::Route(i),
            TraceMode::Lines,
            &[Vec3::ZERO, *position],
        );
        route.line = Some(LineStyle {
            color: style::ROUTE_COLOR.to_string(),
            width: style::ROUTE_WIDTH,
        });
        route.hovertext = Some(HoverText::Shared(route_hovertext(
            &planet.name,
            placement.travel_time_years(),
        )));
        route.hoverinfo = Some(HoverInfo::Text);
        route.showlegend = Some(false);
        data.push(route);
    }

    log::debug!("Built scene for tick {} with {} traces", tick, data.len());

    Scene {
        data,
        layout: Layout::space(camera),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::coordinates::{generate_star_field, place_planets};

    fn planet(name: &str, parsecs: f64) -> PlanetRecord {
        PlanetRecord {
            name: name.to_string(),
            distance_parsecs: parsecs,
            habitability_percent: 42.126,
            life_sign_score: 3.5,
            has_water: true,
            temperature_celsius: -12.0,
        }
    }

    fn fixture() -> (Vec<PlanetRecord>, Vec<PlanetPlacement>, Vec<Vec3>) {
        let planets = vec![planet("Kepler-1b", 10.0), planet("Proxima b", 1.3)];
        let distances: Vec<f64> = planets.iter().map(|p| p.distance_parsecs).collect();
        let placements = place_planets(&distances, &mut StdRng::seed_from_u64(42));
        let stars = generate_star_field(1000, &mut StdRng::seed_from_u64(9));
        (planets, placements, stars)
    }

    #[test]
    fn test_scene_counts() {
        let (planets, placements, stars) = fixture();
        for tick in [0, 1, 500] {
            let scene = build_scene(tick, &planets, &placements, &stars, CameraPose::default(), 0.01);
            assert_eq!(scene.earth().unwrap().point_count(), 1);
            assert_eq!(scene.planets().unwrap().point_count(), 2);
            assert_eq!(scene.routes().count(), 2);
            assert_eq!(scene.stars().unwrap().point_count(), 1000);
            assert_eq!(scene.data.len(), 5);
        }
    }

    #[test]
    fn test_earth_at_origin() {
        let (planets, placements, stars) = fixture();
        let scene = build_scene(3, &planets, &placements, &stars, CameraPose::default(), 0.01);
        assert_eq!(scene.earth().unwrap().point(0), Some(Vec3::ZERO));
    }

    #[test]
    fn test_route_tooltip_example() {
        let (planets, placements, stars) = fixture();
        let scene = build_scene(0, &planets, &placements, &stars, CameraPose::default(), 0.01);
        let route = scene.routes().next().unwrap();
        assert_eq!(route.name, "To Kepler-1b");
        assert_eq!(route.hovertext_at(0), Some("Time to Kepler-1b: 32.62 years"));
        assert_eq!(route.showlegend, Some(false));
    }

    #[test]
    fn test_routes_end_at_planets() {
        let (planets, placements, stars) = fixture();
        let scene = build_scene(77, &planets, &placements, &stars, CameraPose::default(), 0.01);
        let markers = scene.planets().unwrap();
        for (i, route) in scene.routes().enumerate() {
            assert_eq!(route.role, TraceRole::Route(i));
            assert_eq!(route.point(0), Some(Vec3::ZERO));
            assert_eq!(route.point(1), markers.point(i));
        }
    }

    #[test]
    fn test_planet_tooltip_format() {
        let text = planet_hovertext(&planet("Kepler-1b", 10.0), 32.62);
        assert_eq!(
            text,
            "<b>Kepler-1b</b><br>Distance: 32.62 light years<br>Habitability: 42.13%<br>\
             Signs of Life: 3.50%<br>Water: Yes<br>Temperature: -12.00°C"
        );
        let mut dry = planet("Dry", 1.0);
        dry.has_water = false;
        assert!(planet_hovertext(&dry, 3.262).contains("Water: No"));
    }

    #[test]
    fn test_stars_are_quiet() {
        let (planets, placements, stars) = fixture();
        let scene = build_scene(0, &planets, &placements, &stars, CameraPose::default(), 0.01);
        let field = scene.stars().unwrap();
        assert_eq!(field.hoverinfo, Some(HoverInfo::None));
        assert!(field.hovertext.is_none());
        let marker = field.marker.as_ref().unwrap();
        assert_eq!(marker.size, 1.0);
        assert_eq!(marker.opacity, Some(0.8));
    }

    #[test]
    fn test_layout_styling() {
        let (planets, placements, stars) = fixture();
        let scene = build_scene(0, &planets, &placements, &stars, CameraPose::default(), 0.01);
        let layout = &scene.layout;
        assert_eq!(layout.paper_bgcolor, "black");
        assert_eq!(layout.font.color, "white");
        assert_eq!(layout.title.x, 0.5);
        assert_eq!(layout.title.xanchor, "center");
        for axis in [&layout.scene.xaxis, &layout.scene.yaxis, &layout.scene.zaxis] {
            assert!(!axis.showgrid);
            assert!(!axis.zeroline);
            assert_eq!(axis.backgroundcolor, "black");
        }
        assert_eq!(layout.scene.xaxis.title.text, "X (Light Years)");
    }

    #[test]
    fn test_serialized_shape() {
        let (planets, placements, stars) = fixture();
        let scene = build_scene(0, &planets, &placements, &stars, CameraPose::default(), 0.01);
        let value = serde_json::to_value(&scene).unwrap();
        assert_eq!(value["data"][0]["type"], "scatter3d");
        assert_eq!(value["data"][1]["mode"], "markers+text");
        assert_eq!(value["data"][1]["textposition"], "top center");
        assert_eq!(value["data"][2]["hoverinfo"], "none");
        assert_eq!(value["data"][3]["mode"], "lines");
        assert!(value["data"][3]["hovertext"].is_string());
        assert!(value["data"][1]["hovertext"].is_array());
        assert!(value["data"][0].get("role").is_none());
        assert_eq!(value["layout"]["scene"]["camera"]["up"]["z"], 1.0);
    }

    #[test]
    fn test_planet_markers_follow_tick_projection() {
        let (planets, placements, stars) = fixture();
        let scene = build_scene(37, &planets, &placements, &stars, CameraPose::default(), 0.01);
        let markers: Vec<Vec3> = scene.planets().unwrap().points().collect();
        assert_eq!(markers, positions_at_tick(&placements, 37, 0.01));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "every planet needs exactly one placement")]
    fn test_mismatched_tables_are_rejected() {
        let (planets, placements, stars) = fixture();
        build_scene(0, &planets, &placements[..1], &stars, CameraPose::default(), 0.01);
    }

    #[test]
    fn test_empty_catalog_still_has_earth_and_stars() {
        let stars = generate_star_field(1000, &mut StdRng::seed_from_u64(1));
        let scene = build_scene(0, &[], &[], &stars, CameraPose::default(), 0.01);
        assert_eq!(scene.earth().unwrap().point_count(), 1);
        assert_eq!(scene.planets().unwrap().point_count(), 0);
        assert_eq!(scene.routes().count(), 0);
        assert_eq!(scene.stars().unwrap().point_count(), 1000);
    }
}
