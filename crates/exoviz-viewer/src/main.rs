//! Exoviz Viewer - Bevy-based sky map for the exoplanet catalog
//!
//! Draws the same per-tick scene the dashboard serves, with gizmos instead of
//! Plotly. Left-drag orbits, wheel zooms, left-click inspects a route or a
//! planet, Space pauses the orbit.

use std::path::Path;
use std::time::Duration;

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use exoviz_logic::camera::CameraSource;
use exoviz_logic::constants::{style, DETAIL_PLACEHOLDER};
use exoviz_logic::coordinates::Vec3 as SkyVec3;
use exoviz_logic::scene::{TraceMode, TraceRole};
use exoviz_logic::{CameraInputs, CameraPose, Scene, SkyConfig, SkyContext};
use serde_json::json;

/// Camera pose survives restarts in this file, relative to the working directory.
const CAMERA_FILE: &str = "exoviz-camera.json";

/// Clicks farther than this from every route and planet pick nothing.
const PICK_RADIUS_PX: f32 = 12.0;
/// Mouse travel below this still counts as a click rather than a drag.
const CLICK_SLOP_PX: f32 = 4.0;

const ORBIT_SPEED: f64 = 0.005;
const ZOOM_SPEED: f64 = 0.1;
const MAX_ELEVATION: f64 = 1.55;
const MIN_EYE_DISTANCE: f64 = 0.0005;
const MAX_EYE_DISTANCE: f64 = 4.0;

/// Marker radius per unit of Plotly marker size, per light year of view distance.
const MARKER_SCALE: f32 = 0.002;

fn main() -> AppExit {
    let mut app = App::new();
    // LogPlugin installs the subscriber here, so catalog errors below are logged.
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: style::TITLE.to_string(),
            resolution: (1280.0, 720.0).into(),
            present_mode: bevy::window::PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }));

    let Some(sky) = load_sky(std::env::args().nth(1)) else {
        return AppExit::error();
    };

    let tick_interval = Duration::from_millis(sky.config().tick_interval_ms);
    let scene = sky.scene_at(0, CameraPose::default());
    let extent = scene_extent(&sky);

    app.insert_resource(ClearColor(Color::BLACK))
        .insert_resource(SkyWrapper(sky))
        .insert_resource(CurrentFrame { tick: 0, scene })
        .insert_resource(TickTimer(Timer::new(tick_interval, TimerMode::Repeating)))
        .insert_resource(SceneExtent(extent))
        .insert_resource(CameraState::default())
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                advance_tick,
                camera_controls,
                sync_camera.after(camera_controls),
                handle_click.after(camera_controls),
                render_scene,
                update_labels.after(sync_camera),
                update_text_ui,
            ),
        )
        .run()
}

/// Load the catalog named on the command line, or the default one.
fn load_sky(data_path: Option<String>) -> Option<SkyContext> {
    let config = match data_path {
        Some(path) => SkyConfig::default().with_data_path(path),
        None => SkyConfig::default(),
    };
    let path = config.data_path.clone();
    match SkyContext::initialize(config) {
        Ok(sky) => Some(sky),
        Err(e) => {
            error!("Failed to load catalog {}: {}", path.display(), e);
            None
        }
    }
}

#[derive(Resource)]
struct SkyWrapper(SkyContext);

#[derive(Resource)]
struct CurrentFrame {
    tick: u64,
    scene: Scene,
}

#[derive(Resource)]
struct TickTimer(Timer);

/// World units (light years) per Plotly scene unit.
#[derive(Resource)]
struct SceneExtent(f32);

#[derive(Resource)]
struct CameraState {
    pose: CameraPose,
    stored: Option<CameraPose>,
    /// User moved the camera since the last tick.
    moved: bool,
    drag_distance: f32,
    detail: String,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            pose: CameraPose::default(),
            stored: None,
            moved: false,
            drag_distance: 0.0,
            detail: DETAIL_PLACEHOLDER.to_string(),
        }
    }
}

// Marker components for text UI elements
#[derive(Component)]
struct TickText;

#[derive(Component)]
struct DetailText;

#[derive(Component)]
struct PlanetLabel(usize);

fn setup(mut commands: Commands, sky: Res<SkyWrapper>, mut camera_state: ResMut<CameraState>) {
    if let Some(pose) = load_camera(Path::new(CAMERA_FILE)) {
        info!("Restored camera from {}", CAMERA_FILE);
        camera_state.pose = pose;
        camera_state.stored = Some(pose);
    }

    commands.spawn((Camera3d::default(), Transform::default()));

    commands.spawn((
        Text::new(style::TITLE),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            top: Val::Px(10.0),
            ..default()
        },
        TickText,
    ));

    commands.spawn((
        Text::new(DETAIL_PLACEHOLDER),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            bottom: Val::Px(10.0),
            ..default()
        },
        DetailText,
    ));

    for (index, planet) in sky.0.planets().iter().enumerate() {
        commands.spawn((
            Text::new(planet.name.clone()),
            TextFont {
                font_size: 12.0,
                ..default()
            },
            TextColor(Color::srgba(1.0, 1.0, 1.0, 0.8)),
            Node {
                position_type: PositionType::Absolute,
                ..default()
            },
            Visibility::Hidden,
            PlanetLabel(index),
        ));
    }

    info!(
        "Loaded {} planets and {} stars",
        sky.0.planets().len(),
        sky.0.stars().len()
    );
}

fn advance_tick(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    sky: Res<SkyWrapper>,
    mut timer: ResMut<TickTimer>,
    mut camera_state: ResMut<CameraState>,
    mut frame: ResMut<CurrentFrame>,
) {
    if keyboard.just_pressed(KeyCode::Space) {
        if timer.0.paused() {
            timer.0.unpause();
        } else {
            timer.0.pause();
        }
    }

    timer.0.tick(time.delta());
    if !timer.0.just_finished() {
        return;
    }

    let inputs = CameraInputs {
        live: camera_state.moved.then_some(camera_state.pose),
        stored: camera_state.stored,
    };
    let tick = frame.tick + 1;
    let next = if inputs.live.is_some() {
        sky.0.on_camera_change(tick, &inputs)
    } else {
        sky.0.on_tick(tick, &inputs)
    };

    if next.camera_source == CameraSource::Live {
        save_camera(Path::new(CAMERA_FILE), &next.camera);
    }
    camera_state.pose = next.camera;
    camera_state.stored = Some(next.camera);
    camera_state.moved = false;

    frame.tick = tick;
    frame.scene = next.scene;
}

fn camera_controls(
    mut camera_state: ResMut<CameraState>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut scroll_events: EventReader<MouseWheel>,
    mut motion_events: EventReader<MouseMotion>,
) {
    if mouse_buttons.just_pressed(MouseButton::Left) {
        camera_state.drag_distance = 0.0;
    }

    if mouse_buttons.pressed(MouseButton::Left) {
        for motion in motion_events.read() {
            camera_state.drag_distance += motion.delta.length();
            if camera_state.drag_distance < CLICK_SLOP_PX {
                continue;
            }
            camera_state.pose = orbit(
                &camera_state.pose,
                -motion.delta.x as f64 * ORBIT_SPEED,
                motion.delta.y as f64 * ORBIT_SPEED,
            );
            camera_state.moved = true;
        }
    } else {
        motion_events.clear();
    }

    for scroll in scroll_events.read() {
        camera_state.pose = zoom(&camera_state.pose, 1.0 - scroll.y as f64 * ZOOM_SPEED);
        camera_state.moved = true;
    }
}

fn sync_camera(
    camera_state: Res<CameraState>,
    extent: Res<SceneExtent>,
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
) {
    let Ok(mut transform) = camera_query.get_single_mut() else {
        return;
    };
    let pose = &camera_state.pose;
    *transform = Transform::from_translation(to_world(pose.eye, extent.0))
        .looking_at(to_world(pose.center, extent.0), to_world(pose.up, 1.0));
}

fn handle_click(
    sky: Res<SkyWrapper>,
    frame: Res<CurrentFrame>,
    mut camera_state: ResMut<CameraState>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    mouse: Res<ButtonInput<MouseButton>>,
) {
    if !mouse.just_released(MouseButton::Left) || camera_state.drag_distance >= CLICK_SLOP_PX {
        return;
    }

    let Ok(window) = window_query.get_single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };
    let project = |p: SkyVec3| camera.world_to_viewport(camera_transform, to_world(p, 1.0)).ok();

    // (distance, curve, point)
    let mut closest: Option<(f32, usize, usize)> = None;
    let mut consider = |dist: f32, curve: usize, point: usize| {
        if dist <= PICK_RADIUS_PX && closest.map_or(true, |(best, _, _)| dist < best) {
            closest = Some((dist, curve, point));
        }
    };

    for (curve, trace) in frame.scene.data.iter().enumerate() {
        match trace.role {
            TraceRole::Route(_) => {
                let (Some(a), Some(b)) = (
                    trace.point(0).and_then(&project),
                    trace.point(1).and_then(&project),
                ) else {
                    continue;
                };
                consider(distance_to_segment(cursor_pos, a, b), curve, 0);
            }
            TraceRole::Planets => {
                for (point, pos) in trace.points().enumerate() {
                    if let Some(screen) = project(pos) {
                        consider(cursor_pos.distance(screen), curve, point);
                    }
                }
            }
            TraceRole::Earth | TraceRole::Stars => {}
        }
    }

    let click = match closest {
        Some((_, curve, point)) => json!({"points": [{
            "curveNumber": curve,
            "pointNumber": point,
            "hovertext": frame.scene.data[curve].hovertext_at(point),
        }]}),
        None => json!({"points": []}),
    };
    let stored = sky.0.on_click(&click);
    camera_state.detail = sky.0.detail_text(stored.as_deref());
}

fn render_scene(
    frame: Res<CurrentFrame>,
    camera_query: Query<&Transform, With<Camera3d>>,
    mut gizmos: Gizmos,
) {
    let eye = camera_query
        .get_single()
        .map(|t| t.translation)
        .unwrap_or(Vec3::ZERO);

    for trace in &frame.scene.data {
        match trace.mode {
            TraceMode::Lines => {
                let Some(line) = &trace.line else {
                    continue;
                };
                let color = plot_color(&line.color, 1.0);
                let points: Vec<Vec3> = trace.points().map(|p| to_world(p, 1.0)).collect();
                for pair in points.windows(2) {
                    gizmos.line(pair[0], pair[1], color);
                }
            }
            TraceMode::Markers | TraceMode::MarkersText => {
                let Some(marker) = &trace.marker else {
                    continue;
                };
                let color = plot_color(&marker.color, marker.opacity.unwrap_or(1.0) as f32);
                let resolution = if trace.role == TraceRole::Stars { 4 } else { 12 };
                for pos in trace.points() {
                    let world = to_world(pos, 1.0);
                    if !world.is_finite() {
                        continue;
                    }
                    let radius = marker_radius(marker.size as f32, world.distance(eye));
                    gizmos
                        .sphere(Isometry3d::from_translation(world), radius, color)
                        .resolution(resolution);
                }
            }
        }
    }
}

fn update_labels(
    frame: Res<CurrentFrame>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    mut label_query: Query<(&PlanetLabel, &mut Node, &mut Visibility)>,
) {
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };
    let Some(planets) = frame.scene.planets() else {
        return;
    };

    for (label, mut node, mut visibility) in &mut label_query {
        let screen = planets
            .point(label.0)
            .map(|p| to_world(p, 1.0))
            .filter(|p| p.is_finite())
            .and_then(|p| camera.world_to_viewport(camera_transform, p).ok());
        match screen {
            Some(pos) => {
                node.left = Val::Px(pos.x + 6.0);
                node.top = Val::Px(pos.y - 16.0);
                *visibility = Visibility::Inherited;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

fn update_text_ui(
    frame: Res<CurrentFrame>,
    timer: Res<TickTimer>,
    camera_state: Res<CameraState>,
    mut tick_query: Query<&mut Text, (With<TickText>, Without<DetailText>)>,
    mut detail_query: Query<&mut Text, (With<DetailText>, Without<TickText>)>,
) {
    for mut text in &mut tick_query {
        let paused = if timer.0.paused() { " (paused)" } else { "" };
        **text = format!("{}  |  tick {}{}", style::TITLE, frame.tick, paused);
    }

    if camera_state.is_changed() {
        for mut text in &mut detail_query {
            **text = camera_state.detail.clone();
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn to_world(v: SkyVec3, scale: f32) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32) * scale
}

/// Largest absolute coordinate across stars and planets, so Plotly-style
/// camera units map onto light years.
fn scene_extent(sky: &SkyContext) -> f32 {
    let extent = sky
        .stars()
        .iter()
        .flat_map(|s| [s.x.abs(), s.y.abs(), s.z.abs()])
        .chain(sky.placements().iter().map(|p| p.distance_ly))
        .filter(|c| c.is_finite())
        .fold(0.0_f64, f64::max);
    if extent > 0.0 {
        extent as f32
    } else {
        1.0
    }
}

/// Roughly constant on-screen size regardless of distance.
fn marker_radius(size: f32, distance_to_eye: f32) -> f32 {
    size * MARKER_SCALE * distance_to_eye.max(1.0)
}

fn plot_color(name: &str, alpha: f32) -> Color {
    let color = match name {
        "blue" => Color::srgb(0.2, 0.4, 1.0),
        "red" => Color::srgb(0.95, 0.2, 0.2),
        "white" => Color::WHITE,
        "black" => Color::BLACK,
        _ => Color::srgb(0.6, 0.6, 0.6),
    };
    color.with_alpha(alpha)
}

/// Rotate the eye around the center about +Z (yaw) and toward the pole (pitch).
fn orbit(pose: &CameraPose, yaw: f64, pitch: f64) -> CameraPose {
    let offset = SkyVec3::new(
        pose.eye.x - pose.center.x,
        pose.eye.y - pose.center.y,
        pose.eye.z - pose.center.z,
    );
    let r = offset.length();
    if r == 0.0 {
        return *pose;
    }
    let azimuth = offset.y.atan2(offset.x) + yaw;
    let elevation =
        ((offset.z / r).clamp(-1.0, 1.0).asin() + pitch).clamp(-MAX_ELEVATION, MAX_ELEVATION);
    CameraPose {
        eye: SkyVec3::new(
            pose.center.x + r * elevation.cos() * azimuth.cos(),
            pose.center.y + r * elevation.cos() * azimuth.sin(),
            pose.center.z + r * elevation.sin(),
        ),
        ..*pose
    }
}

/// Scale the eye's distance from the center, clamped to a usable range.
fn zoom(pose: &CameraPose, factor: f64) -> CameraPose {
    let offset = SkyVec3::new(
        pose.eye.x - pose.center.x,
        pose.eye.y - pose.center.y,
        pose.eye.z - pose.center.z,
    );
    let r = offset.length();
    if r == 0.0 || !factor.is_finite() {
        return *pose;
    }
    let k = (r * factor).clamp(MIN_EYE_DISTANCE, MAX_EYE_DISTANCE) / r;
    CameraPose {
        eye: SkyVec3::new(
            pose.center.x + offset.x * k,
            pose.center.y + offset.y * k,
            pose.center.z + offset.z * k,
        ),
        ..*pose
    }
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

fn load_camera(path: &Path) -> Option<CameraPose> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str(&contents) {
        Ok(pose) => Some(pose),
        Err(e) => {
            warn!("Ignoring unreadable camera file {}: {}", path.display(), e);
            None
        }
    }
}

fn save_camera(path: &Path, pose: &CameraPose) {
    let json = match serde_json::to_string_pretty(pose) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to encode camera: {}", e);
            return;
        }
    };
    if let Err(e) = std::fs::write(path, json) {
        warn!("Failed to save camera to {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eye_distance(pose: &CameraPose) -> f64 {
        SkyVec3::new(
            pose.eye.x - pose.center.x,
            pose.eye.y - pose.center.y,
            pose.eye.z - pose.center.z,
        )
        .length()
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let pose = CameraPose::default();
        let moved = orbit(&pose, 0.7, 0.3);
        assert!((eye_distance(&pose) - eye_distance(&moved)).abs() < 1e-12);
        assert_ne!(moved.eye, pose.eye);
        assert_eq!(moved.center, pose.center);
        assert_eq!(moved.up, pose.up);
    }

    #[test]
    fn test_orbit_clamps_elevation() {
        let moved = orbit(&CameraPose::default(), 0.0, 10.0);
        let r = eye_distance(&moved);
        assert!(moved.eye.z / r <= MAX_ELEVATION.sin() + 1e-12);
    }

    #[test]
    fn test_zoom_scales_and_clamps() {
        let pose = CameraPose {
            eye: SkyVec3::new(1.0, 0.0, 0.0),
            ..CameraPose::default()
        };
        let closer = zoom(&pose, 0.5);
        assert!((closer.eye.x - 0.5).abs() < 1e-12);

        let far = zoom(&pose, 100.0);
        assert!((eye_distance(&far) - MAX_EYE_DISTANCE).abs() < 1e-12);

        let near = zoom(&pose, 0.0);
        assert!((eye_distance(&near) - MIN_EYE_DISTANCE).abs() < 1e-12);
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(distance_to_segment(Vec2::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_segment(Vec2::new(-4.0, 3.0), a, b), 5.0);
        assert_eq!(distance_to_segment(Vec2::new(1.0, 1.0), a, a), 2.0_f32.sqrt());
    }

    #[test]
    fn test_camera_file_roundtrip_and_garbage() {
        let dir = std::env::temp_dir().join(format!("exoviz-viewer-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("camera.json");

        assert_eq!(load_camera(&path), None);

        let pose = orbit(&CameraPose::default(), 1.0, 0.2);
        save_camera(&path, &pose);
        let loaded = load_camera(&path).unwrap();
        assert!((loaded.eye.x - pose.eye.x).abs() < 1e-15);
        assert!((loaded.eye.z - pose.eye.z).abs() < 1e-15);
        assert_eq!(loaded.up, pose.up);

        std::fs::write(&path, "not json").unwrap();
        assert_eq!(load_camera(&path), None);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_sky_reports_missing_catalog() {
        assert!(load_sky(Some("/definitely/not/here.csv".into())).is_none());

        let bundled = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/spacedata.csv");
        let sky = load_sky(Some(bundled.into())).unwrap();
        assert_eq!(sky.planets().len(), 30);
    }

    #[test]
    fn test_plot_colors() {
        assert_eq!(plot_color("white", 1.0), Color::WHITE);
        assert_eq!(plot_color("red", 0.5).alpha(), 0.5);
        assert_ne!(plot_color("blue", 1.0), plot_color("red", 1.0));
    }
}
