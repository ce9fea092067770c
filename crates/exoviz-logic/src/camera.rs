//! Camera pose and its per-tick resolution.
//!
//! The pose is the only state that crosses ticks. The collaborator owns it;
//! this module just decides which candidate wins and echoes it back.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coordinates::Vec3;

/// Key under which Plotly reports a camera drag in relayout events.
pub const RELAYOUT_CAMERA_KEY: &str = "scene.camera";

/// Eye/center/up triple, in Plotly's normalized scene units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
}

impl Default for CameraPose {
    /// Almost at the origin, so the view starts from Earth.
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.002, 0.002, 0.002),
            center: Vec3::ZERO,
            up: Vec3::new(0.0, 0.0, 1.0),
        }
    }
}

/// Which candidate [`resolve_camera`] picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraSource {
    Live,
    Stored,
    Default,
}

/// Live change beats the stored pose, which beats the default.
pub fn resolve_camera(
    live: Option<&CameraPose>,
    stored: Option<&CameraPose>,
) -> (CameraPose, CameraSource) {
    match (live, stored) {
        (Some(pose), _) => (*pose, CameraSource::Live),
        (None, Some(pose)) => (*pose, CameraSource::Stored),
        (None, None) => (CameraPose::default(), CameraSource::Default),
    }
}

/// Pull a camera pose out of a Plotly relayout payload.
///
/// Payloads without the camera key (zoom on an axis, autosize, ...) or with
/// a camera that does not parse yield `None`.
pub fn camera_from_relayout(relayout: &Value) -> Option<CameraPose> {
    let camera = relayout.get(RELAYOUT_CAMERA_KEY)?;
    serde_json::from_value(camera.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pose(eye_x: f64) -> CameraPose {
        CameraPose {
            eye: Vec3::new(eye_x, 1.0, 1.0),
            ..CameraPose::default()
        }
    }

    #[test]
    fn test_live_wins_over_stored() {
        let live = pose(3.0);
        let stored = pose(9.0);
        let (chosen, source) = resolve_camera(Some(&live), Some(&stored));
        assert_eq!(chosen, live);
        assert_eq!(source, CameraSource::Live);
    }

    #[test]
    fn test_stored_used_without_live() {
        let stored = pose(9.0);
        let (chosen, source) = resolve_camera(None, Some(&stored));
        assert_eq!(chosen, stored);
        assert_eq!(source, CameraSource::Stored);
    }

    #[test]
    fn test_default_pose() {
        let (chosen, source) = resolve_camera(None, None);
        assert_eq!(source, CameraSource::Default);
        assert_eq!(chosen.eye, Vec3::new(0.002, 0.002, 0.002));
        assert_eq!(chosen.center, Vec3::ZERO);
        assert_eq!(chosen.up, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_camera_from_relayout() {
        let payload = json!({
            "scene.camera": {
                "eye": {"x": 1.5, "y": -0.5, "z": 0.25},
                "center": {"x": 0, "y": 0, "z": 0},
                "up": {"x": 0, "y": 0, "z": 1},
                "projection": {"type": "perspective"}
            }
        });
        let camera = camera_from_relayout(&payload).unwrap();
        assert_eq!(camera.eye, Vec3::new(1.5, -0.5, 0.25));
    }

    #[test]
    fn test_relayout_without_camera() {
        assert!(camera_from_relayout(&json!({"autosize": true})).is_none());
        assert!(camera_from_relayout(&json!(null)).is_none());
        assert!(camera_from_relayout(&json!({"scene.camera": {"eye": 3}})).is_none());
    }

    #[test]
    fn test_pose_json_shape() {
        let value = serde_json::to_value(CameraPose::default()).unwrap();
        assert_eq!(value["up"]["z"], json!(1.0));
        assert_eq!(value["eye"]["x"], json!(0.002));
    }
}
