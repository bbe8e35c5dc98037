//! Plain data records exchanged with the authoring layer.
//!
//! Field names follow the JSON the editor persists (`camelCase`, `{x,y,z}`
//! objects for vectors), so documents round-trip unchanged through
//! [`TourDocument`].

use crate::constants::{AUDIO_MAX_DISTANCE, AUDIO_REF_DISTANCE, AUDIO_ROLLOFF_FACTOR, AUDIO_VOLUME};
use crate::error::TourError;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3Record {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuatRecord {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for QuatRecord {
    fn default() -> Self {
        Quat::IDENTITY.into()
    }
}

impl From<Vec3> for Vec3Record {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vec3Record> for Vec3 {
    fn from(r: Vec3Record) -> Self {
        Vec3::new(r.x, r.y, r.z)
    }
}

impl From<Quat> for QuatRecord {
    fn from(q: Quat) -> Self {
        Self {
            x: q.x,
            y: q.y,
            z: q.z,
            w: q.w,
        }
    }
}

impl From<QuatRecord> for Quat {
    fn from(r: QuatRecord) -> Self {
        Quat::from_xyzw(r.x, r.y, r.z, r.w)
    }
}

/// An authored camera pose with the interactions it triggers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    #[serde(with = "vec3_serde")]
    pub position: Vec3,
    #[serde(with = "quat_serde")]
    pub rotation: Quat,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

impl Waypoint {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            interactions: Vec::new(),
        }
    }

    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interactions.push(interaction);
        self
    }

    /// Rotation renormalized; a zero quaternion degrades to identity.
    pub fn orientation(&self) -> Quat {
        let len = self.rotation.length();
        if len.is_finite() && len > 0.0 {
            self.rotation / len
        } else {
            Quat::IDENTITY
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,
    #[serde(flatten)]
    pub kind: InteractionKind,
}

impl Interaction {
    pub fn audio(id: impl Into<String>, payload: AudioPayload) -> Self {
        Self {
            id: id.into(),
            kind: InteractionKind::Audio(payload),
        }
    }

    pub fn info(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: InteractionKind::Info(InfoPayload { text: text.into() }),
        }
    }
}

/// Type tag plus payload, stored as `{ "type": .., "data": .. }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum InteractionKind {
    Audio(AudioPayload),
    Info(InfoPayload),
    Animation(serde_json::Value),
    Custom(serde_json::Value),
}

impl InteractionKind {
    pub fn tag(&self) -> &'static str {
        match self {
            InteractionKind::Audio(_) => "audio",
            InteractionKind::Info(_) => "info",
            InteractionKind::Animation(_) => "animation",
            InteractionKind::Custom(_) => "custom",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceModel {
    Linear,
    #[default]
    Inverse,
    Exponential,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioPayload {
    #[serde(alias = "url", alias = "src")]
    pub source: String,
    #[serde(default)]
    pub spatial: bool,
    #[serde(default = "AudioPayload::default_volume")]
    pub volume: f32,
    #[serde(default, rename = "loop")]
    pub looping: bool,
    #[serde(default = "AudioPayload::default_autoplay")]
    pub autoplay: bool,
    #[serde(default)]
    pub distance_model: DistanceModel,
    #[serde(default = "AudioPayload::default_max_distance")]
    pub max_distance: f32,
    #[serde(default = "AudioPayload::default_ref_distance")]
    pub ref_distance: f32,
    #[serde(default = "AudioPayload::default_rolloff_factor")]
    pub rolloff_factor: f32,
    /// Only honored for non-spatial sounds.
    #[serde(default)]
    pub stop_on_exit: bool,
}

impl AudioPayload {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            spatial: false,
            volume: Self::default_volume(),
            looping: false,
            autoplay: Self::default_autoplay(),
            distance_model: DistanceModel::default(),
            max_distance: Self::default_max_distance(),
            ref_distance: Self::default_ref_distance(),
            rolloff_factor: Self::default_rolloff_factor(),
            stop_on_exit: false,
        }
    }

    const fn default_volume() -> f32 {
        AUDIO_VOLUME
    }

    const fn default_autoplay() -> bool {
        true
    }

    const fn default_max_distance() -> f32 {
        AUDIO_MAX_DISTANCE
    }

    const fn default_ref_distance() -> f32 {
        AUDIO_REF_DISTANCE
    }

    const fn default_rolloff_factor() -> f32 {
        AUDIO_ROLLOFF_FACTOR
    }

    /// Whether leaving the trigger zone should stop this sound.
    pub fn stops_on_exit(&self) -> bool {
        !self.spatial && self.stop_on_exit
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InfoPayload {
    pub text: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationMode {
    #[default]
    Click,
    Hover,
}

/// Clickable scene marker. Stored and exported, never interpreted here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    pub id: String,
    pub position: Vec3Record,
    #[serde(default = "Hotspot::default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub activation_mode: ActivationMode,
    #[serde(default = "Hotspot::default_color")]
    pub color: String,
}

impl Hotspot {
    const fn default_scale() -> f32 {
        1.0
    }

    fn default_color() -> String {
        "#ffffff".to_string()
    }
}

/// Everything the editor saves for one tour.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TourDocument {
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub hotspots: Vec<Hotspot>,
}

impl TourDocument {
    pub fn from_json_str(json: &str) -> Result<Self, TourError> {
        serde_json::from_str(json).map_err(|e| TourError::parse("tour document", e))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TourError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| TourError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|e| TourError::parse(path.display().to_string(), e))
    }

    pub fn to_json_string(&self) -> Result<String, TourError> {
        serde_json::to_string_pretty(self).map_err(|e| TourError::parse("tour document", e))
    }
}

mod vec3_serde {
    use super::Vec3Record;
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &Vec3, s: S) -> Result<S::Ok, S::Error> {
        Vec3Record::from(*v).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec3, D::Error> {
        Vec3Record::deserialize(d).map(Vec3::from)
    }
}

mod quat_serde {
    use super::QuatRecord;
    use glam::Quat;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(q: &Quat, s: S) -> Result<S::Ok, S::Error> {
        QuatRecord::from(*q).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Quat, D::Error> {
        QuatRecord::deserialize(d).map(Quat::from)
    }
}
