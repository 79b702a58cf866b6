//! Wall entity - a persisted polyline (or closed loop) of poles

use serde::{Deserialize, Serialize};

use crate::geometry::Pole;

/// How a wall participates in line-of-sight and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WallVisibility {
    /// Blocks sight and is drawn
    #[default]
    Normal,
    /// Blocks sight but is not drawn (hidden door frames, GM-only walls)
    Invisible,
    /// Drawn but does not block sight (railings, low walls)
    Transparent,
}

/// A wall as persisted on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneWall {
    pub index: u32,
    pub name: String,
    pub poles: Vec<Pole>,
    pub is_closed: bool,
    pub visibility: WallVisibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl SceneWall {
    pub fn new(index: u32, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            poles: Vec::new(),
            is_closed: false,
            visibility: WallVisibility::default(),
            material: None,
            color: None,
        }
    }

    pub fn with_poles(mut self, poles: Vec<Pole>) -> Self {
        self.poles = poles;
        self
    }

    pub fn closed(mut self) -> Self {
        self.is_closed = true;
        self
    }

    pub fn with_visibility(mut self, visibility: WallVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}
