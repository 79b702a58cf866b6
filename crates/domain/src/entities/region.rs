//! Region entity - a persisted closed-polygon overlay on a scene
//!
//! Regions carry a free-form kind tag ("Elevation", "FogOfWar", "custom", ...)
//! plus an optional signed value whose meaning is kind-specific. Fog-of-war
//! uses hierarchical dot-separated names ("1", "1.1", "1.2") so subtract
//! regions nest under the add region they carve into.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Kind tag of fog-of-war regions.
pub const FOG_OF_WAR_KIND: &str = "FogOfWar";

/// A region as persisted on the server.
///
/// `index` is the server-assigned slot and the stable ordering key; it is
/// distinct from any transaction-local tempId.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneRegion {
    pub index: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub vertices: Vec<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl SceneRegion {
    pub fn new(index: u32, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            index,
            kind: kind.into(),
            name: name.into(),
            vertices: Vec::new(),
            value: None,
            label: None,
            color: None,
        }
    }

    pub fn with_vertices(mut self, vertices: Vec<Point>) -> Self {
        self.vertices = vertices;
        self
    }

    pub fn with_value(mut self, value: i32) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn is_fog_of_war(&self) -> bool {
        self.kind == FOG_OF_WAR_KIND
    }
}
