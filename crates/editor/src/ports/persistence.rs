//! Scene persistence port
//!
//! The editor core persists regions and walls through whatever transport the
//! host application wires in (REST, realtime channel, in-memory fake). Each
//! method may reject; rejections become commit-result errors, never
//! unhandled panics.
//!
//! Note: async methods use `async_trait` instead of returning
//! `Pin<Box<dyn Future>>` for better mockall compatibility.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tablewright_domain::{Point, Pole, SceneId, WallVisibility};

/// Error from an injected persistence call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PersistenceError {
    /// Transport-level failure (timeout, connection loss)
    #[error("Network error: {0}")]
    Network(String),

    /// The server rejected the payload
    #[error("Server rejected request: {0}")]
    Rejected(String),
}

/// Payload for creating or updating a region.
///
/// Optional fields are omitted from the wire format when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionWriteData {
    pub name: String,
    pub vertices: Vec<Point>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Payload for creating or updating a wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallWriteData {
    pub name: String,
    pub poles: Vec<Pole>,
    pub is_closed: bool,
    pub visibility: WallVisibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Port for persisting scene geometry.
///
/// Create calls return the server-assigned index; update calls address an
/// existing slot. Implementations own retries and timeouts - the transaction
/// layer performs one attempt per commit.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ScenePersistencePort: Send + Sync {
    /// Create a region; returns the assigned region index.
    async fn add_region(
        &self,
        scene_id: SceneId,
        data: RegionWriteData,
    ) -> Result<u32, PersistenceError>;

    /// Update the region at `region_index`.
    async fn update_region(
        &self,
        scene_id: SceneId,
        region_index: u32,
        data: RegionWriteData,
    ) -> Result<(), PersistenceError>;

    /// Create a wall; returns the assigned wall index.
    async fn add_wall(
        &self,
        scene_id: SceneId,
        data: WallWriteData,
    ) -> Result<u32, PersistenceError>;

    /// Update the wall at `wall_index`.
    async fn update_wall(
        &self,
        scene_id: SceneId,
        wall_index: u32,
        data: WallWriteData,
    ) -> Result<(), PersistenceError>;
}
