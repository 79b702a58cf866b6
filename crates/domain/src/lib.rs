pub mod entities;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod naming;

pub use entities::{SceneRegion, SceneWall, WallVisibility, FOG_OF_WAR_KIND};
pub use error::DomainError;
pub use geometry::{
    clean_poles, clean_vertices, point_in_polygon, polygons_overlap, segments_intersect,
    signed_area, CleanedPoles, GridConfig, Point, Pole,
};
pub use ids::SceneId;
pub use naming::{next_child_name, next_root_name, root_prefix, trailing_digits};
