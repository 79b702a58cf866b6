mod region;
mod wall;

pub use region::{SceneRegion, FOG_OF_WAR_KIND};
pub use wall::{SceneWall, WallVisibility};
