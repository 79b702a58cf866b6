//! Outbound ports of the editor core
//!
//! The transaction controllers never talk to a network or a geometry kernel
//! directly; both concerns sit behind traits supplied by the composition
//! root. Mocks are generated for tests via mockall.

mod clipper;
mod persistence;

pub use clipper::{ClipError, PolygonClipper};
pub use persistence::{PersistenceError, RegionWriteData, ScenePersistencePort, WallWriteData};

#[cfg(any(test, feature = "testing"))]
pub use clipper::MockPolygonClipper;
#[cfg(any(test, feature = "testing"))]
pub use persistence::MockScenePersistencePort;
