//! Adapters for the editor core's ports

mod tess_clipper;

pub use tess_clipper::TessClipper;
