//! irodori-export: Pure format serializers (sans-IO)
//!
//! Converts scatter placements into output formats for external 3D
//! viewers. Currently supports ASCII PLY and CSV.

pub mod csv;
pub mod ply;

pub use csv::to_csv;
pub use ply::{PlyMetadata, to_ply};
