//! CSV export serializer.
//!
//! One row per placement: quantized channels, color-space position,
//! and target scale. Useful for spreadsheets and plotting scripts that
//! do not speak PLY.
//!
//! This is a pure function with no I/O — it returns a `String`.

use std::fmt::Write;

use irodori_core::Placement;

/// Column header emitted as the first line.
const HEADER: &str = "r,g,b,x,y,z,scale";

/// Serialize placements into a CSV string with a header row.
#[must_use]
pub fn to_csv(placements: &[Placement]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{HEADER}");
    for p in placements {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{}",
            p.color.r, p.color.g, p.color.b, p.position.x, p.position.y, p.position.z, p.scale,
        );
    }
    out
}
