//! ASCII PLY export serializer.
//!
//! Converts placements into a PLY point cloud: one vertex per active
//! representor, with `x y z` from the color-space position, `red green
//! blue` channels, and a per-vertex `scale` property carrying the
//! frequency-derived size. Most point-cloud viewers (MeshLab,
//! CloudCompare) render the colors directly; `scale` is available for
//! tools that support custom scalar fields.
//!
//! Lines beginning with `comment` carry optional metadata and are
//! ignored by parsers.
//!
//! This is a pure function with no I/O — it returns a `String`.

use std::fmt::Write;

use irodori_core::Placement;

/// Metadata to embed as `comment` lines in the PLY header.
///
/// Both fields are optional. When present, the corresponding comment
/// line is emitted.
#[derive(Debug, Clone, Default)]
pub struct PlyMetadata<'a> {
    /// Source image filename — emitted as `comment Source: <name>`.
    pub source: Option<&'a str>,

    /// Human-readable scan parameters — emitted as a `comment` line so
    /// exported files are distinguishable.
    pub description: Option<&'a str>,
}

/// Serialize placements into an ASCII PLY string.
///
/// The header declares `element vertex N` for `N == placements.len()`;
/// an empty slice produces a valid, vertex-free document.
#[must_use]
pub fn to_ply(placements: &[Placement], metadata: &PlyMetadata<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ply");
    let _ = writeln!(out, "format ascii 1.0");
    if let Some(source) = metadata.source {
        let _ = writeln!(out, "comment Source: {source}");
    }
    if let Some(description) = metadata.description {
        let _ = writeln!(out, "comment {description}");
    }
    let _ = writeln!(out, "element vertex {}", placements.len());
    let _ = writeln!(out, "property float x");
    let _ = writeln!(out, "property float y");
    let _ = writeln!(out, "property float z");
    let _ = writeln!(out, "property uchar red");
    let _ = writeln!(out, "property uchar green");
    let _ = writeln!(out, "property uchar blue");
    let _ = writeln!(out, "property float scale");
    let _ = writeln!(out, "end_header");

    for p in placements {
        let _ = writeln!(
            out,
            "{} {} {} {} {} {} {}",
            p.position.x, p.position.y, p.position.z, p.color.r, p.color.g, p.color.b, p.scale,
        );
    }

    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use irodori_core::ColorKey;

    use super::*;

    fn placement(r: u8, g: u8, b: u8, scale: f32) -> Placement {
        let color = ColorKey::new(r, g, b);
        Placement {
            color,
            position: color.position(),
            scale,
        }
    }

    #[test]
    fn header_declares_vertex_count_and_properties() {
        let placements = vec![placement(255, 0, 0, 1.0), placement(0, 255, 0, 2.5)];
        let ply = to_ply(&placements, &PlyMetadata::default());

        assert!(ply.starts_with("ply\nformat ascii 1.0\n"));
        assert!(ply.contains("element vertex 2\n"));
        assert!(ply.contains("property uchar red\n"));
        assert!(ply.contains("property float scale\n"));
        assert!(ply.contains("end_header\n"));
    }

    #[test]
    fn vertex_lines_carry_position_color_and_scale() {
        let placements = vec![placement(255, 0, 128, 1.5)];
        let ply = to_ply(&placements, &PlyMetadata::default());

        let body = ply.split("end_header\n").nth(1).unwrap();
        assert_eq!(body, "255 0 128 255 0 128 1.5\n");
    }

    #[test]
    fn metadata_comments_are_emitted_before_elements() {
        let ply = to_ply(
            &[],
            &PlyMetadata {
                source: Some("sunset.png"),
                description: Some("pool=66049 increment=0.1"),
            },
        );
        let source_at = ply.find("comment Source: sunset.png").unwrap();
        let desc_at = ply.find("comment pool=66049 increment=0.1").unwrap();
        let element_at = ply.find("element vertex 0").unwrap();
        assert!(source_at < desc_at && desc_at < element_at);
    }

    #[test]
    fn empty_placements_still_valid_document() {
        let ply = to_ply(&[], &PlyMetadata::default());
        assert!(ply.contains("element vertex 0\n"));
        assert!(ply.ends_with("end_header\n"));
    }
}
