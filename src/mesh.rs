use log::warn;
use serde::{Deserialize, Serialize};

/// Flat mesh arrays in the layout the draw call consumes.
///
/// The parser seeds every attribute array with one throwaway zero entry so
/// that the 1-based indices of the mesh text can be used as direct offsets.
/// `indices` records one raw position reference per triangle corner; its
/// length is the element count handed to the draw call verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub tex_coords: Vec<f32>,
    pub indices: Vec<u16>,
    pub colors: Option<Vec<f32>>,
}

impl Mesh {
    /// Number of indexed corners, used as the GPU element count.
    pub fn element_count(&self) -> usize {
        self.indices.len()
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self {
            positions: vec![0.0, 0.0, 0.0],
            normals: vec![0.0, 0.0, 0.0],
            tex_coords: vec![0.0, 0.0],
            indices: Vec::new(),
            colors: None,
        }
    }
}

/// Parses a wavefront-style mesh text into flat vertex arrays.
///
/// Deliberately lenient: malformed numeric tokens become NaN rather than
/// errors, unknown keywords and unreadable face references are logged and
/// skipped, and nothing aborts the file as a whole.
pub fn parse_mesh(text: &str) -> Mesh {
    let mut mesh = Mesh::default();

    for (line_no, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut parts = trimmed.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };
        match keyword {
            "v" => append_floats(&mut mesh.positions, parts),
            "vn" => append_floats(&mut mesh.normals, parts),
            "vt" => append_floats(&mut mesh.tex_coords, parts),
            "f" => {
                if let Some(corners) = parse_face(parts, mesh.positions.len() / 3) {
                    triangulate_fan(&corners, &mut mesh.indices);
                } else {
                    warn!("unreadable face reference on line {}", line_no + 1);
                }
            }
            other => {
                warn!("unhandled keyword {other:?} on line {}", line_no + 1);
            }
        }
    }

    mesh
}

fn append_floats<'a>(target: &mut Vec<f32>, parts: impl Iterator<Item = &'a str>) {
    // A token that is not a number is kept as NaN so a sloppy file still
    // yields arrays of the expected shape.
    target.extend(parts.map(|token| token.parse::<f32>().unwrap_or(f32::NAN)));
}

/// Resolves the per-corner position references of one face line.
///
/// `entry_count` is the number of position entries seen so far, including
/// the seed entry, so a relative reference `-k` lands on the k-th most
/// recently declared position.
fn parse_face<'a>(parts: impl Iterator<Item = &'a str>, entry_count: usize) -> Option<Vec<u16>> {
    let mut corners = Vec::new();
    for part in parts {
        let reference = part.split('/').next().unwrap_or("");
        let raw = reference.parse::<i32>().ok()?;
        let resolved = resolve_index(raw, entry_count)?;
        corners.push(resolved);
    }
    if corners.len() < 3 {
        return None;
    }
    Some(corners)
}

fn resolve_index(raw: i32, entry_count: usize) -> Option<u16> {
    let resolved = if raw < 0 {
        entry_count as i64 + raw as i64
    } else {
        raw as i64
    };
    u16::try_from(resolved).ok()
}

/// Fan triangulation from the first corner: triangle k is (0, k+1, k+2).
fn triangulate_fan(corners: &[u16], indices: &mut Vec<u16>) {
    for k in 0..corners.len().saturating_sub(2) {
        indices.push(corners[0]);
        indices.push(corners[k + 1]);
        indices.push(corners[k + 2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_seeded_and_indices_stay_raw() {
        let mesh = parse_mesh("v 1 2 3\nv 4 5 6\nf 1 2 2\n");
        assert_eq!(mesh.positions, vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(mesh.indices, vec![1, 2, 2]);
    }

    #[test]
    fn index_count_is_a_multiple_of_three() {
        let mesh = parse_mesh("v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nf 1 2 3\nf 1 2 3 4\n");
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    #[test]
    fn quads_fan_triangulate_from_the_first_corner() {
        let mesh = parse_mesh("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n");
        assert_eq!(mesh.indices, vec![1, 2, 3, 1, 3, 4]);
    }

    // Relative references are the documented mesh-format convention; no
    // sample asset in this repository exercises them.
    #[test]
    fn negative_references_resolve_from_the_end() {
        let forward = parse_mesh("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 3 2 1\n");
        let relative = parse_mesh("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -1 -2 -3\n");
        assert_eq!(relative.indices, forward.indices);
    }

    #[test]
    fn comments_blanks_and_unknown_keywords_are_skipped() {
        let mesh = parse_mesh("# header\n\nv 1 2 3\nusemtl wolf\ns off\nf 1 1 1\n");
        assert_eq!(mesh.positions.len(), 6);
        assert_eq!(mesh.indices, vec![1, 1, 1]);
    }

    #[test]
    fn malformed_floats_become_nan_not_errors() {
        let mesh = parse_mesh("v 1 bogus 3\n");
        assert_eq!(mesh.positions.len(), 6);
        assert!(mesh.positions[4].is_nan());
    }

    #[test]
    fn texture_and_normal_slots_may_be_empty() {
        let mesh = parse_mesh("v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1//1 2/1 3/1/1\n");
        assert_eq!(mesh.indices, vec![1, 2, 3]);
    }

    #[test]
    fn unreadable_face_reference_discards_the_line() {
        let mesh = parse_mesh("v 0 0 0\nf a b c\nf 1 1 1\n");
        assert_eq!(mesh.indices, vec![1, 1, 1]);
    }

    #[test]
    fn parser_emits_no_colors() {
        let mesh = parse_mesh("v 0 0 0\n");
        assert!(mesh.colors.is_none());
    }
}
