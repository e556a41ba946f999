//! Canonical auto-tile variant names
//!
//! Blob16 tiles are addressed by a 4-bit cardinal neighbour mask
//! (N = 1, E = 2, S = 4, W = 8). Blob47 extends each mask with the inner
//! corners that are only meaningful when both adjacent cardinals connect.

/// Blob16 variant names indexed by cardinal neighbour mask
pub const BLOB16_NAMES: [&str; 16] = [
    "island",
    "edge_n",
    "edge_e",
    "corner_ne",
    "edge_s",
    "vertical",
    "corner_se",
    "t_e",
    "edge_w",
    "corner_nw",
    "horizontal",
    "t_n",
    "corner_sw",
    "t_w",
    "t_s",
    "center",
];

const NORTH: u8 = 1;
const EAST: u8 = 2;
const SOUTH: u8 = 4;
const WEST: u8 = 8;

// Diagonal label with the two cardinals it depends on
const DIAGONALS: [(&str, u8); 4] = [
    ("ne", NORTH | EAST),
    ("se", SOUTH | EAST),
    ("sw", SOUTH | WEST),
    ("nw", NORTH | WEST),
];

/// Blob16 name for a cardinal mask
pub fn blob16_name(mask: u8) -> &'static str {
    BLOB16_NAMES
        .get(usize::from(mask & 0x0f))
        .copied()
        .unwrap_or("island")
}

/// The 47 blob variant names in canonical order
///
/// Each cardinal mask contributes one name per subset of its applicable inner
/// corners. A missing inner corner is spelled `_inner_<dir>`, so the fully
/// connected tile is plain `center`.
pub fn blob47_names() -> Vec<String> {
    let mut names = Vec::with_capacity(47);
    for mask in 0_u8..16 {
        let applicable: Vec<&str> = DIAGONALS
            .iter()
            .filter(|(_, required)| mask & required == *required)
            .map(|(label, _)| *label)
            .collect();

        let subsets = 1_usize << applicable.len();
        // Walk from "all corners filled" down to "all corners notched"
        for present in (0..subsets).rev() {
            let mut name = blob16_name(mask).to_string();
            for (bit, label) in applicable.iter().enumerate() {
                if present & (1 << bit) == 0 {
                    name.push_str("_inner_");
                    name.push_str(label);
                }
            }
            names.push(name);
        }
    }
    names
}
