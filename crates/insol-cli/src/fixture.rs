//! JSON fixture loading.
//!
//! `meshes.json` is an array of `{ "vertices": [[x, y, z], ...], "faces":
//! [[a, b, c] | [a, b, c, d], ...] }`; `vectors.json` is an array of
//! `[x, y, z]` ray directions.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use insol_geom::{Mesh, Point3, Vec3};

/// Shared ray origin used when none is given.
pub const DEFAULT_ORIGIN: [f64; 3] = [-1_079_800.0, 4_580_400.0, 0.0];

/// Parse a mesh array.
pub fn parse_meshes(json: &str) -> Result<Vec<Mesh>> {
    serde_json::from_str(json).context("invalid mesh fixture")
}

/// Parse a direction array.
pub fn parse_vectors(json: &str) -> Result<Vec<Vec3>> {
    serde_json::from_str(json).context("invalid vector fixture")
}

/// Load meshes from a JSON file.
pub fn load_meshes(path: &Path) -> Result<Vec<Mesh>> {
    let json =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_meshes(&json).with_context(|| format!("parsing {}", path.display()))
}

/// Load ray directions from a JSON file.
pub fn load_vectors(path: &Path) -> Result<Vec<Vec3>> {
    let json =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_vectors(&json).with_context(|| format!("parsing {}", path.display()))
}

/// Parse `x,y,z` into a point.
pub fn parse_point(s: &str) -> std::result::Result<Point3, String> {
    let coords = s
        .split(',')
        .map(|c| c.trim().parse::<f64>().map_err(|e| format!("{c:?}: {e}")))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    match coords[..] {
        [x, y, z] => Ok(Point3::new(x, y, z)),
        _ => Err(format!("expected x,y,z, got {} values", coords.len())),
    }
}
