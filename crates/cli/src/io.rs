//! JSON documents read and written by the CLI.
//!
//! - Point sets: `{"points": [[x, y], ...], "closed": bool?}`.
//! - Paths: `{"commands": ["move", ...], "points": [[x, y], ...], "svg": "..."}`,
//!   plus `"marks"` (SVG path data) when subdivision markers were drawn.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use vecpath::{Point, VectorPath};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    pub points: Vec<[f64; 2]>,
    #[serde(default)]
    pub closed: bool,
}

impl PointSet {
    pub fn from_points(points: &[Point], closed: bool) -> Self {
        Self {
            points: points.iter().map(|p| [p.x, p.y]).collect(),
            closed,
        }
    }

    pub fn to_points(&self) -> Vec<Point> {
        self.points.iter().map(|[x, y]| Point::new(*x, *y)).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathDoc {
    pub commands: Vec<String>,
    pub points: Vec<[f64; 2]>,
    pub svg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<String>,
}

impl From<&VectorPath> for PathDoc {
    fn from(path: &VectorPath) -> Self {
        Self {
            commands: path.commands().iter().map(|c| c.name().to_string()).collect(),
            points: path.points().iter().map(|p| [p.x, p.y]).collect(),
            svg: path.to_svg(),
            marks: None,
        }
    }
}

pub fn read_points(path: &Path) -> Result<PointSet> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing point set {}", path.display()))
}

/// Write `value` as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(value)?).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_defaults_to_false() {
        let set: PointSet = serde_json::from_str(r#"{"points": [[0, 0], [1.5, 2]]}"#).unwrap();
        assert!(!set.closed);
        assert_eq!(set.to_points(), vec![Point::new(0.0, 0.0), Point::new(1.5, 2.0)]);
    }

    #[test]
    fn path_doc_lists_command_names() {
        let path = VectorPath::from_polyline(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0)], true).unwrap();
        let doc = PathDoc::from(&path);
        assert_eq!(doc.commands, vec!["move", "line", "close"]);
        assert_eq!(doc.svg, "M0 0 L1 0 Z");
        let text = serde_json::to_string(&doc).unwrap();
        assert!(!text.contains("marks"));
    }
}
