use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;
use vecpath::path::vertical_grid;
use vecpath::sample::{draw_stroke, ReplayToken, StrokeCfg};
use vecpath::simplify::simplify_polyline;
use vecpath::{GeomCfg, VectorPath};

mod io;
mod provenance;

use io::{read_points, write_json, PathDoc, PointSet};
use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "vecpath-cli")]
#[command(about = "Run vector path operations on JSON point sets")]
struct Cmd {
    /// Optional run label; propagated to provenance sidecars and logs
    #[arg(long)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Reduce a polyline with Ramer–Douglas–Peucker
    Simplify {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        epsilon: f64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Fit cubic Béziers through the points
    Fit {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        tolerance: f64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Path-level simplify: straight runs become fewer lines or a cubic
    Smooth {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        tolerance: f64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Split the polyline at a grid of vertical lines
    Subdivide {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        spacing: f64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Draw a deterministic noisy stroke
    Sample {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        index: u64,
        #[arg(long, default_value_t = 60)]
        count: usize,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print version, git rev and default tolerances as JSON
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let tag = cmd.tag;
    match cmd.action {
        Action::Simplify { input, epsilon, out } => simplify(&input, epsilon, &out, tag),
        Action::Fit {
            input,
            tolerance,
            out,
        } => fit(&input, tolerance, &out, tag),
        Action::Smooth {
            input,
            tolerance,
            out,
        } => smooth(&input, tolerance, &out, tag),
        Action::Subdivide {
            input,
            spacing,
            out,
        } => subdivide(&input, spacing, &out, tag),
        Action::Sample {
            seed,
            index,
            count,
            out,
        } => sample(seed, index, count, &out, tag),
        Action::Report => {
            println!("{}", serde_json::to_string_pretty(&report())?);
            Ok(())
        }
    }
}

fn simplify(input: &Path, epsilon: f64, out: &Path, tag: Option<String>) -> Result<()> {
    tracing::info!(input = %input.display(), epsilon, out = %out.display(), "simplify");
    let set = read_points(input)?;
    let reduced = simplify_polyline(&set.to_points(), epsilon).context("simplifying polyline")?;
    write_json(out, &PointSet::from_points(&reduced, set.closed))?;
    let payload = Payload::new("simplify", json!({ "input": input, "epsilon": epsilon }))
        .with_stats(json!({ "points_in": set.points.len(), "points_out": reduced.len() }))
        .with_tag(tag);
    write_sidecar(out, payload)?;
    Ok(())
}

fn fit(input: &Path, tolerance: f64, out: &Path, tag: Option<String>) -> Result<()> {
    tracing::info!(input = %input.display(), tolerance, out = %out.display(), "fit");
    let set = read_points(input)?;
    let path = VectorPath::fit(&set.to_points(), tolerance).context("fitting curves")?;
    write_path(out, &path, None, "fit", json!({ "input": input, "tolerance": tolerance }), set.points.len(), tag)
}

fn smooth(input: &Path, tolerance: f64, out: &Path, tag: Option<String>) -> Result<()> {
    tracing::info!(input = %input.display(), tolerance, out = %out.display(), "smooth");
    let set = read_points(input)?;
    let path = VectorPath::from_polyline(&set.to_points(), set.closed)
        .and_then(|p| p.simplify(tolerance))
        .context("simplifying path")?;
    write_path(out, &path, None, "smooth", json!({ "input": input, "tolerance": tolerance }), set.points.len(), tag)
}

fn subdivide(input: &Path, spacing: f64, out: &Path, tag: Option<String>) -> Result<()> {
    tracing::info!(input = %input.display(), spacing, out = %out.display(), "subdivide");
    let set = read_points(input)?;
    let path = VectorPath::from_polyline(&set.to_points(), set.closed).context("building path")?;
    let grid = match path.bounding_box() {
        Some(bb) => vertical_grid(&bb, spacing).context("building grid")?,
        None => Vec::new(),
    };
    let mut marks = vecpath::path::SvgPen::new();
    let split = path.subdivide_marked(&grid, GeomCfg::default(), &mut marks);
    write_path(
        out,
        &split,
        Some(marks.finish()),
        "subdivide",
        json!({ "input": input, "spacing": spacing, "grid_lines": grid.len() }),
        set.points.len(),
        tag,
    )
}

fn sample(seed: u64, index: u64, count: usize, out: &Path, tag: Option<String>) -> Result<()> {
    tracing::info!(seed, index, count, out = %out.display(), "sample");
    let cfg = StrokeCfg {
        count,
        ..StrokeCfg::default()
    };
    let points = draw_stroke(cfg, ReplayToken { seed, index });
    write_json(out, &PointSet::from_points(&points, false))?;
    let payload = Payload::new("sample", json!({ "seed": seed, "index": index, "count": count }))
        .with_stats(json!({ "points_out": points.len() }))
        .with_tag(tag);
    write_sidecar(out, payload)?;
    Ok(())
}

fn write_path(
    out: &Path,
    path: &VectorPath,
    marks: Option<String>,
    op: &'static str,
    params: serde_json::Value,
    points_in: usize,
    tag: Option<String>,
) -> Result<()> {
    let mut doc = PathDoc::from(path);
    doc.marks = marks;
    write_json(out, &doc)?;
    let payload = Payload::new(op, params)
        .with_stats(json!({
            "points_in": points_in,
            "points_out": path.points().len(),
            "commands": path.commands().len(),
        }))
        .with_tag(tag);
    write_sidecar(out, payload)?;
    Ok(())
}

fn report() -> serde_json::Value {
    let cfg = GeomCfg::default();
    json!({
        "version": vecpath::VERSION,
        "code_rev": provenance::current_git_rev(),
        "defaults": {
            "eps_det": cfg.eps_det,
            "eps_param": cfg.eps_param,
            "eps_merge": cfg.eps_merge,
            "max_curve_depth": cfg.max_curve_depth,
            "fit_max_iterations": cfg.fit_max_iterations,
            "fit_reparam_factor": cfg.fit_reparam_factor,
            "fit_max_depth": cfg.fit_max_depth,
            "flatten_max_depth": cfg.flatten_max_depth,
            "curve_flat_ratio": cfg.curve_flat_ratio,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn zigzag(dir: &Path, closed: bool) -> PathBuf {
        let input = dir.join("zigzag.json");
        let set = PointSet {
            points: vec![[0.0, 0.0], [1.0, 4.0], [2.0, 0.0], [3.0, 0.5], [4.0, 0.0]],
            closed,
        };
        write_json(&input, &set).unwrap();
        input
    }

    #[test]
    fn simplify_writes_points_and_sidecar() {
        let dir = tempdir().unwrap();
        let input = zigzag(dir.path(), false);
        let out = dir.path().join("nested/reduced.json");
        simplify(&input, 1.0, &out, None).unwrap();
        let set: PointSet = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(set.points, vec![[0.0, 0.0], [1.0, 4.0], [2.0, 0.0], [4.0, 0.0]]);
        assert!(dir.path().join("nested/reduced.provenance.json").exists());
    }

    #[test]
    fn smooth_reproduces_the_zigzag_scenario() {
        let dir = tempdir().unwrap();
        let input = zigzag(dir.path(), false);
        let out = dir.path().join("smooth.json");
        smooth(&input, 1.0, &out, Some("t".into())).unwrap();
        let doc: PathDoc = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(doc.commands, vec!["move", "line", "line", "curve"]);
        assert_eq!(doc.points.len(), 6);
        assert!(doc.svg.starts_with("M0 0 L1 4 L2 0 C"));
    }

    #[test]
    fn subdivide_reports_marks() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("line.json");
        write_json(
            &input,
            &PointSet {
                points: vec![[0.0, 0.0], [10.0, 0.0]],
                closed: false,
            },
        )
        .unwrap();
        let out = dir.path().join("split.json");
        subdivide(&input, 2.5, &out, None).unwrap();
        let doc: PathDoc = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(doc.commands.len(), 5);
        assert_eq!(doc.marks.unwrap().matches('Z').count(), 3);
    }

    #[test]
    fn subdivide_rejects_a_too_dense_grid() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("wide.json");
        write_json(
            &input,
            &PointSet {
                points: vec![[0.0, 0.0], [1e10, 0.0]],
                closed: false,
            },
        )
        .unwrap();
        let out = dir.path().join("split.json");
        assert!(subdivide(&input, 1e-9, &out, None).is_err());
        assert!(subdivide(&input, 0.0, &out, None).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn bad_input_is_an_error() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("one.json");
        fs::write(&input, r#"{"points": [[1, 1]]}"#).unwrap();
        let out = dir.path().join("never.json");
        assert!(simplify(&input, 1.0, &out, None).is_err());
        assert!(!out.exists());
        assert!(fit(&dir.path().join("missing.json"), 1.0, &out, None).is_err());
    }

    #[test]
    fn sample_and_fit_round() {
        let dir = tempdir().unwrap();
        let stroke = dir.path().join("stroke.json");
        sample(3, 1, 40, &stroke, None).unwrap();
        let set = read_points(&stroke).unwrap();
        assert_eq!(set.points.len(), 40);
        let out = dir.path().join("fit.json");
        fit(&stroke, 1.0, &out, None).unwrap();
        let doc: PathDoc = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(doc.commands[0], "move");
        assert!(doc.commands[1..].iter().all(|c| c == "curve"));
    }

    #[test]
    fn report_lists_defaults() {
        let r = report();
        assert_eq!(r["version"], vecpath::VERSION);
        assert_eq!(r["defaults"]["max_curve_depth"], 40);
    }
}
