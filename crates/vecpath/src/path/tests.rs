use super::*;
use crate::geom::Size;
use nalgebra::vector;

fn consumed(path: &VectorPath) -> usize {
    path.commands().iter().map(|c| c.point_count()).sum()
}

fn square_path(x0: f64, y0: f64, side: f64) -> VectorPath {
    VectorPath::from_polyline(
        &[
            vector![x0, y0],
            vector![x0 + side, y0],
            vector![x0 + side, y0 + side],
            vector![x0, y0 + side],
        ],
        true,
    )
    .unwrap()
}

#[test]
fn drawing_without_current_point_starts_a_subpath() {
    let mut p = VectorPath::new();
    p.line_to(vector![1.0, 2.0]);
    assert_eq!(p.commands(), &[PathCmd::Move]);
    assert_eq!(p.points(), &[vector![1.0, 2.0]]);

    let mut q = VectorPath::new();
    q.curve_to(vector![0.0, 1.0], vector![1.0, 1.0], vector![1.0, 0.0]);
    assert_eq!(q.commands(), &[PathCmd::Move, PathCmd::Curve]);
    assert_eq!(q.points()[0], vector![0.0, 1.0]);
    assert_eq!(consumed(&q), q.points().len());
}

#[test]
fn close_rules() {
    let mut p = VectorPath::new();
    p.close();
    assert!(p.is_empty());

    p.move_to(vector![0.0, 0.0]);
    p.line_to(vector![1.0, 0.0]);
    p.close();
    p.close();
    assert_eq!(p.commands(), &[PathCmd::Move, PathCmd::Line, PathCmd::Close]);
    assert_eq!(p.current_point(), Some(vector![0.0, 0.0]));

    // drawing after close moves back to the subpath start first
    p.line_to(vector![0.0, 1.0]);
    assert_eq!(
        p.commands(),
        &[PathCmd::Move, PathCmd::Line, PathCmd::Close, PathCmd::Move, PathCmd::Line]
    );
    assert_eq!(p.points()[2], vector![0.0, 0.0]);
    assert_eq!(consumed(&p), p.points().len());
}

#[test]
fn consecutive_moves_collapse() {
    let mut p = VectorPath::new();
    p.move_to(vector![0.0, 0.0]);
    p.move_to(vector![3.0, 3.0]);
    p.line_to(vector![4.0, 3.0]);
    assert_eq!(p.commands(), &[PathCmd::Move, PathCmd::Line]);
    assert_eq!(p.points(), &[vector![3.0, 3.0], vector![4.0, 3.0]]);
    assert_eq!(p.subpath_count(), 1);
}

#[test]
fn polyline_and_cubic_constructors() {
    assert!(matches!(
        VectorPath::from_polyline(&[], false),
        Err(GeomError::TooFewPoints { needed: 1, got: 0 })
    ));
    let sq = square_path(0.0, 0.0, 1.0);
    assert_eq!(sq.commands().len(), 5);
    assert!(sq.is_closed_subpath(0));
    assert!(!sq.is_closed_subpath(1));

    let a = CubicBez::new(vector![0.0, 0.0], vector![1.0, 1.0], vector![2.0, 1.0], vector![3.0, 0.0]);
    let b = CubicBez::new(vector![3.0, 0.0], vector![4.0, -1.0], vector![5.0, -1.0], vector![6.0, 0.0]);
    let c = CubicBez::straight(vector![10.0, 0.0], vector![11.0, 0.0]);
    let p = VectorPath::from_cubics(&[a, b, c]);
    assert_eq!(
        p.commands(),
        &[PathCmd::Move, PathCmd::Curve, PathCmd::Curve, PathCmd::Move, PathCmd::Curve]
    );
    assert_eq!(p.subpath_count(), 2);
    assert_eq!(consumed(&p), p.points().len());
}

#[test]
fn apply_replays_into_pens() {
    let sq = square_path(0.0, 0.0, 2.0);
    let mut copy = VectorPath::new();
    sq.apply(&mut copy);
    assert_eq!(copy, sq);
    assert_eq!(sq.to_svg(), "M0 0 L2 0 L2 2 L0 2 Z");

    let mut c = VectorPath::new();
    c.move_to(vector![0.0, 0.0]);
    c.curve_to(vector![1.0, 2.0], vector![3.0, 2.0], vector![4.0, 0.5]);
    assert_eq!(c.to_svg(), "M0 0 C1 2 3 2 4 0.5");
}

#[test]
fn segments_include_closing_line() {
    let sq = square_path(0.0, 0.0, 1.0);
    let segs = sq.segments();
    assert_eq!(segs.len(), 4);
    let ids: Vec<usize> = segs.iter().map(|s| s.id.0).collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);
    assert!(segs[3].closing);
    assert_eq!(segs[3].segment.start(), vector![0.0, 1.0]);
    assert_eq!(segs[3].segment.end(), vector![0.0, 0.0]);

    // explicit return to the start: the close adds nothing
    let tri = VectorPath::from_polyline(
        &[vector![0.0, 0.0], vector![1.0, 0.0], vector![0.0, 1.0], vector![0.0, 0.0]],
        true,
    )
    .unwrap();
    assert_eq!(tri.segments().len(), 3);
    assert!(tri.segments().iter().all(|s| !s.closing));
}

#[test]
fn curve_segment_ids_point_at_start() {
    let mut p = VectorPath::new();
    p.move_to(vector![0.0, 0.0]);
    p.curve_to(vector![0.0, 1.0], vector![1.0, 1.0], vector![1.0, 0.0]);
    p.line_to(vector![2.0, 0.0]);
    let segs = p.segments();
    assert_eq!(segs[0].id, SegmentId(0));
    assert_eq!(segs[0].kind, SegmentKind::Curve);
    assert_eq!(segs[1].id, SegmentId(3));
    assert_eq!(segs[1].segment.start(), vector![1.0, 0.0]);
}

#[test]
fn bounds_and_transform() {
    assert!(VectorPath::new().bounding_box().is_none());
    let mut p = VectorPath::new();
    p.move_to(vector![0.0, 0.0]);
    p.curve_to(vector![0.0, 4.0], vector![4.0, 4.0], vector![4.0, 0.0]);
    let bb = p.bounding_box().unwrap();
    assert!((bb.max().y - 3.0).abs() < 1e-12);
    assert_eq!(bb.min(), vector![0.0, 0.0]);
    assert_eq!(bb.max().x, 4.0);

    let moved = p.transform(&AffineMatrix::translation(1.0, -1.0));
    assert_eq!(moved.commands(), p.commands());
    assert_eq!(moved.points()[3], vector![5.0, -1.0]);
    let bb2 = moved.bounding_box().unwrap();
    assert!((bb2.min() - vector![1.0, -1.0]).norm() < 1e-12);
}

#[test]
fn flatten_gives_one_polygon_per_subpath() {
    let mut p = square_path(0.0, 0.0, 1.0);
    p.move_to(vector![5.0, 0.0]);
    p.curve_to(vector![5.0, 2.0], vector![7.0, 2.0], vector![7.0, 0.0]);
    let polys = p.flatten(0.01).unwrap();
    assert_eq!(polys.len(), 2);
    assert_eq!(polys[0].len(), 4);
    assert!(polys[1].len() > 4);
    assert_eq!(polys[1].points[0], vector![5.0, 0.0]);
    assert_eq!(*polys[1].points.last().unwrap(), vector![7.0, 0.0]);
    assert!(p.flatten(-1.0).is_err());
}

#[test]
fn path_intersections() {
    let sq = square_path(0.0, 0.0, 10.0);
    let cut = VectorPath::from_polyline(&[vector![-5.0, 5.0], vector![15.0, 5.0]], false).unwrap();
    let hits = sq.intersections(&cut, GeomCfg::default());
    assert_eq!(hits.len(), 2);
    let mut xs: Vec<f64> = hits.iter().map(|r| r.a.point.x).collect();
    xs.sort_by(f64::total_cmp);
    assert!((xs[0] - 0.0).abs() < 1e-12);
    assert!((xs[1] - 10.0).abs() < 1e-12);
    assert!(hits.iter().all(|r| r.b.id == SegmentId(0)));
}

#[test]
fn zigzag_simplifies_to_two_lines_and_a_curve() {
    let pts = [
        vector![0.0, 0.0],
        vector![1.0, 4.0],
        vector![2.0, 0.0],
        vector![3.0, 0.5],
        vector![4.0, 0.0],
    ];
    let path = VectorPath::from_polyline(&pts, false).unwrap();
    let out = path.simplify(1.0).unwrap();
    assert_eq!(
        out.commands(),
        &[PathCmd::Move, PathCmd::Line, PathCmd::Line, PathCmd::Curve]
    );
    assert_eq!(out.points().len(), 6);
    assert_eq!(&out.points()[..3], &pts[..3]);
    assert_eq!(out.points()[5], vector![4.0, 0.0]);
    // the cubic passes close to the dropped point
    let bez = CubicBez::new(out.points()[2], out.points()[3], out.points()[4], out.points()[5]);
    let near = (0..=100)
        .map(|i| (bez.eval(i as f64 / 100.0) - pts[3]).norm())
        .fold(f64::INFINITY, f64::min);
    assert!(near <= 1.0);
}

#[test]
fn closed_runs_never_become_curves() {
    let pts = [
        vector![0.0, 0.0],
        vector![1.0, 4.0],
        vector![2.0, 0.0],
        vector![3.0, 0.5],
        vector![4.0, 0.0],
    ];
    let path = VectorPath::from_polyline(&pts, true).unwrap();
    let out = path.simplify(1.0).unwrap();
    assert_eq!(
        out.commands(),
        &[PathCmd::Move, PathCmd::Line, PathCmd::Line, PathCmd::Line, PathCmd::Close]
    );
    assert_eq!(out.points(), &[pts[0], pts[1], pts[2], pts[4]]);
}

#[test]
fn collapsed_runs_take_a_curve_only_when_it_saves_points() {
    let bump: Vec<Point> = (0..=5)
        .map(|i| {
            let x = i as f64;
            vector![x, 0.3 * (std::f64::consts::PI * x / 5.0).sin()]
        })
        .collect();
    let out = VectorPath::from_polyline(&bump, false)
        .unwrap()
        .simplify(1.0)
        .unwrap();
    assert_eq!(out.commands(), &[PathCmd::Move, PathCmd::Curve]);
    assert_eq!(out.points()[3], bump[5]);

    let short = [vector![0.0, 0.0], vector![1.0, 0.3], vector![2.0, 0.3], vector![3.0, 0.0]];
    let out = VectorPath::from_polyline(&short, false)
        .unwrap()
        .simplify(1.0)
        .unwrap();
    assert_eq!(out.commands(), &[PathCmd::Move, PathCmd::Line]);
    assert_eq!(out.points(), &[short[0], short[3]]);
}

#[test]
fn short_runs_and_curves_pass_through() {
    let mut p = VectorPath::new();
    p.move_to(vector![0.0, 0.0]);
    p.line_to(vector![1.0, 0.01]);
    p.line_to(vector![2.0, 0.0]);
    p.curve_to(vector![3.0, 1.0], vector![4.0, 1.0], vector![5.0, 0.0]);
    let out = p.simplify(1.0).unwrap();
    assert_eq!(out, p);
    assert!(p.simplify(f64::NAN).is_err());
}

#[test]
fn grid_splits_lines_and_marks_points() {
    let line = VectorPath::from_polyline(&[vector![0.0, 0.0], vector![10.0, 0.0]], false).unwrap();
    let grid = vertical_grid(&line.bounding_box().unwrap(), 2.5).unwrap();
    assert_eq!(grid.len(), 5);
    let mut marks = VectorPath::new();
    let out = line.subdivide_marked(&grid, GeomCfg::default(), &mut marks);
    assert_eq!(out.commands().len(), 5);
    let xs: Vec<f64> = out.points().iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    assert_eq!(marks.subpath_count(), 3);
    assert!((0..3).all(|i| marks.is_closed_subpath(i)));
}

#[test]
fn grid_rejects_bad_or_too_dense_spacing() {
    let rect = Rect::new(vector![0.0, 0.0], Size::new(1e10, 1.0));
    assert_eq!(vertical_grid(&rect, 0.0), Err(GeomError::InvalidTolerance(0.0)));
    assert!(matches!(vertical_grid(&rect, f64::NAN), Err(GeomError::InvalidTolerance(_))));
    assert_eq!(
        vertical_grid(&rect, 1e-9),
        Err(GeomError::GridTooDense {
            spacing: 1e-9,
            limit: MAX_GRID_LINES
        })
    );
    assert_eq!(vertical_grid(&rect, 1e6).unwrap().len(), 10_001);
    let offset = Rect::new(vector![0.3, 0.0], Size::new(0.2, 1.0));
    assert!(vertical_grid(&offset, 1.0).unwrap().is_empty());
}

#[test]
fn curves_split_into_exact_pieces() {
    let mut p = VectorPath::new();
    p.move_to(vector![0.0, 0.0]);
    p.curve_to(vector![0.0, 10.0], vector![10.0, 10.0], vector![10.0, 0.0]);
    let cut = [Line::new(vector![5.0, -1.0], vector![5.0, 20.0])];
    let out = p.subdivide(&cut, GeomCfg::default());
    assert_eq!(out.commands(), &[PathCmd::Move, PathCmd::Curve, PathCmd::Curve]);
    assert!((out.points()[3] - vector![5.0, 7.5]).norm() < 1e-9);
    assert_eq!(out.points()[6], vector![10.0, 0.0]);

    let whole = CubicBez::new(p.points()[0], p.points()[1], p.points()[2], p.points()[3]);
    let first = CubicBez::new(out.points()[0], out.points()[1], out.points()[2], out.points()[3]);
    for i in 0..=10 {
        let u = i as f64 / 10.0;
        assert!((first.eval(u) - whole.eval(0.5 * u)).norm() < 1e-9);
    }
}

#[test]
fn split_close_becomes_explicit_lines() {
    let tri = VectorPath::from_polyline(&[vector![0.0, 0.0], vector![10.0, 0.0], vector![5.0, 5.0]], true).unwrap();
    let cut = [Line::new(vector![2.5, -1.0], vector![2.5, 6.0])];
    let out = tri.subdivide(&cut, GeomCfg::default());
    assert_eq!(
        out.commands(),
        &[PathCmd::Move, PathCmd::Line, PathCmd::Line, PathCmd::Line, PathCmd::Line, PathCmd::Close]
    );
    assert!((out.points()[1] - vector![2.5, 0.0]).norm() < 1e-12);
    assert!((out.points()[4] - vector![2.5, 2.5]).norm() < 1e-12);
}

#[test]
fn boolean_on_single_contours() {
    let a = square_path(0.0, 0.0, 2.0);
    let b = square_path(1.0, 1.0, 2.0);
    let inter = a.boolean(&b, BooleanOp::Intersection, 0.1).unwrap();
    assert_eq!(inter.subpath_count(), 1);
    assert!(inter.is_closed_subpath(0));
    let polys = inter.flatten(0.1).unwrap();
    assert!((polys[0].signed_area().abs() - 1.0).abs() < 1e-9);

    let mut two = square_path(0.0, 0.0, 1.0);
    two.append(&square_path(5.0, 5.0, 1.0));
    assert!(matches!(
        two.boolean(&b, BooleanOp::Union, 0.1),
        Err(GeomError::Unsupported(_))
    ));
}

#[test]
fn fitted_path_is_a_curve_chain() {
    let pts: Vec<Point> = (0..20)
        .map(|i| {
            let t = i as f64 / 19.0 * std::f64::consts::FRAC_PI_2;
            vector![t.cos(), t.sin()] * 10.0
        })
        .collect();
    let p = VectorPath::fit(&pts, 0.05).unwrap();
    assert_eq!(p.commands()[0], PathCmd::Move);
    assert!(p.commands()[1..].iter().all(|c| *c == PathCmd::Curve));
    assert_eq!(p.subpath_count(), 1);
    assert_eq!(p.points()[0], pts[0]);
    assert_eq!(*p.points().last().unwrap(), pts[19]);
}
