//! Rendering capability consumed by `VectorPath::apply`.

use std::fmt::Write as _;

use crate::geom::Point;

use super::VectorPath;

/// Anything that can receive path drawing commands.
pub trait Pen {
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    fn curve_to(&mut self, c1: Point, c2: Point, p: Point);
    fn close(&mut self);
}

impl Pen for VectorPath {
    fn move_to(&mut self, p: Point) {
        VectorPath::move_to(self, p);
    }

    fn line_to(&mut self, p: Point) {
        VectorPath::line_to(self, p);
    }

    fn curve_to(&mut self, c1: Point, c2: Point, p: Point) {
        VectorPath::curve_to(self, c1, c2, p);
    }

    fn close(&mut self) {
        VectorPath::close(self);
    }
}

/// Writes SVG path data (`M x y L x y C … Z`).
#[derive(Clone, Debug, Default)]
pub struct SvgPen {
    data: String,
}

impl SvgPen {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn finish(self) -> String {
        self.data
    }

    fn sep(&mut self) {
        if !self.data.is_empty() {
            self.data.push(' ');
        }
    }
}

impl Pen for SvgPen {
    fn move_to(&mut self, p: Point) {
        self.sep();
        let _ = write!(self.data, "M{} {}", p.x, p.y);
    }

    fn line_to(&mut self, p: Point) {
        self.sep();
        let _ = write!(self.data, "L{} {}", p.x, p.y);
    }

    fn curve_to(&mut self, c1: Point, c2: Point, p: Point) {
        self.sep();
        let _ = write!(self.data, "C{} {} {} {} {} {}", c1.x, c1.y, c2.x, c2.y, p.x, p.y);
    }

    fn close(&mut self) {
        self.sep();
        self.data.push('Z');
    }
}
