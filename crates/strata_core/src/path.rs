//! Path building and representation

use smallvec::SmallVec;

use crate::geometry::{Point, Rect};
use crate::matrix::Matrix;

/// Path command
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo {
        control: Point,
        end: Point,
    },
    CubicTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
    Close,
}

impl PathCommand {
    fn map(self, f: impl Fn(Point) -> Point) -> Self {
        match self {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(f(p)),
            PathCommand::LineTo(p) => PathCommand::LineTo(f(p)),
            PathCommand::QuadTo { control, end } => PathCommand::QuadTo {
                control: f(control),
                end: f(end),
            },
            PathCommand::CubicTo {
                control1,
                control2,
                end,
            } => PathCommand::CubicTo {
                control1: f(control1),
                control2: f(control2),
                end: f(end),
            },
            PathCommand::Close => PathCommand::Close,
        }
    }

    fn points(&self) -> SmallVec<[Point; 3]> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => smallvec::smallvec![p],
            PathCommand::QuadTo { control, end } => smallvec::smallvec![control, end],
            PathCommand::CubicTo {
                control1,
                control2,
                end,
            } => smallvec::smallvec![control1, control2, end],
            PathCommand::Close => SmallVec::new(),
        }
    }
}

/// A 2D path composed of commands
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: SmallVec<[PathCommand; 16]>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closed rectangular path, clockwise from the top-left corner
    pub fn from_rect(rect: &Rect) -> Self {
        let [p0, p1, p2, p3] = rect.corners();
        PathBuilder::new()
            .move_to(p0.x, p0.y)
            .line_to(p1.x, p1.y)
            .line_to(p2.x, p2.y)
            .line_to(p3.x, p3.y)
            .close()
            .build()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Every point of the path, control points included
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.commands.iter().flat_map(|c| c.points())
    }

    /// Bounding box of all points, control points included
    ///
    /// Control points make this a conservative bound for curves.
    pub fn bounds(&self) -> Option<Rect> {
        Rect::bounding(self.points())
    }

    /// Map every point through `matrix`
    pub fn transform(&self, matrix: &Matrix) -> Path {
        Path {
            commands: self
                .commands
                .iter()
                .map(|c| c.map(|p| matrix.transform_point(p)))
                .collect(),
        }
    }
}

/// Builder for constructing paths
pub struct PathBuilder {
    path: Path,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self { path: Path::new() }
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.path
            .commands
            .push(PathCommand::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.path
            .commands
            .push(PathCommand::LineTo(Point::new(x, y)));
        self
    }

    pub fn quad_to(mut self, cx: f64, cy: f64, x: f64, y: f64) -> Self {
        self.path.commands.push(PathCommand::QuadTo {
            control: Point::new(cx, cy),
            end: Point::new(x, y),
        });
        self
    }

    pub fn cubic_to(mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) -> Self {
        self.path.commands.push(PathCommand::CubicTo {
            control1: Point::new(c1x, c1y),
            control2: Point::new(c2x, c2y),
            end: Point::new(x, y),
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.path.commands.push(PathCommand::Close);
        self
    }

    pub fn build(self) -> Path {
        self.path
    }
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}
