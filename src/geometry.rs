//! Frames and vector paths used by the compositor and the layout math.
//!
//! All path commands are stored in absolute coordinates so a path can be
//! measured and moved without tracking a pen position.

use std::slice::ChunksExact;
use svg::node::element::path::{Command, Data, Parameters, Position};
use thiserror::Error;

/// Axis-aligned box occupied by a drawn element
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// x coordinate of the right edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// y coordinate of the bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// A point in canvas units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A single absolute path command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    CubicTo(Point, Point, Point),
    Close,
}

/// Path data could not be parsed or uses commands the compositor cannot move
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid path data: {0}")]
pub struct PathError(pub String);

/// Outline geometry for text, badges and other filled shapes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VectorPath {
    commands: Vec<PathCommand>,
}

impl VectorPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn push(&mut self, command: PathCommand) {
        self.commands.push(command);
    }

    /// Parse SVG path data (`M L H V Q C Z`, absolute or relative).
    pub fn parse(data: &str) -> Result<Self, PathError> {
        let parsed = Data::parse(data).map_err(|e| PathError(e.to_string()))?;
        let mut path = VectorPath::new();
        let mut current = Point::default();
        let mut start = Point::default();

        for command in parsed.iter() {
            match command {
                Command::Move(position, params) => {
                    for (i, pair) in chunks(params, 2, 'M')?.enumerate() {
                        let p = offset(position, current, pair[0], pair[1]);
                        // extra coordinate pairs after a moveto are implicit linetos
                        if i == 0 {
                            path.push(PathCommand::MoveTo(p));
                            start = p;
                        } else {
                            path.push(PathCommand::LineTo(p));
                        }
                        current = p;
                    }
                }
                Command::Line(position, params) => {
                    for pair in chunks(params, 2, 'L')? {
                        current = offset(position, current, pair[0], pair[1]);
                        path.push(PathCommand::LineTo(current));
                    }
                }
                Command::HorizontalLine(position, params) => {
                    for x in chunks(params, 1, 'H')? {
                        current.x = match position {
                            Position::Absolute => x[0],
                            Position::Relative => current.x + x[0],
                        };
                        path.push(PathCommand::LineTo(current));
                    }
                }
                Command::VerticalLine(position, params) => {
                    for y in chunks(params, 1, 'V')? {
                        current.y = match position {
                            Position::Absolute => y[0],
                            Position::Relative => current.y + y[0],
                        };
                        path.push(PathCommand::LineTo(current));
                    }
                }
                Command::QuadraticCurve(position, params) => {
                    for q in chunks(params, 4, 'Q')? {
                        let c = offset(position, current, q[0], q[1]);
                        let p = offset(position, current, q[2], q[3]);
                        path.push(PathCommand::QuadTo(c, p));
                        current = p;
                    }
                }
                Command::CubicCurve(position, params) => {
                    for q in chunks(params, 6, 'C')? {
                        let c1 = offset(position, current, q[0], q[1]);
                        let c2 = offset(position, current, q[2], q[3]);
                        let p = offset(position, current, q[4], q[5]);
                        path.push(PathCommand::CubicTo(c1, c2, p));
                        current = p;
                    }
                }
                Command::Close => {
                    path.push(PathCommand::Close);
                    current = start;
                }
                other => {
                    return Err(PathError(format!("unsupported command {:?}", other)));
                }
            }
        }

        Ok(path)
    }

    /// Tight bounding box, including curve extrema.
    pub fn bounds(&self) -> Frame {
        let mut acc = BoundsAcc::default();
        let mut current = Point::default();
        let mut start = Point::default();

        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) => {
                    acc.add(p);
                    current = p;
                    start = p;
                }
                PathCommand::LineTo(p) => {
                    acc.add(p);
                    current = p;
                }
                PathCommand::QuadTo(c, p) => {
                    acc.add(p);
                    for t in quad_extrema(current.x, c.x, p.x)
                        .into_iter()
                        .chain(quad_extrema(current.y, c.y, p.y))
                        .flatten()
                    {
                        acc.add(Point::new(
                            quad_at(current.x, c.x, p.x, t),
                            quad_at(current.y, c.y, p.y, t),
                        ));
                    }
                    current = p;
                }
                PathCommand::CubicTo(c1, c2, p) => {
                    acc.add(p);
                    for t in cubic_extrema(current.x, c1.x, c2.x, p.x)
                        .into_iter()
                        .chain(cubic_extrema(current.y, c1.y, c2.y, p.y))
                        .flatten()
                    {
                        acc.add(Point::new(
                            cubic_at(current.x, c1.x, c2.x, p.x, t),
                            cubic_at(current.y, c1.y, c2.y, p.y, t),
                        ));
                    }
                    current = p;
                }
                PathCommand::Close => current = start,
            }
        }

        acc.frame()
    }

    /// Every point shifted by `(dx, dy)`
    pub fn translate(&self, dx: f32, dy: f32) -> VectorPath {
        let shift = |p: Point| Point::new(p.x + dx, p.y + dy);
        let commands = self
            .commands
            .iter()
            .map(|cmd| match *cmd {
                PathCommand::MoveTo(p) => PathCommand::MoveTo(shift(p)),
                PathCommand::LineTo(p) => PathCommand::LineTo(shift(p)),
                PathCommand::QuadTo(c, p) => PathCommand::QuadTo(shift(c), shift(p)),
                PathCommand::CubicTo(c1, c2, p) => {
                    PathCommand::CubicTo(shift(c1), shift(c2), shift(p))
                }
                PathCommand::Close => PathCommand::Close,
            })
            .collect();
        VectorPath { commands }
    }

    /// Translate so the bounding box's top-left corner lands on `(x, y)`.
    pub fn moved_to(&self, x: f32, y: f32) -> VectorPath {
        let b = self.bounds();
        self.translate(x - b.x, y - b.y)
    }

    /// Absolute path data with coordinates rounded by [`round2`]
    pub fn to_data(&self) -> Data {
        self.commands.iter().fold(Data::new(), |data, cmd| match *cmd {
            PathCommand::MoveTo(p) => data.move_to((round2(p.x), round2(p.y))),
            PathCommand::LineTo(p) => data.line_to((round2(p.x), round2(p.y))),
            PathCommand::QuadTo(c, p) => data.quadratic_curve_to(vec![
                round2(c.x),
                round2(c.y),
                round2(p.x),
                round2(p.y),
            ]),
            PathCommand::CubicTo(c1, c2, p) => data.cubic_curve_to(vec![
                round2(c1.x),
                round2(c1.y),
                round2(c2.x),
                round2(c2.y),
                round2(p.x),
                round2(p.y),
            ]),
            PathCommand::Close => data.close(),
        })
    }
}

/// Round a coordinate to two decimals; `-0` comes out as `0`.
pub fn round2(v: f32) -> f32 {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn chunks(
    params: &Parameters,
    arity: usize,
    letter: char,
) -> Result<ChunksExact<'_, f32>, PathError> {
    if params.is_empty() || params.len() % arity != 0 {
        return Err(PathError(format!(
            "'{}' takes multiples of {} numbers, got {}",
            letter,
            arity,
            params.len()
        )));
    }
    Ok(params.chunks_exact(arity))
}

fn offset(position: &Position, current: Point, x: f32, y: f32) -> Point {
    match position {
        Position::Absolute => Point::new(x, y),
        Position::Relative => Point::new(current.x + x, current.y + y),
    }
}

#[derive(Default)]
struct BoundsAcc {
    min: Option<Point>,
    max: Option<Point>,
}

impl BoundsAcc {
    fn add(&mut self, p: Point) {
        self.min = Some(match self.min {
            Some(m) => Point::new(m.x.min(p.x), m.y.min(p.y)),
            None => p,
        });
        self.max = Some(match self.max {
            Some(m) => Point::new(m.x.max(p.x), m.y.max(p.y)),
            None => p,
        });
    }

    fn frame(&self) -> Frame {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Frame::new(min.x, min.y, max.x - min.x, max.y - min.y),
            _ => Frame::default(),
        }
    }
}

const EPSILON: f32 = 1e-6;

fn in_unit(t: f32) -> Option<f32> {
    (t > 0.0 && t < 1.0).then_some(t)
}

fn quad_extrema(p0: f32, p1: f32, p2: f32) -> [Option<f32>; 1] {
    let denom = p0 - 2.0 * p1 + p2;
    if denom.abs() < EPSILON {
        return [None];
    }
    [in_unit((p0 - p1) / denom)]
}

fn quad_at(p0: f32, p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    mt * mt * p0 + 2.0 * mt * t * p1 + t * t * p2
}

fn cubic_extrema(p0: f32, p1: f32, p2: f32, p3: f32) -> [Option<f32>; 2] {
    // roots of the derivative a*t^2 + b*t + c
    let a = p3 - 3.0 * p2 + 3.0 * p1 - p0;
    let b = 2.0 * (p0 - 2.0 * p1 + p2);
    let c = p1 - p0;

    if a.abs() < EPSILON {
        if b.abs() < EPSILON {
            return [None, None];
        }
        return [in_unit(-c / b), None];
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return [None, None];
    }
    let root = disc.sqrt();
    [
        in_unit((-b + root) / (2.0 * a)),
        in_unit((-b - root) / (2.0 * a)),
    ]
}

fn cubic_at(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    mt * mt * mt * p0 + 3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t * p3
}

#[cfg(test)]
mod tests {
    use super::*;
    use svg::node::Value;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn parses_absolute_and_relative_commands() {
        let path = VectorPath::parse("M10,10 h5 v5 H10 z m2 2 l1 -1").unwrap();
        assert_eq!(
            path.commands(),
            &[
                PathCommand::MoveTo(Point::new(10.0, 10.0)),
                PathCommand::LineTo(Point::new(15.0, 10.0)),
                PathCommand::LineTo(Point::new(15.0, 15.0)),
                PathCommand::LineTo(Point::new(10.0, 15.0)),
                PathCommand::Close,
                PathCommand::MoveTo(Point::new(12.0, 12.0)),
                PathCommand::LineTo(Point::new(13.0, 11.0)),
            ]
        );
    }

    #[test]
    fn implicit_lineto_after_moveto() {
        let path = VectorPath::parse("M0 0 4 0 4 4").unwrap();
        assert_eq!(path.commands().len(), 3);
        assert_eq!(path.commands()[2], PathCommand::LineTo(Point::new(4.0, 4.0)));
    }

    #[test]
    fn rejects_unsupported_or_short_commands() {
        assert!(VectorPath::parse("M1 2 A1 1 0 0 1 3 3").is_err());
        assert!(VectorPath::parse("M1 2 S3 3 4 4").is_err());
        assert!(VectorPath::parse("M1").is_err());
        assert!(VectorPath::parse("M0 0 Q1 1 2").is_err());
    }

    #[test]
    fn bounds_follow_curve_extrema() {
        // the control point pulls the curve up to y = -5, not -10
        let path = VectorPath::parse("M0 0 Q5 -10 10 0").unwrap();
        let b = path.bounds();
        assert!(close(b.x, 0.0));
        assert!(close(b.width, 10.0));
        assert!(close(b.y, -5.0));
        assert!(close(b.height, 5.0));

        let cubic = VectorPath::parse("M0 0 C0 -8 10 -8 10 0").unwrap();
        let b = cubic.bounds();
        assert!(close(b.y, -6.0));
    }

    #[test]
    fn empty_path_has_zero_bounds() {
        assert_eq!(VectorPath::new().bounds(), Frame::default());
    }

    #[test]
    fn moved_to_places_the_top_left_corner() {
        let path = VectorPath::parse("M3 4 L13 4 L13 9 Z").unwrap();
        let moved = path.moved_to(100.0, 50.0);
        let b = moved.bounds();
        assert!(close(b.x, 100.0) && close(b.y, 50.0));
        assert!(close(b.width, 10.0) && close(b.height, 5.0));
        assert_eq!(
            moved.commands(),
            &[
                PathCommand::MoveTo(Point::new(100.0, 50.0)),
                PathCommand::LineTo(Point::new(110.0, 50.0)),
                PathCommand::LineTo(Point::new(110.0, 55.0)),
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn written_data_parses_back_to_the_same_commands() {
        let path = VectorPath::parse("M0.004 1 Q5 -10 10 0 C1 2 3 4 5 6 Z").unwrap();
        let written = path.to_data();
        let reparsed = VectorPath::parse(&Value::from(written).to_string()).unwrap();
        assert_eq!(reparsed.commands()[0], PathCommand::MoveTo(Point::new(0.0, 1.0)));
        assert_eq!(&reparsed.commands()[1..], &path.commands()[1..]);
    }

    #[test]
    fn rounding_trims_noise() {
        assert_eq!(round2(1.0), 1.0);
        assert_eq!(round2(2.504), 2.5);
        assert_eq!(round2(-0.001).to_string(), "0");
        assert_eq!(round2(319.25), 319.25);
    }
}
