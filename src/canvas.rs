//! Drawing surface that accumulates elements and serializes them as SVG.

use crate::geometry::{round2, Frame, VectorPath};
use svg::node::element::{Circle, ClipPath, Definitions, Image, Path, Rectangle};
use svg::Document;

/// What a drawn element represents on the banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Background,
    IconMask,
    Icon,
    JoinButton,
    JoinLabel,
    Header,
    BadgeBackground,
    BadgeGlyph,
    ServerName,
    PresenceDot,
    PresenceLabel,
    MemberDot,
    MemberLabel,
}

/// Handle to a clip shape registered with [`Canvas::clip_rect`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipId(String);

impl ClipId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        frame: Frame,
        radius: f32,
        fill: String,
    },
    Circle {
        frame: Frame,
        fill: String,
    },
    Path {
        path: VectorPath,
        frame: Frame,
        fill: String,
    },
    Image {
        frame: Frame,
        href: String,
        clip: Option<ClipId>,
    },
    /// Rounded rectangle that only exists as a clip region
    ClipRect {
        id: ClipId,
        frame: Frame,
        radius: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub layer: Layer,
    pub shape: Shape,
}

impl Element {
    pub fn frame(&self) -> Frame {
        match &self.shape {
            Shape::Rect { frame, .. }
            | Shape::Circle { frame, .. }
            | Shape::Path { frame, .. }
            | Shape::Image { frame, .. }
            | Shape::ClipRect { frame, .. } => *frame,
        }
    }
}

/// Accumulating output surface for one render
#[derive(Debug, Clone)]
pub struct Canvas {
    width: f32,
    height: f32,
    elements: Vec<Element>,
    next_clip: usize,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
            next_clip: 0,
        }
    }

    /// Everything drawn so far, in draw order
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Elements tagged with `layer`, in draw order
    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(move |e| e.layer == layer)
    }

    fn push(&mut self, layer: Layer, shape: Shape) -> Frame {
        let element = Element { layer, shape };
        let frame = element.frame();
        self.elements.push(element);
        frame
    }

    /// Filled rectangle; `radius` of zero gives square corners.
    pub fn rect(&mut self, layer: Layer, frame: Frame, radius: f32, fill: &str) -> Frame {
        self.push(
            layer,
            Shape::Rect {
                frame,
                radius,
                fill: fill.to_string(),
            },
        )
    }

    /// Filled circle whose bounding box has its top-left corner at `(x, y)`
    pub fn circle(&mut self, layer: Layer, x: f32, y: f32, diameter: f32, fill: &str) -> Frame {
        self.push(
            layer,
            Shape::Circle {
                frame: Frame::new(x, y, diameter, diameter),
                fill: fill.to_string(),
            },
        )
    }

    pub fn path(&mut self, layer: Layer, path: VectorPath, fill: &str) -> Frame {
        let frame = path.bounds();
        self.push(
            layer,
            Shape::Path {
                path,
                frame,
                fill: fill.to_string(),
            },
        )
    }

    /// Register a rounded rectangle as a clip region. It is not painted.
    pub fn clip_rect(&mut self, layer: Layer, frame: Frame, radius: f32) -> ClipId {
        let id = ClipId(format!("clip{}", self.next_clip));
        self.next_clip += 1;
        self.push(
            layer,
            Shape::ClipRect {
                id: id.clone(),
                frame,
                radius,
            },
        );
        id
    }

    pub fn image(&mut self, layer: Layer, frame: Frame, href: String, clip: Option<ClipId>) -> Frame {
        self.push(layer, Shape::Image { frame, href, clip })
    }

    /// Serialize the whole surface to a standalone SVG document
    pub fn to_svg(&self) -> String {
        let (w, h) = (round2(self.width), round2(self.height));
        let mut document = Document::new()
            .set("version", "1.1")
            .set("xmlns:xlink", "http://www.w3.org/1999/xlink")
            .set("width", w)
            .set("height", h)
            .set("viewBox", (0.0, 0.0, w, h));

        let mut defs = Definitions::new();
        let mut has_clips = false;
        for element in &self.elements {
            if let Shape::ClipRect { id, frame, radius } = &element.shape {
                defs = defs.add(
                    ClipPath::new()
                        .set("id", id.as_str())
                        .add(rect_node(frame, *radius)),
                );
                has_clips = true;
            }
        }
        if has_clips {
            document = document.add(defs);
        }

        for element in &self.elements {
            document = match &element.shape {
                Shape::Rect { frame, radius, fill } => {
                    document.add(rect_node(frame, *radius).set("fill", fill.as_str()))
                }
                Shape::Circle { frame, fill } => {
                    let r = frame.width / 2.0;
                    document.add(
                        Circle::new()
                            .set("cx", round2(frame.x + r))
                            .set("cy", round2(frame.y + r))
                            .set("r", round2(r))
                            .set("fill", fill.as_str()),
                    )
                }
                Shape::Path { path, fill, .. } => document.add(
                    Path::new()
                        .set("d", path.to_data())
                        .set("fill", fill.as_str()),
                ),
                Shape::Image { frame, href, clip } => {
                    let mut image = Image::new()
                        .set("x", round2(frame.x))
                        .set("y", round2(frame.y))
                        .set("width", round2(frame.width))
                        .set("height", round2(frame.height))
                        .set("xlink:href", href.as_str());
                    if let Some(clip) = clip {
                        image = image.set("clip-path", format!("url(#{})", clip.as_str()));
                    }
                    document.add(image)
                }
                Shape::ClipRect { .. } => document,
            };
        }

        document.to_string()
    }
}

fn rect_node(frame: &Frame, radius: f32) -> Rectangle {
    let rect = Rectangle::new()
        .set("x", round2(frame.x))
        .set("y", round2(frame.y))
        .set("width", round2(frame.width))
        .set("height", round2(frame.height));
    if radius > 0.0 {
        rect.set("rx", round2(radius)).set("ry", round2(radius))
    } else {
        rect
    }
}
