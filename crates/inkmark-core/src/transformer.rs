//! Selection overlay: bounding box, corner handles and pointer-to-handle mapping.

use crate::geometry::{point_in_rotated_rect, to_local};
use crate::shapes::{SerializableColor, Shape, ShapeId};
use crate::surface::{Paint, Surface};
use crate::tools::CursorIcon;
use kurbo::{Affine, Point, Rect, Shape as KurboShape, Stroke};
use serde::{Deserialize, Serialize};

/// Default handle edge length, also the corner hit radius.
pub const DEFAULT_HANDLE_SIZE: f64 = 10.0;

/// Overlay outline color.
const OUTLINE_COLOR: SerializableColor = SerializableColor::new(0x00, 0xa8, 0xff, 255);

/// Corner positions, in handle index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    /// Handle index: 0=TL, 1=TR, 2=BR, 3=BL.
    pub fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomRight => 2,
            Corner::BottomLeft => 3,
        }
    }

    /// The diagonally opposite corner.
    pub fn opposite(self) -> Self {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomRight => Corner::TopLeft,
            Corner::BottomLeft => Corner::TopRight,
        }
    }

    /// This corner of `rect`.
    pub fn point_of(self, rect: Rect) -> Point {
        match self {
            Corner::TopLeft => Point::new(rect.x0, rect.y0),
            Corner::TopRight => Point::new(rect.x1, rect.y0),
            Corner::BottomRight => Point::new(rect.x1, rect.y1),
            Corner::BottomLeft => Point::new(rect.x0, rect.y1),
        }
    }

    /// Resize cursor shown while hovering or dragging this corner.
    pub fn cursor(self) -> CursorIcon {
        match self {
            Corner::TopLeft => CursorIcon::ResizeNw,
            Corner::TopRight => CursorIcon::ResizeNe,
            Corner::BottomRight => CursorIcon::ResizeSe,
            Corner::BottomLeft => CursorIcon::ResizeSw,
        }
    }
}

/// Result of probing the overlay with a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleHit {
    /// On a corner handle.
    Corner(Corner),
    /// Inside the box but off the handles (drag to move).
    Inside,
    /// Nothing attached, or a miss.
    Outside,
}

impl HandleHit {
    /// Numeric form: 0..=3 for corners, -2 inside, -1 outside.
    pub fn index(self) -> i32 {
        match self {
            HandleHit::Corner(corner) => corner.index() as i32,
            HandleHit::Inside => -2,
            HandleHit::Outside => -1,
        }
    }
}

/// Selection overlay for at most one shape.
///
/// Holds the selected shape's id, not the shape; callers pass the shape list in
/// so the overlay always sees the live geometry.
#[derive(Debug, Clone)]
pub struct Transformer {
    attached: Option<ShapeId>,
    handle_size: f64,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer {
    pub fn new() -> Self {
        Self::with_handle_size(DEFAULT_HANDLE_SIZE)
    }

    pub fn with_handle_size(handle_size: f64) -> Self {
        Self {
            attached: None,
            handle_size,
        }
    }

    /// Attach to a shape, or detach with `None`.
    pub fn attach(&mut self, shape: Option<&Shape>) {
        self.attached = shape.map(Shape::id);
    }

    pub fn detach(&mut self) {
        self.attached = None;
    }

    pub fn attached(&self) -> Option<ShapeId> {
        self.attached
    }

    pub fn handle_size(&self) -> f64 {
        self.handle_size
    }

    fn resolve<'a>(&self, shapes: &'a [Shape]) -> Option<&'a Shape> {
        let id = self.attached?;
        shapes.iter().find(|shape| shape.id() == id)
    }

    /// Draw the box and handles around the attached shape.
    pub fn draw(&self, shapes: &[Shape], surface: &mut dyn Surface) {
        let Some(shape) = self.resolve(shapes) else {
            return;
        };
        let bounds = shape.bounds();

        surface.save();
        let rotation = shape.rotation();
        if rotation != 0.0 {
            surface.transform(Affine::rotate_about(rotation, bounds.center()));
        }

        let outline = Stroke::new(1.0);
        surface.stroke_path(&bounds.to_path(0.1), OUTLINE_COLOR.into(), &outline);

        if shape.has_corner_handles() {
            let size = (self.handle_size, self.handle_size);
            for corner in Corner::ALL {
                let handle = Rect::from_center_size(corner.point_of(bounds), size);
                let path = handle.to_path(0.1);
                surface.fill_path(&path, Paint::from(SerializableColor::white()));
                surface.stroke_path(&path, OUTLINE_COLOR.into(), &outline);
            }
        }

        surface.restore();
    }

    /// Map a world-space pointer to a handle, the box interior, or a miss.
    pub fn hit_test(&self, shapes: &[Shape], point: Point) -> HandleHit {
        let Some(shape) = self.resolve(shapes) else {
            return HandleHit::Outside;
        };
        let bounds = shape.bounds();
        let local = to_local(point, bounds.center(), shape.rotation());

        if shape.has_corner_handles() {
            let nearest = Corner::ALL
                .iter()
                .map(|&corner| (corner, (corner.point_of(bounds) - local).hypot()))
                .filter(|&(_, dist)| dist < self.handle_size)
                .min_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((corner, _)) = nearest {
                log::trace!("transformer: corner {:?} at {:?}", corner, point);
                return HandleHit::Corner(corner);
            }
        }

        if point_in_rotated_rect(point, bounds, shape.rotation()) {
            HandleHit::Inside
        } else {
            HandleHit::Outside
        }
    }
}
