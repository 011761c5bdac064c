//! Page geometry
//!
//! Fitting a part page into a side's content area: the crop box is moved
//! to the origin, scaled uniformly to fit, and centered vertically.

use crate::types::*;
use lopdf::Object;

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from two opposite corners in any order, as PDF box arrays allow
    pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(x1.min(x2), y1.min(y2), (x2 - x1).abs(), (y2 - y1).abs())
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// As a PDF rectangle array
    pub fn to_object(&self) -> Object {
        Object::Array(vec![
            Object::Real(self.x),
            Object::Real(self.y),
            Object::Real(self.right()),
            Object::Real(self.top()),
        ])
    }
}

/// Uniform scale that fits a `width` x `height` page inside the content box.
pub fn fit_scale(width: f32, height: f32, content_width: f32, content_height: f32) -> f32 {
    (content_width / width).min(content_height / height)
}

/// Where a source page ends up on a side page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f32,
    /// Translation applied after scaling
    pub tx: f32,
    pub ty: f32,
    /// Size of the page after scaling
    pub width: f32,
    pub height: f32,
}

impl Placement {
    /// Fit the visible `crop` box into the side's content area.
    ///
    /// The crop box's lower-left corner lands on the origin, then the page
    /// is raised by `(content_height - scaled_height) / 2`.
    pub fn fit(crop: Rect, geometry: &SideGeometry) -> Result<Self> {
        if crop.width <= 0.0 || crop.height <= 0.0 {
            return Err(ImposeError::Config(format!(
                "page has an empty crop box ({} x {})",
                crop.width, crop.height
            )));
        }
        let scale = fit_scale(
            crop.width,
            crop.height,
            geometry.content_width,
            geometry.content_height,
        );
        let (width, height) = (crop.width * scale, crop.height * scale);
        Ok(Self {
            scale,
            tx: -crop.x * scale,
            ty: -crop.y * scale + (geometry.content_height - height) / 2.0,
            width,
            height,
        })
    }

    /// Content stream command drawing `xobject` with this placement
    pub fn draw(&self, xobject: &str) -> String {
        format!(
            "q {} 0 0 {} {} {} cm /{} Do Q\n",
            self.scale, self.scale, self.tx, self.ty, xobject
        )
    }
}
