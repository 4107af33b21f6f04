use crate::shared::region::{PixelPoint, Region};

/// Maps between canvas space (what the pointer reports) and image pixel space.
///
/// `scale` is canvas pixels per image pixel; `offset` is where the image's
/// top-left corner sits on the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Panics if `scale` is not a positive finite number.
    pub fn new(scale: f32, offset_x: f32, offset_y: f32) -> Self {
        assert!(
            scale.is_finite() && scale > 0.0,
            "view scale must be positive and finite, got {scale}"
        );
        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    /// Largest downscale-only transform that fits the image inside `max_width x max_height`.
    pub fn fit(image_width: u32, image_height: u32, max_width: f32, max_height: f32) -> Self {
        if image_width == 0 || image_height == 0 || max_width <= 0.0 || max_height <= 0.0 {
            return Self::identity();
        }
        let scale = (max_width / image_width as f32)
            .min(max_height / image_height as f32)
            .min(1.0);
        Self::new(scale, 0.0, 0.0)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Size of the image once drawn on the canvas.
    pub fn canvas_size(&self, image_width: u32, image_height: u32) -> (f32, f32) {
        (
            image_width as f32 * self.scale,
            image_height as f32 * self.scale,
        )
    }

    /// Canvas point to the image pixel underneath it.
    pub fn to_image(&self, x: f32, y: f32) -> PixelPoint {
        let ix = ((x - self.offset_x) / self.scale).floor();
        let iy = ((y - self.offset_y) / self.scale).floor();
        PixelPoint::new(saturate(ix), saturate(iy))
    }

    /// Like [`to_image`](Self::to_image), but a point on or past the last
    /// canvas pixel of the drawn image maps to the far image edge, so a
    /// drag can end on the final column or row.
    pub fn to_image_snapped(
        &self,
        x: f32,
        y: f32,
        image_width: u32,
        image_height: u32,
    ) -> PixelPoint {
        let (canvas_w, canvas_h) = self.canvas_size(image_width, image_height);
        let p = self.to_image(x, y);
        let px = if x - self.offset_x >= canvas_w - 1.0 {
            p.x.max(saturate(image_width as f32))
        } else {
            p.x
        };
        let py = if y - self.offset_y >= canvas_h - 1.0 {
            p.y.max(saturate(image_height as f32))
        } else {
            p.y
        };
        PixelPoint::new(px, py)
    }

    /// Image region to a canvas rectangle `(x, y, width, height)`.
    pub fn to_canvas(&self, region: &Region) -> (f32, f32, f32, f32) {
        (
            region.x1() as f32 * self.scale + self.offset_x,
            region.y1() as f32 * self.scale + self.offset_y,
            region.width() as f32 * self.scale,
            region.height() as f32 * self.scale,
        )
    }
}

fn saturate(v: f32) -> i32 {
    if v.is_nan() {
        0
    } else {
        v.clamp(i32::MIN as f32, i32::MAX as f32) as i32
    }
}
