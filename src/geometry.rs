use crate::detector::BoundingBox;

/// Padding factor applied to the larger side of a detection box.
pub const EXPANSION_FACTOR: f64 = 1.8;

/// Pixel region to extract from the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Side length of the square crop for a detection box.
pub fn crop_size(face: &BoundingBox) -> i64 {
    (f64::from(face.width.max(face.height)) * EXPANSION_FACTOR).round() as i64
}

/// Expand `face` into a square around its centre and clamp it to the image.
///
/// Each edge is clamped independently, so regions touching the border may
/// come out rectangular. Returns `None` when nothing of the region remains
/// inside `[0, width) x [0, height)`.
pub fn crop_region(face: &BoundingBox, image_width: u32, image_height: u32) -> Option<CropRegion> {
    let size = crop_size(face);
    let cx = f64::from(face.x) + f64::from(face.width) / 2.0;
    let cy = f64::from(face.y) + f64::from(face.height) / 2.0;

    let x1 = (cx - size as f64 / 2.0).floor() as i64;
    let y1 = (cy - size as f64 / 2.0).floor() as i64;
    let x2 = x1 + size;
    let y2 = y1 + size;

    let (w, h) = (i64::from(image_width), i64::from(image_height));
    let x1 = x1.clamp(0, w);
    let y1 = y1.clamp(0, h);
    let x2 = x2.clamp(0, w);
    let y2 = y2.clamp(0, h);

    if x2 <= x1 || y2 <= y1 {
        return None;
    }

    Some(CropRegion {
        x: x1 as u32,
        y: y1 as u32,
        width: (x2 - x1) as u32,
        height: (y2 - y1) as u32,
    })
}
