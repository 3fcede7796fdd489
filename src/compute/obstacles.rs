//! Rasterising solid shapes into obstacle faces.
//!
//! Stamps only set cells to 1.0; clear the face first to replace a shape.

/// Wing profile used by the wind-tunnel demo, on a 400-cell tunnel.
pub const WING_CENTER: (f32, f32) = (150.0, 200.0);
pub const WING_SEMI_AXES: (f32, f32) = (100.0, 16.0);

/// Fill a rotated ellipse centred at `(cx, cy)`.
///
/// `angle_deg` rotates the major axis counter-clockwise in cell space.
pub fn stamp_ellipse(
    face: &mut [f32],
    size: usize,
    cx: f32,
    cy: f32,
    semi_major: f32,
    semi_minor: f32,
    angle_deg: f32,
) {
    if semi_major <= 0.0 || semi_minor <= 0.0 {
        return;
    }
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let (a2, b2) = (semi_major * semi_major, semi_minor * semi_minor);

    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            // Into the ellipse frame.
            let u = dx * cos + dy * sin;
            let v = -dx * sin + dy * cos;
            if u * u / a2 + v * v / b2 <= 1.0 {
                face[y * size + x] = 1.0;
            }
        }
    }
}

/// Fill a disk: cells with `dx^2 + dy^2 < radius^2`.
pub fn stamp_disk(face: &mut [f32], size: usize, cx: f32, cy: f32, radius: f32) {
    let r2 = radius * radius;
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy < r2 {
                face[y * size + x] = 1.0;
            }
        }
    }
}

/// Wind-tunnel wing at angle of attack `angle_deg`, scaled to the tunnel size.
pub fn stamp_wing(face: &mut [f32], size: usize, angle_deg: f32) {
    let scale = size as f32 / 400.0;
    stamp_ellipse(
        face,
        size,
        WING_CENTER.0 * scale,
        WING_CENTER.1 * scale,
        WING_SEMI_AXES.0 * scale,
        WING_SEMI_AXES.1 * scale,
        -angle_deg,
    );
}
