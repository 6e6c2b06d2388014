// Pure landmark geometry: distances, joint angles and the cheap "finger up" test.

use crate::types::Landmark;

/// Straight-line distance between two landmarks in normalized 3-D space.
pub fn distance3d(a: Landmark, b: Landmark) -> f32 {
    let (dx, dy, dz) = (a.x - b.x, a.y - b.y, a.z - b.z);
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Angle in degrees at `vertex` between the rays towards `a` and `c`.
/// A zero-length ray gives 0.0 instead of a division by zero.
pub fn angle_at(a: Landmark, vertex: Landmark, c: Landmark) -> f32 {
    let (ax, ay, az) = (a.x - vertex.x, a.y - vertex.y, a.z - vertex.z);
    let (cx, cy, cz) = (c.x - vertex.x, c.y - vertex.y, c.z - vertex.z);

    let dot = ax * cx + ay * cy + az * cz;
    let mag = (ax * ax + ay * ay + az * az).sqrt() * (cx * cx + cy * cy + cz * cz).sqrt();
    if mag == 0.0 {
        return 0.0;
    }

    // Rounding can push the cosine a hair past ±1.
    (dot / mag).clamp(-1.0, 1.0).acos().to_degrees()
}

/// "Up" is a smaller y in image space, so a raised finger has its tip above its PIP joint.
#[inline]
pub fn is_extended(tip: Landmark, pip: Landmark) -> bool {
    tip.y < pip.y
}
