use super::types::Point;

/// Angle in degrees at vertex `b` between the rays `b -> a` and `b -> c`.
///
/// Returns 0 when either ray has zero length. The cosine is clamped to
/// [-1, 1] before `acos` so rounding drift cannot produce NaN.
pub fn angle_at(a: Point, b: Point, c: Point) -> f64 {
    let (bax, bay) = (a.x - b.x, a.y - b.y);
    let (bcx, bcy) = (c.x - b.x, c.y - b.y);

    let norm_ba = bax.hypot(bay);
    let norm_bc = bcx.hypot(bcy);
    if norm_ba == 0.0 || norm_bc == 0.0 {
        return 0.0;
    }

    let cosine = ((bax * bcx + bay * bcy) / (norm_ba * norm_bc)).clamp(-1.0, 1.0);
    cosine.acos().to_degrees()
}
