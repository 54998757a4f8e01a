//! Easing curves over a normalized ratio in [0, 1].

/// Decelerating quadratic: fast start, slow finish.
pub fn ease_out_quad(ratio: f64) -> f64 {
    -ratio * (ratio - 2.0)
}

/// Decelerating quartic.
pub fn ease_out_quart(ratio: f64) -> f64 {
    let r = ratio - 1.0;
    -(r * r * r * r - 1.0)
}

pub fn lerp(start: f64, end: f64, ratio: f64) -> f64 {
    start + (end - start) * ratio
}
