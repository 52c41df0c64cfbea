use crate::foundation::core::Rgba8;

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Linearly map `v` from `[s1, e1]` onto `[s2, e2]`. Not clamped.
pub fn map_range(v: f64, s1: f64, e1: f64, s2: f64, e2: f64) -> f64 {
    let span = e1 - s1;
    if span == 0.0 {
        return s2;
    }
    s2 + (v - s1) * (e2 - s2) / span
}

pub fn clamp(v: f64, min: f64, max: f64) -> f64 {
    v.max(min).min(max)
}

/// Channel-wise blend of two colors; alpha is blended too.
pub fn lerp_color(a: Rgba8, b: Rgba8, t: f64) -> Rgba8 {
    fn ch(a: u8, b: u8, t: f64) -> u8 {
        let a = f64::from(a);
        let b = f64::from(b);
        (a + (b - a) * t).clamp(0.0, 255.0) as u8
    }

    let t = t.clamp(0.0, 1.0);
    Rgba8 {
        r: ch(a.r, b.r, t),
        g: ch(a.g, b.g, t),
        b: ch(a.b, b.b, t),
        a: ch(a.a, b.a, t),
    }
}

/// Fold a `0..2` ramp into a `0..1..0` triangle.
pub fn pulse(v: f64) -> f64 {
    if v > 1.0 { 2.0 - v } else { v }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
