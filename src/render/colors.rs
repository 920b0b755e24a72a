/// Linear RGB triple with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        [channel8(self.r), channel8(self.g), channel8(self.b)]
    }
}

fn channel8(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Hue used for a given size ratio: `(ratio * 0.8 + 0.7) mod 1`.
pub fn size_hue(ratio: f64) -> f64 {
    (ratio * 0.8 + 0.7).rem_euclid(1.0)
}

/// Fully saturated, full-value color for a size ratio.
pub fn size_to_color(ratio: f64) -> Rgb {
    hsv_to_rgb(size_hue(ratio), 1.0, 1.0)
}

/// Sextant HSV → RGB conversion. `h`, `s` and `v` are in `0.0..=1.0`.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    if s == 0.0 {
        return Rgb::new(v, v, v);
    }
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match (i as i64).rem_euclid(6) {
        0 => Rgb::new(v, t, p),
        1 => Rgb::new(q, v, p),
        2 => Rgb::new(p, v, t),
        3 => Rgb::new(p, q, v),
        4 => Rgb::new(t, p, v),
        _ => Rgb::new(v, p, q),
    }
}
