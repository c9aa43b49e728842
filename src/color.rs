//! Color algebra and ANSI color escapes.

use std::ops::{Add, Div, Mul, Sub};

pub const ANSI_RESET: &str = "\x1b[0m";

/// Four-channel color with components in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn dot(self, other: Rgba) -> f64 {
        self.r * other.r + self.g * other.g + self.b * other.b + self.a * other.a
    }

    /// Scale every channel, alpha included, by this color's own alpha.
    pub fn premultiplied(self) -> Self {
        self * self.a
    }

    /// Quantize to 8 bits per channel, truncating toward zero.
    pub fn to_pixel(self) -> Pixel {
        // `as u8` saturates out-of-range and NaN values
        Pixel {
            r: (self.r * 255.0) as u8,
            g: (self.g * 255.0) as u8,
            b: (self.b * 255.0) as u8,
            a: (self.a * 255.0) as u8,
        }
    }
}

impl Add for Rgba {
    type Output = Rgba;

    fn add(self, o: Rgba) -> Rgba {
        Rgba::new(self.r + o.r, self.g + o.g, self.b + o.b, self.a + o.a)
    }
}

impl Sub for Rgba {
    type Output = Rgba;

    fn sub(self, o: Rgba) -> Rgba {
        Rgba::new(self.r - o.r, self.g - o.g, self.b - o.b, self.a - o.a)
    }
}

impl Mul<f64> for Rgba {
    type Output = Rgba;

    fn mul(self, f: f64) -> Rgba {
        Rgba::new(self.r * f, self.g * f, self.b * f, self.a * f)
    }
}

impl Div<f64> for Rgba {
    type Output = Rgba;

    fn div(self, f: f64) -> Rgba {
        Rgba::new(self.r / f, self.g / f, self.b / f, self.a / f)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    /// 24-bit foreground escape, `ESC[38;2;R;G;Bm`.
    pub fn ansi_fg(self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.r, self.g, self.b)
    }

    /// 24-bit background escape, `ESC[48;2;R;G;Bm`.
    pub fn ansi_bg(self) -> String {
        format!("\x1b[48;2;{};{};{}m", self.r, self.g, self.b)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algebra() {
        let a = Rgba::new(0.5, 0.25, 1.0, 0.5);
        let b = Rgba::new(0.5, 0.25, 0.0, 0.5);
        assert_eq!(a + b, Rgba::new(1.0, 0.5, 1.0, 1.0));
        assert_eq!(a - b, Rgba::new(0.0, 0.0, 1.0, 0.0));
        assert_eq!(a * 2.0, Rgba::new(1.0, 0.5, 2.0, 1.0));
        assert_eq!(a / 0.5, Rgba::new(1.0, 0.5, 2.0, 1.0));
        assert_eq!(a.dot(b), 0.25 + 0.0625 + 0.0 + 0.25);
        assert_eq!(a.premultiplied(), Rgba::new(0.25, 0.125, 0.5, 0.25));
    }

    #[test]
    fn pixel_truncates_and_saturates() {
        let p = Rgba::new(1.0, 0.999, -0.3, 2.0).to_pixel();
        assert_eq!(p, Pixel { r: 255, g: 254, b: 0, a: 255 });
    }

    #[test]
    fn escape_forms() {
        let p = Pixel { r: 12, g: 0, b: 255, a: 255 };
        assert_eq!(p.ansi_fg(), "\x1b[38;2;12;0;255m");
        assert_eq!(p.ansi_bg(), "\x1b[48;2;12;0;255m");
        assert_eq!(ANSI_RESET, "\x1b[0m");
    }
}
