#![forbid(unsafe_code)]

//! Packed RGBA color with opacity scaling.

/// A packed 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Fully opaque color from RGB channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from RGBA channels.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Scale the alpha channel by `opacity` in `[0.0, 1.0]`.
    ///
    /// Values outside the range are clamped.
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        let a = (f32::from(self.a) * opacity).round() as u8;
        Self { a, ..self }
    }

    /// Whether the color is fully transparent.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.a == 255 {
            write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            let a = f32::from(self.a) / 255.0;
            write!(f, "rgba({}, {}, {}, {a:.3})", self.r, self.g, self.b)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_opacity_scales_alpha() {
        let c = Rgba::BLACK.with_opacity(0.5);
        assert_eq!(c.a, 128);
        assert_eq!((c.r, c.g, c.b), (0, 0, 0));
    }

    #[test]
    fn with_opacity_clamps() {
        assert_eq!(Rgba::WHITE.with_opacity(2.0).a, 255);
        assert_eq!(Rgba::WHITE.with_opacity(-1.0).a, 0);
    }

    #[test]
    fn transparent_is_transparent() {
        assert!(Rgba::TRANSPARENT.is_transparent());
        assert!(!Rgba::BLACK.is_transparent());
        assert!(Rgba::BLACK.with_opacity(0.0).is_transparent());
    }

    #[test]
    fn display_formats() {
        assert_eq!(Rgba::rgb(255, 0, 0).to_string(), "rgb(255, 0, 0)");
        assert_eq!(
            Rgba::rgba(0, 0, 0, 128).to_string(),
            "rgba(0, 0, 0, 0.502)"
        );
    }
}
