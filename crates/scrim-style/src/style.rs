#![forbid(unsafe_code)]

//! Inline style model: lengths, per-edge offsets, and the property bag
//! applied to elements.
//!
//! There is deliberately no cascade and no stylesheet: overlays set inline
//! properties directly, and a later [`InlineStyle::merge`] wins per field.

use ahash::AHashMap;

use crate::color::Rgba;

/// A CSS-like length unit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Length {
    /// Absolute pixels.
    Px(f32),
    /// Percentage of the containing layer.
    Percent(f32),
    /// Let the host layout decide.
    Auto,
}

impl Length {
    pub const ZERO: Self = Self::Px(0.0);
    pub const FULL: Self = Self::Percent(100.0);

    /// Negate the magnitude. `Auto` is unchanged.
    ///
    /// Used for drawer resting offsets: a top drawer rests at `-height`.
    #[must_use]
    pub fn negated(self) -> Self {
        match self {
            Self::Px(v) => Self::Px(-v),
            Self::Percent(v) => Self::Percent(-v),
            Self::Auto => Self::Auto,
        }
    }
}

impl std::fmt::Display for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Percent(v) => write!(f, "{v}%"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

/// Per-edge offsets for a layer's resting position.
///
/// `None` leaves the edge untouched; the open position zeroes all four.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeOffsets {
    pub top: Option<Length>,
    pub right: Option<Length>,
    pub bottom: Option<Length>,
    pub left: Option<Length>,
}

impl EdgeOffsets {
    pub const NONE: Self = Self {
        top: None,
        right: None,
        bottom: None,
        left: None,
    };

    /// Offset only the top edge.
    #[must_use]
    pub const fn top(value: Length) -> Self {
        Self {
            top: Some(value),
            ..Self::NONE
        }
    }

    /// Offset only the left edge.
    #[must_use]
    pub const fn left(value: Length) -> Self {
        Self {
            left: Some(value),
            ..Self::NONE
        }
    }

    /// Offset top and left (toast slide-in).
    #[must_use]
    pub const fn top_left(top: Length, left: Length) -> Self {
        Self {
            top: Some(top),
            left: Some(left),
            ..Self::NONE
        }
    }

    /// Whether no edge is offset.
    #[must_use]
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// All four edges zeroed (the open position).
    #[must_use]
    pub const fn zeroed() -> Self {
        Self {
            top: Some(Length::ZERO),
            right: Some(Length::ZERO),
            bottom: Some(Length::ZERO),
            left: Some(Length::ZERO),
        }
    }
}

/// Display mode of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Display {
    #[default]
    Block,
    Flex,
    None,
}

/// Main axis of a flex layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

/// Main-axis distribution of a flex layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlexJustify {
    #[default]
    Center,
    FlexStart,
    FlexEnd,
    SpaceAround,
}

/// Cross-axis alignment of a flex layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlexAlign {
    #[default]
    Center,
    FlexStart,
    FlexEnd,
}

/// The inline property bag carried by every element.
///
/// Every field is optional; unset fields are left to the host's defaults.
/// Properties this model does not make first-class (box shadows, cursor,
/// font settings) go through [`InlineStyle::set_extra`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InlineStyle {
    pub opacity: Option<f32>,
    pub offsets: EdgeOffsets,
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub min_width: Option<Length>,
    pub background: Option<Rgba>,
    pub color: Option<Rgba>,
    pub border_radius: Option<Length>,
    pub margin: Option<Length>,
    pub margin_left: Option<Length>,
    pub margin_right: Option<Length>,
    pub padding: Option<Length>,
    pub display: Option<Display>,
    pub flex_direction: Option<FlexDirection>,
    pub justify_content: Option<FlexJustify>,
    pub align_items: Option<FlexAlign>,
    /// `false` lets pointer events pass through the element (toast layers).
    pub pointer_events: Option<bool>,
    pub z_index: Option<i32>,
    /// Escape hatch for arbitrary property overrides, keyed by property name.
    pub extras: AHashMap<String, String>,
}

impl InlineStyle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a free-form property override.
    pub fn set_extra(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.extras.insert(property.into(), value.into());
    }

    /// Apply `other` on top of `self`; set fields in `other` win.
    ///
    /// Mirrors layered config assignment: variant defaults first, then
    /// caller overrides.
    pub fn merge(&mut self, other: &InlineStyle) {
        macro_rules! take {
            ($($field:ident),+ $(,)?) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field;
                })+
            };
        }
        take!(
            opacity,
            width,
            height,
            min_width,
            background,
            color,
            border_radius,
            margin,
            margin_left,
            margin_right,
            padding,
            display,
            flex_direction,
            justify_content,
            align_items,
            pointer_events,
            z_index,
        );
        if !other.offsets.is_none() {
            self.offsets = other.offsets;
        }
        for (k, v) in &other.extras {
            self.extras.insert(k.clone(), v.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_display() {
        assert_eq!(Length::Px(600.0).to_string(), "600px");
        assert_eq!(Length::Percent(10.0).to_string(), "10%");
        assert_eq!(Length::Auto.to_string(), "auto");
    }

    #[test]
    fn length_negated() {
        assert_eq!(Length::Px(50.0).negated(), Length::Px(-50.0));
        assert_eq!(Length::Percent(100.0).negated(), Length::Percent(-100.0));
        assert_eq!(Length::Auto.negated(), Length::Auto);
    }

    #[test]
    fn edge_offsets_builders() {
        let o = EdgeOffsets::top(Length::Percent(10.0));
        assert_eq!(o.top, Some(Length::Percent(10.0)));
        assert_eq!(o.left, None);
        assert!(!o.is_none());
        assert!(EdgeOffsets::NONE.is_none());
    }

    #[test]
    fn zeroed_offsets_touch_all_edges() {
        let z = EdgeOffsets::zeroed();
        for edge in [z.top, z.right, z.bottom, z.left] {
            assert_eq!(edge, Some(Length::ZERO));
        }
    }

    #[test]
    fn merge_later_wins() {
        let mut base = InlineStyle {
            opacity: Some(0.5),
            width: Some(Length::Px(100.0)),
            ..Default::default()
        };
        let over = InlineStyle {
            opacity: Some(1.0),
            height: Some(Length::Px(40.0)),
            ..Default::default()
        };
        base.merge(&over);
        assert_eq!(base.opacity, Some(1.0));
        assert_eq!(base.width, Some(Length::Px(100.0)));
        assert_eq!(base.height, Some(Length::Px(40.0)));
    }

    #[test]
    fn merge_keeps_unset_offsets() {
        let mut base = InlineStyle {
            offsets: EdgeOffsets::top(Length::Px(10.0)),
            ..Default::default()
        };
        base.merge(&InlineStyle::default());
        assert_eq!(base.offsets.top, Some(Length::Px(10.0)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn inline_style_round_trips_through_json() {
        let mut style = InlineStyle {
            opacity: Some(0.5),
            width: Some(Length::Px(600.0)),
            offsets: EdgeOffsets::top(Length::Percent(10.0)),
            ..Default::default()
        };
        style.set_extra("position", "fixed");
        let json = serde_json::to_string(&style).unwrap();
        let back: InlineStyle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, style);
    }

    #[test]
    fn merge_extras() {
        let mut base = InlineStyle::default();
        base.set_extra("box-shadow", "0 4px 8px 0 rgba(0,0,0,0.4)");
        let mut over = InlineStyle::default();
        over.set_extra("box-shadow", "none");
        over.set_extra("cursor", "pointer");
        base.merge(&over);
        assert_eq!(base.extras.get("box-shadow").map(String::as_str), Some("none"));
        assert_eq!(base.extras.get("cursor").map(String::as_str), Some("pointer"));
    }
}
