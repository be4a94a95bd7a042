#![forbid(unsafe_code)]

//! Style primitives for scrim overlays.
//!
//! This crate provides:
//! - [`Rgba`] packed color with opacity scaling
//! - [`Length`] CSS-like unit (pixels, percentages, auto)
//! - [`EdgeOffsets`] per-edge offsets used for slide-in resting positions
//! - [`InlineStyle`] the inline property bag carried by every element

pub mod color;
pub mod style;

pub use color::Rgba;
pub use style::{
    Display, EdgeOffsets, FlexAlign, FlexDirection, FlexJustify, InlineStyle, Length,
};
