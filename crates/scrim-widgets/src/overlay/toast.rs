#![forbid(unsafe_code)]

//! Corner-placed auto-dismissing toast notices.
//!
//! A toast is an [`Overlay`] with a transparent, click-through backdrop:
//! both cover layers get `pointer_events = false` so the page behind stays
//! interactive. Placement picks the wrapper's flex corner and the slide-in
//! direction; a dismiss deadline closes the toast after its timeout.
//!
//! Invariants:
//! - One dismiss deadline at a time. Showing a new toast cancels the old
//!   deadline, so an earlier long timeout can never cut a later toast short.

use scrim_dom::{Deadline, Document, NodeId};
use scrim_style::{
    Display, EdgeOffsets, FlexAlign, FlexDirection, FlexJustify, InlineStyle, Length, Rgba,
};
use tracing::debug;
use web_time::{Duration, Instant};

use super::controller::{Backdrop, Overlay, OverlayConfig, OverlayError, Phase};

/// Default time a toast stays visible.
pub const TOAST_TIMEOUT: Duration = Duration::from_secs(5);

const SLIDE_DISTANCE: Length = Length::Px(50.0);

/// Which viewport corner the toast occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Placement {
    #[default]
    RightTop,
    RightBottom,
    LeftTop,
    LeftBottom,
}

impl Placement {
    /// Horizontal flex distribution for the wrapper.
    #[must_use]
    pub fn justify(self) -> FlexJustify {
        match self {
            Self::RightTop | Self::RightBottom => FlexJustify::FlexEnd,
            Self::LeftTop | Self::LeftBottom => FlexJustify::FlexStart,
        }
    }

    /// Vertical flex alignment for the wrapper.
    #[must_use]
    pub fn align(self) -> FlexAlign {
        match self {
            Self::RightTop | Self::LeftTop => FlexAlign::FlexStart,
            Self::RightBottom | Self::LeftBottom => FlexAlign::FlexEnd,
        }
    }

    /// Resting offsets: the toast slides in horizontally from outside its
    /// corner.
    #[must_use]
    pub fn start_offsets(self) -> EdgeOffsets {
        match self {
            Self::RightTop | Self::RightBottom => EdgeOffsets::left(SLIDE_DISTANCE),
            Self::LeftTop | Self::LeftBottom => EdgeOffsets::left(SLIDE_DISTANCE.negated()),
        }
    }
}

/// Per-show toast options.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastOptions {
    pub placement: Placement,
    /// How long the toast stays before auto-dismissing.
    pub timeout: Duration,
    /// Icon source shown left of the message, if any.
    pub icon: Option<String>,
}

impl Default for ToastOptions {
    fn default() -> Self {
        Self {
            placement: Placement::RightTop,
            timeout: TOAST_TIMEOUT,
            icon: None,
        }
    }
}

impl ToastOptions {
    #[must_use]
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn icon(mut self, src: impl Into<String>) -> Self {
        self.icon = Some(src.into());
        self
    }
}

/// Icon + message pill.
fn toast_template(doc: &mut Document) -> Result<NodeId, OverlayError> {
    let body = doc.create_element("div");
    if let Some(style) = doc.style_mut(body) {
        style.min_width = Some(Length::Px(200.0));
        style.display = Some(Display::Flex);
        style.flex_direction = Some(FlexDirection::Row);
        style.justify_content = Some(FlexJustify::SpaceAround);
        style.align_items = Some(FlexAlign::Center);
        style.padding = Some(Length::Px(10.0));
        style.border_radius = Some(Length::Px(5.0));
    }
    let icon = doc.create_element("img");
    doc.set_attr(icon, "class", "scrim-toast-icon");
    if let Some(style) = doc.style_mut(icon) {
        style.width = Some(Length::Px(25.0));
    }
    doc.append_child(body, icon)?;

    let message = doc.create_element("b");
    doc.set_attr(message, "class", "scrim-toast-msg");
    doc.append_child(body, message)?;
    doc.append_child(doc.root(), body)?;
    Ok(body)
}

fn toast_config() -> OverlayConfig {
    let mut extra = InlineStyle::new();
    extra.margin = Some(Length::Px(25.0));
    extra.color = Some(Rgba::BLACK);
    OverlayConfig::default()
        .close_button(false)
        .backdrop(Backdrop::none())
        .size(Length::Auto, Length::Px(50.0))
        .content_display(Display::Flex)
        .extra(extra)
}

/// An auto-dismissing notification toast.
pub struct Toast {
    overlay: Overlay,
    dismiss: Option<Deadline>,
}

impl Toast {
    pub fn new(doc: &mut Document) -> Result<Self, OverlayError> {
        let template = toast_template(doc)?;
        let overlay = Overlay::new(doc, template, toast_config())?;
        // The page stays interactive behind a toast.
        for layer in [overlay.backdrop_node(), overlay.wrapper()] {
            if let Some(style) = doc.style_mut(layer) {
                style.pointer_events = Some(false);
            }
        }
        Ok(Self {
            overlay,
            dismiss: None,
        })
    }

    /// Show a toast. Replaces any toast currently visible, including its
    /// dismiss deadline.
    pub fn open(
        &mut self,
        doc: &mut Document,
        message: &str,
        options: ToastOptions,
        now: Instant,
    ) -> Result<NodeId, OverlayError> {
        if self.dismiss.take().is_some() {
            debug!("replacing visible toast, old dismiss deadline dropped");
        }
        if let Some(style) = doc.style_mut(self.overlay.wrapper()) {
            style.justify_content = Some(options.placement.justify());
            style.align_items = Some(options.placement.align());
        }
        self.overlay
            .set_transition_start(options.placement.start_offsets());

        let clone = self.overlay.open(doc, now)?;
        if let Some(msg) = doc.descendant_with_attr(clone, "class", "scrim-toast-msg") {
            doc.set_text(msg, message);
        }
        if let Some(icon) = doc.descendant_with_attr(clone, "class", "scrim-toast-icon") {
            match &options.icon {
                Some(src) => doc.set_attr(icon, "src", src),
                None => {
                    if let Some(style) = doc.style_mut(icon) {
                        style.display = Some(Display::None);
                    }
                }
            }
        }
        self.dismiss = Some(Deadline::after(now, options.timeout));
        Ok(clone)
    }

    /// Drive the dismiss deadline and the overlay transition timer.
    pub fn tick(&mut self, doc: &mut Document, now: Instant) -> Option<Phase> {
        if let Some(deadline) = self.dismiss
            && deadline.is_due(now)
        {
            self.dismiss = None;
            self.overlay.close(doc, now);
        }
        self.overlay.tick(doc, now)
    }

    /// Hide the toast before its timeout.
    pub fn close(&mut self, doc: &mut Document, now: Instant) {
        self.dismiss = None;
        self.overlay.close(doc, now);
    }

    /// The earliest instant `tick` has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.dismiss.map(|d| d.at()), self.overlay.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.overlay.is_open()
    }

    #[must_use]
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    #[must_use]
    pub fn overlay_mut(&mut self) -> &mut Overlay {
        &mut self.overlay
    }
}
