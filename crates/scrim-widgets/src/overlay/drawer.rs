#![forbid(unsafe_code)]

//! Edge-anchored slide-in drawer panels.
//!
//! A drawer is pure configuration over [`Overlay`]: the wrapper's flex
//! fields pin the container to one viewport edge, and the transition's
//! resting offset starts the panel one panel-size outside that edge so it
//! slides in. No subclassing, no separate state machine.

use scrim_dom::{Document, Event, NodeId};
use scrim_style::{EdgeOffsets, FlexAlign, FlexDirection, FlexJustify, Length};
use web_time::Instant;

use super::controller::{Overlay, OverlayAction, OverlayConfig, OverlayError, Phase};

/// Which viewport edge the drawer is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrawerEdge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Build the overlay configuration for a drawer on `edge`.
///
/// `size` is the panel's thickness: its height for top/bottom drawers, its
/// width for left/right ones. The other axis spans the full viewport.
#[must_use]
pub fn drawer_config(edge: DrawerEdge, size: Length) -> OverlayConfig {
    let base = OverlayConfig::default()
        .auto_close(true)
        .border_radius(Length::ZERO)
        .margins(Length::ZERO, Length::ZERO);
    let mut config = match edge {
        DrawerEdge::Top | DrawerEdge::Bottom => base.size(Length::FULL, size),
        DrawerEdge::Left | DrawerEdge::Right => base.size(size, Length::FULL),
    };
    config.wrapper_direction = Some(match edge {
        DrawerEdge::Top | DrawerEdge::Bottom => FlexDirection::Column,
        DrawerEdge::Left | DrawerEdge::Right => FlexDirection::Row,
    });
    config.wrapper_justify = Some(match edge {
        DrawerEdge::Top | DrawerEdge::Left => FlexJustify::FlexStart,
        DrawerEdge::Bottom | DrawerEdge::Right => FlexJustify::FlexEnd,
    });
    config.wrapper_align = Some(FlexAlign::Center);

    // Rest one panel-size outside the anchored edge.
    let start = match edge {
        DrawerEdge::Top => EdgeOffsets::top(size.negated()),
        DrawerEdge::Bottom => EdgeOffsets::top(size),
        DrawerEdge::Left => EdgeOffsets::left(size.negated()),
        DrawerEdge::Right => EdgeOffsets::left(size),
    };
    if let Some(transition) = config.transition {
        config.transition = Some(transition.start(start));
    }
    config
}

/// A slide-in panel anchored to a viewport edge.
pub struct Drawer {
    overlay: Overlay,
    edge: DrawerEdge,
}

impl Drawer {
    /// Build a drawer around `content`, anchored to `edge` with the given
    /// panel thickness.
    pub fn new(
        doc: &mut Document,
        content: NodeId,
        edge: DrawerEdge,
        size: Length,
    ) -> Result<Self, OverlayError> {
        let overlay = Overlay::new(doc, content, drawer_config(edge, size))?;
        Ok(Self { overlay, edge })
    }

    pub fn open(&mut self, doc: &mut Document, now: Instant) -> Result<NodeId, OverlayError> {
        self.overlay.open(doc, now)
    }

    pub fn close(&mut self, doc: &mut Document, now: Instant) {
        self.overlay.close(doc, now);
    }

    pub fn tick(&mut self, doc: &mut Document, now: Instant) -> Option<Phase> {
        self.overlay.tick(doc, now)
    }

    pub fn handle_event(
        &mut self,
        doc: &mut Document,
        event: &Event,
        now: Instant,
    ) -> Option<OverlayAction> {
        self.overlay.handle_event(doc, event, now)
    }

    #[must_use]
    pub fn edge(&self) -> DrawerEdge {
        self.edge
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
