#![forbid(unsafe_code)]

//! The overlay controller: three stacked layers, open/close lifecycle, and
//! the transition timer state machine.
//!
//! Layer structure (bottom to top): a full-viewport dimming **backdrop**, a
//! full-viewport transparent **wrapper** that positions and transitions the
//! dialog, and the visible **container** holding the cloned content plus the
//! optional close button. Backdrop and wrapper are siblings under the
//! document root; the container is a child of the wrapper.
//!
//! Invariants:
//! - At most one attached content clone per overlay at a time; opening again
//!   replaces the previous clone.
//! - At most one pending timer; `open` and `close` both cancel it before
//!   scheduling, so a rapid re-open can never be torn down by a stale
//!   close timer.
//! - The template subtree is never attached directly; every clone-path open
//!   deep-copies it.
//!
//! Failure modes:
//! - A missing configured size yields a zero-size container. That is a
//!   visual defect, not an error.
//! - Stale node ids are reported as [`OverlayError`]; nothing panics.

use scrim_dom::{
    Deadline, Document, DomError, Event, KeyCode, KeyEvent, KeyEventKind, NodeId, PointerButton,
    PointerEvent, PointerEventKind,
};
use scrim_style::{
    Display, EdgeOffsets, FlexAlign, FlexDirection, FlexJustify, InlineStyle, Length, Rgba,
};
use tracing::{debug, trace};
use web_time::{Duration, Instant};

/// Delay between attaching the layers in their resting state and applying
/// the open state. Gives the host one frame to register the initial
/// position before animating; the two-phase ordering is a correctness
/// requirement, not cosmetics.
pub const REFLOW_DELAY: Duration = Duration::from_millis(100);

/// Delay between applying the resting state on close and detaching the
/// layers. Must cover the longest configured transition.
pub const EXIT_DELAY: Duration = Duration::from_millis(200);

/// Errors from overlay construction and open operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayError {
    /// No live content element was supplied at construction.
    MissingContent,
    /// An underlying tree operation failed (stale id, cycle).
    Dom(DomError),
}

impl std::fmt::Display for OverlayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingContent => {
                write!(f, "overlay construction requires a live content element")
            }
            Self::Dom(e) => write!(f, "document error: {e}"),
        }
    }
}

impl std::error::Error for OverlayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MissingContent => None,
            Self::Dom(e) => Some(e),
        }
    }
}

impl From<DomError> for OverlayError {
    fn from(e: DomError) -> Self {
        Self::Dom(e)
    }
}

/// Backdrop appearance (color + open-state opacity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backdrop {
    pub color: Rgba,
    /// Opacity the backdrop fades up to while open, in `[0.0, 1.0]`.
    pub opacity: f32,
}

impl Backdrop {
    /// A fully transparent backdrop (`noFade`): the page stays visible and
    /// undimmed behind the overlay.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            color: Rgba::TRANSPARENT,
            opacity: 0.0,
        }
    }

    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

impl Default for Backdrop {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            opacity: 0.5,
        }
    }
}

/// Enter/exit transition parameters.
///
/// `start` is the wrapper's resting position; the open position zeroes all
/// edges. The default is a fade plus a slight downward slide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub start: EdgeOffsets,
    /// Delay before the open state is applied after attach.
    pub enter_delay: Duration,
    /// Delay before the layers are detached after close.
    pub exit_delay: Duration,
}

impl Transition {
    #[must_use]
    pub fn start(mut self, start: EdgeOffsets) -> Self {
        self.start = start;
        self
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            start: EdgeOffsets::top(Length::Percent(10.0)),
            enter_delay: REFLOW_DELAY,
            exit_delay: EXIT_DELAY,
        }
    }
}

/// Overlay configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    /// Close on Escape press and on pointer-down on the wrapper layer.
    pub auto_close: bool,
    /// Render the small top-right close control.
    pub close_button: bool,
    pub backdrop: Backdrop,
    /// `None` disables the transition entirely: open and close take effect
    /// immediately.
    pub transition: Option<Transition>,
    /// Container width. Leaving it unset produces a zero-size container.
    pub width: Option<Length>,
    /// Container height. Leaving it unset produces a zero-size container.
    pub height: Option<Length>,
    pub border_radius: Length,
    pub container_color: Rgba,
    pub margin_left: Length,
    pub margin_right: Length,
    /// Display style applied to the content template.
    pub content_display: Display,
    /// Wrapper flex direction override (drawers use `Column`).
    pub wrapper_direction: Option<FlexDirection>,
    /// Wrapper main-axis distribution override.
    pub wrapper_justify: Option<FlexJustify>,
    /// Wrapper cross-axis alignment override.
    pub wrapper_align: Option<FlexAlign>,
    /// Arbitrary extra style overrides merged onto the container.
    pub extra: InlineStyle,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            auto_close: false,
            close_button: true,
            backdrop: Backdrop::default(),
            transition: Some(Transition::default()),
            width: None,
            height: None,
            border_radius: Length::Px(4.0),
            container_color: Rgba::WHITE,
            margin_left: Length::Px(20.0),
            margin_right: Length::Px(20.0),
            content_display: Display::Block,
            wrapper_direction: None,
            wrapper_justify: None,
            wrapper_align: None,
            extra: InlineStyle::new(),
        }
    }
}

impl OverlayConfig {
    #[must_use]
    pub fn auto_close(mut self, auto_close: bool) -> Self {
        self.auto_close = auto_close;
        self
    }

    #[must_use]
    pub fn close_button(mut self, close_button: bool) -> Self {
        self.close_button = close_button;
        self
    }

    #[must_use]
    pub fn backdrop(mut self, backdrop: Backdrop) -> Self {
        self.backdrop = backdrop;
        self
    }

    #[must_use]
    pub fn transition(mut self, transition: Transition) -> Self {
        self.transition = Some(transition);
        self
    }

    #[must_use]
    pub fn no_transition(mut self) -> Self {
        self.transition = None;
        self
    }

    #[must_use]
    pub fn size(mut self, width: Length, height: Length) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn border_radius(mut self, radius: Length) -> Self {
        self.border_radius = radius;
        self
    }

    #[must_use]
    pub fn container_color(mut self, color: Rgba) -> Self {
        self.container_color = color;
        self
    }

    #[must_use]
    pub fn margins(mut self, left: Length, right: Length) -> Self {
        self.margin_left = left;
        self.margin_right = right;
        self
    }

    #[must_use]
    pub fn content_display(mut self, display: Display) -> Self {
        self.content_display = display;
        self
    }

    #[must_use]
    pub fn extra(mut self, extra: InlineStyle) -> Self {
        self.extra = extra;
        self
    }
}

/// Lifecycle phase of an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    /// Attached in the resting state, waiting out the enter delay.
    Opening,
    Open,
    /// Back in the resting state, waiting out the exit delay before detach.
    Closing,
}

/// What caused an auto-dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    EscapePressed,
    /// Pointer-down landed exactly on the wrapper layer (not a descendant).
    BackdropPressed,
    CloseButtonPressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    FinishOpen,
    FinishClose,
}

/// Hook invoked with the live content clone just before attach.
pub type BeforeOpenHook = Box<dyn FnMut(&mut Document, NodeId)>;
/// Hook invoked after the layers are detached.
pub type AfterCloseHook = Box<dyn FnMut()>;

/// The overlay controller.
///
/// Long-lived: construct once, reuse across opens. The content element
/// handed to [`Overlay::new`] is detached from the document and kept as an
/// immutable template.
pub struct Overlay {
    config: OverlayConfig,
    backdrop: NodeId,
    wrapper: NodeId,
    container: NodeId,
    template: NodeId,
    phase: Phase,
    pending: Option<(Deadline, PendingKind)>,
    active: Option<NodeId>,
    close_button: Option<NodeId>,
    before_open: Option<BeforeOpenHook>,
    after_close: Option<AfterCloseHook>,
}

impl std::fmt::Debug for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Overlay")
            .field("phase", &self.phase)
            .field("pending", &self.pending)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Overlay {
    /// Build an overlay around a content template.
    ///
    /// `content` is detached from the document and never re-attached
    /// directly; every clone-path [`Overlay::open`] copies it.
    pub fn new(
        doc: &mut Document,
        content: NodeId,
        config: OverlayConfig,
    ) -> Result<Self, OverlayError> {
        if !doc.contains(content) {
            return Err(OverlayError::MissingContent);
        }
        doc.detach(content)?;
        if let Some(style) = doc.style_mut(content) {
            style.display = Some(config.content_display);
        }

        let backdrop = make_cover(doc);
        if let Some(style) = doc.style_mut(backdrop) {
            style.background = Some(config.backdrop.color);
        }

        let wrapper = make_cover(doc);
        if let Some(style) = doc.style_mut(wrapper) {
            style.background = Some(Rgba::TRANSPARENT);
            if config.wrapper_direction.is_some() {
                style.flex_direction = config.wrapper_direction;
            }
            if config.wrapper_justify.is_some() {
                style.justify_content = config.wrapper_justify;
            }
            if config.wrapper_align.is_some() {
                style.align_items = config.wrapper_align;
            }
        }

        let container = make_cover(doc);
        if let Some(style) = doc.style_mut(container) {
            style.width = config.width;
            style.height = config.height;
            style.offsets = EdgeOffsets::NONE;
            style.border_radius = Some(config.border_radius);
            style.background = Some(config.container_color);
            style.color = Some(Rgba::rgb(13, 13, 13));
            style.margin_left = Some(config.margin_left);
            style.margin_right = Some(config.margin_right);
            style.set_extra("position", "relative");
            style.set_extra("box-shadow", "0 4px 8px 0 rgba(0,0,0,0.4)");
            let extra = config.extra.clone();
            style.merge(&extra);
        }
        doc.append_child(wrapper, container)?;

        let mut overlay = Self {
            config,
            backdrop,
            wrapper,
            container,
            template: content,
            phase: Phase::Closed,
            pending: None,
            active: None,
            close_button: None,
            before_open: None,
            after_close: None,
        };
        overlay.apply_resting(doc);
        Ok(overlay)
    }

    /// Set the hook run with each fresh clone before attach. Usually used
    /// to wire content-specific state onto the clone.
    pub fn on_before_open(&mut self, hook: BeforeOpenHook) {
        self.before_open = Some(hook);
    }

    /// Set the hook run after the layers detach on close.
    pub fn on_after_close(&mut self, hook: AfterCloseHook) {
        self.after_close = Some(hook);
    }

    /// Open with a fresh deep clone of the template.
    ///
    /// Returns the attached clone so the caller can query and bind to it.
    pub fn open(&mut self, doc: &mut Document, now: Instant) -> Result<NodeId, OverlayError> {
        let clone = doc.clone_subtree(self.template)?;
        self.open_with(doc, clone, now)
    }

    /// Open with a caller-supplied node, bypassing template cloning.
    ///
    /// The node keeps its state across opens (a confirm dialog mutating a
    /// button label mid-flow, for example). Re-opening with the node that
    /// is already active is allowed.
    pub fn open_with(
        &mut self,
        doc: &mut Document,
        content: NodeId,
        now: Instant,
    ) -> Result<NodeId, OverlayError> {
        if !doc.contains(content) {
            return Err(OverlayError::Dom(DomError::StaleNode));
        }
        // A pending close timer must not tear down the overlay we are about
        // to show.
        self.cancel_pending();

        if let Some(hook) = self.before_open.as_mut() {
            hook(doc, content);
        }

        // Detach the incoming node first so clearing the container cannot
        // free it when it is the currently active content.
        doc.detach(content)?;
        doc.clear_children(self.container);
        self.close_button = None;
        if self.config.close_button {
            let btn = make_close_button(doc);
            doc.append_child(self.container, btn)?;
            self.close_button = Some(btn);
        }
        doc.append_child(self.container, content)?;

        doc.append_child(doc.root(), self.backdrop)?;
        doc.append_child(doc.root(), self.wrapper)?;
        self.active = Some(content);

        match self.config.transition {
            Some(transition) => {
                self.apply_resting(doc);
                self.pending = Some((
                    Deadline::after(now, transition.enter_delay),
                    PendingKind::FinishOpen,
                ));
                self.phase = Phase::Opening;
            }
            None => {
                self.apply_open(doc);
                self.phase = Phase::Open;
            }
        }
        debug!(content = content.index(), phase = ?self.phase, "overlay opened");
        Ok(content)
    }

    /// Close the overlay.
    ///
    /// With a transition, the resting state is applied immediately and the
    /// layers detach once the exit delay elapses; without one, detach and
    /// the after-close hook run synchronously. Closing while already closing
    /// reschedules the single pending timer, so there are never two
    /// competing detaches. Closing a closed overlay is a no-op.
    pub fn close(&mut self, doc: &mut Document, now: Instant) {
        if self.phase == Phase::Closed {
            return;
        }
        self.cancel_pending();
        match self.config.transition {
            Some(transition) => {
                self.apply_resting(doc);
                self.phase = Phase::Closing;
                self.pending = Some((
                    Deadline::after(now, transition.exit_delay),
                    PendingKind::FinishClose,
                ));
                debug!("overlay closing");
            }
            None => self.finish_close(doc),
        }
    }

    /// Drive the pending timer. Hosts call this from their event loop.
    ///
    /// Returns the new phase when a timer fired.
    pub fn tick(&mut self, doc: &mut Document, now: Instant) -> Option<Phase> {
        let (deadline, kind) = self.pending?;
        if !deadline.is_due(now) {
            return None;
        }
        self.pending = None;
        match kind {
            PendingKind::FinishOpen => {
                self.apply_open(doc);
                self.phase = Phase::Open;
                trace!("overlay transition finished");
            }
            PendingKind::FinishClose => self.finish_close(doc),
        }
        Some(self.phase)
    }

    /// Route an input event to this overlay.
    ///
    /// Dismissal rules (only while opening or open):
    /// - Escape press closes when `auto_close` is set.
    /// - Pointer-down whose target **is** the wrapper layer closes when
    ///   `auto_close` is set. Descendant targets never dismiss: this is a
    ///   target-identity check, not containment.
    /// - Pointer-down on the close button always closes.
    pub fn handle_event(
        &mut self,
        doc: &mut Document,
        event: &Event,
        now: Instant,
    ) -> Option<OverlayAction> {
        if !matches!(self.phase, Phase::Opening | Phase::Open) {
            return None;
        }
        match event {
            Event::Key(KeyEvent {
                code: KeyCode::Escape,
                kind: KeyEventKind::Press,
            }) if self.config.auto_close => {
                self.close(doc, now);
                Some(OverlayAction::EscapePressed)
            }
            Event::Pointer(PointerEvent {
                kind: PointerEventKind::Down,
                button: PointerButton::Primary,
                target,
            }) => {
                if Some(*target) == self.close_button {
                    self.close(doc, now);
                    Some(OverlayAction::CloseButtonPressed)
                } else if self.config.auto_close && *target == self.wrapper {
                    self.close(doc, now);
                    Some(OverlayAction::BackdropPressed)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn cancel_pending(&mut self) {
        if let Some((_, kind)) = self.pending.take() {
            debug!(?kind, "cancelled pending overlay timer");
        }
    }

    fn finish_close(&mut self, doc: &mut Document) {
        let _ = doc.detach(self.backdrop);
        let _ = doc.detach(self.wrapper);
        self.phase = Phase::Closed;
        debug!("overlay closed");
        if let Some(hook) = self.after_close.as_mut() {
            hook();
        }
    }

    /// Resting visual state: both layers transparent, wrapper at its
    /// configured start offsets.
    fn apply_resting(&self, doc: &mut Document) {
        if let Some(style) = doc.style_mut(self.backdrop) {
            style.opacity = Some(0.0);
        }
        let start = self
            .config
            .transition
            .map(|t| t.start)
            .unwrap_or(EdgeOffsets::NONE);
        if let Some(style) = doc.style_mut(self.wrapper) {
            style.opacity = Some(0.0);
            style.offsets = resting_offsets(start);
        }
    }

    /// Open visual state: backdrop at its configured opacity, wrapper fully
    /// visible with all edges zeroed.
    fn apply_open(&self, doc: &mut Document) {
        if let Some(style) = doc.style_mut(self.backdrop) {
            style.opacity = Some(self.config.backdrop.opacity);
        }
        if let Some(style) = doc.style_mut(self.wrapper) {
            style.opacity = Some(1.0);
            style.offsets = EdgeOffsets::zeroed();
        }
    }

    /// Replace the transition's resting offsets (toast placement changes
    /// them per open).
    pub fn set_transition_start(&mut self, start: EdgeOffsets) {
        if let Some(transition) = self.config.transition.as_mut() {
            transition.start = start;
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the overlay is attached (opening or fully open).
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.phase, Phase::Opening | Phase::Open)
    }

    /// When the pending timer fires, if one is scheduled. Lets hosts pick
    /// their next wake-up.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|(deadline, _)| deadline.at())
    }

    /// The detached content template.
    #[must_use]
    pub fn template(&self) -> NodeId {
        self.template
    }

    /// The currently (or most recently) displayed content node.
    #[must_use]
    pub fn active_content(&self) -> Option<NodeId> {
        self.active
    }

    /// The backdrop layer node.
    #[must_use]
    pub fn backdrop_node(&self) -> NodeId {
        self.backdrop
    }

    /// The wrapper layer node.
    #[must_use]
    pub fn wrapper(&self) -> NodeId {
        self.wrapper
    }

    /// The container node.
    #[must_use]
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// The close button of the current open cycle, if rendered.
    #[must_use]
    pub fn close_button(&self) -> Option<NodeId> {
        self.close_button
    }

    /// The overlay configuration.
    #[must_use]
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }
}

/// A full-viewport fixed cover layer, flex-centered.
fn make_cover(doc: &mut Document) -> NodeId {
    let cover = doc.create_element("div");
    if let Some(style) = doc.style_mut(cover) {
        style.width = Some(Length::FULL);
        style.height = Some(Length::FULL);
        style.offsets = EdgeOffsets::zeroed();
        style.z_index = Some(100);
        style.display = Some(Display::Flex);
        style.justify_content = Some(FlexJustify::Center);
        style.align_items = Some(FlexAlign::Center);
        style.set_extra("position", "fixed");
        style.set_extra("overflow", "hidden");
    }
    cover
}

/// The small circular close control rendered top-right of the container.
fn make_close_button(doc: &mut Document) -> NodeId {
    let btn = doc.create_element("span");
    doc.set_text(btn, "\u{d7}");
    doc.set_attr(btn, "class", "scrim-close");
    if let Some(style) = doc.style_mut(btn) {
        style.offsets = EdgeOffsets {
            top: Some(Length::Px(15.0)),
            right: Some(Length::Px(25.0)),
            ..EdgeOffsets::NONE
        };
        style.width = Some(Length::Px(40.0));
        style.height = Some(Length::Px(40.0));
        style.border_radius = Some(Length::Px(20.0));
        style.background = Some(Rgba::rgb(227, 227, 227));
        style.opacity = Some(0.8);
        style.z_index = Some(110);
        style.display = Some(Display::Flex);
        style.justify_content = Some(FlexJustify::Center);
        style.align_items = Some(FlexAlign::Center);
        style.set_extra("position", "absolute");
        style.set_extra("cursor", "pointer");
        style.set_extra("font-size", "20px");
        style.set_extra("font-weight", "1000");
    }
    btn
}

/// Start offsets layered over a zeroed base: edges the transition does not
/// move stay at zero.
fn resting_offsets(start: EdgeOffsets) -> EdgeOffsets {
    let mut offsets = EdgeOffsets::zeroed();
    if start.top.is_some() {
        offsets.top = start.top;
    }
    if start.right.is_some() {
        offsets.right = start.right;
    }
    if start.bottom.is_some() {
        offsets.bottom = start.bottom;
    }
    if start.left.is_some() {
        offsets.left = start.left;
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn template(doc: &mut Document) -> NodeId {
        let form = doc.create_element("div");
        let input = doc.create_element("input");
        doc.set_attr(input, "class", "field");
        doc.append_child(form, input).unwrap();
        doc.append_child(doc.root(), form).unwrap();
        form
    }

    fn overlay_with(doc: &mut Document, config: OverlayConfig) -> Overlay {
        let content = template(doc);
        Overlay::new(doc, content, config).unwrap()
    }

    #[test]
    fn construction_detaches_template() {
        let mut doc = Document::new();
        let content = template(&mut doc);
        let overlay = Overlay::new(&mut doc, content, OverlayConfig::default()).unwrap();
        assert!(!doc.is_attached(overlay.template()));
        assert!(doc.contains(overlay.template()));
        assert_eq!(overlay.phase(), Phase::Closed);
    }

    #[test]
    fn construction_rejects_stale_content() {
        let mut doc = Document::new();
        let content = doc.create_element("div");
        doc.append_child(doc.root(), content).unwrap();
        doc.remove_subtree(content).unwrap();
        let result = Overlay::new(&mut doc, content, OverlayConfig::default());
        assert_eq!(result.err(), Some(OverlayError::MissingContent));
    }

    #[test]
    fn two_phase_reflow_is_observable_and_ordered() {
        let mut doc = Document::new();
        let mut overlay = overlay_with(&mut doc, OverlayConfig::default().auto_close(true));
        let t0 = Instant::now();

        overlay.open(&mut doc, t0).unwrap();
        assert_eq!(overlay.phase(), Phase::Opening);
        assert!(doc.is_attached(overlay.wrapper()));

        // Resting state immediately after open.
        let wrapper = doc.style(overlay.wrapper()).unwrap();
        assert_eq!(wrapper.opacity, Some(0.0));
        assert_eq!(wrapper.offsets.top, Some(Length::Percent(10.0)));
        assert_eq!(doc.style(overlay.backdrop_node()).unwrap().opacity, Some(0.0));

        // Not yet due.
        assert!(overlay.tick(&mut doc, t0 + Duration::from_millis(99)).is_none());
        assert_eq!(overlay.phase(), Phase::Opening);

        // Due: open state applied.
        assert_eq!(
            overlay.tick(&mut doc, t0 + REFLOW_DELAY),
            Some(Phase::Open)
        );
        let wrapper = doc.style(overlay.wrapper()).unwrap();
        assert_eq!(wrapper.opacity, Some(1.0));
        assert_eq!(wrapper.offsets, EdgeOffsets::zeroed());
        assert_eq!(
            doc.style(overlay.backdrop_node()).unwrap().opacity,
            Some(0.5)
        );
    }

    #[test]
    fn no_transition_opens_and_closes_synchronously() {
        let mut doc = Document::new();
        let mut overlay = overlay_with(&mut doc, OverlayConfig::default().no_transition());
        let closed = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&closed);
        overlay.on_after_close(Box::new(move || counter.set(counter.get() + 1)));

        let now = Instant::now();
        overlay.open(&mut doc, now).unwrap();
        assert_eq!(overlay.phase(), Phase::Open);
        assert_eq!(doc.style(overlay.wrapper()).unwrap().opacity, Some(1.0));

        overlay.close(&mut doc, now);
        assert_eq!(overlay.phase(), Phase::Closed);
        assert!(!doc.is_attached(overlay.wrapper()));
        assert!(!doc.is_attached(overlay.backdrop_node()));
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn open_returns_fresh_clone_each_time() {
        let mut doc = Document::new();
        let mut overlay = overlay_with(&mut doc, OverlayConfig::default().no_transition());
        let now = Instant::now();

        let first = overlay.open(&mut doc, now).unwrap();
        assert!(doc.is_attached(first));
        assert_ne!(first, overlay.template());
        assert!(doc.subtree_eq(first, overlay.template()));

        // Simulate the user typing into the first clone.
        let field = doc.descendant_with_attr(first, "class", "field").unwrap();
        doc.set_text(field, "typed value");

        let second = overlay.open(&mut doc, now).unwrap();
        assert_ne!(second, first);
        assert!(!doc.contains(first), "previous clone must be torn down");
        let field = doc.descendant_with_attr(second, "class", "field").unwrap();
        assert_eq!(doc.text(field), None, "state must not leak between opens");
        assert!(doc.subtree_eq(second, overlay.template()));
    }

    #[test]
    fn open_with_persistent_node_survives_reopen() {
        let mut doc = Document::new();
        let mut overlay = overlay_with(&mut doc, OverlayConfig::default().no_transition());
        let now = Instant::now();

        let persistent = doc.create_element("div");
        doc.set_text(persistent, "in progress");

        overlay.open_with(&mut doc, persistent, now).unwrap();
        assert!(doc.is_attached(persistent));

        // Re-opening with the same node must not free it.
        overlay.open_with(&mut doc, persistent, now).unwrap();
        assert!(doc.contains(persistent));
        assert!(doc.is_attached(persistent));
        assert_eq!(doc.text(persistent), Some("in progress"));
    }

    #[test]
    fn open_with_stale_node_errors() {
        let mut doc = Document::new();
        let mut overlay = overlay_with(&mut doc, OverlayConfig::default());
        let node = doc.create_element("div");
        doc.append_child(doc.root(), node).unwrap();
        doc.remove_subtree(node).unwrap();
        let result = overlay.open_with(&mut doc, node, Instant::now());
        assert_eq!(result.err(), Some(OverlayError::Dom(DomError::StaleNode)));
    }

    #[test]
    fn close_detaches_after_exit_delay() {
        let mut doc = Document::new();
        let mut overlay = overlay_with(&mut doc, OverlayConfig::default());
        let closed = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&closed);
        overlay.on_after_close(Box::new(move || counter.set(counter.get() + 1)));

        let t0 = Instant::now();
        overlay.open(&mut doc, t0).unwrap();
        overlay.tick(&mut doc, t0 + REFLOW_DELAY);

        let t1 = t0 + Duration::from_secs(1);
        overlay.close(&mut doc, t1);
        assert_eq!(overlay.phase(), Phase::Closing);
        // Resting state applied immediately, layers still attached.
        assert_eq!(doc.style(overlay.wrapper()).unwrap().opacity, Some(0.0));
        assert!(doc.is_attached(overlay.wrapper()));
        assert_eq!(closed.get(), 0);

        assert!(overlay.tick(&mut doc, t1 + Duration::from_millis(199)).is_none());
        assert_eq!(
            overlay.tick(&mut doc, t1 + EXIT_DELAY),
            Some(Phase::Closed)
        );
        assert!(!doc.is_attached(overlay.wrapper()));
        assert!(!doc.is_attached(overlay.backdrop_node()));
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn reopen_during_closing_cancels_detach_timer() {
        let mut doc = Document::new();
        let mut overlay = overlay_with(&mut doc, OverlayConfig::default());
        let t0 = Instant::now();

        overlay.open(&mut doc, t0).unwrap();
        overlay.tick(&mut doc, t0 + REFLOW_DELAY);
        overlay.close(&mut doc, t0 + Duration::from_millis(500));
        assert_eq!(overlay.phase(), Phase::Closing);

        // Re-open before the exit delay elapses.
        overlay.open(&mut doc, t0 + Duration::from_millis(550)).unwrap();
        assert_eq!(overlay.phase(), Phase::Opening);

        // Past the stale close deadline: the overlay must still be attached,
        // and the only pending timer is the enter delay.
        overlay.tick(&mut doc, t0 + Duration::from_millis(700));
        assert!(doc.is_attached(overlay.wrapper()));
        assert_eq!(overlay.phase(), Phase::Open);
    }

    #[test]
    fn auto_close_disabled_ignores_escape_and_backdrop() {
        let mut doc = Document::new();
        let mut overlay = overlay_with(
            &mut doc,
            OverlayConfig::default().auto_close(false).no_transition(),
        );
        let now = Instant::now();
        overlay.open(&mut doc, now).unwrap();

        let escape = Event::key_press(KeyCode::Escape);
        assert!(overlay.handle_event(&mut doc, &escape, now).is_none());

        let wrapper_down = Event::pointer_down(overlay.wrapper());
        assert!(overlay.handle_event(&mut doc, &wrapper_down, now).is_none());
        assert_eq!(overlay.phase(), Phase::Open);
    }

    #[test]
    fn auto_close_escape_closes() {
        let mut doc = Document::new();
        let mut overlay = overlay_with(
            &mut doc,
            OverlayConfig::default().auto_close(true).no_transition(),
        );
        let now = Instant::now();
        overlay.open(&mut doc, now).unwrap();

        let escape = Event::key_press(KeyCode::Escape);
        assert_eq!(
            overlay.handle_event(&mut doc, &escape, now),
            Some(OverlayAction::EscapePressed)
        );
        assert_eq!(overlay.phase(), Phase::Closed);

        // Escape while closed is inert.
        assert!(overlay.handle_event(&mut doc, &escape, now).is_none());
    }

    #[test]
    fn backdrop_dismissal_is_target_identity_not_containment() {
        let mut doc = Document::new();
        let mut overlay = overlay_with(
            &mut doc,
            OverlayConfig::default().auto_close(true).no_transition(),
        );
        let now = Instant::now();
        let clone = overlay.open(&mut doc, now).unwrap();

        // Pointer-down on a descendant of the wrapper must not dismiss.
        let on_container = Event::pointer_down(overlay.container());
        assert!(overlay.handle_event(&mut doc, &on_container, now).is_none());
        let on_content = Event::pointer_down(clone);
        assert!(overlay.handle_event(&mut doc, &on_content, now).is_none());
        assert_eq!(overlay.phase(), Phase::Open);

        // Pointer-down exactly on the wrapper dismisses.
        let on_wrapper = Event::pointer_down(overlay.wrapper());
        assert_eq!(
            overlay.handle_event(&mut doc, &on_wrapper, now),
            Some(OverlayAction::BackdropPressed)
        );
        assert_eq!(overlay.phase(), Phase::Closed);
    }

    #[test]
    fn close_button_rendered_and_closes() {
        let mut doc = Document::new();
        let mut overlay = overlay_with(&mut doc, OverlayConfig::default().no_transition());
        let now = Instant::now();
        overlay.open(&mut doc, now).unwrap();

        let btn = overlay.close_button().expect("close button rendered");
        assert!(doc.is_attached(btn));
        assert_eq!(doc.attr(btn, "class"), Some("scrim-close"));

        let press = Event::pointer_down(btn);
        assert_eq!(
            overlay.handle_event(&mut doc, &press, now),
            Some(OverlayAction::CloseButtonPressed)
        );
        assert_eq!(overlay.phase(), Phase::Closed);
    }

    #[test]
    fn close_button_suppressed_by_config() {
        let mut doc = Document::new();
        let mut overlay = overlay_with(
            &mut doc,
            OverlayConfig::default().close_button(false).no_transition(),
        );
        overlay.open(&mut doc, Instant::now()).unwrap();
        assert!(overlay.close_button().is_none());
    }

    #[test]
    fn before_open_hook_sees_live_clone_before_attach() {
        let mut doc = Document::new();
        let mut overlay = overlay_with(&mut doc, OverlayConfig::default().no_transition());
        overlay.on_before_open(Box::new(|doc, node| {
            // Runs pre-attach: the clone has no parent yet.
            assert!(!doc.is_attached(node));
            doc.set_attr(node, "data-armed", "yes");
        }));

        let clone = overlay.open(&mut doc, Instant::now()).unwrap();
        assert_eq!(doc.attr(clone, "data-armed"), Some("yes"));
        assert!(doc.is_attached(clone));
    }

    #[test]
    fn double_close_never_duplicates_detach() {
        let mut doc = Document::new();
        let mut overlay = overlay_with(&mut doc, OverlayConfig::default());
        let closed = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&closed);
        overlay.on_after_close(Box::new(move || counter.set(counter.get() + 1)));

        let t0 = Instant::now();
        overlay.open(&mut doc, t0).unwrap();
        overlay.tick(&mut doc, t0 + REFLOW_DELAY);
        overlay.close(&mut doc, t0 + Duration::from_millis(300));
        overlay.close(&mut doc, t0 + Duration::from_millis(320));

        // Only the rescheduled timer fires.
        overlay.tick(&mut doc, t0 + Duration::from_millis(520));
        assert_eq!(closed.get(), 1);
        overlay.tick(&mut doc, t0 + Duration::from_secs(2));
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn missing_size_yields_unsized_container() {
        let mut doc = Document::new();
        let overlay = overlay_with(&mut doc, OverlayConfig::default());
        let style = doc.style(overlay.container()).unwrap();
        assert_eq!(style.width, None);
        assert_eq!(style.height, None);
    }

    #[test]
    fn next_deadline_reports_pending_timer() {
        let mut doc = Document::new();
        let mut overlay = overlay_with(&mut doc, OverlayConfig::default());
        let t0 = Instant::now();
        assert!(overlay.next_deadline().is_none());
        overlay.open(&mut doc, t0).unwrap();
        assert_eq!(overlay.next_deadline(), Some(t0 + REFLOW_DELAY));
    }
}
