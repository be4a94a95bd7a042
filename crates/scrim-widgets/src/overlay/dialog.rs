#![forbid(unsafe_code)]

//! Alert and confirm dialog presets.
//!
//! Both are an [`Overlay`] with a built-in template (message area plus
//! buttons), `auto_close` enabled, and the close button suppressed. The
//! completion callback is `FnOnce` and taken on fire, so it runs exactly
//! once per open no matter how the dialog ends.
//!
//! Invariants:
//! - A dismissal (Escape, backdrop press) resolves the same as pressing a
//!   button: the callback still fires, with [`DialogResult::Dismissed`].
//! - Opening again before the previous dialog resolved drops the previous
//!   callback unfired and supersedes it.

use scrim_dom::{
    Document, Event, KeyCode, KeyEvent, KeyEventKind, NodeId, PointerButton, PointerEvent,
    PointerEventKind,
};
use scrim_style::{Display, FlexAlign, FlexDirection, FlexJustify, Length};
use tracing::debug;
use web_time::Instant;

use super::controller::{Overlay, OverlayConfig, OverlayError, Phase};

/// How a dialog resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResult {
    /// The Ok button was pressed (or Enter while it had focus).
    Ok,
    /// The Cancel button was pressed.
    Cancel,
    /// Escape or a backdrop press dismissed the dialog.
    Dismissed,
}

/// Callback invoked once when a dialog resolves.
pub type DialogCallback = Box<dyn FnOnce(&mut Document, DialogResult)>;

const DIALOG_WIDTH: Length = Length::Px(600.0);
const DIALOG_HEIGHT: Length = Length::Px(180.0);

fn dialog_config() -> OverlayConfig {
    OverlayConfig::default()
        .auto_close(true)
        .close_button(false)
        .size(DIALOG_WIDTH, DIALOG_HEIGHT)
}

/// Message area + button row, stacked vertically and centered.
fn dialog_template(doc: &mut Document, buttons: &[(&str, &str)]) -> Result<NodeId, OverlayError> {
    let body = doc.create_element("div");
    if let Some(style) = doc.style_mut(body) {
        style.width = Some(Length::Percent(80.0));
        style.display = Some(Display::Flex);
        style.flex_direction = Some(FlexDirection::Column);
        style.justify_content = Some(FlexJustify::SpaceAround);
        style.align_items = Some(FlexAlign::Center);
        style.height = Some(Length::Percent(60.0));
    }

    let message = doc.create_element("b");
    doc.set_attr(message, "class", "scrim-dialog-msg");
    doc.append_child(body, message)?;

    let row = doc.create_element("div");
    if let Some(style) = doc.style_mut(row) {
        style.display = Some(Display::Flex);
        style.flex_direction = Some(FlexDirection::Row);
        style.justify_content = Some(FlexJustify::SpaceAround);
        style.align_items = Some(FlexAlign::Center);
        style.width = Some(Length::Percent(100.0));
    }
    for &(class, label) in buttons {
        let btn = doc.create_element("button");
        doc.set_attr(btn, "class", class);
        doc.set_text(btn, label);
        doc.append_child(row, btn)?;
    }
    doc.append_child(body, row)?;
    doc.append_child(doc.root(), body)?;
    Ok(body)
}

/// A one-button notification dialog.
pub struct Alert {
    overlay: Overlay,
    ok: Option<NodeId>,
    callback: Option<DialogCallback>,
}

impl Alert {
    pub fn new(doc: &mut Document) -> Result<Self, OverlayError> {
        let template = dialog_template(doc, &[("scrim-alert-ok", "Okay")])?;
        let overlay = Overlay::new(doc, template, dialog_config())?;
        Ok(Self {
            overlay,
            ok: None,
            callback: None,
        })
    }

    /// Show the alert with `message`. `on_resolve` fires exactly once when
    /// the dialog ends, however it ends.
    pub fn open(
        &mut self,
        doc: &mut Document,
        message: &str,
        on_resolve: impl FnOnce(&mut Document, DialogResult) + 'static,
        now: Instant,
    ) -> Result<(), OverlayError> {
        if self.callback.is_some() {
            debug!("superseding unresolved alert");
        }
        let clone = self.overlay.open(doc, now)?;
        if let Some(msg) = doc.descendant_with_attr(clone, "class", "scrim-dialog-msg") {
            doc.set_text(msg, message);
        }
        self.ok = doc.descendant_with_attr(clone, "class", "scrim-alert-ok");
        if let Some(ok) = self.ok {
            doc.set_focus(ok);
        }
        self.callback = Some(Box::new(on_resolve));
        Ok(())
    }

    /// Route input. Returns the resolution when this event ended the dialog.
    pub fn handle_event(
        &mut self,
        doc: &mut Document,
        event: &Event,
        now: Instant,
    ) -> Option<DialogResult> {
        if !self.overlay.is_open() {
            return None;
        }
        if button_activated(doc, event, self.ok) {
            self.overlay.close(doc, now);
            return self.resolve(doc, DialogResult::Ok);
        }
        match self.overlay.handle_event(doc, event, now) {
            Some(_) => self.resolve(doc, DialogResult::Dismissed),
            None => None,
        }
    }

    /// Drive the overlay transition timer.
    pub fn tick(&mut self, doc: &mut Document, now: Instant) -> Option<Phase> {
        self.overlay.tick(doc, now)
    }

    fn resolve(&mut self, doc: &mut Document, result: DialogResult) -> Option<DialogResult> {
        if let Some(cb) = self.callback.take() {
            cb(doc, result);
        }
        Some(result)
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

/// A two-button Ok/Cancel dialog.
pub struct Confirm {
    overlay: Overlay,
    ok: Option<NodeId>,
    cancel: Option<NodeId>,
    callback: Option<DialogCallback>,
}

impl Confirm {
    pub fn new(doc: &mut Document) -> Result<Self, OverlayError> {
        let template = dialog_template(
            doc,
            &[
                ("scrim-confirm-ok", "Okay"),
                ("scrim-confirm-cancel", "Cancel"),
            ],
        )?;
        let overlay = Overlay::new(doc, template, dialog_config())?;
        Ok(Self {
            overlay,
            ok: None,
            cancel: None,
            callback: None,
        })
    }

    /// Show the confirm with `message`. `on_resolve` fires exactly once
    /// with [`DialogResult::Ok`], [`DialogResult::Cancel`], or
    /// [`DialogResult::Dismissed`].
    pub fn open(
        &mut self,
        doc: &mut Document,
        message: &str,
        on_resolve: impl FnOnce(&mut Document, DialogResult) + 'static,
        now: Instant,
    ) -> Result<(), OverlayError> {
        if self.callback.is_some() {
            debug!("superseding unresolved confirm");
        }
        let clone = self.overlay.open(doc, now)?;
        if let Some(msg) = doc.descendant_with_attr(clone, "class", "scrim-dialog-msg") {
            doc.set_text(msg, message);
        }
        self.ok = doc.descendant_with_attr(clone, "class", "scrim-confirm-ok");
        self.cancel = doc.descendant_with_attr(clone, "class", "scrim-confirm-cancel");
        if let Some(ok) = self.ok {
            doc.set_focus(ok);
        }
        self.callback = Some(Box::new(on_resolve));
        Ok(())
    }

    /// Route input. Returns the resolution when this event ended the dialog.
    pub fn handle_event(
        &mut self,
        doc: &mut Document,
        event: &Event,
        now: Instant,
    ) -> Option<DialogResult> {
        if !self.overlay.is_open() {
            return None;
        }
        if button_activated(doc, event, self.ok) {
            self.overlay.close(doc, now);
            return self.resolve(doc, DialogResult::Ok);
        }
        if button_activated(doc, event, self.cancel) {
            self.overlay.close(doc, now);
            return self.resolve(doc, DialogResult::Cancel);
        }
        match self.overlay.handle_event(doc, event, now) {
            Some(_) => self.resolve(doc, DialogResult::Dismissed),
            None => None,
        }
    }

    /// Drive the overlay transition timer.
    pub fn tick(&mut self, doc: &mut Document, now: Instant) -> Option<Phase> {
        self.overlay.tick(doc, now)
    }

    fn resolve(&mut self, doc: &mut Document, result: DialogResult) -> Option<DialogResult> {
        if let Some(cb) = self.callback.take() {
            cb(doc, result);
        }
        Some(result)
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

/// Pointer-down on the button, or Enter while it holds focus.
fn button_activated(doc: &Document, event: &Event, button: Option<NodeId>) -> bool {
    let Some(button) = button else { return false };
    match event {
        Event::Pointer(PointerEvent {
            kind: PointerEventKind::Down,
            button: PointerButton::Primary,
            target,
        }) => *target == button,
        Event::Key(KeyEvent {
            code: KeyCode::Enter,
            kind: KeyEventKind::Press,
        }) => doc.focused() == Some(button),
        _ => false,
    }
}
