#![forbid(unsafe_code)]

//! An explicit bundle of the stock dialogs.
//!
//! Hosts that want alert/confirm/toast without wiring each one construct a
//! [`DialogRegistry`] and pump it as a unit. It is a plain owned value the
//! host threads through its loop; nothing here is global or implicit, and
//! hosts needing several independent sets just build several registries.

use scrim_dom::{Document, Event};
use web_time::Instant;

use super::controller::OverlayError;
use super::dialog::{Alert, Confirm, DialogResult};
use super::toast::Toast;

/// The stock alert, confirm, and toast, owned together.
pub struct DialogRegistry {
    alert: Alert,
    confirm: Confirm,
    toast: Toast,
}

impl DialogRegistry {
    pub fn new(doc: &mut Document) -> Result<Self, OverlayError> {
        Ok(Self {
            alert: Alert::new(doc)?,
            confirm: Confirm::new(doc)?,
            toast: Toast::new(doc)?,
        })
    }

    #[must_use]
    pub fn alert(&self) -> &Alert {
        &self.alert
    }

    pub fn alert_mut(&mut self) -> &mut Alert {
        &mut self.alert
    }

    #[must_use]
    pub fn confirm(&self) -> &Confirm {
        &self.confirm
    }

    pub fn confirm_mut(&mut self) -> &mut Confirm {
        &mut self.confirm
    }

    #[must_use]
    pub fn toast(&self) -> &Toast {
        &self.toast
    }

    pub fn toast_mut(&mut self) -> &mut Toast {
        &mut self.toast
    }

    /// Route an input event to whichever dialog is open. At most one of
    /// the modal dialogs is expected open at a time; the first consumer
    /// wins. Toasts are click-through and never consume events.
    pub fn handle_event(
        &mut self,
        doc: &mut Document,
        event: &Event,
        now: Instant,
    ) -> Option<DialogResult> {
        if let Some(result) = self.alert.handle_event(doc, event, now) {
            return Some(result);
        }
        self.confirm.handle_event(doc, event, now)
    }

    /// Drive every dialog's timers.
    pub fn tick(&mut self, doc: &mut Document, now: Instant) {
        self.alert.tick(doc, now);
        self.confirm.tick(doc, now);
        self.toast.tick(doc, now);
    }

    /// The earliest instant any owned dialog has timer work.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.alert.overlay().next_deadline(),
            self.confirm.overlay().next_deadline(),
            self.toast.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Whether any owned dialog is currently attached.
    #[must_use]
    pub fn any_open(&self) -> bool {
        self.alert.is_open() || self.confirm.is_open() || self.toast.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{REFLOW_DELAY, ToastOptions};
    use scrim_dom::KeyCode;

    #[test]
    fn registry_routes_to_the_open_dialog() {
        let mut doc = Document::new();
        let mut dialogs = DialogRegistry::new(&mut doc).unwrap();
        let now = Instant::now();

        dialogs
            .confirm_mut()
            .open(&mut doc, "Sure?", |_, _| {}, now)
            .unwrap();
        assert!(dialogs.any_open());

        let escape = Event::key_press(KeyCode::Escape);
        assert_eq!(
            dialogs.handle_event(&mut doc, &escape, now),
            Some(DialogResult::Dismissed)
        );
        assert!(dialogs.handle_event(&mut doc, &escape, now).is_none());
    }

    #[test]
    fn tick_drives_all_dialogs() {
        let mut doc = Document::new();
        let mut dialogs = DialogRegistry::new(&mut doc).unwrap();
        let t0 = Instant::now();

        dialogs
            .alert_mut()
            .open(&mut doc, "hello", |_, _| {}, t0)
            .unwrap();
        dialogs
            .toast_mut()
            .open(&mut doc, "hi", ToastOptions::default(), t0)
            .unwrap();
        assert_eq!(dialogs.next_deadline(), Some(t0 + REFLOW_DELAY));

        dialogs.tick(&mut doc, t0 + REFLOW_DELAY);
        assert!(dialogs.alert().is_open());
        assert!(dialogs.toast().is_open());
    }

    #[test]
    fn independent_registries_do_not_share_state() {
        let mut doc = Document::new();
        let mut a = DialogRegistry::new(&mut doc).unwrap();
        let b = DialogRegistry::new(&mut doc).unwrap();
        let now = Instant::now();

        a.alert_mut().open(&mut doc, "only a", |_, _| {}, now).unwrap();
        assert!(a.any_open());
        assert!(!b.any_open());
    }
}
