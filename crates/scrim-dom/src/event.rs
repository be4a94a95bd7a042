#![forbid(unsafe_code)]

//! Input events routed to overlays by the host.
//!
//! The host performs hit testing; pointer events arrive with the `target`
//! already resolved. Dismissal checks therefore compare node identity,
//! never containment.

use crate::document::NodeId;

/// An input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Pointer(PointerEvent),
}

impl Event {
    /// A key press event.
    #[must_use]
    pub const fn key_press(code: KeyCode) -> Self {
        Self::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
        })
    }

    /// A primary-button pointer-down on `target`.
    #[must_use]
    pub const fn pointer_down(target: NodeId) -> Self {
        Self::Pointer(PointerEvent {
            kind: PointerEventKind::Down,
            button: PointerButton::Primary,
            target,
        })
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub kind: KeyEventKind,
}

/// Key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Escape,
    Enter,
    Tab,
    Backspace,
    Char(char),
}

/// Press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    Press,
    Release,
}

/// A pointer event targeted at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub button: PointerButton,
    pub target: NodeId,
}

/// Pointer transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Up,
}

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Auxiliary,
}
