#![forbid(unsafe_code)]

//! Retained element tree, input events, and timer deadlines for scrim.
//!
//! The tree is a generational arena: [`NodeId`]s handed out by one
//! [`Document`] stay valid until the node is removed, after which every
//! operation on the stale id fails cleanly instead of touching a recycled
//! slot. Hit testing is the host's job; events arrive already targeted.

pub mod document;
pub mod event;
pub mod timer;

pub use document::{Document, DomError, NodeId};
pub use event::{Event, KeyCode, KeyEvent, KeyEventKind, PointerButton, PointerEvent, PointerEventKind};
pub use timer::Deadline;
