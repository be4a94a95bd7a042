#![forbid(unsafe_code)]

//! Overlay controller, dialog presets, toast, and directional drawers.
//!
//! One component does the work: [`Overlay`] owns three stacked layers
//! (backdrop, wrapper, container), a detached content template, and a
//! timer-driven transition state machine
//! (`Closed -> Opening -> Open -> Closing -> Closed`). Every `open` deep-clones
//! the template so field state never leaks between openings; `open_with`
//! bypasses cloning for content that must persist across opens.
//!
//! The presets are configuration over the same controller, not separate
//! machinery:
//!
//! - [`Alert`]: message + Ok button
//! - [`Confirm`]: message + Ok/Cancel
//! - [`Toast`]: corner-placed auto-dismissing notice
//! - [`Drawer`]: edge-anchored slide-in panel
//!
//! Hosts own the instances ([`DialogRegistry`] bundles the common three),
//! pump [`Overlay::tick`] from their event loop, and route input through
//! `handle_event`. Nothing here spawns threads or blocks.
//!
//! # Example
//!
//! ```ignore
//! let mut doc = Document::new();
//! let mut alert = Alert::new(&mut doc)?;
//!
//! alert.open(&mut doc, "Saved", |_doc, result| println!("{result:?}"), Instant::now())?;
//! // ... host loop: alert.handle_event(...), alert.tick(...) ...
//! ```

mod controller;
mod dialog;
mod drawer;
mod registry;
mod toast;

pub use controller::{
    Backdrop, EXIT_DELAY, Overlay, OverlayAction, OverlayConfig, OverlayError, Phase,
    REFLOW_DELAY, Transition,
};
pub use dialog::{Alert, Confirm, DialogResult};
pub use drawer::{Drawer, DrawerEdge, drawer_config};
pub use registry::DialogRegistry;
pub use toast::{Placement, TOAST_TIMEOUT, Toast, ToastOptions};
