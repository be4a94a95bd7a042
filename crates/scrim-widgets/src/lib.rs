#![forbid(unsafe_code)]

//! Overlay widgets for scrim.

pub mod overlay;

pub use overlay::{
    Alert, Backdrop, Confirm, DialogRegistry, DialogResult, Drawer, DrawerEdge, EXIT_DELAY,
    Overlay, OverlayAction, OverlayConfig, OverlayError, Phase, Placement, REFLOW_DELAY,
    TOAST_TIMEOUT, Toast, ToastOptions, Transition, drawer_config,
};
