#![forbid(unsafe_code)]

//! Scripted host loop walking the stock overlays: a drawer, a confirm, an
//! alert, and a toast, driven on a simulated clock. Run with
//! `RUST_LOG=debug` to watch the controller's timer decisions.

use scrim_dom::{Document, Event, KeyCode};
use scrim_style::Length;
use scrim_widgets::{
    DialogRegistry, Drawer, DrawerEdge, EXIT_DELAY, Phase, REFLOW_DELAY, ToastOptions,
};
use tracing::info;
use web_time::{Duration, Instant};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("demo failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = Document::new();
    let mut dialogs = DialogRegistry::new(&mut doc)?;

    let nav = doc.create_element("nav");
    doc.set_text(nav, "settings / profile / sign out");
    doc.append_child(doc.root(), nav)?;
    let mut drawer = Drawer::new(&mut doc, nav, DrawerEdge::Left, Length::Px(280.0))?;

    let mut now = Instant::now();

    // Slide the drawer in, then dismiss it with Escape.
    info!("opening left drawer");
    drawer.open(&mut doc, now)?;
    now = pump(&mut doc, &mut dialogs, &mut drawer, now, REFLOW_DELAY);
    info!(phase = ?drawer.overlay().phase(), nodes = doc.node_count(), "drawer open");

    let escape = Event::key_press(KeyCode::Escape);
    if let Some(action) = drawer.handle_event(&mut doc, &escape, now) {
        info!(?action, "drawer dismissed");
    }
    now = pump(&mut doc, &mut dialogs, &mut drawer, now, EXIT_DELAY);

    // Ask, then report the outcome through an alert and a toast.
    info!("opening confirm");
    dialogs.confirm_mut().open(
        &mut doc,
        "Discard the current draft?",
        |_doc, result| info!(?result, "confirm resolved"),
        now,
    )?;
    now = pump(&mut doc, &mut dialogs, &mut drawer, now, REFLOW_DELAY);

    let clone = dialogs
        .confirm()
        .overlay()
        .active_content()
        .ok_or("confirm has no content")?;
    let ok = doc
        .descendant_with_attr(clone, "class", "scrim-confirm-ok")
        .ok_or("confirm has no ok button")?;
    dialogs.handle_event(&mut doc, &Event::pointer_down(ok), now);
    now = pump(&mut doc, &mut dialogs, &mut drawer, now, EXIT_DELAY);

    info!("opening alert");
    dialogs.alert_mut().open(
        &mut doc,
        "Draft discarded",
        |_doc, result| info!(?result, "alert resolved"),
        now,
    )?;
    now = pump(&mut doc, &mut dialogs, &mut drawer, now, REFLOW_DELAY);
    dialogs.handle_event(&mut doc, &Event::key_press(KeyCode::Enter), now);
    now = pump(&mut doc, &mut dialogs, &mut drawer, now, EXIT_DELAY);

    info!("showing toast");
    dialogs.toast_mut().open(
        &mut doc,
        "Autosave enabled",
        ToastOptions::default().timeout(Duration::from_secs(2)),
        now,
    )?;
    // Ride the toast all the way out.
    pump(
        &mut doc,
        &mut dialogs,
        &mut drawer,
        now,
        Duration::from_secs(2) + EXIT_DELAY,
    );

    assert_eq!(dialogs.toast().overlay().phase(), Phase::Closed);
    info!(nodes = doc.node_count(), "demo finished, overlays detached");
    Ok(())
}

/// Advance the simulated clock in 25ms steps, ticking every widget.
fn pump(
    doc: &mut Document,
    dialogs: &mut DialogRegistry,
    drawer: &mut Drawer,
    from: Instant,
    span: Duration,
) -> Instant {
    let step = Duration::from_millis(25);
    let mut now = from;
    let end = from + span;
    while now < end {
        now += step;
        dialogs.tick(doc, now);
        drawer.tick(doc, now);
    }
    now
}
