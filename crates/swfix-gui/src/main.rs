//! swfix-gui application entry point.
//!
//! Wires the saved config, the fix engine, and the command bridge, then
//! runs headless on the Tokio runtime.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ AppState::new()   -- loads saved paths, picks platform capabilities
//!  └─ event pump        -- logs FixEvent progress from the bridge
//!  └─ command surface   -- bridge::{load_paths, apply_fix, ...}
//! ```
//!
//! A full desktop build registers the same bridge functions as Tauri
//! commands; nothing in `bridge` changes between the two shells.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tracing::info;
use tracing_subscriber::EnvFilter;

use swfix_gui::bridge::{AppState, FixEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("swfix-gui starting");

    // Load configuration and initialise shared state.
    let state = AppState::new();

    // Shutdown flag shared with the signal handler.
    let running = Arc::new(AtomicBool::new(true));

    // ── Fix event pump ────────────────────────────────────────────────────────
    // The desktop shell forwards these to the window; headless we log them.
    let mut events = state.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                FixEvent::Started { kind } => info!(kind = kind.label(), "fix started"),
                FixEvent::Log { message } => info!("{message}"),
                FixEvent::Completed { summary } => {
                    info!(succeeded = summary.succeeded, "{}", summary.summary);
                }
            }
        }
    });

    // ── Ctrl-C / SIGTERM handler ──────────────────────────────────────────────
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            running_clone.store(false, Ordering::Relaxed);
        }
    });

    info!("swfix-gui ready.  Press Ctrl-C to exit.");

    // In a full Tauri build, `tauri::Builder::default()` would be invoked here
    // to open the native window and register the bridge commands.  For the
    // headless variant we simply block until the shutdown flag is cleared.
    loop {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if !running.load(Ordering::Relaxed) {
            break;
        }
    }

    info!("swfix-gui stopped");
    Ok(())
}
