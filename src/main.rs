//! Cooldown Timer - a countdown timer with an alarm and a mandatory cooldown
//!
//! This is the main entry point for the cooldown-timer application.

use std::{sync::Arc, time::Duration};

use tokio::{
    net::TcpListener,
    sync::{mpsc, oneshot, watch},
};
use tracing::info;

use cooldown_timer::{
    api::create_router,
    config::Config,
    engine::{TimerEngine, TokioScheduler},
    services::{BellCue, Cue, LogCue, LogSurface, Surface, TerminalSurface},
    state::{AppState, Controller, TimerSnapshot},
    tasks::{terminal_keyboard_task, timer_driver_task, KeyboardExit},
    utils::{shutdown_signal, SystemClock},
};

const BELL_PERIOD: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("cooldown_timer={},tower_http=info", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    let settings = config.settings()?;

    info!("Starting cooldown-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, timer={}min, cooldown={}s, poll={}ms",
        config.host, config.port, config.timer, config.cooldown, config.poll_interval
    );

    // Channels between the driver task and everything else
    let (poll_tx, poll_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::channel(32);
    let (snapshot_tx, snapshot_rx) = watch::channel(TimerSnapshot::new());

    let surface: Box<dyn Surface> = if config.render {
        Box::new(TerminalSurface::new())
    } else {
        Box::new(LogSurface)
    };
    let (alarm, cooldown): (Box<dyn Cue>, Box<dyn Cue>) = if config.bell {
        (Box::new(BellCue::new(BELL_PERIOD)), Box::new(BellCue::new(BELL_PERIOD * 5)))
    } else {
        (Box::new(LogCue::new("alarm")), Box::new(LogCue::new("cooldown")))
    };

    let engine = TimerEngine::new(
        settings.poll_interval,
        Box::new(SystemClock::new()),
        Box::new(TokioScheduler::new(poll_tx)),
    );
    let controller = Controller::new(settings, engine, surface, alarm, cooldown);

    // Start the timer driver task
    let driver = tokio::spawn(timer_driver_task(controller, poll_rx, command_rx, snapshot_tx));

    // Start the keyboard task; raw mode swallows SIGINT, so Ctrl+C comes back
    // through `interrupt_rx`
    let (interrupt_tx, interrupt_rx) = oneshot::channel();
    let keyboard = (!config.no_keyboard).then(|| {
        let keyboard_commands = command_tx.clone();
        let repeat_window = config.repeat_window();
        tokio::spawn(async move {
            let exit = terminal_keyboard_task(SystemClock::new(), repeat_window, keyboard_commands).await;
            if exit == KeyboardExit::Interrupted {
                // Main may already be shutting down for another reason
                let _ = interrupt_tx.send(());
            }
        })
    });

    let state = Arc::new(AppState::new(config.port, config.host.clone(), command_tx, snapshot_rx));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /control - Press the control button");
    info!("  GET  /status  - Current phase and countdown");
    info!("  GET  /health  - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        signal = shutdown_signal() => {
            signal?;
            info!("Shutdown signal received");
        }
        Ok(()) = interrupt_rx => {
            info!("Interrupted from the keyboard");
        }
    }

    // Once every command sender is gone the driver stops its poll and cues
    if let Some(keyboard) = keyboard {
        keyboard.abort();
        // Wait for the task to drop its raw mode guard before exiting
        let _ = keyboard.await;
    }
    drop(state);
    if tokio::time::timeout(Duration::from_secs(1), driver).await.is_err() {
        tracing::warn!("Timer driver did not stop in time");
    }

    info!("Shutdown complete");
    Ok(())
}
