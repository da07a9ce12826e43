//! Entry point for the **winshift** daemon.
//!
//! Spawns the Unix-socket [`CommandSource`](winshift::traits::CommandSource)
//! on a background thread and processes incoming commands on the main
//! thread.  Between commands the main thread wakes up for the dispatcher's
//! timers (filter debounce, delayed refocus).
//!
//! The desktop is simulated in memory; `--desktop <layout.json>` loads a
//! layout, otherwise a built-in demo layout is used.

use winshift::command::Command;
use winshift::config::Config;
use winshift::dispatcher::Dispatcher;
use winshift::ipc::listener::UnixSocketListener;
use winshift::sim::{DesktopLayout, SimDesktop};
use winshift::traits::{CommandSource, Host};
use log::{error, info};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Instant;

/// Default socket path for the command listener.
fn default_socket_path() -> String {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    format!("{}/winshift.sock", runtime)
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/winshift`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("winshift")
}

/// Try to load the config from `$XDG_CONFIG_HOME/winshift/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

/// The value following `--desktop`, if given.
fn desktop_arg() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--desktop" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

fn load_desktop() -> SimDesktop {
    match desktop_arg() {
        Some(path) => match SimDesktop::load(&path) {
            Ok(desktop) => {
                info!("loaded desktop layout from {}", path.display());
                desktop
            }
            Err(e) => {
                error!("failed to load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            info!("no --desktop given, using the demo layout");
            SimDesktop::new(DesktopLayout::demo())
        }
    }
}

//  Main

fn main() {
    env_logger::init();

    let config = load_config();
    let desktop = load_desktop();
    match desktop.visible_windows() {
        Ok(windows) => info!("{} visible window(s)", windows.len()),
        Err(e) => {
            error!("failed to query windows: {}", e);
            std::process::exit(1);
        }
    }

    let dispatcher = Dispatcher::new(desktop, config);

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    spawn_command_sources(cmd_tx);

    run_event_loop(dispatcher, cmd_rx);
}

//  Event loop

fn run_event_loop<H: Host>(mut dispatcher: Dispatcher<H>, cmd_rx: mpsc::Receiver<Command>) {
    info!("winshift running");
    loop {
        let received = match dispatcher.next_deadline() {
            Some(deadline) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                cmd_rx.recv_timeout(wait)
            }
            None => cmd_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(cmd) => {
                if let Err(e) = dispatcher.handle(cmd) {
                    error!("command error: {}", e);
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if let Err(e) = dispatcher.poll(Instant::now()) {
            error!("timer error: {}", e);
        }
    }
    info!("all command sources closed, exiting");
}

//  Helpers

fn spawn_command_sources(tx: mpsc::Sender<Command>) {
    let path = default_socket_path();
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&path);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}
