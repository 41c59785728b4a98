//! Entry point for the **gd-autosell** agent.
//!
//! Runs the hotkey dispatcher on a background thread and the tray icon
//! message loop on the main thread. Either side can end the process: the
//! exit key stops the dispatcher, which the tray notices through the shared
//! cancel token, and the tray's Exit item cancels the dispatcher.

#[cfg(windows)]
fn main() {
    use gd_autosell::app::{
        ActionSequencer, CancelToken, DispatcherTask, FocusGate, HotkeyDispatcher, SequencePlan,
    };
    use gd_autosell::config::AppConfig;
    use gd_autosell::domain::hotkeys::Action;
    use gd_autosell::input::InputInjector;
    use gd_autosell::platform::{Win32Desktop, elevation};
    use gd_autosell::ui::{Tray, TrayExit};
    use log::{error, info, warn};

    init_logger();

    if !elevation::is_elevated() {
        // Input injection into an elevated game needs matching rights
        if let Err(e) = elevation::relaunch_elevated() {
            error!("could not relaunch elevated: {e}");
            std::process::exit(1);
        }
        return;
    }

    let config = match AppConfig::load_default() {
        Ok(config) => config,
        Err(e) => {
            error!("failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if config.debug && !rust_log_set() {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let bound: Vec<String> = Action::PRIORITY
        .iter()
        .filter_map(|&action| config.bindings.key_for(action).map(|key| format!("{key}={action}")))
        .collect();
    let exit_key = config
        .bindings
        .global_exit
        .map_or_else(|| "unbound".to_string(), |key| key.to_string());

    info!("Auto-sell & Dismantle running...");
    info!(
        "Hotkeys: {} | exit: {} | target window: \"{}\"",
        bound.join(", "),
        exit_key,
        config.target_window
    );

    let desktop = Win32Desktop::new();
    let sequencer = ActionSequencer::new(
        InputInjector::new(desktop),
        FocusGate::new(desktop, config.target_window.clone()),
        desktop,
        config.bindings.global_exit,
        SequencePlan::from_config(&config),
        CancelToken::new(),
    );
    let dispatcher = HotkeyDispatcher::new(sequencer, &config.bindings);

    let mut task = match DispatcherTask::start(dispatcher) {
        Ok(task) => task,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };
    let cancel = task.cancel_token().clone();

    match Tray::new("AutoSell & Dismantle") {
        Ok(tray) => match tray.run(&cancel) {
            TrayExit::ExitSelected => info!("exit requested from tray"),
            TrayExit::Cancelled => info!("dispatcher finished, closing tray"),
        },
        Err(e) => {
            // The hotkeys still work without the icon
            warn!("tray unavailable: {e}");
            while task.is_running() {
                std::thread::sleep(std::time::Duration::from_millis(100));
            }
        }
    }

    if let Err(e) = task.stop() {
        error!("{e}");
    }
}

#[cfg(not(windows))]
fn main() {
    init_logger();
    log::error!("gd-autosell drives the Windows desktop and only runs on Windows");
    std::process::exit(1);
}

/// Starts logging at `info`, or at whatever `RUST_LOG` asks for
///
/// The logger itself admits `debug` so the config's debug flag can raise
/// the global level once the file has been read.
fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    if !rust_log_set() {
        log::set_max_level(log::LevelFilter::Info);
    }
}

fn rust_log_set() -> bool {
    std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_some()
}
