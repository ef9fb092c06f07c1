use anyhow::{Context, Result};
use carbon_signal::{logging, App, Config, Screen};
use carbon_signal_api::FileStore;
use directories::ProjectDirs;
use ratatui::crossterm::event;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn get_config_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "carbon-signal", "carbon-signal") {
        proj_dirs.config_dir().join("config.toml")
    } else {
        PathBuf::from("config/default.toml")
    }
}

fn main() -> Result<()> {
    let config_path = get_config_path();
    let (config, config_problem) = match Config::load_if_present(&config_path) {
        Ok(config) => (config.unwrap_or_default(), None),
        Err(e) => (Config::default(), Some(e)),
    };

    let data_dir = config.data_dir()?;
    let log_path = logging::init(&data_dir)?;
    tracing::info!(log = %log_path.display(), "carbon-signal starting");
    if let Some(e) = config_problem {
        tracing::warn!("ignoring invalid config, using defaults: {e:#}");
    }

    let store = FileStore::open(&data_dir, config.storage.encrypt)
        .with_context(|| format!("opening credential store in {}", data_dir.display()))?;
    let api = Arc::new(config.signal_client());

    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let mut app = App::new(config, Screen::default(), Box::new(store), api);
    app.initialize();

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &mut app);
    ratatui::restore();

    tracing::info!("carbon-signal exiting");
    result
}

fn run(terminal: &mut ratatui::DefaultTerminal, app: &mut App<Screen>) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(50))? {
            let event = event::read()?;
            match app.handle_event(event) {
                Ok(true) => break,
                Ok(false) => {}
                Err(e) => tracing::warn!("event handling failed: {e}"),
            }
        }

        app.process_async_events();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
