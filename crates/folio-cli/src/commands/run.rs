use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use folio_core::{
    api::{ApiClient, ProfileStore},
    AppConfig, RequestTracker, ScrollPublisher,
};
use folio_tui::{
    event::{AppEvent, EventHandler, ProfileLoadResult},
    input::handle_key_event,
    scroll::ScrollConfigExt,
    widgets, App,
};

type Backend = CrosstermBackend<io::Stdout>;

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    let tracker = RequestTracker::new(config.loading.event_capacity);
    let client = Arc::new(ApiClient::new(&config.api, tracker.clone())?);
    let store = Arc::new(ProfileStore::new(client, &config.api));
    let publisher = Arc::new(ScrollPublisher::new());

    tracing::info!(base_url = %config.api.base_url, "Starting terminal viewer");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("Folio"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;

    let (load_tx, mut load_rx) = mpsc::unbounded_channel::<ProfileLoadResult>();
    let mut app = App::new(
        config.clone(),
        store,
        tracker,
        publisher,
        load_tx,
        (size.width, size.height),
    );
    app.request_load(false);

    let result = event_loop(&mut terminal, &mut app, &mut load_rx);

    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    load_rx: &mut mpsc::UnboundedReceiver<ProfileLoadResult>,
) -> Result<()> {
    let event_handler = EventHandler::new(
        app.config.ui.tick_rate_ms,
        app.animator.config().frame_interval(),
    );

    loop {
        // Process completed profile loads (non-blocking)
        while let Ok(result) = load_rx.try_recv() {
            app.handle_load_result(result);
        }

        app.on_frame(Instant::now());

        terminal.draw(|frame| widgets::draw(frame, app))?;

        match event_handler.next(app.needs_fast_update())? {
            Some(AppEvent::Key(key)) => {
                let action = handle_key_event(key);
                app.apply(action, Instant::now());
            }
            Some(AppEvent::Mouse(mouse)) => app.on_mouse(mouse, Instant::now()),
            Some(AppEvent::Resize(cols, rows)) => app.resize(cols, rows),
            Some(AppEvent::Tick) => app.tick(),
            None => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
