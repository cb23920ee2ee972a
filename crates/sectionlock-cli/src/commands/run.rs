use std::io;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use sectionlock_core::AppConfig;
use sectionlock_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    keymap::Keymap,
    ui::draw,
};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

pub async fn run(config: AppConfig) -> Result<()> {
    // Create keymap from config
    let keymap = Keymap::from_config(&config.keymap);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("sectionlock"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, config, &keymap).await;

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

async fn event_loop(terminal: &mut Term, config: AppConfig, keymap: &Keymap) -> Result<()> {
    let size = terminal.size()?;
    let mut events = EventHandler::new(config.ui.tick_rate_ms, config.ui.frame_interval());
    let mut app = App::new(config, size.width, size.height, Instant::now());
    info!(
        "Page ready: {} sections, preset {}",
        app.lock.sections().len(),
        app.config.general.preset.as_deref().unwrap_or("custom")
    );

    loop {
        let now = Instant::now();
        app.tick(now);
        terminal.draw(|frame| draw(frame, &app, now))?;

        // Use the frame rate while anything is moving
        let animating = app.needs_frames(Instant::now());
        let Some(event) = events.next(animating).await else {
            break;
        };

        let now = Instant::now();
        match event {
            AppEvent::Key(key) => {
                let action = handle_key_event(key, &app, keymap);
                app.handle_action(action, now);
            }
            AppEvent::Mouse(mouse) => app.handle_mouse(&mouse, now),
            AppEvent::Resize(width, height) => app.resize(width, height, now),
            AppEvent::Tick => {}
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
