use anyhow::Result;

mod agent;
mod app;
mod config;
mod conversation;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = logging::init();

    let config = Config::load()?;
    tracing::info!(
        delay_min_ms = config.thinking_delay_min_ms,
        delay_max_ms = config.thinking_delay_max_ms,
        "starting session"
    );

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let mut app = App::new(config);
    let mut events = tui::EventHandler::new();
    let result = run(&mut terminal, &mut events, &mut app).await;

    tui::restore()?;
    result
}

async fn run(
    terminal: &mut tui::Tui,
    events: &mut tui::EventHandler,
    app: &mut App,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }
    tracing::info!(
        messages = app.conversation.messages().len(),
        "session ended"
    );
    Ok(())
}
