use anyhow::Result;
use clap::{Arg, Command};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crew_voucher_tui::api::{ApiClient, BASE_URL_ENV};
use crew_voucher_tui::app::App;
use crew_voucher_tui::ui::run_app;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("Crew Voucher Generator")
        .version("0.1.0")
        .about("Interactive crew voucher and seat assignment client")
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .value_name("URL")
                .help(format!(
                    "Backend API base URL (overrides the {} environment variable)",
                    BASE_URL_ENV
                )),
        )
        .get_matches();

    let api = match matches.get_one::<String>("endpoint") {
        Some(url) => ApiClient::new(url.clone()),
        None => ApiClient::from_env(),
    };

    run_tui_app(api).await?;

    Ok(())
}

async fn run_tui_app(api: ApiClient) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run it
    let app = App::new(Box::new(api));
    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}
