use std::process::ExitCode;

use today_board::config::Config;
use today_board::config::settings::DEFAULT_LOG_LEVEL;
use today_board::logging;
use today_board::service::TrelloClient;
use today_board::ui::GlyphFont;

fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            logging::init(DEFAULT_LOG_LEVEL);
            tracing::error!(error = %err, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.log_level);
    tracing::info!(
        list = %config.credentials.list_id,
        api = %config.api_base,
        font = %config.font_path.display(),
        "Starting today board"
    );

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Exiting");
            ExitCode::FAILURE
        }
    }
}

#[cfg(windows)]
fn run(config: &Config) -> today_board::Result<()> {
    use today_board::app::{self, App, AppContext};
    use today_board::platform::{DisplaySurface, FullscreenWindow};

    let font = GlyphFont::from_file(&config.font_path, config.font_size)?;
    let service = TrelloClient::new(&config.api_base, config.credentials.clone())?;

    let mut surface = FullscreenWindow::open()?;
    let (width, height) = surface.size();
    let ctx = AppContext::new(width, height, Box::new(font));
    let mut app = App::new(ctx, service)?;

    app::run(&mut app, &mut surface, config.tick_rate)
}

#[cfg(not(windows))]
fn run(config: &Config) -> today_board::Result<()> {
    // Surface font and client problems before reporting the missing display
    GlyphFont::from_file(&config.font_path, config.font_size)?;
    TrelloClient::new(&config.api_base, config.credentials.clone())?;
    Err(today_board::AppError::NoDisplayBackend)
}
