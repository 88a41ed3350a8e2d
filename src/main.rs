use anyhow::Result;
use clap::Parser;
use frontdesk::cli::Cli;
use frontdesk::styles::{init_theme, ThemeType};
use frontdesk::tui::install_panic_hook;
use frontdesk::utils::get_log_dir;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Restore the terminal if the browser panics
    install_panic_hook();

    let log_dir = get_log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Write to file so log lines never land on the browser's screen
    let file_appender = tracing_appender::rolling::never(&log_dir, "frontdesk.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let theme_type = if cli.no_colors {
        ThemeType::NoColor
    } else {
        ThemeType::from_env()
    };
    init_theme(theme_type);

    let result = cli.execute();

    drop(guard);
    result
}
