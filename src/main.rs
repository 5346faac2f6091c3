use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;

use vitrine::app::App;
use vitrine::config::{Config, SourceKind};
use vitrine::logging;
use vitrine::ui::thumbnails::ThumbnailCache;

#[derive(Debug, Default)]
struct Args {
    config_path: Option<PathBuf>,
    source: Option<SourceKind>,
    endpoint: Option<String>,
    count: Option<usize>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args::default();

    // Optional value following a flag, if it does not look like another flag
    let value_at = |i: usize| args.get(i).filter(|a| !a.starts_with('-')).cloned();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("vitrine {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--config" | "-c" => match value_at(i + 1) {
                Some(path) => {
                    parsed.config_path = Some(PathBuf::from(path));
                    i += 1;
                }
                None => {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
            },
            "--remote" => {
                parsed.source = Some(SourceKind::Remote);
                if let Some(url) = value_at(i + 1) {
                    parsed.endpoint = Some(url);
                    i += 1;
                }
            }
            "--synthetic" => {
                parsed.source = Some(SourceKind::Synthetic);
                if let Some(count) = value_at(i + 1) {
                    match count.parse() {
                        Ok(n) => parsed.count = Some(n),
                        Err(_) => {
                            eprintln!("Error: --synthetic expects a number, got {}", count);
                            std::process::exit(1);
                        }
                    }
                    i += 1;
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    parsed
}

fn print_help() {
    println!(
        r#"vitrine - TUI image gallery

USAGE:
    vitrine [OPTIONS]

OPTIONS:
    --config, -c PATH   Path to config file
    --remote [URL]      Fetch the image list from URL (default: config endpoint)
    --synthetic [N]     Generate N placeholder images (default: config count)
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    VITRINE_CONFIG      Path to config file (overrides default location)
    VITRINE_LOG         Log level (trace, debug, info, warn, error)

Config file location: $XDG_CONFIG_HOME/vitrine/config.toml"#
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args();

    // Initialize logging (uses journald on Linux, file fallback otherwise)
    if let Err(e) = logging::init(Some(logging::default_log_dir())) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    // Load configuration
    let mut config = match args.config_path {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };
    if let Some(kind) = args.source {
        config.source.kind = kind;
    }
    if let Some(endpoint) = args.endpoint {
        config.source.endpoint = endpoint;
    }
    if let Some(count) = args.count {
        config.source.count = count;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Protocol detection talks to the terminal, so it needs raw mode
    let thumbnails = ThumbnailCache::new(&config.preview);

    let mut app = App::new(config, thumbnails);
    app.mount();
    let result = app.run(&mut terminal).await;

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
