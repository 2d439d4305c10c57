use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

use term_dock::app::{DemoApp, DemoOptions};
use term_dock::config::FocusTrackingConfig;
use term_dock::constants::{DEFAULT_DOCUMENT_COUNT, POLL_INTERVAL};
use term_dock::drivers::console::{ConsoleInputDriver, ConsoleSession};
use term_dock::runner::run_dock_app;
use term_dock::tracing_sub::{self, SubscriberMakeWriter};

#[derive(Parser, Debug)]
#[command(
    name = "term-dock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Docking layout demo that tracks the active pane, document and recent contents"
)]
struct Cli {
    /// Run without the focus hook; no pane ever becomes active.
    #[arg(long)]
    no_focus_hook: bool,

    /// Documents to open at startup.
    #[arg(short = 'd', long, value_name = "COUNT", default_value_t = DEFAULT_DOCUMENT_COUNT)]
    documents: usize,

    /// Append tracing output to this file. Nothing is logged without it.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Most verbose level written to the log file.
    #[arg(long, value_name = "LEVEL", default_value_t = Level::DEBUG)]
    log_level: Level,
}

impl Cli {
    fn options(&self) -> DemoOptions {
        let focus = if self.no_focus_hook {
            FocusTrackingConfig::without_focus_hook()
        } else {
            FocusTrackingConfig::default()
        };
        DemoOptions {
            documents: self.documents,
            focus,
        }
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        tracing_sub::init(SubscriberMakeWriter::file(path)?, cli.log_level);
    }

    let mut app = DemoApp::new(cli.options()).map_err(io::Error::other)?;
    let mut session = ConsoleSession::new()?;
    session.enter()?;
    let mut driver = ConsoleInputDriver::new();
    let result = run_dock_app(session.terminal_mut(), &mut driver, &mut app, POLL_INTERVAL);
    session.exit()?;
    result
}
