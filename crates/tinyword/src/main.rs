mod action;
mod config;
mod editor;
mod layout;
mod panic;
mod theme;
mod toolbar;
mod utils;

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tinyword_core::Document;
use tinyword_term::buffer::Buffer;
use tinyword_term::draw_buffer::draw_diff;
use tinyword_term::platform::{Events, PlatformTerminal, Terminal, Writer};
use tinyword_term::units::OffsetU16;

use crate::config::Config;
use crate::editor::Editor;

const FRAME_RATE: Duration = Duration::from_millis(17);

/// A tiny styled-text editor.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// Config file to use instead of the default one.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the log.
    #[arg(long, default_value = "tinyword.log")]
    log_file: PathBuf,

    /// Log level, overriding the config file.
    #[arg(long)]
    log_level: Option<log::LevelFilter>,

    /// Start with an empty document instead of the demo text.
    #[arg(long)]
    empty: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("couldn't load config")?;
    init_logging(&cli.log_file, cli.log_level.unwrap_or(config.log_level))?;

    log::info!("starting with {config:?}");

    let empty = cli.empty;
    panic::catch_and_reprint_panic(move || {
        let document = if empty {
            Document::new()
        } else {
            Document::demo()
        };

        run(Editor::new(document, &config))
    })
    .context("panicked")??;

    log::info!("exiting");

    Ok(())
}

fn init_logging(path: &Path, level: log::LevelFilter) -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            let now = chrono::Local::now();

            out.finish(format_args!(
                "[{} {} {}] {}",
                now.format("%Y/%m/%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(
            fern::log_file(path)
                .with_context(|| format!("couldn't open log file {}", path.display()))?,
        )
        .apply()?;

    Ok(())
}

fn run(mut editor: Editor) -> Result<()> {
    let mut terminal = PlatformTerminal::init().context("couldn't set up terminal")?;

    let mut prev = Buffer::new(OffsetU16::ZERO);
    let mut next = Buffer::new(terminal.size()?);
    let mut dirty = true;

    loop {
        let size = terminal.size()?;
        if size != prev.size() {
            log::debug!("terminal size: {size:?}");
            dirty = true;
        }

        if dirty {
            next.resize_and_clear(size);
            editor.draw(&mut next);

            draw_diff(&prev, &next, terminal.writer());
            terminal.writer().flush()?;

            prev.clone_from(&next);
            dirty = false;
        }

        let deadline = Instant::now() + FRAME_RATE;

        if let Some(event) = terminal.events().read_with_deadline(deadline)? {
            log::trace!("event: {event:?}");

            if let ControlFlow::Break(()) = editor.handle_event(event) {
                return Ok(());
            }

            // Selection, status and scrolling can change without touching
            // the document.
            dirty = true;
        }

        if editor.drain_changes() > 0 {
            dirty = true;
        }
    }
}
