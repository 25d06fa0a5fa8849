//! # Belt Display
//!
//! Terminal rendition of a baggage-belt screen. Polls the paging server, cycles
//! passenger pages and languages, and redraws whenever the frame changes.
//!
//! Type a belt number and press Enter to rebind the screen; an empty line
//! unbinds it, `q` quits.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use paging_common::display::{DisplayFrame, DisplayRuntime, FrameBody, RuntimeCommand};
use paging_common::loggers::setup_logging;
use paging_common::retrieve::PagingClient;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "belt-display",
    version,
    about = "Show passenger paging for one baggage belt"
)]
struct Args {
    /// Base URL of the paging server
    #[arg(long, env = "PAGING_SERVER_URL", default_value = "http://localhost:3000")]
    server_url: String,

    /// Shared API key
    #[arg(long, env = "PAGING_API_KEY", default_value = "rahasia")]
    api_key: String,

    /// Belt to show on start
    #[arg(long, env = "BELT_NO")]
    belt_no: Option<String>,

    /// Directory for the JSON log file
    #[arg(long, env = "BELT_DISPLAY_LOG_DIR", default_value = "logs")]
    log_dir: PathBuf,

    /// Log level filter, e.g. `info` or `paging_common=debug`
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Console output belongs to the screen, so logs only go to the file.
    let _guard = setup_logging("belt-display", &args.log_dir, &args.log_level, false)?;

    let client = PagingClient::new(&args.server_url, &args.api_key)
        .with_context(|| format!("Invalid server URL: {}", args.server_url))?;
    let belt_no = args.belt_no.filter(|b| !b.trim().is_empty());
    info!(server = %args.server_url, belt_no = ?belt_no, "Starting belt display");

    let (runtime, mut frames) = DisplayRuntime::new(Arc::new(client), belt_no);
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (shutdown_tx, _) = broadcast::channel(1);
    let runtime_task = tokio::spawn(runtime.run(cmd_rx, shutdown_tx.subscribe()));

    // Blocking stdin on its own thread; dropping the sender stops the runtime.
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.eq_ignore_ascii_case("q") {
                break;
            }
            let belt = (!line.is_empty()).then(|| line.to_string());
            if cmd_tx.blocking_send(RuntimeCommand::SetBelt(belt)).is_err() {
                break;
            }
        }
    });

    render(&frames.borrow_and_update());
    loop {
        tokio::select! {
            changed = frames.changed() => {
                if changed.is_err() {
                    break;
                }
                render(&frames.borrow_and_update());
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C received, stopping display");
                if shutdown_tx.send(()).is_err() {
                    warn!("Display runtime already stopped");
                }
                break;
            }
        }
    }

    runtime_task.await.context("Display runtime panicked")?;
    Ok(())
}

fn render(frame: &DisplayFrame) {
    let mut out = String::from("\x1B[2J\x1B[H");

    let belt = frame.belt_no.as_deref().unwrap_or("-");
    let airline = frame.airline_code.as_deref().unwrap_or("");
    out.push_str(&format!(
        "{}  {}  {}\n\n",
        format!("BELT {belt}").bold().white().on_blue(),
        airline.bold(),
        format!("{} | {:?}", frame.handle_by, frame.language).truecolor(128, 128, 128)
    ));

    if let Some(header) = &frame.header {
        out.push_str(&format!("{}\n{}\n{}\n\n", header.title.bold(), header.description, header.instruction.italic()));
    }

    match &frame.body {
        FrameBody::Passengers { names, page, total_pages } => {
            for name in names {
                out.push_str(&format!("  {}\n", name.bold().green()));
            }
            if *total_pages > 1 {
                out.push_str(&format!("\n  {}\n", format!("{}/{}", page + 1, total_pages).truecolor(128, 128, 128)));
            }
        }
        FrameBody::FreeText { text } => out.push_str(&format!("  {}\n", text.bold().yellow())),
        FrameBody::Fallback { lines } => {
            for line in lines {
                out.push_str(&format!("  {}\n", line.red()));
            }
        }
    }

    out.push_str(&format!("\n{}\n", frame.notice.dimmed()));

    let mut stdout = std::io::stdout().lock();
    // Ignore a closed terminal.
    let _ = stdout.write_all(out.as_bytes()).and_then(|_| stdout.flush());
}
