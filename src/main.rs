//! Study Reminders MCP Server - Main Entry Point
//!
//! This is the main entry point for the study reminders MCP server.
//! The actual implementation is in the `study_reminders` library.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use mcp_attr::server::serve_stdio;
use study_reminders::{StudyReminderHandler, UserProfile};

/// Study Reminders MCP Server - study session and quiz reminders via Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the reminders data file
    file: String,

    /// Start signed in as this user ID
    #[arg(long)]
    user: Option<String>,

    /// Display name for --user
    #[arg(long, requires = "user")]
    name: Option<String>,

    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Install the log subscriber
///
/// Logs go to stderr; stdout carries the MCP protocol.
fn setup_logging(verbosity: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        // No arguments provided, show help and exit with error code
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    let args = Args::parse();
    setup_logging(args.verbose);

    let user = args.user.map(|uid| UserProfile::new(uid, args.name));
    let handler = StudyReminderHandler::new(&args.file, user)?;
    tracing::info!("Serving reminders from {}", args.file);
    serve_stdio(handler).await?;
    Ok(())
}
