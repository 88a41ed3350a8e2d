//! Command-line interface.
//!
//! Every operation of the list, form and session controllers is reachable
//! from a subcommand; `browse` opens the interactive list browser.

mod auth;
pub mod bookings;
mod common;
pub mod completions;
pub mod tasks;

pub use bookings::BookingsCommand;
pub use common::*;
pub use tasks::TasksCommand;

use crate::state::list::ListController;
use crate::state::route::Route;
use crate::tui::{BrowserApp, Tui};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use tracing::info;

/// Terminal client for the car-wash booking and task backends
#[derive(Parser, Debug)]
#[command(name = "frontdesk", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Disable colors in the browser (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_colors: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Request a password reset link
    ForgotPassword {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Car-wash bookings
    Bookings {
        #[command(subcommand)]
        command: BookingsCommand,
    },
    /// Personal tasks (requires login)
    Tasks {
        #[command(subcommand)]
        command: TasksCommand,
    },
    /// Browse a list interactively
    Browse {
        #[arg(value_enum, default_value_t = BrowseTarget::Bookings)]
        target: BrowseTarget,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate for (detected from $SHELL when omitted)
        shell: Option<Shell>,
    },
    /// Configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Shows logs location and how to view them
    Logs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseTarget {
    Bookings,
    Tasks,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,
    /// Print the effective configuration
    Show,
}

impl Cli {
    /// Execute the CLI command. No command opens the bookings browser.
    pub fn execute(self) -> Result<()> {
        let command = self.command.unwrap_or(Commands::Browse {
            target: BrowseTarget::Bookings,
        });

        // These need neither config nor network.
        match &command {
            Commands::Completions { shell } => return completions::generate(*shell),
            Commands::Logs => return cmd_logs(),
            _ => {}
        }

        let ctx = CliContext::load()?;
        match command {
            Commands::Login { email } => auth::cmd_login(&ctx, email),
            Commands::Register { email } => auth::cmd_register(&ctx, email),
            Commands::Logout => auth::cmd_logout(&ctx),
            Commands::Whoami => auth::cmd_whoami(&ctx),
            Commands::ForgotPassword { email } => auth::cmd_forgot_password(&ctx, email),
            Commands::Bookings { command } => bookings::execute(&ctx, command),
            Commands::Tasks { command } => tasks::execute(&ctx, command),
            Commands::Browse { target } => cmd_browse(&ctx, target),
            Commands::Config { command } => cmd_config(&ctx, command),
            Commands::Completions { .. } | Commands::Logs => Ok(()),
        }
    }
}

fn cmd_browse(ctx: &CliContext, target: BrowseTarget) -> Result<()> {
    info!("CLI: browse {:?}", target);
    let lists = &ctx.config.lists;
    let handle = ctx.runtime.handle().clone();

    match target {
        BrowseTarget::Bookings => {
            let controller = ListController::new(ctx.bookings()?, lists.bookings_page_size);
            let mut app = BrowserApp::new(
                controller,
                handle,
                lists.search_debounce(),
                lists.notice_ttl(),
            );
            app.run(&mut Tui::new()?)
        }
        BrowseTarget::Tasks => {
            let session = ctx.signed_in_session(&Route::Dashboard)?;
            let controller = ListController::new(ctx.tasks()?, lists.tasks_page_size);
            let mut app = BrowserApp::new(
                controller,
                handle,
                lists.search_debounce(),
                lists.notice_ttl(),
            )
            .with_user(session.user_id().map(str::to_string));
            app.run(&mut Tui::new()?)
        }
    }
}

fn cmd_config(ctx: &CliContext, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Path => println!("{}", ctx.config_path.display()),
        ConfigCommand::Show => {
            let content =
                toml::to_string_pretty(&ctx.config).context("Failed to serialize config")?;
            println!("# {}", ctx.config_path.display());
            print!("{}", content);
        }
    }
    Ok(())
}

fn cmd_logs() -> Result<()> {
    let log_file = crate::utils::get_log_dir().join("frontdesk.log");
    println!("Logs are written to: {}", log_file.display());
    println!("View logs in real-time: tail -f {}", log_file.display());
    println!("Raise verbosity with RUST_LOG=debug");
    Ok(())
}
