//! Common CLI utilities shared across all CLI commands.
//!
//! This module provides:
//! - `CliContext`: loaded config, tokio runtime and the shared bearer token
//! - Output helpers: `print_success`, `print_error`, `print_warning`, `print_info`
//! - Prompt helpers: `prompt_string`, `prompt_confirm`

use crate::api::{ApiClient, AuthApi, BookingsApi, TasksApi};
use crate::config::Config;
use crate::state::form::{FormController, FormSchema, RecordStore, SubmitError, Submitted};
use crate::state::notice::{NoticeLevel, Notices};
use crate::state::route::Route;
use crate::state::session::{Access, AuthSession, FileTokenStore, SharedToken};
use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::debug;

pub type Session = AuthSession<AuthApi, FileTokenStore>;

/// Shared context for CLI commands.
pub struct CliContext {
    pub config: Config,
    pub config_path: PathBuf,
    pub runtime: Runtime,
    /// Bearer token shared by the session and every client built here
    pub token: SharedToken,
}

impl CliContext {
    /// Load (or create) the configuration and start the runtime.
    pub fn load() -> Result<Self> {
        let config_path = crate::utils::get_config_path();
        let config =
            Config::load_or_create(&config_path).context("Failed to load configuration")?;
        config
            .validate()
            .with_context(|| format!("Invalid configuration in {:?}", config_path))?;
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;

        Ok(Self {
            config,
            config_path,
            runtime,
            token: SharedToken::new(),
        })
    }

    fn client(&self, base_url: &str) -> Result<ApiClient> {
        ApiClient::new(base_url, self.config.api.timeout(), self.token.clone())
            .with_context(|| format!("Cannot use API base URL {}", base_url))
    }

    pub fn bookings(&self) -> Result<BookingsApi> {
        Ok(BookingsApi::new(self.client(&self.config.api.bookings_url)?))
    }

    pub fn tasks(&self) -> Result<TasksApi> {
        Ok(TasksApi::new(self.client(&self.config.api.tasks_url)?))
    }

    pub fn session(&self) -> Result<Session> {
        let auth = AuthApi::new(
            self.client(&self.config.api.auth_url)?,
            self.client(&self.config.api.bookings_url)?,
        );
        let store = FileTokenStore::new(crate::utils::get_token_path());
        Ok(AuthSession::new(auth, store, self.token.clone()))
    }

    /// Hydrate the session and make sure it may open `route`.
    pub fn signed_in_session(&self, route: &Route) -> Result<Session> {
        let mut session = self.session()?;
        self.runtime.block_on(session.init());
        match session.guard(route) {
            Access::Granted => Ok(session),
            Access::Redirect(target) => {
                debug!("{} redirected to {}", route, target);
                bail!("Not signed in. Run 'frontdesk login' first.")
            }
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Print a success message with a checkmark prefix.
pub fn print_success(msg: &str) {
    println!("\u{2713} {}", msg);
}

/// Print an error message with an X prefix to stderr.
pub fn print_error(msg: &str) {
    eprintln!("\u{2717} {}", msg);
}

/// Print a warning message with a warning sign prefix.
pub fn print_warning(msg: &str) {
    println!("\u{26A0}\u{FE0F} {}", msg);
}

/// Print an info message with an info sign prefix.
pub fn print_info(msg: &str) {
    println!("\u{2139}\u{FE0F} {}", msg);
}

/// Print and consume the current notice. Returns whether it was an error.
pub fn print_notice(notices: &mut Notices) -> bool {
    let Some(notice) = notices.take() else {
        return false;
    };
    match notice.level {
        NoticeLevel::Success => print_success(&notice.message),
        NoticeLevel::Info => print_info(&notice.message),
        NoticeLevel::Warning => print_warning(&notice.message),
        NoticeLevel::Error => print_error(&notice.message),
    }
    notice.is_error()
}

// =============================================================================
// Prompt Helpers
// =============================================================================

/// Prompt the user for a string input with an optional default value.
pub fn prompt_string(label: &str, default: Option<&str>) -> Result<String> {
    if let Some(def) = default {
        print!("{} [{}]: ", label, def);
    } else {
        print!("{}: ", label);
    }
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read input")?;

    let trimmed = input.trim();
    if trimmed.is_empty() {
        Ok(default.unwrap_or("").to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Where a hidden line read stands after one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretInput {
    Pending,
    Done,
    Cancelled,
}

/// Apply one key press to a hidden line being typed.
pub fn apply_secret_key(buffer: &mut String, key: KeyEvent) -> SecretInput {
    match key.code {
        KeyCode::Enter => SecretInput::Done,
        KeyCode::Esc => SecretInput::Cancelled,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            SecretInput::Cancelled
        }
        KeyCode::Backspace => {
            buffer.pop();
            SecretInput::Pending
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            SecretInput::Pending
        }
        _ => SecretInput::Pending,
    }
}

/// Prompt for a password without echoing it.
///
/// Falls back to a plain line read when stdin is not a terminal.
pub fn prompt_password(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().context("Failed to flush stdout")?;

    if !io::stdin().is_terminal() {
        let mut input = String::new();
        io::stdin()
            .read_line(&mut input)
            .context("Failed to read input")?;
        return Ok(input.trim_end_matches(['\r', '\n']).to_string());
    }

    terminal::enable_raw_mode().context("Failed to enable raw mode")?;
    let outcome = read_secret_line();
    terminal::disable_raw_mode().context("Failed to disable raw mode")?;
    println!();

    match outcome? {
        (SecretInput::Cancelled, _) => bail!("Cancelled"),
        (_, secret) => Ok(secret),
    }
}

fn read_secret_line() -> Result<(SecretInput, String)> {
    let mut buffer = String::new();
    loop {
        let Event::Key(key) = event::read().context("Failed to read key")? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match apply_secret_key(&mut buffer, key) {
            SecretInput::Pending => {}
            done => return Ok((done, buffer)),
        }
    }
}

/// Use `value` when given on the command line, else prompt for it.
pub fn value_or_prompt(value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => prompt_string(label, None),
    }
}

/// Prompt the user for a yes/no confirmation.
pub fn prompt_confirm(message: &str) -> Result<bool> {
    print!("{} [y/N]: ", message);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read input")?;

    let trimmed = input.trim().to_lowercase();
    Ok(trimmed == "y" || trimmed == "yes")
}

/// Left-aligned text table for list output.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }
    let line = |cells: Vec<String>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    println!("{}", line(headers.iter().map(|h| h.to_string()).collect()));
    println!("{}", line(widths.iter().map(|w| "-".repeat(*w)).collect()));
    for row in rows {
        println!("{}", line(row.clone()));
    }
}

// =============================================================================
// Form Helpers
// =============================================================================

/// Apply `(path, raw)` pairs to a form in order.
pub fn fill_form<K: FormSchema, S: RecordStore>(
    form: &mut FormController<K, S>,
    assignments: &[(&str, &str)],
) -> Result<()> {
    for (path, raw) in assignments {
        form.set_field_str(path, raw)
            .with_context(|| format!("Invalid value for {}", path))?;
    }
    Ok(())
}

/// Submit a form and report the outcome.
pub fn submit_form<K: FormSchema, S: RecordStore>(
    runtime: &Runtime,
    form: &mut FormController<K, S>,
) -> Result<Submitted> {
    match runtime.block_on(form.submit()) {
        Ok(submitted) => {
            print_notice(form.notices_mut());
            Ok(submitted)
        }
        Err(SubmitError::Invalid(errors)) => {
            for (path, message) in &errors {
                let label = K::field(path).map_or(path.as_str(), |f| f.label);
                print_error(&format!("{}: {}", label, message));
            }
            bail!("{} not saved: fix the fields above", K::RECORD)
        }
        Err(SubmitError::Rejected(message)) => bail!(message),
    }
}
