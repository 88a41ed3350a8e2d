//! Task CLI commands. Every one of them needs a signed-in user.

use crate::cli::common::{
    fill_form, print_info, print_notice, print_success, print_table, prompt_confirm, submit_form,
    CliContext,
};
use crate::models::{Task, TaskStats, TaskStatus};
use crate::state::filters::{StatusFilter, TaskFilterPatch};
use crate::state::form::{FormController, RecordStore, Submitted, TaskSchema};
use crate::state::list::{ListController, ListSource};
use crate::state::route::Route;
use anyhow::{bail, Context, Result};
use clap::Subcommand;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum TasksCommand {
    /// List your tasks
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Tasks per page (defaults to the configured page size)
        #[arg(short, long)]
        limit: Option<u32>,
        /// pending, done or all
        #[arg(short, long, default_value = "all")]
        status: StatusFilter<TaskStatus>,
        /// Search title and description
        #[arg(short = 'q', long)]
        search: Option<String>,
    },
    /// Create a task
    Create {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        status: Option<TaskStatus>,
    },
    /// Edit a task; only the given fields change
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        status: Option<TaskStatus>,
    },
    /// Delete a task
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Completed and pending counts for the first page
    Stats,
}

pub fn execute(ctx: &CliContext, command: TasksCommand) -> Result<()> {
    match command {
        TasksCommand::List {
            page,
            limit,
            status,
            search,
        } => {
            ctx.signed_in_session(&Route::Dashboard)?;
            cmd_list(ctx, page, limit, status, search)
        }
        TasksCommand::Create {
            title,
            description,
            status,
        } => {
            ctx.signed_in_session(&Route::NewTask)?;
            cmd_save(ctx, None, Some(title), description, status)
        }
        TasksCommand::Edit {
            id,
            title,
            description,
            status,
        } => {
            ctx.signed_in_session(&Route::EditTask(id.clone()))?;
            cmd_save(ctx, Some(&id), title, description, status)
        }
        TasksCommand::Delete { id, yes } => {
            let session = ctx.signed_in_session(&Route::Dashboard)?;
            cmd_delete(ctx, &id, session.user_id(), yes)
        }
        TasksCommand::Stats => {
            ctx.signed_in_session(&Route::Dashboard)?;
            cmd_stats(ctx)
        }
    }
}

fn cmd_list(
    ctx: &CliContext,
    page: u32,
    limit: Option<u32>,
    status: StatusFilter<TaskStatus>,
    search: Option<String>,
) -> Result<()> {
    let limit = limit.unwrap_or(ctx.config.lists.tasks_page_size);
    let mut list = ListController::new(ctx.tasks()?, limit);
    list.set_filter(TaskFilterPatch {
        status: Some(status),
        search,
    });

    ctx.runtime.block_on(list.refresh());
    list.set_page(page);
    if list.is_stale() {
        ctx.runtime.block_on(list.refresh());
    }
    if print_notice(list.notices_mut()) {
        bail!("Could not list tasks");
    }

    if list.items().is_empty() {
        print_info(&list.empty_message());
        return Ok(());
    }
    let rows: Vec<Vec<String>> = list.items().iter().map(task_row).collect();
    print_table(&["ID", "Title", "Status", "Description"], &rows);
    println!(
        "\nPage {}/{} ({} tasks)",
        list.page(),
        list.total_pages(),
        list.total_items()
    );
    Ok(())
}

fn task_row(task: &Task) -> Vec<String> {
    vec![
        task.id.clone(),
        task.title.clone(),
        task.status.to_string(),
        task.description.clone(),
    ]
}

fn cmd_save(
    ctx: &CliContext,
    id: Option<&str>,
    title: Option<String>,
    description: Option<String>,
    status: Option<TaskStatus>,
) -> Result<()> {
    let api = ctx.tasks()?;
    let mut form = match id {
        Some(id) => {
            let mut form = FormController::<TaskSchema, _>::edit(api, id);
            if ctx.runtime.block_on(form.load()).is_err() {
                print_notice(form.notices_mut());
                bail!("Could not load task {}", id);
            }
            form
        }
        None => FormController::<TaskSchema, _>::create(api),
    };

    let status = status.map(|s| s.to_string());
    let assignments: Vec<(&str, &str)> = [
        ("title", title.as_deref()),
        ("description", description.as_deref()),
        ("status", status.as_deref()),
    ]
    .into_iter()
    .filter_map(|(path, value)| value.map(|v| (path, v)))
    .collect();
    fill_form(&mut form, &assignments)?;

    if let Submitted::Created { id: Some(id) } = submit_form(&ctx.runtime, &mut form)? {
        info!("Created task {}", id);
        println!("  id: {}", id);
    }
    Ok(())
}

/// Refuse to touch a task the user did not create.
fn ensure_owner(task: &Task, user_id: Option<&str>) -> Result<()> {
    if !task.is_owned_by(user_id) {
        bail!("Only the creator can delete this task");
    }
    Ok(())
}

fn cmd_delete(ctx: &CliContext, id: &str, user_id: Option<&str>, yes: bool) -> Result<()> {
    let api = ctx.tasks()?;
    let record = ctx.runtime.block_on(api.fetch_record(id))?;
    let task: Task = serde_json::from_value(record).context("Unexpected task format")?;
    ensure_owner(&task, user_id)?;

    if !yes && !prompt_confirm(&format!("Are you sure you want to delete \"{}\"?", task.title))? {
        print_info("Cancelled");
        return Ok(());
    }
    ctx.runtime.block_on(api.delete(id))?;
    print_success("Task deleted successfully");
    Ok(())
}

fn cmd_stats(ctx: &CliContext) -> Result<()> {
    let mut list = ListController::new(ctx.tasks()?, ctx.config.lists.tasks_page_size);
    ctx.runtime.block_on(list.refresh());
    if print_notice(list.notices_mut()) {
        bail!("Could not load tasks");
    }

    let stats = TaskStats::from_page(list.items(), list.total_items());
    println!("Total tasks:     {}", stats.total);
    println!("Completed:       {}", stats.completed);
    println!("Pending:         {}", stats.pending);
    println!("Completion rate: {}%", stats.completion_rate());
    Ok(())
}
