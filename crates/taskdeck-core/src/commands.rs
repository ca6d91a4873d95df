use std::io::{self, BufRead, Write};

use anyhow::{Context, anyhow};
use chrono::Utc;
use taskdeck_shared::TaskId;
use tracing::{debug, info, instrument};

use crate::api::TaskApi;
use crate::cli::{AddArgs, Command, EditArgs, ListArgs};
use crate::datetime;
use crate::filter::FilterSet;
use crate::modal::{CloseReason, DELETE_PROMPT, TaskForm};
use crate::render::{ConsoleRenderer, TaskView};
use crate::session::Session;

/// Where a destructive command asks for confirmation.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool>;
}

/// Answers every prompt the same way.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> anyhow::Result<bool> {
        Ok(self.0)
    }
}

/// Asks on stderr and reads a y/N answer from stdin.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool> {
        let mut err = io::stderr();
        write!(err, "{prompt} [y/N] ")?;
        err.flush()?;

        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("failed reading confirmation")?;
        Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}

#[instrument(skip(session, console, out, confirm))]
pub async fn dispatch<A, W, C>(
    session: &mut Session<A>,
    console: &ConsoleRenderer,
    out: &mut W,
    confirm: &mut C,
    command: Command,
) -> anyhow::Result<()>
where
    A: TaskApi,
    W: Write,
    C: Confirm,
{
    debug!(?command, "dispatching command");

    match command {
        Command::List(args) => cmd_list(session, console, out, args).await,
        Command::Show { id } => cmd_show(session, console, out, id).await,
        Command::Add(args) => cmd_add(session, out, args).await,
        Command::Edit(args) => cmd_edit(session, out, args).await,
        Command::Done { id } => cmd_toggle(session, out, id, true).await,
        Command::Undo { id } => cmd_toggle(session, out, id, false).await,
        Command::Delete { id, yes } => {
            if yes {
                cmd_delete(session, out, &mut AutoConfirm(true), id).await
            } else {
                cmd_delete(session, out, confirm, id).await
            }
        }
        Command::Categories => cmd_categories(session, out).await,
        Command::Stats => cmd_stats(session, out).await,
    }
}

async fn cmd_list<A: TaskApi, W: Write>(
    session: &mut Session<A>,
    console: &ConsoleRenderer,
    out: &mut W,
    args: ListArgs,
) -> anyhow::Result<()> {
    info!("command list");

    session.load_tasks().await?;
    session.set_filters(FilterSet {
        status: args.status.into(),
        priority: args.priority,
        category: args.category.filter(|c| !c.trim().is_empty()),
    });

    let view = session.board(Utc::now()).unwrap_or(TaskView::Empty);
    console.write_board(&mut *out, &view)?;
    if !view.is_empty() {
        writeln!(out)?;
        writeln!(out, "{} task(s).", view.len())?;
    }
    Ok(())
}

async fn cmd_show<A: TaskApi, W: Write>(
    session: &mut Session<A>,
    console: &ConsoleRenderer,
    out: &mut W,
    id: TaskId,
) -> anyhow::Result<()> {
    info!(task_id = id, "command show");

    let task = session
        .api()
        .get_task(id)
        .await
        .with_context(|| format!("failed to fetch task {id}"))?;
    let card = session.renderer().card(&task, Utc::now());
    console.write_card(out, &card)
}

async fn cmd_add<A: TaskApi, W: Write>(
    session: &mut Session<A>,
    out: &mut W,
    args: AddArgs,
) -> anyhow::Result<()> {
    info!("command add");

    let zone = session.renderer().zone();
    session.open_add();
    if let Some(form) = session.editor_mut().form_mut() {
        form.title = args.title;
        form.description = args.description.unwrap_or_default();
        form.category = args.category.unwrap_or_default();
        form.priority = args.priority.unwrap_or_default();
        form.due_date = args
            .due
            .map(|raw| due_input(&raw, zone))
            .unwrap_or_default();
    }

    let task = session.submit_editor().await?;
    writeln!(out, "Created task {}.", task.id)?;
    Ok(())
}

async fn cmd_edit<A: TaskApi, W: Write>(
    session: &mut Session<A>,
    out: &mut W,
    args: EditArgs,
) -> anyhow::Result<()> {
    info!(task_id = args.id, "command edit");

    session.load_tasks().await?;
    if !session.open_edit(args.id) {
        return Err(anyhow!("no task with id {}", args.id));
    }

    let zone = session.renderer().zone();
    if let Some(form) = session.editor_mut().form_mut() {
        apply_edits(form, &args, zone);
    }

    let task = session.submit_editor().await?;
    writeln!(out, "Modified task {}.", task.id)?;
    Ok(())
}

fn apply_edits(form: &mut TaskForm, args: &EditArgs, zone: datetime::ViewerZone) {
    if let Some(title) = &args.title {
        form.title = title.clone();
    }
    if let Some(description) = &args.description {
        form.description = description.clone();
    }
    if let Some(category) = &args.category {
        form.category = category.clone();
    }
    if let Some(priority) = args.priority {
        form.priority = priority;
    }
    if args.clear_due {
        form.due_date.clear();
    } else if let Some(raw) = &args.due {
        form.due_date = due_input(raw, zone);
    }
}

/// Command-line due dates in any accepted shape become editor input;
/// unreadable text is passed through so the editor rejects it.
fn due_input(raw: &str, zone: datetime::ViewerZone) -> String {
    datetime::normalize_input(raw, zone).unwrap_or_else(|| raw.to_string())
}

async fn cmd_toggle<A: TaskApi, W: Write>(
    session: &mut Session<A>,
    out: &mut W,
    id: TaskId,
    completed: bool,
) -> anyhow::Result<()> {
    info!(task_id = id, completed, "command done/undo");

    let task = session.toggle_complete(id, completed).await?;
    let verb = if task.completed { "Completed" } else { "Reopened" };
    writeln!(out, "{verb} task {}.", task.id)?;
    Ok(())
}

async fn cmd_delete<A, W, C>(
    session: &mut Session<A>,
    out: &mut W,
    confirm: &mut C,
    id: TaskId,
) -> anyhow::Result<()>
where
    A: TaskApi,
    W: Write,
    C: Confirm,
{
    info!(task_id = id, "command delete");

    session.request_delete(id);
    let prompt = session.confirm().message().unwrap_or(DELETE_PROMPT);
    if !confirm.confirm(prompt)? {
        session.cancel_delete(CloseReason::Dismissed);
        writeln!(out, "Deletion cancelled.")?;
        return Ok(());
    }

    if let Some(deleted) = session.confirm_delete().await? {
        writeln!(out, "Deleted task {deleted}.")?;
    }
    Ok(())
}

async fn cmd_categories<A: TaskApi, W: Write>(
    session: &mut Session<A>,
    out: &mut W,
) -> anyhow::Result<()> {
    session.load_categories().await?;
    for category in session.categories() {
        writeln!(out, "{category}")?;
    }
    Ok(())
}

async fn cmd_stats<A: TaskApi, W: Write>(
    session: &mut Session<A>,
    out: &mut W,
) -> anyhow::Result<()> {
    let stats = session.load_stats().await?;

    writeln!(out, "total           {}", stats.total)?;
    writeln!(out, "completed       {}", stats.completed)?;
    writeln!(out, "pending         {}", stats.pending)?;
    writeln!(out, "completion rate {:.1}%", stats.completion_rate)?;

    if !stats.priority_stats.is_empty() {
        writeln!(out)?;
        writeln!(out, "by priority")?;
        for (priority, count) in &stats.priority_stats {
            writeln!(out, "  {priority:<12} {count}")?;
        }
    }

    if !stats.category_stats.is_empty() {
        writeln!(out)?;
        writeln!(out, "by category")?;
        for (category, count) in &stats.category_stats {
            writeln!(out, "  {category:<12} {count}")?;
        }
    }
    Ok(())
}
