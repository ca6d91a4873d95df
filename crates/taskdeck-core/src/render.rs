use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};

use anyhow::Context;
use chrono::{DateTime, Utc};
use taskdeck_shared::{Priority, Task, TaskId};
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::datetime::{self, ViewerZone};
use crate::notify::Toast;

pub const NO_DUE_DATE: &str = "No due date";
pub const NO_DESCRIPTION: &str = "No description";
pub const EMPTY_BOARD: &str = "No tasks found";

/// Replace HTML-significant characters with entities.
///
/// Borrows when there is nothing to escape.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text
        .chars()
        .any(|ch| matches!(ch, '&' | '<' | '>' | '"' | '\''))
    {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// User text prepared for both kinds of surface.
///
/// `markup` is safe to splice into HTML; `plain` has control
/// characters removed so it cannot drive a terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeText {
    markup: String,
    plain: String,
}

impl SafeText {
    pub fn new(text: &str) -> Self {
        Self {
            markup: escape_html(text).into_owned(),
            plain: text
                .chars()
                .filter(|ch| !ch.is_control() || *ch == '\n')
                .collect(),
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn plain(&self) -> &str {
        &self.plain
    }
}

impl fmt::Display for SafeText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.markup)
    }
}

/// The complete/undo button of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleAction {
    pub label: &'static str,
    pub icon: &'static str,
    pub button_class: &'static str,
    /// Value `completed` is set to when pressed.
    pub set_completed: bool,
}

impl ToggleAction {
    fn for_task(completed: bool) -> Self {
        if completed {
            Self {
                label: "Undo",
                icon: "undo",
                button_class: "btn-secondary",
                set_completed: false,
            }
        } else {
            Self {
                label: "Complete",
                icon: "check",
                button_class: "btn-success",
                set_completed: true,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCard {
    pub id: TaskId,
    pub title: SafeText,
    pub description: SafeText,
    pub has_description: bool,
    pub category: SafeText,
    pub priority: Priority,
    pub completed: bool,
    pub overdue: bool,
    pub due_label: String,
    pub toggle: ToggleAction,
}

impl TaskCard {
    pub fn card_class(&self) -> String {
        let mut class = String::from("task-card");
        if self.completed {
            class.push_str(" completed");
        }
        if self.overdue {
            class.push_str(" overdue");
        }
        class
    }

    pub fn due_class(&self) -> &'static str {
        if self.overdue {
            "task-due-date overdue"
        } else {
            "task-due-date"
        }
    }

    pub fn priority_class(&self) -> String {
        format!("task-priority {}", self.priority.css_class())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskView {
    Empty,
    Cards(Vec<TaskCard>),
}

impl TaskView {
    pub fn len(&self) -> usize {
        match self {
            TaskView::Empty => 0,
            TaskView::Cards(cards) => cards.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TaskView::Empty)
    }
}

/// Overdue means a due date strictly in the past on an open task.
pub fn is_overdue(task: &Task, now: DateTime<Utc>, zone: ViewerZone) -> bool {
    if task.completed {
        return false;
    }

    task.due_date
        .as_deref()
        .and_then(|raw| datetime::parse_due(raw, zone))
        .is_some_and(|due| due < now)
}

/// Pure projection of tasks into display cards.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRenderer {
    zone: ViewerZone,
    date_format: String,
}

impl Default for CardRenderer {
    fn default() -> Self {
        Self::new(ViewerZone::Local, datetime::DEFAULT_DISPLAY_FORMAT)
    }
}

impl CardRenderer {
    pub fn new(zone: ViewerZone, date_format: impl Into<String>) -> Self {
        Self {
            zone,
            date_format: date_format.into(),
        }
    }

    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let zone = cfg.zone()?;
        let date_format = cfg.date_format();
        datetime::check_format(&date_format).context("bad date.format setting")?;
        Ok(Self::new(zone, date_format))
    }

    pub fn zone(&self) -> ViewerZone {
        self.zone
    }

    pub fn card(&self, task: &Task, now: DateTime<Utc>) -> TaskCard {
        let due_label = match task.due_date.as_deref() {
            Some(raw) if !raw.trim().is_empty() => {
                datetime::display_due(raw, self.zone, &self.date_format)
            }
            _ => NO_DUE_DATE.to_string(),
        };

        let description = task.description_text();

        TaskCard {
            id: task.id,
            title: SafeText::new(&task.title),
            description: SafeText::new(description.unwrap_or(NO_DESCRIPTION)),
            has_description: description.is_some(),
            category: SafeText::new(&task.category),
            priority: task.priority,
            completed: task.completed,
            overdue: is_overdue(task, now, self.zone),
            due_label,
            toggle: ToggleAction::for_task(task.completed),
        }
    }

    #[tracing::instrument(skip(self, tasks, now))]
    pub fn render<'a, I>(&self, tasks: I, now: DateTime<Utc>) -> TaskView
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let cards: Vec<TaskCard> = tasks.into_iter().map(|task| self.card(task, now)).collect();
        if cards.is_empty() {
            TaskView::Empty
        } else {
            TaskView::Cards(cards)
        }
    }
}

/// Terminal output for the CLI.
#[derive(Debug, Clone)]
pub struct ConsoleRenderer {
    color: bool,
}

impl ConsoleRenderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn from_config(cfg: &Config, is_terminal: bool) -> anyhow::Result<Self> {
        Ok(Self::new(cfg.color()? && is_terminal))
    }

    pub fn write_board<W: Write>(&self, mut out: W, view: &TaskView) -> anyhow::Result<()> {
        let cards = match view {
            TaskView::Empty => {
                writeln!(out, "{EMPTY_BOARD}")?;
                return Ok(());
            }
            TaskView::Cards(cards) => cards,
        };

        let headers = vec![
            "ID".to_string(),
            "Status".to_string(),
            "Priority".to_string(),
            "Category".to_string(),
            "Due".to_string(),
            "Title".to_string(),
        ];

        let rows = cards
            .iter()
            .map(|card| {
                let status = if card.completed { "done" } else { "open" };
                let due = if card.overdue {
                    self.paint(&card.due_label, "31")
                } else {
                    card.due_label.clone()
                };
                let priority = match card.priority {
                    Priority::High => self.paint(card.priority.as_str(), "33"),
                    _ => card.priority.to_string(),
                };
                vec![
                    self.paint(&card.id.to_string(), "33"),
                    status.to_string(),
                    priority,
                    card.category.plain().to_string(),
                    due,
                    card.title.plain().to_string(),
                ]
            })
            .collect();

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    pub fn write_card<W: Write>(&self, mut out: W, card: &TaskCard) -> anyhow::Result<()> {
        writeln!(out, "id          {}", card.id)?;
        writeln!(out, "title       {}", card.title.plain())?;
        writeln!(out, "description {}", card.description.plain())?;
        writeln!(out, "category    {}", card.category.plain())?;
        writeln!(out, "priority    {}", card.priority)?;
        writeln!(
            out,
            "status      {}",
            if card.completed { "completed" } else { "pending" }
        )?;
        let due = if card.overdue {
            format!("{} (overdue)", card.due_label)
        } else {
            card.due_label.clone()
        };
        writeln!(out, "due         {due}")?;
        Ok(())
    }

    pub fn write_toasts<'a, W, I>(&self, mut out: W, toasts: I) -> io::Result<()>
    where
        W: Write,
        I: IntoIterator<Item = &'a Toast>,
    {
        for toast in toasts {
            let marker = self.paint(toast.kind.marker(), toast.kind.ansi_code());
            writeln!(out, "{marker} {}", toast.message)?;
        }
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> io::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for (header, width) in headers.iter().zip(&widths) {
        write!(writer, "{header:width$} ", width = *width)?;
    }
    writeln!(writer)?;

    for width in &widths {
        write!(writer, "{:-<width$} ", "", width = *width)?;
    }
    writeln!(writer)?;

    for row in rows {
        for (cell, width) in row.iter().zip(&widths) {
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = width.saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
