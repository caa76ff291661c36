//! Command dispatch: turns parsed arguments into controller calls and
//! renders the resulting projections.

use crate::cli::{BoundsAction, Cli, Commands, FilterArg, PinAction, ThemeAction};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::cell::Cell;
use std::rc::Rc;
use tasklet_core::db::open_db;
use tasklet_core::{
    format_relative, init_logging, ConfigOverrides, PreferencesService, SettingsStore,
    SqliteSettingsStore, Task, TaskCounts, TaskFilter, TaskId, TaskListChange,
    TaskListController, Theme, WidgetConfig, WindowBounds,
};
use uuid::Uuid;

const MIN_ID_PREFIX_LEN: usize = 4;
const SHORT_ID_LEN: usize = 8;

/// Runs one CLI invocation against the configured settings database.
pub fn run(cli: Cli) -> Result<(), String> {
    let log_level = if cli.dev {
        Some("debug".to_string())
    } else {
        cli.log_level
    };
    let config = WidgetConfig::resolve(ConfigOverrides {
        home: cli.home,
        log_level,
        namespace: None,
    })
    .map_err(|err| err.to_string())?;

    if let Err(err) = init_logging(&config.log_level, &config.log_dir()) {
        eprintln!("tasklet: logging disabled: {err}");
    }
    info!(
        "event=cli_start module=cli status=ok dev={} home={}",
        cli.dev,
        config.home.display()
    );

    let conn = open_db(config.db_path())
        .map_err(|err| format!("cannot open settings database: {err}"))?;
    let store = SqliteSettingsStore::try_new(&conn, &config.namespace)
        .map_err(|err| format!("cannot open settings store: {err}"))?;

    for line in execute(cli.command, &store)? {
        println!("{line}");
    }
    Ok(())
}

/// Executes `command` against `store` and returns the lines to print.
pub fn execute<S: SettingsStore>(command: Commands, store: &S) -> Result<Vec<String>, String> {
    match command {
        Commands::Add { text } => {
            let text = text.join(" ");
            if text.trim().is_empty() {
                return Err("task text must not be empty".to_string());
            }
            let (mut tasks, persisted) = open_tracked(store);
            let task = tasks.add(&text).map_err(|err| err.to_string())?;
            retry_unpersisted(&tasks, &persisted);
            Ok(vec![
                format!("Added {}: {}", short_id(task.id), task.text),
                tasks.counts().summary_label(),
            ])
        }
        Commands::List { filter } => {
            let tasks = TaskListController::open(store);
            Ok(render_list(tasks.tasks(), filter.into(), Utc::now()))
        }
        Commands::Toggle { task } => {
            let (mut tasks, persisted) = open_tracked(store);
            let id = resolve_task_ref(tasks.tasks(), &task)?;
            let updated = tasks
                .toggle(id)
                .ok_or_else(|| format!("no task matches `{task}`"))?;
            retry_unpersisted(&tasks, &persisted);
            let state = if updated.completed { "Completed" } else { "Reopened" };
            Ok(vec![
                format!("{state}: {}", updated.text),
                tasks.counts().summary_label(),
            ])
        }
        Commands::Delete { task } => {
            let (mut tasks, persisted) = open_tracked(store);
            let id = resolve_task_ref(tasks.tasks(), &task)?;
            let text = tasks.get(id).map(|found| found.text.clone());
            if !tasks.delete(id) {
                return Err(format!("no task matches `{task}`"));
            }
            retry_unpersisted(&tasks, &persisted);
            Ok(vec![
                format!("Deleted: {}", text.unwrap_or_default()),
                tasks.counts().summary_label(),
            ])
        }
        Commands::ClearCompleted => {
            let (mut tasks, persisted) = open_tracked(store);
            let removed = tasks.clear_completed();
            retry_unpersisted(&tasks, &persisted);
            let noun = if removed == 1 { "task" } else { "tasks" };
            Ok(vec![
                format!("Cleared {removed} completed {noun}"),
                tasks.counts().summary_label(),
            ])
        }
        Commands::Counts => {
            let counts = TaskListController::open(store).counts();
            Ok(vec![format!(
                "total={} completed={} remaining={}",
                counts.total, counts.completed, counts.remaining
            )])
        }
        Commands::Theme { action } => {
            let preferences = PreferencesService::new(store);
            let theme = match action {
                ThemeAction::Show => preferences.theme(),
                ThemeAction::Toggle => preferences.toggle_theme(),
                ThemeAction::Dark => set_theme(&preferences, Theme::Dark),
                ThemeAction::Light => set_theme(&preferences, Theme::Light),
            };
            Ok(vec![format!("theme: {}", theme.as_str())])
        }
        Commands::Pin { action } => {
            let preferences = PreferencesService::new(store);
            let pinned = match action {
                PinAction::Show => preferences.always_on_top(),
                PinAction::Toggle => preferences.toggle_always_on_top(),
                PinAction::On => set_pin(&preferences, true),
                PinAction::Off => set_pin(&preferences, false),
            };
            let state = if pinned { "enabled" } else { "disabled" };
            Ok(vec![format!("always on top: {state}")])
        }
        Commands::Bounds { action } => {
            let preferences = PreferencesService::new(store);
            let bounds = match action {
                BoundsAction::Show => preferences.window_bounds(),
                BoundsAction::Set {
                    width,
                    height,
                    x,
                    y,
                } => preferences.save_window_bounds(WindowBounds {
                    width,
                    height,
                    x,
                    y,
                }),
            };
            Ok(vec![format!(
                "window: {}x{} at ({}, {})",
                bounds.width, bounds.height, bounds.x, bounds.y
            )])
        }
    }
}

impl From<FilterArg> for TaskFilter {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::All => Self::All,
            FilterArg::Active => Self::Active,
            FilterArg::Completed => Self::Completed,
        }
    }
}

fn set_theme<S: SettingsStore>(preferences: &PreferencesService<S>, theme: Theme) -> Theme {
    preferences.set_theme(theme);
    theme
}

fn set_pin<S: SettingsStore>(preferences: &PreferencesService<S>, enabled: bool) -> bool {
    preferences.set_always_on_top(enabled);
    enabled
}

/// Opens the list and tracks whether the last applied change reached the store.
fn open_tracked<S: SettingsStore>(store: S) -> (TaskListController<S>, Rc<Cell<bool>>) {
    let persisted = Rc::new(Cell::new(true));
    let sink = Rc::clone(&persisted);
    let mut tasks = TaskListController::open(store);
    tasks.subscribe(move |event| {
        if !matches!(event.change, TaskListChange::Loaded { .. }) {
            sink.set(event.persisted);
        }
    });
    (tasks, persisted)
}

/// Mutations already write the snapshot; only a failed write is retried on exit.
fn retry_unpersisted<S: SettingsStore>(tasks: &TaskListController<S>, persisted: &Cell<bool>) {
    if persisted.get() {
        return;
    }
    if !tasks.flush() {
        warn!("event=cli_exit module=cli status=error error_code=snapshot_not_persisted");
    }
}

/// Resolves a 1-based position, full id, or unique id prefix to a task id.
///
/// A number outside the list range is retried as an id prefix, since short
/// ids can be all digits.
pub fn resolve_task_ref(tasks: &[Task], reference: &str) -> Result<TaskId, String> {
    let reference = reference.trim();
    if let Ok(position) = reference.parse::<usize>() {
        if (1..=tasks.len()).contains(&position) {
            return Ok(tasks[position - 1].id);
        }
        if reference.len() < MIN_ID_PREFIX_LEN {
            return Err(format!("no task at position {position}"));
        }
    }
    if let Ok(id) = Uuid::parse_str(reference) {
        return Ok(id);
    }
    if reference.len() < MIN_ID_PREFIX_LEN {
        return Err(format!(
            "`{reference}` is neither a position nor an id prefix of at least {MIN_ID_PREFIX_LEN} characters"
        ));
    }

    let prefix = reference.to_ascii_lowercase();
    let mut matches = tasks
        .iter()
        .filter(|task| task.id.to_string().starts_with(&prefix));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task.id),
        (Some(_), Some(_)) => Err(format!("id prefix `{reference}` is ambiguous")),
        (None, _) => Err(format!("no task matches `{reference}`")),
    }
}

/// Renders the list view; positions refer to the unfiltered list.
pub fn render_list(tasks: &[Task], filter: TaskFilter, now: DateTime<Utc>) -> Vec<String> {
    if tasks.is_empty() {
        return vec!["No tasks yet. Add one with `tasklet add <text>`.".to_string()];
    }

    let mut lines: Vec<String> = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| filter.matches(task))
        .map(|(index, task)| {
            let mark = if task.completed { "x" } else { " " };
            let mut line = format!("{:>3}. [{mark}] {}", index + 1, task.text);
            if let Some(completed_at) = task.completed_at {
                line.push_str(&format!(" (completed {})", format_relative(completed_at, now)));
            }
            line.push_str(&format!("  {}", short_id(task.id)));
            line
        })
        .collect();
    if lines.is_empty() {
        lines.push("Nothing to show for this filter.".to_string());
    }
    lines.push(TaskCounts::from_tasks(tasks).summary_label());
    lines
}

fn short_id(id: TaskId) -> String {
    id.to_string().chars().take(SHORT_ID_LEN).collect()
}
