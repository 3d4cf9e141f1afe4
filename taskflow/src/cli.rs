use anyhow::{bail, Result};
use chrono::{Duration, Local, NaiveDate};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use taskflow_core::{
    config::{default_data_dir, Config},
    init,
    storage::FileStore,
    task::{calculate_priority, sort_tasks, NewTask, Priority, Task, TaskId, TaskPatch},
    Filter, Mood, TaskStore,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const GIT_HASH: &str = env!("CARGO_GIT_SHA");

#[derive(Parser)]
#[command(
    name = "taskflow",
    version,
    about = "Local task tracker with points and levels",
    long_about = "taskflow keeps a local list of tasks, tracks what you finish, and turns it into points and levels.\n\nData lives in $TASKFLOW_DIR (default ~/.taskflow)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add a task
    Add {
        /// Task title
        title: String,

        /// Longer description
        #[arg(short, long)]
        description: Option<String>,

        /// Due date (YYYY-MM-DD, "today" or "tomorrow")
        #[arg(long, value_parser = parse_due)]
        due: Option<NaiveDate>,

        /// Priority: high, medium or low (default from config)
        #[arg(short, long)]
        priority: Option<Priority>,

        /// Derive the priority from how close the due date is
        #[arg(long, conflicts_with = "priority")]
        auto_priority: bool,
    },

    /// List tasks (default when no args given)
    List {
        /// Which tasks to show: all, completed, pending or high
        #[arg(short, long, default_value = "all")]
        filter: Filter,

        /// Pending first, then by priority, due date and age
        #[arg(long)]
        sorted: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Mark a task done, or undone if it already is
    Toggle {
        /// Task id or unique id prefix
        id: String,
    },

    /// Change fields of a task
    Edit {
        /// Task id or unique id prefix
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,

        /// Remove the description
        #[arg(long)]
        clear_description: bool,

        /// Due date (YYYY-MM-DD, "today" or "tomorrow")
        #[arg(long, value_parser = parse_due, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,

        #[arg(short, long)]
        priority: Option<Priority>,
    },

    /// Delete a task
    Delete {
        /// Task id or unique id prefix
        id: String,
    },

    /// Show points, level and completion figures
    Stats {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show or set the current mood
    Mood {
        /// energetic, focused, tired, creative or distracted
        mood: Option<Mood>,

        /// Forget the stored mood
        #[arg(long, conflicts_with = "mood")]
        clear: bool,
    },

    /// Create the data directory
    Init,

    /// Print shell completion scripts
    Completions {
        /// Shell type
        shell: Shell,
    },

    /// Print version
    Version,
}

pub fn run(cli: Cli) -> Result<()> {
    let dir = default_data_dir();
    let cfg = Config::load(&dir)?;
    init_tracing(&cfg.log);
    debug!(
        data_dir = %cfg.data_dir.display(),
        default_priority = %cfg.default_priority,
        "config loaded"
    );

    match cli.command {
        None => cmd_list(&cfg, Filter::All, false, false),
        Some(Commands::Add {
            title,
            description,
            due,
            priority,
            auto_priority,
        }) => {
            let priority = if auto_priority {
                calculate_priority(due, Local::now().date_naive())
            } else {
                priority.unwrap_or(cfg.default_priority)
            };
            let mut new = NewTask::new(title, priority);
            new.description = description;
            new.due_date = due;
            cmd_add(&cfg, new)
        }
        Some(Commands::List {
            filter,
            sorted,
            json,
        }) => cmd_list(&cfg, filter, sorted, json),
        Some(Commands::Toggle { id }) => cmd_toggle(&cfg, &id),
        Some(Commands::Edit {
            id,
            title,
            description,
            clear_description,
            due,
            clear_due,
            priority,
        }) => {
            let patch = TaskPatch {
                title,
                description: if clear_description {
                    Some(None)
                } else {
                    description.map(Some)
                },
                due_date: if clear_due { Some(None) } else { due.map(Some) },
                priority,
            };
            cmd_edit(&cfg, &id, &patch)
        }
        Some(Commands::Delete { id }) => cmd_delete(&cfg, &id),
        Some(Commands::Stats { json }) => cmd_stats(&cfg, json),
        Some(Commands::Mood { mood, clear }) => cmd_mood(&cfg, mood, clear),
        Some(Commands::Init) => cmd_init(&cfg),
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "taskflow", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Version) => {
            println!("taskflow {VERSION} ({GIT_HASH})");
            Ok(())
        }
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn open_store(cfg: &Config) -> TaskStore<FileStore> {
    TaskStore::open(FileStore::new(&cfg.data_dir))
}

fn parse_due(s: &str) -> Result<NaiveDate, String> {
    let today = Local::now().date_naive();
    match s.trim().to_lowercase().as_str() {
        "today" => Ok(today),
        "tomorrow" => Ok(today + Duration::days(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .map_err(|_| format!("invalid date '{s}' (expected YYYY-MM-DD, today or tomorrow)")),
    }
}

/// Map a full id or a unique prefix of one to a task id.
///
/// An unmatched id is passed through unchanged so the store can treat it as
/// a no-op.
fn resolve_id(store: &TaskStore<FileStore>, given: &str) -> Result<TaskId> {
    let exact = TaskId::new(given);
    if given.is_empty() || store.get(&exact).is_some() {
        return Ok(exact);
    }
    let matches: Vec<&Task> = store
        .tasks()
        .iter()
        .filter(|t| t.id.as_str().starts_with(given))
        .collect();
    match matches.as_slice() {
        [only] => {
            debug!(prefix = given, id = %only.id, "resolved id prefix");
            Ok(only.id.clone())
        }
        [] => {
            debug!(id = given, "no task matches id");
            Ok(exact)
        }
        _ => bail!("id prefix '{given}' is ambiguous ({} tasks match)", matches.len()),
    }
}

fn format_task(task: &Task) -> String {
    let check = if task.completed { "[x]" } else { "[ ]" };
    let mut line = format!(
        "{check} {:<8}  {} {:<6}  {}",
        task.id.short(),
        task.priority.icon(),
        task.priority.as_str(),
        task.title
    );
    if let Some(due) = task.due_date {
        line.push_str(&format!("  (due {due})"));
    }
    line
}

fn cmd_add(cfg: &Config, new: NewTask) -> Result<()> {
    if new.title.trim().is_empty() {
        bail!("task title must not be empty");
    }
    let mut store = open_store(cfg);
    let title = new.title.trim().to_string();
    match store.add_task(new)? {
        Some(id) => {
            println!("Added: {title} ({})", id.short());
            Ok(())
        }
        None => bail!("task title must not be empty"),
    }
}

fn cmd_list(cfg: &Config, filter: Filter, sorted: bool, json: bool) -> Result<()> {
    let mut store = open_store(cfg);
    store.set_filter(filter);
    let visible: Vec<Task> = store.filtered_tasks().into_iter().cloned().collect();
    let visible = if sorted { sort_tasks(&visible) } else { visible };

    if json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    if visible.is_empty() {
        match filter {
            Filter::All => println!("No tasks found. Use 'taskflow add' to create one"),
            other => println!("No {other} tasks found"),
        }
        return Ok(());
    }

    for task in &visible {
        println!("{}", format_task(task));
    }
    let stats = store.stats();
    println!(
        "\n{} of {} task(s) completed · level {} · {} points",
        stats.tasks_completed, stats.total_tasks, stats.level, stats.points
    );
    Ok(())
}

fn cmd_toggle(cfg: &Config, given: &str) -> Result<()> {
    let mut store = open_store(cfg);
    let id = resolve_id(&store, given)?;
    if !store.toggle_complete(&id)? {
        println!("No task matches '{given}', nothing changed");
        return Ok(());
    }
    if let Some(task) = store.get(&id) {
        let verb = if task.completed { "Completed" } else { "Reopened" };
        println!("{verb}: {}", task.title);
    }
    let stats = store.stats();
    println!("Level {} · {} points", stats.level, stats.points);
    Ok(())
}

fn cmd_edit(cfg: &Config, given: &str, patch: &TaskPatch) -> Result<()> {
    if patch.is_empty() {
        bail!("nothing to change (pass --title, --description, --due or --priority)");
    }
    if !patch.is_valid() {
        bail!("task title must not be empty");
    }
    let mut store = open_store(cfg);
    let id = resolve_id(&store, given)?;
    if !store.edit_task(&id, patch)? {
        println!("No task matches '{given}', nothing changed");
        return Ok(());
    }
    if let Some(task) = store.get(&id) {
        println!("Updated: {}", format_task(task));
    }
    Ok(())
}

fn cmd_delete(cfg: &Config, given: &str) -> Result<()> {
    let mut store = open_store(cfg);
    let id = resolve_id(&store, given)?;
    let title = store.get(&id).map(|t| t.title.clone());
    if !store.delete_task(&id)? {
        println!("No task matches '{given}', nothing changed");
        return Ok(());
    }
    println!("Deleted: {}", title.unwrap_or_else(|| id.to_string()));
    Ok(())
}

fn cmd_stats(cfg: &Config, json: bool) -> Result<()> {
    let store = open_store(cfg);
    let stats = store.stats();
    let breakdown = store.breakdown();

    if json {
        let value = serde_json::json!({
            "totalTasks": stats.total_tasks,
            "tasksCompleted": stats.tasks_completed,
            "points": stats.points,
            "level": stats.level,
            "completionRate": stats.completion_rate(),
            "completedByPriority": breakdown,
            "mood": store.mood(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "Level {}  ({} points, {} to next level)",
        stats.level,
        stats.points,
        stats.points_to_next_level()
    );
    println!(
        "Tasks:   {}/{} completed ({}%)",
        stats.tasks_completed,
        stats.total_tasks,
        stats.completion_rate()
    );
    let per_priority: Vec<String> = Priority::ALL
        .iter()
        .map(|p| format!("{p} {}", breakdown.get(*p)))
        .collect();
    println!("Done by priority: {}", per_priority.join(" · "));
    if let Some(mood) = store.mood() {
        println!("Mood:    {mood}");
    }
    Ok(())
}

fn cmd_mood(cfg: &Config, mood: Option<Mood>, clear: bool) -> Result<()> {
    let mut store = open_store(cfg);
    if clear {
        store.clear_mood()?;
        println!("Mood cleared");
        return Ok(());
    }
    match mood {
        Some(mood) => {
            store.set_mood(mood)?;
            println!("Mood set: {}", mood.label());
        }
        None => match store.mood() {
            Some(mood) => println!("Mood: {}", mood.label()),
            None => println!("No mood set. Try 'taskflow mood focused'"),
        },
    }
    Ok(())
}

fn cmd_init(cfg: &Config) -> Result<()> {
    if init::init_data_dir(&cfg.data_dir)? {
        println!("Initialized: {}", cfg.data_dir.display());
    } else {
        println!("Already initialized: {}", cfg.data_dir.display());
    }
    Ok(())
}
