mod app;
mod config;
mod domain;
mod input;
mod logging;
mod persistence;
mod store;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::AppState;
use clap::{Parser, Subcommand};
use config::Config;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{filtered_view, filtered_view_named, items_left_label, normalize_duration, now_millis};
use persistence::{init_local_dir, FileSlotStore, FileSlotWatcher};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use store::TaskStore;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "todotick")]
#[command(about = "A terminal to-do list with countdowns, synced across running instances", long_about = None)]
struct Cli {
    /// Data directory holding the slot files
    #[arg(long, env = "TODOTICK_DIR", global = true)]
    dir: Option<PathBuf>,

    /// Name of the persisted slot
    #[arg(long, global = true)]
    slot: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a data directory (--dir, or .todotick in the current directory)
    Init,
    /// Print the task list
    List {
        /// all, active or completed. Defaults to the saved filter.
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Add a task
    Add {
        label: String,
        #[arg(long, default_value_t = 0)]
        min: u32,
        #[arg(long, default_value_t = 0)]
        sec: u32,
    },
    /// Remove all completed tasks
    ClearCompleted,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        let dir = init_local_dir(cli.dir)?;
        println!("Initialized todotick directory: {}", dir.display());
        println!();
        println!("todotick will now use this local directory for task storage.");
        println!("Run 'todotick' to open your list.");
        return Ok(());
    }

    let config = Config::resolve(cli.dir, cli.slot)?;
    logging::init_logging(&config.data_dir)?;
    info!(dir = %config.data_dir.display(), slot = %config.slot, "Starting");

    match cli.command {
        Some(Commands::List { filter }) => list_tasks(&config, filter.as_deref()),
        Some(Commands::Add { label, min, sec }) => add_task(&config, &label, min, sec),
        Some(Commands::ClearCompleted) => clear_completed(&config),
        Some(Commands::Init) | None => run_tui(&config),
    }
}

fn open_store(config: &Config) -> TaskStore {
    TaskStore::open(Box::new(FileSlotStore::new(config.data_dir.clone())), &config.slot)
}

fn list_tasks(config: &Config, filter: Option<&str>) -> Result<()> {
    let mut store = open_store(config);
    store.refresh_relative_times(now_millis());

    let visible = match filter {
        Some(name) => filtered_view_named(store.tasks(), name),
        None => filtered_view(store.tasks(), store.filter()),
    };

    for task in visible {
        let check = if task.done { "x" } else { " " };
        let running = if task.time.work { " (running)" } else { "" };
        println!(
            "[{}] {}  {}{}  created {} ago",
            check,
            task.label,
            task.time.duration_formatted(),
            running,
            task.time.time_to_now
        );
    }
    println!("{}", items_left_label(&store.remaining_count()));
    Ok(())
}

fn add_task(config: &Config, label: &str, min: u32, sec: u32) -> Result<()> {
    let label = label.trim();
    if label.is_empty() {
        anyhow::bail!("Task label must not be empty");
    }

    let (min, sec) = normalize_duration(min, sec);
    let mut store = open_store(config);
    store.create_task(label, min, sec);
    store.flush()?;
    println!("Added: {}", label);
    Ok(())
}

fn clear_completed(config: &Config) -> Result<()> {
    let mut store = open_store(config);
    let before = store.tasks().len();
    store.clear_completed();
    store.flush()?;
    println!("Removed {} completed task(s)", before - store.tasks().len());
    Ok(())
}

fn run_tui(config: &Config) -> Result<()> {
    let store = open_store(config);
    let feed = FileSlotWatcher::new(config.data_dir.clone())?;
    let mut app = AppState::new(store, Box::new(feed), config.refresh_interval);

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Save on exit
    if let Err(e) = app.shutdown() {
        error!(error = ?e, "Failed to save on exit");
        eprintln!("Error saving state: {}", e);
    }

    if let Err(err) = &result {
        error!(error = ?err, "Exited with error");
    }
    info!("Stopped");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    config: &Config,
) -> Result<()> {
    loop {
        // Render
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(config.tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        // Timers and changes from other instances
        app.tick(Instant::now());

        // Autosave if needed
        if app.store.is_dirty() {
            app.save()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config(dir: &std::path::Path) -> Config {
        Config::resolve(Some(dir.to_path_buf()), None).unwrap()
    }

    #[test]
    fn test_add_task_carries_seconds() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = create_test_config(temp_dir.path());

        add_task(&config, "  Stretch ", 0, 90).unwrap();

        let store = open_store(&config);
        let task = &store.tasks()[0];
        assert_eq!(task.label, "Stretch");
        assert_eq!(task.time.duration_formatted(), "01:30");
    }

    #[test]
    fn test_add_task_rejects_blank_label() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = create_test_config(temp_dir.path());

        assert!(add_task(&config, "   ", 1, 0).is_err());
    }

    #[test]
    fn test_init_honours_dir_flag() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("elsewhere");

        let cli = Cli::try_parse_from(["todotick", "--dir", dir.to_str().unwrap(), "init"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Init)));
        assert_eq!(init_local_dir(cli.dir).unwrap(), dir);
        assert!(dir.is_dir());
    }
}
