mod commands;
mod paths;
mod seed;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use waypoint_core::{PlanEngine, TaskId, TaskStatus};
use waypoint_store::JsonFileStore;

#[derive(Parser)]
#[command(
    name = "waypoint",
    about = "Plan engine for long-horizon AI agent task execution"
)]
struct Cli {
    /// Plan snapshot file (overrides the WAYPOINT_PLAN_FILE env var)
    #[arg(long, global = true)]
    plan: Option<String>,

    /// Emit machine-readable JSON envelopes instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the plan from a TOML seed file (replaces any existing plan)
    Init {
        /// Path to the seed file
        file: String,
    },
    /// Show the task currently in progress
    Current,
    /// Start the next executable task
    Start,
    /// Mark the in-progress task as completed
    Complete {
        /// Task ID to complete
        id: TaskId,
        /// Outcome to record on the task
        result: String,
    },
    /// Mark a task as failed
    Fail {
        /// Task ID to fail
        id: TaskId,
        /// Error message to record on the task
        message: String,
        /// Advise the driver not to re-attempt this task
        #[arg(long)]
        no_retry: bool,
    },
    /// Add a task to the plan
    Add {
        /// Task name
        name: String,
        /// Dependency task ID (repeatable)
        #[arg(long = "dep")]
        dependencies: Vec<TaskId>,
        /// Rationale for the task
        #[arg(long, default_value = "")]
        reasoning: String,
        /// Insert after this task and rewire its downstream dependents
        #[arg(long)]
        after: Option<TaskId>,
    },
    /// Edit a pending task
    Update {
        /// Task ID to edit
        id: TaskId,
        /// New task name
        #[arg(long)]
        name: Option<String>,
        /// New rationale
        #[arg(long)]
        reasoning: Option<String>,
        /// Replacement dependency task ID (repeatable)
        #[arg(long = "dep")]
        dependencies: Vec<TaskId>,
        /// Replace the dependency set with an empty one
        #[arg(long, conflicts_with = "dependencies")]
        clear_deps: bool,
    },
    /// Skip a task
    Skip {
        /// Task ID to skip
        id: TaskId,
        /// Reason to record on the task
        reason: String,
    },
    /// Remove a pending task that nothing depends on
    Remove {
        /// Task ID to remove
        id: TaskId,
    },
    /// Show one task in full
    Show {
        /// Task ID to show
        id: TaskId,
    },
    /// List tasks, optionally filtered by status
    List {
        /// Filter: pending, in_progress, completed, failed, or skipped
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Show plan status and per-task progress
    Status,
    /// List tasks that could start right now
    Executable,
    /// Render the dependency graph
    Graph {
        /// Output format
        #[arg(long, value_enum, default_value_t = GraphFormat::Ascii)]
        format: GraphFormat,
    },
    /// Generate an execution-context prompt for an agent
    Prompt,
    /// Export the full plan document as JSON
    Export {
        /// Output file path (defaults to stdout)
        #[arg(long)]
        output: Option<String>,
    },
    /// Pause the plan
    Pause,
    /// Resume a paused plan
    Resume,
    /// Reset every task back to pending, keeping the plan's structure
    Reset,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GraphFormat {
    Ascii,
    Tree,
    Mermaid,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let path = paths::resolve_plan_path(cli.plan.as_deref());
    let store = JsonFileStore::new(&path);
    let mut engine = PlanEngine::open(Box::new(store))
        .with_context(|| format!("failed to open plan at {}", path.display()))?;

    commands::run_command(cli.command, &mut engine, cli.json)
}
