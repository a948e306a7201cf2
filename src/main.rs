use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

use restash::{list, merge_cmd, save, stack_ops, status, telemetry};

/// Stash stack manager with reconciliation
///
/// restash fronts git's stash stack: list, save, apply, pop, and drop
/// snapshots by position — and, the part git does not offer, MERGE the
/// current uncommitted changes into an existing snapshot as one logically
/// atomic operation.
///
/// POSITIONS ARE LIVE:
///   - 0 is always the newest snapshot
///   - every save shifts existing snapshots down by one
///   - dropping position P renumbers everything above it
///   Re-run 'restash list' before addressing a position.
///
/// QUICK START:
///
///   restash save "wip: parser"        # park the working tree
///   restash list                      # see the stack
///   restash pop 0                     # take it back
///
///   # Later, with new edits in the tree, fold them into that snapshot:
///   restash merge 0 -m "wip: parser"
///
/// On conflict, merge restores the original stack and reports the paths to
/// resolve; nothing is lost.
#[derive(Parser)]
#[command(name = "restash")]
#[command(version, about)]
#[command(propagate_version = true)]
#[command(after_help = "See 'restash <command> --help' for more information on a specific command.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the snapshot stack
    List(list::ListArgs),

    /// Show what a save would capture
    Status(status::StatusArgs),

    /// Save the working tree as a new snapshot
    Save(save::SaveArgs),

    /// Apply a snapshot, keeping it in the stack
    Apply(stack_ops::ApplyArgs),

    /// Apply a snapshot and remove it
    Pop(stack_ops::PopArgs),

    /// Remove a snapshot without applying it
    Drop(stack_ops::DropArgs),

    /// Merge the current uncommitted changes into an existing snapshot
    Merge(merge_cmd::MergeArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::List(ref args) => list::run(args),
        Commands::Status(ref args) => status::run(args),
        Commands::Save(ref args) => save::run(args),
        Commands::Apply(ref args) => stack_ops::run_apply(args),
        Commands::Pop(ref args) => stack_ops::run_pop(args),
        Commands::Drop(ref args) => stack_ops::run_drop(args),
        Commands::Merge(ref args) => merge_cmd::run(args),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "restash", &mut std::io::stdout());
            Ok(())
        }
    }
}
