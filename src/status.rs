//! `restash status` — summarize the uncommitted working-tree changes.

use anyhow::Result;
use clap::Args;
use restash_git::{ChangeEntry, PreviewCalculator, PreviewSummary};
use serde::Serialize;

use crate::format::OutputFormat;
use crate::repo;

/// Show what a save would capture
///
/// Summarizes staged, unstaged, and untracked changes, and flags paths
/// carrying both a staged and an unstaged edit (those block --keep-staged
/// saves).
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format: text or json
    #[arg(long)]
    pub format: Option<OutputFormat>,
}

#[derive(Serialize)]
struct StatusEnvelope {
    staged: Vec<ChangeEntry>,
    unstaged: Vec<ChangeEntry>,
    untracked: Vec<String>,
    mixed: bool,
}

pub fn run(args: &StatusArgs) -> Result<()> {
    let (store, _config) = repo::open()?;
    let summary = store.compute_preview(true)?;

    if args.format.unwrap_or_default() == OutputFormat::Json {
        let envelope = StatusEnvelope {
            mixed: summary.has_mixed_changes(),
            staged: summary.staged,
            unstaged: summary.unstaged,
            untracked: summary.untracked,
        };
        println!("{}", OutputFormat::Json.serialize(&envelope)?);
        return Ok(());
    }

    print!("{}", render_text(&summary));
    Ok(())
}

fn render_text(summary: &PreviewSummary) -> String {
    if summary.is_empty() {
        return "Working tree clean — nothing to save.\n".to_owned();
    }

    let mut out = String::new();
    push_section(&mut out, "Staged", &summary.staged);
    push_section(&mut out, "Unstaged", &summary.unstaged);
    if !summary.untracked.is_empty() {
        out.push_str(&format!("Untracked ({}):\n", summary.untracked.len()));
        for path in &summary.untracked {
            out.push_str(&format!("  {path}\n"));
        }
    }
    if summary.has_mixed_changes() {
        out.push_str(
            "Note: some paths carry both staged and unstaged edits; \
             `save --keep-staged` is unavailable.\n",
        );
    }
    out
}

fn push_section(out: &mut String, title: &str, entries: &[ChangeEntry]) {
    if entries.is_empty() {
        return;
    }
    out.push_str(&format!("{title} ({}):\n", entries.len()));
    for entry in entries {
        out.push_str(&format!(
            "  {} +{} -{}\n",
            entry.path, entry.additions, entry.deletions
        ));
    }
}
