//! `restash list` — show the snapshot stack.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::Args;
use restash_git::{Snapshot, SnapshotStore};
use serde::Serialize;

use crate::format::OutputFormat;
use crate::repo;

/// List the snapshot stack
///
/// Positions are live indices: 0 is the newest entry, and every save or
/// drop renumbers the rest. Re-list before addressing a position.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output format: text or json
    #[arg(long)]
    pub format: Option<OutputFormat>,
}

#[derive(Serialize)]
struct ListEnvelope {
    snapshots: Vec<Snapshot>,
}

pub fn run(args: &ListArgs) -> Result<()> {
    let (store, _config) = repo::open()?;
    let snapshots = store.list()?;

    if args.format.unwrap_or_default() == OutputFormat::Json {
        let envelope = ListEnvelope { snapshots };
        println!("{}", OutputFormat::Json.serialize(&envelope)?);
        return Ok(());
    }

    if snapshots.is_empty() {
        println!("No snapshots in the stack.");
        return Ok(());
    }

    let now = unix_now();
    for snap in &snapshots {
        println!("{}", render_row(snap, now));
    }
    Ok(())
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

fn render_row(snap: &Snapshot, now: i64) -> String {
    let untracked = if snap.has_untracked_layer { " +untracked" } else { "" };
    format!(
        "{:>3}  {}  [{}]  {} file(s) +{} -{}{}  ({})",
        snap.position,
        snap.label,
        snap.origin_branch,
        snap.file_count,
        snap.additions,
        snap.deletions,
        untracked,
        humanize_age(snap.created_at, now),
    )
}

/// Coarse relative age for list rows.
fn humanize_age(created_at: i64, now: i64) -> String {
    let secs = now.saturating_sub(created_at);
    if secs < 60 {
        "just now".to_owned()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86_400)
    }
}
