use crate::output::{print_json, print_table};
use crate::session::Session;
use anyhow::Context;
use clap::Subcommand;
use kft_core::history::{self, truncate_path, History};

const PATH_WIDTH: usize = 30;

#[derive(Subcommand)]
pub enum HistorySubcommand {
    /// Show recent transfers, newest first (default)
    List {
        /// Show at most N entries
        #[arg(long, short = 'l', value_name = "N")]
        limit: Option<usize>,
    },
    /// Remove all history entries
    Clear,
    /// Run a past transfer again (1 = most recent)
    Rerun {
        #[arg(default_value_t = 1)]
        index: usize,
        /// Reverse it: an upload becomes a download of the same paths
        #[arg(long)]
        swap: bool,
    },
}

pub fn run(session: &Session, subcmd: Option<HistorySubcommand>) -> anyhow::Result<()> {
    match subcmd.unwrap_or(HistorySubcommand::List { limit: None }) {
        HistorySubcommand::List { limit } => list(session, limit),
        HistorySubcommand::Clear => clear(session),
        HistorySubcommand::Rerun { index, swap } => rerun(session, index, swap),
    }
}

fn list(session: &Session, limit: Option<usize>) -> anyhow::Result<()> {
    let mut history = History::load(&session.home).context("failed to load history")?;
    if let Some(n) = limit {
        history.entries.truncate(n);
    }

    if session.json {
        return print_json(&history.entries);
    }

    if history.is_empty() {
        println!("No transfers yet.");
        return Ok(());
    }

    let rows = history
        .entries
        .iter()
        .map(|e| {
            vec![
                e.timestamp
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
                e.direction.to_string(),
                e.status_label().to_string(),
                e.target.to_string(),
                truncate_path(&e.local_path, PATH_WIDTH),
                truncate_path(&e.pod_path, PATH_WIDTH),
                e.error.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(
        &["WHEN", "DIRECTION", "STATUS", "TARGET", "LOCAL", "POD", "ERROR"],
        rows,
    );
    println!("\nShowing {} recent transfer(s)", history.len());
    Ok(())
}

fn clear(session: &Session) -> anyhow::Result<()> {
    let removed = history::clear(&session.home).context("failed to clear history")?;
    if session.json {
        return print_json(&serde_json::json!({ "removed": removed }));
    }
    println!("Cleared {removed} history entr{}.", if removed == 1 { "y" } else { "ies" });
    Ok(())
}

fn rerun(session: &Session, index: usize, swap: bool) -> anyhow::Result<()> {
    let history = History::load(&session.home).context("failed to load history")?;
    let entry = index
        .checked_sub(1)
        .and_then(|i| history.entries.get(i))
        .with_context(|| {
            format!("no history entry #{index} ({} recorded)", history.len())
        })?;
    if !entry.target.is_ready() {
        anyhow::bail!("history entry #{index} has no complete target ({})", entry.target);
    }

    let request = if swap {
        entry.request().swapped()
    } else {
        entry.request()
    };
    let kubectl = session.kubectl()?;
    super::transfer::run_all(session, &kubectl, vec![request])
}
