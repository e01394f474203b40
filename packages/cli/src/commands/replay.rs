use crate::config;
use crate::script::{load_fixture, load_script, ScriptEvent};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use taskboard_cache::{shared, QueryCache};
use taskboard_dnd::{Commit, DragConfig, DragController, Point, PreviewResult, StartOutcome};
use taskboard_model::{Board, BoardSnapshot, List};
use taskboard_store::{Collection, InMemoryDocumentStore, StoreError};
use tracing::debug;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Board fixture (board, lists and tasks as JSON)
    pub fixture: PathBuf,

    /// Event script to replay
    pub script: PathBuf,

    /// Config file (defaults to taskboard.config.json in the working directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Make every update of a document fail, as <collection>/<id>
    #[arg(long = "fail", value_name = "COLLECTION/ID")]
    pub faults: Vec<String>,
}

/// What a replay did, for summaries and tests
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub commits: usize,
    pub failed_commits: usize,
    pub stored: BoardSnapshot,
}

pub async fn replay(args: ReplayArgs, cwd: &Path) -> Result<()> {
    let config = config::load(cwd, args.config.as_deref())?;
    let fixture = load_fixture(&args.fixture)?;
    let events = load_script(&args.script)?;
    let faults = args
        .faults
        .iter()
        .map(String::as_str)
        .map(parse_fault)
        .collect::<Result<Vec<_>>>()?;

    println!(
        "{} {} events against board {}",
        "▶ Replaying".bright_blue().bold(),
        events.len(),
        fixture.board.id
    );

    let outcome = execute(&fixture, &events, config, &faults).await?;

    println!();
    print_board(&outcome.stored);

    let violations = outcome.stored.check_invariants();
    if !violations.is_empty() {
        println!();
        for violation in &violations {
            println!("  {} {}", "✗".red(), violation);
        }
    }

    println!();
    println!(
        "{} {} commits, {} failed",
        "Done".green().bold(),
        outcome.commits,
        outcome.failed_commits
    );
    Ok(())
}

/// Replay `events` against a fresh in-memory store seeded with `fixture`
pub async fn execute(
    fixture: &BoardSnapshot,
    events: &[ScriptEvent],
    config: DragConfig,
    faults: &[(Collection, String)],
) -> Result<ReplayOutcome> {
    let store = Arc::new(InMemoryDocumentStore::from_snapshot(fixture)?);
    for (collection, id) in faults {
        store.fail_updates(
            *collection,
            id.clone(),
            StoreError::Network("injected fault".to_string()),
        );
    }

    let board_id = fixture.board.id.clone();
    let mut controller =
        DragController::new(board_id.clone(), store.clone(), shared(QueryCache::new()), config);
    controller.load().await?;

    let mut commits = 0;
    let mut failed_commits = 0;

    for (step, event) in events.iter().enumerate() {
        debug!(step, ?event, "Applying event");
        let commit = match event {
            ScriptEvent::PointerDown { id, kind, x, y } => {
                controller.pointer_down(id, *kind, Point::new(*x, *y));
                None
            }
            ScriptEvent::PointerMove { x, y } => {
                let activation = controller.pointer_move(Point::new(*x, *y)).await;
                println!("  {:>3} pointer move → {:?}", step, activation);
                None
            }
            ScriptEvent::PointerUp { over } => controller.pointer_up(over.as_deref()),
            ScriptEvent::Start { id, kind } => {
                match controller.start(id, *kind).await {
                    StartOutcome::Started(active) => {
                        println!("  {:>3} {} {} \"{}\"", step, "start".cyan(), id, active.payload.title())
                    }
                    StartOutcome::Unresolved(error) => {
                        println!("  {:>3} {} {}: {}", step, "unresolved".yellow(), id, error)
                    }
                    StartOutcome::Disabled => {
                        println!("  {:>3} {} {}", step, "disabled".yellow(), id)
                    }
                }
                None
            }
            ScriptEvent::Over { active, over } => {
                match controller.over(active, over.as_deref()) {
                    PreviewResult::Applied { keys } => {
                        let keys: Vec<String> = keys.iter().map(ToString::to_string).collect();
                        println!("  {:>3} {} {}", step, "preview".cyan(), keys.join(" "));
                    }
                    PreviewResult::Noop { reason } => {
                        println!("  {:>3} {} {}", step, "noop".dimmed(), reason);
                    }
                }
                None
            }
            ScriptEvent::End { active, over } => Some(controller.end(active, over.as_deref())),
            ScriptEvent::Cancel => {
                let discarded = controller.cancel();
                println!("  {:>3} {} ({} rolled back)", step, "cancel".yellow(), discarded.len());
                None
            }
            ScriptEvent::SetDragEnabled { enabled } => {
                controller.set_drag_enabled(*enabled);
                None
            }
        };

        if let Some(commit) = commit {
            commits += 1;
            if !run_commit(step, commit).await {
                failed_commits += 1;
            }
        }
    }

    Ok(ReplayOutcome {
        commits,
        failed_commits,
        stored: stored_snapshot(&store, board_id.as_str())?,
    })
}

/// Returns whether the commit succeeded
async fn run_commit(step: usize, commit: Commit) -> bool {
    match commit.run().await {
        Ok(report) => {
            println!("  {:>3} {} {} writes", step, "commit".green(), report.writes.len());
            true
        }
        Err(error) => {
            println!("  {:>3} {} {}", step, "commit failed".red(), error);
            false
        }
    }
}

fn parse_fault(fault: &str) -> Result<(Collection, String)> {
    let (collection, id) = fault
        .split_once('/')
        .ok_or_else(|| anyhow!("Fault must be <collection>/<id>: {}", fault))?;
    let collection =
        Collection::parse(collection).ok_or_else(|| anyhow!("Unknown collection: {}", collection))?;
    if id.is_empty() {
        return Err(anyhow!("Fault is missing a document id: {}", fault));
    }
    Ok((collection, id.to_string()))
}

fn stored_snapshot(store: &InMemoryDocumentStore, board_id: &str) -> Result<BoardSnapshot> {
    let board: Board = store.get_record(board_id)?;
    let lists = board
        .lists
        .iter()
        .filter_map(|id| store.get_record::<List>(id.as_str()).ok())
        .collect();
    Ok(BoardSnapshot::new(board, lists))
}

pub fn print_board(snapshot: &BoardSnapshot) {
    println!("{} {}", snapshot.board.title.bold(), format!("({})", snapshot.board.id).dimmed());
    for list in snapshot.ordered_lists() {
        let tasks: Vec<&str> = list.tasks.iter().map(|id| id.as_str()).collect();
        println!("  {} {}", list.title.cyan(), format!("[{}]", tasks.join(", ")));
    }
}
