//! Terminal front end for tango: reads stdin lines, hands them to the
//! core dispatcher, and renders the resulting output.

mod db;
mod render;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tango_core::{Dispatcher, LineKind, ModeKind, Turn, WordStore};

use crate::db::SqliteStore;
use crate::render::PROMPT_SYMBOL;

#[derive(Parser, Debug)]
#[command(name = "tango", version, about = "Command-driven vocabulary drill tool")]
struct Args {
    /// Path to the SQLite database (default: the platform data directory)
    #[arg(long)]
    db: Option<PathBuf>,

    /// JSON vocabulary file to seed the database on first run
    #[arg(long)]
    vocab: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let db_path = match args.db {
        Some(path) => path,
        None => default_db_path().context("could not determine a data directory")?,
    };
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    tracing::debug!(path = %db_path.display(), "opening database");
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("opening database at {}", db_path.display()))?;

    let stored = store.load_vocabulary();
    let mut dispatcher = Dispatcher::new(Some(store));

    println!("Welcome to tango!");
    println!("Loading vocabulary...");

    let turn = bootstrap(&mut dispatcher, stored, args.vocab.as_deref());
    show(&turn);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let turn = match dispatcher.mode_kind() {
            // The typed line is a path to a vocabulary file, handled
            // out-of-band from the command stream.
            ModeKind::LoadVocabFile => import_file(&mut dispatcher, line.trim()),
            _ => dispatcher.handle(&line),
        };
        show(&turn);

        match turn.mode {
            ModeKind::Exited => return Ok(()),
            ModeKind::Error => anyhow::bail!("unrecoverable bootstrap failure"),
            _ => {}
        }
    }
    Ok(())
}

fn default_db_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("tango").join("tango.db"))
}

/// Bootstrap order: stored vocabulary snapshot, then the --vocab seed
/// file, then a recoverable empty-vocabulary wait.
fn bootstrap<S: WordStore>(
    dispatcher: &mut Dispatcher<S>,
    stored: Result<Option<Vec<tango_core::Word>>, tango_core::StoreError>,
    seed: Option<&Path>,
) -> Turn {
    match stored {
        Ok(Some(words)) if !words.is_empty() => {
            tracing::debug!(count = words.len(), "vocabulary loaded from store");
            dispatcher.vocabulary_loaded(words)
        }
        Ok(_) => match seed {
            Some(path) => import_path(dispatcher, path),
            None => dispatcher.vocabulary_unavailable(
                "no stored vocabulary; pass --vocab to import a seed file",
            ),
        },
        Err(e) => {
            tracing::warn!(error = %e, "could not read stored vocabulary");
            match seed {
                Some(path) => import_path(dispatcher, path),
                None => dispatcher.vocabulary_unavailable(&e.to_string()),
            }
        }
    }
}

fn import_path<S: WordStore>(dispatcher: &mut Dispatcher<S>, path: &Path) -> Turn {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    match std::fs::read_to_string(path) {
        Ok(content) => dispatcher.supply_vocab_file(&name, &content),
        Err(e) => dispatcher.vocab_file_unreadable(&format!("{}: {e}", path.display())),
    }
}

fn import_file<S: WordStore>(dispatcher: &mut Dispatcher<S>, input: &str) -> Turn {
    if input.is_empty() {
        dispatcher.cancel_vocab_load()
    } else {
        import_path(dispatcher, Path::new(input))
    }
}

fn show(turn: &Turn) {
    for line in &turn.lines {
        // The terminal already echoed what the user typed.
        if line.kind == LineKind::User {
            continue;
        }
        println!("{}", render::render(line));
    }
    if accepts_input(turn.mode) {
        print!("{PROMPT_SYMBOL}");
        let _ = io::stdout().flush();
    }
}

fn accepts_input(mode: ModeKind) -> bool {
    !matches!(mode, ModeKind::Exited | ModeKind::Error)
}
