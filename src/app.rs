use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{Result, SlipError};
use crate::import;
use crate::roster::{Extractor, RosterState, Snapshot, reconcile};
use crate::storage::{self, SaveWorker};

#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Config,
    pub save_path: PathBuf,
    pub import_dir: PathBuf,
    /// Snapshot given on the command line, if any.
    pub explicit_csv: Option<PathBuf>,
    pub robot_mode: bool,
}

/// One snapshot reconciled against the saved state.
pub struct Session {
    pub state: RosterState,
    pub snapshot: Snapshot,
    pub snapshot_path: PathBuf,
    /// No save file existed before this run.
    pub first_run: bool,
    /// The saved roster differs from the snapshot's; the tracked set may need review.
    pub roster_changed: bool,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let config = Config::load(cli.config.as_deref(), &cwd)?;

        let save_path = cli
            .save
            .clone()
            .unwrap_or_else(|| config.paths.save_file.clone());
        let import_dir = cli
            .import_dir
            .clone()
            .unwrap_or_else(|| config.paths.import_dir.clone());
        let robot_mode = cli.robot || config.robot_mode();

        Ok(Self {
            save_path: expand_path(&save_path),
            import_dir: expand_path(&import_dir),
            explicit_csv: cli.csv.as_deref().map(expand_path),
            robot_mode,
            config,
        })
    }

    /// Same context, loading `path` instead of the configured snapshot.
    #[must_use]
    pub fn with_snapshot(&self, path: &Path) -> Self {
        Self {
            explicit_csv: Some(expand_path(path)),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn extractor(&self) -> Extractor {
        Extractor::from_config(&self.config.snapshot)
    }

    #[must_use]
    pub const fn attendances_per_slip(&self) -> u32 {
        self.config.slips.attendances_per_slip
    }

    /// Explicit snapshot (cached into the import directory) or the newest one there.
    pub fn resolve_snapshot_path(&self) -> Result<PathBuf> {
        if let Some(explicit) = &self.explicit_csv {
            if !explicit.is_file() {
                return Err(SlipError::NoSnapshot(format!(
                    "{} does not exist",
                    explicit.display()
                )));
            }
            return Ok(import::cache_snapshot(explicit, &self.import_dir));
        }
        import::find_latest_snapshot(&self.import_dir).ok_or_else(|| {
            SlipError::NoSnapshot(format!(
                "no *.csv in {}; pass --csv PATH or run `slipday import PATH`",
                self.import_dir.display()
            ))
        })
    }

    /// Extract the current snapshot and reconcile it with the save file.
    ///
    /// The result is saved right away on a first run or when `selection` is
    /// given; otherwise saving is left to the caller.
    pub fn open_session(&self, selection: Option<&BTreeSet<String>>) -> Result<Session> {
        let snapshot_path = self.resolve_snapshot_path()?;
        let snapshot = self.extractor().extract_path(&snapshot_path)?;
        let prior = storage::load(&self.save_path)?;

        let roster_changed = prior
            .as_ref()
            .is_some_and(|state| state.roster_changed(&snapshot));
        if roster_changed {
            warn!("roster changed since last save; review the tracked set");
        }

        let state = reconcile(
            &snapshot,
            prior.as_ref(),
            selection,
            self.attendances_per_slip(),
        );
        let first_run = prior.is_none();
        if first_run || selection.is_some() {
            storage::save(&self.save_path, &state)?;
        }

        Ok(Session {
            state,
            snapshot,
            snapshot_path,
            first_run,
            roster_changed,
        })
    }

    /// Re-reconcile the session with an explicit tracked set and save it.
    pub fn apply_selection(&self, session: &mut Session, selection: &BTreeSet<String>) -> Result<()> {
        session.state = reconcile(
            &session.snapshot,
            Some(&session.state),
            Some(selection),
            self.attendances_per_slip(),
        );
        session.roster_changed = false;
        storage::save(&self.save_path, &session.state)
    }

    /// Save on a background worker and wait for it, showing a spinner when
    /// interactive. Returns only once the write has finished.
    pub fn save_and_wait(&self, state: &RosterState) -> Result<()> {
        let worker = SaveWorker::spawn(self.save_path.clone(), state.clone());

        let spinner = if self.robot_mode || !console::Term::stderr().is_term() {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                pb.set_style(style);
            }
            pb.set_message(format!("Saving {}", self.save_path.display()));
            pb
        };

        let result = worker.wait_with_progress(Duration::from_millis(50), || spinner.tick());
        spinner.finish_and_clear();
        if result.is_ok() {
            info!(path = %self.save_path.display(), "state saved");
        }
        result
    }
}

fn expand_path(input: &Path) -> PathBuf {
    if let Ok(stripped) = input.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    input.to_path_buf()
}
