//! Ordered file operations that unwind on the first failure.
//!
//! Each [`Step`] knows how to apply itself and, when possible, how to undo
//! itself. [`Transaction::run`] applies the steps in order; if one fails,
//! every step that already completed is undone in reverse order. Nothing is
//! retried.

use std::fmt;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use tracing::{info, warn};

pub trait Step {
    fn name(&self) -> &str;
    fn apply(&mut self) -> io::Result<()>;
    /// `None` for steps that cannot be reversed.
    fn undo(&mut self) -> Option<io::Result<()>>;
}

/// Renames `from` to `to`, refusing to overwrite an existing `to`.
pub struct RenameFile {
    name: String,
    from: PathBuf,
    to: PathBuf,
}

impl RenameFile {
    pub fn new(name: impl Into<String>, from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Step for RenameFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&mut self) -> io::Result<()> {
        if !self.from.is_file() {
            return Err(io::Error::new(
                ErrorKind::NotFound,
                format!("{} not found", self.from.display()),
            ));
        }
        if self.to.exists() {
            return Err(io::Error::new(
                ErrorKind::AlreadyExists,
                format!("{} already exists", self.to.display()),
            ));
        }
        fs::rename(&self.from, &self.to)
    }

    fn undo(&mut self) -> Option<io::Result<()>> {
        Some(fs::rename(&self.to, &self.from))
    }
}

/// Copies `from` to `to`; a partially written `to` is removed on failure.
pub struct CopyFile {
    name: String,
    from: PathBuf,
    to: PathBuf,
}

impl CopyFile {
    pub fn new(name: impl Into<String>, from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Step for CopyFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&mut self) -> io::Result<()> {
        if self.to.exists() {
            return Err(io::Error::new(
                ErrorKind::AlreadyExists,
                format!("{} already exists", self.to.display()),
            ));
        }
        match fs::copy(&self.from, &self.to) {
            Ok(_) => Ok(()),
            Err(e) => {
                match fs::remove_file(&self.to) {
                    Ok(()) => {}
                    Err(cleanup) if cleanup.kind() == ErrorKind::NotFound => {}
                    Err(cleanup) => warn!(
                        "Could not remove partial copy {}: {}",
                        self.to.display(),
                        cleanup
                    ),
                }
                Err(e)
            }
        }
    }

    fn undo(&mut self) -> Option<io::Result<()>> {
        Some(fs::remove_file(&self.to))
    }
}

/// Checks that `path` is a regular file; changes nothing.
pub struct RequireFile {
    name: String,
    path: PathBuf,
}

impl RequireFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl Step for RequireFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&mut self) -> io::Result<()> {
        if self.path.is_file() {
            Ok(())
        } else {
            Err(io::Error::new(
                ErrorKind::NotFound,
                format!("{} not found", self.path.display()),
            ))
        }
    }

    fn undo(&mut self) -> Option<io::Result<()>> {
        Some(Ok(()))
    }
}

pub struct RemoveFile {
    name: String,
    path: PathBuf,
}

impl RemoveFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl Step for RemoveFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&mut self) -> io::Result<()> {
        fs::remove_file(&self.path)
    }

    fn undo(&mut self) -> Option<io::Result<()>> {
        None
    }
}

#[derive(Debug)]
pub struct StepFailure {
    pub step: String,
    pub error: io::Error,
}

#[derive(Debug)]
pub enum RollbackOutcome {
    Undone(String),
    Failed { step: String, error: io::Error },
    Irreversible(String),
}

impl fmt::Display for RollbackOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollbackOutcome::Undone(step) => write!(f, "'{}' undone", step),
            RollbackOutcome::Failed { step, error } => {
                write!(f, "'{}' could not be undone: {}", step, error)
            }
            RollbackOutcome::Irreversible(step) => write!(f, "'{}' cannot be undone", step),
        }
    }
}

#[derive(Debug, Default)]
pub struct TransactionReport {
    /// Steps that applied successfully, in order, including ones later undone.
    pub completed: Vec<String>,
    pub failure: Option<StepFailure>,
    pub rollback: Vec<RollbackOutcome>,
}

impl TransactionReport {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    /// Whether `step` applied and is still in effect.
    pub fn is_in_effect(&self, step: &str) -> bool {
        self.completed.iter().any(|s| s == step)
            && !self
                .rollback
                .iter()
                .any(|r| matches!(r, RollbackOutcome::Undone(s) if s == step))
    }

    /// `None` if nothing needed undoing, otherwise whether every completed
    /// step was undone.
    pub fn rollback_succeeded(&self) -> Option<bool> {
        if self.rollback.is_empty() {
            return None;
        }
        Some(
            self.rollback
                .iter()
                .all(|r| matches!(r, RollbackOutcome::Undone(_))),
        )
    }

    pub fn failed_step(&self) -> Option<&str> {
        self.failure.as_ref().map(|f| f.step.as_str())
    }

    /// The error that stopped the transaction.
    pub fn failure_message(&self) -> Option<String> {
        self.failure.as_ref().map(|f| f.error.to_string())
    }

    /// Rollback outcomes that left something changed.
    pub fn rollback_problems(&self) -> Vec<String> {
        self.rollback
            .iter()
            .filter(|r| !matches!(r, RollbackOutcome::Undone(_)))
            .map(ToString::to_string)
            .collect()
    }
}

#[derive(Default)]
pub struct Transaction {
    steps: Vec<Box<dyn Step>>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(mut self, step: impl Step + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn run(mut self) -> TransactionReport {
        let mut report = TransactionReport::default();
        let mut applied: Vec<usize> = Vec::new();

        for (index, step) in self.steps.iter_mut().enumerate() {
            match step.apply() {
                Ok(()) => {
                    info!("Step '{}' applied", step.name());
                    report.completed.push(step.name().to_string());
                    applied.push(index);
                }
                Err(error) => {
                    warn!("Step '{}' failed: {}", step.name(), error);
                    report.failure = Some(StepFailure {
                        step: step.name().to_string(),
                        error,
                    });
                    break;
                }
            }
        }

        if report.failure.is_some() {
            for index in applied.into_iter().rev() {
                let step = &mut self.steps[index];
                let name = step.name().to_string();
                let outcome = match step.undo() {
                    Some(Ok(())) => RollbackOutcome::Undone(name),
                    Some(Err(error)) => RollbackOutcome::Failed { step: name, error },
                    None => RollbackOutcome::Irreversible(name),
                };
                warn!("Rollback: {}", outcome);
                report.rollback.push(outcome);
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    struct Failing;

    impl Step for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn apply(&mut self) -> io::Result<()> {
            Err(io::Error::new(ErrorKind::PermissionDenied, "denied"))
        }

        fn undo(&mut self) -> Option<io::Result<()>> {
            Some(Ok(()))
        }
    }

    #[test]
    fn test_all_steps_apply() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        fs::write(&a, b"x").unwrap();

        let report = Transaction::new()
            .step(RenameFile::new("rename", &a, dir.path().join("b")))
            .step(CopyFile::new("copy", dir.path().join("b"), dir.path().join("c")))
            .run();

        assert!(report.succeeded());
        assert_eq!(report.completed, vec!["rename", "copy"]);
        assert_eq!(report.rollback_succeeded(), None);
        assert!(!a.exists());
        assert!(dir.path().join("c").exists());
    }

    #[test]
    fn test_failure_unwinds_in_reverse() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        fs::write(&a, b"x").unwrap();

        let report = Transaction::new()
            .step(RenameFile::new("rename", &a, dir.path().join("b")))
            .step(CopyFile::new("copy", dir.path().join("b"), dir.path().join("c")))
            .step(Failing)
            .run();

        assert!(!report.succeeded());
        assert_eq!(report.failed_step(), Some("failing"));
        assert_eq!(report.rollback_succeeded(), Some(true));
        assert!(!report.is_in_effect("rename"));
        assert!(matches!(&report.rollback[0], RollbackOutcome::Undone(s) if s == "copy"));
        assert!(a.exists());
        assert!(!dir.path().join("b").exists());
        assert!(!dir.path().join("c").exists());
    }

    #[test]
    fn test_irreversible_step_is_reported() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        fs::write(&a, b"x").unwrap();

        let report = Transaction::new()
            .step(RemoveFile::new("remove", &a))
            .step(Failing)
            .run();

        assert_eq!(report.rollback_succeeded(), Some(false));
        assert!(report.is_in_effect("remove"));
        assert!(matches!(&report.rollback[0], RollbackOutcome::Irreversible(s) if s == "remove"));
    }

    #[test]
    fn test_failure_message_and_rollback_problems() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        fs::write(&a, b"x").unwrap();

        let report = Transaction::new()
            .step(RemoveFile::new("remove", &a))
            .step(Failing)
            .run();

        assert_eq!(report.failure_message().as_deref(), Some("denied"));
        assert_eq!(report.rollback_problems(), vec!["'remove' cannot be undone"]);
    }

    #[test]
    fn test_require_file_stops_before_later_steps() {
        let dir = tempdir().unwrap();
        let keep = dir.path().join("keep");
        fs::write(&keep, b"x").unwrap();

        let report = Transaction::new()
            .step(RequireFile::new("require", dir.path().join("missing")))
            .step(RemoveFile::new("remove", &keep))
            .run();

        assert_eq!(report.failed_step(), Some("require"));
        assert!(report.completed.is_empty());
        assert!(keep.exists());
    }

    #[test]
    fn test_copy_failure_leaves_no_destination() {
        let dir = tempdir().unwrap();
        let to = dir.path().join("to");

        let mut step = CopyFile::new("copy", dir.path().join("missing"), &to);
        assert!(step.apply().is_err());
        assert!(!to.exists());
    }

    #[test]
    fn test_rename_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a"), b"new").unwrap();
        fs::write(dir.path().join("b"), b"keep").unwrap();

        let mut step = RenameFile::new("rename", dir.path().join("a"), dir.path().join("b"));
        let err = step.apply().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(fs::read(dir.path().join("b")).unwrap(), b"keep");
    }
}
