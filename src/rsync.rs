//! rsync argument construction and execution.
//!
//! Building and running are two separate steps: [`CommandBuilder::build`]
//! is a pure function of its inputs and yields an [`RsyncCommand`], whose
//! [`RsyncCommand::execute`] hands the exact token vector to the external
//! program.

use crate::error::{Error, Result};
use crate::filter::{Direction, FilterGroup};
use std::process::{Command, ExitStatus};
use tracing::{Level, debug, info, span};

/// Program invoked for every transfer.
pub const RSYNC_PROGRAM: &str = "rsync";

/// Catch-all appended after the direction's rules unless forced.
pub const EXCLUDE_ALL: &str = "--exclude=*";

/// Appended when only simulating the transfer.
pub const DRY_RUN: &str = "--dry-run";

/// Transport flags every invocation starts with.
pub const BASE_ARGS: &[&str] = &[
    "--verbose",           // increase verbosity
    "--recursive",         // recurse into directories
    "--links",             // copy symlinks as symlinks
    "--copy-unsafe-links", // only "unsafe" symlinks are transformed
    "--times",             // preserve modification times
    "--update",            // skip files that are newer on the receiver
    "--perms",             // preserve permissions
    "--exclude=.git",
    "--exclude=osync.toml",
    "--include=*/", // keep descending so the catch-all only drops files
];

/// Collects the inputs of one transfer.
#[derive(Debug, Clone)]
pub struct CommandBuilder<'a> {
    /// Transfer direction, selects which rules apply
    direction: Direction,
    /// Already-resolved source
    source: String,
    /// Already-resolved destination
    dest: String,
    /// Rules in configuration order
    filter_groups: &'a [FilterGroup],
    /// Skip all rules and the catch-all exclude
    force: bool,
    /// Append `--dry-run`
    dry_run: bool,
}

impl<'a> CommandBuilder<'a> {
    /// Starts a builder with no rules, not forced, not a dry run.
    #[must_use]
    pub fn new(direction: Direction, source: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            direction,
            source: source.into(),
            dest: dest.into(),
            filter_groups: &[],
            force: false,
            dry_run: false,
        }
    }

    /// Rules to choose from; only those matching the direction are used.
    #[must_use]
    pub fn filter_groups(mut self, filter_groups: &'a [FilterGroup]) -> Self {
        self.filter_groups = filter_groups;
        self
    }

    /// Transfer everything, ignoring configured rules.
    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Only simulate.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Assembles the ordered token vector.
    ///
    /// Layout: program, base flags, the direction's rule flags followed by
    /// `--exclude=*` (both skipped when forced), `--dry-run` if requested,
    /// then source and destination.
    #[must_use]
    pub fn build(&self) -> RsyncCommand {
        let mut argv: Vec<String> = Vec::with_capacity(BASE_ARGS.len() + 5);
        argv.push(RSYNC_PROGRAM.to_string());
        argv.extend(BASE_ARGS.iter().map(ToString::to_string));

        if !self.force {
            for group in self
                .filter_groups
                .iter()
                .filter(|group| group.applies_to(self.direction))
            {
                argv.extend(group.rsync_args());
            }
            argv.push(EXCLUDE_ALL.to_string());
        }

        if self.dry_run {
            argv.push(DRY_RUN.to_string());
        }

        argv.push(self.source.clone());
        argv.push(self.dest.clone());

        RsyncCommand { argv }
    }
}

/// A fully built invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsyncCommand {
    /// Program name followed by its arguments
    argv: Vec<String>,
}

impl RsyncCommand {
    /// Program name and all arguments, in order.
    #[must_use]
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Program name (first token).
    #[must_use]
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    /// Arguments after the program name.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    /// Shell-quoted rendering, suitable for copy-pasting into a terminal.
    #[must_use]
    pub fn display(&self) -> String {
        shell_words::join(&self.argv)
    }

    /// Runs the command and waits for it.
    ///
    /// stdin/stdout/stderr are inherited so rsync's own output reaches the user.
    ///
    /// # Errors
    ///
    /// - [`Error::ToolNotFound`] if the program is not on `PATH`
    /// - [`Error::Spawn`] if it cannot be started
    /// - [`Error::CommandFailed`] / [`Error::CommandKilled`] on unsuccessful exit
    pub fn execute(&self) -> Result<()> {
        let span = span!(Level::DEBUG, "rsync_execute");
        let _guard = span.enter();

        let program = which::which(self.program()).map_err(|source| Error::ToolNotFound {
            program: self.program().to_string(),
            source,
        })?;
        debug!(program = %program.display(), "Located sync program");

        info!(argv = ?self.argv, "Running transfer");
        let status = Command::new(&program)
            .args(self.args())
            .status()
            .map_err(|source| Error::Spawn {
                program: self.program().to_string(),
                source,
            })?;

        check_status(self.program(), status)
    }
}

/// Maps a finished process status onto the error taxonomy.
fn check_status(program: &str, status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    if let Some(code) = status.code() {
        return Err(Error::CommandFailed {
            program: program.to_string(),
            code,
        });
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Err(Error::CommandKilled {
                program: program.to_string(),
                signal,
            });
        }
    }

    Err(Error::CommandFailed {
        program: program.to_string(),
        code: 1,
    })
}
