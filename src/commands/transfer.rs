use crate::OsyncContext;
use crate::error::Result;
use crate::filter::Direction;
use crate::output;
use crate::rsync::{CommandBuilder, RsyncCommand};
use std::path::Path;
use tracing::{Level, span};

/// Build the rsync invocation that moves `path` in `direction`
///
/// Pure apart from path canonicalization: nothing is printed or run.
///
/// # Errors
///
/// Returns an error if `path` cannot be mapped to the other side, e.g. a
/// relative path outside the proxy root.
pub fn plan(
    ctx: &OsyncContext,
    direction: Direction,
    path: &Path,
    force: bool,
    dry_run: bool,
) -> Result<RsyncCommand> {
    let endpoints = ctx.resolver.endpoints(direction, path)?;

    Ok(CommandBuilder::new(direction, endpoints.source, endpoints.dest)
        .filter_groups(&ctx.config.filters)
        .force(force)
        .dry_run(dry_run)
        .build())
}

/// Execute a push or pull of `path`
///
/// # Errors
///
/// Returns an error if:
/// - `path` cannot be mapped to the other side
/// - rsync is not installed or cannot be started
/// - rsync exits unsuccessfully (the error carries its status)
#[allow(clippy::fn_params_excessive_bools)]
pub fn execute(
    ctx: &OsyncContext,
    direction: Direction,
    path: &Path,
    force: bool,
    dry_run: bool,
) -> Result<()> {
    let span = span!(Level::DEBUG, "transfer", %direction, path = %path.display());
    let _guard = span.enter();

    match direction {
        Direction::Push => output::info(&format!("Pushing to {}", path.display())),
        Direction::Pull => output::info(&format!("Pulling from {}", path.display())),
    }
    if force {
        output::warning("Operation will be forced.");
    }

    let command = plan(ctx, direction, path, force, dry_run)?;
    output::verbose(&format!(
        "Using {} filter group(s) from {}",
        ctx.config.for_direction(direction).count(),
        ctx.config_path.display()
    ));
    output::action("Running", &command.display());

    command.execute()?;

    if dry_run {
        output::info("Dry run complete, nothing was transferred");
    } else {
        output::success(&format!("{} complete", transfer_noun(direction)));
    }
    Ok(())
}

/// Capitalized noun for completion messages
const fn transfer_noun(direction: Direction) -> &'static str {
    match direction {
        Direction::Push => "Push",
        Direction::Pull => "Pull",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_utils::TestProxy;
    use std::path::PathBuf;

    #[test]
    fn test_plan_push_applies_push_rules() {
        let proxy = TestProxy::with_config(
            r#"
[[filter]]
direction = "push"
kind = "include"
patterns = ["*.py"]

[[filter]]
direction = "pull"
kind = "include"
patterns = ["*.log"]
"#,
        );
        let ctx = proxy.context();
        proxy.create_file("project/main.py", "print('hi')\n");
        let file = ctx.resolver.proxy_root().join("project/main.py");

        let command = plan(&ctx, Direction::Push, &file, false, false).unwrap();
        let argv = command.argv();

        assert!(argv.contains(&"--include=*.py".to_string()));
        assert!(!argv.contains(&"--include=*.log".to_string()));
        assert_eq!(argv[argv.len() - 3], "--exclude=*");
        assert_eq!(argv[argv.len() - 2], file.display().to_string());
        assert_eq!(argv[argv.len() - 1], "user@host:/project/.");
    }

    #[test]
    fn test_plan_pull_forced_dry_run() {
        let proxy = TestProxy::with_config(
            r#"
[[filter]]
direction = "pull"
kind = "exclude"
patterns = ["*.log"]
"#,
        );
        let ctx = proxy.context();

        let command = plan(
            &ctx,
            Direction::Pull,
            Path::new("/var/data/report.csv"),
            true,
            true,
        )
        .unwrap();
        let tail: Vec<&str> = command.argv()[command.argv().len() - 3..]
            .iter()
            .map(String::as_str)
            .collect();

        assert!(!command.argv().contains(&"--exclude=*.log".to_string()));
        assert!(!command.argv().contains(&"--exclude=*".to_string()));
        assert_eq!(tail[0], "--dry-run");
        assert_eq!(tail[1], "user@host:/var/data/report.csv");
        assert_eq!(
            PathBuf::from(tail[2]),
            ctx.resolver.proxy_root().join("var/data/.")
        );
    }

    #[test]
    fn test_plan_rejects_relative_path_outside_root_on_pull() {
        let proxy = TestProxy::with_config("");
        let ctx = proxy.context();

        // Relative paths resolve against the test process cwd, never the temp proxy root.
        let err = plan(&ctx, Direction::Pull, Path::new("some/relative"), false, false)
            .unwrap_err();
        assert!(matches!(err, Error::RelativeOutsideRoot(_)));
    }
}
