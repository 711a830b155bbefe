//! Optional per-file formatting after a generated file is written.
//!
//! The hook is off unless an environment variable names a formatter command.
//! When on, each written file with the generated language's extension is
//! passed to that command. Failures become warnings; they never abort a run.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::FileCategory;

/// Exit status of an external command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Launches an external command and waits for it to finish.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutcome>;
}

/// Runs commands with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutcome> {
        // `status` waits for the child, so it is reaped on every path.
        let status = Command::new(program).args(args).status()?;
        Ok(CommandOutcome {
            exit_code: status.code(),
        })
    }
}

/// Why formatting a file did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostProcessFailure {
    /// The command could not be started.
    Launch(String),
    /// The command ran and exited unsuccessfully.
    ExitCode(Option<i32>),
}

/// A non-fatal formatter failure for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostProcessWarning {
    pub path: PathBuf,
    pub command: String,
    pub failure: PostProcessFailure,
}

impl fmt::Display for PostProcessWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.failure {
            PostProcessFailure::Launch(err) => write!(
                f,
                "error running the command ({} {}): {err}",
                self.command,
                self.path.display()
            ),
            PostProcessFailure::ExitCode(Some(code)) => write!(
                f,
                "error running the command ({} {}). Exit code: {code}",
                self.command,
                self.path.display()
            ),
            PostProcessFailure::ExitCode(None) => write!(
                f,
                "command ({} {}) was terminated by a signal",
                self.command,
                self.path.display()
            ),
        }
    }
}

/// Runs the configured formatter against written source files.
pub struct PostProcessHook {
    command: Option<String>,
    extension: String,
    runner: Box<dyn CommandRunner>,
}

impl fmt::Debug for PostProcessHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostProcessHook")
            .field("command", &self.command)
            .field("extension", &self.extension)
            .finish_non_exhaustive()
    }
}

impl PostProcessHook {
    /// Build a hook with an explicit command. An empty or blank command disables it.
    pub fn new(
        command: Option<String>,
        extension: &str,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            command: command.filter(|c| !c.trim().is_empty()),
            extension: extension.trim_start_matches('.').to_string(),
            runner,
        }
    }

    /// Read the formatter command from `env_var`, running it with the system runner.
    pub fn from_env(env_var: &str, extension: &str) -> Self {
        let command = std::env::var(env_var).ok();
        if command.is_none() {
            log::debug!("{env_var} not set; skipping post-processing of generated files");
        }
        Self::new(command, extension, Box::new(SystemCommandRunner))
    }

    /// A hook that never runs anything.
    pub fn disabled() -> Self {
        Self::new(None, "", Box::new(SystemCommandRunner))
    }

    pub fn is_enabled(&self) -> bool {
        self.command.is_some()
    }

    fn applies_to(&self, path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some(self.extension.as_str())
    }

    /// Format `path` if the hook is enabled and the extension matches.
    ///
    /// Returns a warning when the command cannot be launched or exits non-zero.
    pub fn after_file_written(
        &self,
        path: &Path,
        category: FileCategory,
    ) -> Option<PostProcessWarning> {
        let command = self.command.as_deref()?;
        if !self.applies_to(path) {
            return None;
        }

        let mut parts = command.split_whitespace();
        let program = parts.next()?;
        let mut args: Vec<String> = parts.map(String::from).collect();
        args.push(path.display().to_string());

        let failure = match self.runner.run(program, &args) {
            Ok(outcome) if outcome.is_success() => {
                log::info!(
                    "successfully executed: {command} {} ({})",
                    path.display(),
                    category.as_str()
                );
                return None;
            }
            Ok(outcome) => PostProcessFailure::ExitCode(outcome.exit_code),
            Err(err) => PostProcessFailure::Launch(err.to_string()),
        };

        let warning = PostProcessWarning {
            path: path.to_path_buf(),
            command: command.to_string(),
            failure,
        };
        log::warn!("{warning}");
        Some(warning)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    type Calls = Rc<RefCell<Vec<(String, Vec<String>)>>>;

    /// Records every invocation and answers with a fixed result.
    struct SpyRunner {
        calls: Calls,
        exit_code: Option<i32>,
        launch_error: bool,
    }

    fn spy(exit_code: Option<i32>) -> (Box<dyn CommandRunner>, Calls) {
        let calls = Calls::default();
        let runner = SpyRunner {
            calls: calls.clone(),
            exit_code,
            launch_error: false,
        };
        (Box::new(runner), calls)
    }

    impl CommandRunner for SpyRunner {
        fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutcome> {
            self.calls
                .borrow_mut()
                .push((program.to_string(), args.to_vec()));
            if self.launch_error {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no such file"));
            }
            Ok(CommandOutcome {
                exit_code: self.exit_code,
            })
        }
    }

    #[test]
    fn test_disabled_never_runs() {
        let (runner, calls) = spy(Some(0));
        let hook = PostProcessHook::new(None, "js", runner);
        assert!(!hook.is_enabled());
        assert!(
            hook.after_file_written(Path::new("src/server.js"), FileCategory::Supporting)
                .is_none()
        );
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_blank_command_disables() {
        let (runner, _) = spy(Some(0));
        let hook = PostProcessHook::new(Some("  ".to_string()), "js", runner);
        assert!(!hook.is_enabled());
    }

    #[test]
    fn test_skips_other_extensions() {
        let (runner, calls) = spy(Some(0));
        let hook = PostProcessHook::new(Some("prettier".to_string()), ".js", runner);
        assert!(
            hook.after_file_written(Path::new("src/api/openapi.yaml"), FileCategory::Supporting)
                .is_none()
        );
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_splits_command_and_appends_path() {
        let (runner, calls) = spy(Some(0));
        let hook = PostProcessHook::new(Some("npx prettier --write".to_string()), "js", runner);
        let warning = hook.after_file_written(Path::new("out/src/config.js"), FileCategory::Api);
        assert!(warning.is_none());
        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "npx");
        assert_eq!(calls[0].1, vec!["prettier", "--write", "out/src/config.js"]);
    }

    #[test]
    fn test_non_zero_exit_is_warning() {
        let (runner, _) = spy(Some(2));
        let hook = PostProcessHook::new(Some("eslint --fix".to_string()), "js", runner);
        let warning = hook
            .after_file_written(Path::new("src/logger.js"), FileCategory::Supporting)
            .unwrap();
        assert_eq!(warning.failure, PostProcessFailure::ExitCode(Some(2)));
        assert!(warning.to_string().contains("Exit code: 2"));
    }

    #[test]
    fn test_launch_error_is_warning() {
        let runner = SpyRunner {
            calls: Calls::default(),
            exit_code: None,
            launch_error: true,
        };
        let hook = PostProcessHook::new(Some("missing-fmt".to_string()), "js", Box::new(runner));
        let warning = hook
            .after_file_written(Path::new("src/server.js"), FileCategory::Supporting)
            .unwrap();
        assert!(matches!(warning.failure, PostProcessFailure::Launch(_)));
    }

    #[test]
    fn test_system_runner_reports_exit_code() {
        // `false` is available on every unix CI image.
        if cfg!(unix) {
            let outcome = SystemCommandRunner.run("false", &[]).unwrap();
            assert!(!outcome.is_success());
        }
    }
}
