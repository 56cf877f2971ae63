//! Runner module - Invocation of external commands (`flutter create`, `flutter pub add`)

use std::path::Path;
use xshell::Shell;

use super::error::{Error, Result};

/// What an external command left behind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process ended without one (killed by a signal)
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Runs a program with arguments inside a directory
pub trait CommandRunner {
    /// Run to completion. A non-zero exit is reported through
    /// [`CommandOutput::status`]; only a failure to start is an `Err`.
    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<CommandOutput>;

    /// Like [`CommandRunner::run`] but a non-zero exit becomes
    /// [`Error::ExternalProcess`]
    fn run_checked(&self, dir: &Path, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let output = self.run(dir, program, args)?;
        if !output.success() {
            return Err(Error::ExternalProcess {
                command: command_line(program, args),
                status: output.status,
                stderr: output.stderr,
            });
        }
        Ok(output)
    }
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<CommandOutput> {
        (**self).run(dir, program, args)
    }
}

/// Human-readable form of a command, for messages
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs real processes through `xshell`
#[derive(Debug, Default, Clone, Copy)]
pub struct XshellRunner;

impl CommandRunner for XshellRunner {
    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let spawn_error = |err: xshell::Error| Error::ExternalProcess {
            command: command_line(program, args),
            status: None,
            stderr: err.to_string(),
        };

        let sh = Shell::new().map_err(spawn_error)?;
        let _dir = sh.push_dir(dir);
        let output = sh
            .cmd(program)
            .args(args)
            .quiet()
            .ignore_status()
            .output()
            .map_err(spawn_error)?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
