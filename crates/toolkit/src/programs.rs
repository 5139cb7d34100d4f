//! External program names and invocation.

use std::{
    io::Write,
    process::{Command, Stdio},
    thread,
};

use anyhow::{Context, Result, bail};
use log::{debug, error};

/// Executables the toolkit and hinter shell out to.
///
/// Each field is a program name looked up on `PATH`, or a path to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Programs {
    pub fontmake: String,
    pub fonttools: String,
    pub cffsubr: String,
    pub ttfautohint: String,
    pub otfautohint: String,
}

impl Default for Programs {
    fn default() -> Self {
        Self {
            fontmake: "fontmake".to_string(),
            fonttools: "fonttools".to_string(),
            cffsubr: "cffsubr".to_string(),
            ttfautohint: "ttfautohint".to_string(),
            otfautohint: "otfautohint".to_string(),
        }
    }
}

/// Run a command to completion and return its captured stdout.
///
/// `input` is fed to stdin when given. A non-zero exit logs the tool's
/// stderr and fails.
pub(crate) fn run(command: &mut Command, input: Option<&[u8]>) -> Result<Vec<u8>> {
    let program = command.get_program().to_string_lossy().into_owned();
    debug!(
        "Running {program} {}",
        command
            .get_args()
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );

    command
        .stdin(if input.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = command
        .spawn()
        .with_context(|| format!("Failed to start {program}"))?;

    let output = thread::scope(|scope| {
        if let (Some(input), Some(mut stdin)) = (input, child.stdin.take()) {
            scope.spawn(move || {
                if let Err(e) = stdin.write_all(input) {
                    debug!("Writing to stdin stopped early: {e}");
                }
            });
        }
        child.wait_with_output()
    })
    .with_context(|| format!("Failed to wait for {program}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("{program} failed:\n{}", stderr.trim_end());
        match output.status.code() {
            Some(code) => bail!("{program} exited with status {code}"),
            None => bail!("{program} was terminated by a signal"),
        }
    }
    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_programs() {
        let programs = Programs::default();
        assert_eq!(programs.fontmake, "fontmake");
        assert_eq!(programs.otfautohint, "otfautohint");
    }

    #[test]
    fn test_run_missing_program() {
        let mut command = Command::new("fontmill-no-such-program");
        let err = run(&mut command, None).unwrap_err();
        assert!(err.to_string().contains("Failed to start fontmill-no-such-program"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_pipes_stdin_to_stdout() {
        let mut command = Command::new("cat");
        let output = run(&mut command, Some(b"glyphs")).unwrap();
        assert_eq!(output, b"glyphs");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_reports_exit_status() {
        let mut command = Command::new("sh");
        command.args(["-c", "echo broken >&2; exit 3"]);
        let err = run(&mut command, None).unwrap_err();
        assert_eq!(err.to_string(), "sh exited with status 3");
    }
}
