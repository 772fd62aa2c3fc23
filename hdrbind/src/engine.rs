//! The external generation engine seam.
//!
//! An engine receives the shared options, the headers of one task and the
//! two scaffolded artifacts, and fills in the marker regions. Its failures
//! are passed through untouched as [`EngineError`].

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::EngineError;
use crate::options::GenerationOptions;

pub trait GenerationEngine {
    fn generate(
        &mut self,
        options: &GenerationOptions,
        headers: &[PathBuf],
        output_source: &Path,
        output_stub: &Path,
    ) -> Result<(), EngineError>;
}

/// Leaves the scaffolding as written.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScaffoldOnly;

impl GenerationEngine for ScaffoldOnly {
    fn generate(
        &mut self,
        _options: &GenerationOptions,
        _headers: &[PathBuf],
        _output_source: &Path,
        _output_stub: &Path,
    ) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Runs an external program once per header.
///
/// The options are piped to stdin as JSON. The command line is
/// `<program> <args..> --source <path> --stub <path> <headers..>`.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: PathBuf,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
}

impl CommandEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    fn command(&self, headers: &[PathBuf], output_source: &Path, output_stub: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg("--source")
            .arg(output_source)
            .arg("--stub")
            .arg(output_stub)
            .args(headers)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl GenerationEngine for CommandEngine {
    fn generate(
        &mut self,
        options: &GenerationOptions,
        headers: &[PathBuf],
        output_source: &Path,
        output_stub: &Path,
    ) -> Result<(), EngineError> {
        let json = options
            .to_json()
            .map_err(|e| EngineError::with_source("failed to serialize options", e))?;

        let program = self.program.display().to_string();
        debug!(program = %program, headers = headers.len(), "spawning engine");

        let mut child = self
            .command(headers, output_source, output_stub)
            .spawn()
            .map_err(|e| EngineError::with_source(format!("failed to spawn {program}"), e))?;

        // An engine that never reads stdin may exit before the write lands.
        if let Some(mut stdin) = child.stdin.take()
            && let Err(e) = stdin.write_all(json.as_bytes())
            && e.kind() != ErrorKind::BrokenPipe
        {
            return Err(EngineError::with_source(
                format!("failed to write options to {program}"),
                e,
            ));
        }

        let output = child
            .wait_with_output()
            .map_err(|e| EngineError::with_source(format!("failed to wait on {program}"), e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!(program = %program, output = %stdout.trim_end(), "engine stdout");
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::new(format!(
                "{program} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}
