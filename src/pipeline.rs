//! Running an alias as a chain of processes
//!
//! The alias program is the first stage. Every pipe marker in the template starts a
//! new stage, and each stage's stdout feeds the next stage's stdin. Arguments passed
//! on the command line are appended to the first stage only; later stages are fixed
//! pipe recipients defined by the alias. All stages share the caller's stderr.

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command as ProcessCommand, ExitStatus, Stdio};

use log::debug;
use thiserror::Error;

use crate::commands::command::Command;
use crate::commands::template::TemplateToken;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("pipeline stage {0} has no program")]
    EmptyStage(usize),
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to wait for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// One process of a pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    /// Full argument vector; `argv[0]` is the program name as written in the alias
    pub argv: Vec<String>,
    /// Program located on `PATH`, or the literal name if it could not be found
    pub executable: PathBuf,
}

impl Stage {
    fn new(argv: Vec<String>) -> Self {
        let program = &argv[0];
        let executable = lookup_executable(program).unwrap_or_else(|| PathBuf::from(program));
        debug!("Stage `{program}` resolved to {}", executable.display());
        Stage { argv, executable }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    fn command(&self, stdin: Stdio, stdout: Stdio) -> ProcessCommand {
        let mut command = ProcessCommand::new(&self.executable);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.arg0(self.program());
        }
        command
            .args(&self.argv[1..])
            .stdin(stdin)
            .stdout(stdout)
            .stderr(Stdio::inherit());
        command
    }
}

/// Argument vector of a stage under construction; empty while its program is unknown
#[derive(Default)]
struct StageDraft {
    argv: Vec<String>,
}

impl StageDraft {
    fn with_program(program: &str) -> Self {
        let mut draft = StageDraft::default();
        draft.push(program);
        draft
    }

    fn push(&mut self, arg: &str) {
        if self.argv.is_empty() && arg.is_empty() {
            return;
        }
        self.argv.push(arg.to_string());
    }
}

/// Processes to run for a resolved alias, in pipe order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Split the alias template into stages and append `rest` to the first one.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::EmptyStage` if a stage ends up without a program, e.g. a
    /// template ending in a bare `|`.
    pub fn build(command: &Command, rest: &[String]) -> Result<Self, PipelineError> {
        let mut drafts = vec![StageDraft::with_program(&command.path)];
        for token in &command.template {
            match token {
                TemplateToken::Pipe(Some(program)) => {
                    drafts.push(StageDraft::with_program(program));
                }
                TemplateToken::Pipe(None) => drafts.push(StageDraft::default()),
                TemplateToken::Arg(arg) => {
                    if let Some(current) = drafts.last_mut() {
                        current.push(arg);
                    }
                }
            }
        }

        if let Some(index) = drafts.iter().position(|draft| draft.argv.is_empty()) {
            return Err(PipelineError::EmptyStage(index));
        }
        drafts[0].argv.extend(rest.iter().cloned());

        let stages: Vec<Stage> = drafts
            .into_iter()
            .map(|draft| Stage::new(draft.argv))
            .collect();
        debug!("Built pipeline with {} stage(s)", stages.len());
        Ok(Pipeline { stages })
    }

    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Run the pipeline attached to the current process's stdin and stdout.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::run_with`].
    pub fn run(&self) -> Result<i32, PipelineError> {
        self.run_with(Stdio::inherit(), Stdio::inherit())
    }

    /// Start every stage, then wait for all of them in order. Returns the exit code of
    /// the last stage; the statuses of earlier stages are ignored.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Spawn` if a stage fails to start (already started stages
    /// are killed and reaped), or `PipelineError::Wait` if waiting on a stage fails.
    pub fn run_with(&self, stdin: Stdio, stdout: Stdio) -> Result<i32, PipelineError> {
        let last = self.stages.len() - 1;
        let mut input = Some(stdin);
        let mut output = Some(stdout);
        let mut children: Vec<(&Stage, Child)> = Vec::with_capacity(self.stages.len());

        for (index, stage) in self.stages.iter().enumerate() {
            let stage_stdin = input.take().unwrap_or_else(Stdio::null);
            let stage_stdout = if index == last {
                output.take().unwrap_or_else(Stdio::inherit)
            } else {
                Stdio::piped()
            };
            debug!("Starting stage {index}: {:?}", stage.argv);
            match stage.command(stage_stdin, stage_stdout).spawn() {
                Ok(mut child) => {
                    input = child.stdout.take().map(Stdio::from);
                    children.push((stage, child));
                }
                Err(source) => {
                    reap(children);
                    return Err(PipelineError::Spawn {
                        program: stage.program().to_string(),
                        source,
                    });
                }
            }
        }

        let mut code = 0;
        for (index, (stage, mut child)) in children.into_iter().enumerate() {
            let status = child.wait().map_err(|source| PipelineError::Wait {
                program: stage.program().to_string(),
                source,
            })?;
            if index == last {
                code = exit_code(status);
            } else if !status.success() {
                debug!("Stage {index} (`{}`) exited with {status}", stage.program());
            }
        }
        Ok(code)
    }
}

fn reap(children: Vec<(&Stage, Child)>) {
    for (stage, mut child) in children {
        debug!("Stopping `{}` after failed start", stage.program());
        let _ = child.kill();
        let _ = child.wait();
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .unwrap_or_else(|| status.signal().map_or(1, |signal| 128 + signal))
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Find `program` on `PATH`. Names containing a directory are left to the OS.
fn lookup_executable(program: &str) -> Option<PathBuf> {
    if Path::new(program).components().count() != 1 {
        return None;
    }
    let search_path = env::var_os("PATH")?;
    env::split_paths(&search_path)
        .flat_map(|dir| candidates(&dir, program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(not(windows))]
fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    vec![dir.join(program)]
}

#[cfg(windows)]
fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    let mut found = vec![dir.join(program)];
    if Path::new(program).extension().is_none() {
        let extensions = env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
        found.extend(
            extensions
                .split(';')
                .filter(|ext| !ext.is_empty())
                .map(|ext| dir.join(format!("{program}{ext}"))),
        );
    }
    found
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
