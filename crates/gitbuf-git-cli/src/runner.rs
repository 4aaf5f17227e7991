use crate::process_log::ProcessLog;
use gitbuf_core::services::CommandOutput;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Spawns `git`, captures stdout/stderr/exit/elapsed and appends exactly
/// one record per invocation to the process log.
#[derive(Clone)]
pub struct GitRunner {
    root: Option<PathBuf>,
    log: Arc<ProcessLog>,
}

impl GitRunner {
    pub fn new(root: Option<PathBuf>, log: Arc<ProcessLog>) -> Self {
        Self { root, log }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn run<S: AsRef<str>>(&self, args: &[S]) -> CommandOutput {
        self.run_inner(args, None)
    }

    /// Pipe `input` to the child's stdin, then close it.
    pub fn run_with_input<S: AsRef<str>>(&self, input: &str, args: &[S]) -> CommandOutput {
        self.run_inner(args, Some(input))
    }

    fn run_inner<S: AsRef<str>>(&self, args: &[S], input: Option<&str>) -> CommandOutput {
        let args: Vec<&str> = args.iter().map(|s| s.as_ref()).collect();

        let mut cmd = Command::new("git");
        if let Some(root) = &self.root {
            cmd.arg("-C").arg(root);
        }
        cmd.args(&args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GIT_PAGER", "cat")
            .env("GIT_EDITOR", ":")
            .env("GIT_SEQUENCE_EDITOR", ":");

        let started = Instant::now();
        let output = match input {
            Some(input) => {
                cmd.stdin(Stdio::piped())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped());
                cmd.spawn().and_then(|mut child| {
                    if let Some(mut stdin) = child.stdin.take() {
                        stdin.write_all(input.as_bytes())?;
                    }
                    child.wait_with_output()
                })
            }
            None => cmd.output(),
        };
        let elapsed = started.elapsed();

        match output {
            Ok(output) => {
                let result = CommandOutput {
                    exit: output.status.code().unwrap_or(-1),
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                    elapsed,
                };
                debug!(
                    target: "gitbuf::git",
                    args = %args.join(" "),
                    exit = result.exit,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "git finished"
                );
                self.log
                    .append_record(&format_record(&args, &result, input.is_some()));
                result
            }
            Err(error) => {
                warn!(target: "gitbuf::git", args = %args.join(" "), %error, "failed to spawn git");
                self.log
                    .append_record(&format!("ERROR: git {}: {error}", args.join(" ")));
                CommandOutput {
                    exit: -1,
                    stdout: String::new(),
                    stderr: error.to_string(),
                    elapsed,
                }
            }
        }
    }
}

fn format_record(args: &[&str], output: &CommandOutput, stdin_fed: bool) -> String {
    let joined = args.join(" ");
    let stdin_tag = if stdin_fed { " <<stdin" } else { "" };
    let secs = output.elapsed.as_secs_f64();
    if output.ok() {
        format!("$ git {joined}{stdin_tag}  [{secs:.2}s, ok]\n{}", output.stdout)
    } else {
        format!(
            "$ git {joined}{stdin_tag}  [{secs:.2}s, exit {}]\n{}",
            output.exit, output.stderr
        )
    }
}
