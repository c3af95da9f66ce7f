//! Scripted command runner for tests.
//!
//! Compiled unconditionally so integration tests (and any embedding code
//! that wants a dry-run mode) can use it without feature flags.

use super::{CommandOutput, CommandRunner};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::Mutex;

/// One recorded call made through the runner.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub input: Option<String>,
}

#[derive(Default)]
struct MockState {
    invocations: Vec<Invocation>,
    scripted: HashMap<String, VecDeque<CommandOutput>>,
    unavailable: Vec<String>,
}

/// A [`CommandRunner`] that never spawns anything.
///
/// Every call is recorded. Outputs can be scripted per program name and
/// are consumed in order; a program with no script left succeeds with
/// empty output. A program marked unavailable fails the spawn itself.
#[derive(Default)]
pub struct MockRunner {
    state: Mutex<MockState>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a scripted output for the next invocation of `program`.
    pub fn script(&self, program: &str, output: CommandOutput) {
        let mut state = self.state.lock().expect("mock state lock");
        state
            .scripted
            .entry(program.to_string())
            .or_default()
            .push_back(output);
    }

    /// Queue a successful invocation of `program` producing `stdout`.
    pub fn script_stdout(&self, program: &str, stdout: &str) {
        self.script(
            program,
            CommandOutput {
                status_code: Some(0),
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        );
    }

    /// Queue a failing invocation of `program` with an exit code and
    /// stderr text.
    pub fn script_failure(&self, program: &str, code: i32, stderr: &str) {
        self.script(
            program,
            CommandOutput {
                status_code: Some(code),
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        );
    }

    /// Make every invocation of `program` fail to spawn, as if the binary
    /// were missing.
    pub fn mark_unavailable(&self, program: &str) {
        let mut state = self.state.lock().expect("mock state lock");
        state.unavailable.push(program.to_string());
    }

    /// All calls made so far, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.state.lock().expect("mock state lock").invocations.clone()
    }

    /// Programs invoked so far, in order.
    pub fn invoked_programs(&self) -> Vec<String> {
        self.invocations().into_iter().map(|i| i.program).collect()
    }

    fn record(&self, program: &str, args: &[&str], input: Option<&str>) -> io::Result<CommandOutput> {
        let mut state = self.state.lock().expect("mock state lock");

        if state.unavailable.iter().any(|p| p == program) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{program}: command not found"),
            ));
        }

        state.invocations.push(Invocation {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            input: input.map(|s| s.to_string()),
        });

        let output = state
            .scripted
            .get_mut(program)
            .and_then(|queue| queue.pop_front())
            .unwrap_or(CommandOutput {
                status_code: Some(0),
                stdout: String::new(),
                stderr: String::new(),
            });

        Ok(output)
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput> {
        self.record(program, args, None)
    }

    async fn run_with_input(
        &self,
        program: &str,
        args: &[&str],
        input: &str,
    ) -> io::Result<CommandOutput> {
        self.record(program, args, Some(input))
    }
}
