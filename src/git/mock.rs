use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::git::runner::{CommandFailure, CommandRunner, Invocation, RunOptions};

/// A command seen by [MockRunner]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub command: String,
    pub read_only: bool,
    pub cwd: Option<PathBuf>,
}

#[derive(Debug, Clone)]
struct Scripted {
    prefix: String,
    response: Result<String, String>,
}

/// Mock runner for testing without spawning processes
///
/// Responses are matched by command prefix in registration order. Commands
/// without a scripted response succeed with empty output.
#[derive(Debug, Default)]
pub struct MockRunner {
    scripted: Vec<Scripted>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockRunner {
    /// Create a new mock runner where every command succeeds
    pub fn new() -> Self {
        MockRunner::default()
    }

    /// Answer commands starting with `prefix` with `output`
    pub fn on_success(mut self, prefix: impl Into<String>, output: impl Into<String>) -> Self {
        self.scripted.push(Scripted {
            prefix: prefix.into(),
            response: Ok(output.into()),
        });
        self
    }

    /// Fail commands starting with `prefix`, reporting `output` as their text
    pub fn on_failure(mut self, prefix: impl Into<String>, output: impl Into<String>) -> Self {
        self.scripted.push(Scripted {
            prefix: prefix.into(),
            response: Err(output.into()),
        });
        self
    }

    /// Every call made so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Command strings of every call made so far
    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.command).collect()
    }

    /// The first recorded call starting with `prefix`
    pub fn find_call(&self, prefix: &str) -> Option<RecordedCall> {
        self.calls().into_iter().find(|c| c.command.starts_with(prefix))
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(
        &self,
        invocation: &Invocation,
        options: RunOptions,
    ) -> Result<String, CommandFailure> {
        let command = invocation.to_string();

        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedCall {
                command: command.clone(),
                read_only: options.read_only,
                cwd: invocation.cwd.clone(),
            });

        match self.scripted.iter().find(|s| command.starts_with(&s.prefix)) {
            Some(Scripted {
                response: Ok(out), ..
            }) => Ok(out.clone()),
            Some(Scripted {
                response: Err(text),
                ..
            }) => Err(CommandFailure {
                command,
                exit_code: Some(1),
                output: text.clone(),
            }),
            None => Ok(String::new()),
        }
    }
}
