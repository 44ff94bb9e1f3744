//! External body transpilation.
//!
//! Directive bodies are written in JavaScript. The class-sugar dialect can
//! route them through an external converter (such as `js2coffee`). The
//! converter is an injected collaborator so that the compiler core never
//! depends on a subprocess being available.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::TranspileError;

/// Converts one wrapped function body into the target dialect.
///
/// `wrapped_body` is a complete function, `function __x__(params) { ... }`.
/// The returned lines include the translated function header as their first
/// line; callers drop it.
pub trait BodyTranspiler: Sync {
    fn transpile(&self, wrapped_body: &str, params: &str) -> Result<Vec<String>, TranspileError>;
}

/// Wrap a raw body in the throwaway function the transpiler expects.
pub fn wrap_body(body: &str, params: &str) -> String {
    let params = if params.is_empty() { "()" } else { params };
    format!("function __x__{} {{\n{}\n}}", params, body.trim_end())
}

/// Body lines kept from a successful transpile, indented for their context.
pub fn translated_body(lines: Vec<String>, indent: &str) -> Vec<String> {
    lines
        .into_iter()
        .skip(1)
        .map(|line| format!("{}{}", indent, line))
        .collect()
}

/// Runs an external command, feeding the wrapped body on stdin.
///
/// Any stderr output counts as failure, even with a zero exit status, since
/// converters commonly report parse errors there without failing.
#[derive(Debug, Clone)]
pub struct CommandTranspiler {
    program: String,
    args: Vec<String>,
}

impl CommandTranspiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Split a command line such as `"js2coffee --no-comments"` on whitespace.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    fn spawn_error(&self, source: std::io::Error) -> TranspileError {
        TranspileError::Spawn {
            command: self.program.clone(),
            source,
        }
    }
}

impl BodyTranspiler for CommandTranspiler {
    fn transpile(&self, wrapped_body: &str, _params: &str) -> Result<Vec<String>, TranspileError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(wrapped_body.as_bytes())
                .map_err(|e| self.spawn_error(e))?;
        }

        let output = child.wait_with_output().map_err(|e| self.spawn_error(e))?;
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() || !stderr.is_empty() {
            return Err(TranspileError::Failed {
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.split('\n').map(str::to_string).collect())
    }
}
