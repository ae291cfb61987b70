//! Driver for the external C compiler.
//!
//! The engine does not link a compiler; it shells out to a pre-configured
//! command template such as `cc -x c -fPIC -shared -O3 -o {OUT} -`. The
//! template is split on whitespace and two placeholders are substituted:
//!
//! - `{OUT}`: the absolute path of the shared object to produce
//! - `{SRC}`: a unique temporary file holding the generated source
//!
//! When the template carries no `{SRC}` placeholder the source is streamed
//! to the compiler on stdin instead (the trailing `-` in the default
//! template). Compilation is synchronous; concurrent callers are safe
//! because every `{SRC}` substitution gets its own temporary file and stdin
//! streaming shares nothing.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;
use tempfile::NamedTempFile;

use crate::errors::CompileError;

/// Invokes the external compiler command over generated source.
#[derive(Debug, Clone)]
pub struct Compiler {
    cmd_template: String,
}

impl Compiler {
    pub fn new(cmd_template: impl Into<String>) -> Self {
        Self {
            cmd_template: cmd_template.into(),
        }
    }

    /// Compiles `source` into a shared object at `object`.
    ///
    /// Returns an error when the command cannot be spawned or exits with a
    /// non-zero status; the compiler's stderr is captured into the error.
    pub fn compile(&self, object: &Path, source: &str) -> Result<(), CompileError> {
        let mut tokens: Vec<String> = self
            .cmd_template
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if tokens.is_empty() {
            return Err(CompileError::InvalidCommand(self.cmd_template.clone()));
        }

        let use_src_file = tokens.iter().any(|t| t.contains("{SRC}"));

        // The temp file must outlive the child process, so it is held here
        // even though only the {SRC} path escapes into the command line.
        let mut staged: Option<NamedTempFile> = None;
        if use_src_file {
            let mut file = tempfile::Builder::new()
                .prefix("vecfuse-")
                .suffix(".c")
                .tempfile()
                .map_err(CompileError::TempFile)?;
            file.write_all(source.as_bytes())
                .map_err(CompileError::TempFile)?;
            file.flush().map_err(CompileError::TempFile)?;
            let src_path = file.path().to_string_lossy().into_owned();
            for t in &mut tokens {
                *t = t.replace("{SRC}", &src_path);
            }
            staged = Some(file);
        }
        for t in &mut tokens {
            *t = t.replace("{OUT}", &object.to_string_lossy());
        }

        debug!("compiling kernel object {}", object.display());

        let mut cmd = Command::new(&tokens[0]);
        cmd.args(&tokens[1..])
            .stdin(if use_src_file {
                Stdio::null()
            } else {
                Stdio::piped()
            })
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| CompileError::Spawn {
            command: tokens.join(" "),
            source,
        })?;

        if !use_src_file {
            let mut stdin = child.stdin.take().expect("stdin was piped");
            stdin
                .write_all(source.as_bytes())
                .map_err(CompileError::WriteSource)?;
            // Dropping stdin closes the pipe so the compiler sees EOF.
        }

        let output = child.wait_with_output().map_err(CompileError::WriteSource)?;
        drop(staged);

        if !output.status.success() {
            return Err(CompileError::CompilerFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }

    /// One-line attribute dump for diagnostics.
    pub fn text(&self) -> String {
        format!("compiler_cmd=\"{}\"", self.cmd_template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn have_cc() -> bool {
        Command::new("cc")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }

    #[test]
    fn test_unspawnable_command_is_an_error() {
        let compiler = Compiler::new("definitely-not-a-compiler -o {OUT} -");
        let dir = tempfile::tempdir().unwrap();
        let obj = dir.path().join("k.so");
        let err = compiler.compile(&obj, "int x;").unwrap_err();
        assert!(matches!(err, CompileError::Spawn { .. }));
    }

    #[test]
    fn test_empty_template_is_an_error() {
        let compiler = Compiler::new("   ");
        let dir = tempfile::tempdir().unwrap();
        let err = compiler.compile(&dir.path().join("k.so"), "").unwrap_err();
        assert!(matches!(err, CompileError::InvalidCommand(_)));
    }

    #[test]
    fn test_stdin_compile_produces_object() {
        if !have_cc() {
            return;
        }
        let compiler = Compiler::new("cc -x c -fPIC -shared -O2 -o {OUT} -");
        let dir = tempfile::tempdir().unwrap();
        let obj = dir.path().join("k.so");
        compiler
            .compile(&obj, "void launcher(void* data_list[]) { (void)data_list; }\n")
            .unwrap();
        assert!(obj.exists());
    }

    #[test]
    fn test_src_file_compile_produces_object() {
        if !have_cc() {
            return;
        }
        let compiler = Compiler::new("cc -fPIC -shared -O2 -o {OUT} {SRC}");
        let dir = tempfile::tempdir().unwrap();
        let obj = dir.path().join("k.so");
        compiler
            .compile(&obj, "void launcher(void* data_list[]) { (void)data_list; }\n")
            .unwrap();
        assert!(obj.exists());
    }

    #[test]
    fn test_bad_source_reports_compiler_stderr() {
        if !have_cc() {
            return;
        }
        let compiler = Compiler::new("cc -x c -fPIC -shared -o {OUT} -");
        let dir = tempfile::tempdir().unwrap();
        let err = compiler
            .compile(&dir.path().join("k.so"), "this is not C\n")
            .unwrap_err();
        match err {
            CompileError::CompilerFailed { stderr, .. } => assert!(!stderr.is_empty()),
            other => panic!("expected CompilerFailed, got {other:?}"),
        }
    }
}
