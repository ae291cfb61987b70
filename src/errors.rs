//! Error types for the vecfuse crate.
//!
//! This module defines the error types that can occur while compiling,
//! loading and executing kernels. The main error types are:
//!
//! - `CompileError`: Errors while driving the external C compiler
//! - `StoreError`: Errors while loading or scanning compiled kernel objects
//! - `EngineError`: High-level errors surfaced from batch execution
//!
//! Each error type implements the standard Error trait via `thiserror`.
//! `EngineError` additionally maps onto the flat [`ErrorCode`] words of the
//! upstream runtime contract.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{ElemType, ErrorCode};

/// Errors that can occur while invoking the external compiler command.
#[derive(Error, Debug)]
pub enum CompileError {
    /// The configured command template is empty or unparsable
    #[error("empty or invalid compiler command template: {0:?}")]
    InvalidCommand(String),
    /// The compiler process could not be spawned
    #[error("failed to spawn compiler {command:?}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    /// Writing the generated source to the compiler failed
    #[error("failed to stream source to compiler: {0}")]
    WriteSource(#[source] std::io::Error),
    /// Staging the source in a temporary file failed
    #[error("failed to stage source in a temporary file: {0}")]
    TempFile(#[source] std::io::Error),
    /// The compiler exited with a non-zero status
    #[error("compiler exited with {status}: {stderr}")]
    CompilerFailed { status: String, stderr: String },
}

/// Errors that can occur in the persistent kernel store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Scanning the object directory failed
    #[error("failed to scan object directory {}: {source}", .dir.display())]
    Scan {
        dir: PathBuf,
        source: std::io::Error,
    },
    /// The object file for a fingerprint does not exist on disk
    #[error("no kernel object at {}", .0.display())]
    MissingObject(PathBuf),
    /// The object loaded but does not export the `launcher` symbol
    #[error("object {} lacks the launcher symbol", .0.display())]
    MissingLauncher(PathBuf),
}

/// High-level errors surfaced from batch execution.
///
/// One error is reported per batch; the batch is abandoned at the first
/// failure and already-allocated outputs stay allocated (the upstream runtime
/// cleans up via subsequent FREEs).
#[derive(Error, Debug)]
pub enum EngineError {
    /// A base-array buffer could not be allocated
    #[error("out of memory allocating {bytes} bytes")]
    OutOfMemory { bytes: usize },
    /// Driving the external compiler failed
    #[error("kernel compilation failed")]
    Compilation(#[from] CompileError),
    /// Loading a compiled kernel object failed
    #[error("kernel load failed")]
    Load(#[from] StoreError),
    /// The operator cannot be expressed for the given element type
    #[error("operator {operator} is not supported for element type {ty:?}")]
    TypeNotSupported { operator: &'static str, ty: ElemType },
    /// The opcode/operator combination is not one the code generator knows
    #[error("unsupported operator {operator} for opcode {opcode}")]
    UnsupportedOperator {
        opcode: &'static str,
        operator: &'static str,
    },
    /// An extension opcode arrived without a registered handler
    #[error("no extension registered for opcode {0}")]
    ExtensionNotSupported(u32),
    /// A FREE instruction referenced a base that was never tracked
    #[error("freeing unknown base array #{0}")]
    UnknownBaseFree(usize),
    /// Creating a configured directory failed
    #[error("failed to create directory {}: {source}", .dir.display())]
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },
}

impl From<&EngineError> for ErrorCode {
    fn from(err: &EngineError) -> Self {
        match err {
            EngineError::OutOfMemory { .. } => ErrorCode::OutOfMemory,
            EngineError::ExtensionNotSupported(_) => ErrorCode::UserFuncNotSupported,
            EngineError::TypeNotSupported { .. } => ErrorCode::TypeNotSupported,
            _ => ErrorCode::Error,
        }
    }
}

impl<T> From<&Result<T, EngineError>> for ErrorCode {
    fn from(res: &Result<T, EngineError>) -> Self {
        match res {
            Ok(_) => ErrorCode::Success,
            Err(e) => ErrorCode::from(e),
        }
    }
}
