//! JIT-compiling CPU vector engine with loop fusion.
//!
//! This crate executes batches of primitive array instructions (element-wise
//! maps and zips, reductions, scans, random generation, memory management)
//! on behalf of a higher-level array runtime. Compatible operations are
//! fused into loop nests, each fused block is emitted as C source, compiled
//! into a shared object by an external compiler and cached in a persistent
//! content-addressed store, and the loaded kernels are invoked directly over
//! the array buffers.
//!
//! # Features
//!
//! - Serial adjacency fusion with reshape support and a conservative
//!   data-parallel compatibility predicate
//! - Peeled reduction/scan prologues, so no separate initialization pass
//! - A kernel store keyed by a structural fingerprint, persistent across
//!   process restarts
//! - A victim cache recycling freed buffers by size
//!
//! # Example
//!
//! ```no_run
//! use vecfuse::prelude::*;
//!
//! let mut engine = Engine::new(Config::default()).unwrap();
//! let mut pool = BasePool::new();
//!
//! // a = b + c over 1000 doubles
//! let b = pool.create(ElemType::F64, 1000);
//! let c = pool.create(ElemType::F64, 1000);
//! let a = pool.create(ElemType::F64, 1000);
//! let batch = vec![Instruction::zip(
//!     Operator::Add,
//!     View::full(a, 1000),
//!     View::full(b, 1000),
//!     View::full(c, 1000),
//! )];
//! engine.execute(&mut pool, &batch).unwrap();
//! ```
//!
//! The engine is single-threaded: the caller serializes `execute` calls,
//! and only the external compiler invocation blocks.

pub use crate::array::{BaseArray, BaseId, BasePool, View};
pub use crate::config::Config;
pub use crate::engine::Engine;
pub use crate::errors::EngineError;
pub use crate::instr::{Constant, Instruction, Opcode, Operand, Operator};
pub use crate::types::{ElemType, ErrorCode};

pub mod prelude {
    pub use crate::array::{BaseArray, BaseId, BasePool, Element, View};
    pub use crate::config::Config;
    pub use crate::engine::{Engine, ExtHandler};
    pub use crate::errors::EngineError;
    pub use crate::instr::{Constant, Instruction, Opcode, Operand, Operator};
    pub use crate::types::{ElemType, ErrorCode};
}

/// Base arrays, strided views and id maps
pub mod array;
/// The nested block model of fused instruction groups
pub mod block;
/// C source emission and kernel fingerprinting
pub mod codegen;
/// Driver for the external C compiler
pub mod compile;
/// Engine configuration and environment loading
pub mod config;
/// The batch orchestrator
pub mod engine;
/// Error types for compilation, loading and execution
pub mod errors;
/// The fusion passes
pub mod fuser;
/// Instructions, opcodes, operators and constants
pub mod instr;
/// The persistent compiled-kernel store
pub mod store;
/// Element types and kernel entry-point signatures
pub mod types;
/// The victim cache for freed buffers
pub mod vcache;
