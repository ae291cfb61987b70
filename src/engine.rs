//! The engine driver: orchestrates fusion, compilation, caching and
//! execution for each incoming instruction batch.
//!
//! For every batch the driver tracks live base arrays, fuses the batch into
//! blocks, resolves each kernel against the store (emitting source and
//! invoking the external compiler on a miss), realizes output buffers via
//! the victim cache, invokes the loaded launcher over the data pointers and
//! finally processes queued FREEs.
//!
//! Extension opcodes bypass the pipeline: the batch is split at each
//! extension instruction and the registered handler is dispatched in order
//! between the surrounding segments.

use std::collections::{HashMap, HashSet};
use std::os::raw::c_void;

use colored::Colorize;
use log::{debug, error, warn};

use crate::array::{BaseId, BasePool, IdMap};
use crate::block::Block;
use crate::codegen;
use crate::compile::Compiler;
use crate::config::Config;
use crate::errors::{EngineError, StoreError};
use crate::fuser;
use crate::instr::{Instruction, Opcode};
use crate::store::KernelStore;
use crate::vcache::VictimCache;

/// Handler for one extension opcode. Receives the instruction and the base
/// pool; operand buffers are realized before dispatch.
pub type ExtHandler = Box<dyn FnMut(&Instruction, &mut BasePool) -> Result<(), EngineError>>;

/// The vector engine.
///
/// Owns the kernel store, the compiler driver, the victim cache and the
/// extension registry; the upstream runtime owns the base arrays and
/// serializes calls to [`Engine::execute`].
pub struct Engine {
    config: Config,
    store: KernelStore,
    compiler: Compiler,
    vcache: VictimCache,
    extensions: HashMap<u32, (String, ExtHandler)>,
    allocated: HashSet<BaseId>,
    exec_count: u64,
    kernels_compiled: u64,
    cache_hits: u64,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("exec_count", &self.exec_count)
            .finish()
    }
}

impl Engine {
    /// Creates an engine, materializing the configured directories and
    /// preloading the object directory when requested.
    pub fn new(config: Config) -> Result<Self, EngineError> {
        for dir in [&config.object_directory, &config.kernel_directory] {
            std::fs::create_dir_all(dir).map_err(|source| EngineError::CreateDir {
                dir: dir.clone(),
                source,
            })?;
        }
        let mut store = KernelStore::new(&config.object_directory, &config.kernel_directory);
        if config.preload {
            store.preload().map_err(EngineError::Load)?;
        }
        let compiler = Compiler::new(config.compiler_cmd.clone());
        let vcache = VictimCache::new(config.vcache_size);
        Ok(Self {
            config,
            store,
            compiler,
            vcache,
            extensions: HashMap::new(),
            allocated: HashSet::new(),
            exec_count: 0,
            kernels_compiled: 0,
            cache_hits: 0,
        })
    }

    /// Executes one instruction batch.
    ///
    /// Instructions run in source order modulo fusion; the first failure
    /// abandons the batch. Extension instructions split the batch and
    /// dispatch to their registered handlers in between the JIT segments.
    pub fn execute(
        &mut self,
        pool: &mut BasePool,
        instrs: &[Instruction],
    ) -> Result<(), EngineError> {
        self.exec_count += 1;
        let mut segment: Vec<Instruction> = Vec::new();
        for instr in instrs {
            if let Opcode::Ext(id) = instr.opcode {
                self.execute_segment(pool, std::mem::take(&mut segment))?;
                self.dispatch_extension(pool, id, instr)?;
            } else {
                segment.push(instr.clone());
            }
        }
        self.execute_segment(pool, segment)
    }

    /// Registers a handler for an extension opcode.
    pub fn register_extension(
        &mut self,
        opcode: u32,
        name: impl Into<String>,
        handler: ExtHandler,
    ) {
        let name = name.into();
        if let Some((existing, _)) = self.extensions.get(&opcode) {
            warn!("extension opcode {opcode} re-registered ({existing} -> {name})");
        }
        self.extensions.insert(opcode, (name, handler));
    }

    /// Releases every victim-cached buffer. Also runs on drop.
    pub fn shutdown(&mut self) {
        self.vcache.clear();
    }

    /// Environment and attribute dump for diagnostics.
    pub fn text(&self) -> String {
        format!(
            "{}\n{} {{\n  {}\n  object_dir={}\n  kernel_dir={}\n}}\n",
            self.config,
            "Attributes".cyan(),
            self.compiler.text(),
            self.store.object_dir().display(),
            self.store.kernel_dir().display(),
        )
    }

    /// Number of `execute` calls so far.
    pub fn exec_count(&self) -> u64 {
        self.exec_count
    }

    /// Number of kernels built by the external compiler so far.
    pub fn kernels_compiled(&self) -> u64 {
        self.kernels_compiled
    }

    /// Number of kernels resolved from the in-memory store.
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs one extension-free sub-batch through the JIT pipeline. The
    /// segment becomes the batch arena: blocks index into it and reshape
    /// merges may repartition its views.
    fn execute_segment(
        &mut self,
        pool: &mut BasePool,
        mut arena: Vec<Instruction>,
    ) -> Result<(), EngineError> {
        if arena.is_empty() {
            return Ok(());
        }

        let news = self.update_allocated_bases(&arena)?;

        // Assign ids in first-appearance order across the whole segment so
        // that structurally equal batches reuse kernels.
        let mut ids = IdMap::new();
        for instr in &arena {
            for base in instr.bases() {
                ids.insert(base);
            }
        }
        if ids.is_empty() {
            return Ok(()); // Nothing references an array.
        }

        let blocks = fuser::fuse(&mut arena, &news, self.config.jit_fusion);
        let frees: Vec<BaseId> = arena
            .iter()
            .filter(|i| i.opcode == Opcode::Free)
            .filter_map(|i| i.out_view().map(|v| v.base))
            .collect();

        if blocks.is_empty() {
            // System-only segment: nothing to compile, just release memory.
            self.process_frees(pool, &frees);
            return Ok(());
        }

        // Make sure every referenced base is realized before any kernel runs.
        for &base in ids.keys() {
            self.vcache.malloc_base(&mut pool[base])?;
        }

        if self.config.jit_fusion {
            self.run_kernel(pool, &arena, &blocks, &ids)?;
        } else {
            // SIJ mode: one kernel per block, each with its own id map.
            for block in &blocks {
                let mut block_ids = IdMap::new();
                for i in block.all_instr() {
                    for base in arena[i].bases() {
                        block_ids.insert(base);
                    }
                }
                self.run_kernel(pool, &arena, std::slice::from_ref(block), &block_ids)?;
            }
        }

        self.process_frees(pool, &frees);
        Ok(())
    }

    /// Emits, resolves and invokes the kernel for one source unit.
    fn run_kernel(
        &mut self,
        pool: &mut BasePool,
        arena: &[Instruction],
        blocks: &[Block],
        ids: &IdMap,
    ) -> Result<(), EngineError> {
        let source = codegen::emit_source(arena, blocks, ids, pool)?;
        let fingerprint = codegen::fingerprint(&source);

        if self.store.symbol_ready(&fingerprint) {
            self.cache_hits += 1;
        } else if !self.store.load(&fingerprint) {
            // Not on disk either; build it, if we may.
            if !self.config.jit_enabled {
                return Err(EngineError::Load(StoreError::MissingObject(
                    self.store.obj_abspath(&fingerprint),
                )));
            }
            if self.config.jit_dumpsrc {
                let path = self.store.src_abspath(&fingerprint);
                if let Err(err) = std::fs::write(&path, &source) {
                    warn!("failed to dump source to {}: {err}", path.display());
                }
            }
            self.compiler
                .compile(&self.store.obj_abspath(&fingerprint), &source)?;
            let filename = self.store.obj_filename(&fingerprint);
            self.store.add_symbol(&fingerprint, &filename);
            self.kernels_compiled += 1;
            if !self.store.load(&fingerprint) {
                return Err(EngineError::Load(StoreError::MissingLauncher(
                    self.store.obj_abspath(&fingerprint),
                )));
            }
        }

        let func = self
            .store
            .func(&fingerprint)
            .expect("symbol is ready after load");

        let mut data_list: Vec<*mut c_void> =
            ids.keys().iter().map(|&b| pool[b].data_ptr()).collect();
        debug_assert!(data_list.iter().all(|p| !p.is_null()));
        debug!(
            "invoking kernel {} over {} bases",
            &fingerprint[..16.min(fingerprint.len())],
            data_list.len()
        );
        // SAFETY: the launcher was compiled from source emitted for exactly
        // this id map, every base buffer is realized and sized per its view,
        // and the engine is single-threaded, so no aliasing kernel runs
        // concurrently.
        unsafe { func(data_list.as_mut_ptr()) };
        Ok(())
    }

    /// Walks the segment, inserting newly seen output bases into the live
    /// set and recording first-writer instructions; FREEs drop bases from
    /// the set and fail loudly when the base was never tracked.
    fn update_allocated_bases(
        &mut self,
        arena: &[Instruction],
    ) -> Result<HashSet<usize>, EngineError> {
        let mut news = HashSet::new();
        for (idx, instr) in arena.iter().enumerate() {
            for (opidx, op) in instr.operands.iter().enumerate() {
                if let Some(view) = op.view() {
                    if self.allocated.insert(view.base) && opidx == 0 {
                        // The base is in fact a new output array.
                        news.insert(idx);
                    }
                }
            }
            if instr.opcode == Opcode::Free {
                let base = instr.out_view().expect("FREE carries a view").base;
                if !self.allocated.remove(&base) {
                    error!("freeing unknown base array #{}", base.0);
                    return Err(EngineError::UnknownBaseFree(base.0));
                }
            }
        }
        Ok(news)
    }

    fn process_frees(&mut self, pool: &mut BasePool, frees: &[BaseId]) {
        for &base in frees {
            self.vcache.free_base(&mut pool[base]);
        }
    }

    fn dispatch_extension(
        &mut self,
        pool: &mut BasePool,
        id: u32,
        instr: &Instruction,
    ) -> Result<(), EngineError> {
        // Extension operands take part in base tracking and allocation even
        // though the instruction bypasses the JIT pipeline.
        for base in instr.bases() {
            self.allocated.insert(base);
            self.vcache.malloc_base(&mut pool[base])?;
        }
        let Some((_, handler)) = self.extensions.get_mut(&id) else {
            return Err(EngineError::ExtensionNotSupported(id));
        };
        handler(instr, pool)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
        debug!(
            "engine shut down after {} batches, {} kernels compiled, {} cache hits",
            self.exec_count, self.kernels_compiled, self.cache_hits
        );
    }
}
