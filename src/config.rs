//! Engine configuration.
//!
//! Every knob has a default suitable for local use and can be overridden
//! from the environment with a `VECFUSE_`-prefixed variable. Malformed
//! values fall back to the default with a warning rather than failing
//! startup.

use std::fmt;
use std::path::PathBuf;

use colored::Colorize;
use log::warn;

/// Default compiler command template. `{OUT}` is replaced by the object
/// path; the trailing `-` makes the compiler read source from stdin. A
/// `{SRC}` placeholder switches to temp-file staging.
pub const DEFAULT_COMPILER_CMD: &str = "cc -x c -fPIC -shared -O3 -o {OUT} -";

/// Runtime configuration of an [`Engine`](crate::engine::Engine).
#[derive(Debug, Clone)]
pub struct Config {
    /// Victim-cache capacity in buffers; 0 disables the cache.
    pub vcache_size: usize,
    /// Load every object in the object directory at startup.
    pub preload: bool,
    /// Allow invoking the external compiler; with this off only preloaded
    /// or on-disk kernels can run.
    pub jit_enabled: bool,
    /// Fuse compatible instructions; with this off every instruction runs
    /// as its own kernel (SIJ mode).
    pub jit_fusion: bool,
    /// Dump generated source next to the compiled objects.
    pub jit_dumpsrc: bool,
    /// External compiler command template.
    pub compiler_cmd: String,
    /// Directory for dumped kernel source.
    pub kernel_directory: PathBuf,
    /// Directory for compiled shared objects.
    pub object_directory: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let base = std::env::temp_dir().join("vecfuse");
        Self {
            vcache_size: 10,
            preload: false,
            jit_enabled: true,
            jit_fusion: true,
            jit_dumpsrc: false,
            compiler_cmd: DEFAULT_COMPILER_CMD.to_string(),
            kernel_directory: base.join("kernels"),
            object_directory: base.join("objects"),
        }
    }
}

impl Config {
    /// Builds a configuration from `VECFUSE_*` environment variables,
    /// falling back to defaults for anything unset or malformed.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            vcache_size: env_usize("VECFUSE_VCACHE_SIZE", d.vcache_size),
            preload: env_bool("VECFUSE_PRELOAD", d.preload),
            jit_enabled: env_bool("VECFUSE_JIT_ENABLED", d.jit_enabled),
            jit_fusion: env_bool("VECFUSE_JIT_FUSION", d.jit_fusion),
            jit_dumpsrc: env_bool("VECFUSE_JIT_DUMPSRC", d.jit_dumpsrc),
            compiler_cmd: std::env::var("VECFUSE_COMPILER_CMD").unwrap_or(d.compiler_cmd),
            kernel_directory: env_path("VECFUSE_KERNEL_DIR", d.kernel_directory),
            object_directory: env_path("VECFUSE_OBJECT_DIR", d.object_directory),
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {{", "ENVIRONMENT".cyan())?;
        writeln!(f, "  VECFUSE_VCACHE_SIZE={}", self.vcache_size)?;
        writeln!(f, "  VECFUSE_PRELOAD={}", self.preload)?;
        writeln!(f, "  VECFUSE_JIT_ENABLED={}", self.jit_enabled)?;
        writeln!(f, "  VECFUSE_JIT_FUSION={}", self.jit_fusion)?;
        writeln!(f, "  VECFUSE_JIT_DUMPSRC={}", self.jit_dumpsrc)?;
        writeln!(f, "  VECFUSE_COMPILER_CMD={}", self.compiler_cmd)?;
        writeln!(
            f,
            "  VECFUSE_KERNEL_DIR={}",
            self.kernel_directory.display()
        )?;
        writeln!(
            f,
            "  VECFUSE_OBJECT_DIR={}",
            self.object_directory.display()
        )?;
        write!(f, "}}")
    }
}

fn env_usize(name: &str, default: usize) -> usize {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{name}={raw:?} is not a valid size, using {default}");
            default
        }),
        Err(_) => default,
    }
}

fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(raw) => match raw.as_str() {
            "1" | "true" | "TRUE" | "yes" => true,
            "0" | "false" | "FALSE" | "no" => false,
            _ => {
                warn!("{name}={raw:?} is not a valid boolean, using {default}");
                default
            }
        },
        Err(_) => default,
    }
}

fn env_path(name: &str, default: PathBuf) -> PathBuf {
    std::env::var_os(name).map(PathBuf::from).unwrap_or(default)
}
