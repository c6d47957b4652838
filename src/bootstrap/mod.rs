//! Bootstrap module - Application initialization and wiring
//! 启动模块 - 应用初始化和依赖连接

pub mod config;
pub mod tracing;
pub mod wiring;

// Re-export commonly used bootstrap functions
pub use config::{load_config, load_config_or_default, resolve_config, ResolvedConfig};
pub use wiring::{wire_feed, ShellPorts, WiringError, WiringResult};
