//! CodeTok Library
//!
//! 可滑动浏览的代码作品流：启动装配与命令行外壳

pub mod bootstrap;
pub mod cli;

pub use bootstrap::{wire_feed, ResolvedConfig, ShellPorts};
pub use cli::Cli;
