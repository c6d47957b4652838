//! Load lifecycle domain module.
//!
//! Defines the per-loader state machine that replaces ad hoc
//! "loading / mounted / files loaded" flags.
//! 定义加载器状态机，替代零散的布尔标志。

pub mod state_machine;

pub use state_machine::{
    InvalidTransition, LoadError, LoadEvent, LoadState, LoadStateMachine, LoadTarget,
};
