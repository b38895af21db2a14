pub mod app;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod handle;
pub mod info;
pub mod output;
pub mod run;
pub mod runtime;

pub use handle::{cmd_handle, HandleArgs};
pub use run::{cmd_run, RunArgs};
