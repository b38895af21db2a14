pub mod command;
pub mod error;
pub mod metrics;
pub mod model;
pub mod orchestrator;

pub use command::{handle_command, handle_raw, Command, CommandOptions, CommandResponse};
pub use error::SchedulerError;
pub use model::{
    BatchOptions, BatchReport, BatchSummary, DetailEntry, DetailStatus, NonActionablePolicy,
    SuccessPolicy,
};
pub use orchestrator::{BatchOrchestrator, BatchSettings, DEFAULT_DOMAIN_FILTER};
