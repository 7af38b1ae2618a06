//! Runners concretos para `flow_core::StepRunner`.

pub mod command;
pub mod delay;

pub use command::CommandRunner;
pub use delay::RandomDelayRunner;
