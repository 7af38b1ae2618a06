//! Ejecución del trabajo de un step.
//!
//! El executor no conoce el trabajo real de un step: invoca un `StepRunner`
//! inyectado y espera su resultado, manteniendo el contrato de eventos
//! previo/posterior sin importar lo que haga el runner.

mod runner;

pub use runner::{NoopRunner, StepContext, StepOutput, StepRunner};
