//! CommandRunner: ejecuta `step.command` con `sh -c`.
//!
//! - Exit code 0 -> éxito; la salida es `{"status": code, "stdout": "..."}`.
//! - Exit code distinto de 0 -> `StepError::CommandFailed` con el stderr.
//! - Step sin `command` -> `StepError::MissingCommand`.
//!
//! El proceso recibe el contexto del step en variables de entorno
//! `AGENTFLOW_WORKFLOW_ID`, `AGENTFLOW_RUN_ID`, `AGENTFLOW_STEP_INDEX`,
//! `AGENTFLOW_STEP_NAME`, y los `params` del step como `AGENTFLOW_PARAM_<KEY>`.

use std::path::PathBuf;

use async_trait::async_trait;
use flow_core::{Step, StepContext, StepError, StepOutput, StepRunner};
use log::debug;
use serde_json::{json, Value};
use tokio::process::Command;

#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    working_dir: Option<PathBuf>,
}

impl CommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn build(&self, command: &str, step: &Step, ctx: &StepContext) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
           .arg(command)
           .env("AGENTFLOW_WORKFLOW_ID", &ctx.workflow_id)
           .env("AGENTFLOW_RUN_ID", ctx.run_id.to_string())
           .env("AGENTFLOW_STEP_INDEX", ctx.index.to_string())
           .env("AGENTFLOW_STEP_NAME", &step.name)
           .kill_on_drop(true);
        for (k, v) in &step.params {
            let value = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            cmd.env(format!("AGENTFLOW_PARAM_{}", k.to_uppercase()), value);
        }
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

#[async_trait]
impl StepRunner for CommandRunner {
    async fn run(&self, step: &Step, ctx: &StepContext) -> Result<StepOutput, StepError> {
        let command = step.command.as_deref().ok_or(StepError::MissingCommand)?;
        debug!("command:step {}/{} name={} cmd={command}", ctx.index, ctx.total, step.name);

        let output = self.build(command, step, ctx).output().await?;
        if !output.status.success() {
            return Err(StepError::CommandFailed { status: output.status.to_string(),
                                                  stderr: String::from_utf8_lossy(&output.stderr).trim().to_string() });
        }
        let stdout = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
        Ok(StepOutput::with_value(json!({ "status": output.status.code(), "stdout": stdout })))
    }
}
