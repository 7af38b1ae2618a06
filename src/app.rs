//! `AppContext`: cablea configuración, canal de eventos, executor y vault.
use std::path::Path;
use std::sync::Arc;

use flow_adapters::{BroadcastHub, CompositeSink, LogSink, RandomDelayRunner, Subscription};
use flow_core::{EventSink, RunHandle, RunSummary, StepRunner, Workflow, WorkflowExecutor};
use flow_credentials::CredentialVault;
use log::warn;

use crate::config::AppConfig;
use crate::errors::CoreError;

pub type Executor = WorkflowExecutor<dyn EventSink, dyn StepRunner>;

pub struct AppContext {
    config: AppConfig,
    hub: Arc<BroadcastHub>,
    executor: Arc<Executor>,
    vault: Arc<CredentialVault>,
}

impl AppContext {
    /// Runner simulado con los retardos de la configuración.
    pub fn new(config: AppConfig) -> Self {
        let runner = Arc::new(RandomDelayRunner::new(config.step_delay_min, config.step_delay_max));
        Self::with_runner(config, runner)
    }

    pub fn with_runner(config: AppConfig, runner: Arc<dyn StepRunner>) -> Self {
        if config.uses_dev_secret() {
            warn!("AGENTFLOW_MASTER_SECRET no definido, usando el secreto de desarrollo");
        }
        let hub = Arc::new(BroadcastHub::new(config.broadcast_capacity));
        let sink: Arc<dyn EventSink> = Arc::new(CompositeSink::new().push(hub.clone()).push(Arc::new(LogSink)));
        let executor = Arc::new(WorkflowExecutor::builder(sink, runner).maybe_step_timeout(config.step_timeout)
                                                                       .build());
        let vault = Arc::new(CredentialVault::new(&config.master_secret));
        Self { config,
               hub,
               executor,
               vault }
    }

    pub fn from_env() -> Result<Self, CoreError> {
        Ok(Self::new(AppConfig::from_env()?))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn hub(&self) -> &Arc<BroadcastHub> {
        &self.hub
    }

    pub fn executor(&self) -> &Arc<Executor> {
        &self.executor
    }

    pub fn vault(&self) -> &Arc<CredentialVault> {
        &self.vault
    }

    pub fn subscribe(&self) -> Result<Subscription, CoreError> {
        Ok(self.hub.subscribe()?)
    }

    pub async fn run(&self, workflow: &Workflow) -> Result<RunSummary, CoreError> {
        Ok(self.executor.execute_workflow(workflow).await?)
    }

    /// Lee y decodifica un workflow JSON desde disco.
    pub fn load_workflow(path: impl AsRef<Path>) -> Result<Workflow, CoreError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(Workflow::from_json(&raw)?)
    }

    pub fn spawn(&self, workflow: Workflow) -> RunHandle {
        self.executor.spawn(workflow)
    }

    /// Cierra el canal; los listeners terminan al vaciar su cola.
    pub fn shutdown(&self) {
        self.hub.close();
    }
}
