mod args;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use agentflow_rust::{logging, AppConfig};
use args::{Command, RunnerKind, USAGE};
use flow_adapters::{BroadcastHub, CommandRunner, RandomDelayRunner};
use flow_core::{ExecutorError, NoopRunner, RunSummary, Step, StepRunner, Workflow, WorkflowExecutor};
use log::{error, info};

const EXIT_OK: u8 = 0;
const EXIT_USAGE: u8 = 2;
const EXIT_RUN_FAILED: u8 = 4;
const EXIT_IO: u8 = 5;

#[tokio::main]
async fn main() -> ExitCode {
    // .env opcional; AGENTFLOW_* inválidas son error de uso
    agentflow_rust::config::init_dotenv();
    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[flow-cli] {e}");
            return ExitCode::from(EXIT_USAGE);
        }
    };
    logging::init(&config.log_filter);

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let command = match args::parse(&argv) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("[flow-cli] {msg}");
            eprintln!("{USAGE}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let (workflow, timeout, runner) = match command {
        Command::Demo => (demo_workflow(), config.step_timeout, runner_for(&RunnerKind::Delay, &config)),
        Command::Run(run) => match load(&run.file) {
            // --timeout-ms tiene prioridad sobre AGENTFLOW_STEP_TIMEOUT_MS
            Ok(wf) => (wf, run.timeout.or(config.step_timeout), runner_for(&run.runner, &config)),
            Err(code) => return ExitCode::from(code),
        },
    };

    ExitCode::from(execute(workflow, timeout, runner).await)
}

fn load(path: &Path) -> Result<Workflow, u8> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
                                               eprintln!("[flow-cli] no se pudo leer {}: {e}", path.display());
                                               EXIT_IO
                                           })?;
    Workflow::from_json(&raw).map_err(|e| {
                                 eprintln!("[flow-cli] workflow inválido: {e}");
                                 EXIT_IO
                             })
}

fn runner_for(kind: &RunnerKind, config: &AppConfig) -> Arc<dyn StepRunner> {
    match kind {
        RunnerKind::Delay => Arc::new(RandomDelayRunner::new(config.step_delay_min, config.step_delay_max)),
        RunnerKind::NoDelay => Arc::new(NoopRunner),
        RunnerKind::Commands => Arc::new(CommandRunner::new()),
    }
}

fn demo_workflow() -> Workflow {
    Workflow::new("wf-1", vec![Step::new("Fetch"), Step::new("Process")]).with_name("Demo")
}

/// Código de salida según el desenlace de la ejecución.
fn exit_code(outcome: &Result<RunSummary, ExecutorError>) -> u8 {
    match outcome {
        Ok(_) => EXIT_OK,
        Err(ExecutorError::InvalidWorkflow(_)) => EXIT_IO,
        Err(_) => EXIT_RUN_FAILED,
    }
}

/// Ejecuta el workflow imprimiendo cada evento como una línea JSON en stdout.
/// Ctrl-C cancela la ejecución antes del siguiente step.
async fn execute(workflow: Workflow, timeout: Option<Duration>, runner: Arc<dyn StepRunner>) -> u8 {
    let hub = Arc::new(BroadcastHub::default());
    let mut listener = match hub.subscribe() {
        Ok(l) => l,
        Err(e) => {
            error!("subscribe failed: {e}");
            return EXIT_IO;
        }
    };
    let printer = tokio::spawn(async move {
        while let Some(frame) = listener.recv().await {
            match frame.to_json() {
                Ok(line) => println!("{line}"),
                Err(e) => error!("frame serialization failed: {e}"),
            }
        }
    });

    let executor = Arc::new(WorkflowExecutor::builder(hub.clone(), runner).maybe_step_timeout(timeout)
                                                                          .build());
    let handle = executor.spawn(workflow);
    let token = handle.cancellation_token();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c: cancelling run");
            token.cancel();
        }
    });

    let outcome = handle.wait().await;
    ctrl_c.abort();
    hub.close();
    let _ = printer.await;

    match &outcome {
        Ok(summary) => info!("run {} completed, {} steps", summary.run_id, summary.steps_completed),
        Err(e) => eprintln!("[flow-cli] {e}"),
    }
    exit_code(&outcome)
}
