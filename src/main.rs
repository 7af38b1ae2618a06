use agentflow_rust::{logging, AppConfig, AppContext, CoreError};
use flow_core::{Step, Workflow};
use flow_credentials::OAuthToken;
use log::{error, info};

fn report_workflow() -> Workflow {
    Workflow::new("wf-2",
                  vec![Step::new("Collect"), Step::new("Summarize"), Step::new("Publish")]).with_name("Report")
}

/// Dos ejecuciones concurrentes sobre el mismo canal; un listener imprime
/// cada evento como JSON.
async fn run_concurrent_demo(app: &AppContext, second: Workflow) -> Result<(), CoreError> {
    let mut listener = app.subscribe()?;
    let printer = tokio::spawn(async move {
        let mut seen = 0usize;
        while let Some(frame) = listener.recv().await {
            match frame.to_json() {
                Ok(line) => println!("{line}"),
                Err(e) => error!("frame serialization failed: {e}"),
            }
            seen += 1;
        }
        seen
    });

    let research = Workflow::new("wf-1", vec![Step::new("Fetch"), Step::new("Process")]).with_name("Demo");
    let a = app.spawn(research);
    let b = app.spawn(second);
    let (ra, rb) = tokio::join!(a.wait(), b.wait());
    for summary in [ra?, rb?] {
        info!("run {} of {} finished with {} steps in {} ms",
              summary.run_id,
              summary.workflow_id,
              summary.steps_completed,
              (summary.finished_at - summary.started_at).num_milliseconds());
    }

    app.shutdown();
    let seen = printer.await.map_err(|e| CoreError::Internal(format!("listener task: {e}")))?;
    info!("listener received {seen} events");
    Ok(())
}

/// Guarda, lee, rota y comparte credenciales de un usuario de ejemplo.
fn run_credentials_demo(app: &AppContext) -> Result<(), CoreError> {
    let vault = app.vault();
    let user = "demo-user";

    vault.store_credential(user, "github", "token", "ghp_demo_token_value")?;
    vault.store_oauth_token(user, "google", &OAuthToken::new("ya29.demo-access"))?;
    println!("services: {:?}", vault.list_credentials(user, None));

    let rotated = vault.rotate_credential(user, "github", "token", "ghp_rotated_token_value")?;
    println!("github token rotated: {rotated}");

    let shared = vault.share_credential(user, "research-agent", "github", "token")?;
    println!("shared with research-agent: {}", shared.is_some());

    let token = vault.get_oauth_token(user, "google")?;
    println!("google token present: {}", token.is_some());
    Ok(())
}

#[tokio::main]
async fn main() {
    agentflow_rust::config::init_dotenv();
    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    logging::init(&config.log_filter);
    // `main-core [workflow.json]`: el segundo run usa el archivo si se indica
    let second = match std::env::args().nth(1) {
        Some(path) => match AppContext::load_workflow(&path) {
            Ok(wf) => wf,
            Err(e) => {
                eprintln!("{path}: {e}");
                std::process::exit(5);
            }
        },
        None => report_workflow(),
    };
    let app = AppContext::new(config);

    if let Err(e) = run_concurrent_demo(&app, second).await {
        error!("workflow demo failed: {e}");
        std::process::exit(4);
    }
    if let Err(e) = run_credentials_demo(&app) {
        error!("credentials demo failed: {e}");
        std::process::exit(5);
    }
}
