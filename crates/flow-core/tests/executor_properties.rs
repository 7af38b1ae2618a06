use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use flow_core::{ExecutorError, InMemoryEventSink, NoopRunner, Step, StepContext, StepError, StepOutput, StepRunner,
                Workflow, WorkflowExecutor, WorkflowStatus};
use tokio_test::{assert_err, assert_ok};

/// Runner con un retardo distinto por workflow, para forzar intercalado
/// entre ejecuciones concurrentes.
struct Sleepy;

#[async_trait]
impl StepRunner for Sleepy {
    async fn run(&self, _step: &Step, ctx: &StepContext) -> Result<StepOutput, StepError> {
        let ms = if ctx.workflow_id == "a" { 30 } else { 45 };
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(StepOutput::empty())
    }
}

fn steps(n: usize) -> Vec<Step> {
    (1..=n).map(|i| Step::new(format!("s{i}"))).collect()
}

fn expected_success(n: usize) -> Vec<String> {
    let mut out = vec!["started".to_string()];
    for i in 1..=n {
        out.push(format!("step:{i}"));
        out.push(format!("step:{i}:done"));
    }
    out.push("completed".into());
    out
}

#[tokio::test]
async fn event_counts_match_step_count() {
    for n in [0usize, 1, 3, 7] {
        let sink = Arc::new(InMemoryEventSink::new());
        let executor = WorkflowExecutor::new(sink.clone(), Arc::new(NoopRunner));
        assert_ok!(executor.execute_workflow(&Workflow::new("wf", steps(n))).await);

        let events = sink.events();
        let started = events.iter().filter(|e| e.status == WorkflowStatus::Started).count();
        let progress = events.iter().filter(|e| e.status == WorkflowStatus::InProgress).count();
        let completed = events.iter().filter(|e| e.status == WorkflowStatus::Completed).count();
        assert_eq!((started, progress, completed), (1, 2 * n, 1), "n={n}");
        let sigs: Vec<String> = events.iter().map(|e| e.signature()).collect();
        assert_eq!(sigs, expected_success(n));
    }
}

#[tokio::test(start_paused = true)]
async fn concurrent_runs_keep_their_own_order_and_ids() {
    let sink = Arc::new(InMemoryEventSink::new());
    let executor = Arc::new(WorkflowExecutor::new(sink.clone(), Arc::new(Sleepy)));

    let a = executor.spawn(Workflow::new("a", steps(3)));
    let b = executor.spawn(Workflow::new("b", steps(3)));
    let (run_a, run_b) = (a.run_id(), b.run_id());
    let (ra, rb) = tokio::join!(a.wait(), b.wait());
    assert_eq!(assert_ok!(ra).run_id, run_a);
    assert_eq!(assert_ok!(rb).run_id, run_b);

    for (id, run) in [("a", run_a), ("b", run_b)] {
        let own = sink.events_for(id);
        assert!(own.iter().all(|e| e.run_id == run), "events of {id} must carry its run id");
        let sigs: Vec<String> = own.iter().map(|e| e.signature()).collect();
        assert_eq!(sigs, expected_success(3));
    }
    assert_eq!(sink.len(), 2 * expected_success(3).len());
}

#[tokio::test]
async fn rerunning_the_same_workflow_is_independent() {
    let sink = Arc::new(InMemoryEventSink::new());
    let executor = WorkflowExecutor::new(sink.clone(), Arc::new(NoopRunner));
    let wf = Workflow::new("same", steps(2)).with_name("Same");

    let first = assert_ok!(executor.execute_workflow(&wf).await);
    let second = assert_ok!(executor.execute_workflow(&wf).await);
    assert_ne!(first.run_id, second.run_id);

    let first_sigs: Vec<(String, String)> = sink.events()
                                                .iter()
                                                .filter(|e| e.run_id == first.run_id)
                                                .map(|e| (e.signature(), e.message.clone()))
                                                .collect();
    let second_sigs: Vec<(String, String)> = sink.events()
                                                 .iter()
                                                 .filter(|e| e.run_id == second.run_id)
                                                 .map(|e| (e.signature(), e.message.clone()))
                                                 .collect();
    assert_eq!(first_sigs, second_sigs);
}

#[tokio::test(start_paused = true)]
async fn cancel_between_steps_emits_cancelled() {
    let sink = Arc::new(InMemoryEventSink::new());
    let executor = Arc::new(WorkflowExecutor::new(sink.clone(), Arc::new(Sleepy)));

    let handle = executor.spawn(Workflow::new("a", steps(4)));
    // step 1 termina a los 30ms, step 2 a los 60ms
    tokio::time::sleep(Duration::from_millis(45)).await;
    handle.cancel();
    let err = assert_err!(handle.wait().await);

    assert!(matches!(err, ExecutorError::Cancelled { completed_steps: 2 }), "got {err:?}");
    let sigs: Vec<String> = sink.events().iter().map(|e| e.signature()).collect();
    assert_eq!(sigs, vec!["started", "step:1", "step:1:done", "step:2", "step:2:done", "cancelled"]);
    let last = sink.events().pop().unwrap();
    assert_eq!(last.message, "Workflow a cancelled after 2 of 4 steps.");
}

#[tokio::test]
async fn spawned_invalid_workflow_resolves_with_error() {
    let sink = Arc::new(InMemoryEventSink::new());
    let executor = Arc::new(WorkflowExecutor::new(sink.clone(), Arc::new(NoopRunner)));

    let handle = executor.spawn(Workflow::new("bad", vec![Step::new(" ")]));
    let err = assert_err!(handle.wait().await);

    assert!(matches!(err, ExecutorError::InvalidWorkflow(_)));
    assert!(sink.is_empty());
}
