//! Engine module for WorkflowExecutor implementation
//!
//! Provides the executor, its builder, the per-run state machine and the
//! handle returned by spawned runs.

pub mod builder;
pub mod core;
pub mod handle;
pub mod state;

pub use builder::ExecutorBuilder;
pub use core::{RunSummary, WorkflowExecutor};
pub use handle::RunHandle;
pub use state::RunState;

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::errors::{ExecutorError, SinkError, StepError};
    use crate::event::{EventSink, InMemoryEventSink, WorkflowStatus, WorkflowStatusEvent};
    use crate::model::{Step, Workflow};
    use crate::step::{NoopRunner, StepContext, StepOutput, StepRunner};

    // Runner que falla en el step indicado (1-indexed) y cuenta invocaciones
    struct FailAt {
        step: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl StepRunner for FailAt {
        async fn run(&self, step: &Step, ctx: &StepContext) -> Result<StepOutput, StepError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if ctx.index == self.step {
                return Err(StepError::Failed(format!("{} exploded", step.name)));
            }
            Ok(StepOutput::with_value(json!(ctx.index)))
        }
    }

    // Runner que entra en panic en el step indicado
    struct PanicAt(usize);

    #[async_trait]
    impl StepRunner for PanicAt {
        async fn run(&self, step: &Step, ctx: &StepContext) -> Result<StepOutput, StepError> {
            if ctx.index == self.0 {
                panic!("{} blew up", step.name);
            }
            Ok(StepOutput::empty())
        }
    }

    // Sink que siempre falla, simula un canal caído
    struct DeadSink;

    impl EventSink for DeadSink {
        fn publish(&self, _event: &WorkflowStatusEvent) -> Result<(), SinkError> {
            Err(SinkError::ChannelUnavailable("socket closed".into()))
        }
    }

    fn demo() -> Workflow {
        Workflow::new("wf-1", vec![Step::new("Fetch"), Step::new("Process")]).with_name("Demo")
    }

    fn signatures(sink: &InMemoryEventSink) -> Vec<String> {
        sink.events().iter().map(|e| e.signature()).collect()
    }

    #[tokio::test]
    async fn demo_workflow_emits_documented_sequence() {
        let sink = Arc::new(InMemoryEventSink::new());
        let executor = WorkflowExecutor::new(sink.clone(), Arc::new(NoopRunner));

        let summary = executor.execute_workflow(&demo()).await.expect("run should complete");

        assert_eq!(signatures(&sink),
                   vec!["started", "step:1", "step:1:done", "step:2", "step:2:done", "completed"]);
        assert_eq!(summary.steps_completed, 2);
        assert_eq!(summary.workflow_id, "wf-1");
        assert!(sink.events().iter().all(|e| e.run_id == summary.run_id));
        assert!(sink.events().iter().filter(|e| e.status == WorkflowStatus::InProgress).all(|e| e.total_steps == Some(2)));
    }

    #[tokio::test]
    async fn empty_workflow_emits_started_then_completed() {
        let sink = Arc::new(InMemoryEventSink::new());
        let executor = WorkflowExecutor::new(sink.clone(), Arc::new(NoopRunner));

        executor.execute_workflow(&Workflow::new("empty", vec![])).await.unwrap();

        assert_eq!(signatures(&sink), vec!["started", "completed"]);
    }

    #[tokio::test]
    async fn failing_step_halts_and_reports() {
        let sink = Arc::new(InMemoryEventSink::new());
        let runner = Arc::new(FailAt { step: 2, calls: AtomicUsize::new(0) });
        let executor = WorkflowExecutor::new(sink.clone(), runner.clone());
        let wf = Workflow::new("wf-x", vec![Step::new("a"), Step::new("b"), Step::new("c")]);

        let err = executor.execute_workflow(&wf).await.unwrap_err();

        assert_eq!(err.failed_step(), Some(2));
        assert_eq!(runner.calls.load(Ordering::SeqCst), 2, "step 3 must not run");
        assert_eq!(signatures(&sink), vec!["started", "step:1", "step:1:done", "step:2", "failed:2"]);
        let last = sink.events().pop().unwrap();
        assert_eq!(last.error.as_deref(), Some("b exploded"));
    }

    #[tokio::test]
    async fn panicking_runner_is_reported_as_step_failure() {
        let sink = Arc::new(InMemoryEventSink::new());
        let executor = Arc::new(WorkflowExecutor::new(sink.clone(), Arc::new(PanicAt(2))));
        let wf = Workflow::new("wf-p", vec![Step::new("a"), Step::new("b"), Step::new("c")]);

        let err = executor.spawn(wf).wait().await.unwrap_err();

        match err {
            ExecutorError::StepFailed { step, source: StepError::Failed(msg), .. } => {
                assert_eq!(step, 2);
                assert_eq!(msg, "panicked: b blew up");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(signatures(&sink), vec!["started", "step:1", "step:1:done", "step:2", "failed:2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_runner_under_timeout_still_fails_the_step() {
        let sink = Arc::new(InMemoryEventSink::new());
        let executor = WorkflowExecutor::builder(sink.clone(), Arc::new(PanicAt(1))).step_timeout(Duration::from_secs(1))
                                                                                   .build();

        let err = executor.execute_workflow(&demo()).await.unwrap_err();

        assert_eq!(err.failed_step(), Some(1));
        assert_eq!(signatures(&sink), vec!["started", "step:1", "failed:1"]);
    }

    #[tokio::test]
    async fn invalid_workflow_emits_nothing() {
        let sink = Arc::new(InMemoryEventSink::new());
        let executor = WorkflowExecutor::new(sink.clone(), Arc::new(NoopRunner));

        let err = executor.execute_workflow(&Workflow::new("", vec![Step::new("a")])).await.unwrap_err();

        assert!(matches!(err, ExecutorError::InvalidWorkflow(_)));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn sink_failures_do_not_change_outcome() {
        let executor = WorkflowExecutor::new(Arc::new(DeadSink), Arc::new(NoopRunner));
        let summary = executor.execute_workflow(&demo()).await.unwrap();
        assert_eq!(summary.steps_completed, 2);
    }

    #[tokio::test]
    async fn outputs_are_collected_in_step_order() {
        let sink = Arc::new(InMemoryEventSink::new());
        let runner = Arc::new(FailAt { step: 0, calls: AtomicUsize::new(0) });
        let executor = WorkflowExecutor::new(sink, runner);

        let summary = executor.execute_workflow(&demo()).await.unwrap();

        let values: Vec<_> = summary.outputs.iter().map(|o| o.output.clone()).collect();
        assert_eq!(values, vec![Some(json!(1)), Some(json!(2))]);
    }

    #[tokio::test]
    async fn pre_cancelled_token_stops_before_first_step() {
        let sink = Arc::new(InMemoryEventSink::new());
        let executor = WorkflowExecutor::new(sink.clone(), Arc::new(NoopRunner));
        let token = tokio_util::sync::CancellationToken::new();
        token.cancel();

        let err = executor.execute_with_cancel(&demo(), &token).await.unwrap_err();

        assert!(matches!(err, ExecutorError::Cancelled { completed_steps: 0 }));
        assert_eq!(signatures(&sink), vec!["started", "cancelled"]);
    }

    #[tokio::test(start_paused = true)]
    async fn builder_applies_step_timeout() {
        struct Slow;
        #[async_trait]
        impl StepRunner for Slow {
            async fn run(&self, _step: &Step, _ctx: &StepContext) -> Result<StepOutput, StepError> {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(StepOutput::empty())
            }
        }

        let sink = Arc::new(InMemoryEventSink::new());
        let executor = WorkflowExecutor::builder(sink.clone(), Arc::new(Slow)).step_timeout(Duration::from_secs(1))
                                                                              .build();
        assert_eq!(executor.step_timeout(), Some(Duration::from_secs(1)));

        let err = executor.execute_workflow(&demo()).await.unwrap_err();

        assert!(matches!(err, ExecutorError::StepFailed { step: 1, source: StepError::Timeout(_), .. }));
        assert_eq!(signatures(&sink), vec!["started", "step:1", "failed:1"]);
    }
}
