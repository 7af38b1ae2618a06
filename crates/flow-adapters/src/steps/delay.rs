//! RandomDelayRunner (trabajo simulado)
//!
//! - Cada step "trabaja" durante un retardo uniforme en `[min, max]`.
//! - Por defecto 500ms..=1500ms.
//! - No produce salida ni falla nunca.

use std::time::Duration;

use async_trait::async_trait;
use flow_core::{Step, StepContext, StepError, StepOutput, StepRunner};
use log::debug;
use rand::Rng;

pub const DEFAULT_MIN_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomDelayRunner {
    min: Duration,
    max: Duration,
}

impl RandomDelayRunner {
    /// Si `min > max` los límites se intercambian.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
    }

    pub fn bounds(&self) -> (Duration, Duration) {
        (self.min, self.max)
    }

    fn pick(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let lo = self.min.as_millis() as u64;
        let hi = self.max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(lo..=hi))
    }
}

impl Default for RandomDelayRunner {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DELAY, DEFAULT_MAX_DELAY)
    }
}

#[async_trait]
impl StepRunner for RandomDelayRunner {
    async fn run(&self, step: &Step, ctx: &StepContext) -> Result<StepOutput, StepError> {
        let delay = self.pick();
        debug!("delay:step {}/{} name={} delay_ms={}", ctx.index, ctx.total, step.name, delay.as_millis());
        tokio::time::sleep(delay).await;
        Ok(StepOutput::empty())
    }
}
