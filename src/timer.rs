use std::time::{Duration, Instant};

/// Accumulates the wall time of repeated visits to one region of a step.
pub struct Timer {
    pub region: &'static str,
    samples: Vec<Duration>,
    started_at: Option<Instant>,
}

impl Timer {
    pub fn new(region: &'static str, expected_num_samples: usize) -> Self {
        Timer {
            region,
            samples: Vec::with_capacity(expected_num_samples),
            started_at: None,
        }
    }

    pub fn start(&mut self) {
        debug_assert!(
            self.started_at.is_none(),
            "Timer for region '{}' started twice.",
            self.region
        );
        self.started_at = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        if let Some(started_at) = self.started_at.take() {
            self.samples.push(started_at.elapsed());
        }
    }

    /// Runs `f` inside this region.
    pub fn time<T, F: FnOnce() -> T>(&mut self, f: F) -> T {
        self.start();
        let result = f();
        self.stop();
        result
    }

    pub fn count(&self) -> u32 {
        self.samples.len() as u32
    }

    pub fn total(&self) -> Duration {
        self.samples.iter().sum()
    }

    pub fn mean(&self) -> Option<Duration> {
        match self.count() {
            0 => None,
            count => Some(self.total() / count),
        }
    }

    pub fn std_dev(&self) -> Option<Duration> {
        let mean_nanos = self.mean()?.as_nanos() as f64;

        let variance = self
            .samples
            .iter()
            .map(|sample| {
                let diff = sample.as_nanos() as f64 - mean_nanos;
                diff * diff
            })
            .sum::<f64>()
            / f64::from(self.count());

        Some(Duration::from_nanos(variance.sqrt() as u64))
    }
}
