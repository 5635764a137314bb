//! Prometheus registry behind `/metrics`
use launch_core::StageTiming;
use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, Registry, TextEncoder,
};
use std::time::Duration;

pub struct ApiMetrics {
    registry: Registry,
    analyses_total: IntCounter,
    analysis_duration: Histogram,
    stage_latency: HistogramVec,
}

impl ApiMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let analyses_total = IntCounter::new("launch_analyses_total", "Completed launch analyses")?;
        let analysis_duration = Histogram::with_opts(HistogramOpts::new(
            "launch_analysis_duration_seconds",
            "Wall time of a full launch analysis",
        ))?;
        let stage_latency = HistogramVec::new(
            HistogramOpts::new("launch_stage_latency_seconds", "Wall time per pipeline stage"),
            &["stage"],
        )?;

        registry.register(Box::new(analyses_total.clone()))?;
        registry.register(Box::new(analysis_duration.clone()))?;
        registry.register(Box::new(stage_latency.clone()))?;

        Ok(Self {
            registry,
            analyses_total,
            analysis_duration,
            stage_latency,
        })
    }

    pub fn observe_analysis(&self, elapsed: Duration, timings: &[StageTiming]) {
        self.analyses_total.inc();
        self.analysis_duration.observe(elapsed.as_secs_f64());
        for timing in timings {
            self.stage_latency
                .with_label_values(&[timing.stage.as_str()])
                .observe(timing.latency_ms as f64 / 1000.0);
        }
    }

    pub fn analyses_total(&self) -> u64 {
        self.analyses_total.get()
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
