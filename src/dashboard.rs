use std::collections::VecDeque;
use std::fmt;
use tracing::{info, warn};

use crate::db::RecordStore;
use crate::models::domain::{
    AggregateCounters, Alert, AttackType, RecordKind, RecordPayload, TrafficSample,
};
use crate::simulation::{RandomSource, SeverityModel, SimulationStep};

pub const TRAFFIC_WINDOW: usize = 30;
pub const ALERT_CAPACITY: usize = 15;
const ALERTS_SHOWN: usize = 5;
const RECORDS_SHOWN: usize = 10;

/// Headline figures of the detection model. Static: nothing is inferred.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPerformance {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub false_positive_rate: f64,
    pub detection_time_secs: f64,
}

pub const MODEL_PERFORMANCE: ModelPerformance = ModelPerformance {
    accuracy: 96.5,
    precision: 95.8,
    recall: 97.2,
    f1_score: 96.5,
    false_positive_rate: 3.2,
    detection_time_secs: 3.2,
};

#[derive(Debug, Clone)]
pub struct Analytics {
    pub total_detections: u64,
    /// Percentage of all packets flagged as attacks.
    pub attack_rate: f64,
    pub distribution: Vec<(AttackType, u64)>,
    pub model: ModelPerformance,
}

#[derive(Debug, Clone)]
pub struct TickReport {
    pub sample: TrafficSample,
    pub alert: Option<Alert>,
    pub records_written: usize,
}

/// All state behind the dashboard, owned by the single tick loop.
pub struct Dashboard {
    monitoring: bool,
    simulation: SimulationStep,
    counters: AggregateCounters,
    traffic: VecDeque<TrafficSample>,
    alerts: VecDeque<Alert>,
    store: RecordStore,
}

impl Dashboard {
    pub fn new(severity_model: SeverityModel) -> Self {
        Dashboard {
            monitoring: false,
            simulation: SimulationStep::new(severity_model),
            counters: AggregateCounters::new(),
            traffic: VecDeque::with_capacity(TRAFFIC_WINDOW),
            alerts: VecDeque::with_capacity(ALERT_CAPACITY),
            store: RecordStore::new(),
        }
    }

    pub fn start(&mut self) {
        if !self.monitoring {
            self.monitoring = true;
            info!("monitoring started");
        }
    }

    pub fn stop(&mut self) {
        if self.monitoring {
            self.monitoring = false;
            info!("monitoring paused");
        }
    }

    pub fn toggle_monitoring(&mut self) -> bool {
        if self.monitoring {
            self.stop();
        } else {
            self.start();
        }
        self.monitoring
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitoring
    }

    /// Run one simulation step and record its results. Does nothing while
    /// monitoring is paused.
    pub fn tick<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Option<TickReport> {
        if !self.monitoring {
            return None;
        }

        let outcome = self.simulation.step(&mut self.counters, rng);

        if self.traffic.len() == TRAFFIC_WINDOW {
            self.traffic.pop_front();
        }
        self.traffic.push_back(outcome.sample.clone());
        self.store.insert(RecordPayload::Traffic(outcome.sample.counts));
        let mut records_written = 1;

        if let Some(alert) = &outcome.alert {
            warn!(
                id = alert.id,
                attack = %alert.attack_type,
                severity = %alert.severity,
                source = %alert.source,
                destination = %alert.destination,
                confidence = alert.confidence,
                "attack detected"
            );
            self.alerts.push_front(alert.clone());
            self.alerts.truncate(ALERT_CAPACITY);
            self.store.insert(RecordPayload::Alert(alert.clone()));
            records_written += 1;
        }

        Some(TickReport { sample: outcome.sample, alert: outcome.alert, records_written })
    }

    /// Zero the counters and drop every sample, alert and record.
    pub fn reset(&mut self) {
        self.counters.reset();
        self.traffic.clear();
        self.alerts.clear();
        self.store.reset();
        info!("statistics reset");
    }

    pub fn counters(&self) -> &AggregateCounters {
        &self.counters
    }

    /// Oldest sample first.
    pub fn traffic(&self) -> &VecDeque<TrafficSample> {
        &self.traffic
    }

    /// Newest alert first.
    pub fn alerts(&self) -> &VecDeque<Alert> {
        &self.alerts
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn analytics(&self) -> Analytics {
        let attack_rate = if self.counters.total_packets > 0 {
            self.counters.attacks_detected as f64 / self.counters.total_packets as f64 * 100.0
        } else {
            0.0
        };
        Analytics {
            total_detections: self.counters.attacks_detected,
            attack_rate,
            distribution: self.counters.attack_distribution.iter().map(|(t, c)| (*t, *c)).collect(),
            model: MODEL_PERFORMANCE,
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counters = &self.counters;
        let state = if self.monitoring { "monitoring" } else { "paused" };

        writeln!(f, "=== GarudaRush DDoS Detection ({}) ===", state)?;
        writeln!(
            f,
            "Total Packets: {} | Attacks Detected: {} | Normal Traffic: {} | Accuracy: {}%",
            counters.total_packets,
            counters.attacks_detected,
            counters.normal_traffic,
            MODEL_PERFORMANCE.accuracy
        )?;

        match self.traffic.back() {
            Some(sample) => writeln!(
                f,
                "Traffic @ {}: normal={} suspicious={} attack={}",
                sample.timestamp.format("%H:%M:%S"),
                sample.counts.normal,
                sample.counts.suspicious,
                sample.counts.attack
            )?,
            None => writeln!(f, "No traffic yet. Start monitoring to begin.")?,
        }

        writeln!(f, "--- Recent Security Alerts ---")?;
        if self.alerts.is_empty() {
            writeln!(f, "No threats detected.")?;
        }
        for alert in self.alerts.iter().take(ALERTS_SHOWN) {
            writeln!(
                f,
                "[{}] {} at {}: {} -> {} (confidence {}%)",
                alert.severity,
                alert.attack_type,
                alert.timestamp.format("%Y-%m-%d %H:%M:%S"),
                alert.source,
                alert.destination,
                alert.confidence
            )?;
        }

        let stats = self.store.stats();
        writeln!(f, "--- Database Storage ---")?;
        writeln!(
            f,
            "Total Records: {} | Alert Records: {} | Traffic Records: {}",
            stats.total,
            stats.count(RecordKind::Alert),
            stats.count(RecordKind::Traffic)
        )?;
        for record in self.store.recent(RECORDS_SHOWN) {
            writeln!(
                f,
                "  #{} {} {}",
                record.id,
                record.timestamp.format("%Y-%m-%d %H:%M:%S"),
                record.kind
            )?;
        }

        let analytics = self.analytics();
        writeln!(f, "--- Analysis ---")?;
        writeln!(
            f,
            "Total Detections: {} | Attack Rate: {:.2}% | False Positive: {}% | Detection Time: {}s",
            analytics.total_detections,
            analytics.attack_rate,
            analytics.model.false_positive_rate,
            analytics.model.detection_time_secs
        )?;
        if counters.attacks_detected > 0 {
            let distribution: Vec<String> =
                analytics.distribution.iter().map(|(t, c)| format!("{}={}", t, c)).collect();
            writeln!(f, "Attack Distribution: {}", distribution.join(", "))?;
        }
        Ok(())
    }
}
