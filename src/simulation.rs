use chrono::Local;
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::net::Ipv4Addr;
use std::ops::Range;
use tracing::{debug, warn};

use crate::models::domain::{
    AggregateCounters, Alert, AttackType, Severity, TrafficCounts, TrafficSample,
};

pub const NORMAL_RANGE: Range<u32> = 50..150;
pub const SUSPICIOUS_RANGE: Range<u32> = 0..30;
pub const ATTACK_RANGE: Range<u32> = 0..20;

/// An alert is raised when the per-tick draw is strictly above this.
pub const ALERT_THRESHOLD: f64 = 0.85;

const OCTET_RANGE: Range<u32> = 1..255;
const CONFIDENCE_MIN: f64 = 85.0;
const CONFIDENCE_MAX: f64 = 99.0;
const TARGET_SUBNET: [u8; 3] = [192, 168, 1];

/// Weights for `Severity::ALL` under [`SeverityModel::Weighted`].
pub const SEVERITY_WEIGHTS: [f64; 3] = [0.2, 0.5, 0.3];

/// Source of the draws behind every synthetic value.
pub trait RandomSource {
    /// Uniform integer in `[low, high)`.
    fn int_in(&mut self, low: u32, high: u32) -> u32;

    /// Uniform real in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform index into a collection of `len` items.
    fn index(&mut self, len: usize) -> usize;

    /// Index drawn in proportion to `weights`.
    fn pick_weighted(&mut self, weights: &[f64]) -> usize;
}

/// [`RandomSource`] backed by a `rand` generator.
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        RngSource { rng }
    }
}

impl RngSource<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn int_in(&mut self, low: u32, high: u32) -> u32 {
        self.rng.gen_range(low..high)
    }

    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn pick_weighted(&mut self, weights: &[f64]) -> usize {
        match WeightedIndex::<f64>::new(weights.iter().copied()) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(e) => {
                warn!(error = %e, "unusable weights, taking first index");
                0
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SeverityModel {
    /// Every severity equally likely.
    #[default]
    Uniform,
    /// Critical 0.2, High 0.5, Medium 0.3.
    Weighted,
}

impl SeverityModel {
    fn pick<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Severity {
        let index = match self {
            SeverityModel::Uniform => rng.index(Severity::ALL.len()),
            SeverityModel::Weighted => rng.pick_weighted(&SEVERITY_WEIGHTS),
        };
        Severity::ALL[index]
    }
}

#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub sample: TrafficSample,
    pub alert: Option<Alert>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationStep {
    severity_model: SeverityModel,
}

impl SimulationStep {
    pub fn new(severity_model: SeverityModel) -> Self {
        SimulationStep { severity_model }
    }

    pub fn severity_model(&self) -> SeverityModel {
        self.severity_model
    }

    /// Generate one tick of traffic, folding it into `counters`.
    pub fn step<R: RandomSource + ?Sized>(
        &self,
        counters: &mut AggregateCounters,
        rng: &mut R,
    ) -> TickOutcome {
        let counts = TrafficCounts {
            normal: rng.int_in(NORMAL_RANGE.start, NORMAL_RANGE.end),
            suspicious: rng.int_in(SUSPICIOUS_RANGE.start, SUSPICIOUS_RANGE.end),
            attack: rng.int_in(ATTACK_RANGE.start, ATTACK_RANGE.end),
        };
        counters.record_traffic(&counts);

        let sample = TrafficSample { timestamp: Local::now(), counts };

        let alert = if rng.unit() > ALERT_THRESHOLD {
            Some(self.synthesize_alert(counters, rng))
        } else {
            None
        };

        TickOutcome { sample, alert }
    }

    fn synthesize_alert<R: RandomSource + ?Sized>(
        &self,
        counters: &mut AggregateCounters,
        rng: &mut R,
    ) -> Alert {
        let attack_type = AttackType::ALL[rng.index(AttackType::ALL.len())];
        counters.record_attack(attack_type);

        let severity = self.severity_model.pick(rng);
        let source = Ipv4Addr::new(octet(rng), octet(rng), octet(rng), octet(rng));
        let [a, b, c] = TARGET_SUBNET;
        let destination = Ipv4Addr::new(a, b, c, octet(rng));
        let confidence =
            round_tenth(CONFIDENCE_MIN + (CONFIDENCE_MAX - CONFIDENCE_MIN) * rng.unit());

        debug!(%attack_type, %severity, %source, "synthesized alert");

        Alert {
            id: counters.attacks_detected,
            timestamp: Local::now(),
            attack_type,
            severity,
            source,
            destination,
            confidence,
        }
    }
}

fn octet<R: RandomSource + ?Sized>(rng: &mut R) -> u8 {
    rng.int_in(OCTET_RANGE.start, OCTET_RANGE.end) as u8
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays fixed draws. Integers and indices share one queue, reals
    /// another.
    #[derive(Default)]
    pub(crate) struct ScriptedSource {
        ints: VecDeque<u32>,
        units: VecDeque<f64>,
    }

    impl ScriptedSource {
        pub(crate) fn new(ints: &[u32], units: &[f64]) -> Self {
            ScriptedSource {
                ints: ints.iter().copied().collect(),
                units: units.iter().copied().collect(),
            }
        }
    }

    impl RandomSource for ScriptedSource {
        fn int_in(&mut self, low: u32, _high: u32) -> u32 {
            self.ints.pop_front().unwrap_or(low)
        }

        fn unit(&mut self) -> f64 {
            self.units.pop_front().unwrap_or(0.0)
        }

        fn index(&mut self, _len: usize) -> usize {
            self.ints.pop_front().unwrap_or(0) as usize
        }

        fn pick_weighted(&mut self, _weights: &[f64]) -> usize {
            self.ints.pop_front().unwrap_or(0) as usize
        }
    }

    #[test]
    fn draw_above_threshold_emits_syn_flood_alert() {
        let step = SimulationStep::default();
        let mut counters = AggregateCounters::new();
        // normal, suspicious, attack, type index, severity, four source octets, destination octet
        let mut rng = ScriptedSource::new(&[100, 10, 5, 0, 0, 10, 20, 30, 40, 7], &[0.9, 0.5]);

        let outcome = step.step(&mut counters, &mut rng);

        let alert = outcome.alert.expect("alert expected above threshold");
        assert_eq!(alert.attack_type, AttackType::SynFlood);
        assert_eq!(alert.severity, Severity::Critical);
        assert_eq!(alert.source, Ipv4Addr::new(10, 20, 30, 40));
        assert_eq!(alert.destination, Ipv4Addr::new(192, 168, 1, 7));
        assert_eq!(alert.confidence, 92.0);
        assert_eq!(alert.id, 1);
        assert_eq!(counters.attacks_detected, 1);
        assert_eq!(counters.attack_distribution[&AttackType::SynFlood], 1);
        assert_eq!(counters.total_packets, 115);
        assert_eq!(counters.normal_traffic, 100);
    }

    #[test]
    fn draw_at_threshold_emits_nothing() {
        let step = SimulationStep::default();
        let mut counters = AggregateCounters::new();
        let mut rng = ScriptedSource::new(&[60, 0, 0], &[ALERT_THRESHOLD]);

        let outcome = step.step(&mut counters, &mut rng);

        assert!(outcome.alert.is_none());
        assert_eq!(counters.attacks_detected, 0);
        assert_eq!(counters.total_packets, 60);
    }

    #[test]
    fn confidence_is_rounded_to_one_decimal() {
        let step = SimulationStep::default();
        let mut counters = AggregateCounters::new();
        // 85 + 14 * 0.123 = 86.722
        let mut rng = ScriptedSource::new(&[60, 0, 0, 1, 2, 1, 1, 1, 1, 1], &[0.9, 0.123]);

        let alert = step.step(&mut counters, &mut rng).alert.unwrap();
        assert_eq!(alert.confidence, 86.7);
        assert_eq!(alert.attack_type, AttackType::UdpFlood);
        assert_eq!(alert.severity, Severity::Medium);
    }

    #[test]
    fn weighted_severity_tracks_weights() {
        let model = SeverityModel::Weighted;
        let mut rng = RngSource::seeded(11);
        let draws = 20_000;
        let mut seen = [0usize; 3];
        for _ in 0..draws {
            let severity = model.pick(&mut rng);
            let slot = Severity::ALL.iter().position(|s| *s == severity).unwrap();
            seen[slot] += 1;
        }
        for (count, weight) in seen.iter().zip(SEVERITY_WEIGHTS) {
            let share = *count as f64 / draws as f64;
            assert!((share - weight).abs() < 0.02, "share {} vs weight {}", share, weight);
        }
    }

    #[test]
    fn scripted_weighted_index_maps_to_severity() {
        let mut rng = ScriptedSource::new(&[0, 1, 2], &[]);
        let picks: Vec<Severity> =
            (0..3).map(|_| SeverityModel::Weighted.pick(&mut rng)).collect();
        assert_eq!(picks, Severity::ALL.to_vec());
    }

    #[test]
    fn unusable_weights_fall_back_to_first_index() {
        let mut rng = RngSource::seeded(3);
        assert_eq!(rng.pick_weighted(&[0.0, 0.0]), 0);
        assert!(rng.pick_weighted(&[0.0, 1.0]) == 1);
    }

    #[test]
    fn seeded_ticks_stay_in_range_and_balance() {
        let step = SimulationStep::new(SeverityModel::Weighted);
        let mut counters = AggregateCounters::new();
        let mut rng = RngSource::seeded(7);
        let mut expected_total = 0u64;
        let mut alerts = 0u64;

        for _ in 0..2_000 {
            let outcome = step.step(&mut counters, &mut rng);
            let counts = outcome.sample.counts;
            assert!(NORMAL_RANGE.contains(&counts.normal));
            assert!(SUSPICIOUS_RANGE.contains(&counts.suspicious));
            assert!(ATTACK_RANGE.contains(&counts.attack));
            expected_total += counts.total();

            if let Some(alert) = outcome.alert {
                alerts += 1;
                assert_eq!(alert.id, alerts);
                assert!((CONFIDENCE_MIN..=CONFIDENCE_MAX).contains(&alert.confidence));
                let tenths = alert.confidence * 10.0;
                assert!((tenths - tenths.round()).abs() < 1e-9, "{}", alert.confidence);
                assert_ne!(alert.source.octets()[0], 0);
                assert_eq!(&alert.destination.octets()[..3], &TARGET_SUBNET);
            }
            assert_eq!(counters.distribution_total(), counters.attacks_detected);
        }

        assert_eq!(counters.total_packets, expected_total);
        assert_eq!(counters.attacks_detected, alerts);
        // roughly 15% of ticks alert
        assert!(alerts > 150 && alerts < 450, "alerts = {}", alerts);
    }

    #[test]
    fn same_seed_same_telemetry() {
        let step = SimulationStep::default();
        let (mut a, mut b) = (AggregateCounters::new(), AggregateCounters::new());
        let (mut rng_a, mut rng_b) = (RngSource::seeded(42), RngSource::seeded(42));
        for _ in 0..50 {
            step.step(&mut a, &mut rng_a);
            step.step(&mut b, &mut rng_b);
        }
        assert_eq!(a, b);
    }
}
