pub mod domain {
    use chrono::{DateTime, Local};
    use serde::Serialize;
    use std::collections::BTreeMap;
    use std::fmt;
    use std::net::Ipv4Addr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
    pub enum AttackType {
        #[serde(rename = "SYN Flood")]
        SynFlood,
        #[serde(rename = "UDP Flood")]
        UdpFlood,
        #[serde(rename = "HTTP Flood")]
        HttpFlood,
        #[serde(rename = "Slowloris")]
        Slowloris,
        #[serde(rename = "DNS Amplification")]
        DnsAmplification,
    }

    impl AttackType {
        /// Every attack type the simulator can report, in distribution order.
        pub const ALL: [AttackType; 5] = [
            AttackType::SynFlood,
            AttackType::UdpFlood,
            AttackType::HttpFlood,
            AttackType::Slowloris,
            AttackType::DnsAmplification,
        ];

        pub fn as_str(&self) -> &'static str {
            match self {
                AttackType::SynFlood => "SYN Flood",
                AttackType::UdpFlood => "UDP Flood",
                AttackType::HttpFlood => "HTTP Flood",
                AttackType::Slowloris => "Slowloris",
                AttackType::DnsAmplification => "DNS Amplification",
            }
        }
    }

    impl fmt::Display for AttackType {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub enum Severity {
        Critical,
        High,
        Medium,
    }

    impl Severity {
        pub const ALL: [Severity; 3] = [Severity::Critical, Severity::High, Severity::Medium];

        pub fn as_str(&self) -> &'static str {
            match self {
                Severity::Critical => "Critical",
                Severity::High => "High",
                Severity::Medium => "Medium",
            }
        }
    }

    impl fmt::Display for Severity {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    /// Packet counts produced by one tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct TrafficCounts {
        pub normal: u32,
        pub suspicious: u32,
        pub attack: u32,
    }

    impl TrafficCounts {
        pub fn total(&self) -> u64 {
            u64::from(self.normal) + u64::from(self.suspicious) + u64::from(self.attack)
        }
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct TrafficSample {
        #[serde(rename = "time", serialize_with = "super::timefmt::clock")]
        pub timestamp: DateTime<Local>,
        #[serde(flatten)]
        pub counts: TrafficCounts,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Alert {
        pub id: u64,
        #[serde(rename = "time", serialize_with = "super::timefmt::full")]
        pub timestamp: DateTime<Local>,
        #[serde(rename = "type")]
        pub attack_type: AttackType,
        pub severity: Severity,
        pub source: Ipv4Addr,
        pub destination: Ipv4Addr,
        pub confidence: f64,
    }

    /// Running totals shown on the dashboard. Only a reset moves them down.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct AggregateCounters {
        pub total_packets: u64,
        pub attacks_detected: u64,
        pub normal_traffic: u64,
        pub attack_distribution: BTreeMap<AttackType, u64>,
    }

    impl AggregateCounters {
        pub fn new() -> Self {
            AggregateCounters {
                total_packets: 0,
                attacks_detected: 0,
                normal_traffic: 0,
                attack_distribution: AttackType::ALL.iter().map(|t| (*t, 0)).collect(),
            }
        }

        pub fn record_traffic(&mut self, counts: &TrafficCounts) {
            self.total_packets += counts.total();
            self.normal_traffic += u64::from(counts.normal);
        }

        pub fn record_attack(&mut self, attack_type: AttackType) {
            self.attacks_detected += 1;
            if let Some(count) = self.attack_distribution.get_mut(&attack_type) {
                *count += 1;
            }
        }

        pub fn distribution_total(&self) -> u64 {
            self.attack_distribution.values().sum()
        }

        /// Zero every counter, keeping the distribution keys.
        pub fn reset(&mut self) {
            self.total_packets = 0;
            self.attacks_detected = 0;
            self.normal_traffic = 0;
            for count in self.attack_distribution.values_mut() {
                *count = 0;
            }
        }
    }

    impl Default for AggregateCounters {
        fn default() -> Self {
            Self::new()
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    #[serde(rename_all = "lowercase")]
    pub enum RecordKind {
        Traffic,
        Alert,
    }

    impl RecordKind {
        pub const ALL: [RecordKind; 2] = [RecordKind::Traffic, RecordKind::Alert];

        pub fn as_str(&self) -> &'static str {
            match self {
                RecordKind::Traffic => "traffic",
                RecordKind::Alert => "alert",
            }
        }
    }

    impl fmt::Display for RecordKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(untagged)]
    pub enum RecordPayload {
        Traffic(TrafficCounts),
        Alert(Alert),
    }

    impl RecordPayload {
        pub fn kind(&self) -> RecordKind {
            match self {
                RecordPayload::Traffic(_) => RecordKind::Traffic,
                RecordPayload::Alert(_) => RecordKind::Alert,
            }
        }
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Record {
        pub id: u64,
        #[serde(serialize_with = "super::timefmt::full")]
        pub timestamp: DateTime<Local>,
        #[serde(rename = "type")]
        pub kind: RecordKind,
        #[serde(rename = "data")]
        pub payload: RecordPayload,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum Operation {
        Insert,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum OperationStatus {
        Success,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct OperationLogEntry {
        #[serde(serialize_with = "super::timefmt::full")]
        pub time: DateTime<Local>,
        pub operation: Operation,
        pub collection: RecordKind,
        pub record_id: u64,
        pub status: OperationStatus,
    }
}

pub mod dto {
    use super::domain::{OperationLogEntry, Record, RecordKind};
    use serde::Serialize;
    use std::collections::HashMap;

    #[derive(Debug, Serialize, Clone, PartialEq, Eq)]
    pub struct StoreStats {
        pub total: usize,
        pub count_by_type: HashMap<RecordKind, usize>,
    }

    impl StoreStats {
        pub fn count(&self, kind: RecordKind) -> usize {
            self.count_by_type.get(&kind).copied().unwrap_or(0)
        }
    }

    #[derive(Debug, Serialize)]
    pub struct ExportDTO<'a> {
        pub export_time: String,
        pub total_records: usize,
        pub records: &'a [Record],
        #[serde(skip_serializing_if = "Option::is_none")]
        pub operation_log: Option<&'a [OperationLogEntry]>,
    }
}

mod timefmt {
    use chrono::{DateTime, Local};
    use serde::Serializer;

    pub fn full<S: Serializer>(ts: &DateTime<Local>, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format("%Y-%m-%d %H:%M:%S"))
    }

    pub fn clock<S: Serializer>(ts: &DateTime<Local>, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format("%H:%M:%S"))
    }
}

#[cfg(test)]
mod tests {
    use super::domain::*;

    #[test]
    fn counters_start_with_every_attack_type_at_zero() {
        let counters = AggregateCounters::new();
        assert_eq!(counters.attack_distribution.len(), AttackType::ALL.len());
        assert!(counters.attack_distribution.values().all(|c| *c == 0));
        assert_eq!(counters.distribution_total(), 0);
    }

    #[test]
    fn reset_keeps_distribution_keys() {
        let mut counters = AggregateCounters::new();
        counters.record_traffic(&TrafficCounts { normal: 100, suspicious: 10, attack: 5 });
        counters.record_attack(AttackType::Slowloris);
        assert_eq!(counters.total_packets, 115);
        assert_eq!(counters.normal_traffic, 100);

        counters.reset();
        assert_eq!(counters, AggregateCounters::new());
    }

    #[test]
    fn attacks_never_add_distribution_keys() {
        let mut counters = AggregateCounters::new();
        for attack_type in AttackType::ALL {
            counters.record_attack(attack_type);
            counters.record_attack(attack_type);
        }
        assert_eq!(counters.attack_distribution.len(), AttackType::ALL.len());
        assert!(counters.attack_distribution.values().all(|c| *c == 2));
        assert_eq!(counters.distribution_total(), counters.attacks_detected);
    }

    #[test]
    fn record_kind_serializes_lowercase() {
        let json = serde_json::to_string(&RecordKind::Alert).unwrap();
        assert_eq!(json, "\"alert\"");
        let attack = serde_json::to_string(&AttackType::DnsAmplification).unwrap();
        assert_eq!(attack, "\"DNS Amplification\"");
    }
}
