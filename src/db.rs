use chrono::Local;
use multimap::MultiMap;
use tracing::{debug, info};

use crate::models::domain::{
    Operation, OperationLogEntry, OperationStatus, Record, RecordKind, RecordPayload,
};
use crate::models::dto::StoreStats;

/// In-memory stand-in for the event database. Records are only ever
/// appended; `reset` is the single way to remove them.
#[derive(Debug)]
pub struct RecordStore {
    records: Vec<Record>,
    // record positions per collection
    by_kind: MultiMap<RecordKind, usize>,
    operation_log: Vec<OperationLogEntry>,
    next_id: u64,
}

impl RecordStore {
    pub fn new() -> Self {
        RecordStore {
            records: Vec::new(),
            by_kind: MultiMap::new(),
            operation_log: Vec::new(),
            next_id: 1,
        }
    }

    pub fn insert(&mut self, payload: RecordPayload) -> &Record {
        let now = Local::now();
        let kind = payload.kind();
        let id = self.next_id;
        self.next_id = id + 1;

        self.by_kind.insert(kind, self.records.len());
        self.records.push(Record { id, timestamp: now, kind, payload });
        self.operation_log.push(OperationLogEntry {
            time: now,
            operation: Operation::Insert,
            collection: kind,
            record_id: id,
            status: OperationStatus::Success,
        });
        debug!(record_id = id, collection = %kind, "record inserted");

        &self.records[self.records.len() - 1]
    }

    /// Up to `n` most recent records, newest first.
    pub fn recent(&self, n: usize) -> Vec<&Record> {
        self.records.iter().rev().take(n).collect()
    }

    pub fn of_kind(&self, kind: RecordKind) -> Vec<&Record> {
        self.by_kind
            .get_vec(&kind)
            .map(|positions| positions.iter().map(|&pos| &self.records[pos]).collect())
            .unwrap_or_default()
    }

    pub fn stats(&self) -> StoreStats {
        let count_by_type = RecordKind::ALL
            .iter()
            .map(|kind| (*kind, self.by_kind.get_vec(kind).map_or(0, Vec::len)))
            .collect();
        StoreStats { total: self.records.len(), count_by_type }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn operation_log(&self) -> &[OperationLogEntry] {
        &self.operation_log
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn reset(&mut self) {
        let cleared = self.records.len();
        self.records.clear();
        self.by_kind.clear();
        self.operation_log.clear();
        self.next_id = 1;
        info!(cleared, "record store cleared");
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}
