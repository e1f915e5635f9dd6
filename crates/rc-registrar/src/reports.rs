//! Attendance report queries.
//!
//! Reports scan committed blocks and the pending pool, so a record is
//! visible from the moment it is admitted and stays visible after minting.

use rc_ledger::Ledger;
use serde::Serialize;
use shared_types::{AttendancePayload, TransactionData};

/// One attendance record, projected for reporting.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttendanceRecord {
    pub student_id: String,
    pub event_id: String,
    pub timestamp: u64,
}

impl From<&AttendancePayload> for AttendanceRecord {
    fn from(payload: &AttendancePayload) -> Self {
        Self {
            student_id: payload.student_id.clone(),
            event_id: payload.event_id.clone(),
            timestamp: payload.timestamp,
        }
    }
}

/// All attendance recorded for one student.
pub fn query_attendance(ledger: &Ledger, student_id: &str) -> Vec<AttendanceRecord> {
    collect(ledger, |payload| payload.student_id == student_id)
}

/// All attendance recorded for one event.
pub fn query_event_attendance(ledger: &Ledger, event_id: &str) -> Vec<AttendanceRecord> {
    collect(ledger, |payload| payload.event_id == event_id)
}

fn collect<F>(ledger: &Ledger, matches: F) -> Vec<AttendanceRecord>
where
    F: Fn(&AttendancePayload) -> bool,
{
    let mut records = Vec::new();
    for block in ledger.all_blocks() {
        for tx in &block.transactions {
            if let TransactionData::Attendance(payload) = &tx.data {
                if matches(payload) {
                    records.push(payload.into());
                }
            }
        }
    }
    for tx in ledger.pending_transactions() {
        if let TransactionData::Attendance(payload) = &tx.data {
            if matches(payload) {
                records.push(payload.into());
            }
        }
    }
    records
}
