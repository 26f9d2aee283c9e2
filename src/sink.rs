// Accumulation sink: where collectors hand off finished records.
// Production path is a bounded channel drained by a JSON-lines writer task;
// tests use the in-memory RecordingSink.

use crate::models::{FieldValue, MetricRecord};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

/// Fire-and-forget record intake. Shared by the disk worker and every
/// in-flight webhook request, so implementations must tolerate concurrent
/// callers.
pub trait Sink: Send + Sync {
    fn add_gauge(
        &self,
        name: &str,
        fields: BTreeMap<String, FieldValue>,
        tags: BTreeMap<String, String>,
    );
}

/// Production sink: pushes records into a bounded channel. A full channel
/// means the writer has fallen behind; the record is dropped with a warning
/// rather than blocking a collection cycle or an HTTP request.
pub struct ChannelSink {
    tx: mpsc::Sender<MetricRecord>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<MetricRecord>) -> Self {
        Self { tx }
    }
}

impl Sink for ChannelSink {
    fn add_gauge(
        &self,
        name: &str,
        fields: BTreeMap<String, FieldValue>,
        tags: BTreeMap<String, String>,
    ) {
        let record = MetricRecord::gauge(name, fields, tags);
        if let Err(e) = self.tx.try_send(record) {
            tracing::warn!(
                error = %e,
                measurement = name,
                "record writer channel full or closed; dropping record"
            );
        }
    }
}

/// Channel capacity for the record writer (headroom for one busy cycle).
pub fn writer_channel_capacity() -> usize {
    256
}

/// Spawns the task that drains the record channel and writes each record as
/// one JSON line on stdout. Exits when every sender is dropped.
pub fn spawn_record_writer(mut rx: mpsc::Receiver<MetricRecord>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut out = tokio::io::stdout();
        while let Some(record) = rx.recv().await {
            let mut line = match serde_json::to_vec(&record) {
                Ok(l) => l,
                Err(e) => {
                    tracing::warn!(error = %e, "record writer: serialize failed");
                    continue;
                }
            };
            line.push(b'\n');
            if let Err(e) = out.write_all(&line).await {
                tracing::warn!(error = %e, "record writer: write failed");
            }
        }
        tracing::debug!("Record writer shutting down");
    })
}

/// In-memory sink for tests: keeps every record in arrival order.
#[derive(Default)]
pub struct RecordingSink {
    records: Mutex<Vec<MetricRecord>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<MetricRecord> {
        self.records.lock().expect("recording sink poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("recording sink poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Sink for RecordingSink {
    fn add_gauge(
        &self,
        name: &str,
        fields: BTreeMap<String, FieldValue>,
        tags: BTreeMap<String, String>,
    ) {
        self.records
            .lock()
            .expect("recording sink poisoned")
            .push(MetricRecord::gauge(name, fields, tags));
    }
}
