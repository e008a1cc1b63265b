use super::{Record, Recorder};

/// Buffered recorder.
///
/// Keeps every record in memory, in the order they were written.
/// This is used for inspecting the trajectory of a solver, e.g., in tests.
#[derive(Debug, Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self { buf: Vec::default() }
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> std::slice::Iter<Record> {
        self.buf.iter()
    }

    /// The number of records.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no record has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The most recent record.
    pub fn last(&self) -> Option<&Record> {
        self.buf.last()
    }

    /// Consumes the recorder, returning the records.
    pub fn into_records(self) -> Vec<Record> {
        self.buf
    }
}

impl Recorder for BufferedRecorder {
    /// Write a [`Record`] to the buffer.
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }
}
