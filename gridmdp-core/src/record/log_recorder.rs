use super::{Record, RecordValue, Recorder};
use log::{log, log_enabled, Level};

/// Emits records through the [`log`] facade.
///
/// Scalars and strings are printed as `key=value`. Arrays are summarized by
/// their length unless [`LogRecorder::with_arrays`] is set.
#[derive(Debug, Clone)]
pub struct LogRecorder {
    name: String,
    level: Level,
    with_arrays: bool,
}

impl Default for LogRecorder {
    fn default() -> Self {
        Self {
            name: "solver".to_string(),
            level: Level::Debug,
            with_arrays: false,
        }
    }
}

impl LogRecorder {
    /// Constructs a recorder logging at debug level.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the log level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Prints array contents instead of their lengths.
    pub fn with_arrays(mut self, v: bool) -> Self {
        self.with_arrays = v;
        self
    }

    fn format_value(&self, v: &RecordValue) -> String {
        match v {
            RecordValue::Scalar(v) => format!("{}", v),
            RecordValue::String(s) => s.clone(),
            RecordValue::Array1(v) if self.with_arrays => format!("{:.4?}", v),
            RecordValue::Indices(v) if self.with_arrays => format!("{:?}", v),
            RecordValue::Array1(v) => format!("<{} values>", v.len()),
            RecordValue::Indices(v) => format!("<{} indices>", v.len()),
            RecordValue::Array2(_, shape) => format!("<{}x{} array>", shape[0], shape[1]),
        }
    }
}

impl Recorder for LogRecorder {
    fn write(&mut self, record: Record) {
        if !log_enabled!(self.level) {
            return;
        }

        let mut keys = record.keys().collect::<Vec<_>>();
        keys.sort();
        let fields = keys
            .into_iter()
            .filter_map(|k| record.get(k).map(|v| format!("{}={}", k, self.format_value(v))))
            .collect::<Vec<_>>()
            .join(", ");
        log!(self.level, "{}: {}", self.name, fields);
    }
}
