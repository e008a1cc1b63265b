//! Types and traits for observing solvers.
//!
//! Solvers report their progress as [`Record`]s written to a [`Recorder`].
//! A recorder is purely an observer: nothing it does feeds back into the
//! solver.
//!
//! # Snapshots
//!
//! After each iteration (a sweep, an outer iteration or an episode, depending
//! on the solver), a snapshot record is written with [`Record::snapshot`]. It
//! holds the iteration index, the current value function and, optionally, the
//! current policy. The policy is omitted when only values changed, e.g., after
//! the evaluation phase of policy iteration.
//!
//! ```rust
//! use gridmdp_core::record::{BufferedRecorder, Record, Recorder, RecordValue};
//!
//! let mut recorder = BufferedRecorder::new();
//! let mut record = Record::snapshot(1, &[0.0, -1.0], Some(&[1, 0][..]));
//! record.insert("delta", RecordValue::Scalar(1.0));
//! recorder.write(record);
//!
//! let last = recorder.last().unwrap();
//! assert_eq!(last.get_indices("policy").unwrap(), vec![1, 0]);
//! ```
//!
//! # Recorders
//!
//! * [`NullRecorder`] discards records.
//! * [`BufferedRecorder`] keeps them in memory, handy in tests.
//! * [`LogRecorder`] emits them through the [`log`] facade.
mod base;
mod buffered_recorder;
mod log_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue, DELTA, ITERATION, PHASE, POLICY, VALUES};
pub use buffered_recorder::BufferedRecorder;
pub use log_recorder::LogRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
