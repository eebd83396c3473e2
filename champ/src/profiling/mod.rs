//! Trace collection
//!
//! - `emulator`: watch registration and the emulator subprocess
//! - `trace_event`: decoding of trace lines
//! - `event_processor`: the state machine that builds the aggregates
//! - `session`: the async read loop with interrupt handling
//! - `event_display`: progress and summary output

pub mod emulator;
pub mod event_display;
pub mod event_processor;
pub mod session;
pub mod trace_event;

pub use emulator::{registration, spawn_emulator, Emulator};
pub use event_display::{display_progress, display_statistics};
pub use event_processor::TraceProcessor;
pub use session::{run_session, ExitReason, SessionOutcome};
pub use trace_event::TraceEvent;
