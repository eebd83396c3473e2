//! Trace session driver
//!
//! Reads the trace line by line and feeds the [`TraceProcessor`] until the
//! stream ends or the interrupt future completes. Both paths end the same
//! way: the animation encoder is closed and the aggregates are frozen.
//!
//! ```text
//!   trace ──lines──► TraceProcessor ──frames──► AnimationRecorder
//!     │                    │
//!   EOF / interrupt        ▼
//!     └──────────────► finish() ──► SessionOutcome
//! ```

use log::{info, warn};
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::event_display::display_progress;
use super::event_processor::TraceProcessor;
use crate::encoder::AnimationRecorder;
use crate::trace_data::TraceSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    EndOfTrace,
    Interrupted,
    ReadFailed,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::EndOfTrace => f.write_str("trace ended"),
            ExitReason::Interrupted => f.write_str("interrupted"),
            ExitReason::ReadFailed => f.write_str("trace read failed"),
        }
    }
}

#[derive(Debug)]
pub struct SessionOutcome {
    pub summary: TraceSummary,
    /// Encoded animation, if frames were recorded and the encoder succeeded
    pub animation: Option<Vec<u8>>,
    pub exit_reason: ExitReason,
    pub elapsed: Duration,
    pub events: usize,
    pub ignored_lines: usize,
}

/// Consume `trace` until EOF or until `interrupt` resolves
pub async fn run_session<R, I>(
    trace: R,
    mut processor: TraceProcessor,
    mut recorder: Option<AnimationRecorder>,
    interrupt: I,
    show_progress: bool,
) -> SessionOutcome
where
    R: AsyncBufRead + Unpin,
    I: Future,
{
    let started = Instant::now();
    let mut lines = trace.lines();
    tokio::pin!(interrupt);

    let exit_reason = loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if let Some(frame) = processor.process_line(&line) {
                        if let Some(active) = recorder.as_mut() {
                            if let Err(e) = active.send(&frame).await {
                                warn!("{e}; animation recording stopped");
                                recorder = None;
                            }
                        }
                    }
                    if show_progress && (line.starts_with("screen") || line.starts_with("cycles")) {
                        display_progress(processor.frame_count(), processor.cycles);
                    }
                }
                Ok(None) => break ExitReason::EndOfTrace,
                Err(e) => {
                    warn!("reading trace failed: {e}");
                    break ExitReason::ReadFailed;
                }
            },
            _ = &mut interrupt => break ExitReason::Interrupted,
        }
    };
    info!("{exit_reason} after {} events", processor.event_count);

    let animation = match recorder {
        Some(active) => {
            let frames = active.frames();
            match active.finish().await {
                Ok(bytes) => {
                    info!("animation encoded: {frames} frames, {} bytes", bytes.len());
                    Some(bytes)
                }
                Err(e) => {
                    warn!("animation encoder failed: {e}");
                    None
                }
            }
        }
        None => None,
    };

    let events = processor.event_count;
    let ignored_lines = processor.ignored_lines;
    SessionOutcome {
        summary: processor.finish(),
        animation,
        exit_reason,
        elapsed: started.elapsed(),
        events,
        ignored_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, WatchIndex};

    const TRACE: &str = "\
jsr 0x6000 100
watch 0 3
screen 1000
cycles 100000
jsr 0x6100 150
rts 180
garbage line
rts 200
";

    #[tokio::test]
    async fn test_end_of_trace() {
        let processor = TraceProcessor::new(1, false, None);
        let outcome =
            run_session(TRACE.as_bytes(), processor, None, std::future::pending::<()>(), false)
                .await;

        assert_eq!(outcome.exit_reason, ExitReason::EndOfTrace);
        assert_eq!(outcome.events, 7);
        assert_eq!(outcome.ignored_lines, 1);
        assert!(outcome.animation.is_none());
        assert_eq!(outcome.summary.costs.cycles_for(Address(0x6100)), 30);
        assert_eq!(outcome.summary.costs.cycles_for(Address(0x6000)), 70);
        assert_eq!(outcome.summary.samples.samples(WatchIndex(0)), &[vec![3]]);
        assert_eq!(outcome.summary.frames.len(), 1);
    }

    #[tokio::test]
    async fn test_interrupt_keeps_partial_aggregates() {
        let (mut writer, reader) = tokio::io::duplex(1024);
        tokio::io::AsyncWriteExt::write_all(&mut writer, b"jsr 0x6000 10\nrts 25\n")
            .await
            .unwrap();

        let processor = TraceProcessor::new(0, false, None);
        let interrupt = tokio::time::sleep(Duration::from_millis(50));
        let outcome =
            run_session(tokio::io::BufReader::new(reader), processor, None, interrupt, false)
                .await;

        assert_eq!(outcome.exit_reason, ExitReason::Interrupted);
        assert_eq!(outcome.summary.costs.cycles_for(Address(0x6000)), 15);
        drop(writer);
    }
}
