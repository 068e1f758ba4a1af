//! Stage bus — fan-out of stage events to fire-and-forget sinks

use crate::event::StageEvent;

/// Receiver of stage events (audio, analytics, recorders)
///
/// Sinks cannot report failure to the emitter. Anything that goes wrong
/// inside a sink (a missing sound file, a closed device) stays there.
pub trait StageSink {
    fn on_stage(&mut self, event: &StageEvent);
}

impl<F> StageSink for F
where
    F: FnMut(&StageEvent),
{
    fn on_stage(&mut self, event: &StageEvent) {
        self(event)
    }
}

/// Sink that writes every event to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl StageSink for LogSink {
    fn on_stage(&mut self, event: &StageEvent) {
        log::debug!("[stage] {} @ {:.1}ms", event.stage, event.timestamp_ms);
    }
}

/// Ordered set of sinks; every event reaches every sink
#[derive(Default)]
pub struct StageBus {
    sinks: Vec<Box<dyn StageSink>>,
}

impl StageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a sink; sinks receive events in attach order
    pub fn attach(&mut self, sink: impl StageSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn emit(&mut self, event: StageEvent) {
        log::trace!("emit {} to {} sinks", event.stage, self.sinks.len());
        for sink in &mut self.sinks {
            sink.on_stage(&event);
        }
    }
}

impl std::fmt::Debug for StageBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageBus")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}
