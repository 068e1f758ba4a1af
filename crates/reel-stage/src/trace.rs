//! StageTrace — The recorded sequence of stage events
//!
//! A trace captures the timeline of one or more spins. It doubles as a
//! sink so hosts and tests can record what the engine announced.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::bus::StageSink;
use crate::event::StageEvent;
use crate::stage::{Stage, StageCategory};

/// A recorded trace of stage events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTrace {
    /// Identifier for this trace
    pub trace_id: String,

    /// All events in the order they were emitted
    pub events: Vec<StageEvent>,

    /// When recording started
    pub recorded_at: DateTime<Utc>,
}

impl StageTrace {
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            events: Vec::new(),
            recorded_at: Utc::now(),
        }
    }

    /// Wrap in a shareable handle usable as a sink
    pub fn shared(trace_id: impl Into<String>) -> SharedTrace {
        SharedTrace(Arc::new(Mutex::new(Self::new(trace_id))))
    }

    pub fn push(&mut self, event: StageEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get total duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => last.timestamp_ms - first.timestamp_ms,
            _ => 0.0,
        }
    }

    /// Get events by stage type name
    pub fn events_by_type(&self, type_name: &str) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.type_name() == type_name)
            .collect()
    }

    /// Get events by category
    pub fn events_by_category(&self, category: StageCategory) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.stage.category() == category)
            .collect()
    }

    pub fn has_stage(&self, type_name: &str) -> bool {
        self.events.iter().any(|e| e.type_name() == type_name)
    }

    /// Reel indices in the order their stop events were emitted
    pub fn reel_stop_order(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| e.stage.reel_index())
            .collect()
    }

    /// Number of accepted spins
    pub fn spin_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.stage, Stage::SpinStart { .. }))
            .count()
    }

    /// Check the trace is a well-formed run of complete sessions
    pub fn validate(&self) -> TraceValidation {
        let mut validation = TraceValidation::default();
        let mut open: Option<usize> = None;

        for event in &self.events {
            match &event.stage {
                Stage::SpinStart { .. } => {
                    if open.is_some() {
                        validation.overlapping_sessions += 1;
                    }
                    open = Some(0);
                    validation.sessions += 1;
                }
                Stage::ReelStop { reel_index } => match open.as_mut() {
                    Some(expected) if *expected == *reel_index => *expected += 1,
                    Some(_) => validation.out_of_order_stops += 1,
                    None => validation.stray_stops += 1,
                },
                Stage::SpinEnd { .. } => {
                    if open.take().is_some() {
                        validation.completed += 1;
                    }
                }
                _ => {}
            }
        }

        validation.unfinished = open.is_some();
        validation
    }
}

/// Validation result for a trace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceValidation {
    pub sessions: usize,
    pub completed: usize,
    pub overlapping_sessions: usize,
    pub out_of_order_stops: usize,
    pub stray_stops: usize,
    pub unfinished: bool,
}

impl TraceValidation {
    pub fn is_valid(&self) -> bool {
        self.overlapping_sessions == 0 && self.out_of_order_stops == 0 && self.stray_stops == 0
    }

    /// Get list of warnings
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();

        if self.overlapping_sessions > 0 {
            warnings.push("SPIN_START while a session was open");
        }
        if self.out_of_order_stops > 0 {
            warnings.push("Reel stops out of order");
        }
        if self.stray_stops > 0 {
            warnings.push("Reel stop outside a session");
        }
        if self.unfinished {
            warnings.push("Last session has no SPIN_END");
        }

        warnings
    }
}

/// Cloneable handle to a trace that records every event it receives
#[derive(Debug, Clone)]
pub struct SharedTrace(Arc<Mutex<StageTrace>>);

impl SharedTrace {
    /// Copy of the current trace
    pub fn snapshot(&self) -> StageTrace {
        self.0.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    pub fn clear(&self) {
        self.0.lock().events.clear();
    }
}

impl StageSink for SharedTrace {
    fn on_stage(&mut self, event: &StageEvent) {
        self.0.lock().push(event.clone());
    }
}
