//! Box-breathing session controller.
//!
//! The controller is a virtual-time state machine. It does not use
//! internal threads; the caller moves time forward with `advance()` and
//! renders the events that come back.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Inhale -> HoldAfterInhale -> Exhale -> HoldAfterExhale -> Inhale ...
//!                                                         |
//!                                       (target cycles)   +--> Idle
//! ```
//!
//! Two repeating timers drive a running session: the phase timer fires every
//! phase duration and the ticker fires every second. The phase timer is armed
//! first, so when both are due at the same instant the transition is applied
//! before the tick. The countdown is derived from when the current phase
//! began, so the tick that lands on a transition reads the full duration
//! instead of zero.
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = BreathingSession::new(BreathingConfig::default());
//! session.start();
//! // Once per frame:
//! for event in session.advance(16) { render(event); }
//! ```

use tracing::{debug, info};

use super::phase::BreathPhase;
use crate::config::BreathingConfig;
use crate::events::Event;
use crate::scheduler::Scheduler;

const TICK_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BreathAction {
    AdvancePhase,
    Tick,
}

/// Core breathing controller. Owns its timers exclusively.
#[derive(Debug, Clone)]
pub struct BreathingSession {
    phase_duration_secs: u32,
    target_cycles: u32,
    timers: Scheduler<BreathAction>,
    phase: BreathPhase,
    remaining_in_phase: u32,
    completed_cycles: u32,
    elapsed_secs: u64,
    started_at_ms: u64,
    phase_started_at_ms: u64,
}

impl BreathingSession {
    /// Create an idle session.
    ///
    /// Zero durations or targets are raised to 1; `Config::validate` rejects
    /// them earlier for anything read from disk.
    pub fn new(config: BreathingConfig) -> Self {
        let phase_duration_secs = config.phase_duration_secs.max(1);
        Self {
            phase_duration_secs,
            target_cycles: config.target_cycles.max(1),
            timers: Scheduler::new(),
            phase: BreathPhase::Idle,
            remaining_in_phase: phase_duration_secs,
            completed_cycles: 0,
            elapsed_secs: 0,
            started_at_ms: 0,
            phase_started_at_ms: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> BreathPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }

    pub fn remaining_in_phase(&self) -> u32 {
        self.remaining_in_phase
    }

    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn target_cycles(&self) -> u32 {
        self.target_cycles
    }

    pub fn phase_duration_secs(&self) -> u32 {
        self.phase_duration_secs
    }

    /// Current virtual time.
    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// When the next timer fires, if the session is running.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.timers.next_due_ms()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::BreathingSnapshot {
            phase: self.phase,
            remaining_in_phase: self.remaining_in_phase,
            completed_cycles: self.completed_cycles,
            target_cycles: self.target_cycles,
            elapsed_secs: self.elapsed_secs,
            elapsed_label: format_elapsed(self.elapsed_secs),
            at_ms: self.now_ms(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a session from Idle. Already running: no-op.
    pub fn start(&mut self) -> Option<Event> {
        if self.is_running() {
            return None;
        }
        let now = self.now_ms();
        self.completed_cycles = 0;
        self.elapsed_secs = 0;
        self.started_at_ms = now;
        self.phase_started_at_ms = now;
        self.phase = BreathPhase::Inhale;
        self.remaining_in_phase = self.phase_duration_secs;

        // Phase timer first: it must win ties against the ticker.
        self.timers
            .schedule_repeating(self.phase_ms(), BreathAction::AdvancePhase);
        self.timers.schedule_repeating(TICK_MS, BreathAction::Tick);

        debug!(at_ms = now, target_cycles = self.target_cycles, "breathing session started");
        Some(Event::SessionStarted {
            phase: self.phase,
            remaining_in_phase: self.remaining_in_phase,
            target_cycles: self.target_cycles,
            at_ms: now,
        })
    }

    /// Cancel every timer and go Idle, keeping the counters.
    pub fn stop(&mut self) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        let cancelled = self.halt();
        debug!(cancelled, "breathing session stopped");
        Some(Event::SessionStopped {
            completed_cycles: self.completed_cycles,
            elapsed_secs: self.elapsed_secs,
            at_ms: self.now_ms(),
        })
    }

    /// Zero the cycle and elapsed counters. Only while Idle.
    ///
    /// Returns `None` when running or when the counters are already zero.
    pub fn reset_counters(&mut self) -> Option<Event> {
        if self.is_running() || (self.completed_cycles == 0 && self.elapsed_secs == 0) {
            return None;
        }
        self.completed_cycles = 0;
        self.elapsed_secs = 0;
        Some(Event::CountersReset { at_ms: self.now_ms() })
    }

    /// `stop()` followed by `reset_counters()`.
    pub fn reset(&mut self) -> Vec<Event> {
        self.stop().into_iter().chain(self.reset_counters()).collect()
    }

    /// Move virtual time forward by `delta_ms`.
    pub fn advance(&mut self, delta_ms: u64) -> Vec<Event> {
        self.advance_to(self.now_ms().saturating_add(delta_ms))
    }

    /// Fire every timer due up to `target_ms`, in order.
    pub fn advance_to(&mut self, target_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(fired) = self.timers.pop_due(target_ms) {
            match fired.action {
                BreathAction::AdvancePhase => self.on_phase_timer(fired.at_ms, &mut events),
                BreathAction::Tick => self.on_tick(fired.at_ms, &mut events),
            }
        }
        self.timers.advance_clock(target_ms);
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn phase_ms(&self) -> u64 {
        u64::from(self.phase_duration_secs) * 1000
    }

    fn sync_clock(&mut self, now: u64) {
        self.elapsed_secs = now.saturating_sub(self.started_at_ms) / 1000;
        let into_phase = now.saturating_sub(self.phase_started_at_ms) / 1000;
        let into_phase = u32::try_from(into_phase).unwrap_or(u32::MAX);
        self.remaining_in_phase = self
            .phase_duration_secs
            .saturating_sub(into_phase)
            .max(1);
    }

    fn on_tick(&mut self, now: u64, events: &mut Vec<Event>) {
        self.sync_clock(now);
        events.push(Event::Tick {
            phase: self.phase,
            remaining_in_phase: self.remaining_in_phase,
            elapsed_secs: self.elapsed_secs,
            at_ms: now,
        });
    }

    fn on_phase_timer(&mut self, now: u64, events: &mut Vec<Event>) {
        self.sync_clock(now);
        let from = self.phase;

        if from.ends_cycle() {
            self.completed_cycles += 1;
            events.push(Event::CycleCompleted {
                completed_cycles: self.completed_cycles,
                target_cycles: self.target_cycles,
                at_ms: now,
            });
            if self.completed_cycles >= self.target_cycles {
                self.halt();
                info!(
                    completed_cycles = self.completed_cycles,
                    elapsed_secs = self.elapsed_secs,
                    "breathing session complete"
                );
                events.push(Event::SessionComplete {
                    completed_cycles: self.completed_cycles,
                    elapsed_secs: self.elapsed_secs,
                    at_ms: now,
                });
                return;
            }
        }

        self.phase = from.next();
        self.phase_started_at_ms = now;
        self.remaining_in_phase = self.phase_duration_secs;
        debug!(?from, to = ?self.phase, at_ms = now, "phase advanced");
        events.push(Event::PhaseChanged {
            from,
            to: self.phase,
            remaining_in_phase: self.remaining_in_phase,
            completed_cycles: self.completed_cycles,
            at_ms: now,
        });
    }

    /// Drop both timers together and go Idle.
    fn halt(&mut self) -> usize {
        let cancelled = self.timers.cancel_all();
        self.phase = BreathPhase::Idle;
        self.remaining_in_phase = self.phase_duration_secs;
        cancelled
    }
}

/// Format whole seconds as `M:SS`. Minutes are unbounded.
pub fn format_elapsed(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
