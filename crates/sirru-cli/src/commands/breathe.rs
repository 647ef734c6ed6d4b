use clap::Args;
use sirru_core::{BreathingSession, Config};

use crate::clock::drive;
use crate::render::emit_event;

#[derive(Args)]
pub struct BreatheArgs {
    /// Cycles to complete (defaults to breathing.target_cycles)
    #[arg(long)]
    cycles: Option<u32>,
    /// Seconds per phase (defaults to breathing.phase_duration_secs)
    #[arg(long)]
    phase_secs: Option<u32>,
    /// Stop after this many seconds even if the session is still running
    #[arg(long)]
    stop_after: Option<u64>,
    /// Pace the session with the wall clock
    #[arg(long)]
    realtime: bool,
}

pub fn run(args: BreatheArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut breathing = config.breathing;
    if let Some(cycles) = args.cycles {
        breathing.target_cycles = cycles;
    }
    if let Some(secs) = args.phase_secs {
        breathing.phase_duration_secs = secs;
    }
    let mut check = config.clone();
    check.breathing = breathing;
    check.validate()?;

    let mut session = BreathingSession::new(breathing);
    if let Some(event) = session.start() {
        emit_event(&event)?;
    }

    let stop_at_ms = args.stop_after.map(|secs| secs.saturating_mul(1000));
    let frame_ms = if args.realtime { 100 } else { 1000 };
    let mut failure = None;

    drive(args.realtime, frame_ms, |delta| {
        let mut events = session.advance(delta);
        if stop_at_ms.is_some_and(|at| session.now_ms() >= at) {
            events.extend(session.stop());
        }
        for event in &events {
            if let Err(e) = emit_event(event) {
                failure = Some(e);
                return false;
            }
        }
        session.is_running()
    })?;

    if let Some(e) = failure {
        return Err(e.into());
    }
    emit_event(&session.snapshot())?;
    Ok(())
}
