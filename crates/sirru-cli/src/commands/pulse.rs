use clap::Subcommand;
use serde_json::json;
use sirru_core::ambience::{Ambience, MAX_PULSE_OFFSET_MS};
use sirru_core::pulse::{support_options, tide_peak, ANCHOR_COUNT, REGIONS, TIDE};
use sirru_core::{Config, Mood, PulseBoard};

#[derive(Subcommand)]
pub enum PulseAction {
    /// Totals and per-region tallies for the demo board
    Stats,
    /// List region codes
    Regions,
    /// Add a check-in to the demo board and show the support offered
    Submit {
        /// Region code, e.g. K
        region: String,
        /// sunny or stormy
        mood: Mood,
    },
    /// Stormy share by hour of day, with the peak hour
    Tide,
    /// Demo pins with their animation start offsets
    Map,
}

pub fn run(action: PulseAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut board = PulseBoard::demo();

    match action {
        PulseAction::Stats => {
            let stats = board.stats();
            let out = json!({
                "total": stats.total,
                "sunny": stats.sunny,
                "stormy": stats.stormy,
                "stormy_pct": stats.stormy_pct(),
                "regions": board.by_region(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        PulseAction::Regions => {
            println!("{}", serde_json::to_string_pretty(&REGIONS)?);
        }
        PulseAction::Submit { region, mood } => {
            let pulse = board.submit(&region, mood)?.clone();
            let out = json!({
                "pulse": pulse,
                "support": support_options(mood),
                "stats": board.stats(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        PulseAction::Tide => {
            let hours: Vec<_> = TIDE
                .iter()
                .map(|p| {
                    json!({
                        "hour": p.hour,
                        "label": p.label,
                        "stormy_pct": p.stormy_pct,
                        "band": p.band(),
                    })
                })
                .collect();
            let out = json!({
                "anchors": ANCHOR_COUNT,
                "peak": tide_peak(&TIDE),
                "hours": hours,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        PulseAction::Map => {
            let mut ambience = Ambience::new(config.ambience.seed);
            let offsets = ambience.pulse_offsets(board.pulses().len(), MAX_PULSE_OFFSET_MS);
            let pins: Vec<_> = board
                .pulses()
                .iter()
                .zip(offsets)
                .map(|(p, offset_ms)| {
                    json!({
                        "region": p.region,
                        "mood": p.mood,
                        "offset_ms": offset_ms,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&pins)?);
        }
    }
    Ok(())
}
