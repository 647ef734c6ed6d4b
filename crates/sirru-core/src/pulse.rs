//! Anonymous mood pulses and their aggregation.
//!
//! A pulse is one "sunny" or "stormy" check-in tagged with a region.
//! The board only keeps pulses in memory; the map view reads the tallies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Sunny,
    Stormy,
}

impl std::str::FromStr for Mood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sunny" => Ok(Mood::Sunny),
            "stormy" => Ok(Mood::Stormy),
            other => Err(ValidationError::InvalidValue {
                field: "mood".into(),
                message: format!("expected 'sunny' or 'stormy', got '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    pub code: &'static str,
    pub name: &'static str,
}

/// The fixed region list, north to south.
#[rustfmt::skip]
pub const REGIONS: [Region; 20] = [
    Region { code: "HA", name: "Haa Alif" },
    Region { code: "HDh", name: "Haa Dhaalu" },
    Region { code: "Sh", name: "Shaviyani" },
    Region { code: "N", name: "Noonu" },
    Region { code: "R", name: "Raa" },
    Region { code: "B", name: "Baa" },
    Region { code: "Lh", name: "Lhaviyani" },
    Region { code: "K", name: "Kaafu (Malé)" },
    Region { code: "AA", name: "Alif Alif" },
    Region { code: "ADh", name: "Alif Dhaalu" },
    Region { code: "V", name: "Vaavu" },
    Region { code: "M", name: "Meemu" },
    Region { code: "F", name: "Faafu" },
    Region { code: "Dh", name: "Dhaalu" },
    Region { code: "Th", name: "Thaa" },
    Region { code: "L", name: "Laamu" },
    Region { code: "GA", name: "Gaafu Alif" },
    Region { code: "GDh", name: "Gaafu Dhaalu" },
    Region { code: "Gn", name: "Gnaviyani" },
    Region { code: "S", name: "Seenu (Addu)" },
];

/// Region preselected during onboarding.
pub const DEFAULT_REGION: &str = "K";

/// Community head-count shown on the home screen.
pub const ANCHOR_COUNT: u32 = 2847;

/// Look up a region by its exact code.
pub fn region(code: &str) -> Result<&'static Region, ValidationError> {
    REGIONS
        .iter()
        .find(|r| r.code == code)
        .ok_or_else(|| ValidationError::UnknownRegion(code.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodPulse {
    pub id: String,
    pub region: String,
    pub mood: Mood,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulseStats {
    pub total: usize,
    pub sunny: usize,
    pub stormy: usize,
}

impl PulseStats {
    fn record(&mut self, mood: Mood) {
        self.total += 1;
        match mood {
            Mood::Sunny => self.sunny += 1,
            Mood::Stormy => self.stormy += 1,
        }
    }

    /// Share of stormy pulses, 0..=100. Zero when empty.
    pub fn stormy_pct(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.stormy * 100 + self.total / 2) / self.total) as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionTally {
    pub code: &'static str,
    pub name: &'static str,
    pub stats: PulseStats,
}

/// Where someone can go after a stormy check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportOption {
    Koamas,
    Faru,
    Breathing,
    None,
}

/// Support offered after a check-in. Sunny check-ins get none.
pub fn support_options(mood: Mood) -> &'static [SupportOption] {
    match mood {
        Mood::Stormy => &[
            SupportOption::Koamas,
            SupportOption::Faru,
            SupportOption::Breathing,
            SupportOption::None,
        ],
        Mood::Sunny => &[],
    }
}

/// One bar of the Tide: the share of stormy check-ins around an hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TidePoint {
    pub hour: u8,
    pub label: &'static str,
    pub stormy_pct: u8,
}

impl TidePoint {
    pub fn band(&self) -> TideBand {
        TideBand::of(self.stormy_pct)
    }
}

/// Stormy share through the day, in hour order.
#[rustfmt::skip]
pub const TIDE: [TidePoint; 7] = [
    TidePoint { hour: 0, label: "12am", stormy_pct: 65 },
    TidePoint { hour: 6, label: "6am", stormy_pct: 25 },
    TidePoint { hour: 12, label: "12pm", stormy_pct: 35 },
    TidePoint { hour: 18, label: "6pm", stormy_pct: 50 },
    TidePoint { hour: 21, label: "9pm", stormy_pct: 70 },
    TidePoint { hour: 22, label: "10pm", stormy_pct: 80 },
    TidePoint { hour: 23, label: "11pm", stormy_pct: 92 },
];

/// Colour band for a Tide bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TideBand {
    Calm,
    Choppy,
    Swell,
    Storm,
}

impl TideBand {
    pub fn of(stormy_pct: u8) -> Self {
        match stormy_pct {
            90.. => TideBand::Storm,
            70..=89 => TideBand::Swell,
            50..=69 => TideBand::Choppy,
            _ => TideBand::Calm,
        }
    }
}

/// The highest bar. Ties go to the earliest point.
pub fn tide_peak(points: &[TidePoint]) -> Option<&TidePoint> {
    points
        .iter()
        .reduce(|best, p| if p.stormy_pct > best.stormy_pct { p } else { best })
}

#[derive(Debug, Clone, Default)]
pub struct PulseBoard {
    pulses: Vec<MoodPulse>,
}

impl PulseBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Board pre-filled with the 25 demo check-ins.
    pub fn demo() -> Self {
        const DEMO: [(&str, Mood); 25] = [
            ("HA", Mood::Stormy),
            ("HDh", Mood::Stormy),
            ("Sh", Mood::Sunny),
            ("N", Mood::Stormy),
            ("K", Mood::Stormy),
            ("K", Mood::Stormy),
            ("K", Mood::Sunny),
            ("B", Mood::Stormy),
            ("Lh", Mood::Stormy),
            ("R", Mood::Sunny),
            ("AA", Mood::Stormy),
            ("AA", Mood::Stormy),
            ("ADh", Mood::Sunny),
            ("V", Mood::Stormy),
            ("M", Mood::Stormy),
            ("F", Mood::Stormy),
            ("Dh", Mood::Stormy),
            ("Th", Mood::Sunny),
            ("L", Mood::Stormy),
            ("L", Mood::Sunny),
            ("GA", Mood::Stormy),
            ("GDh", Mood::Stormy),
            ("Gn", Mood::Stormy),
            ("S", Mood::Sunny),
            ("S", Mood::Stormy),
        ];
        let at = Utc::now();
        let pulses = DEMO
            .iter()
            .enumerate()
            .map(|(i, (code, mood))| MoodPulse {
                id: (i + 1).to_string(),
                region: code.to_string(),
                mood: *mood,
                at,
            })
            .collect();
        Self { pulses }
    }

    /// Record a check-in. The region code must be one of [`REGIONS`].
    pub fn submit(&mut self, region_code: &str, mood: Mood) -> Result<&MoodPulse, ValidationError> {
        let region = region(region_code)?;
        self.pulses.push(MoodPulse {
            id: Uuid::new_v4().to_string(),
            region: region.code.to_string(),
            mood,
            at: Utc::now(),
        });
        let index = self.pulses.len() - 1;
        Ok(&self.pulses[index])
    }

    pub fn pulses(&self) -> &[MoodPulse] {
        &self.pulses
    }

    pub fn stats(&self) -> PulseStats {
        let mut stats = PulseStats::default();
        for pulse in &self.pulses {
            stats.record(pulse.mood);
        }
        stats
    }

    /// Per-region tallies in [`REGIONS`] order, including empty regions.
    pub fn by_region(&self) -> Vec<RegionTally> {
        REGIONS
            .iter()
            .map(|r| {
                let mut stats = PulseStats::default();
                for pulse in self.pulses.iter().filter(|p| p.region == r.code) {
                    stats.record(pulse.mood);
                }
                RegionTally {
                    code: r.code,
                    name: r.name,
                    stats,
                }
            })
            .collect()
    }
}
