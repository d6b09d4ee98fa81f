//! Temperature bands: icon choice per day and the travel tip for the trip.

use crate::config::IconPaths;

/// Days with a temperature above this get the hot icon.
pub const HOT_ABOVE_C: f64 = 15.0;
/// Days with a temperature below this get the cold icon.
pub const COLD_BELOW_C: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempBand {
    Hot,
    Mild,
    Cold,
}

impl TempBand {
    pub fn for_temperature(temp_c: f64) -> Self {
        if temp_c > HOT_ABOVE_C {
            TempBand::Hot
        } else if temp_c < COLD_BELOW_C {
            TempBand::Cold
        } else {
            TempBand::Mild
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TempBand::Hot => "hot",
            TempBand::Mild => "mild",
            TempBand::Cold => "cold",
        }
    }

    pub fn icon<'a>(&self, icons: &'a IconPaths) -> &'a str {
        match self {
            TempBand::Hot => &icons.hot,
            TempBand::Mild => &icons.mild,
            TempBand::Cold => &icons.cold,
        }
    }
}

pub const TIP_EXTREME_HEAT: &str =
    "Extreme heat ahead! Stay hydrated, avoid the midday sun and plan indoor activities.";
pub const TIP_HOT: &str = "It's going to be hot. Pack sunscreen and light clothing.";
pub const TIP_WARM: &str = "Warm and pleasant. Shorts, sunglasses and a hat are a good call.";
pub const TIP_MILD: &str = "Mild weather. A T-shirt with a light layer for the evening should do.";
pub const TIP_CHILLY: &str = "A bit chilly. Bring a light jacket.";
pub const TIP_COLD: &str = "Cold out there. Pack a warm coat, a scarf and a beanie.";
pub const TIP_FREEZING: &str =
    "Freezing! Bring a heavy jacket and gloves, or maybe just build an igloo.";

/// Lower bounds (exclusive) in descending order, each with its message.
pub const TIP_LADDER: [(f64, &str); 6] = [
    (35.0, TIP_EXTREME_HEAT),
    (30.0, TIP_HOT),
    (25.0, TIP_WARM),
    (15.0, TIP_MILD),
    (5.0, TIP_CHILLY),
    (-5.0, TIP_COLD),
];

/// Pick the travel tip for the first day's maximum temperature.
pub fn travel_tip(max_temp_c: f64) -> &'static str {
    TIP_LADDER
        .iter()
        .find(|(above, _)| max_temp_c > *above)
        .map(|(_, tip)| *tip)
        .unwrap_or(TIP_FREEZING)
}
