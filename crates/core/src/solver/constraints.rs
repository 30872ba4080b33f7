//! Environmental sieve: absolute climatic limits per PFT.
//!
//! Each PFT is screened against six climate indices. A limit of
//! [`NO_LIMIT`] leaves that side unbounded; a bounded range admits values
//! in [lower, upper). A PFT survives only if every index passes.

use crate::core_types::{Pft, NUM_PFTS};
use crate::physics::climate_summary::ClimateSummary;

/// Sentinel marking an unbounded side of a limit.
pub const NO_LIMIT: f64 = -99.9;

/// Number of climate indices screened.
const NUM_INDICES: usize = 6;

/// Per-PFT [lower, upper) limits on the six screening indices, in order:
/// coldest-month mean, absolute minimum temperature, GDD5, GDD0,
/// warmest-month mean, maximum snowpack depth.
const LIMITS: [[(f64, f64); NUM_INDICES]; NUM_PFTS] = [
    // Tropical evergreen tree
    [
        (NO_LIMIT, NO_LIMIT),
        (0.0, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (10.0, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
    ],
    // Tropical raingreen tree
    [
        (NO_LIMIT, NO_LIMIT),
        (0.0, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (10.0, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
    ],
    // Temperate broadleaf evergreen tree
    [
        (NO_LIMIT, NO_LIMIT),
        (-8.0, 5.0),
        (1200.0, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (10.0, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
    ],
    // Temperate summergreen tree
    [
        (-15.0, NO_LIMIT),
        (NO_LIMIT, -8.0),
        (1200.0, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
    ],
    // Cool-temperate conifer
    [
        (-2.0, NO_LIMIT),
        (NO_LIMIT, 10.0),
        (900.0, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (10.0, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
    ],
    // Boreal evergreen conifer
    [
        (-32.5, -2.0),
        (NO_LIMIT, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (21.0, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
    ],
    // Boreal summergreen tree
    [
        (NO_LIMIT, 5.0),
        (NO_LIMIT, -10.0),
        (NO_LIMIT, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (21.0, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
    ],
    // Temperate C3 grass
    [
        (NO_LIMIT, NO_LIMIT),
        (NO_LIMIT, 0.0),
        (550.0, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
    ],
    // Tropical C4 grass
    [
        (NO_LIMIT, NO_LIMIT),
        (-3.0, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (10.0, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
    ],
    // Xerophytic desert shrub
    [
        (NO_LIMIT, NO_LIMIT),
        (-45.0, NO_LIMIT),
        (500.0, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (10.0, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
    ],
    // Tundra shrub
    [
        (NO_LIMIT, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (50.0, NO_LIMIT),
        (15.0, NO_LIMIT),
        (15.0, NO_LIMIT),
    ],
    // Cold herbaceous tundra
    [
        (NO_LIMIT, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (50.0, NO_LIMIT),
        (15.0, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
    ],
    // Cushion forb, lichen and moss
    [
        (NO_LIMIT, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
        (15.0, NO_LIMIT),
        (NO_LIMIT, NO_LIMIT),
    ],
];

/// Outcome of the sieve for one cell.
#[derive(Debug, Clone, Copy)]
pub struct SieveResult {
    /// Presence flag per PFT.
    pub present: [bool; NUM_PFTS],
    /// Adjusted absolute minimum temperature used for screening (°C).
    pub tmin: f64,
    /// The six index values screened, in limit-table order.
    pub indices: [f64; NUM_INDICES],
}

/// Does one [lower, upper) limit admit the value?
fn admits(limit: (f64, f64), value: f64) -> bool {
    let (lower, upper) = limit;
    match (lower != NO_LIMIT, upper != NO_LIMIT) {
        (true, true) => lower <= value && value < upper,
        (false, true) => value < upper,
        (true, false) => lower <= value,
        (false, false) => true,
    }
}

/// Screen all PFTs against the cell's climate indices.
///
/// `tmin_in` is the absolute minimum temperature (observed or estimated);
/// it is capped at 5 °C below the coldest monthly mean if it arrives above
/// it. `max_snow_depth` in mm water equivalent. The tropical evergreen PFT
/// is forced absent regardless of climate: the raingreen tree covers its
/// niche whenever water is not limiting.
pub fn apply_sieve(summary: &ClimateSummary, tmin_in: f64, max_snow_depth: f64) -> SieveResult {
    let tcm = summary.coldest_month;
    let tmin = if tmin_in <= tcm { tmin_in } else { tcm - 5.0 };

    let indices = [
        tcm,
        tmin,
        summary.gdd5,
        summary.gdd0,
        summary.warmest_month,
        max_snow_depth,
    ];

    let mut present = [false; NUM_PFTS];
    for pft in Pft::ALL {
        present[pft.index()] = LIMITS[pft.index()]
            .iter()
            .zip(indices.iter())
            .all(|(&limit, &value)| admits(limit, value));
    }
    present[Pft::TropicalEvergreen.index()] = false;

    SieveResult {
        present,
        tmin,
        indices,
    }
}
