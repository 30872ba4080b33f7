//! Mid-month to daily linear interpolation.

use super::{DAYS_PER_YEAR, MIDMONTH_DAY, MONTHS};

/// Interpolate 12 mid-month values to 365 daily values.
///
/// Values are pinned exactly at the mid-month anchor days and vary linearly
/// between consecutive anchors. The December-January gap wraps through the
/// year boundary with a single slope spanning its 31 days, so day 365 and
/// day 1 lie on the same line.
pub fn interpolate_daily(monthly: &[f64; MONTHS]) -> [f64; DAYS_PER_YEAR] {
    let mut daily = [0.0; DAYS_PER_YEAR];

    // December -> January wrap segment.
    let step = (monthly[0] - monthly[MONTHS - 1]) / 31.0;
    daily[MIDMONTH_DAY[MONTHS - 1] - 1] = monthly[MONTHS - 1];
    for day in MIDMONTH_DAY[MONTHS - 1]..DAYS_PER_YEAR {
        daily[day] = daily[day - 1] + step;
    }
    daily[0] = daily[DAYS_PER_YEAR - 1] + step;
    for day in 1..MIDMONTH_DAY[0] - 1 {
        daily[day] = daily[day - 1] + step;
    }

    // Interior segments between consecutive mid-month anchors.
    for m in 0..MONTHS - 1 {
        let d0 = MIDMONTH_DAY[m];
        let d1 = MIDMONTH_DAY[m + 1];
        let step = (monthly[m + 1] - monthly[m]) / (d1 - d0) as f64;
        daily[d0 - 1] = monthly[m];
        for day in d0..d1 - 1 {
            daily[day] = daily[day - 1] + step;
        }
    }

    daily
}
