//! Growth engine: annual NPP of one PFT at one fixed leaf area index.
//!
//! Two-pass coupling of carbon and water: a first photosynthesis pass at
//! the PFT's optimum ci/ca ratio yields the non-water-stressed canopy
//! conductance that drives the water balance; a second, per-month bisection
//! then re-solves the ci/ca ratio at which photosynthetic CO2 demand equals
//! the stomatal supply permitted by the *actual* (water-limited)
//! conductance. Monthly assimilation, respiration, fire, heterotrophic
//! decay and isotope discrimination combine into one annual NPP figure and
//! a full diagnostic record.

use crate::core_types::{C4Pathway, PftParams, SoilProperties};
use crate::physics::daily::interpolate_daily;
use crate::physics::fire::fire_season;
use crate::physics::hydrology::{water_balance, HydrologyForcing, WaterBalance};
use crate::physics::isotope::{annual_discrimination, bundle_sheath_leakiness};
use crate::physics::phenology::PhenologyCurves;
use crate::physics::photosynthesis::{c3_photosynthesis, c4_photosynthesis, LeafAssimilation};
use crate::physics::respiration::{respiration, RespirationBudget, NPP_INFEASIBLE};
use crate::physics::soil_carbon::heterotrophic_respiration;
use crate::physics::{DAYS_IN_MONTH, DAYS_PER_YEAR, MONTHS};

/// Optimum ci/ca ratio assumed for C4-capable PFTs in the potential pass.
const C4_OPT_RATIO: f64 = 0.4;
/// Bisection iterations of the monthly demand/supply solve.
const RATIO_BISECTION_STEPS: usize = 10;
/// Monthly growth respiration share of next month's surplus.
const MONTHLY_GROWTH_RESP: f64 = 0.02;
/// Minimum months of C4 advantage before the facultative switch applies.
const C4_SWITCH_MONTHS: usize = 2;

/// Number of ten-day LAI report intervals.
pub const TEN_DAY_STEPS: usize = 37;

/// Cell-level environment shared by every LAI candidate of one PFT.
#[derive(Debug, Clone, Copy)]
pub struct GrowthEnv<'a> {
    /// Total annual precipitation (mm), scaled into the initial soil
    /// wetness guess.
    pub annual_precipitation: f64,
    /// Mid-month daily insolation (J/m²/day).
    pub sun: &'a [f64; MONTHS],
    /// Monthly mean temperature (°C).
    pub temperature: &'a [f64; MONTHS],
    /// Mid-month day length (hours).
    pub day_length: &'a [f64; MONTHS],
    /// Interpolated daily temperature (°C).
    pub daily_temperature: &'a [f64; DAYS_PER_YEAR],
    /// Daily rainfall after snow partitioning (mm/day).
    pub daily_rain: &'a [f64; DAYS_PER_YEAR],
    /// Daily snowmelt (mm/day).
    pub daily_melt: &'a [f64; DAYS_PER_YEAR],
    /// Daily potential evapotranspiration (mm/day).
    pub daily_pet: &'a [f64; DAYS_PER_YEAR],
    /// Soil hydraulics.
    pub soil: &'a SoilProperties,
    /// Monthly mean soil temperature (°C).
    pub soil_temperature: &'a [f64; MONTHS],
    /// Phenology curves for this PFT.
    pub phenology: &'a PhenologyCurves,
    /// Ambient CO2 (ppm).
    pub co2_ppm: f64,
    /// Surface pressure (Pa).
    pub pressure: f64,
}

/// Full diagnostic record of one PFT at one LAI. Committed by the
/// optimizer only when its NPP improves on the best seen so far, and read
/// by the competition step afterwards.
#[derive(Debug, Clone)]
pub struct PftDiagnostics {
    /// Annual NPP (g C/m²/yr).
    pub npp: f64,
    /// Annual actual evapotranspiration (mm).
    pub annual_aet: f64,
    /// Largest monthly optimum canopy conductance (mm/s).
    pub max_gc: f64,
    /// Annual stem maintenance respiration (g C/m²).
    pub stem_respiration: f64,
    /// Annual runoff plus drainage (mm).
    pub annual_runoff: f64,
    /// Annual photosynthetically active radiation (MJ/m²).
    pub annual_par: f64,
    /// Annual FPAR (%).
    pub annual_fpar_pct: f64,
    /// Respiration cost as % of GPP.
    pub respiration_cost_pct: f64,
    /// Monthly mean root-zone wetness (0-1).
    pub monthly_wetness: [f64; MONTHS],
    /// Monthly mean top-layer wetness (0-1).
    pub monthly_wetness_top: [f64; MONTHS],
    /// Monthly mean bottom-layer wetness (0-1).
    pub monthly_wetness_bottom: [f64; MONTHS],
    /// Monthly mean foliage cover (FPAR fraction).
    pub monthly_fpar: [f64; MONTHS],
    /// Monthly NPP (g C/m²).
    pub monthly_npp: [f64; MONTHS],
    /// Monthly GPP (g C/m²).
    pub monthly_gpp: [f64; MONTHS],
    /// Monthly 13C discrimination (‰).
    pub monthly_discrimination: [f64; MONTHS],
    /// Monthly heterotrophic respiration (g C/m²).
    pub monthly_het_resp: [f64; MONTHS],
    /// Monthly δ13C of respired CO2 (‰).
    pub monthly_resp_delta: [f64; MONTHS],
    /// Monthly isotope disequilibrium flux.
    pub monthly_iso_flux: [f64; MONTHS],
    /// Monthly net ecosystem carbon flux (NPP − Rh, g C/m²).
    pub monthly_carbon_flux: [f64; MONTHS],
    /// Monthly mean canopy conductance (mm/s).
    pub monthly_gc: [f64; MONTHS],
    /// Monthly LAI recovered from foliage cover.
    pub monthly_lai: [f64; MONTHS],
    /// Monthly runoff plus drainage (mm).
    pub monthly_runoff: [f64; MONTHS],
    /// LAI at ten-day intervals.
    pub ten_day_lai: [f64; TEN_DAY_STEPS],
    /// Annual mean C3 discrimination (‰).
    pub delta_c3: f64,
    /// Annual mean C4 discrimination (‰).
    pub delta_c4: f64,
    /// Bundle-sheath leakiness φ.
    pub phi: f64,
    /// Mean monthly heterotrophic respiration.
    pub mean_het_resp: f64,
    /// Fraction of annual NPP assimilated through the C4 pathway.
    pub c4_npp_fraction: f64,
    /// Annual heterotrophic respiration (g C/m²).
    pub annual_het_resp: f64,
    /// Annual net ecosystem production (g C/m²).
    pub annual_nep: f64,
    /// Annual mean assimilation/conductance ratio.
    pub mean_assimilation_ratio: f64,
    /// Potential fire days.
    pub fire_days: f64,
    /// Days with canopy present.
    pub green_days: u32,
    /// Annual mean litter decay rate.
    pub mean_litter_decay: f64,
    /// Annual mean soil decay rate.
    pub mean_soil_decay: f64,
}

impl Default for PftDiagnostics {
    fn default() -> Self {
        PftDiagnostics {
            npp: 0.0,
            annual_aet: 0.0,
            max_gc: 0.0,
            stem_respiration: 0.0,
            annual_runoff: 0.0,
            annual_par: 0.0,
            annual_fpar_pct: 0.0,
            respiration_cost_pct: 0.0,
            monthly_wetness: [0.0; MONTHS],
            monthly_wetness_top: [0.0; MONTHS],
            monthly_wetness_bottom: [0.0; MONTHS],
            monthly_fpar: [0.0; MONTHS],
            monthly_npp: [0.0; MONTHS],
            monthly_gpp: [0.0; MONTHS],
            monthly_discrimination: [0.0; MONTHS],
            monthly_het_resp: [0.0; MONTHS],
            monthly_resp_delta: [0.0; MONTHS],
            monthly_iso_flux: [0.0; MONTHS],
            monthly_carbon_flux: [0.0; MONTHS],
            monthly_gc: [0.0; MONTHS],
            monthly_lai: [0.0; MONTHS],
            monthly_runoff: [0.0; MONTHS],
            ten_day_lai: [0.0; TEN_DAY_STEPS],
            delta_c3: 0.0,
            delta_c4: 0.0,
            phi: 0.0,
            mean_het_resp: 0.0,
            c4_npp_fraction: 0.0,
            annual_het_resp: 0.0,
            annual_nep: 0.0,
            mean_assimilation_ratio: 0.0,
            fire_days: 0.0,
            green_days: 0,
            mean_litter_decay: 0.0,
            mean_soil_decay: 0.0,
        }
    }
}

/// Outcome of one growth evaluation.
#[derive(Debug, Clone)]
pub struct GrowthResult {
    /// Annual NPP, or [`NPP_INFEASIBLE`] when the canopy cannot replace
    /// its litterfall at this LAI.
    pub npp: f64,
    /// Full diagnostic record at this LAI.
    pub diagnostics: PftDiagnostics,
}

/// One pathway's monthly production series.
struct MonthlyProduction {
    gpp: [f64; MONTHS],
    leaf_resp: [f64; MONTHS],
    ci_ratio: [f64; MONTHS],
    npp: [f64; MONTHS],
    budget: RespirationBudget,
}

fn assimilate(
    c4: bool,
    ratio: f64,
    sun: f64,
    day_length: f64,
    temperature: f64,
    params: &PftParams,
    fpar: f64,
    pressure: f64,
    ca: f64,
) -> LeafAssimilation {
    if c4 {
        c4_photosynthesis(ratio, sun, day_length, temperature, params, fpar, pressure, ca)
    } else {
        c3_photosynthesis(ratio, sun, day_length, temperature, params, fpar, pressure, ca)
    }
}

/// Run one pathway's monthly loop over the shared water balance, then
/// derive its respiration budget and monthly NPP.
fn monthly_production(
    c4: bool,
    opt_ratio: f64,
    params: &PftParams,
    env: &GrowthEnv<'_>,
    hydro: &WaterBalance,
    max_fvc: f64,
    lai: f64,
    ca: f64,
) -> MonthlyProduction {
    let mut gpp = [0.0; MONTHS];
    let mut leaf_resp = [0.0; MONTHS];
    let mut ci_ratio = [0.0; MONTHS];
    let mut annual_gpp = 0.0;
    let mut annual_leaf_resp = 0.0;

    for m in 0..MONTHS {
        let days = DAYS_IN_MONTH[m] as f64;
        let mean_gc = hydro.mean_gc[m];
        let mean_fvc = hydro.mean_fvc[m];

        let (gross, ratio, leaf) = if mean_gc == 0.0 {
            // No conductance, no assimilation; leaf maintenance still
            // scales with whatever canopy stood this month.
            let potential = assimilate(
                c4,
                opt_ratio,
                env.sun[m],
                env.day_length[m],
                env.temperature[m],
                params,
                max_fvc,
                env.pressure,
                ca,
            );
            (0.0, 0.0, potential.leaf_respiration * (mean_fvc / max_fvc))
        } else {
            // Bisect the ci/ca ratio to the point where photosynthetic
            // demand equals the stomatal supply at the water-limited
            // conductance. Monotone bisection: the difference is not
            // smooth near zero conductance.
            let x1 = 0.02;
            let x2 = opt_ratio + 0.05;
            let mut root = x1;
            let mut dx = x2 - x1;
            let mut gross = 0.0;
            let mut leaf = 0.0;
            for _ in 0..RATIO_BISECTION_STEPS {
                dx *= 0.5;
                let mid = root + dx;
                let trial = assimilate(
                    c4,
                    mid,
                    env.sun[m],
                    env.day_length[m],
                    env.temperature[m],
                    params,
                    mean_fvc,
                    env.pressure,
                    ca,
                );
                let gt = 3600.0 * env.day_length[m] * mean_gc;
                let supply = if gt == 0.0 {
                    0.0
                } else {
                    params.gc_min + (gt / 1.6) * (ca * (1.0 - mid))
                };
                leaf = trial.leaf_respiration;
                if trial.net_daytime - supply <= 0.0 {
                    root = mid;
                    gross = trial.gross;
                }
            }
            (gross, root, leaf * (mean_fvc / max_fvc))
        };

        gpp[m] = days * gross;
        leaf_resp[m] = days * leaf;
        ci_ratio[m] = ratio;
        annual_gpp += gpp[m];
        annual_leaf_resp += leaf_resp[m];
    }

    let budget = respiration(
        annual_gpp,
        annual_leaf_resp,
        env.temperature,
        params,
        lai,
        max_fvc,
    );

    // Monthly NPP: maintenance this month plus a growth charge levied
    // against next month's surplus (December wraps to January).
    let mut npp = [0.0; MONTHS];
    let mut maintenance = [0.0; MONTHS];
    for m in 0..MONTHS {
        maintenance[m] = leaf_resp[m]
            + budget.monthly_leaf_maintenance[m]
            + budget.monthly_stem[m]
            + budget.monthly_root[m];
    }
    for m in 0..MONTHS {
        let next = (m + 1) % MONTHS;
        let growth = (MONTHLY_GROWTH_RESP * (gpp[next] - maintenance[next])).max(0.0);
        npp[m] = gpp[m] - (maintenance[m] + growth);
    }

    MonthlyProduction {
        gpp,
        leaf_resp,
        ci_ratio,
        npp,
        budget,
    }
}

/// Evaluate one PFT at one candidate LAI.
pub fn grow(params: &PftParams, lai: f64, env: &GrowthEnv<'_>) -> GrowthResult {
    let ca = env.co2_ppm * 1e-6;
    let initial_wetness = (env.annual_precipitation / 1000.0).min(1.0);
    let max_fvc = 1.0 - (-params.extinction * lai).exp();
    let c4_capable = params.c4 != C4Pathway::None;
    let opt_ratio = if c4_capable {
        C4_OPT_RATIO
    } else {
        params.opt_ci_ratio
    };

    // Pass one: optimum non-water-stressed conductance per month from the
    // potential assimilation at the optimum ci/ca ratio.
    let mut optimal_gc = [0.0; MONTHS];
    let mut max_gc = 0.0_f64;
    for m in 0..MONTHS {
        let potential = assimilate(
            c4_capable,
            opt_ratio,
            env.sun[m],
            env.day_length[m],
            env.temperature[m],
            params,
            max_fvc,
            env.pressure,
            ca,
        );
        let seconds = 3600.0 * env.day_length[m];
        optimal_gc[m] = if seconds > 0.0 && potential.net_daytime > 0.0 {
            params.gc_min + (1.6 * potential.net_daytime) / (ca * (1.0 - opt_ratio)) / seconds
        } else {
            0.0
        };
        max_gc = max_gc.max(optimal_gc[m]);
    }
    let daily_optimal_gc = interpolate_daily(&optimal_gc);

    // Water balance at this canopy size.
    let forcing = HydrologyForcing {
        daily_rain: env.daily_rain,
        daily_melt: env.daily_melt,
        daily_pet: env.daily_pet,
        daily_temperature: env.daily_temperature,
        soil: env.soil,
        initial_wetness,
    };
    let hydro = water_balance(params, &forcing, &daily_optimal_gc, env.phenology, max_fvc);

    // Pass two: realized production. C4-capable PFTs evaluate both
    // pathways over the same water balance and pick per month.
    let primary = monthly_production(
        c4_capable, opt_ratio, params, env, &hydro, max_fvc, lai, ca,
    );

    let mut monthly_gpp = primary.gpp;
    let mut monthly_leaf_resp = primary.leaf_resp;
    let mut monthly_ci = primary.ci_ratio;
    let mut monthly_npp = primary.npp;
    let mut c4_month = [false; MONTHS];
    let mut c4_npp = 0.0;

    match params.c4 {
        C4Pathway::None => {}
        C4Pathway::Obligate => {
            c4_month = [true; MONTHS];
            c4_npp = monthly_npp.iter().sum();
        }
        C4Pathway::Facultative => {
            // Explicit two-path evaluation: the C3 alternative runs over
            // the same hydrology, then months switch only if enough of
            // them gain.
            let alternative = monthly_production(
                false,
                params.opt_ci_ratio,
                params,
                env,
                &hydro,
                max_fvc,
                lai,
                ca,
            );
            let winning_months = (0..MONTHS)
                .filter(|&m| primary.npp[m] > alternative.npp[m])
                .count();
            if winning_months >= C4_SWITCH_MONTHS {
                for m in 0..MONTHS {
                    if primary.npp[m] > alternative.npp[m] {
                        c4_month[m] = true;
                        c4_npp += primary.npp[m];
                    } else {
                        monthly_gpp[m] = alternative.gpp[m];
                        monthly_leaf_resp[m] = alternative.leaf_resp[m];
                        monthly_ci[m] = alternative.ci_ratio[m];
                        monthly_npp[m] = alternative.npp[m];
                    }
                }
            } else {
                monthly_gpp = alternative.gpp;
                monthly_leaf_resp = alternative.leaf_resp;
                monthly_ci = alternative.ci_ratio;
                monthly_npp = alternative.npp;
            }
        }
    }

    let npp_sum: f64 = monthly_npp.iter().sum();
    let annual_gpp: f64 = monthly_gpp.iter().sum();
    let c4_fraction = if npp_sum > 0.0 { c4_npp / npp_sum } else { 0.0 };

    // PAR accounting from the realized canopy.
    let mut monthly_par = [0.0; MONTHS];
    let mut annual_par = 0.0;
    let mut annual_apar = 0.0;
    for m in 0..MONTHS {
        monthly_par[m] = env.sun[m] * DAYS_IN_MONTH[m] as f64 * 1e-6;
        annual_par += monthly_par[m];
        annual_apar += monthly_par[m] * hydro.mean_fvc[m];
    }
    let annual_fpar_pct = if annual_apar == 0.0 {
        0.0
    } else {
        100.0 * annual_apar / annual_par
    };

    // Bundle-sheath leakiness and isotope discrimination.
    let phi = if c4_capable && annual_gpp > 0.0 {
        bundle_sheath_leakiness(&monthly_gpp)
    } else {
        0.0
    };
    let discrimination = annual_discrimination(
        &monthly_ci,
        ca,
        env.temperature,
        &monthly_leaf_resp,
        &c4_month,
        &monthly_gpp,
        phi,
        annual_gpp,
    );

    // Heterotrophic decay of this year's production.
    let soil_flux = heterotrophic_respiration(
        params.id,
        primary.budget.npp,
        env.soil_temperature,
        &hydro.mean_aet,
        &hydro.mean_wetness,
        discrimination.mean_c3,
    );
    let annual_het_resp: f64 = soil_flux.monthly_total.iter().sum();

    let mut monthly_carbon_flux = [0.0; MONTHS];
    let mut annual_nep = 0.0;
    for m in 0..MONTHS {
        monthly_carbon_flux[m] = monthly_npp[m] - soil_flux.monthly_total[m];
        annual_nep += monthly_carbon_flux[m];
    }

    // Fire climatology over the daily root-zone wetness.
    let fire = fire_season(&hydro.daily_wetness, params, lai, primary.budget.npp);

    // Canopy geometry diagnostics.
    let mut monthly_lai = [0.0; MONTHS];
    for m in 0..MONTHS {
        monthly_lai[m] = (1.0 - hydro.mean_fvc[m]).ln() / (-params.extinction);
    }
    let mut ten_day_lai = [0.0; TEN_DAY_STEPS];
    for (i, slot) in ten_day_lai.iter_mut().enumerate() {
        let day = i * 10;
        *slot = (1.0 - hydro.daily_fvc[day]).ln() / (-params.extinction);
    }

    // Annual mean assimilation per unit conductance.
    let mut ratio_sum = 0.0;
    let mut ratio_months = 0u32;
    for m in 0..MONTHS {
        if hydro.mean_gc[m] != 0.0 {
            ratio_sum += monthly_gpp[m] / hydro.mean_gc[m];
            ratio_months += 1;
        }
    }
    let mean_assimilation_ratio = if ratio_months > 0 {
        ratio_sum / f64::from(ratio_months)
    } else {
        0.0
    };

    // The candidate is infeasible when maintenance exceeds the minimum
    // litterfall requirement; the optimizer treats the sentinel as "worse
    // than anything seen".
    let npp = if primary.budget.npp == NPP_INFEASIBLE {
        NPP_INFEASIBLE
    } else {
        npp_sum
    };

    let diagnostics = PftDiagnostics {
        npp,
        annual_aet: hydro.annual_aet,
        max_gc,
        stem_respiration: primary.budget.stem_respiration,
        annual_runoff: hydro.annual_runoff,
        annual_par,
        annual_fpar_pct,
        respiration_cost_pct: primary.budget.cost_percent,
        monthly_wetness: hydro.mean_wetness,
        monthly_wetness_top: hydro.mean_wetness_top,
        monthly_wetness_bottom: hydro.mean_wetness_bottom,
        monthly_fpar: hydro.mean_fvc,
        monthly_npp,
        monthly_gpp,
        monthly_discrimination: discrimination.monthly_c3,
        monthly_het_resp: soil_flux.monthly_total,
        monthly_resp_delta: soil_flux.monthly_delta,
        monthly_iso_flux: soil_flux.monthly_iso_flux,
        monthly_carbon_flux,
        monthly_gc: hydro.mean_gc,
        monthly_lai,
        monthly_runoff: hydro.monthly_runoff,
        ten_day_lai,
        delta_c3: discrimination.mean_c3,
        delta_c4: discrimination.mean_c4,
        phi,
        mean_het_resp: soil_flux.mean_monthly,
        c4_npp_fraction: c4_fraction,
        annual_het_resp,
        annual_nep,
        mean_assimilation_ratio,
        fire_days: fire.fire_days,
        green_days: hydro.green_days,
        mean_litter_decay: soil_flux.mean_litter_rate,
        mean_soil_decay: soil_flux.mean_soil_rate,
    };

    GrowthResult { npp, diagnostics }
}
