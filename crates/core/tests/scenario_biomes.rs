//! End-to-end scenario checks: archetypal climates must land in the
//! expected biome families.

use biome_sim_core::{simulate_cell, Biome, Pft, PftTable, SiteClimate, SoilProperties};

#[ctor::ctor]
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn soil() -> SoilProperties {
    SoilProperties {
        percolation_index: 4.0,
        percolation_index_bottom: 4.0,
        whc_top: 120.0,
        whc_bottom: 180.0,
    }
}

#[test]
fn test_polar_desert_is_barren_with_zero_npp() {
    let cell = SiteClimate {
        latitude: 78.0,
        longitude: -40.0,
        co2_ppm: 360.0,
        pressure_pa: 70000.0,
        tmin_coldest: Some(-60.0),
        temperature: [-45.0; 12],
        precipitation: [4.0; 12],
        cloud_cover: [60.0; 12],
        soil: soil(),
    };
    let table = PftTable::new();
    let output = simulate_cell(&cell, &table);
    assert_eq!(output.biome, Biome::Barren);
    for &npp in &output.pft_npp {
        assert_eq!(npp, 0.0);
    }
}

#[test]
fn test_humid_tropics_select_tropical_forest() {
    let cell = SiteClimate {
        latitude: 5.0,
        longitude: 18.0,
        co2_ppm: 360.0,
        pressure_pa: 101325.0,
        tmin_coldest: Some(18.0),
        temperature: [
            25.0, 25.5, 26.0, 26.0, 25.5, 24.5, 24.0, 24.0, 24.5, 25.0, 25.0, 25.0,
        ],
        precipitation: [200.0; 12],
        cloud_cover: [55.0; 12],
        soil: soil(),
    };
    let table = PftTable::new();
    let output = simulate_cell(&cell, &table);

    // One of the tropical forest classes, with the tropical tree dominant.
    assert!(
        matches!(
            output.biome,
            Biome::TropicalEvergreenForest
                | Biome::TropicalSemiDeciduousForest
                | Biome::TropicalDeciduousForest
        ),
        "biome was {:?}",
        output.biome
    );
    assert_eq!(
        output.competition.dominant,
        Some(Pft::TropicalRaingreen),
        "dominant was {:?}",
        output.competition.dominant
    );
    assert!(output.competition.npp > 500.0);
}

#[test]
fn test_continental_boreal_selects_taiga() {
    // Extreme continental climate: cold winter below -30 °C, warm short
    // summer, modest precipitation.
    let cell = SiteClimate {
        latitude: 60.0,
        longitude: 105.0,
        co2_ppm: 360.0,
        pressure_pa: 98000.0,
        tmin_coldest: Some(-48.0),
        temperature: [
            -31.0, -27.0, -18.0, -6.0, 4.0, 14.0, 22.0, 19.0, 11.0, 1.0, -13.0, -26.0,
        ],
        precipitation: [
            15.0, 12.0, 15.0, 20.0, 35.0, 55.0, 70.0, 65.0, 45.0, 35.0, 25.0, 18.0,
        ],
        cloud_cover: [60.0; 12],
        soil: soil(),
    };
    let table = PftTable::new();
    let output = simulate_cell(&cell, &table);

    // Boreal trees pass the sieve in this climate.
    assert!(output.present[Pft::BorealEvergreen.index()]);
    assert!(output.present[Pft::BorealSummergreen.index()]);
    // And the cell resolves to a taiga/cold-mixed class.
    assert!(
        matches!(
            output.biome,
            Biome::ColdMixedForest | Biome::EvergreenTaiga | Biome::DeciduousTaiga
        ),
        "biome was {:?}",
        output.biome
    );
}

#[test]
fn test_arid_subtropics_avoid_forest_classes() {
    let cell = SiteClimate {
        latitude: 28.0,
        longitude: 12.0,
        co2_ppm: 360.0,
        pressure_pa: 101325.0,
        tmin_coldest: Some(4.0),
        temperature: [
            12.0, 14.0, 18.0, 22.0, 27.0, 31.0, 33.0, 32.0, 29.0, 23.0, 17.0, 13.0,
        ],
        precipitation: [8.0, 6.0, 5.0, 3.0, 1.0, 0.0, 0.0, 0.0, 1.0, 3.0, 6.0, 9.0],
        cloud_cover: [20.0; 12],
        soil: soil(),
    };
    let table = PftTable::new();
    let output = simulate_cell(&cell, &table);

    // 42 mm of annual rain cannot carry a forest.
    assert!(
        !matches!(
            output.biome,
            Biome::TropicalEvergreenForest
                | Biome::TropicalSemiDeciduousForest
                | Biome::TropicalDeciduousForest
                | Biome::TemperateDeciduousForest
                | Biome::TemperateConiferForest
                | Biome::WarmMixedForest
                | Biome::CoolMixedForest
                | Biome::CoolConiferForest
                | Biome::ColdMixedForest
                | Biome::EvergreenTaiga
                | Biome::DeciduousTaiga
        ),
        "biome was {:?}",
        output.biome
    );
}
