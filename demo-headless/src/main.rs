use biome_sim_core::{
    pressure_from_elevation, simulate_cell, Pft, PftTable, SiteClimate, SoilProperties,
};
use clap::Parser;

/// Single-cell biome simulation demo with configurable climate
#[derive(Parser, Debug)]
#[command(name = "biome-sim-demo")]
#[command(about = "Biome and NPP simulation demo", long_about = None)]
struct Args {
    /// Latitude in decimal degrees (positive north)
    #[arg(short, long, default_value_t = 46.5, allow_hyphen_values = true)]
    latitude: f64,

    /// Longitude in decimal degrees
    #[arg(long, default_value_t = 8.0, allow_hyphen_values = true)]
    longitude: f64,

    /// Atmospheric CO2 concentration in ppm
    #[arg(short, long, default_value_t = 360.0)]
    co2: f64,

    /// Site elevation in meters (converted to surface pressure)
    #[arg(short, long, default_value_t = 0.0)]
    elevation: f64,

    /// Absolute minimum temperature of the coldest month in °C
    #[arg(long, allow_hyphen_values = true)]
    tmin: Option<f64>,

    /// Climate preset (tropical-rainforest, savanna, temperate, mediterranean,
    /// boreal, tundra, desert)
    #[arg(short, long)]
    preset: Option<String>,

    /// Monthly mean temperatures in °C (12 comma-separated values)
    #[arg(long, value_delimiter = ',', num_args = 12, allow_hyphen_values = true)]
    temperature: Option<Vec<f64>>,

    /// Monthly precipitation in mm (12 comma-separated values)
    #[arg(long, value_delimiter = ',', num_args = 12)]
    precipitation: Option<Vec<f64>>,

    /// Monthly cloud cover in % (12 comma-separated values)
    #[arg(long, value_delimiter = ',', num_args = 12)]
    cloud: Option<Vec<f64>>,

    /// Top-layer water-holding capacity in mm
    #[arg(long, default_value_t = 120.0)]
    whc_top: f64,

    /// Bottom-layer water-holding capacity in mm
    #[arg(long, default_value_t = 180.0)]
    whc_bottom: f64,

    /// Soil percolation index (~0-7)
    #[arg(long, default_value_t = 4.0)]
    percolation: f64,

    /// Print the per-PFT optimization table
    #[arg(short, long)]
    verbose: bool,
}

struct ClimatePreset {
    name: &'static str,
    latitude: f64,
    temperature: [f64; 12],
    precipitation: [f64; 12],
    cloud: [f64; 12],
    tmin: f64,
}

fn preset_by_name(name: &str) -> Option<ClimatePreset> {
    match name.to_lowercase().as_str() {
        "tropical-rainforest" | "rainforest" => Some(ClimatePreset {
            name: "Tropical rainforest",
            latitude: 2.0,
            temperature: [
                25.5, 25.7, 26.0, 26.0, 25.8, 25.2, 24.8, 24.9, 25.2, 25.5, 25.5, 25.4,
            ],
            precipitation: [
                210.0, 190.0, 220.0, 240.0, 230.0, 180.0, 150.0, 140.0, 170.0, 220.0, 240.0,
                230.0,
            ],
            cloud: [60.0; 12],
            tmin: 19.0,
        }),
        "savanna" => Some(ClimatePreset {
            name: "Tropical savanna",
            latitude: 12.0,
            temperature: [
                24.0, 26.0, 28.5, 30.0, 29.0, 27.0, 25.5, 25.0, 25.5, 26.5, 25.5, 24.0,
            ],
            precipitation: [
                2.0, 2.0, 8.0, 35.0, 110.0, 180.0, 220.0, 240.0, 190.0, 80.0, 10.0, 2.0,
            ],
            cloud: [40.0; 12],
            tmin: 16.0,
        }),
        "temperate" => Some(ClimatePreset {
            name: "Temperate deciduous",
            latitude: 46.5,
            temperature: [
                -5.0, -3.0, 2.0, 7.0, 12.0, 16.0, 20.0, 19.0, 14.0, 8.0, 2.0, -3.0,
            ],
            precipitation: [
                70.0, 60.0, 70.0, 80.0, 90.0, 95.0, 85.0, 80.0, 75.0, 70.0, 70.0, 75.0,
            ],
            cloud: [55.0; 12],
            tmin: -14.0,
        }),
        "mediterranean" => Some(ClimatePreset {
            name: "Mediterranean",
            latitude: 38.0,
            temperature: [
                9.0, 10.0, 12.0, 14.5, 18.5, 23.0, 26.0, 26.0, 23.0, 18.0, 13.0, 10.0,
            ],
            precipitation: [
                80.0, 70.0, 55.0, 40.0, 25.0, 10.0, 3.0, 5.0, 25.0, 60.0, 85.0, 90.0,
            ],
            cloud: [35.0; 12],
            tmin: -2.0,
        }),
        "boreal" => Some(ClimatePreset {
            name: "Continental boreal",
            latitude: 60.0,
            temperature: [
                -31.0, -27.0, -18.0, -6.0, 4.0, 14.0, 22.0, 19.0, 11.0, 1.0, -13.0, -26.0,
            ],
            precipitation: [
                15.0, 12.0, 15.0, 20.0, 35.0, 55.0, 70.0, 65.0, 45.0, 35.0, 25.0, 18.0,
            ],
            cloud: [60.0; 12],
            tmin: -48.0,
        }),
        "tundra" => Some(ClimatePreset {
            name: "Arctic tundra",
            latitude: 70.0,
            temperature: [
                -28.0, -28.0, -25.0, -16.0, -5.0, 3.0, 8.0, 7.0, 2.0, -8.0, -19.0, -25.0,
            ],
            precipitation: [
                12.0, 10.0, 12.0, 12.0, 15.0, 25.0, 35.0, 40.0, 30.0, 22.0, 15.0, 12.0,
            ],
            cloud: [70.0; 12],
            tmin: -42.0,
        }),
        "desert" => Some(ClimatePreset {
            name: "Subtropical desert",
            latitude: 28.0,
            temperature: [
                12.0, 14.0, 18.0, 22.0, 27.0, 31.0, 33.0, 32.0, 29.0, 23.0, 17.0, 13.0,
            ],
            precipitation: [8.0, 6.0, 5.0, 3.0, 1.0, 0.0, 0.0, 0.0, 1.0, 3.0, 6.0, 9.0],
            cloud: [20.0; 12],
            tmin: 2.0,
        }),
        _ => None,
    }
}

fn monthly(values: Option<Vec<f64>>, fallback: [f64; 12]) -> [f64; 12] {
    match values {
        Some(v) if v.len() == 12 => {
            let mut out = [0.0; 12];
            out.copy_from_slice(&v);
            out
        }
        _ => fallback,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    println!("=== Biome Simulation Demo ===\n");

    // Resolve climate from preset and/or explicit arguments.
    let (mut latitude, mut temperature, mut precipitation, mut cloud, mut tmin) = (
        args.latitude,
        [10.0; 12],
        [60.0; 12],
        [50.0; 12],
        args.tmin,
    );
    if let Some(preset_name) = &args.preset {
        match preset_by_name(preset_name) {
            Some(preset) => {
                println!("Using '{}' climate preset", preset.name);
                latitude = preset.latitude;
                temperature = preset.temperature;
                precipitation = preset.precipitation;
                cloud = preset.cloud;
                tmin = tmin.or(Some(preset.tmin));
            }
            None => {
                println!("Unknown preset '{preset_name}', using 'temperate'");
                let preset = preset_by_name("temperate").expect("built-in preset");
                latitude = preset.latitude;
                temperature = preset.temperature;
                precipitation = preset.precipitation;
                cloud = preset.cloud;
                tmin = tmin.or(Some(preset.tmin));
            }
        }
    }
    temperature = monthly(args.temperature, temperature);
    precipitation = monthly(args.precipitation, precipitation);
    cloud = monthly(args.cloud, cloud);

    let climate = SiteClimate {
        latitude,
        longitude: args.longitude,
        co2_ppm: args.co2,
        pressure_pa: pressure_from_elevation(args.elevation),
        tmin_coldest: tmin,
        temperature,
        precipitation,
        cloud_cover: cloud,
        soil: SoilProperties {
            percolation_index: args.percolation,
            percolation_index_bottom: args.percolation,
            whc_top: args.whc_top,
            whc_bottom: args.whc_bottom,
        },
    };

    if let Err(err) = climate.validate() {
        eprintln!("Invalid climate record: {err}");
        std::process::exit(1);
    }

    let table = PftTable::new();
    let output = simulate_cell(&climate, &table);

    let total_precipitation: f64 = precipitation.iter().sum();
    println!(
        "Site: {:.2}°, {:.2}°  CO2 {:.0} ppm  precip {:.0} mm/yr",
        latitude, args.longitude, args.co2, total_precipitation
    );
    println!(
        "Climate: Tcm {:.1} °C  Twm {:.1} °C  GDD5 {:.0}  GDD0 {:.0}  max snow {:.0} mm",
        output.summary.coldest_month,
        output.summary.warmest_month,
        output.summary.gdd5,
        output.summary.gdd0,
        output.max_snow_depth
    );
    println!();
    println!(
        "Biome: {} (id {})",
        output.biome.name(),
        output.biome.id()
    );
    println!(
        "NPP {:.0} g C/m²/yr  LAI {:.2}  annual AET {:.0} mm  runoff {:.0} mm",
        output.competition.npp,
        output.competition.lai,
        output.competition.record.annual_aet,
        output.competition.record.annual_runoff
    );
    if output.competition.mixed {
        println!(
            "Mixed woodland/savanna: tree cover {:.0}%",
            output.competition.tree_cover * 100.0
        );
    }

    if args.verbose {
        println!("\n{:<36} {:>9} {:>7} {:>6}", "PFT", "NPP", "LAI", "here");
        for pft in Pft::ALL {
            let params = table.get(pft);
            println!(
                "{:<36} {:>9.1} {:>7.2} {:>6}",
                params.name,
                output.pft_npp[pft.index()],
                output.pft_lai[pft.index()],
                if output.present[pft.index()] { "yes" } else { "no" }
            );
        }

        let record = &output.competition.record;
        println!("\nMonthly NPP (g C/m²):");
        let formatted: Vec<String> = record
            .monthly_npp
            .iter()
            .map(|npp| format!("{npp:6.1}"))
            .collect();
        println!("  {}", formatted.join(" "));
        println!("Monthly mean canopy conductance (mm/s):");
        let formatted: Vec<String> = record
            .monthly_gc
            .iter()
            .map(|gc| format!("{gc:6.2}"))
            .collect();
        println!("  {}", formatted.join(" "));
        println!(
            "Fire days {:.0}  green days {}  delta13C {:.2}‰",
            record.fire_days, record.green_days, record.delta_c3
        );
    }
}
