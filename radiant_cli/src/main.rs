//! # Radiant CLI Application
//!
//! Interactive terminal front end for sizing one underfloor heating circuit.
//! Prompts for the circuit and system inputs, prints the design-flow result,
//! then the operating point at the requested flow change.
//!
//! ```text
//! radiant_cli [--config settings.toml]
//! ```
//!
//! The optional settings file holds [`GlobalSettings`] in TOML; every key may
//! be left out.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use radiant_core::calculations::{flow_adjustment, nominal_loop, AdjustmentOutcome, NominalResult};
use radiant_core::tables::RoomType;
use radiant_core::{Circuit, DesignWarning, GlobalSettings, SystemParameters};

#[derive(Debug)]
enum ConfigError {
    Io(io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "IO error: {err}"),
            ConfigError::Parse(err) => write!(f, "Parse error: {err}"),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(value: io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Parse(value)
    }
}

fn load_settings(path: &Path) -> Result<GlobalSettings, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

fn config_path() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(path));
        }
    }
    None
}

fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return None;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return None;
    }

    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    read_line(prompt)
        .and_then(|s| s.replace(',', ".").parse().ok())
        .unwrap_or(default)
}

fn prompt_string(prompt: &str, default: &str) -> String {
    read_line(prompt).unwrap_or_else(|| default.to_string())
}

fn main() {
    println!("Radiant CLI - Underfloor Heating Circuit Sizing");
    println!("===============================================");
    println!();

    let settings = match config_path() {
        Some(path) => match load_settings(&path) {
            Ok(settings) => match settings.validate() {
                Ok(()) => {
                    println!("Settings loaded from {}", path.display());
                    settings
                }
                Err(e) => {
                    eprintln!("Ignoring {}: {}", path.display(), e);
                    GlobalSettings::default()
                }
            },
            Err(e) => {
                eprintln!("Could not load {}: {}", path.display(), e);
                eprintln!("Using default settings.");
                GlobalSettings::default()
            }
        },
        None => GlobalSettings::default(),
    };

    let defaults = SystemParameters::default();
    let params = SystemParameters {
        screed_thickness_mm: prompt_f64(
            &format!("Screed thickness (mm) [{}]: ", defaults.screed_thickness_mm),
            defaults.screed_thickness_mm,
        ),
        supply_temp_c: prompt_f64(
            &format!("Supply temperature (°C) [{}]: ", defaults.supply_temp_c),
            defaults.supply_temp_c,
        ),
        design_delta_t_k: prompt_f64(
            &format!("Design ΔT supply-return (K) [{}]: ", defaults.design_delta_t_k),
            defaults.design_delta_t_k,
        ),
        pipe: prompt_string(&format!("Pipe [{}]: ", defaults.pipe), &defaults.pipe),
    };

    let room_type: RoomType = settings.default_room_type;
    let circuit = Circuit {
        label: "CLI-Circuit".to_string(),
        area_m2: prompt_f64("Floor area (m²) [15.0]: ", 15.0),
        spacing_cm: prompt_f64(
            &format!("Pipe spacing (cm) [{}]: ", settings.default_spacing_cm),
            settings.default_spacing_cm,
        ),
        r_lambda: prompt_f64(
            &format!("Floor covering Rλ (m²K/W) [{}]: ", settings.default_r_lambda),
            settings.default_r_lambda,
        ),
        manifold_distance_m: prompt_f64("Distance to manifold (m) [3.0]: ", 3.0),
        room_temp_c: prompt_f64(
            &format!("Room temperature (°C) [{}]: ", room_type.design_temperature_c()),
            room_type.design_temperature_c(),
        ),
        room_type,
    };

    println!();
    let nominal = match nominal_loop::calculate_with(&circuit, &params, &settings.solver) {
        Ok(result) => result,
        Err(e) => {
            report_error(&e);
            return;
        }
    };
    print_nominal(&nominal);

    println!();
    let limit = settings.max_adjustment_pct;
    let pct = prompt_f64(&format!("Flow change (%, ±{:.0}) [0]: ", limit), 0.0).clamp(-limit, limit);
    if pct == 0.0 {
        print_json(&nominal);
        return;
    }

    match flow_adjustment::adjust_with(&nominal, &circuit, &params, pct, &settings.solver) {
        Ok(outcome) => {
            println!();
            print_adjusted(&outcome);
            print_json(&outcome);
        }
        Err(e) => report_error(&e),
    }
}

fn print_nominal(result: &NominalResult) {
    println!("═══════════════════════════════════════");
    println!("  NOMINAL CIRCUIT (design flow)");
    println!("═══════════════════════════════════════");
    println!();
    println!("Thermal:");
    println!(
        "  KH       = {:.2} W/m²K{}",
        result.kh,
        if result.kh_exact { "" } else { " (nearest table entry)" }
    );
    println!("  LMTD     = {:.2} K", result.lmtd_k);
    println!("  q        = {:.1} W/m²", result.heat_flux_w_m2);
    println!("  Q        = {:.0} W", result.heat_load_w);
    println!(
        "  Water    = {:.1} / {:.1} °C (supply / return)",
        result.supply_temp_c, result.return_temp_c
    );
    println!(
        "  Floor    = {:.1} °C (limit {:.0} °C) {}",
        result.floor_surface_temp_c,
        result.max_floor_temp_c,
        status_icon(result.floor_temperature_ok())
    );
    println!();
    println!("Geometry:");
    println!("  Pipe     = {:.1} m in {} loop(s)", result.pipe_length_m, result.loop_count);
    println!("  Volume   = {:.1} L", result.water_volume_l);
    println!();
    println!("Hydraulics (per loop):");
    println!("  ṁ        = {:.1} kg/h", result.loop_mass_flow_kg_h());
    if result.hydraulics.is_no_flow() {
        println!("  No flow: velocity and pressure drop not evaluated");
    } else {
        println!("  v        = {:.3} m/s", result.velocity_m_s);
        println!("  Re       = {:.0}", result.hydraulics.reynolds);
        println!("  Δp       = {:.2} kPa", result.pressure_drop_kpa);
    }
    println!();
    println!("═══════════════════════════════════════");
    print_warnings(&result.warnings);
}

fn print_adjusted(outcome: &AdjustmentOutcome) {
    let result = outcome.result();
    println!("═══════════════════════════════════════");
    if outcome.is_physically_invalid() {
        println!("  ADJUSTMENT REJECTED (reset to 0 %)");
    } else {
        println!("  ADJUSTED CIRCUIT ({:+.0} % flow)", result.requested_pct);
    }
    println!("═══════════════════════════════════════");
    println!();
    println!(
        "  Q        = {:.0} W ({:+.1} %)",
        result.heat_load_w, result.heat_load_change_pct
    );
    println!("  q        = {:.1} W/m²", result.heat_flux_w_m2);
    println!("  Return   = {:.1} °C", result.return_temp_c);
    println!("  Floor    = {:.1} °C", result.floor_surface_temp_c);
    println!("  ṁ        = {:.1} kg/h", result.mass_flow_kg_h);
    if result.hydraulics.is_no_flow() {
        println!("  No flow: velocity and pressure drop not evaluated");
    } else {
        println!(
            "  Re       = {:.0} ({})",
            result.reynolds,
            result.flow_regime.display_name()
        );
        println!("  Δp       = {:.2} kPa", result.pressure_drop_kpa);
    }
    println!(
        "  Solver   = {} iteration(s) {}",
        result.iteration_count,
        status_icon(result.converged)
    );
    println!();
    println!("═══════════════════════════════════════");
    print_warnings(&result.warnings);
}

fn print_warnings(warnings: &[DesignWarning]) {
    for warning in warnings {
        eprintln!("Warning [{}]: {}", warning.code(), warning);
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    println!();
    println!("JSON Output (for LLM/API use):");
    if let Ok(json) = serde_json::to_string_pretty(value) {
        println!("{}", json);
    }
}

fn report_error(e: &radiant_core::CalcError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[!]" }
}
