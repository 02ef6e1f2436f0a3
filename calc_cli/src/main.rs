//! # Voltsize CLI
//!
//! Runs sizing requests from JSON files, renders PDF reports and serves the
//! HTTP API. The response envelope is printed to stdout; logs go to stderr.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use calc_cli::args::{self, Command};
use calc_cli::{execute, logging, parse_request, Envelope};
use calc_core::calculations::{UpsInput, UpsRedundancy};
use calc_core::report::{render_calculation_pdf, render_ups_pdf};
use calc_core::{CalcError, CalcResult, CalculationItem, EngineSettings, UnitSystem, DEFAULT_SETTINGS};

fn load_settings(path: Option<&Path>) -> CalcResult<EngineSettings> {
    match path {
        Some(path) => EngineSettings::from_toml_file(path),
        None => Ok(DEFAULT_SETTINGS.clone()),
    }
}

fn print_envelope(envelope: &Envelope) {
    match serde_json::to_string_pretty(envelope) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("error: cannot serialize response: {e}"),
    }
}

fn run_file(request: &Path, settings: &EngineSettings, units: UnitSystem, pdf: Option<&Path>) -> CalcResult<Envelope> {
    let text = fs::read_to_string(request)
        .map_err(|e| CalcError::invalid_input("request", request.display().to_string(), e.to_string()))?;
    let item = parse_request(&text)?;
    let result = execute(&item, settings, units);

    if let (Some(pdf_path), Ok(output)) = (pdf, &result) {
        let bytes = match &item.normalized(units) {
            CalculationItem::Ups(input) => render_ups_pdf(input, &settings.report)?,
            normalized => render_calculation_pdf(normalized, output, &settings.report)?,
        };
        fs::write(pdf_path, bytes)
            .map_err(|e| CalcError::report(format!("cannot write '{}': {}", pdf_path.display(), e)))?;
        tracing::info!(path = %pdf_path.display(), "report written");
    }

    Ok(Envelope::from_result(&result, units))
}

fn run_demo(settings: &EngineSettings) -> Envelope {
    let input = UpsInput {
        it_load_kw: 100.0,
        runtime_min: 10.0,
        redundancy_level: UpsRedundancy::TwoN,
        ..UpsInput::default()
    };
    tracing::info!("UPS demo: 100 kW IT load, 10 min runtime, 2N, pf 0.9, +20 % growth, +10 % safety");
    Envelope::from_result(&execute(&CalculationItem::Ups(input), settings, UnitSystem::Metric), UnitSystem::Metric)
}

#[cfg(feature = "api")]
fn run_server(port: u16, settings: EngineSettings) -> Result<(), String> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use calc_cli::api::{serve, AppState};

    let runtime = tokio::runtime::Runtime::new().map_err(|e| format!("cannot start runtime: {e}"))?;
    let state = Arc::new(AppState { settings });
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    runtime
        .block_on(serve(state, addr))
        .map_err(|e| format!("server error on {addr}: {e}"))
}

#[cfg(not(feature = "api"))]
fn run_server(_port: u16, _settings: EngineSettings) -> Result<(), String> {
    Err("this build does not include the HTTP API (enable the `api` feature)".to_string())
}

fn main() -> ExitCode {
    if let Err(e) = logging::init(logging::DEFAULT_LEVEL) {
        eprintln!("warning: {e}");
    }

    let command = match args::parse_args() {
        Ok(command) => command,
        Err(e) => {
            eprintln!("error: {e}");
            args::print_usage();
            return ExitCode::from(2);
        }
    };

    match command {
        Command::Help => {
            args::print_usage();
            ExitCode::SUCCESS
        }
        Command::Run {
            request,
            config,
            units,
            pdf,
        } => {
            let envelope = load_settings(config.as_deref())
                .and_then(|settings| run_file(&request, &settings, units, pdf.as_deref()))
                .unwrap_or_else(|e| Envelope::error(&e));
            print_envelope(&envelope);
            if envelope.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Demo { config } => match load_settings(config.as_deref()) {
            Ok(settings) => {
                print_envelope(&run_demo(&settings));
                ExitCode::SUCCESS
            }
            Err(e) => {
                print_envelope(&Envelope::error(&e));
                ExitCode::FAILURE
            }
        },
        Command::Serve { port, config } => {
            let settings = match load_settings(config.as_deref()) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::FAILURE;
                }
            };
            match run_server(port, settings) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("error: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_returns_ups_envelope() {
        let envelope = run_demo(&DEFAULT_SETTINGS);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["configuration"], "Dual Path (A+B)");
        assert_eq!(json["results"]["heat_dissipation_btu"], 500427.0);
    }

    #[test]
    fn missing_config_uses_default_settings() {
        assert_eq!(load_settings(None).unwrap(), *DEFAULT_SETTINGS);
    }
}
