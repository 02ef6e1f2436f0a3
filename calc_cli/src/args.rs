//! Command line parsing.

use std::path::PathBuf;

use calc_core::UnitSystem;

/// Default HTTP port for `serve`
pub const DEFAULT_PORT: u16 = 8000;

/// Parsed sub-command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Run one request file and print the envelope
    Run {
        request: PathBuf,
        config: Option<PathBuf>,
        units: UnitSystem,
        pdf: Option<PathBuf>,
    },
    /// Serve the HTTP API
    Serve { port: u16, config: Option<PathBuf> },
    /// Run the built-in UPS scenario
    Demo { config: Option<PathBuf> },
    Help,
}

pub fn parse_args() -> Result<Command, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    parse_args_from(&args)
}

pub fn parse_args_from(args: &[String]) -> Result<Command, String> {
    let Some(subcommand) = args.first() else {
        return Ok(Command::Help);
    };
    let rest = &args[1..];

    match subcommand.as_str() {
        "run" => parse_run(rest),
        "serve" => {
            let mut port = DEFAULT_PORT;
            let mut config = None;
            let mut i = 0usize;
            while i < rest.len() {
                match rest[i].as_str() {
                    "--port" => {
                        i += 1;
                        let value = rest.next_or_err(i, "missing value for --port")?;
                        port = value
                            .parse()
                            .map_err(|_| format!("--port must be a number between 0 and 65535, got `{value}`"))?;
                    }
                    "--config" => {
                        i += 1;
                        config = Some(PathBuf::from(rest.next_or_err(i, "missing value for --config")?));
                    }
                    other => return Err(format!("unknown argument for serve: {other}")),
                }
                i += 1;
            }
            Ok(Command::Serve { port, config })
        }
        "demo" => {
            let mut config = None;
            let mut i = 0usize;
            while i < rest.len() {
                match rest[i].as_str() {
                    "--config" => {
                        i += 1;
                        config = Some(PathBuf::from(rest.next_or_err(i, "missing value for --config")?));
                    }
                    other => return Err(format!("unknown argument for demo: {other}")),
                }
                i += 1;
            }
            Ok(Command::Demo { config })
        }
        "help" | "--help" | "-h" => Ok(Command::Help),
        other => Err(format!("unknown command: {other}")),
    }
}

fn parse_run(args: &[String]) -> Result<Command, String> {
    let mut request = None;
    let mut config = None;
    let mut units = UnitSystem::Metric;
    let mut pdf = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                config = Some(PathBuf::from(args.next_or_err(i, "missing value for --config")?));
            }
            "--units" => {
                i += 1;
                units = match args.next_or_err(i, "missing value for --units")? {
                    "metric" => UnitSystem::Metric,
                    "imperial" => UnitSystem::Imperial,
                    other => return Err(format!("--units must be `metric` or `imperial`, got `{other}`")),
                };
            }
            "--pdf" => {
                i += 1;
                pdf = Some(PathBuf::from(args.next_or_err(i, "missing value for --pdf")?));
            }
            flag if flag.starts_with("--") => return Err(format!("unknown argument for run: {flag}")),
            path => {
                if request.replace(PathBuf::from(path)).is_some() {
                    return Err("only one request file may be given".to_string());
                }
            }
        }
        i += 1;
    }

    let request = request.ok_or_else(|| "run requires a request file (JSON)".to_string())?;
    Ok(Command::Run {
        request,
        config,
        units,
        pdf,
    })
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index).map(String::as_str).ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  calc_cli run <request.json> [--config <settings.toml>] [--units metric|imperial] [--pdf <out.pdf>]");
    eprintln!("  calc_cli serve [--port {DEFAULT_PORT}] [--config <settings.toml>]");
    eprintln!("  calc_cli demo [--config <settings.toml>]");
    eprintln!();
    eprintln!("Request files carry a \"type\" tag: Cable, Ups, Transformer, Generator,");
    eprintln!("Pfc, Lighting, Grounding, Cost or Motor. Set RUST_LOG=debug for details.");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_run_with_options() {
        let cmd = parse_args_from(&args(&["run", "req.json", "--units", "imperial", "--pdf", "out.pdf"]))
            .expect("parse should succeed");
        assert_eq!(
            cmd,
            Command::Run {
                request: PathBuf::from("req.json"),
                config: None,
                units: UnitSystem::Imperial,
                pdf: Some(PathBuf::from("out.pdf")),
            }
        );
    }

    #[test]
    fn run_requires_request_file() {
        assert!(parse_args_from(&args(&["run", "--units", "metric"])).is_err());
    }

    #[test]
    fn rejects_bad_units() {
        assert!(parse_args_from(&args(&["run", "req.json", "--units", "cubits"])).is_err());
    }

    #[test]
    fn parses_serve_port() {
        let cmd = parse_args_from(&args(&["serve", "--port", "9000"])).expect("parse should succeed");
        assert_eq!(cmd, Command::Serve { port: 9000, config: None });
        let cmd = parse_args_from(&args(&["serve"])).expect("parse should succeed");
        assert_eq!(cmd, Command::Serve { port: DEFAULT_PORT, config: None });
    }

    #[test]
    fn empty_args_show_help() {
        assert_eq!(parse_args_from(&[]), Ok(Command::Help));
    }

    #[test]
    fn unknown_command_rejected() {
        assert!(parse_args_from(&args(&["frobnicate"])).is_err());
    }
}
