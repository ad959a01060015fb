use std::env;
use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use hierarchical_scheduling::config::ExecutionMode;
use hierarchical_scheduling::{analyze, AnalysisConfig, System, SystemRecords};

const USAGE: &str =
    "usage: hsched <system.json> [--horizon T] [--runs N] [--seed S] [--alpha-step A] [--json]";

struct Options {
    input: String,
    config: AnalysisConfig,
    json: bool,
}

fn value<T: std::str::FromStr>(flag: &str, arg: Option<String>) -> Result<T, String> {
    let raw = arg.ok_or_else(|| format!("missing value for {flag}"))?;
    raw.parse()
        .map_err(|_| format!("invalid value for {flag}: `{raw}`"))
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut input = None;
    let mut config = AnalysisConfig::default();
    let mut json = false;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--horizon" => config.horizon = Some(value("--horizon", args.next())?),
            "--runs" => config.runs = value("--runs", args.next())?,
            "--seed" => {
                config.execution = ExecutionMode::Uniform {
                    seed: value("--seed", args.next())?,
                }
            }
            "--alpha-step" => config.alpha_step = value("--alpha-step", args.next())?,
            "--json" => json = true,
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            path if input.is_none() => input = Some(path.to_string()),
            extra => return Err(format!("unexpected argument `{extra}`")),
        }
    }
    config.validate().map_err(|e| e.to_string())?;
    let input = input.ok_or_else(|| "missing system description".to_string())?;
    Ok(Options {
        input,
        config,
        json,
    })
}

fn run(options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::open(&options.input)?;
    let records = SystemRecords::from_reader(BufReader::new(file))?;
    let system = System::from_records(&records)?;
    let report = analyze(&system, &options.config)?;
    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = match parse_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("error: {msg}");
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
