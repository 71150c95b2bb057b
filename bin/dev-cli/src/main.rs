mod logger;

use std::env;
use std::error::Error;
use std::process;

use hive_schema_preprocessor::{preprocess_schema, sdl::schema_from_sdl};
use hive_schema_preprocessor_config::load_config;
use tracing::{debug, error};

use crate::logger::configure_logging;

const USAGE: &str = "Usage: preprocessor-dev-cli <schema_path> [--config <config_path>] [--beta]";

struct Args {
    schema_path: String,
    config_path: Option<String>,
    force_beta: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = env::args().skip(1);
    let mut schema_path = None;
    let mut config_path = None;
    let mut force_beta = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--beta" => force_beta = true,
            "--config" => {
                config_path = Some(args.next().ok_or("--config expects a path")?);
            }
            flag if flag.starts_with("--") => return Err(format!("Unknown flag: {}", flag)),
            _ if schema_path.is_none() => schema_path = Some(arg.clone()),
            _ => return Err(format!("Unexpected argument: {}", arg)),
        }
    }

    Ok(Args {
        schema_path: schema_path.ok_or("Missing schema path")?,
        config_path,
        force_beta,
    })
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = load_config(args.config_path)?;
    configure_logging(&config.log);

    if args.force_beta {
        config.features.beta_features_enabled = true;
    }
    debug!(
        beta_features_enabled = config.features.beta_features_enabled,
        "loaded configuration"
    );

    let sdl = std::fs::read_to_string(&args.schema_path)?;
    let schema = schema_from_sdl(&sdl)?;
    let preprocessed = preprocess_schema(&schema, &config.features)?;

    println!("{}", preprocessed.to_sdl()?);

    Ok(())
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("{}", USAGE);
            process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        error!("{}", err);
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
