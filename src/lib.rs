pub mod config;
pub mod format;
pub mod generator;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate {
        config: Option<String>,
        metadata: Option<String>,
        out: Option<String>,
    },
    Tokens {
        config: Option<String>,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    pub message: String,
}

pub const THEME_MAPS_FILE: &str = "_theme-maps.scss";
pub const TOKENS_FILE: &str = "_tokens.scss";
pub const MIXINS_FILE: &str = "_mixins.scss";

const DEFAULT_CONFIG_PATH: &str = "irontheme.toml";
const DEFAULT_METADATA_PATH: &str = "metadata.toml";

pub fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Generate {
            config,
            metadata,
            out,
        } => run_generate(config, metadata, out),
        Command::Tokens { config } => run_tokens(config),
        Command::Help => {
            print_help();
            Ok(())
        }
    }
}

pub fn run_from_env() -> Result<(), CliError> {
    let command = parse_args(env::args().skip(1))?;
    run(command)
}

pub fn parse_args<I>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut iter = args.into_iter();
    let Some(cmd) = iter.next() else {
        return Ok(Command::Help);
    };

    match cmd.as_str() {
        "generate" => parse_generate_args(iter.collect()),
        "tokens" => parse_tokens_args(iter.collect()),
        "-h" | "--help" | "help" => Ok(Command::Help),
        _ => Err(CliError {
            message: format!("unknown command: {}", cmd),
        }),
    }
}

fn parse_generate_args(args: Vec<String>) -> Result<Command, CliError> {
    let mut config = None;
    let mut metadata = None;
    let mut out = None;
    let mut idx = 0;

    while idx < args.len() {
        match args[idx].as_str() {
            "--config" | "-c" => {
                idx += 1;
                if idx >= args.len() {
                    return Err(CliError {
                        message: "generate requires a value for --config".to_string(),
                    });
                }
                config = Some(args[idx].clone());
            }
            "--metadata" | "-m" => {
                idx += 1;
                if idx >= args.len() {
                    return Err(CliError {
                        message: "generate requires a value for --metadata".to_string(),
                    });
                }
                metadata = Some(args[idx].clone());
            }
            "--out" | "--output" | "-o" => {
                idx += 1;
                if idx >= args.len() {
                    return Err(CliError {
                        message: "generate requires a value for --out".to_string(),
                    });
                }
                out = Some(args[idx].clone());
            }
            value => {
                return Err(CliError {
                    message: format!("generate does not take a positional argument: {}", value),
                });
            }
        }
        idx += 1;
    }

    Ok(Command::Generate {
        config,
        metadata,
        out,
    })
}

fn parse_tokens_args(args: Vec<String>) -> Result<Command, CliError> {
    let mut config = None;
    let mut idx = 0;

    while idx < args.len() {
        match args[idx].as_str() {
            "--config" | "-c" => {
                idx += 1;
                if idx >= args.len() {
                    return Err(CliError {
                        message: "tokens requires a value for --config".to_string(),
                    });
                }
                config = Some(args[idx].clone());
            }
            value => {
                return Err(CliError {
                    message: format!("tokens does not take a positional argument: {}", value),
                });
            }
        }
        idx += 1;
    }

    Ok(Command::Tokens { config })
}

fn run_generate(
    config_path: Option<String>,
    metadata_path: Option<String>,
    out: Option<String>,
) -> Result<(), CliError> {
    let config_path = config_path.unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = config::load(Path::new(&config_path)).map_err(|err| CliError {
        message: err.message,
    })?;
    let generator_config = config::resolve(&config).map_err(|err| CliError {
        message: err.message,
    })?;

    let metadata_path = metadata_path.unwrap_or_else(|| DEFAULT_METADATA_PATH.to_string());
    let metadata = match config::load_metadata(Path::new(&metadata_path)) {
        Ok(entries) => entries,
        Err(err) => {
            eprintln!(
                "warning: {}; continuing without token metadata",
                err.message
            );
            Vec::new()
        }
    };

    warn_missing_tokens(&generator_config);

    let result = generator::generate(&generator_config, metadata).map_err(|err| CliError {
        message: err.message,
    })?;

    if let Some(out_dir) = out {
        let out_dir = PathBuf::from(out_dir);
        fs::create_dir_all(&out_dir).map_err(|err| CliError {
            message: format!(
                "failed to create output directory {}: {}",
                out_dir.display(),
                err
            ),
        })?;
        write_artifact(&out_dir.join(THEME_MAPS_FILE), result.theme_maps.as_str())?;
        write_artifact(&out_dir.join(TOKENS_FILE), result.tokens.as_str())?;
        write_artifact(&out_dir.join(MIXINS_FILE), result.mixins.as_str())?;
    } else {
        print!("{}", result.theme_maps);
        print!("{}", result.tokens);
        print!("{}", result.mixins);
    }

    eprintln!(
        "generated 3 artifacts ({} tokens, {} themes)",
        result.token_count, result.theme_count
    );

    Ok(())
}

fn run_tokens(config_path: Option<String>) -> Result<(), CliError> {
    let config_path = config_path.unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = config::load(Path::new(&config_path)).map_err(|err| CliError {
        message: err.message,
    })?;
    let generator_config = config::resolve(&config).map_err(|err| CliError {
        message: err.message,
    })?;

    for token in &generator_config.tokens {
        println!("{}", generator::format_token_name(token));
    }

    eprintln!(
        "{} color tokens, {} themes",
        generator_config.tokens.len(),
        generator_config.themes.len()
    );

    Ok(())
}

fn warn_missing_tokens(config: &generator::GeneratorConfig) {
    for theme in &config.themes {
        for token in &config.tokens {
            if !theme.colors.iter().any(|(name, _)| name == token) {
                eprintln!(
                    "warning: theme {} does not define token {}",
                    theme.name, token
                );
            }
        }
    }
}

fn write_artifact(path: &Path, contents: &str) -> Result<(), CliError> {
    fs::write(path, contents).map_err(|err| CliError {
        message: format!("failed to write output {}: {}", path.display(), err),
    })
}

fn print_help() {
    println!("irontheme");
    println!();
    println!("USAGE:");
    println!("  irontheme generate [--config <path>] [--metadata <path>] [--out <dir>]");
    println!("  irontheme tokens [--config <path>]");
    println!();
    println!("EXAMPLES:");
    println!("  irontheme generate");
    println!("  irontheme generate -c irontheme.toml -m metadata.toml -o scss/generated");
    println!("  irontheme generate --out scss/generated");
    println!("  irontheme tokens -c irontheme.toml");
}
