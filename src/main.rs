use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser as ClapParser;
use tracing::*;

use john::{diagnostics, stringify, Path};

use crate::config::Config;

mod config;
mod logging;

#[derive(Debug, ClapParser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The path to a JSON file.
    input: PathBuf,

    /// A path expression selecting the element to print, e.g. `users[0]/name`.
    #[arg(short, long)]
    path: Option<String>,

    /// A TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    logging::setup_logging();

    let cli = Args::parse();

    debug!(input = ?cli.input, path = ?cli.path);

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    debug!(?config);

    let json_string = match std::fs::read_to_string(&cli.input) {
        Ok(file) => file,
        Err(e) => {
            error!(path = ?cli.input, "failed to read input");
            return Err(e)
                .with_context(|| format!("failed to read file `{}`", cli.input.display()));
        }
    };

    let input_name = cli.input.display().to_string();

    let root = match john::parse(&json_string) {
        Ok(root) => root,
        Err(e) => {
            diagnostics::eprint(&e, &input_name, &json_string, config.color)?;
            bail!("failed to parse `{}`", cli.input.display());
        }
    };

    let element = match &cli.path {
        None => &root,
        Some(source) => {
            let path = match Path::compile(source) {
                Ok(path) => path,
                Err(e) => {
                    diagnostics::eprint(&e, "--path", source, config.color)?;
                    bail!("failed to compile path `{source}`");
                }
            };
            debug!(%path, depth = path.depth());
            match path.traverse(&root) {
                Ok(element) => element,
                Err(e) => {
                    diagnostics::eprint(&e, &input_name, &json_string, config.color)?;
                    bail!("failed to resolve path `{path}`");
                }
            }
        }
    };

    println!("{}", stringify(element, config.indent));

    Ok(())
}
