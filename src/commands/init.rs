use clap::Args;
use std::env;

use pkgseed::config;
use pkgseed::init::{self, InitOptions, InitOutcome};
use pkgseed::Error;

use super::CmdResult;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Accept every default without prompting
    #[arg(short = 's', long)]
    pub silent: bool,
}

pub fn run(args: InitArgs) -> CmdResult<InitOutcome> {
    let package_dir = env::current_dir().map_err(|e| {
        Error::internal_io(e.to_string(), Some("resolve current directory".to_string()))
    })?;

    let config = config::load_config();
    let template_dir = config.resolved_template_dir()?;

    let outcome = init::run(&InitOptions {
        package_dir,
        template_dir,
        config,
        interactive: !args.silent,
    })?;

    Ok((outcome, 0))
}
