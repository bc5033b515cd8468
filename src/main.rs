use clap::Parser;

mod commands;
mod output;

use commands::init;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "pkgseed")]
#[command(version = VERSION)]
#[command(about = "Fill in package metadata, boilerplate and a hosted repository")]
struct Cli {
    #[command(flatten)]
    init: init::InitArgs,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let (json_result, exit_code) = output::map_cmd_result_to_json(init::run(cli.init));
    if let Err(err) = output::print_json_result(json_result) {
        eprintln!("{}", err);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn silent_flag_short_and_long() {
        assert!(Cli::try_parse_from(["pkgseed", "-s"]).unwrap().init.silent);
        assert!(Cli::try_parse_from(["pkgseed", "--silent"]).unwrap().init.silent);
        assert!(!Cli::try_parse_from(["pkgseed"]).unwrap().init.silent);
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Cli::try_parse_from(["pkgseed", "--template", "x"]).is_err());
    }

    #[test]
    fn exit_codes_are_clamped() {
        assert_eq!(exit_code_to_u8(-3), 0);
        assert_eq!(exit_code_to_u8(20), 20);
        assert_eq!(exit_code_to_u8(999), 255);
    }
}
