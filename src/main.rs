//! scoopc CLI
//!
//! Converts .scoop files to .js (or .coffee) files.

use std::path::PathBuf;
use std::process::ExitCode;

use scoopc::logging::{init_tracing, Verbosity};
use scoopc::{build, BuildOptions, CompileOptions, Dialect, ModuleFormat, ScoopError};

const PROGRAM: &str = "scoopc";
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug)]
struct CliArgs {
    inputs: Vec<PathBuf>,
    compile: CompileOptions,
    build: BuildOptions,
    verbosity: Verbosity,
}

enum Command {
    Run(CliArgs),
    Help,
    Version,
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let cli = match parse_args(&args) {
        Ok(Command::Run(cli)) => cli,
        Ok(Command::Help) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Ok(Command::Version) => {
            println!("{} {}", PROGRAM, VERSION);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}: {}", PROGRAM, e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(cli.verbosity);

    match build(&cli.inputs, &cli.compile, &cli.build) {
        Ok(report) => {
            if report.compile_errors > 0 {
                tracing::warn!(
                    "{} bodies could not be transpiled; look for FIXME markers in the output",
                    report.compile_errors
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", PROGRAM, e);
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: &[String]) -> Result<Command, ScoopError> {
    if args.is_empty() || args[0] == "?" {
        return Ok(Command::Help);
    }

    let mut cli = CliArgs {
        inputs: Vec::new(),
        compile: CompileOptions::default(),
        build: BuildOptions::default(),
        verbosity: Verbosity::Normal,
    };

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();

        // Flags taking a value accept both `--flag value` and `--flag=value`.
        let (flag, inline_value) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
            _ => (arg, None),
        };
        let mut value = |name: &str| -> Result<String, ScoopError> {
            if let Some(v) = inline_value.clone() {
                return Ok(v);
            }
            i += 1;
            args.get(i)
                .cloned()
                .ok_or_else(|| ScoopError::InvalidOptions(format!("{} requires a value", name)))
        };

        match flag {
            "-h" | "--help" => return Ok(Command::Help),
            "--version" => return Ok(Command::Version),
            "-o" | "--out" => cli.build.out_dir = PathBuf::from(value("--out")?),
            "-d" | "--dialect" => cli.compile.dialect = value("--dialect")?.parse::<Dialect>()?,
            "-t" | "--transportD" => cli.compile.module_format = ModuleFormat::TransportD,
            "-x" | "--transpiler" => cli.build.transpiler_command = Some(value("--transpiler")?),
            "-i" | "--incremental" => cli.build.incremental = true,
            "-q" | "--quiet" => cli.verbosity = Verbosity::Quiet,
            "-v" | "--verbose" => cli.verbosity = Verbosity::Verbose,
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(ScoopError::InvalidOptions(format!("unknown option '{}'", arg)));
            }
            _ => cli.inputs.push(PathBuf::from(arg)),
        }
        i += 1;
    }

    if cli.inputs.is_empty() {
        return Ok(Command::Help);
    }
    cli.compile.validate()?;
    cli.compile.validate_transpiler(cli.build.transpiler_command.is_some())?;

    Ok(Command::Run(cli))
}

fn print_usage() {
    println!("usage: {} [options] FILE FILE ...", PROGRAM);
    println!();
    println!("Converts .scoop files to .js files.  FILE can be a .scoop file or");
    println!("a directory of .scoop files.  Each .scoop file is converted to a");
    println!("root module, and each directory of .scoop files is considered a");
    println!("root for its contained .scoop files (the directory name FILE is");
    println!("not part of the module name).");
    println!();
    println!("Options:");
    println!("  -o, --out DIR          generate files in DIR (default: .)");
    println!("  -d, --dialect NAME     scooj (default) or coffee");
    println!("  -t, --transportD       generate Transport/D compatible module files");
    println!("  -x, --transpiler CMD   convert bodies with CMD (e.g. js2coffee)");
    println!("  -i, --incremental      only regenerate modules whose input changed");
    println!("  -q, --quiet            be quiet");
    println!("  -v, --verbose          be noisy");
    println!("  -h, --help             show this help");
    println!("      --version          show the version");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_arguments_prints_help() {
        assert!(matches!(parse_args(&[]), Ok(Command::Help)));
        assert!(matches!(parse_args(&args(&["?"])), Ok(Command::Help)));
    }

    #[test]
    fn test_flags_and_inputs() {
        let Ok(Command::Run(cli)) = parse_args(&args(&[
            "-o", "out", "--dialect=coffee", "-x", "js2coffee", "-v", "lib", "Main.scoop",
        ])) else {
            panic!("expected a run command");
        };
        assert_eq!(cli.build.out_dir, PathBuf::from("out"));
        assert_eq!(cli.compile.dialect, Dialect::ClassSugar);
        assert_eq!(cli.build.transpiler_command.as_deref(), Some("js2coffee"));
        assert_eq!(cli.verbosity, Verbosity::Verbose);
        assert_eq!(
            cli.inputs,
            vec![PathBuf::from("lib"), PathBuf::from("Main.scoop")]
        );
    }

    #[test]
    fn test_transport_d_with_coffee_is_rejected() {
        let result = parse_args(&args(&["-t", "-d", "coffee", "x.scoop"]));
        assert!(matches!(result, Err(ScoopError::InvalidOptions(_))));
    }

    #[test]
    fn test_transpiler_with_scooj_dialect_is_rejected() {
        let result = parse_args(&args(&["-x", "js2coffee", "x.scoop"]));
        assert!(matches!(result, Err(ScoopError::InvalidOptions(_))));
    }

    #[test]
    fn test_unknown_option_and_missing_value() {
        assert!(matches!(
            parse_args(&args(&["--frobnicate", "x.scoop"])),
            Err(ScoopError::InvalidOptions(_))
        ));
        assert!(matches!(
            parse_args(&args(&["x.scoop", "-o"])),
            Err(ScoopError::InvalidOptions(_))
        ));
    }
}
