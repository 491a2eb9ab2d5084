//! `paracmd`: run a list of commands concurrently, interleave their output, and aggregate
//! their exit statuses. Wiring follows `pueue/src/bin/pueue.rs`: parse args, install
//! tracing, install color-eyre, read config, dispatch, map the result to an exit code.
use std::process::ExitCode;

use clap::CommandFactory;
use color_eyre::eyre::WrapErr;

use paracmd_cli::cli::{self, CliArguments};
use paracmd_cli::config::FileConfig;
use paracmd_cli::tracing::install_tracing;
use paracmd_core::color::parse_spec;
use paracmd_core::command::{CommandInput, ShellSpec};
use paracmd_core::format::PrefixKind;
use paracmd_core::task::{KillOthersOn, RunOptions};
use paracmd_core::wildcard::WildcardSort;

fn main() -> ExitCode {
    let args = match cli::parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => return handle_clap_error(err),
    };

    if let Err(report) = install_tracing(args.verbose) {
        eprintln!("failed to install tracing: {report}");
        return ExitCode::FAILURE;
    }
    color_eyre::install().ok();

    match run(args) {
        Ok(code) => code,
        Err(report) => {
            // §6/§7: an argument error gets its usage reprinted on stdout, with the
            // specific complaint going to stderr.
            print_usage();
            eprintln!("{report:?}");
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!("{}", CliArguments::command().render_usage());
}

fn handle_clap_error(err: clap::Error) -> ExitCode {
    use clap::error::ErrorKind;
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{err}");
            ExitCode::SUCCESS
        }
        _ => {
            print_usage();
            eprint!("{err}");
            ExitCode::from(1)
        }
    }
}

fn run(args: CliArguments) -> color_eyre::Result<ExitCode> {
    let config = FileConfig::read(args.config.as_deref()).wrap_err("reading config file")?;
    let options = build_run_options(&args, &config)?;
    let commands = build_command_inputs(&args);

    let report = paracmd_core::run(commands, options).wrap_err("running commands")?;

    for result in &report.results {
        tracing::debug!(index = result.index, name = %result.name, exit_code = result.exit_code, "task finished");
    }

    if report.success {
        Ok(ExitCode::SUCCESS)
    } else {
        let code = report
            .first_exit_code
            .filter(|c| *c != 0)
            .unwrap_or(1)
            .clamp(1, 255) as u8;
        Ok(ExitCode::from(code))
    }
}

fn build_command_inputs(args: &CliArguments) -> Vec<CommandInput> {
    let global_shell = args.shell.as_deref().map(|value| {
        if value == "true" {
            ShellSpec::Bool(true)
        } else {
            ShellSpec::Named(value.to_string())
        }
    });

    args.commands
        .iter()
        .map(|command| {
            let mut input = CommandInput::bare(command.clone());
            if let Some(shell) = &global_shell {
                input.shell = shell.clone();
            }
            if args.raw {
                input.raw = true;
            }
            input
        })
        .collect()
}

fn build_run_options(args: &CliArguments, config: &FileConfig) -> color_eyre::Result<RunOptions> {
    let mut options = RunOptions::default();

    if let Some(cwd) = &args.cwd {
        options.cwd = cwd.clone();
    }

    options.max_processes = args.max_processes.or(config.max_processes);

    let kill_others_on = if !args.kill_others_on.is_empty() {
        &args.kill_others_on
    } else {
        config.kill_others_on.as_deref().unwrap_or_default()
    };
    options.kill_others_on = parse_kill_others_on(kill_others_on);

    let prefix = args.prefix.as_deref().or(config.prefix.as_deref()).unwrap_or("index");
    options.prefix = PrefixKind::parse(prefix);

    let prefix_colors = if !args.prefix_colors.is_empty() {
        &args.prefix_colors
    } else {
        config.prefix_colors.as_deref().unwrap_or_default()
    };
    options.prefix_colors = prefix_colors.iter().filter_map(|s| parse_spec(s)).collect();

    let success_condition = args
        .success_condition
        .as_deref()
        .or(config.success_condition.as_deref())
        .unwrap_or("all");
    options.success_condition = success_condition
        .parse()
        .wrap_err_with(|| format!("invalid --success-condition {success_condition:?}"))?;

    if let Some(pattern) = args.timestamp_format.as_deref().or(config.timestamp_format.as_deref()) {
        options.timestamp_format = pattern.to_string();
    }

    options.raw = args.raw;
    options.ignore_missing = args.ignore_missing;
    options.names = args.names.clone();

    let wildcard_sort = resolve_wildcard_sort(args, config)?;
    options.wildcard_sort = wildcard_sort;

    Ok(options)
}

fn parse_kill_others_on(values: &[String]) -> KillOthersOn {
    let mut kill_others_on = KillOthersOn::none();
    for value in values {
        match value.as_str() {
            "success" => kill_others_on.success = true,
            "failure" => kill_others_on.failure = true,
            _ => {}
        }
    }
    kill_others_on
}

fn resolve_wildcard_sort(args: &CliArguments, config: &FileConfig) -> color_eyre::Result<WildcardSort> {
    if args.no_wildcard_sort {
        return Ok(WildcardSort::Package);
    }
    let raw = args
        .wildcard_sort
        .as_deref()
        .or(config.wildcard_sort.as_deref())
        .unwrap_or("alpha");
    raw.parse().wrap_err_with(|| format!("invalid --wildcard-sort {raw:?}"))
}
