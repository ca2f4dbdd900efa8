mod output;
mod reports;

use std::path::{Path, PathBuf};

use clap::{Arg, ArgAction, ArgMatches, Command};
use cpp_toolchain::{compilers_json, executable_name, find_available_compilers, run_binary, Toolchain};
use serpent_core::batch::{mirrored_path, translate_project_with, FileFailure};
use serpent_core::{translate_file, BatchOutcome, BatchPolicy, Config};

use crate::output::{compilers_table, setup_progress_bar, summary_table, FormatStyle};
use crate::reports::{Report, ReportCollector, Severity, Stage};

fn main() {
    let cli = Command::new("serpent")
        .version("0.1.0")
        .about("Translate annotated Python into C++ and build it")
        .subcommand_required(true)
        .arg_required_else_help(true);

    let cli = setup_cli(cli);
    let matches = cli.get_matches();
    init_logging(matches.get_count("verbose"));
    let code = dispatch_commands(&matches);
    std::process::exit(code);
}

/// `-v` raises logging to info, `-vv` to debug. `RUST_LOG` wins when set.
fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn config_arg() -> Arg {
    Arg::new("config")
        .help("Path to a serpent.json config file")
        .short('c')
        .long("config")
        .value_parser(clap::value_parser!(PathBuf))
        .value_name("FILE")
}

fn project_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("dir")
            .help("The project directory holding the .py sources")
            .required(true)
            .value_parser(clap::value_parser!(PathBuf))
            .index(1),
    )
    .arg(config_arg())
    .arg(
        Arg::new("skip-failed")
            .help("Keep going when a file fails to translate")
            .long("skip-failed")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("compiler")
            .help("C++ compiler to use instead of the configured one")
            .long("compiler")
            .value_parser(clap::value_parser!(String))
            .value_name("NAME"),
    )
    .arg(
        Arg::new("output")
            .help("Path of the linked executable")
            .short('o')
            .long("output")
            .value_parser(clap::value_parser!(PathBuf))
            .value_name("FILE"),
    )
}

fn format_arg() -> Arg {
    Arg::new("format")
        .help("Output format")
        .long("format")
        .value_parser(["text", "json"])
        .default_value("text")
        .value_name("FORMAT")
}

/// Sets up the CLI with its subcommands and arguments.
fn setup_cli(cli: Command) -> Command {
    cli.arg(
        Arg::new("verbose")
            .help("Increase log output (-v info, -vv debug)")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
            .global(true),
    )
    .subcommand(
        Command::new("translate")
            .about("Translate a single Python file to C++")
            .arg(
                Arg::new("file")
                    .help("The Python file to translate")
                    .required(true)
                    .value_parser(clap::value_parser!(PathBuf))
                    .index(1),
            )
            .arg(config_arg())
            .arg(
                Arg::new("output")
                    .help("Write the C++ to this file instead of stdout")
                    .short('o')
                    .long("output")
                    .value_parser(clap::value_parser!(PathBuf))
                    .value_name("FILE"),
            ),
    )
    .subcommand(project_args(
        Command::new("build").about("Translate, compile and link a project directory"),
    )
    .arg(format_arg()))
    .subcommand(project_args(
        Command::new("run").about("Build a project directory and run the executable"),
    ))
    .subcommand(
        Command::new("compilers")
            .about("List the C++ compilers found on PATH")
            .arg(format_arg()),
    )
}

/// Dispatches the subcommand and returns the process exit code.
fn dispatch_commands(matches: &ArgMatches) -> i32 {
    match matches.subcommand() {
        Some(("translate", sub_m)) => translate_command(sub_m),
        Some(("build", sub_m)) => {
            let json = sub_m.get_one::<String>("format").map(String::as_str) == Some("json");
            let (reports, _) = build_command(sub_m, json);
            if json {
                match reports.to_json() {
                    Ok(text) => println!("{}", text),
                    Err(e) => eprintln!("failed to serialize reports: {}", e),
                }
            }
            reports.exit_code()
        }
        Some(("run", sub_m)) => {
            let (reports, exe) = build_command(sub_m, false);
            match exe {
                Some(exe) if reports.exit_code() == 0 => match run_binary(&exe) {
                    Ok(status) => status.code().unwrap_or(1),
                    Err(e) => {
                        let report = Report::from_toolchain(&e, Stage::Run, Some(exe.as_path()));
                        eprint!("{}", report.render_pretty());
                        2
                    }
                },
                _ => reports.exit_code().max(1),
            }
        }
        Some(("compilers", sub_m)) => compilers_command(sub_m),
        _ => {
            eprintln!("No valid subcommand was used. Use --help for more information.");
            2
        }
    }
}

/// Use `--config` when given, otherwise look for serpent.json in `dir`.
fn load_config(explicit: Option<&PathBuf>, dir: &Path) -> Result<Config, Report> {
    let loaded = match explicit {
        Some(path) => Config::load_from_file(path),
        None => Config::discover(dir),
    };
    loaded.map_err(|e| Report::from_error(&e, Stage::Config))
}

fn translate_command(sub_m: &ArgMatches) -> i32 {
    let Some(file) = sub_m.get_one::<PathBuf>("file") else {
        return 2;
    };
    let parent = file.parent().unwrap_or(Path::new("."));
    let config = match load_config(sub_m.get_one::<PathBuf>("config"), parent) {
        Ok(config) => config,
        Err(report) => {
            eprint!("{}", report.render_pretty());
            return 2;
        }
    };

    match translate_file(file, &config) {
        Ok(cpp) => match sub_m.get_one::<PathBuf>("output") {
            Some(out) => match write_file(out, &cpp) {
                Ok(()) => {
                    log::info!("wrote {}", out.display());
                    0
                }
                Err(e) => {
                    eprintln!("{}", Report::new(&e, Severity::Fatal, Stage::Translate, "serpent.cli").with_file(out));
                    2
                }
            },
            None => {
                print!("{}", cpp);
                0
            }
        },
        Err(error) => {
            let failure = FileFailure {
                source: file.clone(),
                content: std::fs::read_to_string(file).ok(),
                error,
            };
            let report = Report::from_failure(&failure);
            eprint!("{}", report.render_pretty());
            if report.severity == Severity::Fatal { 2 } else { 1 }
        }
    }
}

fn write_file(path: &Path, text: &str) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| format!("create dir: {}", e))?;
    }
    std::fs::write(path, text).map_err(|e| format!("write: {}", e))
}

/// Translate every file, compile what translated and link it. Returns the
/// collected reports and, when linking succeeded, the executable.
fn build_command(sub_m: &ArgMatches, json: bool) -> (ReportCollector, Option<PathBuf>) {
    let mut reports = ReportCollector::new();
    let style = FormatStyle::default();
    let Some(dir) = sub_m.get_one::<PathBuf>("dir") else {
        return (reports, None);
    };

    let mut config = match load_config(sub_m.get_one::<PathBuf>("config"), dir) {
        Ok(config) => config,
        Err(report) => {
            reports.push(report);
            finish_reports(&reports, json);
            return (reports, None);
        }
    };
    if sub_m.get_flag("skip-failed") {
        config.build.skip_failed = true;
    }
    if let Some(compiler) = sub_m.get_one::<String>("compiler") {
        config.build.compiler = Some(compiler.clone());
    }
    let policy = BatchPolicy::from_config(&config);

    let total = serpent_core::batch::discover_sources(dir, &config)
        .map(|s| s.len())
        .unwrap_or(0);
    let progress = setup_progress_bar(total, json);
    let outcome = translate_project_with(dir, &config, policy, |path| {
        progress.set_message(format!("Translating {}", path.display()));
        progress.inc(1);
    });
    progress.finish_and_clear();

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            reports.push(Report::from_error(&e, Stage::Translate));
            finish_reports(&reports, json);
            return (reports, None);
        }
    };
    reports.extend(outcome.failures.iter().map(Report::from_failure));
    if !json {
        println!("{}", summary_table(&outcome));
        println!(
            "{}",
            style.info.apply_to(format!("Translated {} of {} files", outcome.translated.len(), total))
        );
    }

    let exe = if outcome.aborted || outcome.translated.is_empty() {
        None
    } else {
        compile_and_link(dir, sub_m.get_one::<PathBuf>("output"), &config, &outcome, &mut reports)
    };

    finish_reports(&reports, json);
    if !json {
        match &exe {
            Some(exe) => println!("{}", style.success.apply_to(format!("Built {}", exe.display()))),
            None => eprintln!("{}", style.error.apply_to("Build failed")),
        }
    }
    (reports, exe)
}

fn compile_and_link(
    dir: &Path,
    output: Option<&PathBuf>,
    config: &Config,
    outcome: &BatchOutcome,
    reports: &mut ReportCollector,
) -> Option<PathBuf> {
    let toolchain = match Toolchain::detect(config.build.compiler.as_deref(), &config.build.flags) {
        Ok(t) => t,
        Err(e) => {
            reports.push(Report::from_toolchain(&e, Stage::Compile, None));
            return None;
        }
    };

    let mut objects = Vec::new();
    let mut failed = false;
    for file in &outcome.translated {
        let obj = mirrored_path(dir, &file.source, &config.build.obj_dir, "o");
        match toolchain.compile_object(&file.output, &obj) {
            Ok(()) => objects.push(obj),
            Err(e) => {
                failed = true;
                reports.push(Report::from_toolchain(&e, Stage::Compile, Some(file.output.as_path())));
            }
        }
    }
    if failed {
        return None;
    }

    let exe = match output {
        Some(path) => path.clone(),
        None => dir.join(executable_name(&config.build.output)),
    };
    match toolchain.link_objects(&objects, &exe) {
        Ok(exe) => Some(exe),
        Err(e) => {
            reports.push(Report::from_toolchain(&e, Stage::Link, Some(exe.as_path())));
            None
        }
    }
}

fn finish_reports(reports: &ReportCollector, json: bool) {
    if !json {
        reports.print_all_pretty();
    }
}

fn compilers_command(sub_m: &ArgMatches) -> i32 {
    let compilers = find_available_compilers();
    if sub_m.get_one::<String>("format").map(String::as_str) == Some("json") {
        println!("{}", compilers_json(&compilers));
        return 0;
    }
    if compilers.is_empty() {
        let style = FormatStyle::default();
        eprintln!("{}", style.warning.apply_to("No supported C++ compiler found on PATH"));
        return 0;
    }
    let style = FormatStyle::default();
    println!("{}", style.title.apply_to("Available compilers"));
    println!("{}", compilers_table(&compilers));
    0
}
