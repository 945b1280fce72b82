//! Command-line interface for g4fmt
//!
//! Usage:
//!   g4fmt                          - Format stdin to stdout
//!   g4fmt `<paths>...`             - Format files (directories are searched for *.g4) to stdout
//!   g4fmt --check `<paths>...`     - Report files that would change, with a diff
//!   g4fmt --write `<paths>...`     - Rewrite files in place
//!   g4fmt --dump-tree `<path>`     - Print the parse tree instead of formatting
//!
//! Exit status: 0 on success, 1 when `--check` finds unformatted input, 2 on errors.
//! Set `RUST_LOG=g4fmt=debug` to trace formatting decisions.

use clap::{Arg, ArgAction, ArgMatches, Command};
use g4fmt::g4::config::{FormattingRules, Loader, LOCAL_CONFIG_FILE};
use g4fmt::g4::lexing::tokenize;
use g4fmt::g4::parsing::parse_grammar;
use g4fmt::g4::runner::{unified_diff, FormatMode, FormatterEngine, FormatterRunReport};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

const EXIT_UNFORMATTED: i32 = 1;
const EXIT_ERROR: i32 = 2;

fn build_cli() -> Command {
    Command::new("g4fmt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Formats ANTLR v4 grammar files")
        .arg(
            Arg::new("paths")
                .help("Grammar files or directories; reads stdin when omitted")
                .value_parser(clap::value_parser!(PathBuf))
                .num_args(0..)
                .index(1),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Exit with status 1 if any input is not formatted")
                .action(ArgAction::SetTrue)
                .conflicts_with("write"),
        )
        .arg(
            Arg::new("write")
                .long("write")
                .short('w')
                .help("Rewrite files in place")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("indent-width")
                .long("indent-width")
                .help("Spaces per indentation level")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .help("Summary format for --check and --write")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("dump-tree")
                .long("dump-tree")
                .help("Print the parse tree instead of formatting")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["check", "write"]),
        )
}

fn main() {
    pretty_env_logger::init();

    let matches = build_cli().get_matches();
    let rules = load_rules(&matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        process::exit(EXIT_ERROR);
    });

    let paths: Vec<PathBuf> = matches
        .get_many::<PathBuf>("paths")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let code = if matches.get_flag("dump-tree") {
        handle_dump_tree(&paths)
    } else if paths.is_empty() {
        handle_stdin(rules, matches.get_flag("check"))
    } else {
        let mode = if matches.get_flag("check") {
            FormatMode::Check
        } else if matches.get_flag("write") {
            FormatMode::Write
        } else {
            FormatMode::Stdout
        };
        let report_format = matches
            .get_one::<String>("report")
            .map_or("text", String::as_str);
        handle_paths(rules, &paths, mode, report_format)
    };
    process::exit(code);
}

fn load_rules(matches: &ArgMatches) -> Result<FormattingRules, config::ConfigError> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        loader = loader.with_file(path);
    }
    if let Some(width) = matches.get_one::<u16>("indent-width") {
        loader = loader.set_override("formatting.indent_width", i64::from(*width))?;
    }
    Ok(loader.build()?.formatting)
}

fn read_stdin() -> io::Result<String> {
    let mut source = String::new();
    io::stdin().read_to_string(&mut source)?;
    Ok(source)
}

/// Format stdin to stdout, or diff it against its formatted form in check mode
fn handle_stdin(rules: FormattingRules, check: bool) -> i32 {
    let source = match read_stdin() {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading stdin: {}", e);
            return EXIT_ERROR;
        }
    };
    let output = match FormatterEngine::new(rules).format_source(&source) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("<stdin>: {}", e);
            return EXIT_ERROR;
        }
    };
    for diagnostic in &output.diagnostics {
        eprintln!("<stdin>: warning: {}", diagnostic);
    }
    if check {
        if output.rendered == source {
            return 0;
        }
        print!("{}", unified_diff("<stdin>", &source, &output.rendered));
        return EXIT_UNFORMATTED;
    }
    print!("{}", output.rendered);
    0
}

fn handle_paths(rules: FormattingRules, paths: &[PathBuf], mode: FormatMode, report_format: &str) -> i32 {
    let engine = FormatterEngine::new(rules);
    let report = match engine.run_paths_with_report(paths, mode) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_ERROR;
        }
    };

    if mode == FormatMode::Stdout {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for file in &report.files {
            if let Some(rendered) = &file.rendered {
                let _ = out.write_all(rendered.as_bytes());
            }
        }
    } else if report_format == "json" {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error formatting report: {}", e);
                return EXIT_ERROR;
            }
        }
    } else {
        print_text_report(&report, mode);
    }

    for file in &report.files {
        for diagnostic in &file.diagnostics {
            eprintln!("{}: warning: {}", file.path.display(), diagnostic);
        }
        if let Some(error) = &file.error {
            eprintln!("{}: {}", file.path.display(), error);
        }
    }

    if report.has_failures() {
        EXIT_ERROR
    } else if mode == FormatMode::Check && report.summary.files_changed > 0 {
        EXIT_UNFORMATTED
    } else {
        0
    }
}

fn print_text_report(report: &FormatterRunReport, mode: FormatMode) {
    for file in report.files.iter().filter(|file| file.changed) {
        match mode {
            FormatMode::Check => {
                println!("Would reformat {}", file.path.display());
                if let Some(diff) = &file.diff {
                    print!("{}", diff);
                }
            }
            _ => println!("Reformatted {}", file.path.display()),
        }
    }
    let summary = &report.summary;
    println!(
        "{} file(s) checked, {} {}, {} failed, {} warning(s)",
        summary.files_seen,
        summary.files_changed,
        if mode == FormatMode::Check { "would change" } else { "changed" },
        summary.files_failed,
        summary.warnings
    );
}

fn handle_dump_tree(paths: &[PathBuf]) -> i32 {
    let sources: Vec<(String, io::Result<String>)> = if paths.is_empty() {
        vec![("<stdin>".to_string(), read_stdin())]
    } else {
        paths
            .iter()
            .map(|path| (path.display().to_string(), std::fs::read_to_string(path)))
            .collect()
    };

    let mut code = 0;
    for (label, source) in sources {
        let source = match source {
            Ok(source) => source,
            Err(e) => {
                eprintln!("{}: {}", label, e);
                code = EXIT_ERROR;
                continue;
            }
        };
        let stream = tokenize(&source);
        match parse_grammar(&stream) {
            Ok(tree) => print!("{}", tree.render_tree(&stream)),
            Err(diagnostics) => {
                for diagnostic in diagnostics {
                    eprintln!("{}: {}", label, diagnostic);
                }
                code = EXIT_ERROR;
            }
        }
    }
    code
}
