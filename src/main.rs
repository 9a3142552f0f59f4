//! Codeopener CLI
//!
//! Usage:
//!   codeopener configure --code 417 --slot 1               # Write config.json
//!   codeopener generate                                      # Write the combination list
//!   codeopener reset                                         # Dial back to the start code
//!   codeopener run                                           # Enter every combination
//!   codeopener pipeline                                      # generate → reset → run
//!   codeopener run --dry-run --fast                          # Preview without key events

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use codeopener::core::{
    codes_dir, generate_stage, load_config, load_timing, reset_stage, run_stage, save_config,
    system_driver, ConfigBuilder, DryRunDriver, InputDriver, StartPosition,
};
use codeopener::types::{
    Code, CodeLength, ContinueDirection, LockConfig, OpenerError, ProgressReport, Result, RunSummary,
    TimingProfile,
};
use codeopener::{DEFAULT_CONFIG_FILE, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "codeopener",
    version = VERSION,
    about = "Codeopener - Enter in-game dial combinations with timed key holds",
    long_about = "Codeopener drives a one-key combination dial: short taps move the active\n\
                  slot, long holds turn the active digit forward. It enumerates candidate\n\
                  codes and enters them one after another.\n\n\
                  Stages:\n  \
                  configure  Record the observed dial and the search start\n  \
                  generate   Write the combination list for the chosen strategy\n  \
                  reset      Dial from the observed state to the start code\n  \
                  run        Enter every combination, reporting progress and ETA\n  \
                  pipeline   generate, reset and run in one go\n\n\
                  Reset and run wait until Backspace is held in the game.\n\
                  There is no feedback from the game: keep it focused and leave the\n\
                  keyboard alone while a stage runs."
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(ClapArgs, Debug)]
struct GlobalArgs {
    /// Configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Directory for combination lists (default: codes/ next to the config)
    #[arg(long, global = true)]
    codes_dir: Option<PathBuf>,

    /// JSON timing profile overriding the built-in one
    #[arg(long, global = true)]
    timing: Option<PathBuf>,

    /// Log key events instead of sending them
    #[arg(long, global = true)]
    dry_run: bool,

    /// With --dry-run: skip all waits
    #[arg(long, global = true, requires = "dry_run")]
    fast: bool,

    /// Output progress as JSON lines
    #[arg(long, global = true)]
    json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    no_color: bool,

    /// Exit without waiting for Enter
    #[arg(long, global = true)]
    no_pause: bool,

    /// Log every key action
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record the observed dial state and search start in the config file
    Configure(ConfigureArgs),
    /// Write the combination list for the configured strategy
    Generate,
    /// Dial from the observed state to the start code, ending on slot 0
    Reset,
    /// Enter every combination from the saved list
    Run,
    /// generate → reset → run
    Pipeline,
}

#[derive(ClapArgs, Debug)]
struct ConfigureArgs {
    /// Digits currently shown on the dial (e.g. 417)
    #[arg(long)]
    code: Code,

    /// Active slot, counted from 0 on the left
    #[arg(long)]
    slot: usize,

    /// Lock length; inferred from --code when omitted
    #[arg(long, value_parser = clap::value_parser!(u8).range(3..=4))]
    length: Option<u8>,

    /// Where the search begins
    #[arg(long, value_enum, default_value_t = StartArg::FromStart)]
    start: StartArg,

    /// Code to resume from (with --start continue)
    #[arg(long, required_if_eq("start", "continue"))]
    resume_code: Option<Code>,

    /// With --start continue: step downward instead of upward
    #[arg(long)]
    decrease: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum StartArg {
    /// All zeros, ascending
    FromStart,
    /// All nines, descending
    FromEnd,
    /// From --resume-code
    Continue,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.global.verbose);
    if args.global.no_color {
        colored::control::set_override(false);
    }

    print_header(&args.command);

    let outcome = match &args.command {
        Command::Configure(configure) => run_configure(configure, &args.global),
        Command::Generate => run_generate(&args.global),
        Command::Reset => run_reset(&args.global),
        Command::Run => run_run(&args.global),
        Command::Pipeline => run_pipeline(&args.global),
    };

    match outcome {
        Ok(()) => {
            if matches!(args.command, Command::Run | Command::Pipeline) {
                wait_for_enter(&args.global);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_error(&e, &args.global);
            wait_for_enter(&args.global);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so `--json` progress on stdout stays clean
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

// =============================================================================
// STAGES
// =============================================================================

fn run_configure(configure: &ConfigureArgs, global: &GlobalArgs) -> Result<()> {
    let start = match (configure.start, &configure.resume_code) {
        (StartArg::FromStart, _) => StartPosition::FromStart,
        (StartArg::FromEnd, _) => StartPosition::FromEnd,
        (StartArg::Continue, Some(code)) => StartPosition::Continue {
            code: code.clone(),
            direction: if configure.decrease {
                ContinueDirection::Decrease
            } else {
                ContinueDirection::Increase
            },
        },
        (StartArg::Continue, None) => {
            return Err(OpenerError::ConfigInvalid("--start continue needs --resume-code".to_string()))
        }
    };

    let mut builder = ConfigBuilder::new().observed(configure.code.clone(), configure.slot).start(start);
    if let Some(length) = configure.length {
        builder = builder.length(CodeLength::try_from(usize::from(length))?);
    }
    let config = builder.build()?;
    save_config(&global.config, &config)?;

    if global.json {
        emit_json(&config);
    } else {
        println!("{} Config saved to {}", "✓".green().bold(), global.config.display());
        print_config(&config);
    }
    Ok(())
}

fn run_generate(global: &GlobalArgs) -> Result<()> {
    let config = load_config(&global.config)?;
    let dir = codes_dir(&global.config, global.codes_dir.as_deref());
    let (path, count) = generate_stage(&config, &dir)?;

    if global.json {
        #[derive(Serialize)]
        struct Generated<'a> {
            path: &'a Path,
            count: usize,
        }
        emit_json(&Generated { path: &path, count });
    } else {
        println!("{} {} combinations written to {}", "✓".green().bold(), count, path.display());
        if count == 0 {
            println!("{}", "  Nothing to try: the resume range is empty".yellow());
        }
    }
    Ok(())
}

fn run_reset(global: &GlobalArgs) -> Result<()> {
    let config = load_config(&global.config)?;
    let timing = load_timing(global.timing.as_deref(), TimingProfile::resetter())?;
    let mut driver = make_driver(global)?;

    print_config(&config);
    print_switch_to_game(global);
    let state = reset_stage(&config, &mut driver, timing)?;

    if global.json {
        emit_json(&state);
    } else {
        println!("{} Dial at {} on slot {}", "✓".green().bold(), state.code.to_string().bold(), state.slot);
    }
    Ok(())
}

fn run_run(global: &GlobalArgs) -> Result<()> {
    let config = load_config(&global.config)?;
    let timing = load_timing(global.timing.as_deref(), TimingProfile::runner())?;
    let dir = codes_dir(&global.config, global.codes_dir.as_deref());
    let mut driver = make_driver(global)?;

    print_config(&config);
    print_switch_to_game(global);
    let summary = run_stage(&config, &dir, &mut driver, timing, |report| print_progress(report, global))?;
    print_summary(&summary, global);
    Ok(())
}

fn run_pipeline(global: &GlobalArgs) -> Result<()> {
    run_generate(global)?;
    run_reset(global)?;
    run_run(global)
}

fn make_driver(global: &GlobalArgs) -> Result<Box<dyn InputDriver>> {
    if global.dry_run {
        Ok(Box::new(DryRunDriver::new(global.fast)))
    } else {
        system_driver()
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

fn emit_json<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{}", line),
        Err(e) => tracing::error!(error = %e, "could not serialize output"),
    }
}

fn print_header(command: &Command) {
    let stage = match command {
        Command::Configure(_) => "Configure",
        Command::Generate => "Generate",
        Command::Reset => "Reset",
        Command::Run => "Run",
        Command::Pipeline => "Pipeline",
    };
    eprintln!("{}", "========================================".bold());
    eprintln!("{}", format!("  Codeopener v{} - {}", VERSION, stage).bold());
    eprintln!("{}", "========================================".bold());
}

fn print_config(config: &LockConfig) {
    eprintln!("  Length:    {}", config.length);
    eprintln!("  Observed:  {} (slot {})", config.current_code, config.slot);
    eprintln!("  Start:     {}", config.start_code);
    eprintln!("  Strategy:  {}", config.strategy());
}

fn print_switch_to_game(global: &GlobalArgs) {
    if global.dry_run {
        eprintln!("{}", "  Dry run: no keys will be sent".cyan());
    } else {
        eprintln!("{}", "  Switch to the game and hold Backspace to start".yellow().bold());
    }
}

fn print_progress(report: &ProgressReport, global: &GlobalArgs) {
    if global.json {
        emit_json(report);
    } else if global.no_color {
        println!("{}", report.to_parseable_string());
    } else {
        println!("{}", report.to_terminal_string());
    }
}

fn print_summary(summary: &RunSummary, global: &GlobalArgs) {
    if global.json {
        emit_json(summary);
    } else if global.no_color {
        println!("{}", summary.to_parseable_string());
    } else {
        println!();
        println!("{}", summary.to_terminal_string());
    }
}

fn print_error(error: &OpenerError, global: &GlobalArgs) {
    if global.json {
        #[derive(Serialize)]
        struct ErrorOutput {
            code: &'static str,
            message: String,
        }
        emit_json(&ErrorOutput { code: error.code(), message: error.to_string() });
    } else {
        eprintln!("{} {}", format!("[{}]", error.code()).red().bold(), error);
    }
}

/// Keep the window open until the operator has read the outcome
fn wait_for_enter(global: &GlobalArgs) {
    if global.no_pause {
        return;
    }
    eprint!("Press Enter to exit...");
    let _ = io::stderr().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}
