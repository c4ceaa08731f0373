//! MSP430 Trace CLI
//!
//! Command-line tool for disassembling MSP430 firmware images.

use clap::{Parser, ValueEnum};
use msp430_sim::debugger::StepContext;
use msp430_sim::{
    DebugAction, DebuggerPort, HumanFormatter, JsonFormatter, LineDebugger, Node, Platform,
    ShortFormatter, SimConfig, TraceFormatter, TraceOptions,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// MSP430 firmware trace disassembler.
///
/// Loads an Intel HEX, TI-TXT or raw firmware image into a simulated
/// node and prints a disassembly trace starting at the reset vector.
#[derive(Parser, Debug)]
#[command(name = "msp430-trace")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Firmware image to load
    firmware: Option<PathBuf>,

    /// Linker map file for symbol names
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// JSON node configuration file
    #[arg(long, env = "MSP430_SIM_CONFIG")]
    config: Option<PathBuf>,

    /// Node platform
    #[arg(short, long, value_parser = parse_platform)]
    platform: Option<Platform>,

    /// First address to disassemble (hex)
    #[arg(short, long, value_parser = parse_address)]
    start: Option<u16>,

    /// Number of instructions to disassemble
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Output format
    #[arg(short, long, default_value = "human")]
    format: OutputFormat,

    /// Wait for a line on stdin after every instruction; `r` dumps registers
    #[arg(long)]
    step: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (only output essential info)
    #[arg(short, long)]
    quiet: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
    /// Compact single-line output
    Short,
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    s.parse::<Platform>().map_err(|e| e.to_string())
}

fn parse_address(s: &str) -> Result<u16, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid address '{}': {}", s, e))
}

/// Echoes the pending trace line on stderr before waiting for input.
struct Prompt<R> {
    inner: LineDebugger<R>,
}

impl<R: BufRead> DebuggerPort for Prompt<R> {
    fn on_instruction(&mut self, ctx: &StepContext<'_>) -> DebugAction {
        eprint!("{} > ", ctx.line);
        let _ = io::stderr().flush();
        self.inner.on_instruction(ctx)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("msp430_sim=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !args.quiet {
                eprintln!("Error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn build_config(args: &Args) -> Result<SimConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_json_file(path)?,
        None => SimConfig::default(),
    };

    if let Some(platform) = args.platform {
        config.platform = platform;
    }
    if let Some(firmware) = &args.firmware {
        config.firmware = Some(firmware.clone());
    }
    if let Some(map) = &args.map {
        config.map_file = Some(map.clone());
    }
    if let Some(start) = args.start {
        config.start = Some(start);
    }
    if let Some(count) = args.count {
        config.count = count;
    }
    if args.quiet {
        config.trace = TraceOptions::quiet();
    } else if args.verbose {
        config.trace.show_registers = true;
    }
    config.trace.step = args.step;

    if config.firmware.is_none() {
        return Err("no firmware image given".into());
    }
    Ok(config)
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(args)?;
    let mut node = Node::from_config(&config)?;

    if config.trace.step {
        node.disassembler_mut().attach_debugger(Box::new(Prompt {
            inner: LineDebugger::new(io::stdin().lock()),
        }));
    }

    let formatter: Box<dyn TraceFormatter> = match args.format {
        OutputFormat::Human => Box::new(HumanFormatter::from_options(&config.trace)),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
        OutputFormat::Short => Box::new(ShortFormatter::new()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut pc = config.start.unwrap_or_else(|| node.memory().reset_vector());
    for _ in 0..config.count {
        let entry = node.trace_one(pc);
        write!(out, "{}", formatter.format_entry(&entry))?;
        out.flush()?;
        pc = entry.next_address();
    }

    Ok(())
}
