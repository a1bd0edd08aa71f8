//! SIMT warp simulator CLI.
//!
//! This binary is the command-line entry point to the simulator. It performs:
//! 1. **Run:** Loads a program image and optional data images, runs until every
//!    warp-group halts, prints statistics and writes the memory dump.
//! 2. **Disassemble:** Prints a program image as assembly, one word per line.
//!
//! Logging goes to stderr through `tracing-subscriber`; set `RUST_LOG` (for
//! example `RUST_LOG=simt_core=debug`) to see cache and scheduler events.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use simt_core::isa::decode;
use simt_core::sim::loader::{self, ImageFormat};
use simt_core::sim::{DumpOptions, DumpRange};
use simt_core::{Config, SimError, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "simt",
    author,
    version,
    about = "Cycle-accurate SIMT warp simulator",
    long_about = "Run a program image on the SIMT core and dump the resulting memory.\n\nExamples:\n  simt run --program saxpy.hex --data args.hex --dump memsim.hex\n  simt run --program kernel.bin --format bin --config gto.json --regs\n  simt disasm --program saxpy.hex"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Image digit format accepted on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Hex,
    Bin,
}

impl From<FormatArg> for ImageFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Hex => Self::Hex,
            FormatArg::Bin => Self::Bin,
        }
    }
}

/// Dump range accepted on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum RangeArg {
    Data,
    Instr,
    All,
}

impl From<RangeArg> for DumpRange {
    fn from(arg: RangeArg) -> Self {
        match arg {
            RangeArg::Data => Self::Data,
            RangeArg::Instr => Self::Instr,
            RangeArg::All => Self::All,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a program until every warp-group halts.
    Run {
        /// Program image, one instruction word per line.
        #[arg(short, long)]
        program: PathBuf,

        /// Digit format of the program image.
        #[arg(long, value_enum, default_value_t = FormatArg::Hex)]
        format: FormatArg,

        /// Load address of the program; defaults to the configured start PC.
        #[arg(long, value_parser = parse_addr)]
        base: Option<u32>,

        /// Data image(s) in dump format, loaded after the program.
        #[arg(short, long)]
        data: Vec<PathBuf>,

        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Cycle budget; overrides the configuration.
        #[arg(long)]
        max_cycles: Option<u64>,

        /// Write the memory dump to this file.
        #[arg(long)]
        dump: Option<PathBuf>,

        /// Address range included in the dump.
        #[arg(long, value_enum, default_value_t = RangeArg::Data)]
        dump_range: RangeArg,

        /// Include words that were stored as zero.
        #[arg(long)]
        dump_zeros: bool,

        /// Print the register file of every live warp.
        #[arg(long)]
        regs: bool,

        /// Statistics sections to print (summary, frontend, backend, memory); all by default.
        #[arg(long)]
        stats: Vec<String>,
    },

    /// Print a program image as assembly.
    Disasm {
        /// Program image, one instruction word per line.
        #[arg(short, long)]
        program: PathBuf,

        /// Digit format of the program image.
        #[arg(long, value_enum, default_value_t = FormatArg::Hex)]
        format: FormatArg,

        /// Address of the first word.
        #[arg(long, value_parser = parse_addr, default_value = "0x1000")]
        base: u32,
    },
}

/// Parses a decimal or `0x`-prefixed hexadecimal address.
fn parse_addr(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address `{s}`: {e}"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            program,
            format,
            base,
            data,
            config,
            max_cycles,
            dump,
            dump_range,
            dump_zeros,
            regs,
            stats,
        } => {
            let run = RunArgs {
                program,
                format: format.into(),
                base,
                data,
                config,
                max_cycles,
                dump,
                dump_options: DumpOptions {
                    range: dump_range.into(),
                    stored_zeros: dump_zeros,
                },
                regs,
                stats,
            };
            cmd_run(&run)
        }
        Commands::Disasm {
            program,
            format,
            base,
        } => cmd_disasm(&program, format.into(), base),
    };

    if let Err(e) = result {
        eprintln!("\n[!] FATAL: {e}");
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("    caused by: {cause}");
            source = cause.source();
        }
        process::exit(1);
    }
}

/// Options of the `run` subcommand.
#[derive(Debug)]
struct RunArgs {
    program: PathBuf,
    format: ImageFormat,
    base: Option<u32>,
    data: Vec<PathBuf>,
    config: Option<PathBuf>,
    max_cycles: Option<u64>,
    dump: Option<PathBuf>,
    dump_options: DumpOptions,
    regs: bool,
    stats: Vec<String>,
}

/// Errors surfaced by the CLI.
#[derive(Debug)]
enum CliError {
    Sim(SimError),
    Io(PathBuf, io::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sim(e) => write!(f, "{e}"),
            Self::Io(path, e) => write!(f, "{}: {e}", path.display()),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sim(e) => e.source(),
            Self::Io(_, e) => Some(e),
        }
    }
}

impl From<SimError> for CliError {
    fn from(e: SimError) -> Self {
        Self::Sim(e)
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, CliError> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = fs::read_to_string(path).map_err(|e| CliError::Io(path.to_path_buf(), e))?;
    Config::from_json(&text).map_err(|e| CliError::Sim(e.into()))
}

/// Loads the images, runs to halt, and reports.
fn cmd_run(args: &RunArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let mut sim = Simulator::new(&config)?;
    if let Some(max) = args.max_cycles {
        sim.set_max_cycles(max);
    }

    let base = args.base.unwrap_or(config.general.start_pc);
    let words = sim.load_program_file(&args.program, args.format, base)?;
    info!(words, base = format_args!("{base:#x}"), program = %args.program.display(), "program loaded");
    for path in &args.data {
        let loaded = sim.load_data_file(path)?;
        info!(words = loaded, data = %path.display(), "data loaded");
    }

    println!(
        "[*] {} warps, {:?} scheduling, start PC {:#x}",
        config.general.warp_count, config.scheduler.policy, config.general.start_pc
    );
    let run = sim.run_until_halt();
    sim.stats().print_sections(&args.stats);
    let cycles = run?;
    println!("\n[*] Halted after {cycles} cycles");

    if args.regs {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        sim.dump_registers(&mut out)
            .map_err(|e| CliError::Io(PathBuf::from("<stdout>"), e))?;
    }

    if let Some(path) = &args.dump {
        let io_err = |e| CliError::Io(path.clone(), e);
        let mut out = BufWriter::new(File::create(path).map_err(io_err)?);
        sim.dump_memory(&mut out, &args.dump_options).map_err(io_err)?;
        out.flush().map_err(io_err)?;
        println!("[*] Memory dump written to {}", path.display());
    }
    Ok(())
}

/// Prints every word of a program image with its address.
fn cmd_disasm(program: &Path, format: ImageFormat, base: u32) -> Result<(), CliError> {
    let text = fs::read_to_string(program).map_err(|e| CliError::Io(program.to_path_buf(), e))?;
    let words = loader::parse_program(&text, format).map_err(|e| CliError::Sim(e.into()))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (i, (_, raw)) in words.into_iter().enumerate() {
        let pc = base.wrapping_add(i as u32 * 4);
        writeln!(out, "{pc:#010x}:  {raw:08x}  {}", decode(raw))
            .map_err(|e| CliError::Io(PathBuf::from("<stdout>"), e))?;
    }
    Ok(())
}
