use clap::{ArgAction, Parser, ValueEnum};
use log::debug;
use motodis::{
    add_reference_symbols, add_reference_symbols_dsp, generate_dsp_listing, generate_listing,
    generate_tos_listing, parse_hex, parse_tos, scan_dsp, scan_m68k, CpuVariant, DecodeSettings,
    LabelOptions, ListingLine, ListingOptions, SymbolTable,
};
use std::process;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    /// Atari TOS program with symbols and debug line info
    Tos,
    /// Raw binary image
    Bin,
    /// Hex digits given on the command line
    Hex,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Arch {
    M68k,
    Dsp56,
}

/// Disassembler for 68000-68030 and DSP56000 code
#[derive(Parser)]
#[command(name = "motodis", version, about)]
struct Cli {
    /// Input file, or the hex string itself with --format hex
    input: String,

    /// Input format
    #[arg(short, long, value_enum, default_value_t = InputFormat::Tos)]
    format: InputFormat,

    /// Target architecture
    #[arg(short, long, value_enum, default_value_t = Arch::M68k)]
    arch: Arch,

    /// CPU variant for 68k instruction decoding
    #[arg(short, long, default_value = "68000")]
    cpu: String,

    /// Load address for bin and hex input (decimal, 0x or $ hex)
    #[arg(long, value_parser = parse_address, default_value = "0")]
    base: u32,

    /// Show address and opcode columns
    #[arg(long)]
    address: bool,

    /// Show 68000 cycle estimates
    #[arg(long)]
    timings: bool,

    /// Prefix for generated labels
    #[arg(long, default_value = "L")]
    label_prefix: String,

    /// Number of the first generated label
    #[arg(long, default_value_t = 0)]
    label_start: u32,

    /// Use uppercase mnemonics (MOVE instead of move)
    #[arg(long)]
    uppercase: bool,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_address(s: &str) -> Result<u32, String> {
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else if let Some(hex) = s.strip_prefix('$') {
        u32::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    parsed.map_err(|e| format!("invalid address '{s}': {e}"))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn fail(msg: String) -> ! {
    eprintln!("{msg}");
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cpu = CpuVariant::from_str(&cli.cpu).unwrap_or_else(|| {
        fail(format!(
            "Unknown CPU variant '{}'. Use: 68000, 68010, 68020, 68030",
            cli.cpu
        ))
    });

    if cli.format == InputFormat::Tos && cli.arch == Arch::Dsp56 {
        fail("TOS input is only supported for --arch m68k".to_string());
    }

    let data = match cli.format {
        InputFormat::Hex => parse_hex(&cli.input)
            .unwrap_or_else(|e| fail(format!("Error parsing hex input: {}", motodis::Error::from(e)))),
        InputFormat::Tos | InputFormat::Bin => std::fs::read(&cli.input)
            .unwrap_or_else(|e| fail(format!("Error reading '{}': {}", cli.input, e))),
    };
    debug!("read {} bytes", data.len());

    let options = ListingOptions {
        show_address: cli.address,
        show_timings: cli.timings,
        uppercase: cli.uppercase,
        cpu,
    };
    let labels = LabelOptions {
        prefix: cli.label_prefix.clone(),
        start: cli.label_start,
    };

    let listing = match cli.format {
        InputFormat::Tos => {
            let program = parse_tos(&data).unwrap_or_else(|e| {
                fail(format!("Error parsing '{}': {}", cli.input, motodis::Error::from(e)))
            });
            generate_tos_listing(&program, &labels, &options)
        }
        InputFormat::Bin | InputFormat::Hex => disassemble_raw(&data, &cli, &labels, &options),
    };

    // Write output
    let output_text: String = listing.iter().map(|l| format!("{}\n", l.text)).collect();

    if let Some(path) = &cli.output {
        if let Err(e) = std::fs::write(path, &output_text) {
            fail(format!("Error writing '{}': {}", path, e));
        }
    } else {
        print!("{output_text}");
    }
}

fn disassemble_raw(
    data: &[u8],
    cli: &Cli,
    labels: &LabelOptions,
    options: &ListingOptions,
) -> Vec<ListingLine> {
    let mut symbols = SymbolTable::new();
    match cli.arch {
        Arch::M68k => {
            let settings = DecodeSettings { cpu: options.cpu };
            let instructions = scan_m68k(data, cli.base, &settings);
            let added = add_reference_symbols(&instructions, labels, &mut symbols);
            debug!("{} instructions, {} labels", instructions.len(), added);
            generate_listing(&instructions, &symbols, None, options)
        }
        Arch::Dsp56 => {
            let instructions = scan_dsp(data, cli.base);
            let added = add_reference_symbols_dsp(&instructions, labels, &mut symbols);
            debug!("{} instructions, {} labels", instructions.len(), added);
            generate_dsp_listing(&instructions, &symbols, options)
        }
    }
}
