// Licensed under the Apache-2.0 license

use clap::{ArgAction, Parser, Subcommand};
use hwacc_registers_descriptor::config::DEFAULT_BUS_KIND;
use hwacc_registers_generator::config::DEFAULT_OUTPUT;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;

mod reg_api_gen;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Xtask {
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    xtask: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the register setting API of an HLS accelerator
    RegApi {
        /// HLS IP descriptor, usually <solution>/impl/ip/auxiliary.xml
        input: PathBuf,

        /// Definitions file; the header is written next to it with a .h extension
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Include debug printf in the generated accessors
        #[arg(short, long, default_value_t = false)]
        debug: bool,

        /// Bus kind of the register interface
        #[arg(long, default_value = DEFAULT_BUS_KIND)]
        bus: String,

        /// Extra prefix to strip from original argument names (repeatable)
        #[arg(long = "strip-prefix", value_name = "PREFIX")]
        strip_prefixes: Vec<String>,

        /// Do not strip the default `arg_` prefix
        #[arg(long, default_value_t = false)]
        no_default_strip: bool,

        /// Fail if the files on disk differ from what would be generated
        #[arg(long, default_value_t = false)]
        check: bool,
    },
}

fn main() {
    let cli = Xtask::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Failed to initialize logger: {e}");
    }

    let result = match &cli.xtask {
        Commands::RegApi {
            input,
            output,
            debug,
            bus,
            strip_prefixes,
            no_default_strip,
            check,
        } => reg_api_gen::generate(&reg_api_gen::RegApiArgs {
            input,
            output,
            debug: *debug,
            bus,
            strip_prefixes,
            no_default_strip: *no_default_strip,
            check: *check,
        }),
    };
    result.unwrap_or_else(|e| {
        eprintln!("{:#}", e);
        std::process::exit(-1);
    });
}
