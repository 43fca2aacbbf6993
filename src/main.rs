use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use qcircuit_render::{Config, DEFAULT_BASENAME, OutputFormat, RenderRequest, Renderer, Toolchain};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

#[derive(Parser)]
#[clap(version, about)]
struct Args {
    /// File with the circuit rows; pass '-' or nothing to read stdin
    input: Option<PathBuf>,

    /// Base name for the generated files
    #[clap(short, long, default_value = DEFAULT_BASENAME)]
    name: String,

    /// Output image format (png or svg)
    #[clap(short, long, default_value = "png", value_parser = OutputFormat::from_str)]
    format: OutputFormat,

    /// Directory the files are generated in
    #[clap(short = 'C', long, default_value = ".")]
    directory: PathBuf,

    /// TOML file with the tool commands and the raster density
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Raster density in DPI for PNG output (overrides the config file)
    #[clap(long)]
    density: Option<u32>,

    /// Log to './output.log'
    ///
    /// (may help troubleshooting rendering issues).
    #[clap(short, long)]
    log: bool,

    /// Log debug messages too
    #[clap(short, long)]
    verbose: bool,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Report which of the configured tools cannot be found on the PATH
    Check,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = setup_logging(args.log, args.verbose) {
        eprintln!("Failed to set up logging: {e:#}");
        process::exit(2);
    }
    log::debug!(
        "{} version {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let result = match args.command {
        Some(Command::Check) => run_check(&args),
        None => run_render(&args),
    };

    if let Err(e) = result {
        log::error!("{e:#}");
        process::exit(1);
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(density) = args.density {
        config.density = density;
    }

    Ok(config)
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read circuit code from {}", path.display())),
        _ => io::read_to_string(io::stdin()).context("Failed to read circuit code from stdin"),
    }
}

fn run_render(args: &Args) -> Result<()> {
    let code = read_input(args.input.as_deref())?;
    let renderer = Renderer::new(&load_config(args)?)?.with_workdir(&args.directory);
    let request = RenderRequest::new(code)
        .with_name(args.name.as_str())
        .with_format(args.format);

    renderer.render(&request)?;

    // Stdout carries nothing but the artifact path, so it can be piped.
    println!("{}", renderer.output_path(&request).display());

    Ok(())
}

fn run_check(args: &Args) -> Result<()> {
    let toolchain = Toolchain::from_config(&load_config(args)?)?;

    let missing = toolchain.missing_tools();
    if !missing.is_empty() {
        bail!("cannot find: {}", missing.join(", "));
    }
    log::info!("All render tools are available");

    Ok(())
}

fn setup_logging(log_to_file: bool, verbose: bool) -> Result<()> {
    use log::LevelFilter;
    use log4rs::append::console::{ConsoleAppender, Target};
    use log4rs::append::file::FileAppender;
    use log4rs::filter::threshold::ThresholdFilter;

    use log4rs::config::{Appender, Config, Root};
    use log4rs::encode::pattern::PatternEncoder;

    // Whatever you do, DO NOT log to stdout. Stdout is only for the output path
    let log_std_err = ConsoleAppender::builder().target(Target::Stderr).build();
    let mut config_builder = Config::builder().appender({
        let log_level = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };

        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(log_level)))
            .build("logstderr", Box::new(log_std_err))
    });

    if log_to_file {
        let logfile = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{l} - {m}\n")))
            .build("output.log")?;
        config_builder =
            config_builder.appender(Appender::builder().build("logfile", Box::new(logfile)));
    }

    let mut root_builder = Root::builder();
    root_builder = root_builder.appender("logstderr");
    if log_to_file {
        root_builder = root_builder.appender("logfile");
    }

    let config = config_builder.build(root_builder.build(LevelFilter::Debug))?;
    log4rs::init_config(config)?;

    Ok(())
}
