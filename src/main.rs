use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use horizons_telnet::{
    config::{HorizonsConfig, LineEnding},
    dialogue::DialogueDriver,
    ephemeris::{parse_ra_dec, parse_vectors},
    horizons_errors::HorizonsError,
    table_output::{ra_dec_rows, vector_rows, write_table_csv, write_text_file},
    time::calendar_to_jd,
};

/// Fetch ephemerides from the JPL Horizons telnet service.
#[derive(Parser, Debug)]
#[command(name = "horizons-telnet", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<Utf8PathBuf>,

    /// Override the Horizons host
    #[arg(long, global = true)]
    host: Option<String>,

    /// Override the Horizons port
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Terminate replies with CR LF instead of LF
    #[arg(long, global = true)]
    crlf: bool,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Geocentric astrometric RA/Dec table over a date span
    Radec(RadecArgs),
    /// Barycentric state vectors at a list of julian days
    Vectors(VectorsArgs),
}

#[derive(Args, Debug)]
struct RadecArgs {
    #[arg(long, default_value = "C/2012 S1")]
    body: String,

    /// First date, YYYY-M-D
    #[arg(long, default_value = "2000-1-1")]
    start: String,

    /// Last date, YYYY-M-D
    #[arg(long, default_value = "2021-1-1")]
    end: String,

    /// Horizons step, e.g. 1d, 6h, 10m
    #[arg(long, default_value = "1d")]
    interval: String,

    #[arg(long, default_value = "ison-ephem.csv")]
    output: Utf8PathBuf,
}

#[derive(Args, Debug)]
struct VectorsArgs {
    #[arg(long)]
    body: String,

    /// Requested epoch (TDB julian day); repeat for several epochs
    #[arg(long = "jd", required = true)]
    jds: Vec<f64>,

    /// Width of the window requested after each epoch
    #[arg(long, default_value_t = 1.0)]
    margin_secs: f64,

    #[arg(long, default_value = "vectors.csv")]
    output: Utf8PathBuf,

    /// Dump the raw text received for each epoch to DIR/txt<i>
    #[arg(long, value_name = "DIR")]
    transcripts: Option<Utf8PathBuf>,
}

fn init_cli_logger(verbose: bool) {
    let default = if verbose {
        "horizons_telnet=debug,info"
    } else {
        "horizons_telnet=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

fn load_config(cli: &Cli) -> Result<HorizonsConfig, HorizonsError> {
    let mut config = match &cli.config {
        Some(path) => HorizonsConfig::from_toml_file(path)?,
        None => HorizonsConfig::default(),
    };
    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if cli.crlf {
        config.line_ending = LineEnding::CrLf;
    }
    config.validate()?;
    Ok(config)
}

fn run_radec(driver: &DialogueDriver, args: &RadecArgs) -> Result<ExitCode, HorizonsError> {
    let jd_start = calendar_to_jd(&args.start)?;
    let jd_end = calendar_to_jd(&args.end)?;

    let block = driver.fetch_ra_dec(&args.body, jd_start, jd_end, &args.interval)?;
    let series = parse_ra_dec(&block)?;

    let rows = ra_dec_rows(&series);
    for row in &rows {
        println!("{:.6} {:.6} {:.6}", row.jd, row.ra, row.dec);
    }
    write_table_csv(&args.output, &rows)?;
    info!(samples = rows.len(), output = %args.output, "RA/Dec table written");
    Ok(ExitCode::SUCCESS)
}

fn run_vectors(driver: &DialogueDriver, args: &VectorsArgs) -> Result<ExitCode, HorizonsError> {
    let fetch = driver.fetch_series(&args.body, &args.jds, args.margin_secs)?;

    if let Some(dir) = &args.transcripts {
        std::fs::create_dir_all(dir)?;
        for epoch in &fetch.blocks {
            let path: Utf8PathBuf = dir.join(format!("txt{}", epoch.index));
            write_text_file(&path, &epoch.transcript)?;
        }
    }

    let mut failed: Vec<usize> = fetch.failed_indices();
    let mut rows = Vec::new();
    for epoch in &fetch.blocks {
        match parse_vectors(&epoch.block) {
            Ok(series) => rows.extend(vector_rows(epoch.index, &series)),
            Err(err) => {
                error!(index = epoch.index, jd = epoch.jd, %err, "unreadable vectors table");
                failed.push(epoch.index);
            }
        }
    }
    write_table_csv(&args.output, &rows)?;
    info!(samples = rows.len(), output = %args.output, "vectors table written");

    if failed.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    failed.sort_unstable();
    for failure in &fetch.failures {
        eprintln!(
            "epoch #{} (JD {}) failed: {}",
            failure.index, failure.jd, failure.error
        );
    }
    eprintln!("{} of {} epochs failed: {:?}", failed.len(), fetch.requested, failed);
    Ok(ExitCode::from(2))
}

fn run(cli: &Cli) -> Result<ExitCode, HorizonsError> {
    let driver = DialogueDriver::new(load_config(cli)?);
    match &cli.command {
        Command::Radec(args) => run_radec(&driver, args),
        Command::Vectors(args) => run_vectors(&driver, args),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_cli_logger(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            error!(%err, "horizons-telnet failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod main_test {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "horizons-telnet",
            "--host",
            "127.0.0.1",
            "--port",
            "7000",
            "--crlf",
            "vectors",
            "--body",
            "GALEX",
            "--jd",
            "2454156.5",
            "--jd",
            "2454157.5",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 7000);
        assert_eq!(config.line_ending, LineEnding::CrLf);

        let Command::Vectors(args) = cli.command else {
            panic!("expected the vectors subcommand");
        };
        assert_eq!(args.jds, vec![2454156.5, 2454157.5]);
        assert_eq!(args.margin_secs, 1.0);
    }

    #[test]
    fn test_radec_defaults() {
        let cli = Cli::parse_from(["horizons-telnet", "radec"]);
        let Command::Radec(args) = cli.command else {
            panic!("expected the radec subcommand");
        };
        assert_eq!(args.body, "C/2012 S1");
        assert_eq!(args.output, Utf8PathBuf::from("ison-ephem.csv"));
    }
}
