use std::path::PathBuf;

use clap::{AppSettings, Parser};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info};
use vec1::Vec1;

use time2d::{
    read::{parse_run_date, ListingReader},
    UnionConfig, Unionizer,
};

#[derive(Parser)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(disable_help_subcommand = true)]
#[clap(infer_long_args = true)]
struct Args {
    /// JSON listings of each partition's run times. Later listings override
    /// earlier ones for any run they share.
    listings: Vec<PathBuf>,

    /// Extra reference dates that belong to the collection, e.g.
    /// "2014-11-22T06:00:00 UTC". Runs that no listing mentions get no
    /// forecast times.
    #[clap(short, long, multiple_values(true))]
    runtimes: Option<Vec<String>>,

    /// Don't list every (run, forecast time) pair.
    #[clap(long)]
    no_vals: bool,

    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv). The default is to print only high-level information.
    #[clap(short, long, parse(from_occurrences))]
    verbosity: u8,

    /// Disable progress bars.
    #[clap(long)]
    no_progress_bars: bool,
}

fn main() {
    if let Err(e) = try_main() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logging(args.verbosity);

    let listings = Vec1::try_from_vec(args.listings).map_err(|_| "Supply at least one listing")?;
    let runtimes = args
        .runtimes
        .unwrap_or_default()
        .iter()
        .map(|s| parse_run_date(s))
        .collect::<Result<Vec<_>, _>>()?;

    let progress = ProgressBar::with_draw_target(
        Some(listings.len() as _),
        if args.no_progress_bars {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stdout()
        },
    )
    .with_style(
        ProgressStyle::default_bar()
            .template("{msg:17}: [{wide_bar:.blue}] {pos:2}/{len:2} listings ({elapsed_precise}<{eta_precise})")?
            .progress_chars("=> "),
    )
    .with_message("Reading");
    progress.tick();

    let first = ListingReader::new(listings.first())?;
    let config = UnionConfig::new(first.partition.is_interval)
        .with_time_unit(first.unit)
        .with_code(first.code)
        .with_make_vals(!args.no_vals);
    info!(
        "Merging {} listings of {} ({})",
        listings.len(),
        if config.is_interval {
            "intervals"
        } else {
            "offsets"
        },
        config.time_unit
    );

    let mut union = Unionizer::new(config);
    union.absorb(&first.partition)?;
    progress.inc(1);
    for listing in listings.iter().skip(1) {
        let reader = ListingReader::new(listing)?;
        union
            .absorb(&reader.partition)
            .map_err(|e| format!("{}: {e}", listing.display()))?;
        progress.inc(1);
    }
    progress.finish_and_clear();

    debug!("{} runs absorbed", union.n_runs());
    union.declare_runtimes(runtimes);

    let merged = union.build();
    info!(
        "{} runs merged into a {} time2D",
        merged.n_runs(),
        merged.shape().name()
    );
    println!("{merged}");

    Ok(())
}

fn setup_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stdout);
    builder.format_target(false);
    match verbosity {
        0 => builder.filter_level(log::LevelFilter::Info),
        1 => builder.filter_level(log::LevelFilter::Debug),
        2 => builder.filter_level(log::LevelFilter::Trace),
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
            builder.format(|buf, record| {
                use std::io::Write;

                let timestamp = buf.timestamp();
                let level = record.level();
                let target = record.target();
                let line = record.line().unwrap_or(0);
                let message = record.args();

                writeln!(buf, "[{timestamp} {level} {target}:{line}] {message}")
            })
        }
    };
    builder.init();
}
