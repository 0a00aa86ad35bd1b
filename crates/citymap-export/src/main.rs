//! District map batch exporter.
//!
//! Generates the world map from the reference configuration (or a JSON
//! config file) and writes the artifact that static consumers load.
//! Runs entirely offline: no rendering, no networking.
//!
//! Usage:
//!   cargo run -p citymap-export
//!   cargo run -p citymap-export -- --no-timestamp --out /tmp/map.json
//!   cargo run -p citymap-export -- --check --verbose
//!   cargo run -p citymap-export -- --compare dumped-from-renderer.json

mod check;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use citymap_logic::artifact::{ArtifactError, WorldMapArtifact};
use citymap_logic::diff::diff_artifacts;
use citymap_logic::{generate_world, GenerateError, WorldConfig, WorldMap};
use log::{LevelFilter, Log, Metadata, Record};
use thiserror::Error;

const DEFAULT_OUT: &str = "data/district-map.json";

const USAGE: &str = "usage: citymap-export [--config <path>] [--out <path>] \
[--timestamp <iso> | --no-timestamp] [--compare <path>] [--check] [--verbose | --quiet]";

// ── Errors ──────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
enum ExportError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {}", .path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error("{0} self-check(s) failed")]
    ChecksFailed(usize),
    #[error("artifacts differ in {0} tile key(s)")]
    ArtifactsDiffer(usize),
}

#[derive(Debug, PartialEq, Eq, Error)]
enum UsageError {
    #[error("{0} expects a value")]
    MissingValue(String),
    #[error("unknown argument {0:?}")]
    UnknownArgument(String),
    #[error("--timestamp and --no-timestamp are mutually exclusive")]
    ConflictingTimestamp,
    #[error("--verbose and --quiet are mutually exclusive")]
    ConflictingVerbosity,
}

// ── Arguments ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Stamp {
    Now,
    Fixed(String),
    Omit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    config: Option<PathBuf>,
    out: PathBuf,
    stamp: Stamp,
    compare: Option<PathBuf>,
    check: bool,
    log_level: LevelFilter,
    help: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            config: None,
            out: PathBuf::from(DEFAULT_OUT),
            stamp: Stamp::Now,
            compare: None,
            check: false,
            log_level: LevelFilter::Info,
            help: false,
        }
    }
}

impl Args {
    fn parse(mut argv: impl Iterator<Item = String>) -> Result<Self, UsageError> {
        let mut args = Args::default();
        let (mut verbose, mut quiet, mut no_stamp) = (false, false, false);
        let mut fixed_stamp = None;

        while let Some(arg) = argv.next() {
            let mut value = || argv.next().ok_or_else(|| UsageError::MissingValue(arg.clone()));
            match arg.as_str() {
                "--config" => args.config = Some(PathBuf::from(value()?)),
                "--out" => args.out = PathBuf::from(value()?),
                "--timestamp" => fixed_stamp = Some(value()?),
                "--compare" => args.compare = Some(PathBuf::from(value()?)),
                "--no-timestamp" => no_stamp = true,
                "--check" => args.check = true,
                "--verbose" => verbose = true,
                "--quiet" => quiet = true,
                "--help" | "-h" => args.help = true,
                _ => return Err(UsageError::UnknownArgument(arg.clone())),
            }
        }

        args.stamp = match (fixed_stamp, no_stamp) {
            (Some(_), true) => return Err(UsageError::ConflictingTimestamp),
            (Some(ts), false) => Stamp::Fixed(ts),
            (None, true) => Stamp::Omit,
            (None, false) => Stamp::Now,
        };
        args.log_level = match (verbose, quiet) {
            (true, true) => return Err(UsageError::ConflictingVerbosity),
            (true, false) => LevelFilter::Debug,
            (false, true) => LevelFilter::Warn,
            (false, false) => LevelFilter::Info,
        };
        Ok(args)
    }
}

// ── Logging ─────────────────────────────────────────────────────────────

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

// ── Timestamp ───────────────────────────────────────────────────────────

/// Format milliseconds since the Unix epoch as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
fn format_iso8601(millis: u64) -> String {
    let secs = millis / 1000;
    let (year, month, day) = days_to_ymd(secs / 86400);
    let time_of_day = secs % 86400;
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        year,
        month,
        day,
        time_of_day / 3600,
        (time_of_day % 3600) / 60,
        time_of_day % 60,
        millis % 1000
    )
}

/// Convert days since Unix epoch to (year, month, day).
fn days_to_ymd(days: u64) -> (u64, u64, u64) {
    // Howard Hinnant's civil_from_days.
    let z = days + 719468;
    let era = z / 146097;
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = yoe + era * 400 + u64::from(m <= 2);
    (y, m, d)
}

fn now_iso8601() -> String {
    // A clock before 1970 is stamped as the epoch.
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    format_iso8601(millis)
}

// ── Pipeline ────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<WorldConfig, ExportError> {
    let Some(path) = path else {
        log::debug!("using reference config");
        return Ok(WorldConfig::reference());
    };
    let text = fs::read_to_string(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_json::from_str(&text).map_err(|source| ExportError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("loaded config from {}", path.display());
    Ok(config)
}

fn print_summary(world: &WorldMap) {
    let grid = world.grid();
    println!(
        "Generated world map ({}x{} grid, {} districts)",
        grid.cols,
        grid.rows,
        world.districts().len()
    );
    println!("  World mask: {} tiles", world.habitable_count());
    for d in world.districts() {
        println!("  {}: {} tiles", d.category, world.district_tiles(&d.category).len());
    }
    println!("  Roads: {} tiles", world.road_count());
    println!("  Water: {} tiles", world.water_count());
    println!("  Road-adjacent: {} tiles", world.road_adjacent_count());
}

fn run_self_check(config: &WorldConfig, world: &WorldMap, verbose: bool) -> Result<(), ExportError> {
    println!("\n=== Self-check ===\n");
    let results = check::run_checks(config, world);
    report_results(&results, verbose)
}

/// Print check results; failures are always shown, passes only when verbose.
fn report_results(results: &[check::TestResult], verbose: bool) -> Result<(), ExportError> {
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;
    for r in results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }
    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed,
        results.len(),
        failed
    );

    if failed > 0 {
        return Err(ExportError::ChecksFailed(failed));
    }
    Ok(())
}

fn compare_with(path: &Path, ours: &WorldMapArtifact) -> Result<(), ExportError> {
    let text = fs::read_to_string(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let theirs = WorldMapArtifact::from_json(&text)?;
    let diff = diff_artifacts(ours, &theirs);

    println!("\nComparing with {}", path.display());
    if let Some(((lc, lr), (rc, rr))) = diff.grid_mismatch {
        println!("  grid: {}x{} vs {}x{}", lc, lr, rc, rr);
    }
    for layer in &diff.layers {
        println!(
            "  {}: {} only here, {} only there",
            layer.layer,
            layer.only_left.len(),
            layer.only_right.len()
        );
        for key in layer.only_left.iter().chain(&layer.only_right).take(5) {
            log::debug!("{} differs at {}", layer.layer, key);
        }
    }

    if diff.is_identical() {
        println!("  identical");
        Ok(())
    } else {
        Err(ExportError::ArtifactsDiffer(diff.differing_keys()))
    }
}

fn write_artifact(path: &Path, artifact: &WorldMapArtifact) -> Result<usize, ExportError> {
    let json = artifact.to_json()?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| ExportError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, &json).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(json.len())
}

fn run(args: &Args) -> Result<(), ExportError> {
    let config = load_config(args.config.as_deref())?;
    let world = generate_world(&config)?;
    print_summary(&world);

    if args.check {
        run_self_check(&config, &world, args.log_level >= LevelFilter::Debug)?;
    }

    let generated_at = match &args.stamp {
        Stamp::Now => Some(now_iso8601()),
        Stamp::Fixed(ts) => Some(ts.clone()),
        Stamp::Omit => None,
    };
    let artifact = world.to_artifact(generated_at);

    if let Some(path) = &args.compare {
        compare_with(path, &artifact)?;
    }

    let bytes = write_artifact(&args.out, &artifact)?;
    println!(
        "\nWrote {} ({:.1} KB)",
        args.out.display(),
        bytes as f64 / 1024.0
    );
    Ok(())
}

fn report(err: &dyn std::error::Error) {
    eprintln!("error: {}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }
}

fn main() {
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}\n{}", e, USAGE);
            std::process::exit(2);
        }
    };
    if args.help {
        println!("{}", USAGE);
        return;
    }

    init_logging(args.log_level);
    if let Err(e) = run(&args) {
        report(&e);
        std::process::exit(1);
    }
}
