//! Selenographic coordinates of a slit offset from a lunar feature
//!
//! Steps through four synchronized Horizons tables (target, lunar center,
//! equator reference point, pole reference point) and prints, for every
//! step, where the slit points on the sky and which selenographic point lies
//! under it.
//!
//! Usage:
//!   cargo run --bin lunar_coords -- --target moon.txt --center center.txt \
//!       --equator equator.txt --pole pole.txt --feature Tycho --origin "N limb" --ns 2
//!   cargo run --bin lunar_coords -- --date 2015-03-20 --feature "Mare Crisium"

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use clap::{ArgAction, Parser};
use serde::Serialize;

use selenofield::catalogs::MOON_CENTER;
use selenofield::data::{fetch_ephemeris_cached, get_cache_dir, HorizonsQuery};
use selenofield::ephemeris::{ColumnLayout, EphemerisSet, HorizonsReader};
use selenofield::{
    GeometryConfig, OriginSpec, SkyPosition, SpectralLine, SpectralLineModel, SurfaceFeatureCatalog,
    SurfacePoint,
};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

type FileReader = HorizonsReader<BufReader<File>>;

/// Lunar slit coordinate tool
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Computes selenographic coordinates of a slit offset from a lunar feature",
    long_about = None
)]
struct Args {
    /// Observer table of the Moon
    #[arg(long)]
    target: Option<PathBuf>,

    /// Position table of the lunar center
    #[arg(long)]
    center: Option<PathBuf>,

    /// Position table of the (0E, 0N) reference point
    #[arg(long)]
    equator: Option<PathBuf>,

    /// Position table of the north pole reference point
    #[arg(long)]
    pole: Option<PathBuf>,

    /// Observation dates (YYYY-MM-DD) to fetch from Horizons instead of reading files
    #[arg(long, value_delimiter = ',', conflicts_with = "target")]
    date: Vec<NaiveDate>,

    /// Directory for fetched tables
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Feature the offsets are measured from
    #[arg(long, default_value = MOON_CENTER)]
    feature: String,

    /// Offset origin: crater, or N/S/E/W followed by limb, aperture or eyepiece
    #[arg(long, default_value = "crater")]
    origin: String,

    /// East-west offset in seconds of time
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    ew: f64,

    /// North-south offset in arcminutes
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    ns: f64,

    /// Slit field of view in arcseconds
    #[arg(long, default_value_t = 10.0)]
    fov: f64,

    /// Also report the solar line depth (Na or K)
    #[arg(long)]
    line: Option<SpectralLine>,

    /// JSON file overriding geometry parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print one JSON object per step
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// List the catalog features and exit
    #[arg(long, action = ArgAction::SetTrue)]
    list_features: bool,
}

/// Result of one time step
#[derive(Debug, Serialize)]
struct StepReport {
    step: usize,
    epoch: Option<NaiveDateTime>,
    center: SkyPosition,
    fov: Option<SkyPosition>,
    surface: Option<SurfacePoint>,
    line_depth: Option<f64>,
}

fn open_files(args: &Args) -> Result<EphemerisSet<FileReader>> {
    let path = |p: &Option<PathBuf>, name: &str| -> Result<PathBuf> {
        p.clone()
            .ok_or_else(|| format!("missing --{} table", name).into())
    };

    Ok(EphemerisSet::new(
        HorizonsReader::from_path(path(&args.target, "target")?, ColumnLayout::observer_table())?,
        HorizonsReader::from_path(path(&args.center, "center")?, ColumnLayout::axis_table())?,
        HorizonsReader::from_path(path(&args.equator, "equator")?, ColumnLayout::axis_table())?,
        HorizonsReader::from_path(path(&args.pole, "pole")?, ColumnLayout::axis_table())?,
    ))
}

fn fetch_tables(dates: &[NaiveDate], cache_dir: &Path) -> Result<EphemerisSet<FileReader>> {
    let open = |query: HorizonsQuery| -> Result<FileReader> {
        let path = fetch_ephemeris_cached(&query, dates, cache_dir)?;
        Ok(HorizonsReader::from_path(path, query.layout())?)
    };

    Ok(EphemerisSet::new(
        open(HorizonsQuery::Target)?,
        open(HorizonsQuery::Center)?,
        open(HorizonsQuery::equator())?,
        open(HorizonsQuery::pole())?,
    ))
}

fn print_report(report: &StepReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
        return Ok(());
    }

    let epoch = report
        .epoch
        .map(|e| e.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| format!("step {}", report.step));
    print!(
        "{}  center RA {:.6} Dec {:.6}",
        epoch, report.center.ra_deg, report.center.dec_deg
    );
    if let Some(fov) = &report.fov {
        print!("  FOV RA {:.6} Dec {:.6}", fov.ra_deg, fov.dec_deg);
    }
    if let Some(point) = &report.surface {
        print!(
            "  lon {:.4} lat {:.4} alt {:.2} km",
            point.longitude_deg, point.latitude_deg, point.altitude_km
        );
    }
    if let Some(depth) = report.line_depth {
        print!("  depth {:.4}", depth);
    }
    println!();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let catalog = SurfaceFeatureCatalog::default();

    if args.list_features {
        for name in catalog.names() {
            let (lon, lat) = catalog.coordinates(name)?;
            println!("{:<24} {:>8.2} {:>8.2}", name, lon, lat);
        }
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => GeometryConfig::from_json_file(path)?,
        None => GeometryConfig::default(),
    };
    let origin: OriginSpec = args.origin.parse()?;
    catalog.lookup(&args.feature)?;
    let model = SpectralLineModel::new();

    let mut tables = if args.date.is_empty() {
        open_files(&args)?
    } else {
        let cache_dir = args.cache_dir.clone().unwrap_or_else(get_cache_dir);
        fetch_tables(&args.date, &cache_dir)?
    };

    let mut step = 0;
    let mut skipped = 0;
    loop {
        step += 1;
        let outcome = tables.samples().and_then(|samples| {
            let frame = samples.frame(&catalog, &config)?;
            let sample = frame.sample();
            let mut report = StepReport {
                step,
                epoch: sample.epoch,
                center: SkyPosition::new(sample.ra_deg, sample.dec_deg),
                fov: None,
                surface: None,
                line_depth: None,
            };

            // The center itself has no slit position to report
            if args.feature != MOON_CENTER {
                let fov = frame.fov_position(&origin, &args.feature, args.ew, args.ns, args.fov)?;
                report.surface = Some(frame.surface_of(fov.ra_deg, fov.dec_deg));
                report.fov = Some(fov);
            }
            if let Some(line) = args.line {
                report.line_depth = Some(frame.line_depth(&model, line)?);
            }
            Ok(report)
        });

        match outcome {
            Ok(report) => print_report(&report, args.json)?,
            Err(e) => {
                skipped += 1;
                eprintln!("Step {} skipped: {}", step, e);
            }
        }

        if !tables.advance()? {
            break;
        }
    }

    if skipped > 0 {
        eprintln!("{} of {} steps skipped", skipped, step);
    }
    Ok(())
}
