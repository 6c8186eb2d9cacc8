use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use parkmatch_import::{
    load_dataset, load_many, write_report, RunProfile, ACCESSPARK_SCHEMA, GOPASS_SCHEMA,
};
use parkmatch_recon::{reconcile, summarize};

/// Reconciles ACCESSPARK access-control exports against a GOPASS payment
/// export by fuzzy time-tolerant plate/timestamp matching.
#[derive(Debug, Parser)]
#[command(name = "parkmatch", version)]
struct Args {
    /// ACCESSPARK CSV export(s); several files are concatenated.
    #[arg(long = "accesspark", required = true, num_args = 1..)]
    accesspark: Vec<PathBuf>,

    /// GOPASS CSV export.
    #[arg(long = "gopass")]
    gopass: PathBuf,

    /// Directory for the two annotated output files.
    #[arg(long = "out-dir", default_value = ".")]
    out_dir: PathBuf,

    /// Optional TOML run profile (tolerance, delimiters).
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Tolerance window in minutes; overrides the profile.
    #[arg(long)]
    tolerance: Option<i64>,

    /// Emit the run summary as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> Result<()> {
    let mut profile = match &args.profile {
        Some(path) => RunProfile::load(path)
            .with_context(|| format!("failed to load profile {}", path.display()))?,
        None => RunProfile::default(),
    };
    if let Some(tolerance) = args.tolerance {
        profile.tolerance_minutes = tolerance;
    }
    profile.validate()?;

    let accesspark_delim = profile.accesspark_delimiter_byte()?;
    let gopass_delim = profile.gopass_delimiter_byte()?;

    let mut accesspark_files = Vec::with_capacity(args.accesspark.len());
    for path in &args.accesspark {
        let file =
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        accesspark_files.push(file);
    }
    let accesspark = load_many(accesspark_files, &ACCESSPARK_SCHEMA, accesspark_delim)
        .context("failed to load ACCESSPARK export(s)")?;

    let gopass_file = File::open(&args.gopass)
        .with_context(|| format!("cannot open {}", args.gopass.display()))?;
    let gopass = load_dataset(gopass_file, &GOPASS_SCHEMA, gopass_delim)
        .context("failed to load GOPASS export")?;

    tracing::info!(
        accesspark_rows = accesspark.len(),
        gopass_rows = gopass.len(),
        tolerance_minutes = profile.tolerance_minutes,
        "starting reconciliation"
    );

    let (accesspark, gopass) = reconcile(accesspark, gopass, profile.tolerance_minutes);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("cannot create {}", args.out_dir.display()))?;

    let accesspark_out = args.out_dir.join("accesspark_validado.csv");
    let gopass_out = args.out_dir.join("gopass_validado.csv");
    write_report(File::create(&accesspark_out)?, &accesspark, accesspark_delim)
        .with_context(|| format!("failed to write {}", accesspark_out.display()))?;
    write_report(File::create(&gopass_out)?, &gopass, gopass_delim)
        .with_context(|| format!("failed to write {}", gopass_out.display()))?;

    let summary = summarize(&accesspark, &gopass);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for s in [&summary.accesspark, &summary.gopass] {
            println!(
                "{}: {} registros, {} encontrados ({:.1}%), {} no encontrados",
                s.source, s.total, s.matched, s.matched_pct, s.unmatched
            );
        }
        println!(
            "Resultados: {} / {}",
            accesspark_out.display(),
            gopass_out.display()
        );
    }

    Ok(())
}
