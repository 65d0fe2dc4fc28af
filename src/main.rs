use std::path::PathBuf;
use std::process::ExitCode;

use log::{error, info};

use er_reader::algorithm::{
    format_gradient_summary, income_gradient, rank_by_inequality, rates_by_income,
    rates_by_region, regional_spread, top_diseases,
};
use er_reader::{
    CsvReaderConfig, DEFAULT_DATASET_PATH, Dataset, DownloadConfig, RateType, Result, attribution,
    fetch_dataset_blocking, load_dataset,
};

fn main() -> ExitCode {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_usage();
        return ExitCode::SUCCESS;
    };

    let result = match command.as_str() {
        "fetch" => cmd_fetch(&args[1..]),
        "check" => cmd_check(&args[1..]),
        "report" => cmd_report(&args[1..]),
        "rank" => cmd_rank(&args[1..]),
        "top" => cmd_top(&args[1..]),
        other => {
            error!("Unknown command: {other}");
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_fetch(args: &[String]) -> Result<()> {
    let (flags, positional) = split_args(args);
    let mut config = DownloadConfig {
        overwrite: flags.contains(&"--force"),
        ..DownloadConfig::default()
    };
    if let Some(dest) = positional.first() {
        config.dest = PathBuf::from(*dest);
    }

    let report = fetch_dataset_blocking(&config)?;
    if report.skipped {
        info!(
            "Already present: {} ({} bytes); use --force to re-download",
            report.dest.display(),
            report.bytes_written
        );
    } else {
        info!(
            "Fetched {} ({} bytes)",
            report.dest.display(),
            report.bytes_written
        );
    }
    Ok(())
}

fn cmd_check(args: &[String]) -> Result<()> {
    let (flags, positional) = split_args(args);
    let path = dataset_path(positional.first());

    // Keep reading on incompatibilities so the report can describe them
    let config = CsvReaderConfig {
        fail_on_schema_incompatibility: false,
        ..CsvReaderConfig::default()
    };
    let (_, report) = load_dataset(&path, &config)?;

    if flags.contains(&"--json") {
        println!("{}", report.to_json()?);
    } else {
        print!("{report}");
    }
    Ok(())
}

fn cmd_report(args: &[String]) -> Result<()> {
    let (flags, positional) = split_args(args);
    let Some(disease) = positional.first() else {
        return Err(anyhow::anyhow!("usage: er1243 report <disease> [path]").into());
    };
    let rate_type = rate_type_of(&flags);
    let path = dataset_path(positional.get(1));

    let (dataset, _) = load_dataset(&path, &CsvReaderConfig::default())?;
    let income_table = rates_by_income(&dataset);

    match income_gradient(&income_table, disease, rate_type) {
        Some(gradient) => print!("{}", format_gradient_summary(&gradient)),
        None => info!("No income-decile data for {disease} ({rate_type})"),
    }

    let region_table = rates_by_region(&dataset);
    if let Some(spread) = regional_spread(&region_table, disease, rate_type) {
        println!("Regional Spread ({} regions):", spread.regions);
        println!("  Highest: {:.2}%", spread.max_rate);
        println!("  Lowest: {:.2}%", spread.min_rate);
        if let Some(cv) = spread.coefficient_of_variation {
            println!("  Coefficient of Variation: {:.3}", cv);
        }
    }
    Ok(())
}

fn cmd_rank(args: &[String]) -> Result<()> {
    let (flags, positional) = split_args(args);
    let rate_type = rate_type_of(&flags);
    let path = dataset_path(positional.first());

    let (dataset, _) = load_dataset(&path, &CsvReaderConfig::default())?;
    let ranked = rank_by_inequality(&dataset, rate_type);
    if ranked.is_empty() {
        info!("No disease had both extreme income deciles to compare");
        return Ok(());
    }

    println!("Diseases by inequality ratio (D1/D10, {rate_type}):");
    for (position, entry) in ranked.iter().enumerate() {
        println!("  {}. {} ({:.2}x)", position + 1, entry.disease, entry.ratio);
    }
    Ok(())
}

fn cmd_top(args: &[String]) -> Result<()> {
    let (flags, positional) = split_args(args);
    let rate_type = rate_type_of(&flags);

    let (n, path_arg) = match positional.first().and_then(|raw| raw.parse::<usize>().ok()) {
        Some(n) => (n, positional.get(1)),
        None => (10, positional.first()),
    };
    let path = dataset_path(path_arg);

    let (dataset, _) = load_dataset(&path, &CsvReaderConfig::default())?;
    print_top(&dataset, n, rate_type);
    Ok(())
}

fn print_top(dataset: &Dataset, n: usize, rate_type: RateType) {
    println!("Top {n} diseases by mean standardized rate ({rate_type}):");
    for (position, (disease, rate)) in top_diseases(dataset, n, rate_type).iter().enumerate() {
        println!("  {}. {} ({:.2}%)", position + 1, disease, rate);
    }
}

fn rate_type_of(flags: &[&str]) -> RateType {
    if flags.contains(&"--incidence") {
        RateType::Incidence
    } else {
        RateType::Prevalence
    }
}

fn dataset_path(arg: Option<&&str>) -> PathBuf {
    arg.map_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH), |path| PathBuf::from(*path))
}

fn split_args(args: &[String]) -> (Vec<&str>, Vec<&str>) {
    let mut flags = Vec::new();
    let mut positional = Vec::new();
    for arg in args {
        if arg.starts_with("--") {
            flags.push(arg.as_str());
        } else {
            positional.push(arg.as_str());
        }
    }
    (flags, positional)
}

fn print_usage() {
    println!("Usage: er1243 <command> [options]");
    println!();
    println!("Commands:");
    println!("  fetch [--force] [dest]          Download the dataset CSV");
    println!("  check [--json] [path]           Validate the file and print a quality report");
    println!("  report <disease> [path]         Income-gradient summary for one disease");
    println!("  rank [path]                     Diseases ranked by inequality ratio");
    println!("  top [n] [path]                  Top diseases by standardized rate");
    println!();
    println!("Options:");
    println!("  --incidence                     Use incidence rates instead of prevalence");
    println!();
    println!("{}", attribution());
}
