use anyhow::Context;
use clap::Parser;
use colored::*;
use isf_converter::cli::{Args, Commands, ConvertArffArgs, ConvertArgs, StatsArgs};
use isf_converter::stats::make_stats;
use isf_converter::{DatasetProcessor, InputFormat};
use std::process;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Commands::Convert(convert_args) => run_convert(convert_args),
        Commands::ConvertArff(arff_args) => run_convert_arff(arff_args),
        Commands::Stats(stats_args) => run_stats(&stats_args),
    };

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("isf_converter={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn run_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let config = args.to_config().context("Invalid configuration")?;
    let processor = DatasetProcessor::new(args.input_path, args.output_path)?.with_config(config);
    run_processor(processor)
}

fn run_convert_arff(args: ConvertArffArgs) -> anyhow::Result<()> {
    let config = args.to_config().context("Invalid configuration")?;
    let processor = DatasetProcessor::new(args.input_path, args.output_path)?
        .with_config(config)
        .with_format(InputFormat::Arff);
    run_processor(processor)
}

fn run_processor(processor: DatasetProcessor) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
    let stats = runtime.block_on(processor.process())?;

    if stats.files_failed > 0 {
        anyhow::bail!(
            "{} of {} files failed to convert",
            stats.files_failed,
            stats.files_failed + stats.files_processed
        );
    }
    Ok(())
}

fn run_stats(args: &StatsArgs) -> anyhow::Result<()> {
    let dataset_count = make_stats(args.csv_path(), args.results_dir()).with_context(|| {
        format!(
            "Failed to aggregate labelling results from {}",
            args.csv_path().display()
        )
    })?;

    println!(
        "{} {} datasets into {}",
        "Aggregated".bright_green(),
        dataset_count.to_string().bright_white().bold(),
        args.results_dir().display()
    );
    Ok(())
}
