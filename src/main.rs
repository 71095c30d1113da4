use clap::Parser;
use csv_combine::utils::logger;
use csv_combine::{
    CliConfig, CombineEngine, CombineError, CombinePipeline, LocalStorage, LogFormat, RunSummary,
};

fn report_failure(e: &CombineError) -> ! {
    tracing::error!(
        "Combine failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

fn print_summary(summary: &RunSummary) {
    if summary.dry_run {
        println!("Dry run, nothing written. Would write: {}", summary.output_path);
        for source in &summary.sources {
            println!("  {} -> label '{}', {} records", source.file_name, source.label, source.records);
        }
    } else {
        println!("✅ Combined {} files", summary.sources.len());
        println!("📁 Output saved to: {}", summary.output_path);
    }
    println!("Records: {}", summary.total_records);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let log_file = cli.log_file.as_deref();
    let logging = match cli.log_format {
        LogFormat::Text => logger::init_cli_logger(cli.verbose, log_file),
        LogFormat::Json => logger::init_json_logger(cli.verbose, log_file),
    };
    if let Err(e) = logging {
        report_failure(&e);
    }

    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => report_failure(&e),
    };
    tracing::info!(
        "Combining *.{} in {} into {}",
        config.extension,
        config.input_dir,
        config.output_file
    );

    let storage = LocalStorage::new(config.input_dir.clone());
    let engine = CombineEngine::new(CombinePipeline::new(storage, config));

    let result = if cli.dry_run {
        engine.plan().await
    } else {
        engine.run().await
    };

    match result {
        Ok(summary) if cli.json => println!("{}", serde_json::to_string_pretty(&summary)?),
        Ok(summary) => print_summary(&summary),
        Err(e) => report_failure(&e),
    }

    Ok(())
}
