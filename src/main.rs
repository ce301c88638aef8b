use clap::Parser;
use fws_data::bia::{get_bia_regions, get_tribal_information};
use fws_data::cli::{Cli, Command, OutputFormat};
use fws_data::cmt::{get_cmt_main_table, to_point_features};
use fws_data::config::{Endpoints, HttpSettings};
use fws_data::csv_handler::load_names;
use fws_data::error::{CrateError, Result};
use fws_data::fws::FwsTaxonomyClient;
use fws_data::geo::{FeatureCollection, get_geojson};
use fws_data::http::build_http_client;
use fws_data::logging::{self, LogConfig};
use fws_data::table::Table;
use fws_data::taxon::{CategoryFilter, TaxonResolver, candidates_to_table};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use reqwest::Client;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

enum Output {
    Table(Table),
    Features(FeatureCollection),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    logging::init(&LogConfig {
        level: if cli.quiet {
            log::LevelFilter::Warn
        } else {
            log::LevelFilter::Info
        },
        file: cli.log_file.clone(),
        append: cli.log_append,
        echo: !cli.quiet,
    })?;
    info!("Starting fws-data...");
    info!("Command: {:?}", cli.command);

    let start_time = Instant::now();
    let endpoints = cli.endpoints.endpoints();
    let client = build_http_client(&HttpSettings {
        timeout: Duration::from_secs(cli.endpoints.timeout_secs),
        ..HttpSettings::default()
    })?;

    let output = match run_command(&cli.command, &endpoints, client).await {
        Ok(output) => output,
        Err(e) => {
            error!("{}", e);
            return Err(e);
        }
    };

    write_output(&output, cli.format, cli.output.as_deref())?;
    if let Some(path) = &cli.output {
        info!("Output written to {:?}", path);
    }

    info!("Total execution time: {:.2?}", start_time.elapsed());
    Ok(())
}

async fn run_command(command: &Command, endpoints: &Endpoints, client: Client) -> Result<Output> {
    let output = match command {
        Command::Search { name } => {
            let resolver = taxon_resolver(client, endpoints);
            let candidates = resolver.resolve_by_scientific_name(name).await?;
            Output::Table(candidates_to_table(&candidates))
        }
        Command::BestMatch {
            name,
            categories,
            kingdom,
        } => {
            let resolver = taxon_resolver(client, endpoints);
            let categories = category_filter(categories);
            let result = resolver
                .resolve_best_match(name, categories.as_ref(), kingdom.as_deref())
                .await?;
            Output::Table(result.to_table())
        }
        Command::Codes { codes } => {
            let resolver = taxon_resolver(client, endpoints);
            let candidates = resolver.resolve_by_taxon_codes(codes).await?;
            Output::Table(candidates_to_table(&candidates))
        }
        Command::Batch {
            input_file,
            column,
            tsv,
            categories,
        } => {
            let resolver = taxon_resolver(client, endpoints);
            let delimiter = if *tsv { b'\t' } else { b',' };
            Output::Table(run_batch(&resolver, input_file, column, delimiter, categories).await?)
        }
        Command::Tribes => {
            Output::Table(get_tribal_information(&client, &endpoints.tribal_leaders).await?)
        }
        Command::BiaRegions => {
            Output::Features(get_bia_regions(&client, &endpoints.bia_regions).await?)
        }
        Command::Cmt { regions, points } => {
            let regions = (!regions.is_empty()).then_some(regions.as_slice());
            let table = get_cmt_main_table(&client, &endpoints.cmt_basic, regions).await?;
            if *points {
                Output::Features(to_point_features(&table))
            } else {
                Output::Table(table)
            }
        }
        Command::Geojson { url } => Output::Features(get_geojson(&client, url).await?),
    };
    Ok(output)
}

fn taxon_resolver(client: Client, endpoints: &Endpoints) -> TaxonResolver<FwsTaxonomyClient> {
    TaxonResolver::new(FwsTaxonomyClient::new(client, endpoints.fws_taxonomy.as_str()))
}

fn category_filter(categories: &[String]) -> Option<CategoryFilter> {
    if categories.is_empty() {
        None
    } else {
        Some(categories.iter().cloned().collect())
    }
}

async fn run_batch(
    resolver: &TaxonResolver<FwsTaxonomyClient>,
    input_file: &Path,
    column: &str,
    delimiter: u8,
    categories: &[String],
) -> Result<Table> {
    // 1. Load and Validate CSV
    info!("Loading names from {:?}...", input_file);
    let names = match load_names(input_file, column, delimiter) {
        Ok(names) => {
            info!("Successfully loaded {} names.", names.len());
            names
        }
        Err(e) => {
            error!("Failed to load or validate CSV: {}", e);
            return Err(e);
        }
    };

    let categories = category_filter(categories);
    let mut table = Table::new();
    let mut unique_matches = 0;
    let mut ambiguous = 0;
    let mut unmatched = 0;
    let mut error_details: Vec<String> = Vec::new();

    // 2. Resolve each name
    let pb = ProgressBar::new(names.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .map_err(|e| CrateError::InvalidArgument(format!("progress bar template: {}", e)))?
            .progress_chars("##-"),
    );

    for record in &names {
        pb.set_message(format!("Resolving: {}", record.scientific_name));
        match resolver
            .resolve_best_match(&record.scientific_name, categories.as_ref(), None)
            .await
        {
            Ok(result) => {
                if result.unique().is_some() {
                    unique_matches += 1;
                } else if result.matches().is_empty() {
                    unmatched += 1;
                } else {
                    ambiguous += 1;
                }
                table.extend(result.to_table());
            }
            Err(e) => {
                let error_message = format!(
                    "Row {}: resolution failed for '{}': {}",
                    record.row, record.scientific_name, e
                );
                pb.println(format!("Error for row {}: {}", record.row, e));
                warn!("{}", error_message);
                error_details.push(error_message);
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Name resolution complete.");

    // Basic Summary Report
    eprintln!("\n--- Summary Report ---");
    eprintln!("Names read: {}", names.len());
    eprintln!("Resolved to a single taxon: {}", unique_matches);
    eprintln!("Several candidates remaining: {}", ambiguous);
    eprintln!("No match: {}", unmatched);
    eprintln!("Errors encountered: {}", error_details.len());
    if !error_details.is_empty() {
        eprintln!("\n--- Detailed Errors ---");
        for detail in &error_details {
            eprintln!("- {}", detail);
        }
    }

    Ok(table)
}

fn write_output(output: &Output, format: OutputFormat, path: Option<&Path>) -> Result<()> {
    let mut writer: Box<dyn Write> = match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    match (output, format) {
        (Output::Table(table), OutputFormat::Csv) => table.write_delimited(&mut writer, b',')?,
        (Output::Table(table), OutputFormat::Tsv) => table.write_delimited(&mut writer, b'\t')?,
        (Output::Table(table), OutputFormat::Json) => {
            table.write_json(&mut writer)?;
            writeln!(writer)?;
        }
        (Output::Features(features), OutputFormat::Csv) => {
            features.to_table().write_delimited(&mut writer, b',')?
        }
        (Output::Features(features), OutputFormat::Tsv) => {
            features.to_table().write_delimited(&mut writer, b'\t')?
        }
        (Output::Features(features), OutputFormat::Json) => {
            serde_json::to_writer_pretty(&mut writer, features)?;
            writeln!(writer)?;
        }
    }

    writer.flush()?;
    Ok(())
}
