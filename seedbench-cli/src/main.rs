use crate::cli::{BenchDatasetArg, Commands, ConnectionArgs, DatasetArg, LayerArg, SeedDestination};
use clap::Parser;
use seedbench_tools::{
    olap_suite, oltp_suite, run_benchmark, seed_olap, seed_oltp, AccessLayer, BenchOptions,
    BenchReport, LoadDestination, OlapSizes, OltpSizes, PostgresClientWrapper,
    PostgresDestination, Result, SeedOptions, SeedReport, SqlFileDestination,
};
use tracing::instrument;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();

    run(cli).await?;

    Ok(())
}

#[instrument(skip_all)]
async fn run(cli: cli::Cli) -> Result<()> {
    match cli.command {
        Commands::Seed {
            dataset,
            batch_size,
            seed,
            scale,
            json,
            destination,
        } => {
            do_seed(dataset, batch_size, seed, scale, json, destination).await?;
        }
        Commands::Bench {
            db_args,
            dataset,
            iterations,
            layers,
            seed,
            json,
        } => {
            do_bench(db_args, dataset, iterations, layers, seed, json).await?;
        }
    }

    Ok(())
}

#[instrument(skip_all)]
async fn do_seed(
    dataset: DatasetArg,
    batch_size: usize,
    seed: Option<u64>,
    scale: f64,
    json: bool,
    destination: SeedDestination,
) -> Result<()> {
    let options = SeedOptions {
        batch_size,
        rng_seed: seed,
        ..SeedOptions::default()
    };

    let reports = match destination {
        SeedDestination::Postgres { db_args } => {
            let connection = PostgresClientWrapper::new(&db_args.get_connection_string()).await?;
            let mut postgres_destination = PostgresDestination::new(&connection);
            seed_datasets(&mut postgres_destination, dataset, scale, &options).await?
        }
        SeedDestination::SqlFile { path } => {
            let mut file_destination = SqlFileDestination::new_file(&path).await?;
            seed_datasets(&mut file_destination, dataset, scale, &options).await?
        }
    };

    for report in &reports {
        print_seed_report(report, json)?;
    }

    Ok(())
}

async fn seed_datasets<D: LoadDestination>(
    destination: &mut D,
    dataset: DatasetArg,
    scale: f64,
    options: &SeedOptions,
) -> Result<Vec<SeedReport>> {
    let mut reports = vec![];

    if matches!(dataset, DatasetArg::Oltp | DatasetArg::All) {
        let sizes = OltpSizes::default().scaled(scale);
        reports.push(seed_oltp(destination, &sizes, options).await?);
    }

    if matches!(dataset, DatasetArg::Olap | DatasetArg::All) {
        let sizes = OlapSizes::default().scaled(scale);
        reports.push(seed_olap(destination, &sizes, options).await?);
    }

    Ok(reports)
}

#[instrument(skip_all)]
async fn do_bench(
    db_args: ConnectionArgs,
    dataset: BenchDatasetArg,
    iterations: u32,
    layers: Vec<LayerArg>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let connection = PostgresClientWrapper::new(&db_args.get_connection_string()).await?;

    let layers = if layers.is_empty() {
        AccessLayer::ALL.to_vec()
    } else {
        layers.into_iter().map(AccessLayer::from).collect()
    };

    let options = BenchOptions {
        iterations,
        layers,
        rng_seed: seed,
    };

    let (name, suite) = match dataset {
        BenchDatasetArg::Oltp => ("oltp", oltp_suite()),
        BenchDatasetArg::Olap => ("olap", olap_suite()),
    };

    let report = run_benchmark(&connection, name, &suite, &options).await?;

    print_bench_report(&report, json)?;

    Ok(())
}

impl From<LayerArg> for AccessLayer {
    fn from(value: LayerArg) -> Self {
        match value {
            LayerArg::Simple => AccessLayer::Simple,
            LayerArg::Prepared => AccessLayer::Prepared,
            LayerArg::PreparedReuse => AccessLayer::PreparedReuse,
        }
    }
}

fn print_seed_report(report: &SeedReport, json: bool) -> Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;
        println!("{rendered}");
        return Ok(());
    }

    println!("dataset: {} ({} ms)", report.dataset, report.elapsed_ms);
    println!(
        "{:<14} {:>12} {:>10} {:>12}",
        "table", "rows", "batches", "elapsed_ms"
    );
    for table in &report.tables {
        println!(
            "{:<14} {:>12} {:>10} {:>12}",
            table.table, table.rows, table.batches, table.elapsed_ms
        );
    }

    Ok(())
}

fn print_bench_report(report: &BenchReport, json: bool) -> Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;
        println!("{rendered}");
        return Ok(());
    }

    println!("dataset: {}", report.dataset);
    println!(
        "{:<28} {:<16} {:>8} {:>10} {:>10} {:>10}",
        "query", "layer", "rows", "mean_ms", "min_ms", "max_ms"
    );
    for timing in &report.timings {
        println!(
            "{:<28} {:<16} {:>8} {:>10.3} {:>10.3} {:>10.3}",
            timing.query,
            timing.layer.name(),
            timing.rows,
            timing.mean_ms,
            timing.min_ms,
            timing.max_ms
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    #[tokio::test]
    async fn seeds_a_sql_file_from_the_command_line() {
        let path = std::env::temp_dir().join(format!(
            "seedbench_cli_seed_{}.sql",
            std::process::id()
        ));
        let path_string = path.to_string_lossy().to_string();

        let parameters = Cli {
            command: Commands::Seed {
                dataset: DatasetArg::Oltp,
                batch_size: 50,
                seed: Some(3),
                scale: 0.0001,
                json: false,
                destination: SeedDestination::SqlFile {
                    path: path_string.clone(),
                },
            },
        };

        run(parameters).await.unwrap();

        let script = std::fs::read_to_string(&path).unwrap();
        assert!(script.contains("create table users ("));
        assert!(script.contains("insert into users ("));
        assert!(script.contains("insert into order_items ("));

        std::fs::remove_file(&path).unwrap();
    }
}
