use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about)]
#[command(propagate_version = true)]
/// Seeds Postgres with large synthetic shop and warehouse datasets, and benchmarks
/// simple, prepared and reused-prepared query layers against them.
///
/// Generated data is deterministic for a given seed, so two runs with the same
/// arguments produce byte-identical datasets.
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate a dataset and load it into Postgres or write it to a SQL file
    Seed {
        /// Which dataset to generate
        #[arg(long, value_enum)]
        dataset: DatasetArg,

        /// How many rows go into each insert statement
        #[arg(long, default_value_t = 1000)]
        batch_size: usize,

        /// Seed for the generator. Runs with the same seed and sizes produce the same dataset
        #[arg(long)]
        seed: Option<u64>,

        /// Scale factor applied to the default row counts, e.g. 0.01 for a hundredth of the rows
        #[arg(long, default_value_t = 1.0)]
        scale: f64,

        /// Print the seed report as JSON instead of a table
        #[arg(long)]
        json: bool,

        #[clap(subcommand)]
        destination: SeedDestination,
    },
    /// Time the benchmark queries against an already seeded database
    Bench {
        #[command(flatten)]
        db_args: ConnectionArgs,

        /// Which dataset's query suite to run
        #[arg(long, value_enum)]
        dataset: BenchDatasetArg,

        /// How often each query runs per access layer
        #[arg(long, default_value_t = 20)]
        iterations: u32,

        /// Access layers to time. All three if not specified
        #[arg(long, value_enum)]
        layers: Vec<LayerArg>,

        /// Seed for the parameter draws, so two runs hit the same rows
        #[arg(long)]
        seed: Option<u64>,

        /// Print the benchmark report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetArg {
    /// The shop schema: users, products, orders and order items
    Oltp,
    /// The star schema: four dimensions and a sales fact table
    Olap,
    /// Both datasets, shop schema first
    All,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchDatasetArg {
    Oltp,
    Olap,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerArg {
    Simple,
    Prepared,
    PreparedReuse,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SeedDestination {
    /// Load the dataset straight into a running Postgres instance
    Postgres {
        #[command(flatten)]
        db_args: ConnectionArgs,
    },
    /// Write the dataset as a SQL script that can be replayed against Postgres later
    SqlFile {
        /// Where to write the script
        #[arg(long)]
        path: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// The host of the database to connect to
    #[arg(long)]
    pub db_host: String,

    /// The port of the database to connect to
    #[arg(long, default_value_t = 5432)]
    pub db_port: u16,

    /// The username to use when connecting to the database
    #[arg(long)]
    pub db_user: String,

    /// The password to use when connecting to the database
    #[arg(long, env = "SEEDBENCH_DB_PASSWORD")]
    pub db_password: String,

    /// The name of the database to connect to
    #[arg(long)]
    pub db_name: String,
}

impl ConnectionArgs {
    pub(crate) fn get_connection_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            self.db_host, self.db_port, self.db_user, self.db_password, self.db_name
        )
    }
}

#[test]
fn verify_cli() {
    use clap::CommandFactory;
    Cli::command().debug_assert()
}
