use crate::demo::{
    run_compare, run_demo, run_predict, run_summary, CompareArgs, DemoArgs, PredictArgs,
};
use crate::infra::DatasetArgs;
use crate::server;
use admission_odds::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Admission Odds",
    about = "Estimate admission proposal chances from historical cohort statistics",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Estimate the proposal probability for one program
    Predict(PredictArgs),
    /// Rank every program in the dataset for a profile
    Compare(CompareArgs),
    /// Print headline statistics for each program
    Summary(DatasetArgs),
    /// Walk through predictions on the bundled sample cohorts
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) dataset: DatasetArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Predict(args) => run_predict(args),
        Command::Compare(args) => run_compare(args),
        Command::Summary(args) => run_summary(args),
        Command::Demo(args) => run_demo(args),
    }
}
