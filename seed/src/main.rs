use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory containing cities.csv, scores.csv and reviews.jsonl
    #[arg(default_value = "datasets")]
    datasets_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    seed::run(&args.datasets_dir).await;
}
