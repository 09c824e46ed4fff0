use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use h1_scopes::{
    error_time, info_time, scrape, Credentials, Result, ScrapeConfig, ScrapeSummary, API_BASE,
    DEFAULT_REQUESTS_PER_MINUTE,
};

/// Scrape HackerOne structured scopes for a list of program handles.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to program handles file to scrape, one handle per line.
    #[arg(long)]
    input_path: PathBuf,

    /// jsonl file to append scraped data to. Logged to stdout when empty.
    // Plain OsString: the PathBuf parser refuses "".
    #[arg(long)]
    output_path: Option<OsString>,

    /// Max requests to send per minute.
    #[arg(long, default_value_t = DEFAULT_REQUESTS_PER_MINUTE)]
    rlm: u32,

    /// API token in `username:key` format.
    #[arg(long, env = "HACKERONE_API", hide_env_values = true)]
    api: String,

    #[arg(long, default_value = API_BASE, hide = true)]
    api_base: String,

    /// Log failed programs and continue instead of stopping at the first one.
    #[arg(long)]
    keep_going: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let start_time = Local::now();
    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            info_time!(start_time, "Full program time:");
            if summary.failed > 0 {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error_time!("{}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> Result<ScrapeSummary> {
    let credentials = Credentials::parse(&args.api)?;
    let config = ScrapeConfig::new(args.input_path, credentials, args.rlm)?
        .with_output_path(args.output_path.map(PathBuf::from))
        .with_api_base(args.api_base)
        .with_keep_going(args.keep_going);

    scrape(&config).await
}
