use anyhow::Context;
use clap::Parser;
use job_search_backend::{
    config::ClientConfig,
    services::{fallback_service::JobFilters, jobs_client::JobsClient},
};

/// Search job listings through the proxy endpoint.
#[derive(Parser, Debug)]
#[command(name = "search-jobs", version)]
struct Cli {
    /// Free-text keywords, e.g. "desenvolvedor rust".
    #[arg(short, long, default_value = "")]
    query: String,

    /// City or region, e.g. "São Paulo".
    #[arg(short, long, default_value = "")]
    location: String,

    /// Overrides JOBS_API_URL.
    #[arg(long)]
    api_url: Option<String>,

    /// Serve the local sample dataset when the backend cannot be reached.
    #[arg(long)]
    fallback: bool,

    /// In fallback mode, also match the query against job descriptions.
    #[arg(long)]
    match_description: bool,

    /// Print the raw JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    config.fallback_enabled |= cli.fallback;
    config.fallback_match_description |= cli.match_description;

    let client = JobsClient::from_config(&config).context("failed to build search client")?;
    let filters = JobFilters::new(cli.query, cli.location);

    let jobs = match client.search(&filters).await {
        Ok(jobs) => jobs,
        Err(failure) => anyhow::bail!("{}", failure.user_message()),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&jobs)?);
        return Ok(());
    }

    println!("{} vagas encontradas", jobs.len());
    for job in &jobs {
        let salary = job.salary.as_deref().unwrap_or("a combinar");
        println!(
            "- {} | {} | {} | {:?}/{:?}/{:?} | {} | {}",
            job.title, job.company, job.location, job.job_type, job.modality, job.level, salary,
            job.application_url
        );
    }
    Ok(())
}
