//! tgstat: Telegram channel statistics dashboard generator

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use std::path::{Path, PathBuf};
use tgstat_analytics::{analyze_posting_times, calculate_metrics, compare_periods, previous_period, Locale};
use tgstat_common::{
    init_logging, DateRange, FetchProgress, LoggingConfig, Post, SessionToken, TelegramClient,
    TelegramConfig,
};
use tgstat_config::{Config, ConfigLoader};
use tgstat_dashboard::{log_statistics_request, render, DashboardContext};
use tgstat_graphs::{aggregate_periods, GraphConfig, GraphRenderer, Granularity, MetricTrendGraph, TrendMetric};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Channel link or username (overrides config)
    #[arg(long)]
    channel: Option<String>,

    /// Period start, YYYY-MM-DD
    #[arg(long)]
    start_date: NaiveDate,

    /// Period end, YYYY-MM-DD
    #[arg(long)]
    end_date: NaiveDate,

    /// Compare with the immediately preceding period
    #[arg(long)]
    compare: bool,

    /// Chart aggregation: day, week, month or quarter
    #[arg(long, default_value = "week")]
    granularity: String,

    /// Output directory (overrides config)
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Log level
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    apply_cli_overrides(&mut config, &args);

    init_logging(LoggingConfig {
        level: config.logging.level.clone(),
        pretty_format: config.logging.pretty,
        file_path: config.logging.file.clone(),
        ..LoggingConfig::default()
    })
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if config.dashboard.channel.is_empty() {
        bail!("No channel configured; pass --channel or set dashboard.channel");
    }

    let range = DateRange::new(args.start_date, args.end_date);
    let granularity = parse_granularity(&args.granularity)?;
    let locale = Locale::from_tag(&config.dashboard.locale);

    // Request logging is a side concern; failures are already demoted inside
    log_statistics_request(
        Path::new(&config.dashboard.log_dir),
        &range,
        &config.dashboard.requester,
    );

    let posts = fetch_period(&config, range).await?;
    info!("Fetched {} posts for {}", posts.len(), range);

    let mut context =
        DashboardContext::new(config.dashboard.channel.clone(), range, locale).with_posts(posts);

    if args.compare {
        let prev_range = previous_period(&range);
        let previous_posts = fetch_period(&config, prev_range).await?;
        info!("Fetched {} posts for previous period {}", previous_posts.len(), prev_range);
        context = context.with_previous_posts(previous_posts);
    }

    let output_dir = PathBuf::from(&config.dashboard.output_dir);
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let posts_in_range: Vec<Post> = context.posts_in_range().into_iter().cloned().collect();
    let metrics = calculate_metrics(&posts_in_range);
    let comparison = if context.compare {
        Some(compare_periods(&posts_in_range, &context.previous_posts))
    } else {
        None
    };
    let analysis = analyze_posting_times(&posts_in_range, locale);

    let chart_files = render_charts(&config, &posts_in_range, granularity, locale, &output_dir).await?;

    let generated_at = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let page = render::dashboard_page(
        &context,
        &metrics,
        comparison.as_ref(),
        &analysis,
        &chart_files,
        &generated_at,
    );

    let page_path = output_dir.join("dashboard.html");
    std::fs::write(&page_path, page)
        .with_context(|| format!("Failed to write {}", page_path.display()))?;

    info!("Dashboard written to {}", page_path.display());
    Ok(())
}

fn apply_cli_overrides(config: &mut Config, args: &Args) {
    if let Some(channel) = &args.channel {
        config.dashboard.channel = channel.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        config.dashboard.output_dir = output_dir.clone();
    }
    if let Some(log_level) = &args.log_level {
        config.logging.level = log_level.clone();
    }
}

fn parse_granularity(tag: &str) -> Result<Granularity> {
    match tag {
        "day" => Ok(Granularity::Day),
        "week" => Ok(Granularity::Week),
        "month" => Ok(Granularity::Month),
        "quarter" => Ok(Granularity::Quarter),
        other => bail!("Unknown granularity '{}'; expected day, week, month or quarter", other),
    }
}

/// Fetch one period's posts, logging progress events as they arrive
async fn fetch_period(config: &Config, range: DateRange) -> Result<Vec<Post>> {
    let session = SessionToken::load(config.telegram.env_file.as_deref().map(Path::new))?;
    let client = TelegramClient::new(
        TelegramConfig::new(config.telegram.gateway_url.clone())
            .with_timeout(config.telegram.timeout_seconds)
            .with_max_retries(config.telegram.max_retries as usize)
            .with_rate_limit(config.telegram.rate_limit_per_sec),
        session,
    )?;

    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<FetchProgress>();
    let progress_task = tokio::spawn(async move {
        while let Some(progress) = progress_rx.recv().await {
            info!("{}", progress.message);
        }
    });

    let posts = client
        .fetch_channel_history(
            &config.dashboard.channel,
            range,
            config.dashboard.fetch_limit,
            Some(progress_tx),
        )
        .await?;

    if let Err(e) = progress_task.await {
        warn!("Progress reporter task failed: {}", e);
    }
    Ok(posts)
}

/// Render one trend chart per metric into the output directory
async fn render_charts(
    config: &Config,
    posts: &[Post],
    granularity: Granularity,
    locale: Locale,
    output_dir: &Path,
) -> Result<Vec<(String, String)>> {
    let buckets = aggregate_periods(posts, granularity);
    if buckets.is_empty() {
        warn!("No chart data for the selected period");
        return Ok(Vec::new());
    }

    let period_label = locale.period_name(granularity.tag());
    let mut chart_files = Vec::new();

    for metric in TrendMetric::ALL {
        let mut graph = MetricTrendGraph::new(metric, locale);
        graph.set_data(buckets.clone());

        let mut style = tgstat_graphs::StyleConfig::default();
        style.background_color = Some(config.graph.background_color.clone());
        style.label_font.size = config.graph.font_size;

        let graph_config = GraphConfig {
            title: graph.title(period_label),
            width: config.graph.width,
            height: config.graph.height,
            x_label: Some(period_label.to_string()),
            y_label: Some(metric.label(locale).to_string()),
            style,
        };

        let file_name = format!("{}_trend.png", metric.key());
        let path = output_dir.join(&file_name);
        graph.render_to_file(&graph_config, &path).await?;

        chart_files.push((graph_config.title.clone(), file_name));
    }

    Ok(chart_files)
}
