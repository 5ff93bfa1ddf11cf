use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::DataIndex;
use poster_client::{PosterLookup, TmdbPosterClient};
use ranker::Ranker;
use server::{MovieRecommendation, RecommendationOrchestrator};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

mod config;

use config::Config;

/// ReelSimilar - "more like this" movie finder
#[derive(Parser)]
#[command(name = "reel-similar")]
#[command(about = "Find movies similar to a title using a precomputed similarity matrix", long_about = None)]
struct Cli {
    /// Directory holding movies.dat and similarity.dat
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies similar to a title
    Recommend {
        /// Title of the selected movie (case-insensitive)
        #[arg(long)]
        title: String,

        /// How many recommendations to show
        #[arg(long, default_value = "12", value_parser = clap::value_parser!(u16).range(1..=30))]
        k: u16,

        /// Skip poster lookups and show placeholders
        #[arg(long)]
        no_posters: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// Show a catalog entry and its raw nearest similarities
    Movie {
        /// Exact movie title (case-insensitive)
        #[arg(long)]
        title: String,
    },

    /// Measure ranking latency over random titles
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,

        /// Recommendations per request
        #[arg(long, default_value = "12")]
        k: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading artifacts from {}...", cli.data_dir.display());
    let start = Instant::now();
    let data_index = Arc::new(
        DataIndex::load_from_files(&cli.data_dir)
            .context("Failed to load model files (movies.dat / similarity.dat)")?,
    );
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        data_index.len(),
        start.elapsed()
    );

    match cli.command {
        Commands::Recommend {
            title,
            k,
            no_posters,
            json,
        } => handle_recommend(data_index, &title, k as usize, no_posters, json).await?,
        Commands::Search { title } => handle_search(&data_index, &title),
        Commands::Movie { title } => handle_movie(data_index, &title)?,
        Commands::Benchmark {
            requests,
            concurrent,
            k,
        } => handle_benchmark(data_index, requests, concurrent, k).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    data_index: Arc<DataIndex>,
    title: &str,
    k: usize,
    no_posters: bool,
    json: bool,
) -> Result<()> {
    let orchestrator = if no_posters {
        RecommendationOrchestrator::without_posters(data_index)
    } else {
        let config = Config::from_env()?;
        if config.api_key().is_none() {
            println!(
                "{}",
                "No TMDB_API_KEY set. Posters will use placeholders. Add it via .env or the environment."
                    .yellow()
            );
        }
        let poster_config = config.poster_client_config();
        tracing::debug!(
            "Poster client: concurrency={}, timeout={:?}",
            poster_config.concurrency,
            poster_config.timeout
        );
        let client = TmdbPosterClient::new(poster_config)
            .context("Failed to build poster client")?;
        let posters: Arc<dyn PosterLookup> = Arc::new(client);
        RecommendationOrchestrator::new(data_index, posters)
    };

    let recommendations = orchestrator.get_recommendations(title, k).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
    } else {
        print_recommendations(title, &recommendations);
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(data_index: &DataIndex, title: &str) {
    let hits = data_index.search_titles(title);

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if hits.is_empty() {
        println!("  (no matches)");
        return;
    }
    for row in hits.iter().take(20) {
        if let Some(movie) = data_index.get_movie(*row) {
            println!("{}: {}", movie.id.to_string().cyan(), movie.title);
        }
    }
    if hits.len() > 20 {
        println!("  ... and {} more", hits.len() - 20);
    }
}

/// Handle the 'movie' command
fn handle_movie(data_index: Arc<DataIndex>, title: &str) -> Result<()> {
    let row = data_index
        .find_by_title(title)
        .ok_or_else(|| anyhow!("Movie '{}' not found in database", title))?;
    let movie = data_index
        .get_movie(row)
        .ok_or_else(|| anyhow!("Row {} missing from catalog", row))?;

    println!("{}", movie.title.bold().blue());
    println!("{}Movie ID: {}", "• ".green(), movie.id);
    println!("{}Catalog row: {}", "• ".green(), row);

    let neighbours = Ranker::new(data_index.clone()).recommend(row, 5)?;
    println!("Nearest neighbours (raw similarity):");
    for rec in neighbours {
        println!("  - {} ({:.4})", rec.title, rec.similarity);
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    data_index: Arc<DataIndex>,
    requests: usize,
    concurrent: usize,
    k: usize,
) -> Result<()> {
    if requests == 0 {
        return Err(anyhow!("--requests must be at least 1"));
    }

    let orchestrator = RecommendationOrchestrator::without_posters(data_index.clone());
    let limiter = Arc::new(Semaphore::new(concurrent.max(1)));

    let titles: Vec<String> = (0..requests)
        .filter_map(|_| {
            let row = rand::random_range(0..data_index.len());
            data_index.get_movie(row).map(|m| m.title.clone())
        })
        .collect();

    let wall_start = Instant::now();
    let mut handles = vec![];
    for title in titles {
        let orchestrator = orchestrator.clone();
        let limiter = limiter.clone();
        let handle = tokio::spawn(async move {
            let _permit = limiter.acquire_owned().await?;
            let start = Instant::now();
            orchestrator.rank_only(&title, k).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    let mut timings = vec![];
    for handle in handles {
        let elapsed = handle.await??;
        timings.push(elapsed);
    }
    let wall_time = wall_start.elapsed();

    print_benchmark(&mut timings, wall_time);
    Ok(())
}

fn print_benchmark(timings: &mut [Duration], wall_time: Duration) {
    let total: Duration = timings.iter().sum();
    let avg_latency = total / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f32| {
        let idx = ((timings.len() as f32 * p) as usize).min(timings.len() - 1);
        timings[idx]
    };
    let throughput = timings.len() as f32 / wall_time.as_secs_f32();

    println!("Benchmark results:");
    println!("Wall time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);
}

/// Five-glyph star strip for a score already rounded to half stars
fn render_stars(score: f32) -> String {
    let clamped = score.clamp(0.0, 5.0);
    let full = clamped.floor() as usize;
    let half = clamped - full as f32 >= 0.5;
    let empty = 5 - full - usize::from(half);

    format!("{}{}{}", "★".repeat(full), if half { "½" } else { "" }, "☆".repeat(empty))
}

/// Helper function to format and print recommendations
fn print_recommendations(title: &str, recommendations: &[MovieRecommendation]) {
    println!(
        "{}",
        format!("Top {} recommendations for '{}':", recommendations.len(), title)
            .bold()
            .blue()
    );
    for rec in recommendations {
        println!(
            "{}. {} {} ({:.1}) similarity {:.3}",
            rec.rank.to_string().green(),
            rec.title.bold(),
            render_stars(rec.stars).yellow(),
            rec.stars,
            rec.similarity
        );
        let poster = if rec.has_poster {
            rec.poster_url.normal()
        } else {
            rec.poster_url.dimmed()
        };
        println!("   Poster: {}", poster);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_stars() {
        assert_eq!(render_stars(5.0), "★★★★★");
        assert_eq!(render_stars(0.0), "☆☆☆☆☆");
        assert_eq!(render_stars(3.5), "★★★½☆");
        assert_eq!(render_stars(4.5), "★★★★½");
        assert_eq!(render_stars(7.0), "★★★★★");
    }

    #[test]
    fn test_cli_parses_recommend() {
        let cli = Cli::try_parse_from([
            "reel-similar",
            "--data-dir",
            "/tmp/x",
            "recommend",
            "--title",
            "Avatar",
            "--k",
            "5",
            "--no-posters",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, PathBuf::from("/tmp/x"));
        match cli.command {
            Commands::Recommend { title, k, no_posters, json } => {
                assert_eq!(title, "Avatar");
                assert_eq!(k, 5);
                assert!(no_posters);
                assert!(!json);
            }
            _ => panic!("expected recommend"),
        }
    }

    #[test]
    fn test_cli_rejects_zero_k() {
        assert!(
            Cli::try_parse_from(["reel-similar", "recommend", "--title", "Avatar", "--k", "0"])
                .is_err()
        );
    }
}
