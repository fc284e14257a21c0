use std::env;
use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use songscout::comments::extract_comments_from_file;
use songscout::groq::GroqClient;
use songscout::serper::SerperClient;
use songscout::{AppConfig, Pipeline};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env()?;
    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.comments_path.clone());

    let comments = extract_comments_from_file(&path, &config.extract).await;
    if comments.is_empty() {
        println!("No valid comments extracted.");
        return Ok(());
    }

    println!("\nExtracted Comments:");
    for (i, comment) in comments.iter().enumerate() {
        println!("{}. {comment}", i + 1);
    }

    let groq = GroqClient::new(
        config.groq_base_url.clone(),
        config.groq_api_key.clone(),
        config.groq_model.clone(),
    );
    let serper = SerperClient::new(
        config.serper_base_url.clone(),
        config.serper_api_key.clone(),
    );

    println!("\nGuessing songs...");
    let result = Pipeline::new(groq, serper).run(&comments).await;

    println!("\nAll Discussed Songs:");
    if result.all_songs.is_empty() {
        println!("No songs identified.");
    } else {
        for song in &result.all_songs {
            println!(
                "- \"{}\" by {} (Likelihood: {}%)",
                song.song, song.artist, song.likelihood
            );
        }
    }

    println!("\nMost Likely Song:");
    println!(
        "**\"{}\"** by **{}** (Likelihood: {}%)",
        result.most_likely.song, result.most_likely.artist, result.most_likely.likelihood
    );

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
