//! formrelay CLI - one-shot document analysis and record extraction
//!
//! Runs the analyze-extract pipeline against a local file and prints the
//! resulting record, optionally publishing it to the configured queue.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use formrelay::{
    extract_record, DocIntelClient, DocIntelConfig, DocumentAnalyzer, QueueClient, QueueConfig,
    RecordPublisher,
};

#[derive(Parser)]
#[command(name = "formrelay")]
#[command(version, about = "OCR form-field extraction relay", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a local document and print the extracted record
    Analyze {
        /// Path to the document image or PDF
        file: PathBuf,

        /// Also publish the record to the configured queue
        #[arg(short, long)]
        publish: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { file, publish } => {
            if let Err(e) = analyze_file(&file, publish).await {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
    }
}

async fn analyze_file(
    file: &PathBuf,
    publish: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let content = std::fs::read(file)
        .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    tracing::info!("Analyzing '{}' ({} bytes)", filename, content.len());

    let analyzer = DocIntelClient::new(DocIntelConfig::from_env()?);
    let result = analyzer.analyze(&content).await?;
    let record = extract_record(&result);

    println!("{}", serde_json::to_string_pretty(&record)?);

    if publish {
        let queue = QueueClient::connect(QueueConfig::from_env()?).await?;
        queue.publish(&record.to_json()?).await?;
        tracing::info!("Record for '{}' published to queue", filename);
    }

    Ok(())
}
