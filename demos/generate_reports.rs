use dotenv::dotenv;
use hcta_report_generator::{BatchEvent, BatchRunner, GeminiClient, ScoreTable};
use std::error::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .ok_or("usage: generate_reports <candidates.xlsx|csv> [output.xlsx|csv]")?;
    let output = args
        .next()
        .unwrap_or_else(|| "candidate_summaries_results.xlsx".to_string());

    // Anything wrong with the file or the key stops here, before any request is made.
    let table = ScoreTable::from_path(&input)?;
    let missing = table.missing_columns();
    if !missing.is_empty() {
        println!("⚠️  Input is missing columns: {}", missing.join(", "));
    }
    let client = GeminiClient::from_env()?;
    println!(
        "🚀 Generating {} summaries with {}...",
        table.len(),
        client.model()
    );

    let (tx, mut rx) = mpsc::channel(16);
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                BatchEvent::Generating {
                    position,
                    total,
                    name,
                } => println!("   Generating summary for {} ({}/{})...", name, position, total),
                BatchEvent::RowCompleted { name, result, .. } => {
                    if result.is_generated() {
                        println!("   ✅ {}\n{}\n", name, result.text());
                    } else {
                        println!("   ❌ {}: {}", name, result.text());
                    }
                }
                BatchEvent::Cancelled { processed } => {
                    println!("   ⏹  Cancelled after {} candidates", processed)
                }
                _ => {}
            }
        }
    });

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let runner = BatchRunner::new(client)
        .with_progress(tx)
        .with_cancellation(cancel);
    let report = runner.run(table).await?;
    drop(runner);
    printer.await?;

    report.table.write_path(&output)?;
    println!(
        "✅ {} generated, {} failed. Results written to {}",
        report.generated(),
        report.failures(),
        output
    );
    Ok(())
}
