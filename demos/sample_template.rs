use hcta_report_generator::ScoreTable;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "candidate_scores_template.xlsx".to_string());

    let template = ScoreTable::sample_template();
    template.write_path(&path)?;

    println!("📥 Sample template written to {}", path);
    println!(
        "   {} columns, sample candidate: {}",
        template.headers().len(),
        template.display_name(0)
    );
    Ok(())
}
