use futures::future::BoxFuture;
use hcta_report_generator::batch::{BatchEvent, FAILURE_PREFIX, SKIPPED_TEXT};
use hcta_report_generator::schema::columns;
use hcta_report_generator::*;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Answers every prompt with a canned summary, failing for chosen candidates.
#[derive(Default)]
struct ScriptedGenerator {
    fail_for: Vec<(String, String)>,
    cancel_on_first_call: Option<CancellationToken>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl ScriptedGenerator {
    fn failing_for(name: &str, reason: &str) -> Self {
        Self {
            fail_for: vec![(name.to_string(), reason.to_string())],
            ..Default::default()
        }
    }

    fn called_names(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let name = candidate_name(prompt);
            self.calls
                .lock()
                .unwrap()
                .push((name.clone(), Instant::now()));

            if let Some(token) = &self.cancel_on_first_call {
                token.cancel();
            }

            match self.fail_for.iter().find(|(n, _)| *n == name) {
                Some((_, reason)) => Err(ReportError::Generation(reason.clone())),
                None => Ok(format!("{} demonstrates moderate leadership potential.", name)),
            }
        })
    }
}

fn candidate_name(prompt: &str) -> String {
    prompt
        .lines()
        .find_map(|line| line.strip_prefix("# Name: "))
        .unwrap_or("<unknown>")
        .to_string()
}

fn candidate_row(name: &str, gender: &str, score: f64) -> Vec<String> {
    let mut row = vec![name.to_string(), gender.to_string()];
    row.extend(SCORE_COLUMNS.iter().map(|_| score.to_string()));
    row
}

fn candidate_table(names: &[&str]) -> ScoreTable {
    let headers = columns().map(String::from).collect();
    let rows = names
        .iter()
        .enumerate()
        .map(|(i, name)| candidate_row(name, if i % 2 == 0 { "F" } else { "M" }, 3.0))
        .collect();
    ScoreTable::new(headers, rows).unwrap()
}

fn drain(rx: &mut mpsc::Receiver<BatchEvent>) -> Vec<BatchEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test(start_paused = true)]
async fn test_failure_is_isolated_and_order_preserved() {
    let table = candidate_table(&["Sub 1", "John Doe", "Jane Doe", "Anvita Sirohi"]);
    let generator = ScriptedGenerator::failing_for("John Doe", "503 Service Unavailable");

    let report = BatchRunner::new(&generator).run(table).await.unwrap();

    assert_eq!(report.results.len(), 4);
    assert_eq!(report.table.len(), 4);
    assert!(!report.cancelled);
    assert_eq!(report.failures(), 1);
    assert_eq!(report.generated(), 3);

    assert_eq!(
        generator.called_names(),
        vec!["Sub 1", "John Doe", "Jane Doe", "Anvita Sirohi"]
    );

    for (row, name) in ["Sub 1", "John Doe", "Jane Doe", "Anvita Sirohi"]
        .iter()
        .enumerate()
    {
        assert_eq!(report.table.cell(row, "Name"), Some(*name));
        let summary = report.table.cell(row, RESULT_COLUMN).unwrap();
        if *name == "John Doe" {
            assert_eq!(
                summary,
                "Error generating summary: 503 Service Unavailable"
            );
            assert!(matches!(report.results[row], GenerationResult::Failed(_)));
        } else {
            assert_eq!(
                summary,
                format!("{} demonstrates moderate leadership potential.", name)
            );
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_three_rows_are_paced_two_seconds_apart() {
    let table = candidate_table(&["Sub 1", "John Doe", "Jane Doe"]);
    let generator = ScriptedGenerator::default();

    let start = Instant::now();
    let report = BatchRunner::new(&generator).run(table).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(report.table.len(), 3);
    for row in 0..3 {
        assert!(!report.table.cell(row, RESULT_COLUMN).unwrap().is_empty());
    }
    assert_eq!(report.failures(), 0);

    // Two gaps between three requests, none after the last one.
    assert_eq!(report.pacing, Duration::from_secs(4));
    assert!(
        elapsed >= Duration::from_secs(4) && elapsed < Duration::from_millis(4010),
        "elapsed {:?}",
        elapsed
    );

    let times = generator.call_times();
    assert_eq!(times.len(), 3);
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_secs(2));
    }
}

#[tokio::test(start_paused = true)]
async fn test_single_failing_row_completes() {
    let table = candidate_table(&["Jane Doe"]);
    let generator = ScriptedGenerator::failing_for("Jane Doe", "quota exceeded");

    let start = Instant::now();
    let report = BatchRunner::new(&generator).run(table).await.unwrap();

    assert_eq!(report.table.len(), 1);
    let summary = report.table.cell(0, RESULT_COLUMN).unwrap();
    assert!(summary.contains("quota exceeded"));
    assert!(summary.starts_with(FAILURE_PREFIX));
    assert_eq!(report.pacing, Duration::ZERO);
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_rows_skip_the_client() {
    let headers: Vec<String> = columns().map(String::from).collect();
    let mut blank_score = candidate_row("Sub 5", "M", 4.0);
    blank_score[10] = String::new();
    let rows = vec![
        candidate_row("Sub 1", "M", 4.0),
        candidate_row("Sub 2", "X", 2.0),
        blank_score,
        candidate_row("Sub 3", "F", 1.0),
    ];
    let table = ScoreTable::new(headers.clone(), rows).unwrap();
    let generator = ScriptedGenerator::default();

    let report = BatchRunner::new(&generator).run(table).await.unwrap();

    assert_eq!(generator.called_names(), vec!["Sub 1", "Sub 3"]);
    assert_eq!(report.failures(), 2);
    assert!(report.results[1].text().contains("Invalid gender marker 'X'"));
    assert!(report.results[2]
        .text()
        .contains(&format!("Missing required field: {}", headers[10])));
    assert!(report.results[3].is_generated());
}

#[tokio::test(start_paused = true)]
async fn test_progress_events() {
    let table = candidate_table(&["Sub 1", "John Doe"]);
    let generator = ScriptedGenerator::failing_for("John Doe", "timeout");
    let (tx, mut rx) = mpsc::channel(32);

    BatchRunner::new(&generator)
        .with_progress(tx)
        .run(table)
        .await
        .unwrap();

    let events = drain(&mut rx);
    assert_eq!(
        events,
        vec![
            BatchEvent::Starting { total: 2 },
            BatchEvent::Generating {
                position: 1,
                total: 2,
                name: "Sub 1".to_string()
            },
            BatchEvent::RowCompleted {
                position: 1,
                name: "Sub 1".to_string(),
                result: GenerationResult::Generated(
                    "Sub 1 demonstrates moderate leadership potential.".to_string()
                )
            },
            BatchEvent::Generating {
                position: 2,
                total: 2,
                name: "John Doe".to_string()
            },
            BatchEvent::RowCompleted {
                position: 2,
                name: "John Doe".to_string(),
                result: GenerationResult::Failed(
                    "Error generating summary: timeout".to_string()
                )
            },
            BatchEvent::Finished {
                total: 2,
                failures: 1
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_dropped_progress_receiver_is_ignored() {
    let table = candidate_table(&["Sub 1", "John Doe"]);
    let generator = ScriptedGenerator::default();
    let (tx, rx) = mpsc::channel(1);
    drop(rx);

    let report = BatchRunner::new(&generator)
        .with_progress(tx)
        .run(table)
        .await
        .unwrap();
    assert_eq!(report.generated(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_keeps_recorded_results() {
    let token = CancellationToken::new();
    let generator = ScriptedGenerator {
        cancel_on_first_call: Some(token.clone()),
        ..Default::default()
    };
    let table = candidate_table(&["Sub 1", "John Doe", "Jane Doe"]);
    let (tx, mut rx) = mpsc::channel(32);

    let report = BatchRunner::new(&generator)
        .with_cancellation(token)
        .with_progress(tx)
        .run(table)
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(generator.called_names(), vec!["Sub 1"]);
    assert!(report.results[0].is_generated());
    assert_eq!(report.results[1], GenerationResult::Skipped);
    assert_eq!(report.results[2], GenerationResult::Skipped);
    assert_eq!(report.table.len(), 3);
    assert_eq!(report.table.cell(2, RESULT_COLUMN), Some(SKIPPED_TEXT));
    assert!(drain(&mut rx).contains(&BatchEvent::Cancelled { processed: 1 }));
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_interrupts_pacing() {
    let token = CancellationToken::new();
    let generator = ScriptedGenerator::default();
    let table = candidate_table(&["Sub 1", "John Doe", "Jane Doe"]);

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    let report = BatchRunner::new(&generator)
        .with_cancellation(token)
        .run(table)
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(generator.called_names(), vec!["Sub 1"]);
    assert_eq!(report.pacing, Duration::ZERO);
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_custom_config_and_template() {
    let table = candidate_table(&["Sub 1", "John Doe"]);
    let generator = ScriptedGenerator::default();
    let template =
        PromptTemplate::new("Write a two-line summary.\n{candidate_data_string}").unwrap();

    let start = Instant::now();
    let report = BatchRunner::new(&generator)
        .with_config(BatchConfig {
            pacing_delay: Duration::ZERO,
            result_column: "Summary".to_string(),
        })
        .with_template(template)
        .run(table)
        .await
        .unwrap();

    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(report.table.headers().last().unwrap(), "Summary");
    assert_eq!(
        report.table.cell(1, "Summary"),
        Some("John Doe demonstrates moderate leadership potential.")
    );
}

#[tokio::test(start_paused = true)]
async fn test_csv_in_csv_out() {
    let sample = ScoreTable::sample_template().to_csv_string().unwrap();
    let table = ScoreTable::from_reader(sample.as_bytes()).unwrap();
    let generator = ScriptedGenerator::default();

    let report = BatchRunner::new(&generator).run(table).await.unwrap();
    let output = report.table.to_csv_string().unwrap();

    let mut lines = output.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("Name,Gender,Overall Leadership,"));
    assert!(header.ends_with(",Develops Talent,Generated Summary"));

    let row = lines.next().unwrap();
    assert!(row.starts_with("Jane Doe,F,2.0,1.0,"));
    assert!(row.ends_with(",4.0,Jane Doe demonstrates moderate leadership potential."));
    assert!(lines.next().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_non_finite_score_skips_the_client() {
    let headers: Vec<String> = columns().map(String::from).collect();
    let mut nan_score = candidate_row("Sub 2", "F", 3.0);
    nan_score[2] = "NaN".to_string();
    let rows = vec![candidate_row("Sub 1", "M", 3.0), nan_score];
    let table = ScoreTable::new(headers, rows).unwrap();
    let generator = ScriptedGenerator::default();

    let report = BatchRunner::new(&generator).run(table).await.unwrap();

    assert_eq!(generator.called_names(), vec!["Sub 1"]);
    assert!(report.results[1]
        .text()
        .contains("Invalid score for Overall Leadership: 'NaN'"));
}

#[cfg(feature = "xlsx")]
#[tokio::test(start_paused = true)]
async fn test_xlsx_in_xlsx_out() {
    let bytes = ScoreTable::sample_template().to_xlsx_bytes().unwrap();
    let table = ScoreTable::from_xlsx_reader(std::io::Cursor::new(bytes)).unwrap();
    let generator = ScriptedGenerator::default();

    let report = BatchRunner::new(&generator).run(table).await.unwrap();
    let output = report.table.to_xlsx_bytes().unwrap();
    let results = ScoreTable::from_xlsx_reader(std::io::Cursor::new(output)).unwrap();

    assert_eq!(results.headers().last().unwrap(), RESULT_COLUMN);
    assert_eq!(results.cell(0, "Overall Leadership"), Some("2.0"));
    assert_eq!(
        results.cell(0, RESULT_COLUMN),
        Some("Jane Doe demonstrates moderate leadership potential.")
    );
}

#[tokio::test(start_paused = true)]
async fn test_empty_table() {
    let table = candidate_table(&[]);
    let generator = ScriptedGenerator::default();

    let report = BatchRunner::new(&generator).run(table).await.unwrap();

    assert!(report.results.is_empty());
    assert!(report.table.is_empty());
    assert_eq!(report.table.headers().last().unwrap(), RESULT_COLUMN);
    assert!(generator.called_names().is_empty());
}

#[test]
fn test_sample_candidate_banding() {
    let record = ScoreTable::sample_template().record(0).unwrap();
    let profile = ScoreProfile::from_record(&record).unwrap();

    assert_eq!(profile.band_of("Overall Leadership"), Some(ScoreBand::Low));
    assert_eq!(profile.band_of("Growth"), Some(ScoreBand::High));
    assert_eq!(profile.band_of("Drive Potential"), Some(ScoreBand::Moderate));
    assert_eq!(
        profile.strengths(),
        vec!["Achievement", "Learning Potential", "Mastery", "Growth", "Develops Talent"]
    );
    assert!(profile.development_areas().contains(&"Reasoning & Problem Solving"));
    assert!(!profile.development_areas().contains(&"Drive Potential"));
}
