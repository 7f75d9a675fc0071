mod record;

use medsign_base::{log, log_fatal};
use medsign_gesture::{GesturePipeline, MedicalGestureResult, PipelineConfig, PipelineStats, PredictorRegistry};
use record::ReplayRecord;
use std::env;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;

const DEFAULT_WORKERS: usize = 2;

fn build_pipeline(predictor_name: &str) -> GesturePipeline {
    let mut registry = PredictorRegistry::new();
    let Some(predictor) = registry.take(predictor_name) else {
        log_fatal!(
            "unknown predictor '{predictor_name}', available: {}",
            registry.list().join(", ")
        );
    };
    GesturePipeline::new(PipelineConfig::default(), predictor)
}

/// Owns the pipeline (and so the stream state) of every stream routed to it.
async fn run_worker(
    id: usize,
    mut pipeline: GesturePipeline,
    mut records: mpsc::Receiver<ReplayRecord>,
    results: mpsc::Sender<MedicalGestureResult>,
) -> PipelineStats {
    while let Some(record) = records.recv().await {
        let quality = record.frame_quality();
        match pipeline.process_detection(&record.stream, record.timestamp, record.detection(), quality.as_ref()) {
            Ok(Some(result)) => {
                if results.send(result).await.is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => log::error!("worker {id}: stream '{}': {e}", record.stream),
        }
    }
    pipeline.stats()
}

async fn open_input() -> std::io::Result<Box<dyn AsyncRead + Unpin + Send>> {
    match env::args().nth(1) {
        Some(path) => {
            log::info!("replaying {path}");
            Ok(Box::new(tokio::fs::File::open(path).await?))
        }
        None => {
            log::info!("replaying stdin");
            Ok(Box::new(tokio::io::stdin()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match env::var("MEDSIGN_LOG_DIR") {
        Ok(dir) => medsign_base::init_file_logger(dir)?,
        Err(_) => medsign_base::init_stdout_logger(),
    }

    let predictor_name = env::var("MEDSIGN_PREDICTOR").unwrap_or_else(|_| "rules".to_string());
    let workers = env::var("MEDSIGN_WORKERS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_WORKERS);

    log::info!("gesture replay: predictor '{predictor_name}', {workers} workers");

    let (result_tx, mut result_rx) = mpsc::channel::<MedicalGestureResult>(64);
    let mut senders = Vec::with_capacity(workers);
    let mut handles = Vec::with_capacity(workers);
    for id in 0..workers {
        let (tx, rx) = mpsc::channel::<ReplayRecord>(64);
        let pipeline = build_pipeline(&predictor_name);
        handles.push(tokio::spawn(run_worker(id, pipeline, rx, result_tx.clone())));
        senders.push(tx);
    }
    drop(result_tx);

    let printer = tokio::spawn(async move {
        let mut printed = 0usize;
        while let Some(result) = result_rx.recv().await {
            match result.to_json() {
                Ok(json) => {
                    println!("{json}");
                    printed += 1;
                }
                Err(e) => log::error!("failed to serialize result: {e}"),
            }
        }
        printed
    });

    let mut lines = BufReader::new(open_input().await?).lines();
    let mut line_no = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        let record = match ReplayRecord::parse(&line) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("line {line_no}: skipping malformed record: {e}");
                continue;
            }
        };
        let worker = record.worker(workers);
        if senders[worker].send(record).await.is_err() {
            log::error!("worker {worker} stopped early");
            break;
        }
    }
    drop(senders);

    let mut total = PipelineStats::default();
    for handle in handles {
        let stats = handle.await?;
        total.frames += stats.frames;
        total.skipped_low_quality += stats.skipped_low_quality;
        total.invalid_landmarks += stats.invalid_landmarks;
        total.no_gesture += stats.no_gesture;
        total.pending += stats.pending;
        total.stable_results += stats.stable_results;
        total.predictor_errors += stats.predictor_errors;
        total.detector_errors += stats.detector_errors;
    }
    let printed = printer.await?;

    log::info!(
        "{line_no} lines, {} frames: {} low quality, {} invalid, {} no gesture, {} pending, {} stable ({printed} printed), {} predictor errors, {} detector errors",
        total.frames,
        total.skipped_low_quality,
        total.invalid_landmarks,
        total.no_gesture,
        total.pending,
        total.stable_results,
        total.predictor_errors,
        total.detector_errors
    );

    Ok(())
}
