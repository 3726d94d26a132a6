use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result};
use console::style;
use tokio::fs;
use tracing::info;

use indicatif::ProgressBar;

use adlabel_core::{
    AnalyzerConfig, BatchEvent, ClipRecord, GeminiClient, ParsedReport, VideoAnalyzer,
    VideoSource, export_csv, export_csv_json, extract_context, format_counts, format_duration,
    format_report_readable, get_root_cache_dir, group_by_video, parse_report,
    parse_report_lenient, records_to_json, videos_with_format,
};

use crate::ui::{banner, create_spinner, failed, ok, rule};

pub struct AnalyzeArgs {
    pub sources: Vec<String>,
    pub force: bool,
    pub lenient: bool,
    pub csv: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

fn parse_text(raw_text: &str, lenient: bool) -> ParsedReport {
    if lenient {
        parse_report_lenient(raw_text)
    } else {
        parse_report(raw_text)
    }
}

fn print_report(label: &str, raw_text: &str, lenient: bool) {
    let context = extract_context(raw_text);
    let parsed = parse_text(raw_text, lenient);
    rule();
    println!("{}", format_report_readable(label, &context, &parsed));
}

pub async fn analyze(args: AnalyzeArgs) -> Result<()> {
    let config = AnalyzerConfig::from_env();
    // Fail on a missing key before touching any video.
    let client = GeminiClient::from_config(config.clone())?;
    let model = config.model.clone();
    let analyzer =
        VideoAnalyzer::new(client, config).with_cache(get_root_cache_dir(), args.force);

    banner(&format!("Creative analysis with {}", model));

    let sources: Vec<VideoSource> = args.sources.iter().map(|s| VideoSource::parse(s)).collect();
    let started = Instant::now();
    let mut spinner: Option<ProgressBar> = None;

    let summary = analyzer
        .analyze_batch_with(&sources, |event| match event {
            BatchEvent::Started { label } => {
                spinner = Some(create_spinner(&format!("Analyzing {}...", label)));
            }
            BatchEvent::Cached { label } => {
                if let Some(pb) = spinner.take() {
                    pb.finish_with_message(format!("{} {}", ok(label), style("(cached)").dim()));
                }
            }
            BatchEvent::Completed { label, elapsed } => {
                if let Some(pb) = spinner.take() {
                    pb.finish_with_message(ok(format!(
                        "{} {}",
                        label,
                        style(format_duration(elapsed)).dim()
                    )));
                }
            }
            BatchEvent::Failed { label, error } => {
                if let Some(pb) = spinner.take() {
                    pb.finish_with_message(failed(format!("{} {}", label, style(error).red())));
                }
            }
        })
        .await;

    println!(
        "\n{} {} analyzed ({} cached), {} failed in {}\n",
        style("Done:").dim(),
        style(summary.completed).green(),
        summary.cached,
        style(summary.failed).red(),
        format_duration(started.elapsed())
    );

    let records = summary.records;
    for record in &records {
        if let Some(raw_text) = record.raw_text() {
            print_report(&record.source_label, raw_text, args.lenient);
        }
    }

    if let Some(path) = &args.csv {
        fs::write(path, export_csv(&records)?)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        println!("{} {}", style("Saved CSV:").dim(), style(path.display()).cyan());
    }
    if let Some(path) = &args.json {
        let payload = serde_json::to_string_pretty(&records_to_json(&records))?;
        fs::write(path, payload)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        println!("{} {}", style("Saved JSON:").dim(), style(path.display()).cyan());
    }

    Ok(())
}

pub async fn export(input: &Path, output: Option<&Path>) -> Result<()> {
    let raw = fs::read_to_string(input)
        .await
        .with_context(|| format!("reading {}", input.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", input.display()))?;
    let csv = export_csv_json(&value)?;

    match output {
        Some(path) => {
            fs::write(path, &csv)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), rows = csv.lines().count() - 1, "csv written");
            eprintln!("{}", ok(format!("Saved {}", style(path.display()).cyan())));
        }
        None => print!("{}", csv),
    }
    Ok(())
}

pub async fn parse(file: &Path, lenient: bool) -> Result<()> {
    let raw_text = fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    let label = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    let context = extract_context(&raw_text);
    let parsed = parse_text(&raw_text, lenient);
    println!("{}", format_report_readable(&label, &context, &parsed));
    Ok(())
}

pub async fn formats(clips_path: &Path, format: Option<&str>) -> Result<()> {
    let raw = fs::read_to_string(clips_path)
        .await
        .with_context(|| format!("reading {}", clips_path.display()))?;
    let clips: Vec<ClipRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of clips", clips_path.display()))?;
    let groups = group_by_video(clips);

    match format {
        Some(name) => {
            let videos = videos_with_format(&groups, name);
            println!(
                "{} {} {}\n",
                style(videos.len()).cyan().bold(),
                style("videos with format").dim(),
                style(name).yellow()
            );
            for video in videos {
                println!(
                    "  {} {}",
                    video.whole_video_url,
                    style(format!("({} clips)", video.clips.len())).dim()
                );
            }
        }
        None => {
            let counts = format_counts(&groups);
            if counts.is_empty() {
                println!("{}", style("No ad formats found.").dim());
            }
            for count in counts {
                println!(
                    "{:>3}. {:<40} {}",
                    count.id,
                    count.format,
                    style(format!("{} videos", count.video_count)).cyan()
                );
            }
        }
    }
    Ok(())
}
