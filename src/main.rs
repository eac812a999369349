//! Timeline Engine - Entry Point
//!
//! Reads a JSON timeline document, runs one layout pass and prints the
//! geometry as JSON.

use clap::Parser;
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use timeline_engine::model::{EpochMillis, Item, RecordKind};
use timeline_engine::parser::{parse_document, TimelineDocument};
use timeline_engine::state::TimelineState;
use timeline_engine::view_state::stacking::Layout;
use timeline_engine::view_state::time_units::{HeaderInterval, TimeUnit};
use timeline_engine::view_state::types::{CanvasWindow, VisibleRange};
use tracing::info;

/// Timeline Engine - lay out a timeline document and print the geometry
#[derive(Parser, Debug)]
#[command(name = "timeline-engine")]
#[command(version)]
#[command(about = "Stack timeline items into lanes and print their pixel geometry as JSON")]
pub struct Args {
    /// Path to JSON timeline document (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Visible range start, ms since epoch (defaults to the earliest item)
    #[arg(long, allow_hyphen_values = true)]
    pub start: Option<EpochMillis>,

    /// Visible range end, ms since epoch (defaults to the latest item end)
    #[arg(long, allow_hyphen_values = true)]
    pub end: Option<EpochMillis>,

    /// Viewport width in pixels
    #[arg(short, long, default_value_t = 1000.0)]
    pub width: f64,

    /// Place overlapping items in separate lanes
    #[arg(long)]
    pub stack: bool,

    /// Snap interval in ms for interactions and click times
    #[arg(long)]
    pub drag_snap: Option<i64>,

    /// Include header cells for the smallest readable time unit
    #[arg(long)]
    pub headers: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Path to log file (overrides config)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// A record the parser skipped.
#[derive(Debug, Serialize)]
struct SkippedRecord {
    kind: RecordKind,
    index: usize,
    error: String,
}

/// Output of one layout pass.
#[derive(Debug, Serialize)]
struct LayoutReport {
    visible: VisibleRange,
    canvas: CanvasWindow,
    layout: Layout,
    #[serde(skip_serializing_if = "Option::is_none")]
    header_unit: Option<TimeUnit>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    headers: Vec<HeaderInterval>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    malformed: Vec<SkippedRecord>,
}

/// Earliest start and latest end across `items`, if that is a valid range.
fn item_extent(items: &[Item]) -> Option<(EpochMillis, EpochMillis)> {
    let start = items.iter().map(|item| item.start_time).min()?;
    let end = items.iter().map(Item::effective_end).max()?;
    (start < end).then_some((start, end))
}

fn read_input(file: Option<&PathBuf>) -> std::io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

fn layout_report(
    args: &Args,
    timeline: timeline_engine::config::TimelineConfig,
    document: TimelineDocument,
) -> Result<LayoutReport, timeline_engine::model::TimelineError> {
    let mut builder = TimelineState::builder()
        .config(timeline)
        .viewport_width(args.width);
    if let Some((start, end)) = item_extent(&document.items) {
        builder = builder.default_range(start, end);
    }
    if let (Some(start), Some(end)) = (args.start, args.end) {
        builder = builder.visible_range(start, end);
    }

    let state = builder
        .groups(document.groups)
        .items(document.items)
        .build()?;

    let header_unit = args.headers.then(|| state.min_unit());
    let headers = header_unit
        .map(|unit| state.header_intervals(unit))
        .unwrap_or_default();

    Ok(LayoutReport {
        visible: state.visible_range(),
        canvas: *state.canvas(),
        layout: state.layout().clone(),
        header_unit,
        headers,
        malformed: document
            .malformed
            .iter()
            .map(|record| SkippedRecord {
                kind: record.kind(),
                index: record.index(),
                error: record.error_message(),
            })
            .collect(),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let stack_override = args.stack.then_some(true);
    let config = timeline_engine::config::resolve(
        args.config.clone(),
        stack_override,
        args.drag_snap,
        args.log_file.clone(),
    )?;

    timeline_engine::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let raw = read_input(args.file.as_ref())?;
    let document = parse_document(&raw, &config.timeline.keys)?;
    let report = layout_report(&args, config.timeline, document)?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeline_engine::config::TimelineConfig;
    use timeline_engine::model::keys::Keys;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["timeline-engine", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let err = Args::try_parse_from(["timeline-engine", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["timeline-engine"]);
        assert_eq!(args.file, None);
        assert_eq!(args.start, None);
        assert_eq!(args.width, 1000.0);
        assert!(!args.stack);
        assert!(!args.headers);
        assert_eq!(args.drag_snap, None);
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_negative_start_is_accepted() {
        let args = Args::parse_from(["timeline-engine", "--start", "-5000", "--end", "5000"]);
        assert_eq!(args.start, Some(-5000));
        assert_eq!(args.end, Some(5000));
    }

    #[test]
    fn test_combined_flags() {
        let args = Args::parse_from([
            "timeline-engine",
            "plan.json",
            "-w",
            "800",
            "--stack",
            "--drag-snap",
            "60000",
            "--pretty",
        ]);
        assert_eq!(args.file, Some(PathBuf::from("plan.json")));
        assert_eq!(args.width, 800.0);
        assert!(args.stack);
        assert_eq!(args.drag_snap, Some(60_000));
        assert!(args.pretty);
    }

    #[test]
    fn test_width_rejects_text() {
        assert!(Args::try_parse_from(["timeline-engine", "--width", "wide"]).is_err());
    }

    #[test]
    fn item_extent_spans_all_items() {
        let raw = r#"{"groups":[{"id":"g"}],"items":[
            {"id":"a","group":"g","start_time":100,"end_time":200},
            {"id":"b","group":"g","start_time":50,"end_time":150}
        ]}"#;
        let document = parse_document(raw, &Keys::default()).unwrap();
        assert_eq!(item_extent(&document.items), Some((50, 200)));
        assert_eq!(item_extent(&[]), None);
    }

    #[test]
    fn explicit_range_wins_over_item_extent() {
        let raw = r#"{"groups":[{"id":"g"}],"items":[
            {"id":"a","group":"g","start_time":0,"end_time":3600000}
        ]}"#;
        let document = parse_document(raw, &Keys::default()).unwrap();
        let args = Args::parse_from(["timeline-engine", "--start", "0", "--end", "7200000", "--headers"]);

        let report = layout_report(&args, TimelineConfig::default(), document).unwrap();

        assert_eq!(report.visible.end(), 7_200_000);
        assert!(report.header_unit.is_some());
        assert!(!report.headers.is_empty());
        assert!(report.layout.dimension_items.len() == 1);
    }

    #[test]
    fn extreme_item_times_lay_out() {
        let raw = r#"{"groups":[{"id":"g"}],"items":[
            {"id":"a","group":"g","start_time":-9000000000000000000,"end_time":9000000000000000000}
        ]}"#;
        let document = parse_document(raw, &Keys::default()).unwrap();
        let args = Args::parse_from(["timeline-engine"]);

        let report = layout_report(&args, TimelineConfig::default(), document).unwrap();

        assert_eq!(report.canvas.canvas_time_start, i64::MIN);
        assert_eq!(report.layout.dimension_items.len(), 1);
    }

    #[test]
    fn empty_document_without_range_is_an_error() {
        let args = Args::parse_from(["timeline-engine"]);
        let result = layout_report(&args, TimelineConfig::default(), TimelineDocument::default());
        assert!(matches!(
            result,
            Err(timeline_engine::model::TimelineError::MissingTimeRange)
        ));
    }
}
