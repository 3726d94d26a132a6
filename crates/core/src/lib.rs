pub mod analyzer;
pub mod cache;
pub mod config;
pub mod context;
pub mod display;
pub mod error;
pub mod export;
pub mod format;
pub mod formats;
pub mod parser;
pub mod playback;
pub mod recovery;
pub mod types;

pub use analyzer::{
    BatchEvent, BatchSummary, FileState, GeminiClient, Generation, RemoteFile, VideoAnalyzer, VideoSource,
    VideoUnderstanding,
};
pub use cache::{
    get_analysis_path, get_cache_dir, get_root_cache_dir, load_cached_analysis, save_analysis,
};
pub use config::AnalyzerConfig;
pub use context::extract_context;
pub use display::order_for_display;
pub use error::{AdLabelError, Result};
pub use export::{
    CSV_HEADER, CSV_MIME_TYPE, default_export_filename, export_csv, export_csv_json,
    export_reports, flatten_reports, records_from_json, records_to_json, report_rows, write_csv,
};
pub use format::{format_duration, format_report_readable};
pub use formats::{
    ClipRecord, FormatCount, VideoGroup, format_counts, group_by_video, videos_with_format,
};
pub use parser::parse_report;
pub use playback::PlaybackCoordinator;
pub use recovery::parse_report_lenient;
pub use types::{
    AnalysisOutcome, AnalysisRecord, ExportRow, ParsedReport, Report, ReportContext, Section,
    UNKNOWN,
};
