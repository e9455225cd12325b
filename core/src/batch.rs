//! Parsing many logs at once.
//!
//! Logs are independent, so they are parsed in parallel with rayon. Each log
//! gets `<stem>.json` in the output directory (and `<stem>-BlockDump.txt`
//! with `debug` on). Both files are recreated before the log is read, so a
//! failed parse never leaves output from an earlier run behind.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use alv_types::ParserSettings;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{LogParseFailure, ParseError};
use crate::game_data::{AscensionPath, CharacterClass, GameMode};
use crate::parser::{MafiaLogParser, log_name_of};
use crate::summary::LogSummaryData;
use crate::timeline::{Timeline, TurnNumber};

const OUTPUT_EXTENSION: &str = "json";
const BLOCK_DUMP_SUFFIX: &str = "-BlockDump.txt";

/// What gets written for each successfully parsed log.
#[derive(Debug, Serialize)]
pub struct LogReport<'a> {
    pub log_name: &'a str,
    pub character_class: CharacterClass,
    pub ascension_path: AscensionPath,
    pub game_mode: GameMode,
    pub last_turn: TurnNumber,
    pub summary: &'a LogSummaryData,
}

impl<'a> LogReport<'a> {
    pub fn new(timeline: &'a Timeline) -> Result<Self, ParseError> {
        Ok(Self {
            log_name: timeline.log_name(),
            character_class: timeline.character_class(),
            ascension_path: timeline.ascension_path(),
            game_mode: timeline.game_mode(),
            last_turn: timeline.last_turn_number(),
            summary: timeline.log_summary()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLog {
    pub log_name: String,
    pub output: PathBuf,
    pub last_turn: TurnNumber,
}

/// Outcome of a batch: one entry per input, split by success.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub parsed: Vec<ParsedLog>,
    pub failures: Vec<LogParseFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub fn output_path(output_dir: &Path, log_name: &str) -> PathBuf {
    output_dir.join(format!("{log_name}.{OUTPUT_EXTENSION}"))
}

pub fn block_dump_path(output_dir: &Path, log_name: &str) -> PathBuf {
    output_dir.join(format!("{log_name}{BLOCK_DUMP_SUFFIX}"))
}

/// Parse every log in `paths`, writing results into `output_dir`.
///
/// A failing log is recorded in [`BatchReport::failures`] with the last turn
/// it reached; the other logs are unaffected. Results keep input order.
pub fn parse_logs(paths: &[PathBuf], settings: ParserSettings, output_dir: &Path) -> BatchReport {
    let parser = MafiaLogParser::new(settings);

    let results: Vec<Result<ParsedLog, LogParseFailure>> = paths
        .par_iter()
        .map(|path| parse_one(&parser, path, output_dir))
        .collect();

    let mut report = BatchReport::default();
    for result in results {
        match result {
            Ok(parsed) => report.parsed.push(parsed),
            Err(failure) => {
                tracing::warn!(
                    log = %failure.log_name,
                    last_turn = failure.last_turn,
                    error = %failure.source,
                    "Log could not be parsed"
                );
                report.failures.push(failure);
            }
        }
    }
    tracing::info!(
        parsed = report.parsed.len(),
        failed = report.failures.len(),
        "Batch finished"
    );
    report
}

fn parse_one(
    parser: &MafiaLogParser,
    path: &Path,
    output_dir: &Path,
) -> Result<ParsedLog, LogParseFailure> {
    let log_name = log_name_of(path);
    let failure = |last_turn, source| LogParseFailure {
        log_name: log_name.clone(),
        last_turn,
        source,
    };

    let output = output_path(output_dir, &log_name);
    let file = File::create(&output).map_err(|source| {
        failure(
            0,
            ParseError::Io {
                path: output.clone(),
                source,
            },
        )
    })?;

    let dump = parser
        .settings()
        .debug
        .then(|| block_dump_path(output_dir, &log_name));
    let timeline = parser.parse_file(path, dump.as_deref())?;

    write_report(file, &output, &timeline)
        .map_err(|source| failure(timeline.last_turn_number(), source))?;

    Ok(ParsedLog {
        log_name,
        output,
        last_turn: timeline.last_turn_number(),
    })
}

fn write_report(file: File, output: &Path, timeline: &Timeline) -> Result<(), ParseError> {
    let report = LogReport::new(timeline)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report).map_err(|source| ParseError::Output {
        path: output.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|source| ParseError::Io {
        path: output.to_path_buf(),
        source,
    })
}

/// Create `output_dir` if it does not exist yet.
pub fn ensure_output_dir(output_dir: &Path) -> Result<(), ParseError> {
    fs::create_dir_all(output_dir).map_err(|source| ParseError::Io {
        path: output_dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_log_file(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_batch_writes_json_and_collects_failures() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let good = make_log_file(
            input.path(),
            "Hero_20200303.txt",
            "[1] The Spooky Forest\nEncounter: spooky vampire\n\n[2] The Spooky Forest\n",
        );
        let bad = make_log_file(
            input.path(),
            "Hero_20200304.txt",
            "[7] The Dire Warren\n\nCombing square 1,1\n",
        );

        let report = parse_logs(&[good, bad], ParserSettings::default(), output.path());

        assert_eq!(report.parsed.len(), 1);
        assert_eq!(report.parsed[0].log_name, "Hero_20200303");
        assert_eq!(report.parsed[0].last_turn, 2);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report.parsed[0].output).unwrap()).unwrap();
        assert_eq!(json["log_name"], "Hero_20200303");
        assert_eq!(json["summary"]["total_turns_spent"], 2);

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].log_name, "Hero_20200304");
        assert_eq!(report.failures[0].last_turn, 7);
        assert!(!report.is_success());
    }

    #[test]
    fn test_stale_output_is_truncated_on_failure() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let stale = output_path(output.path(), "broken");
        fs::write(&stale, "{\"from\": \"last run\"}").unwrap();
        let bad = make_log_file(input.path(), "broken.txt", "Combing square 1,1\n");

        let report = parse_logs(&[bad], ParserSettings::default(), output.path());

        assert_eq!(report.failures.len(), 1);
        assert_eq!(fs::read_to_string(&stale).unwrap(), "");
    }

    #[test]
    fn test_debug_writes_block_dump() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let log = make_log_file(input.path(), "run.txt", "[1] The Spooky Forest\n");
        let settings = ParserSettings {
            debug: true,
            ..ParserSettings::default()
        };

        let report = parse_logs(&[log], settings, output.path());

        assert!(report.is_success());
        let dump = fs::read_to_string(block_dump_path(output.path(), "run")).unwrap();
        assert!(dump.starts_with("-------- BLOCK: ENCOUNTER --------"));
    }

    #[test]
    fn test_missing_output_dir_is_created() {
        let output = TempDir::new().unwrap();
        let nested = output.path().join("a").join("b");
        ensure_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
