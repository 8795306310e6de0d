//! Output formatting for verdicts and unavailable targets.
//!
//! Human output is the literal text each checker has always printed, split
//! across stdout and stderr. JSON output goes to a single writer for scripts.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::{CheckError, CheckErrorKind};
use crate::target::{CheckTarget, Stream};
use crate::verdict::Verdict;

#[derive(Serialize)]
struct UnavailableReport<'a> {
    success: bool,
    message: String,
    error: CheckErrorKind,
    path: &'a Path,
    cause: String,
}

/// Write the verdict's message to the stream it belongs on.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(
    verdict: &Verdict,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> anyhow::Result<()> {
    match verdict.stream {
        Stream::Stdout => writeln!(stdout, "{}", verdict.message)?,
        Stream::Stderr => writeln!(stderr, "{}", verdict.message)?,
    }
    Ok(())
}

/// Write the target's unavailable message.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_unavailable_human(target: &CheckTarget, stderr: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(stderr, "{}", target.unavailable_message())?;
    Ok(())
}

/// Format a verdict as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(verdict: &Verdict, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(verdict)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format an unavailable target as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_unavailable_json(
    target: &CheckTarget,
    error: &CheckError,
    writer: &mut dyn Write,
) -> anyhow::Result<()> {
    let cause = std::error::Error::source(error)
        .map_or_else(|| error.to_string(), |source| format!("{error}: {source}"));
    let report = UnavailableReport {
        success: false,
        message: target.unavailable_message(),
        error: error.kind(),
        path: &target.path,
        cause,
    };
    let json = serde_json::to_string_pretty(&report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::target::Challenge;
    use crate::verdict::VerdictDetail;
    use std::io;

    fn render(verdict: &Verdict) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        write_human(verdict, &mut out, &mut err).unwrap();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_dirty_book_fail_goes_to_stdout() {
        let target = Challenge::DirtyBook.target();
        let verdict = Verdict::fail(&target, VerdictDetail::ForbiddenCharFound { line: 1 });

        let (out, err) = render(&verdict);
        assert_eq!(out, "Not fully cleaned\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_key_box_fail_goes_to_stderr() {
        let target = Challenge::KeyBox.target();
        let verdict = Verdict::fail(
            &target,
            VerdictDetail::SubstringsMissing { missing: vec![1] },
        );

        let (out, err) = render(&verdict);
        assert!(out.is_empty());
        assert_eq!(err, "\u{274c} \u{9a57}\u{8b49}\u{5931}\u{6557}\n");
    }

    #[test]
    fn test_key_box_pass_prints_banner_and_flag() {
        let target = Challenge::KeyBox.target();
        let verdict = Verdict::pass(&target, VerdictDetail::AllSubstringsPresent);

        let (out, err) = render(&verdict);
        assert_eq!(
            out,
            "\u{2705} \u{9a57}\u{8b49}\u{6210}\u{529f}\u{ff01}\nFLAG: FLAG{n0_w4y_y0u_r34d_4ll_0f_th3m}\n"
        );
        assert!(err.is_empty());
    }

    #[test]
    fn test_json_fail_withholds_key_box_flag() {
        let target = Challenge::KeyBox.target();
        let verdict = Verdict::fail(
            &target,
            VerdictDetail::SubstringsMissing { missing: vec![0, 1] },
        );

        let mut out = Vec::new();
        write_json(&verdict, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert!(!text.contains("FLAG{"), "got: {text}");
        assert!(json["revealed_flag"].is_null());
        assert_eq!(json["detail"]["missing"], serde_json::json!([0, 1]));
    }

    #[test]
    fn test_unavailable_human_names_path() {
        let mut err = Vec::new();
        write_unavailable_human(&Challenge::DirtyBook.target(), &mut err).unwrap();
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "[ERROR] Failed to open file: dirtyBook.txt\n"
        );
    }

    #[test]
    fn test_json_pass_includes_flag_and_detail() {
        let target = Challenge::DirtyBook.target();
        let verdict = Verdict::pass(&target, VerdictDetail::ForbiddenCharAbsent { lines_scanned: 2 });

        let mut out = Vec::new();
        write_json(&verdict, &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["revealed_flag"], "FLAG{br3@k_th3_$y$T3m}");
        assert_eq!(json["detail"]["reason"], "forbidden_char_absent");
        assert_eq!(json["detail"]["lines_scanned"], 2);
        assert!(json.get("stream").is_none());
    }

    #[test]
    fn test_json_unavailable_names_kind() {
        let target = Challenge::KeyBox.target();
        let error = CheckError::Unavailable {
            path: target.path.clone(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };

        let mut out = Vec::new();
        write_unavailable_json(&target, &error, &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "unavailable");
        assert_eq!(json["path"], "./box/key.txt");
        assert!(json["cause"].as_str().unwrap().contains("not found"));
    }
}
