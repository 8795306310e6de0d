//! Verdict types.

use serde::Serialize;

use crate::target::{CheckTarget, Stream};

/// Why a verdict came out the way it did.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "reason", rename_all = "snake_case")]
#[non_exhaustive]
pub enum VerdictDetail {
    /// The forbidden character occurs; scanning stopped at the first hit.
    ForbiddenCharFound {
        /// 1-indexed line of the first hit.
        line: usize,
    },
    /// No line contains the forbidden character.
    ForbiddenCharAbsent {
        /// Number of lines read.
        lines_scanned: usize,
    },
    /// Every required literal occurs in the content.
    AllSubstringsPresent,
    /// Some required literals are absent.
    ///
    /// Only positions are reported: the literals themselves may include the
    /// flag, which a failing verdict must never show.
    SubstringsMissing {
        /// 0-indexed positions in the target's required list, ascending.
        missing: Vec<usize>,
    },
}

/// Result of checking one target. Produced once per run.
///
/// A failing verdict is a normal result, not an error.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct Verdict {
    /// Whether the file satisfies the target's predicate.
    pub success: bool,
    /// Human-readable message, possibly several lines.
    pub message: String,
    /// The flag; only set when `success` is `true`.
    pub revealed_flag: Option<String>,
    /// Stream the human-readable message belongs on.
    #[serde(skip)]
    pub stream: Stream,
    /// What the scan saw.
    pub detail: VerdictDetail,
}

impl Verdict {
    /// A passing verdict for `target`, revealing its flag.
    #[must_use]
    pub fn pass(target: &CheckTarget, detail: VerdictDetail) -> Self {
        Self {
            success: true,
            message: target.pass_message(),
            revealed_flag: Some(target.flag.clone()),
            stream: Stream::Stdout,
            detail,
        }
    }

    /// A failing verdict for `target`. The flag is withheld.
    #[must_use]
    pub fn fail(target: &CheckTarget, detail: VerdictDetail) -> Self {
        Self {
            success: false,
            message: target.fail_message.clone(),
            revealed_flag: None,
            stream: target.fail_stream,
            detail,
        }
    }
}
