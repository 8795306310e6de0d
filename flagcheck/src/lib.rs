//! # flagcheck
//!
//! File-content checks for the challenge exercises.
//!
//! Each challenge names one file and one rule. The file is either scanned
//! line by line for a forbidden character, or read whole and searched for a
//! set of required literals. A readable file always yields a [`Verdict`];
//! only a file that cannot be opened or read yields a [`CheckError`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flagcheck::{Challenge, ReadLimits, check};
//!
//! let target = Challenge::DirtyBook.target();
//! match check(&target, &ReadLimits::default()) {
//!     Ok(verdict) => println!("{}", verdict.message),
//!     Err(_) => eprintln!("{}", target.unavailable_message()),
//! }
//! ```

mod error;
pub mod output;
mod scan;
mod target;
mod verdict;

pub use error::{CheckError, CheckErrorKind};
pub use scan::{
    LineHit, LineScan, ReadLimits, find_missing_substrings, missing_substrings,
    scan_for_forbidden_char, scan_for_required_substrings,
};
pub use target::{
    Challenge, CheckTarget, DIRTY_BOOK_FLAG, KEY_BOX_FLAG, KEY_BOX_KEYWORD, PredicateMode, Reveal,
    Stream, Unavailable, UnavailableMessage,
};
pub use verdict::{Verdict, VerdictDetail};

use std::io::BufReader;

use tracing::{debug, info};

/// Check `target` against its predicate.
///
/// Opens the file, applies the target's mode and builds the verdict. The
/// file handle is released before this returns. The result depends only on
/// the file's bytes.
///
/// # Errors
///
/// Returns [`CheckError::Unavailable`] if the file cannot be opened,
/// [`CheckError::Read`] if reading fails, and [`CheckError::TooLarge`] if a
/// substring search needs more than `limits.max_file_size` bytes (uncapped
/// by default). A file that fails the
/// predicate is `Ok` with `success: false`.
pub fn check(target: &CheckTarget, limits: &ReadLimits) -> Result<Verdict, CheckError> {
    let path = target.path.as_path();
    debug!(path = %path.display(), "opening target");
    let file = scan::open(path)?;

    let verdict = match &target.mode {
        PredicateMode::ForbiddenChar(forbidden) => {
            match scan_for_forbidden_char(BufReader::new(file), *forbidden, path)? {
                LineScan::Found(hit) => Verdict::fail(
                    target,
                    VerdictDetail::ForbiddenCharFound { line: hit.line },
                ),
                LineScan::Clean { lines_scanned } => Verdict::pass(
                    target,
                    VerdictDetail::ForbiddenCharAbsent { lines_scanned },
                ),
            }
        }
        PredicateMode::RequiredSubstrings(required) => {
            let missing = find_missing_substrings(file, required, path, limits.max_file_size)?;
            if missing.is_empty() {
                Verdict::pass(target, VerdictDetail::AllSubstringsPresent)
            } else {
                Verdict::fail(target, VerdictDetail::SubstringsMissing { missing })
            }
        }
    };

    info!(path = %path.display(), success = verdict.success, "verdict");
    Ok(verdict)
}
