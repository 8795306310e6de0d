//! Check targets: which file is read, which predicate applies, and the
//! literal strings each challenge prints.
//!
//! Targets are built from literals only. Nothing here is loaded from the
//! environment or a config file, so a verdict depends on the file bytes alone.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Flag revealed when the dirty book has been cleaned.
pub const DIRTY_BOOK_FLAG: &str = "FLAG{br3@k_th3_$y$T3m}";

/// Flag that must be copied into the key box (and is echoed back on success).
pub const KEY_BOX_FLAG: &str = "FLAG{n0_w4y_y0u_r34d_4ll_0f_th3m}";

/// Keyword that must appear next to the flag in the key box.
pub const KEY_BOX_KEYWORD: &str = "\u{65e9}\u{9910}\u{5403}\u{5230}\u{98fd}";

const KEY_BOX_PASS_BANNER: &str = "\u{2705} \u{9a57}\u{8b49}\u{6210}\u{529f}\u{ff01}";
const KEY_BOX_FAIL_MESSAGE: &str = "\u{274c} \u{9a57}\u{8b49}\u{5931}\u{6557}";

/// Which rule a target enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PredicateMode {
    /// Passes when no line of the file contains this character.
    ForbiddenChar(char),
    /// Passes when the whole content contains every one of these literals.
    /// Order is kept for reporting only.
    RequiredSubstrings(Vec<String>),
}

/// Output stream a message is written to.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Stream {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

/// How a passing verdict shows the flag.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Reveal {
    /// The flag alone on one line.
    Bare,
    /// A banner line, then `FLAG: <flag>`.
    Labeled {
        /// First line of the success message.
        banner: String,
    },
}

/// Text printed when the target file cannot be checked.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UnavailableMessage {
    /// `prefix` followed by the target path.
    NamePath {
        /// Text before the path.
        prefix: String,
    },
    /// A fixed line that does not mention the path.
    Fixed(String),
}

/// Reporting for the file-unavailable case. Always written to stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Unavailable {
    /// Text written to stderr.
    pub message: UnavailableMessage,
    /// Process exit status for this case.
    pub exit_code: u8,
}

/// A file, the rule it must satisfy, and the literal output for each outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct CheckTarget {
    /// Path opened for reading, relative paths resolve against the working directory.
    pub path: PathBuf,
    /// Rule the file content must satisfy.
    pub mode: PredicateMode,
    /// Reward string, printed only on a pass.
    pub flag: String,
    /// How a pass shows the flag.
    pub reveal: Reveal,
    /// Message for a readable file that fails the predicate.
    pub fail_message: String,
    /// Stream the failure message is written to.
    pub fail_stream: Stream,
    /// Message and exit status when the file cannot be checked.
    pub unavailable: Unavailable,
}

impl CheckTarget {
    /// Same target with its path resolved under `dir`.
    ///
    /// Absolute target paths are left as they are.
    #[doc(hidden)]
    #[must_use]
    pub fn rooted_at(&self, dir: &Path) -> Self {
        let mut target = self.clone();
        target.path = dir.join(&self.path);
        target
    }

    /// Full success message, flag included.
    #[must_use]
    pub fn pass_message(&self) -> String {
        match &self.reveal {
            Reveal::Bare => self.flag.clone(),
            Reveal::Labeled { banner } => format!("{banner}\nFLAG: {}", self.flag),
        }
    }

    /// Message for the file-unavailable case.
    #[must_use]
    pub fn unavailable_message(&self) -> String {
        match &self.unavailable.message {
            UnavailableMessage::NamePath { prefix } => {
                format!("{prefix}{}", self.path.display())
            }
            UnavailableMessage::Fixed(text) => text.clone(),
        }
    }
}

/// The fixed checker programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Challenge {
    /// Remove every `#` from `dirtyBook.txt`.
    DirtyBook,
    /// Put the flag and the keyword into `./box/key.txt`.
    KeyBox,
}

impl Challenge {
    /// Short name used on the command line and in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::DirtyBook => "dirty-book",
            Self::KeyBox => "key-box",
        }
    }

    /// Build this challenge's target from its literals.
    #[must_use]
    pub fn target(self) -> CheckTarget {
        match self {
            Self::DirtyBook => CheckTarget {
                path: PathBuf::from("dirtyBook.txt"),
                mode: PredicateMode::ForbiddenChar('#'),
                flag: DIRTY_BOOK_FLAG.to_owned(),
                reveal: Reveal::Bare,
                fail_message: "Not fully cleaned".to_owned(),
                fail_stream: Stream::Stdout,
                unavailable: Unavailable {
                    message: UnavailableMessage::NamePath {
                        prefix: "[ERROR] Failed to open file: ".to_owned(),
                    },
                    exit_code: 2,
                },
            },
            Self::KeyBox => CheckTarget {
                path: PathBuf::from("./box/key.txt"),
                mode: PredicateMode::RequiredSubstrings(vec![
                    KEY_BOX_FLAG.to_owned(),
                    KEY_BOX_KEYWORD.to_owned(),
                ]),
                flag: KEY_BOX_FLAG.to_owned(),
                reveal: Reveal::Labeled {
                    banner: KEY_BOX_PASS_BANNER.to_owned(),
                },
                fail_message: KEY_BOX_FAIL_MESSAGE.to_owned(),
                fail_stream: Stream::Stderr,
                unavailable: Unavailable {
                    message: UnavailableMessage::Fixed(KEY_BOX_FAIL_MESSAGE.to_owned()),
                    exit_code: 1,
                },
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_dirty_book_pass_message_is_bare_flag() {
        let target = Challenge::DirtyBook.target();
        assert_eq!(target.pass_message(), DIRTY_BOOK_FLAG);
        assert_eq!(target.mode, PredicateMode::ForbiddenChar('#'));
    }

    #[test]
    fn test_key_box_pass_message_has_banner_and_flag_line() {
        let target = Challenge::KeyBox.target();
        let message = target.pass_message();
        let mut lines = message.lines();
        assert_eq!(lines.next(), Some("\u{2705} \u{9a57}\u{8b49}\u{6210}\u{529f}\u{ff01}"));
        assert_eq!(lines.next(), Some("FLAG: FLAG{n0_w4y_y0u_r34d_4ll_0f_th3m}"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_unavailable_messages() {
        let dirty = Challenge::DirtyBook.target();
        assert_eq!(
            dirty.unavailable_message(),
            "[ERROR] Failed to open file: dirtyBook.txt"
        );
        assert_eq!(dirty.unavailable.exit_code, 2);

        let key = Challenge::KeyBox.target();
        assert_eq!(key.unavailable_message(), key.fail_message);
        assert_eq!(key.unavailable.exit_code, 1);
    }

    #[test]
    fn test_rooted_at_joins_relative_path() {
        let target = Challenge::KeyBox.target().rooted_at(Path::new("/tmp/run"));
        assert_eq!(target.path, Path::new("/tmp/run/./box/key.txt"));
    }
}
