//! Log-line redaction
//!
//! Masks the values of sensitive `key=value` tokens in free-text log lines
//! before they reach the log sink. The message format is a separator-delimited
//! sequence of `key=value` tokens; values never contain the separator.
//!
//! Two layers:
//! - [`Redactor`]: one compiled pattern over an arbitrary field set.
//! - [`redact_pii`] / [`RedactingMakeWriter`]: the fixed PII policy
//!   ({name, email, phone, ssn, password}, mask `***`, separator `;`)
//!   applied to fully rendered lines at the `tracing` writer seam.
//!
//! # Examples
//! ```
//! use redaction::Redactor;
//!
//! let redactor = Redactor::new(&["password", "email"], "***", ';').unwrap();
//! assert_eq!(
//!     redactor.redact("name=Bob;password=hunter2;email=a@b.com;city=NYC"),
//!     "name=Bob;password=***;email=***;city=NYC",
//! );
//! ```

use std::io;

use lazy_static::lazy_static;
use regex::Captures;
use regex::Regex;
use thiserror::Error;
use tracing_subscriber::fmt::MakeWriter;

/// Message keys whose values are always considered sensitive.
pub const PII_FIELDS: [&str; 5] = ["name", "email", "phone", "ssn", "password"];

/// Replacement written over every masked value.
pub const PII_MASK: &str = "***";

/// Token separator of rendered log lines.
pub const PII_SEPARATOR: char = ';';

/// Error building a redaction pattern.
#[derive(Debug, Error)]
pub enum RedactionError {
    #[error("invalid redaction pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Value masker for a fixed set of sensitive field names.
///
/// All fields are folded into one combined pattern,
/// `\b(field1|field2|...)=<run of non-separator characters>`, and every match
/// is substituted with `key=mask`. Keys match whole and case-sensitively;
/// tokens with other keys pass through with their order and count untouched.
#[derive(Debug)]
pub struct Redactor {
    pattern: Option<Regex>,
    mask: String,
}

impl Redactor {
    /// Compile a redactor for the given field names.
    ///
    /// Field names and the separator are taken literally (regex
    /// metacharacters are escaped). An empty field set redacts nothing.
    ///
    /// # Errors
    /// * `Pattern` - The combined pattern failed to compile
    pub fn new(fields: &[&str], mask: &str, separator: char) -> Result<Self, RedactionError> {
        let pattern = if fields.is_empty() {
            None
        } else {
            let alternation = fields
                .iter()
                .map(|field| regex::escape(field))
                .collect::<Vec<_>>()
                .join("|");
            let separator = regex::escape(&separator.to_string());
            Some(Regex::new(&format!(
                r"\b(?P<field>{})=[^{}]*",
                alternation, separator
            ))?)
        };

        Ok(Self {
            pattern,
            mask: mask.to_string(),
        })
    }

    /// Mask the value of every sensitive token in `message`.
    pub fn redact(&self, message: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return message.to_string();
        };

        pattern
            .replace_all(message, |caps: &Captures<'_>| {
                format!("{}={}", &caps["field"], self.mask)
            })
            .into_owned()
    }
}

lazy_static! {
    static ref PII_REDACTOR: Redactor = Redactor::new(&PII_FIELDS, PII_MASK, PII_SEPARATOR)
        .expect("PII redaction pattern compiles");
}

/// Apply the fixed PII policy to one rendered log line.
pub fn redact_pii(line: &str) -> String {
    PII_REDACTOR.redact(line)
}

/// `MakeWriter` adapter that scrubs PII from every rendered log line before
/// handing it to the wrapped sink.
///
/// Timestamping, leveling, and formatting happen upstream; this seam sees
/// the finished line and only performs the substitution step.
pub struct RedactingMakeWriter<M> {
    inner: M,
}

impl<M> RedactingMakeWriter<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = RedactingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter {
            inner: self.inner.make_writer(),
        }
    }
}

/// Writer produced by [`RedactingMakeWriter`].
pub struct RedactingWriter<W> {
    inner: W,
}

impl<W> io::Write for RedactingWriter<W>
where
    W: io::Write,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // Scrub line by line: the pattern's value run would otherwise
        // swallow a trailing newline into the mask
        let text = String::from_utf8_lossy(buf);
        for line in text.split_inclusive('\n') {
            let (content, terminator) = match line.strip_suffix('\n') {
                Some(content) => (content, "\n"),
                None => (line, ""),
            };
            self.inner.write_all(redact_pii(content).as_bytes())?;
            self.inner.write_all(terminator.as_bytes())?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn test_masks_listed_fields_only() {
        let redactor = Redactor::new(&["password", "email"], "***", ';').unwrap();
        assert_eq!(
            redactor.redact("name=Bob;password=hunter2;email=a@b.com;city=NYC"),
            "name=Bob;password=***;email=***;city=NYC",
        );
    }

    #[test]
    fn test_pii_policy() {
        assert_eq!(
            redact_pii("name=Bob;email=a@b.com;phone=555-0100;ssn=000-00-0000;password=pw;ip=::1"),
            "name=***;email=***;phone=***;ssn=***;password=***;ip=::1",
        );
    }

    #[test]
    fn test_keys_match_whole_not_partial() {
        let redactor = Redactor::new(&["name"], "***", ';').unwrap();
        assert_eq!(
            redactor.redact("username=bob;name=alice;names=x"),
            "username=bob;name=***;names=x",
        );
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let redactor = Redactor::new(&["password"], "***", ';').unwrap();
        assert_eq!(
            redactor.redact("Password=hunter2;password=hunter2"),
            "Password=hunter2;password=***",
        );
    }

    #[test]
    fn test_value_may_contain_equals_signs() {
        let redactor = Redactor::new(&["password"], "***", ';').unwrap();
        assert_eq!(redactor.redact("password=a=b=c;x=1"), "password=***;x=1");
    }

    #[test]
    fn test_mask_is_taken_literally() {
        let redactor = Redactor::new(&["password"], "$2y$", ';').unwrap();
        assert_eq!(redactor.redact("password=hunter2"), "password=$2y$");
    }

    #[test]
    fn test_alternate_separator() {
        let redactor = Redactor::new(&["ssn"], "XXX", ',').unwrap();
        assert_eq!(
            redactor.redact("ssn=000-00-0000,level=info"),
            "ssn=XXX,level=info",
        );
    }

    #[test]
    fn test_empty_field_set_is_identity() {
        let redactor = Redactor::new(&[], "***", ';').unwrap();
        assert_eq!(redactor.redact("password=hunter2"), "password=hunter2");
    }

    #[test]
    fn test_field_names_are_escaped() {
        let redactor = Redactor::new(&["a+b"], "***", ';').unwrap();
        assert_eq!(redactor.redact("a+b=secret;aab=x"), "a+b=***;aab=x");
    }

    /// Shared in-memory sink implementing `MakeWriter`.
    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Buffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_writer_scrubs_lines_before_the_sink() {
        let sink = Buffer::default();
        let make_writer = RedactingMakeWriter::new(sink.clone());

        let mut writer = make_writer.make_writer();
        writer
            .write_all(b"login rejected;email=a@b.com;password=hunter2\n")
            .unwrap();

        assert_eq!(
            sink.contents(),
            "login rejected;email=***;password=***\n",
        );
    }

    #[test]
    fn test_tracing_lines_are_scrubbed_end_to_end() {
        let sink = Buffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(RedactingMakeWriter::new(sink.clone()))
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("login rejected;email=a@b.com;password=hunter2");
        });

        let written = sink.contents();
        assert!(written.contains("email=***"));
        assert!(written.contains("password=***"));
        assert!(!written.contains("a@b.com"));
        assert!(!written.contains("hunter2"));
    }
}
