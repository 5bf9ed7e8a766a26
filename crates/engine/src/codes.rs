//! Sequential human-readable codes (`BIGD-0007`, `CUST-0123`).
//!
//! There is no counter stored anywhere: the next code is always
//! `max(existing) + 1`, recomputed from the records currently in the store.
//! Codes that do not match `^{PREFIX}-(\d+)$` are ignored, so legacy or
//! hand-typed codes never disturb the sequence.
//!
//! ```rust
//! use engine::CodeSequence;
//!
//! let next = CodeSequence::AGENTS.next(["BIGD-0001", "BIGD-0009", "OLD-9999"]);
//! assert_eq!(next, "BIGD-0010");
//! assert_eq!(CodeSequence::CUSTOMERS.next(std::iter::empty()), "CUST-0001");
//! ```

use serde_json::Value;

use crate::Documents;

/// A code sequence: a prefix, the record field carrying the code, and the
/// zero-padding width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeSequence {
    prefix: &'static str,
    field: &'static str,
    width: usize,
}

impl CodeSequence {
    /// Agent codes, stored in `agents/*/agent_id`.
    pub const AGENTS: CodeSequence = CodeSequence::new("BIGD", "agent_id", 4);
    /// Customer codes, stored in `customers/*/customer_id`.
    pub const CUSTOMERS: CodeSequence = CodeSequence::new("CUST", "customer_id", 4);

    #[must_use]
    pub const fn new(prefix: &'static str, field: &'static str, width: usize) -> Self {
        Self {
            prefix,
            field,
            width,
        }
    }

    /// Numeric suffix of `code`, `None` when the code belongs to another
    /// sequence or is malformed.
    #[must_use]
    pub fn number(&self, code: &str) -> Option<u64> {
        let digits = code.strip_prefix(self.prefix)?.strip_prefix('-')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Suffixes too large for u64 cannot be incremented; treat as foreign.
        digits.parse().ok()
    }

    /// Render `number` as a code. Numbers wider than the padding are printed
    /// in full.
    #[must_use]
    pub fn format(&self, number: u64) -> String {
        format!("{}-{:0width$}", self.prefix, number, width = self.width)
    }

    /// Next code after every matching code in `codes`.
    #[must_use]
    pub fn next<'a, I>(&self, codes: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let highest = codes
            .into_iter()
            .filter_map(|code| self.number(code))
            .max()
            .unwrap_or(0);
        self.format(highest.saturating_add(1))
    }

    /// Next code for a raw collection, reading the sequence field of every
    /// document. Keys are irrelevant.
    #[must_use]
    pub fn next_for_documents(&self, documents: &Documents) -> String {
        self.next(
            documents
                .values()
                .filter_map(|doc| doc.get(self.field).and_then(Value::as_str)),
        )
    }
}
