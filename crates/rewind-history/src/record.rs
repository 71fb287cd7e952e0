//! Operation record data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sequence number of a recorded operation, unique for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperationId(pub u64);

impl OperationId {
    /// Get the raw sequence number.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of mutation a record captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// A new file was written where none existed.
    Create,
    /// An existing file was replaced wholesale.
    Overwrite,
    /// An existing file was changed by string replacement.
    Edit,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Create => "create",
            OperationKind::Overwrite => "overwrite",
            OperationKind::Edit => "edit",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The matched substring of an edit and what replaced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditDetails {
    /// Text that was replaced.
    pub old_string: String,
    /// Text it was replaced with.
    pub new_string: String,
    /// Number of replacements the edit performed.
    pub replacements: usize,
}

impl EditDetails {
    /// Details of a single replacement.
    pub fn new(old_string: impl Into<String>, new_string: impl Into<String>) -> Self {
        Self {
            old_string: old_string.into(),
            new_string: new_string.into(),
            replacements: 1,
        }
    }

    /// Set the number of replacements.
    pub fn with_replacements(mut self, replacements: usize) -> Self {
        self.replacements = replacements;
        self
    }
}

/// A completed mutation, as handed to the recorder.
///
/// A create carries no prior content at all, which keeps "delete the file"
/// distinct from "restore an empty file".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Operation {
    Create {
        content: String,
    },
    Overwrite {
        prior: String,
        content: String,
    },
    Edit {
        prior: String,
        content: String,
        details: EditDetails,
    },
}

impl Operation {
    /// A file was created with `content`.
    pub fn create(content: impl Into<String>) -> Self {
        Self::Create {
            content: content.into(),
        }
    }

    /// A file holding `prior` was replaced by `content`.
    pub fn overwrite(prior: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Overwrite {
            prior: prior.into(),
            content: content.into(),
        }
    }

    /// A file holding `prior` was edited into `content`.
    pub fn edit(
        prior: impl Into<String>,
        content: impl Into<String>,
        details: EditDetails,
    ) -> Self {
        Self::Edit {
            prior: prior.into(),
            content: content.into(),
            details,
        }
    }

    /// A full write: `Create` when there was no prior file, `Overwrite` otherwise.
    pub fn write(prior: Option<String>, content: impl Into<String>) -> Self {
        match prior {
            None => Self::create(content),
            Some(prior) => Self::overwrite(prior, content),
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Create { .. } => OperationKind::Create,
            Operation::Overwrite { .. } => OperationKind::Overwrite,
            Operation::Edit { .. } => OperationKind::Edit,
        }
    }

    /// Content before the mutation, `None` for a create.
    pub fn prior_content(&self) -> Option<&str> {
        match self {
            Operation::Create { .. } => None,
            Operation::Overwrite { prior, .. } | Operation::Edit { prior, .. } => Some(prior),
        }
    }

    /// Content after the mutation.
    pub fn new_content(&self) -> &str {
        match self {
            Operation::Create { content }
            | Operation::Overwrite { content, .. }
            | Operation::Edit { content, .. } => content,
        }
    }

    pub fn edit_details(&self) -> Option<&EditDetails> {
        match self {
            Operation::Edit { details, .. } => Some(details),
            _ => None,
        }
    }
}

/// One recorded, reversible mutation. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRecord {
    /// Sequence number.
    pub id: OperationId,

    /// When the mutation was recorded.
    pub timestamp: DateTime<Utc>,

    /// What changed.
    pub operation: Operation,
}

impl OperationRecord {
    /// Create a record stamped with the current time.
    pub fn new(id: OperationId, operation: Operation) -> Self {
        Self {
            id,
            timestamp: Utc::now(),
            operation,
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.operation.kind()
    }

    pub fn prior_content(&self) -> Option<&str> {
        self.operation.prior_content()
    }

    pub fn new_content(&self) -> &str {
        self.operation.new_content()
    }

    pub fn edit_details(&self) -> Option<&EditDetails> {
        self.operation.edit_details()
    }

    /// Byte length of the resulting content.
    pub fn size_bytes(&self) -> usize {
        self.new_content().len()
    }

    /// Rough memory footprint: both contents, the path, and a fixed overhead.
    pub fn estimated_bytes(&self, path_len: usize) -> usize {
        const RECORD_OVERHEAD: usize = 100;

        self.prior_content().map_or(0, str::len) + self.size_bytes() + path_len + RECORD_OVERHEAD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_picks_kind_from_prior() {
        assert_eq!(Operation::write(None, "a").kind(), OperationKind::Create);
        assert_eq!(
            Operation::write(Some(String::new()), "a").kind(),
            OperationKind::Overwrite
        );
    }

    #[test]
    fn test_create_has_no_prior_content() {
        let op = Operation::create("Hello, World!");
        assert_eq!(op.prior_content(), None);
        assert_eq!(op.new_content(), "Hello, World!");

        // An empty prior file is not the same as no prior file
        let op = Operation::overwrite("", "Hello");
        assert_eq!(op.prior_content(), Some(""));
    }

    #[test]
    fn test_record_size_and_estimate() {
        let record = OperationRecord::new(
            OperationId(1),
            Operation::edit(
                "Hello, World!",
                "Hello, Universe!",
                EditDetails::new("World", "Universe"),
            ),
        );

        assert_eq!(record.size_bytes(), 16);
        assert_eq!(record.estimated_bytes(10), 13 + 16 + 10 + 100);
        assert_eq!(record.edit_details().unwrap().replacements, 1);
    }

    #[test]
    fn test_operation_serializes_with_kind_tag() {
        let json = serde_json::to_value(Operation::create("x")).unwrap();
        assert_eq!(json["kind"], "create");
        assert_eq!(json["content"], "x");
    }
}
