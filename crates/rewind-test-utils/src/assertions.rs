//! Assertion helpers with readable failure messages.

use std::path::Path;

/// Assert that a file's content equals expected text exactly.
pub fn assert_file_equals(path: &Path, expected: &str) {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read file {}: {}", path.display(), e));

    if content != expected {
        panic!(
            "File {} content does not match expected.\n{}",
            path.display(),
            render_diff(&content, expected)
        );
    }
}

/// Assert that a file does not exist.
pub fn assert_file_missing(path: &Path) {
    assert!(
        !path.exists(),
        "Expected {} not to exist, but it does",
        path.display()
    );
}

/// Assert that two strings are equal, with a diff on failure.
pub fn assert_strings_equal(actual: &str, expected: &str) {
    if actual != expected {
        panic!("Strings are not equal.\n{}", render_diff(actual, expected));
    }
}

fn render_diff(actual: &str, expected: &str) -> String {
    let diff = similar::TextDiff::from_lines(expected, actual);
    let mut output = String::from("Diff (-expected +actual):\n");

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            similar::ChangeTag::Delete => "-",
            similar::ChangeTag::Insert => "+",
            similar::ChangeTag::Equal => " ",
        };
        output.push_str(&format!("{}{}", sign, change));
        if change.missing_newline() {
            output.push('\n');
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_file_equals_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        std::fs::write(&path, "same").unwrap();
        assert_file_equals(&path, "same");
    }

    #[test]
    #[should_panic(expected = "Diff (-expected +actual)")]
    fn test_assert_strings_equal_shows_diff() {
        assert_strings_equal("a\nb\n", "a\nc\n");
    }

    #[test]
    fn test_assert_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert_file_missing(&dir.path().join("nope"));
    }
}
