use similar::{ChangeTag, TextDiff};
use std::fmt;

pub const DEFAULT_CONTEXT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub line_type: DiffLineType,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineType {
    Context,
    Addition,
    Deletion,
}

impl DiffLineType {
    pub fn prefix(&self) -> char {
        match self {
            DiffLineType::Context => ' ',
            DiffLineType::Addition => '+',
            DiffLineType::Deletion => '-',
        }
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.line_type.prefix(), self.content)
    }
}

/// One `@@` block. Starts are zero-based line offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    pub fn header(&self) -> String {
        format!(
            "@@ -{} +{} @@",
            format_range(self.old_start, self.old_len),
            format_range(self.new_start, self.new_len)
        )
    }
}

// Single-line ranges omit the count, empty ranges point at the line before.
fn format_range(start: usize, len: usize) -> String {
    match len {
        0 => format!("{},0", start),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, len),
    }
}

/// Line-based unified diff between two texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifiedDiff {
    pub from_label: String,
    pub to_label: String,
    pub hunks: Vec<Hunk>,
}

impl UnifiedDiff {
    pub fn compute(
        from_label: impl Into<String>,
        to_label: impl Into<String>,
        old_text: &str,
        new_text: &str,
        context_lines: usize,
    ) -> Self {
        let old_lines: Vec<&str> = old_text.lines().collect();
        let new_lines: Vec<&str> = new_text.lines().collect();

        let mut hunks = Vec::new();
        if old_lines != new_lines {
            let diff = TextDiff::from_slices(&old_lines, &new_lines);

            for group in diff.grouped_ops(context_lines) {
                let (Some(first), Some(last)) = (group.first(), group.last()) else {
                    continue;
                };
                let old_start = first.old_range().start;
                let new_start = first.new_range().start;

                let mut lines = Vec::new();
                for op in &group {
                    for change in diff.iter_changes(op) {
                        let line_type = match change.tag() {
                            ChangeTag::Equal => DiffLineType::Context,
                            ChangeTag::Insert => DiffLineType::Addition,
                            ChangeTag::Delete => DiffLineType::Deletion,
                        };
                        lines.push(DiffLine {
                            line_type,
                            content: change.value().to_string(),
                        });
                    }
                }

                hunks.push(Hunk {
                    old_start,
                    old_len: last.old_range().end - old_start,
                    new_start,
                    new_len: last.new_range().end - new_start,
                    lines,
                });
            }
        }

        Self {
            from_label: from_label.into(),
            to_label: to_label.into(),
            hunks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Output lines without terminators; empty when the texts match.
    pub fn to_lines(&self) -> Vec<String> {
        if self.is_empty() {
            return Vec::new();
        }

        let mut out = vec![
            format!("--- {}", self.from_label),
            format!("+++ {}", self.to_label),
        ];
        for hunk in &self.hunks {
            out.push(hunk.header());
            out.extend(hunk.lines.iter().map(|line| line.to_string()));
        }
        out
    }
}

impl fmt::Display for UnifiedDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_lines().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_change() {
        let diff = UnifiedDiff::compute("committed", "working", "a\nb\nc\n", "a\nx\nc\n", 3);

        assert_eq!(diff.hunks.len(), 1);
        similar_asserts::assert_eq!(
            diff.to_string(),
            "--- committed\n+++ working\n@@ -1,3 +1,3 @@\n a\n-b\n+x\n c".to_string()
        );
    }

    #[test]
    fn test_identical_texts_produce_nothing() {
        let diff = UnifiedDiff::compute("committed", "working", "same\n", "same", 3);

        assert!(diff.is_empty());
        assert_eq!(diff.to_string(), "");
    }

    #[test]
    fn test_separate_hunks_and_ranges() {
        let old: String = (1..=20).map(|i| format!("line {}\n", i)).collect();
        let new = old
            .replace("line 2\n", "line two\n")
            .replace("line 19\n", "");

        let diff = UnifiedDiff::compute("committed", "working", &old, &new, 1);

        let headers: Vec<String> = diff.hunks.iter().map(|h| h.header()).collect();
        assert_eq!(headers, vec!["@@ -1,3 +1,3 @@", "@@ -18,3 +18,2 @@"]);
    }

    #[test]
    fn test_insertion_into_empty_file() {
        let diff = UnifiedDiff::compute("committed", "working", "", "hello\n", 3);

        assert_eq!(
            diff.to_lines(),
            vec!["--- committed", "+++ working", "@@ -0,0 +1 @@", "+hello"]
        );
    }

    #[test]
    fn test_line_types() {
        let diff = UnifiedDiff::compute("a", "b", "keep\ndrop\n", "keep\nadd\n", 3);
        let types: Vec<DiffLineType> = diff.hunks[0].lines.iter().map(|l| l.line_type).collect();

        assert_eq!(
            types,
            vec![
                DiffLineType::Context,
                DiffLineType::Deletion,
                DiffLineType::Addition
            ]
        );
    }
}
