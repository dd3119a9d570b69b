use std::fmt;

/// Category assigned to a single line of rule text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineCategory {
    Blank,
    Comment,
    Condition,
    Rule,
    /// Some other directive (`RewriteEngine`, `RewriteBase`, ...). Ignored.
    Unrecognized,
    /// A condition or rule line with missing or trailing fields.
    Malformed,
}

/// One line of rule text after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveLine {
    /// 1-based line number.
    pub number: usize,
    /// The line with surrounding whitespace trimmed.
    pub text: String,
    pub category: LineCategory,
}

impl fmt::Display for LineCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineCategory::Blank => "blank",
            LineCategory::Comment => "comment",
            LineCategory::Condition => "condition",
            LineCategory::Rule => "rule",
            LineCategory::Unrecognized => "unrecognized",
            LineCategory::Malformed => "malformed",
        };
        f.write_str(name)
    }
}

impl fmt::Display for DirectiveLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>4} [{}] {}", self.number, self.category, self.text)
    }
}
