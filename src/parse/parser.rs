use crate::types::{Directive, DirectiveLine};

/// The result of parsing rule text.
#[derive(Debug, Clone)]
pub struct ParsedRuleSet {
    /// Every input line, classified.
    pub lines: Vec<DirectiveLine>,
    /// Conditions and rules in source order.
    pub directives: Vec<Directive>,
}
