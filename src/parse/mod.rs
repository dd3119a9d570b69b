mod error;
mod grammar;
mod parser;

pub use error::ParseError;
pub use parser::ParsedRuleSet;

use grammar::LineSyntax;

use crate::types::{Condition, Directive, DirectiveLine, LineCategory, Rule};

/// Split `input` on `\n`, `\r\n` or `\r`.
fn split_lines(input: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(input);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.find(|c| c == '\n' || c == '\r') {
            Some(end) => {
                let skip = if current[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&current[end + skip..]);
                Some(&current[..end])
            }
            None => {
                rest = None;
                (!current.is_empty()).then_some(current)
            }
        }
    })
}

fn category(syntax: &LineSyntax<'_>) -> LineCategory {
    match syntax {
        LineSyntax::Blank => LineCategory::Blank,
        LineSyntax::Comment => LineCategory::Comment,
        LineSyntax::Condition(_) => LineCategory::Condition,
        LineSyntax::Rule(_) => LineCategory::Rule,
        LineSyntax::Unrecognized => LineCategory::Unrecognized,
        LineSyntax::Malformed => LineCategory::Malformed,
    }
}

/// Classify every line of `input`. Never fails: bad lines are reported as
/// [`LineCategory::Malformed`].
#[must_use]
pub fn classify(input: &str) -> Vec<DirectiveLine> {
    split_lines(input)
        .enumerate()
        .map(|(i, raw)| {
            let text = raw.trim();
            DirectiveLine {
                number: i + 1,
                text: text.to_owned(),
                category: category(&grammar::line(text)),
            }
        })
        .collect()
}

/// Parse rule text into classified lines and directives.
///
/// # Errors
///
/// Returns [`ParseError::Malformed`] for the first condition or rule line
/// that lacks a field or has trailing text.
pub fn parse(input: &str) -> Result<ParsedRuleSet, ParseError> {
    let mut lines = Vec::new();
    let mut directives = Vec::new();

    for (i, raw) in split_lines(input).enumerate() {
        let number = i + 1;
        let text = raw.trim();
        let syntax = grammar::line(text);
        let category = category(&syntax);
        let flags = |tokens: &[&str]| -> Vec<String> {
            tokens.iter().map(|t| (*t).to_owned()).collect()
        };

        match syntax {
            LineSyntax::Condition(fields) => directives.push(Directive::Condition(Condition {
                line: number,
                text: text.to_owned(),
                test: fields.first.to_owned(),
                pattern: fields.second.to_owned(),
                flags: flags(&fields.flags),
            })),
            LineSyntax::Rule(fields) => directives.push(Directive::Rule(Rule {
                line: number,
                text: text.to_owned(),
                pattern: fields.first.to_owned(),
                substitution: fields.second.to_owned(),
                flags: flags(&fields.flags),
            })),
            LineSyntax::Malformed => {
                return Err(ParseError::Malformed {
                    line: number,
                    text: text.to_owned(),
                });
            }
            LineSyntax::Blank | LineSyntax::Comment | LineSyntax::Unrecognized => {}
        }

        lines.push(DirectiveLine {
            number,
            text: text.to_owned(),
            category,
        });
    }

    Ok(ParsedRuleSet { lines, directives })
}
