use winnow::ascii::{space0, space1};
use winnow::combinator::{delimited, eof, opt, preceded, repeat};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

/// Syntax of a single trimmed line.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum LineSyntax<'i> {
    Blank,
    Comment,
    Condition(Fields<'i>),
    Rule(Fields<'i>),
    Unrecognized,
    Malformed,
}

/// The two positional fields of a directive plus its raw flag tokens.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Fields<'i> {
    pub(crate) first: &'i str,
    pub(crate) second: &'i str,
    pub(crate) flags: Vec<&'i str>,
}

#[derive(Debug, Clone, Copy)]
enum Keyword {
    Condition,
    Rule,
}

// -- Tokens -----------------------------------------------------------------

fn field<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_till(1.., |c: char| c.is_whitespace()).parse_next(input)
}

fn keyword(input: &mut &str) -> ModalResult<Option<Keyword>> {
    let word = field.parse_next(input)?;
    if word.eq_ignore_ascii_case("RewriteCond") {
        Ok(Some(Keyword::Condition))
    } else if word.eq_ignore_ascii_case("RewriteRule") {
        Ok(Some(Keyword::Rule))
    } else {
        Ok(None)
    }
}

// -- Flags ------------------------------------------------------------------

fn flag_separator(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c == ',' || c.is_whitespace())
        .void()
        .parse_next(input)
}

fn flag<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_till(1.., |c: char| c == ',' || c == ']' || c.is_whitespace()).parse_next(input)
}

fn flag_list<'i>(input: &mut &'i str) -> ModalResult<Vec<&'i str>> {
    delimited(
        '[',
        repeat(0.., preceded(flag_separator, flag)),
        (flag_separator, ']'),
    )
    .parse_next(input)
}

// -- Directives -------------------------------------------------------------

fn arguments<'i>(input: &mut &'i str) -> ModalResult<Fields<'i>> {
    let first = preceded(space1, field).parse_next(input)?;
    let second = preceded(space1, field).parse_next(input)?;
    let flags = opt(preceded(space1, flag_list))
        .parse_next(input)?
        .unwrap_or_default();
    (space0, eof).parse_next(input)?;
    Ok(Fields {
        first,
        second,
        flags,
    })
}

/// Classify and split one line. `line` must already be trimmed.
pub(crate) fn line(line: &str) -> LineSyntax<'_> {
    if line.is_empty() {
        return LineSyntax::Blank;
    }
    if line.starts_with('#') {
        return LineSyntax::Comment;
    }

    let mut input = line;
    let Ok(Some(kind)) = keyword.parse_next(&mut input) else {
        return LineSyntax::Unrecognized;
    };
    match (kind, arguments.parse(input)) {
        (Keyword::Condition, Ok(fields)) => LineSyntax::Condition(fields),
        (Keyword::Rule, Ok(fields)) => LineSyntax::Rule(fields),
        (_, Err(_)) => LineSyntax::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields<'i>(first: &'i str, second: &'i str, flags: &[&'i str]) -> Fields<'i> {
        Fields {
            first,
            second,
            flags: flags.to_vec(),
        }
    }

    #[test]
    fn blank_and_comment() {
        assert_eq!(line(""), LineSyntax::Blank);
        assert_eq!(line("# RewriteRule a b"), LineSyntax::Comment);
    }

    #[test]
    fn rule_without_flags() {
        assert_eq!(
            line(r"RewriteRule (.*)\.aspx $1.php"),
            LineSyntax::Rule(fields(r"(.*)\.aspx", "$1.php", &[]))
        );
    }

    #[test]
    fn rule_with_flags() {
        assert_eq!(
            line("RewriteRule ^/$ /x [R=301,L]"),
            LineSyntax::Rule(fields("^/$", "/x", &["R=301", "L"]))
        );
    }

    #[test]
    fn flags_separated_by_comma_and_space() {
        assert_eq!(
            line("RewriteRule a b [R, NC]"),
            LineSyntax::Rule(fields("a", "b", &["R", "NC"]))
        );
        assert_eq!(
            line("RewriteRule a b [ R  NC ]"),
            LineSyntax::Rule(fields("a", "b", &["R", "NC"]))
        );
        assert_eq!(line("RewriteRule a b []"), LineSyntax::Rule(fields("a", "b", &[])));
    }

    #[test]
    fn tabs_and_repeated_spaces() {
        assert_eq!(
            line("RewriteCond\t%{HTTP_HOST}    ^foo$\t[NC]"),
            LineSyntax::Condition(fields("%{HTTP_HOST}", "^foo$", &["NC"]))
        );
    }

    #[test]
    fn keyword_is_case_insensitive() {
        assert_eq!(
            line("rewriterule a b"),
            LineSyntax::Rule(fields("a", "b", &[]))
        );
    }

    #[test]
    fn brackets_inside_patterns() {
        assert_eq!(
            line("RewriteRule ^/[0-9]*/([^/]*)/?$ /blog/$1 [R=301,L]"),
            LineSyntax::Rule(fields("^/[0-9]*/([^/]*)/?$", "/blog/$1", &["R=301", "L"]))
        );
    }

    #[test]
    fn malformed_lines() {
        assert_eq!(line("RewriteRule"), LineSyntax::Malformed);
        assert_eq!(line("RewriteRule foo"), LineSyntax::Malformed);
        assert_eq!(line("RewriteCond foo"), LineSyntax::Malformed);
        assert_eq!(line("RewriteRule a b c"), LineSyntax::Malformed);
        assert_eq!(line("RewriteRule a b [L"), LineSyntax::Malformed);
        assert_eq!(line("RewriteRule a b [L] c"), LineSyntax::Malformed);
    }

    #[test]
    fn other_directives() {
        assert_eq!(line("RewriteEngine on"), LineSyntax::Unrecognized);
        assert_eq!(line("RewriteRules a b"), LineSyntax::Unrecognized);
    }
}
