// Line-oriented interaction script parser

use super::ast::ScriptCommand;
use super::lexer::{identifier, integer_literal, number_literal, string_literal, ws};
use crate::chart::ChartKind;
use crate::error::{ChartError, Result};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, not_line_ending, space0, space1},
    combinator::{all_consuming, map, map_res, opt, value},
    sequence::{pair, preceded, terminated},
    IResult,
};
use std::path::PathBuf;

/// Keyword followed by at least one space.
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(word), space1)
}

fn point(input: &str) -> IResult<&str, (f64, f64)> {
    pair(ws(number_literal), ws(number_literal))(input)
}

fn parse_view(input: &str) -> IResult<&str, ScriptCommand> {
    map(
        preceded(keyword("view"), map_res(ws(identifier), |s| s.parse::<ChartKind>())),
        ScriptCommand::View,
    )(input)
}

fn parse_year(input: &str) -> IResult<&str, ScriptCommand> {
    map(preceded(keyword("year"), ws(integer_literal)), ScriptCommand::Year)(input)
}

fn parse_hover(input: &str) -> IResult<&str, ScriptCommand> {
    map(preceded(keyword("hover"), point), |(x, y)| ScriptCommand::Hover { x, y })(input)
}

fn parse_click(input: &str) -> IResult<&str, ScriptCommand> {
    map(preceded(keyword("click"), point), |(x, y)| ScriptCommand::Click { x, y })(input)
}

fn parse_double_click(input: &str) -> IResult<&str, ScriptCommand> {
    let (input, _) = ws(tag("dblclick"))(input)?;
    let (input, at) = opt(point)(input)?;
    let (x, y) = at.unwrap_or((0.0, 0.0));
    Ok((input, ScriptCommand::DoubleClick { x, y }))
}

fn parse_resize(input: &str) -> IResult<&str, ScriptCommand> {
    map(preceded(keyword("resize"), point), |(width, height)| ScriptCommand::Resize {
        width,
        height,
    })(input)
}

fn parse_snapshot(input: &str) -> IResult<&str, ScriptCommand> {
    map(preceded(keyword("snapshot"), ws(string_literal)), |path| {
        ScriptCommand::Snapshot(PathBuf::from(path))
    })(input)
}

/// Parse a single command, e.g. `hover 120 85` or `view bar`.
pub fn parse_command(input: &str) -> IResult<&str, ScriptCommand> {
    let (input, _) = space0(input)?;
    alt((
        parse_view,
        parse_year,
        parse_hover,
        value(ScriptCommand::Leave, ws(tag("leave"))),
        parse_click,
        parse_double_click,
        parse_resize,
        parse_snapshot,
    ))(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    preceded(char('#'), not_line_ending)(input)
}

/// Parse a whole script. Blank lines and `#` comments are skipped; the first
/// bad line is reported with its 1-based number.
pub fn parse_script(text: &str) -> Result<Vec<ScriptCommand>> {
    let mut commands = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parsed = all_consuming(terminated(parse_command, pair(space0, opt(comment))))(line);
        match parsed {
            Ok((_, command)) => commands.push(command),
            Err(_) => {
                return Err(ChartError::Script {
                    line: index + 1,
                    message: format!("cannot parse '{}'", trimmed),
                })
            }
        }
    }
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_view() {
        assert_eq!(parse_command("view bar"), Ok(("", ScriptCommand::View(ChartKind::Bar))));
        assert!(parse_command("view area").is_err());
    }

    #[test]
    fn test_parse_pointer_commands() {
        assert_eq!(
            parse_command("hover 120 85.5"),
            Ok(("", ScriptCommand::Hover { x: 120.0, y: 85.5 }))
        );
        assert_eq!(
            parse_command("click 10 20"),
            Ok(("", ScriptCommand::Click { x: 10.0, y: 20.0 }))
        );
        assert_eq!(parse_command("leave"), Ok(("", ScriptCommand::Leave)));
    }

    #[test]
    fn test_parse_double_click_defaults_to_origin() {
        assert_eq!(
            parse_command("dblclick"),
            Ok(("", ScriptCommand::DoubleClick { x: 0.0, y: 0.0 }))
        );
        assert_eq!(
            parse_command("dblclick 4 5"),
            Ok(("", ScriptCommand::DoubleClick { x: 4.0, y: 5.0 }))
        );
    }

    #[test]
    fn test_parse_script_skips_comments() {
        let script = "# select a year\nyear 82\n\n  view pie   # donut\nresize 400 300\nsnapshot \"out.svg\"\n";
        let commands = parse_script(script).unwrap();
        assert_eq!(
            commands,
            vec![
                ScriptCommand::Year(82),
                ScriptCommand::View(ChartKind::Pie),
                ScriptCommand::Resize { width: 400.0, height: 300.0 },
                ScriptCommand::Snapshot(PathBuf::from("out.svg")),
            ]
        );
    }

    #[test]
    fn test_parse_script_reports_line() {
        let err = parse_script("view bar\nyear\nleave").unwrap_err();
        assert!(matches!(err, ChartError::Script { line: 2, .. }));
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        assert!(parse_script("leave now").is_err());
        assert!(parse_script("year 82 83").is_err());
    }
}
