// Token parsers shared by the script grammar

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alpha1, alphanumeric1, char, digit1, space0},
    combinator::{map_res, opt, recognize},
    multi::many0,
    sequence::{delimited, pair, tuple},
    IResult,
};

/// Wrap a parser so it skips spaces and tabs on both sides.
/// Newlines are significant in scripts, so they are not skipped.
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(space0, inner, space0)
}

/// Identifier: letter or underscore, then letters, digits, underscores.
pub fn identifier(input: &str) -> IResult<&str, String> {
    let (input, ident) = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)?;
    Ok((input, ident.to_string()))
}

/// Decimal number with optional sign and fraction, e.g. `-12.5`.
pub fn number_literal(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((
            opt(alt((char('-'), char('+')))),
            digit1,
            opt(pair(char('.'), digit1)),
        ))),
        |s: &str| s.parse::<f64>(),
    )(input)
}

/// Integer with optional sign.
pub fn integer_literal(input: &str) -> IResult<&str, i64> {
    map_res(
        recognize(pair(opt(char('-')), digit1)),
        |s: &str| s.parse::<i64>(),
    )(input)
}

/// Double-quoted string without escapes.
pub fn string_literal(input: &str) -> IResult<&str, String> {
    let (input, s) = delimited(char('"'), take_while(|c| c != '"'), char('"'))(input)?;
    Ok((input, s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        assert_eq!(identifier("model_year rest"), Ok((" rest", "model_year".to_string())));
        assert!(identifier("9lives").is_err());
    }

    #[test]
    fn test_number_literal() {
        assert_eq!(number_literal("12.5"), Ok(("", 12.5)));
        assert_eq!(number_literal("-3 x"), Ok((" x", -3.0)));
        assert!(number_literal("abc").is_err());
    }

    #[test]
    fn test_integer_literal() {
        assert_eq!(integer_literal("82"), Ok(("", 82)));
        assert_eq!(integer_literal("-1"), Ok(("", -1)));
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(string_literal("\"out/a b.svg\""), Ok(("", "out/a b.svg".to_string())));
        assert_eq!(string_literal("\"\""), Ok(("", String::new())));
        assert!(string_literal("\"open").is_err());
    }

    #[test]
    fn test_ws_keeps_newlines() {
        let mut p = ws(tag("leave"));
        assert_eq!(p("  leave \n"), Ok(("\n", "leave")));
    }
}
