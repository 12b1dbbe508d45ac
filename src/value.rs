//! Value token parsing: `full`, `half`, `out`, a percentage, or a raw integer.

use crate::error::ParseError;

/// Parses a single value token into an 8-bit intensity level.
pub(crate) fn parse_value(token: &str) -> Result<u8, ParseError> {
    let token = token.trim();

    match token {
        "full" => return Ok(255),
        "half" => return Ok(128),
        "out" => return Ok(0),
        _ => {}
    }

    if let Some(percent_str) = token.strip_suffix('%') {
        let percent: f64 = percent_str.parse()?;
        return Ok((percent / 100.0 * 255.0).floor() as u8);
    }

    Ok(token.parse::<u8>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_levels() {
        assert_eq!(parse_value("full").unwrap(), 255);
        assert_eq!(parse_value("half").unwrap(), 128);
        assert_eq!(parse_value("out").unwrap(), 0);
    }

    #[test]
    fn percent_levels() {
        assert_eq!(parse_value("0%").unwrap(), 0);
        assert_eq!(parse_value("100%").unwrap(), 255);
        assert_eq!(parse_value("50%").unwrap(), 127);
    }

    #[test]
    fn bare_integer() {
        assert_eq!(parse_value("200").unwrap(), 200);
        assert_eq!(parse_value("0").unwrap(), 0);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(parse_value("  full  ").unwrap(), 255);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_value("bright").is_err());
        assert!(parse_value("abc%").is_err());
    }
}
