use crate::types::{MoveDirection, Segment, TurnDirection};
use crate::validate::clean;
use crate::{GrammarError, Result};

/// Decompose a command string into typed segments.
///
/// Accepts the same inputs as [`crate::LbmlValidator::validate`] as long as
/// every number fits in `u32`.
pub fn parse(input: &str) -> Result<Vec<Segment>> {
    let cleaned = clean(input);
    if cleaned.is_empty() {
        return Err(GrammarError::Empty);
    }

    let bytes = cleaned.as_bytes();
    let mut segments = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let start = i;
        let prefix = bytes[i];
        i += 1;

        let digits_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == digits_start {
            return Err(GrammarError::InvalidSegment(start));
        }
        let number: u32 = cleaned[digits_start..i]
            .parse()
            .map_err(|_| GrammarError::NumberRange(digits_start))?;

        let Some(&letter) = bytes.get(i) else {
            return Err(GrammarError::InvalidSegment(start));
        };
        i += 1;

        let segment = match prefix {
            b'D' => Segment::Move {
                distance: number,
                direction: MoveDirection::from_char(letter as char)
                    .ok_or(GrammarError::InvalidSegment(start))?,
            },
            b'R' => Segment::Rotate {
                angle: number,
                direction: TurnDirection::from_char(letter as char)
                    .ok_or(GrammarError::InvalidSegment(start))?,
            },
            _ => return Err(GrammarError::InvalidSegment(start)),
        };

        if bytes.get(i) != Some(&b';') {
            return Err(GrammarError::InvalidSegment(start));
        }
        i += 1;
        segments.push(segment);
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render;

    #[test]
    fn parses_mixed_command() {
        let segments = parse("D40F;R90L;D20B;").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Move {
                    distance: 40,
                    direction: MoveDirection::Forward,
                },
                Segment::Rotate {
                    angle: 90,
                    direction: TurnDirection::Left,
                },
                Segment::Move {
                    distance: 20,
                    direction: MoveDirection::Backward,
                },
            ]
        );
        assert_eq!(render(&segments), "D40F;R90L;D20B;");
    }

    #[test]
    fn parses_through_whitespace() {
        let segments = parse(" D10F; R45R; ").unwrap();
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(parse("  "), Err(GrammarError::Empty)));
    }

    #[test]
    fn rejects_missing_terminator() {
        assert!(matches!(
            parse("D40F"),
            Err(GrammarError::InvalidSegment(0))
        ));
    }

    #[test]
    fn rejects_rotation_with_move_direction() {
        assert!(parse("R90F;").is_err());
    }

    #[test]
    fn rejects_unknown_prefix_mid_command() {
        assert!(matches!(
            parse("D40F;X10F;"),
            Err(GrammarError::InvalidSegment(5))
        ));
    }

    #[test]
    fn rejects_numbers_beyond_u32() {
        assert!(matches!(
            parse("D99999999999F;"),
            Err(GrammarError::NumberRange(1))
        ));
    }
}
