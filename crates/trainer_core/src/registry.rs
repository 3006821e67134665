//! Trainer identifier registry (`include/constants/opponents.h`).

use std::fmt::Write as _;

use crate::lexer::{Lexer, ParseError};

pub const INCLUDE_GUARD: &str = "GUARD_CONSTANTS_OPPONENTS_H";
pub const COUNT_CONSTANT: &str = "TRAINERS_COUNT";

/// Column the right-aligned index value ends at, minus the separating space.
const VALUE_COLUMN: usize = 34;
const COUNT_WIDTH: usize = 12;

/// Renders one `#define` per identifier with its dense index, then the total count.
pub fn write_registry<'a>(identifiers: impl ExactSizeIterator<Item = &'a str>) -> String {
    let total = identifiers.len();
    let mut out = String::new();

    writeln!(&mut out, "#ifndef {INCLUDE_GUARD}").expect("writing to String cannot fail");
    writeln!(&mut out, "#define {INCLUDE_GUARD}").expect("writing to String cannot fail");
    out.push('\n');

    for (index, identifier) in identifiers.enumerate() {
        let define = format!("#define {identifier}");
        let width = VALUE_COLUMN.saturating_sub(define.len());
        writeln!(&mut out, "{define} {index:>width$}").expect("writing to String cannot fail");
    }

    out.push('\n');
    writeln!(&mut out, "#define {COUNT_CONSTANT} {total:>COUNT_WIDTH$}")
        .expect("writing to String cannot fail");
    out.push('\n');
    writeln!(&mut out, "#endif  // {INCLUDE_GUARD}").expect("writing to String cannot fail");
    out
}

/// Reads `(identifier, index)` pairs back out of a registry, skipping the guard and
/// the count constant.
pub fn read_registry(artifact: &str, text: &str) -> Result<Vec<(String, usize)>, ParseError> {
    let lexer = Lexer::new(artifact, text);
    let mut entries = Vec::new();

    for line in Lexer::new(artifact, text) {
        if line.tag() != "#define" || line.tokens.len() < 3 {
            continue;
        }
        let name = line.tokens[1];
        if name == COUNT_CONSTANT {
            continue;
        }
        let index = line.tokens[2].parse::<usize>().map_err(|_| {
            lexer.syntax(&line, format!("{name} is not defined as an integer index"))
        })?;
        entries.push((name.to_string(), index));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_identifiers_keep_a_single_space() {
        let text = write_registry(["TRAINER_A_VERY_LONG_IDENTIFIER_NAME"].into_iter());
        assert!(text.contains("#define TRAINER_A_VERY_LONG_IDENTIFIER_NAME 0\n"));
    }

    #[test]
    fn guard_line_has_two_values_and_is_skipped() {
        let text = write_registry(["TRAINER_NONE", "TRAINER_SAWYER_1"].into_iter());
        let entries = read_registry("opponents.h", &text).expect("registry parses");
        assert_eq!(
            entries,
            vec![
                ("TRAINER_NONE".to_string(), 0),
                ("TRAINER_SAWYER_1".to_string(), 1),
            ]
        );
    }
}
