//! Party table codec (`src/data/trainer_parties.h`).
//!
//! ```text
//! static const struct TrainerMonItemDefaultMoves sParty_Roxanne1[] = {
//!     {
//!     .iv = 100,
//!     .lvl = 12,
//!     .species = SPECIES_GEODUDE,
//!     .heldItem = ITEM_NONE
//!     },
//!     ...
//! };
//! ```

use std::fmt::Write as _;

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::lexer::{Lexer, Line, ParseError, trim_list_punct};
use crate::model::{MOVE_SLOTS, Mon, PARTY_CAPACITY, Party, PartyVariant};

const END_OF_PARTY: &str = "};";
const OPEN_MON: &str = "{";

/// Parses every party record, in file order. Each party is revalidated as it is built,
/// so the returned variants are derived from content rather than copied from the
/// declaration.
pub fn parse_party_table(
    artifact: &str,
    text: &str,
) -> Result<IndexMap<String, Party>, ParseError> {
    let mut lexer = Lexer::new(artifact, text);
    let mut parties = IndexMap::new();

    while let Some(header) = lexer.next() {
        let (declared, identifier) = parse_header(&lexer, &header)?;
        if parties.contains_key(identifier) {
            return Err(lexer.duplicate(&header, identifier));
        }

        let party = parse_party_body(&mut lexer, identifier)?;
        if party.variant() != declared {
            warn!(
                party = identifier,
                declared = %declared,
                derived = %party.variant(),
                "party declaration disagrees with its mons; using derived variant"
            );
        }
        parties.insert(identifier.to_string(), party);
    }

    debug!(artifact, count = parties.len(), "parsed party table");
    Ok(parties)
}

fn parse_header<'a>(
    lexer: &Lexer<'_>,
    line: &Line<'a>,
) -> Result<(PartyVariant, &'a str), ParseError> {
    let Some(struct_pos) = line.tokens.iter().position(|token| *token == "struct") else {
        return Err(lexer.syntax(line, "expected a party declaration"));
    };

    let struct_name = line
        .token(struct_pos + 1)
        .ok_or_else(|| lexer.syntax(line, "party declaration has no element type"))?;
    let variant = PartyVariant::from_struct_name(struct_name).ok_or_else(|| {
        lexer.syntax(line, format!("unknown party element type {struct_name}"))
    })?;

    let identifier = line
        .token(struct_pos + 2)
        .map(|token| token.trim_end_matches(['[', ']']))
        .filter(|identifier| !identifier.is_empty())
        .ok_or_else(|| lexer.syntax(line, "party declaration has no identifier"))?;

    Ok((variant, identifier))
}

fn parse_party_body(lexer: &mut Lexer<'_>, identifier: &str) -> Result<Party, ParseError> {
    let mut party = Party::new(identifier);
    let mut open: Option<Mon> = None;

    loop {
        let Some(line) = lexer.next() else {
            return Err(lexer.eof(format!("party {identifier} is not closed")));
        };

        match line.tag() {
            END_OF_PARTY => {
                if open.is_some() {
                    return Err(lexer.syntax(&line, "party closed inside a mon entry"));
                }
                return Ok(party);
            }
            OPEN_MON => {
                if open.is_some() {
                    return Err(lexer.syntax(&line, "mon entry opened twice"));
                }
                open = Some(Mon::default());
            }
            tag if trim_mon_terminator(tag) => {
                let Some(mon) = open.take() else {
                    return Err(lexer.syntax(&line, "closing brace without a mon entry"));
                };
                if party.is_full() {
                    return Err(lexer.syntax(
                        &line,
                        format!("party {identifier} has more than {PARTY_CAPACITY} mons"),
                    ));
                }
                party.append_mon(mon);
            }
            tag if tag.starts_with('.') => {
                let Some(mon) = open.as_mut() else {
                    return Err(lexer.syntax(&line, format!("{tag} outside of a mon entry")));
                };
                apply_mon_field(lexer, &line, mon)?;
            }
            other => {
                return Err(lexer.syntax(&line, format!("unexpected token {other}")));
            }
        }
    }
}

fn trim_mon_terminator(tag: &str) -> bool {
    tag.trim_end_matches(',') == "}"
}

fn apply_mon_field(lexer: &Lexer<'_>, line: &Line<'_>, mon: &mut Mon) -> Result<(), ParseError> {
    let tag = line.tag();
    if line.values().is_empty() {
        return Err(lexer.syntax(line, format!("{tag} has no value")));
    }
    let value = trim_list_punct(line.last());

    match tag {
        ".iv" => mon.iv = parse_u8(lexer, line, value)?,
        ".lvl" => mon.level = parse_u8(lexer, line, value)?,
        ".species" => mon.species = value.to_string(),
        ".heldItem" => mon.held_item = Some(value.to_string()),
        ".moves" => {
            let moves: Vec<String> = line
                .values()
                .iter()
                .map(|token| trim_list_punct(token))
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect();
            let moves: [String; MOVE_SLOTS] = moves.try_into().map_err(|moves: Vec<String>| {
                lexer.syntax(
                    line,
                    format!("expected {MOVE_SLOTS} moves, found {}", moves.len()),
                )
            })?;
            mon.moves = Some(moves);
        }
        other => trace!(field = other, line = line.number, "ignoring unknown mon field"),
    }
    Ok(())
}

fn parse_u8(lexer: &Lexer<'_>, line: &Line<'_>, value: &str) -> Result<u8, ParseError> {
    value.parse::<u8>().map_err(|_| {
        lexer.syntax(
            line,
            format!("{} must be an integer in 0..=255, found {value}", line.tag()),
        )
    })
}

/// Renders the party table. Parties must already be revalidated.
pub fn write_party_table<'a>(parties: impl ExactSizeIterator<Item = &'a Party>) -> String {
    let total = parties.len();
    let mut out = String::new();

    for (index, party) in parties.enumerate() {
        writeln!(
            &mut out,
            "static const struct {} {}[] = {{",
            party.variant().struct_name(),
            party.identifier()
        )
        .expect("writing to String cannot fail");

        let mons: Vec<&Mon> = party.compact_mons().collect();
        for (mon_index, mon) in mons.iter().enumerate() {
            write_mon(&mut out, mon, mon_index + 1 == mons.len());
        }

        out.push_str(END_OF_PARTY);
        out.push('\n');
        if index + 1 != total {
            out.push('\n');
        }
    }

    out
}

fn write_mon(out: &mut String, mon: &Mon, last: bool) {
    out.push_str("    {\n");
    writeln!(out, "    .iv = {},", mon.iv).expect("writing to String cannot fail");
    writeln!(out, "    .lvl = {},", mon.level).expect("writing to String cannot fail");
    writeln!(out, "    .species = {},", mon.species).expect("writing to String cannot fail");
    if let Some(item) = &mon.held_item {
        let separator = if mon.has_moves() { "," } else { "" };
        writeln!(out, "    .heldItem = {item}{separator}").expect("writing to String cannot fail");
    }
    if let Some(moves) = &mon.moves {
        writeln!(out, "    .moves = {}", moves.join(", ")).expect("writing to String cannot fail");
    }
    out.push_str(if last { "    }\n" } else { "    },\n" });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mon_terminator_accepts_trailing_comma() {
        assert!(trim_mon_terminator("}"));
        assert!(trim_mon_terminator("},"));
        assert!(!trim_mon_terminator("};"));
    }

    #[test]
    fn empty_party_renders_as_open_and_close() {
        let party = Party::new("sParty_Empty");
        let text = write_party_table([&party].into_iter());
        assert_eq!(
            text,
            "static const struct TrainerMonNoItemDefaultMoves sParty_Empty[] = {\n};\n"
        );
    }
}
