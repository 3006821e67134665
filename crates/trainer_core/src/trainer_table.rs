//! Trainer table codec (`src/data/trainers.h`).

use std::fmt::Write as _;

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::gender::Gender;
use crate::lexer::{Lexer, Line, ParseError, trim_list_punct};
use crate::model::{AiFlags, ITEM_CAPACITY, Party, PartyVariant, Trainer};
use crate::tokens::{FALSE_TOKEN, NULL_PARTY, SENTINEL_TRAINER, TRUE_TOKEN};

pub const TABLE_HEADER: &str = "const struct Trainer gTrainers[] = {";
const END_OF_TABLE: &str = "};";
const END_OF_RECORD: &str = "},";
const OPEN_RECORD: &str = "{";
const FLAG_OR: &str = "|";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("trainer {trainer} references undefined party {party}")]
pub struct DanglingReference {
    pub trainer: String,
    pub party: String,
}

/// Parses the trainer table, resolving party references against `parties`.
///
/// The sentinel trainer must be present; it is moved to the front when it is not
/// already first.
pub fn parse_trainer_table(
    artifact: &str,
    text: &str,
    parties: &IndexMap<String, Party>,
) -> Result<IndexMap<String, Trainer>, ParseError> {
    let mut lexer = Lexer::new(artifact, text);
    let mut trainers: IndexMap<String, Trainer> = IndexMap::new();
    let mut current: Option<Trainer> = None;

    while let Some(line) = lexer.next() {
        let tag = line.tag();
        match tag {
            END_OF_TABLE => {
                if current.is_some() {
                    return Err(lexer.syntax(&line, "table closed inside a trainer record"));
                }
                move_sentinel_first(&lexer, &line, &mut trainers)?;
                debug!(artifact, count = trainers.len(), "parsed trainer table");
                return Ok(trainers);
            }
            "const" | OPEN_RECORD => {}
            END_OF_RECORD => {
                let Some(trainer) = current.take() else {
                    return Err(lexer.syntax(&line, "record terminator without a trainer"));
                };
                if trainers.contains_key(trainer.identifier()) {
                    return Err(lexer.duplicate(&line, trainer.identifier()));
                }
                trainers.insert(trainer.identifier().to_string(), trainer);
            }
            _ if tag.starts_with('[') => {
                if current.is_some() {
                    return Err(lexer.syntax(&line, "previous trainer record is not terminated"));
                }
                let identifier = tag.trim_start_matches('[').trim_end_matches(']');
                if identifier.is_empty() {
                    return Err(lexer.syntax(&line, "empty trainer identifier"));
                }
                current = Some(Trainer::new(identifier));
            }
            _ => {
                let Some(trainer) = current.as_mut() else {
                    trace!(tag, line = line.number, "ignoring line outside of a trainer record");
                    continue;
                };
                apply_trainer_field(&lexer, &line, trainer, parties)?;
            }
        }
    }

    Err(lexer.eof(format!("trainer table is not closed with {END_OF_TABLE}")))
}

fn move_sentinel_first(
    lexer: &Lexer<'_>,
    line: &Line<'_>,
    trainers: &mut IndexMap<String, Trainer>,
) -> Result<(), ParseError> {
    let Some(index) = trainers.get_index_of(SENTINEL_TRAINER) else {
        return Err(lexer.syntax(line, format!("trainer table has no {SENTINEL_TRAINER} entry")));
    };
    if index != 0 {
        warn!(index, "{SENTINEL_TRAINER} is not the first trainer; moving it to the front");
        trainers.move_index(index, 0);
    }
    Ok(())
}

fn apply_trainer_field(
    lexer: &Lexer<'_>,
    line: &Line<'_>,
    trainer: &mut Trainer,
    parties: &IndexMap<String, Party>,
) -> Result<(), ParseError> {
    let tag = line.tag();
    let known = matches!(
        tag,
        ".trainerClass"
            | ".encounterMusic_gender"
            | ".trainerPic"
            | ".trainerName"
            | ".items"
            | ".doubleBattle"
            | ".aiFlags"
            | ".party"
    );
    if !known {
        trace!(tag, line = line.number, "ignoring trainer field");
        return Ok(());
    }
    if line.values().is_empty() {
        return Err(lexer.syntax(line, format!("{tag} has no value")));
    }
    let value = trim_list_punct(line.last());

    match tag {
        ".trainerClass" => trainer.trainer_class = value.to_string(),
        ".encounterMusic_gender" => {
            trainer.gender = line.token(2).map_or(Gender::Male, Gender::from_marker);
            trainer.music = value.to_string();
        }
        ".trainerPic" => trainer.trainer_pic = value.to_string(),
        ".trainerName" => {
            let name = line
                .quoted()
                .ok_or_else(|| lexer.syntax(line, "trainer name is not a quoted string"))?;
            trainer.name = name.to_string();
        }
        ".items" => {
            for item in line.values().iter().map(|token| trim_list_punct(token)) {
                if item.is_empty() {
                    continue;
                }
                if trainer.items_full() {
                    return Err(lexer.syntax(
                        line,
                        format!("more than {ITEM_CAPACITY} items"),
                    ));
                }
                trainer.append_item(item);
            }
        }
        ".doubleBattle" => {
            trainer.double_battle = match value {
                TRUE_TOKEN => true,
                FALSE_TOKEN => false,
                other => {
                    return Err(lexer.syntax(
                        line,
                        format!("expected {TRUE_TOKEN} or {FALSE_TOKEN}, found {other}"),
                    ));
                }
            };
        }
        ".aiFlags" => {
            let names = line
                .values()
                .iter()
                .filter(|token| **token != FLAG_OR)
                .map(|token| trim_list_punct(token));
            let (flags, unknown) = AiFlags::from_names(names);
            if !unknown.is_empty() {
                warn!(
                    trainer = trainer.identifier(),
                    ?unknown,
                    "dropping unrecognised AI flags"
                );
            }
            trainer.ai_flags = flags;
        }
        ".party" => {
            if value == NULL_PARTY {
                trainer.set_party(None);
            } else if parties.contains_key(value) {
                trainer.set_party(Some(value.to_string()));
            } else {
                return Err(lexer.missing_reference(line, value));
            }
        }
        _ => unreachable!("field tags filtered above"),
    }
    Ok(())
}

/// Renders the trainer table. Fails without output if any trainer references a party
/// that is not in `parties`.
pub fn write_trainer_table<'a>(
    trainers: impl ExactSizeIterator<Item = &'a Trainer>,
    parties: &IndexMap<String, Party>,
) -> Result<String, DanglingReference> {
    let total = trainers.len();
    let mut out = String::new();
    writeln!(&mut out, "{TABLE_HEADER}").expect("writing to String cannot fail");

    for (index, trainer) in trainers.enumerate() {
        let party = resolve_party(trainer, parties)?;
        write_trainer(&mut out, trainer, party);
        if index + 1 != total {
            out.push('\n');
        }
    }

    out.push_str(END_OF_TABLE);
    out.push('\n');
    Ok(out)
}

fn resolve_party<'p>(
    trainer: &Trainer,
    parties: &'p IndexMap<String, Party>,
) -> Result<Option<&'p Party>, DanglingReference> {
    if trainer.is_sentinel() {
        return Ok(None);
    }
    let Some(identifier) = trainer.party() else {
        return Ok(None);
    };
    parties
        .get(identifier)
        .map(Some)
        .ok_or_else(|| DanglingReference {
            trainer: trainer.identifier().to_string(),
            party: identifier.to_string(),
        })
}

fn write_trainer(out: &mut String, trainer: &Trainer, party: Option<&Party>) {
    let music = match trainer.gender.marker() {
        Some(marker) => format!("{marker} | {}", trainer.music),
        None => trainer.music.clone(),
    };
    let items = trainer.compact_items().collect::<Vec<_>>().join(", ");
    let double_battle = if trainer.double_battle {
        TRUE_TOKEN
    } else {
        FALSE_TOKEN
    };
    let (party_size, party_selector) = match party {
        Some(party) => (
            format!("ARRAY_COUNT({})", party.identifier()),
            format!("{{.{} = {}}}", party.variant().tag(), party.identifier()),
        ),
        None => (
            "0".to_string(),
            format!("{{.{} = {NULL_PARTY}}}", PartyVariant::NoItemDefaultMoves.tag()),
        ),
    };

    writeln!(out, "    [{}] =", trainer.identifier()).expect("writing to String cannot fail");
    out.push_str("    {\n");
    writeln!(out, "        .partyFlags = {},", trainer.encode_party_flags(party))
        .expect("writing to String cannot fail");
    writeln!(out, "        .trainerClass = {},", trainer.trainer_class)
        .expect("writing to String cannot fail");
    writeln!(out, "        .encounterMusic_gender = {music},")
        .expect("writing to String cannot fail");
    writeln!(out, "        .trainerPic = {},", trainer.trainer_pic)
        .expect("writing to String cannot fail");
    writeln!(out, "        .trainerName = _(\"{}\"),", trainer.name)
        .expect("writing to String cannot fail");
    writeln!(out, "        .items = {{{items}}},").expect("writing to String cannot fail");
    writeln!(out, "        .doubleBattle = {double_battle},")
        .expect("writing to String cannot fail");
    writeln!(out, "        .aiFlags = {},", trainer.encode_ai_flags())
        .expect("writing to String cannot fail");
    writeln!(out, "        .partySize = {party_size},").expect("writing to String cannot fail");
    writeln!(out, "        .party = {party_selector},").expect("writing to String cannot fail");
    out.push_str("    },\n");
}
