//! Breakout CSV export decoding
//!
//! The export is a fixed nine-column shape:
//! `id,name,location,description,day,start_slot,end_slot,credit,facilitator`
//! with a header row. Fields may be double-quoted; quotes inside a quoted
//! field are doubled. That is the whole grammar, so the decoder is a small
//! hand-rolled state machine rather than a dependency.

use gavel_domain::{Breakout, Credit, GavelError, Result};

/// Split CSV text into records of fields.
///
/// Handles quoted fields, embedded separators/newlines inside quotes, and
/// both LF and CRLF line endings. Empty trailing lines are dropped.
pub fn parse_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => {
                record.push(std::mem::take(&mut field));
            }
            '\r' if !in_quotes => {}
            '\n' if !in_quotes => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records.retain(|r| !(r.len() == 1 && r[0].is_empty()));
    records
}

fn malformed(detail: impl Into<String>) -> GavelError {
    GavelError::Network(format!("malformed breakout export: {}", detail.into()))
}

/// Decode one export record into a breakout.
fn decode_record(registry_meeting_id: i64, record: &[String]) -> Result<Breakout> {
    if record.len() != 9 {
        return Err(malformed(format!("expected 9 columns, got {}", record.len())));
    }
    let id = record[0].parse().map_err(|_| malformed(format!("bad breakout id {:?}", record[0])))?;
    let day =
        record[4].parse().map_err(|_| malformed(format!("bad day index {:?}", record[4])))?;
    let start_slot_id =
        record[5].parse().map_err(|_| malformed(format!("bad start slot {:?}", record[5])))?;
    let end_slot_id =
        record[6].parse().map_err(|_| malformed(format!("bad end slot {:?}", record[6])))?;
    let credit = Credit::parse(&record[7])
        .ok_or_else(|| malformed(format!("unknown credit {:?}", record[7])))?;

    Ok(Breakout {
        id,
        registry_meeting_id,
        name: record[1].clone(),
        location: record[2].clone(),
        description: non_empty(&record[3]),
        day,
        start_slot_id,
        end_slot_id,
        credit,
        facilitator: non_empty(&record[8]),
    })
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Decode the full export (header row included) into breakouts.
pub fn decode_export(registry_meeting_id: i64, text: &str) -> Result<Vec<Breakout>> {
    let records = parse_records(text);
    records
        .iter()
        .skip(1) // header
        .map(|record| decode_record(registry_meeting_id, record))
        .collect()
}
