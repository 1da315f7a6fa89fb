// Line codec for intermediate records and artifacts.
//
// Every record is one tab-delimited text line:
//
//   counts        {state}:{word}\t{count}
//   by word       {word}\t{state}:{count}
//   by state      {state}\t{word}:{count}
//   dominant      {word}\t{state}
//   signatures    {signature}\t{state}
//   groups        {signature}\t{state},{state},...
//
// Composite fields split on their LAST ':' so a state name may itself
// contain ':'. Words never can (the vocabulary rejects it).

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::errors::RecordError;

use super::{
    DominantState, OccurrenceRecord, RankingSignature, SignatureGroup, State, StateCount,
    StateKeyed, StateSignature, WordCount, WordKeyed,
};

/// Split a line into exactly `N` tab-separated fields.
fn fields<const N: usize>(line: &str) -> Result<[&str; N], RecordError> {
    let parts: Vec<&str> = line.split('\t').collect();
    let found = parts.len();
    parts
        .try_into()
        .map_err(|_| RecordError::FieldCount { expected: N, found })
}

/// Split "left:right" on the last ':'.
fn composite(field: &str) -> Result<(&str, &str), RecordError> {
    field
        .rsplit_once(':')
        .ok_or_else(|| RecordError::MissingDelimiter {
            field: field.to_string(),
        })
}

fn non_empty<'a>(value: &'a str, what: &'static str) -> Result<&'a str, RecordError> {
    if value.is_empty() {
        Err(RecordError::EmptyField { what })
    } else {
        Ok(value)
    }
}

fn parse_state(value: &str) -> Result<State, RecordError> {
    let state = State::new(non_empty(value, "state")?);
    state.validate()?;
    Ok(state)
}

fn count(value: &str) -> Result<u64, RecordError> {
    value.parse().map_err(|_| RecordError::InvalidCount {
        value: value.to_string(),
    })
}

/// Non-blank lines with their 1-based line numbers, '\r' trimmed.
fn numbered_lines(input: &str) -> impl Iterator<Item = (usize, &str)> {
    input
        .lines()
        .enumerate()
        .map(|(i, raw)| (i + 1, raw.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
}

fn at_line(line: usize, text: &str, source: RecordError) -> RecordError {
    RecordError::AtLine {
        line,
        text: text.to_string(),
        source: Box::new(source),
    }
}

/// Parse every non-blank line of `input`, stopping at the first bad one.
///
/// Errors carry the 1-based line number and the offending text.
pub fn parse_lines<T>(input: &str) -> Result<Vec<T>, RecordError>
where
    T: FromStr<Err = RecordError>,
{
    numbered_lines(input)
        .map(|(line, text)| text.parse::<T>().map_err(|e| at_line(line, text, e)))
        .collect()
}

/// Parse a counts artifact. On top of `parse_lines`, a (state, word) key
/// that appears on more than one line is an error at its second line.
pub fn parse_counts(input: &str) -> Result<Vec<OccurrenceRecord>, RecordError> {
    let mut seen: HashSet<(State, String)> = HashSet::new();
    let mut records = Vec::new();
    for (line, text) in numbered_lines(input) {
        let record = text
            .parse::<OccurrenceRecord>()
            .map_err(|e| at_line(line, text, e))?;
        if !seen.insert((record.state.clone(), record.word.clone())) {
            return Err(at_line(
                line,
                text,
                RecordError::DuplicateKey {
                    state: record.state.to_string(),
                    word: record.word,
                },
            ));
        }
        records.push(record);
    }
    Ok(records)
}

/// Encode records one per line, with a trailing newline after each.
pub fn encode_lines<'a, T, I>(records: I) -> String
where
    T: fmt::Display + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut out = String::new();
    for record in records {
        out.push_str(&record.to_string());
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// {state}:{word}\t{count}
// ---------------------------------------------------------------------------

impl fmt::Display for OccurrenceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}\t{}", self.state, self.word, self.count)
    }
}

impl FromStr for OccurrenceRecord {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let [key, value] = fields::<2>(line)?;
        let (state, word) = composite(key)?;
        Ok(Self {
            state: parse_state(state)?,
            word: non_empty(word, "word")?.to_string(),
            count: count(value)?,
        })
    }
}

// ---------------------------------------------------------------------------
// {word}\t{state}:{count}
// ---------------------------------------------------------------------------

impl fmt::Display for WordKeyed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}:{}", self.word, self.value.state, self.value.count)
    }
}

impl FromStr for WordKeyed {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let [word, value] = fields::<2>(line)?;
        let (state, n) = composite(value)?;
        Ok(Self {
            word: non_empty(word, "word")?.to_string(),
            value: StateCount {
                state: parse_state(state)?,
                count: count(n)?,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// {state}\t{word}:{count}
// ---------------------------------------------------------------------------

impl fmt::Display for StateKeyed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}:{}", self.state, self.value.word, self.value.count)
    }
}

impl FromStr for StateKeyed {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let [state, value] = fields::<2>(line)?;
        let (word, n) = composite(value)?;
        Ok(Self {
            state: parse_state(state)?,
            value: WordCount {
                word: non_empty(word, "word")?.to_string(),
                count: count(n)?,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// {word}\t{state}
// ---------------------------------------------------------------------------

impl fmt::Display for DominantState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.word, self.state)
    }
}

// ---------------------------------------------------------------------------
// {signature}\t{state}
// ---------------------------------------------------------------------------

impl fmt::Display for StateSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.signature, self.state)
    }
}

impl FromStr for StateSignature {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let [signature, state] = fields::<2>(line)?;
        Ok(Self {
            signature: RankingSignature::from_canonical(non_empty(signature, "signature")?),
            state: parse_state(state)?,
        })
    }
}

// ---------------------------------------------------------------------------
// {signature}\t{state},{state},...
// ---------------------------------------------------------------------------

impl fmt::Display for SignatureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.signature, self.states_joined())
    }
}

impl FromStr for SignatureGroup {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let [signature, states] = fields::<2>(line)?;
        let states = non_empty(states, "state list")?
            .split(',')
            .map(parse_state)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            signature: RankingSignature::from_canonical(non_empty(signature, "signature")?),
            states,
        })
    }
}
