// Note events and the sink boundary.
//
// The facade never knows what happens to the notes it emits. It hands each
// `NoteEvent` to an `EventSink`; the sink may buffer it (a plain
// `Vec<NoteEvent>`), print it, or encode it as MIDI (`midi.rs`). Events
// always come in on/off pairs carrying the same note, velocity and duration.

use crate::error::MosaicError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    On,
    Off,
}

/// A musical value: a raw number (MIDI key, velocity) or a note name in
/// scientific pitch notation such as `"C4"`, `"F#3"` or `"Bb5"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoteValue {
    Number(i64),
    Name(String),
}

impl NoteValue {
    /// Resolve to a MIDI key (0-127). `C4` is middle C, key 60.
    pub fn midi_key(&self) -> Result<u8, MosaicError> {
        let key = match self {
            NoteValue::Number(n) => Some(*n),
            NoteValue::Name(name) => parse_note_name(name),
        };
        key.and_then(|k| u8::try_from(k).ok())
            .filter(|&k| k <= 127)
            .ok_or_else(|| MosaicError::InvalidNote(format!("note {self}")))
    }
}

impl fmt::Display for NoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteValue::Number(n) => write!(f, "{n}"),
            NoteValue::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for NoteValue {
    fn from(n: i64) -> Self {
        NoteValue::Number(n)
    }
}

impl From<&str> for NoteValue {
    fn from(name: &str) -> Self {
        NoteValue::Name(name.to_string())
    }
}

/// Letter, any number of `#`/`b` accidentals, then a (possibly negative)
/// octave number.
fn parse_note_name(name: &str) -> Option<i64> {
    let mut chars = name.trim().chars();
    let pitch_class: i64 = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let rest = chars.as_str();
    let octave_at = rest.find(|c: char| c == '-' || c.is_ascii_digit())?;
    let (accidentals, octave) = rest.split_at(octave_at);
    let mut shift = 0;
    for c in accidentals.chars() {
        match c {
            '#' => shift += 1,
            'b' => shift -= 1,
            _ => return None,
        }
    }
    let octave: i64 = octave.parse().ok()?;
    Some((octave + 1) * 12 + pitch_class + shift)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub kind: NoteKind,
    pub note: NoteValue,
    pub velocity: i64,
    pub duration: i64,
}

impl NoteEvent {
    /// The matching on/off pair for one sounded note.
    pub fn pair(note: NoteValue, velocity: i64, duration: i64) -> [NoteEvent; 2] {
        [
            NoteEvent {
                kind: NoteKind::On,
                note: note.clone(),
                velocity,
                duration,
            },
            NoteEvent {
                kind: NoteKind::Off,
                note,
                velocity,
                duration,
            },
        ]
    }
}

impl fmt::Display for NoteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            NoteKind::On => "note_on",
            NoteKind::Off => "note_off",
        };
        write!(
            f,
            "{kind} note={} velocity={} time={}",
            self.note, self.velocity, self.duration
        )
    }
}

/// Consumer of emitted note events.
pub trait EventSink {
    fn emit(&mut self, event: NoteEvent) -> Result<(), MosaicError>;
}

/// Buffers every event, in order.
impl EventSink for Vec<NoteEvent> {
    fn emit(&mut self, event: NoteEvent) -> Result<(), MosaicError> {
        self.push(event);
        Ok(())
    }
}
