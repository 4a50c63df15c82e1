// MIDI output for generated note events.
//
// `MidiFileSink` is an `EventSink` that encodes every event it receives as a
// track event on channel 0, with the event's duration as the delta time in
// ticks. The track opens with a program change so the file plays on the
// configured General MIDI instrument.
//
// Uses the `midly` crate for MIDI writing. Output is SMF Format 0 (a single
// track).

use crate::error::MosaicError;
use crate::events::{EventSink, NoteEvent, NoteKind};
use log::trace;
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u28},
};
use std::path::Path;

/// Ticks per quarter note in MIDI output.
const TICKS_PER_QUARTER: u16 = 480;

/// Largest delta a track event can carry.
const MAX_DELTA: i64 = 0x0FFF_FFFF;

/// Buffers note events as a single MIDI track.
#[derive(Debug, Clone)]
pub struct MidiFileSink {
    track: Track<'static>,
}

impl MidiFileSink {
    /// Start a track playing General MIDI `program` (0-127).
    pub fn new(program: u8) -> Result<Self, MosaicError> {
        let program = data_byte(i64::from(program), "program")?;
        let track = vec![TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::ProgramChange {
                    program: u7::new(program),
                },
            },
        }];
        Ok(MidiFileSink { track })
    }

    /// Note events received so far.
    pub fn note_count(&self) -> usize {
        self.track
            .iter()
            .filter(|ev| {
                matches!(
                    ev.kind,
                    TrackEventKind::Midi {
                        message: MidiMessage::NoteOn { .. } | MidiMessage::NoteOff { .. },
                        ..
                    }
                )
            })
            .count()
    }

    /// The buffered track as an in-memory SMF, terminated with end-of-track.
    pub fn to_smf(&self) -> Smf<'static> {
        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
        ));
        let mut track = self.track.clone();
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });
        smf.tracks.push(track);
        smf
    }

    /// Encoded file contents.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MosaicError> {
        let mut buf = Vec::new();
        self.to_smf().write_std(&mut buf)?;
        Ok(buf)
    }

    pub fn write(&self, path: &Path) -> Result<(), MosaicError> {
        let buf = self.to_bytes()?;
        std::fs::write(path, &buf)?;
        Ok(())
    }
}

impl EventSink for MidiFileSink {
    fn emit(&mut self, event: NoteEvent) -> Result<(), MosaicError> {
        let key = u7::new(event.note.midi_key()?);
        let vel = u7::new(data_byte(event.velocity, "velocity")?);
        if !(0..=MAX_DELTA).contains(&event.duration) {
            return Err(MosaicError::InvalidNote(format!(
                "duration {}",
                event.duration
            )));
        }
        let message = match event.kind {
            NoteKind::On => MidiMessage::NoteOn { key, vel },
            NoteKind::Off => MidiMessage::NoteOff { key, vel },
        };
        trace!("midi: {event}");
        self.track.push(TrackEvent {
            delta: u28::new(event.duration as u32),
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message,
            },
        });
        Ok(())
    }
}

/// A 7-bit MIDI data value.
fn data_byte(value: i64, what: &str) -> Result<u8, MosaicError> {
    u8::try_from(value)
        .ok()
        .filter(|&b| b <= 127)
        .ok_or_else(|| MosaicError::InvalidNote(format!("{what} {value}")))
}
