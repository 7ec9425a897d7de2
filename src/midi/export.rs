// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI file export.
//!
//! Writes an [`EventStream`] as a Type 0 (single track) MIDI file. Deltas are
//! written exactly as the stream carries them; nothing is re-sorted.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::event::EventStream;
use super::messages::{META, META_END_OF_TRACK};
use crate::error::GenerateError;

/// End-of-track meta-event
const END_OF_TRACK: [u8; 3] = [META, META_END_OF_TRACK, 0x00];

/// MIDI file exporter
#[derive(Debug, Clone)]
pub struct MidiExporter {
    stream: EventStream,
}

impl MidiExporter {
    /// Create an exporter for a finished stream
    pub fn new(stream: EventStream) -> Self {
        Self { stream }
    }

    /// The stream being exported
    pub fn stream(&self) -> &EventStream {
        &self.stream
    }

    /// Get PPQN
    pub fn ppqn(&self) -> u16 {
        self.stream.ppqn
    }

    /// Encode the whole file
    pub fn to_bytes(&self) -> Vec<u8> {
        let track = self.encode_track();
        let mut bytes = Vec::with_capacity(14 + 8 + track.len());

        // MThd, chunk length 6, format 0, one track, PPQN
        bytes.extend_from_slice(b"MThd");
        bytes.extend_from_slice(&6u32.to_be_bytes());
        bytes.extend_from_slice(&0u16.to_be_bytes());
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.extend_from_slice(&self.stream.ppqn.to_be_bytes());

        bytes.extend_from_slice(b"MTrk");
        bytes.extend_from_slice(&(track.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&track);
        bytes
    }

    /// Write MIDI data to writer
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }

    /// Save to `path` atomically.
    ///
    /// The file is written next to its destination and renamed into place,
    /// so a failure never leaves a truncated file at `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), GenerateError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir).map_err(|e| write_error(path, e))?;
        self.write(&mut file).map_err(|e| write_error(path, e))?;
        file.as_file().sync_all().map_err(|e| write_error(path, e))?;
        file.persist(path).map_err(|e| write_error(path, e.error))?;

        tracing::info!("Saved MIDI file {:?} ({} events)", path, self.stream.len());
        Ok(())
    }

    fn encode_track(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.stream.len() * 4 + END_OF_TRACK.len() + 1);
        for event in &self.stream.events {
            write_variable_length(&mut data, event.delta);
            data.extend_from_slice(&event.to_bytes());
        }
        write_variable_length(&mut data, 0);
        data.extend_from_slice(&END_OF_TRACK);
        data
    }
}

fn write_error(path: &Path, source: io::Error) -> GenerateError {
    GenerateError::OutputWrite {
        path: path.to_path_buf(),
        source,
    }
}

/// Append a variable-length quantity (at most 28 bits are representable)
pub fn write_variable_length(buffer: &mut Vec<u8>, value: u32) {
    let mut value = value.min(0x0FFF_FFFF);
    let mut bytes = [0u8; 4];
    let mut len = 0;

    loop {
        bytes[len] = (value & 0x7F) as u8;
        len += 1;
        value >>= 7;
        if value == 0 {
            break;
        }
    }

    for i in (0..len).rev() {
        let continuation = if i > 0 { 0x80 } else { 0 };
        buffer.push(bytes[i] | continuation);
    }
}

/// First free path among `name.mid`, `name_1.mid`, `name_2.mid`, ...
pub fn unique_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());

    (1u32..)
        .map(|n| {
            let name = match &extension {
                Some(ext) => format!("{}_{}.{}", stem, n, ext),
                None => format!("{}_{}", stem, n),
            };
            path.with_file_name(name)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}
