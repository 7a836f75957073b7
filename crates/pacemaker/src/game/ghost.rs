use serde::{Deserialize, Serialize};

/// Per-segment score increments of one play, one signed byte per checkpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ghost {
    segments: Vec<i8>,
}

impl Ghost {
    pub fn new(segments: Vec<i8>) -> Self {
        Self { segments }
    }

    /// Zero-filled trace of the given length
    pub fn blank(length: usize) -> Self {
        Self {
            segments: vec![0; length],
        }
    }

    /// Reinterpret raw wire bytes as signed segment values
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            segments: bytes.iter().map(|&b| b as i8).collect(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.segments.iter().map(|&s| s as u8).collect()
    }

    pub fn segments(&self) -> &[i8] {
        &self.segments
    }

    /// Segment value at `index`, or 0 past the end of the trace
    pub fn segment(&self, index: usize) -> i32 {
        self.segments.get(index).map_or(0, |&s| i32::from(s))
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of all segments
    pub fn total(&self) -> i32 {
        self.segments.iter().map(|&s| i32::from(s)).sum()
    }
}
