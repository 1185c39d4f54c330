//! Landmark sources feeding the frame loop.
//!
//! The face-mesh detector runs outside this crate. It hands over one JSON
//! object per frame:
//!
//! ```text
//! {"width":640,"height":480,"landmarks":[[x,y], ...]}
//! {"width":640,"height":480,"landmarks":null}
//! ```

use crate::{
    landmarks::{ImageSize, LandmarkSet, SourceFrame},
    Error, Result,
};
use log::{debug, info};
use serde::Deserialize;
use std::{
    collections::VecDeque,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

/// Anything that yields one frame at a time
pub trait LandmarkSource {
    /// Next frame.
    ///
    /// `Ok(None)` ends the stream; an `Err` means this frame could not be
    /// acquired and the caller may keep pulling.
    ///
    /// # Errors
    ///
    /// Returns `FrameAcquisition` or `InvalidLandmarks` for an unusable frame
    fn next_frame(&mut self) -> Result<Option<SourceFrame>>;
}

#[derive(Debug, Deserialize)]
struct FrameLine {
    width: u32,
    height: u32,
    #[serde(default)]
    landmarks: Option<Vec<[f64; 2]>>,
}

impl FrameLine {
    fn into_frame(self) -> Result<SourceFrame> {
        let image_size = ImageSize::new(self.width, self.height)
            .map_err(|e| Error::FrameAcquisition(e.to_string()))?;
        match self.landmarks {
            Some(pairs) => Ok(SourceFrame::with_face(image_size, LandmarkSet::from_pairs(&pairs)?)),
            None => Ok(SourceFrame::without_face(image_size)),
        }
    }
}

/// Parse one JSON line into a frame
///
/// # Errors
///
/// Returns `FrameAcquisition` for malformed JSON or an empty image and
/// `InvalidLandmarks` for a bad landmark list
pub fn parse_frame_line(line: &str) -> Result<SourceFrame> {
    let parsed: FrameLine =
        serde_json::from_str(line).map_err(|e| Error::FrameAcquisition(format!("Malformed frame: {e}")))?;
    parsed.into_frame()
}

/// Reads JSON lines from a file or stdin
pub struct JsonLinesSource {
    reader: Box<dyn BufRead>,
    line: String,
    line_number: usize,
}

impl JsonLinesSource {
    /// Open `input`, where `-` selects stdin
    ///
    /// # Errors
    ///
    /// Returns `SourceUnavailable` if the file cannot be opened
    pub fn open(input: &str) -> Result<Self> {
        if input == "-" {
            info!("Reading landmarks from stdin");
            return Ok(Self::from_reader(BufReader::new(io::stdin())));
        }
        Self::from_path(input)
    }

    /// Open a landmark file
    ///
    /// # Errors
    ///
    /// Returns `SourceUnavailable` if the file cannot be opened
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::SourceUnavailable(format!("Cannot open {}: {}", path.display(), e)))?;
        info!("Reading landmarks from {}", path.display());
        Ok(Self::from_reader(BufReader::new(file)))
    }

    /// Wrap any buffered reader
    pub fn from_reader<R: BufRead + 'static>(reader: R) -> Self {
        Self {
            reader: Box::new(reader),
            line: String::new(),
            line_number: 0,
        }
    }

    /// Lines consumed so far
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl LandmarkSource for JsonLinesSource {
    fn next_frame(&mut self) -> Result<Option<SourceFrame>> {
        loop {
            self.line.clear();
            let read = self
                .reader
                .read_line(&mut self.line)
                .map_err(|e| Error::FrameAcquisition(format!("Read failed: {e}")))?;
            if read == 0 {
                debug!("Landmark stream ended after {} lines", self.line_number);
                return Ok(None);
            }
            self.line_number += 1;

            let trimmed = self.line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return parse_frame_line(trimmed)
                .map(Some)
                .map_err(|e| match e {
                    Error::InvalidLandmarks(msg) => {
                        Error::InvalidLandmarks(format!("line {}: {}", self.line_number, msg))
                    }
                    other => Error::FrameAcquisition(format!("line {}: {}", self.line_number, other)),
                });
        }
    }
}

/// Replays frames held in memory
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    frames: VecDeque<SourceFrame>,
}

impl ReplaySource {
    #[must_use]
    pub fn new(frames: Vec<SourceFrame>) -> Self {
        Self { frames: frames.into() }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkSource for ReplaySource {
    fn next_frame(&mut self) -> Result<Option<SourceFrame>> {
        Ok(self.frames.pop_front())
    }
}
