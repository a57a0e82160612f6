use std::collections::BTreeMap;

use crate::export::cache::FrameCache;
use crate::export::streams::{Category, OutputStreams};
use crate::foundation::cancel::CancelToken;
use crate::foundation::core::FrameNumber;
use crate::foundation::error::ExportResult;
use crate::vrscene::format::Formatter;
use crate::vrscene::record::Record;

/// Frame currently being written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameState {
    pub number: FrameNumber,
    pub first: bool,
    /// Wrap values as `interpolate((frame,value))`.
    pub interpolate: bool,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            number: FrameNumber(1),
            first: true,
            interpolate: false,
        }
    }
}

/// Light-linker lists of one light, as resolved object names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LightLink {
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
}

/// Toon volume effects collected from materials.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToonEffects {
    /// `VolumeVRayToon` record names.
    pub effects: Vec<String>,
    /// Objects using a toon material.
    pub objects: Vec<String>,
}

/// Run statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Frames fully written.
    pub frames: u64,
    pub records: u64,
    pub bytes: u64,
    /// Lights that produced no record (hidden, unchanged or unsupported).
    pub lights_skipped: u64,
}

/// Append `item` unless already present; `true` when appended.
pub(crate) fn append_unique(list: &mut Vec<String>, item: &str) -> bool {
    if list.iter().any(|s| s == item) {
        return false;
    }
    list.push(item.to_string());
    true
}

/// Mutable state threaded through every writer during one export.
///
/// Owns the frame cache and borrows the output streams for the run; the host scene is passed
/// to writers separately so frame seeking can happen between frames.
pub struct ExportContext<'a> {
    streams: &'a mut dyn OutputStreams,
    pub cache: FrameCache,
    pub frame: FrameState,
    pub preview: bool,
    /// Variant suffix of the material being composed (object-space mapping).
    pub object_suffix: Option<String>,
    /// Keyed by light instance name.
    pub light_linker: BTreeMap<String, LightLink>,
    pub toon: ToonEffects,
    /// Active camera object name.
    pub camera: Option<String>,
    /// Cameras selected for camera-loop rendering.
    pub cameras: Vec<String>,
    pub stats: ExportStats,
    pub cancel: CancelToken,
}

impl<'a> ExportContext<'a> {
    pub fn new(streams: &'a mut dyn OutputStreams, cancel: CancelToken) -> Self {
        Self {
            streams,
            cache: FrameCache::new(),
            frame: FrameState::default(),
            preview: false,
            object_suffix: None,
            light_linker: BTreeMap::new(),
            toon: ToonEffects::default(),
            camera: None,
            cameras: Vec::new(),
            stats: ExportStats::default(),
            cancel,
        }
    }

    /// Start a frame: the per-frame cache is discarded.
    pub fn begin_frame(&mut self, frame: FrameState) {
        self.cache.reset();
        self.frame = frame;
        self.object_suffix = None;
    }

    pub fn formatter(&self) -> Formatter {
        if self.frame.interpolate {
            Formatter::interpolated(self.frame.number)
        } else {
            Formatter::plain()
        }
    }

    /// Format and append one record.
    pub fn write(&mut self, category: Category, rec: &Record) -> ExportResult<()> {
        let text = self.formatter().render(rec);
        self.stats.records += 1;
        self.write_raw(category, &text)
    }

    /// Format and append one record without frame interpolation (settings, includes).
    pub fn write_static(&mut self, category: Category, rec: &Record) -> ExportResult<()> {
        let text = Formatter::plain().render(rec);
        self.stats.records += 1;
        self.write_raw(category, &text)
    }

    /// Append raw text (headers, comments, `#include` directives).
    pub fn write_raw(&mut self, category: Category, text: &str) -> ExportResult<()> {
        self.stats.bytes += text.len() as u64;
        self.streams.write_str(category, text)
    }

    pub fn streams(&self) -> &dyn OutputStreams {
        &*self.streams
    }

    pub fn close_streams(&mut self) -> ExportResult<()> {
        self.streams.close()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/context.rs"]
mod tests;
