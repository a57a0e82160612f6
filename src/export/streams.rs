use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{ExportError, ExportResult};

/// Output stream categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Scene,
    Nodes,
    Lights,
    Camera,
    Environment,
    Textures,
    Materials,
    Geometry,
}

impl Category {
    /// Every category, in `#include` order after the scene stream.
    pub const ALL: [Category; 8] = [
        Self::Scene,
        Self::Nodes,
        Self::Lights,
        Self::Camera,
        Self::Environment,
        Self::Textures,
        Self::Materials,
        Self::Geometry,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scene => "scene",
            Self::Nodes => "nodes",
            Self::Lights => "lights",
            Self::Camera => "camera",
            Self::Environment => "environment",
            Self::Textures => "textures",
            Self::Materials => "materials",
            Self::Geometry => "geometry",
        }
    }

    /// Section comment written after the stream header.
    pub fn title(self) -> &'static str {
        match self {
            Self::Scene => "Settings",
            Self::Nodes => "Nodes",
            Self::Lights => "Lights",
            Self::Camera => "Camera",
            Self::Environment => "Environment",
            Self::Textures => "Textures",
            Self::Materials => "Materials",
            Self::Geometry => "Geometry",
        }
    }
}

/// `<base>.vrscene` for the scene stream, `<base>_<category>.vrscene` otherwise.
pub fn stream_file_name(base: &str, category: Category) -> String {
    match category {
        Category::Scene => format!("{base}.vrscene"),
        c => format!("{base}_{}.vrscene", c.as_str()),
    }
}

/// Append-only text streams, one per [`Category`].
///
/// `close` must be idempotent; writes after `close` fail.
pub trait OutputStreams {
    fn write_str(&mut self, category: Category, text: &str) -> ExportResult<()>;
    /// File name of a stream as referenced from `#include` directives.
    fn file_name(&self, category: Category) -> String;
    /// On-disk location of a stream, when it has one.
    fn path(&self, _category: Category) -> Option<PathBuf> {
        None
    }
    fn close(&mut self) -> ExportResult<()>;
    fn is_closed(&self) -> bool;
}

/// Streams written to `<dir>/<base>*.vrscene` files.
pub struct FileStreams {
    dir: PathBuf,
    base: String,
    files: BTreeMap<Category, BufWriter<File>>,
    closed: bool,
}

impl FileStreams {
    /// Create (truncate) every stream file under `dir`.
    pub fn create(dir: &Path, base: &str) -> ExportResult<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
        let mut files = BTreeMap::new();
        for c in Category::ALL {
            let path = dir.join(stream_file_name(base, c));
            let f = File::create(&path)
                .with_context(|| format!("failed to create '{}'", path.display()))?;
            files.insert(c, BufWriter::new(f));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
            base: base.to_string(),
            files,
            closed: false,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl OutputStreams for FileStreams {
    fn write_str(&mut self, category: Category, text: &str) -> ExportResult<()> {
        let w = self
            .files
            .get_mut(&category)
            .ok_or_else(|| ExportError::validation(format!("stream '{}' is closed", category.as_str())))?;
        w.write_all(text.as_bytes())
            .with_context(|| format!("failed to write stream '{}'", category.as_str()))?;
        Ok(())
    }

    fn file_name(&self, category: Category) -> String {
        stream_file_name(&self.base, category)
    }

    fn path(&self, category: Category) -> Option<PathBuf> {
        Some(self.dir.join(self.file_name(category)))
    }

    fn close(&mut self) -> ExportResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        // Close every stream even when one fails; report the first failure.
        let mut first_err: Option<ExportError> = None;
        for (c, mut w) in std::mem::take(&mut self.files) {
            let res = w
                .write_all(b"\n")
                .and_then(|_| w.flush())
                .with_context(|| format!("failed to close stream '{}'", c.as_str()));
            if let Err(e) = res
                && first_err.is_none()
            {
                first_err = Some(e.into());
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// In-memory streams for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStreams {
    base: String,
    texts: BTreeMap<Category, String>,
    closed: bool,
}

impl MemoryStreams {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            texts: BTreeMap::new(),
            closed: false,
        }
    }

    /// Text written to `category` so far.
    pub fn text(&self, category: Category) -> &str {
        self.texts.get(&category).map_or("", String::as_str)
    }

    pub fn total_len(&self) -> usize {
        self.texts.values().map(String::len).sum()
    }
}

impl OutputStreams for MemoryStreams {
    fn write_str(&mut self, category: Category, text: &str) -> ExportResult<()> {
        if self.closed {
            return Err(ExportError::validation(format!(
                "stream '{}' is closed",
                category.as_str()
            )));
        }
        self.texts.entry(category).or_default().push_str(text);
        Ok(())
    }

    fn file_name(&self, category: Category) -> String {
        stream_file_name(&self.base, category)
    }

    fn close(&mut self) -> ExportResult<()> {
        if self.closed {
            return Ok(());
        }
        for c in Category::ALL {
            self.texts.entry(c).or_default().push('\n');
        }
        self.closed = true;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/streams.rs"]
mod tests;
