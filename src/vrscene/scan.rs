use crate::foundation::error::{ExportError, ExportResult};

/// A record read back from scene-description text. Field values are kept as raw text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannedRecord {
    pub plugin: String,
    pub name: Option<String>,
    pub fields: Vec<(String, String)>,
}

impl ScannedRecord {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Records and `#include` directives of one stream, in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScannedDocument {
    pub records: Vec<ScannedRecord>,
    pub includes: Vec<String>,
}

impl ScannedDocument {
    pub fn named(&self, name: &str) -> Vec<&ScannedRecord> {
        self.records
            .iter()
            .filter(|r| r.name.as_deref() == Some(name))
            .collect()
    }

    pub fn of_plugin(&self, plugin: &str) -> Vec<&ScannedRecord> {
        self.records.iter().filter(|r| r.plugin == plugin).collect()
    }

    pub fn find(&self, plugin: &str, name: &str) -> Option<&ScannedRecord> {
        self.records
            .iter()
            .find(|r| r.plugin == plugin && r.name.as_deref() == Some(name))
    }
}

/// Read scene-description text produced by [`crate::Formatter`].
///
/// Only the subset of the grammar the exporter writes is accepted: one field per line, no
/// nested blocks.
pub fn scan(text: &str) -> ExportResult<ScannedDocument> {
    let mut doc = ScannedDocument::default();
    let mut open: Option<ScannedRecord> = None;

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        if let Some(rec) = open.as_mut() {
            if line == "}" {
                if let Some(done) = open.take() {
                    doc.records.push(done);
                }
                continue;
            }
            let (key, value) = line
                .strip_suffix(';')
                .and_then(|l| l.split_once('='))
                .ok_or_else(|| {
                    ExportError::validation(format!("line {}: malformed field '{line}'", lineno + 1))
                })?;
            rec.fields
                .push((key.trim().to_string(), value.trim().to_string()));
            continue;
        }

        if let Some(rest) = line.strip_prefix("#include") {
            let rest = rest.trim();
            let path = rest
                .strip_prefix('"')
                .and_then(|r| r.split('"').next())
                .unwrap_or(rest);
            doc.includes.push(path.to_string());
            continue;
        }

        let header = line.split("//").next().unwrap_or(line).trim();
        let header = header.strip_suffix('{').ok_or_else(|| {
            ExportError::validation(format!("line {}: expected record header", lineno + 1))
        })?;
        let mut parts = header.split_whitespace();
        let plugin = parts.next().ok_or_else(|| {
            ExportError::validation(format!("line {}: missing plugin type", lineno + 1))
        })?;
        open = Some(ScannedRecord {
            plugin: plugin.to_string(),
            name: parts.next().map(str::to_string),
            fields: Vec::new(),
        });
    }

    if let Some(rec) = open {
        return Err(ExportError::validation(format!(
            "unterminated record '{}'",
            rec.name.as_deref().unwrap_or(&rec.plugin)
        )));
    }
    Ok(doc)
}

#[cfg(test)]
#[path = "../../tests/unit/vrscene/scan.rs"]
mod tests;
