use std::fmt::Write as _;

use crate::foundation::core::{DMat4, DVec3, FrameNumber};
use crate::vrscene::record::{Record, Value};

/// Pure text formatter for [`Record`] values.
///
/// When `interpolate_frame` is set (range animation export), every value except quoted strings
/// and lists is wrapped as `interpolate((frame,value))` so per-frame blocks merge in the
/// renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Formatter {
    pub interpolate_frame: Option<FrameNumber>,
}

impl Formatter {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn interpolated(frame: FrameNumber) -> Self {
        Self {
            interpolate_frame: Some(frame),
        }
    }

    pub fn field_value(&self, v: &Value) -> String {
        let body = format_value(v);
        match (self.interpolate_frame, v) {
            (Some(_), Value::Str(_) | Value::List(_)) | (None, _) => body,
            (Some(f), _) => format!("interpolate(({},{body}))", f.0),
        }
    }

    /// Render one record, including the trailing blank line.
    pub fn render(&self, rec: &Record) -> String {
        let mut out = String::new();
        out.push_str(&rec.plugin);
        if let Some(name) = &rec.name {
            out.push(' ');
            out.push_str(name);
        }
        out.push_str(" {");
        if let Some(c) = &rec.comment {
            let _ = write!(out, " // {c}");
        }
        out.push('\n');
        for f in &rec.fields {
            let _ = writeln!(out, "\t{}= {};", f.key, self.field_value(&f.value));
        }
        out.push_str("}\n\n");
        out
    }
}

/// Render a value without interpolation.
pub fn format_value(v: &Value) -> String {
    match v {
        Value::Bool(b) => u8::from(*b).to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => fmt_f(*f),
        Value::Str(s) => format!("\"{}\"", s.replace('\\', "/").replace('"', "\\\"")),
        Value::Ref(n) => n.clone(),
        Value::Output { plugin, output } => format!("{plugin}::{output}"),
        Value::Color(c) => format!("Color({},{},{})", fmt_f(c.0), fmt_f(c.1), fmt_f(c.2)),
        Value::AColor(c) => format!(
            "AColor({},{},{},{})",
            fmt_f(c.0),
            fmt_f(c.1),
            fmt_f(c.2),
            fmt_f(c.3)
        ),
        Value::Vector(v) => fmt_vector(*v),
        Value::Transform(m) => fmt_transform(m),
        Value::List(items) => {
            let inner: Vec<String> = items.iter().map(format_value).collect();
            format!("List({})", inner.join(","))
        }
    }
}

fn fmt_f(v: f64) -> String {
    format!("{v:.6}")
}

fn fmt_vector(v: DVec3) -> String {
    format!("Vector({}, {}, {})", fmt_f(v.x), fmt_f(v.y), fmt_f(v.z))
}

fn fmt_transform(m: &DMat4) -> String {
    format!(
        "Transform(Matrix({},{},{}),{})",
        fmt_vector(m.x_axis.truncate()),
        fmt_vector(m.y_axis.truncate()),
        fmt_vector(m.z_axis.truncate()),
        fmt_vector(m.w_axis.truncate()),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/vrscene/format.rs"]
mod tests;
