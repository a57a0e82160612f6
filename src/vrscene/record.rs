use crate::foundation::core::{AColor, Color, DMat4, DVec3};

/// A typed field value of a scene-description record.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Rendered as `1` / `0`.
    Bool(bool),
    Int(i64),
    /// Rendered with six decimals.
    Float(f64),
    /// Double-quoted string (file paths, enum-like strings).
    Str(String),
    /// Bare reference to another record by instance name.
    Ref(String),
    /// Reference to a named output of another record (`name::output`).
    Output { plugin: String, output: String },
    Color(Color),
    AColor(AColor),
    Vector(DVec3),
    /// Column-major transform; rendered as `Transform(Matrix(...), Vector(...))`.
    Transform(DMat4),
    List(Vec<Value>),
}

impl Value {
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Ref(name.into())
    }

    pub fn quoted(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    pub fn output(plugin: impl Into<String>, output: impl Into<String>) -> Self {
        Self::Output {
            plugin: plugin.into(),
            output: output.into(),
        }
    }

    pub fn ref_list<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(names.into_iter().map(|n| Self::Ref(n.into())).collect())
    }

    /// Reference name when this value points at another record.
    pub fn as_ref_name(&self) -> Option<&str> {
        match self {
            Self::Ref(n) => Some(n),
            Self::Output { plugin, .. } => Some(plugin),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<Color> for Value {
    fn from(v: Color) -> Self {
        Self::Color(v)
    }
}

impl From<AColor> for Value {
    fn from(v: AColor) -> Self {
        Self::AColor(v)
    }
}

impl From<DVec3> for Value {
    fn from(v: DVec3) -> Self {
        Self::Vector(v)
    }
}

impl From<DMat4> for Value {
    fn from(v: DMat4) -> Self {
        Self::Transform(v)
    }
}

/// One `key= value;` line of a record.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

/// A scene-description record: `Plugin Name { fields }`.
///
/// Field order is preserved exactly as pushed.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub plugin: String,
    /// `None` for singleton settings blocks such as `SettingsOptions { ... }`.
    pub name: Option<String>,
    pub fields: Vec<Field>,
    /// Trailing comment rendered after the opening brace.
    pub comment: Option<String>,
}

impl Record {
    pub fn new(plugin: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            name: Some(name.into()),
            fields: Vec::new(),
            comment: None,
        }
    }

    pub fn unnamed(plugin: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            name: None,
            fields: Vec::new(),
            comment: None,
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(key, value);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.push(Field {
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|f| f.key == key).map(|f| &f.value)
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn name_or_plugin(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.plugin)
    }
}
