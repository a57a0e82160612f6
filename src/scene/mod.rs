//! Host scene model.
//!
//! The model is a JSON-deserializable snapshot of the host scene graph. The exporter reads it
//! through [`entity::EntityRef`] and seeks frames through [`entity::FrameHost`].

pub(crate) mod entity;
pub(crate) mod model;
pub(crate) mod settings;
