//! `vrscene` exports a host scene graph to the `.vrscene` scene-description format and drives
//! the V-Ray Standalone renderer on the result.
//!
//! - Load a [`Scene`] (JSON snapshot of the host scene)
//! - Run an [`ExportSession`] over a set of [`OutputStreams`]
//! - Or use [`export_and_run`] / [`render`] to export into files and launch the renderer
#![forbid(unsafe_code)]

mod export;
mod foundation;
mod pipeline;
mod process;
mod scene;
/// Record model, text formatter and scanner.
pub mod vrscene;

pub use crate::foundation::cancel::CancelToken;
pub use crate::foundation::core::{AColor, Color, DMat4, DVec3, FrameNumber, FrameRange, Matrix4};
pub use crate::foundation::error::{ExportError, ExportResult};

pub use crate::scene::entity::{EntityKind, EntityRef, FrameHost, has_animated_lineage};
pub use crate::scene::model::{
    BlendMode, CameraData, Channel, Lamp, LampKind, Material, Object, ObjectData, Scene, TexMapping,
    Texture, TextureKind, TextureSlot,
};
pub use crate::scene::settings::{AnimationType, CheckAnimated, ExporterSettings, VRayScene};

pub use crate::export::cache::{CacheKind, FrameCache};
pub use crate::export::compositor::{ChannelValue, composite_channel};
pub use crate::export::context::{ExportContext, ExportStats, FrameState, LightLink, ToonEffects};
pub use crate::export::materials::{MaterialRequest, Stage, compose, material_name, stage_chain};
pub use crate::export::naming::{Prefix, clean_string, resolve};
pub use crate::export::native::{NodeExporter, SceneNodeExporter};
pub use crate::export::session::{ExportMode, ExportOutcome, ExportSession};
pub use crate::export::streams::{Category, FileStreams, MemoryStreams, OutputStreams, stream_file_name};
pub use crate::export::camera::write_camera;
pub use crate::export::lights::{LampInstance, LightKind, light_kind, write_lamp};
pub use crate::export::settings::write_settings;
pub use crate::export::textures::{DEFAULT_BLEND, DEFAULT_TEXTURE, DEFAULT_UVWGEN, write_slot_texture};
pub use crate::export::materials::{NO_BRDF, NO_MATERIAL};

pub use crate::pipeline::{
    PipelineOptions, PipelineReport, export_and_run, export_to_streams, output_dir, render,
    run_renderer,
};
pub use crate::process::command::{RenderJob, RendererCommand, StandaloneLocator};
pub use crate::process::driver::{LaunchMode, RendererDriver, RunOutcome};

pub use crate::vrscene::format::Formatter;
pub use crate::vrscene::record::{Record, Value};
pub use crate::vrscene::scan::{ScannedDocument, ScannedRecord, scan};
