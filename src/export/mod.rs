//! Scene export: naming, caching, the entity writers and the frame orchestrator.

pub(crate) mod cache;
pub(crate) mod camera;
pub(crate) mod compositor;
pub(crate) mod context;
pub(crate) mod lights;
pub(crate) mod materials;
pub(crate) mod naming;
pub(crate) mod native;
pub(crate) mod session;
pub(crate) mod settings;
pub(crate) mod streams;
pub(crate) mod textures;
