//! Diffused Rays (workspace facade crate).
//!
//! Re-exports the workspace crates as `diffused_rays::{core,engine,input,pipeline,term,types}`
//! so the binary, integration tests, and benchmarks depend on one package.

pub use diffused_rays_core as core;
pub use diffused_rays_engine as engine;
pub use diffused_rays_input as input;
pub use diffused_rays_pipeline as pipeline;
pub use diffused_rays_term as term;
pub use diffused_rays_types as types;
