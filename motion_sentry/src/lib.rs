// THEORY:
// This file is the main entry point for the `motion_sentry` library crate.
// The public surface is the `Monitor` in `pipeline`, together with the
// collaborator traits a front end implements (capture, display, dialogs,
// storage, input). The `core_modules` hold the analysis and control layers
// the pipeline is assembled from; a front end rarely needs to reach into
// them directly, but they are exported for testing and reuse.

pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod storage;
