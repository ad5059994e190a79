//! Student data models and DTOs, re-exported from the `registrar-models` crate.

pub use registrar_models::students::*;
