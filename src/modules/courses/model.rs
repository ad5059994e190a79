pub use registrar_models::courses::*;
