pub use registrar_models::enrollments::*;
