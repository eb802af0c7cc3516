use mofneb::core::io::ams::job::{DEFAULT_ENGINE, DEFAULT_IMAGES};
use mofneb::engine::config::{DEFAULT_MIN_PATH_LENGTH, Stencil};

pub struct DefaultsConfig {
    pub stencil: Stencil,
    pub fallback_stencil: Option<Stencil>,
    pub min_path_length: usize,
    pub images: usize,
    pub engine: String,
    pub job_name: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            stencil: Stencil::Full13,
            fallback_stencil: Some(Stencil::Axis6),
            min_path_length: DEFAULT_MIN_PATH_LENGTH,
            images: DEFAULT_IMAGES,
            engine: DEFAULT_ENGINE.to_string(),
            job_name: "neb".to_string(),
        }
    }
}
