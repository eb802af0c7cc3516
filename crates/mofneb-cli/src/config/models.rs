use mofneb::core::radii::CovalentRadii;
use mofneb::engine::config::NebConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub output_dir: PathBuf,
    pub job_name: String,
    pub write_xyz: bool,
    pub radii: CovalentRadii,
    pub core_config: NebConfig,
}

impl AppConfig {
    pub fn job_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.run", self.job_name))
    }

    pub fn trajectory_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.xyz", self.job_name))
    }
}
