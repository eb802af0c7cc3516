use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileSearchConfig};
use super::models::AppConfig;
use crate::cli::{NebArgs, StencilArg};
use crate::error::{CliError, Result};
use mofneb::core::radii::CovalentRadii;
use mofneb::engine::config::{NebConfigBuilder, Stencil};
use nalgebra::Vector3;
use tracing::warn;

/// Merges CLI arguments, the optional config file and built-in defaults, in
/// that order of precedence.
pub fn build_config(args: &NebArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let search_file = file_config.search.unwrap_or_default();
    let neb_file = file_config.neb.unwrap_or_default();

    let direction = args.direction.or(search_file.direction);
    let stencil = merge_stencil(args.stencil, &search_file, direction, &defaults)?;
    let fallback_stencil = merge_fallback(args, &search_file, direction, &defaults)?;

    let min_path_length = args
        .min_path_length
        .or(search_file.min_path_length)
        .unwrap_or(defaults.min_path_length);
    let images = args.images.or(neb_file.images).unwrap_or(defaults.images);
    let engine = args
        .engine
        .clone()
        .or(neb_file.engine)
        .unwrap_or(defaults.engine);

    let core_config = NebConfigBuilder::new()
        .stencil(stencil)
        .fallback_stencil(fallback_stencil)
        .min_path_length(min_path_length)
        .images(images)
        .engine(engine)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let mut radii = match file_config.radii {
        Some(table) => {
            CovalentRadii::from_symbols(table).map_err(|e| CliError::Config(e.to_string()))?
        }
        None => CovalentRadii::new(),
    };
    if let Some(path) = &args.radii {
        let cli_radii = CovalentRadii::load(path).map_err(|e| CliError::FileParsing {
            path: path.clone(),
            source: e.into(),
        })?;
        radii.merge(&cli_radii);
    }

    let job_name = args
        .name
        .clone()
        .or_else(|| {
            args.host
                .host
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or(defaults.job_name);

    Ok(AppConfig {
        output_dir: args.output_dir.clone(),
        job_name,
        write_xyz: args.xyz,
        radii,
        core_config,
    })
}

fn stencil_from_arg(arg: StencilArg, direction: Option<[f64; 3]>) -> Stencil {
    match arg {
        StencilArg::Axis6 => Stencil::Axis6,
        StencilArg::Full13 => Stencil::Full13,
        StencilArg::FixedSingle => with_direction(Stencil::fixed_default(), direction),
    }
}

fn with_direction(stencil: Stencil, direction: Option<[f64; 3]>) -> Stencil {
    match (stencil, direction) {
        (Stencil::FixedSingle(_), Some(d)) => Stencil::FixedSingle(Vector3::from(d)),
        (stencil, _) => stencil,
    }
}

fn parse_stencil(name: &str, direction: Option<[f64; 3]>) -> Result<Stencil> {
    let stencil = name
        .parse::<Stencil>()
        .map_err(|e| CliError::Config(e.to_string()))?;
    Ok(with_direction(stencil, direction))
}

fn merge_stencil(
    cli: Option<StencilArg>,
    file: &FileSearchConfig,
    direction: Option<[f64; 3]>,
    defaults: &DefaultsConfig,
) -> Result<Stencil> {
    let stencil = match (cli, file.stencil.as_deref()) {
        (Some(arg), _) => stencil_from_arg(arg, direction),
        (None, Some(name)) => parse_stencil(name, direction)?,
        (None, None) => defaults.stencil,
    };
    if direction.is_some() && !matches!(stencil, Stencil::FixedSingle(_)) {
        warn!(
            stencil = %stencil,
            "A direction was given but the stencil is not fixed-single; ignoring it."
        );
    }
    Ok(stencil)
}

fn merge_fallback(
    args: &NebArgs,
    file: &FileSearchConfig,
    direction: Option<[f64; 3]>,
    defaults: &DefaultsConfig,
) -> Result<Option<Stencil>> {
    if args.no_fallback {
        return Ok(None);
    }
    if let Some(arg) = args.fallback_stencil {
        return Ok(Some(stencil_from_arg(arg, direction)));
    }
    match file.fallback_stencil.as_deref() {
        Some(name) if name.eq_ignore_ascii_case("none") => Ok(None),
        Some(name) => parse_stencil(name, direction).map(Some),
        None => Ok(defaults.fallback_stencil),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn neb_args(extra: &[&str]) -> NebArgs {
        let mut argv = vec!["mofneb", "neb", "--host", "frameworks/zif8.xyz", "--guest", "li.xyz"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Neb(args) => args,
            _ => panic!("Expected 'neb' subcommand"),
        }
    }

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("mofneb.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let app = build_config(&neb_args(&[])).unwrap();
        let search = &app.core_config.search;
        assert_eq!(search.stencil, Stencil::Full13);
        assert_eq!(search.fallback_stencil, Some(Stencil::Axis6));
        assert_eq!(search.min_path_length, 4);
        assert_eq!(app.core_config.job.images, 30);
        assert_eq!(app.core_config.job.engine, "DFTB");
        assert_eq!(app.job_name, "zif8");
        assert_eq!(app.job_path(), PathBuf::from("./zif8.run"));
        assert!(app.radii.overrides().is_empty());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempdir().unwrap();
        let config = write_config(
            dir.path(),
            r#"
            [search]
            stencil = "fixed-single"
            direction = [0.0, 2.0, 0.0]
            fallback-stencil = "none"
            min-path-length = 3

            [neb]
            images = 12
            engine = "ForceField"

            [radii]
            O = 0.7
            "#,
        );
        let app = build_config(&neb_args(&["-c", config.to_str().unwrap()])).unwrap();
        let search = &app.core_config.search;
        assert_eq!(search.stencil, Stencil::FixedSingle(Vector3::new(0.0, 2.0, 0.0)));
        assert_eq!(search.fallback_stencil, None);
        assert_eq!(search.min_path_length, 3);
        assert_eq!(app.core_config.job.images, 12);
        assert_eq!(app.core_config.job.engine, "ForceField");
        assert_eq!(app.radii.radius(8), Some(0.7));
    }

    #[test]
    fn cli_arguments_override_file_values() {
        let dir = tempdir().unwrap();
        let config = write_config(
            dir.path(),
            "[search]\nstencil = \"axis-6\"\nfallback-stencil = \"full-13\"\n[neb]\nimages = 12\n",
        );
        let radii_path = dir.path().join("radii.toml");
        fs::write(&radii_path, "O = 0.5\n").unwrap();
        let dir_str = dir.path().to_str().unwrap();

        let app = build_config(&neb_args(&[
            "-c",
            config.to_str().unwrap(),
            "--stencil",
            "full-13",
            "--no-fallback",
            "--images",
            "8",
            "--radii",
            radii_path.to_str().unwrap(),
            "-o",
            dir_str,
            "-n",
            "li_path",
        ]))
        .unwrap();

        assert_eq!(app.core_config.search.stencil, Stencil::Full13);
        assert_eq!(app.core_config.search.fallback_stencil, None);
        assert_eq!(app.core_config.job.images, 8);
        assert_eq!(app.radii.radius(8), Some(0.5));
        assert_eq!(app.job_path(), dir.path().join("li_path.run"));
        assert_eq!(app.trajectory_path(), dir.path().join("li_path.xyz"));
    }

    #[test]
    fn cli_direction_applies_to_fixed_single() {
        let app = build_config(&neb_args(&["--stencil", "fixed-single", "--direction", "0,0,-1"])).unwrap();
        assert_eq!(
            app.core_config.search.stencil,
            Stencil::FixedSingle(Vector3::new(0.0, 0.0, -1.0))
        );
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let zero = build_config(&neb_args(&["--stencil", "fixed-single", "--direction", "0,0,0"]));
        assert!(matches!(zero, Err(CliError::Config(_))));

        let too_long = build_config(&neb_args(&["--min-path-length", "9"]));
        assert!(matches!(too_long, Err(CliError::Config(_))));

        let dir = tempdir().unwrap();
        let config = write_config(dir.path(), "[search]\nstencil = \"spiral\"\n");
        let unknown = build_config(&neb_args(&["-c", config.to_str().unwrap()]));
        assert!(matches!(unknown, Err(CliError::Config(_))));

        let config = write_config(dir.path(), "[radii]\nXx = 1.0\n");
        let bad_radii = build_config(&neb_args(&["-c", config.to_str().unwrap()]));
        assert!(matches!(bad_radii, Err(CliError::Config(_))));
    }
}
