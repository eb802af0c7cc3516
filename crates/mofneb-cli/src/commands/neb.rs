use super::input::{load_host, load_structure};
use crate::cli::NebArgs;
use crate::config::{AppConfig, build_config};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use mofneb::{
    core::io::{ams::job, traits::StructureFile, xyz::XyzFile},
    core::models::placement::ReactionPath,
    engine::progress::ProgressReporter,
    workflows,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

pub fn run(args: NebArgs, quiet: bool) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = build_config(&args)?;

    let host = load_host(&args.host)?;
    let guest = load_structure(&args.guest)?;
    info!(
        host_atoms = host.structure.len(),
        guest_atoms = guest.len(),
        "Inputs loaded."
    );

    let progress_handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Building reaction path...");
    let result = workflows::neb::run(
        &host.structure,
        &guest,
        &host.charges,
        &config.radii,
        &config.core_config,
        &reporter,
    )?;

    if result.skipped_sites > 0 {
        warn!(
            skipped = result.skipped_sites,
            reported = progress_handler.skipped_sites(),
            "Some representative sites had no collision-free placement."
        );
    }
    if result.path.len() < 2 {
        return Err(CliError::PathTooShort {
            images: result.path.len(),
        });
    }

    std::fs::create_dir_all(&config.output_dir)?;
    let job_path = config.job_path();
    write_job(&result.path, &config, &job_path)?;
    println!(
        "✓ {} images ({} stencil, {} placements) written to: {}",
        result.path.len(),
        result.stencil,
        result.pool_size,
        job_path.display()
    );

    if config.write_xyz {
        let xyz_path = config.trajectory_path();
        write_trajectory(&result.path, &xyz_path)?;
        println!("  Path trajectory written to: {}", xyz_path.display());
    }

    Ok(())
}

fn write_job(path: &ReactionPath, config: &AppConfig, output: &Path) -> Result<()> {
    info!("Writing NEB job to {:?}", output);
    let mut writer = BufWriter::new(File::create(output)?);
    job::write_to(path, &config.core_config.job, &mut writer).map_err(|e| {
        CliError::FileWriting {
            path: output.to_path_buf(),
            source: e.into(),
        }
    })?;
    writer.flush()?;
    make_executable(output)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

fn write_trajectory(path: &ReactionPath, output: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(output)?);
    XyzFile::write_all_to(path.structures(), &mut writer).map_err(|e| CliError::FileWriting {
        path: output.to_path_buf(),
        source: e.into(),
    })?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn neb_args(argv: &[&str]) -> NebArgs {
        let mut full = vec!["mofneb", "neb"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Neb(args) => args,
            _ => panic!("Expected 'neb' subcommand"),
        }
    }

    #[test]
    fn writes_executable_job_and_trajectory() {
        let dir = tempdir().unwrap();
        let host = dir.path().join("row.xyz");
        let charges = dir.path().join("row.charges");
        let guest = dir.path().join("li.xyz");
        fs::write(&host, "3\n\nO 0 0 0\nO 10 0 0\nO 20 0 0\n").unwrap();
        fs::write(&charges, "0.4\n-0.2\n0.1\n").unwrap();
        fs::write(&guest, "1\nlithium\nLi 0 0 0\n").unwrap();
        let out = dir.path().join("jobs");

        run(neb_args(&[
            "--host",
            host.to_str().unwrap(),
            "--charges",
            charges.to_str().unwrap(),
            "--guest",
            guest.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--images",
            "8",
            "--xyz",
        ]), true)
        .unwrap();

        let job_path = out.join("row.run");
        let text = fs::read_to_string(&job_path).unwrap();
        assert!(text.starts_with("#!/bin/sh\n"));
        assert!(text.contains("  Images 8\n"));
        assert!(text.contains("System Initial\n"));
        assert!(text.contains("System Intermediate-1\n"));
        assert!(text.contains("System Final\n"));
        assert_eq!(text.matches("      1 2 3 : Fixed\n").count(), 3);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&job_path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }

        let trajectory = fs::read_to_string(out.join("row.xyz")).unwrap();
        assert_eq!(trajectory.lines().filter(|l| l.trim() == "4").count(), 3);
    }

    #[test]
    fn single_image_path_is_not_written() {
        let dir = tempdir().unwrap();
        let host = dir.path().join("pair.xyz");
        let charges = dir.path().join("pair.charges");
        let guest = dir.path().join("li.xyz");
        // Only the O group qualifies and every site but one is blocked along +x.
        fs::write(&host, "3\n\nO 0 0 0\nO 2.5 0 0\nO 5.0 0 0\n").unwrap();
        fs::write(&charges, "0.3\n0.2\n0.1\n").unwrap();
        fs::write(&guest, "1\n\nLi 0 0 0\n").unwrap();

        let result = run(neb_args(&[
            "--host",
            host.to_str().unwrap(),
            "--charges",
            charges.to_str().unwrap(),
            "--guest",
            guest.to_str().unwrap(),
            "-o",
            dir.path().to_str().unwrap(),
            "--stencil",
            "fixed-single",
            "--no-fallback",
        ]), true);

        assert!(matches!(result, Err(CliError::PathTooShort { images: 1 })));
        assert!(!dir.path().join("pair.run").exists());
    }
}
