use crate::cli::{ChargeModelArg, HostArgs};
use crate::error::{CliError, Result};
use mofneb::core::io::ams::log::{AmsLog, ChargeModel};
use mofneb::core::io::charges::read_charges_from_path;
use mofneb::core::io::traits::StructureFile;
use mofneb::core::io::xyz::XyzFile;
use mofneb::core::models::structure::AtomicStructure;
use std::path::Path;
use tracing::info;

/// A host framework together with one partial charge per atom.
pub struct HostInput {
    pub structure: AtomicStructure,
    pub charges: Vec<f64>,
}

impl From<ChargeModelArg> for ChargeModel {
    fn from(arg: ChargeModelArg) -> Self {
        match arg {
            ChargeModelArg::Aim => ChargeModel::Aim,
            ChargeModelArg::Mulliken => ChargeModel::Mulliken,
        }
    }
}

fn is_xyz(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xyz") || ext.eq_ignore_ascii_case("extxyz"))
}

fn parse_error(path: &Path, source: impl Into<anyhow::Error>) -> CliError {
    CliError::FileParsing {
        path: path.to_path_buf(),
        source: source.into(),
    }
}

fn read_log(path: &Path) -> Result<AmsLog> {
    AmsLog::read_from_path(path).map_err(|e| parse_error(path, e))
}

/// Reads a structure from an XYZ file or, for any other extension, from the
/// final geometry of an AMS output log.
pub fn load_structure(path: &Path) -> Result<AtomicStructure> {
    info!("Loading structure from {:?}", path);
    if is_xyz(path) {
        XyzFile::read_from_path(path).map_err(|e| parse_error(path, e))
    } else {
        read_log(path)?.structure().map_err(|e| parse_error(path, e))
    }
}

/// Loads the host structure and its charges.
///
/// An explicit charge file always wins. Without one, charges are read from
/// the host itself, which must then be an AMS output log.
pub fn load_host(args: &HostArgs) -> Result<HostInput> {
    let structure = load_structure(&args.host)?;

    let charges = match &args.charges {
        Some(path) => {
            info!("Loading charges from {:?}", path);
            read_charges_from_path(path).map_err(|e| parse_error(path, e))?
        }
        None if is_xyz(&args.host) => {
            return Err(CliError::Argument(
                "--charges is required when the host is an XYZ file".to_string(),
            ));
        }
        None => {
            let model = ChargeModel::from(args.charge_model);
            info!(?model, "Reading charges from the host log.");
            read_log(&args.host)?
                .charges(model)
                .map_err(|e| parse_error(&args.host, e))?
        }
    };

    Ok(HostInput { structure, charges })
}
