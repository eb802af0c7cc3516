use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "MOFNEB CLI - Builds initial reaction paths for guest migration through porous frameworks and writes them as AMS NEB jobs.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for the placement search.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Place a guest next to charge-ranked host sites and write an AMS NEB job.
    Neb(NebArgs),
    /// Print the representative insertion sites of a host structure.
    Sites(SitesArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StencilArg {
    /// The six axis directions
    #[value(name = "axis-6")]
    Axis6,
    /// Axis directions plus seven diagonals
    #[value(name = "full-13")]
    Full13,
    /// One direction, set with --direction (default +x)
    #[value(name = "fixed-single")]
    FixedSingle,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ChargeModelArg {
    /// Atoms-in-molecules charges
    #[default]
    Aim,
    /// Mulliken charges
    Mulliken,
}

/// Where the host structure and its charges come from.
#[derive(Args, Debug, Clone)]
pub struct HostArgs {
    /// Host framework: an XYZ/extended-XYZ file or an AMS output log.
    #[arg(long, required = true, value_name = "PATH")]
    pub host: PathBuf,

    /// Per-atom partial charges of the host (one value per line, or index,charge).
    /// Read from the host log when omitted.
    #[arg(long, value_name = "PATH")]
    pub charges: Option<PathBuf>,

    /// Charge table to read from an AMS output log.
    #[arg(long, value_enum, default_value_t = ChargeModelArg::Aim)]
    pub charge_model: ChargeModelArg,
}

/// Arguments for the `neb` subcommand.
#[derive(Args, Debug)]
pub struct NebArgs {
    // --- Core Arguments ---
    #[command(flatten)]
    pub host: HostArgs,

    /// Guest molecule (XYZ).
    #[arg(long, required = true, value_name = "PATH")]
    pub guest: PathBuf,

    /// Path to a TOML configuration file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory the job files are written to.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Base name of the job files. Defaults to the host file stem.
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    // --- Search Overrides ---
    /// Direction stencil tried around each site.
    #[arg(long, value_enum)]
    pub stencil: Option<StencilArg>,

    /// Direction for the fixed-single stencil, as X,Y,Z.
    #[arg(long, value_name = "X,Y,Z", value_parser = parse_direction, allow_hyphen_values = true)]
    pub direction: Option<[f64; 3]>,

    /// Stencil used for a second search when the path is too short.
    #[arg(long, value_enum, conflicts_with = "no_fallback")]
    pub fallback_stencil: Option<StencilArg>,

    /// Disable the fallback search.
    #[arg(long)]
    pub no_fallback: bool,

    /// Paths shorter than this trigger the fallback search.
    #[arg(long, value_name = "N")]
    pub min_path_length: Option<usize>,

    /// Covalent radius overrides (TOML, `Symbol = radius`).
    #[arg(long, value_name = "PATH")]
    pub radii: Option<PathBuf>,

    // --- Job Overrides ---
    /// Number of interpolated NEB images.
    #[arg(long, value_name = "N")]
    pub images: Option<usize>,

    /// AMS engine block name.
    #[arg(long, value_name = "NAME")]
    pub engine: Option<String>,

    /// Also write the sampled path as a multi-frame XYZ trajectory.
    #[arg(long)]
    pub xyz: bool,
}

fn parse_direction(value: &str) -> Result<[f64; 3], String> {
    let components = value
        .split(',')
        .map(|c| c.trim().parse::<f64>().map_err(|_| format!("invalid number '{}'", c.trim())))
        .collect::<Result<Vec<_>, _>>()?;
    <[f64; 3]>::try_from(components)
        .map_err(|c| format!("expected three comma-separated components, got {}", c.len()))
}

/// Arguments for the `sites` subcommand.
#[derive(Args, Debug)]
pub struct SitesArgs {
    #[command(flatten)]
    pub host: HostArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_neb_with_overrides() {
        let cli = Cli::parse_from([
            "mofneb", "-vv", "neb", "--host", "mof.xyz", "--guest", "li.xyz",
            "--stencil", "fixed-single", "--direction", "0,-1,0", "--no-fallback", "--images", "12",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Neb(args) = cli.command else {
            panic!("Expected 'neb' subcommand");
        };
        assert_eq!(args.host.host, PathBuf::from("mof.xyz"));
        assert_eq!(args.stencil, Some(StencilArg::FixedSingle));
        assert_eq!(args.direction, Some([0.0, -1.0, 0.0]));
        assert!(args.no_fallback);
        assert_eq!(args.images, Some(12));
        assert_eq!(args.host.charge_model, ChargeModelArg::Aim);
    }

    #[test]
    fn direction_accepts_leading_minus_and_rejects_wrong_arity() {
        let cli = Cli::parse_from([
            "mofneb", "neb", "--host", "a.xyz", "--guest", "b.xyz", "--direction", "-1,0,0.5",
        ]);
        let Commands::Neb(args) = cli.command else {
            panic!("Expected 'neb' subcommand");
        };
        assert_eq!(args.direction, Some([-1.0, 0.0, 0.5]));

        assert!(parse_direction("1,2").is_err());
        assert!(parse_direction("1,x,2").is_err());
    }

    #[test]
    fn fallback_and_no_fallback_conflict() {
        let result = Cli::try_parse_from([
            "mofneb", "neb", "--host", "a.xyz", "--guest", "b.xyz",
            "--fallback-stencil", "axis-6", "--no-fallback",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_sites_with_mulliken_charges() {
        let cli = Cli::parse_from(["mofneb", "sites", "--host", "run.log", "--charge-model", "mulliken"]);
        let Commands::Sites(args) = cli.command else {
            panic!("Expected 'sites' subcommand");
        };
        assert_eq!(args.host.charge_model, ChargeModelArg::Mulliken);
        assert!(args.host.charges.is_none());
    }
}
