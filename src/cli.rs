use std::path::PathBuf;

use clap::Parser;

use ux_scorecard::models::Platform;

#[derive(Parser, Debug)]
#[command(
    name = "ux-scorecard",
    about = "Classify analytics snapshots by storefront platform and score UX friction per market",
    version
)]
pub struct Cli {
    /// Snapshot directory (searched along with its `data/` subdirectory) or a single snapshot file
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Config file [default: <path>/.ux-scorecard/config.toml, fallback ~/.config/ux-scorecard/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Keep only the newest record per country across all snapshots
    #[arg(long)]
    pub latest: bool,

    /// Include platforms excluded by policy (Support, Unknown by default)
    #[arg(long)]
    pub audit: bool,

    /// Only report this platform (repeatable)
    #[arg(long = "platform", value_name = "PLATFORM")]
    pub platforms: Vec<PlatformArg>,

    /// Only report this country (repeatable)
    #[arg(long = "country", value_name = "COUNTRY")]
    pub countries: Vec<String>,

    /// Re-render every SECS seconds
    #[arg(long, value_name = "SECS")]
    pub watch: Option<u64>,

    /// Also show top pages and tech breakdown; debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum PlatformArg {
    Nextgen,
    Webshop,
    Netshop,
    Support,
    Other,
    Unknown,
}

impl From<&PlatformArg> for Platform {
    fn from(arg: &PlatformArg) -> Self {
        match arg {
            PlatformArg::Nextgen => Platform::NextGen,
            PlatformArg::Webshop => Platform::Webshop,
            PlatformArg::Netshop => Platform::Netshop,
            PlatformArg::Support => Platform::Support,
            PlatformArg::Other => Platform::Other,
            PlatformArg::Unknown => Platform::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filters() {
        let cli = Cli::try_parse_from([
            "ux-scorecard",
            "data",
            "--platform",
            "nextgen",
            "--platform",
            "webshop",
            "--country",
            "France",
            "--report",
            "json",
            "--latest",
        ])
        .unwrap();
        let platforms: Vec<Platform> = cli.platforms.iter().map(Into::into).collect();
        assert_eq!(platforms, vec![Platform::NextGen, Platform::Webshop]);
        assert_eq!(cli.countries, vec!["France"]);
        assert!(matches!(cli.report, ReportFormat::Json));
        assert!(cli.latest);
        assert!(!cli.audit);
        assert_eq!(cli.watch, None);
    }
}
