// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
// CLI argument definitions for kuby

use std::path::PathBuf;

use chrono::Duration;
use clap::{Args, Parser, Subcommand};

use kuby::Settings;
use kuby::platform::KUBECTL_DOWNLOAD_BASE;
use kuby::settings::{KUBECTL_LINK, KUBERNETES_RELEASES_URL};

#[derive(Parser)]
#[command(
    name = "kuby",
    version,
    about = "Kubernetes helpers around kubectl",
    max_term_width = 100
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args)]
pub struct GlobalOptions {
    /// Make the operation more talkative
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Base directory for kuby data [default: ~/.kube/k8s-helpers]
    #[arg(long = "home", env = "KUBY_HOME", value_name = "DIR", global = true)]
    pub home: Option<PathBuf>,

    /// Location of the symlink that selects the active kubectl
    #[arg(
        long = "kubectl-link",
        env = "KUBY_KUBECTL_LINK",
        value_name = "PATH",
        default_value = KUBECTL_LINK,
        global = true
    )]
    pub kubectl_link: PathBuf,

    /// Refetch the remote version list when the cache is older than this
    #[arg(long = "cache-ttl", env = "KUBY_CACHE_TTL", value_name = "HOURS", global = true)]
    pub cache_ttl: Option<u32>,

    #[arg(
        long = "releases-url",
        env = "KUBY_RELEASES_URL",
        default_value = KUBERNETES_RELEASES_URL,
        hide = true,
        global = true
    )]
    pub releases_url: String,

    #[arg(
        long = "download-url",
        env = "KUBY_DOWNLOAD_URL",
        default_value = KUBECTL_DOWNLOAD_BASE,
        hide = true,
        global = true
    )]
    pub download_url: String,
}

impl GlobalOptions {
    /// Build the settings the commands run with
    ///
    /// # Errors
    /// Returns error if no base directory was given and the home directory is unknown
    pub fn settings(&self) -> kuby::Result<Settings> {
        let base_dir = match &self.home {
            Some(home) => home.clone(),
            None => Settings::default_base_dir()?,
        };

        Ok(Settings::new(base_dir)
            .with_link_path(&self.kubectl_link)
            .with_releases_url(&self.releases_url)
            .with_download_base_url(&self.download_url)
            .with_cache_ttl(self.cache_ttl.map(|hours| Duration::hours(i64::from(hours)))))
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Utilities for kubectl management
    #[command(subcommand)]
    Kubectl(KubectlCommand),

    /// Output the program version and the version of kubectl that is used
    Version,
}

#[derive(Subcommand)]
pub enum KubectlCommand {
    /// Install and use a specific version of kubectl (i.e. download it)
    Install {
        /// Version or range to install, e.g. 1.12 or ^1.10.0
        semver: String,

        /// Download again even if the version is already installed
        #[arg(short, long)]
        force: bool,

        /// No interaction mode, use default answers
        #[arg(short = 'n', long)]
        no_interaction: bool,
    },

    /// List local available kubectl versions
    #[command(visible_alias = "ls")]
    List,

    /// Get all kubernetes releases from the GitHub API and store them locally
    Refresh,

    /// Delete (locally) a version of kubectl
    #[command(visible_alias = "rm")]
    Remove {
        /// Version or range to delete, asks when omitted
        semver: Option<String>,

        /// No interaction mode, use default answers
        #[arg(short = 'n', long)]
        no_interaction: bool,
    },

    /// Use a specific version of kubectl (symlink it)
    Use {
        /// Version or range to use, asks when omitted
        semver: Option<String>,

        /// No interaction mode, use default answers
        #[arg(short = 'n', long)]
        no_interaction: bool,
    },
}
