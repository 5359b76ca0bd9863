// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! kuby - Main Application
//!
//! Entry point for the kuby CLI. The `kubectl` subcommands install, list, refresh,
//! remove and switch kubectl versions; `version` reports the tool version and the
//! kubectl currently in use.

mod cli;

use std::process::exit;

use anyhow::{Result, bail};
use clap::Parser;
use semver::Version;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use kuby::activate::shadowing_kubectl;
use kuby::kubectl::{client_version, locate_kubectl};
use kuby::prompt::{TerminalPrompt, choose_version};
use kuby::registry::version_dir;
use kuby::{
    Activated, Activation, InstallOptions, InstallOutcome, RemoveOutcome, Settings, VersionRange,
    activate, active_version, install, local_versions, refresh, remove,
};

use crate::cli::{Cli, Command, KubectlCommand};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    if let Err(e) = run(cli) {
        error!("{e}");
        exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "kuby=debug" } else { "kuby=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let settings = cli.global.settings()?;
    debug!(base_dir = %settings.base_dir.display(), link = %settings.link_path().display());

    match cli.command {
        Command::Kubectl(command) => match command {
            KubectlCommand::Install {
                semver,
                force,
                no_interaction,
            } => cmd_install(&settings, &semver, force, no_interaction),
            KubectlCommand::List => cmd_list(&settings),
            KubectlCommand::Refresh => cmd_refresh(&settings),
            KubectlCommand::Remove {
                semver,
                no_interaction,
            } => cmd_remove(&settings, semver.as_deref(), no_interaction),
            KubectlCommand::Use {
                semver,
                no_interaction,
            } => cmd_use(&settings, semver.as_deref(), no_interaction),
        },
        Command::Version => cmd_version(&settings),
    }
}

// =============================================================================
// Command Implementation Functions
// =============================================================================

/// Install the best remote match for `semver` and make it the active kubectl
fn cmd_install(settings: &Settings, semver: &str, force: bool, no_interaction: bool) -> Result<()> {
    let range = VersionRange::parse(semver)?;
    let options = InstallOptions {
        force,
        interactive: !no_interaction,
    };

    match install(settings, &range, options, &TerminalPrompt)? {
        InstallOutcome::Installed { activated, .. } => report_activation(settings, &activated),
        InstallOutcome::Declined { .. } => {}
    }
    Ok(())
}

/// List installed versions, marking the active one
fn cmd_list(settings: &Settings) -> Result<()> {
    let versions = local_versions(settings)?;
    if versions.is_empty() {
        println!("No local installations found.");
        return Ok(());
    }

    let active = active_version(settings);
    println!("Local available kubectl versions:");
    for version in versions {
        let selected = if active.as_ref() == Some(&version) {
            " (selected)"
        } else {
            ""
        };
        println!(
            "v{version} ({}){selected}",
            version_dir(settings, &version).display()
        );
    }
    Ok(())
}

/// Refetch the remote version list
fn cmd_refresh(settings: &Settings) -> Result<()> {
    refresh(settings)?;
    info!("Versions refreshed.");
    Ok(())
}

/// Delete an installed version, asking which one if none was given
fn cmd_remove(settings: &Settings, semver: Option<&str>, no_interaction: bool) -> Result<()> {
    let range = match semver {
        Some(semver) => VersionRange::parse(semver)?,
        None => match choose_local_version(
            settings,
            "Which version do you want to delete?",
            no_interaction,
        )? {
            Choice::Picked(version) => VersionRange::exact(&version),
            Choice::NoneInstalled => {
                info!("No local installations found.");
                return Ok(());
            }
            Choice::Cancelled => {
                info!("Aborting");
                return Ok(());
            }
        },
    };

    match remove(settings, &range)? {
        RemoveOutcome::Removed { version, .. } => info!("Version v{version} removed."),
        RemoveOutcome::NotInstalled => warn!("The given semver `{range}` is not locally installed."),
    }
    Ok(())
}

/// Switch the activation link to an installed version
fn cmd_use(settings: &Settings, semver: Option<&str>, no_interaction: bool) -> Result<()> {
    let range = match semver {
        Some(semver) => VersionRange::parse(semver)?,
        None => match choose_local_version(
            settings,
            "Which version do you want to use?",
            no_interaction,
        )? {
            Choice::Picked(version) => VersionRange::exact(&version),
            Choice::NoneInstalled => {
                bail!("No local installations found. Use the install command.")
            }
            Choice::Cancelled => {
                info!("Aborting");
                return Ok(());
            }
        },
    };

    let activated = activate(settings, &range)?;
    report_activation(settings, &activated);
    Ok(())
}

/// Print the tool version and the kubectl version in use
fn cmd_version(settings: &Settings) -> Result<()> {
    println!("kuby version: {}", env!("CARGO_PKG_VERSION"));

    let info = match locate_kubectl(settings.link_path()) {
        Some(kubectl) => client_version(&kubectl).unwrap_or_else(|e| {
            debug!("Could not query kubectl: {e}");
            Default::default()
        }),
        None => Default::default(),
    };

    let version = info
        .version
        .map_or_else(|| "unknown".to_string(), |v| format!("v{v}"));
    let platform = info.platform.unwrap_or_else(|| "unknown".to_string());
    println!("kubectl version: {version} for platform: {platform}");
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

/// Result of asking for one of the installed versions
enum Choice {
    Picked(Version),
    NoneInstalled,
    Cancelled,
}

/// Ask the user to pick one of the installed versions
fn choose_local_version(settings: &Settings, message: &str, no_interaction: bool) -> Result<Choice> {
    if no_interaction {
        bail!("A semver is required in no interaction mode");
    }

    let versions = local_versions(settings)?;
    if versions.is_empty() {
        return Ok(Choice::NoneInstalled);
    }
    Ok(match choose_version(&TerminalPrompt, message, &versions)? {
        Some(version) => Choice::Picked(version),
        None => Choice::Cancelled,
    })
}

fn report_activation(settings: &Settings, activated: &Activated) {
    let version = &activated.version;
    match &activated.activation {
        Activation::Linked { link, .. } => {
            info!("Version changed to v{version}.");
            if let Some(other) = shadowing_kubectl(link) {
                warn!(
                    "{} comes first in your PATH and hides {}",
                    other.display(),
                    link.display()
                );
            }
        }
        Activation::Unsupported => warn!(
            "Symlinks are not supported on this platform, add {} to your PATH to use v{version}",
            version_dir(settings, version).display()
        ),
    }
}
