// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Questions asked to the user before acting

use dialoguer::{Confirm, Select};
use semver::Version;

use crate::error::Result;

/// Source of answers for confirmations and choices
pub trait Prompt {
    /// Ask a yes/no question
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;

    /// Let the user pick one of `items`, `None` if nothing was picked
    fn select(&self, message: &str, items: &[String]) -> Result<Option<usize>>;
}

/// Prompts on the controlling terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        Ok(Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact()?)
    }

    fn select(&self, message: &str, items: &[String]) -> Result<Option<usize>> {
        if items.is_empty() {
            return Ok(None);
        }
        Ok(Select::new()
            .with_prompt(message)
            .items(items)
            .default(0)
            .interact_opt()?)
    }
}

/// Never asks; every question takes its default answer
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultAnswers;

impl Prompt for DefaultAnswers {
    fn confirm(&self, _message: &str, default: bool) -> Result<bool> {
        Ok(default)
    }

    fn select(&self, _message: &str, _items: &[String]) -> Result<Option<usize>> {
        Ok(None)
    }
}

/// Let the user pick one of `versions`, shown as `v<version>`
///
/// # Returns
/// `None` if there is nothing to pick from or the prompt was cancelled
///
/// # Errors
/// Returns error if the prompt fails
pub fn choose_version(
    prompt: &dyn Prompt,
    message: &str,
    versions: &[Version],
) -> Result<Option<Version>> {
    if versions.is_empty() {
        return Ok(None);
    }
    let items: Vec<String> = versions.iter().map(|v| format!("v{v}")).collect();
    let choice = prompt.select(message, &items)?;
    Ok(choice.and_then(|index| versions.get(index).cloned()))
}
