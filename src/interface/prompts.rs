use dialoguer::Confirm;

use crate::error::Result;

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Ask before writing changes back, unless `assume_yes` is set.
pub fn confirm_save(assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    prompt_yes_no("Save updated snapshot?", true)
}
