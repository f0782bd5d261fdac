//! CLI handlers for `nutriplan key` subcommands.
//!
//! Implements:
//! - `nutriplan key set <KEY>` -- store (or replace) the API key
//! - `nutriplan key show`      -- print the masked key
//! - `nutriplan key clear`     -- remove the key
//! - `nutriplan key status`    -- report whether a key is configured

use anyhow::{Context, Result};

use nutriplan_core::credential::{CredentialStore, mask_credential, validate_credential_input};

use crate::KeyCommands;

/// Dispatch a `KeyCommands` variant to the appropriate handler.
pub fn run_key_command(command: KeyCommands, creds: &CredentialStore) -> Result<()> {
    match command {
        KeyCommands::Set { key } => cmd_set(creds, &key),
        KeyCommands::Show => cmd_show(creds),
        KeyCommands::Clear => {
            creds.clear().context("failed to clear API key")?;
            println!("API key cleared.");
            Ok(())
        }
        KeyCommands::Status => {
            if creds.is_present() {
                println!("API key: configured");
            } else {
                println!("API key: not configured (run `nutriplan key set <KEY>`)");
            }
            Ok(())
        }
    }
}

fn cmd_set(creds: &CredentialStore, input: &str) -> Result<()> {
    let key = validate_credential_input(input)?;
    creds.set(key).context("failed to save API key")?;
    println!("API key saved ({}).", mask_credential(key));
    Ok(())
}

fn cmd_show(creds: &CredentialStore) -> Result<()> {
    match creds.get().context("failed to read API key")? {
        Some(key) if !key.is_empty() => println!("{}", mask_credential(&key)),
        _ => println!("No API key configured."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use nutriplan_core::store::MemoryStore;

    use super::*;

    #[test]
    fn set_trims_and_rejects_blank() {
        let creds = CredentialStore::new(Arc::new(MemoryStore::new()));

        assert!(cmd_set(&creds, "   ").is_err());
        assert!(!creds.is_present());

        cmd_set(&creds, "  AIza-trimmed-key \n").unwrap();
        assert_eq!(creds.get().unwrap().as_deref(), Some("AIza-trimmed-key"));
    }

    #[test]
    fn clear_then_status() {
        let creds = CredentialStore::new(Arc::new(MemoryStore::new()));
        cmd_set(&creds, "AIza-key").unwrap();
        run_key_command(KeyCommands::Clear, &creds).unwrap();
        assert!(!creds.is_present());
        run_key_command(KeyCommands::Status, &creds).unwrap();
        run_key_command(KeyCommands::Show, &creds).unwrap();
    }
}
