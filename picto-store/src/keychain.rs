//! Secure API key storage using the system keychain.
//!
//! - macOS: Keychain Services
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KDE Wallet)
//!
//! ## Usage
//!
//! ```ignore
//! use picto_store::keychain;
//!
//! keychain::store_api_key("fpk-xxxxx")?;
//!
//! if let Some(key) = keychain::get_api_key() {
//!     println!("Key is configured");
//! }
//!
//! keychain::delete_api_key()?;
//! ```

use keyring::Entry;
use tracing::{debug, warn};

use crate::error::StoreError;

/// Keychain service name.
const SERVICE: &str = "Picto";

/// Keychain account holding the Freepik API key.
const ACCOUNT: &str = "freepik_api_key";

fn entry() -> Result<Entry, StoreError> {
    Entry::new(SERVICE, ACCOUNT)
        .map_err(|e| StoreError::Keychain(format!("Failed to create keychain entry: {e}")))
}

/// Stores the API key in the system keychain.
///
/// # Errors
/// Returns an error if the keychain operation fails.
pub fn store_api_key(api_key: &str) -> Result<(), StoreError> {
    entry()?
        .set_password(api_key)
        .map_err(|e| StoreError::Keychain(format!("Failed to store API key: {e}")))?;

    debug!("API key stored in keychain");
    Ok(())
}

/// Retrieves the API key from the system keychain.
///
/// Returns `None` if no key is stored, the stored key is empty, or the
/// keychain cannot be read.
pub fn get_api_key() -> Option<String> {
    let entry = match entry() {
        Ok(entry) => entry,
        Err(e) => {
            warn!(error = %e, "Keychain unavailable");
            return None;
        }
    };

    match entry.get_password() {
        Ok(key) if !key.is_empty() => {
            debug!("API key retrieved from keychain");
            Some(key)
        }
        Ok(_) | Err(keyring::Error::NoEntry) => None,
        Err(e) => {
            warn!(error = %e, "Failed to read API key from keychain");
            None
        }
    }
}

/// Deletes the API key from the system keychain.
///
/// # Errors
/// Returns an error if the deletion fails. A missing key is not an error.
pub fn delete_api_key() -> Result<(), StoreError> {
    match entry()?.delete_credential() {
        Ok(()) => {
            debug!("API key deleted from keychain");
            Ok(())
        }
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(StoreError::Keychain(format!("Failed to delete API key: {e}"))),
    }
}

/// Returns true if a non-empty API key is stored.
pub fn has_api_key() -> bool {
    get_api_key().is_some()
}
