// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `parley contacts` command.

use colored::Colorize;
use tracing::{debug, warn};

use parley_config::model::ParleyConfig;
use parley_core::{ContactOutcome, ContactService, Identifier, ParleyError, StorageAdapter};
use parley_relay::HttpContactService;

use crate::ContactsAction;
use crate::history::open_storage;

/// Record `name` as a contact of `owner` unless it already is one.
///
/// The local store is authoritative; mirroring to the contact service is
/// best effort. Returns whether a new contact was added.
pub(crate) async fn remember(
    storage: &dyn StorageAdapter,
    remote: Option<&dyn ContactService>,
    owner: &Identifier,
    name: &Identifier,
) -> Result<bool, ParleyError> {
    let existing = storage.list_contacts(owner.as_str()).await?;
    if existing.iter().any(|c| c == name.as_str()) {
        return Ok(false);
    }
    storage.add_contact(owner.as_str(), name.as_str()).await?;

    if let Some(remote) = remote {
        match remote.add_contact(owner, name).await {
            Ok(ContactOutcome::Created) => debug!(owner = %owner, contact = %name, "contact mirrored"),
            Ok(ContactOutcome::Rejected) => {
                warn!(owner = %owner, contact = %name, "contact service rejected contact")
            }
            Err(e) => warn!(error = %e, "contact service unavailable"),
        }
    }
    Ok(true)
}

/// The contact service client, or `None` (with a warning) if it cannot be built.
pub(crate) fn contact_service(config: &ParleyConfig) -> Option<HttpContactService> {
    HttpContactService::new(&config.relay)
        .inspect_err(|e| warn!(error = %e, "contact service disabled"))
        .ok()
}

/// Runs `parley contacts`.
pub async fn run_contacts(
    config: &ParleyConfig,
    username: &str,
    action: ContactsAction,
) -> Result<(), ParleyError> {
    let owner = Identifier::parse(username)?;
    let storage = open_storage(config).await?;

    match action {
        ContactsAction::List => {
            let names = storage.list_contacts(owner.as_str()).await?;
            if names.is_empty() {
                println!("{}", "no contacts yet".dimmed());
            }
            for name in names {
                println!("{name}");
            }
        }
        ContactsAction::Add { name } => {
            let name = Identifier::parse(&name)?;
            let remote = contact_service(config);
            let remote = remote.as_ref().map(|r| r as &dyn ContactService);
            if remember(&storage, remote, &owner, &name).await? {
                println!("{}", format!("added {name}").green());
            } else {
                println!("{}", format!("{name} is already a contact").dimmed());
            }
        }
    }
    storage.close().await
}
