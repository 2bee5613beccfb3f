// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `parley register` and the login step shared with `parley chat`.

use colored::Colorize;
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use parley_config::model::ParleyConfig;
use parley_core::{AccountOutcome, AccountService, Identifier, LoginOutcome, ParleyError, StorageAdapter};
use parley_relay::HttpAccountService;

use crate::chat;
use crate::history::open_storage;

pub(crate) fn prompt_password(prompt: &str) -> Result<SecretString, ParleyError> {
    rpassword::prompt_password(prompt)
        .map(SecretString::from)
        .map_err(|e| ParleyError::Internal(format!("failed to read password: {e}")))
}

/// Log in; any answer other than success ends the attempt.
pub(crate) async fn authenticate(
    accounts: &dyn AccountService,
    user: &Identifier,
    password: &SecretString,
) -> Result<(), ParleyError> {
    match accounts.login(user, password.expose_secret()).await? {
        LoginOutcome::Success => {
            info!(user = %user, "logged in");
            Ok(())
        }
        LoginOutcome::NotFound => Err(ParleyError::Auth {
            message: format!("no account named `{user}` (create one with `parley register`)"),
        }),
        LoginOutcome::Rejected(status) => Err(ParleyError::Auth {
            message: format!("login for `{user}` was rejected (status {status})"),
        }),
    }
}

/// Runs `parley register`.
pub async fn run_register(
    config: &ParleyConfig,
    username: &str,
    to: Option<&str>,
) -> Result<(), ParleyError> {
    let user = Identifier::parse(username)?;
    let recipient = to.map(Identifier::parse).transpose()?;

    let password = prompt_password("Choose a password: ")?;
    let confirm = prompt_password("Confirm password: ")?;
    if password.expose_secret() != confirm.expose_secret() {
        return Err(ParleyError::Auth {
            message: "passwords do not match".to_string(),
        });
    }

    let accounts = HttpAccountService::new(&config.relay)?;
    create_account(&accounts, &user, &password).await?;
    println!("{}", format!("account `{user}` created").green());

    authenticate(&accounts, &user, &password).await?;
    match recipient {
        Some(recipient) => chat::chat_as(config, user, recipient).await,
        None => {
            let storage = open_storage(config).await?;
            storage.ensure_user_log(user.as_str()).await?;
            storage.close().await
        }
    }
}

async fn create_account(
    accounts: &dyn AccountService,
    user: &Identifier,
    password: &SecretString,
) -> Result<(), ParleyError> {
    match accounts.create_account(user, password.expose_secret()).await? {
        AccountOutcome::Created => Ok(()),
        AccountOutcome::Conflict => Err(ParleyError::Auth {
            message: format!("username `{user}` is already taken"),
        }),
    }
}
