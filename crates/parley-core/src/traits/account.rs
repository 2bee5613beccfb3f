// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account service trait (external collaborator).

use async_trait::async_trait;

use crate::error::ParleyError;
use crate::ident::Identifier;
use crate::traits::adapter::PluginAdapter;
use crate::types::{AccountOutcome, LoginOutcome};

/// Creates accounts and checks credentials against the remote service.
///
/// Transport failures are errors; a definite answer from the service is an
/// outcome. Callers treat every non-success outcome as "cannot start a
/// session" and never retry.
#[async_trait]
pub trait AccountService: PluginAdapter {
    async fn create_account(
        &self,
        username: &Identifier,
        password: &str,
    ) -> Result<AccountOutcome, ParleyError>;

    async fn login(&self, username: &Identifier, password: &str)
    -> Result<LoginOutcome, ParleyError>;
}
