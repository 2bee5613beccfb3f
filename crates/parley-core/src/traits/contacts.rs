// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact service trait (external collaborator).

use async_trait::async_trait;

use crate::error::ParleyError;
use crate::ident::Identifier;
use crate::traits::adapter::PluginAdapter;
use crate::types::ContactOutcome;

/// Remote contact list management.
#[async_trait]
pub trait ContactService: PluginAdapter {
    async fn add_contact(
        &self,
        owner: &Identifier,
        name: &Identifier,
    ) -> Result<ContactOutcome, ParleyError>;

    async fn get_contacts(&self, owner: &Identifier) -> Result<Vec<String>, ParleyError>;
}
