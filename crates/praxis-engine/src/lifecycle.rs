use jiff::SignedDuration;
use praxis_core::{Client, ClientStatus, normalize_email};
use praxis_store::{FormFilter, FormPatch, Store};
use tracing::info;
use uuid::Uuid;

use crate::error::EngineError;

/// Grace period between deactivation and scheduled erasure.
pub const DELETION_GRACE: SignedDuration = SignedDuration::from_hours(365 * 24);

impl<S: Store> crate::Engine<S> {
    /// Find or create the client for an email address. The record starts
    /// bare; name and date of birth arrive with the first submission.
    pub fn register_client(&self, email: &str) -> Result<Client, EngineError> {
        let email = normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(EngineError::InvalidInput(
                "a valid email address is required".to_string(),
            ));
        }
        if let Some(existing) = self.store.client_by_email(&email)? {
            return Ok(existing);
        }
        let client = Client::new(&email, self.now());
        self.store.create_client(&client)?;
        info!(client = %client.id, "client registered");
        Ok(client)
    }

    /// Soft-disable a client and schedule erasure one year out. Existing
    /// links are left alone.
    pub fn deactivate(&self, client_id: Uuid) -> Result<Client, EngineError> {
        let mut client = self
            .store
            .client_by_id(client_id)?
            .ok_or(EngineError::ClientNotFound)?;
        let now = self.now();
        client.status = ClientStatus::Inactive;
        client.inactivated_at = Some(now);
        client.delete_after = Some(now + DELETION_GRACE);
        client.updated_at = now;
        self.store.update_client(&client)?;
        info!(client = %client.id, "client deactivated");
        Ok(client)
    }

    /// Reverse a deactivation. Idempotent: activating an active client just
    /// refreshes nothing.
    pub fn activate(&self, client_id: Uuid) -> Result<Client, EngineError> {
        let mut client = self
            .store
            .client_by_id(client_id)?
            .ok_or(EngineError::ClientNotFound)?;
        if client.status == ClientStatus::Active
            && client.inactivated_at.is_none()
            && client.delete_after.is_none()
        {
            return Ok(client);
        }
        client.status = ClientStatus::Active;
        client.inactivated_at = None;
        client.delete_after = None;
        client.updated_at = self.now();
        self.store.update_client(&client)?;
        info!(client = %client.id, "client reactivated");
        Ok(client)
    }

    /// Irreversibly erase a client and every form record, all inside one
    /// transaction: still-active links are retired first so a cached token
    /// cannot outlive its client, then forms and the client row go. Any
    /// failure rolls the whole erasure back; partial deletion is never
    /// observable.
    pub fn delete_by_email(&self, email: &str) -> Result<(), EngineError> {
        let email = normalize_email(email);
        let client = self
            .store
            .client_by_email(&email)?
            .ok_or(EngineError::ClientNotFound)?;
        let client_id = client.id;
        let now = self.now();

        self.store.in_transaction(&mut |tx| {
            tx.update_forms(
                &FormFilter {
                    client_id: Some(client_id),
                    active: Some(true),
                    ..Default::default()
                },
                &FormPatch {
                    active: Some(false),
                    revoked_at: Some(now),
                    ..Default::default()
                },
            )?;
            tx.delete_forms_for_client(client_id)?;
            tx.delete_client(client_id)
        })?;

        info!(client = %client_id, "client erased");
        Ok(())
    }
}
