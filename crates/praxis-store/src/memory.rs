use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};

use jiff::Timestamp;
use praxis_core::{Client, ClientStatus, Form, Questionnaire};
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{FormFilter, FormPatch, Store};

#[derive(Debug, Default, Clone)]
struct Tables {
    clients: BTreeMap<Uuid, Client>,
    forms: BTreeMap<Uuid, Form>,
}

/// In-memory [`Store`] for tests and demos. Transactions snapshot the whole
/// state and restore it on error, which makes rollback observable without a
/// real database. [`MemoryStore::fail_delete_of`] injects a deletion
/// failure for one client, for atomicity and sweep-isolation tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RefCell<Tables>,
    fail_deletes: RefCell<HashSet<Uuid>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `delete_client(id)` for this client fail.
    pub fn fail_delete_of(&self, id: Uuid) {
        self.fail_deletes.borrow_mut().insert(id);
    }

    pub fn client_count(&self) -> usize {
        self.tables.borrow().clients.len()
    }

    pub fn form_count(&self) -> usize {
        self.tables.borrow().forms.len()
    }
}

impl Store for MemoryStore {
    fn create_client(&self, client: &Client) -> Result<(), StoreError> {
        let mut tables = self.tables.borrow_mut();
        if tables.clients.values().any(|c| c.email == client.email) {
            return Err(StoreError::Duplicate(client.email.clone()));
        }
        tables.clients.insert(client.id, client.clone());
        Ok(())
    }

    fn client_by_id(&self, id: Uuid) -> Result<Option<Client>, StoreError> {
        Ok(self.tables.borrow().clients.get(&id).cloned())
    }

    fn client_by_email(&self, email: &str) -> Result<Option<Client>, StoreError> {
        Ok(self
            .tables
            .borrow()
            .clients
            .values()
            .find(|c| c.email == email)
            .cloned())
    }

    fn update_client(&self, client: &Client) -> Result<(), StoreError> {
        self.tables
            .borrow_mut()
            .clients
            .insert(client.id, client.clone());
        Ok(())
    }

    fn clients_due_for_deletion(&self, now: Timestamp) -> Result<Vec<Client>, StoreError> {
        let tables = self.tables.borrow();
        let mut due: Vec<Client> = tables
            .clients
            .values()
            .filter(|c| {
                c.status == ClientStatus::Inactive
                    && c.delete_after.is_some_and(|after| after <= now)
            })
            .cloned()
            .collect();
        due.sort_by_key(|c| c.delete_after);
        Ok(due)
    }

    fn create_form(&self, form: &Form) -> Result<(), StoreError> {
        let mut tables = self.tables.borrow_mut();
        if tables.forms.values().any(|f| f.token == form.token) {
            return Err(StoreError::Duplicate(form.token.clone()));
        }
        tables.forms.insert(form.id, form.clone());
        Ok(())
    }

    fn form_by_token(&self, token: &str) -> Result<Option<Form>, StoreError> {
        Ok(self
            .tables
            .borrow()
            .forms
            .values()
            .find(|f| f.token == token)
            .cloned())
    }

    fn forms_for_client(
        &self,
        client_id: Uuid,
        questionnaire: Option<Questionnaire>,
    ) -> Result<Vec<Form>, StoreError> {
        let tables = self.tables.borrow();
        let mut forms: Vec<Form> = tables
            .forms
            .values()
            .filter(|f| {
                f.client_id == client_id
                    && questionnaire.is_none_or(|q| f.questionnaire == q)
            })
            .cloned()
            .collect();
        forms.sort_by_key(|f| (f.issued_at, f.id));
        Ok(forms)
    }

    fn update_forms(&self, filter: &FormFilter, patch: &FormPatch) -> Result<usize, StoreError> {
        if patch.is_empty() {
            return Ok(0);
        }
        let mut tables = self.tables.borrow_mut();
        let mut count = 0;
        for form in tables.forms.values_mut() {
            if filter.matches(form) {
                patch.apply(form);
                count += 1;
            }
        }
        Ok(count)
    }

    fn delete_forms_for_client(&self, client_id: Uuid) -> Result<usize, StoreError> {
        let mut tables = self.tables.borrow_mut();
        let before = tables.forms.len();
        tables.forms.retain(|_, f| f.client_id != client_id);
        Ok(before - tables.forms.len())
    }

    fn delete_client(&self, id: Uuid) -> Result<(), StoreError> {
        if self.fail_deletes.borrow().contains(&id) {
            return Err(StoreError::Backend("injected delete failure".to_string()));
        }
        self.tables.borrow_mut().clients.remove(&id);
        Ok(())
    }

    fn in_transaction(
        &self,
        f: &mut dyn FnMut(&dyn Store) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let snapshot = self.tables.borrow().clone();
        match f(self) {
            Ok(()) => Ok(()),
            Err(err) => {
                *self.tables.borrow_mut() = snapshot;
                Err(err)
            }
        }
    }
}
