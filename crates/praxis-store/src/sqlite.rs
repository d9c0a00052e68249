use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;

use jiff::Timestamp;
use praxis_core::{Client, ClientStatus, Form, Questionnaire, ScoreValue};
use rusqlite::{Connection, OptionalExtension, ToSql, params, params_from_iter};
use tracing::info;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{FormFilter, FormPatch, Store};

const MIGRATIONS: [(i64, &str); 1] = [(
    1,
    "CREATE TABLE clients (
        id              TEXT PRIMARY KEY,
        email           TEXT NOT NULL UNIQUE,
        name            TEXT,
        date_of_birth   TEXT,
        status          TEXT NOT NULL,
        inactivated_at  INTEGER,
        delete_after    INTEGER,
        created_at      INTEGER NOT NULL,
        updated_at      INTEGER NOT NULL
     );
     CREATE TABLE forms (
        id             TEXT PRIMARY KEY,
        client_id      TEXT NOT NULL REFERENCES clients(id),
        questionnaire  TEXT NOT NULL,
        token          TEXT NOT NULL UNIQUE,
        issued_at      INTEGER NOT NULL,
        expires_at     INTEGER NOT NULL,
        active         INTEGER NOT NULL,
        submitted_at   INTEGER,
        revoked_at     INTEGER,
        scores         TEXT NOT NULL DEFAULT '{}'
     );
     CREATE INDEX idx_forms_client_type ON forms(client_id, questionnaire);",
)];

/// SQLite-backed [`Store`]. Single connection; timestamps persist as Unix
/// milliseconds, scores as a JSON object of legacy `"<value>-<label>"`
/// strings.
pub struct SqliteStore {
    conn: RefCell<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: RefCell::new(conn),
        })
    }
}

fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;
    let current: i64 = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i64>>(0)
        })?
        .unwrap_or(0);

    for (version, sql) in MIGRATIONS {
        if version > current {
            info!(version, "running store migration");
            conn.execute_batch(sql)
                .map_err(|e| StoreError::MigrationFailed {
                    version,
                    reason: e.to_string(),
                })?;
            conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
        }
    }
    Ok(())
}

fn ts_ms(ts: Timestamp) -> i64 {
    ts.as_millisecond()
}

fn ts_from_ms(column: &'static str, ms: i64) -> Result<Timestamp, StoreError> {
    Timestamp::from_millisecond(ms).map_err(|_| StoreError::InvalidColumn {
        column,
        value: ms.to_string(),
    })
}

fn uuid_from_text(column: &'static str, raw: &str) -> Result<Uuid, StoreError> {
    raw.parse().map_err(|_| StoreError::InvalidColumn {
        column,
        value: raw.to_string(),
    })
}

// Intermediate row shapes, converted outside the rusqlite closure so type
// errors surface as StoreError rather than panics.
struct ClientRow {
    id: String,
    email: String,
    name: Option<String>,
    date_of_birth: Option<String>,
    status: String,
    inactivated_at: Option<i64>,
    delete_after: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

const CLIENT_COLUMNS: &str = "id, email, name, date_of_birth, status, inactivated_at, \
                              delete_after, created_at, updated_at";

fn client_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClientRow> {
    Ok(ClientRow {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        date_of_birth: row.get(3)?,
        status: row.get(4)?,
        inactivated_at: row.get(5)?,
        delete_after: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn client_from_row(row: ClientRow) -> Result<Client, StoreError> {
    let status = match row.status.as_str() {
        "active" => ClientStatus::Active,
        "inactive" => ClientStatus::Inactive,
        other => {
            return Err(StoreError::InvalidColumn {
                column: "status",
                value: other.to_string(),
            });
        }
    };
    let date_of_birth = row
        .date_of_birth
        .map(|raw| {
            raw.parse::<jiff::civil::Date>()
                .map_err(|_| StoreError::InvalidColumn {
                    column: "date_of_birth",
                    value: raw,
                })
        })
        .transpose()?;
    Ok(Client {
        id: uuid_from_text("id", &row.id)?,
        email: row.email,
        name: row.name,
        date_of_birth,
        status,
        inactivated_at: row
            .inactivated_at
            .map(|ms| ts_from_ms("inactivated_at", ms))
            .transpose()?,
        delete_after: row
            .delete_after
            .map(|ms| ts_from_ms("delete_after", ms))
            .transpose()?,
        created_at: ts_from_ms("created_at", row.created_at)?,
        updated_at: ts_from_ms("updated_at", row.updated_at)?,
    })
}

struct FormRow {
    id: String,
    client_id: String,
    questionnaire: String,
    token: String,
    issued_at: i64,
    expires_at: i64,
    active: bool,
    submitted_at: Option<i64>,
    revoked_at: Option<i64>,
    scores: String,
}

const FORM_COLUMNS: &str = "id, client_id, questionnaire, token, issued_at, expires_at, \
                            active, submitted_at, revoked_at, scores";

fn form_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FormRow> {
    Ok(FormRow {
        id: row.get(0)?,
        client_id: row.get(1)?,
        questionnaire: row.get(2)?,
        token: row.get(3)?,
        issued_at: row.get(4)?,
        expires_at: row.get(5)?,
        active: row.get(6)?,
        submitted_at: row.get(7)?,
        revoked_at: row.get(8)?,
        scores: row.get(9)?,
    })
}

fn form_from_row(row: FormRow) -> Result<Form, StoreError> {
    let questionnaire =
        Questionnaire::parse(&row.questionnaire).map_err(|_| StoreError::InvalidColumn {
            column: "questionnaire",
            value: row.questionnaire.clone(),
        })?;
    let scores: BTreeMap<String, ScoreValue> = serde_json::from_str(&row.scores)?;
    Ok(Form {
        id: uuid_from_text("id", &row.id)?,
        client_id: uuid_from_text("client_id", &row.client_id)?,
        questionnaire,
        token: row.token,
        issued_at: ts_from_ms("issued_at", row.issued_at)?,
        expires_at: ts_from_ms("expires_at", row.expires_at)?,
        active: row.active,
        submitted_at: row
            .submitted_at
            .map(|ms| ts_from_ms("submitted_at", ms))
            .transpose()?,
        revoked_at: row
            .revoked_at
            .map(|ms| ts_from_ms("revoked_at", ms))
            .transpose()?,
        scores,
    })
}

fn map_constraint(err: rusqlite::Error, key: &str) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StoreError::Duplicate(key.to_string())
        }
        _ => StoreError::Sqlite(err),
    }
}

impl Store for SqliteStore {
    fn create_client(&self, client: &Client) -> Result<(), StoreError> {
        self.conn
            .borrow()
            .execute(
                "INSERT INTO clients (id, email, name, date_of_birth, status, inactivated_at, \
                 delete_after, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    client.id.to_string(),
                    client.email,
                    client.name,
                    client.date_of_birth.map(|d| d.to_string()),
                    client.status.as_str(),
                    client.inactivated_at.map(ts_ms),
                    client.delete_after.map(ts_ms),
                    ts_ms(client.created_at),
                    ts_ms(client.updated_at),
                ],
            )
            .map_err(|e| map_constraint(e, &client.email))?;
        Ok(())
    }

    fn client_by_id(&self, id: Uuid) -> Result<Option<Client>, StoreError> {
        let row = self
            .conn
            .borrow()
            .query_row(
                &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1"),
                params![id.to_string()],
                client_row,
            )
            .optional()?;
        row.map(client_from_row).transpose()
    }

    fn client_by_email(&self, email: &str) -> Result<Option<Client>, StoreError> {
        let row = self
            .conn
            .borrow()
            .query_row(
                &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE email = ?1"),
                params![email],
                client_row,
            )
            .optional()?;
        row.map(client_from_row).transpose()
    }

    fn update_client(&self, client: &Client) -> Result<(), StoreError> {
        self.conn.borrow().execute(
            "UPDATE clients SET email = ?2, name = ?3, date_of_birth = ?4, status = ?5, \
             inactivated_at = ?6, delete_after = ?7, updated_at = ?8 WHERE id = ?1",
            params![
                client.id.to_string(),
                client.email,
                client.name,
                client.date_of_birth.map(|d| d.to_string()),
                client.status.as_str(),
                client.inactivated_at.map(ts_ms),
                client.delete_after.map(ts_ms),
                ts_ms(client.updated_at),
            ],
        )?;
        Ok(())
    }

    fn clients_due_for_deletion(&self, now: Timestamp) -> Result<Vec<Client>, StoreError> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients \
             WHERE status = 'inactive' AND delete_after IS NOT NULL AND delete_after <= ?1 \
             ORDER BY delete_after"
        ))?;
        let rows = stmt.query_map(params![ts_ms(now)], client_row)?;
        let mut clients = Vec::new();
        for row in rows {
            clients.push(client_from_row(row?)?);
        }
        Ok(clients)
    }

    fn create_form(&self, form: &Form) -> Result<(), StoreError> {
        self.conn
            .borrow()
            .execute(
                "INSERT INTO forms (id, client_id, questionnaire, token, issued_at, expires_at, \
                 active, submitted_at, revoked_at, scores) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    form.id.to_string(),
                    form.client_id.to_string(),
                    form.questionnaire.as_str(),
                    form.token,
                    ts_ms(form.issued_at),
                    ts_ms(form.expires_at),
                    form.active,
                    form.submitted_at.map(ts_ms),
                    form.revoked_at.map(ts_ms),
                    serde_json::to_string(&form.scores)?,
                ],
            )
            .map_err(|e| map_constraint(e, &form.token))?;
        Ok(())
    }

    fn form_by_token(&self, token: &str) -> Result<Option<Form>, StoreError> {
        let row = self
            .conn
            .borrow()
            .query_row(
                &format!("SELECT {FORM_COLUMNS} FROM forms WHERE token = ?1"),
                params![token],
                form_row,
            )
            .optional()?;
        row.map(form_from_row).transpose()
    }

    fn forms_for_client(
        &self,
        client_id: Uuid,
        questionnaire: Option<Questionnaire>,
    ) -> Result<Vec<Form>, StoreError> {
        let conn = self.conn.borrow();
        let mut sql = format!("SELECT {FORM_COLUMNS} FROM forms WHERE client_id = ?1");
        if questionnaire.is_some() {
            sql.push_str(" AND questionnaire = ?2");
        }
        sql.push_str(" ORDER BY issued_at, id");

        let mut stmt = conn.prepare(&sql)?;
        let mut values: Vec<Box<dyn ToSql>> = vec![Box::new(client_id.to_string())];
        if let Some(q) = questionnaire {
            values.push(Box::new(q.as_str()));
        }
        let rows = stmt.query_map(params_from_iter(values.iter().map(|v| v.as_ref())), form_row)?;
        let mut forms = Vec::new();
        for row in rows {
            forms.push(form_from_row(row?)?);
        }
        Ok(forms)
    }

    fn update_forms(&self, filter: &FormFilter, patch: &FormPatch) -> Result<usize, StoreError> {
        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(active) = patch.active {
            sets.push("active = ?");
            values.push(Box::new(active));
        }
        if let Some(ts) = patch.submitted_at {
            sets.push("submitted_at = ?");
            values.push(Box::new(ts_ms(ts)));
        }
        if let Some(ts) = patch.revoked_at {
            sets.push("revoked_at = ?");
            values.push(Box::new(ts_ms(ts)));
        }
        if let Some(ts) = patch.expires_at {
            sets.push("expires_at = ?");
            values.push(Box::new(ts_ms(ts)));
        }
        if let Some(scores) = &patch.scores {
            sets.push("scores = ?");
            values.push(Box::new(serde_json::to_string(scores)?));
        }
        if sets.is_empty() {
            return Ok(0);
        }

        let mut wheres: Vec<String> = Vec::new();
        if let Some(ids) = &filter.ids {
            if ids.is_empty() {
                return Ok(0);
            }
            let placeholders = vec!["?"; ids.len()].join(", ");
            wheres.push(format!("id IN ({placeholders})"));
            for id in ids {
                values.push(Box::new(id.to_string()));
            }
        }
        if let Some(client_id) = filter.client_id {
            wheres.push("client_id = ?".to_string());
            values.push(Box::new(client_id.to_string()));
        }
        if let Some(q) = filter.questionnaire {
            wheres.push("questionnaire = ?".to_string());
            values.push(Box::new(q.as_str()));
        }
        if let Some(active) = filter.active {
            wheres.push("active = ?".to_string());
            values.push(Box::new(active));
        }

        let mut sql = format!("UPDATE forms SET {}", sets.join(", "));
        if !wheres.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&wheres.join(" AND "));
        }

        let count = self
            .conn
            .borrow()
            .execute(&sql, params_from_iter(values.iter().map(|v| v.as_ref())))?;
        Ok(count)
    }

    fn delete_forms_for_client(&self, client_id: Uuid) -> Result<usize, StoreError> {
        let count = self.conn.borrow().execute(
            "DELETE FROM forms WHERE client_id = ?1",
            params![client_id.to_string()],
        )?;
        Ok(count)
    }

    fn delete_client(&self, id: Uuid) -> Result<(), StoreError> {
        self.conn
            .borrow()
            .execute("DELETE FROM clients WHERE id = ?1", params![id.to_string()])?;
        Ok(())
    }

    fn in_transaction(
        &self,
        f: &mut dyn FnMut(&dyn Store) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        self.conn.borrow().execute_batch("BEGIN IMMEDIATE")?;
        match f(self) {
            Ok(()) => {
                self.conn.borrow().execute_batch("COMMIT")?;
                Ok(())
            }
            Err(err) => {
                // Preserve the original failure even if the rollback fails.
                if let Err(rollback) = self.conn.borrow().execute_batch("ROLLBACK") {
                    tracing::error!(error = %rollback, "transaction rollback failed");
                }
                Err(err)
            }
        }
    }
}
