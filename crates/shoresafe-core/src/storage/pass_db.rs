//! SQLite-backed crew pass ledger.
//!
//! Tracks issued passes and which guest devices joined them. All operations
//! take `now` so expiry is decided by the caller's clock.

use base64::prelude::*;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use super::database::Database;
use crate::error::{PassError, Result, StorageError};
use crate::pass::{Entitlement, JoinOutcome, PassRecord, PassType};

const SHARE_CODE_ATTEMPTS: usize = 5;

struct PassRow {
    id: Uuid,
    pass_type: PassType,
    expires_at: DateTime<Utc>,
    host_device_id: String,
    share_code: String,
}

fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_ts(s: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::QueryFailed(format!("bad timestamp '{s}': {e}")))
}

fn random_share_code() -> Result<String, PassError> {
    let mut bytes = [0u8; 9];
    getrandom::getrandom(&mut bytes).map_err(|e| PassError::Entropy(e.to_string()))?;
    Ok(BASE64_URL_SAFE_NO_PAD.encode(bytes))
}

pub struct PassLedger<'a> {
    db: &'a Database,
}

impl<'a> PassLedger<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Issue a pass for `host_device_id`, valid for the pass type's days.
    pub fn create_pass(
        &self,
        pass_type: PassType,
        host_device_id: &str,
        purchase_info: Option<&serde_json::Value>,
        now: DateTime<Utc>,
    ) -> Result<PassRecord> {
        // Stored at second precision, so drop sub-second noise up front.
        let now = parse_ts(&format_ts(now))?;
        let expires_at = now + Duration::days(pass_type.days());
        let share_code = self.unique_share_code()?;
        let pass_id = Uuid::new_v4();
        let purchase_info = purchase_info.map(serde_json::to_string).transpose()?;

        self.db.conn().execute(
            "INSERT INTO passes (id, type, created_at, expires_at, host_device_id, share_code, purchase_info)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                pass_id.to_string(),
                pass_type.as_str(),
                format_ts(now),
                format_ts(expires_at),
                host_device_id,
                share_code,
                purchase_info,
            ],
        )?;
        tracing::info!(pass_id = %pass_id, pass_type = pass_type.as_str(), "issued pass");

        Ok(PassRecord {
            pass_id,
            share_code,
            pass_type,
            expires_at,
            guest_limit: pass_type.guest_limit(),
        })
    }

    /// Join a pass by share code. Rejoining as the host or as an existing
    /// guest succeeds without using a guest slot.
    pub fn join_pass(
        &self,
        share_code: &str,
        guest_device_id: &str,
        now: DateTime<Utc>,
    ) -> Result<JoinOutcome> {
        let pass = self
            .pass_by_share_code(share_code)?
            .ok_or(PassError::ShareCodeNotFound)?;
        let guest_limit = pass.pass_type.guest_limit();

        if now >= pass.expires_at {
            return Err(PassError::Expired.into());
        }
        if guest_limit == 0 {
            return Err(PassError::GuestsNotAllowed.into());
        }

        let already_in =
            guest_device_id == pass.host_device_id || self.guest_exists(pass.id, guest_device_id)?;
        if !already_in {
            if self.count_guests(pass.id)? >= guest_limit {
                return Err(PassError::GuestLimitReached.into());
            }
            self.db.conn().execute(
                "INSERT INTO guest_joins (id, pass_id, guest_device_id, joined_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    Uuid::new_v4().to_string(),
                    pass.id.to_string(),
                    guest_device_id,
                    format_ts(now),
                ],
            )?;
            tracing::info!(pass_id = %pass.id, "guest joined pass");
        }

        Ok(JoinOutcome {
            pass_id: pass.id,
            share_code: pass.share_code,
            pass_type: pass.pass_type,
            expires_at: pass.expires_at,
            guests_joined: self.count_guests(pass.id)?,
            guest_limit,
        })
    }

    /// Look up what `device_id` is entitled to. `pass_id` takes precedence
    /// over `share_code`; at least one is required.
    pub fn entitlement(
        &self,
        device_id: &str,
        share_code: Option<&str>,
        pass_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<Entitlement> {
        let pass = match (pass_id, share_code) {
            (Some(id), _) => self.pass_by_id(id)?,
            (None, Some(code)) => self.pass_by_share_code(code)?,
            (None, None) => return Err(PassError::MissingIdentifier.into()),
        }
        .ok_or(PassError::PassNotFound)?;

        let is_host = device_id == pass.host_device_id;
        if !is_host && !self.guest_exists(pass.id, device_id)? {
            return Err(PassError::DeviceNotJoined.into());
        }

        Ok(Entitlement {
            is_active: now < pass.expires_at,
            pass_type: pass.pass_type,
            expires_at: pass.expires_at,
            guests_joined: self.count_guests(pass.id)?,
            guest_limit: pass.pass_type.guest_limit(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn unique_share_code(&self) -> Result<String> {
        for _ in 0..SHARE_CODE_ATTEMPTS {
            let code = random_share_code()?;
            if self.pass_by_share_code(&code)?.is_none() {
                return Ok(code);
            }
        }
        Err(PassError::ShareCodeExhausted.into())
    }

    fn pass_by_share_code(&self, share_code: &str) -> Result<Option<PassRow>> {
        self.query_pass("share_code", share_code)
    }

    fn pass_by_id(&self, id: Uuid) -> Result<Option<PassRow>> {
        self.query_pass("id", &id.to_string())
    }

    fn query_pass(&self, column: &str, value: &str) -> Result<Option<PassRow>> {
        let sql = format!(
            "SELECT id, type, expires_at, host_device_id, share_code FROM passes WHERE {column} = ?1"
        );
        let raw = self
            .db
            .conn()
            .query_row(&sql, params![value], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .optional()?;

        let Some((id, pass_type, expires_at, host_device_id, share_code)) = raw else {
            return Ok(None);
        };
        let id = Uuid::parse_str(&id)
            .map_err(|e| StorageError::QueryFailed(format!("bad pass id '{id}': {e}")))?;
        Ok(Some(PassRow {
            id,
            pass_type: pass_type.parse()?,
            expires_at: parse_ts(&expires_at)?,
            host_device_id,
            share_code,
        }))
    }

    fn count_guests(&self, pass_id: Uuid) -> Result<u32> {
        let count = self.db.conn().query_row(
            "SELECT COUNT(*) FROM guest_joins WHERE pass_id = ?1",
            params![pass_id.to_string()],
            |row| row.get::<_, u32>(0),
        )?;
        Ok(count)
    }

    fn guest_exists(&self, pass_id: Uuid, guest_device_id: &str) -> Result<bool> {
        let found = self
            .db
            .conn()
            .query_row(
                "SELECT 1 FROM guest_joins WHERE pass_id = ?1 AND guest_device_id = ?2",
                params![pass_id.to_string(), guest_device_id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}
