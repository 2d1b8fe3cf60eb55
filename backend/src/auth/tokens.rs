//! Opaque bearer tokens kept in the `sessions` table until they expire.

use crate::db::rows;
use chrono::{DateTime, Duration, Utc};
use common::model::user::User;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

/// Stores a fresh token for `provider_id`, pruning expired ones on the way.
pub fn issue(
    conn: &Connection,
    provider_id: i64,
    ttl: Duration,
    now: DateTime<Utc>,
) -> rusqlite::Result<String> {
    conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", params![now])?;

    let token = Uuid::new_v4().simple().to_string();
    conn.execute(
        "INSERT INTO sessions (token, provider_id, expires_at) VALUES (?1, ?2, ?3)",
        params![token, provider_id, now + ttl],
    )?;
    Ok(token)
}

/// The active provider owning `token`, if the token exists and has not expired.
pub fn resolve(conn: &Connection, token: &str, now: DateTime<Utc>) -> rusqlite::Result<Option<User>> {
    let found = conn
        .query_row(
            "SELECT p.id, p.name, p.email, p.license_number, p.specialty, p.practice_name, \
                    p.is_active, s.expires_at \
             FROM sessions s JOIN providers p ON p.id = s.provider_id \
             WHERE s.token = ?1 AND p.is_active = 1",
            params![token],
            |row| Ok((rows::user(row)?, row.get::<_, DateTime<Utc>>(7)?)),
        )
        .optional()?;

    Ok(found.and_then(|(user, expires_at)| (expires_at > now).then_some(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use tempfile::tempdir;

    #[test]
    fn tokens_expire() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.sqlite");
        db::init(&path).unwrap();
        let conn = db::connect(&path).unwrap();
        conn.execute(
            "INSERT INTO providers (name, email, password_hash, created_at) VALUES ('A', 'a@x.io', 'h', ?1)",
            params![Utc::now()],
        )
        .unwrap();

        let now = Utc::now();
        let token = issue(&conn, 1, Duration::minutes(30), now).unwrap();
        assert_eq!(resolve(&conn, &token, now).unwrap().unwrap().email, "a@x.io");
        assert!(resolve(&conn, &token, now + Duration::minutes(31)).unwrap().is_none());
        assert!(resolve(&conn, "unknown", now).unwrap().is_none());
    }
}
