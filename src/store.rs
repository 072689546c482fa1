//! Persistence for RSVP records.
//!
//! Records are written once and never edited. Guest names are parsed on the
//! way out, so the stored `guests` text stays the source of truth.

use chrono::{NaiveDateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use rocket_db_pools::diesel::prelude::*;
use rocket_db_pools::diesel::dsl::{exists, select};
use rocket_db_pools::diesel::{MysqlPool, RunQueryDsl};
use rocket_db_pools::{Connection, Database};
use thiserror::Error;

use crate::models::{Rsvp, RsvpInsert, RsvpWithGuests};
use crate::schema::rsvps;

const ID_LEN: usize = 12;

#[derive(Database)]
#[database("rsvp")]
pub struct Db(MysqlPool);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("database unavailable")]
    Unavailable,
}

fn random_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect::<String>()
        .to_ascii_uppercase()
}

fn stamp_record(id: String, insert: RsvpInsert, stamp: NaiveDateTime) -> Rsvp {
    Rsvp {
        id,
        attending: insert.attending,
        guests: insert.guests,
        allergies: insert.allergies,
        created_at: stamp,
        updated_at: stamp,
    }
}

/// Stores one response. Single attempt; the caller decides whether to retry.
pub async fn submit(db: &mut Connection<Db>, insert: RsvpInsert) -> Result<Rsvp, StoreError> {
    let id = loop {
        let candidate = random_id();
        let taken: bool = select(exists(rsvps::table.filter(rsvps::id.eq(&candidate))))
            .get_result(db)
            .await?;
        if !taken {
            break candidate;
        }
    };

    let record = stamp_record(id, insert, Utc::now().naive_utc());

    diesel::insert_into(rsvps::table)
        .values(&record)
        .execute(db)
        .await?;

    log::info!(
        "stored rsvp {} (attending: {})",
        record.id,
        record.attending
    );
    Ok(record)
}

/// Every stored response, newest first.
pub async fn list(db: &mut Connection<Db>) -> Result<Vec<Rsvp>, StoreError> {
    let records = rsvps::table
        .select(Rsvp::as_select())
        .order(rsvps::created_at.desc())
        .load(db)
        .await?;
    Ok(records)
}

pub async fn list_with_guests(db: &mut Connection<Db>) -> Result<Vec<RsvpWithGuests>, StoreError> {
    let records = list(db).await?;
    Ok(records.into_iter().map(RsvpWithGuests::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_upper_case_alphanumeric() {
        for _ in 0..50 {
            let id = random_id();
            assert_eq!(id.len(), ID_LEN);
            assert!(id
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn new_record_carries_insert_and_one_timestamp() {
        let stamp = chrono::NaiveDate::from_ymd_opt(2026, 3, 1)
            .and_then(|d| d.and_hms_micro_opt(12, 0, 0, 250))
            .unwrap();
        let insert = RsvpInsert::from_form(true, Some("john & jane"), Some("shellfish"));
        let record = stamp_record("ABCDEF123456".to_string(), insert, stamp);

        assert_eq!(record.id, "ABCDEF123456");
        assert!(record.attending);
        assert_eq!(record.guests.as_deref(), Some("john & jane"));
        assert_eq!(record.allergies.as_deref(), Some("shellfish"));
        assert_eq!(record.created_at, stamp);
        assert_eq!(record.updated_at, record.created_at);
    }

    #[test]
    fn store_error_message_names_the_cause() {
        let err = StoreError::from(diesel::result::Error::NotFound);
        assert_eq!(err.to_string(), "database error: Record not found");
        assert_eq!(StoreError::Unavailable.to_string(), "database unavailable");
    }
}
