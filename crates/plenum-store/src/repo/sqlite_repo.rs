//! SQLite repository implementation
//!
//! Persists profiles, conferences, and accounts from the Datastore to SQLite

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use plenum_core::errors::ApiFault;
use plenum_core::model::{Conference, ConferenceRecord, Profile, ProfileRecord, UserAccount};
use plenum_core_types::{ConferenceKey, UserId};
use rusqlite::{Connection, OptionalExtension, Transaction};

/// SQLite repository for profiles, conferences, and accounts
pub struct SqliteRepo;

impl SqliteRepo {
    /// Persist a profile to the database
    ///
    /// Takes a profile from the Datastore and upserts it into the profiles
    /// table. The attendance key list is stored as JSON.
    pub fn persist_profile(conn: &Connection, profile: &Profile) -> Result<()> {
        let record = profile.to_record();
        conn.execute(
            "INSERT INTO profiles (user_id, display_name, main_email, tee_shirt_size, conference_keys_json, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user_id) DO UPDATE SET
                display_name = excluded.display_name,
                main_email = excluded.main_email,
                tee_shirt_size = excluded.tee_shirt_size,
                conference_keys_json = excluded.conference_keys_json,
                updated_at = excluded.updated_at",
            rusqlite::params![
                record.user_id,
                record.display_name,
                record.main_email,
                record.tee_shirt_size,
                serde_json::to_string(&record.conference_keys_to_attend)
                    .unwrap_or_else(|_| "[]".to_string()),
                chrono::Utc::now().timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Persist a profile within a transaction
    pub fn persist_profile_tx(tx: &Transaction, profile: &Profile) -> Result<()> {
        let record = profile.to_record();
        tx.execute(
            "INSERT INTO profiles (user_id, display_name, main_email, tee_shirt_size, conference_keys_json, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user_id) DO UPDATE SET
                display_name = excluded.display_name,
                main_email = excluded.main_email,
                tee_shirt_size = excluded.tee_shirt_size,
                conference_keys_json = excluded.conference_keys_json,
                updated_at = excluded.updated_at",
            rusqlite::params![
                record.user_id,
                record.display_name,
                record.main_email,
                record.tee_shirt_size,
                serde_json::to_string(&record.conference_keys_to_attend)
                    .unwrap_or_else(|_| "[]".to_string()),
                chrono::Utc::now().timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Persist a conference to the database
    ///
    /// Dates are stored as unix timestamps; topics as JSON.
    pub fn persist_conference(conn: &Connection, conference: &Conference) -> Result<()> {
        let record = conference.to_record();
        conn.execute(
            "INSERT INTO conferences (organizer_user_id, conference_id, name, description, topics_json, city, start_date, end_date, month, max_attendees, seats_available, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
             ON CONFLICT(organizer_user_id, conference_id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                topics_json = excluded.topics_json,
                city = excluded.city,
                start_date = excluded.start_date,
                end_date = excluded.end_date,
                month = excluded.month,
                max_attendees = excluded.max_attendees,
                seats_available = excluded.seats_available,
                updated_at = excluded.updated_at",
            rusqlite::params![
                record.organizer_user_id,
                record.id,
                record.name,
                record.description,
                serde_json::to_string(&record.topics).unwrap_or_else(|_| "[]".to_string()),
                record.city,
                record.start_date.map(|d| d.timestamp()),
                record.end_date.map(|d| d.timestamp()),
                record.month,
                record.max_attendees,
                record.seats_available,
                chrono::Utc::now().timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Persist a conference within a transaction
    pub fn persist_conference_tx(tx: &Transaction, conference: &Conference) -> Result<()> {
        let record = conference.to_record();
        tx.execute(
            "INSERT INTO conferences (organizer_user_id, conference_id, name, description, topics_json, city, start_date, end_date, month, max_attendees, seats_available, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
             ON CONFLICT(organizer_user_id, conference_id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                topics_json = excluded.topics_json,
                city = excluded.city,
                start_date = excluded.start_date,
                end_date = excluded.end_date,
                month = excluded.month,
                max_attendees = excluded.max_attendees,
                seats_available = excluded.seats_available,
                updated_at = excluded.updated_at",
            rusqlite::params![
                record.organizer_user_id,
                record.id,
                record.name,
                record.description,
                serde_json::to_string(&record.topics).unwrap_or_else(|_| "[]".to_string()),
                record.city,
                record.start_date.map(|d| d.timestamp()),
                record.end_date.map(|d| d.timestamp()),
                record.month,
                record.max_attendees,
                record.seats_available,
                chrono::Utc::now().timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Persist an account to the database
    ///
    /// The email-to-id mapping is append-only: a conflicting insert leaves
    /// the existing mapping untouched so an email never changes ids.
    pub fn persist_account(conn: &Connection, account: &UserAccount) -> Result<()> {
        conn.execute(
            "INSERT INTO accounts (email, user_id, created_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(email) DO NOTHING",
            rusqlite::params![
                account.email,
                account.user_id.as_str(),
                account.created_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Persist an account within a transaction
    pub fn persist_account_tx(tx: &Transaction, account: &UserAccount) -> Result<()> {
        tx.execute(
            "INSERT INTO accounts (email, user_id, created_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(email) DO NOTHING",
            rusqlite::params![
                account.email,
                account.user_id.as_str(),
                account.created_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Get a profile from the database by user id
    pub fn get_profile(conn: &Connection, user_id: &UserId) -> Result<Option<Profile>> {
        let record = conn
            .query_row(
                "SELECT user_id, display_name, main_email, tee_shirt_size, conference_keys_json
                 FROM profiles WHERE user_id = ?1",
                [user_id.as_str()],
                Self::profile_record_from_row,
            )
            .optional()
            .map_err(from_rusqlite)?;

        match record {
            Some(record) => Ok(Some(Profile::from_record(record).map_err(ApiFault::from)?)),
            None => Ok(None),
        }
    }

    /// Get a conference from the database by key
    pub fn get_conference(conn: &Connection, key: &ConferenceKey) -> Result<Option<Conference>> {
        let record = conn
            .query_row(
                "SELECT organizer_user_id, conference_id, name, description, topics_json, city, start_date, end_date, month, max_attendees, seats_available
                 FROM conferences WHERE organizer_user_id = ?1 AND conference_id = ?2",
                rusqlite::params![key.owner().as_str(), key.id().value()],
                Self::conference_record_from_row,
            )
            .optional()
            .map_err(from_rusqlite)?;

        match record {
            Some(record) => Ok(Some(
                Conference::from_record(record).map_err(ApiFault::from)?,
            )),
            None => Ok(None),
        }
    }

    /// Get an account from the database by email
    pub fn get_account(conn: &Connection, email: &str) -> Result<Option<UserAccount>> {
        conn.query_row(
            "SELECT email, user_id, created_at FROM accounts WHERE email = ?1",
            [email],
            |row| {
                let email: String = row.get(0)?;
                let user_id: String = row.get(1)?;
                let created_at: i64 = row.get(2)?;
                Ok(UserAccount {
                    email,
                    user_id: UserId::new(user_id),
                    created_at: chrono::DateTime::from_timestamp(created_at, 0)
                        .unwrap_or_else(chrono::Utc::now),
                })
            },
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// List all profiles in deterministic order (sorted by user id)
    pub fn list_profiles(conn: &Connection) -> Result<Vec<Profile>> {
        let mut stmt = conn
            .prepare(
                "SELECT user_id, display_name, main_email, tee_shirt_size, conference_keys_json
                 FROM profiles ORDER BY user_id",
            )
            .map_err(from_rusqlite)?;

        let records: Vec<ProfileRecord> = stmt
            .query_map([], Self::profile_record_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        records
            .into_iter()
            .map(|record| Profile::from_record(record).map_err(ApiFault::from))
            .collect()
    }

    /// List all conferences in deterministic order (sorted by organizer, id)
    pub fn list_conferences(conn: &Connection) -> Result<Vec<Conference>> {
        let mut stmt = conn
            .prepare(
                "SELECT organizer_user_id, conference_id, name, description, topics_json, city, start_date, end_date, month, max_attendees, seats_available
                 FROM conferences ORDER BY organizer_user_id, conference_id",
            )
            .map_err(from_rusqlite)?;

        let records: Vec<ConferenceRecord> = stmt
            .query_map([], Self::conference_record_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        records
            .into_iter()
            .map(|record| Conference::from_record(record).map_err(ApiFault::from))
            .collect()
    }

    /// List all accounts in deterministic order (sorted by email)
    pub fn list_accounts(conn: &Connection) -> Result<Vec<UserAccount>> {
        let mut stmt = conn
            .prepare("SELECT email, user_id, created_at FROM accounts ORDER BY email")
            .map_err(from_rusqlite)?;

        let accounts: Vec<UserAccount> = stmt
            .query_map([], |row| {
                let email: String = row.get(0)?;
                let user_id: String = row.get(1)?;
                let created_at: i64 = row.get(2)?;
                Ok(UserAccount {
                    email,
                    user_id: UserId::new(user_id),
                    created_at: chrono::DateTime::from_timestamp(created_at, 0)
                        .unwrap_or_else(chrono::Utc::now),
                })
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(accounts)
    }

    /// Read the allocator high-water mark (the next conference id)
    pub fn allocator_high_water(conn: &Connection) -> Result<i64> {
        conn.query_row(
            "SELECT next_conference_id FROM allocator WHERE id = 1",
            [],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)
    }

    /// Overwrite the allocator high-water mark
    pub fn set_allocator_high_water(conn: &Connection, next: i64) -> Result<()> {
        conn.execute(
            "UPDATE allocator SET next_conference_id = ?1 WHERE id = 1",
            [next],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Overwrite the allocator high-water mark within a transaction
    pub fn set_allocator_high_water_tx(tx: &Transaction, next: i64) -> Result<()> {
        tx.execute(
            "UPDATE allocator SET next_conference_id = ?1 WHERE id = 1",
            [next],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Raise the allocator high-water mark to at least `floor`, never
    /// lowering it. Used by seed import so live allocation cannot collide
    /// with seeded ids.
    pub fn raise_allocator_high_water_tx(tx: &Transaction, floor: i64) -> Result<()> {
        tx.execute(
            "UPDATE allocator SET next_conference_id = MAX(next_conference_id, ?1) WHERE id = 1",
            [floor],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    fn profile_record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProfileRecord> {
        let user_id: String = row.get(0)?;
        let display_name: String = row.get(1)?;
        let main_email: String = row.get(2)?;
        let tee_shirt_size: String = row.get(3)?;
        let keys_json: String = row.get(4)?;

        Ok(ProfileRecord {
            user_id,
            display_name,
            main_email,
            tee_shirt_size,
            conference_keys_to_attend: serde_json::from_str(&keys_json).unwrap_or_default(),
        })
    }

    fn conference_record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ConferenceRecord> {
        let organizer_user_id: String = row.get(0)?;
        let id: i64 = row.get(1)?;
        let name: String = row.get(2)?;
        let description: Option<String> = row.get(3)?;
        let topics_json: String = row.get(4)?;
        let city: String = row.get(5)?;
        let start_date: Option<i64> = row.get(6)?;
        let end_date: Option<i64> = row.get(7)?;
        let month: u32 = row.get(8)?;
        let max_attendees: u32 = row.get(9)?;
        let seats_available: u32 = row.get(10)?;

        Ok(ConferenceRecord {
            id,
            organizer_user_id,
            name,
            description,
            topics: serde_json::from_str(&topics_json).unwrap_or_default(),
            city,
            start_date: start_date.and_then(|s| chrono::DateTime::from_timestamp(s, 0)),
            end_date: end_date.and_then(|s| chrono::DateTime::from_timestamp(s, 0)),
            month,
            max_attendees,
            seats_available,
        })
    }
}
