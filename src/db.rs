// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::date::Date;
use crate::types::item::ItemDetails;
use crate::types::item::ReviewableItem;
use crate::types::item::ScheduleState;
use crate::types::item_id::ItemId;
use crate::types::quality::Quality;
use crate::types::timestamp::Timestamp;

/// The durable item collection, stored in SQLite.
pub struct Database {
    conn: Connection,
}

pub type SessionId = i64;

/// A recorded session and its answers, oldest answer first.
pub struct SessionRecord {
    pub session_id: SessionId,
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
    pub reviews: Vec<ReviewRecord>,
}

pub struct ReviewRecord {
    pub item_id: ItemId,
    pub reviewed_at: Timestamp,
    pub quality: Quality,
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
    pub due_date: Date,
}

const ITEM_COLUMNS: &str = "item_id, name, description, categories, subcategories, ease_factor, interval_days, repetitions, next_review_date, last_reviewed_date, date_added";

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating schema in {database_path}.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }

    /// Insert a new item. If an item with the same id exists, returns an
    /// error.
    pub fn insert_item(&mut self, item: &ReviewableItem) -> Fallible<()> {
        if self.contains_item(item.id())? {
            return fail(format!("an item with id {} already exists.", item.id()));
        }
        log::debug!("Adding item {} ({}).", item.id(), item.name());
        let tx = self.conn.transaction()?;
        insert_item(&tx, item)?;
        tx.commit()?;
        Ok(())
    }

    /// Insert several new items in one transaction. Either all of them are
    /// written or none are.
    pub fn insert_items(&mut self, items: &[ReviewableItem]) -> Fallible<()> {
        let tx = self.conn.transaction()?;
        for item in items {
            log::debug!("Adding item {} ({}).", item.id(), item.name());
            insert_item(&tx, item)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Overwrite an item's descriptive fields. The schedule columns are not
    /// touched.
    pub fn update_details(&mut self, item: &ReviewableItem) -> Fallible<()> {
        let sql = "update items set name = ?, description = ?, categories = ?, subcategories = ? where item_id = ?;";
        let categories = serde_json::to_string(item.categories())?;
        let subcategories = serde_json::to_string(item.subcategories())?;
        let tx = self.conn.transaction()?;
        let updated = tx.execute(
            sql,
            (
                item.name(),
                item.description(),
                categories,
                subcategories,
                item.id(),
            ),
        )?;
        if updated == 0 {
            return fail(format!("no item with id {} in the database.", item.id()));
        }
        tx.commit()?;
        Ok(())
    }

    pub fn contains_item(&self, id: &ItemId) -> Fallible<bool> {
        let sql = "select count(*) from items where item_id = ?;";
        let count: i64 = self.conn.query_row(sql, [id], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Every item, in the order they were added.
    pub fn all_items(&self) -> Fallible<Vec<ReviewableItem>> {
        let sql = format!("select {ITEM_COLUMNS} from items order by rowid;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(read_item(row)?);
        }
        Ok(items)
    }

    pub fn get_item(&self, id: &ItemId) -> Fallible<Option<ReviewableItem>> {
        let sql = format!("select {ITEM_COLUMNS} from items where item_id = ?;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(read_item(row)?)),
            None => Ok(None),
        }
    }

    /// Delete an item and its review history. Returns whether it existed.
    pub fn remove_item(&mut self, id: &ItemId) -> Fallible<bool> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute("delete from items where item_id = ?;", [id])?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    /// Record the start of a review session.
    pub fn begin_session(&mut self, started_at: Timestamp) -> Fallible<SessionId> {
        let sql = "insert into sessions (started_at) values (?) returning session_id;";
        let session_id: SessionId = self.conn.query_row(sql, [started_at], |row| row.get(0))?;
        log::debug!("Began session {session_id}.");
        Ok(session_id)
    }

    /// Commit one answer: the item's new schedule and the review row, in a
    /// single transaction.
    pub fn record_review(
        &mut self,
        session_id: SessionId,
        item: &ReviewableItem,
        quality: Quality,
        reviewed_at: Timestamp,
    ) -> Fallible<()> {
        let tx = self.conn.transaction()?;
        let updated = update_schedule(&tx, item)?;
        if updated == 0 {
            return fail(format!("no item with id {} in the database.", item.id()));
        }
        let reviewed_on = item.last_reviewed_date().unwrap_or(reviewed_at.local_date());
        let sql = "insert into reviews (session_id, item_id, reviewed_at, reviewed_on, quality, ease_factor, interval_days, repetitions, due_date) values (?, ?, ?, ?, ?, ?, ?, ?, ?);";
        tx.execute(
            sql,
            (
                session_id,
                item.id(),
                reviewed_at,
                reviewed_on,
                quality,
                item.ease_factor(),
                item.interval(),
                item.repetitions(),
                item.next_review_date(),
            ),
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Record the end of a review session.
    pub fn finish_session(&mut self, session_id: SessionId, ended_at: Timestamp) -> Fallible<()> {
        let sql = "update sessions set ended_at = ? where session_id = ?;";
        self.conn.execute(sql, (ended_at, session_id))?;
        log::debug!("Finished session {session_id}.");
        Ok(())
    }

    pub fn session_count(&self) -> Fallible<usize> {
        let sql = "select count(*) from sessions;";
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// The number of answers recorded on the given calendar date.
    #[cfg(test)]
    pub fn review_count_on(&self, date: Date) -> Fallible<usize> {
        let sql = "select count(*) from reviews where reviewed_on = ?;";
        let count: i64 = self.conn.query_row(sql, [date], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Every recorded session, oldest first.
    pub fn sessions(&self) -> Fallible<Vec<SessionRecord>> {
        let mut sessions = Vec::new();
        {
            let sql = "select session_id, started_at, ended_at from sessions order by session_id;";
            let mut stmt = self.conn.prepare(sql)?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                sessions.push(SessionRecord {
                    session_id: row.get(0)?,
                    started_at: row.get(1)?,
                    ended_at: row.get(2)?,
                    reviews: Vec::new(),
                });
            }
        }
        let sql = "select item_id, reviewed_at, quality, ease_factor, interval_days, repetitions, due_date from reviews where session_id = ? order by review_id;";
        let mut stmt = self.conn.prepare(sql)?;
        for session in sessions.iter_mut() {
            let mut rows = stmt.query([session.session_id])?;
            while let Some(row) = rows.next()? {
                session.reviews.push(ReviewRecord {
                    item_id: row.get(0)?,
                    reviewed_at: row.get(1)?,
                    quality: row.get(2)?,
                    ease_factor: row.get(3)?,
                    interval: row.get(4)?,
                    repetitions: row.get(5)?,
                    due_date: row.get(6)?,
                });
            }
        }
        Ok(sessions)
    }

    /// The most recent session's end time, if it has ended.
    pub fn last_session_end(&self) -> Fallible<Option<Timestamp>> {
        let sql = "select ended_at from sessions order by session_id desc limit 1;";
        let ended_at: Option<Option<Timestamp>> = self
            .conn
            .query_row(sql, [], |row| row.get(0))
            .optional()?;
        Ok(ended_at.flatten())
    }
}

fn insert_item(tx: &Transaction, item: &ReviewableItem) -> Fallible<()> {
    let sql = format!("insert into items ({ITEM_COLUMNS}) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?);");
    let categories = serde_json::to_string(item.categories())?;
    let subcategories = serde_json::to_string(item.subcategories())?;
    tx.execute(
        &sql,
        (
            item.id(),
            item.name(),
            item.description(),
            categories,
            subcategories,
            item.ease_factor(),
            item.interval(),
            item.repetitions(),
            item.next_review_date(),
            item.last_reviewed_date(),
            item.date_added(),
        ),
    )?;
    Ok(())
}

fn update_schedule(tx: &Transaction, item: &ReviewableItem) -> Fallible<usize> {
    let sql = "update items set ease_factor = ?, interval_days = ?, repetitions = ?, next_review_date = ?, last_reviewed_date = ? where item_id = ?;";
    let updated = tx.execute(
        sql,
        (
            item.ease_factor(),
            item.interval(),
            item.repetitions(),
            item.next_review_date(),
            item.last_reviewed_date(),
            item.id(),
        ),
    )?;
    Ok(updated)
}

fn read_item(row: &Row) -> Fallible<ReviewableItem> {
    let id: ItemId = row.get(0)?;
    let categories: String = row.get(3)?;
    let subcategories: String = row.get(4)?;
    let details = ItemDetails {
        name: row.get(1)?,
        description: row.get(2)?,
        categories: serde_json::from_str(&categories)?,
        subcategories: serde_json::from_str(&subcategories)?,
    };
    let schedule = ScheduleState {
        ease_factor: row.get(5)?,
        interval: row.get(6)?,
        repetitions: row.get(7)?,
        next_review_date: row.get(8)?,
        last_reviewed_date: row.get(9)?,
    };
    let date_added: Date = row.get(10)?;
    ReviewableItem::restore(id, details, schedule, date_added)
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["items"], |row| row.get(0))?;
    Ok(count > 0)
}
