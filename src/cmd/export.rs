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

use serde::Serialize;

use crate::collection::Collection;
use crate::db::ReviewRecord;
use crate::db::SessionRecord;
use crate::error::Fallible;
use crate::types::date::Date;
use crate::types::item::ReviewableItem;
use crate::types::item_id::ItemId;
use crate::types::quality::Quality;
use crate::types::timestamp::Timestamp;

pub fn export_collection(coll: &Collection) -> Fallible<()> {
    let export: Export = get_export(coll)?;
    let json: String = serde_json::to_string_pretty(&export)?;
    println!("{json}");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Export {
    items: Vec<ItemExport>,
    sessions: Vec<SessionExport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemExport {
    id: ItemId,
    name: String,
    description: String,
    categories: Vec<String>,
    sub_categories: Vec<String>,
    ease_factor: f64,
    interval: u32,
    repetitions: u32,
    next_review_date: Date,
    last_reviewed_date: Option<Date>,
    date_added: Date,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionExport {
    started_at: Timestamp,
    ended_at: Option<Timestamp>,
    reviews: Vec<ReviewExport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewExport {
    id: ItemId,
    reviewed_at: Timestamp,
    quality: Quality,
    ease_factor: f64,
    interval: u32,
    repetitions: u32,
    due_date: Date,
}

pub fn get_export(coll: &Collection) -> Fallible<Export> {
    let items: Vec<ItemExport> = coll.db.all_items()?.iter().map(item_export).collect();
    let sessions: Vec<SessionExport> = coll
        .db
        .sessions()?
        .into_iter()
        .map(session_export)
        .collect();
    Ok(Export { items, sessions })
}

fn item_export(item: &ReviewableItem) -> ItemExport {
    ItemExport {
        id: item.id().clone(),
        name: item.name().to_string(),
        description: item.description().to_string(),
        categories: item.categories().to_vec(),
        sub_categories: item.subcategories().to_vec(),
        ease_factor: item.ease_factor(),
        interval: item.interval(),
        repetitions: item.repetitions(),
        next_review_date: item.next_review_date(),
        last_reviewed_date: item.last_reviewed_date(),
        date_added: item.date_added(),
    }
}

fn session_export(session: SessionRecord) -> SessionExport {
    SessionExport {
        started_at: session.started_at,
        ended_at: session.ended_at,
        reviews: session.reviews.into_iter().map(review_export).collect(),
    }
}

fn review_export(review: ReviewRecord) -> ReviewExport {
    ReviewExport {
        id: review.item_id,
        reviewed_at: review.reviewed_at,
        quality: review.quality,
        ease_factor: review.ease_factor,
        interval: review.interval,
        repetitions: review.repetitions,
        due_date: review.due_date,
    }
}
