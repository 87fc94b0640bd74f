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

use std::collections::HashSet;
use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;
use serde::Deserializer;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::date::Date;
use crate::types::item::INITIAL_EASE_FACTOR;
use crate::types::item::ItemDetails;
use crate::types::item::ReviewableItem;
use crate::types::item::ScheduleState;
use crate::types::item_id::ItemId;

/// Accepts an export document (`items`), the legacy store document
/// (`topics`), or a bare array of items.
#[derive(Deserialize)]
#[serde(untagged)]
enum ImportDocument {
    Items(Vec<ItemImport>),
    Wrapped(Wrapped),
}

#[derive(Deserialize)]
struct Wrapped {
    #[serde(alias = "topics")]
    items: Vec<ItemImport>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemImport {
    id: RawId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    categories: Vec<String>,
    /// Legacy single-category field.
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    sub_categories: Vec<String>,
    /// Legacy single-subcategory field.
    #[serde(default)]
    sub_category: Option<String>,
    #[serde(default = "initial_ease_factor")]
    ease_factor: f64,
    #[serde(default)]
    interval: u32,
    #[serde(default)]
    repetitions: u32,
    next_review_date: Date,
    /// Never-reviewed topics may carry an empty string here.
    #[serde(default, deserialize_with = "optional_date")]
    last_reviewed_date: Option<Date>,
    #[serde(default)]
    date_added: Option<Date>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

fn initial_ease_factor() -> f64 {
    INITIAL_EASE_FACTOR
}

fn optional_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        Some(s) if !s.trim().is_empty() => Date::parse(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Prefer the list field; fall back to the legacy single field.
fn merge_legacy(list: Vec<String>, single: Option<String>) -> Vec<String> {
    if list.is_empty() {
        single.into_iter().collect()
    } else {
        list
    }
}

impl ItemImport {
    fn into_item(self, today: Date) -> Fallible<ReviewableItem> {
        let id = match self.id {
            RawId::Text(s) => ItemId::parse(&s)?,
            RawId::Number(n) => ItemId::parse(&n.to_string())?,
        };
        let details = ItemDetails {
            name: self.name,
            description: self.description,
            categories: merge_legacy(self.categories, self.category),
            subcategories: merge_legacy(self.sub_categories, self.sub_category),
        };
        let schedule = ScheduleState {
            ease_factor: self.ease_factor,
            interval: self.interval,
            repetitions: self.repetitions,
            next_review_date: self.next_review_date,
            last_reviewed_date: self.last_reviewed_date,
        };
        ReviewableItem::restore(id, details, schedule, self.date_added.unwrap_or(today))
    }
}

#[derive(Debug, PartialEq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

pub fn import_file(coll: &mut Collection, path: &Path, today: Date) -> Fallible<ImportReport> {
    let content = read_to_string(path)?;
    let report = import_items(coll, &content, today)?;
    println!(
        "Imported {} topics, skipped {}.",
        report.imported, report.skipped
    );
    Ok(report)
}

/// Import items from a JSON document. Every item is validated before any is
/// written, and the accepted items are written in one transaction.
///
/// Items whose id is already present are skipped, as are items whose name
/// matches, ignoring case, a stored item or an earlier item in the document.
pub fn import_items(coll: &mut Collection, content: &str, today: Date) -> Fallible<ImportReport> {
    let document: ImportDocument = serde_json::from_str(content)?;
    let raw = match document {
        ImportDocument::Items(items) => items,
        ImportDocument::Wrapped(w) => w.items,
    };
    let items: Vec<ReviewableItem> = raw
        .into_iter()
        .map(|i| i.into_item(today))
        .collect::<Fallible<_>>()?;

    let mut names: HashSet<String> = coll
        .db
        .all_items()?
        .iter()
        .map(|item| item.name().to_lowercase())
        .collect();
    let mut accepted: Vec<ReviewableItem> = Vec::new();
    let mut skipped = 0;
    for item in items {
        if coll.db.contains_item(item.id())? || accepted.iter().any(|a| a.id() == item.id()) {
            log::warn!("Skipping {}: id {} already exists.", item.name(), item.id());
            skipped += 1;
            continue;
        }
        if !names.insert(item.name().to_lowercase()) {
            log::warn!(
                "Skipping {} ({}): a topic with this name already exists.",
                item.name(),
                item.id()
            );
            skipped += 1;
            continue;
        }
        accepted.push(item);
    }
    coll.db.insert_items(&accepted)?;
    Ok(ImportReport {
        imported: accepted.len(),
        skipped,
    })
}
