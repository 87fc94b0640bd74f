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

use std::io::Write;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::filter::ItemFilter;
use crate::session::select_due_items;
use crate::types::date::Date;
use crate::types::item::DueStatus;
use crate::types::item::ReviewableItem;

/// Which items to print.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Listing {
    All,
    Due,
}

/// Print the filtered items, one per line. Returns how many were printed.
pub fn list_items<W: Write>(
    coll: &Collection,
    filter: &ItemFilter,
    listing: Listing,
    today: Date,
    out: &mut W,
) -> Fallible<usize> {
    let items = coll.items(filter)?;
    let items = match listing {
        Listing::All => items,
        Listing::Due => select_due_items(&items, today),
    };
    if items.is_empty() {
        match listing {
            Listing::All => writeln!(out, "No topics found.")?,
            Listing::Due => writeln!(out, "No topics are due for review.")?,
        }
        return Ok(0);
    }
    for item in items.iter() {
        writeln!(out, "{}", format_item(item, today))?;
    }
    Ok(items.len())
}

pub fn format_item(item: &ReviewableItem, today: Date) -> String {
    format!(
        "{}  {}  [{}]  {}",
        item.id(),
        item.name(),
        item.categories().join(", "),
        describe_due(item, today)
    )
}

pub fn describe_due(item: &ReviewableItem, today: Date) -> String {
    let next = item.next_review_date();
    match item.due_status(today) {
        DueStatus::Overdue => format!("overdue since {next}"),
        DueStatus::DueToday => "due today".to_string(),
        DueStatus::Future => format!("due {next}"),
    }
}
