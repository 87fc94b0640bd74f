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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::item::ItemDetails;
use crate::types::item_id::ItemId;

/// Changes to a topic's descriptive fields. A `None` or empty field is left
/// as it is.
#[derive(Debug, Default)]
pub struct ItemEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub categories: Vec<String>,
    pub subcategories: Vec<String>,
    /// Remove every subcategory. Applied before `subcategories`.
    pub clear_subcategories: bool,
}

/// Change a topic's name, description, or categories. Its schedule is kept.
pub fn edit_item(coll: &mut Collection, id: &ItemId, edit: ItemEdit) -> Fallible<()> {
    let Some(item) = coll.db.get_item(id)? else {
        return fail(format!("no topic with id {id}."));
    };
    let current = item.details().clone();
    let subcategories = if !edit.subcategories.is_empty() {
        edit.subcategories
    } else if edit.clear_subcategories {
        Vec::new()
    } else {
        current.subcategories
    };
    let details = ItemDetails {
        name: edit.name.unwrap_or(current.name),
        description: edit.description.unwrap_or(current.description),
        categories: if edit.categories.is_empty() {
            current.categories
        } else {
            edit.categories
        },
        subcategories,
    };

    let name = details.name.trim().to_lowercase();
    let existing = coll.db.all_items()?;
    if existing
        .iter()
        .any(|other| other.id() != id && other.name().to_lowercase() == name)
    {
        return fail("a topic with this name already exists.");
    }
    let edited = item.with_details(details)?;
    coll.db.update_details(&edited)?;
    log::info!("Updated topic {} ({id}).", edited.name());
    Ok(())
}
