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
use crate::types::date::Date;
use crate::types::item::ItemDetails;
use crate::types::item::ReviewableItem;
use crate::types::item_id::ItemId;
use crate::types::timestamp::Timestamp;

/// Add a new, never-reviewed topic, due `today`.
pub fn add_item(coll: &mut Collection, details: ItemDetails, today: Date) -> Fallible<ItemId> {
    let name = details.name.trim().to_lowercase();
    let existing = coll.db.all_items()?;
    if existing
        .iter()
        .any(|item| item.name().to_lowercase() == name)
    {
        return fail("a topic with this name already exists.");
    }
    let id = ItemId::generate(&details.name, Timestamp::now());
    let item = ReviewableItem::new(id.clone(), details, today)?;
    coll.db.insert_item(&item)?;
    log::info!("Added topic {} ({}).", item.name(), item.id());
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::create_tmp_directory;

    fn details(name: &str) -> ItemDetails {
        ItemDetails {
            name: name.to_string(),
            description: "Use two indices moving toward each other.".to_string(),
            categories: vec!["Array".to_string()],
            subcategories: vec!["Two-Pointer".to_string()],
        }
    }

    #[test]
    fn test_add() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let mut coll = Collection::new(Some(dir.display().to_string()))?;
        let today = Date::parse("2025-08-17")?;
        let id = add_item(&mut coll, details("Two Pointers Technique"), today)?;
        let item = coll.db.get_item(&id)?.unwrap();
        assert_eq!(item.name(), "Two Pointers Technique");
        assert_eq!(item.next_review_date(), today);
        assert_eq!(item.date_added(), today);
        assert_eq!(item.subcategories(), &["Two-Pointer".to_string()]);
        Ok(())
    }

    #[test]
    fn test_duplicate_name_is_rejected() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let mut coll = Collection::new(Some(dir.display().to_string()))?;
        let today = Date::parse("2025-08-17")?;
        add_item(&mut coll, details("Binary Search"), today)?;
        let result = add_item(&mut coll, details("  binary SEARCH "), today);
        assert!(result.is_err());
        assert_eq!(coll.db.all_items()?.len(), 1);
        Ok(())
    }
}
