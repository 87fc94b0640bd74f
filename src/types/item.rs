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

use crate::error::Fallible;
use crate::error::fail;
use crate::types::date::Date;
use crate::types::item_id::ItemId;

/// The ease factor of an item that has never been reviewed.
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// The ease factor never drops below this value.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Descriptive information about an item. None of it affects scheduling.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemDetails {
    pub name: String,
    pub description: String,
    pub categories: Vec<String>,
    pub subcategories: Vec<String>,
}

/// The scheduling state of an item. The fields are always replaced together.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduleState {
    /// Governs how fast the interval grows. Never below 1.3.
    pub ease_factor: f64,
    /// Days until the next review. Zero only for never-reviewed items.
    pub interval: u32,
    /// Consecutive passing reviews.
    pub repetitions: u32,
    pub next_review_date: Date,
    pub last_reviewed_date: Option<Date>,
}

impl ScheduleState {
    /// The state of an item that has never been reviewed: due on `today`.
    pub fn fresh(today: Date) -> Self {
        Self {
            ease_factor: INITIAL_EASE_FACTOR,
            interval: 0,
            repetitions: 0,
            next_review_date: today,
            last_reviewed_date: None,
        }
    }
}

/// The unit of scheduling.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewableItem {
    id: ItemId,
    details: ItemDetails,
    schedule: ScheduleState,
    date_added: Date,
}

/// Where an item's next review falls relative to today.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DueStatus {
    Overdue,
    DueToday,
    Future,
}

impl ItemDetails {
    fn normalize(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            categories: dedup(self.categories),
            subcategories: dedup(self.subcategories),
        }
    }
}

/// Trim, drop empty entries, and drop repeats while keeping the first
/// occurrence's position.
fn dedup(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        let value = value.trim().to_string();
        if !value.is_empty() && !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// Normalize user-entered details: a name and at least one category are
/// required.
fn checked_details(details: ItemDetails) -> Fallible<ItemDetails> {
    let details = details.normalize();
    if details.name.is_empty() {
        return fail("topic name is required.");
    }
    if details.categories.is_empty() {
        return fail("at least one category is required.");
    }
    Ok(details)
}

impl ReviewableItem {
    /// Create a never-reviewed item, due immediately.
    pub fn new(id: ItemId, details: ItemDetails, today: Date) -> Fallible<Self> {
        let details = checked_details(details)?;
        Ok(Self {
            id,
            details,
            schedule: ScheduleState::fresh(today),
            date_added: today,
        })
    }

    /// Rebuild an item from stored or imported data.
    pub fn restore(
        id: ItemId,
        details: ItemDetails,
        schedule: ScheduleState,
        date_added: Date,
    ) -> Fallible<Self> {
        let details = details.normalize();
        if details.name.is_empty() {
            return fail(format!("item {id} has no name."));
        }
        if details.categories.is_empty() {
            return fail(format!("item {id} has no categories."));
        }
        if schedule.interval == 0
            && (schedule.repetitions > 0 || schedule.last_reviewed_date.is_some())
        {
            return fail(format!("item {id} has been reviewed but has an interval of 0 days."));
        }
        if schedule.ease_factor.is_nan() || schedule.ease_factor < MIN_EASE_FACTOR {
            return fail(format!(
                "item {id} has ease factor {}, below the minimum of {MIN_EASE_FACTOR}.",
                schedule.ease_factor
            ));
        }
        Ok(Self {
            id,
            details,
            schedule,
            date_added,
        })
    }

    /// A copy of this item with new descriptive fields. The schedule is kept.
    pub fn with_details(&self, details: ItemDetails) -> Fallible<Self> {
        let details = checked_details(details)?;
        Ok(Self {
            details,
            ..self.clone()
        })
    }

    /// A copy of this item with a new scheduling state.
    pub(crate) fn with_schedule(&self, schedule: ScheduleState) -> Self {
        Self {
            schedule,
            ..self.clone()
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn details(&self) -> &ItemDetails {
        &self.details
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn description(&self) -> &str {
        &self.details.description
    }

    pub fn categories(&self) -> &[String] {
        &self.details.categories
    }

    pub fn subcategories(&self) -> &[String] {
        &self.details.subcategories
    }

    pub fn schedule(&self) -> ScheduleState {
        self.schedule
    }

    pub fn ease_factor(&self) -> f64 {
        self.schedule.ease_factor
    }

    pub fn interval(&self) -> u32 {
        self.schedule.interval
    }

    pub fn repetitions(&self) -> u32 {
        self.schedule.repetitions
    }

    pub fn next_review_date(&self) -> Date {
        self.schedule.next_review_date
    }

    pub fn last_reviewed_date(&self) -> Option<Date> {
        self.schedule.last_reviewed_date
    }

    pub fn date_added(&self) -> Date {
        self.date_added
    }

    pub fn is_due(&self, today: Date) -> bool {
        self.schedule.next_review_date <= today
    }

    pub fn due_status(&self, today: Date) -> DueStatus {
        let next = self.schedule.next_review_date;
        if next < today {
            DueStatus::Overdue
        } else if next == today {
            DueStatus::DueToday
        } else {
            DueStatus::Future
        }
    }
}

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// An item with the given scheduling state, for tests.
    pub fn item_with(
        id: &str,
        ease_factor: f64,
        interval: u32,
        repetitions: u32,
        next_review_date: Date,
    ) -> ReviewableItem {
        let details = ItemDetails {
            name: format!("Topic {id}"),
            description: String::new(),
            categories: vec!["Array".to_string()],
            subcategories: Vec::new(),
        };
        let schedule = ScheduleState {
            ease_factor,
            interval,
            repetitions,
            next_review_date,
            last_reviewed_date: None,
        };
        ReviewableItem::restore(
            ItemId::parse(id).unwrap(),
            details,
            schedule,
            next_review_date,
        )
        .unwrap()
    }

    /// A never-reviewed item due on `today`.
    pub fn fresh_item(id: &str, today: Date) -> ReviewableItem {
        item_with(id, INITIAL_EASE_FACTOR, 0, 0, today)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::item_with;
    use super::*;

    fn details(name: &str, categories: &[&str]) -> ItemDetails {
        ItemDetails {
            name: name.to_string(),
            description: String::new(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            subcategories: Vec::new(),
        }
    }

    #[test]
    fn test_new_item_is_fresh_and_due() -> Fallible<()> {
        let today = Date::parse("2025-08-17")?;
        let item = ReviewableItem::new(
            ItemId::parse("1")?,
            details("Two Pointers Technique", &["Array"]),
            today,
        )?;
        assert_eq!(item.ease_factor(), INITIAL_EASE_FACTOR);
        assert_eq!(item.interval(), 0);
        assert_eq!(item.repetitions(), 0);
        assert_eq!(item.next_review_date(), today);
        assert_eq!(item.last_reviewed_date(), None);
        assert_eq!(item.date_added(), today);
        assert!(item.is_due(today));
        Ok(())
    }

    #[test]
    fn test_new_item_requires_name_and_category() -> Fallible<()> {
        let today = Date::parse("2025-08-17")?;
        assert!(ReviewableItem::new(ItemId::parse("1")?, details("  ", &["Array"]), today).is_err());
        assert!(ReviewableItem::new(ItemId::parse("1")?, details("Heaps", &[]), today).is_err());
        Ok(())
    }

    #[test]
    fn test_categories_are_deduplicated_in_order() -> Fallible<()> {
        let today = Date::parse("2025-08-17")?;
        let item = ReviewableItem::new(
            ItemId::parse("1")?,
            details("Sliding Window", &["Array", " String ", "Array", ""]),
            today,
        )?;
        assert_eq!(item.categories(), &["Array".to_string(), "String".to_string()]);
        Ok(())
    }

    #[test]
    fn test_restore_rejects_low_ease_factor() -> Fallible<()> {
        let today = Date::parse("2025-08-17")?;
        let mut schedule = ScheduleState::fresh(today);
        schedule.ease_factor = 1.2;
        let result = ReviewableItem::restore(
            ItemId::parse("1")?,
            details("Tries", &["Trie"]),
            schedule,
            today,
        );
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_restore_rejects_missing_categories() -> Fallible<()> {
        let today = Date::parse("2025-08-17")?;
        let result = ReviewableItem::restore(
            ItemId::parse("1")?,
            details("Tries", &[" "]),
            ScheduleState::fresh(today),
            today,
        );
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_restore_rejects_zero_interval_after_review() -> Fallible<()> {
        let today = Date::parse("2025-08-17")?;
        let mut repeated = ScheduleState::fresh(today);
        repeated.repetitions = 2;
        let mut reviewed = ScheduleState::fresh(today);
        reviewed.last_reviewed_date = Some(today);
        for schedule in [repeated, reviewed] {
            let result = ReviewableItem::restore(
                ItemId::parse("1")?,
                details("Tries", &["Trie"]),
                schedule,
                today,
            );
            assert!(result.is_err());
        }
        // A never-reviewed item is the one case where 0 is allowed.
        let fresh = ReviewableItem::restore(
            ItemId::parse("1")?,
            details("Tries", &["Trie"]),
            ScheduleState::fresh(today),
            today,
        )?;
        assert_eq!(fresh.interval(), 0);
        Ok(())
    }

    #[test]
    fn test_with_details_keeps_schedule() -> Fallible<()> {
        let item = item_with("a", 2.3, 3, 2, Date::parse("2025-08-15")?);
        let edited = item.with_details(details(" Heaps ", &["Heap", "Tree"]))?;
        assert_eq!(edited.name(), "Heaps");
        assert_eq!(edited.categories(), &["Heap".to_string(), "Tree".to_string()]);
        assert_eq!(edited.schedule(), item.schedule());
        assert_eq!(edited.id(), item.id());
        assert_eq!(edited.date_added(), item.date_added());
        assert!(item.with_details(details("Heaps", &[])).is_err());
        assert!(item.with_details(details("", &["Heap"])).is_err());
        Ok(())
    }

    #[test]
    fn test_due_status() -> Fallible<()> {
        let today = Date::parse("2025-08-18")?;
        let overdue = item_with("a", 2.3, 3, 2, Date::parse("2025-08-15")?);
        let due = item_with("b", 2.5, 0, 0, today);
        let future = item_with("c", 2.4, 4, 2, Date::parse("2025-08-19")?);
        assert_eq!(overdue.due_status(today), DueStatus::Overdue);
        assert_eq!(due.due_status(today), DueStatus::DueToday);
        assert_eq!(future.due_status(today), DueStatus::Future);
        assert!(overdue.is_due(today));
        assert!(due.is_due(today));
        assert!(!future.is_due(today));
        Ok(())
    }
}
