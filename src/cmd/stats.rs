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
use crate::error::Fallible;
use crate::filter::ItemFilter;
use crate::types::date::Date;
use crate::types::item::DueStatus;
use crate::types::timestamp::Timestamp;

pub fn print_stats(coll: &Collection, filter: &ItemFilter, today: Date) -> Fallible<()> {
    let stats = get_stats(coll, filter, today)?;
    let stats_json = serde_json::to_string_pretty(&stats)?;
    println!("{stats_json}");
    Ok(())
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    total_topics: usize,
    due_topics: usize,
    overdue_topics: usize,
    new_topics: usize,
    /// Sessions span categories, so this counts the whole collection.
    session_count: usize,
    last_session_ended_at: Option<Timestamp>,
    /// Topics last reviewed today. A topic answered twice counts once.
    today_review_count: usize,
}

fn get_stats(coll: &Collection, filter: &ItemFilter, today: Date) -> Fallible<Stats> {
    let items = coll.items(filter)?;
    Ok(Stats {
        total_topics: items.len(),
        due_topics: items.iter().filter(|i| i.is_due(today)).count(),
        overdue_topics: items
            .iter()
            .filter(|i| i.due_status(today) == DueStatus::Overdue)
            .count(),
        new_topics: items
            .iter()
            .filter(|i| i.last_reviewed_date().is_none())
            .count(),
        session_count: coll.db.session_count()?,
        last_session_ended_at: coll.db.last_session_end()?,
        today_review_count: items
            .iter()
            .filter(|i| i.last_reviewed_date() == Some(today))
            .count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::create_tmp_directory;
    use crate::sm2::compute_next_schedule;
    use crate::types::item::ItemDetails;
    use crate::types::item::fixtures::fresh_item;
    use crate::types::item::fixtures::item_with;
    use crate::types::quality::Quality;

    #[test]
    fn test_stats() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let mut coll = Collection::new(Some(dir.display().to_string()))?;
        let today = Date::parse("2025-08-18")?;
        let a = fresh_item("a", today);
        coll.db.insert_item(&a)?;
        coll.db
            .insert_item(&item_with("b", 2.3, 3, 2, Date::parse("2025-08-15")?))?;
        coll.db
            .insert_item(&item_with("c", 2.4, 4, 2, Date::parse("2025-08-19")?))?;

        let session_id = coll.db.begin_session(Timestamp::now())?;
        let updated = compute_next_schedule(&a, 4, today)?;
        coll.db
            .record_review(session_id, &updated, Quality::new(4)?, Timestamp::now())?;

        let stats = get_stats(&coll, &ItemFilter::default(), today)?;
        assert_eq!(
            stats,
            Stats {
                total_topics: 3,
                due_topics: 1,
                overdue_topics: 1,
                new_topics: 2,
                session_count: 1,
                last_session_ended_at: None,
                today_review_count: 1,
            }
        );
        let json = serde_json::to_string(&stats)?;
        assert!(json.contains("\"totalTopics\":3"));
        Ok(())
    }

    #[test]
    fn test_today_count_is_per_topic_and_filtered() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let mut coll = Collection::new(Some(dir.display().to_string()))?;
        let today = Date::parse("2025-08-18")?;
        let a = fresh_item("a", today);
        let b = fresh_item("b", today).with_details(ItemDetails {
            name: "Topic b".to_string(),
            description: String::new(),
            categories: vec!["Tree".to_string()],
            subcategories: Vec::new(),
        })?;
        coll.db.insert_item(&a)?;
        coll.db.insert_item(&b)?;

        // "a" is answered in two sessions, "b" in one.
        for _ in 0..2 {
            let session_id = coll.db.begin_session(Timestamp::now())?;
            let updated = compute_next_schedule(&a, 2, today)?;
            coll.db
                .record_review(session_id, &updated, Quality::new(2)?, Timestamp::now())?;
            coll.db.finish_session(session_id, Timestamp::now())?;
        }
        let session_id = coll.db.begin_session(Timestamp::now())?;
        let updated = compute_next_schedule(&b, 4, today)?;
        coll.db
            .record_review(session_id, &updated, Quality::new(4)?, Timestamp::now())?;

        let stats = get_stats(&coll, &ItemFilter::default(), today)?;
        assert_eq!(stats.today_review_count, 2);
        assert_eq!(stats.session_count, 3);

        let tree = ItemFilter::new(Some("Tree".to_string()), None);
        let stats = get_stats(&coll, &tree, today)?;
        assert_eq!(stats.total_topics, 1);
        assert_eq!(stats.today_review_count, 1);
        Ok(())
    }
}
