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

//! Review sessions: one pass over the items due on a given day.

use serde::Serialize;

use crate::error::ReviewError;
use crate::sm2::compute_next_schedule;
use crate::types::date::Date;
use crate::types::item::ReviewableItem;
use crate::types::item_id::ItemId;
use crate::types::quality::Quality;

/// The items due on `today`, in their original order.
pub fn select_due_items(items: &[ReviewableItem], today: Date) -> Vec<ReviewableItem> {
    items
        .iter()
        .filter(|item| item.is_due(today))
        .cloned()
        .collect()
}

/// An in-progress review pass. Never persisted.
#[derive(Debug)]
pub struct ReviewSession {
    /// Snapshots of the items due when the session started.
    items: Vec<ReviewableItem>,
    /// The next slot to present. The session is complete once this reaches
    /// `items.len()`.
    current_index: usize,
    /// Answers in the order they were given.
    completed: Vec<CompletedReview>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompletedReview {
    /// The item's state after the answer.
    pub item: ReviewableItem,
    pub quality: Quality,
}

/// What the session is currently presenting.
#[derive(Debug, PartialEq)]
pub enum Current<'a> {
    Item(&'a ReviewableItem),
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub count: usize,
    /// Undefined (`None`) until at least one answer has been recorded.
    pub average_quality: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    /// One-based position of the current slot, capped at `total`.
    pub position: usize,
    pub total: usize,
    /// Share of slots already passed, from 0 to 100.
    pub percent: f64,
}

/// A row of the session queue, for picking an item to jump to.
#[derive(Debug, PartialEq)]
pub struct QueueEntry<'a> {
    pub position: usize,
    pub item: &'a ReviewableItem,
    pub completed: bool,
    pub current: bool,
}

impl ReviewSession {
    /// Start a session over `due_items`. Reports `EmptyDueSet` if there is
    /// nothing to review.
    pub fn start(due_items: Vec<ReviewableItem>) -> Result<Self, ReviewError> {
        if due_items.is_empty() {
            return Err(ReviewError::EmptyDueSet);
        }
        log::debug!("Starting session with {} items.", due_items.len());
        Ok(Self {
            items: due_items,
            current_index: 0,
            completed: Vec::new(),
        })
    }

    pub fn current_item(&self) -> Current<'_> {
        match self.items.get(self.current_index) {
            Some(item) => Current::Item(item),
            None => Current::Complete,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.items.len()
    }

    /// Make the item with the given id current. Only items not yet answered
    /// in this session can be selected.
    ///
    /// This moves the queue pointer: the next `answer` advances from the
    /// item jumped to, so any unanswered items between the old and new
    /// positions are not offered again by the sequential walk.
    pub fn jump_to(&mut self, id: &ItemId) -> Result<(), ReviewError> {
        if self.is_complete() {
            return Err(ReviewError::NoCurrentItem);
        }
        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or(ReviewError::NotFound)?;
        if self.is_answered(id) {
            return Err(ReviewError::AlreadyCompleted);
        }
        log::debug!("Jumping from slot {} to slot {index}.", self.current_index);
        self.current_index = index;
        Ok(())
    }

    /// Score the current item, record the answer, and move to the next slot.
    ///
    /// Returns the updated item for the caller to commit. The slot is scored
    /// from the snapshot taken at session start even if it was already
    /// answered after a backward jump.
    pub fn answer(&mut self, quality: u8, today: Date) -> Result<ReviewableItem, ReviewError> {
        let item = match self.current_item() {
            Current::Item(item) => item,
            Current::Complete => return Err(ReviewError::NoCurrentItem),
        };
        let updated = compute_next_schedule(item, quality, today)?;
        let quality = Quality::new(quality)?;
        self.completed.push(CompletedReview {
            item: updated.clone(),
            quality,
        });
        self.current_index += 1;
        if self.is_complete() {
            log::debug!("Session complete after {} answers.", self.completed.len());
        }
        Ok(updated)
    }

    pub fn summarize(&self) -> Summary {
        let count = self.completed.len();
        let average_quality = if count > 0 {
            let total: u32 = self
                .completed
                .iter()
                .map(|c| u32::from(c.quality.value()))
                .sum();
            Some(f64::from(total) / count as f64)
        } else {
            None
        };
        Summary {
            count,
            average_quality,
        }
    }

    pub fn progress(&self) -> Progress {
        let total = self.items.len();
        Progress {
            position: (self.current_index + 1).min(total),
            total,
            percent: self.current_index.min(total) as f64 / total as f64 * 100.0,
        }
    }

    pub fn queue(&self) -> Vec<QueueEntry<'_>> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| QueueEntry {
                position: index + 1,
                item,
                completed: self.is_answered(item.id()),
                current: index == self.current_index,
            })
            .collect()
    }

    pub fn items(&self) -> &[ReviewableItem] {
        &self.items
    }

    pub fn completed(&self) -> &[CompletedReview] {
        &self.completed
    }

    fn is_answered(&self, id: &ItemId) -> bool {
        self.completed.iter().any(|c| c.item.id() == id)
    }
}
