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

use crate::types::item::ReviewableItem;

/// Narrows a collection by category, and then by subcategory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemFilter {
    pub category: Option<String>,
    /// Only applied when a category is selected.
    pub subcategory: Option<String>,
}

impl ItemFilter {
    pub fn new(category: Option<String>, subcategory: Option<String>) -> Self {
        Self {
            category,
            subcategory,
        }
    }

    pub fn matches(&self, item: &ReviewableItem) -> bool {
        let Some(category) = &self.category else {
            return true;
        };
        if !item.categories().iter().any(|c| c == category) {
            return false;
        }
        match &self.subcategory {
            Some(sub) => item.subcategories().iter().any(|s| s == sub),
            None => true,
        }
    }

    /// The matching items, in their original order.
    pub fn apply(&self, items: &[ReviewableItem]) -> Vec<ReviewableItem> {
        items
            .iter()
            .filter(|item| self.matches(item))
            .cloned()
            .collect()
    }
}
