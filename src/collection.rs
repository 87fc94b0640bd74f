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

use std::env::current_dir;
use std::path::PathBuf;

use crate::config::Config;
use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::filter::ItemFilter;
use crate::types::item::ReviewableItem;

/// A collection directory: its configuration and its database.
pub struct Collection {
    pub directory: PathBuf,
    pub config: Config,
    pub db: Database,
}

impl Collection {
    pub fn new(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };

        let config = Config::load(&directory)?;

        let db_path: PathBuf = directory.join(config.database());
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        log::debug!("Opening database at {db_path}.");
        let db: Database = Database::new(db_path)?;

        Ok(Self {
            directory,
            config,
            db,
        })
    }

    /// Combine filter flags with the configured defaults. A category given on
    /// the command line replaces both configured filters.
    pub fn filter(&self, category: Option<String>, subcategory: Option<String>) -> ItemFilter {
        match category {
            Some(category) => ItemFilter::new(Some(category), subcategory),
            None => ItemFilter::new(
                self.config.category.clone(),
                subcategory.or_else(|| self.config.subcategory.clone()),
            ),
        }
    }

    /// Every item passing `filter`, in collection order.
    pub fn items(&self, filter: &ItemFilter) -> Fallible<Vec<ReviewableItem>> {
        let items = self.db.all_items()?;
        Ok(filter.apply(&items))
    }
}
