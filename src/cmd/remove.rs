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
use crate::types::item_id::ItemId;

/// Delete a topic and its review history.
pub fn remove_item(coll: &mut Collection, id: &ItemId) -> Fallible<()> {
    let Some(item) = coll.db.get_item(id)? else {
        return fail(format!("no topic with id {id}."));
    };
    coll.db.remove_item(id)?;
    log::info!("Removed topic {} ({id}).", item.name());
    Ok(())
}
