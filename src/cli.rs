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

use std::io::stdin;
use std::io::stdout;
use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;

use crate::cmd::add::add_item;
use crate::cmd::edit::ItemEdit;
use crate::cmd::edit::edit_item;
use crate::cmd::export::export_collection;
use crate::cmd::import::import_file;
use crate::cmd::list::Listing;
use crate::cmd::list::list_items;
use crate::cmd::remove::remove_item;
use crate::cmd::review::run_review;
use crate::cmd::stats::print_stats;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::date::Date;
use crate::types::item::ItemDetails;
use crate::types::item_id::ItemId;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the collection directory. Defaults to the current directory.
    #[arg(long, short, global = true)]
    directory: Option<String>,
    /// Act as if today were this date (YYYY-MM-DD).
    #[arg(long, global = true)]
    today: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a new topic, due today.
    Add {
        /// The topic's name.
        name: String,
        /// A category. May be repeated.
        #[arg(long = "category", short, required = true)]
        categories: Vec<String>,
        /// A subcategory. May be repeated.
        #[arg(long = "subcategory", short)]
        subcategories: Vec<String>,
        /// Free-form notes shown during review.
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Change a topic's name, description, or categories.
    Edit {
        /// The topic's id.
        id: String,
        /// A new name.
        #[arg(long)]
        name: Option<String>,
        /// A new description.
        #[arg(long)]
        description: Option<String>,
        /// Replace the categories. May be repeated.
        #[arg(long = "category", short)]
        categories: Vec<String>,
        /// Replace the subcategories. May be repeated.
        #[arg(long = "subcategory", short)]
        subcategories: Vec<String>,
        /// Remove every subcategory.
        #[arg(long, conflicts_with = "subcategories")]
        no_subcategories: bool,
    },
    /// Delete a topic and its review history.
    Remove {
        /// The topic's id.
        id: String,
    },
    /// List topics and when they are due.
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// List the topics due for review.
    Due {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Review the topics that are due.
    Review {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print collection statistics as JSON.
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Export topics and session history as JSON.
    Export,
    /// Import topics from a JSON file.
    Import {
        /// Path to the JSON file.
        file: PathBuf,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Only include topics in this category.
    #[arg(long)]
    category: Option<String>,
    /// Only include topics in this subcategory. Requires a category.
    #[arg(long)]
    subcategory: Option<String>,
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Cli = Cli::parse();
    let today: Date = match &cli.today {
        Some(s) => Date::parse(s)?,
        None => Date::today(),
    };
    let mut coll = Collection::new(cli.directory)?;
    log::debug!(
        "Using collection {} as of {today}.",
        coll.directory.display()
    );
    match cli.command {
        Command::Add {
            name,
            categories,
            subcategories,
            description,
        } => {
            let details = ItemDetails {
                name,
                description,
                categories,
                subcategories,
            };
            let id = add_item(&mut coll, details, today)?;
            println!("{id}");
            Ok(())
        }
        Command::Edit {
            id,
            name,
            description,
            categories,
            subcategories,
            no_subcategories,
        } => {
            let id = ItemId::parse(&id)?;
            let edit = ItemEdit {
                name,
                description,
                categories,
                subcategories,
                clear_subcategories: no_subcategories,
            };
            edit_item(&mut coll, &id, edit)
        }
        Command::Remove { id } => {
            let id = ItemId::parse(&id)?;
            remove_item(&mut coll, &id)
        }
        Command::List { filter } => {
            let filter = coll.filter(filter.category, filter.subcategory);
            list_items(&coll, &filter, Listing::All, today, &mut stdout())?;
            Ok(())
        }
        Command::Due { filter } => {
            let filter = coll.filter(filter.category, filter.subcategory);
            list_items(&coll, &filter, Listing::Due, today, &mut stdout())?;
            Ok(())
        }
        Command::Review { filter } => {
            let filter = coll.filter(filter.category, filter.subcategory);
            run_review(&mut coll, &filter, today, &mut stdin().lock(), &mut stdout())?;
            Ok(())
        }
        Command::Stats { filter } => {
            let filter = coll.filter(filter.category, filter.subcategory);
            print_stats(&coll, &filter, today)
        }
        Command::Export => export_collection(&coll),
        Command::Import { file } => {
            import_file(&mut coll, &file, today)?;
            Ok(())
        }
    }
}
