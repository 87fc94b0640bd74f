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

use std::io::BufRead;
use std::io::Write;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::ReviewError;
use crate::filter::ItemFilter;
use crate::session::Current;
use crate::session::ReviewSession;
use crate::session::Summary;
use crate::session::select_due_items;
use crate::types::date::Date;
use crate::types::item::ReviewableItem;
use crate::types::item_id::ItemId;
use crate::types::quality::Quality;
use crate::types::timestamp::Timestamp;

/// A line of reviewer input.
#[derive(Debug, PartialEq)]
enum Input {
    Answer(u8),
    Jump(String),
    List,
    Quit,
    Invalid,
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if let Ok(quality) = line.parse::<u8>() {
        return Input::Answer(quality);
    }
    match line {
        "q" | "quit" => Input::Quit,
        "l" | "list" => Input::List,
        _ => match line.split_once(' ') {
            Some(("j" | "jump", target)) if !target.trim().is_empty() => {
                Input::Jump(target.trim().to_string())
            }
            _ => Input::Invalid,
        },
    }
}

/// Run an interactive review session over the items due `today`.
///
/// Every answer is committed to the database before the next item is shown.
/// Returns `None` when nothing was due.
pub fn run_review<R: BufRead, W: Write>(
    coll: &mut Collection,
    filter: &ItemFilter,
    today: Date,
    input: &mut R,
    out: &mut W,
) -> Fallible<Option<Summary>> {
    let items = coll.items(filter)?;
    let due = select_due_items(&items, today);
    let mut session = match ReviewSession::start(due) {
        Ok(session) => session,
        Err(ReviewError::EmptyDueSet) => {
            writeln!(out, "No topics are due for review.")?;
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    let session_id = coll.db.begin_session(Timestamp::now())?;

    let mut line = String::new();
    loop {
        match session.current_item() {
            Current::Item(item) => print_prompt(out, &session, item)?,
            Current::Complete => break,
        }
        line.clear();
        if input.read_line(&mut line)? == 0 {
            log::debug!("Input closed, ending session.");
            break;
        }
        match parse_input(&line) {
            Input::Answer(quality) => match session.answer(quality, today) {
                Ok(updated) => {
                    let quality = Quality::new(quality)?;
                    coll.db
                        .record_review(session_id, &updated, quality, Timestamp::now())?;
                    writeln!(
                        out,
                        "Next review in {} day(s), on {}.",
                        updated.interval(),
                        updated.next_review_date()
                    )?;
                }
                Err(ReviewError::InvalidQuality(_)) => {
                    writeln!(out, "Please enter a quality between 0 and 5.")?;
                }
                Err(e) => return Err(e.into()),
            },
            Input::Jump(target) => {
                let id = resolve_target(&session, &target)?;
                match session.jump_to(&id) {
                    Ok(()) => {}
                    Err(ReviewError::NotFound) => {
                        writeln!(out, "No topic {target} in this session.")?;
                    }
                    Err(ReviewError::AlreadyCompleted) => {
                        writeln!(out, "That topic was already reviewed.")?;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Input::List => print_queue(out, &session)?,
            Input::Quit => break,
            Input::Invalid => {
                writeln!(
                    out,
                    "Enter a quality (0-5), `j <n>` to jump, `l` to list, or `q` to quit."
                )?;
            }
        }
    }

    coll.db.finish_session(session_id, Timestamp::now())?;
    let summary = session.summarize();
    print_summary(out, &session, &summary)?;
    Ok(Some(summary))
}

/// A jump target is a one-based queue position, or an item id.
fn resolve_target(session: &ReviewSession, target: &str) -> Fallible<ItemId> {
    if let Ok(position) = target.parse::<usize>() {
        if let Some(item) = position.checked_sub(1).and_then(|i| session.items().get(i)) {
            return Ok(item.id().clone());
        }
    }
    ItemId::parse(target)
}

fn print_prompt<W: Write>(
    out: &mut W,
    session: &ReviewSession,
    item: &ReviewableItem,
) -> Fallible<()> {
    let progress = session.progress();
    writeln!(out)?;
    writeln!(
        out,
        "Question {} of {} ({:.0}%)",
        progress.position, progress.total, progress.percent
    )?;
    writeln!(out, "{}", item.name())?;
    if item.description().is_empty() {
        writeln!(out, "No description provided.")?;
    } else {
        writeln!(out, "{}", item.description())?;
    }
    writeln!(out, "[{}]", item.categories().join(", "))?;
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

fn print_queue<W: Write>(out: &mut W, session: &ReviewSession) -> Fallible<()> {
    for entry in session.queue() {
        let marker = if entry.current { ">" } else { " " };
        let done = if entry.completed { "x" } else { " " };
        writeln!(
            out,
            "{marker} [{done}] {}. {}",
            entry.position,
            entry.item.name()
        )?;
    }
    Ok(())
}

fn print_summary<W: Write>(
    out: &mut W,
    session: &ReviewSession,
    summary: &Summary,
) -> Fallible<()> {
    writeln!(out)?;
    writeln!(out, "Session complete. Topics reviewed: {}.", summary.count)?;
    for answer in session.completed() {
        writeln!(
            out,
            "  {} (quality {}, next {})",
            answer.item.name(),
            answer.quality,
            answer.item.next_review_date()
        )?;
    }
    match summary.average_quality {
        Some(avg) => writeln!(out, "Average quality: {avg:.1}")?,
        None => writeln!(out, "Average quality: -")?,
    }
    Ok(())
}
