use std::error::Error;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::cli::commands::*;
use crate::cli::output::{self, ListRowJson, TaskJson};
use crate::io::store::Store;
use crate::model::document::{Document, SortMode, StatusFilter, Theme};
use crate::model::task::{Priority, Recurrence, Task};
use crate::ops::{list_ops, settings_ops, task_ops, transfer};
use crate::view::{filter, sort, summary};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn Error>> {
    let store = match &cli.store {
        Some(path) => Store::new(PathBuf::from(path)),
        None => Store::new(Store::default_path()),
    };
    let now = Utc::now();
    let json = cli.json;

    match cli.command {
        Commands::Lists => cmd_lists(&store, now, json),
        Commands::List(args) => match args.action {
            ListAction::New(args) => cmd_list_new(&store, args, now),
            ListAction::Rename(args) => cmd_list_rename(&store, args, now),
            ListAction::Rm(args) => cmd_list_rm(&store, args, now),
        },
        Commands::Use(args) => cmd_use(&store, args, now),
        Commands::Add(args) => cmd_add(&store, args, now),
        Commands::Ls(args) => cmd_ls(&store, args, now, json),
        Commands::Done(args) => cmd_done(&store, args, now),
        Commands::Archive(args) => cmd_archive(&store, args, now),
        Commands::Pin(args) => cmd_pin(&store, args, now),
        Commands::Rm(args) => cmd_rm(&store, args, now),
        Commands::Edit(args) => cmd_edit(&store, args, now),
        Commands::Sub(args) => cmd_sub(&store, args, now),
        Commands::ClearCompleted => cmd_clear_completed(&store, now),
        Commands::Stats => cmd_stats(&store, now, json),
        Commands::Tags => cmd_tags(&store, now, json),
        Commands::Theme(args) => cmd_theme(&store, args, now),
        Commands::Export(args) => cmd_export(&store, args, now),
        Commands::ExportCsv(args) => cmd_export_csv(&store, args, now),
        Commands::Import(args) => cmd_import(&store, args, now),
        Commands::Reset(args) => cmd_reset(&store, args, now),
    }
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

fn cmd_lists(store: &Store, now: DateTime<Utc>, json: bool) -> Result<(), Box<dyn Error>> {
    let doc = store.load(now);
    let summaries = summary::all_summaries(&doc, now);
    if json {
        let rows: Vec<ListRowJson> = doc
            .lists
            .iter()
            .map(|l| ListRowJson {
                id: l.id.clone(),
                name: l.name.clone(),
                active: l.id == doc.active_list_id,
                summary: summaries[&l.id].clone(),
            })
            .collect();
        output::print_json(&rows);
    } else {
        for list in &doc.lists {
            output::print_list_row(&doc, &list.id, &list.name, &summaries[&list.id]);
        }
    }
    Ok(())
}

fn cmd_list_new(store: &Store, args: ListNameArgs, now: DateTime<Utc>) -> Result<(), Box<dyn Error>> {
    let mut doc = store.load(now);
    list_ops::create_list(&mut doc, &args.name, now)?;
    store.save(&doc)?;
    println!("created list {}", doc.active_list().map(|l| l.name.as_str()).unwrap_or(""));
    Ok(())
}

fn cmd_list_rename(
    store: &Store,
    args: ListNameArgs,
    now: DateTime<Utc>,
) -> Result<(), Box<dyn Error>> {
    let mut doc = store.load(now);
    let active = doc.active_list_id.clone();
    list_ops::rename_list(&mut doc, &active, &args.name)?;
    store.save(&doc)?;
    println!("renamed active list to {}", args.name.trim());
    Ok(())
}

fn cmd_list_rm(store: &Store, args: ListRmArgs, now: DateTime<Utc>) -> Result<(), Box<dyn Error>> {
    let mut doc = store.load(now);
    let active = doc.active_list_id.clone();
    let name = doc.active_list().map(|l| l.name.clone()).unwrap_or_default();
    let task_count = doc.tasks.iter().filter(|t| t.list_id == active).count();
    if !args.yes {
        return Err(format!(
            "deleting list \"{}\" removes its {} task(s); pass --yes to confirm",
            name, task_count
        )
        .into());
    }
    list_ops::delete_list(&mut doc, &active)?;
    store.save(&doc)?;
    println!("deleted list {} ({} tasks)", name, task_count);
    Ok(())
}

fn cmd_use(store: &Store, args: UseArgs, now: DateTime<Utc>) -> Result<(), Box<dyn Error>> {
    let mut doc = store.load(now);
    let list = list_ops::resolve_list(&doc, &args.list)
        .ok_or_else(|| format!("no list matches {:?}", args.list))?;
    let (id, name) = (list.id.clone(), list.name.clone());
    list_ops::set_active_list(&mut doc, &id)?;
    store.save(&doc)?;
    println!("active list: {}", name);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

fn cmd_add(store: &Store, args: AddArgs, now: DateTime<Utc>) -> Result<(), Box<dyn Error>> {
    let mut doc = store.load(now);
    let fields = task_ops::TaskFields {
        text: args.text,
        notes: args.note.unwrap_or_default(),
        due_at: parse_due_flag(args.due.as_deref())?,
        priority: parse_priority_flag(args.priority.as_deref())?.unwrap_or_default(),
        tags: args.tags.as_deref().map(task_ops::parse_tags).unwrap_or_default(),
        recurrence: parse_recurrence_flags(args.repeat.as_deref(), args.every)?,
    };
    let list_id = doc.active_list_id.clone();
    let id = task_ops::add_task(&mut doc, &list_id, fields, now)?;
    store.save(&doc)?;
    let task = doc.task(&id).ok_or("added task missing")?;
    println!("added: {}", task.text);
    Ok(())
}

fn cmd_ls(store: &Store, args: LsArgs, now: DateTime<Utc>, json: bool) -> Result<(), Box<dyn Error>> {
    let mut doc = store.load(now);

    // A status or sort flag becomes the new persisted view.
    let mut dirty = false;
    if let Some(status) = &args.status {
        let status = StatusFilter::parse(status)
            .ok_or_else(|| format!("unknown status {:?} (active, completed, archived, all)", status))?;
        settings_ops::set_status_filter(&mut doc, status);
        dirty = true;
    }
    if let Some(sort_mode) = &args.sort {
        let sort_mode = SortMode::parse(sort_mode)
            .ok_or_else(|| format!("unknown sort mode {:?}", sort_mode))?;
        settings_ops::set_sort_mode(&mut doc, sort_mode);
        dirty = true;
    }
    if dirty {
        store.save(&doc)?;
    }

    let criteria = filter::FilterCriteria {
        status: doc.settings.status_filter,
        priority: parse_priority_flag(args.priority.as_deref())?,
        tag: args.tag,
        due: parse_due_bucket_flag(args.due.as_deref())?,
        search: args.search.unwrap_or_default(),
    };

    let mut tasks = filter::filter_tasks(&doc, &doc.active_list_id, &criteria, now);
    sort::sort_tasks(&mut tasks, doc.settings.sort_mode, now);

    if json {
        let rows: Vec<TaskJson> = tasks.iter().map(|t| TaskJson::from_task(t, now)).collect();
        output::print_json(&rows);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("no tasks");
        return Ok(());
    }
    for (i, task) in tasks.iter().enumerate() {
        output::print_task_line(i + 1, task, now);
    }
    let s = summary::list_summary(&doc, &doc.active_list_id, now);
    println!("{} remaining", s.remaining);
    Ok(())
}

fn cmd_done(store: &Store, args: TaskRefArgs, now: DateTime<Utc>) -> Result<(), Box<dyn Error>> {
    let mut doc = store.load(now);
    let id = resolve_task(&doc, &args.task, now)?;
    let spawned = task_ops::toggle_complete(&mut doc, &id, now)?;
    store.save(&doc)?;
    let task = doc.task(&id).ok_or("task missing after toggle")?;
    if task.is_completed() {
        println!("completed: {}", task.text);
    } else {
        println!("reopened: {}", task.text);
    }
    if let Some(next_id) = spawned
        && let Some(next) = doc.task(&next_id)
        && let Some(due) = next.due_at
    {
        println!("next occurrence due {}", due.format("%Y-%m-%d"));
    }
    Ok(())
}

fn cmd_archive(store: &Store, args: TaskRefArgs, now: DateTime<Utc>) -> Result<(), Box<dyn Error>> {
    let mut doc = store.load(now);
    let id = resolve_task(&doc, &args.task, now)?;
    task_ops::toggle_archive(&mut doc, &id, now)?;
    store.save(&doc)?;
    let task = doc.task(&id).ok_or("task missing after toggle")?;
    if task.is_archived() {
        println!("archived: {}", task.text);
    } else {
        println!("unarchived: {}", task.text);
    }
    Ok(())
}

fn cmd_pin(store: &Store, args: TaskRefArgs, now: DateTime<Utc>) -> Result<(), Box<dyn Error>> {
    let mut doc = store.load(now);
    let id = resolve_task(&doc, &args.task, now)?;
    task_ops::toggle_pinned(&mut doc, &id)?;
    store.save(&doc)?;
    let task = doc.task(&id).ok_or("task missing after toggle")?;
    if task.pinned {
        println!("pinned: {}", task.text);
    } else {
        println!("unpinned: {}", task.text);
    }
    Ok(())
}

fn cmd_rm(store: &Store, args: TaskRefArgs, now: DateTime<Utc>) -> Result<(), Box<dyn Error>> {
    let mut doc = store.load(now);
    let id = resolve_task(&doc, &args.task, now)?;
    let deleted = task_ops::delete_task(&mut doc, &id)?;
    store.save(&doc)?;
    println!("deleted: {}", deleted.task.text);
    Ok(())
}

fn cmd_edit(store: &Store, args: EditArgs, now: DateTime<Utc>) -> Result<(), Box<dyn Error>> {
    let mut doc = store.load(now);
    let id = resolve_task(&doc, &args.task, now)?;
    let current = doc.task(&id).ok_or("task missing")?.clone();

    let due_at = if args.clear_due {
        None
    } else {
        match parse_due_flag(args.due.as_deref())? {
            Some(due) => Some(due),
            None => current.due_at,
        }
    };
    let recurrence = if args.clear_repeat {
        None
    } else {
        match parse_recurrence_flags(args.repeat.as_deref(), args.every)? {
            Some(r) => Some(r),
            None => current.recurrence.clone(),
        }
    };

    let fields = task_ops::TaskFields {
        text: args.text.unwrap_or(current.text),
        notes: args.note.unwrap_or(current.notes),
        due_at,
        priority: parse_priority_flag(args.priority.as_deref())?.unwrap_or(current.priority),
        tags: args
            .tags
            .as_deref()
            .map(task_ops::parse_tags)
            .unwrap_or(current.tags),
        recurrence,
    };
    task_ops::edit_task(&mut doc, &id, fields)?;
    store.save(&doc)?;
    println!("updated: {}", doc.task(&id).ok_or("task missing")?.text);
    Ok(())
}

fn cmd_sub(store: &Store, args: SubCmd, now: DateTime<Utc>) -> Result<(), Box<dyn Error>> {
    let mut doc = store.load(now);
    let id = resolve_task(&doc, &args.task, now)?;
    match args.action {
        SubAction::Add(add) => {
            task_ops::add_subtask(&mut doc, &id, &add.text)?;
            store.save(&doc)?;
            println!("added subtask: {}", add.text.trim());
        }
        SubAction::Done(sub) => {
            let subtask_id = resolve_subtask(&doc, &id, sub.n)?;
            task_ops::toggle_subtask(&mut doc, &id, &subtask_id)?;
            store.save(&doc)?;
            println!("toggled subtask {}", sub.n);
        }
        SubAction::Rm(sub) => {
            let subtask_id = resolve_subtask(&doc, &id, sub.n)?;
            task_ops::remove_subtask(&mut doc, &id, &subtask_id)?;
            store.save(&doc)?;
            println!("removed subtask {}", sub.n);
        }
    }
    Ok(())
}

fn cmd_clear_completed(store: &Store, now: DateTime<Utc>) -> Result<(), Box<dyn Error>> {
    let mut doc = store.load(now);
    let list_id = doc.active_list_id.clone();
    let removed = task_ops::clear_completed(&mut doc, &list_id);
    store.save(&doc)?;
    println!("cleared {} completed task(s)", removed);
    Ok(())
}

// ---------------------------------------------------------------------------
// Views and settings
// ---------------------------------------------------------------------------

fn cmd_stats(store: &Store, now: DateTime<Utc>, json: bool) -> Result<(), Box<dyn Error>> {
    cmd_lists(store, now, json)
}

fn cmd_tags(store: &Store, now: DateTime<Utc>, json: bool) -> Result<(), Box<dyn Error>> {
    let doc = store.load(now);
    let tags = summary::tag_options(&doc, &doc.active_list_id);
    if json {
        output::print_json(&tags);
    } else if tags.is_empty() {
        println!("no tags");
    } else {
        for tag in tags {
            println!("#{}", tag);
        }
    }
    Ok(())
}

fn cmd_theme(store: &Store, args: ThemeArgs, now: DateTime<Utc>) -> Result<(), Box<dyn Error>> {
    let mut doc = store.load(now);
    let theme = match &args.theme {
        Some(s) => {
            let theme =
                Theme::parse(s).ok_or_else(|| format!("unknown theme {:?} (light, dark)", s))?;
            settings_ops::set_theme(&mut doc, theme);
            theme
        }
        None => settings_ops::toggle_theme(&mut doc),
    };
    store.save(&doc)?;
    println!(
        "theme: {}",
        match theme {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Import / export / reset
// ---------------------------------------------------------------------------

fn cmd_export(store: &Store, args: ExportArgs, now: DateTime<Utc>) -> Result<(), Box<dyn Error>> {
    let doc = store.load(now);
    let (default_name, contents) = transfer::export_json(&doc, now)?;
    let path = args.path.unwrap_or(default_name);
    fs::write(&path, contents)?;
    println!("exported to {}", path);
    Ok(())
}

fn cmd_export_csv(store: &Store, args: ExportArgs, now: DateTime<Utc>) -> Result<(), Box<dyn Error>> {
    let doc = store.load(now);
    let (default_name, contents) = transfer::export_csv(&doc, now);
    let path = args.path.unwrap_or(default_name);
    fs::write(&path, contents)?;
    println!("exported to {}", path);
    Ok(())
}

fn cmd_import(store: &Store, args: ImportArgs, now: DateTime<Utc>) -> Result<(), Box<dyn Error>> {
    let text = fs::read_to_string(&args.file)
        .map_err(|e| format!("could not read {}: {}", args.file, e))?;
    // All-or-nothing: the store is only touched once the payload parses.
    let doc = transfer::import_json(&text, now)?;
    store.save(&doc)?;
    println!(
        "imported {} list(s), {} task(s)",
        doc.lists.len(),
        doc.tasks.len()
    );
    Ok(())
}

fn cmd_reset(store: &Store, args: ResetArgs, now: DateTime<Utc>) -> Result<(), Box<dyn Error>> {
    if !args.yes {
        return Err("reset deletes every list and task; pass --yes to confirm".into());
    }
    let doc = store.reset(now)?;
    store.save(&doc)?;
    println!("reset to a fresh document");
    Ok(())
}

// ---------------------------------------------------------------------------
// Reference resolution and flag parsing
// ---------------------------------------------------------------------------

/// The view task positions refer to: the active list under the persisted
/// status filter and sort mode.
fn current_view<'a>(doc: &'a Document, now: DateTime<Utc>) -> Vec<&'a Task> {
    let criteria = filter::FilterCriteria::from_settings(&doc.settings);
    let mut tasks = filter::filter_tasks(doc, &doc.active_list_id, &criteria, now);
    sort::sort_tasks(&mut tasks, doc.settings.sort_mode, now);
    tasks
}

/// Resolve a task reference: a 1-based position in the current view, or a
/// unique id prefix.
fn resolve_task(doc: &Document, reference: &str, now: DateTime<Utc>) -> Result<String, String> {
    if let Ok(position) = reference.parse::<usize>() {
        let view = current_view(doc, now);
        return view
            .get(position.checked_sub(1).ok_or("positions start at 1")?)
            .map(|t| t.id.clone())
            .ok_or_else(|| format!("no task at position {} (view has {})", position, view.len()));
    }

    let mut matches = doc.tasks.iter().filter(|t| t.id.starts_with(reference));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task.id.clone()),
        (Some(_), Some(_)) => Err(format!("id prefix {:?} is ambiguous", reference)),
        (None, _) => Err(format!("no task matches {:?}", reference)),
    }
}

/// Resolve a 1-based subtask position to its id.
fn resolve_subtask(doc: &Document, task_id: &str, n: usize) -> Result<String, String> {
    let task = doc
        .task(task_id)
        .ok_or_else(|| format!("no task {}", task_id))?;
    task.subtasks
        .get(n.checked_sub(1).ok_or("positions start at 1")?)
        .map(|s| s.id.clone())
        .ok_or_else(|| format!("no subtask at position {} (task has {})", n, task.subtasks.len()))
}

/// Accept `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM`, or a full RFC 3339 timestamp.
fn parse_due_flag(value: Option<&str>) -> Result<Option<DateTime<Utc>>, String> {
    let Some(s) = value else { return Ok(None) };
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Ok(Some(dt.and_utc()));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        && let Some(dt) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(Some(dt.and_utc()));
    }
    Err(format!(
        "could not parse due date {:?} (expected YYYY-MM-DD or RFC 3339)",
        s
    ))
}

fn parse_priority_flag(value: Option<&str>) -> Result<Option<Priority>, String> {
    match value {
        None => Ok(None),
        Some(s) => Priority::parse(s)
            .map(Some)
            .ok_or_else(|| format!("unknown priority {:?} (low, med, high)", s)),
    }
}

fn parse_due_bucket_flag(value: Option<&str>) -> Result<Option<filter::DueFilter>, String> {
    match value {
        None => Ok(None),
        Some(s) => filter::DueFilter::parse(s)
            .map(Some)
            .ok_or_else(|| format!("unknown due bucket {:?} (overdue, today, week, nodue)", s)),
    }
}

fn parse_recurrence_flags(
    repeat: Option<&str>,
    every: Option<u32>,
) -> Result<Option<Recurrence>, String> {
    match repeat {
        None | Some("none") => Ok(None),
        Some("daily") => Ok(Some(Recurrence::Daily)),
        Some("weekly") => Ok(Some(Recurrence::Weekly)),
        Some("monthly") => Ok(Some(Recurrence::Monthly)),
        Some("custom") => {
            let every_days = every.ok_or("custom recurrence needs --every <DAYS>")?;
            if every_days == 0 {
                return Err("--every must be at least 1".into());
            }
            Ok(Some(Recurrence::Custom { every_days }))
        }
        Some(other) => Err(format!(
            "unknown recurrence {:?} (daily, weekly, monthly, custom)",
            other
        )),
    }
}
