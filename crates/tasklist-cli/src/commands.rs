use anyhow::anyhow;
use tasklist_core::config::{Config, parse_bool};
use tasklist_core::controller::NotificationKind;
use tasklist_core::{Controller, Filter, TaskApi, TaskId};
use tracing::{debug, info, instrument, warn};

use crate::cli::Invocation;
use crate::prompt;
use crate::render::Renderer;

pub fn known_command_names() -> Vec<&'static str> {
    vec!["list", "add", "modify", "toggle", "delete", "help", "version"]
}

pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

/// What the filter terms in front of the command select.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub filter: Option<Filter>,
    pub ids: Vec<TaskId>,
}

pub fn parse_selection(terms: &[String]) -> anyhow::Result<Selection> {
    let mut selection = Selection::default();
    for term in terms {
        for part in term.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            if let Ok(id) = part.parse::<TaskId>() {
                selection.ids.push(id);
            } else if let Ok(filter) = part.parse::<Filter>() {
                selection.filter = Some(filter);
            } else {
                return Err(anyhow!("unrecognized filter term: {part}"));
            }
        }
    }
    Ok(selection)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mod {
    Title(String),
    Description(String),
    Completed(bool),
}

/// Splits free words (joined into a title) from `title:`, `desc:` and `completed:` modifiers.
/// Everything after `--` is taken literally.
pub fn parse_title_and_mods(args: &[String]) -> anyhow::Result<(Option<String>, Vec<Mod>)> {
    let mut words = Vec::new();
    let mut mods = Vec::new();

    let mut literal = false;
    for arg in args {
        if arg == "--" && !literal {
            literal = true;
            continue;
        }

        if !literal && let Some(one_mod) = parse_one_mod(arg)? {
            mods.push(one_mod);
            continue;
        }

        words.push(arg.clone());
    }

    let title = Some(words.join(" ")).filter(|t| !t.trim().is_empty());
    Ok((title, mods))
}

fn parse_one_mod(tok: &str) -> anyhow::Result<Option<Mod>> {
    let Some((key, value)) = tok.split_once(':') else {
        return Ok(None);
    };

    let modifier = match key {
        "title" => Mod::Title(value.to_string()),
        "desc" | "description" => Mod::Description(value.to_string()),
        "completed" | "done" => {
            let value = value.trim().to_ascii_lowercase();
            match value.as_str() {
                "" => return Err(anyhow!("completed: needs yes or no")),
                v if parse_bool(v) => Mod::Completed(true),
                "0" | "n" | "no" | "off" | "false" => Mod::Completed(false),
                other => return Err(anyhow!("invalid completed value: {other}")),
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(modifier))
}

#[instrument(skip(controller, cfg, renderer, inv))]
pub async fn dispatch<A: TaskApi>(
    controller: &Controller<A>,
    cfg: &Config,
    renderer: &mut Renderer,
    inv: Invocation,
    assume_yes: bool,
) -> anyhow::Result<()> {
    let command = inv.command.as_str();
    debug!(
        command,
        filter = ?inv.filter_terms,
        args = ?inv.command_args,
        "dispatching command"
    );

    match command {
        "help" => return cmd_help(),
        "version" => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    let selection = parse_selection(&inv.filter_terms)?;

    controller.load().await;
    report(controller, renderer, &[])?;

    match command {
        "list" => cmd_list(controller, cfg, renderer, &selection),
        "add" => cmd_add(controller, renderer, &inv.command_args).await,
        "modify" => cmd_modify(controller, renderer, &selection, &inv.command_args).await,
        "toggle" => cmd_toggle(controller, renderer, &selection).await,
        "delete" => {
            let ask = !assume_yes && cfg.get_bool("confirm").unwrap_or(true);
            cmd_delete(controller, renderer, &selection, ask).await
        }
        other => Err(anyhow!("unknown command: {other}")),
    }
}

fn cmd_list<A: TaskApi>(
    controller: &Controller<A>,
    cfg: &Config,
    renderer: &mut Renderer,
    selection: &Selection,
) -> anyhow::Result<()> {
    info!("command list");
    if !selection.ids.is_empty() {
        warn!(ids = ?selection.ids, "task ids are ignored by list");
    }

    let filter = match selection.filter {
        Some(filter) => filter,
        None => cfg.default_filter()?,
    };
    controller.set_filter(filter);
    renderer.print_task_table(&controller.snapshot().view)
}

async fn cmd_add<A: TaskApi>(
    controller: &Controller<A>,
    renderer: &mut Renderer,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command add");

    let (words, mods) = parse_title_and_mods(args)?;
    let mut title = words.unwrap_or_default();
    let mut description = String::new();
    for one_mod in mods {
        match one_mod {
            Mod::Title(value) => title = value,
            Mod::Description(value) => description = value,
            Mod::Completed(_) => return Err(anyhow!("add: completed: is not supported")),
        }
    }

    let before = controller.with_store(|s| s.len());
    controller.set_draft_title(title);
    controller.set_draft_description(description);
    controller.create().await;

    if controller.with_store(|s| s.len()) > before
        && let Some(id) = controller.with_store(|s| s.tasks().first().map(|t| t.id))
    {
        println!("Created task {id}.");
    }
    report(controller, renderer, &[])
}

async fn cmd_modify<A: TaskApi>(
    controller: &Controller<A>,
    renderer: &mut Renderer,
    selection: &Selection,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command modify");

    let ids = require_ids(selection, "modify")?;
    let (words, mods) = parse_title_and_mods(args)?;
    if words.is_none() && mods.is_empty() {
        return Err(anyhow!("modify: nothing to change"));
    }

    let mut missing = Vec::new();
    for id in ids {
        if !controller.open_edit(id) {
            warn!(id, "modify: task not found");
            missing.push(id);
            continue;
        }
        if let Some(title) = words.clone() {
            controller.set_edit_title(title);
        }
        for one_mod in mods.iter().cloned() {
            match one_mod {
                Mod::Title(value) => controller.set_edit_title(value),
                Mod::Description(value) => controller.set_edit_description(value),
                Mod::Completed(value) => controller.set_edit_completed(value),
            }
        }
        controller.save_edit().await;
        // A failed save leaves the form open; close it before the next id.
        controller.close_edit();
    }

    report(controller, renderer, &missing)
}

async fn cmd_toggle<A: TaskApi>(
    controller: &Controller<A>,
    renderer: &mut Renderer,
    selection: &Selection,
) -> anyhow::Result<()> {
    info!("command toggle");

    for id in require_ids(selection, "toggle")? {
        controller.toggle(id).await;
    }
    report(controller, renderer, &[])
}

async fn cmd_delete<A: TaskApi>(
    controller: &Controller<A>,
    renderer: &mut Renderer,
    selection: &Selection,
    ask: bool,
) -> anyhow::Result<()> {
    info!("command delete");

    let mut missing = Vec::new();
    for id in require_ids(selection, "delete")? {
        if !controller.request_delete(id) {
            warn!(id, "delete: task not found");
            missing.push(id);
            continue;
        }

        let message = controller
            .snapshot()
            .confirm
            .map(|c| c.message)
            .unwrap_or_default();
        let accepted = !ask || prompt::confirm(&message)?;

        if accepted {
            controller.confirm().await;
        } else {
            controller.cancel_confirm();
            println!("Task {id} not deleted.");
        }
    }
    report(controller, renderer, &missing)
}

fn cmd_help() -> anyhow::Result<()> {
    println!(
        "usage: tasklist [options] [filter] <command> [args]\n\
         \n\
         filter   all | completed | pending | <id>[,<id>...]\n\
         \n\
         list                       show tasks matching the filter\n\
         add <title> [desc:<text>]  create a task\n\
         <id> modify [title:<text>] [desc:<text>] [completed:yes|no]\n\
         <id> toggle                flip completion\n\
         <id> delete                delete after confirmation (-y skips)\n\
         version                    print the version"
    );
    Ok(())
}

fn require_ids(selection: &Selection, command: &str) -> anyhow::Result<Vec<TaskId>> {
    if selection.ids.is_empty() {
        return Err(anyhow!("{command} requires a task id, e.g. `tasklist 3 {command}`"));
    }
    Ok(selection.ids.clone())
}

/// Prints queued notifications. Failures and unknown ids turn into the command's error.
fn report<A>(
    controller: &Controller<A>,
    renderer: &mut Renderer,
    missing: &[TaskId],
) -> anyhow::Result<()> {
    let notifications = controller.take_notifications();
    renderer.print_notifications(&notifications)?;

    let failures: Vec<String> = missing
        .iter()
        .map(|id| format!("task not found: {id}"))
        .chain(
            notifications
                .iter()
                .filter(|n| n.kind != NotificationKind::Success)
                .map(|n| n.message.clone()),
        )
        .collect();
    if failures.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("{}", failures.join("; ")))
    }
}
