//! Terminal host — line commands and text rendering for the two views.
//!
//! SYSTEM CONTEXT
//! ==============
//! Stands in for the browser router: `browse` drives the list/detail views,
//! `form` drives the wizard. Parsing and rendering are pure so they can be
//! tested without a terminal; the loops only shuttle lines in and text out.

use std::fmt::Write as _;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use pokedex::catalog::{CatalogBrowser, CatalogError, CatalogPage, CreatureDetail, Pagination};
use pokedex::wizard::{
    Blocked, Field, FieldError, FormWizard, Indicator, IndicatorState, Step, StepStore, Transition, WizardError,
};

// =============================================================================
// COMMANDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Prev,
    Page(usize),
    Show(String),
    Help,
    Quit,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    Set(Field, String),
    Next,
    Back,
    Goto(String),
    Status,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_browse_command(line: &str) -> BrowseCommand {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    match verb.to_lowercase().as_str() {
        "n" | "next" => BrowseCommand::Next,
        "p" | "prev" | "previous" => BrowseCommand::Prev,
        "page" => rest.parse().map_or_else(|_| BrowseCommand::Unknown(line.to_string()), BrowseCommand::Page),
        "show" if !rest.is_empty() => BrowseCommand::Show(rest.to_string()),
        "h" | "help" | "?" => BrowseCommand::Help,
        "q" | "quit" | "exit" => BrowseCommand::Quit,
        _ => BrowseCommand::Unknown(line.to_string()),
    }
}

pub fn parse_form_command(line: &str) -> FormCommand {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    match verb.to_lowercase().as_str() {
        "set" => {
            let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            match Field::from_key(name) {
                Some(field) => FormCommand::Set(field, value.trim().to_string()),
                None => FormCommand::Unknown(line.to_string()),
            }
        }
        "next" | "submit" => FormCommand::Next,
        "back" | "prev" | "previous" => FormCommand::Back,
        "goto" => FormCommand::Goto(rest.to_string()),
        "status" | "s" => FormCommand::Status,
        "h" | "help" | "?" => FormCommand::Help,
        "q" | "quit" | "exit" => FormCommand::Quit,
        _ => FormCommand::Unknown(line.to_string()),
    }
}

// =============================================================================
// RENDERING
// =============================================================================

pub fn render_page(page: &CatalogPage, pagination: Pagination) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Creature List (page {} of {})", page.page, pagination.total_pages());
    for (i, name) in page.names().enumerate() {
        let _ = writeln!(out, "  {:>3}. {name}", pagination.offset(page.page) + i + 1);
    }
    let strip: Vec<String> = pagination
        .page_numbers(page.page)
        .into_iter()
        .map(|n| match n {
            Some(n) if n == page.page => format!("[{n}]"),
            Some(n) => n.to_string(),
            None => "…".to_string(),
        })
        .collect();
    let _ = writeln!(out, "  < {} >", strip.join(" "));
    out
}

pub fn render_detail(detail: &CreatureDetail) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", detail.name);
    if let Some(url) = &detail.sprite_url {
        let _ = writeln!(out, "  Sprite: {url}");
    }
    let _ = writeln!(out, "  Height: {}m", detail.height_m());
    let _ = writeln!(out, "  Weight: {}kg", detail.weight_kg());
    let _ = writeln!(out, "  Types:  {}", detail.types_label());
    out
}

pub fn render_catalog_error(err: &CatalogError) -> String {
    match err {
        CatalogError::NotFound { name } => format!("Failed to load {name}: not found"),
        CatalogError::PageOutOfRange { total_pages, .. } => format!("No such page (1-{total_pages})"),
        other => format!("Failed to load: {other}"),
    }
}

pub fn render_indicators(indicators: &[Indicator; 3]) -> String {
    indicators
        .iter()
        .map(|i| {
            let mark = match i.state {
                IndicatorState::Error => "!",
                IndicatorState::Complete { dimmed: false } => "✓",
                IndicatorState::Complete { dimmed: true } => "(✓)",
                IndicatorState::Active => "*",
                IndicatorState::Reachable => "·",
                IndicatorState::Locked => "x",
            };
            format!("{}{mark}", i.step)
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn render_field_errors(errors: &[FieldError]) -> String {
    errors.iter().map(|e| format!("  {}: {}\n", e.field.label(), e.message)).collect()
}

pub fn render_blocked(blocked: Blocked) -> String {
    match blocked {
        Blocked::HasErrors => "Fix the errors on this step first.".to_string(),
        Blocked::Skip => "Steps cannot be skipped.".to_string(),
        Blocked::PreviousIncomplete(step) => format!("Complete step {step} first."),
        Blocked::AlreadyActive => "Already on this step.".to_string(),
    }
}

pub fn render_step<S: StepStore>(wizard: &FormWizard<S>) -> String {
    let step = wizard.step();
    let mut out = String::new();
    let _ = writeln!(out, "Multi-step Form  {}", render_indicators(&wizard.indicators()));
    for &field in step.fields() {
        let _ = writeln!(out, "  {:<10} = {:?}", field.label(), wizard.values().get(field));
    }
    out.push_str(&render_field_errors(&wizard.live_errors()));
    let action = if step.is_last() { "submit" } else { "next" };
    let _ = writeln!(out, "  (set <field> <value> | {action} | back | goto <n> | quit)");
    out
}

// =============================================================================
// LOOPS
// =============================================================================

/// Interactive list/detail session starting at `page`.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub async fn browse<R, W>(browser: &CatalogBrowser, mut page: usize, input: R, output: &mut W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let pagination = browser.pagination();
    page = pagination.clamp(page);
    show_page(browser, page, output).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match parse_browse_command(&line) {
            BrowseCommand::Next => {
                page = pagination.next(page);
                show_page(browser, page, output).await?;
            }
            BrowseCommand::Prev => {
                page = pagination.previous(page);
                show_page(browser, page, output).await?;
            }
            BrowseCommand::Page(n) => {
                page = pagination.clamp(n);
                show_page(browser, page, output).await?;
            }
            BrowseCommand::Show(name) => {
                let text = match browser.creature(&name).await {
                    Ok(detail) => render_detail(&detail),
                    Err(e) => render_catalog_error(&e) + "\n",
                };
                output.write_all(text.as_bytes()).await?;
            }
            BrowseCommand::Help => {
                output.write_all(b"commands: next | prev | page <n> | show <name> | quit\n").await?;
            }
            BrowseCommand::Quit => break,
            BrowseCommand::Unknown(raw) => {
                output.write_all(format!("unknown command: {raw}\n").as_bytes()).await?;
            }
        }
        output.flush().await?;
    }
    Ok(())
}

async fn show_page<W: AsyncWrite + Unpin>(browser: &CatalogBrowser, page: usize, output: &mut W) -> std::io::Result<()> {
    let text = match browser.list_page(page).await {
        Ok(list) => render_page(&list, browser.pagination()),
        Err(e) => render_catalog_error(&e) + "\n",
    };
    output.write_all(text.as_bytes()).await?;
    output.flush().await
}

/// Interactive wizard session.
///
/// # Errors
///
/// Returns an error if reading input, writing output, or the store fails.
pub async fn form<S, R, W>(wizard: &mut FormWizard<S>, input: R, output: &mut W) -> Result<(), HostError>
where
    S: StepStore,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(render_step(wizard).as_bytes()).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let text = match parse_form_command(&line) {
            FormCommand::Set(field, value) => match wizard.set_field(field, value) {
                Ok(()) => render_step(wizard),
                Err(e) => format!("{e}\n"),
            },
            FormCommand::Next => {
                let transition = wizard.next()?;
                render_transition(wizard, transition)
            }
            FormCommand::Back => {
                let transition = wizard.previous()?;
                render_transition(wizard, transition)
            }
            FormCommand::Goto(raw) => match raw.parse::<Step>() {
                Ok(target) => {
                    let transition = wizard.go_to(target)?;
                    render_transition(wizard, transition)
                }
                Err(e) => format!("{e}\n"),
            },
            FormCommand::Status => render_step(wizard),
            FormCommand::Help => "commands: set <field> <value> | next | back | goto <n> | status | quit\n".to_string(),
            FormCommand::Quit => break,
            FormCommand::Unknown(raw) => format!("unknown command: {raw}\n"),
        };
        output.write_all(text.as_bytes()).await?;
        output.flush().await?;
    }
    Ok(())
}

fn render_transition<S: StepStore>(wizard: &FormWizard<S>, transition: Transition) -> String {
    match transition {
        Transition::Moved(_) => render_step(wizard),
        Transition::Submitted(_) => format!("Success! Form submitted successfully\n{}", render_step(wizard)),
        Transition::Invalid(errors) => render_field_errors(&errors),
        Transition::Blocked(blocked) => render_blocked(blocked) + "\n",
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("terminal io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Wizard(#[from] WizardError),
}

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;
