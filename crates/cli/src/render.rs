//! Terminal output. Nothing in here talks to the backend.

use std::io;

use console::{style, Term};
use libris_app::books::{CatalogView, Field};
use libris_app::users::{Profile, ProfileView};
use libris_app::utils::{Notice, NoticeKind};
use libris_http::ApiError;
use libris_kernel::User;

pub fn notice(term: &Term, notice: Option<&Notice>) -> io::Result<()> {
    let Some(notice) = notice else {
        return Ok(());
    };
    let line = match notice.kind {
        NoticeKind::Success => format!("{} {}", style("✓").green(), notice.message),
        NoticeKind::Error => format!("{} {}", style("✗").red(), style(&notice.message).red()),
    };
    term.write_line(&line)
}

/// Field errors in form order. Messages that belong to no field only show
/// when no field has one.
pub fn form_errors(term: &Term, view: &CatalogView) -> io::Result<()> {
    for line in error_lines(view) {
        term.write_line(&line)?;
    }
    Ok(())
}

fn error_lines(view: &CatalogView) -> Vec<String> {
    let fields = Field::ALL
        .into_iter()
        .filter_map(|field| view.field_error(field).map(|messages| (field.label(), messages)));
    let general = view.general_errors().into_iter().map(|(_, messages)| ("Error", messages));
    fields
        .chain(general)
        .flat_map(|(label, messages)| {
            messages
                .iter()
                .map(move |message| format!("  {}: {}", style(label).bold(), style(message).red()))
        })
        .collect()
}

pub fn catalog(term: &Term, view: &CatalogView) -> io::Result<()> {
    let window = view.window();
    if window.items.is_empty() {
        return term.write_line(&style("No books found.").dim().to_string());
    }

    for book in &window.items {
        term.write_line(&format!(
            "{:>5}  {}  {}",
            style(book.id).yellow(),
            style(&book.title).bold(),
            style(format!("{} | {} | {}", book.author, book.category, book.publisher)).dim()
        ))?;
    }
    term.write_line(&style(page_footer(window.page, window.total_pages, window.matched)).dim().to_string())
}

fn page_footer(page: usize, total_pages: usize, matched: usize) -> String {
    let noun = if matched == 1 { "book" } else { "books" };
    format!("page {} of {}, {matched} {noun}", page + 1, total_pages)
}

pub fn profile(term: &Term, profile: &Profile) -> io::Result<()> {
    term.write_line(&style(&profile.name).bold().to_string())?;
    term.write_line(&profile.email)?;
    term.write_line(&style(&profile.avatar_url).dim().to_string())
}

pub fn directory(term: &Term, view: &ProfileView) -> io::Result<()> {
    let candidates = view.candidates();
    if candidates.is_empty() {
        return term.write_line(&style("No matching users.").dim().to_string());
    }
    for entry in candidates {
        let marker = if view.is_added(entry.id) {
            style("friend").green().to_string()
        } else {
            String::new()
        };
        term.write_line(&format!(
            "{:>5}  {:<10} {:<24} {}",
            style(entry.id).yellow(),
            entry.name,
            style(entry.email).dim(),
            marker
        ))?;
    }
    Ok(())
}

pub fn user(term: &Term, user: &User) -> io::Result<()> {
    if user.email.is_empty() {
        term.write_line(&format!("{} (#{})", user.name, user.id))
    } else {
        term.write_line(&format!("{} <{}> (#{})", user.name, user.email, user.id))
    }
}

/// Extra line for errors the view's notice does not explain.
pub fn hint(term: &Term, err: &ApiError) -> io::Result<()> {
    match err {
        ApiError::Unauthorized { .. } => {
            term.write_line(&style("Session expired or missing. Run `login` again.").yellow().to_string())
        }
        ApiError::Transport(_) => term.write_line(
            &style("Could not reach the backend. Check --base-url.").yellow().to_string(),
        ),
        _ => Ok(()),
    }
}
