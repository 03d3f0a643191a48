// UI layer: an interactive terminal menu built on `dialoguer`. Every menu
// entry maps to one intent on the `App`; this module only collects input
// and renders the resulting state.

use crate::api::BookApi;
use crate::app::{App, AuthMode, AuthState, Outcome};
use crate::models::{Book, BookForm};
use crate::session::TokenStore;
use anyhow::Result;
use crossterm::style::{style, Stylize};
use dialoguer::{Confirm, Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Main interactive loop. Shows the auth menu while anonymous and the
/// catalog menu once authenticated, until the user chooses "Exit".
pub fn main_menu<A: BookApi, S: TokenStore>(app: &mut App<A, S>) -> Result<()> {
    loop {
        show_messages(app);
        let keep_going = match app.auth_state() {
            AuthState::Authenticated => catalog_menu(app)?,
            AuthState::Anonymous | AuthState::Authenticating => auth_menu(app)?,
        };
        if !keep_going {
            break;
        }
    }
    Ok(())
}

fn auth_menu<A: BookApi, S: TokenStore>(app: &mut App<A, S>) -> Result<bool> {
    let items = match app.auth_mode() {
        AuthMode::Login => ["Login", "Don't have an account? Register", "Exit"],
        AuthMode::Register => ["Register", "Already have an account? Login", "Exit"],
    };
    let selection = Select::new().items(&items).default(0).interact()?;
    match (selection, app.auth_mode()) {
        (0, AuthMode::Login) => handle_login(app)?,
        (0, AuthMode::Register) => handle_register(app)?,
        (1, _) => app.toggle_auth_mode(),
        _ => return Ok(false),
    }
    Ok(true)
}

fn catalog_menu<A: BookApi, S: TokenStore>(app: &mut App<A, S>) -> Result<bool> {
    println!("{}", format_book_list(app.books()));
    let items = ["Add book", "Edit book", "Delete book", "Refresh", "Logout", "Exit"];
    let selection = Select::new().items(&items).default(0).interact()?;
    match selection {
        0 => {
            app.cancel_edit();
            handle_book_form(app)?;
        }
        1 => {
            if let Some(book) = pick_book(app.books(), "Book to edit")? {
                app.start_edit(&book);
                handle_book_form(app)?;
            }
        }
        2 => {
            if let Some(book) = pick_book(app.books(), "Book to delete")? {
                let mut prompt_failed = None;
                let outcome = app.delete_book(&book.id, |prompt| {
                    match Confirm::new().with_prompt(prompt).default(false).interact() {
                        Ok(yes) => yes,
                        Err(e) => {
                            prompt_failed = Some(e);
                            false
                        }
                    }
                });
                if let Some(e) = prompt_failed {
                    return Err(e.into());
                }
                if outcome == Outcome::Done {
                    println!("{}", style("Book deleted.").green());
                }
            }
        }
        3 => {
            let spinner = spinner("Loading books...")?;
            app.refresh();
            spinner.finish_and_clear();
        }
        4 => app.logout(),
        _ => return Ok(false),
    }
    Ok(true)
}

fn handle_login<A: BookApi, S: TokenStore>(app: &mut App<A, S>) -> Result<()> {
    let email: String = Input::new().with_prompt("Email").interact_text()?;
    let password: String = Password::new().with_prompt("Password").interact()?;

    let spinner = spinner("Logging in...")?;
    let ok = app.login(&email, &password);
    spinner.finish_and_clear();
    if ok {
        println!("{}", style("Welcome back!").green());
    }
    Ok(())
}

fn handle_register<A: BookApi, S: TokenStore>(app: &mut App<A, S>) -> Result<()> {
    let username: String = Input::new().with_prompt("Username").interact_text()?;
    let email: String = Input::new().with_prompt("Email").interact_text()?;
    let password: String = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;

    let spinner = spinner("Registering...")?;
    app.register(&username, &email, &password);
    spinner.finish_and_clear();
    Ok(())
}

/// Prompt for every book field, starting from the current form contents
/// (empty for a new book, the edit target's values when editing).
fn handle_book_form<A: BookApi, S: TokenStore>(app: &mut App<A, S>) -> Result<()> {
    let editing = app.edit_target().is_some();
    let heading = if editing { "Edit Book" } else { "Add a New Book" };
    println!("{}", style(heading).bold());

    let initial = app.form();
    let form = BookForm {
        title: prompt_field("Title", &initial.title)?,
        author: prompt_field("Author", &initial.author)?,
        publisher: prompt_field("Publisher", &initial.publisher)?,
        published_date: prompt_field("Published Date (YYYY-MM-DD)", &initial.published_date)?,
        page_count: prompt_field("Page Count", &initial.page_count)?,
        language: prompt_field("Language", &initial.language)?,
    };

    let action = if editing { "Update Book" } else { "Add Book" };
    if !Confirm::new().with_prompt(action).default(true).interact()? {
        app.cancel_edit();
        return Ok(());
    }

    let spinner = spinner("Saving...")?;
    let outcome = app.submit_book(&form);
    spinner.finish_and_clear();
    if outcome == Outcome::Done {
        println!("{}", style("Book saved.").green());
    }
    Ok(())
}

fn prompt_field(prompt: &str, initial: &str) -> Result<String> {
    let mut input = Input::<String>::new();
    input.with_prompt(prompt).allow_empty(true);
    if !initial.is_empty() {
        input.with_initial_text(initial);
    }
    Ok(input.interact_text()?)
}

fn pick_book(books: &[Book], prompt: &str) -> Result<Option<Book>> {
    if books.is_empty() {
        println!("No books found.");
        return Ok(None);
    }
    let labels: Vec<String> = books
        .iter()
        .map(|b| format!("{} by {}", b.title, b.author))
        .collect();
    let picked = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact_opt()?;
    Ok(picked.map(|i| books[i].clone()))
}

fn show_messages<A: BookApi, S: TokenStore>(app: &App<A, S>) {
    if let Some(notice) = app.notice() {
        println!("{}", style(notice).green());
    }
    if let Some(error) = app.error() {
        println!("{}", style(error).red());
    }
}

/// Spinner shown while a request is outstanding.
fn spinner(message: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Text rendering of the catalog.
pub fn format_book_list(books: &[Book]) -> String {
    if books.is_empty() {
        return "No books found.\nAdd a new book to get started.".to_string();
    }
    let mut out = String::from("Your Books\n");
    for (i, book) in books.iter().enumerate() {
        out.push_str(&format!("{:>3}. {}\n     by {}\n", i + 1, book.title, book.author));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookId;

    fn book(id: &str, title: &str, author: &str) -> Book {
        Book {
            id: BookId::new(id),
            title: title.into(),
            author: author.into(),
            publisher: "P".into(),
            published_date: "2020-01-01".into(),
            page_count: 1,
            language: "en".into(),
        }
    }

    #[test]
    fn empty_list_shows_hint() {
        assert!(format_book_list(&[]).starts_with("No books found."));
    }

    #[test]
    fn rows_are_numbered() {
        let rendered = format_book_list(&[book("1", "Dune", "Herbert"), book("2", "Emma", "Austen")]);
        assert!(rendered.starts_with("Your Books\n"));
        assert!(rendered.contains("  1. Dune\n     by Herbert\n"));
        assert!(rendered.contains("  2. Emma\n     by Austen\n"));
    }
}
