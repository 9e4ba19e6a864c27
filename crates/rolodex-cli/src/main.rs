mod cli;
mod output;

use clap::Parser;
use cli::{Cli, Commands, JumpArgs, ListArgs, SeedArgs};
use rolodex_core::IndexKey;
use rolodex_domain::Contact;
use rolodex_pager::{PagerHandle, PagerService};
use rolodex_store::ContactBook;
use serde::Serialize;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("ROLODEX_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::List(args) => handle_list(args).await?,
        Commands::Jump(args) => handle_jump(args).await?,
        Commands::Count(args) => handle_count(args).await?,
    }

    Ok(())
}

/// What a listing shows for one contact. Ids and timestamps are internal;
/// a card is name and phone.
#[derive(Serialize)]
struct ContactCard {
    given_name: String,
    surname: String,
    phone: String,
}

impl From<&Contact> for ContactCard {
    fn from(contact: &Contact) -> Self {
        Self {
            given_name: contact.given_name.clone(),
            surname: contact.surname.clone(),
            phone: contact.phone.clone(),
        }
    }
}

fn cards(view: &rolodex_pager::ListView<Contact>) -> Vec<ContactCard> {
    view.rows().into_iter().map(ContactCard::from).collect()
}

async fn seeded_pager(args: &SeedArgs, page_len: usize) -> PagerHandle<Contact> {
    let book = Arc::new(ContactBook::new());
    book.seed(args.seed, args.count).await;
    PagerService::spawn(book, page_len)
}

async fn handle_list(args: ListArgs) -> anyhow::Result<()> {
    let mut handle = seeded_pager(&args.seed, args.page_len).await;
    let mut view = handle.wait_until_loaded().await?;

    for _ in 1..args.pages {
        handle.extend_forward()?;
        handle.synced().await?;
        let next = handle.wait_until_loaded().await?;
        let grew = next.len() > view.len();
        view = next;
        if !grew {
            // End of the table: further extension is a no-op.
            break;
        }
    }

    output::output_list(cards(&view));
    Ok(())
}

async fn handle_jump(args: JumpArgs) -> anyhow::Result<()> {
    let key = letter_key(&args.letter);
    let mut handle = seeded_pager(&args.seed, args.page_len).await;
    handle.wait_until_loaded().await?;

    handle.jump_to(key)?;
    handle.synced().await?;
    let mut view = handle.wait_until_loaded().await?;

    if args.back {
        handle.extend_backward()?;
        handle.synced().await?;
        view = handle.wait_until_loaded().await?;
    }

    output::output_list(cards(&view));
    Ok(())
}

#[derive(Serialize)]
struct CountResponse {
    count: u64,
}

async fn handle_count(args: SeedArgs) -> anyhow::Result<()> {
    let book = ContactBook::new();
    book.seed(args.seed, args.count).await;
    output::output_success(CountResponse {
        count: book.count().await,
    });
    Ok(())
}

fn letter_key(letter: &str) -> IndexKey {
    let mut chars = letter.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            IndexKey::text(c.to_ascii_uppercase().to_string())
        }
        _ => output::output_error(&format!("--letter must be a single A-Z letter, got {letter:?}")),
    }
}
