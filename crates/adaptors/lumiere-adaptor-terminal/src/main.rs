//! Advisor console binary

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use lumiere_adaptor_terminal::{
    render_details, render_help, render_products, render_selection, render_speech, Command,
    TerminalEvents,
};
use lumiere_core::{
    client_language_preferences, message, Advisor, AdvisorConfig, AdvisorReply, CatalogStore,
    LumiereError, MessageKey,
};
use lumiere_provider_relay::RelayClient;
use lumiere_storage_sqlite::SqliteStorage;

#[derive(Parser)]
#[command(name = "lumiere", about = "Lumiere smart routine and product advisor")]
struct Args {
    /// Product catalog JSON path (overrides LUMIERE_CATALOG_PATH)
    #[arg(long)]
    catalog: Option<String>,

    /// Relay endpoint (overrides LUMIERE_RELAY_URL)
    #[arg(long)]
    relay_url: Option<String>,
}

/// Active filter state; display-only, the stores hold everything else
#[derive(Default)]
struct Filters {
    categories: String,
    search: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    lumiere_core::load_env().ok();

    let args = Args::parse();
    let mut config = AdvisorConfig::from_env().context("loading configuration")?;
    if let Some(catalog) = args.catalog {
        config.catalog_path = catalog;
    }
    if let Some(relay_url) = args.relay_url {
        config.relay_url = relay_url;
    }

    let storage = Arc::new(
        SqliteStorage::new(&config.storage_url)
            .await
            .context("opening storage")?,
    );
    let provider = Arc::new(RelayClient::new(&config.relay_url).with_timeout(config.request_timeout));

    let mut advisor = Advisor::new(
        CatalogStore::new(&config.catalog_path),
        storage,
        provider,
        Arc::new(TerminalEvents),
        config.model.clone(),
    );

    let mut catalog_ok = true;
    if let Err(e) = advisor.init(&client_language_preferences()).await {
        match e {
            LumiereError::CatalogUnavailable(ref detail) => {
                tracing::warn!("Catalog load failed: {}", detail);
                catalog_ok = false;
            }
            other => return Err(other).context("initializing advisor"),
        }
    }

    let locale = advisor.locale();
    println!("{}", message(locale, MessageKey::Title));
    println!();
    println!(
        "{}",
        render_speech(
            MessageKey::AssistantName,
            message(locale, MessageKey::Welcome),
            locale
        )
    );
    if catalog_ok {
        println!("{}", message(locale, MessageKey::SelectCategory));
    } else {
        println!("{}", message(locale, MessageKey::CatalogUnavailable));
    }
    println!();

    let mut filters = Filters::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = Command::parse(&line) else {
            continue;
        };
        if command == Command::Quit {
            break;
        }
        if let Err(e) = dispatch(&mut advisor, &mut filters, command).await {
            // Nothing here is fatal; degrade and keep the session alive.
            tracing::error!("Command failed: {}", e);
            let key = match e {
                LumiereError::CatalogUnavailable(_) => MessageKey::CatalogUnavailable,
                _ => MessageKey::CommandFailed,
            };
            println!("{}", message(advisor.locale(), key));
        }
    }
    Ok(())
}

async fn dispatch(
    advisor: &mut Advisor,
    filters: &mut Filters,
    command: Command,
) -> lumiere_core::Result<()> {
    let locale = advisor.locale();
    match command {
        Command::Category(categories) => {
            filters.categories = categories;
            show_catalog(advisor, filters).await?;
        }
        Command::Search(search) => {
            filters.search = search;
            show_catalog(advisor, filters).await?;
        }
        Command::Toggle(id) => {
            advisor.toggle_product(id).await?;
            println!("{}", render_selection(advisor.selection().products(), locale));
        }
        Command::Remove(id) => {
            advisor.remove_product(id).await?;
            println!("{}", render_selection(advisor.selection().products(), locale));
        }
        Command::Clear => {
            advisor.clear_selection().await?;
            println!("{}", render_selection(advisor.selection().products(), locale));
        }
        Command::Details(id) => match advisor.catalog().get(id) {
            Some(product) => println!("{}", render_details(product, locale)),
            None => println!("{}", message(locale, MessageKey::NoProductsFound)),
        },
        Command::Language => {
            let locale = advisor.toggle_locale().await?;
            println!("{}", message(locale, MessageKey::Title));
            println!("{}", render_selection(advisor.selection().products(), locale));
        }
        Command::Routine => {
            let reply = advisor.generate_routine().await?;
            print_reply(advisor, &reply);
        }
        Command::Help => println!("{}", render_help()),
        Command::Chat(text) => {
            println!("{}", render_speech(MessageKey::UserName, &text, locale));
            let reply = advisor.handle_message(&text).await?;
            print_reply(advisor, &reply);
        }
        Command::Quit => {}
    }
    Ok(())
}

async fn show_catalog(advisor: &mut Advisor, filters: &Filters) -> lumiere_core::Result<()> {
    if !advisor.catalog().is_loaded() {
        advisor.reload_catalog().await?;
    }
    let locale = advisor.locale();
    let products = advisor.filter_products(&filters.categories, &filters.search);
    let selection = advisor.selection();
    println!(
        "{}",
        render_products(&products, |id| selection.contains(id), locale)
    );
    Ok(())
}

fn print_reply(advisor: &Advisor, reply: &AdvisorReply) {
    println!(
        "{}",
        render_speech(MessageKey::AssistantName, reply.text(), advisor.locale())
    );
}
