use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};

use desapega::config::Config;
use desapega::models::{CreateItem, Item, ItemId, ItemStatus, UpdateItem};
use desapega::pages::{ListingView, MySalesPage, Navigation, NoticeLevel};
use desapega::services::ItemService;
use desapega::{ApiClient, Session, SessionUser};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "desapega", version, about = "Manage your desapega marketplace listings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a token and user obtained from the login page
    Login {
        #[arg(long)]
        token: String,
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },

    /// Forget the stored session
    Logout,

    /// Call the items API directly
    Items {
        #[command(subcommand)]
        command: ItemsCommand,
    },

    /// Your own listings, with status and delete actions
    MySales {
        #[arg(long, value_enum, default_value_t = ViewArg::Sales)]
        view: ViewArg,

        #[command(subcommand)]
        command: Option<MySalesCommand>,
    },
}

#[derive(Subcommand, Debug)]
enum ItemsCommand {
    List,
    Show {
        id: ItemId,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        status: Option<ItemStatus>,
        #[arg(long)]
        image_url: Option<String>,
    },
    Update {
        id: ItemId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        image_url: Option<String>,
    },
    Delete {
        id: ItemId,
    },
    /// Set the status (available, reserved, sold)
    Status {
        id: ItemId,
        status: ItemStatus,
    },
    Reserve {
        id: ItemId,
    },
    Buy {
        id: ItemId,
    },
}

#[derive(Subcommand, Debug)]
enum MySalesCommand {
    /// Move one of your items to another status
    Status { id: ItemId, status: ItemStatus },

    /// Delete one of your items
    Delete {
        id: ItemId,
        /// Confirm without asking
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ViewArg {
    Sales,
    Purchases,
}

impl From<ViewArg> for ListingView {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Sales => ListingView::Sales,
            ViewArg::Purchases => ListingView::Purchases,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "desapega=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let session = Session::load(&config.session_file)
        .await
        .with_context(|| format!("Failed to read session file {}", config.session_file.display()))?;
    let client = ApiClient::new(config.api_url.clone(), session.clone(), config.http_timeout())?;
    let items_api = ItemService::new(client);

    match cli.command {
        Commands::Login {
            token,
            user_id,
            name,
            email,
        } => {
            session
                .sign_in(
                    token,
                    SessionUser {
                        id: user_id,
                        name,
                        email,
                    },
                )
                .await
                .context("Failed to save session")?;
            println!("Signed in as user {}", user_id);
        }
        Commands::Logout => {
            session.clear().await.context("Failed to clear session")?;
            println!("Signed out");
        }
        Commands::Items { command } => run_items(&items_api, command).await?,
        Commands::MySales { view, command } => {
            let mut page = MySalesPage::new(items_api, session.user().await);
            page.set_view(view.into());
            page.load().await;
            report(&mut page)?;

            match command {
                None => {}
                Some(MySalesCommand::Status { id, status }) => {
                    let current = find_own_item(&page, id)?;
                    let options = page.status_options(id);
                    if !options.contains(&status) {
                        bail!(
                            "Item {} is {}; available choices: {}",
                            id,
                            current.status.label(),
                            options
                                .iter()
                                .map(|s| s.label())
                                .collect::<Vec<_>>()
                                .join(", ")
                        );
                    }
                    page.change_status(id, status).await;
                    report(&mut page)?;
                }
                Some(MySalesCommand::Delete { id, yes }) => {
                    let item = find_own_item(&page, id)?;
                    page.request_delete(&item);
                    if yes {
                        page.confirm_delete().await;
                        report(&mut page)?;
                    } else {
                        println!(
                            "Delete \"{}\"? This cannot be undone. Re-run with --yes to confirm.",
                            item.title
                        );
                        page.cancel_delete();
                    }
                }
            }

            render(&page);
        }
    }

    Ok(())
}

async fn run_items(items_api: &ItemService<ApiClient>, command: ItemsCommand) -> anyhow::Result<()> {
    match command {
        ItemsCommand::List => {
            for item in items_api.list_all().await? {
                print_item(&item);
            }
        }
        ItemsCommand::Show { id } => print_item_details(&items_api.get(id).await?),
        ItemsCommand::Create {
            title,
            description,
            price,
            status,
            image_url,
        } => {
            if price < 0.0 {
                bail!("Price must not be negative");
            }
            let available = status.as_ref().map(|s| *s == ItemStatus::Available);
            let item = items_api
                .create(&CreateItem {
                    title,
                    description,
                    price,
                    available,
                    status,
                    image_url,
                })
                .await?;
            print_item(&item);
        }
        ItemsCommand::Update {
            id,
            title,
            description,
            price,
            image_url,
        } => {
            let update = UpdateItem {
                title,
                description,
                price,
                image_url,
                ..Default::default()
            };
            if update.is_empty() {
                bail!("Nothing to update");
            }
            print_item(&items_api.update(id, &update).await?);
        }
        ItemsCommand::Delete { id } => {
            items_api.delete(id).await?;
            println!("Item {} deleted", id);
        }
        ItemsCommand::Status { id, status } => {
            print_item(&items_api.update_status(id, status).await?)
        }
        ItemsCommand::Reserve { id } => print_item(&items_api.reserve(id).await?),
        ItemsCommand::Buy { id } => print_item(&items_api.buy(id).await?),
    }
    Ok(())
}

fn find_own_item<T: desapega::Transport>(page: &MySalesPage<T>, id: ItemId) -> anyhow::Result<Item> {
    page.items()
        .iter()
        .find(|item| item.id == id)
        .cloned()
        .with_context(|| format!("Item {} is not one of your listings", id))
}

/// Prints queued notices and turns error notices into a failed exit.
fn report<T: desapega::Transport>(page: &mut MySalesPage<T>) -> anyhow::Result<()> {
    let mut failed = false;
    for notice in page.take_notices() {
        match notice.level {
            NoticeLevel::Success => println!("{}", notice.message),
            NoticeLevel::Error => {
                eprintln!("{}", notice.message);
                failed = true;
            }
        }
    }
    if let Some(Navigation::Login) = page.take_navigation() {
        eprintln!("Session expired or missing. Run `desapega login` first.");
    }
    if failed {
        bail!("Action failed");
    }
    Ok(())
}

fn render<T: desapega::Transport>(page: &MySalesPage<T>) {
    println!("{}", page.view().label());
    if page.items().is_empty() {
        println!("  No items found");
        return;
    }
    for item in page.items() {
        print_item(item);
    }
}

fn print_item(item: &Item) {
    println!(
        "  #{:<5} {:<16} {:<14} R$ {:>9.2}  {}",
        item.id,
        item.listed_on(),
        item.status.label(),
        item.price,
        item.title
    );
}

fn print_item_details(item: &Item) {
    println!("#{} {}", item.id, item.title);
    println!("  status:      {}", item.status.label());
    println!("  price:       R$ {:.2}", item.price);
    println!("  description: {}", item.description);
    println!("  owner:       {} <{}>", item.owner.name, item.owner.email);
    println!("  created:     {}", item.created_at.to_rfc3339());
    if let Some(url) = &item.image_url {
        println!("  image:       {}", url);
    }
}
