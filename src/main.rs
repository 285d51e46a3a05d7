//! Campus Canteen Admin - console for the orders and menu screens

use anyhow::{Context, Result};
use campus_canteen::display::{items_summary, time_ago};
use campus_canteen::lifecycle::{self, StatusFilter};
use campus_canteen::menu::{self, CategoryFilter};
use campus_canteen::store::{self, CanteenStore};
use campus_canteen::{find_order_mut, AppConfig, MenuItemDraft, Order, StoreBackend};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Storage backend (overrides CANTEEN_STORE)
    #[arg(long, value_enum)]
    store: Option<StoreBackend>,

    /// Data directory (overrides CANTEEN_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage customer orders
    #[command(subcommand)]
    Orders(OrdersCommand),
    /// Manage the menu catalogue
    #[command(subcommand)]
    Menu(MenuCommand),
}

#[derive(Subcommand, Debug)]
enum OrdersCommand {
    /// List orders, newest first
    List {
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one order in full
    Show { id: String },
    /// Print the dashboard counters
    Stats,
    /// Move an order to a new status
    SetStatus { id: String, status: String },
    /// Cancel an order with a reason
    Cancel { id: String, reason: String },
    /// Re-read the store on an interval and print the counters
    Watch,
}

#[derive(Subcommand, Debug)]
enum MenuCommand {
    /// List menu items
    List {
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
        #[arg(long)]
        search: Option<String>,
    },
    /// Print the catalogue counters
    Stats,
    /// Add a new item
    Add(ItemFields),
    /// Edit an existing item; omitted fields keep their value
    Edit {
        id: u64,
        #[command(flatten)]
        fields: ItemFields,
    },
    /// Delete an item
    Delete { id: u64 },
}

#[derive(Args, Debug, Default)]
struct ItemFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    price: Option<Decimal>,
    #[arg(long)]
    stock: Option<u32>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    image: Option<String>,
    #[arg(long)]
    available: Option<bool>,
    #[arg(long)]
    popular: Option<bool>,
}

impl ItemFields {
    fn merge_into(self, mut draft: MenuItemDraft) -> MenuItemDraft {
        if let Some(v) = self.name { draft.name = v; }
        if let Some(v) = self.category { draft.category = v; }
        if let Some(v) = self.price { draft.price = v; }
        if let Some(v) = self.stock { draft.stock = v; }
        if let Some(v) = self.description { draft.description = v; }
        if let Some(v) = self.image { draft.image = v; }
        if let Some(v) = self.available { draft.available = v; }
        if let Some(v) = self.popular { draft.popular = v; }
        draft
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(backend) = cli.store { config.store = backend; }
    if let Some(dir) = cli.data_dir { config.data_dir = dir; }
    tracing::debug!(?config, "configuration loaded");

    let store = store::open(&config);
    if !store.is_persistent() {
        tracing::warn!(backend = ?config.store, "changes made in this session are not saved");
    }

    match cli.command {
        Command::Orders(cmd) => run_orders(cmd, store.as_ref(), &config).await,
        Command::Menu(cmd) => run_menu(cmd, store.as_ref(), &config),
    }
}

async fn run_orders(cmd: OrdersCommand, store: &dyn CanteenStore, config: &AppConfig) -> Result<()> {
    match cmd {
        OrdersCommand::List { status, search } => {
            let orders = store.load_orders()?;
            let filtered = lifecycle::filter_by_status(&orders, status);
            let matched = match search.as_deref() {
                Some(term) => lifecycle::search_orders(filtered, term),
                None => filtered,
            };
            print_order_table(&lifecycle::sort_by_recency(matched), &config.currency);
        }
        OrdersCommand::Show { id } => {
            let orders = store.load_orders()?;
            let order = orders.iter().find(|o| o.id() == id).with_context(|| format!("order {id} not found"))?;
            print_order_details(order, &config.currency);
        }
        OrdersCommand::Stats => print_order_stats(&lifecycle::compute_statistics(&store.load_orders()?)),
        OrdersCommand::SetStatus { id, status } => {
            let mut orders = store.load_orders()?;
            let order = find_order_mut(&mut orders, &id)?;
            lifecycle::transition_status(order, &status)?;
            log_events(order);
            store.save_orders(&orders)?;
            println!("Order {id} status updated to {status}");
        }
        OrdersCommand::Cancel { id, reason } => {
            let mut orders = store.load_orders()?;
            let order = find_order_mut(&mut orders, &id)?;
            lifecycle::cancel_order(order, &reason)?;
            log_events(order);
            store.save_orders(&orders)?;
            println!("Order {id} cancelled");
        }
        OrdersCommand::Watch => {
            let mut ticker = tokio::time::interval(config.refresh_interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match store.load_orders() {
                            Ok(orders) => print_order_stats(&lifecycle::compute_statistics(&orders)),
                            Err(e) => tracing::error!(error = %e, "failed to refresh orders"),
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("stopping order watch");
                        break;
                    }
                }
            }
        }
    }
    Ok(())
}

fn run_menu(cmd: MenuCommand, store: &dyn CanteenStore, config: &AppConfig) -> Result<()> {
    match cmd {
        MenuCommand::List { category, search } => {
            let items = store.load_menu()?;
            let filtered = menu::filter_by_category(&items, &category);
            let matched = match search.as_deref() {
                Some(term) => menu::search_menu(filtered, term),
                None => filtered,
            };
            if matched.is_empty() {
                println!("No menu items found");
            }
            for item in matched {
                let stock = if item.is_in_stock() { format!("{} units", item.stock()) } else { "Out of Stock".to_string() };
                println!(
                    "{:<14} {:<24} {:<10} {} {:>8}  {:<14} {}{}",
                    item.id(),
                    item.name(),
                    item.category(),
                    config.currency,
                    item.price(),
                    stock,
                    if item.is_available() { "Available" } else { "Unavailable" },
                    if item.is_popular() { " *" } else { "" },
                );
            }
        }
        MenuCommand::Stats => {
            let stats = menu::menu_statistics(&store.load_menu()?);
            println!("Total items:   {}", stats.total);
            println!("Available:     {}", stats.available);
            println!("Out of stock:  {}", stats.out_of_stock);
            println!("Popular:       {}", stats.popular);
        }
        MenuCommand::Add(fields) => {
            let mut items = store.load_menu()?;
            let draft = fields.merge_into(MenuItemDraft { available: true, ..Default::default() });
            let event = menu::add_item(&mut items, &draft)?;
            store.save_menu(&items)?;
            tracing::info!(?event, "domain event");
            println!("Item added successfully!");
        }
        MenuCommand::Edit { id, fields } => {
            let mut items = store.load_menu()?;
            let current = items.iter().find(|i| i.id() == id).with_context(|| format!("menu item {id} not found"))?;
            let draft = fields.merge_into(current.to_draft());
            let event = menu::update_item(&mut items, id, &draft)?;
            store.save_menu(&items)?;
            tracing::info!(?event, "domain event");
            println!("Item updated successfully!");
        }
        MenuCommand::Delete { id } => {
            let mut items = store.load_menu()?;
            let event = menu::delete_item(&mut items, id)?;
            store.save_menu(&items)?;
            tracing::info!(?event, "domain event");
            println!("Item deleted successfully!");
        }
    }
    Ok(())
}

fn log_events(order: &mut Order) {
    for event in order.take_events() {
        tracing::info!(?event, "domain event");
    }
}

fn print_order_stats(stats: &lifecycle::OrderStatistics) {
    println!(
        "Pending: {}  Preparing: {}  Ready: {}  Completed today: {}",
        stats.pending, stats.preparing, stats.ready, stats.completed_today
    );
}

fn print_order_table(orders: &[&Order], currency: &str) {
    if orders.is_empty() {
        println!("No orders found");
        return;
    }
    let now = Utc::now();
    for order in orders {
        println!(
            "{:<26} {:<16} {:<52} {} {:>8}  {:<7} {:<10} {}",
            order.id(),
            order.customer().name,
            items_summary(order),
            currency,
            order.total_amount().normalize(),
            if order.payment_status() == campus_canteen::PaymentStatus::Paid { "Paid" } else { "COD" },
            order.status().label(),
            time_ago(order.order_time(), now),
        );
    }
}

fn print_order_details(order: &Order, currency: &str) {
    let customer = order.customer();
    println!("Order ID:    {}", order.id());
    println!("Status:      {}", order.status().label());
    println!("Order time:  {}", order.order_time().with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M"));
    println!("Student:     {} ({})", customer.name, customer.student_id);
    println!("Phone:       {}", customer.phone.as_deref().unwrap_or("-"));
    println!("Address:     {}", customer.address.as_deref().unwrap_or("-"));
    println!();
    for line in order.items() {
        println!(
            "  {:<24} x{:<3} {} {:>8}  {} {:>8}",
            line.name,
            line.quantity.value(),
            currency,
            line.unit_price,
            currency,
            line.line_total().normalize()
        );
    }
    println!("  Total amount: {} {}", currency, order.total_amount().normalize());
    println!();
    println!("Payment:     {} ({})", order.payment_method().as_str(), order.payment_status().as_str());
    println!("Notes:       {}", customer.notes.as_deref().unwrap_or("No special instructions"));
    if let (Some(reason), Some(at)) = (order.cancel_reason(), order.cancel_time()) {
        println!("Cancelled:   {} ({})", reason, at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M"));
    }
}
