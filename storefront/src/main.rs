//! Storefront demo
//!
//! Runs one shopping session against the configured catalog API:
//! search (debounced), scroll to the next page (throttled), favorite a
//! product, fill the cart and check out.
//!
//! # Usage
//!
//! ```bash
//! # Search for "phone" against dummyjson.com
//! cargo run --bin storefront -- phone
//!
//! # Point at another catalog and expose metrics
//! STOREFRONT_CATALOG_URL=http://localhost:8080 STOREFRONT_METRICS=1 cargo run --bin storefront
//! ```

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use storefront::{
    CatalogAction, CatalogEnvironment, CatalogReducer, CatalogState, CatalogStore, LoadStatus,
};
use storefront_catalog::{CatalogConfig, HttpCatalogClient};
use storefront_runtime::metrics::MetricsRecorder;
use storefront_runtime::rate_limit::{Debouncer, Throttle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Upper bound for any single step of the demo
const STEP_TIMEOUT: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=debug,storefront_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut recorder = MetricsRecorder::new();
    if std::env::var("STOREFRONT_METRICS").is_ok_and(|v| v == "1" || v == "true") {
        recorder.install().context("installing metrics recorder")?;
    }

    let config = CatalogConfig::from_env().context("loading catalog configuration")?;
    tracing::info!(base_url = %config.base_url, page_size = config.page_size, "Catalog configured");
    let client = HttpCatalogClient::new(config).context("building catalog client")?;

    let store: CatalogStore = CatalogStore::new(
        CatalogState::new(),
        CatalogReducer::new(),
        CatalogEnvironment::new(Arc::new(client)),
    );

    spawn_notification_logger(&store);

    // ========== Search ==========

    let term = std::env::args().nth(1).unwrap_or_default();
    println!("🔎 Searching for {term:?}");
    search_as_you_type(&store, &term).await?;
    print_listing(&store).await;

    // ========== Scroll ==========

    println!("\n📜 Scrolling to the end of the list...");
    let throttle = Throttle::default();
    let mut handles = Vec::new();
    for _ in 0..5 {
        if throttle.try_acquire() {
            handles.push(store.send(CatalogAction::LoadNextPage).await?);
        }
    }
    for mut handle in handles {
        handle.wait_with_timeout(STEP_TIMEOUT).await?;
    }
    print_listing(&store).await;

    let products = store.state(|s| s.product_list_data().products.clone()).await;
    let (Some(first), Some(second)) = (products.first(), products.get(1)) else {
        println!("\nNot enough products to fill a cart, done.");
        store.shutdown(STEP_TIMEOUT).await?;
        return Ok(());
    };

    // ========== Favorites ==========

    store
        .send(CatalogAction::AddOrRemoveFavorite {
            product: Arc::clone(first),
        })
        .await?;
    let favorite = store.state(|s| s.is_favorite(first.id)).await;
    println!("\n❤️  {} is favorite: {favorite}", first.title);

    // ========== Cart ==========

    println!("\n🛒 Filling the cart...");
    for product in [first, second] {
        store
            .send(CatalogAction::AddOrRemoveToCart {
                product: Arc::clone(product),
            })
            .await?;
    }
    store
        .send(CatalogAction::AddMoreItem {
            product: Arc::clone(first),
        })
        .await?;
    store
        .send(CatalogAction::RemoveItem {
            product: Arc::clone(second),
        })
        .await?;

    // Quantity change on a product that is no longer in the cart
    store
        .send(CatalogAction::AddMoreItem {
            product: Arc::clone(second),
        })
        .await?
        .wait_with_timeout(STEP_TIMEOUT)
        .await?;

    let lines = store.state(|s| s.cart_item_list().clone()).await;
    for line in &lines {
        println!("  {:>3} × {:<40} {:>10.2}", line.count, line.product.title, line.line_total());
    }

    // ========== Checkout ==========

    let confirmed = store
        .send_and_wait_for(
            CatalogAction::Checkout,
            |action| matches!(action, CatalogAction::CheckoutConfirmed { .. }),
            STEP_TIMEOUT,
        )
        .await?;
    if let CatalogAction::CheckoutConfirmed { summary } = confirmed {
        println!("\n🧾 Checkout");
        println!("  Items:    {:>10}", summary.item_count);
        println!("  Subtotal: {:>10.2}", summary.subtotal);
        println!("  Delivery: {:>10.2}", summary.delivery_fee);
        println!("  Total:    {:>10.2}", summary.total);
    }

    if let Some(rendered) = recorder.render() {
        println!("\n📈 Metrics\n{rendered}");
    }

    store.shutdown(STEP_TIMEOUT).await?;
    Ok(())
}

/// Dispatch one search per typed prefix through the debouncer; only the full term is sent
async fn search_as_you_type(store: &CatalogStore, term: &str) -> anyhow::Result<()> {
    let debouncer = Debouncer::default();
    let mut prefixes: Vec<String> = term
        .char_indices()
        .map(|(i, c)| term[..i + c.len_utf8()].to_string())
        .collect();
    if prefixes.is_empty() {
        prefixes.push(String::new());
    }

    let mut last = None;
    for prefix in prefixes {
        let store = store.clone();
        last = Some(debouncer.call(move || async move {
            match store.send(CatalogAction::search(prefix)).await {
                Ok(mut handle) => {
                    if let Err(error) = handle.wait_with_timeout(STEP_TIMEOUT).await {
                        tracing::warn!(%error, "Search did not settle");
                    }
                },
                Err(error) => tracing::warn!(%error, "Search rejected"),
            }
        }));
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    if let Some(task) = last {
        task.await.context("search task failed")?;
    }
    Ok(())
}

/// Print failures and missing cart lines as they are broadcast
fn spawn_notification_logger(store: &CatalogStore) {
    let mut actions = store.subscribe_actions();
    tokio::spawn(async move {
        while let Ok(action) = actions.recv().await {
            match action {
                CatalogAction::ProductListingFailed { error, .. } => {
                    println!("⚠️  {} ({})", error.message, error.status_code);
                },
                CatalogAction::ItemNotFound { id } => {
                    println!("⚠️  Product {id} is not in the cart");
                },
                _ => {},
            }
        }
    });
}

async fn print_listing(store: &CatalogStore) {
    let (status, held, total) = store
        .state(|s| {
            (
                s.product_list_loading(),
                s.product_list_data().len(),
                s.product_list_data().total,
            )
        })
        .await;

    match status {
        LoadStatus::Failed => println!("  Listing failed, showing {held} cached products"),
        _ => println!("  {held} of {total} products loaded"),
    }
}
