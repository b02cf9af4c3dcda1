// Bootstrap entry point for the economy database.
//
// This file's job is to:
// 1. Load configuration
// 2. Open the database and run schema bootstrap
// 3. Report what the catalog holds, then shut the pool down cleanly
//
// The chat transport and command handlers live outside this crate and
// build their stores from the same `Database` handle.

use chatbot_economy::core::catalog::CatalogService;
use chatbot_economy::core::permissions::{PermissionResolver, Rank};
use chatbot_economy::infra::catalog::SqliteCatalogStore;
use chatbot_economy::{AppConfig, Database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;
    tracing::info!(path = %config.database_path.display(), "Opening economy database");

    // Bootstrap failure is fatal: nothing can run without the schema
    let db = Database::open(&config.database_path).await?;
    db.initialize().await?;

    let catalog = CatalogService::new(SqliteCatalogStore::new(db.pool()));
    for chest in catalog.chests().await? {
        tracing::info!(
            chest = %chest.name,
            price = chest.price,
            rank = %chest.rank_required,
            "Chest available"
        );
    }

    let resolver = PermissionResolver::new(config.ranks.clone());
    for rank in Rank::HIERARCHY {
        let name = rank.as_str();
        let chests = catalog.chests_for(name).await?;
        tracing::debug!(
            rank = name,
            display_name = resolver.rank_display_name(name),
            permissions = resolver.rank_permission_set(name).len(),
            chests = chests.len(),
            "Rank summary"
        );
    }

    let shop_items = catalog.shop_items().await?;
    tracing::info!(shop_items = shop_items.len(), "Economy core ready");

    db.close().await;
    Ok(())
}
