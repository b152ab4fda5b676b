use chrono::Utc;
use dotenvy::dotenv;
use pet_pantry::{
    config::{database, seed, settings::AppSettings},
    core::{
        checkout::{self, DEFAULT_PACKAGE_ID},
        inventory::{self, FeedingStatus},
        recipe,
        source::MockPetSource,
        store::PetStore,
        system_state::SystemStateStore,
    },
    errors::{Error, Result},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    let settings = AppSettings::from_env()
        .inspect_err(|e| error!("Invalid settings: {}", e))?;

    // 3. Open the key-value storage
    if settings.database_url == database::DEFAULT_DATABASE_URL {
        std::fs::create_dir_all("data")?;
    }
    let db = database::create_connection(&settings.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))?;

    // 4. Load seed data for the mock data source
    let seed = seed::load_seed(&settings.seed_path)
        .inspect_err(|e| error!("Failed to load seed data: {}", e))?;

    // 5. Build the store and run the startup fetch
    let store = PetStore::new(seed.user, SystemStateStore::new(db));
    let loading = store.spawn_initialization(MockPetSource::new(seed.pets, settings.fetch_latency));
    info!("Loading pets for {}...", store.user().name);
    loading.await.map_err(|e| Error::Fetch {
        message: e.to_string(),
    })??;

    // 6. Summarize what the home screen would show
    let Some(pet) = store.current_pet().await else {
        info!("No pets yet - onboarding would start here.");
        store.dispose();
        return Ok(());
    };

    let status = FeedingStatus::for_pet(&pet);
    let food = inventory::food_breakdown(&pet);
    info!(
        "Current pet: {} ({}), {} days of food ({:?}), {:.1}kg left, {:.1}kg eaten",
        pet.name, pet.id, pet.inventory_days, status, food.remaining_kg, food.consumed_kg
    );

    if pet.recipe.is_none() {
        let options = recipe::generate_recipe_options(
            &pet,
            Utc::now().timestamp_millis(),
            Utc::now().date_naive(),
        );
        info!(
            "No plan yet; would offer '{}' or '{}'",
            options.recommended.name, options.alternative.name
        );
    } else if status.needs_reorder() {
        warn!("{} is running low on food", pet.name);
    }

    let breakdown = checkout::ingredient_breakdown(&pet);
    info!(
        "Ingredients: {}% meat, {}% vegetables, {}% micronutrients",
        breakdown.meat, breakdown.vegetable, breakdown.micronutrients
    );
    for quote in checkout::quote_all(&pet) {
        info!(
            "  {} ({} days): {:.1}kg for ¥{}",
            quote.package.name, quote.package.duration_days, quote.weight_kg, quote.price
        );
    }
    info!(
        "Default order: {}",
        checkout::summarize_order(&pet, DEFAULT_PACKAGE_ID).describe()
    );

    store.dispose();
    Ok(())
}
