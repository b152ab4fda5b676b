//! Pet collection store - the single source of truth for the pet list, the
//! active selection and the account holder.
//!
//! [`PetStore`] is a cheap cloneable handle over shared state. Screens hold a
//! clone and read consistent snapshots through it; the startup fetch can run
//! on a spawned task while readers observe [`LoadState::Loading`].
//!
//! Only the selected pet id is persisted, under
//! [`LAST_VIEWED_PET_KEY`](crate::core::ports::LAST_VIEWED_PET_KEY). Pets
//! themselves live for the session.

use crate::{
    core::{
        ports::{KeyValueStore, LAST_VIEWED_PET_KEY, PetSource},
        selection,
    },
    errors::{Error, Result},
    models::{Pet, User},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Whether the initial fetch has completed.
///
/// An empty pet list while `Loading` means "not known yet", not "no pets".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Initial fetch pending (or failed; there is no retry)
    Loading,
    /// Pets fetched and initial selection resolved
    Ready,
}

/// Result of a mutation addressed at a pet id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum MutationOutcome {
    /// The pet was found and the change was made
    Applied,
    /// No pet has that id; nothing changed
    NotFound,
}

impl MutationOutcome {
    /// True when the change was made.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// A consistent copy of the store contents at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    /// Pets in insertion order
    pub pets: Vec<Pet>,
    /// Id of the pet in focus
    pub selected_id: Option<String>,
    /// The account holder
    pub user: User,
    /// Whether the initial fetch has completed
    pub load_state: LoadState,
}

impl StoreSnapshot {
    /// The selected pet, if the selection names one.
    #[must_use]
    pub fn current_pet(&self) -> Option<&Pet> {
        selection::lookup(self.selected_id.as_deref(), &self.pets)
    }

    /// True when at least one pet exists.
    #[must_use]
    pub fn has_pets(&self) -> bool {
        !self.pets.is_empty()
    }
}

#[derive(Debug)]
struct StoreState {
    pets: Vec<Pet>,
    selected_id: Option<String>,
    load_state: LoadState,
    init_started: bool,
}

/// Handle to the pet collection store.
///
/// Created once per session with [`PetStore::new`], populated once with
/// [`PetStore::initialize`], and released with [`PetStore::dispose`].
#[derive(Debug)]
pub struct PetStore<K> {
    state: Arc<RwLock<StoreState>>,
    storage: Arc<K>,
    user: Arc<User>,
}

impl<K> Clone for PetStore<K> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            storage: Arc::clone(&self.storage),
            user: Arc::clone(&self.user),
        }
    }
}

impl<K: KeyValueStore> PetStore<K> {
    /// Creates an empty store in the loading state.
    pub fn new(user: User, storage: K) -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState {
                pets: Vec::new(),
                selected_id: None,
                load_state: LoadState::Loading,
                init_started: false,
            })),
            storage: Arc::new(storage),
            user: Arc::new(user),
        }
    }

    /// Runs the startup protocol: fetch the pets, then resolve the initial
    /// selection from the persisted id or the lowest inventory.
    ///
    /// Runs at most once per store. A failed fetch leaves the store loading
    /// and is returned to the caller; a failed read of the persisted id is
    /// treated as no persisted id. The resolved selection is not written back.
    ///
    /// # Errors
    /// - [`Error::AlreadyInitialized`] if initialization was already attempted
    /// - whatever the source returns if the fetch fails
    pub async fn initialize<S: PetSource>(&self, source: &S) -> Result<()> {
        {
            let mut state = self.state.write().await;
            if state.init_started {
                return Err(Error::AlreadyInitialized);
            }
            state.init_started = true;
        }

        info!("Fetching initial pets...");
        let pets = source
            .fetch_initial_pets()
            .await
            .inspect_err(|e| error!("Initial pet fetch failed, store stays loading: {}", e))?;

        let persisted = match self.storage.get(LAST_VIEWED_PET_KEY).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Could not read persisted selection: {}", e);
                None
            }
        };
        let pets = dedup_by_id(pets);
        let selected_id = selection::resolve_initial_selection(&pets, persisted.as_deref());

        let mut state = self.state.write().await;
        info!(
            "Pet store ready with {} pets, selected: {:?}",
            pets.len(),
            selected_id
        );
        state.pets = pets;
        state.selected_id = selected_id;
        state.load_state = LoadState::Ready;
        Ok(())
    }

    /// Runs [`PetStore::initialize`] on a tokio task so the caller can render
    /// the loading state meanwhile.
    pub fn spawn_initialization<S>(&self, source: S) -> JoinHandle<Result<()>>
    where
        S: PetSource + 'static,
        K: 'static,
    {
        let store = self.clone();
        tokio::spawn(async move { store.initialize(&source).await })
    }

    /// Makes the pet with `id` the active selection and persists it.
    ///
    /// Returns [`MutationOutcome::NotFound`] without touching the selection
    /// or storage if no pet has that id, which is always the case while the
    /// store is loading. Storage failures are logged and do not undo the
    /// in-memory change.
    pub async fn select_pet(&self, id: &str) -> MutationOutcome {
        let mut state = self.state.write().await;
        if !state.pets.iter().any(|p| p.id == id) {
            debug!("Ignoring selection of unknown pet {}", id);
            return MutationOutcome::NotFound;
        }
        self.select_locked(&mut state, id).await;
        MutationOutcome::Applied
    }

    /// Appends `pet` and makes it the active selection.
    ///
    /// # Errors
    /// - [`Error::StillLoading`] before the initial fetch has completed,
    ///   since the fetched list would replace the new pet
    /// - [`Error::DuplicatePet`] if a pet with the same id exists
    ///
    /// Either way the store and storage are left unchanged.
    pub async fn add_pet(&self, pet: Pet) -> Result<()> {
        let mut state = self.state.write().await;
        if state.load_state == LoadState::Loading {
            return Err(Error::StillLoading);
        }
        if state.pets.iter().any(|p| p.id == pet.id) {
            return Err(Error::DuplicatePet { id: pet.id });
        }

        let id = pet.id.clone();
        info!("Adding pet {} ({})", pet.name, id);
        state.pets.push(pet);
        self.select_locked(&mut state, &id).await;
        Ok(())
    }

    /// Replaces the pet with the same id in place. Position and selection are
    /// unchanged.
    pub async fn update_pet(&self, pet: Pet) -> MutationOutcome {
        let id = pet.id.clone();
        self.modify_pet(&id, |_| pet).await
    }

    /// Replaces the pet with `id` by `f(current)` under one write lock, so no
    /// other change can land between the read and the write.
    ///
    /// The id of the returned pet is forced back to `id`.
    pub async fn modify_pet<F>(&self, id: &str, f: F) -> MutationOutcome
    where
        F: FnOnce(&Pet) -> Pet,
    {
        let mut state = self.state.write().await;
        let Some(slot) = state.pets.iter_mut().find(|p| p.id == id) else {
            debug!("Ignoring update of unknown pet {}", id);
            return MutationOutcome::NotFound;
        };

        debug!("Updating pet {}", id);
        let mut updated = f(&*slot);
        updated.id = id.to_string();
        *slot = updated;
        MutationOutcome::Applied
    }

    /// Sets the selection and writes it through while the caller holds the
    /// write lock, so persisted order matches call order.
    async fn select_locked(&self, state: &mut StoreState, id: &str) {
        state.selected_id = Some(id.to_string());
        if let Err(e) = self.storage.set(LAST_VIEWED_PET_KEY, id).await {
            warn!("Failed to persist selected pet {}: {}", id, e);
        }
    }

    /// The selected pet, recomputed from the current list on every call.
    pub async fn current_pet(&self) -> Option<Pet> {
        let state = self.state.read().await;
        selection::lookup(state.selected_id.as_deref(), &state.pets).cloned()
    }

    /// True when at least one pet exists. False while loading.
    pub async fn has_pets(&self) -> bool {
        !self.state.read().await.pets.is_empty()
    }

    /// All pets in insertion order.
    pub async fn pets(&self) -> Vec<Pet> {
        self.state.read().await.pets.clone()
    }

    /// The first pet with `id`.
    pub async fn pet(&self, id: &str) -> Option<Pet> {
        let state = self.state.read().await;
        selection::lookup(Some(id), &state.pets).cloned()
    }

    /// Id of the pet in focus.
    pub async fn selected_id(&self) -> Option<String> {
        self.state.read().await.selected_id.clone()
    }

    /// Whether the initial fetch has completed.
    pub async fn load_state(&self) -> LoadState {
        self.state.read().await.load_state
    }

    /// Shorthand for `load_state() == LoadState::Loading`.
    pub async fn is_loading(&self) -> bool {
        self.load_state().await == LoadState::Loading
    }

    /// Copies the whole store under one read lock.
    pub async fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.read().await;
        StoreSnapshot {
            pets: state.pets.clone(),
            selected_id: state.selected_id.clone(),
            user: (*self.user).clone(),
            load_state: state.load_state,
        }
    }

    /// The account holder.
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// The key-value storage the selection is persisted to.
    #[must_use]
    pub fn storage(&self) -> &K {
        &self.storage
    }

    /// Ends the session for this handle.
    pub fn dispose(self) {
        let others = Arc::strong_count(&self.state) - 1;
        info!("Disposing pet store handle ({} other handles alive)", others);
    }
}

/// Keeps the first pet for each id, in order.
fn dedup_by_id(pets: Vec<Pet>) -> Vec<Pet> {
    let mut unique: Vec<Pet> = Vec::with_capacity(pets.len());
    for pet in pets {
        if unique.iter().any(|p| p.id == pet.id) {
            warn!("Dropping fetched pet {} ({}): duplicate id", pet.name, pet.id);
            continue;
        }
        unique.push(pet);
    }
    unique
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::source::MockPetSource;
    use crate::core::system_state::SystemStateStore;
    use crate::test_utils::{
        FailingKeyValueStore, FailingPetSource, init_test_tracing, pet_with_inventory,
        sample_pet, sample_pets, sample_user, setup_ready_store, setup_store,
    };
    use std::time::Duration;

    async fn persisted(store: &PetStore<SystemStateStore>) -> Result<Option<String>> {
        store.storage().get(LAST_VIEWED_PET_KEY).await
    }

    #[tokio::test]
    async fn test_new_store_is_loading_and_empty() -> Result<()> {
        init_test_tracing();
        let store = setup_store().await?;

        assert!(store.is_loading().await);
        assert!(!store.has_pets().await);
        assert!(store.selected_id().await.is_none());
        assert!(store.current_pet().await.is_none());
        assert_eq!(store.user(), &sample_user());
        Ok(())
    }

    #[tokio::test]
    async fn test_initialize_selects_lowest_inventory() -> Result<()> {
        init_test_tracing();
        let store = setup_ready_store(sample_pets()).await?;

        assert_eq!(store.load_state().await, LoadState::Ready);
        assert_eq!(store.pets().await, sample_pets());
        let current = store.current_pet().await.unwrap();
        assert_eq!(current.inventory_days, 3);
        // Resolution alone does not write the key
        assert_eq!(persisted(&store).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_initialize_prefers_persisted_selection() -> Result<()> {
        init_test_tracing();
        let store = setup_store().await?;
        store.storage().set(LAST_VIEWED_PET_KEY, "d_003").await?;

        store
            .initialize(&MockPetSource::immediate(sample_pets()))
            .await?;

        let current = store.current_pet().await.unwrap();
        assert_eq!(current.id, "d_003");
        assert_eq!(current.inventory_days, 8);
        Ok(())
    }

    #[tokio::test]
    async fn test_initialize_ignores_stale_persisted_selection() -> Result<()> {
        init_test_tracing();
        let store = setup_store().await?;
        store.storage().set(LAST_VIEWED_PET_KEY, "d_removed").await?;

        store
            .initialize(&MockPetSource::immediate(sample_pets()))
            .await?;

        assert_eq!(store.selected_id().await.as_deref(), Some("d_001"));
        Ok(())
    }

    #[tokio::test]
    async fn test_initialize_with_no_pets_leaves_selection_empty() -> Result<()> {
        init_test_tracing();
        let store = setup_ready_store(Vec::new()).await?;

        assert_eq!(store.load_state().await, LoadState::Ready);
        assert!(!store.has_pets().await);
        assert!(store.selected_id().await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_initialize_runs_once() -> Result<()> {
        init_test_tracing();
        let store = setup_ready_store(sample_pets()).await?;

        let result = store
            .initialize(&MockPetSource::immediate(vec![sample_pet("d_999", "Late", 1)]))
            .await;
        assert!(matches!(result, Err(Error::AlreadyInitialized)));
        assert_eq!(store.pets().await, sample_pets());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_store_loading() -> Result<()> {
        init_test_tracing();
        let store = setup_store().await?;

        let result = store.initialize(&FailingPetSource).await;
        assert!(matches!(result, Err(Error::Fetch { .. })));
        assert!(store.is_loading().await);
        assert!(!store.has_pets().await);
        assert!(store.selected_id().await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_unreadable_storage_falls_back_to_lowest_inventory() -> Result<()> {
        init_test_tracing();
        let store = PetStore::new(sample_user(), FailingKeyValueStore);

        store
            .initialize(&MockPetSource::immediate(sample_pets()))
            .await?;

        assert_eq!(store.selected_id().await.as_deref(), Some("d_001"));
        Ok(())
    }

    #[tokio::test]
    async fn test_spawned_initialization_reports_loading_until_done() -> Result<()> {
        init_test_tracing();
        let store = setup_store().await?;

        let handle = store
            .spawn_initialization(MockPetSource::new(sample_pets(), Duration::from_millis(50)));
        assert!(store.is_loading().await);
        assert!(!store.has_pets().await);

        handle.await.unwrap()?;
        assert_eq!(store.load_state().await, LoadState::Ready);
        assert_eq!(store.pets().await.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_mutations_while_loading_change_nothing() -> Result<()> {
        init_test_tracing();
        let store = setup_store().await?;

        let handle = store
            .spawn_initialization(MockPetSource::new(sample_pets(), Duration::from_millis(30)));
        let result = store.add_pet(sample_pet("d_new", "Early", 1)).await;
        assert!(matches!(result, Err(Error::StillLoading)));
        assert_eq!(store.select_pet("d_001").await, MutationOutcome::NotFound);
        assert_eq!(
            store.update_pet(sample_pet("d_001", "Early", 1)).await,
            MutationOutcome::NotFound
        );
        assert!(!store.has_pets().await);

        handle.await.unwrap()?;
        assert_eq!(store.pets().await, sample_pets());
        assert_eq!(store.selected_id().await.as_deref(), Some("d_001"));
        assert_eq!(persisted(&store).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_after_failed_fetch_is_rejected() -> Result<()> {
        init_test_tracing();
        let store = setup_store().await?;
        assert!(store.initialize(&FailingPetSource).await.is_err());

        let result = store.add_pet(sample_pet("d_new", "Orphan", 1)).await;
        assert!(matches!(result, Err(Error::StillLoading)));
        assert_eq!(persisted(&store).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_initialize_keeps_first_of_duplicate_ids() -> Result<()> {
        init_test_tracing();
        let mut later = sample_pet("d_dup", "Second", 1);
        later.breed = "Beagle".to_string();
        let store = setup_ready_store(vec![
            sample_pet("d_dup", "First", 3),
            sample_pet("d_other", "Other", 2),
            later,
        ])
        .await?;

        let pets = store.pets().await;
        let ids: Vec<&str> = pets.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["d_dup", "d_other"]);
        assert_eq!(pets[0].name, "First");
        // The dropped copy no longer takes part in the lowest-inventory pick
        assert_eq!(store.selected_id().await.as_deref(), Some("d_other"));

        let mut renamed = pets[0].clone();
        renamed.name = "Renamed".to_string();
        assert!(store.update_pet(renamed).await.is_applied());
        let names: Vec<String> = store.pets().await.into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Renamed", "Other"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_modify_pet_reads_and_writes_under_one_lock() -> Result<()> {
        init_test_tracing();
        let store = setup_ready_store(sample_pets()).await?;

        let outcome = store
            .modify_pet("d_002", |pet| Pet {
                id: "d_hijack".to_string(),
                inventory_days: pet.inventory_days + 7,
                ..pet.clone()
            })
            .await;

        assert!(outcome.is_applied());
        let stored = store.pet("d_002").await.unwrap();
        assert_eq!(stored.inventory_days, 21);
        assert!(store.pet("d_hijack").await.is_none());
        assert_eq!(
            store.modify_pet("d_404", Pet::clone).await,
            MutationOutcome::NotFound
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_select_pet_updates_current_and_persists() -> Result<()> {
        init_test_tracing();
        let store = setup_ready_store(sample_pets()).await?;

        assert_eq!(store.select_pet("d_002").await, MutationOutcome::Applied);
        assert_eq!(store.current_pet().await.unwrap().id, "d_002");
        assert_eq!(persisted(&store).await?.as_deref(), Some("d_002"));
        Ok(())
    }

    #[tokio::test]
    async fn test_select_pet_twice_is_idempotent() -> Result<()> {
        init_test_tracing();
        let store = setup_ready_store(sample_pets()).await?;

        assert!(store.select_pet("d_003").await.is_applied());
        let before = store.snapshot().await;
        assert!(store.select_pet("d_003").await.is_applied());

        assert_eq!(store.snapshot().await, before);
        assert_eq!(persisted(&store).await?.as_deref(), Some("d_003"));
        Ok(())
    }

    #[tokio::test]
    async fn test_select_unknown_pet_changes_nothing() -> Result<()> {
        init_test_tracing();
        let store = setup_ready_store(sample_pets()).await?;
        let before = store.snapshot().await;

        assert_eq!(store.select_pet("d_404").await, MutationOutcome::NotFound);
        assert_eq!(store.snapshot().await, before);
        assert_eq!(persisted(&store).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_select_survives_storage_failure() -> Result<()> {
        init_test_tracing();
        let store = PetStore::new(sample_user(), FailingKeyValueStore);
        store
            .initialize(&MockPetSource::immediate(sample_pets()))
            .await?;

        assert!(store.select_pet("d_002").await.is_applied());
        assert_eq!(store.selected_id().await.as_deref(), Some("d_002"));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_pets_preserves_call_order() -> Result<()> {
        init_test_tracing();
        let store = setup_ready_store(Vec::new()).await?;

        for (i, id) in ["p1", "p2", "p3", "p4"].iter().enumerate() {
            store.add_pet(pet_with_inventory(id, 0)).await?;
            assert_eq!(store.pets().await.len(), i + 1);
        }

        let ids: Vec<String> = store.pets().await.into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3", "p4"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_pet_selects_and_persists_new_pet() -> Result<()> {
        init_test_tracing();
        let store = setup_ready_store(sample_pets()).await?;
        let existing = store.pets().await;

        store.add_pet(sample_pet("d_004", "Clover", 0)).await?;

        let pets = store.pets().await;
        assert_eq!(&pets[..3], &existing[..]);
        assert_eq!(store.current_pet().await.unwrap().id, "d_004");
        assert_eq!(persisted(&store).await?.as_deref(), Some("d_004"));
        Ok(())
    }

    #[tokio::test]
    async fn test_first_pet_moves_store_out_of_unselected() -> Result<()> {
        init_test_tracing();
        let store = setup_ready_store(Vec::new()).await?;
        assert!(store.current_pet().await.is_none());

        store.add_pet(sample_pet("d_100", "Solo", 0)).await?;

        assert!(store.has_pets().await);
        assert_eq!(store.selected_id().await.as_deref(), Some("d_100"));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_duplicate_id_is_rejected() -> Result<()> {
        init_test_tracing();
        let store = setup_ready_store(sample_pets()).await?;
        assert!(store.select_pet("d_002").await.is_applied());
        let before = store.snapshot().await;

        let result = store.add_pet(sample_pet("d_001", "Impostor", 0)).await;

        assert!(matches!(result, Err(Error::DuplicatePet { id }) if id == "d_001"));
        assert_eq!(store.snapshot().await, before);
        assert_eq!(persisted(&store).await?.as_deref(), Some("d_002"));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_pet_replaces_in_place() -> Result<()> {
        init_test_tracing();
        let store = setup_ready_store(sample_pets()).await?;
        let selected_before = store.selected_id().await;

        let mut renamed = store.pet("d_002").await.unwrap();
        renamed.name = "Maple Syrup".to_string();
        renamed.current_weight = 25.5;
        assert!(store.update_pet(renamed.clone()).await.is_applied());

        let pets = store.pets().await;
        assert_eq!(pets.len(), 3);
        assert_eq!(pets[1], renamed);
        assert_eq!(pets[0].id, "d_001");
        assert_eq!(pets[2].id, "d_003");
        assert_eq!(store.selected_id().await, selected_before);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_pet_is_visible_through_current_pet() -> Result<()> {
        init_test_tracing();
        let store = setup_ready_store(sample_pets()).await?;

        let mut current = store.current_pet().await.unwrap();
        current.inventory_days = 30;
        assert!(store.update_pet(current).await.is_applied());

        assert_eq!(store.current_pet().await.unwrap().inventory_days, 30);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_unknown_pet_is_noop() -> Result<()> {
        init_test_tracing();
        let store = setup_ready_store(sample_pets()).await?;
        let before = store.snapshot().await;

        let outcome = store.update_pet(sample_pet("d_404", "Ghost", 1)).await;

        assert_eq!(outcome, MutationOutcome::NotFound);
        assert_eq!(store.snapshot().await, before);
        Ok(())
    }

    #[tokio::test]
    async fn test_snapshot_helpers() -> Result<()> {
        init_test_tracing();
        let store = setup_ready_store(sample_pets()).await?;

        let snapshot = store.snapshot().await;
        assert!(snapshot.has_pets());
        assert_eq!(snapshot.current_pet().unwrap().id, "d_001");
        assert_eq!(snapshot.user, sample_user());
        Ok(())
    }

    #[tokio::test]
    async fn test_clones_share_state() -> Result<()> {
        init_test_tracing();
        let store = setup_ready_store(sample_pets()).await?;
        let other = store.clone();

        other.add_pet(sample_pet("d_010", "Shared", 2)).await?;
        other.dispose();

        assert_eq!(store.pets().await.len(), 4);
        assert_eq!(store.selected_id().await.as_deref(), Some("d_010"));
        Ok(())
    }
}
