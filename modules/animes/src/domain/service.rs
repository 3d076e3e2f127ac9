use std::sync::Arc;

use crate::contract::model::{Anime, NewAnime};
use crate::domain::error::DomainError;
use crate::domain::repo::AnimesRepository;
use tracing::{debug, info, instrument, warn};

/// Domain service orchestrating anime operations against the repository port.
/// Depends only on the port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn AnimesRepository>,
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(repo: Arc<dyn AnimesRepository>) -> Self {
        Self { repo }
    }

    #[instrument(name = "animes.service.find_all", skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Anime>, DomainError> {
        debug!("Listing animes");

        let animes = self.repo.find_all().await.map_err(storage)?;
        debug!("Listed {} animes", animes.len());
        Ok(animes)
    }

    /// Load one anime; an empty storage result becomes `AnimeNotFound`.
    #[instrument(name = "animes.service.find_by_id", skip(self), fields(anime_id = id))]
    pub async fn find_by_id(&self, id: i32) -> Result<Anime, DomainError> {
        debug!("Getting anime by id");

        let anime = self
            .repo
            .find_by_id(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::anime_not_found(id))?;
        debug!("Successfully retrieved anime");
        Ok(anime)
    }

    /// Persist a new anime. The name is checked by the REST validation layer.
    #[instrument(name = "animes.service.create", skip(self), fields(name = %new_anime.name))]
    pub async fn create(&self, new_anime: NewAnime) -> Result<Anime, DomainError> {
        info!("Creating new anime");

        let anime = self
            .repo
            .save(Anime::from(new_anime))
            .await
            .map_err(storage)?;

        info!("Successfully created anime with id={:?}", anime.id);
        Ok(anime)
    }

    /// Replace the stored record under `anime.id` with `anime`.
    ///
    /// Existence is checked first so a missing id is a `AnimeNotFound`,
    /// never an upsert.
    #[instrument(name = "animes.service.update", skip(self), fields(anime_id = ?anime.id))]
    pub async fn update(&self, anime: Anime) -> Result<(), DomainError> {
        info!("Updating anime");

        let Some(id) = anime.id else {
            return Err(DomainError::validation("id", "an id is required to update"));
        };

        self.find_by_id(id).await?;
        self.repo.save(anime).await.map_err(storage)?;

        info!("Successfully updated anime");
        Ok(())
    }

    #[instrument(name = "animes.service.delete", skip(self), fields(anime_id = id))]
    pub async fn delete(&self, id: i32) -> Result<(), DomainError> {
        info!("Deleting anime");

        let anime = self.find_by_id(id).await?;
        self.repo.delete(&anime).await.map_err(storage)?;

        info!("Successfully deleted anime");
        Ok(())
    }

    /// Persist all records with a single bulk call, then validate them.
    ///
    /// Write-then-validate: the first persisted record with a blank name
    /// fails the call with `InvalidName`, but nothing already written is
    /// rolled back. Callers must re-fetch to reconcile after a failure.
    #[instrument(name = "animes.service.save_batch", skip(self, batch), fields(batch_len = batch.len()))]
    pub async fn save_batch(&self, batch: Vec<NewAnime>) -> Result<Vec<Anime>, DomainError> {
        info!("Saving anime batch");

        let saved = self
            .repo
            .save_all(batch.into_iter().map(Anime::from).collect())
            .await
            .map_err(storage)?;

        if let Some((position, invalid)) = saved.iter().enumerate().find(|(_, a)| a.has_blank_name())
        {
            warn!(
                position,
                anime_id = ?invalid.id,
                persisted = saved.len(),
                "Batch contains a blank name; persisted records are kept"
            );
            return Err(DomainError::invalid_name(position, invalid.id));
        }

        info!("Successfully saved {} animes", saved.len());
        Ok(saved)
    }
}

fn storage(e: anyhow::Error) -> DomainError {
    DomainError::storage(format!("{e:#}"))
}
