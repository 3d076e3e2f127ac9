use crate::contract::model::Anime;
use async_trait::async_trait;

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
///
/// Absence is always `Ok(None)` / an empty vec, never an error.
/// Implementations must be safe to call from concurrent requests.
#[async_trait]
pub trait AnimesRepository: Send + Sync {
    /// List every stored anime.
    async fn find_all(&self) -> anyhow::Result<Vec<Anime>>;
    /// Load an anime by id.
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Anime>>;
    /// Insert when `anime.id` is `None`, otherwise replace the stored row.
    /// Returns the persisted record with its id populated.
    async fn save(&self, anime: Anime) -> anyhow::Result<Anime>;
    /// Persist all records as one unit; output order follows input order.
    async fn save_all(&self, animes: Vec<Anime>) -> anyhow::Result<Vec<Anime>>;
    /// Remove the stored row for `anime.id`.
    async fn delete(&self, anime: &Anime) -> anyhow::Result<()>;
}
