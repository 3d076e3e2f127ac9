//! In-process repository used by `--mock` runs and tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::contract::model::Anime;
use crate::domain::repo::AnimesRepository;

#[derive(Default)]
struct Table {
    rows: BTreeMap<i32, String>,
    last_id: i32,
}

impl Table {
    fn save(&mut self, anime: Anime) -> anyhow::Result<Anime> {
        let id = match anime.id {
            Some(id) => id,
            None => {
                self.last_id = self
                    .last_id
                    .checked_add(1)
                    .ok_or_else(|| anyhow::anyhow!("anime id sequence exhausted"))?;
                self.last_id
            }
        };
        self.rows.insert(id, anime.name.clone());
        Ok(anime.with_id(id))
    }
}

#[derive(Default)]
pub struct InMemoryAnimesRepository {
    table: RwLock<Table>,
}

impl InMemoryAnimesRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnimesRepository for InMemoryAnimesRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<Anime>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .map(|(id, name)| Anime::new(name.clone()).with_id(*id))
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Anime>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .get(&id)
            .map(|name| Anime::new(name.clone()).with_id(id)))
    }

    async fn save(&self, anime: Anime) -> anyhow::Result<Anime> {
        self.table.write().await.save(anime)
    }

    async fn save_all(&self, animes: Vec<Anime>) -> anyhow::Result<Vec<Anime>> {
        // One lock for the whole batch
        let mut table = self.table.write().await;
        animes.into_iter().map(|a| table.save(a)).collect()
    }

    async fn delete(&self, anime: &Anime) -> anyhow::Result<()> {
        let id = anime
            .id
            .ok_or_else(|| anyhow::anyhow!("cannot delete an anime without id"))?;
        self.table.write().await.rows.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let repo = InMemoryAnimesRepository::new();

        let a = repo.save(Anime::new("A")).await.unwrap();
        let b = repo.save(Anime::new("B")).await.unwrap();

        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let repo = InMemoryAnimesRepository::new();
        let a = repo.save(Anime::new("A")).await.unwrap();
        repo.delete(&a).await.unwrap();

        let b = repo.save(Anime::new("B")).await.unwrap();

        assert_eq!(b.id, Some(2));
        assert_eq!(repo.find_by_id(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_all_persists_everything_in_order() {
        let repo = InMemoryAnimesRepository::new();

        let saved = repo
            .save_all(vec![Anime::new("A"), Anime::new(""), Anime::new("C")])
            .await
            .unwrap();

        assert_eq!(
            saved,
            vec![
                Anime::new("A").with_id(1),
                Anime::new("").with_id(2),
                Anime::new("C").with_id(3),
            ]
        );
        assert_eq!(repo.find_all().await.unwrap(), saved);
    }

    #[tokio::test]
    async fn delete_without_id_fails() {
        let repo = InMemoryAnimesRepository::new();
        assert!(repo.delete(&Anime::new("nameless")).await.is_err());
    }
}
