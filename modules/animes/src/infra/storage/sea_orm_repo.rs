//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait + TransactionTrait`, so it can be built
//! with a `DatabaseConnection` pool. `save_all` opens its own transaction.

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, QueryOrder, Set, TransactionTrait,
};

use crate::contract::model::Anime;
use crate::domain::repo::AnimesRepository;
use crate::infra::storage::entity::{ActiveModel as AnimeAM, Column, Entity as AnimeEntity};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmAnimesRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmAnimesRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

async fn save_on<T>(conn: &T, anime: Anime) -> Result<Anime, DbErr>
where
    T: ConnectionTrait,
{
    let saved = match anime.id {
        None => {
            let m = AnimeAM {
                name: Set(anime.name),
                ..Default::default()
            };
            m.insert(conn).await?
        }
        Some(id) => {
            // Full replace by primary key
            let m = AnimeAM {
                id: Set(id),
                name: Set(anime.name),
            };
            m.update(conn).await?
        }
    };
    Ok(saved.into())
}

#[async_trait::async_trait]
impl<C> AnimesRepository for SeaOrmAnimesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn find_all(&self) -> anyhow::Result<Vec<Anime>> {
        let rows = AnimeEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .context("find_all failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Anime>> {
        let found = AnimeEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn save(&self, anime: Anime) -> anyhow::Result<Anime> {
        save_on(&self.conn, anime).await.context("save failed")
    }

    async fn save_all(&self, animes: Vec<Anime>) -> anyhow::Result<Vec<Anime>> {
        let txn = self.conn.begin().await.context("save_all: begin failed")?;

        let mut saved = Vec::with_capacity(animes.len());
        for anime in animes {
            saved.push(save_on(&txn, anime).await.context("save_all failed")?);
        }

        txn.commit().await.context("save_all: commit failed")?;
        Ok(saved)
    }

    async fn delete(&self, anime: &Anime) -> anyhow::Result<()> {
        let id = anime
            .id
            .ok_or_else(|| anyhow::anyhow!("cannot delete an anime without id"))?;
        AnimeEntity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(())
    }
}
