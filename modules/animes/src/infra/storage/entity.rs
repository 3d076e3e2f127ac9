use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Schema};

use crate::contract::model::Anime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "anime")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Anime {
    fn from(m: Model) -> Self {
        Anime::new(m.name).with_id(m.id)
    }
}

/// Create the `anime` table from the entity definition if it is missing.
pub async fn create_table<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(Entity);
    stmt.if_not_exists();
    conn.execute(backend.build(&stmt)).await?;
    Ok(())
}
