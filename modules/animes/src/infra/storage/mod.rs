pub mod entity;
pub mod memory;
pub mod sea_orm_repo;

pub use memory::InMemoryAnimesRepository;
pub use sea_orm_repo::SeaOrmAnimesRepository;
