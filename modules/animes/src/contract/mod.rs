pub mod model;

pub use model::{Anime, NewAnime};
