/// Anime record shared between layers (no serde/utoipa).
///
/// `id` is `None` until storage assigns one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anime {
    pub id: Option<i32>,
    pub name: String,
}

impl Anime {
    /// A record not yet persisted.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Copy of this record carrying `id`.
    pub fn with_id(self, id: i32) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    pub fn has_blank_name(&self) -> bool {
        self.name.trim().is_empty()
    }
}

/// Data for creating an anime; identity is always assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnime {
    pub name: String,
}

impl From<NewAnime> for Anime {
    fn from(new: NewAnime) -> Self {
        Anime::new(new.name)
    }
}
