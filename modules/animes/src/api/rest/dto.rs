use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::contract::model::{Anime, NewAnime};

/// REST DTO for an anime record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnimeDto {
    /// Assigned by storage.
    #[schema(example = 1)]
    pub id: Option<i32>,
    #[schema(example = "Naruto")]
    pub name: String,
}

/// Request body for create, update and each batch element.
///
/// A missing `name` deserializes as empty so it reaches the same blank-name
/// checks as `""`. Any `id` in the body is ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AnimeReq {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Naruto")]
    pub name: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

impl From<Anime> for AnimeDto {
    fn from(anime: Anime) -> Self {
        Self {
            id: anime.id,
            name: anime.name,
        }
    }
}

impl From<AnimeReq> for NewAnime {
    fn from(req: AnimeReq) -> Self {
        Self { name: req.name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_fail_validation() {
        for name in ["", "   ", "\t\n"] {
            let req = AnimeReq { name: name.into() };
            let errs = req.validate().unwrap_err();
            assert!(errs.field_errors().contains_key("name"), "{name:?}");
        }
        assert!(AnimeReq { name: "Bleach".into() }.validate().is_ok());
    }

    #[test]
    fn missing_name_and_extra_id_are_tolerated_by_serde() {
        let req: AnimeReq = serde_json::from_str(r#"{"id": 99}"#).unwrap();
        assert_eq!(req.name, "");

        let req: AnimeReq = serde_json::from_str(r#"{"id": 99, "name": "X"}"#).unwrap();
        assert_eq!(NewAnime::from(req), NewAnime { name: "X".into() });
    }

    #[test]
    fn dto_serializes_null_id() {
        let json = serde_json::to_value(AnimeDto::from(Anime::new("A"))).unwrap();
        assert_eq!(json, serde_json::json!({"id": null, "name": "A"}));
    }
}
