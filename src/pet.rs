use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::normalization;

text_enum! {
    /// The kinds of animal the shelter lists.
    Species as "species" {
        Dog => "dog",
        Cat => "cat",
    }
}

text_enum! {
    Gender as "gender" {
        Male => "male",
        Female => "female",
    }
}

text_enum! {
    Size as "size" {
        Small => "small",
        Medium => "medium",
        Large => "large",
    }
}

impl Default for Species {
    fn default() -> Self {
        Species::Dog
    }
}

impl Default for Gender {
    fn default() -> Self {
        Gender::Male
    }
}

/// A single pet listed in the record store.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PetRecord {
    /// The ID of the pet. Never changes once assigned.
    id: Uuid,

    pub(crate) name: String,

    pub(crate) species: Species,

    pub(crate) breed: String,

    /// Free text, e.g. "2 years" or "6 months".
    pub(crate) age: String,

    pub(crate) gender: Gender,

    pub(crate) size: Option<Size>,

    pub(crate) description: Option<String>,

    /// Image references in display order. The first one is the main
    /// image.
    pub(crate) images: Vec<String>,

    pub(crate) temperament: Option<Vec<String>>,

    pub(crate) health_status: Option<String>,

    /// Whether the pet appears in listings. Unlisted pets are kept.
    pub(crate) available: bool,

    /// The user who uploaded the listing, if known.
    pub(crate) uploaded_by: Option<Uuid>,

    #[serde(with = "time::serde::timestamp")]
    pub(crate) created_at: OffsetDateTime,
}

impl PetRecord {
    pub fn new(
        id: Uuid,
        pet: NewPet,
        available: bool,
        uploaded_by: Option<Uuid>,
        created_at: OffsetDateTime,
    ) -> Self {
        let NewPet {
            name,
            species,
            breed,
            age,
            gender,
            size,
            description,
            images,
            temperament,
            health_status,
        } = pet;

        PetRecord {
            id,
            name,
            species,
            breed,
            age,
            gender,
            size,
            description,
            images,
            temperament,
            health_status,
            available,
            uploaded_by,
            created_at,
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn breed(&self) -> &str {
        &self.breed
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

/// A validated listing, ready to be inserted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewPet {
    pub(crate) name: String,
    pub(crate) species: Species,
    pub(crate) breed: String,
    pub(crate) age: String,
    pub(crate) gender: Gender,
    pub(crate) size: Option<Size>,
    pub(crate) description: Option<String>,
    pub(crate) images: Vec<String>,
    pub(crate) temperament: Option<Vec<String>>,
    pub(crate) health_status: Option<String>,
}

impl NewPet {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The listing form as a user fills it in. Species and gender start at
/// dog and male.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ListingForm {
    #[serde(deserialize_with = "normalization::deserialize")]
    pub name: String,

    pub age: String,

    #[serde(deserialize_with = "normalization::deserialize")]
    pub breed: String,

    pub species: Species,

    pub gender: Gender,

    pub size: Option<Size>,

    pub description: String,

    #[serde(deserialize_with = "normalization::deserialize_list")]
    pub images: Vec<String>,

    #[serde(deserialize_with = "normalization::deserialize_list")]
    pub temperament: Vec<String>,

    pub health_status: String,
}


#[cfg(test)]
mod tests {
    use super::{Gender, ListingForm, Size, Species};

    #[test]
    fn text_enums_parse_loosely_and_print_lowercase() {
        assert_eq!(" Dog ".parse::<Species>().expect("parse species"), Species::Dog);
        assert_eq!("CAT".parse::<Species>().expect("parse species"), Species::Cat);
        assert_eq!(Size::Medium.to_string(), "medium");
        assert!("hamster".parse::<Species>().is_err());
        assert_eq!(Species::ALL, &[Species::Dog, Species::Cat]);
    }

    #[test]
    fn listing_form_defaults_to_dog_and_male() {
        let form: ListingForm =
            serde_json::from_str(r#"{"name": "  Biscuit "}"#).expect("parse listing form");

        assert_eq!(form.name, "Biscuit");
        assert_eq!(form.species, Species::Dog);
        assert_eq!(form.gender, Gender::Male);
        assert!(form.images.is_empty());
    }

    #[test]
    fn records_serialize_enums_as_text() {
        let pet = super::fixtures::pet(1, "Luna", Species::Cat, "Siamese");
        let value = serde_json::to_value(&pet).expect("serialize pet");

        assert_eq!(value["species"], "cat");
        assert_eq!(value["gender"], "female");
        assert_eq!(value["created_at"], 1_600_000_001);
    }
}
