// SPDX-License-Identifier: MPL-2.0
//! Read-only animal encyclopedia.
//!
//! The dataset is a TOML file embedded into the binary and parsed once into
//! an [`EncyclopediaStore`]. Lookups keep the file's order and never mutate
//! anything, so the store is shared freely between threads.
//!
//! ```toml
//! [[categories]]
//! id = "birds"
//! icon = "🐦"
//! name = { en = "Birds", zh = "鸟类", ko = "조류" }
//! description = { en = "...", zh = "...", ko = "..." }
//!
//! [[animals]]
//! id = "barn_owl"
//! category = "birds"
//! scientific_name = "Tyto alba"
//! image = "images/barn_owl.jpg"
//! name = { en = "Barn Owl", zh = "仓鸮", ko = "원숭이올빼미" }
//! summary = { en = "...", zh = "...", ko = "..." }
//! habitat = { en = "...", zh = "...", ko = "..." }
//! facts = { en = ["..."], zh = ["..."], ko = ["..."] }
//! ```

use crate::error::{Error, Result};
use crate::i18n::Locale;
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

#[derive(RustEmbed)]
#[folder = "assets/data/"]
struct Asset;

const DATASET_FILE: &str = "encyclopedia.toml";

static BUILTIN: OnceLock<Result<EncyclopediaStore>> = OnceLock::new();

/// Returns the process-wide store built from the embedded dataset.
///
/// The dataset is parsed on first use; later calls return the same store
/// or the same error.
///
/// # Errors
///
/// Returns [`Error::Dataset`] if the embedded dataset is missing or invalid.
pub fn builtin() -> Result<&'static EncyclopediaStore> {
    BUILTIN
        .get_or_init(EncyclopediaStore::embedded)
        .as_ref()
        .map_err(Clone::clone)
}

// =============================================================================
// Records
// =============================================================================

/// One value per supported locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized<T> {
    pub en: T,
    pub zh: T,
    pub ko: T,
}

impl<T> Localized<T> {
    pub fn get(&self, locale: Locale) -> &T {
        match locale {
            Locale::En => &self.en,
            Locale::Zh => &self.zh,
            Locale::Ko => &self.ko,
        }
    }
}

pub type LocalizedText = Localized<String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalCategory {
    pub id: String,
    pub icon: String,
    pub name: LocalizedText,
    pub description: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalRecord {
    pub id: String,
    /// Id of the [`AnimalCategory`] this animal belongs to.
    pub category: String,
    pub scientific_name: String,
    /// Path or URL of the illustration.
    pub image: String,
    pub name: LocalizedText,
    pub summary: LocalizedText,
    pub habitat: LocalizedText,
    /// Facts in display order.
    pub facts: Localized<Vec<String>>,
}

/// No animal with the requested id exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFound {
    pub id: String,
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no animal with id '{}'", self.id)
    }
}

impl std::error::Error for NotFound {}

#[derive(Debug, Deserialize)]
struct Dataset {
    #[serde(default)]
    categories: Vec<AnimalCategory>,
    #[serde(default)]
    animals: Vec<AnimalRecord>,
}

// =============================================================================
// Store
// =============================================================================

#[derive(Debug)]
pub struct EncyclopediaStore {
    categories: Vec<AnimalCategory>,
    animals: Vec<AnimalRecord>,
    by_id: HashMap<String, usize>,
}

impl EncyclopediaStore {
    /// Parses and validates a dataset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Dataset`] if the TOML is malformed, a category or
    /// animal id is repeated, or an animal names an unknown category.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let dataset: Dataset =
            toml::from_str(source).map_err(|e| Error::Dataset(e.to_string()))?;

        let mut category_ids = HashSet::new();
        for category in &dataset.categories {
            if !category_ids.insert(category.id.as_str()) {
                return Err(Error::Dataset(format!(
                    "duplicate category id '{}'",
                    category.id
                )));
            }
        }

        let mut by_id = HashMap::with_capacity(dataset.animals.len());
        for (index, animal) in dataset.animals.iter().enumerate() {
            if !category_ids.contains(animal.category.as_str()) {
                return Err(Error::Dataset(format!(
                    "animal '{}' references unknown category '{}'",
                    animal.id, animal.category
                )));
            }
            if by_id.insert(animal.id.clone(), index).is_some() {
                return Err(Error::Dataset(format!("duplicate animal id '{}'", animal.id)));
            }
        }

        Ok(Self {
            categories: dataset.categories,
            animals: dataset.animals,
            by_id,
        })
    }

    fn embedded() -> Result<Self> {
        Self::from_asset(Asset::get(DATASET_FILE).as_ref().map(|file| file.data.as_ref()))
    }

    fn from_asset(data: Option<&[u8]>) -> Result<Self> {
        let data =
            data.ok_or_else(|| Error::Dataset(format!("{DATASET_FILE} is not embedded")))?;
        let source = std::str::from_utf8(data).map_err(|e| Error::Dataset(e.to_string()))?;
        Self::from_toml_str(source)
    }

    /// All categories, in dataset order.
    pub fn categories(&self) -> &[AnimalCategory] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&AnimalCategory> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Animals of a category, in dataset order. Unknown categories have none.
    pub fn by_category(&self, category_id: &str) -> Vec<&AnimalRecord> {
        self.animals
            .iter()
            .filter(|animal| animal.category == category_id)
            .collect()
    }

    pub fn count_in_category(&self, category_id: &str) -> usize {
        self.animals
            .iter()
            .filter(|animal| animal.category == category_id)
            .count()
    }

    /// Full record of one animal.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] when no animal has this id.
    pub fn detail(&self, animal_id: &str) -> std::result::Result<&AnimalRecord, NotFound> {
        self.by_id
            .get(animal_id)
            .map(|&index| &self.animals[index])
            .ok_or_else(|| NotFound {
                id: animal_id.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.animals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(en: &str) -> String {
        format!("{{ en = \"{en}\", zh = \"{en}-zh\", ko = \"{en}-ko\" }}")
    }

    fn category(id: &str) -> String {
        format!(
            "[[categories]]\nid = \"{id}\"\nicon = \"*\"\nname = {}\ndescription = {}\n\n",
            text(id),
            text("desc")
        )
    }

    fn animal(id: &str, category: &str, scientific_name: &str) -> String {
        format!(
            "[[animals]]\nid = \"{id}\"\ncategory = \"{category}\"\nscientific_name = \"{scientific_name}\"\n\
             image = \"images/{id}.jpg\"\nname = {}\nsummary = {}\nhabitat = {}\n\
             facts = {{ en = [\"a\", \"b\"], zh = [\"甲\"], ko = [\"가\"] }}\n\n",
            text(id),
            text("summary"),
            text("habitat")
        )
    }

    fn seeded() -> EncyclopediaStore {
        let source = [
            category("mammals"),
            category("birds"),
            animal("red_fox", "mammals", "Vulpes vulpes"),
            animal("barn_owl", "birds", "Tyto alba"),
            animal("emperor_penguin", "birds", "Aptenodytes forsteri"),
            animal("scarlet_macaw", "birds", "Ara macao"),
        ]
        .concat();
        EncyclopediaStore::from_toml_str(&source).expect("seeded dataset should load")
    }

    #[test]
    fn by_category_keeps_seeded_order() {
        let store = seeded();
        let ids: Vec<&str> = store
            .by_category("birds")
            .iter()
            .map(|animal| animal.id.as_str())
            .collect();
        assert_eq!(ids, ["barn_owl", "emperor_penguin", "scarlet_macaw"]);
        assert_eq!(store.count_in_category("birds"), 3);
    }

    #[test]
    fn detail_returns_matching_record() {
        let store = seeded();
        let second = store.by_category("birds")[1].id.clone();
        let record = store.detail(&second).expect("second bird exists");
        assert_eq!(record.scientific_name, "Aptenodytes forsteri");
        assert_eq!(record.facts.get(Locale::En), &["a", "b"]);
        assert_eq!(record.name.get(Locale::Ko), "emperor_penguin-ko");
    }

    #[test]
    fn unknown_category_is_empty_and_unknown_animal_is_not_found() {
        let store = seeded();
        assert!(store.by_category("dragons").is_empty());
        assert_eq!(store.count_in_category("dragons"), 0);
        assert_eq!(
            store.detail("unicorn"),
            Err(NotFound {
                id: "unicorn".into()
            })
        );
    }

    #[test]
    fn categories_keep_dataset_order() {
        let store = seeded();
        let ids: Vec<&str> = store.categories().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["mammals", "birds"]);
        assert_eq!(store.category("birds").map(|c| c.name.get(Locale::Zh).as_str()), Some("birds-zh"));
        assert!(store.category("fish").is_none());
    }

    #[test]
    fn rejects_unknown_category_reference() {
        let source = [category("mammals"), animal("owl", "birds", "Tyto alba")].concat();
        assert!(matches!(
            EncyclopediaStore::from_toml_str(&source),
            Err(Error::Dataset(message)) if message.contains("unknown category")
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let source = [
            category("birds"),
            animal("owl", "birds", "Tyto alba"),
            animal("owl", "birds", "Bubo bubo"),
        ]
        .concat();
        assert!(matches!(
            EncyclopediaStore::from_toml_str(&source),
            Err(Error::Dataset(message)) if message.contains("duplicate animal")
        ));

        let source = [category("birds"), category("birds")].concat();
        assert!(matches!(
            EncyclopediaStore::from_toml_str(&source),
            Err(Error::Dataset(message)) if message.contains("duplicate category")
        ));
    }

    #[test]
    fn rejects_records_missing_a_locale() {
        let source = "[[categories]]\nid = \"birds\"\nicon = \"*\"\n\
                      name = { en = \"Birds\", zh = \"鸟类\" }\n\
                      description = { en = \"d\", zh = \"d\", ko = \"d\" }\n";
        assert!(matches!(
            EncyclopediaStore::from_toml_str(source),
            Err(Error::Dataset(_))
        ));
    }

    #[test]
    fn builtin_dataset_loads_and_is_consistent() {
        let store = EncyclopediaStore::embedded().expect("embedded dataset should load");
        assert!(!store.is_empty());
        assert!(!store.categories().is_empty());
        for category in store.categories() {
            assert!(store.count_in_category(&category.id) > 0, "{} is empty", category.id);
        }
        let total: usize = store
            .categories()
            .iter()
            .map(|category| store.count_in_category(&category.id))
            .sum();
        assert_eq!(total, store.len());
        assert_eq!(builtin().expect("builtin store").len(), store.len());
    }

    #[test]
    fn broken_dataset_asset_is_an_error() {
        assert!(matches!(
            EncyclopediaStore::from_asset(None),
            Err(Error::Dataset(message)) if message.contains("not embedded")
        ));
        assert!(matches!(
            EncyclopediaStore::from_asset(Some(&[0xff, 0xfe, 0x00])),
            Err(Error::Dataset(_))
        ));
        assert!(matches!(
            EncyclopediaStore::from_asset(Some(b"[[animals]]\nid = 3")),
            Err(Error::Dataset(_))
        ));
    }
}
