use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::category::Category;
use crate::definition::Definition;
use crate::error::DatasetError;

/// The OFX 1.5 reference table compiled into the binary.
pub const EMBEDDED_DATASET: &str = include_str!("../data/ofx_definitions.json");

/// Definitions of one category, keyed by name, in table order.
pub type DefinitionTable = IndexMap<String, Definition>;

/// Known behaviour of a host application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports_ofx_version: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub known_limitations: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gpu_support: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Provenance of the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkInfo {
    #[serde(rename = "sdk")]
    pub name: String,
    pub version: String,
    pub source: String,
    pub documentation: String,
}

#[derive(Deserialize)]
struct RawDataset {
    #[serde(flatten)]
    info: SdkInfo,
    categories: IndexMap<String, DefinitionTable>,
    #[serde(default)]
    hosts: IndexMap<String, HostInfo>,
}

/// The complete reference dataset.
///
/// Built once at startup and only read afterwards. Categories are held in
/// [`Category::ALL`] order.
#[derive(Debug, Clone)]
pub struct Dataset {
    info: SdkInfo,
    tables: Vec<(Category, DefinitionTable)>,
    actions: DefinitionTable,
    hosts: IndexMap<String, HostInfo>,
}

impl Dataset {
    /// Parse the table compiled into the binary
    pub fn embedded() -> Result<Self, DatasetError> {
        Self::from_json(EMBEDDED_DATASET)
    }

    /// Parse an externally supplied table
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, DatasetError> {
        let raw: RawDataset = serde_json::from_str(text)?;

        let mut by_category = IndexMap::with_capacity(raw.categories.len());
        for (key, table) in raw.categories {
            let category: Category = key
                .parse()
                .map_err(|_| DatasetError::UnknownCategory(key.clone()))?;
            by_category.insert(category, table);
        }

        let mut tables = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let table = by_category
                .shift_remove(&category)
                .ok_or(DatasetError::MissingCategory(category))?;
            tables.push((category, table));
        }

        let actions = merge_actions(
            &tables[Category::CoreActions.index()].1,
            &tables[Category::ImageEffectActions.index()].1,
        )?;

        Ok(Self {
            info: raw.info,
            tables,
            actions,
            hosts: raw.hosts,
        })
    }

    pub fn info(&self) -> &SdkInfo {
        &self.info
    }

    /// All categories with their tables, in scan order
    pub fn tables(&self) -> impl Iterator<Item = (Category, &DefinitionTable)> {
        self.tables.iter().map(|(category, table)| (*category, table))
    }

    pub fn table(&self, category: Category) -> &DefinitionTable {
        &self.tables[category.index()].1
    }

    /// Core actions followed by image effect actions
    pub fn actions(&self) -> &DefinitionTable {
        &self.actions
    }

    pub fn hosts(&self) -> &IndexMap<String, HostInfo> {
        &self.hosts
    }

    /// Total number of definitions across all categories
    pub fn len(&self) -> usize {
        self.tables.iter().map(|(_, table)| table.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names filed under more than one category, with the first two
    /// categories they appear in.
    ///
    /// Loading does not reject these; name lookup returns the first match.
    pub fn duplicate_names(&self) -> Vec<(String, Category, Category)> {
        let mut first_seen: IndexMap<&str, Category> = IndexMap::new();
        let mut duplicates = Vec::new();

        for (category, table) in self.tables() {
            for name in table.keys() {
                match first_seen.get(name.as_str()) {
                    Some(&earlier) => duplicates.push((name.clone(), earlier, category)),
                    None => {
                        first_seen.insert(name.as_str(), category);
                    }
                }
            }
        }

        duplicates
    }
}

fn merge_actions(
    core: &DefinitionTable,
    image_effect: &DefinitionTable,
) -> Result<DefinitionTable, DatasetError> {
    let mut actions = DefinitionTable::with_capacity(core.len() + image_effect.len());
    for (name, definition) in core.iter().chain(image_effect.iter()) {
        if actions.insert(name.clone(), definition.clone()).is_some() {
            return Err(DatasetError::DuplicateAction(name.clone()));
        }
    }
    Ok(actions)
}
