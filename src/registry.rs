//! Name lookup, substring search and category listing over the dataset.

use ofx_definitions::{
    Category, Dataset, Definition, DefinitionTable, HostInfo, SuiteFunction,
};
use serde::Serialize;

use crate::error::OfxError;

/// Prefix shared by every context constant
pub const CONTEXT_PREFIX: &str = "kOfxImageEffectContext";

pub const KEY_CONCEPTS: [&str; 6] = [
    "Property System - All configuration via typed key-value pairs",
    "Suite Mechanism - Hosts provide function pointers via suites",
    "Action System - Hosts communicate with plugins via action strings",
    "Contexts - Plugins declare supported contexts (filter, generator, etc.)",
    "Clips - Named inputs/outputs for image data",
    "Parameters - User-controllable values with animation support",
];

/// A definition together with the name and category it is filed under.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DefinitionRef<'d> {
    pub name: &'d str,
    pub category: Category,
    #[serde(flatten)]
    pub definition: &'d Definition,
}

/// Read-only view over a [`Dataset`].
#[derive(Debug, Clone, Copy)]
pub struct Registry<'d> {
    dataset: &'d Dataset,
}

impl<'d> Registry<'d> {
    pub fn new(dataset: &'d Dataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &'d Dataset {
        self.dataset
    }

    /// Exact name lookup. Categories are scanned in [`Category::ALL`] order
    /// and the first match wins.
    pub fn lookup(&self, name: &str) -> Result<DefinitionRef<'d>, OfxError> {
        self.dataset
            .tables()
            .find_map(|(category, table)| entry(category, table, name))
            .ok_or_else(|| OfxError::not_found("Definition", name, Vec::new()))
    }

    /// Case-insensitive substring search over name, description and value.
    ///
    /// An entry is included at most once, on the first field that matches.
    /// An unknown category yields no results.
    pub fn search(&self, query: &str, category: Option<&str>) -> Vec<DefinitionRef<'d>> {
        let query = query.to_lowercase();

        let scope: Vec<(Category, &'d DefinitionTable)> = match category {
            Some(name) => match name.parse::<Category>() {
                Ok(category) => vec![(category, self.dataset.table(category))],
                Err(_) => return Vec::new(),
            },
            None => self.dataset.tables().collect(),
        };

        scope
            .into_iter()
            .flat_map(|(category, table)| {
                let query = query.as_str();
                table
                    .iter()
                    .filter(move |(name, definition)| matches_query(query, name, definition))
                    .map(move |(name, definition)| DefinitionRef {
                        name,
                        category,
                        definition,
                    })
            })
            .collect()
    }

    /// Names in a category, in table order. Unknown categories are empty.
    pub fn list_category(&self, category: &str) -> Vec<&'d str> {
        match category.parse::<Category>() {
            Ok(category) => self
                .dataset
                .table(category)
                .keys()
                .map(String::as_str)
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn list_categories(&self) -> Vec<&'static str> {
        self.dataset
            .tables()
            .map(|(category, _)| category.as_str())
            .collect()
    }

    /// Core and image effect actions in one map
    pub fn actions(&self) -> &'d DefinitionTable {
        self.dataset.actions()
    }

    pub fn action(&self, name: &str) -> Result<DefinitionRef<'d>, OfxError> {
        let actions = self.dataset.actions();
        let (name, definition) = actions
            .get_key_value(name)
            .ok_or_else(|| OfxError::not_found("Action", name, actions.keys().cloned().collect()))?;
        let category = if self.dataset.table(Category::CoreActions).contains_key(name) {
            Category::CoreActions
        } else {
            Category::ImageEffectActions
        };
        Ok(DefinitionRef {
            name,
            category,
            definition,
        })
    }

    pub fn suite(&self, name: &str) -> Result<DefinitionRef<'d>, OfxError> {
        self.keyed(Category::Suites, "Suite", name)
    }

    pub fn suite_functions(&self, name: &str) -> Result<&'d [SuiteFunction], OfxError> {
        Ok(&self.suite(name)?.definition.functions)
    }

    pub fn context(&self, name: &str) -> Result<DefinitionRef<'d>, OfxError> {
        self.keyed(Category::Contexts, "Context", name)
    }

    /// Exact context name, or its short form ("filter", "Transition", ...)
    pub fn resolve_context(&self, name: &str) -> Result<DefinitionRef<'d>, OfxError> {
        if let Ok(found) = self.context(name) {
            return Ok(found);
        }

        let short = name.trim();
        self.dataset
            .table(Category::Contexts)
            .iter()
            .find(|(key, _)| {
                key.strip_prefix(CONTEXT_PREFIX)
                    .is_some_and(|suffix| suffix.eq_ignore_ascii_case(short))
            })
            .map(|(key, definition)| DefinitionRef {
                name: key,
                category: Category::Contexts,
                definition,
            })
            .ok_or_else(|| OfxError::not_found("Context", name, self.names(Category::Contexts)))
    }

    pub fn param_type(&self, name: &str) -> Result<DefinitionRef<'d>, OfxError> {
        self.keyed(Category::ParamTypes, "Param type", name)
    }

    /// Host entry by exact name, falling back to a case-insensitive match
    pub fn host(&self, name: &str) -> Result<(&'d str, &'d HostInfo), OfxError> {
        let hosts = self.dataset.hosts();
        hosts
            .get_key_value(name)
            .or_else(|| hosts.iter().find(|(key, _)| key.eq_ignore_ascii_case(name.trim())))
            .map(|(key, info)| (key.as_str(), info))
            .ok_or_else(|| {
                OfxError::not_found("Host", name, hosts.keys().cloned().collect())
            })
    }

    /// Definitions of one category that match a predicate, in table order
    pub fn filter(
        &self,
        category: Category,
        predicate: impl Fn(&Definition) -> bool,
    ) -> Vec<DefinitionRef<'d>> {
        self.dataset
            .table(category)
            .iter()
            .filter(|(_, definition)| predicate(definition))
            .map(|(name, definition)| DefinitionRef {
                name,
                category,
                definition,
            })
            .collect()
    }

    /// Names of a category as owned strings, for error listings
    pub fn names(&self, category: Category) -> Vec<String> {
        self.dataset.table(category).keys().cloned().collect()
    }

    pub fn summary(&self) -> Summary<'d> {
        let info = self.dataset.info();
        let count = |category: Category| self.dataset.table(category).len();
        let keys = |category: Category| -> Vec<&'d str> {
            self.dataset
                .table(category)
                .keys()
                .map(String::as_str)
                .collect()
        };

        Summary {
            name: &info.name,
            version: &info.version,
            source: &info.source,
            documentation: &info.documentation,
            overview: Overview {
                total_status_codes: count(Category::StatusCodes),
                total_core_actions: count(Category::CoreActions),
                total_image_effect_actions: count(Category::ImageEffectActions),
                total_contexts: count(Category::Contexts),
                total_param_types: count(Category::ParamTypes),
                total_bit_depths: count(Category::BitDepths),
                total_image_components: count(Category::ImageComponents),
                total_suites: count(Category::Suites),
            },
            contexts: keys(Category::Contexts),
            param_types: keys(Category::ParamTypes),
            suites: keys(Category::Suites),
            supported_hosts: self.dataset.hosts().keys().map(String::as_str).collect(),
            key_concepts: &KEY_CONCEPTS,
        }
    }

    fn keyed(
        &self,
        category: Category,
        kind: &'static str,
        name: &str,
    ) -> Result<DefinitionRef<'d>, OfxError> {
        entry(category, self.dataset.table(category), name)
            .ok_or_else(|| OfxError::not_found(kind, name, self.names(category)))
    }
}

fn entry<'d>(category: Category, table: &'d DefinitionTable, name: &str) -> Option<DefinitionRef<'d>> {
    table
        .get_key_value(name)
        .map(|(name, definition)| DefinitionRef {
            name,
            category,
            definition,
        })
}

/// Checks name, then description, then the stringified value. `query` must
/// already be lowercase.
fn matches_query(query: &str, name: &str, definition: &Definition) -> bool {
    name.to_lowercase().contains(query)
        || definition.description.to_lowercase().contains(query)
        || definition
            .value
            .as_ref()
            .is_some_and(|value| value.to_string().to_lowercase().contains(query))
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Overview {
    pub total_status_codes: usize,
    pub total_core_actions: usize,
    pub total_image_effect_actions: usize,
    pub total_contexts: usize,
    pub total_param_types: usize,
    pub total_bit_depths: usize,
    pub total_image_components: usize,
    pub total_suites: usize,
}

/// Aggregate description of the SDK the dataset covers.
#[derive(Debug, Clone, Serialize)]
pub struct Summary<'d> {
    pub name: &'d str,
    pub version: &'d str,
    pub source: &'d str,
    pub documentation: &'d str,
    pub overview: Overview,
    pub contexts: Vec<&'d str>,
    pub param_types: Vec<&'d str>,
    pub suites: Vec<&'d str>,
    pub supported_hosts: Vec<&'d str>,
    pub key_concepts: &'static [&'static str],
}
