use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The tables the dataset is split into.
///
/// Declaration order is the order categories are scanned in for name lookup
/// and the order they are listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    StatusCodes,
    CoreActions,
    ImageEffectActions,
    Contexts,
    ParamTypes,
    BitDepths,
    ImageComponents,
    FieldTypes,
    PremultStates,
    ThreadSafety,
    ChangeReasons,
    Suites,
    StandardClips,
    StandardParams,
    GpuProperties,
    TypeIdentifiers,
    DataStructures,
    ExportedFunctions,
}

impl Category {
    pub const ALL: [Category; 18] = [
        Category::StatusCodes,
        Category::CoreActions,
        Category::ImageEffectActions,
        Category::Contexts,
        Category::ParamTypes,
        Category::BitDepths,
        Category::ImageComponents,
        Category::FieldTypes,
        Category::PremultStates,
        Category::ThreadSafety,
        Category::ChangeReasons,
        Category::Suites,
        Category::StandardClips,
        Category::StandardParams,
        Category::GpuProperties,
        Category::TypeIdentifiers,
        Category::DataStructures,
        Category::ExportedFunctions,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::StatusCodes => "status_codes",
            Category::CoreActions => "core_actions",
            Category::ImageEffectActions => "image_effect_actions",
            Category::Contexts => "contexts",
            Category::ParamTypes => "param_types",
            Category::BitDepths => "bit_depths",
            Category::ImageComponents => "image_components",
            Category::FieldTypes => "field_types",
            Category::PremultStates => "premult_states",
            Category::ThreadSafety => "thread_safety",
            Category::ChangeReasons => "change_reasons",
            Category::Suites => "suites",
            Category::StandardClips => "standard_clips",
            Category::StandardParams => "standard_params",
            Category::GpuProperties => "gpu_properties",
            Category::TypeIdentifiers => "type_identifiers",
            Category::DataStructures => "data_structures",
            Category::ExportedFunctions => "exported_functions",
        }
    }

    /// Position of this category in [`Category::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}
