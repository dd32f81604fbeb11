//! Taxonomy categories and their cardinality policy.
//!
//! Every taxonomy-driven attribute of a listing draws its values from one
//! named reference table. The cardinality is declared here, once per
//! category, instead of being left to each form.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selection cardinality of a taxonomy category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// At most one item; choosing another replaces it.
    Single,
    /// Any number of distinct items; choosing toggles membership.
    Multi,
}

/// A named controlled vocabulary served by the reference-data backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyCategory {
    PropertyType,
    PropertyStatus,
    ArchitecturalStyle,
    BasementType,
    RoomType,
    HeatingType,
    CoolingType,
    FlooringType,
    RoofType,
    ParkingType,
    Amenity,
    Appliance,
}

impl TaxonomyCategory {
    /// All categories, in display order.
    pub const ALL: [TaxonomyCategory; 12] = [
        TaxonomyCategory::PropertyType,
        TaxonomyCategory::PropertyStatus,
        TaxonomyCategory::ArchitecturalStyle,
        TaxonomyCategory::BasementType,
        TaxonomyCategory::RoomType,
        TaxonomyCategory::HeatingType,
        TaxonomyCategory::CoolingType,
        TaxonomyCategory::FlooringType,
        TaxonomyCategory::RoofType,
        TaxonomyCategory::ParkingType,
        TaxonomyCategory::Amenity,
        TaxonomyCategory::Appliance,
    ];

    /// Name of the reference table backing this category.
    pub fn table_name(&self) -> &'static str {
        match self {
            TaxonomyCategory::PropertyType => "property_types",
            TaxonomyCategory::PropertyStatus => "property_statuses",
            TaxonomyCategory::ArchitecturalStyle => "architectural_styles",
            TaxonomyCategory::BasementType => "basement_types",
            TaxonomyCategory::RoomType => "room_types",
            TaxonomyCategory::HeatingType => "heating_types",
            TaxonomyCategory::CoolingType => "cooling_types",
            TaxonomyCategory::FlooringType => "flooring_types",
            TaxonomyCategory::RoofType => "roof_types",
            TaxonomyCategory::ParkingType => "parking_types",
            TaxonomyCategory::Amenity => "amenities",
            TaxonomyCategory::Appliance => "appliances",
        }
    }

    /// Looks a category up by its reference table name.
    pub fn from_table_name(table: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.table_name() == table)
    }

    /// Whether the category is exclusive or accumulates selections.
    ///
    /// Several categories are list-shaped in storage but semantically
    /// exclusive, which is why this lives on the category.
    pub fn cardinality(&self) -> Cardinality {
        match self {
            TaxonomyCategory::PropertyType
            | TaxonomyCategory::PropertyStatus
            | TaxonomyCategory::ArchitecturalStyle
            | TaxonomyCategory::BasementType => Cardinality::Single,
            TaxonomyCategory::RoomType
            | TaxonomyCategory::HeatingType
            | TaxonomyCategory::CoolingType
            | TaxonomyCategory::FlooringType
            | TaxonomyCategory::RoofType
            | TaxonomyCategory::ParkingType
            | TaxonomyCategory::Amenity
            | TaxonomyCategory::Appliance => Cardinality::Multi,
        }
    }

    /// Convenience check for single-select categories.
    pub fn is_single_select(&self) -> bool {
        self.cardinality() == Cardinality::Single
    }
}

impl fmt::Display for TaxonomyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table_name())
    }
}
