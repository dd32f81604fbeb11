//! Attribute bindings: which section owns a field and how it is typed.
//!
//! Taxonomy attributes have three kinds of names:
//!
//! - the working name the wizard forms use (`roomTypes`),
//! - legacy aliases older consumers still read and write (`room_type_ids`),
//! - the canonical relation name the backend returns on fetch (`room_types`).

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::Section;
use crate::domain::taxonomy::{Cardinality, TaxonomyCategory};

/// How a field's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Scalar,
    SingleSelect(TaxonomyCategory),
    MultiSelect(TaxonomyCategory),
}

/// Static description of one listing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeBinding {
    pub field: &'static str,
    pub legacy: &'static [&'static str],
    pub remote: &'static str,
    pub section: Section,
    pub kind: AttributeKind,
}

impl AttributeBinding {
    const fn scalar(field: &'static str, section: Section) -> Self {
        Self {
            field,
            legacy: &[],
            remote: field,
            section,
            kind: AttributeKind::Scalar,
        }
    }

    const fn single(
        field: &'static str,
        legacy: &'static [&'static str],
        remote: &'static str,
        section: Section,
        category: TaxonomyCategory,
    ) -> Self {
        Self {
            field,
            legacy,
            remote,
            section,
            kind: AttributeKind::SingleSelect(category),
        }
    }

    const fn multi(
        field: &'static str,
        legacy: &'static [&'static str],
        remote: &'static str,
        section: Section,
        category: TaxonomyCategory,
    ) -> Self {
        Self {
            field,
            legacy,
            remote,
            section,
            kind: AttributeKind::MultiSelect(category),
        }
    }

    /// The taxonomy category, if this is a taxonomy attribute.
    pub fn category(&self) -> Option<TaxonomyCategory> {
        match self.kind {
            AttributeKind::Scalar => None,
            AttributeKind::SingleSelect(c) | AttributeKind::MultiSelect(c) => Some(c),
        }
    }

    /// Declared cardinality, if this is a taxonomy attribute.
    pub fn cardinality(&self) -> Option<Cardinality> {
        match self.kind {
            AttributeKind::Scalar => None,
            AttributeKind::SingleSelect(_) => Some(Cardinality::Single),
            AttributeKind::MultiSelect(_) => Some(Cardinality::Multi),
        }
    }

    /// Candidate names when reading a draft payload: working name first.
    pub fn local_sources(&self) -> Vec<&'static str> {
        let mut names = Vec::with_capacity(self.legacy.len() + 2);
        names.push(self.field);
        names.extend_from_slice(self.legacy);
        if !names.contains(&self.remote) {
            names.push(self.remote);
        }
        names
    }

    /// Candidate names when reading a fetched entity: canonical name first.
    pub fn remote_sources(&self) -> Vec<&'static str> {
        let mut names = Vec::with_capacity(self.legacy.len() + 2);
        names.push(self.remote);
        if self.field != self.remote {
            names.push(self.field);
        }
        names.extend_from_slice(self.legacy);
        names
    }

    /// Names a dehydrated value is written under on persistence.
    pub fn write_names(&self) -> Vec<&'static str> {
        let mut names = Vec::with_capacity(self.legacy.len() + 1);
        names.push(self.field);
        names.extend_from_slice(self.legacy);
        names
    }

    /// Every name this binding answers to.
    pub fn all_names(&self) -> Vec<&'static str> {
        self.local_sources()
    }
}

use Section::{Amenities, Contact, Info, Location, Media};
use TaxonomyCategory as Tc;

/// Every field the wizard knows about.
pub static CATALOG: &[AttributeBinding] = &[
    // location
    AttributeBinding::scalar("streetAddress", Location),
    AttributeBinding::scalar("unitNumber", Location),
    AttributeBinding::scalar("city", Location),
    AttributeBinding::scalar("province", Location),
    AttributeBinding::scalar("postalCode", Location),
    AttributeBinding::scalar("country", Location),
    AttributeBinding::scalar("latitude", Location),
    AttributeBinding::scalar("longitude", Location),
    // info
    AttributeBinding::scalar("name", Info),
    AttributeBinding::scalar("description", Info),
    AttributeBinding::scalar("sellingPrice", Info),
    AttributeBinding::scalar("lotSize", Info),
    AttributeBinding::scalar("totalSqft", Info),
    AttributeBinding::scalar("basementSqft", Info),
    AttributeBinding::scalar("bedrooms", Info),
    AttributeBinding::scalar("fullBathrooms", Info),
    AttributeBinding::scalar("halfBathrooms", Info),
    AttributeBinding::scalar("yearBuilt", Info),
    AttributeBinding::single(
        "propertyType",
        &["property_type_id"],
        "property_types",
        Info,
        Tc::PropertyType,
    ),
    AttributeBinding::single(
        "propertyStatus",
        &["status_id"],
        "property_statuses",
        Info,
        Tc::PropertyStatus,
    ),
    AttributeBinding::single(
        "architecturalStyle",
        &["architectural_style_id"],
        "architectural_styles",
        Info,
        Tc::ArchitecturalStyle,
    ),
    AttributeBinding::single(
        "basementType",
        &["basement_type_id"],
        "basement_types",
        Info,
        Tc::BasementType,
    ),
    AttributeBinding::multi("roomTypes", &["room_type_ids"], "room_types", Info, Tc::RoomType),
    // media
    AttributeBinding::scalar("photos", Media),
    AttributeBinding::scalar("videoUrl", Media),
    AttributeBinding::scalar("virtualTourUrl", Media),
    // amenities
    AttributeBinding::multi(
        "amenities",
        &["amenity_ids"],
        "property_amenities",
        Amenities,
        Tc::Amenity,
    ),
    AttributeBinding::multi(
        "appliances",
        &["appliance_ids"],
        "property_appliances",
        Amenities,
        Tc::Appliance,
    ),
    AttributeBinding::multi(
        "heatingTypes",
        &["heating_type_ids"],
        "heating_types",
        Amenities,
        Tc::HeatingType,
    ),
    AttributeBinding::multi(
        "coolingTypes",
        &["cooling_type_ids"],
        "cooling_types",
        Amenities,
        Tc::CoolingType,
    ),
    AttributeBinding::multi(
        "flooringTypes",
        &["flooring_type_ids"],
        "flooring_types",
        Amenities,
        Tc::FlooringType,
    ),
    AttributeBinding::multi("roofTypes", &["roof_type_ids"], "roof_types", Amenities, Tc::RoofType),
    AttributeBinding::multi(
        "parkingTypes",
        &["parking_type_ids"],
        "parking_types",
        Amenities,
        Tc::ParkingType,
    ),
    // contact
    AttributeBinding::scalar("contactName", Contact),
    AttributeBinding::scalar("contactEmail", Contact),
    AttributeBinding::scalar("contactPhone", Contact),
];

static BY_NAME: Lazy<HashMap<&'static str, &'static AttributeBinding>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for binding in CATALOG {
        for name in binding.all_names() {
            index.entry(name).or_insert(binding);
        }
    }
    index
});

/// Finds the binding answering to a working, legacy, or canonical name.
pub fn binding_for(name: &str) -> Option<&'static AttributeBinding> {
    BY_NAME.get(name).copied()
}

/// All taxonomy attributes.
pub fn taxonomy_bindings() -> impl Iterator<Item = &'static AttributeBinding> {
    CATALOG.iter().filter(|b| b.category().is_some())
}

/// Bindings owned by a section.
pub fn section_bindings(section: Section) -> impl Iterator<Item = &'static AttributeBinding> {
    CATALOG.iter().filter(move |b| b.section == section)
}

/// Categories referenced by at least one attribute, without repeats.
pub fn bound_categories() -> Vec<TaxonomyCategory> {
    let mut categories: Vec<_> = taxonomy_bindings().filter_map(|b| b.category()).collect();
    categories.sort();
    categories.dedup();
    categories
}
