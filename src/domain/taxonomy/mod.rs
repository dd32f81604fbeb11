//! Taxonomy module - reference vocabularies and their representations.
//!
//! - `category` - named vocabularies and their cardinality policy
//! - `item` - ids and `{id, label}` items
//! - `value` - the raw/hydrated tagged union
//! - `normalizer` - conversion between representations
//! - `selection` - cardinality-aware selection state

mod category;
mod item;
mod normalizer;
mod selection;
mod value;

pub use category::{Cardinality, TaxonomyCategory};
pub use item::{TaxonomyId, TaxonomyItem};
pub use normalizer::{
    dehydrate, enforce_cardinality, normalize, normalize_attribute, resolve_source,
    write_dehydrated, SourcedValue,
};
pub use selection::SelectionController;
pub use value::TaxonomyValue;
