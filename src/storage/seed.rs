//! Demo content for the two lab collections.
//!
//! The records live in `fixtures/*.json` and are compiled in; they are only
//! written to the store the first time a lab page is viewed.

use super::RecordStore;
use crate::models::{Collection, Record};
use crate::{Error, Result};

const PSE_LAB: &str = include_str!("../../fixtures/pse_lab.json");
const PESE_LAB: &str = include_str!("../../fixtures/pese_lab.json");

/// Seed records for a collection, or `None` if the collection has no seed.
pub fn records(collection: Collection) -> Option<Result<Vec<Record>>> {
    let raw = match collection {
        Collection::PseLab => PSE_LAB,
        Collection::PeseLab => PESE_LAB,
        _ => return None,
    };
    Some(serde_json::from_str(raw).map_err(|e| {
        Error::Other(format!("invalid seed fixture for {}: {}", collection, e))
    }))
}

/// Seed `collection` if it has seed data and has never been written.
///
/// Returns `true` if the seed was written just now.
pub fn ensure(store: &dyn RecordStore, collection: Collection) -> Result<bool> {
    match records(collection) {
        Some(seed) => store.ensure_seed(collection, &seed?),
        None => Ok(false),
    }
}
