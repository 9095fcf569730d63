//! Cache types for catalog API responses.

use atelier_cart::Extra;

use crate::types::{Experience, Product, Room};

/// Cached value types, one per cacheable catalog read.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    Experiences(Vec<Experience>),
    Rooms(Vec<Room>),
    Extras(Vec<Extra>),
}
