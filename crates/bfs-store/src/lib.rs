//! Object store client interface for bucketfs.
//!
//! bucketfs never talks to a network itself. Everything it needs from the
//! remote store goes through the narrow [`ObjectClient`] trait: list buckets,
//! list keys under a prefix, fetch metadata, and read/write/delete bytes.
//!
//! # Backends
//!
//! - [`InMemoryObjectClient`] -- `BTreeMap`-based client for tests and embedding
//!
//! # Design Rules
//!
//! 1. Keys are raw strings. Escaping is the caller's concern, not the client's.
//! 2. Listings are returned in key order.
//! 3. The store is eventually listable; no cross-call consistency is promised.
//! 4. All backend errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod metadata;
pub mod names;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryObjectClient;
pub use metadata::{BucketInfo, ObjectListing, ObjectMetadata};
pub use names::validate_bucket_name;
pub use traits::ObjectClient;
