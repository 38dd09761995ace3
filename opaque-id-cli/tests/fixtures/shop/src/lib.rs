//! Test fixture: a crate declaring ids across several modules.

use opaque_id::opaque_id;

pub mod catalog;
pub mod orders;

/// Customer identity.
#[opaque_id]
pub struct CustomerId;

/// Not an id: no marker.
pub struct CustomerName(pub String);
