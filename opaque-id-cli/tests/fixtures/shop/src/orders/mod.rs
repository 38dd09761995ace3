//! Test fixture: an id declared in a `mod.rs` file.

use opaque_id::opaque_id;

#[opaque_id(kind = "uuid")]
pub struct OrderId;

pub fn describe() -> &'static str {
    "orders"
}
