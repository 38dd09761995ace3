//! Test fixture: integer ids and an inline module.

use opaque_id::opaque_id;

#[opaque_id(kind = "i32", cast = "implicit")]
pub struct ProductId;

pub mod variants {
    use opaque_id::opaque_id;

    #[opaque_id(kind = "Integer64")]
    pub struct VariantId;
}

#[derive(Debug, Clone)]
pub struct Price {
    pub cents: u64,
}
