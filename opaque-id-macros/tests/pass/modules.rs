mod catalog {
    pub mod ids {
        #[opaque_id::opaque_id(kind = "i64")]
        pub struct ProductId;

        #[opaque_id::opaque_id]
        pub(crate) struct VariantId;
    }
}

use catalog::ids::{ProductId, VariantId};

fn main() {
    let product = ProductId::from_i64(12);
    let variant = VariantId::from_u128(12);
    assert_eq!(product.to_i64() as u128, variant.to_u128());
}
