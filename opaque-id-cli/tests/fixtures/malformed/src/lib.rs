//! Test fixture: well-formed and malformed declarations side by side.

use opaque_id::opaque_id;

#[opaque_id]
pub struct GoodId;

#[opaque_id(kind = "i32")]
pub struct TupleId(i32);

#[opaque_id]
pub struct GenericId<T>;

pub fn helper() {
    #[opaque_id]
    struct LocalId;
}
