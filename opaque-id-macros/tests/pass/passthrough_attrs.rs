use opaque_id::opaque_id;

#[opaque_id(kind = "i32")]
#[allow(dead_code)]
#[must_use]
pub struct UnusedId;

fn main() {}
