use opaque_id::opaque_id;

#[opaque_id(kind = "decimal", cast = "sometimes", colour = "blue")]
pub struct FallbackId;

fn main() {
    let id = FallbackId::from_uuid(uuid::Uuid::nil());
    assert!(id.is_empty());
}
