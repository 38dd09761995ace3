use opaque_id::opaque_id;
use opaque_id::persistence::ConventionRegistry;

#[opaque_id(kind = "i32")]
pub struct WarehouseId;

#[opaque_id]
pub struct PalletId;

fn main() {
    let json = serde_json::to_string(&WarehouseId::from_i32(5)).unwrap();
    assert_eq!(json, "5");

    let mut registry = ConventionRegistry::new();
    registry
        .register::<WarehouseIdValueConverter, WarehouseIdValueComparer>()
        .register::<PalletIdValueConverter, PalletIdValueComparer>();
    assert_eq!(registry.len(), 2);

    let _: <PalletId as redb::Value>::SelfType<'static> = PalletId::EMPTY;
}
