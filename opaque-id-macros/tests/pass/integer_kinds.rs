use opaque_id::opaque_id;

#[opaque_id(kind = "i32")]
pub struct RoleId;

#[opaque_id(type = Integer64, cast = "implicit")]
pub struct AuditId;

#[opaque_id(kind = 3, cast_operator = 1)]
struct LineId;

fn main() {
    assert_eq!(RoleId::from_i32(4).to_i32(), 4);
    let audit: AuditId = 9i64.into();
    let raw: i64 = audit.into();
    assert_eq!(raw, 9);
    let line: LineId = 1i64.into();
    assert_eq!(format!("{:b}", line), "1");
}
