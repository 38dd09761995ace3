use opaque_id::opaque_id;

/// A session identifier.
#[opaque_id]
pub struct SessionId;

fn main() {
    let id = SessionId::generate();
    let text = id.to_string();
    assert_eq!(text.parse::<SessionId>().unwrap(), id);
    assert!(SessionId::EMPTY.is_empty());
}
