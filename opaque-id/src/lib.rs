//! # opaque-id
//!
//! Strongly-typed opaque identifiers.
//!
//! An opaque id is a distinct type wrapping a raw value (a UUID, an `i32`
//! or an `i64`) so that ids of different entities cannot be mixed up.
//! Mark a unit struct with `#[opaque_id]` and the attribute fills in the
//! representation, constants, conversions, formatting and parsing:
//!
//! ```rust,ignore
//! use opaque_id::opaque_id;
//!
//! #[opaque_id]
//! pub struct UserId;
//!
//! #[opaque_id(kind = "i64", cast = "implicit")]
//! pub struct OrderId;
//!
//! let user = UserId::generate();
//! assert_eq!(user.to_string().parse::<UserId>().unwrap(), user);
//!
//! let order: OrderId = 42.into();
//! assert_eq!(order.to_i64(), 42);
//! ```
//!
//! ## Attribute arguments
//!
//! | Argument | Values | Default |
//! |----------|--------|---------|
//! | `kind` / `type` | `uuid` (`1`), `i32` (`2`), `i64` (`3`) | `uuid` |
//! | `cast` / `cast_operator` | `implicit` (`1`), `explicit` (`2`) | `explicit` |
//!
//! Unknown arguments fall back to the defaults.
//!
//! ## Features
//!
//! | Feature | Description | Default |
//! |---------|-------------|---------|
//! | `derive` | Re-export the `#[opaque_id]` attribute | ✅ |
//! | `serde` | Generate `Serialize` / `Deserialize` impls | ❌ |
//! | `redb` | Generate redb `Value` / `Key` impls and persistence conventions | ❌ |
//!
//! With `redb` enabled every id also gets a `{Name}ValueConverter` and a
//! `{Name}ValueComparer`; see [`persistence`]. The `opaque-id` CLI can
//! write a crate-wide registration function binding all of them to a
//! [`persistence::ConventionRegistry`].

pub mod persistence;

#[cfg(feature = "derive")]
pub use opaque_id_macros::opaque_id;

pub use persistence::{Convention, ConventionRegistry, RegistryError, ValueComparer, ValueConverter};
