// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Deferred values.
//!
//! A [`Wrapped`] value is either present ([`Wrapped::Direct`]) or names a
//! [`CacheKey`] ([`Wrapped::Cached`]) that the [`CacheResolver`] materializes
//! on first use through the loader registered for the key's protocol.
//!
//! # Example
//!
//! ```
//! use hana::{CacheKey, CacheResolver, Value, Wrapped};
//!
//! let resolver = CacheResolver::new();
//! resolver.register_loader("const", |key: &CacheKey| -> hana::Result<Value> {
//!     Ok(Value::from(key.parts().len() as i32))
//! });
//!
//! let key = CacheKey::builder("const").string("a").build()?;
//! assert_eq!(resolver.unwrap(&Wrapped::Cached(key))?, Value::from(1));
//! assert_eq!(resolver.unwrap(&Wrapped::direct(5))?, Value::from(5));
//! # Ok::<(), hana::Error>(())
//! ```

mod cache_key;
mod resolver;
mod wrapped;

pub use cache_key::{CacheKey, CacheKeyBuilder, CacheKeyPart};
pub use resolver::{CacheLoader, CacheResolver};
pub use wrapped::Wrapped;
