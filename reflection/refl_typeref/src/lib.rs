//! Type references for runtime reflection.
//!
//! A type reference describes a type as it is recorded in compiled
//! metadata: nominal types by mangled name, structural types (tuples,
//! functions, metatypes) by their components, and generic code by
//! unresolved parameters and associated-type projections.
//!
//! # Architecture
//!
//! - [`TypeRefBuilder`]: sharded interner owning every reference. All
//!   operations are methods on the builder taking [`TypeRefId`] handles.
//! - [`TypeRefData`]: the closed grammar of type references.
//! - Nominal queries: [`TypeRefBuilder::nominal_kind`],
//!   [`TypeRefBuilder::depth`], [`TypeRefBuilder::subst_map`].
//! - [`TypeRefBuilder::is_concrete`] and [`TypeRefBuilder::subst`]:
//!   the concreteness check and generic substitution.
//! - [`TypeRefBuilder::format_type_ref`]: indented s-expression dump.
//! - [`TypeRefBuilder::decode_mangled_type`]: build references from
//!   mangled names via `refl_demangle`.
//!
//! # Errors
//!
//! Failing to decode a mangled name is recoverable and reported as
//! [`DemangleError`] or [`DecodeError`]. Malformed trees, missing
//! substitutions and unresolved witnesses are bugs in whoever produced the
//! tree, and panic.
//!
//! # Debugging
//!
//! Enable tracing with environment variables:
//! - `RUST_LOG=refl_typeref=debug` - witness resolution and name fallbacks
//! - `RUST_LOG=refl_typeref=trace` - every interning and substitution

mod builder;
mod concrete;
mod data;
mod decode;
mod error;
mod generic_map;
mod id;
mod nominal;
mod print;
mod subst;

pub use builder::{SharedTypeRefBuilder, TypeRefBuilder};
pub use data::{TypeRefData, TypeRefKind};
pub use error::{DecodeError, TypeRefInternError};
pub use generic_map::{GenericArgumentMap, GenericParamKey};
pub use id::TypeRefId;
pub use nominal::NominalKind;
pub use refl_demangle::DemangleError;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

// Handles are stored in every interned node.
const _: () = assert!(std::mem::size_of::<TypeRefId>() == 4);
