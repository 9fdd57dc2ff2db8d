//! Classboot Core Runtime
//!
//! This crate retrofits a class-based object model onto a prototype-based
//! substrate of dynamically extensible objects:
//! - Single inheritance through delegated prototype lookup
//! - Static members and static initializers
//! - Lazily materialized, cached class metadata (self-hosted: metadata
//!   objects are instances of a class defined through the same factory)
//! - Process-unique identity hashes and memoized string content hashes
//!
//! Everything is single-threaded and synchronous. All shared state lives in a
//! [`Runtime`], which is passed by reference into every callable.
//!
//! ```ignore
//! use classboot_core::{ClassSpec, Runtime, Value};
//!
//! let rt = Runtime::new()?;
//! let point = rt.define_class(
//!     ClassSpec::new("Point")
//!         .method("$0", |_, this, args| {
//!             let this = this.expect_object("Point")?;
//!             this.set("x", args.first().cloned().unwrap_or(Value::Undefined));
//!             Ok(Value::Undefined)
//!         }),
//! )?;
//! let p = rt.construct(&point, &[Value::Int(3), Value::Int(0)])?;
//! assert_eq!(rt.get_class(&p.into())?.name(), "Point");
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod class;
pub mod identity;
pub mod installer;
pub mod object;
pub mod options;
pub mod reflect;
pub mod runtime;
pub mod value;

pub use class::{ClassConstructor, ClassRef, ClassRegistry, ClassSpec};
pub use identity::{content_hash, HasIdentity, IdentityCounter};
pub use installer::define_if_absent;
pub use object::{JsString, ObjectRef, Property, PropertyFlags, PropertyTable};
pub use options::BootOptions;
pub use reflect::Metadata;
pub use runtime::{HostType, Runtime};
pub use value::{Function, Value};

/// Runtime errors
#[derive(Debug, thiserror::Error)]
pub enum BootError {
    /// A class named a superclass that has not been defined yet
    #[error("Cannot define class '{class}': superclass '{superclass}' is not defined")]
    UnresolvedSuperclass {
        /// Class being defined
        class: String,
        /// Missing superclass name
        superclass: String,
    },

    /// Construction was invoked without the trailing constructor selector
    #[error("Cannot construct '{class}': missing constructor selector")]
    MissingConstructorSelector {
        /// Class being constructed
        class: String,
    },

    /// The constructor selector names no constructor variant
    #[error("Class '{class}' has no constructor variant '{variant}'")]
    NoSuchConstructor {
        /// Class being constructed
        class: String,
        /// Member name the selector resolved to
        variant: String,
    },

    /// Member lookup failed
    #[error("{receiver} has no member '{name}'")]
    NoSuchMethod {
        /// Kind of receiver
        receiver: String,
        /// Requested member
        name: String,
    },

    /// The resolved member is not a function
    #[error("Member '{name}' is not callable")]
    NotCallable {
        /// Requested member
        name: String,
    },

    /// The value has no class (primitive strings, numbers, functions)
    #[error("Value of type {0} has no class")]
    NoClass(String),

    /// Metadata requested before the metadata class exists
    #[error("Metadata class '{0}' is not defined")]
    MissingMetadataClass(String),

    /// The identity counter cannot issue another value
    #[error("Identity counter exhausted")]
    IdentityExhausted,

    /// A builtin received a value of the wrong kind
    #[error("Type error: {0}")]
    TypeError(String),

    /// Options are well-formed TOML but semantically invalid
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Options failed to parse
    #[error("Failed to parse options: {0}")]
    Config(#[from] toml::de::Error),
}

/// Runtime result
pub type BootResult<T> = Result<T, BootError>;
