//! Formfield Core
//!
//! A data-driven interpreter for form fields. Forms are plain data: an ordered
//! list of field schemas stored per form version. This crate turns that data
//! into behavior.
//!
//! ## Features
//!
//! - **Schema**: Lenient parsing of field and form definitions
//! - **Defaults**: Initial value resolution per field type
//! - **Validation**: Ordered, pluggable per-field rules with first-failure messages
//! - **Codec**: Legacy and tagged wire encodings for stored answers
//! - **Rendering**: Control descriptions and event handling for UI layers
//! - **Submission**: Full-form validation and encoding of client payloads
//!
//! ## Architecture
//!
//! 1. **Schema** (`schema`): `FieldSchema`, `FieldType` and its behavior table,
//!    `FormSchema`.
//!
//! 2. **Values** (`value`): the three answer shapes, scalar, flag and list.
//!
//! 3. **Defaults** (`defaults`): `DefaultResolver`.
//!
//! 4. **Validation** (`validation`): `Validator` and the rule set under
//!    `validation::rules`.
//!
//! 5. **Codec** (`codec`): `ValueCodec`, `WireCodec` and the schema-less
//!    heuristic `decode`.
//!
//! 6. **Rendering** (`render`): `FieldRenderer` and `Control`.
//!
//! 7. **Submission** (`submission`): `SubmissionProcessor`.
//!
//! The library logs through `tracing` and never installs a subscriber.
//!
//! ## Example
//!
//! ```rust
//! use formfield_core::{DefaultResolver, FieldId, FormSchema, Validator};
//!
//! let form = FormSchema::from_json(r#"[
//!     {"id": 1, "type": "text", "label": "Name", "required": true},
//!     {"id": 2, "type": "range", "label": "Score", "minValue": 0, "maxValue": 9}
//! ]"#).unwrap();
//!
//! let values = DefaultResolver::new().initial_values(&form);
//! let report = Validator::new().validate_form(&form, &values);
//!
//! assert_eq!(report.messages()[&FieldId::from("1")], "Name is required");
//! assert_eq!(values[&FieldId::from("2")].as_scalar(), Some("4"));
//! ```

pub mod codec;
pub mod config;
pub mod defaults;
pub mod error;
pub mod render;
pub mod schema;
pub mod submission;
pub mod validation;
pub mod value;

// Re-export commonly used types
pub use codec::{wire_codec, LegacyCodec, TaggedCodec, TaggedValue, ValueCodec, WireCodec};
pub use config::{InterpreterConfig, InterpreterConfigBuilder, WireFormat};
pub use defaults::DefaultResolver;
pub use error::{FormError, Result};
pub use render::{Control, ControlEvent, ControlKind, FieldBinding, FieldRenderer};
pub use schema::{FieldBehavior, FieldId, FieldOption, FieldSchema, FieldType, FormSchema};
pub use submission::{
    DecodedResponse, EncodedResponse, Rejection, SubmissionPayload, SubmissionProcessor,
};
pub use validation::{FieldError, ValidationReport, Validator};
pub use value::{FieldValue, ValueShape};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
