//! Phinx migration code generation.
//!
//! [`column`] turns catalog column descriptors into `addColumn` calls,
//! [`options`] renders the PHP option arrays they carry, and [`document`]
//! stitches columns, indexes and foreign keys into a migration class.

pub mod column;
pub mod document;
pub mod options;

pub use column::{translate_column, ColumnDeclaration, TranslationGap};
pub use document::{class_name, GeneratorInfo, MigrationDocument, Quirks};
pub use options::{OptionBag, OptionValue};
