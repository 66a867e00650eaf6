//! Structural code builder.
//!
//! [`CodeUnit`] models a class or interface (parent, implemented types,
//! traits, properties, methods, docblocks) and renders it into a
//! [`CodeSequence`](crate::code::CodeSequence) where every member is a
//! fragment labeled with its name, so later steps can patch the output by
//! label. [`Customizers`] lets a generator stamp out a fixed member list and
//! customize individual members.

pub mod customize;
pub mod docblock;
pub mod literal;
pub mod method;
pub mod unit;

pub use customize::{hook_name, stamp_methods, Customizer, Customizers};
pub use docblock::DocblockBuilder;
pub use literal::{literal, quote};
pub use method::{Argument, MethodBuilder};
pub use unit::{CodeUnit, Property, UnitKind};

/// One indentation level in generated code.
pub const INDENT: &str = "    ";

/// Labels of the structural fragments emitted by [`CodeUnit::render`].
pub mod labels {
    pub const OPEN_TAG: &str = "open-tag";
    pub const NAMESPACE: &str = "namespace";
    pub const USE: &str = "use";
    pub const DOCBLOCK: &str = "docblock";
    pub const DECLARATION: &str = "declaration";
    pub const BODY_OPEN: &str = "body-open";
    pub const TRAIT: &str = "trait";
    pub const BODY_CLOSE: &str = "body-close";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}
