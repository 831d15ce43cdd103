//! Normalized type descriptors.

use crate::store::Id;

/// Id of an interned [`TypeDescriptor`].
pub type TypeId = Id<TypeDescriptor>;

/// The base kind of a type, before vector/matrix/array shaping.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum BaseKind {
    #[default]
    Void,
    Float,
    Double,
    Float16,
    Int,
    Uint,
    Int64,
    Uint64,
    Bool,
    /// Samplers, textures and images.
    Sampler,
    Struct,
    /// Interface blocks.
    Block,
    /// A basic type the slurper does not distinguish.
    Unknown,
}

/// A normalized type: base kind, matrix columns, rows (or vector size) and
/// the array dimension sizes, outermost first.
///
/// Two descriptors are the same type iff all fields compare equal.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct TypeDescriptor {
    pub base: BaseKind,
    /// Matrix column count, `1` for scalars and vectors.
    pub columns: u32,
    /// Matrix row count or vector size, `1` for scalars.
    pub rows: u32,
    /// Array dimension sizes; empty if not an array. `0` marks an unsized dimension.
    pub array_sizes: Vec<u32>,
}

impl TypeDescriptor {
    /// A scalar of the given kind.
    pub fn scalar(base: BaseKind) -> Self {
        Self {
            base,
            columns: 1,
            rows: 1,
            array_sizes: Vec::new(),
        }
    }

    /// A vector with `size` components.
    pub fn vector(base: BaseKind, size: u32) -> Self {
        Self {
            rows: size.max(1),
            ..Self::scalar(base)
        }
    }

    /// A `columns` x `rows` matrix.
    pub fn matrix(base: BaseKind, columns: u32, rows: u32) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
            ..Self::scalar(base)
        }
    }

    /// Wraps this type in array dimensions.
    pub fn with_array_sizes(mut self, sizes: impl IntoIterator<Item = u32>) -> Self {
        self.array_sizes.extend(sizes);
        self
    }

    /// Returns `true` if the type has at least one array dimension.
    pub fn is_array(&self) -> bool {
        !self.array_sizes.is_empty()
    }
}
