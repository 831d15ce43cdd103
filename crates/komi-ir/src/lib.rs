//! Komi: an interned, deduplicated value graph for slurped shader programs.
//!
//! Types, l-values, r-values, statement blocks and function names are each
//! interned behind small dense ids. L-value and r-value ids are scoped to
//! the [`TypeId`] that owns them, so structurally identical expressions of
//! different types never collide.

mod display;
mod error;
mod func;
mod stmt;
pub mod store;
mod types;
mod value;

pub use display::{
    INVALID_LVALUE, INVALID_RVALUE, LITERAL, format_type, render, render_block, render_statement,
    render_value,
};
pub use error::IrError;
pub use func::{FunctionDefinition, FunctionId};
pub use stmt::{Block, BranchOperator, Statement, StatementBlockId};
pub use store::{Id, IdStore};
pub use types::{BaseKind, TypeDescriptor, TypeId};
pub use value::{LValue, LValueId, RValue, RValueId, RValueOperator, TypedValue, ValueId};

/// The l-value and r-value stores of one type.
#[derive(Clone, Debug, Default)]
pub struct ValueStores {
    pub lvalues: IdStore<LValue>,
    pub rvalues: IdStore<RValue>,
}

/// A slurped translation unit.
#[derive(Clone, Debug, Default)]
pub struct Komi {
    /// Deduplicated types.
    pub types: IdStore<TypeDescriptor>,
    /// Per-type value stores, slot `n` belongs to type id `n + 1`.
    values: Vec<ValueStores>,
    /// Deduplicated statement blocks.
    pub blocks: IdStore<Block>,
    /// Function names, shared by definitions and calls.
    pub function_names: IdStore<String>,
    /// Function definitions in source order.
    pub functions: Vec<FunctionDefinition>,
}

/// Interner sizes of a [`Komi`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KomiStats {
    pub types: usize,
    pub lvalues: usize,
    pub rvalues: usize,
    pub blocks: usize,
    pub function_names: usize,
    pub functions: usize,
}

impl Komi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern_type(&mut self, ty: TypeDescriptor) -> TypeId {
        self.types.insert(ty)
    }

    /// Interns an l-value in the stores of `ty`.
    ///
    /// Returns the invalid id if `ty` was not assigned by [`Komi::intern_type`].
    pub fn intern_lvalue(&mut self, ty: TypeId, lvalue: LValue) -> LValueId {
        match self.values_mut(ty) {
            Some(stores) => stores.lvalues.insert(lvalue),
            None => LValueId::INVALID,
        }
    }

    /// Interns an r-value in the stores of `ty`.
    ///
    /// Returns the invalid id if `ty` was not assigned by [`Komi::intern_type`].
    pub fn intern_rvalue(&mut self, ty: TypeId, rvalue: RValue) -> RValueId {
        match self.values_mut(ty) {
            Some(stores) => stores.rvalues.insert(rvalue),
            None => RValueId::INVALID,
        }
    }

    pub fn intern_block(&mut self, block: Block) -> StatementBlockId {
        self.blocks.insert(block)
    }

    pub fn intern_function_name(&mut self, name: &str) -> FunctionId {
        match self.function_names.lookup(name) {
            Some(id) => id,
            None => self.function_names.insert(name.to_owned()),
        }
    }

    /// Value stores of `ty`, if any value of that type was interned.
    pub fn values(&self, ty: TypeId) -> Option<&ValueStores> {
        ty.slot().and_then(|slot| self.values.get(slot))
    }

    pub fn lvalue(&self, ty: TypeId, id: LValueId) -> Result<&LValue, IrError> {
        self.values(ty)
            .ok_or(IrError::UnknownType { id: ty.raw() })?
            .lvalues
            .get(id)
    }

    pub fn rvalue(&self, ty: TypeId, id: RValueId) -> Result<&RValue, IrError> {
        self.values(ty)
            .ok_or(IrError::UnknownType { id: ty.raw() })?
            .rvalues
            .get(id)
    }

    pub fn block(&self, id: StatementBlockId) -> Result<&Block, IrError> {
        self.blocks.get(id)
    }

    pub fn function_name(&self, id: FunctionId) -> Result<&str, IrError> {
        self.function_names.get(id).map(String::as_str)
    }

    /// Counts the contents of every store.
    pub fn stats(&self) -> KomiStats {
        KomiStats {
            types: self.types.len(),
            lvalues: self.values.iter().map(|s| s.lvalues.len()).sum(),
            rvalues: self.values.iter().map(|s| s.rvalues.len()).sum(),
            blocks: self.blocks.len(),
            function_names: self.function_names.len(),
            functions: self.functions.len(),
        }
    }

    /// Renders every function definition as pseudo-source.
    pub fn render(&self) -> String {
        render(self)
    }

    fn values_mut(&mut self, ty: TypeId) -> Option<&mut ValueStores> {
        self.types.try_get(ty)?;
        let slot = ty.slot()?;
        if self.values.len() <= slot {
            self.values.resize_with(slot + 1, ValueStores::default);
        }
        self.values.get_mut(slot)
    }
}
