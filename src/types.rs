// Lepton Value Model - Tagged Expressions
//
// Every value is a tagged sum stored in the arena and addressed by an
// `ExprId` handle. Handles stay valid until a collection finds them
// unreachable from the supplied root.

use crate::arena::Arena;
use crate::eval::EvalResult;
use crate::scope::Scope;

/// Unique identifier for a heap value (index into the arena)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ExprId(pub u32);

/// A heap value: an atom, a pair, or a reclaimed slot.
///
/// `Void` marks slots emptied by the sweep phase. It is never produced by
/// the reader or the evaluator and never escapes the arena.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Atom(Atom),
    Cons(Cons),
    Void,
}

/// An ordered pair, the building block of lists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cons {
    pub car: ExprId,
    pub cdr: ExprId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Symbol(String),
    Integer(i64),
    Real(f32),
    String(String),
    Lambda(Lambda),
    Native(Native),
}

/// A closure: parameter list, body forms, and the scope value captured at
/// the point of construction. All three are heap values traced by the
/// collector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lambda {
    pub params: ExprId,
    pub body: ExprId,
    pub envir: ExprId,
}

/// Signature of a host-implemented primitive. `args` is the
/// already-evaluated argument list, unless the primitive is registered
/// under a special-form name.
pub type NativeFn = fn(param: usize, arena: &mut Arena, scope: &mut Scope, args: ExprId) -> EvalResult;

/// A host-implemented callable with an opaque parameter cookie.
/// Natives compare by identity: same function pointer, same cookie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Native {
    pub fun: NativeFn,
    pub param: usize,
}
