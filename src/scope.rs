// Lepton Scope Chain - Lexical Environments as Association Lists
//
// A scope is a cons-list of frames; each frame is an association list of
// `(name . value)` cells. The outermost cons is the spine. The global
// frame is the last one (its enclosing cons has a nil cdr), and it is
// mutated by prepending to the frame while preserving the spine cons
// identity, so closures that captured the scope observe later globals.

use crate::arena::Arena;
use crate::expr;
use crate::types::ExprId;

pub struct Scope {
    pub expr: ExprId,
}

impl Scope {
    /// A scope with one empty frame. The outer cons is the spine whose
    /// identity survives all later mutation.
    pub fn create(arena: &mut Arena) -> Self {
        let frame = arena.nil();
        let outer = arena.nil();
        Self {
            expr: arena.alloc_cons(frame, outer),
        }
    }

    /// Walk frames innermost-first and return the first `(name . value)`
    /// cell bound to `name`. Callers take the cell's cdr for the value;
    /// `set` mutates the cell in place.
    pub fn lookup(&self, arena: &Arena, name: ExprId) -> Option<ExprId> {
        let mut current = self.expr;
        while expr::is_cons(arena, current) {
            let frame = expr::car(arena, current);
            if let Some(cell) = expr::assoc(arena, name, frame) {
                return Some(cell);
            }
            current = expr::cdr(arena, current);
        }
        None
    }

    pub fn set_value(&mut self, arena: &mut Arena, name: ExprId, value: ExprId) {
        self.expr = Self::set_value_impl(arena, self.expr, name, value);
    }

    fn set_value_impl(arena: &mut Arena, scope: ExprId, name: ExprId, value: ExprId) -> ExprId {
        if expr::is_cons(arena, scope) {
            let frame = expr::car(arena, scope);
            if let Some(cell) = expr::assoc(arena, name, frame) {
                /* A binding already exists, mutate it */
                arena.set_cdr(cell, value);
                scope
            } else if expr::is_nil(arena, expr::cdr(arena, scope)) {
                /* We're at the global scope, add a binding, preserving
                 * the identity of the environment list "spine" so that
                 * closed-over environments see the new value cell */
                let cell = arena.alloc_cons(name, value);
                let new_frame = arena.alloc_cons(cell, frame);
                arena.set_car(scope, new_frame);
                scope
            } else {
                /* No binding found yet and not at global scope, recurse */
                let next = expr::cdr(arena, scope);
                Self::set_value_impl(arena, next, name, value);
                scope
            }
        } else {
            let cell = arena.alloc_cons(name, value);
            let nil = arena.nil();
            let frame = arena.alloc_cons(cell, nil);
            arena.alloc_cons(frame, scope)
        }
    }

    /// Push a frame pairing `vars` with `args` element-wise. Pairing stops
    /// when either list runs out; the evaluator checks arity before
    /// calling this.
    pub fn push_frame(&mut self, arena: &mut Arena, vars: ExprId, args: ExprId) {
        let mut frame = arena.nil();
        let mut vars = vars;
        let mut args = args;

        while expr::is_cons(arena, vars) && expr::is_cons(arena, args) {
            let var = expr::car(arena, vars);
            let arg = expr::car(arena, args);
            let cell = arena.alloc_cons(var, arg);
            frame = arena.alloc_cons(cell, frame);
            vars = expr::cdr(arena, vars);
            args = expr::cdr(arena, args);
        }

        self.expr = arena.alloc_cons(frame, self.expr);
    }

    /// Remove the innermost frame; a no-op when the scope is empty.
    pub fn pop_frame(&mut self, arena: &Arena) {
        if expr::is_cons(arena, self.expr) {
            self.expr = expr::cdr(arena, self.expr);
        }
    }
}
