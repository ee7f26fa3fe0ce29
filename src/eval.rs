// Lepton Evaluator - Atom Resolution and Function Application
//
// Recursive tree-walker. Every step yields `Result<ExprId, ExprId>`:
// failures are ordinary heap values (cons lists starting with a symbolic
// tag), printable by the standard printer and, in principle, manipulable
// by programs. No panics for user-visible errors.

use crate::arena::Arena;
use crate::expr;
use crate::scope::Scope;
use crate::types::{Atom, Expr, ExprId};

pub type EvalResult = Result<ExprId, ExprId>;

/// `(wrong-argument-type "TYPE" VALUE)`
pub fn wrong_argument_type(arena: &mut Arena, expected: &str, actual: ExprId) -> ExprId {
    let tag = arena.alloc_symbol("wrong-argument-type");
    let ty = arena.alloc_string(expected);
    arena.list(&[tag, ty, actual])
}

/// `(wrong-integer-of-arguments . N)`
pub fn wrong_integer_of_arguments(arena: &mut Arena, count: i64) -> ExprId {
    let tag = arena.alloc_symbol("wrong-integer-of-arguments");
    let count = arena.alloc_integer(count);
    arena.alloc_cons(tag, count)
}

/// `(read-error "MSG" POS)`
pub fn read_error_value(arena: &mut Arena, message: &str, position: i64) -> ExprId {
    let tag = arena.alloc_symbol("read-error");
    let message = arena.alloc_string(message);
    let position = arena.alloc_integer(position);
    arena.list(&[tag, message, position])
}

fn unexpected_expression(arena: &mut Arena, value: ExprId) -> ExprId {
    let tag = arena.alloc_symbol("unexpected-expression");
    arena.alloc_cons(tag, value)
}

fn expected_callable(arena: &mut Arena, value: ExprId) -> ExprId {
    let tag = arena.alloc_symbol("expected-callable");
    arena.alloc_cons(tag, value)
}

fn expected_list(arena: &mut Arena, value: ExprId) -> ExprId {
    let tag = arena.alloc_symbol("expected-list");
    arena.alloc_cons(tag, value)
}

/// Non-symbol atoms evaluate to themselves; symbols resolve through the
/// scope chain, failing with `(void-variable . name)` when unbound.
fn eval_atom(arena: &mut Arena, scope: &mut Scope, id: ExprId) -> EvalResult {
    match arena.get_unchecked(id) {
        Expr::Atom(Atom::Symbol(_)) => match scope.lookup(arena, id) {
            Some(cell) => Ok(expr::cdr(arena, cell)),
            None => {
                let tag = arena.alloc_symbol("void-variable");
                Err(arena.alloc_cons(tag, id))
            }
        },
        Expr::Atom(_) => Ok(id),
        _ => Err(unexpected_expression(arena, id)),
    }
}

/// Evaluate every element of `args` left-to-right, short-circuiting on
/// the first failure, and return the list of results.
pub fn eval_all_args(arena: &mut Arena, scope: &mut Scope, args: ExprId) -> EvalResult {
    match arena.get_unchecked(args) {
        Expr::Atom(_) => eval_atom(arena, scope, args),
        Expr::Cons(cons) => {
            let cons = *cons;
            let car = eval(arena, scope, cons.car)?;
            let cdr = eval_all_args(arena, scope, cons.cdr)?;
            Ok(arena.alloc_cons(car, cdr))
        }
        Expr::Void => Err(unexpected_expression(arena, args)),
    }
}

/// Apply a lambda atom to an already-evaluated argument list.
///
/// Builds a fresh evaluation scope on the lambda's captured environment,
/// pushes a frame pairing parameters with arguments, and evaluates the
/// body forms in order. The empty body yields nil.
pub fn call_lambda(arena: &mut Arena, lambda: ExprId, args: ExprId) -> EvalResult {
    let data = match arena.get_unchecked(lambda) {
        Expr::Atom(Atom::Lambda(data)) => *data,
        _ => return Err(expected_callable(arena, lambda)),
    };

    if !expr::is_list(arena, args) {
        return Err(expected_list(arena, args));
    }

    let vars = data.params;
    if expr::length_of_list(arena, args) != expr::length_of_list(arena, vars) {
        let count = expr::length_of_list(arena, args);
        return Err(wrong_integer_of_arguments(arena, count));
    }

    let mut call_scope = Scope { expr: data.envir };
    call_scope.push_frame(arena, vars, args);

    let mut result = arena.nil();
    let mut body = data.body;
    while expr::is_cons(arena, body) {
        let form = expr::car(arena, body);
        result = eval(arena, &mut call_scope, form)?;
        body = expr::cdr(arena, body);
    }

    Ok(result)
}

/// The application protocol: evaluate the head, decide argument
/// evaluation by whether the head is *syntactically* a special-form
/// symbol, then dispatch to a native or a lambda.
pub fn eval_funcall(
    arena: &mut Arena,
    scope: &mut Scope,
    callable_expr: ExprId,
    args_expr: ExprId,
) -> EvalResult {
    let callable = eval(arena, scope, callable_expr)?;

    let special = match arena.get_unchecked(callable_expr) {
        Expr::Atom(Atom::Symbol(name)) => expr::is_special(name),
        _ => false,
    };
    let args = if special {
        args_expr
    } else {
        eval_all_args(arena, scope, args_expr)?
    };

    if let Expr::Atom(Atom::Native(native)) = arena.get_unchecked(callable) {
        let native = *native;
        return (native.fun)(native.param, arena, scope, args);
    }

    call_lambda(arena, callable, args)
}

/// Evaluate an expression in the given scope.
pub fn eval(arena: &mut Arena, scope: &mut Scope, expr: ExprId) -> EvalResult {
    match arena.get_unchecked(expr) {
        Expr::Atom(_) => eval_atom(arena, scope, expr),
        Expr::Cons(cons) => {
            let cons = *cons;
            eval_funcall(arena, scope, cons.car, cons.cdr)
        }
        Expr::Void => Err(unexpected_expression(arena, expr)),
    }
}

/// Evaluate a proper list of forms in order in the same scope and return
/// the last result, or nil for the empty block. This is the primitive
/// behind `begin`, `when`, and top-level loading.
pub fn eval_block(arena: &mut Arena, scope: &mut Scope, block: ExprId) -> EvalResult {
    if !expr::is_list(arena, block) {
        return Err(wrong_argument_type(arena, "listp", block));
    }

    let mut result = arena.nil();
    let mut head = block;
    while expr::is_cons(arena, head) {
        let form = expr::car(arena, head);
        result = eval(arena, scope, form)?;
        head = expr::cdr(arena, head);
    }

    Ok(result)
}
