// Lepton Primitives - Standard Library Natives
//
// Host-implemented callables registered into the global frame. Ordinary
// primitives receive their arguments already evaluated; the ones
// registered under special-form names (set, quote, begin, defun, when,
// lambda, λ, quasiquote) rely on the evaluator NOT having evaluated them.

use num_traits::ToPrimitive;

use crate::arena::Arena;
use crate::eval::{
    eval, eval_block, read_error_value, wrong_argument_type, wrong_integer_of_arguments, EvalResult,
};
use crate::expr;
use crate::matcher::{match_list, Arg};
use crate::reader;
use crate::scope::Scope;
use crate::types::{Atom, Expr, ExprId, NativeFn};

/// Register all standard primitives
pub fn register_primitives(arena: &mut Arena, scope: &mut Scope) {
    register(arena, scope, "car", prim_car);
    register(arena, scope, "cdr", prim_cdr);
    register(arena, scope, ">", prim_greater);
    register(arena, scope, "+", prim_plus);
    register(arena, scope, "-", prim_minus);
    register(arena, scope, "*", prim_mul);
    register(arena, scope, "list", prim_list);
    register(arena, scope, "assoc", prim_assoc);
    register(arena, scope, "append", prim_append);
    register(arena, scope, "equal", prim_equal);
    register(arena, scope, "load", prim_load);

    // Not a special form: an ordinary native whose only job is to report
    // misuse. Real unquote handling happens inside quasiquote.
    register(arena, scope, "unquote", prim_unquote);

    // Special forms: the evaluator passes these their arguments raw.
    register(arena, scope, "set", prim_set);
    register(arena, scope, "quote", prim_quote);
    register(arena, scope, "begin", prim_begin);
    register(arena, scope, "defun", prim_defun);
    register(arena, scope, "when", prim_when);
    register(arena, scope, "lambda", prim_lambda);
    register(arena, scope, "λ", prim_lambda);
    register(arena, scope, "quasiquote", prim_quasiquote);

    let t_name = arena.alloc_symbol("t");
    let t_value = arena.alloc_symbol("t");
    scope.set_value(arena, t_name, t_value);
    let nil_name = arena.alloc_symbol("nil");
    let nil_value = arena.alloc_symbol("nil");
    scope.set_value(arena, nil_name, nil_value);
}

fn register(arena: &mut Arena, scope: &mut Scope, name: &str, fun: NativeFn) {
    let name = arena.alloc_symbol(name);
    let native = arena.alloc_native(fun, 0);
    scope.set_value(arena, name, native);
}

// ============================================================================
// Numeric helpers
// ============================================================================

/// Widen a value to a real, accepting reals and integers.
fn as_real(arena: &mut Arena, x: ExprId) -> Result<f32, ExprId> {
    match arena.get_unchecked(x) {
        Expr::Atom(Atom::Real(real)) => Ok(*real),
        Expr::Atom(Atom::Integer(num)) => Ok(num.to_f32().unwrap_or(f32::INFINITY)),
        _ => Err(wrong_argument_type(arena, "(or realp integerp)", x)),
    }
}

fn integer_payload(arena: &Arena, x: ExprId) -> Option<i64> {
    match arena.get_unchecked(x) {
        Expr::Atom(Atom::Integer(num)) => Some(*num),
        _ => None,
    }
}

fn add2(arena: &mut Arena, a: ExprId, b: ExprId) -> EvalResult {
    match (integer_payload(arena, a), integer_payload(arena, b)) {
        (Some(x), Some(y)) => Ok(arena.alloc_integer(x.wrapping_add(y))),
        _ => {
            let x = as_real(arena, a)?;
            let y = as_real(arena, b)?;
            Ok(arena.alloc_real(x + y))
        }
    }
}

fn sub2(arena: &mut Arena, a: ExprId, b: ExprId) -> EvalResult {
    match (integer_payload(arena, a), integer_payload(arena, b)) {
        (Some(x), Some(y)) => Ok(arena.alloc_integer(x.wrapping_sub(y))),
        _ => {
            let x = as_real(arena, a)?;
            let y = as_real(arena, b)?;
            Ok(arena.alloc_real(x - y))
        }
    }
}

fn mul2(arena: &mut Arena, a: ExprId, b: ExprId) -> EvalResult {
    match (integer_payload(arena, a), integer_payload(arena, b)) {
        (Some(x), Some(y)) => Ok(arena.alloc_integer(x.wrapping_mul(y))),
        _ => {
            let x = as_real(arena, a)?;
            let y = as_real(arena, b)?;
            Ok(arena.alloc_real(x * y))
        }
    }
}

fn greater2(arena: &mut Arena, a: ExprId, b: ExprId) -> Result<bool, ExprId> {
    match (integer_payload(arena, a), integer_payload(arena, b)) {
        (Some(x), Some(y)) => Ok(x > y),
        _ => {
            let x = as_real(arena, a)?;
            let y = as_real(arena, b)?;
            Ok(x > y)
        }
    }
}

// ============================================================================
// Ordinary primitives
// ============================================================================

fn prim_car(_param: usize, arena: &mut Arena, _scope: &mut Scope, args: ExprId) -> EvalResult {
    let bindings = match_list(arena, "e", args)?;
    let [Arg::Value(xs)] = bindings.as_slice() else {
        unreachable!("match format \"e\" yields one value");
    };
    let xs = *xs;

    if expr::is_nil(arena, xs) {
        return Ok(xs);
    }
    if !expr::is_cons(arena, xs) {
        return Err(wrong_argument_type(arena, "consp", xs));
    }

    Ok(expr::car(arena, xs))
}

fn prim_cdr(_param: usize, arena: &mut Arena, _scope: &mut Scope, args: ExprId) -> EvalResult {
    let bindings = match_list(arena, "e", args)?;
    let [Arg::Value(xs)] = bindings.as_slice() else {
        unreachable!("match format \"e\" yields one value");
    };
    let xs = *xs;

    if expr::is_nil(arena, xs) {
        return Ok(xs);
    }
    if !expr::is_cons(arena, xs) {
        return Err(wrong_argument_type(arena, "consp", xs));
    }

    Ok(expr::cdr(arena, xs))
}

/// `(> x1 x2 ... xn)` is true when the arguments are strictly decreasing.
fn prim_greater(_param: usize, arena: &mut Arena, _scope: &mut Scope, args: ExprId) -> EvalResult {
    if !expr::is_cons(arena, args) {
        return Err(wrong_argument_type(arena, "consp", args));
    }

    let mut x1 = expr::car(arena, args);
    let mut rest = expr::cdr(arena, args);
    let mut sorted = true;

    while !expr::is_nil(arena, rest) && sorted {
        if !expr::is_cons(arena, rest) {
            return Err(wrong_argument_type(arena, "consp", rest));
        }
        let x2 = expr::car(arena, rest);
        rest = expr::cdr(arena, rest);

        sorted = sorted && greater2(arena, x1, x2)?;
        x1 = x2;
    }

    Ok(arena.bool_as_expr(sorted))
}

fn prim_plus(_param: usize, arena: &mut Arena, _scope: &mut Scope, args: ExprId) -> EvalResult {
    let mut acc = arena.alloc_integer(0);
    let mut rest = args;

    while !expr::is_nil(arena, rest) {
        if !expr::is_cons(arena, rest) {
            return Err(wrong_argument_type(arena, "consp", rest));
        }
        let x = expr::car(arena, rest);
        acc = add2(arena, acc, x)?;
        rest = expr::cdr(arena, rest);
    }

    Ok(acc)
}

/// `(- x)` negates; `(- x y ...)` subtracts left to right.
fn prim_minus(_param: usize, arena: &mut Arena, _scope: &mut Scope, args: ExprId) -> EvalResult {
    if !expr::is_cons(arena, args) {
        return Err(wrong_integer_of_arguments(arena, 0));
    }

    let first = expr::car(arena, args);
    let mut rest = expr::cdr(arena, args);

    if expr::is_nil(arena, rest) {
        let zero = arena.alloc_integer(0);
        return sub2(arena, zero, first);
    }

    let mut acc = first;
    while !expr::is_nil(arena, rest) {
        if !expr::is_cons(arena, rest) {
            return Err(wrong_argument_type(arena, "consp", rest));
        }
        let x = expr::car(arena, rest);
        acc = sub2(arena, acc, x)?;
        rest = expr::cdr(arena, rest);
    }

    Ok(acc)
}

fn prim_mul(_param: usize, arena: &mut Arena, _scope: &mut Scope, args: ExprId) -> EvalResult {
    let mut acc = arena.alloc_integer(1);
    let mut rest = args;

    while !expr::is_nil(arena, rest) {
        if !expr::is_cons(arena, rest) {
            return Err(wrong_argument_type(arena, "consp", rest));
        }
        let x = expr::car(arena, rest);
        acc = mul2(arena, acc, x)?;
        rest = expr::cdr(arena, rest);
    }

    Ok(acc)
}

fn prim_list(_param: usize, _arena: &mut Arena, _scope: &mut Scope, args: ExprId) -> EvalResult {
    Ok(args)
}

fn prim_assoc(_param: usize, arena: &mut Arena, _scope: &mut Scope, args: ExprId) -> EvalResult {
    let bindings = match_list(arena, "ee", args)?;
    let [Arg::Value(key), Arg::Value(alist)] = bindings.as_slice() else {
        unreachable!("match format \"ee\" yields two values");
    };

    match expr::assoc(arena, *key, *alist) {
        Some(cell) => Ok(cell),
        None => Ok(arena.nil()),
    }
}

/// Concatenate proper lists; the last argument becomes the shared tail.
fn prim_append(_param: usize, arena: &mut Arena, scope: &mut Scope, args: ExprId) -> EvalResult {
    if expr::is_nil(arena, args) {
        return Ok(args);
    }
    append_helper(arena, scope, args)
}

fn append_helper(arena: &mut Arena, scope: &mut Scope, xs: ExprId) -> EvalResult {
    let bindings = match_list(arena, "e*", xs)?;
    let [Arg::Value(x), Arg::Rest(rest)] = bindings.as_slice() else {
        unreachable!("match format \"e*\" yields two values");
    };
    let (x, rest) = (*x, *rest);

    if expr::is_nil(arena, rest) {
        return Ok(x);
    }
    if !expr::is_list(arena, x) {
        return Err(wrong_argument_type(arena, "listp", x));
    }

    let tail = append_helper(arena, scope, rest)?;

    let mut elements = Vec::new();
    let mut current = x;
    while expr::is_cons(arena, current) {
        elements.push(expr::car(arena, current));
        current = expr::cdr(arena, current);
    }

    let mut result = tail;
    for &element in elements.iter().rev() {
        result = arena.alloc_cons(element, result);
    }
    Ok(result)
}

fn prim_equal(_param: usize, arena: &mut Arena, _scope: &mut Scope, args: ExprId) -> EvalResult {
    let bindings = match_list(arena, "ee", args)?;
    let [Arg::Value(obj1), Arg::Value(obj2)] = bindings.as_slice() else {
        unreachable!("match format \"ee\" yields two values");
    };

    let result = expr::equal(arena, *obj1, *obj2);
    Ok(arena.bool_as_expr(result))
}

fn prim_load(_param: usize, arena: &mut Arena, scope: &mut Scope, args: ExprId) -> EvalResult {
    let bindings = match_list(arena, "s", args)?;
    let [Arg::Str(filename)] = bindings.as_slice() else {
        unreachable!("match format \"s\" yields one string");
    };

    let source = match std::fs::read_to_string(filename) {
        Ok(source) => source,
        Err(err) => {
            let message = err.to_string();
            return Err(read_error_value(arena, &message, 0));
        }
    };

    let forms = match reader::read_all(arena, &source) {
        Ok(forms) => forms,
        Err(err) => {
            let message = err.kind.to_string();
            return Err(read_error_value(arena, &message, err.pos as i64));
        }
    };

    eval_block(arena, scope, forms)
}

// ============================================================================
// Special forms
// ============================================================================

/// `(set 'name value)`. Both operands arrive unevaluated; the name
/// operand is evaluated and must yield a symbol, so the usual spelling
/// quotes it.
fn prim_set(_param: usize, arena: &mut Arena, scope: &mut Scope, args: ExprId) -> EvalResult {
    let bindings = match_list(arena, "ee", args)?;
    let [Arg::Value(name_expr), Arg::Value(value_expr)] = bindings.as_slice() else {
        unreachable!("match format \"ee\" yields two values");
    };
    let (name_expr, value_expr) = (*name_expr, *value_expr);

    let name = eval(arena, scope, name_expr)?;
    if !expr::is_symbol(arena, name) {
        return Err(wrong_argument_type(arena, "symbolp", name));
    }

    let result = eval(arena, scope, value_expr)?;
    scope.set_value(arena, name, result);

    Ok(result)
}

fn prim_quote(_param: usize, arena: &mut Arena, _scope: &mut Scope, args: ExprId) -> EvalResult {
    let bindings = match_list(arena, "e", args)?;
    let [Arg::Value(value)] = bindings.as_slice() else {
        unreachable!("match format \"e\" yields one value");
    };
    Ok(*value)
}

fn prim_begin(_param: usize, arena: &mut Arena, scope: &mut Scope, args: ExprId) -> EvalResult {
    let bindings = match_list(arena, "*", args)?;
    let [Arg::Rest(block)] = bindings.as_slice() else {
        unreachable!("match format \"*\" yields the whole list");
    };
    eval_block(arena, scope, *block)
}

/// `(defun name (params...) body...)` desugars to `(set name <lambda>)`.
fn prim_defun(_param: usize, arena: &mut Arena, scope: &mut Scope, args: ExprId) -> EvalResult {
    let bindings = match_list(arena, "ee*", args)?;
    let [Arg::Value(name), Arg::Value(params), Arg::Rest(body)] = bindings.as_slice() else {
        unreachable!("match format \"ee*\" yields three values");
    };
    let (name, params, body) = (*name, *params, *body);

    if !expr::is_list_of_symbols(arena, params) {
        return Err(wrong_argument_type(arena, "list-of-symbolsp", params));
    }

    let lambda = arena.alloc_lambda(params, body, scope.expr);
    let set = arena.alloc_symbol("set");
    let quote = arena.alloc_symbol("quote");
    let quoted_name = arena.list(&[quote, name]);
    let form = arena.list(&[set, quoted_name, lambda]);
    eval(arena, scope, form)
}

fn prim_when(_param: usize, arena: &mut Arena, scope: &mut Scope, args: ExprId) -> EvalResult {
    let bindings = match_list(arena, "e*", args)?;
    let [Arg::Value(condition), Arg::Rest(body)] = bindings.as_slice() else {
        unreachable!("match format \"e*\" yields two values");
    };
    let (condition, body) = (*condition, *body);

    let condition = eval(arena, scope, condition)?;
    if !expr::is_nil(arena, condition) {
        return eval_block(arena, scope, body);
    }

    Ok(arena.nil())
}

fn prim_lambda(_param: usize, arena: &mut Arena, scope: &mut Scope, args: ExprId) -> EvalResult {
    let bindings = match_list(arena, "e*", args)?;
    let [Arg::Value(params), Arg::Rest(body)] = bindings.as_slice() else {
        unreachable!("match format \"e*\" yields two values");
    };
    let (params, body) = (*params, *body);

    if !expr::is_list_of_symbols(arena, params) {
        return Err(wrong_argument_type(arena, "list-of-symbolsp", params));
    }

    Ok(arena.alloc_lambda(params, body, scope.expr))
}

/// Quasiquote is textual, not hygienic: `(quasiquote x)` copies x,
/// evaluating any `(unquote y)` it finds on the way down.
fn prim_quasiquote(param: usize, arena: &mut Arena, scope: &mut Scope, args: ExprId) -> EvalResult {
    let bindings = match_list(arena, "e", args)?;
    let [Arg::Value(template)] = bindings.as_slice() else {
        unreachable!("match format \"e\" yields one value");
    };
    let template = *template;

    if let Ok(unquote_bindings) = match_list(arena, "qe", template) {
        if let [Arg::Symbol(head), Arg::Value(inner)] = unquote_bindings.as_slice() {
            if head == "unquote" {
                return eval(arena, scope, *inner);
            }
        }
    }

    if expr::is_cons(arena, template) {
        let car = expr::car(arena, template);
        let cdr = expr::cdr(arena, template);

        let wrapped_car = {
            let nil = arena.nil();
            arena.alloc_cons(car, nil)
        };
        let left = prim_quasiquote(param, arena, scope, wrapped_car)?;

        let wrapped_cdr = {
            let nil = arena.nil();
            arena.alloc_cons(cdr, nil)
        };
        let right = prim_quasiquote(param, arena, scope, wrapped_cdr)?;

        return Ok(arena.alloc_cons(left, right));
    }

    Ok(template)
}

fn prim_unquote(_param: usize, arena: &mut Arena, _scope: &mut Scope, _args: ExprId) -> EvalResult {
    Err(arena.alloc_string("Using unquote outside of quasiquote."))
}
