// Lepton Argument Matcher - Format-Driven List Destructuring
//
// Validates and extracts arguments by shape and type. The format string
// is a closed alphabet of directives applied left-to-right:
//
//   d  integer atom     -> Arg::Integer
//   f  real atom        -> Arg::Real
//   s  string atom      -> Arg::Str
//   q  symbol atom      -> Arg::Symbol
//   e  any value        -> Arg::Value
//   *  remaining list   -> Arg::Rest (ends consumption; matches nil too)
//
// After the directives are consumed the list must be exhausted, or the
// match fails with the arity error carrying the element count seen.

use smallvec::SmallVec;

use crate::arena::Arena;
use crate::eval::{wrong_argument_type, wrong_integer_of_arguments};
use crate::expr;
use crate::types::{Atom, Expr, ExprId};

/// One extracted binding, typed by the directive that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Integer(i64),
    Real(f32),
    Str(String),
    Symbol(String),
    Value(ExprId),
    Rest(ExprId),
}

pub type MatchResult = Result<SmallVec<[Arg; 4]>, ExprId>;

pub fn match_list(arena: &mut Arena, format: &str, xs: ExprId) -> MatchResult {
    let mut out: SmallVec<[Arg; 4]> = SmallVec::new();
    let directives: Vec<char> = format.chars().collect();
    let mut dir_index = 0;
    let mut cursor = xs;

    while dir_index < directives.len() && !expr::is_nil(arena, cursor) {
        if !expr::is_cons(arena, cursor) {
            return Err(wrong_argument_type(arena, "consp", cursor));
        }
        let x = expr::car(arena, cursor);

        match directives[dir_index] {
            'd' => match arena.get_unchecked(x) {
                Expr::Atom(Atom::Integer(num)) => out.push(Arg::Integer(*num)),
                _ => return Err(wrong_argument_type(arena, "integerp", x)),
            },
            'f' => match arena.get_unchecked(x) {
                Expr::Atom(Atom::Real(real)) => out.push(Arg::Real(*real)),
                _ => return Err(wrong_argument_type(arena, "realp", x)),
            },
            's' => match arena.get_unchecked(x) {
                Expr::Atom(Atom::String(str)) => out.push(Arg::Str(str.clone())),
                _ => return Err(wrong_argument_type(arena, "stringp", x)),
            },
            'q' => match arena.get_unchecked(x) {
                Expr::Atom(Atom::Symbol(sym)) => out.push(Arg::Symbol(sym.clone())),
                _ => return Err(wrong_argument_type(arena, "symbolp", x)),
            },
            'e' => out.push(Arg::Value(x)),
            '*' => {
                out.push(Arg::Rest(cursor));
                cursor = arena.nil();
            }
            directive => panic!("unknown match directive '{directive}'"),
        }

        dir_index += 1;
        if !expr::is_nil(arena, cursor) {
            cursor = expr::cdr(arena, cursor);
        }
    }

    // A trailing `*` also matches the already-empty tail, binding nil.
    if dir_index < directives.len() && directives[dir_index] == '*' && expr::is_nil(arena, cursor) {
        let nil = arena.nil();
        out.push(Arg::Rest(nil));
        dir_index += 1;
    }

    if dir_index < directives.len() || !expr::is_nil(arena, cursor) {
        let seen = expr::length_of_list(arena, xs);
        return Err(wrong_integer_of_arguments(arena, seen));
    }

    Ok(out)
}
