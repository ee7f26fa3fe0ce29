// Lepton Value Predicates - Type Checks and Structural Equality

use crate::arena::Arena;
use crate::types::{Atom, Expr, ExprId};

/// Names whose application receives its arguments unevaluated.
/// Kept sorted so membership is a binary search.
const SPECIAL_FORMS: [&str; 8] = [
    "begin",
    "defun",
    "lambda",
    "quasiquote",
    "quote",
    "set",
    "when",
    "λ",
];

/// Check if a name denotes a special form.
pub fn is_special(name: &str) -> bool {
    SPECIAL_FORMS.binary_search(&name).is_ok()
}

/// A value is nil iff it is the symbol `nil`.
pub fn is_nil(arena: &Arena, id: ExprId) -> bool {
    matches!(arena.get_unchecked(id), Expr::Atom(Atom::Symbol(sym)) if sym == "nil")
}

pub fn is_symbol(arena: &Arena, id: ExprId) -> bool {
    matches!(arena.get_unchecked(id), Expr::Atom(Atom::Symbol(_)))
}

pub fn is_integer(arena: &Arena, id: ExprId) -> bool {
    matches!(arena.get_unchecked(id), Expr::Atom(Atom::Integer(_)))
}

pub fn is_real(arena: &Arena, id: ExprId) -> bool {
    matches!(arena.get_unchecked(id), Expr::Atom(Atom::Real(_)))
}

pub fn is_string(arena: &Arena, id: ExprId) -> bool {
    matches!(arena.get_unchecked(id), Expr::Atom(Atom::String(_)))
}

pub fn is_cons(arena: &Arena, id: ExprId) -> bool {
    matches!(arena.get_unchecked(id), Expr::Cons(_))
}

pub fn is_lambda(arena: &Arena, id: ExprId) -> bool {
    matches!(arena.get_unchecked(id), Expr::Atom(Atom::Lambda(_)))
}

pub fn is_native(arena: &Arena, id: ExprId) -> bool {
    matches!(arena.get_unchecked(id), Expr::Atom(Atom::Native(_)))
}

/// A list is nil or a cons whose cdr is a list.
pub fn is_list(arena: &Arena, id: ExprId) -> bool {
    let mut current = id;
    loop {
        if is_nil(arena, current) {
            return true;
        }
        match arena.get_unchecked(current) {
            Expr::Cons(cons) => current = cons.cdr,
            _ => return false,
        }
    }
}

pub fn is_list_of_symbols(arena: &Arena, id: ExprId) -> bool {
    let mut current = id;
    loop {
        if is_nil(arena, current) {
            return true;
        }
        match arena.get_unchecked(current) {
            Expr::Cons(cons) if is_symbol(arena, cons.car) => current = cons.cdr,
            _ => return false,
        }
    }
}

/// First element of a pair. The caller guarantees `id` is a cons.
pub fn car(arena: &Arena, id: ExprId) -> ExprId {
    match arena.get_unchecked(id) {
        Expr::Cons(cons) => cons.car,
        _ => panic!("car of a non-cons value"),
    }
}

/// Rest of a pair. The caller guarantees `id` is a cons.
pub fn cdr(arena: &Arena, id: ExprId) -> ExprId {
    match arena.get_unchecked(id) {
        Expr::Cons(cons) => cons.cdr,
        _ => panic!("cdr of a non-cons value"),
    }
}

/// Number of cons cells in the spine of a list. Total on improper lists
/// (stops at the first non-cons tail); undefined only on cyclic input,
/// which neither the reader nor the evaluator produces.
pub fn length_of_list(arena: &Arena, id: ExprId) -> i64 {
    let mut count = 0;
    let mut current = id;
    while let Expr::Cons(cons) = arena.get_unchecked(current) {
        count += 1;
        current = cons.cdr;
    }
    count
}

/// Structural equality. Integers compare exactly, reals within 1e-6,
/// symbols and strings by content, lambdas and natives by identity.
pub fn equal(arena: &Arena, a: ExprId, b: ExprId) -> bool {
    match (arena.get_unchecked(a), arena.get_unchecked(b)) {
        (Expr::Atom(atom1), Expr::Atom(atom2)) => match (atom1, atom2) {
            (Atom::Symbol(sym1), Atom::Symbol(sym2)) => sym1 == sym2,
            (Atom::Integer(num1), Atom::Integer(num2)) => num1 == num2,
            (Atom::Real(real1), Atom::Real(real2)) => (real1 - real2).abs() < 1e-6,
            (Atom::String(str1), Atom::String(str2)) => str1 == str2,
            (Atom::Lambda(_), Atom::Lambda(_)) => a == b,
            (Atom::Native(native1), Atom::Native(native2)) => native1 == native2,
            _ => false,
        },
        (Expr::Cons(cons1), Expr::Cons(cons2)) => {
            let (cons1, cons2) = (*cons1, *cons2);
            equal(arena, cons1.car, cons2.car) && equal(arena, cons1.cdr, cons2.cdr)
        }
        (Expr::Void, Expr::Void) => true,
        _ => false,
    }
}

/// Find the first cell of `alist` whose car equals `key`.
/// Returns the whole `(key . value)` cell so callers can mutate it.
pub fn assoc(arena: &Arena, key: ExprId, alist: ExprId) -> Option<ExprId> {
    let mut current = alist;
    while let Expr::Cons(cons) = arena.get_unchecked(current) {
        let cell = cons.car;
        let next = cons.cdr;
        if is_cons(arena, cell) && equal(arena, key, car(arena, cell)) {
            return Some(cell);
        }
        current = next;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nil_is_the_symbol_nil() {
        let mut arena = Arena::new();
        let nil = arena.nil();
        let sym = arena.alloc_symbol("nil");
        let other = arena.alloc_symbol("nile");
        assert!(is_nil(&arena, nil));
        assert!(is_nil(&arena, sym));
        assert!(!is_nil(&arena, other));
    }

    #[test]
    fn list_predicates() {
        let mut arena = Arena::new();
        let one = arena.alloc_integer(1);
        let two = arena.alloc_integer(2);
        let proper = arena.list(&[one, two]);
        let improper = arena.alloc_cons(one, two);

        assert!(is_list(&arena, proper));
        assert!(!is_list(&arena, improper));
        assert_eq!(length_of_list(&arena, proper), 2);
        assert_eq!(length_of_list(&arena, improper), 1);

        let x = arena.alloc_symbol("x");
        let y = arena.alloc_symbol("y");
        let params = arena.list(&[x, y]);
        assert!(is_list_of_symbols(&arena, params));
        assert!(!is_list_of_symbols(&arena, proper));
    }

    #[test]
    fn equal_compares_structure() {
        let mut arena = Arena::new();
        let a1 = arena.alloc_symbol("a");
        let b1 = arena.alloc_integer(5);
        let list1 = arena.list(&[a1, b1]);
        let a2 = arena.alloc_symbol("a");
        let b2 = arena.alloc_integer(5);
        let list2 = arena.list(&[a2, b2]);

        assert!(equal(&arena, list1, list2));
        assert!(equal(&arena, list2, list1));
        assert!(equal(&arena, list1, list1));
    }

    #[test]
    fn equal_reals_within_tolerance() {
        let mut arena = Arena::new();
        let x = arena.alloc_real(1.0);
        let y = arena.alloc_real(1.0000005);
        let z = arena.alloc_real(1.1);
        assert!(equal(&arena, x, y));
        assert!(!equal(&arena, x, z));

        let n = arena.alloc_integer(1);
        assert!(!equal(&arena, x, n));
    }

    #[test]
    fn equal_lambdas_by_identity() {
        let mut arena = Arena::new();
        let nil1 = arena.nil();
        let nil2 = arena.nil();
        let nil3 = arena.nil();
        let lambda1 = arena.alloc_lambda(nil1, nil2, nil3);
        let lambda2 = arena.alloc_lambda(nil1, nil2, nil3);
        assert!(equal(&arena, lambda1, lambda1));
        assert!(!equal(&arena, lambda1, lambda2));
    }

    #[test]
    fn assoc_finds_the_first_cell() {
        let mut arena = Arena::new();
        let a = arena.alloc_symbol("a");
        let b = arena.alloc_symbol("b");
        let ten = arena.alloc_integer(10);
        let twenty = arena.alloc_integer(20);
        let a_pair = arena.alloc_cons(a, ten);
        let b_pair = arena.alloc_cons(b, twenty);
        let alist = arena.list(&[a_pair, b_pair]);

        assert_eq!(assoc(&arena, a, alist), Some(a_pair));
        assert_eq!(assoc(&arena, b, alist), Some(b_pair));
        let c = arena.alloc_symbol("c");
        assert_eq!(assoc(&arena, c, alist), None);
    }

    #[test]
    fn special_form_set_is_closed() {
        for name in ["set", "quote", "begin", "defun", "lambda", "λ", "when", "quasiquote"] {
            assert!(is_special(name), "{name} should be special");
        }
        for name in ["car", "list", "unquote", "if", "print"] {
            assert!(!is_special(name), "{name} should not be special");
        }
    }
}
