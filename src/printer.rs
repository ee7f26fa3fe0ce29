// Lepton Printer - S-Expression Output
//
// Values round-trip through this printer: proper lists as `(a b c)`,
// dotted tails as `(a b . c)`, strings double-quoted with literal
// characters inside, lambdas and natives as opaque placeholders.

use crate::arena::Arena;
use crate::expr;
use crate::types::{Atom, Expr, ExprId};

pub struct Printer<'a> {
    arena: &'a Arena,
    output: String,
}

impl<'a> Printer<'a> {
    pub fn new(arena: &'a Arena) -> Self {
        Self {
            arena,
            output: String::new(),
        }
    }

    /// Print an expression to string
    pub fn print(&mut self, id: ExprId) -> &str {
        self.print_expr(id);
        &self.output
    }

    fn print_expr(&mut self, id: ExprId) {
        match self.arena.get_unchecked(id).clone() {
            Expr::Atom(atom) => self.print_atom(&atom),
            Expr::Cons(_) => self.print_cons(id),
            Expr::Void => self.output.push_str("<void>"),
        }
    }

    fn print_atom(&mut self, atom: &Atom) {
        match atom {
            Atom::Symbol(sym) => self.output.push_str(sym),
            Atom::Integer(num) => self.output.push_str(&num.to_string()),
            Atom::Real(real) => self.output.push_str(&real.to_string()),
            Atom::String(str) => {
                self.output.push('"');
                self.output.push_str(str);
                self.output.push('"');
            }
            Atom::Lambda(_) => self.output.push_str("<lambda>"),
            Atom::Native(_) => self.output.push_str("<native>"),
        }
    }

    fn print_cons(&mut self, id: ExprId) {
        self.output.push('(');

        let mut cons = match self.arena.get_unchecked(id) {
            Expr::Cons(cons) => *cons,
            _ => unreachable!("print_cons on a non-cons value"),
        };
        self.print_expr(cons.car);

        while let Expr::Cons(next) = self.arena.get_unchecked(cons.cdr) {
            let next = *next;
            self.output.push(' ');
            self.print_expr(next.car);
            cons = next;
        }

        if !expr::is_nil(self.arena, cons.cdr) {
            self.output.push_str(" . ");
            self.print_expr(cons.cdr);
        }

        self.output.push(')');
    }
}

/// Print an expression into a fresh string.
pub fn print_to_string(arena: &Arena, id: ExprId) -> String {
    let mut printer = Printer::new(arena);
    printer.print(id).to_string()
}
