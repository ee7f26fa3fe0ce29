// Lepton Garbage Collector - Mark and Sweep
//
// Stop-the-world collection over the arena, rooted at a single
// caller-supplied value (the current scope in the REPL). Must only run
// between top-level evaluations: no evaluation frame may hold unrooted
// values when `collect` is called.

use std::collections::HashSet;
use std::time::Instant;

use crate::arena::Arena;
use crate::types::{Atom, Expr, ExprId};

/// What one collection cycle did.
#[derive(Debug, Clone, Default)]
pub struct GcReport {
    pub marked_nodes: usize,
    pub freed_nodes: usize,
    pub live_before: usize,
    pub live_after: usize,
    pub elapsed_sec: f64,
}

/// Collect everything unreachable from `root`.
///
/// Marking traverses cons cells through `car`/`cdr` and lambda atoms
/// through `params`/`body`/`envir`; marking is idempotent, so the shared,
/// mutated scope structure (closures aliasing the global spine) is handled
/// without cycle trouble.
pub fn collect(arena: &mut Arena, root: ExprId) -> GcReport {
    let started = Instant::now();
    let live_before = arena.live_slots();

    let mut marked = HashSet::new();
    mark(arena, root, &mut marked);

    let freed_nodes = arena.sweep(&marked);
    arena.reset_alloc_count();

    GcReport {
        marked_nodes: marked.len(),
        freed_nodes,
        live_before,
        live_after: arena.live_slots(),
        elapsed_sec: started.elapsed().as_secs_f64(),
    }
}

/// Depth-first traversal from `root`, recording every reachable slot.
///
/// A handle that does not resolve to an occupied slot is a value that
/// escaped arena registration. That is a host bug, not a user error: the
/// collector refuses to proceed.
fn mark(arena: &Arena, root: ExprId, marked: &mut HashSet<u32>) {
    let expr = match arena.get(root) {
        None | Some(Expr::Void) => {
            eprintln!("gc: tried to collect a value that was not registered: #{}", root.0);
            panic!("gc: unregistered value reached the collector");
        }
        Some(expr) => expr,
    };

    if !marked.insert(root.0) {
        return;
    }

    match expr {
        Expr::Cons(cons) => {
            let cons = *cons;
            mark(arena, cons.car, marked);
            mark(arena, cons.cdr, marked);
        }
        Expr::Atom(Atom::Lambda(lambda)) => {
            let lambda = *lambda;
            mark(arena, lambda.params, marked);
            mark(arena, lambda.body, marked);
            mark(arena, lambda.envir, marked);
        }
        _ => {}
    }
}
