// Lepton REPL Runtime - Interactive-Session Natives
//
// Primitives that only make sense at the prompt: quitting, printing,
// inspecting the scope value and the collector's slot map.

use crate::arena::Arena;
use crate::eval::EvalResult;
use crate::matcher::{match_list, Arg};
use crate::scope::Scope;
use crate::types::{ExprId, NativeFn};

/// Register the REPL-specific primitives on top of the standard library.
pub fn register_repl_runtime(arena: &mut Arena, scope: &mut Scope) {
    register(arena, scope, "quit", prim_quit);
    register(arena, scope, "print", prim_print);
    register(arena, scope, "scope", prim_scope);
    register(arena, scope, "gc-inspect", prim_gc_inspect);
}

fn register(arena: &mut Arena, scope: &mut Scope, name: &str, fun: NativeFn) {
    let name = arena.alloc_symbol(name);
    let native = arena.alloc_native(fun, 0);
    scope.set_value(arena, name, native);
}

fn prim_quit(_param: usize, _arena: &mut Arena, _scope: &mut Scope, _args: ExprId) -> EvalResult {
    std::process::exit(0);
}

fn prim_print(_param: usize, arena: &mut Arena, _scope: &mut Scope, args: ExprId) -> EvalResult {
    let bindings = match_list(arena, "s", args)?;
    let [Arg::Str(message)] = bindings.as_slice() else {
        unreachable!("match format \"s\" yields one string");
    };

    println!("{}", message);

    Ok(arena.nil())
}

/// The current scope as an ordinary value: a list of frames whose last
/// element is the global frame.
fn prim_scope(_param: usize, _arena: &mut Arena, scope: &mut Scope, _args: ExprId) -> EvalResult {
    Ok(scope.expr)
}

fn prim_gc_inspect(_param: usize, arena: &mut Arena, _scope: &mut Scope, _args: ExprId) -> EvalResult {
    let stats = arena.stats();
    println!("{}", arena.inspect());
    println!(
        "{} slots, {} void, {} allocated since last collect",
        stats.total_slots, stats.free_slots, stats.allocs_since_gc
    );

    Ok(arena.nil())
}
