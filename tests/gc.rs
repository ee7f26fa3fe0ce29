use lepton::arena::Arena;
use lepton::eval::eval;
use lepton::gc;
use lepton::primitives::register_primitives;
use lepton::printer::print_to_string;
use lepton::reader::read_one;
use lepton::scope::Scope;
use lepton::types::{Expr, ExprId};

fn interpreter() -> (Arena, Scope) {
    let mut arena = Arena::new();
    let mut scope = Scope::create(&mut arena);
    register_primitives(&mut arena, &mut scope);
    (arena, scope)
}

fn run(arena: &mut Arena, scope: &mut Scope, source: &str) -> ExprId {
    let form = read_one(arena, source).expect("test source should read");
    eval(arena, scope, form).expect("evaluation should succeed")
}

#[test]
fn rooted_values_survive_collection_unchanged() {
    let (mut arena, mut scope) = interpreter();
    run(&mut arena, &mut scope, "(set 'keep (list 1 2 3))");

    gc::collect(&mut arena, scope.expr);

    let keep = run(&mut arena, &mut scope, "keep");
    assert_eq!(print_to_string(&arena, keep), "(1 2 3)");
}

#[test]
fn unreachable_values_are_reclaimed() {
    let (mut arena, mut scope) = interpreter();
    run(&mut arena, &mut scope, "(set 'keep (list 1 2 3))");
    gc::collect(&mut arena, scope.expr);
    let live_baseline = arena.live_slots();

    // Nothing binds this list; it is garbage after evaluation.
    let garbage = run(&mut arena, &mut scope, "(list 4 5 6)");
    assert!(arena.live_slots() > live_baseline);

    let report = gc::collect(&mut arena, scope.expr);

    assert!(report.freed_nodes > 0);
    assert_eq!(arena.live_slots(), live_baseline);
    assert!(matches!(arena.get_unchecked(garbage), Expr::Void));
}

#[test]
fn collection_reports_consistent_counts() {
    let (mut arena, mut scope) = interpreter();
    run(&mut arena, &mut scope, "(list 1 2 3)");

    let report = gc::collect(&mut arena, scope.expr);

    assert_eq!(report.marked_nodes, report.live_after);
    assert_eq!(report.live_before, report.live_after + report.freed_nodes);
    assert_eq!(arena.live_slots(), report.live_after);
    assert_eq!(arena.allocs_since_gc(), 0);
}

#[test]
fn collection_does_not_break_the_global_spine() {
    let (mut arena, mut scope) = interpreter();

    // A closure whose body refers to a global that does not exist yet.
    run(&mut arena, &mut scope, "(defun c () new)");

    // Churn the heap, then collect with the scope as the root.
    for _ in 0..100 {
        run(&mut arena, &mut scope, "(list 1 2 3 4 5)");
    }
    gc::collect(&mut arena, scope.expr);

    // Defining the global after the collect is still visible to the
    // closure, because closures share the same spine cons.
    run(&mut arena, &mut scope, "(set 'new 1)");
    let result = run(&mut arena, &mut scope, "(c)");
    assert_eq!(print_to_string(&arena, result), "1");
}

#[test]
fn repeated_collections_reach_a_fixpoint() {
    let (mut arena, mut scope) = interpreter();
    run(&mut arena, &mut scope, "(set 'keep (list 1 2))");

    gc::collect(&mut arena, scope.expr);
    let live = arena.live_slots();

    let report = gc::collect(&mut arena, scope.expr);
    assert_eq!(report.freed_nodes, 0);
    assert_eq!(arena.live_slots(), live);
}

#[test]
fn captured_environments_keep_their_frames_alive() {
    let (mut arena, mut scope) = interpreter();
    run(&mut arena, &mut scope, "(set 'f ((lambda (x) (lambda () x)) 7))");

    gc::collect(&mut arena, scope.expr);

    // The frame binding x to 7 is only reachable through the closure.
    let result = run(&mut arena, &mut scope, "(f)");
    assert_eq!(print_to_string(&arena, result), "7");
}

#[test]
fn inspect_shows_voids_after_collection() {
    let (mut arena, mut scope) = interpreter();
    run(&mut arena, &mut scope, "(list 1 2 3)");

    assert!(!arena.inspect().contains('.'));
    gc::collect(&mut arena, scope.expr);
    let map = arena.inspect();
    assert!(map.contains('.'));
    assert!(map.contains('+'));
    assert_eq!(map.len(), arena.len());
}

#[test]
#[should_panic(expected = "unregistered value")]
fn collecting_an_unregistered_handle_is_fatal() {
    let mut arena = Arena::new();
    gc::collect(&mut arena, ExprId(999));
}
