use lepton::arena::Arena;
use lepton::expr;
use lepton::scope::Scope;

#[test]
fn set_binds_through_frames_and_pop_restores() {
    let mut arena = Arena::new();
    let mut scope = Scope::create(&mut arena);

    let x = arena.alloc_symbol("x");
    let y = arena.alloc_symbol("y");
    let z = arena.alloc_symbol("z");
    let hello = arena.alloc_string("hello");
    let world = arena.alloc_string("world");
    let foo = arena.alloc_string("foo");

    let vars = arena.list(&[x, y]);
    let args = arena.list(&[hello, world]);
    scope.push_frame(&mut arena, vars, args);

    // z is unbound, so it lands in the global frame underneath.
    scope.set_value(&mut arena, z, foo);

    let x_cell = scope.lookup(&arena, x).expect("x should be bound");
    let expected = arena.alloc_cons(x, hello);
    assert!(expr::equal(&arena, x_cell, expected));

    let y_cell = scope.lookup(&arena, y).expect("y should be bound");
    let expected = arena.alloc_cons(y, world);
    assert!(expr::equal(&arena, y_cell, expected));

    let z_cell = scope.lookup(&arena, z).expect("z should be bound");
    let expected = arena.alloc_cons(z, foo);
    assert!(expr::equal(&arena, z_cell, expected));

    scope.pop_frame(&arena);

    assert!(scope.lookup(&arena, x).is_none());
    assert!(scope.lookup(&arena, y).is_none());
    let z_cell = scope.lookup(&arena, z).expect("z should survive the pop");
    let expected = arena.alloc_cons(z, foo);
    assert!(expr::equal(&arena, z_cell, expected));
}

#[test]
fn inner_frames_shadow_outer_ones() {
    let mut arena = Arena::new();
    let mut scope = Scope::create(&mut arena);

    let x = arena.alloc_symbol("x");
    let one = arena.alloc_integer(1);
    let two = arena.alloc_integer(2);

    scope.set_value(&mut arena, x, one);

    let vars = arena.list(&[x]);
    let args = arena.list(&[two]);
    scope.push_frame(&mut arena, vars, args);

    let cell = scope.lookup(&arena, x).expect("x should be bound");
    assert!(expr::equal(&arena, expr::cdr(&arena, cell), two));

    scope.pop_frame(&arena);
    let cell = scope.lookup(&arena, x).expect("x should be bound");
    assert!(expr::equal(&arena, expr::cdr(&arena, cell), one));
}

#[test]
fn set_mutates_an_existing_binding_in_place() {
    let mut arena = Arena::new();
    let mut scope = Scope::create(&mut arena);

    let x = arena.alloc_symbol("x");
    let one = arena.alloc_integer(1);
    let two = arena.alloc_integer(2);

    scope.set_value(&mut arena, x, one);
    let cell_before = scope.lookup(&arena, x).expect("x should be bound");

    scope.set_value(&mut arena, x, two);
    let cell_after = scope.lookup(&arena, x).expect("x should be bound");

    // Same cell, new cdr.
    assert_eq!(cell_before, cell_after);
    assert!(expr::equal(&arena, expr::cdr(&arena, cell_after), two));
}

#[test]
fn global_set_preserves_the_spine_identity() {
    let mut arena = Arena::new();
    let mut scope = Scope::create(&mut arena);

    // A closure would capture this handle at construction time.
    let captured = scope.expr;

    let a = arena.alloc_symbol("a");
    let one = arena.alloc_integer(1);
    scope.set_value(&mut arena, a, one);

    assert_eq!(scope.expr, captured);

    // The binding is visible through the captured handle.
    let alias = Scope { expr: captured };
    let cell = alias.lookup(&arena, a).expect("a should be visible to the alias");
    assert!(expr::equal(&arena, expr::cdr(&arena, cell), one));
}

#[test]
fn push_frame_pairs_until_either_side_runs_out() {
    let mut arena = Arena::new();
    let mut scope = Scope::create(&mut arena);

    let x = arena.alloc_symbol("x");
    let y = arena.alloc_symbol("y");
    let one = arena.alloc_integer(1);

    let vars = arena.list(&[x, y]);
    let args = arena.list(&[one]);
    scope.push_frame(&mut arena, vars, args);

    assert!(scope.lookup(&arena, x).is_some());
    assert!(scope.lookup(&arena, y).is_none());
}

#[test]
fn pop_on_an_empty_scope_is_a_no_op() {
    let mut arena = Arena::new();
    let mut scope = Scope::create(&mut arena);

    scope.pop_frame(&arena);
    let expr_after_one_pop = scope.expr;
    scope.pop_frame(&arena);
    assert_eq!(scope.expr, expr_after_one_pop);
}

#[test]
fn lookup_on_an_unbound_name_returns_nothing() {
    let mut arena = Arena::new();
    let scope = Scope::create(&mut arena);
    let ghost = arena.alloc_symbol("ghost");
    assert!(scope.lookup(&arena, ghost).is_none());
}
