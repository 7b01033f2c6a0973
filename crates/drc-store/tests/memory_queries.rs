//! End-to-end query tests against the in-memory store.

mod common;
use common::*;

use drc_core::CompileError;
use drc_store::{MemoryStore, StoreError};

#[test]
fn university_example() {
    let store = MemoryStore::new(facts(
        "student jane \"Jane Dane\"\n\
         immatriculated jane \"2016\"\n\
         lecture algebra1 \"Algebra 1\"\n\
         registered jane algebra1\n",
    ));
    let result = query(
        &store,
        r#"student(S,SD) && immatriculated(S,"2016") && lecture(L,LD) && registered(S,L)"#,
        &["S", "SD", "L", "LD"],
    );
    assert_eq!(result, rows(&[&["jane", "Jane Dane", "algebra1", "Algebra 1"]]));
}

#[test]
fn binding_substitution_matches_literal() {
    let store = university();
    let literal = query(
        &store,
        r#"student(S,SD) && immatriculated(S,"2016") && lecture(L,LD) && registered(S,L)"#,
        &["S", "SD", "L", "LD"],
    );
    let bound = query_with(
        &store,
        "student(S,SD) && immatriculated(S,Y) && lecture(L,LD) && registered(S,L)",
        &["S", "SD", "L", "LD"],
        &[("Y", "2016")],
    );
    assert_eq!(literal, bound);
    assert_eq!(literal, rows(&[&["jane", "Jane Dane", "algebra1", "Algebra 1"]]));
}

#[test]
fn bare_digits_match_text_values() {
    let store = university();
    assert_eq!(
        query(&store, "immatriculated(S, 2016)", &["S"]),
        rows(&[&["jane"], &["mary"]])
    );
}

#[test]
fn union_is_set_union() {
    let store = university();
    let a = query(&store, "registered(S, \"algebra1\")", &["S"]);
    let b = query(&store, "immatriculated(S, \"2016\")", &["S"]);
    let both = query(
        &store,
        r#"registered(S, "algebra1") || immatriculated(S, "2016")"#,
        &["S"],
    );
    assert_eq!(a, rows(&[&["jane"], &["john"]]));
    assert_eq!(b, rows(&[&["jane"], &["mary"]]));
    assert_eq!(both, rows(&[&["jane"], &["john"], &["mary"]]));
}

#[test]
fn negation_is_difference() {
    let store = MemoryStore::new(facts("p a\np b\np c\nq b\nq z\n"));
    assert_eq!(
        query(&store, "p(X) && !q(X)", &["X"]),
        rows(&[&["a"], &["c"]])
    );
}

#[test]
fn multiple_negations_all_hold() {
    let store = university();
    assert_eq!(
        query(
            &store,
            r#"student(S, *) && !registered(S, "logic") && !immatriculated(S, "2017")"#,
            &["S"],
        ),
        rows(&[&["jane"], &["mary"]])
    );
}

#[test]
fn negation_with_wildcard() {
    let store = university();
    assert_eq!(
        query(&store, "student(S, SD) && !registered(S, *)", &["SD"]),
        rows(&[&["Mary Major"]])
    );
}

#[test]
fn negation_with_external_binding() {
    let store = university();
    assert_eq!(
        query_with(
            &store,
            "lecture(L, LD) && !registered(S, L)",
            &["LD"],
            &[("S", "jane")],
        ),
        rows(&[&["Logic"]])
    );
}

#[test]
fn repeated_variable_is_diagonal() {
    let store = MemoryStore::new(facts("e a a\ne a b\ne b b\ne c a\n"));
    assert_eq!(
        query(&store, "e(X, X)", &["X"]),
        rows(&[&["a"], &["b"]])
    );
}

#[test]
fn wildcard_never_binds() {
    let store = MemoryStore::new(facts("e a x\ne b x\ne c y\n"));
    assert_eq!(
        query(&store, "e(*, Y)", &["Y"]),
        rows(&[&["x"], &["y"]])
    );
    assert_eq!(
        query(&store, "e(*, *)", &[]),
        rows(&[&[]])
    );
}

#[test]
fn results_sorted_as_text() {
    let store = MemoryStore::new(facts("n 2\nn 10\nn 02\nn 1\n"));
    assert_eq!(
        query(&store, "n(X)", &["X"]),
        rows(&[&["02"], &["1"], &["10"], &["2"]])
    );
}

#[test]
fn output_order_follows_wants() {
    let store = university();
    assert_eq!(
        query(&store, "registered(S, L)", &["L", "S"]),
        rows(&[&["algebra1", "jane"], &["algebra1", "john"], &["logic", "john"]])
    );
}

#[test]
fn join_through_shared_variable() {
    let store = university();
    assert_eq!(
        query(
            &store,
            "registered(S, L) && registered(T, L) && !registered(T, \"logic\")",
            &["S", "T"],
        ),
        rows(&[&["jane", "jane"], &["john", "jane"]])
    );
}

#[test]
fn empty_result_is_not_an_error() {
    let store = university();
    assert!(query(&store, "student(S, \"Nobody\")", &["S"]).is_empty());
}

#[test]
fn unsafe_negation_fails() {
    let store = university();
    let err = store
        .query("!student(X, *)", &[], &bindings(&[]))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Query(drc_core::Error::Compile(
            CompileError::UnsafeNegatedVariable { .. }
        ))
    ));
}

#[test]
fn unknown_predicate_fails() {
    let store = university();
    let err = store
        .query("teaches(X, Y)", &names(&["X"]), &bindings(&[]))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Query(drc_core::Error::Compile(CompileError::UnknownPredicate { .. }))
    ));
}

#[test]
fn repeated_runs_agree() {
    let store = university();
    let text = "registered(S, L) && lecture(L, LD) || student(S, LD) && immatriculated(S, L)";
    let first = query(&store, text, &["S", "L", "LD"]);
    let second = query(&store, text, &["S", "L", "LD"]);
    assert_eq!(first, second);
    assert_eq!(first.len(), 6);
}
