#![allow(dead_code)]

use drc_core::{compile, parse_formula, Bindings, CompileError, Formula, ParseError, QueryPlan, Schema};

pub fn parse(query: &str) -> Formula {
    parse_formula(query).unwrap_or_else(|e| panic!("Failed to parse: {query}\nError: {e}"))
}

pub fn parse_err(query: &str) -> ParseError {
    parse_formula(query).expect_err(&format!("Expected parse error for: {query}"))
}

/// Schema of the university example.
pub fn university() -> Schema {
    Schema::new()
        .with_relation("student", &["S", "SD"])
        .with_relation("immatriculated", &["S", "Y"])
        .with_relation("lecture", &["L", "LD"])
        .with_relation("registered", &["S", "L"])
}

pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| String::from(*s)).collect()
}

pub fn bindings(pairs: &[(&str, &str)]) -> Bindings {
    pairs
        .iter()
        .map(|(k, v)| (String::from(*k), String::from(*v)))
        .collect()
}

pub fn plan(query: &str, wants: &[&str], bound: &[(&str, &str)]) -> QueryPlan {
    compile(&university(), &names(wants), &parse(query), &bindings(bound))
        .unwrap_or_else(|e| panic!("Failed to compile: {query}\nError: {e}"))
}

pub fn plan_err(query: &str, wants: &[&str], bound: &[(&str, &str)]) -> CompileError {
    compile(&university(), &names(wants), &parse(query), &bindings(bound))
        .expect_err(&format!("Expected compile error for: {query}"))
}
