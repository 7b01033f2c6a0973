#![allow(dead_code)]

use drc_core::Bindings;
use drc_store::{FactSet, MemoryStore, Row};

pub const UNIVERSITY: &str = "\
# students and their descriptions
student\tjane\tJane Dane
student\tjohn\tJohn Doe
student\tmary\tMary Major
immatriculated\tjane\t2016
immatriculated\tjohn\t2017
immatriculated\tmary\t2016
lecture\talgebra1\tAlgebra 1
lecture\tlogic\tLogic
registered\tjane\talgebra1
registered\tjohn\tlogic
registered\tjohn\talgebra1
";

pub fn facts(text: &str) -> FactSet {
    FactSet::from_str(text).unwrap_or_else(|e| panic!("Failed to load facts: {e}"))
}

pub fn university() -> MemoryStore {
    MemoryStore::new(facts(UNIVERSITY))
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

pub fn rows(items: &[&[&str]]) -> Vec<Row> {
    items.iter().map(|row| names(row)).collect()
}

pub fn query(store: &MemoryStore, text: &str, wants: &[&str]) -> Vec<Row> {
    query_with(store, text, wants, &[])
}

pub fn query_with(
    store: &MemoryStore,
    text: &str,
    wants: &[&str],
    bound: &[(&str, &str)],
) -> Vec<Row> {
    store
        .query(text, &names(wants), &bindings(bound))
        .unwrap_or_else(|e| panic!("Failed to run: {text}\nError: {e}"))
}
