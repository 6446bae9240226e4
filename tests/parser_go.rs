use deplinks::parsers::go::parse_file;
use deplinks::parsers::{ImportKind, QualifiedRef, SourceFile};
use std::path::Path;

fn parse(source: &str) -> SourceFile {
    parse_file(Path::new("/tmp/demo/file.go"), source)
        .unwrap()
        .expect("source should parse")
}

#[test]
fn extracts_package_name_and_top_level_declarations() {
    let file = parse(
        r#"package demo

const greeting = "hi"

var Count, total int

type Server struct {
	addr string
}

type Option = func(*Server)

func New() *Server {
	return &Server{}
}

func (s *Server) Close() {}
"#,
    );

    assert_eq!(file.package_name, "demo");
    assert_eq!(
        file.declared,
        vec!["greeting", "Count", "total", "Server", "Option", "New"]
    );
    // Close is a method, bound to its receiver rather than the package.
    assert!(!file.declared.contains(&"Close".to_string()));
}

#[test]
fn extracts_import_forms() {
    let file = parse(
        r#"package demo

import (
	"fmt"
	srv "example.com/mod/server"
	. "example.com/mod/signals"
	_ "example.com/mod/side"
)
"#,
    );

    let kinds: Vec<(&str, &ImportKind)> = file
        .imports
        .iter()
        .map(|import| (import.path.as_str(), &import.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("fmt", &ImportKind::Default),
            ("example.com/mod/server", &ImportKind::Named("srv".to_string())),
            ("example.com/mod/signals", &ImportKind::Dot),
            ("example.com/mod/side", &ImportKind::Blank),
        ]
    );
}

#[test]
fn free_idents_exclude_locals_and_own_declarations() {
    let file = parse(
        r#"package demo

import "fmt"

const greeting = "hi"

func Greet(name string) {
	message := decorate(name)
	fmt.Println(message, greeting)
}
"#,
    );

    assert!(file.free_idents.contains(&"decorate".to_string()));
    // Parameters, locals and the file's own top-level names are bound.
    assert!(!file.free_idents.contains(&"name".to_string()));
    assert!(!file.free_idents.contains(&"message".to_string()));
    assert!(!file.free_idents.contains(&"greeting".to_string()));
    assert!(!file.free_idents.contains(&"Greet".to_string()));
    // Selector fields are reached through their operand, never free.
    assert!(!file.free_idents.contains(&"Println".to_string()));
}

#[test]
fn free_idents_include_dot_imported_usage() {
    let file = parse(
        r#"package main

import (
	. "example.com/mod/signals"
)

func main() {
	stop := SetupSignals()
	<-stop
}
"#,
    );

    assert!(file.free_idents.contains(&"SetupSignals".to_string()));
    assert!(!file.free_idents.contains(&"stop".to_string()));
}

#[test]
fn free_idents_include_type_references() {
    let file = parse(
        r#"package demo

func Handle(w ResponseWriter) {
	var next Handler
	_ = next
	_ = w
}
"#,
    );

    assert!(file.free_idents.contains(&"ResponseWriter".to_string()));
    assert!(file.free_idents.contains(&"Handler".to_string()));
}

#[test]
fn qualified_refs_capture_value_and_type_positions() {
    let file = parse(
        r#"package demo

import (
	srv "example.com/mod/server"
)

func build(port int) *srv.Server {
	s := srv.New(port)
	return s
}
"#,
    );

    assert!(file.qualified_refs.contains(&QualifiedRef {
        qualifier: "srv".to_string(),
        name: "New".to_string(),
    }));
    assert!(file.qualified_refs.contains(&QualifiedRef {
        qualifier: "srv".to_string(),
        name: "Server".to_string(),
    }));
}

#[test]
fn chained_selectors_record_only_the_innermost_pair() {
    let file = parse(
        r#"package demo

func read(client pkg.Client) {
	_ = pkg.conn.Read
	_ = client.conn.Write
}
"#,
    );

    assert!(file.qualified_refs.contains(&QualifiedRef {
        qualifier: "pkg".to_string(),
        name: "conn".to_string(),
    }));
    assert!(!file
        .qualified_refs
        .iter()
        .any(|reference| reference.name == "Read" || reference.name == "Write"));
}

#[test]
fn struct_literal_keys_are_not_references() {
    let file = parse(
        r#"package demo

type config struct {
	addr string
	port int
}

func defaults() config {
	return config{addr: defaultAddr, port: 80}
}
"#,
    );

    assert!(file.free_idents.contains(&"defaultAddr".to_string()));
    assert!(!file.free_idents.contains(&"addr".to_string()));
    assert!(!file.free_idents.contains(&"port".to_string()));
}

#[test]
fn syntax_errors_and_missing_package_clause_yield_none() {
    let invalid = parse_file(Path::new("/tmp/demo/bad.go"), "func oops( {\n").unwrap();
    assert!(invalid.is_none());

    let empty = parse_file(Path::new("/tmp/demo/empty.go"), "").unwrap();
    assert!(empty.is_none());
}
