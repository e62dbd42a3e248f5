//! Tests for the state layer: codec round-trips, identity preservation,
//! loader merge order and capture modes.

use std::fs;
use std::path::PathBuf;

use statecap::error::EngineError;
use statecap::parser::static_semantics::classify_program;
use statecap::parser::ScriptParser;
use statecap::runner::api::run_program;
use statecap::runner::ds::env::Namespace;
use statecap::runner::ds::value::Value;
use statecap::state::artifact::{decode_namespace, encode_namespace, ARTIFACT_EXT};
use statecap::state::{capture, loader};

fn run(source: &str) -> Namespace {
    let program = ScriptParser::parse_to_ast_from_str(source).unwrap();
    let mut ns = Namespace::new();
    run_program(&program, &mut ns).unwrap();
    ns
}

fn roundtrip(ns: &Namespace) -> Namespace {
    decode_namespace(&encode_namespace(ns).unwrap()).unwrap()
}

#[test]
fn test_scalar_roundtrip() {
    let mut ns = Namespace::new();
    ns.set("n", Value::Null);
    ns.set("b", Value::Bool(true));
    ns.set("i", Value::Int(-42));
    ns.set("f", Value::Float(2.5));
    ns.set("s", Value::Str("hello".to_string()));
    let loaded = roundtrip(&ns);
    assert_eq!(loaded.len(), 5);
    assert_eq!(loaded.get("n"), Some(&Value::Null));
    assert_eq!(loaded.get("b"), Some(&Value::Bool(true)));
    assert_eq!(loaded.get("i"), Some(&Value::Int(-42)));
    assert_eq!(loaded.get("f"), Some(&Value::Float(2.5)));
    assert_eq!(loaded.get("s"), Some(&Value::Str("hello".to_string())));
}

#[test]
fn test_nested_list_roundtrip() {
    let ns = run("outer = [1, [2, [3]], \"x\"];");
    let loaded = roundtrip(&ns);
    match loaded.get("outer").unwrap() {
        Value::List(items) => {
            let items = items.borrow();
            assert_eq!(items.len(), 3);
            assert_eq!(items[0], Value::Int(1));
            assert!(matches!(items[1], Value::List(_)));
        }
        other => panic!("expected list, got {:?}", other),
    }
}

#[test]
fn test_aliased_names_stay_aliased_after_roundtrip() {
    let ns = run("a = [];\nb = a;");
    let loaded = roundtrip(&ns);
    let (a, b) = (loaded.get("a").unwrap(), loaded.get("b").unwrap());
    // Same object, not two independent empty lists.
    assert_eq!(a, b);
    // Mutation through one name is observed through the other.
    if let Value::List(list) = a {
        list.borrow_mut().push(Value::Int(7));
    }
    match b {
        Value::List(list) => assert_eq!(list.borrow().len(), 1),
        other => panic!("expected list, got {:?}", other),
    }
}

#[test]
fn test_equal_but_distinct_lists_are_not_collapsed() {
    let ns = run("a = [1, 2];\nb = [1, 2];");
    let loaded = roundtrip(&ns);
    assert_ne!(loaded.get("a").unwrap(), loaded.get("b").unwrap());
}

#[test]
fn test_shared_sublist_roundtrip() {
    let ns = run("inner = [1];\nx = [inner, inner];");
    let loaded = roundtrip(&ns);
    if let Value::List(list) = loaded.get("x").unwrap() {
        let items = list.borrow();
        assert_eq!(items[0], items[1]);
        assert_eq!(items[0], *loaded.get("inner").unwrap());
    } else {
        panic!("expected list");
    }
}

#[test]
fn test_cyclic_list_roundtrip() {
    let mut ns = Namespace::new();
    let list = Value::new_list(vec![Value::Int(1)]);
    if let Value::List(inner) = &list {
        inner.borrow_mut().push(list.clone());
    }
    ns.set("cycle", list);

    let loaded = roundtrip(&ns);
    match loaded.get("cycle").unwrap() {
        Value::List(outer) => {
            let items = outer.borrow();
            assert_eq!(items.len(), 2);
            assert_eq!(items[0], Value::Int(1));
            // The second element is the list itself.
            match &items[1] {
                Value::List(again) => assert!(std::rc::Rc::ptr_eq(outer, again)),
                other => panic!("expected list, got {:?}", other),
            }
        }
        other => panic!("expected list, got {:?}", other),
    }
}

#[test]
fn test_function_roundtrip_is_callable() {
    let ns = run("fn double(n) { return n * 2; }");
    let mut loaded = roundtrip(&ns);
    assert!(matches!(loaded.get("double"), Some(Value::Function(_))));

    let next = ScriptParser::parse_to_ast_from_str("r = double(21);").unwrap();
    run_program(&next, &mut loaded).unwrap();
    assert_eq!(loaded.get("r"), Some(&Value::Int(42)));
}

#[test]
fn test_decode_rejects_garbage() {
    assert!(decode_namespace(b"not an artifact").is_err());
}

#[test]
fn test_decode_rejects_wrong_codec_version() {
    let mut ns = Namespace::new();
    ns.set("x", Value::Int(1));
    let mut bytes = encode_namespace(&ns).unwrap();
    // The version field sits right after the 4-byte magic.
    bytes[4] = bytes[4].wrapping_add(1);
    let err = decode_namespace(&bytes).unwrap_err();
    assert!(err.to_string().contains("version mismatch"), "{}", err);
}

#[test]
fn test_loader_merges_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path_a = dir.path().join(format!("a_state.{}", ARTIFACT_EXT));
    let path_b = dir.path().join(format!("b_state.{}", ARTIFACT_EXT));

    let mut a = Namespace::new();
    a.set("x", Value::Int(1));
    a.set("only_a", Value::Str("a".to_string()));
    fs::write(&path_a, encode_namespace(&a).unwrap()).unwrap();

    let mut b = Namespace::new();
    b.set("x", Value::Int(2));
    fs::write(&path_b, encode_namespace(&b).unwrap()).unwrap();

    let seed = loader::load_state_files(&[&path_a, &path_b]).unwrap();
    assert_eq!(seed.get("x"), Some(&Value::Int(2)));
    assert_eq!(seed.get("only_a"), Some(&Value::Str("a".to_string())));

    let reversed = loader::load_state_files(&[&path_b, &path_a]).unwrap();
    assert_eq!(reversed.get("x"), Some(&Value::Int(1)));
}

#[test]
fn test_loader_with_no_artifacts_yields_empty_namespace() {
    let paths: Vec<PathBuf> = vec![];
    let seed = loader::load_state_files(&paths).unwrap();
    assert!(seed.is_empty());
}

#[test]
fn test_loader_names_the_missing_path() {
    let missing = PathBuf::from("/nonexistent/state.chk");
    let err = loader::load_state_files(&[&missing]).unwrap_err();
    match &err {
        EngineError::Deserialization { path, .. } => {
            assert_eq!(path, &missing);
        }
        other => panic!("expected DeserializationError, got {}", other),
    }
    assert!(err.to_string().starts_with("DeserializationError:"));
}

#[test]
fn test_loader_aborts_on_corrupt_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.chk");
    fs::write(&bad, b"garbage").unwrap();
    assert!(matches!(
        loader::load_state_files(&[&bad]),
        Err(EngineError::Deserialization { .. })
    ));
}

#[test]
fn test_combined_capture_takes_classified_and_inherited_names() {
    let source = "y = x + 1;\nfn f() { return y; }";
    let program = ScriptParser::parse_to_ast_from_str(source).unwrap();
    let classification = classify_program(&program);

    let mut seed = Namespace::new();
    seed.set("x", Value::Int(1));
    seed.set("legacy", Value::Str("kept".to_string()));

    let mut executed = seed.clone();
    run_program(&program, &mut executed).unwrap();

    let output = capture::capture_combined(&classification, &seed, &executed);
    // Classified: x, y, f. Inherited but unclassified: legacy.
    assert_eq!(output.get("y"), Some(&Value::Int(2)));
    assert_eq!(output.get("x"), Some(&Value::Int(1)));
    assert_eq!(output.get("legacy"), Some(&Value::Str("kept".to_string())));
    assert!(matches!(output.get("f"), Some(Value::Function(_))));
}

#[test]
fn test_combined_capture_preserves_aliasing_with_seed() {
    // An inherited list mutated in place keeps its identity with a
    // freshly assigned alias through capture and reload.
    let source = "push(shared, 1);\ncopy = shared;";
    let program = ScriptParser::parse_to_ast_from_str(source).unwrap();
    let classification = classify_program(&program);

    let mut seed = Namespace::new();
    seed.set("shared", Value::new_list(vec![]));
    let mut executed = seed.clone();
    run_program(&program, &mut executed).unwrap();

    let output = capture::capture_combined(&classification, &seed, &executed);
    let loaded = roundtrip(&output);
    assert_eq!(loaded.get("shared").unwrap(), loaded.get("copy").unwrap());
}

#[test]
fn test_combined_capture_skips_transient_builtin_references() {
    // `print` classifies as a candidate but never enters the namespace,
    // so it cannot be captured.
    let source = "print(x = 1);";
    let program = ScriptParser::parse_to_ast_from_str(source).unwrap();
    let classification = classify_program(&program);
    assert!(classification.contains("print"));

    let seed = Namespace::new();
    let mut executed = seed.clone();
    run_program(&program, &mut executed).unwrap();

    let output = capture::capture_combined(&classification, &seed, &executed);
    assert_eq!(output.get("x"), Some(&Value::Int(1)));
    assert!(output.get("print").is_none());
}

#[test]
fn test_write_combined_appends_codec_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("node1_state");
    let mut ns = Namespace::new();
    ns.set("y", Value::Int(42));

    let written = capture::write_combined(base.to_str().unwrap(), &ns).unwrap();
    assert_eq!(written.extension().and_then(|e| e.to_str()), Some(ARTIFACT_EXT));

    let loaded = loader::load_state_files(&[&written]).unwrap();
    assert_eq!(loaded.get("y"), Some(&Value::Int(42)));
}

#[test]
fn test_per_name_capture_writes_pure_names_only() {
    let dir = tempfile::tempdir().unwrap();

    let source = "x = 1;\nr = len([1, 2]);\nfn g(n) { return n; }";
    let program = ScriptParser::parse_to_ast_from_str(source).unwrap();
    let classification = classify_program(&program);
    let mut executed = Namespace::new();
    run_program(&program, &mut executed).unwrap();

    let written = capture::write_per_name(&classification, &executed, dir.path()).unwrap();

    let stems: Vec<String> = written
        .iter()
        .map(|p| p.file_stem().unwrap().to_str().unwrap().to_string())
        .collect();
    // `x` is pure, `g` is a function; `r` is a call result and `len`
    // never entered the namespace.
    assert!(stems.contains(&"var_x".to_string()));
    assert!(stems.contains(&"func_g".to_string()));
    assert_eq!(stems.len(), 2);

    let x_path = dir.path().join(format!("var_x.{}", ARTIFACT_EXT));
    let loaded = loader::load_state_files(&[&x_path]).unwrap();
    assert_eq!(loaded.get("x"), Some(&Value::Int(1)));
    assert_eq!(loaded.len(), 1);
}
