// src/scanner/tests.rs

//! Tests of the scanner's public entry points, `scan_uniforms` and
//! `scan_attributes`, on whole shader sources.

use super::*;

fn uniforms(src: &str) -> Vec<String> {
    ShaderScanner::new().scan_uniforms(src)
}

fn attributes(src: &str) -> Vec<String> {
    ShaderScanner::new().scan_attributes(src)
}

#[test_log::test]
fn builtin_declarations_in_order() {
    let src = "uniform float time;\n\
               uniform mat4 model_view;\n\
               uniform sampler2D diffuse;\n\
               uniform bool enabled;";
    assert_eq!(uniforms(src), vec!["time", "model_view", "diffuse", "enabled"]);
}

#[test_log::test]
fn struct_uniform_flattens() {
    let src = "struct Inner { float a; float b; }; struct Outer { Inner i; float c; }; uniform Outer u;";
    assert_eq!(uniforms(src), vec!["u.i.a", "u.i.b", "u.c"]);
}

#[test_log::test]
fn deep_nesting_leaves_no_struct_segments() {
    let src = "struct var3_t { int a2; int b2; int c2; };\n\
               struct var_t { int a; int b; int c; var3_t f; };\n\
               struct var2_t { var_t other; int d; int e; };\n\
               uniform var2_t test;";
    let names = uniforms(src);
    assert_eq!(names.len(), 8);
    assert!(names.contains(&"test.other.a".to_string()));
    assert!(names.contains(&"test.other.f.a2".to_string()));
    assert!(names.contains(&"test.e".to_string()));

    let table = ShaderScanner::new().struct_table(src);
    for name in &names {
        let last = name.rsplit('.').next().unwrap_or_default();
        assert!(!table.contains(last), "{} ends in a struct", name);
    }
}

#[test_log::test]
fn struct_with_undefined_member_type() {
    let src = "struct S { Missing m; float f; };\nuniform S s;";
    assert_eq!(uniforms(src), vec!["s.m", "s.f"]);
}

#[test_log::test]
fn unknown_declaration_type_emits_nothing() {
    let src = "uniform Missing m;\nuniform float f;";
    assert_eq!(uniforms(src), vec!["f"]);
}

#[test_log::test]
fn array_declaration_is_one_entry() {
    assert_eq!(uniforms("uniform vec3 a[4];"), vec!["a"]);

    let src = "struct L { vec3 pos; };\nuniform L lights[8];";
    assert_eq!(uniforms(src), vec!["lights.pos"]);
}

#[test_log::test]
fn comma_separated_declarations() {
    let src = "uniform float a, b, c;\nstruct P { float x; float y; };\nuniform P p, q;";
    assert_eq!(uniforms(src), vec!["a", "b", "c", "p.x", "p.y", "q.x", "q.y"]);
}

#[test_log::test]
fn struct_defined_after_use_still_resolves() {
    let src = "uniform Late late;\nstruct Late { float v; };";
    assert_eq!(uniforms(src), vec!["late.v"]);
}

#[test_log::test]
fn scanning_is_idempotent() {
    let src = "struct S { float a; vec2 b; };\nuniform S s;\nuniform float t;\nattribute vec3 position;";
    let scanner = ShaderScanner::new();
    let first = scanner.scan_uniforms(src);
    let second = scanner.scan_uniforms(src);
    assert_eq!(first, second);
    assert_eq!(scanner.scan_attributes(src), scanner.scan_attributes(src));
    assert_eq!(first, vec!["s.a", "s.b", "t"]);
}

#[test_log::test]
fn comments_between_tokens() {
    let src = "uniform // the kind of value\n\
               float /* block\n spanning lines */ exposure // trailing\n\
               ;\n\
               // uniform float commented_out;\n\
               /* uniform float also_commented; */\n\
               uniform vec4 tint;";
    assert_eq!(uniforms(src), vec!["exposure", "tint"]);
}

#[test_log::test]
fn raw_substring_mode_reports_commented_declarations() {
    let src = "// uniform float old;\nuniform float new_one;";
    let scanner = ShaderScanner::with_options(
        BuiltinRegistry::new(),
        ScanOptions {
            keyword_search: KeywordSearch::RawSubstring,
            ..ScanOptions::default()
        },
    );
    assert_eq!(scanner.scan_uniforms(src), vec!["old", "new_one"]);
    assert_eq!(ShaderScanner::new().scan_uniforms(src), vec!["new_one"]);
}

#[test_log::test]
fn identifiers_containing_the_qualifier_are_not_declarations() {
    let src = "float uniformScale = 2.0;\nuniform float scale;";
    assert_eq!(uniforms(src), vec!["scale"]);
}

#[test_log::test]
fn attributes_are_scanned_separately() {
    let src = "attribute vec3 position;\n\
               attribute vec2 uv;\n\
               uniform mat4 mvp;\n\
               varying vec2 v_uv;";
    assert_eq!(attributes(src), vec!["position", "uv"]);
    assert_eq!(uniforms(src), vec!["mvp"]);
}

#[test_log::test]
fn layout_qualifiers_and_initializers() {
    let src = "layout(location = 0) uniform float gamma = 2.2;\n\
               uniform vec2 offset = vec2(0.0, 1.0), scale;";
    assert_eq!(uniforms(src), vec!["gamma", "offset", "scale"]);
}

#[test_log::test]
fn interface_blocks_are_not_expanded() {
    let src = "uniform Matrices { mat4 view; mat4 proj; } matrices;\nuniform float t;";
    assert_eq!(uniforms(src), vec!["t"]);
}

#[test_log::test]
fn registered_builtins_participate() {
    let src = "uniform half h;\nstruct S { half a; };\nuniform S s;";
    assert_eq!(uniforms(src), vec!["s.a"]);

    let mut scanner = ShaderScanner::new();
    scanner.registry_mut().register("half", BuiltinMatch::Exact);
    assert_eq!(scanner.scan_uniforms(src), vec!["h", "s.a"]);
}

#[test_log::test]
fn malformed_struct_keeps_earlier_entries() {
    let src = "struct Good { float g; };\n\
               struct Bad float b;\n\
               struct Lost { float l; };\n\
               uniform Good good;\n\
               uniform Lost lost;";
    assert_eq!(uniforms(src), vec!["good.g"]);
}

#[test_log::test]
fn truncated_source_terminates() {
    for src in ["uniform", "uniform ", "uniform float", "uniform float x", "uniform vec3 a[", "struct", "struct S {", "uniform float a = "] {
        let _ = uniforms(src);
    }
    assert_eq!(uniforms("uniform float x"), vec!["x"]);
}

#[test_log::test]
fn stray_punctuation_does_not_hang() {
    let src = "uniform float a / b;\nuniform float c;";
    assert_eq!(uniforms(src), vec!["a", "b", "c"]);
}

#[test_log::test]
fn free_functions_use_defaults() {
    let src = "attribute vec4 color;\nuniform int mode;";
    assert_eq!(scan_uniforms(src), vec!["mode"]);
    assert_eq!(scan_attributes(src), vec!["color"]);
}

#[test_log::test]
fn non_ascii_text_is_tolerated() {
    let src = "// ünïcödé comment\nuniform float größe;\nuniform float b;";
    assert_eq!(uniforms(src), vec!["größe", "b"]);
}

#[test]
fn scanner_is_shareable_across_threads() {
    let scanner = std::sync::Arc::new(ShaderScanner::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let scanner = scanner.clone();
            std::thread::spawn(move || scanner.scan_uniforms(&format!("uniform float v{};", i)))
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), vec![format!("v{}", i)]);
    }
}

#[test_log::test]
fn precision_qualified_struct_members() {
    let src = "struct L { mediump vec3 c; highp float i; };\nuniform L l;";
    assert_eq!(uniforms(src), vec!["l.c", "l.i"]);
}

#[test_log::test]
fn vertical_tab_separates_tokens() {
    assert_eq!(uniforms("uniform float\x0Bx;"), vec!["x"]);
    assert_eq!(uniforms("uniform\x0Bvec3\x0Bv\x0B;\nuniform float y;"), vec!["v", "y"]);
}

#[test_log::test]
fn many_divisions_before_a_declaration() {
    let mut src = "x = a / b;\n".repeat(100_000);
    src.push_str("uniform float z;");

    let started = std::time::Instant::now();
    assert_eq!(uniforms(&src), vec!["z"]);
    assert!(started.elapsed() < std::time::Duration::from_secs(5), "took {:?}", started.elapsed());
}

#[test_log::test]
fn from_config_applies_options_and_extra_types() {
    let config = Config::from_json(
        r#"{"keyword_search": "raw_substring", "struct_redefinition": "keep_first",
            "extra_exact_types": ["half"], "extra_family_types": ["subpassInput"]}"#,
    )
    .unwrap();
    let scanner = ShaderScanner::from_config(&config);

    assert_eq!(scanner.options().keyword_search, KeywordSearch::RawSubstring);
    assert_eq!(scanner.options().struct_redefinition, StructRedefinition::KeepFirst);
    assert!(scanner.registry().is_builtin("half"));
    assert!(scanner.registry().is_builtin("usubpassInputMS"));
    assert!(scanner.registry().is_builtin("vec3"));
    assert_eq!(scanner.scan_uniforms("uniform half h;"), vec!["h"]);
}
