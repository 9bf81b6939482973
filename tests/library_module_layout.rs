use std::fs;
use std::path::Path;

#[test]
fn lib_root_exposes_each_pipeline_stage() {
    let lib_rs = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/lib.rs");
    let source = fs::read_to_string(&lib_rs).expect("read src/lib.rs");

    for module in [
        "integrity",
        "oracle",
        "segmenter",
        "labels",
        "classifier",
        "document",
        "corpus",
    ] {
        assert!(
            source.contains(&format!("pub mod {module};")),
            "src/lib.rs does not export `{module}`"
        );
    }
}

#[test]
fn binary_routes_through_app_command_handlers() {
    let bin = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/bin/kommentar.rs");
    let source = fs::read_to_string(&bin).expect("read src/bin/kommentar.rs");
    assert!(source.contains("use kommentar::app::command_handlers;"));
    assert!(source.contains("command_handlers::run_cli(args)"));
}
