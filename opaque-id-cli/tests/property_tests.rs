//! Property-based tests for opaque-id-cli.
//!
//! Properties tested:
//! - Module paths follow the file layout of the source tree
//! - Config overrides take precedence over file values
//! - Dry runs never touch the file system
//! - A pass agrees with its own freshly written output

use proptest::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use opaque_id_cli::{
    config::{CliArgs, Config, ConfigManager},
    generator::ProjectGenerator,
    parser::module_namespace,
    writer::FileWriter,
};

// =============================================================================
// Generators for property tests
// =============================================================================

/// Generate a module name that never collides with a reserved file name.
fn arb_module() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}".prop_map(|s| format!("m_{}", s))
}

fn arb_type_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{0,8}".prop_map(|s| format!("{}Id", s))
}

fn arb_kind() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["uuid", "i32", "i64"])
}

/// A crate with one declaration per module file.
fn arb_project() -> impl Strategy<Value = Vec<(String, String, &'static str)>> {
    prop::collection::vec((arb_module(), arb_type_name(), arb_kind()), 1..5).prop_map(|items| {
        let mut modules = std::collections::BTreeSet::new();
        let mut names = std::collections::BTreeSet::new();
        items
            .into_iter()
            .filter(|(module, name, _)| modules.insert(module.clone()) && names.insert(name.clone()))
            .collect()
    })
}

fn write_project(items: &[(String, String, &'static str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(
        dir.path().join("Cargo.toml"),
        "[package]\nname = \"prop\"\n[dependencies]\nserde = \"1\"\nredb = \"3\"\n",
    )
    .unwrap();

    let mut lib = String::new();
    for (module, name, kind) in items {
        lib.push_str(&format!("pub mod {};\n", module));
        fs::write(
            dir.path().join("src").join(format!("{}.rs", module)),
            format!("#[opaque_id(kind = \"{}\")]\npub struct {};\n", kind, name),
        )
        .unwrap();
    }
    fs::write(dir.path().join("src/lib.rs"), lib).unwrap();
    dir
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_file_path_maps_to_module_path(dirs in prop::collection::vec(arb_module(), 0..4), file in arb_module()) {
        let mut path: PathBuf = dirs.iter().collect();
        path.push(format!("{}.rs", file));

        let namespace = module_namespace(&path).unwrap();
        let mut expected = dirs.clone();
        expected.push(file);
        prop_assert_eq!(namespace.segments().to_vec(), expected);
    }

    #[test]
    fn prop_mod_rs_maps_to_its_directory(dirs in prop::collection::vec(arb_module(), 1..4)) {
        let mut path: PathBuf = dirs.iter().collect();
        path.push("mod.rs");

        let namespace = module_namespace(&path).unwrap();
        prop_assert_eq!(namespace.segments().to_vec(), dirs);
    }

    #[test]
    fn prop_cli_overrides_win(dir in "[a-z]{1,8}", file in "[a-z]{1,8}", write in any::<bool>()) {
        let args = CliArgs {
            output: Some(PathBuf::from(&dir)),
            registration_file: Some(format!("{}.rs", file)),
            write_declarations: Some(write),
            source_dir: None,
        };
        let config = ConfigManager::merge_cli_args(Config::default(), &args);

        prop_assert_eq!(config.output.dir, PathBuf::from(dir));
        prop_assert_eq!(config.output.registration_file, format!("{}.rs", file));
        prop_assert_eq!(config.output.write_declarations, write);
        prop_assert_eq!(config.scan, Config::default().scan);
    }

    #[test]
    fn prop_dry_run_is_safe(items in arb_project()) {
        let dir = write_project(&items);
        let generator = ProjectGenerator::new(dir.path(), Config::default());
        let result = generator.run().unwrap();

        FileWriter::new(true).write_all(&generator.plan(&result.output)).unwrap();

        prop_assert!(!dir.path().join("src/generated").exists());
    }

    #[test]
    fn prop_written_output_is_up_to_date(items in arb_project()) {
        let dir = write_project(&items);
        let generator = ProjectGenerator::new(dir.path(), Config::default());

        let result = generator.run().unwrap();
        prop_assert_eq!(result.declarations.len(), items.len());
        FileWriter::new(false).write_all(&generator.plan(&result.output)).unwrap();

        let again = generator.run().unwrap();
        prop_assert!(generator.out_of_date(&again).is_empty());
        prop_assert_eq!(again.output, result.output);
    }
}
