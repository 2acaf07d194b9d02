//! End-to-end checks over PHP files written to a temporary workspace.
//!
//! These exercise the full pipeline the way a run does: collect files,
//! index declarations, then run the return type rule on one file.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tugsniff_core::config::SniffConfig;
use tugsniff_core::diagnostic::Diagnostic;
use tugsniff_php::cache::UnitCache;
use tugsniff_php::files::{collect_source_files, display_path, is_checked};
use tugsniff_php::inheritance::RelationKind;
use tugsniff_php::resolver::NamespaceIndex;
use tugsniff_php::rule::{ReturnTypeRule, RULE_CODE, RULE_MESSAGE};

const SOME_CLASS: &str = r#"<?php
namespace Magento2\TestsHelper\PHP;

class MethodSomeClass
{
    public function testClassMethodWrong()
    {
    }

    public function testClassMethod(): array
    {
        return [];
    }
}
"#;

const SOME_INTERFACE: &str = r#"<?php
namespace Magento2\TestsHelper\PHP;

interface MethodSomeInterface
{
    public function testReturnTypeWrong(): array;

    public function testReturnType(): ?string;
}
"#;

const CHILD: &str = r#"<?php
namespace Magento2\Tests\Methods;

use Magento2\TestsHelper\PHP\MethodSomeClass;
use Magento2\TestsHelper\PHP\MethodSomeInterface;

class MethodValidateReturnType extends MethodSomeClass implements MethodSomeInterface
{
    public function __construct()
    {
    }

    public function testClassMethodWrong(): int
    {
        return 1;
    }

    public function testClassMethod(): array
    {
        return [];
    }

    public function testReturnTypeWrong(): string
    {
        return '';
    }

    public function testReturnType(): ?string
    {
        return null;
    }
}
"#;

fn write_files(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    for (rel, content) in files {
        let path = temp.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    temp
}

fn check(root: &Path, rel: &str, config: &SniffConfig) -> Vec<Diagnostic> {
    let files = collect_source_files(root, config).unwrap();
    let mut cache = UnitCache::new();
    let index = NamespaceIndex::build(&files, &mut cache);
    let path = root.join(rel);
    let unit = cache.get_or_load(&path).unwrap();
    let mut rule = ReturnTypeRule::new(&index, &mut cache, config);
    rule.check_unit(&unit, &display_path(root, &path))
}

fn lines(diagnostics: &[Diagnostic]) -> Vec<u32> {
    diagnostics.iter().map(|d| d.location.line).collect()
}

#[test]
fn imported_ancestors_flag_only_mismatching_methods() {
    let temp = write_files(&[
        ("TestsHelper/PHP/MethodSomeClass.php", SOME_CLASS),
        ("TestsHelper/PHP/MethodSomeInterface.php", SOME_INTERFACE),
        ("Tests/Methods/MethodValidateReturnType.php", CHILD),
    ]);
    let diagnostics = check(
        temp.path(),
        "Tests/Methods/MethodValidateReturnType.php",
        &SniffConfig::default(),
    );

    assert_eq!(lines(&diagnostics), vec![23]);
    for diagnostic in &diagnostics {
        assert_eq!(diagnostic.code, RULE_CODE);
        assert_eq!(diagnostic.message, RULE_MESSAGE);
        assert_eq!(
            diagnostic.location.file,
            "Tests/Methods/MethodValidateReturnType.php"
        );
        assert_eq!(diagnostic.location.col, 12);
    }
}

#[test]
fn strict_config_also_flags_untyped_parent() {
    let temp = write_files(&[
        ("TestsHelper/PHP/MethodSomeClass.php", SOME_CLASS),
        ("TestsHelper/PHP/MethodSomeInterface.php", SOME_INTERFACE),
        ("Tests/Methods/MethodValidateReturnType.php", CHILD),
    ]);
    let config = SniffConfig {
        compare_untyped_ancestors: true,
        ..SniffConfig::default()
    };
    let diagnostics = check(
        temp.path(),
        "Tests/Methods/MethodValidateReturnType.php",
        &config,
    );
    assert_eq!(lines(&diagnostics), vec![13, 23]);
}

#[test]
fn conflict_names_interface_declaring_file() {
    let temp = write_files(&[
        ("TestsHelper/PHP/MethodSomeClass.php", SOME_CLASS),
        ("TestsHelper/PHP/MethodSomeInterface.php", SOME_INTERFACE),
        ("Tests/Methods/MethodValidateReturnType.php", CHILD),
    ]);
    let config = SniffConfig::default();
    let files = collect_source_files(temp.path(), &config).unwrap();
    let mut cache = UnitCache::new();
    let index = NamespaceIndex::build(&files, &mut cache);
    let unit = cache
        .get_or_load(&temp.path().join("Tests/Methods/MethodValidateReturnType.php"))
        .unwrap();
    let method = unit
        .methods()
        .iter()
        .find(|m| m.name == "testReturnTypeWrong")
        .unwrap();

    let mut rule = ReturnTypeRule::new(&index, &mut cache, &config);
    let conflict = rule.check_method(&unit, method).unwrap();
    assert_eq!(conflict.relation, RelationKind::Implements);
    assert_eq!(conflict.own_type, "string");
    assert_eq!(conflict.ancestor_type, "array");
    assert_eq!(conflict.ancestor, "\\Magento2\\TestsHelper\\PHP\\MethodSomeInterface");
    assert!(conflict
        .ancestor_path
        .ends_with(PathBuf::from("TestsHelper/PHP/MethodSomeInterface.php")));
}

#[test]
fn missing_ancestor_produces_nothing() {
    let temp = write_files(&[(
        "src/Child.php",
        "<?php\nnamespace App;\nuse Vendor\\Lib\\Base;\nclass Child extends Base {\n    function run(): int {}\n}\n",
    )]);
    let diagnostics = check(temp.path(), "src/Child.php", &SniffConfig::default());
    assert!(diagnostics.is_empty());
}

#[test]
fn vendor_declarations_resolve_as_ancestors() {
    let temp = write_files(&[
        (
            "vendor/lib/Base.php",
            "<?php\nnamespace Lib;\nclass Base { function run(): int {} }\n",
        ),
        (
            "src/Child.php",
            "<?php\nnamespace App;\nuse Lib\\Base;\nclass Child extends Base {\n    function run(): string {}\n}\n",
        ),
    ]);
    let config = SniffConfig::default();
    let diagnostics = check(temp.path(), "src/Child.php", &config);
    assert_eq!(lines(&diagnostics), vec![5]);
    assert!(is_checked(temp.path(), &temp.path().join("src/Child.php"), &config));
    assert!(!is_checked(temp.path(), &temp.path().join("vendor/lib/Base.php"), &config));

    let config = SniffConfig {
        exclude_dirs: vec!["vendor".to_string()],
        ..SniffConfig::default()
    };
    let diagnostics = check(temp.path(), "src/Child.php", &config);
    assert!(diagnostics.is_empty());
}

#[test]
fn same_namespace_parent_resolves_without_import() {
    let temp = write_files(&[
        (
            "src/Model/Base.php",
            "<?php\nnamespace Shop\\Model;\nabstract class Base {\n    abstract public function total(): float;\n}\n",
        ),
        (
            "src/Model/Order.php",
            "<?php\nnamespace Shop\\Model;\nclass Order extends Base {\n    public function total(): int { return 0; }\n}\n",
        ),
    ]);
    let diagnostics = check(temp.path(), "src/Model/Order.php", &SniffConfig::default());
    assert_eq!(lines(&diagnostics), vec![4]);
    assert_eq!(diagnostics[0].location.col, 12);
}

#[test]
fn cycle_across_files_terminates_cleanly() {
    let temp = write_files(&[
        ("A.php", "<?php class A extends B { function m(): int {} }"),
        ("B.php", "<?php class B extends A { function n(): int {} }"),
    ]);
    let diagnostics = check(temp.path(), "A.php", &SniffConfig::default());
    assert!(diagnostics.is_empty());
}
