use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

fn scribe() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("scribe"))
}

#[test]
fn help_mentions_core_commands() {
    scribe().arg("--help").assert().success().stdout(
        predicate::str::contains("rename")
            .and(predicate::str::contains("references"))
            .and(predicate::str::contains("condition")),
    );
}

#[test]
fn rename_rewrites_all_files() {
    let temp = TempDir::new().unwrap();
    temp.child("Shape.cs")
        .write_str("abstract class Shape { public abstract double Area(); }\n")
        .unwrap();
    temp.child("Circle.cs")
        .write_str("class Circle : Shape {\n  public override double Area() => r * r;\n  double Twice() => Area() + Area();\n}\n")
        .unwrap();

    scribe()
        .current_dir(temp.path())
        .args(["rename", "Area", "--to", "ComputeArea", "Shape.cs", "Circle.cs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("renamed 4 occurrence(s)"));

    temp.child("Shape.cs").assert(predicate::str::contains("double ComputeArea();"));
    temp.child("Circle.cs").assert(
        "class Circle : Shape {\n  public override double ComputeArea() => r * r;\n  double Twice() => ComputeArea() + ComputeArea();\n}\n",
    );
}

#[test]
fn dry_run_prints_diff_and_leaves_files_alone() {
    let temp = TempDir::new().unwrap();
    temp.child("Main.cs").write_str("x.Foo() + x.Foo()\n").unwrap();

    scribe()
        .current_dir(temp.path())
        .args(["rename", "Foo", "--to", "FooBar", "--dry-run", "Main.cs"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("-x.Foo() + x.Foo()")
                .and(predicate::str::contains("+x.FooBar() + x.FooBar()"))
                .and(predicate::str::contains("(dry run)")),
        );

    temp.child("Main.cs").assert("x.Foo() + x.Foo()\n");
}

#[test]
fn rename_json_reports_missing_files_and_exits_one() {
    let temp = TempDir::new().unwrap();
    temp.child("A.cs").write_str("Foo(); Food();\n").unwrap();

    let output = scribe()
        .current_dir(temp.path())
        .args(["rename", "Foo", "--to", "Bar", "--json", "A.cs", "Missing.cs"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["replaced"].as_u64(), Some(1));
    assert_eq!(v["written"].as_u64(), Some(1));
    assert_eq!(v["touched"], serde_json::json!(["A.cs"]));
    assert_eq!(v["unreadable"].as_array().unwrap().len(), 1);

    temp.child("A.cs").assert("Bar(); Food();\n");
}

#[test]
fn rename_to_empty_name_is_an_error() {
    let temp = TempDir::new().unwrap();
    temp.child("A.cs").write_str("Foo();\n").unwrap();

    scribe()
        .current_dir(temp.path())
        .args(["rename", "Foo", "--to", "", "A.cs"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("must not be empty"));

    temp.child("A.cs").assert("Foo();\n");
}

#[test]
fn malformed_config_is_an_error() {
    let temp = TempDir::new().unwrap();
    temp.child("scribe.toml").write_str("[rename]\nsort = true\n").unwrap();
    temp.child("A.cs").write_str("Foo();\n").unwrap();

    scribe()
        .current_dir(temp.path())
        .args(["references", "Foo", "A.cs"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to load scribe config"));
}

#[test]
fn references_lists_one_based_locations() {
    let temp = TempDir::new().unwrap();
    temp.child("A.cs")
        .write_str("class A {\n  int Count;\n  int Total => Count + Counter;\n}\n")
        .unwrap();

    scribe()
        .current_dir(temp.path())
        .args(["references", "Count", "A.cs"])
        .assert()
        .success()
        .stdout("A.cs:2:7:   int Count;\nA.cs:3:16:   int Total => Count + Counter;\n");

    scribe()
        .current_dir(temp.path())
        .args(["references", "Missing", "A.cs"])
        .assert()
        .code(1)
        .stdout("");
}

#[test]
fn condition_evaluates_snapshot() {
    let temp = TempDir::new().unwrap();
    temp.child("state.json")
        .write_str(
            r#"{
                "views": [
                    { "file_name": "Main.cs", "is_dirty": true },
                    { "untitled_name": "Untitled1.cs", "is_untitled": true }
                ],
                "active": 0
            }"#,
        )
        .unwrap();

    scribe()
        .current_dir(temp.path())
        .args(["condition", "--state", "state.json", "OpenWindowState", "windowstate=Dirty"])
        .assert()
        .success()
        .stdout("true\n");

    scribe()
        .current_dir(temp.path())
        .args(["condition", "--state", "state.json", "DebuggerSupports", "debuggersupports=Stepping"])
        .assert()
        .code(1)
        .stdout("false\n");

    scribe()
        .current_dir(temp.path())
        .args(["condition", "--state", "state.json", "Nope"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown condition"));
}

#[test]
fn repeated_file_arguments_are_renamed_once() {
    let temp = TempDir::new().unwrap();
    temp.child("A.cs").write_str("Foo(); Foo();\n").unwrap();

    scribe()
        .current_dir(temp.path())
        .args(["rename", "Foo", "--to", "Bar", "A.cs", "A.cs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("renamed 2 occurrence(s)"))
        .stderr(predicate::str::contains("skipped").not());

    temp.child("A.cs").assert("Bar(); Bar();\n");
}

#[test]
fn references_keep_going_past_unreadable_files() {
    let temp = TempDir::new().unwrap();
    temp.child("A.cs").write_str("Foo();\n").unwrap();

    scribe()
        .current_dir(temp.path())
        .args(["references", "Foo", "A.cs", "Missing.cs", "A.cs"])
        .assert()
        .code(1)
        .stdout("A.cs:1:1: Foo();\n")
        .stderr(predicate::str::contains("skipped Missing.cs"));
}
