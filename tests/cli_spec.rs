use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn snapshot_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_snapshot"))
}

fn run(args: &[&str]) -> Output {
    Command::new(snapshot_binary())
        .args(args)
        .output()
        .expect("run snapshot binary")
}

fn arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

#[test]
fn pack_into_the_packed_directory_leaves_the_output_out() {
    let source = TempDir::new().expect("source dir");
    fs::create_dir_all(source.path().join("src")).expect("src dir");
    fs::write(source.path().join("src/a.c"), b"int a;\n").expect("a.c");
    fs::write(source.path().join("b.py"), b"print(1)\n").expect("b.py");
    let output = source.path().join("out.snapshot");

    let packed = run(&["pack", arg(source.path()), "-o", arg(&output)]);
    assert!(packed.status.success(), "stderr: {}", String::from_utf8_lossy(&packed.stderr));
    assert!(String::from_utf8_lossy(&packed.stdout).starts_with("Packed 2 files"));

    let bytes = fs::read(&output).expect("snapshot");
    assert_eq!(bytes, b"# === b.py ===\nprint(1)\n\n// === src/a.c ===\nint a;\n\n");
}

#[test]
fn list_is_strict_unless_lenient() {
    let work = TempDir::new().expect("work dir");
    let conflicting = work.path().join("conflict.snapshot");
    fs::write(&conflicting, b"// === a.c ===\nint a;\n// === a.c ===\nint b;\n").expect("write");
    let orphan = work.path().join("orphan.snapshot");
    fs::write(&orphan, b"stray text\n// === a.c ===\nint a;\n").expect("write");

    for path in [&conflicting, &orphan] {
        let strict = run(&["list", arg(path)]);
        assert_eq!(strict.status.code(), Some(1), "{} listed in strict mode", path.display());
        assert!(String::from_utf8_lossy(&strict.stderr).starts_with("ERROR: "));
        assert!(strict.stdout.is_empty());

        let lenient = run(&["--lenient", "list", arg(path)]);
        assert!(lenient.status.success(), "{} refused with --lenient", path.display());
    }

    let lenient = run(&["--lenient", "list", arg(&conflicting)]);
    assert_eq!(String::from_utf8_lossy(&lenient.stdout), "a.c\t1\t6\na.c\t1\t6\n");
}
