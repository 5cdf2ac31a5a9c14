use assert_cmd::Command;
use journal_test_support::ContentFixture;
use predicates::prelude::*;

#[test]
fn render_prints_body_html_without_frontmatter() {
    let fixture = ContentFixture::new();
    let path = fixture.article("post", "title: Post", "## Hello World\n\nText.\n");

    let mut cmd = Command::cargo_bin("journal").expect("binary");
    cmd.arg("render")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"<h2 id="hello-world">Hello World</h2>"#))
        .stdout(predicate::str::contains("title: Post").not());
}

#[test]
fn render_toc_prints_navigation_only() {
    let fixture = ContentFixture::new();
    let path = fixture.article("post", "", "## Intro\n\n## Intro\n\nBody text.\n");

    let mut cmd = Command::cargo_bin("journal").expect("binary");
    cmd.args(["render", "--toc"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            r#"<nav class="toc-nav" aria-label="Table of contents">"#,
        ))
        .stdout(predicate::str::contains(r##"href="#intro-1""##))
        .stdout(predicate::str::contains("Body text").not());
}

#[test]
fn render_missing_file_fails() {
    let fixture = ContentFixture::new();

    let mut cmd = Command::cargo_bin("journal").expect("binary");
    cmd.arg("render")
        .arg(fixture.path().join("nope.md"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("journal error: failed to read"));
}

#[test]
fn check_reports_counts() {
    let fixture = ContentFixture::new();
    fixture.article("a", "", "# A\n");
    fixture.article("b", "", "# B\n");
    fixture.shelf_item("papers", "c", "", "# C\n");

    let mut cmd = Command::cargo_bin("journal").expect("binary");
    cmd.current_dir(fixture.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("articles: 2"))
        .stdout(predicate::str::contains("fragments: 0"))
        .stdout(predicate::str::contains("shelf: 1"))
        .stdout(predicate::str::contains("about: missing"));
}

#[test]
fn check_fails_on_unreadable_content() {
    let fixture = ContentFixture::new();
    std::fs::create_dir_all(fixture.content_root().join("fragments")).unwrap();
    std::fs::write(fixture.content_root().join("fragments/bad.md"), [0xff, 0xfe]).unwrap();

    let mut cmd = Command::cargo_bin("journal").expect("binary");
    cmd.current_dir(fixture.path())
        .arg("check")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("fragments:"));
}

#[test]
fn check_honours_config_override() {
    let fixture = ContentFixture::new();
    fixture.write_site_file("notes/articles/x.md", "# X\n");
    let config = fixture.write_site_file("site.toml", "[content]\nroot = \"notes\"\n");

    let mut cmd = Command::cargo_bin("journal").expect("binary");
    cmd.current_dir(fixture.path())
        .args(["check", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("articles: 1"));
}

#[test]
fn invalid_config_is_reported() {
    let fixture = ContentFixture::new();
    fixture.write_site_file("journal.toml", "[server]\nport = 0\n");

    let mut cmd = Command::cargo_bin("journal").expect("binary");
    cmd.current_dir(fixture.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("server.port"));
}
