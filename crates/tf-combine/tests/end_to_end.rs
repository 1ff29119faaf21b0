//! Combining a small book from a real docs directory.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tf_combine::{
    CombineError, CombineOptions, Combiner, DateLabels, FsSource, NavEntry, parse_nav,
};

fn write(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full, content).unwrap();
}

fn create_book() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("docs");
    write(&docs, "index.md", "Welcome to the book.\n\nStart with [Chapter 1](chapter1.md).\n");
    write(
        &docs,
        "chapter1.md",
        "# Chapter 1\n\nRead the [quotes](chapter2.md#quotes) next.\n\n```\n[raw](chapter2.md)\n```\n",
    );
    write(
        &docs,
        "chapter2.md",
        "---\nanchor: quotes\ncreated: 2024-01-15\npublished: 2024-01-20\n---\n\n# Chapter 2\n\nBack [home](index.md) or to [the web](https://example.com/index.md).\n",
    );
    dir
}

fn nav() -> Vec<NavEntry> {
    let value: serde_yaml::Value = serde_yaml::from_str(
        "- Home: index.md\n- Chapter 1: chapter1.md\n- Chapter 2: chapter2.md\n",
    )
    .unwrap();
    parse_nav(&value).unwrap()
}

fn russian() -> CombineOptions {
    CombineOptions {
        labels: DateLabels::for_locale("ru"),
    }
}

#[test]
fn test_three_chapter_book() {
    let dir = create_book();
    let source = FsSource::new(dir.path().join("docs"));
    let nav = nav();

    let doc = Combiner::new(&source, russian())
        .combine(Some(nav.as_slice()))
        .unwrap();

    let expected = "\
# Home {#index-md}

Welcome to the book.

Start with [Chapter 1](#chapter1-md).

# Chapter 1 {#chapter1-md}

Read the [quotes](#quotes) next.

```
[raw](chapter2.md)
```

# Chapter 2 {#quotes}

/// chapter-dates
Создано: 2024-01-15
Опубликовано: 2024-01-20
///

Back [home](#index-md) or to [the web](https://example.com/index.md).
";
    assert_eq!(doc.text, expected);
    assert!(doc.warnings.is_empty());
    assert_eq!(doc.text.matches("/// chapter-dates").count(), 1);
}

#[test]
fn test_combining_twice_is_byte_identical() {
    let dir = create_book();
    let source = FsSource::new(dir.path().join("docs"));
    let nav = nav();
    let combiner = Combiner::new(&source, russian());

    let first = combiner.combine(Some(nav.as_slice())).unwrap();
    let second = combiner.combine(Some(nav.as_slice())).unwrap();

    assert_eq!(first.text, second.text);
}

#[test]
fn test_link_without_fragment_uses_chapter_anchor() {
    let dir = create_book();
    let docs = dir.path().join("docs");
    write(&docs, "chapter1.md", "# Chapter 1\n\nSee [two](chapter2.md).\n");
    let source = FsSource::new(docs);
    let nav = nav();

    let doc = Combiner::new(&source, russian())
        .combine(Some(nav.as_slice()))
        .unwrap();

    assert!(doc.text.contains("See [two](#quotes)."));
}

#[test]
fn test_written_file_matches_document() {
    let dir = create_book();
    let source = FsSource::new(dir.path().join("docs"));
    let nav = nav();
    let doc = Combiner::new(&source, CombineOptions::default())
        .combine(Some(nav.as_slice()))
        .unwrap();

    let out = dir.path().join("build/text_combined.txt");
    doc.write_to(&out).unwrap();

    assert_eq!(fs::read_to_string(out).unwrap(), doc.text);
}

#[test]
fn test_missing_file_writes_nothing() {
    let dir = create_book();
    let source = FsSource::new(dir.path().join("docs"));
    let mut nav = nav();
    nav.push(NavEntry::page(Some("Chapter 3"), "chapter3.md"));

    let err = Combiner::new(&source, CombineOptions::default())
        .combine(Some(nav.as_slice()))
        .unwrap_err();

    assert!(matches!(err, CombineError::MissingChapterFile { ref path } if path == "chapter3.md"));
    assert!(!dir.path().join("build").exists());
}

#[test]
fn test_nested_sections_follow_depth_first_order() {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("docs");
    for path in ["a.md", "part/b.md", "part/deep/c.md", "d.md"] {
        write(&docs, path, "Text.\n");
    }
    let value: serde_yaml::Value = serde_yaml::from_str(
        "- a.md\n- Part:\n    - part/b.md\n    - Deep:\n        - part/deep/c.md\n- d.md\n",
    )
    .unwrap();
    let nav = parse_nav(&value).unwrap();
    let source = FsSource::new(docs);

    let doc = Combiner::new(&source, CombineOptions::default())
        .combine(Some(nav.as_slice()))
        .unwrap();

    let order: Vec<_> = doc.chapters.iter().map(|c| c.path.as_str()).collect();
    assert_eq!(order, vec!["a.md", "part/b.md", "part/deep/c.md", "d.md"]);
}
