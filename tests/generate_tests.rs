//! Integration tests for the schemagen pipeline
//!
//! These tests drive the library end-to-end against a temporary project
//! tree: load schema.yml, compile, and splice the results into template
//! files, the same sequence the `generate` subcommand runs.

use std::fs;
use std::path::Path;

use schemagen::compile::{compile_sections, compile_settings_schema};
use schemagen::merge::{merge_section, write_if_changed, MergeOutcome};
use schemagen::scaffold::new_template;
use schemagen::schema::SchemaDoc;
use schemagen::text::slugify;
use schemagen::{CONFIG_SETTINGS_PATH, SCHEMA_FILE, SECTIONS_DIR};
use tempfile::TempDir;

const SCHEMA_YML: &str = r#"
theme:
  name: Minimal
  version: 1.0.0
  author: Studio
  documentation: https://example.com/docs
  support: https://example.com/support

global_categories:
  colors:
    background: color
    accent: color
  typography:
    heading_font: font_picker

sections:
  hero:
    title: text
    subtitle:
      type: richtext
      info: Shown under the title
    alignment:
      options:
        Left:
        Right: right_align
  slideshow:
    tag: div
    autoplay: checkbox
    blocks:
      slide:
        limit: 4
        heading: text
    presets:
      basic:
        autoplay: true
        blocks:
          - type: slide
            heading: First slide
    default:
      blocks:
        - type: slide
"#;

/// Run one full generate pass over `root`, returning how many files were
/// actually written.
fn generate(root: &Path) -> usize {
    let doc = SchemaDoc::load(&root.join(SCHEMA_FILE)).unwrap();
    let mut written = 0;

    let settings = compile_settings_schema(doc.root()).unwrap();
    let json = serde_json::to_string_pretty(&settings).unwrap();
    if write_if_changed(&root.join(CONFIG_SETTINGS_PATH), &format!("{json}\n")).unwrap()
        == MergeOutcome::Written
    {
        written += 1;
    }

    for (name, schema) in compile_sections(doc.root()).unwrap() {
        let path = root
            .join(SECTIONS_DIR)
            .join(format!("{}.liquid", slugify(&name)));
        let json = serde_json::to_string_pretty(&schema).unwrap();
        if merge_section(&path, &name, &json).unwrap() == MergeOutcome::Written {
            written += 1;
        }
    }

    written
}

fn setup_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(SCHEMA_FILE), SCHEMA_YML).unwrap();
    temp
}

#[test]
fn test_generate_writes_all_outputs() {
    let temp = setup_project();
    let written = generate(temp.path());
    // settings schema + two sections
    assert_eq!(written, 3);

    let settings = fs::read_to_string(temp.path().join(CONFIG_SETTINGS_PATH)).unwrap();
    assert!(settings.contains("\"theme_name\": \"Minimal\""));
    assert!(settings.contains("\"name\": \"colors\""));
    assert!(settings.contains("\"id\": \"heading_font\""));

    let hero = fs::read_to_string(temp.path().join("sections/hero.liquid")).unwrap();
    assert!(hero.contains("{% schema %}"));
    assert!(hero.contains("\"name\": \"Hero\""));
    assert!(hero.contains("\"tag\": \"section\""));
    assert!(hero.contains("\"value\": \"right_align\""));

    let slideshow = fs::read_to_string(temp.path().join("sections/slideshow.liquid")).unwrap();
    assert!(slideshow.contains("\"tag\": \"div\""));
    assert!(slideshow.contains("\"limit\": 4"));
    assert!(slideshow.contains("\"name\": \"Basic\""));
}

#[test]
fn test_second_run_writes_nothing() {
    let temp = setup_project();
    assert_eq!(generate(temp.path()), 3);
    assert_eq!(generate(temp.path()), 0);
}

#[test]
fn test_generate_is_byte_identical_across_runs() {
    let first = setup_project();
    let second = setup_project();
    generate(first.path());
    generate(second.path());

    for rel in [CONFIG_SETTINGS_PATH, "sections/hero.liquid", "sections/slideshow.liquid"] {
        let a = fs::read_to_string(first.path().join(rel)).unwrap();
        let b = fs::read_to_string(second.path().join(rel)).unwrap();
        assert_eq!(a, b, "output differs for {rel}");
    }
}

#[test]
fn test_generate_preserves_hand_written_markup() {
    let temp = setup_project();
    let sections = temp.path().join(SECTIONS_DIR);
    fs::create_dir_all(&sections).unwrap();
    fs::write(
        sections.join("hero.liquid"),
        "<h1>{{ section.settings.title }}</h1>\n\n{% schema %}\n{ \"stale\": true }\n{% endschema %}\n",
    )
    .unwrap();

    generate(temp.path());

    let hero = fs::read_to_string(sections.join("hero.liquid")).unwrap();
    assert!(hero.starts_with("<h1>{{ section.settings.title }}</h1>"));
    assert!(!hero.contains("stale"));
    assert!(hero.contains("\"name\": \"Hero\""));
}

#[test]
fn test_scaffold_then_generate_fills_schema_region() {
    let temp = setup_project();
    let (_, section_path) = new_template(temp.path(), "hero").unwrap();

    generate(temp.path());

    let hero = fs::read_to_string(&section_path).unwrap();
    // scaffolded placeholder body survives, schema region is replaced
    assert!(hero.starts_with("Modify me on sections/hero.liquid"));
    assert!(!hero.contains("Main hero"));
    assert!(hero.contains("\"name\": \"Hero\""));
}

#[test]
fn test_scaffold_collision_leaves_no_partial_pair() {
    let temp = TempDir::new().unwrap();
    new_template(temp.path(), "login").unwrap();

    let result = new_template(temp.path(), "login");
    assert!(result.is_err());

    // the first scaffold's files are intact
    let template = fs::read_to_string(temp.path().join("templates/login.json")).unwrap();
    assert!(template.contains("\"main_login\""));
}
