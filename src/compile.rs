//! Schema compilation: YAML definitions to JSON schema values
//!
//! Every function here is a pure transform from a piece of the loaded
//! document to a `serde_json::Value`. Key order in the output follows
//! insertion order, so identical input compiles to byte-identical JSON.

use serde_json::{Map, Value as Json};
use serde_yaml::{Mapping, Value as Yaml};
use thiserror::Error;

use crate::text::{slugify, title_case};

/// Section keys that are not setting definitions.
const RESERVED_SECTION_KEYS: [&str; 4] = ["tag", "blocks", "presets", "default"];

/// Tag emitted for sections without an explicit one.
const DEFAULT_TAG: &str = "section";

/// Error during schema compilation
#[derive(Debug, Error)]
pub enum CompileError {
    /// Required key absent from the input document
    #[error("Missing required key '{0}'")]
    MissingKey(String),
    /// A node that must be a mapping is something else
    #[error("Expected a mapping at '{0}'")]
    NotAMapping(String),
    /// A node that must be a sequence is something else
    #[error("Expected a sequence at '{0}'")]
    NotASequence(String),
    /// A setting definition that is neither a type string nor a mapping
    #[error("Setting '{0}' must be a type name or a mapping")]
    BadSetting(String),
    /// A mapping key that is not a scalar
    #[error("Expected a scalar key under '{0}'")]
    BadKey(String),
}

/// Compile the aggregate settings schema.
///
/// The first array element is the theme metadata in fixed key order,
/// followed by one `{name, settings}` object per global category in
/// document order.
pub fn compile_settings_schema(root: &Mapping) -> Result<Json, CompileError> {
    let theme = fetch_mapping(root, "theme")?;
    let mut entries = vec![theme_info(theme)?];

    let categories = fetch_mapping(root, "global_categories")?;
    for (key, value) in categories {
        let name = key_string(key, "global_categories")?;
        let settings = match value {
            Yaml::Null => Json::Array(Vec::new()),
            Yaml::Mapping(m) => build_settings(m, &[], &name)?,
            _ => return Err(CompileError::NotAMapping(format!("global_categories.{name}"))),
        };

        let mut category = Map::new();
        category.insert("name".into(), Json::String(name));
        category.insert("settings".into(), settings);
        entries.push(Json::Object(category));
    }

    Ok(Json::Array(entries))
}

/// Compile every section in document order.
///
/// Returns `(section key, compiled schema)` pairs.
pub fn compile_sections(root: &Mapping) -> Result<Vec<(String, Json)>, CompileError> {
    let sections = fetch_mapping(root, "sections")?;
    let empty = Mapping::new();

    let mut compiled = Vec::with_capacity(sections.len());
    for (key, def) in sections {
        let name = key_string(key, "sections")?;
        let def = match def {
            Yaml::Null => &empty,
            Yaml::Mapping(m) => m,
            _ => return Err(CompileError::NotAMapping(format!("sections.{name}"))),
        };
        let schema = compile_section(&name, def)?;
        compiled.push((name, schema));
    }

    Ok(compiled)
}

/// Compile one section definition.
///
/// Output key order is fixed: `name`, `tag`, `settings`, then `blocks`,
/// `presets`, `default`, the last three only when present in the
/// input.
pub fn compile_section(name: &str, def: &Mapping) -> Result<Json, CompileError> {
    let mut section = Map::new();
    section.insert("name".into(), Json::String(title_case(name)));

    let tag = def
        .get("tag")
        .and_then(Yaml::as_str)
        .unwrap_or(DEFAULT_TAG);
    section.insert("tag".into(), Json::String(tag.to_string()));

    section.insert(
        "settings".into(),
        build_settings(def, &RESERVED_SECTION_KEYS, name)?,
    );

    if let Some(blocks) = def.get("blocks") {
        if !blocks.is_null() {
            section.insert("blocks".into(), build_blocks(blocks, name)?);
        }
    }
    if let Some(presets) = def.get("presets") {
        if !presets.is_null() {
            section.insert("presets".into(), build_presets(presets, name)?);
        }
    }
    if let Some(default) = def.get("default") {
        if !default.is_null() {
            section.insert("default".into(), build_default(default, name)?);
        }
    }

    Ok(Json::Object(section))
}

/// Build the settings array from a definition mapping, skipping `reserved`
/// keys.
fn build_settings(entries: &Mapping, reserved: &[&str], context: &str) -> Result<Json, CompileError> {
    let mut settings = Vec::new();
    for (key, raw) in entries {
        let name = key_string(key, context)?;
        if reserved.contains(&name.as_str()) {
            continue;
        }
        settings.push(build_setting(&name, raw)?);
    }
    Ok(Json::Array(settings))
}

/// Build one setting object.
///
/// A bare string is the setting type; a mapping is a detail definition.
fn build_setting(name: &str, raw: &Yaml) -> Result<Json, CompileError> {
    match raw {
        Yaml::String(ty) if ty == "header" => header_setting(name, None),
        Yaml::String(ty) => Ok(Json::Object(setting_base(ty, name))),
        Yaml::Mapping(details) => build_detailed_setting(name, details),
        Yaml::Null => Ok(Json::Object(setting_base("text", name))),
        _ => Err(CompileError::BadSetting(name.to_string())),
    }
}

/// Build a setting from a detail mapping.
///
/// `type` defaults to `"select"` when options are present and `"text"`
/// otherwise. Everything other than `type` and `options` passes through
/// verbatim, so an explicit `label` overrides the derived one.
fn build_detailed_setting(name: &str, details: &Mapping) -> Result<Json, CompileError> {
    let options = match details.get("options") {
        Some(raw) => build_options(raw, name)?,
        None => None,
    };

    let fallback = if options.is_some() { "select" } else { "text" };
    let ty = details.get("type").and_then(Yaml::as_str).unwrap_or(fallback);

    if ty == "header" {
        return header_setting(name, Some(details));
    }

    let mut setting = setting_base(ty, name);
    for (key, value) in details {
        let key = key_string(key, name)?;
        if key == "type" || key == "options" {
            continue;
        }
        let value = yaml_to_json(value, &format!("{name}.{key}"))?;
        setting.insert(key, value);
    }
    if let Some(options) = options {
        setting.insert("options".into(), options);
    }

    Ok(Json::Object(setting))
}

/// The common `type`/`id`/`label` prefix shared by every non-header setting.
fn setting_base(ty: &str, name: &str) -> Map<String, Json> {
    let mut setting = Map::new();
    setting.insert("type".into(), Json::String(ty.to_string()));
    setting.insert("id".into(), Json::String(name.to_string()));
    setting.insert("label".into(), Json::String(title_case(name)));
    setting
}

/// Build a `header` setting: `type`, `content`, optional `info`.
///
/// Headers are display-only, so they never carry an `id` or `options`.
fn header_setting(name: &str, details: Option<&Mapping>) -> Result<Json, CompileError> {
    let mut setting = Map::new();
    setting.insert("type".into(), Json::String("header".into()));

    let content = details
        .and_then(|d| d.get("content"))
        .and_then(Yaml::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| title_case(name));
    setting.insert("content".into(), Json::String(content));

    if let Some(info) = details.and_then(|d| d.get("info")) {
        if !info.is_null() {
            setting.insert("info".into(), yaml_to_json(info, name)?);
        }
    }

    Ok(Json::Object(setting))
}

/// Resolve an options mapping into an array of `{value, label}` objects.
///
/// Returns `None` for an absent or empty mapping, so the caller omits the
/// `options` key entirely. A missing or blank value falls back to the
/// slugified label; explicit scalars (including `false` and `0`) are kept
/// verbatim.
fn build_options(raw: &Yaml, setting: &str) -> Result<Option<Json>, CompileError> {
    let entries = match raw {
        Yaml::Mapping(m) if !m.is_empty() => m,
        _ => return Ok(None),
    };

    let context = format!("{setting}.options");
    let mut options = Vec::with_capacity(entries.len());
    for (label_key, value) in entries {
        let label = key_string(label_key, &context)?;
        let resolved = if is_blank(value) {
            Json::String(slugify(&label))
        } else {
            yaml_to_json(value, &context)?
        };

        let mut option = Map::new();
        option.insert("value".into(), resolved);
        option.insert("label".into(), Json::String(label));
        options.push(Json::Object(option));
    }

    Ok(Some(Json::Array(options)))
}

/// Build the blocks array: one `{name, type, limit?, settings}` per entry.
fn build_blocks(raw: &Yaml, section: &str) -> Result<Json, CompileError> {
    let context = format!("{section}.blocks");
    let entries = as_mapping(raw, &context)?;

    let mut blocks = Vec::with_capacity(entries.len());
    for (type_key, def) in entries {
        let block_type = key_string(type_key, &context)?;
        let block_context = format!("{context}.{block_type}");
        let def = match def {
            Yaml::Null => None,
            Yaml::Mapping(m) => Some(m),
            _ => return Err(CompileError::NotAMapping(block_context)),
        };

        let mut block = Map::new();
        block.insert("name".into(), Json::String(title_case(&block_type)));
        block.insert("type".into(), Json::String(block_type));

        if let Some(limit) = def.and_then(|d| d.get("limit")) {
            if !limit.is_null() {
                block.insert("limit".into(), yaml_to_json(limit, &block_context)?);
            }
        }

        let settings = match def {
            Some(d) => build_settings(d, &["limit"], &block_context)?,
            None => Json::Array(Vec::new()),
        };
        block.insert("settings".into(), settings);

        blocks.push(Json::Object(block));
    }

    Ok(Json::Array(blocks))
}

/// Build the presets array: one `{name, settings, blocks?}` per preset.
fn build_presets(raw: &Yaml, section: &str) -> Result<Json, CompileError> {
    let context = format!("{section}.presets");
    let entries = as_mapping(raw, &context)?;
    let empty = Mapping::new();

    let mut presets = Vec::with_capacity(entries.len());
    for (key, def) in entries {
        let preset_name = key_string(key, &context)?;
        let preset_context = format!("{context}.{preset_name}");
        let def = match def {
            Yaml::Null => &empty,
            Yaml::Mapping(m) => m,
            _ => return Err(CompileError::NotAMapping(preset_context)),
        };

        let mut preset = Map::new();
        preset.insert("name".into(), Json::String(title_case(&preset_name)));
        preset.insert("settings".into(), bundle_settings(def, &preset_context)?);

        if let Some(blocks) = def.get("blocks") {
            if !blocks.is_null() {
                let blocks_context = format!("{preset_context}.blocks");
                preset.insert("blocks".into(), build_instance_blocks(blocks, &blocks_context)?);
            }
        }

        presets.push(Json::Object(preset));
    }

    Ok(Json::Array(presets))
}

/// Build the default bundle: `{settings?, blocks?}`.
///
/// Unlike presets, an empty settings mapping drops the key entirely.
fn build_default(raw: &Yaml, section: &str) -> Result<Json, CompileError> {
    let context = format!("{section}.default");
    let def = as_mapping(raw, &context)?;

    let mut default = Map::new();

    let settings = bundle_settings(def, &context)?;
    if settings.as_object().is_some_and(|m| !m.is_empty()) {
        default.insert("settings".into(), settings);
    }

    if let Some(blocks) = def.get("blocks") {
        if !blocks.is_null() {
            let blocks_context = format!("{context}.blocks");
            default.insert("blocks".into(), build_instance_blocks(blocks, &blocks_context)?);
        }
    }

    Ok(Json::Object(default))
}

/// The top-level setting values of a preset or default bundle: every key
/// except `blocks`, carried over verbatim.
fn bundle_settings(def: &Mapping, context: &str) -> Result<Json, CompileError> {
    let mut settings = Map::new();
    for (key, value) in def {
        let key = key_string(key, context)?;
        if key == "blocks" {
            continue;
        }
        let value = yaml_to_json(value, &format!("{context}.{key}"))?;
        settings.insert(key, value);
    }
    Ok(Json::Object(settings))
}

/// Build the block-instance list of a preset or default bundle.
///
/// Each instance is `{type, settings?}`; blank setting values are dropped
/// and an instance whose settings end up empty omits the key.
fn build_instance_blocks(raw: &Yaml, context: &str) -> Result<Json, CompileError> {
    let items = raw
        .as_sequence()
        .ok_or_else(|| CompileError::NotASequence(context.to_string()))?;

    let mut blocks = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let item_context = format!("{context}[{index}]");
        let item = as_mapping(item, &item_context)?;

        let ty = item
            .get("type")
            .and_then(Yaml::as_str)
            .ok_or_else(|| CompileError::MissingKey(format!("{item_context}.type")))?;

        let mut block = Map::new();
        block.insert("type".into(), Json::String(ty.to_string()));

        let mut settings = Map::new();
        for (key, value) in item {
            let key = key_string(key, &item_context)?;
            if key == "type" || is_blank(value) {
                continue;
            }
            let value = yaml_to_json(value, &format!("{item_context}.{key}"))?;
            settings.insert(key, value);
        }
        if !settings.is_empty() {
            block.insert("settings".into(), Json::Object(settings));
        }

        blocks.push(Json::Object(block));
    }

    Ok(Json::Array(blocks))
}

/// Theme metadata in fixed key order. Every source field is required.
fn theme_info(theme: &Mapping) -> Result<Json, CompileError> {
    let mut info = Map::new();
    info.insert("name".into(), Json::String("theme_info".into()));

    for (out_key, src_key) in [
        ("theme_name", "name"),
        ("theme_version", "version"),
        ("theme_author", "author"),
        ("theme_documentation_url", "documentation"),
        ("theme_support_url", "support"),
    ] {
        let value = theme
            .get(src_key)
            .filter(|v| !v.is_null())
            .ok_or_else(|| CompileError::MissingKey(format!("theme.{src_key}")))?;
        info.insert(out_key.into(), yaml_to_json(value, "theme")?);
    }

    Ok(Json::Object(info))
}

/// Convert a YAML value to JSON, preserving mapping key order.
///
/// `context` names the node for key diagnostics.
fn yaml_to_json(value: &Yaml, context: &str) -> Result<Json, CompileError> {
    Ok(match value {
        Yaml::Null => Json::Null,
        Yaml::Bool(b) => Json::Bool(*b),
        Yaml::Number(n) => yaml_number(n),
        Yaml::String(s) => Json::String(s.clone()),
        Yaml::Sequence(seq) => {
            let mut out = Vec::with_capacity(seq.len());
            for item in seq {
                out.push(yaml_to_json(item, context)?);
            }
            Json::Array(out)
        }
        Yaml::Mapping(map) => {
            let mut out = Map::new();
            for (key, val) in map {
                let key = key_string(key, context)?;
                let val = yaml_to_json(val, context)?;
                out.insert(key, val);
            }
            Json::Object(out)
        }
        Yaml::Tagged(tagged) => yaml_to_json(&tagged.value, context)?,
    })
}

fn yaml_number(n: &serde_yaml::Number) -> Json {
    if let Some(i) = n.as_i64() {
        Json::from(i)
    } else if let Some(u) = n.as_u64() {
        Json::from(u)
    } else {
        n.as_f64()
            .and_then(serde_json::Number::from_f64)
            .map(Json::Number)
            .unwrap_or(Json::Null)
    }
}

/// A value that counts as "not supplied": null or a whitespace-only string.
fn is_blank(value: &Yaml) -> bool {
    match value {
        Yaml::Null => true,
        Yaml::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Mapping keys must be scalars; stringifying bools and numbers makes a
/// quoted `"true"` and a bare `true` label behave alike. Sequence or
/// mapping keys are rejected rather than collapsed to an empty name.
fn key_string(key: &Yaml, context: &str) -> Result<String, CompileError> {
    match key {
        Yaml::String(s) => Ok(s.clone()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Number(n) => Ok(n.to_string()),
        _ => Err(CompileError::BadKey(context.to_string())),
    }
}

fn fetch_mapping<'a>(root: &'a Mapping, key: &str) -> Result<&'a Mapping, CompileError> {
    let value = root
        .get(key)
        .ok_or_else(|| CompileError::MissingKey(key.to_string()))?;
    as_mapping(value, key)
}

fn as_mapping<'a>(value: &'a Yaml, context: &str) -> Result<&'a Mapping, CompileError> {
    value
        .as_mapping()
        .ok_or_else(|| CompileError::NotAMapping(context.to_string()))
}
