//! JSX/TSX mount compiler
//! JSX/TSX 组件挂载编译器
//!
//! Produces a self-contained HTML document that transpiles the component in
//! the sandbox (Babel standalone) and mounts its default export into `#root`.
//!
//! Host-side work is the module rewrite: imports of `react`/`react-dom` become
//! bindings to the runtime globals, any other import is rejected, and the
//! default export is turned into a named entry the bootstrap can return.

use ct_core::ports::ComponentCompilerPort;
use ct_core::preview::document::escape_html;
use ct_core::preview::{CompileError, CompiledComponent};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Largest component source accepted, in bytes.
pub const MAX_SOURCE_BYTES: usize = 256 * 1024;

pub const DEFAULT_RUNTIME_SCRIPTS: &[&str] = &[
    "https://unpkg.com/react@18/umd/react.production.min.js",
    "https://unpkg.com/react-dom@18/umd/react-dom.production.min.js",
    "https://unpkg.com/@babel/standalone@7/babel.min.js",
];

const ANONYMOUS_ENTRY: &str = "__Default";

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*import\s+(type\s+)?(?:([^'";]*?)\s+from\s+)?['"]([^'"]+)['"][ \t]*;?"#)
        .unwrap()
});

static DEFAULT_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^([ \t]*)export\s+default\s+((?:async\s+)?function\b\s*\*?\s*|class\s+)([A-Za-z_$][\w$]*)",
    )
    .unwrap()
});

static DEFAULT_IDENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*export\s+default\s+([A-Za-z_$][\w$]*)[ \t]*;?[ \t]*$")
        .unwrap()
});

static DEFAULT_EXPR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([ \t]*)export\s+default\s+")
        .unwrap()
});

static NAMED_EXPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([ \t]*)export\s+(const|let|var|function|class|async|interface|type|enum)\b")
        .unwrap()
});

/// Module source after the host-side rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedModule {
    pub code: String,
    pub entry: String,
}

pub struct JsxMountCompiler {
    runtime_scripts: Vec<String>,
    max_source_bytes: usize,
}

impl Default for JsxMountCompiler {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl JsxMountCompiler {
    /// An empty `runtime_scripts` list selects [`DEFAULT_RUNTIME_SCRIPTS`].
    pub fn new(runtime_scripts: Vec<String>) -> Self {
        let runtime_scripts = if runtime_scripts.is_empty() {
            DEFAULT_RUNTIME_SCRIPTS.iter().map(|s| s.to_string()).collect()
        } else {
            runtime_scripts
        };
        Self {
            runtime_scripts,
            max_source_bytes: MAX_SOURCE_BYTES,
        }
    }

    pub fn with_max_source_bytes(mut self, limit: usize) -> Self {
        self.max_source_bytes = limit;
        self
    }

    pub fn prepare(&self, source: &str) -> Result<PreparedModule, CompileError> {
        if source.trim().is_empty() {
            return Err(CompileError::EmptySource);
        }
        if source.len() > self.max_source_bytes {
            return Err(CompileError::TooLarge {
                size: source.len(),
                limit: self.max_source_bytes,
            });
        }

        let code = rewrite_imports(source)?;
        let (code, entry) = resolve_default_export(&code)?;
        let code = NAMED_EXPORT_RE.replace_all(&code, "$1$2").into_owned();
        Ok(PreparedModule { code, entry })
    }

    fn mount_document(&self, filename: &str, module: &PreparedModule) -> String {
        let scripts: String = self
            .runtime_scripts
            .iter()
            .map(|src| format!("<script src=\"{}\" crossorigin></script>\n", escape_html(src)))
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>html,body{{margin:0;padding:0;}}body{{font-family:system-ui,-apple-system,sans-serif;}}</style>
{scripts}</head>
<body>
<div id="root"></div>
<script>
(function () {{
  var root = document.getElementById("root");
  try {{
    var output = Babel.transform({source}, {{
      filename: {filename},
      presets: [["typescript", {{ isTSX: true, allExtensions: true }}], "react"]
    }}).code;
    var Component = new Function(output + "\nreturn {entry};")();
    ReactDOM.createRoot(root).render(React.createElement(Component));
  }} catch (err) {{
    root.textContent = String((err && err.message) || err);
    root.style.cssText = "color:#b91c1c;font-family:monospace;white-space:pre-wrap;padding:1rem";
  }}
}})();
</script>
</body>
</html>
"#,
            title = escape_html(filename),
            scripts = scripts,
            source = script_literal(&module.code),
            filename = script_literal(filename),
            entry = module.entry,
        )
    }
}

impl ComponentCompilerPort for JsxMountCompiler {
    fn compile(&self, filename: &str, source: &str) -> Result<CompiledComponent, CompileError> {
        let module = self.prepare(source)?;
        let document = self.mount_document(filename, &module);
        Ok(CompiledComponent {
            entry: module.entry,
            document,
        })
    }
}

/// JSON string literal that is also safe inside a `<script>` element.
fn script_literal(text: &str) -> String {
    serde_json::Value::String(text.to_string())
        .to_string()
        .replace("</", "<\\/")
        .replace("<!--", "<\\!--")
}

fn runtime_global(module: &str) -> Option<&'static str> {
    match module {
        "react" => Some("window.React"),
        "react-dom" | "react-dom/client" => Some("window.ReactDOM"),
        _ => None,
    }
}

fn rewrite_imports(source: &str) -> Result<String, CompileError> {
    let mut unsupported = None;
    let code = IMPORT_RE.replace_all(source, |caps: &Captures| {
        let module = &caps[3];
        if caps.get(1).is_some() || module == "react/jsx-runtime" {
            return String::new();
        }
        match runtime_global(module) {
            Some(global) => bindings(caps.get(2).map_or("", |m| m.as_str()), global),
            None => {
                unsupported.get_or_insert_with(|| module.to_string());
                String::new()
            }
        }
    });

    match unsupported {
        Some(module) => Err(CompileError::UnsupportedImport(module)),
        None => Ok(code.into_owned()),
    }
}

/// `React, { useState as s }` -> `const React = window.React; const { useState: s } = window.React;`
fn bindings(clause: &str, global: &str) -> String {
    let clause = clause.trim();
    if clause.is_empty() {
        return String::new();
    }
    if let Some(namespace) = clause.strip_prefix('*') {
        let name = namespace.trim().trim_start_matches("as").trim();
        return format!("const {name} = {global};");
    }

    let (default, named) = match clause.find('{') {
        Some(open) => {
            let close = clause.rfind('}').unwrap_or(clause.len());
            let named = clause.get(open + 1..close).unwrap_or_default();
            (clause[..open].trim().trim_end_matches(','), Some(named))
        }
        None => (clause, None),
    };

    let mut out = Vec::new();
    let default = default.trim();
    if !default.is_empty() {
        out.push(format!("const {default} = {global};"));
    }
    if let Some(named) = named {
        let names: Vec<String> = named
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty() && !n.starts_with("type "))
            .map(|n| match n.split_once(" as ") {
                Some((from, to)) => format!("{}: {}", from.trim(), to.trim()),
                None => n.to_string(),
            })
            .collect();
        if !names.is_empty() {
            out.push(format!("const {{ {} }} = {global};", names.join(", ")));
        }
    }
    out.join(" ")
}

fn resolve_default_export(code: &str) -> Result<(String, String), CompileError> {
    // `export default class extends Base` has no name of its own.
    let named = DEFAULT_DECL_RE
        .captures(code)
        .filter(|caps| &caps[3] != "extends");
    if let Some(caps) = named {
        let entry = caps[3].to_string();
        let code = DEFAULT_DECL_RE.replacen(code, 1, "$1$2$3").into_owned();
        return Ok((code, entry));
    }
    if let Some(caps) = DEFAULT_IDENT_RE.captures(code) {
        let entry = caps[1].to_string();
        let code = DEFAULT_IDENT_RE.replacen(code, 1, "").into_owned();
        return Ok((code, entry));
    }
    if DEFAULT_EXPR_RE.is_match(code) {
        let replacement = format!("${{1}}const {ANONYMOUS_ENTRY} = ");
        let code = DEFAULT_EXPR_RE
            .replacen(code, 1, replacement.as_str())
            .into_owned();
        return Ok((code, ANONYMOUS_ENTRY.to_string()));
    }
    Err(CompileError::NoMountableExport)
}
