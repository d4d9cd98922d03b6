//! Placeholder substitution engine

use super::types::Variables;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Replace every `{{key}}` in `template` whose key is present in `variables`.
///
/// The template is scanned once from left to right. Substituted values are
/// copied to the output and never scanned again, so a value that itself
/// contains `{{...}}` is emitted verbatim. Placeholders without a matching key
/// are left in place. Keys match exactly (`{{ name }}` is not `{{name}}`).
pub fn render(template: &str, variables: &Variables) -> String {
    if variables.is_empty() {
        return template.to_string();
    }

    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        output.push_str(&rest[..start]);

        let inner = &rest[start + OPEN.len()..];
        let Some(end) = inner.find(CLOSE) else {
            // Unterminated placeholder
            output.push_str(&rest[start..]);
            return output;
        };

        match variables.get(&inner[..end]) {
            Some(value) => {
                output.push_str(value);
                rest = &inner[end + CLOSE.len()..];
            }
            None => {
                // Emit a single brace and rescan, so `{{{key}}}` still finds `{{key}}`
                output.push('{');
                rest = &rest[start + 1..];
            }
        }
    }

    output.push_str(rest);
    output
}

/// Distinct placeholder keys referenced by `template`, in order of first use
pub fn placeholders(template: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        let inner = &rest[start + OPEN.len()..];
        let Some(end) = inner.find(CLOSE) else {
            break;
        };

        let key = &inner[..end];
        if key.is_empty() || key.contains('{') {
            rest = &rest[start + 1..];
            continue;
        }

        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
        rest = &inner[end + CLOSE.len()..];
    }

    keys
}
