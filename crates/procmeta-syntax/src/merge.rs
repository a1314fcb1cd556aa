//! Argument merger: positional + keyword entries → canonical field values.
//!
//! Positional entries fill the fixed field order of an annotation kind as a
//! contiguous prefix; every field past the positional count comes from the
//! keyword mapping. The shape of the call is not validated, so a keyword
//! written before a positional, or a keyword naming a field already filled
//! positionally, resolves by position count alone.

use crate::error::SkipReason;
use crate::model::AnnotationKind;
use crate::tree::Argument;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// `r`, `b`, `u`, `f` string prefixes and their two-letter combinations.
static RE_STRING_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[rRbBuUfF]{1,2}["']"#).unwrap());

/// How a field behaves when no value was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional { default: Option<&'static str> },
}

/// One slot in an annotation's positional order.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Keyword spellings accepted for this field, canonical first.
    pub keywords: &'static [&'static str],
    pub presence: Presence,
}

impl FieldSpec {
    const fn required(name: &'static str, keywords: &'static [&'static str]) -> Self {
        Self {
            name,
            keywords,
            presence: Presence::Required,
        }
    }

    const fn optional(
        name: &'static str,
        keywords: &'static [&'static str],
        default: Option<&'static str>,
    ) -> Self {
        Self {
            name,
            keywords,
            presence: Presence::Optional { default },
        }
    }
}

pub const PARAMETER_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", &["name"]),
    FieldSpec::required("type", &["type"]),
    FieldSpec::required("required", &["required"]),
    FieldSpec::required("defaultValue", &["defaultValue", "default_value"]),
    FieldSpec::optional("description", &["description"], Some("")),
];

pub const METRIC_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("type", &["type", "name"]),
    FieldSpec::required("groundTruth", &["groundTruth", "ground_truth"]),
    FieldSpec::required("prediction", &["prediction"]),
];

/// Drop a string prefix, then strip every leading and trailing quote character.
///
/// The literal body is kept as written: `f"{x}"` yields `{x}`.
pub fn strip_quotes(raw: &str) -> &str {
    let unprefixed = match RE_STRING_PREFIX.find(raw) {
        Some(m) => &raw[m.end() - 1..],
        None => raw,
    };
    unprefixed.trim_matches(|c| c == '"' || c == '\'')
}

/// A decorator's argument list split into positional values and keywords.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Arguments {
    positional: Vec<String>,
    keywords: HashMap<String, String>,
}

impl Arguments {
    /// Partition entries: one value is positional, two is `key=value`.
    /// Entries of any other shape carry nothing the builders can use.
    pub fn partition(entries: &[Argument]) -> Self {
        let mut args = Arguments::default();
        for entry in entries {
            match entry.values.as_slice() {
                [value] => args.positional.push(strip_quotes(value).to_string()),
                [key, value] => {
                    // Repeated keywords: last one wins
                    args.keywords
                        .insert(strip_quotes(key).to_string(), strip_quotes(value).to_string());
                }
                other => tracing::trace!(values = other.len(), "ignoring argument entry"),
            }
        }
        args
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    pub fn keyword(&self, key: &str) -> Option<&str> {
        self.keywords.get(key).map(String::as_str)
    }

    /// First value found under any of `keys`.
    pub fn any_keyword(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.keyword(key))
    }

    /// Resolve `layout` against these arguments.
    pub fn resolve(
        &self,
        annotation: AnnotationKind,
        layout: &'static [FieldSpec],
    ) -> Result<Fields, SkipReason> {
        let positional_count = self.positional.len();
        let mut values = Vec::with_capacity(layout.len());

        for (i, spec) in layout.iter().enumerate() {
            let value = if i < positional_count {
                Some(self.positional[i].clone())
            } else {
                match (self.any_keyword(spec.keywords), spec.presence) {
                    (Some(value), _) => Some(value.to_string()),
                    (None, Presence::Required) => {
                        return Err(SkipReason::MissingRequiredField {
                            annotation,
                            field: spec.name,
                        })
                    }
                    (None, Presence::Optional { default }) => default.map(str::to_string),
                }
            };
            values.push((spec.name, value));
        }

        Ok(Fields { annotation, values })
    }
}

/// Field values resolved for one decorator.
#[derive(Debug, Clone, PartialEq)]
pub struct Fields {
    annotation: AnnotationKind,
    values: Vec<(&'static str, Option<String>)>,
}

impl Fields {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(field, _)| *field == name)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Like [`get`](Self::get) but reports an unset field as missing.
    pub fn require(&self, name: &'static str) -> Result<&str, SkipReason> {
        self.get(name).ok_or(SkipReason::MissingRequiredField {
            annotation: self.annotation,
            field: name,
        })
    }
}
