//! Descriptor builders, one per annotation kind.

use crate::coerce::{self, DATA_KINDS, PROCESSOR_KINDS, VISIBILITIES};
use crate::error::SkipReason;
use crate::merge::{Arguments, METRIC_FIELDS, PARAMETER_FIELDS};
use crate::model::*;
use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

static RE_SLUG_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_-]+").unwrap());

/// Lower-case and collapse runs of whitespace, `_` and `-` into one `-`.
///
/// "Edge Detector" → "edge-detector", "edge__detector" → "edge-detector"
pub fn slugify(text: &str) -> String {
    RE_SLUG_SEPARATORS
        .replace_all(&text.to_lowercase(), "-")
        .into_owned()
}

/// Build a processor from keyword arguments only.
pub fn processor(args: &Arguments) -> Result<ProcessorDescriptor, SkipReason> {
    let non_empty = |key: &str| args.keyword(key).filter(|v| !v.is_empty());

    let (slug, name) = match (non_empty("slug"), non_empty("name")) {
        (Some(slug), Some(name)) => (slug.to_string(), name.to_string()),
        (Some(slug), None) => (slug.to_string(), slugify(slug)),
        (None, Some(name)) => (slugify(name), name.to_string()),
        (None, None) => {
            return Err(SkipReason::MissingRequiredField {
                annotation: AnnotationKind::Processor,
                field: "slug",
            })
        }
    };

    let kind = required_enum(args, "type", PROCESSOR_KINDS)?;
    let input_type = required_enum(args, "input_type", DATA_KINDS)?;
    let output_type = if kind.has_output() {
        Some(required_enum(args, "output_type", DATA_KINDS)?)
    } else {
        None
    };
    let visibility = required_enum(args, "visibility", VISIBILITIES)?;

    let command = match non_empty("command") {
        Some(command) => command.to_string(),
        None => format!("{}.py", slug),
    };

    Ok(ProcessorDescriptor {
        id: Uuid::new_v4(),
        slug,
        name,
        author: None,
        command,
        description: args.keyword("description").unwrap_or_default().to_string(),
        input_type,
        output_type,
        visibility,
        kind,
    })
}

/// Build a parameter owned by `owner`, the sequence's active processor.
pub fn parameter(
    args: &Arguments,
    owner: Option<Uuid>,
    order: usize,
) -> Result<ParameterDescriptor, SkipReason> {
    let fields = args.resolve(AnnotationKind::Parameter, PARAMETER_FIELDS)?;
    let name = fields.require("name")?;

    let Some(processor_id) = owner else {
        return Err(SkipReason::MissingOwningProcessor {
            name: name.to_string(),
        });
    };

    Ok(ParameterDescriptor {
        id: Uuid::new_v4(),
        processor_id,
        name: name.to_string(),
        param_type: coerce::parameter_type(fields.require("type")?),
        required: coerce::flag(fields.require("required")?),
        default_value: fields.require("defaultValue")?.to_string(),
        order,
        description: fields.get("description").unwrap_or_default().to_string(),
    })
}

pub fn metric(args: &Arguments) -> Result<MetricDescriptor, SkipReason> {
    let fields = args.resolve(AnnotationKind::Metric, METRIC_FIELDS)?;
    Ok(MetricDescriptor {
        kind: coerce::metric_kind(fields.require("type")?),
        ground_truth: fields.require("groundTruth")?.to_string(),
        prediction: fields.require("prediction")?.to_string(),
    })
}

fn required_enum<T: Copy>(
    args: &Arguments,
    field: &'static str,
    table: &[(&str, T)],
) -> Result<T, SkipReason> {
    let raw = args.keyword(field).ok_or(SkipReason::MissingRequiredField {
        annotation: AnnotationKind::Processor,
        field,
    })?;
    coerce::lookup(table, raw).ok_or_else(|| SkipReason::UnknownEnumValue {
        field,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Argument;

    fn kw(pairs: &[(&str, &str)]) -> Arguments {
        let entries: Vec<Argument> = pairs
            .iter()
            .map(|(k, v)| Argument::keyword(*k, format!("'{}'", v)))
            .collect();
        Arguments::partition(&entries)
    }

    fn operation(extra: &[(&str, &str)]) -> Arguments {
        let mut pairs = vec![
            ("type", "OPERATION"),
            ("input_type", "IMAGE"),
            ("output_type", "IMAGE"),
            ("visibility", "PUBLIC"),
        ];
        pairs.extend_from_slice(extra);
        kw(&pairs)
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Edge Detector"), "edge-detector");
        assert_eq!(slugify("edge__detector"), "edge-detector");
        assert_eq!(slugify("Edge - _ Detector\tV2"), "edge-detector-v2");
        assert_eq!(slugify("foo"), "foo");
    }

    #[test]
    fn processor_with_slug_and_name() {
        let p = processor(&operation(&[("slug", "foo"), ("name", "Foo")])).unwrap();
        assert_eq!(p.slug, "foo");
        assert_eq!(p.name, "Foo");
        assert_eq!(p.kind, ProcessorKind::Operation);
        assert_eq!(p.input_type, DataKind::Image);
        assert_eq!(p.output_type, Some(DataKind::Image));
        assert_eq!(p.visibility, Visibility::Public);
        assert_eq!(p.command, "foo.py");
        assert_eq!(p.description, "");
        assert_eq!(p.author, None);
    }

    #[test]
    fn slug_derived_from_name() {
        let p = processor(&operation(&[("name", "Edge Detector")])).unwrap();
        assert_eq!(p.slug, "edge-detector");
        assert_eq!(p.name, "Edge Detector");
        assert_eq!(p.command, "edge-detector.py");
    }

    #[test]
    fn name_derived_from_slug() {
        let p = processor(&operation(&[("slug", "Edge_Detector")])).unwrap();
        assert_eq!(p.slug, "Edge_Detector");
        assert_eq!(p.name, "edge-detector");
    }

    #[test]
    fn slug_and_name_both_missing() {
        let err = processor(&operation(&[("name", "")])).unwrap_err();
        assert_eq!(
            err,
            SkipReason::MissingRequiredField {
                annotation: AnnotationKind::Processor,
                field: "slug",
            }
        );
    }

    #[test]
    fn explicit_command_and_description() {
        let p = processor(&operation(&[
            ("slug", "foo"),
            ("command", "python -m foo"),
            ("description", "Finds edges"),
        ]))
        .unwrap();
        assert_eq!(p.command, "python -m foo");
        assert_eq!(p.description, "Finds edges");
    }

    #[test]
    fn enums_match_case_insensitively() {
        let p = processor(&kw(&[
            ("slug", "foo"),
            ("type", "algorithm"),
            ("input_type", "Tabular"),
            ("output_type", "number"),
            ("visibility", "private"),
        ]))
        .unwrap();
        assert_eq!(p.kind, ProcessorKind::Algorithm);
        assert_eq!(p.input_type, DataKind::Tabular);
        assert_eq!(p.output_type, Some(DataKind::Number));
        assert_eq!(p.visibility, Visibility::Private);
    }

    #[test]
    fn unknown_processor_type() {
        let err = processor(&kw(&[
            ("slug", "foo"),
            ("type", "BOGUS"),
            ("input_type", "IMAGE"),
            ("output_type", "IMAGE"),
            ("visibility", "PUBLIC"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            SkipReason::UnknownEnumValue {
                field: "type",
                value: "BOGUS".into(),
            }
        );
    }

    #[test]
    fn unknown_visibility() {
        let err = processor(&operation(&[("slug", "foo"), ("visibility", "internal")])).unwrap_err();
        assert!(matches!(err, SkipReason::UnknownEnumValue { field: "visibility", .. }));
    }

    #[test]
    fn operation_requires_output_type() {
        let err = processor(&kw(&[
            ("slug", "foo"),
            ("type", "OPERATION"),
            ("input_type", "IMAGE"),
            ("visibility", "PUBLIC"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            SkipReason::MissingRequiredField {
                annotation: AnnotationKind::Processor,
                field: "output_type",
            }
        );
    }

    #[test]
    fn visualization_ignores_output_type() {
        let p = processor(&kw(&[
            ("slug", "plot"),
            ("type", "VISUALIZATION"),
            ("input_type", "TABULAR"),
            ("output_type", "NOT_A_KIND"),
            ("visibility", "SHARED"),
        ]))
        .unwrap();
        assert_eq!(p.kind, ProcessorKind::Visualization);
        assert_eq!(p.output_type, None);
    }

    #[test]
    fn processor_ignores_positional_arguments() {
        let args = Arguments::partition(&[
            Argument::positional("'foo'"),
            Argument::keyword("type", "'OPERATION'"),
        ]);
        let err = processor(&args).unwrap_err();
        assert!(matches!(err, SkipReason::MissingRequiredField { field: "slug", .. }));
    }

    #[test]
    fn fresh_ids() {
        let a = processor(&operation(&[("slug", "foo")])).unwrap();
        let b = processor(&operation(&[("slug", "foo")])).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn parameter_links_owner_and_coerces() {
        let owner = Uuid::new_v4();
        let args = kw(&[
            ("name", "threshold"),
            ("type", "float"),
            ("required", "True"),
            ("defaultValue", "0.5"),
        ]);
        let p = parameter(&args, Some(owner), 3).unwrap();
        assert_eq!(p.processor_id, owner);
        assert_eq!(p.param_type, ParameterType::Float);
        assert!(p.required);
        assert_eq!(p.default_value, "0.5");
        assert_eq!(p.order, 3);
        assert_eq!(p.description, "");
    }

    #[test]
    fn parameter_permissive_values() {
        let args = kw(&[
            ("name", "mode"),
            ("type", "ndarray"),
            ("required", "yes"),
            ("defaultValue", "None"),
        ]);
        let p = parameter(&args, Some(Uuid::new_v4()), 0).unwrap();
        assert_eq!(p.param_type, ParameterType::Undefined);
        assert!(!p.required);
    }

    #[test]
    fn parameter_without_owner() {
        let args = kw(&[
            ("name", "threshold"),
            ("type", "float"),
            ("required", "true"),
            ("defaultValue", "0.5"),
        ]);
        assert_eq!(
            parameter(&args, None, 0).unwrap_err(),
            SkipReason::MissingOwningProcessor {
                name: "threshold".into()
            }
        );
    }

    #[test]
    fn metric_aliases() {
        let m = metric(&kw(&[("type", "f1"), ("ground_truth", "y_true"), ("prediction", "y_pred")])).unwrap();
        assert_eq!(m.kind, MetricKind::F1Score);
        assert_eq!(m.ground_truth, "y_true");
        assert_eq!(m.prediction, "y_pred");

        let m = metric(&kw(&[("type", "accuracy"), ("ground_truth", "y"), ("prediction", "p")])).unwrap();
        assert_eq!(m.kind, MetricKind::Undefined);
    }

    #[test]
    fn metric_missing_prediction() {
        let err = metric(&kw(&[("type", "recall"), ("ground_truth", "y")])).unwrap_err();
        assert!(matches!(err, SkipReason::MissingRequiredField { field: "prediction", .. }));
    }
}
