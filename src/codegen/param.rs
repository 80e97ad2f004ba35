//! Parameter declarations: value shape checks and the `paramDefine` block.

use ofx_definitions::Category;
use serde_json::Value;

use super::descriptor::ParameterDescriptor;
use super::writer::{SourceWriter, c_identifier, c_string, format_double, one_line};
use crate::error::ValidationError;
use crate::registry::{DefinitionRef, Registry};

const BOOLEAN_TYPE: &str = "kOfxParamTypeBoolean";

/// How a parameter type's values are held natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Integer,
    Floating,
    Text,
    /// Host-owned bytes; never given a literal default
    Opaque,
    /// Groups, pages and buttons carry no value
    Valueless,
}

impl Representation {
    pub fn from_c_type(c_type: Option<&str>) -> Self {
        match c_type.map(str::trim) {
            None => Representation::Valueless,
            Some("int") => Representation::Integer,
            Some("double") => Representation::Floating,
            Some(other) if other.starts_with("char*") => Representation::Text,
            Some(_) => Representation::Opaque,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Representation::Integer | Representation::Floating)
    }

    fn c_type(self) -> &'static str {
        match self {
            Representation::Integer => "int",
            Representation::Floating => "double",
            _ => "char*",
        }
    }

    fn setter(self) -> &'static str {
        match self {
            Representation::Integer => "propSetInt",
            Representation::Floating => "propSetDouble",
            _ => "propSetString",
        }
    }
}

/// Type metadata a declaration is checked and rendered against.
#[derive(Debug, Clone, Copy)]
pub struct ParamShape<'d> {
    pub type_name: &'d str,
    pub dimensions: usize,
    pub representation: Representation,
    pub boolean: bool,
    pub related_properties: &'d [String],
}

impl<'d> ParamShape<'d> {
    pub fn of(param_type: DefinitionRef<'d>) -> Self {
        let definition = param_type.definition;
        let representation = Representation::from_c_type(definition.c_type.as_deref());
        let dimensions = match representation {
            Representation::Valueless => 0,
            _ => definition.dimensions.unwrap_or(1),
        };
        Self {
            type_name: param_type.name,
            dimensions,
            representation,
            boolean: param_type.name == BOOLEAN_TYPE,
            related_properties: &definition.related_properties,
        }
    }
}

/// A parameter whose values have been checked and turned into C literals.
#[derive(Debug, Clone)]
pub struct ResolvedParam<'a, 'd> {
    pub name: &'a str,
    pub label: Option<&'a str>,
    pub hint: Option<&'a str>,
    pub shape: ParamShape<'d>,
    pub default: Option<Vec<String>>,
    pub min: Option<Vec<String>>,
    pub max: Option<Vec<String>>,
}

/// Check a descriptor against the registry, recording problems under
/// `prefix` (e.g. `parameters[1]`). Returns `None` when anything was wrong.
pub fn resolve<'a, 'd>(
    registry: &Registry<'d>,
    descriptor: &'a ParameterDescriptor,
    prefix: &str,
    issues: &mut ValidationError,
) -> Option<ResolvedParam<'a, 'd>> {
    let field = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        }
    };
    let before = issues.issues.len();

    let name = descriptor.name.trim();
    if name.is_empty() {
        issues.missing(field("name"));
    }

    let type_name = descriptor.param_type.trim();
    if type_name.is_empty() {
        issues.missing(field("type"));
        return None;
    }
    let shape = match registry.param_type(type_name) {
        Ok(found) => ParamShape::of(found),
        Err(_) => {
            issues.unresolved(field("type"), type_name, registry.names(Category::ParamTypes));
            return None;
        }
    };

    let default = descriptor
        .default
        .as_ref()
        .and_then(|value| default_literals(&shape, value, &field("default"), issues));
    let min = descriptor
        .min
        .as_ref()
        .and_then(|value| bound_literals(&shape, value, "min", &field("min"), issues));
    let max = descriptor
        .max
        .as_ref()
        .and_then(|value| bound_literals(&shape, value, "max", &field("max"), issues));

    if issues.issues.len() > before {
        return None;
    }

    Some(ResolvedParam {
        name,
        label: non_empty(descriptor.label.as_deref()),
        hint: non_empty(descriptor.hint.as_deref()),
        shape,
        default,
        min,
        max,
    })
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

fn as_values(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

fn default_literals(
    shape: &ParamShape,
    value: &Value,
    field: &str,
    issues: &mut ValidationError,
) -> Option<Vec<String>> {
    let values = as_values(value);
    match shape.representation {
        Representation::Valueless => {
            issues.invalid(
                field,
                format!(
                    "{} holds no value; expected 0 default values, got {}",
                    shape.type_name,
                    values.len()
                ),
            );
            return None;
        }
        Representation::Opaque => {
            issues.invalid(field, format!("{} is opaque and takes no default", shape.type_name));
            return None;
        }
        _ => {}
    }

    if values.len() != shape.dimensions {
        issues.invalid(
            field,
            format!(
                "{} has {} dimension(s); expected {} default value(s), got {}",
                shape.type_name,
                shape.dimensions,
                shape.dimensions,
                values.len()
            ),
        );
        return None;
    }

    literals(shape, &values, field, issues)
}

fn bound_literals(
    shape: &ParamShape,
    value: &Value,
    key: &str,
    field: &str,
    issues: &mut ValidationError,
) -> Option<Vec<String>> {
    if !shape.representation.is_numeric() || shape.boolean {
        issues.invalid(field, format!("{} is not numeric and takes no {}", shape.type_name, key));
        return None;
    }

    let mut values = as_values(value);
    if values.len() == 1 && shape.dimensions > 1 {
        values = vec![values[0]; shape.dimensions];
    }
    if values.len() != shape.dimensions {
        issues.invalid(
            field,
            format!(
                "{} has {} dimension(s); expected 1 or {} {} value(s), got {}",
                shape.type_name,
                shape.dimensions,
                shape.dimensions,
                key,
                values.len()
            ),
        );
        return None;
    }

    literals(shape, &values, field, issues)
}

fn literals(
    shape: &ParamShape,
    values: &[&Value],
    field: &str,
    issues: &mut ValidationError,
) -> Option<Vec<String>> {
    match values
        .iter()
        .map(|value| literal(shape, value))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(literals) => Some(literals),
        Err(message) => {
            issues.invalid(field, message);
            None
        }
    }
}

fn literal(shape: &ParamShape, value: &Value) -> Result<String, String> {
    match shape.representation {
        Representation::Integer if shape.boolean => match value {
            Value::Bool(flag) => Ok(if *flag { "1" } else { "0" }.to_string()),
            other => match whole_number(other) {
                Some(n @ (0 | 1)) => Ok(n.to_string()),
                _ => Err(format!("{} expects true/false or 0/1, got {}", shape.type_name, other)),
            },
        },
        Representation::Integer => {
            let n = whole_number(value)
                .ok_or_else(|| format!("{} expects integers, got {}", shape.type_name, value))?;
            i32::try_from(n)
                .map(|n| n.to_string())
                .map_err(|_| format!("{} value {} is outside the range of int", shape.type_name, value))
        }
        Representation::Floating => value
            .as_f64()
            .map(format_double)
            .ok_or_else(|| format!("{} expects numbers, got {}", shape.type_name, value)),
        Representation::Text => value
            .as_str()
            .map(c_string)
            .ok_or_else(|| format!("{} expects strings, got {}", shape.type_name, value)),
        Representation::Opaque | Representation::Valueless => {
            Err(format!("{} takes no literal values", shape.type_name))
        }
    }
}

/// An integer, or a float with no fractional part
fn whole_number(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Emit the `paramDefine` block. Expects `paramSet`, `gParamSuite` and
/// `gPropSuite` to be in scope.
pub fn render(param: &ResolvedParam, w: &mut SourceWriter) {
    w.line(format!("// {} ({})", one_line(param.name), param.shape.type_name));
    if !param.shape.related_properties.is_empty() {
        let related: Vec<String> = param
            .shape
            .related_properties
            .iter()
            .map(|p| one_line(p))
            .collect();
        w.line(format!("// See also: {}", related.join(", ")));
    }
    w.open("{");
    w.line("OfxPropertySetHandle paramProps;");
    w.line(format!(
        "gParamSuite->paramDefine(paramSet, {}, {}, &paramProps);",
        param.shape.type_name,
        c_string(param.name)
    ));
    if let Some(label) = param.label {
        w.line(format!(
            "gPropSuite->propSetString(paramProps, kOfxPropLabel, 0, {});",
            c_string(label)
        ));
    }
    if let Some(hint) = param.hint {
        w.line(format!(
            "gPropSuite->propSetString(paramProps, kOfxParamPropHint, 0, {});",
            c_string(hint)
        ));
    }

    let ident = c_identifier(param.name);
    let values = [
        ("Default", "kOfxParamPropDefault", &param.default),
        ("Min", "kOfxParamPropMin", &param.min),
        ("Max", "kOfxParamPropMax", &param.max),
    ];
    for (suffix, property, literals) in values {
        if let Some(literals) = literals {
            set_property(w, param.shape.representation, &ident, suffix, property, literals);
        }
    }
    w.close("}");
}

fn set_property(
    w: &mut SourceWriter,
    representation: Representation,
    ident: &str,
    suffix: &str,
    property: &str,
    literals: &[String],
) {
    if let [single] = literals {
        w.line(format!(
            "gPropSuite->{}(paramProps, {}, 0, {});",
            representation.setter(),
            property,
            single
        ));
        return;
    }

    let array = format!("{}{}", ident, suffix);
    w.line(format!(
        "static const {} {}[{}] = {{{}}};",
        representation.c_type(),
        array,
        literals.len(),
        literals.join(", ")
    ));
    w.line(format!(
        "gPropSuite->{}N(paramProps, {}, {}, {});",
        representation.setter(),
        property,
        literals.len(),
        array
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ofx_definitions::Dataset;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render_one(registry: &Registry, descriptor: &ParameterDescriptor) -> Result<String, ValidationError> {
        let mut issues = ValidationError::new();
        let resolved = resolve(registry, descriptor, "", &mut issues);
        match resolved {
            Some(param) => {
                let mut w = SourceWriter::new();
                render(&param, &mut w);
                Ok(w.finish())
            }
            None => Err(issues),
        }
    }

    #[test]
    fn test_representation_mapping() {
        assert_eq!(Representation::from_c_type(Some("int")), Representation::Integer);
        assert_eq!(Representation::from_c_type(Some("double")), Representation::Floating);
        assert_eq!(Representation::from_c_type(Some("char*")), Representation::Text);
        assert_eq!(
            Representation::from_c_type(Some("char* (encoded)")),
            Representation::Text
        );
        assert_eq!(Representation::from_c_type(Some("OfxBytes*")), Representation::Opaque);
        assert_eq!(Representation::from_c_type(None), Representation::Valueless);
    }

    #[test]
    fn test_every_param_type_has_a_shape() {
        let dataset = Dataset::embedded().unwrap();
        let registry = Registry::new(&dataset);

        for name in registry.list_category("param_types") {
            let shape = ParamShape::of(registry.param_type(name).unwrap());
            match shape.representation {
                Representation::Valueless => assert_eq!(shape.dimensions, 0, "{name}"),
                _ => assert!(shape.dimensions >= 1, "{name}"),
            }
        }
    }

    #[test]
    fn test_scalar_double() {
        let dataset = Dataset::embedded().unwrap();
        let registry = Registry::new(&dataset);

        let descriptor = ParameterDescriptor::new("gain", "kOfxParamTypeDouble")
            .with_label("Gain")
            .with_default(json!(1))
            .with_range(json!(0), json!(4.5));
        let code = render_one(&registry, &descriptor).unwrap();

        assert_eq!(
            code,
            "// gain (kOfxParamTypeDouble)\n\
             {\n    \
             OfxPropertySetHandle paramProps;\n    \
             gParamSuite->paramDefine(paramSet, kOfxParamTypeDouble, \"gain\", &paramProps);\n    \
             gPropSuite->propSetString(paramProps, kOfxPropLabel, 0, \"Gain\");\n    \
             gPropSuite->propSetDouble(paramProps, kOfxParamPropDefault, 0, 1.0);\n    \
             gPropSuite->propSetDouble(paramProps, kOfxParamPropMin, 0, 0.0);\n    \
             gPropSuite->propSetDouble(paramProps, kOfxParamPropMax, 0, 4.5);\n\
             }\n"
        );
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let dataset = Dataset::embedded().unwrap();
        let registry = Registry::new(&dataset);

        let code = render_one(&registry, &ParameterDescriptor::new("count", "kOfxParamTypeInteger"))
            .unwrap();
        assert!(!code.contains("kOfxPropLabel"));
        assert!(!code.contains("kOfxParamPropHint"));
        assert!(!code.contains("kOfxParamPropDefault"));
        assert!(!code.contains("kOfxParamPropMin"));
        assert!(!code.contains("kOfxParamPropMax"));
    }

    #[test]
    fn test_vector_default_embeds_each_value() {
        let dataset = Dataset::embedded().unwrap();
        let registry = Registry::new(&dataset);

        let descriptor = ParameterDescriptor::new("tint", "kOfxParamTypeRGBA")
            .with_default(json!([1, 0.5, 0.25, 1]));
        let code = render_one(&registry, &descriptor).unwrap();

        assert!(code.contains("static const double tintDefault[4] = {1.0, 0.5, 0.25, 1.0};"));
        assert!(code.contains("gPropSuite->propSetDoubleN(paramProps, kOfxParamPropDefault, 4, tintDefault);"));
    }

    #[test]
    fn test_default_dimension_mismatch() {
        let dataset = Dataset::embedded().unwrap();
        let registry = Registry::new(&dataset);

        for (param_type, default) in [
            ("kOfxParamTypeRGB", json!([1, 0])),
            ("kOfxParamTypeRGB", json!(0.5)),
            ("kOfxParamTypeDouble", json!([1, 2])),
            ("kOfxParamTypeInteger2D", json!([])),
        ] {
            let descriptor = ParameterDescriptor::new("p", param_type).with_default(default);
            let err = render_one(&registry, &descriptor).unwrap_err();
            assert_eq!(err.fields(), vec!["default"], "{param_type}");
        }
    }

    #[test]
    fn test_matching_dimension_embeds_n_values() {
        let dataset = Dataset::embedded().unwrap();
        let registry = Registry::new(&dataset);

        for name in registry.list_category("param_types") {
            let shape = ParamShape::of(registry.param_type(name).unwrap());
            if !shape.representation.is_numeric() || shape.boolean {
                continue;
            }
            let values: Vec<i64> = (0..shape.dimensions as i64).collect();
            let descriptor = ParameterDescriptor::new("p", name).with_default(json!(values));
            let code = render_one(&registry, &descriptor).unwrap();
            let line = code
                .lines()
                .find(|l| l.contains("kOfxParamPropDefault") || l.contains("pDefault["))
                .unwrap();
            if shape.dimensions == 1 {
                assert!(line.ends_with(", 0);") || line.ends_with(", 0.0);"), "{name}: {line}");
            } else {
                let literal = line.split('{').nth(1).unwrap();
                assert_eq!(literal.split(',').count(), shape.dimensions, "{name}");
            }
        }
    }

    #[test]
    fn test_scalar_bound_broadcasts() {
        let dataset = Dataset::embedded().unwrap();
        let registry = Registry::new(&dataset);

        let descriptor = ParameterDescriptor::new("offset", "kOfxParamTypeInteger2D")
            .with_range(json!(-10), json!([10, 20]));
        let code = render_one(&registry, &descriptor).unwrap();

        assert!(code.contains("static const int offsetMin[2] = {-10, -10};"));
        assert!(code.contains("static const int offsetMax[2] = {10, 20};"));
        assert!(code.contains("propSetIntN(paramProps, kOfxParamPropMax, 2, offsetMax);"));
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let dataset = Dataset::embedded().unwrap();
        let registry = Registry::new(&dataset);

        let descriptor =
            ParameterDescriptor::new("steps", "kOfxParamTypeInteger").with_default(json!(2.5));
        let err = render_one(&registry, &descriptor).unwrap_err();
        assert_eq!(err.fields(), vec!["default"]);
        assert!(err.issues[0].message.contains("integers"));
    }

    #[test]
    fn test_integer_outside_int_range_rejected() {
        let dataset = Dataset::embedded().unwrap();
        let registry = Registry::new(&dataset);

        let descriptor = ParameterDescriptor::new("offset", "kOfxParamTypeInteger2D")
            .with_default(json!([10_000_000_000i64, 0]))
            .with_range(json!(i64::from(i32::MIN) - 1), json!(i32::MAX));
        let err = render_one(&registry, &descriptor).unwrap_err();
        assert_eq!(err.fields(), vec!["default", "min"]);
        assert!(err.issues[0].message.contains("outside the range of int"));

        let edges = ParameterDescriptor::new("steps", "kOfxParamTypeInteger")
            .with_range(json!(i32::MIN), json!(i32::MAX));
        let code = render_one(&registry, &edges).unwrap();
        assert!(code.contains("propSetInt(paramProps, kOfxParamPropMin, 0, -2147483648);"));
        assert!(code.contains("propSetInt(paramProps, kOfxParamPropMax, 0, 2147483647);"));
    }

    #[test]
    fn test_whole_floats_accepted_for_integers() {
        let dataset = Dataset::embedded().unwrap();
        let registry = Registry::new(&dataset);

        let steps = ParameterDescriptor::new("steps", "kOfxParamTypeInteger").with_default(json!(3.0));
        assert!(render_one(&registry, &steps)
            .unwrap()
            .contains("propSetInt(paramProps, kOfxParamPropDefault, 0, 3);"));

        let enabled =
            ParameterDescriptor::new("enabled", "kOfxParamTypeBoolean").with_default(json!(1.0));
        assert!(render_one(&registry, &enabled)
            .unwrap()
            .contains("propSetInt(paramProps, kOfxParamPropDefault, 0, 1);"));
    }

    #[test]
    fn test_comment_header_stays_on_one_line() {
        let dataset = Dataset::embedded().unwrap();
        let registry = Registry::new(&dataset);

        let descriptor = ParameterDescriptor::new("gain\n#error injected", "kOfxParamTypeDouble");
        let code = render_one(&registry, &descriptor).unwrap();
        assert_eq!(code.lines().next(), Some("// gain #error injected (kOfxParamTypeDouble)"));
        assert!(code.lines().all(|l| !l.trim_start().starts_with('#')));
        assert!(code.contains("\"gain\\n#error injected\""));
    }

    #[test]
    fn test_boolean_default() {
        let dataset = Dataset::embedded().unwrap();
        let registry = Registry::new(&dataset);

        let on = ParameterDescriptor::new("enabled", "kOfxParamTypeBoolean").with_default(json!(true));
        assert!(render_one(&registry, &on)
            .unwrap()
            .contains("propSetInt(paramProps, kOfxParamPropDefault, 0, 1);"));

        let bad = ParameterDescriptor::new("enabled", "kOfxParamTypeBoolean").with_default(json!(2));
        assert!(render_one(&registry, &bad).is_err());

        let ranged = ParameterDescriptor::new("enabled", "kOfxParamTypeBoolean")
            .with_range(json!(0), json!(1));
        assert_eq!(render_one(&registry, &ranged).unwrap_err().fields(), vec!["min", "max"]);
    }

    #[test]
    fn test_string_default_is_escaped() {
        let dataset = Dataset::embedded().unwrap();
        let registry = Registry::new(&dataset);

        let descriptor = ParameterDescriptor::new("title", "kOfxParamTypeString")
            .with_default(json!("say \"hi\""))
            .with_hint("Shown on screen");
        let code = render_one(&registry, &descriptor).unwrap();

        assert!(code.contains("propSetString(paramProps, kOfxParamPropDefault, 0, \"say \\\"hi\\\"\");"));
        assert!(code.contains("kOfxParamPropHint, 0, \"Shown on screen\""));
        assert!(code.contains("// See also: kOfxParamPropStringMode"));

        let numeric = ParameterDescriptor::new("title", "kOfxParamTypeString").with_default(json!(3));
        assert!(render_one(&registry, &numeric).is_err());
    }

    #[test]
    fn test_valueless_and_opaque_take_no_default() {
        let dataset = Dataset::embedded().unwrap();
        let registry = Registry::new(&dataset);

        for param_type in ["kOfxParamTypeGroup", "kOfxParamTypePushButton", "kOfxParamTypeBytes"] {
            let plain = ParameterDescriptor::new("p", param_type);
            assert!(render_one(&registry, &plain).is_ok(), "{param_type}");

            let with_default = plain.clone().with_default(json!(1));
            assert_eq!(
                render_one(&registry, &with_default).unwrap_err().fields(),
                vec!["default"],
                "{param_type}"
            );
        }
    }

    #[test]
    fn test_unresolved_type_lists_valid_values() {
        let dataset = Dataset::embedded().unwrap();
        let registry = Registry::new(&dataset);

        let err = render_one(&registry, &ParameterDescriptor::new("p", "kOfxParamTypeFloat"))
            .unwrap_err();
        assert_eq!(err.fields(), vec!["type"]);
        assert_eq!(err.issues[0].valid_values.len(), 17);
        assert!(err.issues[0].valid_values.contains(&"kOfxParamTypeDouble".to_string()));
    }

    #[test]
    fn test_missing_name_and_type_reported_together() {
        let dataset = Dataset::embedded().unwrap();
        let registry = Registry::new(&dataset);

        let descriptor = ParameterDescriptor::default();
        let mut issues = ValidationError::new();
        let resolved = resolve(&registry, &descriptor, "parameters[3]", &mut issues);
        assert!(resolved.is_none());
        assert_eq!(issues.fields(), vec!["parameters[3].name", "parameters[3].type"]);
    }
}
