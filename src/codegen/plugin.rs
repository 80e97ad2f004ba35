//! Whole-plugin skeleton: includes, suite globals, action handlers, the
//! `pluginMain` dispatcher and the exported entry points.

use ofx_definitions::{Category, Definition, DefinitionValue};
use std::collections::HashSet;
use tracing::debug;

use super::descriptor::PluginDescriptor;
use super::param::{self, ResolvedParam};
use super::writer::{SourceWriter, c_string, lower_camel, one_line};
use crate::config::CodegenConfig;
use crate::error::{OfxError, ValidationError};
use crate::registry::{DefinitionRef, Registry};
use crate::sequence;

pub const DEFAULT_CONTEXT: &str = "kOfxImageEffectContextFilter";

const PIXEL_DEPTH: &str = "kOfxBitDepthFloat";
const THREAD_SAFETY: &str = "kOfxImageEffectRenderFullySafe";
const MANDATED_PARAM_TYPE: &str = "kOfxParamTypeDouble";
const GPU_PROP_PREFIX: &str = "kOfxImageEffectProp";

/// Suites fetched during load, with the global each is stored in
const FETCHED_SUITES: [(&str, &str); 3] = [
    ("kOfxPropertySuite", "gPropSuite"),
    ("kOfxImageEffectSuite", "gEffectSuite"),
    ("kOfxParameterSuite", "gParamSuite"),
];

struct Handler {
    action: &'static str,
    call: &'static str,
}

/// Actions the skeleton traps. Load fetches suites, the rest must be handled
/// by every image effect.
static HANDLERS: [Handler; 5] = [
    Handler {
        action: "kOfxActionLoad",
        call: "onLoad()",
    },
    Handler {
        action: "kOfxActionDescribe",
        call: "describe(effect)",
    },
    Handler {
        action: "kOfxImageEffectActionDescribeInContext",
        call: "describeInContext(effect, inArgs)",
    },
    Handler {
        action: "kOfxActionCreateInstance",
        call: "createInstance(effect)",
    },
    Handler {
        action: "kOfxImageEffectActionRender",
        call: "render(effect, inArgs, outArgs)",
    },
];

/// A clip or mandated parameter named by a context entry like "Mask (optional)"
struct ContextItem<'d> {
    name: &'d str,
    note: Option<&'d str>,
}

impl<'d> ContextItem<'d> {
    fn parse(entry: &'d str) -> Self {
        match entry.split_once(" (") {
            Some((name, rest)) => Self {
                name: name.trim(),
                note: Some(rest.trim_end_matches(')')),
            },
            None => Self {
                name: entry.trim(),
                note: None,
            },
        }
    }

    fn is_identifier(&self) -> bool {
        !self.name.is_empty()
            && !self.name.starts_with(|c: char| c.is_ascii_digit())
            && self.name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

/// Everything the skeleton needs, checked up front
struct Plan<'a, 'd> {
    descriptor: &'a PluginDescriptor,
    context: DefinitionRef<'d>,
    params: Vec<ResolvedParam<'a, 'd>>,
}

pub fn generate(
    registry: &Registry<'_>,
    options: &CodegenConfig,
    descriptor: &PluginDescriptor,
) -> Result<String, OfxError> {
    let plan = validate(registry, descriptor)?;
    debug!(
        identifier = %descriptor.identifier,
        context = %plan.context.name,
        parameters = plan.params.len(),
        gpu = descriptor.supports_gpu,
        "generating plugin skeleton"
    );

    let handlers = handlers(registry)?;
    let mut w = SourceWriter::new();
    write_preamble(&mut w, registry, options, &plan)?;
    write_load(&mut w, registry)?;
    write_describe(&mut w, registry, options, &plan)?;
    write_describe_in_context(&mut w, registry, &plan)?;
    write_create_instance(&mut w, &plan);
    write_render(&mut w, registry, &plan);
    write_dispatch(&mut w, &handlers);
    write_exports(&mut w, registry);
    Ok(w.finish())
}

fn validate<'a, 'd>(
    registry: &Registry<'d>,
    descriptor: &'a PluginDescriptor,
) -> Result<Plan<'a, 'd>, OfxError> {
    let mut issues = ValidationError::new();

    if descriptor.display_name.trim().is_empty() {
        issues.missing("displayName");
    }
    if descriptor.identifier.trim().is_empty() {
        issues.missing("identifier");
    }

    let requested = descriptor
        .context
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CONTEXT);
    let context = match registry.resolve_context(requested) {
        Ok(context) => Some(context),
        Err(_) => {
            issues.unresolved("context", requested, registry.names(Category::Contexts));
            None
        }
    };

    let mandated: Vec<&str> = context
        .map(|c| {
            c.definition
                .required_params
                .iter()
                .map(|entry| ContextItem::parse(entry).name)
                .collect()
        })
        .unwrap_or_default();

    let mut params = Vec::new();
    let mut seen = HashSet::new();
    for (i, parameter) in descriptor.parameters.iter().enumerate() {
        let prefix = format!("parameters[{}]", i);
        let name = parameter.name.trim();

        if !name.is_empty() && !seen.insert(name) {
            issues.invalid(
                format!("{}.name", prefix),
                format!("duplicate parameter name '{}'", name),
            );
        }
        if let Some(context) = context.filter(|_| mandated.iter().any(|m| *m == name)) {
            issues.invalid(
                format!("{}.name", prefix),
                format!("'{}' is already declared by {}", name, context.name),
            );
        }

        if let Some(resolved) = param::resolve(registry, parameter, &prefix, &mut issues) {
            params.push(resolved);
        }
    }

    issues.into_result()?;
    match context {
        Some(context) => Ok(Plan {
            descriptor,
            context,
            params,
        }),
        None => Err(OfxError::not_found(
            "Context",
            requested,
            registry.names(Category::Contexts),
        )),
    }
}

/// Trapped actions in the order a host first calls them
fn handlers<'d>(registry: &Registry<'d>) -> Result<Vec<(&'static Handler, DefinitionRef<'d>)>, OfxError> {
    let mut handlers = HANDLERS
        .iter()
        .map(|handler| Ok((handler, registry.action(handler.action)?)))
        .collect::<Result<Vec<_>, OfxError>>()?;
    handlers.sort_by_key(|(handler, _)| sequence::position(handler.action).unwrap_or(usize::MAX));
    Ok(handlers)
}

fn write_preamble(
    w: &mut SourceWriter,
    registry: &Registry<'_>,
    options: &CodegenConfig,
    plan: &Plan<'_, '_>,
) -> Result<(), OfxError> {
    let descriptor = plan.descriptor;
    w.line(format!("// {}", one_line(&descriptor.display_name)));
    w.line(format!("// OFX image effect, {} context", plan.context.name));
    w.blank();

    let mut headers = vec!["ofxCore.h".to_string()];
    for (suite, _) in FETCHED_SUITES {
        if let Some(header) = &registry.suite(suite)?.definition.header {
            headers.push(header.clone());
        }
    }
    if descriptor.supports_gpu {
        headers.extend(
            gpu_properties(registry, true)
                .iter()
                .filter_map(|p| p.definition.header.clone()),
        );
    }
    let mut included = HashSet::new();
    w.line("#include <cstring>");
    for header in headers {
        if included.insert(header.clone()) {
            w.line(format!("#include \"{}\"", header));
        }
    }
    w.blank();

    w.line(format!("#define PLUGIN_IDENTIFIER {}", c_string(descriptor.identifier.trim())));
    w.line(format!("#define PLUGIN_VERSION_MAJOR {}", options.version_major));
    w.line(format!("#define PLUGIN_VERSION_MINOR {}", options.version_minor));
    w.blank();

    w.line("static OfxHost* gHost = nullptr;");
    for (suite, global) in FETCHED_SUITES {
        let (struct_name, _) = suite_binding(registry, suite)?;
        w.line(format!("static const {}* {} = nullptr;", struct_name, global));
    }
    w.blank();

    w.open("static void setHost(OfxHost* host)");
    w.line("gHost = host;");
    w.close("}");
    w.blank();
    Ok(())
}

/// Struct type and version used to fetch a suite
fn suite_binding(registry: &Registry<'_>, suite: &str) -> Result<(String, u64), OfxError> {
    let definition = registry.suite(suite)?.definition;
    let version = definition.suite_version().unwrap_or(1);
    let struct_name = match &definition.suite_struct {
        Some(name) => name.clone(),
        None => format!("{}V{}", suite.trim_start_matches('k'), version),
    };
    Ok((struct_name, version))
}

fn write_load(w: &mut SourceWriter, registry: &Registry<'_>) -> Result<(), OfxError> {
    handler_comment(w, registry.action("kOfxActionLoad")?);
    w.open("static OfxStatus onLoad()");
    w.open("if (!gHost) {");
    w.line("return kOfxStatErrMissingHostFeature;");
    w.close("}");

    let mut fetched = Vec::new();
    for (suite, global) in FETCHED_SUITES {
        let (struct_name, version) = suite_binding(registry, suite)?;
        w.line(format!(
            "{} = static_cast<const {}*>(gHost->fetchSuite(gHost->host, {}, {}));",
            global, struct_name, suite, version
        ));
        fetched.push(format!("!{}", global));
    }
    w.open(format!("if ({}) {{", fetched.join(" || ")));
    w.line("return kOfxStatErrMissingHostFeature;");
    w.close("}");
    w.line("return kOfxStatOK;");
    w.close("}");
    w.blank();
    Ok(())
}

fn write_describe(
    w: &mut SourceWriter,
    registry: &Registry<'_>,
    options: &CodegenConfig,
    plan: &Plan<'_, '_>,
) -> Result<(), OfxError> {
    let pixel_depth = registry.lookup(PIXEL_DEPTH)?.name;
    let thread_safety = registry.lookup(THREAD_SAFETY)?.name;

    handler_comment(w, registry.action("kOfxActionDescribe")?);
    w.open("static OfxStatus describe(OfxImageEffectHandle effect)");
    w.line("OfxPropertySetHandle effectProps;");
    w.line("gEffectSuite->getPropertySet(effect, &effectProps);");
    w.blank();
    w.line(format!(
        "gPropSuite->propSetString(effectProps, kOfxPropLabel, 0, {});",
        c_string(plan.descriptor.display_name.trim())
    ));
    w.line(format!(
        "gPropSuite->propSetString(effectProps, kOfxImageEffectPluginPropGrouping, 0, {});",
        c_string(&options.grouping)
    ));
    w.line(format!(
        "gPropSuite->propSetString(effectProps, kOfxImageEffectPropSupportedContexts, 0, {});",
        plan.context.name
    ));
    w.line(format!(
        "gPropSuite->propSetString(effectProps, kOfxImageEffectPropSupportedPixelDepths, 0, {});",
        pixel_depth
    ));
    w.line(format!(
        "gPropSuite->propSetString(effectProps, kOfxImageEffectPluginRenderThreadSafety, 0, {});",
        thread_safety
    ));

    if plan.descriptor.supports_gpu {
        w.blank();
        w.line("// GPU render support");
        for property in gpu_properties(registry, true) {
            w.line(format!(
                "gPropSuite->propSetString(effectProps, {}, 0, {});",
                property.name,
                c_string("true")
            ));
        }
    }

    w.line("return kOfxStatOK;");
    w.close("}");
    w.blank();
    Ok(())
}

fn write_describe_in_context(
    w: &mut SourceWriter,
    registry: &Registry<'_>,
    plan: &Plan<'_, '_>,
) -> Result<(), OfxError> {
    let context = plan.context.definition;

    handler_comment(w, registry.action("kOfxImageEffectActionDescribeInContext")?);
    w.open("static OfxStatus describeInContext(OfxImageEffectHandle effect, OfxPropertySetHandle inArgs)");
    w.line("OfxPropertySetHandle clipProps;");

    let clips = context
        .required_clips
        .iter()
        .map(|entry| (entry, false))
        .chain(context.optional_clips.iter().map(|entry| (entry, true)));
    for (entry, optional) in clips {
        let clip = ContextItem::parse(entry);
        if !clip.is_identifier() {
            w.line(format!("// {}: declare further clips here", one_line(entry)));
            continue;
        }
        let optional = optional || clip.note == Some("optional");
        w.blank();
        w.line(format!("// {}{}", clip.name, if optional { " (optional)" } else { "" }));
        w.line(format!(
            "gEffectSuite->clipDefine(effect, {}, &clipProps);",
            standard_name(registry, Category::StandardClips, clip.name)
        ));
        w.line("gPropSuite->propSetString(clipProps, kOfxImageEffectPropSupportedComponents, 0, kOfxImageComponentRGBA);");
        if optional {
            w.line("gPropSuite->propSetInt(clipProps, kOfxImageClipPropOptional, 0, 1);");
        }
    }

    w.blank();
    w.line("OfxParamSetHandle paramSet;");
    w.line("gEffectSuite->getParamSet(effect, &paramSet);");

    let mandated_type = registry.param_type(MANDATED_PARAM_TYPE)?.name;
    for entry in &context.required_params {
        let item = ContextItem::parse(entry);
        w.blank();
        w.line(format!("// {}, required by {}", one_line(entry), plan.context.name));
        w.open("{");
        w.line("OfxPropertySetHandle paramProps;");
        w.line(format!(
            "gParamSuite->paramDefine(paramSet, {}, {}, &paramProps);",
            mandated_type,
            standard_name(registry, Category::StandardParams, item.name)
        ));
        w.close("}");
    }

    for param in &plan.params {
        w.blank();
        param::render(param, w);
    }

    w.line("return kOfxStatOK;");
    w.close("}");
    w.blank();
    Ok(())
}

fn write_create_instance(w: &mut SourceWriter, plan: &Plan<'_, '_>) {
    w.line("// kOfxActionCreateInstance");
    w.open("static OfxStatus createInstance(OfxImageEffectHandle effect)");
    if !plan.params.is_empty() {
        w.line("OfxParamSetHandle paramSet;");
        w.line("gEffectSuite->getParamSet(effect, &paramSet);");
        w.line("// Fetch parameter handles with gParamSuite->paramGetHandle and");
        w.line("// store them on the instance through kOfxPropInstanceData.");
    }
    w.line("return kOfxStatOK;");
    w.close("}");
    w.blank();
}

fn write_render(w: &mut SourceWriter, registry: &Registry<'_>, plan: &Plan<'_, '_>) {
    w.line("// kOfxImageEffectActionRender");
    w.open("static OfxStatus render(OfxImageEffectHandle effect, OfxPropertySetHandle inArgs, OfxPropertySetHandle outArgs)");
    w.line("OfxTime time;");
    w.line("gPropSuite->propGetDouble(inArgs, kOfxPropTime, 0, &time);");
    w.line("OfxRectI renderWindow;");
    w.line("gPropSuite->propGetIntN(inArgs, kOfxImageEffectPropRenderWindow, 4, &renderWindow.x1);");

    if plan.descriptor.supports_gpu {
        w.blank();
        for property in gpu_properties(registry, false) {
            let var = lower_camel(property.name.trim_start_matches(GPU_PROP_PREFIX));
            match property.definition.prop_type.as_deref() {
                Some("pointer") => {
                    w.line(format!("void* {} = nullptr;", var));
                    w.line(format!(
                        "gPropSuite->propGetPointer(inArgs, {}, 0, &{});",
                        property.name, var
                    ));
                }
                _ => {
                    w.line(format!("int {} = 0;", var));
                    w.line(format!(
                        "gPropSuite->propGetInt(inArgs, {}, 0, &{});",
                        property.name, var
                    ));
                }
            }
        }
    }

    w.blank();
    w.line("OfxImageClipHandle outputClip;");
    w.line(format!(
        "gEffectSuite->clipGetHandle(effect, {}, &outputClip, nullptr);",
        standard_name(registry, Category::StandardClips, "Output")
    ));
    w.line("OfxPropertySetHandle outputImage;");
    w.open("if (gEffectSuite->clipGetImage(outputClip, time, nullptr, &outputImage) != kOfxStatOK) {");
    w.line("return kOfxStatFailed;");
    w.close("}");
    w.blank();
    w.line("// Process renderWindow of the input clips into outputImage here.");
    w.blank();
    w.line("gEffectSuite->clipReleaseImage(outputImage);");
    w.line("(void)outArgs;");
    w.line("return kOfxStatOK;");
    w.close("}");
    w.blank();
}

fn write_dispatch(w: &mut SourceWriter, handlers: &[(&'static Handler, DefinitionRef<'_>)]) {
    w.open("static OfxStatus pluginMain(const char* action, const void* handle, OfxPropertySetHandle inArgs, OfxPropertySetHandle outArgs)");
    w.line("OfxImageEffectHandle effect = (OfxImageEffectHandle)handle;");
    for (handler, action) in handlers {
        w.open(format!("if (std::strcmp(action, {}) == 0) {{", action.name));
        w.line(format!("return {};", handler.call));
        w.close("}");
    }
    w.line("return kOfxStatReplyDefault;");
    w.close("}");
    w.blank();
}

fn write_exports(w: &mut SourceWriter, registry: &Registry<'_>) {
    let fields: Vec<String> = registry
        .lookup("OfxPlugin")
        .map(|found| found.definition.fields.iter().map(|f| f.name.clone()).collect())
        .unwrap_or_default();
    let fields = if fields.is_empty() {
        PLUGIN_FIELDS.iter().map(|f| f.to_string()).collect()
    } else {
        fields
    };

    w.open("static OfxPlugin gPlugin = {");
    for field in &fields {
        let value = plugin_field_value(field).unwrap_or("nullptr");
        w.line(format!("{}, // {}", value, field));
    }
    w.close("};");

    for function in registry.filter(Category::ExportedFunctions, Definition::is_required) {
        let Some(signature) = &function.definition.signature else {
            continue;
        };
        w.blank();
        w.open(format!("OfxExport {}", signature));
        match function.name {
            "OfxGetPlugin" => w.line("return nth == 0 ? &gPlugin : nullptr;"),
            "OfxGetNumberOfPlugins" => w.line("return 1;"),
            other => w.line(format!("// {} is not generated", other)),
        }
        w.close("}");
    }
}

const PLUGIN_FIELDS: [&str; 7] = [
    "pluginApi",
    "apiVersion",
    "pluginIdentifier",
    "pluginVersionMajor",
    "pluginVersionMinor",
    "setHost",
    "mainEntry",
];

fn plugin_field_value(field: &str) -> Option<&'static str> {
    match field {
        "pluginApi" => Some("kOfxImageEffectPluginApi"),
        "apiVersion" => Some("1"),
        "pluginIdentifier" => Some("PLUGIN_IDENTIFIER"),
        "pluginVersionMajor" => Some("PLUGIN_VERSION_MAJOR"),
        "pluginVersionMinor" => Some("PLUGIN_VERSION_MINOR"),
        "setHost" => Some("setHost"),
        "mainEntry" => Some("pluginMain"),
        _ => None,
    }
}

/// GPU properties: the `*RenderSupported` switches, or the per-render
/// enable flags and queues
fn gpu_properties<'d>(registry: &Registry<'d>, switches: bool) -> Vec<DefinitionRef<'d>> {
    registry.filter(Category::GpuProperties, |definition| {
        definition.values.iter().any(|v| v == "true") == switches
    })
}

/// The constant whose value is `name` in a standard-name table, or a quoted
/// string when there is none
fn standard_name(registry: &Registry<'_>, category: Category, name: &str) -> String {
    registry
        .filter(category, |definition| {
            matches!(&definition.value, Some(DefinitionValue::Name(value)) if value == name)
        })
        .first()
        .map(|found| found.name.to_string())
        .unwrap_or_else(|| c_string(name))
}

fn handler_comment(w: &mut SourceWriter, action: DefinitionRef<'_>) {
    w.line(format!("// {}", action.name));
    if !action.definition.description.is_empty() {
        w.line(format!("// {}", one_line(&action.definition.description)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::descriptor::ParameterDescriptor;
    use ofx_definitions::Dataset;
    use serde_json::json;

    fn skeleton(descriptor: &PluginDescriptor) -> Result<String, OfxError> {
        let dataset = Dataset::embedded().unwrap();
        let registry = Registry::new(&dataset);
        generate(&registry, &CodegenConfig::default(), descriptor)
    }

    fn validation_fields(err: OfxError) -> Vec<String> {
        match err {
            OfxError::Validation(issues) => issues.fields().iter().map(|f| f.to_string()).collect(),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_minimal_filter_skeleton() {
        let code = skeleton(&PluginDescriptor::new("Blur", "com.acme.blur")).unwrap();

        assert!(code.contains("kOfxImageEffectPropSupportedContexts, 0, kOfxImageEffectContextFilter"));
        assert!(code.contains("clipDefine(effect, kOfxImageEffectSimpleSourceClipName, &clipProps)"));
        assert!(code.contains("clipDefine(effect, kOfxImageEffectOutputClipName, &clipProps)"));
        assert!(code.contains("clipDefine(effect, \"Mask\", &clipProps)"));
        assert!(code.contains("kOfxImageClipPropOptional"));
        for action in [
            "kOfxActionDescribe",
            "kOfxImageEffectActionDescribeInContext",
            "kOfxActionCreateInstance",
            "kOfxImageEffectActionRender",
        ] {
            assert!(code.contains(&format!("std::strcmp(action, {action})")), "{action}");
        }
        for gpu in ["Cuda", "Metal", "OpenCL", "ofxGPURender.h"] {
            assert!(!code.contains(gpu), "{gpu}");
        }
    }

    #[test]
    fn test_required_actions_are_all_dispatched() {
        let dataset = Dataset::embedded().unwrap();
        let registry = Registry::new(&dataset);
        let code = generate(
            &registry,
            &CodegenConfig::default(),
            &PluginDescriptor::new("Blur", "com.acme.blur"),
        )
        .unwrap();

        for (name, definition) in registry.actions() {
            if definition.is_required() {
                assert!(code.contains(&format!("std::strcmp(action, {name})")), "{name}");
            }
        }
    }

    #[test]
    fn test_dispatch_follows_host_call_order() {
        let code = skeleton(&PluginDescriptor::new("Blur", "com.acme.blur")).unwrap();
        let at = |action: &str| code.find(&format!("std::strcmp(action, {action})")).unwrap();

        assert!(at("kOfxActionLoad") < at("kOfxActionDescribe"));
        assert!(at("kOfxActionDescribe") < at("kOfxImageEffectActionDescribeInContext"));
        assert!(at("kOfxActionCreateInstance") < at("kOfxImageEffectActionRender"));
    }

    #[test]
    fn test_gpu_skeleton() {
        let code = skeleton(&PluginDescriptor::new("Blur", "com.acme.blur").with_gpu()).unwrap();

        for property in [
            "kOfxImageEffectPropCudaRenderSupported",
            "kOfxImageEffectPropMetalRenderSupported",
            "kOfxImageEffectPropOpenCLRenderSupported",
        ] {
            assert!(code.contains(&format!("propSetString(effectProps, {property}, 0, \"true\")")), "{property}");
        }
        assert!(code.contains("#include \"ofxGPURender.h\""));
        assert!(code.contains("propGetInt(inArgs, kOfxImageEffectPropCudaEnabled, 0, &cudaEnabled)"));
        assert!(code.contains("propGetPointer(inArgs, kOfxImageEffectPropMetalCommandQueue, 0, &metalCommandQueue)"));
    }

    #[test]
    fn test_suites_fetched_with_dataset_versions() {
        let code = skeleton(&PluginDescriptor::new("Blur", "com.acme.blur")).unwrap();

        assert!(code.contains("static const OfxPropertySuiteV1* gPropSuite = nullptr;"));
        assert!(code.contains(
            "gParamSuite = static_cast<const OfxParameterSuiteV1*>(gHost->fetchSuite(gHost->host, kOfxParameterSuite, 1));"
        ));
        assert!(code.contains("#include \"ofxParam.h\""));
        assert_eq!(code.matches("#include \"ofxImageEffect.h\"").count(), 1);
    }

    #[test]
    fn test_identity_and_options() {
        let dataset = Dataset::embedded().unwrap();
        let registry = Registry::new(&dataset);
        let options = CodegenConfig {
            grouping: "Acme/Blur".to_string(),
            version_major: 2,
            version_minor: 7,
        };
        let code = generate(
            &registry,
            &options,
            &PluginDescriptor::new("Fast \"Blur\"", "com.acme.blur"),
        )
        .unwrap();

        assert!(code.contains("#define PLUGIN_IDENTIFIER \"com.acme.blur\""));
        assert!(code.contains("#define PLUGIN_VERSION_MAJOR 2"));
        assert!(code.contains("#define PLUGIN_VERSION_MINOR 7"));
        assert!(code.contains("kOfxImageEffectPluginPropGrouping, 0, \"Acme/Blur\""));
        assert!(code.contains("kOfxPropLabel, 0, \"Fast \\\"Blur\\\"\""));
    }

    #[test]
    fn test_exports_required_entry_points() {
        let code = skeleton(&PluginDescriptor::new("Blur", "com.acme.blur")).unwrap();

        assert!(code.contains("OfxExport OfxPlugin* OfxGetPlugin(int nth)"));
        assert!(code.contains("OfxExport int OfxGetNumberOfPlugins(void)"));
        assert!(!code.contains("OfxSetHost"));
        assert!(code.contains("pluginMain, // mainEntry"));
    }

    #[test]
    fn test_transition_context() {
        let code = skeleton(
            &PluginDescriptor::new("Wipe", "com.acme.wipe").with_context("transition"),
        )
        .unwrap();

        assert!(code.contains("kOfxImageEffectContextTransition"));
        assert!(code.contains("clipDefine(effect, kOfxImageEffectTransitionSourceFromClipName, &clipProps)"));
        assert!(code.contains("clipDefine(effect, kOfxImageEffectTransitionSourceToClipName, &clipProps)"));
        assert!(code.contains(
            "paramDefine(paramSet, kOfxParamTypeDouble, kOfxImageEffectTransitionParamName, &paramProps)"
        ));
    }

    #[test]
    fn test_general_context_comments_free_form_clips() {
        let code = skeleton(
            &PluginDescriptor::new("Comp", "com.acme.comp").with_context("kOfxImageEffectContextGeneral"),
        )
        .unwrap();

        assert!(code.contains("// Any number of custom inputs: declare further clips here"));
        assert!(!code.contains("\"Any number"));
    }

    #[test]
    fn test_parameters_are_declared_in_order() {
        let descriptor = PluginDescriptor::new("Grade", "com.acme.grade")
            .with_parameter(ParameterDescriptor::new("gain", "kOfxParamTypeDouble").with_default(json!(1.0)))
            .with_parameter(ParameterDescriptor::new("tint", "kOfxParamTypeRGB").with_default(json!([1, 1, 1])));
        let code = skeleton(&descriptor).unwrap();

        let gain = code.find("kOfxParamTypeDouble, \"gain\"").unwrap();
        let tint = code.find("kOfxParamTypeRGB, \"tint\"").unwrap();
        assert!(gain < tint);
        assert!(code.contains("static const double tintDefault[3] = {1.0, 1.0, 1.0};"));
    }

    #[test]
    fn test_parameter_name_cannot_escape_comment() {
        let descriptor = PluginDescriptor::new("Grade", "com.acme.grade")
            .with_parameter(ParameterDescriptor::new("gain\n#error injected", "kOfxParamTypeDouble"));
        let code = skeleton(&descriptor).unwrap();

        assert!(code.contains("// gain #error injected (kOfxParamTypeDouble)"));
        assert!(!code.lines().any(|l| l.trim_start().starts_with("#error")));
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let err = skeleton(&PluginDescriptor::default()).unwrap_err();
        assert_eq!(validation_fields(err), vec!["displayName", "identifier"]);
    }

    #[test]
    fn test_every_problem_reported_at_once() {
        let descriptor = PluginDescriptor {
            display_name: " ".to_string(),
            identifier: String::new(),
            context: Some("kOfxImageEffectContextCompositor".to_string()),
            parameters: vec![
                ParameterDescriptor::new("a", "kOfxParamTypeFloat"),
                ParameterDescriptor::new("b", "kOfxParamTypeRGB").with_default(json!([1, 2])),
                ParameterDescriptor::default(),
            ],
            supports_gpu: false,
        };
        let err = skeleton(&descriptor).unwrap_err();

        assert_eq!(
            validation_fields(err),
            vec![
                "displayName",
                "identifier",
                "context",
                "parameters[0].type",
                "parameters[1].default",
                "parameters[2].name",
                "parameters[2].type",
            ]
        );
    }

    #[test]
    fn test_unresolved_context_lists_contexts() {
        let err = skeleton(&PluginDescriptor::new("X", "com.x").with_context("compositor")).unwrap_err();
        match err {
            OfxError::Validation(issues) => {
                assert_eq!(issues.issues[0].field, "context");
                assert_eq!(issues.issues[0].valid_values.len(), 6);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_and_mandated_names_rejected() {
        let descriptor = PluginDescriptor::new("Retime", "com.acme.retime")
            .with_context("retimer")
            .with_parameter(ParameterDescriptor::new("speed", "kOfxParamTypeDouble"))
            .with_parameter(ParameterDescriptor::new("speed", "kOfxParamTypeDouble"))
            .with_parameter(ParameterDescriptor::new("SourceTime", "kOfxParamTypeDouble"));
        let err = skeleton(&descriptor).unwrap_err();

        assert_eq!(
            validation_fields(err),
            vec!["parameters[1].name", "parameters[2].name"]
        );
    }

    #[test]
    fn test_context_item_parse() {
        let item = ContextItem::parse("Mask (optional)");
        assert_eq!(item.name, "Mask");
        assert_eq!(item.note, Some("optional"));
        assert!(item.is_identifier());

        let item = ContextItem::parse("Transition (0.0-1.0)");
        assert_eq!(item.name, "Transition");

        assert!(!ContextItem::parse("Any number of custom inputs").is_identifier());
    }
}
