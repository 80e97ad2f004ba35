//! Source generation for OFX image effect plugins.
//!
//! Output is C++ against the OFX C API. Every type, context, clip and suite
//! name is resolved through the [`Registry`], so the generated text only ever
//! names constants the dataset knows about.

pub mod descriptor;
pub mod param;
pub mod plugin;
pub mod writer;

pub use descriptor::{ParameterDescriptor, PluginDescriptor};
pub use param::{ParamShape, Representation};
pub use plugin::DEFAULT_CONTEXT;

use tracing::debug;

use crate::config::CodegenConfig;
use crate::error::{OfxError, ValidationError};
use crate::registry::Registry;
use writer::SourceWriter;

pub struct CodeGenerator<'d> {
    registry: Registry<'d>,
    options: CodegenConfig,
}

impl<'d> CodeGenerator<'d> {
    pub fn new(registry: Registry<'d>) -> Self {
        Self::with_options(registry, CodegenConfig::default())
    }

    pub fn with_options(registry: Registry<'d>, options: CodegenConfig) -> Self {
        Self { registry, options }
    }

    pub fn options(&self) -> &CodegenConfig {
        &self.options
    }

    /// A standalone `paramDefine` block for one parameter.
    ///
    /// The fragment belongs in a describe-in-context handler: it expects
    /// `paramSet`, `gParamSuite` and `gPropSuite` in scope.
    pub fn generate_parameter_code(&self, descriptor: &ParameterDescriptor) -> Result<String, OfxError> {
        let mut issues = ValidationError::new();
        let resolved = param::resolve(&self.registry, descriptor, "", &mut issues);
        issues.into_result()?;
        let Some(param) = resolved else {
            return Err(OfxError::not_found(
                "Param type",
                descriptor.param_type.as_str(),
                Vec::new(),
            ));
        };

        debug!(name = %param.name, param_type = %param.shape.type_name, "generating parameter");
        let mut w = SourceWriter::new();
        w.line("// Requires paramSet (OfxParamSetHandle), gParamSuite and gPropSuite in scope,");
        w.line("// e.g. inside the kOfxImageEffectActionDescribeInContext handler.");
        param::render(&param, &mut w);
        Ok(w.finish())
    }

    /// A complete single-plugin source file.
    pub fn generate_plugin_skeleton(&self, descriptor: &PluginDescriptor) -> Result<String, OfxError> {
        plugin::generate(&self.registry, &self.options, descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ofx_definitions::Dataset;
    use serde_json::json;

    #[test]
    fn test_generate_parameter_code() {
        let dataset = Dataset::embedded().unwrap();
        let generator = CodeGenerator::new(Registry::new(&dataset));

        let code = generator
            .generate_parameter_code(
                &ParameterDescriptor::new("radius", "kOfxParamTypeDouble")
                    .with_label("Radius")
                    .with_default(json!(5)),
            )
            .unwrap();

        assert!(code.starts_with("// Requires paramSet"));
        assert!(code.contains("paramDefine(paramSet, kOfxParamTypeDouble, \"radius\", &paramProps)"));
        assert!(code.contains("kOfxParamPropDefault, 0, 5.0"));
    }

    #[test]
    fn test_generate_parameter_code_validation() {
        let dataset = Dataset::embedded().unwrap();
        let generator = CodeGenerator::new(Registry::new(&dataset));

        let err = generator
            .generate_parameter_code(&ParameterDescriptor::new("", "kOfxParamTypeWidget"))
            .unwrap_err();
        match err {
            OfxError::Validation(issues) => assert_eq!(issues.fields(), vec!["name", "type"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_generator_uses_options() {
        let dataset = Dataset::embedded().unwrap();
        let options = CodegenConfig {
            grouping: "Studio".to_string(),
            ..CodegenConfig::default()
        };
        let generator = CodeGenerator::with_options(Registry::new(&dataset), options);

        let code = generator
            .generate_plugin_skeleton(&PluginDescriptor::new("Blur", "com.acme.blur"))
            .unwrap();
        assert!(code.contains("kOfxImageEffectPluginPropGrouping, 0, \"Studio\""));
        assert_eq!(generator.options().grouping, "Studio");
    }
}
